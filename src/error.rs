use std::time::Duration;

use reqwest::StatusCode;
use solana_client::client_error::ClientError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("RPC error: {0}")]
    Rpc(#[from] ClientError),

    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to decode mint account: {0}")]
    MintDecode(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("{service} responded with status {status}")]
    UpstreamStatus {
        service: &'static str,
        status: StatusCode,
    },

    #[error("{service} response is missing {field}")]
    MalformedResponse {
        service: &'static str,
        field: &'static str,
    },

    #[error("{0} timed out after {1:?}")]
    Timeout(&'static str, Duration),

    #[error("Required source {0} is unavailable")]
    SourceUnavailable(&'static str),

    #[error("Failed to fetch any data")]
    NoData,
}

impl Error {
    pub fn malformed(service: &'static str, field: &'static str) -> Self {
        Error::MalformedResponse { service, field }
    }
}
