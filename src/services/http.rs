use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::time::{sleep, Duration};

use crate::config::Config;
use crate::error::Error;

const RETRY_DELAY: Duration = Duration::from_millis(500);

pub fn build_client(config: &Config) -> Result<reqwest::Client, Error> {
    let client = reqwest::Client::builder()
        .timeout(config.request_timeout)
        .user_agent(concat!("holderpulse/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

/// Upper bound for one source: every attempt plus the pauses between them.
pub fn source_deadline(config: &Config) -> Duration {
    retry_budget(config.request_timeout, config.max_retries)
}

fn retry_budget(request_timeout: Duration, max_retries: u32) -> Duration {
    request_timeout * (max_retries + 1) + RETRY_DELAY * max_retries
}

pub async fn get_json<T: DeserializeOwned>(
    client: &reqwest::Client,
    service: &'static str,
    url: &str,
    max_retries: u32,
) -> Result<T, Error> {
    send_json(service, max_retries, || client.get(url)).await
}

pub async fn post_json<B: Serialize, T: DeserializeOwned>(
    client: &reqwest::Client,
    service: &'static str,
    url: &str,
    body: &B,
    max_retries: u32,
) -> Result<T, Error> {
    send_json(service, max_retries, || client.post(url).json(body)).await
}

/// Sends the request, retrying connection failures and timeouts up to
/// `max_retries` times. Non-success statuses are returned immediately.
async fn send_json<T, F>(service: &'static str, max_retries: u32, request: F) -> Result<T, Error>
where
    T: DeserializeOwned,
    F: Fn() -> reqwest::RequestBuilder,
{
    let attempts = max_retries + 1;
    let mut attempt = 1;
    loop {
        match request().send().await {
            Ok(response) => {
                let status = response.status();
                if !status.is_success() {
                    return Err(Error::UpstreamStatus { service, status });
                }
                return Ok(response.json::<T>().await?);
            }
            Err(e) if attempt < attempts && (e.is_connect() || e.is_timeout()) => {
                tracing::warn!(
                    "Request to {} failed (attempt {}/{}): {}",
                    service,
                    attempt,
                    attempts,
                    e
                );
                sleep(RETRY_DELAY).await;
                attempt += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }
}
