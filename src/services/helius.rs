use crate::config::Config;
use crate::error::Error;
use crate::services::http::post_json;
use crate::types::upstream::{JsonRpcRequest, JsonRpcResponse, TokenAccountsParams, TokenAccountsResult};

pub const SERVICE: &str = "helius";

/// Total number of token accounts for the mint, as reported by Helius'
/// `getTokenAccounts`. A single-entry page is enough to read the total.
pub async fn fetch_holder_count(client: &reqwest::Client, config: &Config) -> Result<u64, Error> {
    tracing::info!("Fetching total holder count from Helius...");
    let request = JsonRpcRequest {
        jsonrpc: "2.0",
        id: "holderpulse",
        method: "getTokenAccounts",
        params: TokenAccountsParams {
            mint: config.token_address.to_string(),
            page: 1,
            limit: 1,
        },
    };

    let response: JsonRpcResponse<TokenAccountsResult> =
        post_json(client, SERVICE, &config.rpc_url, &request, config.max_retries).await?;
    let total = holder_total(response)?;

    tracing::info!("Helius reports {} holders", total);
    Ok(total)
}

fn holder_total(response: JsonRpcResponse<TokenAccountsResult>) -> Result<u64, Error> {
    if let Some(error) = response.error {
        tracing::warn!("Helius returned error {}: {}", error.code, error.message);
        return Err(Error::malformed(SERVICE, "result"));
    }
    response
        .result
        .and_then(|result| result.total)
        .ok_or_else(|| Error::malformed(SERVICE, "result.total"))
}
