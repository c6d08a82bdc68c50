use chrono::NaiveDate;

use crate::config::Config;
use crate::error::Error;
use crate::services::http::get_json;
use crate::types::models::RealtimeSnapshot;
use crate::types::upstream::{DexScreenerPair, DexScreenerTokens};

pub const SERVICE: &str = "dexscreener";

/// Current pair data for the configured token, taken from the first pair
/// DexScreener lists.
pub async fn fetch_realtime_snapshot(
    client: &reqwest::Client,
    config: &Config,
    today: NaiveDate,
) -> Result<RealtimeSnapshot, Error> {
    let url = config.token_pairs_url();
    tracing::info!("Fetching real-time pair data for {}", config.token_address);

    let tokens: DexScreenerTokens = get_json(client, SERVICE, &url, config.max_retries).await?;
    let pair = tokens
        .pairs
        .and_then(|pairs| pairs.into_iter().next())
        .ok_or_else(|| Error::malformed(SERVICE, "a trading pair"))?;

    Ok(snapshot_from_pair(pair, today))
}

pub fn snapshot_from_pair(pair: DexScreenerPair, today: NaiveDate) -> RealtimeSnapshot {
    let (name, symbol) = match pair.base_token {
        Some(token) => (token.name, token.symbol),
        None => (None, None),
    };

    RealtimeSnapshot {
        observed_on: today,
        price_usd: pair
            .price_usd
            .as_deref()
            .and_then(|price| price.parse::<f64>().ok())
            .filter(|price| price.is_finite()),
        volume_24h: pair.volume.and_then(|v| v.h24),
        liquidity_usd: pair.liquidity.and_then(|l| l.usd),
        market_cap: pair.market_cap,
        name,
        symbol,
    }
}
