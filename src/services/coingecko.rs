use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};

use crate::config::Config;
use crate::error::Error;
use crate::services::http::get_json;
use crate::types::models::MarketHistory;
use crate::types::upstream::{CoinGeckoMarketChart, MarketSample};

pub const SERVICE: &str = "coingecko";

pub async fn fetch_market_history(
    client: &reqwest::Client,
    config: &Config,
    days: u32,
) -> Result<MarketHistory, Error> {
    let url = config.market_chart_url(days);
    tracing::info!("Fetching {} days of market history for {}", days, config.coingecko_id);

    let chart: CoinGeckoMarketChart = get_json(client, SERVICE, &url, config.max_retries).await?;
    let history = history_from_chart(chart);
    if history.prices.is_empty() {
        return Err(Error::malformed(SERVICE, "prices"));
    }

    tracing::info!("Market history covers {} days", history.prices.len());
    Ok(history)
}

pub fn history_from_chart(chart: CoinGeckoMarketChart) -> MarketHistory {
    MarketHistory {
        prices: by_date(&chart.prices),
        volumes: by_date(&chart.total_volumes),
        market_caps: by_date(&chart.market_caps),
    }
}

/// Keys samples by UTC date. Later samples of the same day replace earlier
/// ones, so the intraday "now" point wins for today.
fn by_date(samples: &[MarketSample]) -> BTreeMap<NaiveDate, f64> {
    samples
        .iter()
        .filter(|MarketSample(_, value)| value.is_finite())
        .filter_map(|MarketSample(ms, value)| {
            DateTime::<Utc>::from_timestamp_millis(*ms).map(|ts| (ts.date_naive(), *value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn samples_are_keyed_by_utc_date() {
        // 2025-06-20T00:00Z, 2025-06-21T00:00Z, 2025-06-21T13:20Z
        let chart: CoinGeckoMarketChart = serde_json::from_str(
            r#"{
                "prices": [[1750377600000, 140.5], [1750464000000, 142.0], [1750512000000, 145.25]],
                "market_caps": [[1750377600000, 7.1e10], [1750464000000, 7.2e10]],
                "total_volumes": [[1750377600000, 3.0e9]]
            }"#,
        )
        .unwrap();

        let history = history_from_chart(chart);

        assert_eq!(history.prices.len(), 2);
        assert_eq!(history.prices.get(&day("2025-06-20")), Some(&140.5));
        assert_eq!(history.prices.get(&day("2025-06-21")), Some(&145.25));
        assert_eq!(history.market_caps.len(), 2);
        assert_eq!(history.volumes.len(), 1);
        assert!(!history.volumes.contains_key(&day("2025-06-21")));
    }

    #[test]
    fn missing_series_deserialize_empty() {
        let chart: CoinGeckoMarketChart = serde_json::from_str(r#"{"prices": []}"#).unwrap();
        assert!(history_from_chart(chart).is_empty());
    }
}
