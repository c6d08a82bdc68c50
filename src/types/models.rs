use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Whether a value came from an upstream measurement or a placeholder model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Measured,
    Simulated,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenMetadata {
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub decimals: Option<u8>,
}

/// Metrics produced by the placeholder simulators. They carry no
/// information about real wallets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulatedMetrics {
    pub wallets_in_profit: Option<u64>,
    pub percent_in_profit: Option<f64>,
    pub active_addresses: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyMetric {
    pub date: NaiveDate,
    pub price_usd: Option<f64>,
    pub daily_return_percent: Option<f64>,
    pub volume_24h: Option<f64>,
    pub liquidity_usd: Option<f64>,
    pub market_cap: Option<f64>,
    pub holder_count: Option<u64>,
    pub holder_count_origin: Option<Origin>,
    pub holder_count_delta: Option<i64>,
    pub top10_hold_percent: Option<f64>,
    pub token: TokenMetadata,
    pub simulated: SimulatedMetrics,
}

/// Daily price, volume and market cap keyed by UTC date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarketHistory {
    pub prices: BTreeMap<NaiveDate, f64>,
    pub volumes: BTreeMap<NaiveDate, f64>,
    pub market_caps: BTreeMap<NaiveDate, f64>,
}

impl MarketHistory {
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty() && self.volumes.is_empty() && self.market_caps.is_empty()
    }
}

/// Current trading-pair figures. Only the price is tied to `observed_on`;
/// volume, market cap and liquidity also fill dates the history lacks.
#[derive(Debug, Clone, PartialEq)]
pub struct RealtimeSnapshot {
    pub observed_on: NaiveDate,
    pub price_usd: Option<f64>,
    pub volume_24h: Option<f64>,
    pub liquidity_usd: Option<f64>,
    pub market_cap: Option<f64>,
    pub name: Option<String>,
    pub symbol: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChainSnapshot {
    pub observed_on: NaiveDate,
    pub decimals: u8,
    pub top10_hold_percent: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HolderPoint {
    pub count: u64,
    pub origin: Origin,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfitPoint {
    pub date: NaiveDate,
    pub price: f64,
    pub percent_in_profit: f64,
    pub wallets_in_profit: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityPoint {
    pub date: NaiveDate,
    pub active_addresses: u64,
}
