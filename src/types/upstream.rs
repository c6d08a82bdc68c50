//! Response shapes of the third-party APIs. Only the fields read by the
//! fetchers are modelled; everything else is ignored by serde.

use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CoinGeckoMarketChart {
    #[serde(default)]
    pub prices: Vec<MarketSample>,
    #[serde(default)]
    pub market_caps: Vec<MarketSample>,
    #[serde(default)]
    pub total_volumes: Vec<MarketSample>,
}

/// `[timestamp_ms, value]`
#[derive(Debug, Deserialize)]
pub struct MarketSample(pub i64, pub f64);

#[derive(Debug, Deserialize)]
pub struct DexScreenerTokens {
    pub pairs: Option<Vec<DexScreenerPair>>,
}

#[derive(Debug, Deserialize)]
pub struct DexScreenerPair {
    #[serde(rename = "baseToken")]
    pub base_token: Option<BaseToken>,
    #[serde(rename = "priceUsd")]
    pub price_usd: Option<String>,
    pub volume: Option<PairVolume>,
    pub liquidity: Option<PairLiquidity>,
    #[serde(rename = "marketCap")]
    pub market_cap: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct BaseToken {
    pub name: Option<String>,
    pub symbol: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PairVolume {
    pub h24: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct PairLiquidity {
    pub usd: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct JsonRpcRequest<P> {
    pub jsonrpc: &'static str,
    pub id: &'static str,
    pub method: &'static str,
    pub params: P,
}

#[derive(Debug, Serialize)]
pub struct TokenAccountsParams {
    pub mint: String,
    pub page: u32,
    pub limit: u32,
}

#[derive(Debug, Deserialize)]
pub struct JsonRpcResponse<R> {
    pub result: Option<R>,
    pub error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct TokenAccountsResult {
    pub total: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct RugCheckToken {
    pub analysis: Option<RugCheckAnalysis>,
}

#[derive(Debug, Deserialize)]
pub struct RugCheckAnalysis {
    #[serde(rename = "profitPercentage")]
    pub profit_percentage: Option<f64>,
}
