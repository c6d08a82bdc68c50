//! In-process stand-ins for the upstream APIs, served on an ephemeral port.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{Duration, Utc};
use holderpulse::config::Config;
use serde_json::{json, Value};
use tokio::net::TcpListener;

pub const PAIR_PRICE: f64 = 0.00015;
pub const HOLDERS: u64 = 104_233;

#[derive(Debug, Clone, Copy)]
pub struct Upstream {
    pub coingecko: bool,
    pub dexscreener: bool,
    pub helius: bool,
    pub rugcheck: bool,
}

impl Upstream {
    pub fn healthy() -> Self {
        Upstream {
            coingecko: true,
            dexscreener: true,
            helius: true,
            rugcheck: true,
        }
    }

    pub fn down() -> Self {
        Upstream {
            coingecko: false,
            dexscreener: false,
            helius: false,
            rugcheck: false,
        }
    }
}

fn unavailable() -> Response {
    (StatusCode::SERVICE_UNAVAILABLE, "upstream down").into_response()
}

/// Daily samples at UTC midnight for the last `days` days, plus an
/// intraday sample for today.
async fn market_chart(
    State(upstream): State<Arc<Upstream>>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if !upstream.coingecko {
        return unavailable();
    }
    let days: i64 = params.get("days").and_then(|d| d.parse().ok()).unwrap_or(1);
    let today = Utc::now().date_naive();

    let mut prices = Vec::new();
    let mut caps = Vec::new();
    let mut volumes = Vec::new();
    for back in (1..=days).rev() {
        let day = today - Duration::days(back - 1);
        let ms = day.and_hms_opt(0, 0, 0).unwrap().and_utc().timestamp_millis();
        let price = 0.0001 + 0.00001 * (days - back) as f64;
        prices.push(json!([ms, price]));
        caps.push(json!([ms, price * 1.0e9]));
        volumes.push(json!([ms, 10_000.0 + back as f64]));
    }
    let now = Utc::now().timestamp_millis();
    prices.push(json!([now, 0.00014]));

    Json(json!({ "prices": prices, "market_caps": caps, "total_volumes": volumes })).into_response()
}

async fn token_pairs(State(upstream): State<Arc<Upstream>>) -> Response {
    if !upstream.dexscreener {
        return unavailable();
    }
    Json(json!({
        "pairs": [{
            "baseToken": { "name": "ENDLESS COIN", "symbol": "ENDLESS" },
            "priceUsd": PAIR_PRICE.to_string(),
            "volume": { "h24": 12_500.0 },
            "liquidity": { "usd": 48_000.0 },
            "marketCap": 150_000.0
        }]
    }))
    .into_response()
}

/// Helius and the Solana RPC share one endpoint. Only `getTokenAccounts`
/// is answered; every other method is a JSON-RPC error.
async fn rpc(State(upstream): State<Arc<Upstream>>, Json(request): Json<Value>) -> Response {
    let id = request["id"].clone();
    if request["method"] == "getTokenAccounts" && upstream.helius {
        return Json(json!({
            "jsonrpc": "2.0",
            "id": id,
            "result": { "total": HOLDERS, "limit": 1, "page": 1, "token_accounts": [] }
        }))
        .into_response();
    }
    if !upstream.helius {
        return unavailable();
    }
    Json(json!({
        "jsonrpc": "2.0",
        "id": id,
        "error": { "code": -32601, "message": "Method not found" }
    }))
    .into_response()
}

async fn rugcheck(State(upstream): State<Arc<Upstream>>) -> Response {
    if !upstream.rugcheck {
        return unavailable();
    }
    Json(json!({ "analysis": { "profitPercentage": 61.0 } })).into_response()
}

pub async fn spawn_upstream(upstream: Upstream) -> SocketAddr {
    let app = Router::new()
        .route("/coins/:id/market_chart", get(market_chart))
        .route("/latest/dex/tokens/:mint", get(token_pairs))
        .route("/api/token/:mint", get(rugcheck))
        .route("/", post(rpc))
        .with_state(Arc::new(upstream));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

pub fn config_for(addr: SocketAddr, seed: u64) -> Config {
    let base = format!("http://{}", addr);
    Config::from_lookup(|key| match key {
        "HELIUS_API_KEY" => Some("test-key".to_string()),
        "SOLANA_RPC_URL" => Some(format!("{}/", base)),
        "COINGECKO_API_URL" => Some(base.clone()),
        "DEXSCREENER_API_URL" => Some(base.clone()),
        "RUGCHECK_API_URL" => Some(base.clone()),
        "REQUEST_TIMEOUT_SECS" => Some("5".to_string()),
        "MAX_RETRIES" => Some("0".to_string()),
        "SIMULATION_SEED" => Some(seed.to_string()),
        _ => None,
    })
    .unwrap()
}
