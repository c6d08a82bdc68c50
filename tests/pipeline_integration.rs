//! End-to-end runs of the collector and the HTTP router against mocked
//! upstream services.

mod common;

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use holderpulse::api::routes::create_router;
use holderpulse::error::Error;
use holderpulse::export::{write_csv, COLUMNS};
use holderpulse::services::collector::Collector;
use holderpulse::services::dates::DateWindow;
use holderpulse::types::models::Origin;
use serde_json::Value;
use tower::ServiceExt;

use common::{config_for, spawn_upstream, Upstream, HOLDERS, PAIR_PRICE};

async fn collector(upstream: Upstream, seed: u64) -> Collector {
    let addr = spawn_upstream(upstream).await;
    Collector::new(Arc::new(config_for(addr, seed))).unwrap()
}

async fn get_json(collector: Collector, uri: &str) -> (StatusCode, Value) {
    let response = create_router(Arc::new(collector))
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn full_pipeline_merges_every_source() {
    let collector = collector(Upstream::healthy(), 1).await;
    let window = DateWindow::trailing(collector.today(), 7).unwrap();

    let collected = collector.collect(window).await.unwrap();
    let metrics = &collected.metrics;

    assert_eq!(metrics.len(), 7);
    assert_eq!(metrics.iter().map(|m| m.date).collect::<Vec<_>>(), window.dates());
    assert!(collected.sources.chain.is_none(), "mock RPC rejects account lookups");

    for metric in metrics {
        assert!(metric.price_usd.is_some());
        assert!(metric.volume_24h.is_some());
        assert!(metric.market_cap.is_some());
        assert_eq!(metric.token.name.as_deref(), Some("ENDLESS COIN"));
        assert_eq!(metric.token.symbol.as_deref(), Some("ENDLESS"));
        assert_eq!(metric.token.decimals, None);
        assert_eq!(metric.top10_hold_percent, None);
        let percent = metric.simulated.percent_in_profit.unwrap();
        assert!((5.0..=95.0).contains(&percent));
    }

    let today = metrics.last().unwrap();
    // the intraday CoinGecko sample beats the DexScreener pair price
    assert_eq!(today.price_usd, Some(0.00014));
    assert_eq!(today.liquidity_usd, Some(48_000.0));
    assert_eq!(today.holder_count, Some(HOLDERS));
    assert_eq!(today.holder_count_origin, Some(Origin::Measured));
    // pair liquidity has no history, so every day carries the snapshot
    assert!(metrics.iter().all(|m| m.liquidity_usd == Some(48_000.0)));
    assert!(metrics[..6]
        .iter()
        .all(|m| m.holder_count_origin == Some(Origin::Simulated)));
    assert!(metrics[0].holder_count_delta.is_none());
    assert!(metrics[1..].iter().all(|m| m.holder_count_delta.is_some()));
    assert!(metrics[0].daily_return_percent.is_none());
}

#[tokio::test]
async fn missing_history_falls_back_to_pair_snapshot() {
    let upstream = Upstream {
        coingecko: false,
        ..Upstream::healthy()
    };
    let collector = collector(upstream, 2).await;
    let window = DateWindow::trailing(collector.today(), 3).unwrap();

    let collected = collector.collect(window).await.unwrap();
    let metrics = &collected.metrics;

    assert_eq!(metrics.len(), 3);
    assert_eq!(metrics[0].price_usd, None);
    assert_eq!(metrics[1].price_usd, None);
    assert_eq!(metrics[2].price_usd, Some(PAIR_PRICE));
    assert_eq!(metrics[2].volume_24h, Some(12_500.0));
    // past dates borrow pair volume but never the pair price
    assert_eq!(metrics[1].volume_24h, Some(12_500.0));
    assert!(metrics.iter().all(|m| m.daily_return_percent.is_none()));
    assert!(metrics[1].simulated.percent_in_profit.is_none());
}

#[tokio::test]
async fn no_data_at_all_is_an_error() {
    let collector = collector(Upstream::down(), 3).await;
    let window = DateWindow::trailing(collector.today(), 3).unwrap();

    let result = collector.collect(window).await;

    assert!(matches!(result, Err(Error::NoData)));
}

#[tokio::test]
async fn exported_csv_matches_collected_rows() {
    let collector = collector(Upstream::healthy(), 4).await;
    let window = DateWindow::trailing(collector.today(), 5).unwrap();
    let collected = collector.collect(window).await.unwrap();

    let mut buffer = Vec::new();
    write_csv(&mut buffer, &collected.metrics).unwrap();
    let text = String::from_utf8(buffer).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines.len(), 6);
    assert_eq!(lines[0], COLUMNS.join(","));
    let today = window.end.format("%Y-%m-%d").to_string();
    assert!(lines[5].starts_with(&format!("{},0.00014,", today)));
}

#[tokio::test]
async fn metrics_endpoint_serves_nulls_for_absent_fields() {
    let (status, body) = get_json(collector(Upstream::healthy(), 5).await, "/api/metrics?days=4").await;

    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 4);
    assert!(rows[0]["holder_count_delta"].is_null());
    assert_eq!(rows[0]["liquidity_usd"], 48_000.0);
    assert!(rows[0]["top10_hold_percent"].is_null());
    assert_eq!(rows[3]["holder_count_origin"], "measured");
    assert_eq!(rows[2]["holder_count_origin"], "simulated");
    assert!(rows[3]["simulated"]["percent_in_profit"].is_number());
    assert!(rows[3]["date"].as_str().unwrap().len() == 10);
}

#[tokio::test]
async fn metrics_endpoint_fails_without_price_history() {
    let upstream = Upstream {
        coingecko: false,
        ..Upstream::healthy()
    };
    let (status, body) = get_json(collector(upstream, 6).await, "/api/metrics").await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].as_str().unwrap().contains("coingecko"));
}

#[tokio::test]
async fn seeded_simulation_is_repeatable() {
    let first = get_json(collector(Upstream::healthy(), 77).await, "/api/holders-in-profit?days=6").await;
    let second = get_json(collector(Upstream::healthy(), 77).await, "/api/holders-in-profit?days=6").await;

    assert_eq!(first.0, StatusCode::OK);
    assert_eq!(first.1, second.1);
    assert_eq!(first.1.as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn profit_series_is_anchored_on_rugcheck() {
    let (status, body) = get_json(collector(Upstream::healthy(), 8).await, "/api/holders-in-profit?days=1").await;

    assert_eq!(status, StatusCode::OK);
    let first = body[0]["percent_in_profit"].as_f64().unwrap();
    // 61.0 anchor plus at most 2.5 of jitter
    assert!((58.5..=63.5).contains(&first));
}

#[tokio::test]
async fn profit_series_counts_wallets_from_holder_total() {
    let (status, body) = get_json(collector(Upstream::healthy(), 10).await, "/api/holders-in-profit?days=3").await;

    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 3);
    for row in rows {
        let wallets = row["wallets_in_profit"].as_u64().unwrap();
        assert!(wallets <= HOLDERS);
    }
}

#[tokio::test]
async fn active_addresses_cover_priced_days() {
    let (status, body) = get_json(collector(Upstream::healthy(), 9).await, "/api/active-addresses?days=5").await;

    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 5);
    let last = rows[4]["active_addresses"].as_u64().unwrap();
    assert!((308_000..=313_000).contains(&last));
}
