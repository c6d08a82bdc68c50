use axum::{
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers::{get_active_addresses, get_daily_metrics, get_holders_in_profit, health};
use super::state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/api/metrics", get(get_daily_metrics))
        .route("/api/holders-in-profit", get(get_holders_in_profit))
        .route("/api/active-addresses", get(get_active_addresses))
        .route("/health", get(health))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
