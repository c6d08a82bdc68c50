use std::sync::Arc;

use anyhow::Result;
use dotenv::dotenv;
use tokio::net::TcpListener;

use holderpulse::api::routes::create_router;
use holderpulse::config::Config;
use holderpulse::services::collector::Collector;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenv().ok();
    holderpulse::init_tracing();

    let config = Arc::new(Config::from_env()?);
    tracing::info!(
        "Serving metrics for {} (CoinGecko id {})",
        config.token_address,
        config.coingecko_id
    );

    let collector = Collector::new(config.clone())?;

    // Test RPC connection at startup
    match collector.rpc().get_version().await {
        Ok(version) => tracing::info!("Connected to Solana RPC (version: {})", version.solana_core),
        Err(e) => tracing::error!("Failed to connect to RPC: {:?}", e),
    };

    let app = create_router(Arc::new(collector));

    tracing::info!("Listening on {}", config.listen_addr);
    let listener = TcpListener::bind(config.listen_addr).await?;

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
