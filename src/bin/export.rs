//! One-shot export: collects the configured token's history, writes it to
//! CSV and prints the profitability report.

use std::sync::Arc;

use anyhow::{Context, Result};
use dotenv::dotenv;

use holderpulse::config::Config;
use holderpulse::export::{render_report, write_csv_file};
use holderpulse::services::collector::Collector;
use holderpulse::services::dates::DateWindow;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    holderpulse::init_tracing();

    let config = match Config::from_env() {
        Ok(config) => Arc::new(config),
        Err(e) => {
            tracing::error!("{}", e);
            return Err(e.into());
        }
    };

    tracing::info!("Starting data collection...");
    let collector = Collector::new(config.clone())?;
    let window = DateWindow::trailing(collector.today(), config.history_days)?;

    let collected = match collector.collect(window).await {
        Ok(collected) => collected,
        Err(e) => {
            tracing::error!("Failed to fetch any data. Exiting.");
            return Err(e.into());
        }
    };

    write_csv_file(&config.csv_path, &collected.metrics)
        .with_context(|| format!("writing {}", config.csv_path.display()))?;

    println!("{}", render_report(&config.token_address.to_string(), &collected));

    tracing::info!(
        "Analysis completed: {} days from sources {:?}",
        collected.metrics.len(),
        collected.sources.available()
    );
    Ok(())
}
