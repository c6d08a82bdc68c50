use std::fs::File;
use std::io;
use std::path::Path;

use crate::error::Error;
use crate::services::collector::Collected;
use crate::types::models::{DailyMetric, ProfitPoint};

/// CSV header, in output order.
pub const COLUMNS: [&str; 14] = [
    "date",
    "price_usd",
    "daily_return_percent",
    "volume_24h",
    "liquidity_usd",
    "market_cap",
    "holder_count",
    "holder_count_delta",
    "top10_hold_percent",
    "token_name",
    "token_symbol",
    "token_decimals",
    "wallets_in_profit",
    "percent_in_profit",
];

fn cell<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn record(metric: &DailyMetric) -> [String; 14] {
    [
        metric.date.format("%Y-%m-%d").to_string(),
        cell(metric.price_usd),
        cell(metric.daily_return_percent),
        cell(metric.volume_24h),
        cell(metric.liquidity_usd),
        cell(metric.market_cap),
        cell(metric.holder_count),
        cell(metric.holder_count_delta),
        cell(metric.top10_hold_percent),
        cell(metric.token.name.as_deref()),
        cell(metric.token.symbol.as_deref()),
        cell(metric.token.decimals),
        cell(metric.simulated.wallets_in_profit),
        cell(metric.simulated.percent_in_profit),
    ]
}

/// Writes the header and one row per metric. Absent values are empty cells.
pub fn write_csv<W: io::Write>(writer: W, metrics: &[DailyMetric]) -> Result<(), Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(COLUMNS)?;
    for metric in metrics {
        wtr.write_record(record(metric))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_csv_file(path: &Path, metrics: &[DailyMetric]) -> Result<(), Error> {
    let file = File::create(path)?;
    write_csv(file, metrics)?;
    tracing::info!("Successfully wrote {} rows to {}", metrics.len(), path.display());
    Ok(())
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProfitSummary {
    pub average: f64,
    pub highest: f64,
    pub lowest: f64,
}

impl ProfitSummary {
    pub fn from_points(points: &[ProfitPoint]) -> Option<ProfitSummary> {
        if points.is_empty() {
            return None;
        }
        let percents = points.iter().map(|p| p.percent_in_profit);
        let sum: f64 = percents.clone().sum();
        Some(ProfitSummary {
            average: sum / points.len() as f64,
            highest: percents.clone().fold(f64::MIN, f64::max),
            lowest: percents.fold(f64::MAX, f64::min),
        })
    }
}

/// Human-readable profitability report printed by the export binary.
pub fn render_report(token: &str, collected: &Collected) -> String {
    let mut lines = vec![
        "--- Token Profitability Analysis Results ---".to_string(),
        format!("Token: {}", token),
        format!("Analysis Period: Last {} days", collected.metrics.len()),
        format!(
            "Total Holders Analyzed: {}",
            collected
                .sources
                .holder_count
                .map_or_else(|| "N/A".to_string(), |count| count.to_string())
        ),
        "Note: wallets in profit and percentage in profit are simulated from price movements, not measured."
            .to_string(),
        String::new(),
        format!("{:<12}{:<14}{:<17}{}", "date", "price", "walletsInProfit", "percentInProfit"),
    ];

    for point in &collected.profit {
        lines.push(format!(
            "{:<12}{:<14}{:<17}{:.1}",
            point.date.format("%Y-%m-%d").to_string(),
            format!("{:.6}", point.price),
            point
                .wallets_in_profit
                .map_or_else(|| "N/A".to_string(), |wallets| wallets.to_string()),
            point.percent_in_profit
        ));
    }

    if let Some(summary) = ProfitSummary::from_points(&collected.profit) {
        lines.push(String::new());
        lines.push("SUMMARY:".to_string());
        lines.push(format!("Average % of holders in profit: {:.1}%", summary.average));
        lines.push(format!("Highest % in profit: {:.1}%", summary.highest));
        lines.push(format!("Lowest % in profit: {:.1}%", summary.lowest));
    }

    lines.join("\n")
}
