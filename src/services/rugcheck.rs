use crate::config::Config;
use crate::error::Error;
use crate::services::http::get_json;
use crate::types::upstream::RugCheckToken;

pub const SERVICE: &str = "rugcheck";

/// Current share of holders in profit according to RugCheck, rounded to
/// two decimals. Used only as the anchor of the simulated series.
pub async fn fetch_profit_percent(client: &reqwest::Client, config: &Config) -> Result<f64, Error> {
    let url = config.rugcheck_token_url();
    let token: RugCheckToken = get_json(client, SERVICE, &url, config.max_retries).await?;
    let percent = profit_percent(token)?;
    tracing::info!("RugCheck reports {:.2}% of holders in profit", percent);
    Ok(percent)
}

fn profit_percent(token: RugCheckToken) -> Result<f64, Error> {
    token
        .analysis
        .and_then(|analysis| analysis.profit_percentage)
        .filter(|pct| pct.is_finite())
        .map(|pct| (pct * 100.0).round() / 100.0)
        .ok_or_else(|| Error::malformed(SERVICE, "analysis.profitPercentage"))
}
