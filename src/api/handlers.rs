use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;

use super::error::ApiError;
use super::state::AppState;
use crate::error::Error;
use crate::services::dates::DateWindow;
use crate::types::models::{ActivityPoint, DailyMetric, ProfitPoint};

pub const DEFAULT_DAYS: u32 = 30;

#[derive(Debug, Default, Deserialize)]
pub struct WindowParams {
    pub days: Option<u32>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl WindowParams {
    /// `days` alone, or `start` with an optional `end` (defaulting to
    /// today). Mixing both forms is rejected.
    pub fn window(&self, today: NaiveDate) -> Result<DateWindow, Error> {
        match (self.days, self.start, self.end) {
            (Some(_), Some(_), _) | (Some(_), _, Some(_)) => Err(Error::Validation(
                "use either days or start/end, not both".to_string(),
            )),
            (None, None, Some(_)) => Err(Error::Validation("end requires start".to_string())),
            (None, Some(start), end) => DateWindow::between(today, start, end.unwrap_or(today)),
            (days, None, None) => DateWindow::trailing(today, days.unwrap_or(DEFAULT_DAYS)),
        }
    }
}

fn window_from(
    params: Result<Query<WindowParams>, QueryRejection>,
    today: NaiveDate,
) -> Result<DateWindow, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    Ok(params.window(today)?)
}

pub async fn get_daily_metrics(
    State(collector): State<AppState>,
    params: Result<Query<WindowParams>, QueryRejection>,
) -> Result<Json<Vec<DailyMetric>>, ApiError> {
    let window = window_from(params, collector.today())?;
    let collected = collector.collect_with_prices(window).await?;
    Ok(Json(collected.metrics))
}

pub async fn get_holders_in_profit(
    State(collector): State<AppState>,
    params: Result<Query<WindowParams>, QueryRejection>,
) -> Result<Json<Vec<ProfitPoint>>, ApiError> {
    let window = window_from(params, collector.today())?;
    let series = collector.holders_in_profit(window).await?;
    Ok(Json(series))
}

pub async fn get_active_addresses(
    State(collector): State<AppState>,
    params: Result<Query<WindowParams>, QueryRejection>,
) -> Result<Json<Vec<ActivityPoint>>, ApiError> {
    let window = window_from(params, collector.today())?;
    let series = collector.active_addresses(window).await?;
    Ok(Json(series))
}

pub async fn health() -> &'static str {
    "ok"
}
