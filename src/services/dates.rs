use chrono::{Duration, NaiveDate};

use crate::error::Error;

/// Longest window a single request may cover.
pub const MAX_DAYS: u32 = 365;

/// Every calendar day from `start` to `end`, both included. A reversed
/// range is empty.
pub fn date_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start.iter_days().take_while(|day| *day <= end).collect()
}

/// The `count` consecutive days ending at `today`.
pub fn trailing_days(today: NaiveDate, count: u32) -> Vec<NaiveDate> {
    if count == 0 {
        return Vec::new();
    }
    let start = today - Duration::days(i64::from(count) - 1);
    date_range(start, today)
}

/// A validated, non-empty span of days that never extends past today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub today: NaiveDate,
}

impl DateWindow {
    pub fn trailing(today: NaiveDate, days: u32) -> Result<DateWindow, Error> {
        if days == 0 || days > MAX_DAYS {
            return Err(Error::Validation(format!(
                "days must be between 1 and {}, got {}",
                MAX_DAYS, days
            )));
        }
        Ok(DateWindow {
            start: today - Duration::days(i64::from(days) - 1),
            end: today,
            today,
        })
    }

    pub fn between(today: NaiveDate, start: NaiveDate, end: NaiveDate) -> Result<DateWindow, Error> {
        if start > end {
            return Err(Error::Validation(format!(
                "start {} is after end {}",
                start, end
            )));
        }
        if end > today {
            return Err(Error::Validation(format!("end {} is in the future", end)));
        }
        let window = DateWindow { start, end, today };
        if window.lookback_days() > MAX_DAYS {
            return Err(Error::Validation(format!(
                "start {} is more than {} days ago",
                start, MAX_DAYS
            )));
        }
        Ok(window)
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        date_range(self.start, self.end)
    }

    /// Number of days of history needed to cover the window, counting today.
    pub fn lookback_days(&self) -> u32 {
        let span = (self.today - self.start).num_days() + 1;
        u32::try_from(span).unwrap_or(u32::MAX)
    }
}
