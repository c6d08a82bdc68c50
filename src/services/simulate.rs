//! Placeholder models for metrics no upstream provides per day.
//!
//! None of these estimate anything. They shape random noise around a real
//! anchor (the current holder count, RugCheck's current profit share, the
//! measured daily returns) so the series have a plausible form, and they
//! have no predictive value. Every result is reported as simulated.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rand::Rng;

use crate::types::models::{HolderPoint, Origin, ProfitPoint};

/// Bounded random walk for the share of holders in profit.
///
/// For each date with a price, in order:
/// - if the previous date has a value and this date has a daily return `r`
///   (in percent), the value is `prev + r * return_weight`;
/// - otherwise it is `base_percent` plus uniform noise in
///   `[-jitter, +jitter]`.
///
/// The result is clamped to `[min_percent, max_percent]` and rounded to one
/// decimal; the rounded value feeds the next day.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfitModel {
    pub base_percent: f64,
    pub jitter: f64,
    pub return_weight: f64,
    pub min_percent: f64,
    pub max_percent: f64,
}

impl Default for ProfitModel {
    fn default() -> Self {
        ProfitModel {
            base_percent: 53.4,
            jitter: 2.5,
            return_weight: 0.5,
            min_percent: 5.0,
            max_percent: 95.0,
        }
    }
}

impl ProfitModel {
    /// Default model whose starting level is the measured current share,
    /// when one is known.
    pub fn anchored(current_percent: Option<f64>) -> Self {
        let mut model = ProfitModel::default();
        if let Some(percent) = current_percent {
            model.base_percent = percent;
        }
        model
    }

    fn next<R: Rng + ?Sized>(&self, previous: Option<f64>, daily_return: Option<f64>, rng: &mut R) -> f64 {
        let raw = match (previous, daily_return) {
            (Some(prev), Some(ret)) => prev + ret * self.return_weight,
            _ => self.base_percent + (rng.gen::<f64>() * 2.0 - 1.0) * self.jitter.abs(),
        };
        round_one_decimal(raw.clamp(self.min_percent, self.max_percent))
    }
}

pub fn simulate_profit<R: Rng + ?Sized>(
    model: &ProfitModel,
    dates: &[NaiveDate],
    prices: &BTreeMap<NaiveDate, f64>,
    returns: &BTreeMap<NaiveDate, f64>,
    holders: &BTreeMap<NaiveDate, HolderPoint>,
    rng: &mut R,
) -> BTreeMap<NaiveDate, ProfitPoint> {
    let mut series = BTreeMap::new();
    let mut previous: Option<f64> = None;

    for date in dates {
        let Some(price) = prices.get(date) else {
            previous = None;
            continue;
        };
        let percent = model.next(previous, returns.get(date).copied(), rng);
        let wallets_in_profit = holders
            .get(date)
            .map(|holder| (holder.count as f64 * percent / 100.0).round() as u64);

        series.insert(
            *date,
            ProfitPoint {
                date: *date,
                price: *price,
                percent_in_profit: percent,
                wallets_in_profit,
            },
        );
        previous = Some(percent);
    }

    series
}

/// Share of the anchor used as the widest simulated shortfall.
const HOLDER_SPREAD: f64 = 0.05;

/// Holder counts that grow toward the measured `anchor` observed on
/// `observed_on`. That date keeps the real count; a date `i` days earlier
/// gets `anchor - floor(u * spread * i / horizon)`, with one `u` uniform in
/// `[0, 1)` drawn for the whole series so counts never fall from one day to
/// the next. Dates after the observation are left out.
pub fn simulate_holder_history<R: Rng + ?Sized>(
    dates: &[NaiveDate],
    anchor: u64,
    observed_on: NaiveDate,
    rng: &mut R,
) -> BTreeMap<NaiveDate, HolderPoint> {
    let Some(first) = dates.first() else {
        return BTreeMap::new();
    };
    let horizon = ((observed_on - *first).num_days() + 1).max(1) as f64;
    let spread = anchor as f64 * HOLDER_SPREAD * rng.gen::<f64>();

    dates
        .iter()
        .filter_map(|date| {
            let days_before = (observed_on - *date).num_days();
            let point = match days_before {
                d if d < 0 => return None,
                0 => HolderPoint {
                    count: anchor,
                    origin: Origin::Measured,
                },
                d => {
                    let shortfall = (spread * d as f64 / horizon).floor() as u64;
                    HolderPoint {
                        count: anchor.saturating_sub(shortfall),
                        origin: Origin::Simulated,
                    }
                }
            };
            Some((*date, point))
        })
        .collect()
}

const ACTIVE_ADDRESS_BASE: u64 = 300_000;
const ACTIVE_ADDRESS_STEP: u64 = 2_000;
const ACTIVE_ADDRESS_NOISE: f64 = 5_000.0;

/// `300000 + 2000 * i + round(u * 5000)` for the i-th date.
pub fn simulate_active_addresses<R: Rng + ?Sized>(
    dates: &[NaiveDate],
    rng: &mut R,
) -> BTreeMap<NaiveDate, u64> {
    dates
        .iter()
        .zip(0u64..)
        .map(|(date, idx)| {
            let noise = (rng.gen::<f64>() * ACTIVE_ADDRESS_NOISE).round() as u64;
            (*date, ACTIVE_ADDRESS_BASE + idx * ACTIVE_ADDRESS_STEP + noise)
        })
        .collect()
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
