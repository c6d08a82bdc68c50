use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::types::models::{
    ChainSnapshot, DailyMetric, HolderPoint, MarketHistory, ProfitPoint, RealtimeSnapshot,
    SimulatedMetrics, TokenMetadata,
};

/// Every per-day dataset the join reads, each keyed by date.
#[derive(Debug, Clone, Default)]
pub struct DailyInputs {
    pub history: MarketHistory,
    pub realtime: Option<RealtimeSnapshot>,
    pub chain: Option<ChainSnapshot>,
    pub holders: BTreeMap<NaiveDate, HolderPoint>,
    pub profit: BTreeMap<NaiveDate, ProfitPoint>,
    pub active_addresses: BTreeMap<NaiveDate, u64>,
}

impl DailyInputs {
    /// Name and symbol from the trading pair, decimals from the mint.
    pub fn metadata(&self) -> TokenMetadata {
        let (name, symbol) = match &self.realtime {
            Some(snapshot) => (snapshot.name.clone(), snapshot.symbol.clone()),
            None => (None, None),
        };
        TokenMetadata {
            name,
            symbol,
            decimals: self.chain.as_ref().map(|chain| chain.decimals),
        }
    }
}

/// The dated value when the series has one, else the snapshot's value.
fn dated_or_snapshot(
    series: &BTreeMap<NaiveDate, f64>,
    date: &NaiveDate,
    snapshot: Option<f64>,
) -> Option<f64> {
    series.get(date).copied().or(snapshot)
}

/// Price per date after applying the real-time fallback. The snapshot price
/// only stands in on its own observation date, so past returns are never
/// computed against today's quote.
pub fn resolve_prices(
    dates: &[NaiveDate],
    history: &MarketHistory,
    realtime: Option<&RealtimeSnapshot>,
) -> BTreeMap<NaiveDate, f64> {
    dates
        .iter()
        .filter_map(|date| {
            let snapshot = realtime
                .filter(|rt| rt.observed_on == *date)
                .and_then(|rt| rt.price_usd);
            dated_or_snapshot(&history.prices, date, snapshot).map(|price| (*date, price))
        })
        .collect()
}

/// Percent change from the previous date in `dates`. The first date has no
/// return, nor does a date whose own or previous price is missing, or whose
/// previous price is zero.
pub fn daily_returns(dates: &[NaiveDate], prices: &BTreeMap<NaiveDate, f64>) -> BTreeMap<NaiveDate, f64> {
    dates
        .windows(2)
        .filter_map(|pair| {
            let previous = prices.get(&pair[0])?;
            let current = prices.get(&pair[1])?;
            if *previous == 0.0 {
                return None;
            }
            Some((pair[1], (current - previous) / previous * 100.0))
        })
        .collect()
}

/// Joins all datasets into exactly one record per date, in the order of
/// `dates`.
pub fn aggregate(dates: &[NaiveDate], inputs: &DailyInputs) -> Vec<DailyMetric> {
    let realtime = inputs.realtime.as_ref();
    let prices = resolve_prices(dates, &inputs.history, realtime);
    let returns = daily_returns(dates, &prices);
    let metadata = inputs.metadata();

    let mut metrics = Vec::with_capacity(dates.len());
    let mut previous_holders: Option<u64> = None;

    for (idx, date) in dates.iter().enumerate() {
        let holder = inputs.holders.get(date);
        let holder_count = holder.map(|h| h.count);

        // The previous calendar day must also be the previous requested day.
        let holder_count_delta = match (holder_count, previous_holders) {
            (Some(current), Some(previous)) if idx > 0 => Some(current as i64 - previous as i64),
            _ => None,
        };
        previous_holders = holder_count;

        let profit = inputs.profit.get(date);

        metrics.push(DailyMetric {
            date: *date,
            price_usd: prices.get(date).copied(),
            daily_return_percent: returns.get(date).copied(),
            volume_24h: dated_or_snapshot(
                &inputs.history.volumes,
                date,
                realtime.and_then(|rt| rt.volume_24h),
            ),
            liquidity_usd: realtime.and_then(|rt| rt.liquidity_usd),
            market_cap: dated_or_snapshot(
                &inputs.history.market_caps,
                date,
                realtime.and_then(|rt| rt.market_cap),
            ),
            holder_count,
            holder_count_origin: holder.map(|h| h.origin),
            holder_count_delta,
            top10_hold_percent: inputs
                .chain
                .as_ref()
                .filter(|chain| chain.observed_on == *date)
                .and_then(|chain| chain.top10_hold_percent),
            token: metadata.clone(),
            simulated: SimulatedMetrics {
                wallets_in_profit: profit.and_then(|p| p.wallets_in_profit),
                percent_in_profit: profit.map(|p| p.percent_in_profit),
                active_addresses: inputs.active_addresses.get(date).copied(),
            },
        });
    }

    metrics
}
