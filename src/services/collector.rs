use std::future::Future;
use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use solana_client::nonblocking::rpc_client::RpcClient;
use tokio::time::{timeout, Duration};

use crate::config::Config;
use crate::error::Error;
use crate::services::aggregate::{aggregate, daily_returns, resolve_prices, DailyInputs};
use crate::services::chain::{self, RpcLimiter};
use crate::services::dates::DateWindow;
use crate::services::simulate::{
    simulate_active_addresses, simulate_holder_history, simulate_profit, ProfitModel,
};
use crate::services::{coingecko, dexscreener, helius, http, rugcheck};
use crate::types::models::{
    ActivityPoint, ChainSnapshot, DailyMetric, MarketHistory, ProfitPoint, RealtimeSnapshot,
};

/// Everything fetched for one request. `None` means the source was
/// unavailable.
#[derive(Debug, Clone, Default)]
pub struct Sources {
    pub history: Option<MarketHistory>,
    pub realtime: Option<RealtimeSnapshot>,
    pub holder_count: Option<u64>,
    pub chain: Option<ChainSnapshot>,
    pub profit_anchor: Option<f64>,
}

impl Sources {
    pub fn is_empty(&self) -> bool {
        self.history.as_ref().map_or(true, MarketHistory::is_empty)
            && self.realtime.is_none()
            && self.holder_count.is_none()
            && self.chain.is_none()
            && self.profit_anchor.is_none()
    }

    pub fn available(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.history.is_some() {
            names.push(coingecko::SERVICE);
        }
        if self.realtime.is_some() {
            names.push(dexscreener::SERVICE);
        }
        if self.holder_count.is_some() {
            names.push(helius::SERVICE);
        }
        if self.chain.is_some() {
            names.push(chain::SERVICE);
        }
        if self.profit_anchor.is_some() {
            names.push(rugcheck::SERVICE);
        }
        names
    }
}

/// Result of a full pipeline run.
#[derive(Debug, Clone)]
pub struct Collected {
    pub sources: Sources,
    pub metrics: Vec<DailyMetric>,
    pub profit: Vec<ProfitPoint>,
}

/// Runs the fetch, simulate and aggregate steps for a date window.
pub struct Collector {
    config: Arc<Config>,
    http: reqwest::Client,
    rpc: Arc<RpcClient>,
    rate_limiter: Arc<RpcLimiter>,
}

impl Collector {
    pub fn new(config: Arc<Config>) -> Result<Collector, Error> {
        let http = http::build_client(&config)?;
        let rpc = chain::build_rpc_client(&config);
        let rate_limiter = chain::build_limiter(&config);
        Ok(Collector {
            config,
            http,
            rpc,
            rate_limiter,
        })
    }

    pub fn rpc(&self) -> &Arc<RpcClient> {
        &self.rpc
    }

    pub fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }

    fn rng(&self) -> StdRng {
        match self.config.simulation_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Fetches every source concurrently. Each one is bounded by its whole
    /// retry budget and degrades to `None` on any failure.
    pub async fn gather(&self, window: &DateWindow) -> Sources {
        let limit = http::source_deadline(&self.config);
        let (history, realtime, holder_count, chain, profit_anchor) = tokio::join!(
            unavailable_on_error(
                coingecko::SERVICE,
                limit,
                coingecko::fetch_market_history(&self.http, &self.config, window.lookback_days()),
            ),
            unavailable_on_error(
                dexscreener::SERVICE,
                limit,
                dexscreener::fetch_realtime_snapshot(&self.http, &self.config, window.today),
            ),
            unavailable_on_error(
                helius::SERVICE,
                limit,
                helius::fetch_holder_count(&self.http, &self.config),
            ),
            unavailable_on_error(
                chain::SERVICE,
                limit,
                chain::fetch_chain_snapshot(
                    &self.rpc,
                    &self.rate_limiter,
                    &self.config.token_address,
                    window.today,
                ),
            ),
            unavailable_on_error(
                rugcheck::SERVICE,
                limit,
                rugcheck::fetch_profit_percent(&self.http, &self.config),
            ),
        );

        let sources = Sources {
            history,
            realtime,
            holder_count,
            chain,
            profit_anchor,
        };
        tracing::info!("Sources available: {:?}", sources.available());
        sources
    }

    /// Full per-day series for the window. Fails only when no source at all
    /// returned data.
    pub async fn collect(&self, window: DateWindow) -> Result<Collected, Error> {
        let sources = self.gather(&window).await;
        if sources.is_empty() {
            return Err(Error::NoData);
        }
        let mut rng = self.rng();
        Ok(build(window, sources, &mut rng))
    }

    /// Like [`Collector::collect`], but the price history is mandatory.
    pub async fn collect_with_prices(&self, window: DateWindow) -> Result<Collected, Error> {
        let collected = self.collect(window).await?;
        if collected.sources.history.is_none() {
            return Err(Error::SourceUnavailable(coingecko::SERVICE));
        }
        Ok(collected)
    }

    /// Simulated share of holders in profit, anchored on RugCheck when it
    /// answers. Needs only the price history; wallet counts follow the
    /// Helius holder count when it is available.
    pub async fn holders_in_profit(&self, window: DateWindow) -> Result<Vec<ProfitPoint>, Error> {
        let limit = http::source_deadline(&self.config);
        let (history, realtime, holder_count, profit_anchor) = tokio::join!(
            required(
                coingecko::SERVICE,
                limit,
                coingecko::fetch_market_history(&self.http, &self.config, window.lookback_days()),
            ),
            unavailable_on_error(
                dexscreener::SERVICE,
                limit,
                dexscreener::fetch_realtime_snapshot(&self.http, &self.config, window.today),
            ),
            unavailable_on_error(
                helius::SERVICE,
                limit,
                helius::fetch_holder_count(&self.http, &self.config),
            ),
            unavailable_on_error(
                rugcheck::SERVICE,
                limit,
                rugcheck::fetch_profit_percent(&self.http, &self.config),
            ),
        );
        let sources = Sources {
            history: Some(history?),
            realtime,
            holder_count,
            profit_anchor,
            ..Sources::default()
        };
        let mut rng = self.rng();
        Ok(build(window, sources, &mut rng).profit)
    }

    /// Simulated active addresses for each date with a price.
    pub async fn active_addresses(&self, window: DateWindow) -> Result<Vec<ActivityPoint>, Error> {
        let history = required(
            coingecko::SERVICE,
            http::source_deadline(&self.config),
            coingecko::fetch_market_history(&self.http, &self.config, window.lookback_days()),
        )
        .await?;

        let dates: Vec<NaiveDate> = window
            .dates()
            .into_iter()
            .filter(|date| history.prices.contains_key(date))
            .collect();
        let mut rng = self.rng();
        Ok(simulate_active_addresses(&dates, &mut rng)
            .into_iter()
            .map(|(date, active_addresses)| ActivityPoint {
                date,
                active_addresses,
            })
            .collect())
    }
}

/// Simulates and joins already-fetched sources.
pub fn build<R: rand::Rng + ?Sized>(window: DateWindow, sources: Sources, rng: &mut R) -> Collected {
    let dates = window.dates();
    let history = sources.history.clone().unwrap_or_default();

    let prices = resolve_prices(&dates, &history, sources.realtime.as_ref());
    let returns = daily_returns(&dates, &prices);

    let holders = match sources.holder_count {
        Some(count) => simulate_holder_history(&dates, count, window.today, rng),
        None => Default::default(),
    };
    let model = ProfitModel::anchored(sources.profit_anchor);
    let profit = simulate_profit(&model, &dates, &prices, &returns, &holders, rng);
    let active_addresses = simulate_active_addresses(&dates, rng);

    let inputs = DailyInputs {
        history,
        realtime: sources.realtime.clone(),
        chain: sources.chain.clone(),
        holders,
        profit,
        active_addresses,
    };
    let metrics = aggregate(&dates, &inputs);
    tracing::info!("Combined {} daily records", metrics.len());

    Collected {
        sources,
        metrics,
        profit: inputs.profit.into_values().collect(),
    }
}

/// Runs a fetch under `limit`; any error or timeout is logged and becomes
/// `None`.
pub async fn unavailable_on_error<T, F>(service: &'static str, limit: Duration, fetch: F) -> Option<T>
where
    F: Future<Output = Result<T, Error>>,
{
    match bounded(service, limit, fetch).await {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!("{} unavailable: {}", service, e);
            None
        }
    }
}

/// Like [`unavailable_on_error`], but a missing result fails the request.
async fn required<T, F>(service: &'static str, limit: Duration, fetch: F) -> Result<T, Error>
where
    F: Future<Output = Result<T, Error>>,
{
    bounded(service, limit, fetch).await.map_err(|e| {
        tracing::warn!("{} unavailable: {}", service, e);
        Error::SourceUnavailable(service)
    })
}

async fn bounded<T, F>(service: &'static str, limit: Duration, fetch: F) -> Result<T, Error>
where
    F: Future<Output = Result<T, Error>>,
{
    match timeout(limit, fetch).await {
        Ok(result) => result,
        Err(_) => Err(Error::Timeout(service, limit)),
    }
}
