use std::sync::Arc;

use chrono::NaiveDate;
use governor::{clock::DefaultClock, state::{InMemoryState, NotKeyed}, Quota, RateLimiter};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::{commitment_config::CommitmentConfig, program_pack::Pack, pubkey::Pubkey};
use spl_token::state::Mint;

use crate::config::Config;
use crate::error::Error;
use crate::types::models::ChainSnapshot;

pub const SERVICE: &str = "solana-rpc";

/// Number of largest accounts summed for the concentration figure.
pub const TOP_HOLDERS: usize = 10;

pub type RpcLimiter = RateLimiter<NotKeyed, InMemoryState, DefaultClock>;

pub fn build_rpc_client(config: &Config) -> Arc<RpcClient> {
    Arc::new(RpcClient::new_with_timeout_and_commitment(
        config.rpc_url.clone(),
        config.request_timeout,
        CommitmentConfig::confirmed(),
    ))
}

pub fn build_limiter(config: &Config) -> Arc<RpcLimiter> {
    Arc::new(RateLimiter::direct(Quota::per_second(config.rpc_requests_per_second)))
}

/// Reads the mint account and the largest token accounts to get the
/// decimals and the share of supply held by the top ten accounts.
pub async fn fetch_chain_snapshot(
    client: &RpcClient,
    rate_limiter: &RpcLimiter,
    mint_pubkey: &Pubkey,
    today: NaiveDate,
) -> Result<ChainSnapshot, Error> {
    let operation_start = std::time::Instant::now();

    rate_limiter.until_ready().await;
    let mint_account = client.get_account(mint_pubkey).await?;
    let mint_data =
        Mint::unpack(&mint_account.data).map_err(|e| Error::MintDecode(e.to_string()))?;

    rate_limiter.until_ready().await;
    let largest = client.get_token_largest_accounts(mint_pubkey).await?;
    let amounts: Vec<u64> = largest
        .iter()
        .filter_map(|balance| balance.amount.amount.parse::<u64>().ok())
        .collect();
    tracing::info!("Found {} largest accounts for {}", amounts.len(), mint_pubkey);

    let top10_hold_percent = top_share_percent(&amounts, mint_data.supply, TOP_HOLDERS);
    if let Some(percent) = top10_hold_percent {
        tracing::info!("Top {} Holders: {:.2}%", TOP_HOLDERS, percent);
    }

    tracing::info!("Chain snapshot took: {:?}", operation_start.elapsed());
    Ok(ChainSnapshot {
        observed_on: today,
        decimals: mint_data.decimals,
        top10_hold_percent,
    })
}

/// Percentage of `supply` held by the `n` largest of `amounts`. Absent for
/// a zero supply or when no accounts were returned.
pub fn top_share_percent(amounts: &[u64], supply: u64, n: usize) -> Option<f64> {
    if supply == 0 || amounts.is_empty() {
        return None;
    }
    let mut sorted = amounts.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));
    let held: u128 = sorted.iter().take(n).map(|amount| u128::from(*amount)).sum();
    Some((held as f64 / supply as f64) * 100.0)
}
