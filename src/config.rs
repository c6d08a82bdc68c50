use std::env;
use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use nonzero_ext::nonzero;
use solana_sdk::pubkey::Pubkey;

use crate::error::Error;

pub const DEFAULT_TOKEN_ADDRESS: &str = "3bgvTBLGuJLVQSENZm4pzFooW1JK1C7eCqZNHB8ipump";
pub const DEFAULT_COINGECKO_ID: &str = "solana";
pub const DEFAULT_COINGECKO_API_URL: &str = "https://api.coingecko.com/api/v3";
pub const DEFAULT_DEXSCREENER_API_URL: &str = "https://api.dexscreener.com";
pub const DEFAULT_RUGCHECK_API_URL: &str = "https://api.rugcheck.xyz";
pub const DEFAULT_CSV_PATH: &str = "solana_token_data.csv";

/// Runtime settings shared by every fetcher and both binaries.
#[derive(Debug, Clone)]
pub struct Config {
    pub helius_api_key: String,
    pub token_address: Pubkey,
    pub coingecko_id: String,
    pub rpc_url: String,
    pub coingecko_api_url: String,
    pub dexscreener_api_url: String,
    pub rugcheck_api_url: String,
    pub request_timeout: Duration,
    pub max_retries: u32,
    pub rpc_requests_per_second: NonZeroU32,
    pub listen_addr: SocketAddr,
    pub history_days: u32,
    pub csv_path: PathBuf,
    pub simulation_seed: Option<u64>,
}

impl Config {
    pub fn from_env() -> Result<Config, Error> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key/value source. Empty values
    /// count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Config, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let helius_api_key = get("HELIUS_API_KEY")
            .filter(|key| key != "YOUR_HELIUS_API_KEY_HERE")
            .ok_or_else(|| {
                Error::Configuration("HELIUS_API_KEY must be set to a valid key".to_string())
            })?;

        let token_address = get("TOKEN_ADDRESS").unwrap_or_else(|| DEFAULT_TOKEN_ADDRESS.to_string());
        let token_address = Pubkey::from_str(&token_address).map_err(|e| {
            Error::Configuration(format!("TOKEN_ADDRESS {} is not a valid address: {}", token_address, e))
        })?;

        let rpc_url = get("SOLANA_RPC_URL")
            .unwrap_or_else(|| format!("https://mainnet.helius-rpc.com/?api-key={}", helius_api_key));

        let request_timeout_secs: u64 = parse_or(&get, "REQUEST_TIMEOUT_SECS", 15)?;
        if request_timeout_secs == 0 {
            return Err(Error::Configuration("REQUEST_TIMEOUT_SECS must be positive".to_string()));
        }

        let rpc_requests_per_second = match get("RPC_REQUESTS_PER_SECOND") {
            Some(raw) => raw
                .parse::<NonZeroU32>()
                .map_err(|e| Error::Configuration(format!("RPC_REQUESTS_PER_SECOND {}: {}", raw, e)))?,
            None => nonzero!(5u32),
        };

        let history_days: u32 = parse_or(&get, "HISTORY_DAYS", 7)?;
        if history_days == 0 {
            return Err(Error::Configuration("HISTORY_DAYS must be positive".to_string()));
        }

        let simulation_seed = match get("SIMULATION_SEED") {
            Some(raw) => Some(
                raw.parse::<u64>()
                    .map_err(|e| Error::Configuration(format!("SIMULATION_SEED {}: {}", raw, e)))?,
            ),
            None => None,
        };

        Ok(Config {
            helius_api_key,
            token_address,
            coingecko_id: get("COINGECKO_ID").unwrap_or_else(|| DEFAULT_COINGECKO_ID.to_string()),
            rpc_url,
            coingecko_api_url: trim_base(get("COINGECKO_API_URL"), DEFAULT_COINGECKO_API_URL),
            dexscreener_api_url: trim_base(get("DEXSCREENER_API_URL"), DEFAULT_DEXSCREENER_API_URL),
            rugcheck_api_url: trim_base(get("RUGCHECK_API_URL"), DEFAULT_RUGCHECK_API_URL),
            request_timeout: Duration::from_secs(request_timeout_secs),
            max_retries: parse_or(&get, "MAX_RETRIES", 2)?,
            rpc_requests_per_second,
            listen_addr: parse_or(&get, "LISTEN_ADDR", SocketAddr::from(([0, 0, 0, 0], 8000)))?,
            history_days,
            csv_path: get("CSV_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_CSV_PATH)),
            simulation_seed,
        })
    }

    pub fn market_chart_url(&self, days: u32) -> String {
        format!(
            "{}/coins/{}/market_chart?vs_currency=usd&days={}&interval=daily",
            self.coingecko_api_url, self.coingecko_id, days
        )
    }

    pub fn token_pairs_url(&self) -> String {
        format!("{}/latest/dex/tokens/{}", self.dexscreener_api_url, self.token_address)
    }

    pub fn rugcheck_token_url(&self) -> String {
        format!("{}/api/token/{}", self.rugcheck_api_url, self.token_address)
    }
}

fn parse_or<T, G>(get: &G, key: &str, default: T) -> Result<T, Error>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| Error::Configuration(format!("{} {}: {}", key, raw, e))),
        None => Ok(default),
    }
}

fn trim_base(value: Option<String>, default: &str) -> String {
    value
        .unwrap_or_else(|| default.to_string())
        .trim_end_matches('/')
        .to_string()
}
