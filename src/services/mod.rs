pub mod aggregate;
pub mod chain;
pub mod coingecko;
pub mod collector;
pub mod dates;
pub mod dexscreener;
pub mod helius;
pub mod http;
pub mod rugcheck;
pub mod simulate;
