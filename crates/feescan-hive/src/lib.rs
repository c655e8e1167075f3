//! feescan-hive: talking to a Hive GraphQL endpoint.
//!
//! - [`HiveClient`]: reqwest transport with keep-alive and retry
//! - [`BatchFetcher`]: per-height transaction lists, fetched in windows
//! - [`holdings`]: CW20 balances of a wallet, batched per token group

pub mod client;
pub mod error;
pub mod fetcher;
pub mod holdings;
pub mod query;
pub mod retry;

pub use client::{HiveClient, HiveClientConfig};
pub use error::HiveError;
pub use fetcher::{window_starts, BatchFetcher, BlockWindow, WindowResult};
pub use holdings::token_holdings;
pub use retry::{RetryConfig, RetryPolicy};
