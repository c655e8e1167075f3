//! CW20 balances of a wallet across many token contracts.

use indexmap::IndexMap;

use feescan_core::transport::QueryTransport;

use crate::query;

/// Tokens queried per batch request by default.
pub const DEFAULT_HOLDINGS_BATCH: usize = 30;

/// Look up the balance of `wallet` on each of `token_contracts`.
///
/// Tokens are queried in groups of `batch_size`, one batch request per group,
/// and balances are paired back to token addresses by position. If a group's
/// request fails the lookup stops and the balances gathered so far are
/// returned. A single unreadable balance is logged and left out.
pub async fn token_holdings<T: QueryTransport>(
    transport: &T,
    token_contracts: &[String],
    wallet: &str,
    batch_size: usize,
) -> IndexMap<String, u128> {
    let mut holdings = IndexMap::with_capacity(token_contracts.len());

    for group in token_contracts.chunks(batch_size.max(1)) {
        let reqs = group
            .iter()
            .map(|token| query::cw20_balance(token, wallet))
            .collect();

        let responses = match transport.batch_request(reqs).await {
            Ok(responses) => responses,
            Err(e) => {
                tracing::warn!(
                    wallet,
                    tokens = group.len(),
                    fetched = holdings.len(),
                    error = %e,
                    "balance batch failed, returning partial holdings"
                );
                return holdings;
            }
        };

        for (token, resp) in group.iter().zip(responses) {
            let balance = resp
                .into_data()
                .map_err(|errors| {
                    errors
                        .first()
                        .map(|e| e.message.clone())
                        .unwrap_or_default()
                })
                .and_then(query::decode_cw20_balance);
            match balance {
                Ok(amount) => {
                    holdings.insert(token.clone(), amount);
                }
                Err(reason) => {
                    tracing::warn!(token = %token, wallet, %reason, "skipping unreadable balance");
                }
            }
        }
    }

    holdings
}
