//! Windowed transaction fetcher.
//!
//! A scan over `[start, end)` is cut into windows starting every `batch_size`
//! heights. Each window is fetched with one batch request covering
//! `window_start..=window_start + window_size`. The stride and the span are
//! independent, so windows may overlap or leave gaps.
//!
//! ```text
//! start=100 end=104 batch_size=3 window_size=3
//!
//!   window 1: 100 101 102 103
//!   window 2:             103 104 105 106
//! ```
//!
//! A window succeeds or fails as a whole; a failed window is reported to the
//! caller and the next window is fetched regardless.

use std::collections::BTreeMap;

use futures::stream::{self, Stream, StreamExt};

use feescan_core::error::TransportError;
use feescan_core::transport::QueryTransport;
use feescan_core::types::{Height, Transaction};

use crate::error::HiveError;
use crate::query;

/// The transactions of a contiguous, inclusive range of heights.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockWindow {
    pub start: Height,
    /// Last height of the window (inclusive).
    pub end: Height,
    /// Per-height transactions in ascending height order; empty blocks map to
    /// an empty list.
    pub blocks: BTreeMap<Height, Vec<Transaction>>,
}

impl BlockWindow {
    pub fn transaction_count(&self) -> usize {
        self.blocks.values().map(Vec::len).sum()
    }

    pub fn heights(&self) -> impl Iterator<Item = Height> + '_ {
        self.blocks.keys().copied()
    }
}

/// Outcome of fetching one window.
#[derive(Debug)]
pub struct WindowResult {
    pub start: Height,
    pub end: Height,
    pub outcome: Result<BlockWindow, HiveError>,
}

/// Start heights of the windows covering `[start, end)` with the given stride.
pub fn window_starts(start: Height, end: Height, batch_size: u64) -> Vec<Height> {
    if batch_size == 0 {
        return Vec::new();
    }
    std::iter::successors(Some(start), |h| h.checked_add(batch_size))
        .take_while(|h| *h < end)
        .collect()
}

/// Fetches Hive transactions per height, in batches.
pub struct BatchFetcher<T> {
    transport: T,
}

impl<T: QueryTransport> BatchFetcher<T> {
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetch one block without batching. Failures are logged and yield `None`.
    pub async fn fetch_one(&self, height: Height) -> Option<Vec<Transaction>> {
        let resp = match self.transport.request(query::tx_by_height(height)).await {
            Ok(resp) => resp,
            Err(e) => {
                tracing::warn!(height, error = %e, "block fetch failed");
                return None;
            }
        };
        match decode_block(height, resp.into_data()) {
            Ok(txs) => Some(txs),
            Err(e) => {
                tracing::warn!(height, error = %e, "block response rejected");
                None
            }
        }
    }

    /// Fetch `start..=start + window_size` in a single batch request.
    pub async fn fetch_range(
        &self,
        start: Height,
        window_size: u64,
    ) -> Result<BlockWindow, HiveError> {
        let end = start.saturating_add(window_size);
        let heights: Vec<Height> = (start..=end).collect();
        let reqs = heights.iter().map(|h| query::tx_by_height(*h)).collect();

        let responses = self.transport.batch_request(reqs).await?;
        if responses.len() != heights.len() {
            return Err(TransportError::BatchMismatch {
                sent: heights.len(),
                received: responses.len(),
            }
            .into());
        }

        let mut blocks = BTreeMap::new();
        for (height, resp) in heights.into_iter().zip(responses) {
            blocks.insert(height, decode_block(height, resp.into_data())?);
        }

        let window = BlockWindow { start, end, blocks };
        tracing::debug!(
            start,
            end,
            txs = window.transaction_count(),
            "window fetched"
        );
        Ok(window)
    }

    /// Lazily fetch every window of `[start, end)`, one at a time, in height
    /// order. A failed window is yielded as an error item; the stream moves on.
    pub fn fetch_windowed(
        &self,
        start: Height,
        end: Height,
        batch_size: u64,
        window_size: u64,
    ) -> impl Stream<Item = WindowResult> + '_ {
        if batch_size == 0 {
            tracing::warn!("batch_size is 0, nothing to fetch");
        }
        stream::iter(window_starts(start, end, batch_size)).then(move |window_start| async move {
            let outcome = self.fetch_range(window_start, window_size).await;
            WindowResult {
                start: window_start,
                end: window_start.saturating_add(window_size),
                outcome,
            }
        })
    }
}

fn decode_block(
    height: Height,
    data: Result<serde_json::Value, Vec<feescan_core::GraphQlError>>,
) -> Result<Vec<Transaction>, HiveError> {
    let data = data.map_err(|errors| HiveError::Query {
        height,
        message: errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("; "),
    })?;
    query::decode_tx_by_height(data).map_err(|e| HiveError::Decode {
        height,
        reason: e.to_string(),
    })
}
