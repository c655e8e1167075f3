//! The scan loop.
//!
//! Windows are fetched and processed strictly one after another, so logs and
//! the insertion order of the result set follow height order:
//!
//! window → height → transaction → log → event
//!
//! Oversized events are skipped before matching. A failed window or a
//! malformed event is logged, counted, and skipped; the scan always runs to
//! the end of its range.

use futures::StreamExt;

use feescan_core::config::{validate_range, ScanConfig, DEFAULT_SPAM_THRESHOLD};
use feescan_core::error::ConfigError;
use feescan_core::matcher::LogMatcher;
use feescan_core::rule::Rule;
use feescan_core::transport::QueryTransport;
use feescan_core::types::{Event, Height, Transaction};
use feescan_hive::fetcher::{BatchFetcher, BlockWindow};

use crate::maker::{xastro_fee_rule, FeeFields};
use crate::report::{FailedWindow, ScanReport};

/// Scans a height range for fees matching a rule.
pub struct FeeScanner<T> {
    fetcher: BatchFetcher<T>,
    matcher: LogMatcher,
    fields: FeeFields,
    spam_threshold: usize,
}

impl<T: QueryTransport> FeeScanner<T> {
    /// Scanner for xAstro fees sent to the maker.
    pub fn new(transport: T) -> Self {
        Self::with_rule(transport, xastro_fee_rule(), FeeFields::default())
    }

    /// Scanner for a custom rule; `fields` locates token and amount in a match.
    pub fn with_rule(transport: T, rule: Rule, fields: FeeFields) -> Self {
        Self {
            fetcher: BatchFetcher::new(transport),
            matcher: LogMatcher::new(rule),
            fields,
            spam_threshold: DEFAULT_SPAM_THRESHOLD,
        }
    }

    /// Events with at least `attributes` attributes are skipped.
    pub fn spam_threshold(mut self, attributes: usize) -> Self {
        self.spam_threshold = attributes;
        self
    }

    pub fn fetcher(&self) -> &BatchFetcher<T> {
        &self.fetcher
    }

    /// Validate `config` and scan its range with its spam threshold.
    pub async fn scan_config(&self, config: &ScanConfig) -> Result<ScanReport, ConfigError> {
        config.validate()?;
        Ok(self
            .run(
                config.start_height,
                config.end_height,
                config.batch_size,
                config.window_size,
                config.spam_threshold,
            )
            .await)
    }

    /// Scan windows starting in `[start, end)` every `batch_size` heights,
    /// each spanning `window_size` heights past its start.
    ///
    /// An inverted range or a zero stride/span is rejected before any request.
    pub async fn scan(
        &self,
        start: Height,
        end: Height,
        batch_size: u64,
        window_size: u64,
    ) -> Result<ScanReport, ConfigError> {
        validate_range(start, end, batch_size, window_size)?;
        Ok(self
            .run(start, end, batch_size, window_size, self.spam_threshold)
            .await)
    }

    async fn run(
        &self,
        start: Height,
        end: Height,
        batch_size: u64,
        window_size: u64,
        spam_threshold: usize,
    ) -> ScanReport {
        let mut report = ScanReport::default();

        tracing::info!(
            start,
            end,
            batch_size,
            window_size,
            spam_threshold,
            url = %self.fetcher.transport().url(),
            "Starting fee scan"
        );

        let windows = self
            .fetcher
            .fetch_windowed(start, end, batch_size, window_size);
        futures::pin_mut!(windows);

        while let Some(window) = windows.next().await {
            tracing::info!(
                start = window.start,
                end = window.end,
                "Getting txs for blocks"
            );
            match window.outcome {
                Ok(blocks) => {
                    report.windows_ok += 1;
                    self.scan_window(&blocks, spam_threshold, &mut report);
                }
                Err(e) => {
                    tracing::warn!(
                        start = window.start,
                        end = window.end,
                        error = %e,
                        "window fetch failed, skipping"
                    );
                    report.failed_windows.push(FailedWindow {
                        start: window.start,
                        end: window.end,
                        reason: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            fees = report.fees.len(),
            windows_ok = report.windows_ok,
            windows_failed = report.failed_windows.len(),
            txs = report.transactions_scanned,
            spam_skipped = report.events_skipped_spam,
            transform_errors = report.transform_errors,
            "Fee scan complete"
        );
        report
    }

    fn scan_window(&self, window: &BlockWindow, spam_threshold: usize, report: &mut ScanReport) {
        for (height, txs) in &window.blocks {
            for tx in txs {
                report.transactions_scanned += 1;
                for event in tx.events() {
                    self.scan_event(*height, tx, event, spam_threshold, report);
                }
            }
        }
    }

    fn scan_event(
        &self,
        height: Height,
        tx: &Transaction,
        event: &Event,
        spam_threshold: usize,
        report: &mut ScanReport,
    ) {
        if event.attribute_count() >= spam_threshold {
            report.events_skipped_spam += 1;
            tracing::debug!(
                height,
                txhash = %tx.txhash,
                attributes = event.attribute_count(),
                "skipping oversized event"
            );
            return;
        }
        report.events_scanned += 1;

        let fields = self.fields;
        match self
            .matcher
            .find_with(event, |_, matched| fields.extract(matched))
        {
            Ok(found) => {
                for fee in found.into_iter().filter_map(|m| m.transformed) {
                    tracing::debug!(height, txhash = %tx.txhash, token = %fee.token, amount = %fee.amount, "fee found");
                    report.fees.insert(fee);
                }
            }
            Err(e) => {
                report.transform_errors += 1;
                tracing::warn!(
                    height,
                    txhash = %tx.txhash,
                    error = %e,
                    "error extracting fee, skipping event"
                );
            }
        }
    }
}
