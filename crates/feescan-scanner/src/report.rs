//! Scan results.

use serde::Serialize;

use feescan_core::fee::FeeSet;
use feescan_core::types::Height;

/// A window whose fetch failed and whose heights were not scanned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedWindow {
    pub start: Height,
    /// Last requested height (inclusive).
    pub end: Height,
    pub reason: String,
}

/// Everything a scan gathered, including what it could not.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanReport {
    pub fees: FeeSet,
    pub failed_windows: Vec<FailedWindow>,
    pub windows_ok: usize,
    pub transactions_scanned: usize,
    /// Events handed to the matcher.
    pub events_scanned: usize,
    pub events_skipped_spam: usize,
    /// Matched events whose fee could not be extracted.
    pub transform_errors: usize,
}

impl ScanReport {
    /// Returns `true` if every window was fetched.
    pub fn is_complete(&self) -> bool {
        self.failed_windows.is_empty()
    }

    /// Heights that were requested but not scanned, merged across failed windows.
    pub fn missing_heights(&self) -> Vec<Height> {
        let mut heights: Vec<Height> = self
            .failed_windows
            .iter()
            .flat_map(|w| w.start..=w.end)
            .collect();
        heights.sort_unstable();
        heights.dedup();
        heights
    }
}
