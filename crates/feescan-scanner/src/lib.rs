//! feescan-scanner: find CW20 fees paid to the Astroport maker.
//!
//! # Architecture
//!
//! ```text
//! FeeScanner
//!   ├── BatchFetcher  (windows of heights, one batch request each)
//!   ├── LogMatcher    (xAstro maker-fee rule)
//!   └── ScanReport    (FeeSet + failed windows + counters)
//! ```

pub mod maker;
pub mod report;
pub mod scanner;

pub use maker::{fee_from_match, xastro_fee_rule, FeeFields, MAKER_ADDRESS};
pub use report::{FailedWindow, ScanReport};
pub use scanner::FeeScanner;
