//! Scan configuration.
//!
//! # Example
//!
//! ```rust
//! use feescan_core::ScanConfigBuilder;
//!
//! let config = ScanConfigBuilder::new()
//!     .endpoint("https://hive.example.com/graphql")
//!     .start_height(7_375_100)
//!     .end_height(7_375_200)
//!     .batch_size(25)
//!     .window_size(40)
//!     .build()
//!     .unwrap();
//! assert_eq!(config.window_count(), 4);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::Height;

pub const DEFAULT_ENDPOINT: &str = "https://hive-terra.everstake.one/graphql";
pub const DEFAULT_START_HEIGHT: Height = 7_375_100;
pub const DEFAULT_BATCH_SIZE: u64 = 25;
pub const DEFAULT_WINDOW_SIZE: u64 = 40;
/// Events with at least this many attributes are treated as spam.
pub const DEFAULT_SPAM_THRESHOLD: usize = 1800;

/// Parameters of one bounded scan over `[start_height, end_height)`.
///
/// `batch_size` is the stride between successive windows; `window_size` is
/// how many heights past the window start each batch request covers. They are
/// independent: a span wider than the stride re-reads heights, a narrower one
/// leaves gaps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanConfig {
    /// Hive GraphQL endpoint.
    pub endpoint: String,
    /// First height scanned (inclusive).
    pub start_height: Height,
    /// Windows start strictly below this height.
    pub end_height: Height,
    /// Stride between window starts.
    pub batch_size: u64,
    /// Heights requested per window beyond its start (`start..=start + window_size`).
    pub window_size: u64,
    /// Events with this many attributes or more are skipped.
    #[serde(default = "default_spam_threshold")]
    pub spam_threshold: usize,
}

fn default_spam_threshold() -> usize {
    DEFAULT_SPAM_THRESHOLD
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.into(),
            start_height: DEFAULT_START_HEIGHT,
            end_height: DEFAULT_START_HEIGHT + 100,
            batch_size: DEFAULT_BATCH_SIZE,
            window_size: DEFAULT_WINDOW_SIZE,
            spam_threshold: DEFAULT_SPAM_THRESHOLD,
        }
    }
}

/// Reject a height range, stride or window span that cannot describe a scan.
pub fn validate_range(
    start: Height,
    end: Height,
    batch_size: u64,
    window_size: u64,
) -> Result<(), ConfigError> {
    if end < start {
        return Err(ConfigError::InvalidRange { start, end });
    }
    if batch_size == 0 {
        return Err(ConfigError::ZeroBatchSize);
    }
    if window_size == 0 {
        return Err(ConfigError::ZeroWindowSize);
    }
    Ok(())
}

impl ScanConfig {
    /// Reject configurations that cannot describe a scan.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoint.trim().is_empty() {
            return Err(ConfigError::MissingEndpoint);
        }
        validate_range(
            self.start_height,
            self.end_height,
            self.batch_size,
            self.window_size,
        )
    }

    /// Number of windows the scan will request.
    pub fn window_count(&self) -> u64 {
        if self.batch_size == 0 || self.end_height <= self.start_height {
            return 0;
        }
        (self.end_height - self.start_height).div_ceil(self.batch_size)
    }
}

/// Fluent builder for [`ScanConfig`].
#[derive(Debug, Default)]
pub struct ScanConfigBuilder {
    config: ScanConfig,
}

impl ScanConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: ScanConfig::default(),
        }
    }

    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.config.endpoint = url.into();
        self
    }

    pub fn start_height(mut self, height: Height) -> Self {
        self.config.start_height = height;
        self
    }

    pub fn end_height(mut self, height: Height) -> Self {
        self.config.end_height = height;
        self
    }

    /// Set the stride between window starts.
    pub fn batch_size(mut self, size: u64) -> Self {
        self.config.batch_size = size;
        self
    }

    /// Set the number of heights each window spans past its start.
    pub fn window_size(mut self, size: u64) -> Self {
        self.config.window_size = size;
        self
    }

    pub fn spam_threshold(mut self, attributes: usize) -> Self {
        self.config.spam_threshold = attributes;
        self
    }

    /// Validate and return the configuration.
    pub fn build(self) -> Result<ScanConfig, ConfigError> {
        self.config.validate()?;
        Ok(self.config)
    }
}
