//! feescan-core: event model, rule matcher and transport abstractions.
//!
//! # Overview
//!
//! ```text
//! QueryTransport ──▶ Transaction ─▶ Log ─▶ Event ─▶ LogMatcher(Rule) ─▶ FeeSet
//! ```
//!
//! The core crate defines:
//!
//! - [`Transaction`] / [`Log`] / [`Event`] / [`Attribute`]: the Hive tx model
//! - [`Rule`] / [`Constraint`]: ordered attribute patterns
//! - [`LogMatcher`]: finds every non-overlapping run of a rule in an event
//! - [`FeeRecord`] / [`FeeSet`]: de-duplicated output
//! - [`QueryTransport`]: the async trait every GraphQL transport implements
//! - [`ScanConfig`]: validated scan parameters

pub mod config;
pub mod error;
pub mod fee;
pub mod matcher;
pub mod request;
pub mod rule;
pub mod transport;
pub mod types;

pub use config::{validate_range, ScanConfig, ScanConfigBuilder};
pub use error::{ConfigError, FeeError, TransportError};
pub use fee::{FeeRecord, FeeSet};
pub use matcher::{LogMatcher, MatchResult};
pub use request::{GraphQlError, GraphQlRequest, GraphQlResponse};
pub use rule::{Constraint, Rule};
pub use transport::QueryTransport;
pub use types::{Attribute, Event, Height, Log, Transaction};
