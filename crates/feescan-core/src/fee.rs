//! Fee records and the de-duplicating result set.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::error::FeeError;

/// A token amount observed flowing to the fee collector.
///
/// Two records are the same record when both token and amount are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FeeRecord {
    /// CW20 token contract address.
    pub token: String,
    /// Raw amount in the token's smallest unit.
    pub amount: u128,
}

impl FeeRecord {
    pub fn new(token: impl Into<String>, amount: u128) -> Self {
        Self {
            token: token.into(),
            amount,
        }
    }

    /// Build a record from the string-encoded amount of a CW20 event.
    pub fn parse(token: impl Into<String>, amount: &str) -> Result<Self, FeeError> {
        let trimmed = amount.trim();
        let amount = trimmed.parse::<u128>().map_err(|e| FeeError::InvalidAmount {
            value: amount.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self::new(token, amount))
    }
}

impl std::fmt::Display for FeeRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.amount, self.token)
    }
}

/// Insertion-ordered set of unique [`FeeRecord`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeeSet {
    records: IndexSet<FeeRecord>,
}

impl FeeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record; returns `false` if an equal record was already present.
    pub fn insert(&mut self, record: FeeRecord) -> bool {
        self.records.insert(record)
    }

    pub fn contains(&self, record: &FeeRecord) -> bool {
        self.records.contains(record)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = &FeeRecord> {
        self.records.iter()
    }

    /// Total amount recorded per token, in first-seen token order.
    pub fn totals(&self) -> indexmap::IndexMap<&str, u128> {
        let mut totals = indexmap::IndexMap::new();
        for record in &self.records {
            let entry = totals.entry(record.token.as_str()).or_insert(0u128);
            *entry = entry.saturating_add(record.amount);
        }
        totals
    }
}

impl Extend<FeeRecord> for FeeSet {
    fn extend<I: IntoIterator<Item = FeeRecord>>(&mut self, iter: I) {
        self.records.extend(iter);
    }
}

impl FromIterator<FeeRecord> for FeeSet {
    fn from_iter<I: IntoIterator<Item = FeeRecord>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for FeeSet {
    type Item = FeeRecord;
    type IntoIter = indexmap::set::IntoIter<FeeRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a FeeSet {
    type Item = &'a FeeRecord;
    type IntoIter = indexmap::set::Iter<'a, FeeRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
