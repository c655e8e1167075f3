//! Rule matching over a single event's attribute list.
//!
//! Matching is positional. Attributes whose key is not referenced by the rule
//! are skipped; among the remaining ("keyed") attributes, the rule's
//! constraints must hold for consecutive entries, in order. Every
//! non-overlapping run is reported, scanning left to right.
//!
//! ```text
//! rule:   [contract_address] [action=transfer] [amount]
//! event:  contract_address=X  sender=S  action=transfer  amount=5  contract_address=Y ...
//! keyed:  contract_address=X            action=transfer  amount=5  contract_address=Y ...
//!         └──────────────────── match ─────────────────────────┘
//! ```

use std::collections::HashSet;

use crate::rule::Rule;
use crate::types::{Attribute, Event};

/// One matched run plus the transform's output for it.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchResult<T> {
    /// Matched attributes, one per constraint, in constraint order.
    pub attributes: Vec<Attribute>,
    /// `None` when the transform produced nothing useful for this run.
    pub transformed: Option<T>,
}

/// Finds runs of a [`Rule`] inside events.
#[derive(Debug, Clone)]
pub struct LogMatcher {
    rule: Rule,
    keys: HashSet<String>,
}

impl LogMatcher {
    pub fn new(rule: Rule) -> Self {
        let keys = rule.keys().map(str::to_owned).collect();
        Self { rule, keys }
    }

    pub fn rule(&self) -> &Rule {
        &self.rule
    }

    /// Return every non-overlapping run of the rule in `event`.
    ///
    /// An event of another type yields nothing. A rule without constraints
    /// yields a single empty run for every event of its type.
    pub fn find<'e>(&self, event: &'e Event) -> Vec<Vec<&'e Attribute>> {
        if !self.rule.applies_to(event) {
            return Vec::new();
        }
        let n = self.rule.len();
        if n == 0 {
            return vec![Vec::new()];
        }

        let keyed: Vec<&Attribute> = event
            .attributes
            .iter()
            .filter(|attr| self.keys.contains(&attr.key))
            .collect();

        let mut runs = Vec::new();
        let mut i = 0;
        while i + n <= keyed.len() {
            let window = &keyed[i..i + n];
            let hit = self
                .rule
                .constraints
                .iter()
                .zip(window)
                .all(|(constraint, attr)| constraint.accepts(attr));
            if hit {
                runs.push(window.to_vec());
                i += n;
            } else {
                i += 1;
            }
        }
        runs
    }

    /// Like [`find`](Self::find), applying `transform` to each run.
    ///
    /// The first transform error aborts matching for this event and is
    /// returned to the caller.
    pub fn find_with<T, E, F>(&self, event: &Event, mut transform: F) -> Result<Vec<MatchResult<T>>, E>
    where
        F: FnMut(&Rule, &[Attribute]) -> Result<Option<T>, E>,
    {
        self.find(event)
            .into_iter()
            .map(|run| {
                let attributes: Vec<Attribute> = run.into_iter().cloned().collect();
                let transformed = transform(&self.rule, &attributes)?;
                Ok(MatchResult {
                    attributes,
                    transformed,
                })
            })
            .collect()
    }
}
