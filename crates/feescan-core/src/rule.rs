//! Ordered attribute patterns.

use crate::types::{Attribute, Event};

/// A single requirement on one attribute of a run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Constraint {
    /// Any attribute with this key, whatever its value.
    AnyValue(String),
    /// An attribute with exactly this key and this value.
    ExactValue(String, String),
}

impl Constraint {
    pub fn key(&self) -> &str {
        match self {
            Self::AnyValue(key) | Self::ExactValue(key, _) => key,
        }
    }

    /// Returns `true` if `attr` satisfies this constraint.
    pub fn accepts(&self, attr: &Attribute) -> bool {
        match self {
            Self::AnyValue(key) => attr.key == *key,
            Self::ExactValue(key, value) => attr.key == *key && attr.value == *value,
        }
    }
}

/// An event type plus the ordered constraints a run of its attributes must meet.
///
/// ```rust
/// use feescan_core::Rule;
///
/// let rule = Rule::new("wasm")
///     .any("contract_address")
///     .exact("action", "transfer")
///     .any("amount");
/// assert_eq!(rule.len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub kind: String,
    pub constraints: Vec<Constraint>,
}

impl Rule {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            constraints: Vec::new(),
        }
    }

    /// Append a constraint matching any value for `key`.
    pub fn any(mut self, key: impl Into<String>) -> Self {
        self.constraints.push(Constraint::AnyValue(key.into()));
        self
    }

    /// Append a constraint requiring `key == value`.
    pub fn exact(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.constraints
            .push(Constraint::ExactValue(key.into(), value.into()));
        self
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Keys referenced by the constraints, in rule order (may repeat).
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.constraints.iter().map(Constraint::key)
    }

    /// Returns `true` if `event` has the type this rule targets.
    pub fn applies_to(&self, event: &Event) -> bool {
        event.kind == self.kind
    }
}
