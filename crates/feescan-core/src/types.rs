//! Transaction model as returned by Hive's `tx.byHeight` query.

use serde::{Deserialize, Deserializer, Serialize};

/// Block height.
pub type Height = u64;

// ─── Transaction ──────────────────────────────────────────────────────────────

/// A transaction with its ordered message logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(deserialize_with = "flexible_u64")]
    pub height: Height,
    /// Block time as reported by the node (RFC 3339).
    #[serde(default, deserialize_with = "null_as_default")]
    pub timestamp: String,
    pub txhash: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub logs: Vec<Log>,
}

impl Transaction {
    /// Iterate over every event of every log, in source order.
    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.logs.iter().flat_map(|log| log.events.iter())
    }
}

// ─── Log ──────────────────────────────────────────────────────────────────────

/// The events emitted by one message of a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Log {
    #[serde(default, deserialize_with = "flexible_u64")]
    pub msg_index: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub events: Vec<Event>,
}

// ─── Event ────────────────────────────────────────────────────────────────────

/// An ABCI event: a type tag plus an ordered attribute list.
///
/// Attribute lists are not bounded by the chain; spam transactions carry
/// thousands of entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub attributes: Vec<Attribute>,
}

impl Event {
    pub fn new(kind: impl Into<String>, attributes: Vec<Attribute>) -> Self {
        Self {
            kind: kind.into(),
            attributes,
        }
    }

    pub fn attribute_count(&self) -> usize {
        self.attributes.len()
    }
}

/// A single `key = value` pair of an event.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Attribute {
    pub key: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub value: String,
}

impl Attribute {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

// ─── Serde helpers ────────────────────────────────────────────────────────────

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(u64),
    String(String),
}

/// Hive encodes some integers as JSON numbers and others as strings.
fn flexible_u64<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::String(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decode_hive_transaction() {
        let v = json!({
            "height": "7375101",
            "timestamp": "2022-05-01T10:00:00Z",
            "txhash": "ABCDEF",
            "logs": [{
                "msg_index": 0,
                "events": [{
                    "type": "wasm",
                    "attributes": [
                        {"key": "contract_address", "value": "terra1token"},
                        {"key": "action", "value": "transfer"}
                    ]
                }]
            }]
        });
        let tx: Transaction = serde_json::from_value(v).unwrap();
        assert_eq!(tx.height, 7_375_101);
        assert_eq!(tx.logs.len(), 1);
        let event = tx.events().next().unwrap();
        assert_eq!(event.kind, "wasm");
        assert_eq!(event.attributes[1], Attribute::new("action", "transfer"));
    }

    #[test]
    fn null_logs_and_values_become_empty() {
        let v = json!({
            "height": 5,
            "timestamp": null,
            "txhash": "00",
            "logs": null
        });
        let tx: Transaction = serde_json::from_value(v).unwrap();
        assert!(tx.logs.is_empty());
        assert!(tx.timestamp.is_empty());

        let attr: Attribute = serde_json::from_value(json!({"key": "k", "value": null})).unwrap();
        assert_eq!(attr.value, "");
    }

    #[test]
    fn non_numeric_height_is_rejected() {
        let v = json!({"height": "abc", "txhash": "00"});
        assert!(serde_json::from_value::<Transaction>(v).is_err());
    }
}
