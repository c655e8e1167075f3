//! Hive query documents and response decoding.

use serde::Deserialize;
use serde_json::{json, Value};

use feescan_core::request::GraphQlRequest;
use feescan_core::types::{Height, Transaction};

/// All transactions of one block, with their logs.
pub const TX_BY_HEIGHT: &str = r#"
query ($height: Float!) {
  tx {
    byHeight(height: $height) {
      height
      timestamp
      txhash
      logs {
        msg_index
        events {
          type
          attributes {
            key
            value
          }
        }
      }
    }
  }
}
"#;

/// CW20 `balance` smart query of `walletAddress` on `tokenContract`.
pub const CW20_BALANCE: &str = r#"
query ($tokenContract: String!, $walletAddress: String!) {
  wasm {
    contractQuery(
      contractAddress: $tokenContract
      query: { balance: { address: $walletAddress } }
    )
  }
}
"#;

pub fn tx_by_height(height: Height) -> GraphQlRequest {
    GraphQlRequest::new(TX_BY_HEIGHT, json!({ "height": height }))
}

pub fn cw20_balance(token_contract: &str, wallet_address: &str) -> GraphQlRequest {
    GraphQlRequest::new(
        CW20_BALANCE,
        json!({ "tokenContract": token_contract, "walletAddress": wallet_address }),
    )
}

#[derive(Deserialize)]
struct TxData {
    tx: TxRoot,
}

#[derive(Deserialize)]
struct TxRoot {
    #[serde(rename = "byHeight", default)]
    by_height: Option<Vec<Transaction>>,
}

/// Extract `tx.byHeight` from a response's data. A `null` list means the block
/// has no transactions.
pub fn decode_tx_by_height(data: Value) -> Result<Vec<Transaction>, serde_json::Error> {
    let data: TxData = serde_json::from_value(data)?;
    Ok(data.tx.by_height.unwrap_or_default())
}

#[derive(Deserialize)]
struct WasmData {
    wasm: WasmRoot,
}

#[derive(Deserialize)]
struct WasmRoot {
    #[serde(rename = "contractQuery")]
    contract_query: Balance,
}

#[derive(Deserialize)]
struct Balance {
    balance: String,
}

/// Extract the balance from a [`CW20_BALANCE`] response's data.
pub fn decode_cw20_balance(data: Value) -> Result<u128, String> {
    let data: WasmData = serde_json::from_value(data).map_err(|e| e.to_string())?;
    let raw = data.wasm.contract_query.balance;
    raw.trim()
        .parse()
        .map_err(|e| format!("invalid balance {raw:?}: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tx_request_carries_height() {
        let req = tx_by_height(7_375_100);
        assert_eq!(req.variables, json!({ "height": 7_375_100 }));
        assert!(req.query.contains("byHeight(height: $height)"));
    }

    #[test]
    fn decode_block_with_transactions() {
        let data = json!({
            "tx": {
                "byHeight": [{
                    "height": 10,
                    "timestamp": "2022-05-01T10:00:00Z",
                    "txhash": "AA",
                    "logs": []
                }]
            }
        });
        let txs = decode_tx_by_height(data).unwrap();
        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].txhash, "AA");
    }

    #[test]
    fn decode_empty_block() {
        assert!(decode_tx_by_height(json!({ "tx": { "byHeight": null } }))
            .unwrap()
            .is_empty());
        assert!(decode_tx_by_height(json!({ "tx": { "byHeight": [] } }))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn decode_missing_tx_root_fails() {
        assert!(decode_tx_by_height(Value::Null).is_err());
        assert!(decode_tx_by_height(json!({ "wasm": {} })).is_err());
    }

    #[test]
    fn decode_balance() {
        let data = json!({ "wasm": { "contractQuery": { "balance": "1500000" } } });
        assert_eq!(decode_cw20_balance(data).unwrap(), 1_500_000);

        let bad = json!({ "wasm": { "contractQuery": { "balance": "lots" } } });
        assert!(decode_cw20_balance(bad).is_err());
    }

    #[test]
    fn balance_request_variables() {
        let req = cw20_balance("terra1token", "terra1wallet");
        assert_eq!(req.variables["tokenContract"], "terra1token");
        assert_eq!(req.variables["walletAddress"], "terra1wallet");
    }
}
