//! End-to-end scans against an in-memory Hive.

use std::collections::{BTreeMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use feescan_core::error::TransportError;
use feescan_core::fee::FeeRecord;
use feescan_core::request::{GraphQlRequest, GraphQlResponse};
use feescan_core::transport::QueryTransport;
use feescan_core::ScanConfigBuilder;
use feescan_scanner::{FeeScanner, MAKER_ADDRESS};

/// A fixed set of blocks; batches touching `down` heights are rejected.
#[derive(Default)]
struct MemoryHive {
    blocks: BTreeMap<u64, Vec<Value>>,
    down: HashSet<u64>,
    batches: Mutex<Vec<Vec<u64>>>,
}

impl MemoryHive {
    fn with_tx(mut self, height: u64, events: Vec<Value>) -> Self {
        let n = self.blocks.get(&height).map_or(0, Vec::len);
        self.blocks.entry(height).or_default().push(json!({
            "height": height.to_string(),
            "timestamp": "2022-05-01T10:00:00Z",
            "txhash": format!("{height:X}-{n}"),
            "logs": [{ "msg_index": 0, "events": events }]
        }));
        self
    }

    fn down(mut self, height: u64) -> Self {
        self.down.insert(height);
        self
    }

    fn answer(&self, height: u64) -> GraphQlResponse {
        let txs = self.blocks.get(&height).cloned().map_or(Value::Null, Value::Array);
        GraphQlResponse::ok(json!({ "tx": { "byHeight": txs } }))
    }
}

fn height_of(req: &GraphQlRequest) -> u64 {
    req.variables["height"].as_u64().expect("height variable")
}

#[async_trait]
impl QueryTransport for MemoryHive {
    async fn request(&self, req: GraphQlRequest) -> Result<GraphQlResponse, TransportError> {
        Ok(self.answer(height_of(&req)))
    }

    async fn batch_request(
        &self,
        reqs: Vec<GraphQlRequest>,
    ) -> Result<Vec<GraphQlResponse>, TransportError> {
        let heights: Vec<u64> = reqs.iter().map(height_of).collect();
        self.batches.lock().unwrap().push(heights.clone());
        if heights.iter().any(|h| self.down.contains(h)) {
            return Err(TransportError::Http("HTTP 503: service unavailable".into()));
        }
        Ok(heights.into_iter().map(|h| self.answer(h)).collect())
    }

    fn url(&self) -> &str {
        "mem://hive"
    }
}

fn wasm(pairs: &[(&str, &str)]) -> Value {
    let attributes: Vec<Value> = pairs
        .iter()
        .map(|(k, v)| json!({ "key": k, "value": v }))
        .collect();
    json!({ "type": "wasm", "attributes": attributes })
}

fn fee_event(token: &str, to: &str, amount: &str) -> Value {
    wasm(&[
        ("_contract_address", token),
        ("contract_address", token),
        ("action", "transfer"),
        ("from", "terra1pair"),
        ("to", to),
        ("amount", amount),
    ])
}

#[tokio::test]
async fn maker_transfer_is_reported_once() {
    let hive = MemoryHive::default()
        .with_tx(100, vec![fee_event("X", MAKER_ADDRESS, "42")])
        .with_tx(101, vec![fee_event("X", MAKER_ADDRESS, "42")])
        .with_tx(102, vec![fee_event("X", "terra1someoneelse", "99")]);

    let report = FeeScanner::new(hive).scan(100, 103, 2, 1).await.unwrap();

    assert!(report.is_complete());
    assert_eq!(report.fees.iter().collect::<Vec<_>>(), vec![&FeeRecord::new("X", 42)]);
}

#[tokio::test]
async fn windows_follow_configured_stride_and_span() {
    let scanner = FeeScanner::new(MemoryHive::default());
    let report = scanner.scan(100, 104, 3, 3).await.unwrap();

    assert_eq!(report.windows_ok, 2);
    let batches = scanner.fetcher().transport().batches.lock().unwrap().clone();
    assert_eq!(batches, vec![vec![100, 101, 102, 103], vec![103, 104, 105, 106]]);
}

#[tokio::test]
async fn failed_window_keeps_results_of_the_others() {
    let hive = MemoryHive::default()
        .with_tx(0, vec![fee_event("A", MAKER_ADDRESS, "1")])
        .with_tx(5, vec![fee_event("B", MAKER_ADDRESS, "2")])
        .with_tx(10, vec![fee_event("C", MAKER_ADDRESS, "3")])
        .down(6);

    let report = FeeScanner::new(hive).scan(0, 15, 5, 4).await.unwrap();

    assert_eq!(report.windows_ok, 2);
    assert_eq!(report.failed_windows.len(), 1);
    assert_eq!((report.failed_windows[0].start, report.failed_windows[0].end), (5, 9));
    assert!(report.failed_windows[0].reason.contains("503"));
    assert_eq!(report.missing_heights(), vec![5, 6, 7, 8, 9]);

    let tokens: Vec<_> = report.fees.iter().map(|f| f.token.as_str()).collect();
    assert_eq!(tokens, vec!["A", "C"]);
}

#[tokio::test]
async fn malformed_amount_skips_only_that_event() {
    let hive = MemoryHive::default()
        .with_tx(
            1,
            vec![
                fee_event("BAD", MAKER_ADDRESS, "not-a-number"),
                fee_event("GOOD", MAKER_ADDRESS, "5"),
            ],
        )
        .with_tx(2, vec![fee_event("LATER", MAKER_ADDRESS, "6")]);

    let report = FeeScanner::new(hive).scan(1, 3, 2, 1).await.unwrap();

    assert_eq!(report.transform_errors, 1);
    assert_eq!(
        report.fees.iter().cloned().collect::<Vec<_>>(),
        vec![FeeRecord::new("GOOD", 5), FeeRecord::new("LATER", 6)]
    );
}

/// A maker transfer padded with memo attributes up to `total` attributes.
fn padded_transfer(token: &str, total: usize) -> Value {
    let mut pairs: Vec<(&str, &str)> = vec![
        ("contract_address", token),
        ("action", "transfer"),
        ("from", "terra1spammer"),
        ("to", MAKER_ADDRESS),
        ("amount", "1"),
    ];
    let padding = total - pairs.len();
    pairs.extend(std::iter::repeat(("memo", "x")).take(padding));
    wasm(&pairs)
}

#[tokio::test]
async fn spam_sized_event_is_skipped() {
    let hive = MemoryHive::default().with_tx(1, vec![padded_transfer("SPAM", 1800)]);

    let report = FeeScanner::new(hive).scan(1, 2, 1, 1).await.unwrap();

    assert_eq!(report.events_skipped_spam, 1);
    assert_eq!(report.events_scanned, 0);
    assert!(report.fees.is_empty());
}

#[tokio::test]
async fn event_just_below_spam_size_is_matched() {
    let hive = MemoryHive::default().with_tx(1, vec![padded_transfer("BIG", 1799)]);

    let report = FeeScanner::new(hive).scan(1, 2, 1, 1).await.unwrap();

    assert_eq!(report.events_skipped_spam, 0);
    assert_eq!(report.events_scanned, 1);
    assert_eq!(report.fees.iter().collect::<Vec<_>>(), vec![&FeeRecord::new("BIG", 1)]);
}

#[tokio::test]
async fn repeated_scans_are_identical() {
    let hive = MemoryHive::default()
        .with_tx(3, vec![fee_event("A", MAKER_ADDRESS, "10")])
        .with_tx(4, vec![fee_event("B", MAKER_ADDRESS, "20"), fee_event("A", MAKER_ADDRESS, "10")])
        .with_tx(9, vec![fee_event("C", MAKER_ADDRESS, "30")]);
    let scanner = FeeScanner::new(hive);
    let config = ScanConfigBuilder::new()
        .endpoint("mem://hive")
        .start_height(0)
        .end_height(10)
        .batch_size(4)
        .window_size(4)
        .build()
        .unwrap();

    let first = scanner.scan_config(&config).await.unwrap();
    let second = scanner.scan_config(&config).await.unwrap();

    assert_eq!(first.fees, second.fees);
    assert_eq!(first.fees.len(), 3);
}
