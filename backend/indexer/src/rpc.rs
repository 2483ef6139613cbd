//! Soroban RPC client — polls `getEvents` and decodes Crowdfund events.
//!
//! ## Resilience
//!
//! * Exponential back-off is applied when the RPC returns an error or
//!   rate-limit response, up to [`MAX_BACKOFF_SECS`] seconds.
//! * Transient network errors (connection reset, timeout) are retried
//!   silently.
//! * Pagination cursors are followed inside [`fetch_events`], so a call
//!   always returns the complete window for its ledger range.

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::errors::{IndexerError, Result};
use crate::events::{CrowdfundEvent, EventKind};

const MAX_BACKOFF_SECS: u64 = 60;
const INITIAL_BACKOFF_SECS: u64 = 2;

/// `getEvents` accepts at most this many contract ids per filter.
pub const MAX_CONTRACTS_PER_FILTER: usize = 5;

// ─────────────────────────────────────────────────────────
// JSON-RPC response shapes
// ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RpcResponse {
    pub result: Option<EventsResult>,
    pub error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
pub struct RpcError {
    pub code: i64,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct EventsResult {
    pub events: Vec<RawEvent>,
    pub cursor: Option<String>,
    #[serde(rename = "latestLedger")]
    pub latest_ledger: Option<u64>,
}

#[derive(Debug, Deserialize, Clone)]
#[allow(dead_code)]
pub struct RawEvent {
    /// XDR-decoded topic list
    pub topic: Vec<String>,
    /// XDR-decoded event value / data
    pub value: Value,
    #[serde(rename = "contractId")]
    pub contract_id: Option<String>,
    #[serde(rename = "txHash")]
    pub tx_hash: Option<String>,
    pub id: Option<String>,
    pub ledger: Option<u64>,
    #[serde(rename = "ledgerClosedAt")]
    pub ledger_closed_at: Option<String>,
    #[serde(rename = "inSuccessfulContractCall")]
    pub in_successful_contract_call: Option<bool>,
    #[serde(rename = "pagingToken")]
    pub paging_token: Option<String>,
}

// ─────────────────────────────────────────────────────────
// Public API
// ─────────────────────────────────────────────────────────

/// Fetch every event for `contract_ids` from `start_ledger` onwards,
/// following pagination cursors until the window is exhausted.
///
/// Returns `(events, latest_ledger)`.
pub async fn fetch_events(
    client: &Client,
    rpc_url: &str,
    contract_ids: &[String],
    start_ledger: u32,
    limit: u32,
) -> Result<(Vec<RawEvent>, Option<u64>)> {
    let mut all_events = Vec::new();
    let mut latest_ledger = None;
    let mut cursor: Option<String> = None;

    loop {
        let params = build_params(contract_ids, start_ledger, cursor.as_deref(), limit);
        let result = request_with_backoff(client, rpc_url, params).await?;

        debug!(
            "Fetched {} events (latest_ledger={:?})",
            result.events.len(),
            result.latest_ledger
        );

        all_events.extend(result.events);
        if result.latest_ledger.is_some() {
            latest_ledger = result.latest_ledger;
        }

        match result.cursor {
            Some(next) if !next.is_empty() => cursor = Some(next),
            _ => break,
        }
    }

    Ok((all_events, latest_ledger))
}

/// Issue one `getEvents` request, retrying transient failures with
/// exponential back-off.
async fn request_with_backoff(
    client: &Client,
    rpc_url: &str,
    params: Value,
) -> Result<EventsResult> {
    let mut backoff = INITIAL_BACKOFF_SECS;

    loop {
        let response = client
            .post(rpc_url)
            .json(&json!({
                "jsonrpc": "2.0",
                "id": 1,
                "method": "getEvents",
                "params": params.clone(),
            }))
            .send()
            .await;

        match response {
            Err(e) => {
                warn!("RPC request failed (will retry in {backoff}s): {e}");
                tokio::time::sleep(Duration::from_secs(backoff)).await;
                backoff = (backoff * 2).min(MAX_BACKOFF_SECS);
            }
            Ok(resp) => {
                if resp.status() == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    warn!("Rate-limited by RPC (will retry in {backoff}s)");
                    tokio::time::sleep(Duration::from_secs(backoff)).await;
                    backoff = (backoff * 2).min(MAX_BACKOFF_SECS);
                    continue;
                }

                let body: RpcResponse = resp.json().await?;

                if let Some(err) = body.error {
                    // Code -32600 / -32601 are hard failures; everything
                    // else is worth retrying.
                    if err.code == -32600 || err.code == -32601 {
                        return Err(IndexerError::EventParse(format!(
                            "RPC hard error {}: {}",
                            err.code, err.message
                        )));
                    }
                    warn!(
                        "RPC soft error (will retry in {backoff}s): {} {}",
                        err.code, err.message
                    );
                    tokio::time::sleep(Duration::from_secs(backoff)).await;
                    backoff = (backoff * 2).min(MAX_BACKOFF_SECS);
                    continue;
                }

                return body.result.ok_or_else(|| {
                    IndexerError::EventParse("Empty result from getEvents".to_string())
                });
            }
        }
    }
}

fn build_params(contract_ids: &[String], start_ledger: u32, cursor: Option<&str>, limit: u32) -> Value {
    let mut params = json!({
        "filters": [
            {
                "type": "contract",
                "contractIds": contract_ids,
            }
        ],
        "pagination": {
            "limit": limit
        }
    });

    if let Some(cur) = cursor {
        params["pagination"]["cursor"] = json!(cur);
    } else {
        params["startLedger"] = json!(start_ledger);
    }

    params
}

// ─────────────────────────────────────────────────────────
// Event decoding
// ─────────────────────────────────────────────────────────

/// Decode a list of raw RPC events. Returns the decoded events plus every
/// campaign contract address discovered in `project_registered` payloads,
/// so the indexer can start watching new campaigns as they appear.
pub fn decode_events(raw: &[RawEvent]) -> (Vec<CrowdfundEvent>, Vec<String>) {
    let mut events = Vec::new();
    let mut discovered = Vec::new();

    for e in raw {
        if let Some(decoded) = decode_single(e) {
            if decoded.event_type == EventKind::ProjectRegistered.as_str() {
                if let Some(project_contract) = extract_field(&e.value, &["project"]) {
                    discovered.push(project_contract);
                }
            }
            events.push(decoded);
        }
    }

    (events, discovered)
}

fn decode_single(raw: &RawEvent) -> Option<CrowdfundEvent> {
    let first_topic = raw.topic.first()?;
    let kind = EventKind::from_topic(&extract_symbol(first_topic));
    let contract_id = raw.contract_id.clone()?;

    let ledger = raw.ledger.unwrap_or(0) as i64;
    let timestamp = raw
        .ledger_closed_at
        .as_deref()
        .and_then(parse_iso_to_unix)
        .unwrap_or(0);

    // Fund events name the campaign in their second topic; a campaign
    // contract's own stream is keyed by its address.
    let project = if kind.is_fund_event() {
        raw.topic.get(1).map(|t| extract_string_or_raw(t))
    } else {
        Some(contract_id.clone())
    };

    let (actor, amount) = decode_data(&raw.value, kind);

    Some(CrowdfundEvent {
        event_type: kind.as_str().to_string(),
        project,
        actor,
        amount,
        ledger,
        timestamp,
        contract_id,
        tx_hash: raw.tx_hash.clone(),
    })
}

/// Pull apart the JSON `value` blob the RPC decodes from the event's XDR
/// payload. All Crowdfund payloads are structs, which arrive as JSON maps.
fn decode_data(value: &Value, kind: EventKind) -> (Option<String>, Option<String>) {
    match kind {
        EventKind::FundInitialized => (
            extract_field(value, &["operator"]),
            extract_field(value, &["deposit"]),
        ),
        EventKind::ProjectRequested => (
            extract_field(value, &["owner"]),
            extract_field(value, &["deposit"]),
        ),
        EventKind::ProjectRegistered | EventKind::ProjectOrphaned | EventKind::ProjectRemoved => {
            (extract_field(value, &["owner"]), None)
        }
        EventKind::ProjectInitialized => (
            extract_field(value, &["owner"]),
            extract_field(value, &["attached"]),
        ),
        EventKind::DonationReceived => (
            extract_field(value, &["donor"]),
            extract_field(value, &["amount"]),
        ),
        EventKind::CommentAdded => (extract_field(value, &["author"]), None),
        EventKind::ProjectLiked => (extract_field(value, &["account"]), None),
        EventKind::ReleaseRequested => (None, extract_field(value, &["amount"])),
        EventKind::DonationsReleased | EventKind::ReleaseFailed => (
            extract_field(value, &["owner"]),
            extract_field(value, &["amount"]),
        ),
        EventKind::Unknown => (None, None),
    }
}

fn extract_field(value: &Value, keys: &[&str]) -> Option<String> {
    for key in keys {
        if let Some(v) = value.get(key) {
            let s = match v {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => v.as_str().map(String::from),
            };
            if s.is_some() {
                return s;
            }
        }
    }
    None
}

/// Extract a Soroban Symbol from an XDR-decoded topic string.
/// The RPC may return `{"type":"symbol","value":"donated"}` or the raw string.
fn extract_symbol(raw: &str) -> String {
    if let Ok(v) = serde_json::from_str::<Value>(raw) {
        if let Some(s) = v.get("value").and_then(|x| x.as_str()) {
            return s.to_string();
        }
    }
    raw.to_string()
}

/// Extract the identifier from a topic entry that might be a JSON object or
/// a raw string.
fn extract_string_or_raw(raw: &str) -> String {
    if let Ok(v) = serde_json::from_str::<Value>(raw) {
        if let Some(s) = v.get("value").and_then(|x| x.as_str()) {
            return s.to_string();
        }
    }
    raw.to_string()
}

/// Parse an ISO-8601 timestamp string into a Unix epoch (seconds).
fn parse_iso_to_unix(s: &str) -> Option<i64> {
    use chrono::DateTime;
    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.timestamp())
}

// ─────────────────────────────────────────────────────────
// Unit tests
// ─────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(topic: Vec<String>, value: Value, contract_id: &str, ledger: u64) -> RawEvent {
        RawEvent {
            topic,
            value,
            contract_id: Some(contract_id.to_string()),
            tx_hash: Some("TX1".to_string()),
            id: None,
            ledger: Some(ledger),
            ledger_closed_at: Some("2024-01-01T00:00:00Z".to_string()),
            in_successful_contract_call: Some(true),
            paging_token: None,
        }
    }

    #[test]
    fn extract_symbol_from_json() {
        let s = r#"{"type":"symbol","value":"donated"}"#;
        assert_eq!(extract_symbol(s), "donated");
    }

    #[test]
    fn extract_symbol_raw_fallback() {
        assert_eq!(extract_symbol("released"), "released");
    }

    #[test]
    fn decode_donation_event() {
        let e = raw(
            vec![r#"{"type":"symbol","value":"donated"}"#.to_string()],
            serde_json::json!({ "donor": "GDONOR1", "amount": "5000000", "seq": 3 }),
            "CPROJECT1",
            1000,
        );

        let (events, discovered) = decode_events(&[e]);
        assert!(discovered.is_empty());
        assert_eq!(events.len(), 1);
        let ev = &events[0];
        assert_eq!(ev.event_type, "donation_received");
        // A campaign's own stream is keyed by its contract address.
        assert_eq!(ev.project.as_deref(), Some("CPROJECT1"));
        assert_eq!(ev.actor.as_deref(), Some("GDONOR1"));
        assert_eq!(ev.amount.as_deref(), Some("5000000"));
        assert_eq!(ev.ledger, 1000);
        assert_eq!(ev.timestamp, 1_704_067_200);
    }

    #[test]
    fn decode_registered_event_discovers_campaign_contract() {
        let e = raw(
            vec![
                r#"{"type":"symbol","value":"created"}"#.to_string(),
                r#"{"type":"string","value":"defi-campaign"}"#.to_string(),
            ],
            serde_json::json!({
                "owner": "GOWNER1",
                "identifier": "defi-campaign",
                "project": "CPROJECT1"
            }),
            "CFUND",
            1001,
        );

        let (events, discovered) = decode_events(&[e]);
        assert_eq!(discovered, vec!["CPROJECT1".to_string()]);
        assert_eq!(events.len(), 1);
        let ev = &events[0];
        assert_eq!(ev.event_type, "project_registered");
        // Fund events are keyed by the identifier topic.
        assert_eq!(ev.project.as_deref(), Some("defi-campaign"));
        assert_eq!(ev.actor.as_deref(), Some("GOWNER1"));
    }

    #[test]
    fn decode_orphaned_event() {
        let e = raw(
            vec![
                r#"{"type":"symbol","value":"orphaned"}"#.to_string(),
                r#"{"type":"string","value":"lost-campaign"}"#.to_string(),
            ],
            serde_json::json!({ "owner": "GOWNER1", "identifier": "lost-campaign", "project": "CDEAD" }),
            "CFUND",
            1002,
        );

        let (events, discovered) = decode_events(&[e]);
        // Orphaned campaigns never initialized; they are not tracked.
        assert!(discovered.is_empty());
        assert_eq!(events[0].event_type, "project_orphaned");
        assert_eq!(events[0].project.as_deref(), Some("lost-campaign"));
    }

    #[test]
    fn unknown_topics_still_recorded() {
        let e = raw(
            vec![r#"{"type":"symbol","value":"upgraded"}"#.to_string()],
            serde_json::json!({}),
            "CFUND",
            1003,
        );

        let (events, _) = decode_events(&[e]);
        assert_eq!(events[0].event_type, "unknown");
    }

    #[test]
    fn params_with_cursor_drop_start_ledger() {
        let ids = vec!["CFUND".to_string(), "CPROJECT1".to_string()];
        let fresh = build_params(&ids, 42, None, 100);
        assert_eq!(fresh["startLedger"], 42);
        assert_eq!(fresh["filters"][0]["contractIds"][1], "CPROJECT1");

        let paged = build_params(&ids, 42, Some("cursor-1"), 100);
        assert!(paged.get("startLedger").is_none());
        assert_eq!(paged["pagination"]["cursor"], "cursor-1");
    }

    #[test]
    fn parse_iso_timestamp() {
        let ts = parse_iso_to_unix("2024-01-01T00:00:00Z").unwrap();
        assert_eq!(ts, 1_704_067_200);
    }
}
