//! Batch dispatcher: executes one decoded envelope or an ordered sequence of
//! envelopes, isolating each item's failure from its siblings.
//!
//! Shape detection is structural: a top-level JSON object takes the single
//! path, a top-level array the batch path. An array, even an empty one, always
//! yields the multi-status aggregate, because the caller must inspect each
//! item independently. Items execute strictly sequentially in input order
//! (the synchronous strategy); no item's failure removes, reorders, or blocks
//! subsequent items.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use http::StatusCode;
use serde_json::Value;
use switchyard_core::{BaseResponse, BatchItem, BehaviorKey, Outcome};

use super::chain::Execution;
use super::registry::DispatchRegistry;

// ---------------------------------------------------------------------------
// DispatchStats
// ---------------------------------------------------------------------------

/// Process-lifetime dispatch counters, shared with the metrics use case.
#[derive(Debug)]
pub struct DispatchStats {
    started: Instant,
    dispatched: AtomicU64,
    failed: AtomicU64,
}

/// Point-in-time view of [`DispatchStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub uptime_seconds: u64,
    pub dispatched: u64,
    pub failed: u64,
}

impl DispatchStats {
    /// Creates zeroed counters anchored at the current instant.
    #[must_use]
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            dispatched: AtomicU64::new(0),
            failed: AtomicU64::new(0),
        }
    }

    /// Snapshots the counters and uptime.
    #[must_use]
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            uptime_seconds: self.started.elapsed().as_secs(),
            dispatched: self.dispatched.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }

    /// Counts a dispatch attempt. Recorded before execution so a use case
    /// reading the counters (metrics) observes its own dispatch.
    fn record_dispatch(&self) {
        self.dispatched.fetch_add(1, Ordering::Relaxed);
    }

    fn record_failure(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }
}

impl Default for DispatchStats {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// A transport-level reply: aggregate status plus the JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchReply {
    pub status: StatusCode,
    pub body: Value,
}

/// Resolves envelopes against the registry and executes them through their
/// composed chains. Stateless apart from counters; shared across all request
/// threads.
pub struct Dispatcher {
    registry: Arc<DispatchRegistry>,
    stats: Arc<DispatchStats>,
}

impl Dispatcher {
    /// Creates a dispatcher over a finalized registry.
    #[must_use]
    pub fn new(registry: Arc<DispatchRegistry>, stats: Arc<DispatchStats>) -> Self {
        Self { registry, stats }
    }

    /// Dispatches a use-case endpoint payload addressed by the endpoint's
    /// behavior key.
    ///
    /// The body is either a single envelope object (single path: success maps
    /// to 200, each client-caused failure kind to 400) or an array of
    /// envelopes, each dispatched independently under the same key with the
    /// multi-status aggregate.
    #[must_use]
    pub fn dispatch_command(&self, behavior: &BehaviorKey, body: &[u8]) -> DispatchReply {
        let payload: Value = match serde_json::from_slice(body) {
            Ok(payload) => payload,
            Err(_) => return Self::transport_failure(String::from_utf8_lossy(body).into_owned()),
        };

        match payload {
            Value::Array(contents) => {
                let replies = contents
                    .iter()
                    .map(|content| self.run_one(behavior, content).0)
                    .collect();
                DispatchReply {
                    status: StatusCode::MULTI_STATUS,
                    body: Value::Array(replies),
                }
            }
            content @ Value::Object(_) => {
                let (response, outcome) = self.run_one(behavior, &content);
                DispatchReply {
                    status: Self::single_status(outcome),
                    body: response,
                }
            }
            other => Self::transport_failure(other.to_string()),
        }
    }

    /// Dispatches a batch endpoint payload: an array of items each carrying
    /// its own routing metadata.
    ///
    /// A top-level payload that is not an array aborts before any dispatch.
    /// Each item is decoded, resolved, and executed in isolation; its reply
    /// preserves the original `(version, kind, action, strategy)` metadata
    /// with either the use-case response or an error descriptor echoing the
    /// offending content.
    #[must_use]
    pub fn dispatch_batch(&self, body: &[u8]) -> DispatchReply {
        let payload: Value = match serde_json::from_slice(body) {
            Ok(payload) => payload,
            Err(_) => return Self::transport_failure(String::from_utf8_lossy(body).into_owned()),
        };

        let Value::Array(items) = payload else {
            return Self::transport_failure(payload.to_string());
        };

        let replies = items
            .iter()
            .map(|item| serde_json::to_value(self.run_item(item)).unwrap_or(Value::Null))
            .collect();
        DispatchReply {
            status: StatusCode::MULTI_STATUS,
            body: Value::Array(replies),
        }
    }

    /// Resolves and executes one envelope under the given behavior key.
    fn run_one(&self, behavior: &BehaviorKey, content: &Value) -> Execution {
        self.stats.record_dispatch();
        let execution = self.resolve_decode_execute(behavior, content);
        if !execution.1.is_success() {
            self.stats.record_failure();
        }
        execution
    }

    fn resolve_decode_execute(&self, behavior: &BehaviorKey, content: &Value) -> Execution {
        let Some(route) = self.registry.resolve(behavior) else {
            return Self::failure(content, Outcome::NotRoutableFailure);
        };

        let decoded = match route.decode_request(content) {
            Ok(decoded) => decoded,
            Err(_) => return Self::failure(content, Outcome::UseCaseUnmarshalFailure),
        };

        route.execute(&decoded)
    }

    /// Executes one batch item in isolation, preserving its metadata.
    fn run_item(&self, item: &Value) -> BatchItem {
        let Ok(meta) = serde_json::from_value::<BatchItem>(item.clone()) else {
            // Routing metadata undecodable: nothing to preserve beyond the
            // offending item itself.
            self.stats.record_dispatch();
            self.stats.record_failure();
            return BatchItem::default()
                .reply_with(Self::failure(item, Outcome::UseCaseUnmarshalFailure).0);
        };

        let content = meta.content.clone().unwrap_or(Value::Null);
        let (response, _) = self.run_one(&meta.behavior(), &content);
        meta.reply_with(response)
    }

    fn failure(content: &Value, outcome: Outcome) -> Execution {
        let error = BaseResponse::error(Value::String(content.to_string()), outcome);
        (serde_json::to_value(error).unwrap_or(Value::Null), outcome)
    }

    fn transport_failure(offending: String) -> DispatchReply {
        let error = BaseResponse::error(
            Value::String(offending),
            Outcome::TransportUnmarshalFailure,
        );
        DispatchReply {
            status: StatusCode::BAD_REQUEST,
            body: serde_json::to_value(error).unwrap_or(Value::Null),
        }
    }

    fn single_status(outcome: Outcome) -> StatusCode {
        if outcome.is_success() {
            StatusCode::OK
        } else {
            StatusCode::BAD_REQUEST
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
