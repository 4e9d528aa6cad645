//! Instrumentation handler.
//!
//! Records command duration and outcome in `tracing` spans. Installed as a
//! global (outermost) handler when the service runs in debug mode.

use std::time::Instant;

use serde_json::Value;
use switchyard_core::BehaviorKey;
use tracing::info_span;

use crate::dispatch::chain::{Execution, Handler, Next};

/// Handler that wraps execution in a `tracing` span with timing and outcome.
#[derive(Debug, Clone, Copy, Default)]
pub struct Instrument;

impl Handler for Instrument {
    fn handle(&self, request: &Value, behavior: &BehaviorKey, next: Next<'_>) -> Execution {
        let span = info_span!(
            "command",
            version = %behavior.version,
            kind = %behavior.kind,
            action = %behavior.action,
        );
        let _enter = span.enter();

        let start = Instant::now();
        let (response, outcome) = next(request);
        let duration_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

        tracing::info!(
            duration_ms,
            outcome = %outcome,
            code = outcome.code(),
            "command complete"
        );

        (response, outcome)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use serde_json::json;
    use switchyard_core::Outcome;

    use super::*;

    #[test]
    fn passes_request_and_execution_through_unchanged() {
        let request = json!({"requestId": "abc"});
        let (response, outcome) = Instrument.handle(
            &request,
            &BehaviorKey::v2_command("ping"),
            &|r: &Value| (r.clone(), Outcome::Success),
        );
        assert_eq!(outcome, Outcome::Success);
        assert_eq!(response, request);
    }

    #[test]
    fn preserves_failure_outcomes() {
        let (_, outcome) = Instrument.handle(
            &json!({}),
            &BehaviorKey::v2_command("ping"),
            &|_: &Value| (Value::Null, Outcome::NotRoutableFailure),
        );
        assert_eq!(outcome, Outcome::NotRoutableFailure);
    }
}
