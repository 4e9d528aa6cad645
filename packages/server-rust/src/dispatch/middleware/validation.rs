//! Request validation handler.
//!
//! Rejects requests whose `requestId` is empty before business logic runs,
//! echoing the decoded request for diagnosability. Features whose request
//! shape carries no `requestId` (the acceptance-test echo use case) simply
//! omit this handler from their chain.

use serde_json::Value;
use switchyard_core::{BaseResponse, BehaviorKey, Outcome};

use crate::dispatch::chain::{Execution, Handler, Next};

/// Handler enforcing a non-empty `requestId`.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequireRequestId;

impl Handler for RequireRequestId {
    fn handle(&self, request: &Value, _behavior: &BehaviorKey, next: Next<'_>) -> Execution {
        let request_id = request
            .get("requestId")
            .and_then(Value::as_str)
            .unwrap_or_default();
        if request_id.is_empty() {
            let error = BaseResponse::error(request.clone(), Outcome::ValidationFailure);
            return (
                serde_json::to_value(error).unwrap_or(Value::Null),
                Outcome::ValidationFailure,
            );
        }
        next(request)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
