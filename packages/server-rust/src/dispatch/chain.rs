//! Handler chain: ordered cross-cutting wrappers around a routable's execute.
//!
//! The chain is a decorator stack folded once, at registration time, into a
//! single composed call target; no re-composition happens per request. The
//! composed closure is stateless and shared read-only across all concurrent
//! invocations.

use std::sync::Arc;

use serde_json::Value;
use switchyard_core::{BehaviorKey, Outcome};

/// Result of one execution step: the response payload and its outcome.
pub type Execution = (Value, Outcome);

/// The downstream continuation a handler may invoke.
pub type Next<'a> = &'a dyn Fn(&Value) -> Execution;

/// A composed, reusable execute function.
pub type ExecuteFn = Box<dyn Fn(&Value) -> Execution + Send + Sync>;

/// A cross-cutting wrapper around command execution.
///
/// A handler either calls `next(request)`, optionally post-processing its
/// result, or short-circuits by returning an execution without calling
/// `next` (validation rejects malformed requests before business logic runs).
pub trait Handler: Send + Sync {
    fn handle(&self, request: &Value, behavior: &BehaviorKey, next: Next<'_>) -> Execution;
}

/// Folds `[h1, h2, ..., hn]` around `terminal` into `h1(h2(...hn(terminal)))`.
///
/// The first handler in the list is the outermost wrapper: it executes first
/// on the way in and last on the way out, so it may inspect or alter both the
/// inbound request and the outgoing execution.
#[must_use]
pub fn compose(
    behavior: &BehaviorKey,
    handlers: &[Arc<dyn Handler>],
    terminal: ExecuteFn,
) -> ExecuteFn {
    let mut composed = terminal;
    for handler in handlers.iter().rev() {
        let handler = Arc::clone(handler);
        let behavior = behavior.clone();
        let next = composed;
        composed = Box::new(move |request: &Value| {
            handler.handle(request, &behavior, &|r: &Value| next(r))
        });
    }
    composed
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
