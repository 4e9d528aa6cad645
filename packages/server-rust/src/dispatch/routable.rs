//! The routable contract: typed use cases and their type-erased form.
//!
//! Features implement the typed [`UseCase`] trait; [`UseCaseAdapter`] erases
//! it behind the object-safe [`Routable`] surface the registry and dispatcher
//! work with, so heterogeneous request/response shapes share one dispatch
//! path.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use switchyard_core::{BaseResponse, Outcome};

// ---------------------------------------------------------------------------
// UseCase trait
// ---------------------------------------------------------------------------

/// A unit of business logic with typed request and response shapes.
///
/// `execute` is total: expected failure modes are expressed through the
/// returned [`Outcome`], never through panics. It may block (e.g. on a
/// downstream dependency); the transport layer runs dispatch on the blocking
/// pool. The dispatcher imposes no timeout or retry policy.
pub trait UseCase: Send + Sync {
    /// Request shape. `Default` supplies the zero-valued decode target;
    /// missing optional fields decode to their defaults rather than failing.
    type Request: DeserializeOwned + Serialize + Default + Send;
    /// Response shape.
    type Response: Serialize;

    /// Runs the domain action.
    fn execute(&self, request: Self::Request) -> (Self::Response, Outcome);
}

// ---------------------------------------------------------------------------
// Routable (type-erased)
// ---------------------------------------------------------------------------

/// Object-safe executable registered under a behavior key.
///
/// Implementations are registered into exactly one registry and never mutated
/// afterwards; all methods are safe to call concurrently.
pub trait Routable: Send + Sync {
    /// Zero-valued instance of the expected request shape, used as the decode
    /// target for payloads of unknown static shape.
    fn empty_request(&self) -> Value;

    /// Strictly decodes `content` into this behavior's request shape,
    /// normalizing it to the typed field set. Type mismatches and non-object
    /// payloads are errors; missing optional fields are not.
    fn decode_request(&self, content: &Value) -> Result<Value, serde_json::Error>;

    /// Runs the business logic on a request previously accepted by
    /// `decode_request`.
    fn execute(&self, request: &Value) -> (Value, Outcome);
}

// ---------------------------------------------------------------------------
// UseCaseAdapter (type-erasing wrapper)
// ---------------------------------------------------------------------------

/// Wrapper erasing a concrete [`UseCase`] into a [`Routable`] trait object.
pub struct UseCaseAdapter<U> {
    use_case: U,
}

impl<U> UseCaseAdapter<U> {
    /// Wraps the given use case.
    #[must_use]
    pub fn new(use_case: U) -> Self {
        Self { use_case }
    }
}

impl<U> UseCaseAdapter<U>
where
    U: UseCase + 'static,
{
    /// Wraps the use case and returns it as a shared routable.
    #[must_use]
    pub fn shared(use_case: U) -> Arc<dyn Routable> {
        Arc::new(Self::new(use_case))
    }
}

impl<U: UseCase> Routable for UseCaseAdapter<U> {
    fn empty_request(&self) -> Value {
        serde_json::to_value(U::Request::default()).unwrap_or(Value::Null)
    }

    fn decode_request(&self, content: &Value) -> Result<Value, serde_json::Error> {
        let typed: U::Request = serde_json::from_value(content.clone())?;
        serde_json::to_value(typed)
    }

    fn execute(&self, request: &Value) -> (Value, Outcome) {
        // The dispatcher decodes before executing, so a mismatch here means
        // the caller skipped decode_request; report it as data, not a panic.
        let typed: U::Request = match serde_json::from_value(request.clone()) {
            Ok(typed) => typed,
            Err(_) => {
                let error = BaseResponse::error(
                    Value::String(request.to_string()),
                    Outcome::UseCaseUnmarshalFailure,
                );
                return (
                    serde_json::to_value(error).unwrap_or(Value::Null),
                    Outcome::UseCaseUnmarshalFailure,
                );
            }
        };

        let (response, outcome) = self.use_case.execute(typed);
        (serde_json::to_value(response).unwrap_or(Value::Null), outcome)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
