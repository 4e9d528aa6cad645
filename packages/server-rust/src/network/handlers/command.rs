//! Command API handlers: use-case endpoints and the batch endpoint.
//!
//! Dispatch is synchronous and may block inside a use case, so it runs on the
//! blocking pool rather than the async runtime. Deadlines are the transport
//! middleware's concern; the dispatcher imposes none of its own.

use std::sync::Arc;

use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use bytes::Bytes;
use http::StatusCode;
use switchyard_core::BehaviorKey;
use tokio::task::JoinError;

use super::AppState;
use crate::dispatch::DispatchReply;

/// Handles a use-case endpoint payload under the endpoint's behavior key.
///
/// Invoked through per-route closures built during router assembly, one per
/// registered feature endpoint.
pub async fn command_request(state: AppState, behavior: BehaviorKey, body: Bytes) -> Response {
    let _guard = state.shutdown.in_flight_guard();
    let dispatcher = Arc::clone(&state.dispatcher);
    let result =
        tokio::task::spawn_blocking(move || dispatcher.dispatch_command(&behavior, &body)).await;
    into_response(result)
}

/// Handles `POST /api/v2/batch`.
pub async fn batch_request(State(state): State<AppState>, body: Bytes) -> Response {
    let _guard = state.shutdown.in_flight_guard();
    let dispatcher = Arc::clone(&state.dispatcher);
    let result = tokio::task::spawn_blocking(move || dispatcher.dispatch_batch(&body)).await;
    into_response(result)
}

fn into_response(result: Result<DispatchReply, JoinError>) -> Response {
    match result {
        Ok(reply) => (reply.status, Json(reply.body)).into_response(),
        Err(error) => {
            tracing::error!(%error, "dispatch task failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
