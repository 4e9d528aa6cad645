//! HTTP handler definitions for the `Switchyard` server.
//!
//! Defines `AppState` (the shared state carried through axum extractors) and
//! re-exports the handler functions used when building the router.

pub mod command;
pub mod health;

pub use command::{batch_request, command_request};
pub use health::{health_handler, liveness_handler, readiness_handler};

use std::sync::Arc;
use std::time::Instant;

use crate::dispatch::Dispatcher;

use super::ShutdownController;

/// Shared application state passed to all axum handlers via `State`.
///
/// Holds `Arc` references to shared resources so cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    /// The command dispatcher backing every API endpoint.
    pub dispatcher: Arc<Dispatcher>,
    /// Graceful shutdown controller with health state and in-flight tracking.
    pub shutdown: Arc<ShutdownController>,
    /// Server process start time, used for uptime calculation.
    pub start_time: Instant,
}
