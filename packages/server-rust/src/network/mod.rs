//! Transport binding: configuration, middleware, handlers, server lifecycle,
//! and shutdown control.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod module;
pub mod shutdown;

pub use config::{NetworkConfig, TlsConfig};
pub use handlers::AppState;
pub use module::ServerModule;
pub use shutdown::{HealthState, InFlightGuard, ShutdownController};
