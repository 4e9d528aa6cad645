//! Command routing and execution framework.
//!
//! This module implements the dispatch pipeline:
//!
//! 1. **Routable contract** (`routable`): typed use cases erased behind a
//!    uniform decode/execute surface
//! 2. **Handler chain** (`chain`, `middleware`): ordered cross-cutting
//!    wrappers composed once at registration time
//! 3. **Registry** (`registry`): build-once, read-only behavior lookup
//! 4. **Batch dispatcher** (`dispatcher`): single/array execution with
//!    per-item failure isolation and aggregate status assembly

pub mod chain;
pub mod dispatcher;
pub mod middleware;
pub mod registry;
pub mod routable;

// Re-export key types for convenient access.
pub use chain::{compose, ExecuteFn, Execution, Handler, Next};
pub use dispatcher::{DispatchReply, DispatchStats, Dispatcher, StatsSnapshot};
pub use middleware::instrument::Instrument;
pub use middleware::validation::RequireRequestId;
pub use registry::{DispatchRegistry, RegistryBuilder, RegistryError, Route};
pub use routable::{Routable, UseCase, UseCaseAdapter};
