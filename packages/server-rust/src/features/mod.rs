//! Feature modules: the use cases this service dispatches to.
//!
//! Each feature owns its request/response DTOs and its routable, declares the
//! behaviors it supports, and names the transport endpoint it binds to. The
//! factory in this module provides the cross-service set of common features,
//! mirroring the startup wiring the registry is assembled from.

pub mod config;
pub mod echo;
pub mod metrics;
pub mod ping;
pub mod version;

use std::sync::Arc;

use switchyard_core::BehaviorKey;

use crate::dispatch::{
    DispatchRegistry, DispatchStats, Handler, Instrument, RegistryBuilder, RegistryError, Routable,
};

pub use config::ServiceSettings;

/// Path prefix of the v2 command API.
pub const BASE_PATH: &str = "/api/v2";

/// One behavior a feature supports: its key, its routable, and the
/// per-behavior handlers composed around it.
pub struct Supported {
    pub behavior: BehaviorKey,
    pub routable: Arc<dyn Routable>,
    pub handlers: Vec<Arc<dyn Handler>>,
}

/// A feature module, consumed once during startup wiring.
pub trait Feature: Send + Sync {
    /// Transport endpoint this feature binds to.
    fn endpoint(&self) -> &'static str;

    /// Behavior key dispatched for payloads arriving at `endpoint`.
    fn behavior(&self) -> BehaviorKey;

    /// The behaviors this feature registers.
    fn supported(&self) -> Vec<Supported>;
}

/// Pairs a transport path with the behavior key it dispatches.
#[derive(Debug, Clone)]
pub struct EndpointBinding {
    pub path: &'static str,
    pub behavior: BehaviorKey,
}

/// Startup toggles controlling which features and global handlers are wired.
#[derive(Debug, Clone, Copy, Default)]
pub struct BootstrapOptions {
    /// Installs the instrumentation handler around every behavior.
    pub debug_mode: bool,
    /// Registers the echo feature used by acceptance tests.
    pub acceptance_test_mode: bool,
}

/// The cross-service set of common features.
#[must_use]
pub fn standard_features(
    options: BootstrapOptions,
    stats: Arc<DispatchStats>,
    settings: ServiceSettings,
) -> Vec<Arc<dyn Feature>> {
    let mut features: Vec<Arc<dyn Feature>> = vec![
        Arc::new(ping::PingFeature),
        Arc::new(version::VersionFeature),
        Arc::new(metrics::MetricsFeature::new(stats)),
        Arc::new(config::ConfigFeature::new(settings)),
    ];

    if options.acceptance_test_mode {
        features.push(Arc::new(echo::EchoFeature));
    }

    features
}

/// Assembles the dispatch registry from the given features.
///
/// # Errors
///
/// Returns [`RegistryError::DuplicateBehavior`] when two features claim the
/// same behavior key; the caller must treat this as fatal and refuse to
/// start.
pub fn build_registry(
    features: &[Arc<dyn Feature>],
    options: BootstrapOptions,
) -> Result<DispatchRegistry, RegistryError> {
    let global_handlers: Vec<Arc<dyn Handler>> = if options.debug_mode {
        vec![Arc::new(Instrument)]
    } else {
        Vec::new()
    };

    let mut builder = RegistryBuilder::with_global_handlers(global_handlers);
    for feature in features {
        for supported in feature.supported() {
            builder.register(supported.behavior, supported.routable, supported.handlers)?;
        }
    }
    Ok(builder.build())
}

/// The transport bindings the given features expose.
#[must_use]
pub fn endpoint_bindings(features: &[Arc<dyn Feature>]) -> Vec<EndpointBinding> {
    features
        .iter()
        .map(|feature| EndpointBinding {
            path: feature.endpoint(),
            behavior: feature.behavior(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
