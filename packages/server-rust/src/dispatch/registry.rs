//! Build-once behavior registry.
//!
//! The registry maps each [`BehaviorKey`] to its routable plus the handler
//! chain composed around it. It is assembled by [`RegistryBuilder`] during
//! startup and read-only for the process lifetime, so dispatch needs no
//! locking. Registering a key twice is a startup configuration conflict: the
//! builder rejects it rather than silently shadowing a competing feature.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;
use switchyard_core::BehaviorKey;

use super::chain::{compose, ExecuteFn, Execution, Handler};
use super::routable::Routable;

/// Errors surfaced while assembling a registry.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("behavior already registered: {0}")]
    DuplicateBehavior(BehaviorKey),
}

// ---------------------------------------------------------------------------
// Route
// ---------------------------------------------------------------------------

/// A registered routable with its chain composed around it.
pub struct Route {
    routable: Arc<dyn Routable>,
    chain: ExecuteFn,
}

impl Route {
    /// Zero-valued request shape for this behavior.
    #[must_use]
    pub fn empty_request(&self) -> Value {
        self.routable.empty_request()
    }

    /// Strictly decodes `content` into this behavior's request shape.
    ///
    /// # Errors
    ///
    /// Returns the underlying decode error on type mismatch or non-object
    /// content.
    pub fn decode_request(&self, content: &Value) -> Result<Value, serde_json::Error> {
        self.routable.decode_request(content)
    }

    /// Executes the composed chain on a decoded request.
    #[must_use]
    pub fn execute(&self, request: &Value) -> Execution {
        (self.chain)(request)
    }
}

// ---------------------------------------------------------------------------
// RegistryBuilder
// ---------------------------------------------------------------------------

/// Assembles a [`DispatchRegistry`] during startup.
///
/// Global handlers wrap every registered behavior outermost; per-behavior
/// handlers (validation) compose inside them. Each chain is folded exactly
/// once, at registration time.
pub struct RegistryBuilder {
    global_handlers: Vec<Arc<dyn Handler>>,
    routes: HashMap<BehaviorKey, Route>,
}

impl RegistryBuilder {
    /// Creates a builder with no global handlers.
    #[must_use]
    pub fn new() -> Self {
        Self::with_global_handlers(Vec::new())
    }

    /// Creates a builder whose handlers wrap every registered behavior.
    #[must_use]
    pub fn with_global_handlers(global_handlers: Vec<Arc<dyn Handler>>) -> Self {
        Self {
            global_handlers,
            routes: HashMap::new(),
        }
    }

    /// Associates a behavior with a routable and its per-behavior handlers.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateBehavior`] if the key is already
    /// registered; the service must refuse to start rather than run with an
    /// ambiguous routing table.
    pub fn register(
        &mut self,
        behavior: BehaviorKey,
        routable: Arc<dyn Routable>,
        handlers: Vec<Arc<dyn Handler>>,
    ) -> Result<(), RegistryError> {
        if self.routes.contains_key(&behavior) {
            return Err(RegistryError::DuplicateBehavior(behavior));
        }

        let mut chain_handlers = self.global_handlers.clone();
        chain_handlers.extend(handlers);

        let terminal: ExecuteFn = {
            let routable = Arc::clone(&routable);
            Box::new(move |request: &Value| routable.execute(request))
        };
        let chain = compose(&behavior, &chain_handlers, terminal);

        self.routes.insert(behavior, Route { routable, chain });
        Ok(())
    }

    /// Finalizes the immutable registry.
    #[must_use]
    pub fn build(self) -> DispatchRegistry {
        DispatchRegistry {
            routes: self.routes,
        }
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// DispatchRegistry
// ---------------------------------------------------------------------------

/// Immutable behavior lookup table, shared read-only across request threads.
pub struct DispatchRegistry {
    routes: HashMap<BehaviorKey, Route>,
}

impl DispatchRegistry {
    /// Pure lookup; `None` signals a routing failure, not a crash.
    #[must_use]
    pub fn resolve(&self, behavior: &BehaviorKey) -> Option<&Route> {
        self.routes.get(behavior)
    }

    /// Number of registered behaviors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// True when nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
