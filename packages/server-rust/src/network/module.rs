//! Server module with deferred startup lifecycle.
//!
//! `new()` allocates shared state, `start()` binds the TCP listener, and
//! `serve()` accepts connections until shutdown is signalled. The split lets
//! the binary wire the dispatcher and features between construction and
//! listening.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::State;
use axum::routing::{get, post};
use axum::Router;
use bytes::Bytes;
use switchyard_core::BehaviorKey;
use tokio::net::TcpListener;
use tracing::{info, warn};

use super::config::NetworkConfig;
use super::handlers::{
    batch_request, command_request, health_handler, liveness_handler, readiness_handler, AppState,
};
use super::middleware::apply_http_middleware;
use super::shutdown::ShutdownController;
use crate::dispatch::Dispatcher;
use crate::features::EndpointBinding;

/// Path of the batch endpoint.
pub const BATCH_ENDPOINT: &str = "/api/v2/batch";

/// Manages the full HTTP server lifecycle.
///
/// 1. `new()` -- allocates the shutdown controller and captures the wiring
/// 2. `start()` -- binds the TCP listener to the configured address
/// 3. `serve()` -- accepts connections until the shutdown future completes
pub struct ServerModule {
    config: NetworkConfig,
    listener: Option<TcpListener>,
    shutdown: Arc<ShutdownController>,
    dispatcher: Arc<Dispatcher>,
    bindings: Vec<EndpointBinding>,
}

impl ServerModule {
    /// Creates a server module without binding any port.
    #[must_use]
    pub fn new(
        config: NetworkConfig,
        dispatcher: Arc<Dispatcher>,
        bindings: Vec<EndpointBinding>,
    ) -> Self {
        Self {
            config,
            listener: None,
            shutdown: Arc::new(ShutdownController::new()),
            dispatcher,
            bindings,
        }
    }

    /// Returns a shared reference to the shutdown controller.
    #[must_use]
    pub fn shutdown_controller(&self) -> Arc<ShutdownController> {
        Arc::clone(&self.shutdown)
    }

    /// Assembles the axum router with all routes and middleware.
    ///
    /// Routes:
    /// - `GET /health`, `/health/live`, `/health/ready` -- probes
    /// - `POST /api/v2/batch` -- batch dispatch
    /// - `POST <feature endpoint>` -- one route per registered feature
    #[must_use]
    pub fn build_router(&self) -> Router {
        let state = AppState {
            dispatcher: Arc::clone(&self.dispatcher),
            shutdown: Arc::clone(&self.shutdown),
            start_time: Instant::now(),
        };

        let mut router = Router::new()
            .route("/health", get(health_handler))
            .route("/health/live", get(liveness_handler))
            .route("/health/ready", get(readiness_handler))
            .route(BATCH_ENDPOINT, post(batch_request));

        for binding in &self.bindings {
            let behavior = binding.behavior.clone();
            router = router.route(
                binding.path,
                post(move |State(state): State<AppState>, body: Bytes| {
                    let behavior: BehaviorKey = behavior.clone();
                    async move { command_request(state, behavior, body).await }
                }),
            );
        }

        apply_http_middleware(router.with_state(state), &self.config)
    }

    /// Binds the TCP listener to the configured host and port.
    ///
    /// Returns the actual bound port, which may differ from the configured
    /// port when port 0 is used (OS-assigned ephemeral port).
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound (e.g., port in use).
    pub async fn start(&mut self) -> anyhow::Result<u16> {
        let addr = format!("{}:{}", self.config.host, self.config.port);
        let listener = TcpListener::bind(&addr).await?;
        let port = listener.local_addr()?.port();

        info!("TCP listener bound to {}:{}", self.config.host, port);

        self.listener = Some(listener);
        Ok(port)
    }

    /// Serves connections until the shutdown future completes, then drains
    /// in-flight requests for up to 30 seconds.
    ///
    /// # Errors
    ///
    /// Returns an error on fatal I/O failures or unloadable TLS material.
    ///
    /// # Panics
    ///
    /// Panics if `start()` was not called before `serve()`.
    pub async fn serve(
        self,
        shutdown: impl Future<Output = ()> + Send + 'static,
    ) -> anyhow::Result<()> {
        let router = self.build_router();
        let listener = self
            .listener
            .expect("start() must be called before serve()");
        let shutdown_ctrl = self.shutdown;
        let tls = self.config.tls;

        // Transition to Ready so readiness probes pass.
        shutdown_ctrl.set_ready();

        if let Some(tls_config) = tls {
            serve_tls(listener, router, &tls_config, shutdown_ctrl, shutdown).await
        } else {
            serve_plain(listener, router, shutdown_ctrl, shutdown).await
        }
    }
}

/// Serves plain HTTP connections using axum's built-in server.
async fn serve_plain(
    listener: TcpListener,
    router: Router,
    shutdown_ctrl: Arc<ShutdownController>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    info!("Serving plain HTTP connections");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await?;

    drain(shutdown_ctrl).await;
    Ok(())
}

/// Serves TLS connections using `axum-server` with rustls, reusing the
/// pre-bound listener.
async fn serve_tls(
    listener: TcpListener,
    router: Router,
    tls_config: &super::config::TlsConfig,
    shutdown_ctrl: Arc<ShutdownController>,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> anyhow::Result<()> {
    use axum_server::tls_rustls::RustlsConfig;

    let rustls_config = RustlsConfig::from_pem_file(&tls_config.cert_path, &tls_config.key_path)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to load TLS certificates: {e}"))?;

    let addr = listener.local_addr()?;
    let std_listener = listener.into_std()?;
    let handle = axum_server::Handle::new();
    let shutdown_handle = handle.clone();

    tokio::spawn(async move {
        shutdown.await;
        shutdown_handle.graceful_shutdown(None);
    });

    info!("Serving TLS connections on {}", addr);

    axum_server::from_tcp_rustls(std_listener, rustls_config)
        .handle(handle)
        .serve(router.into_make_service())
        .await?;

    drain(shutdown_ctrl).await;
    Ok(())
}

/// Waits for in-flight requests to finish and records the final state.
async fn drain(shutdown_ctrl: Arc<ShutdownController>) {
    shutdown_ctrl.trigger_shutdown();

    let drained = shutdown_ctrl.wait_for_drain(Duration::from_secs(30)).await;
    if drained {
        info!("All in-flight requests drained");
    } else {
        warn!("Drain timeout expired with in-flight requests remaining");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::dispatch::DispatchStats;
    use crate::features::{
        build_registry, endpoint_bindings, standard_features, BootstrapOptions, ServiceSettings,
    };

    fn test_module(options: BootstrapOptions) -> ServerModule {
        let stats = Arc::new(DispatchStats::new());
        let features = standard_features(options, Arc::clone(&stats), ServiceSettings::default());
        let registry = build_registry(&features, options).expect("no duplicate behaviors");
        let dispatcher = Arc::new(Dispatcher::new(Arc::new(registry), stats));
        ServerModule::new(NetworkConfig::default(), dispatcher, endpoint_bindings(&features))
    }

    fn test_router() -> Router {
        test_module(BootstrapOptions {
            acceptance_test_mode: true,
            ..BootstrapOptions::default()
        })
        .build_router()
    }

    async fn send(router: Router, method: Method, path: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(method)
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        if bytes.is_empty() {
            return (status, Value::Null);
        }
        assert!(
            content_type.starts_with("application/json"),
            "expected JSON content type, got {content_type:?}"
        );
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn post(router: Router, path: &str, body: Value) -> (StatusCode, Value) {
        send(router, Method::POST, path, body).await
    }

    #[tokio::test]
    async fn ping_single_request_succeeds() {
        let (status, body) =
            post(test_router(), "/api/v2/ping", json!({"requestId": "abc"})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"requestId": "abc", "statusCode": 0}));
    }

    #[tokio::test]
    async fn ping_rejects_wrong_method() {
        let (status, _) = send(
            test_router(),
            Method::GET,
            "/api/v2/ping",
            json!({"requestId": "abc"}),
        )
        .await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn unknown_path_is_not_found() {
        let (status, _) = post(test_router(), "/api/v2/nope", json!({})).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn ping_array_is_multi_status_in_order() {
        let (status, body) = post(
            test_router(),
            "/api/v2/ping",
            json!([{"requestId": "abc"}, {"requestId": "def"}]),
        )
        .await;
        assert_eq!(status, StatusCode::MULTI_STATUS);
        assert_eq!(
            body,
            json!([
                {"requestId": "abc", "statusCode": 0},
                {"requestId": "def", "statusCode": 0},
            ])
        );
    }

    #[tokio::test]
    async fn ping_empty_request_id_is_bad_request() {
        let (status, body) = post(test_router(), "/api/v2/ping", json!({"requestId": ""})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["statusCode"], json!(4));
    }

    #[tokio::test]
    async fn version_reports_crate_version() {
        let (status, body) =
            post(test_router(), "/api/v2/version", json!({"requestId": "abc"})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["version"], json!(env!("CARGO_PKG_VERSION")));
        assert_eq!(body["requestId"], json!("abc"));
    }

    #[tokio::test]
    async fn metrics_reports_counters() {
        let (status, body) =
            post(test_router(), "/api/v2/metrics", json!({"requestId": "abc"})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["statusCode"], json!(0));
        // The metrics request itself is the only dispatched command.
        assert_eq!(body["commandsDispatched"], json!(1));
        assert_eq!(body["commandsFailed"], json!(0));
    }

    #[tokio::test]
    async fn config_reports_settings_snapshot() {
        let (status, body) =
            post(test_router(), "/api/v2/config", json!({"requestId": "abc"})).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["config"]["serviceName"], json!("switchyard"));
    }

    #[tokio::test]
    async fn echo_round_trips_message() {
        let (status, body) = post(
            test_router(),
            "/api/v2/echo",
            json!({"message": "hello", "delayMs": 0}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"message": "hello"}));
    }

    #[tokio::test]
    async fn echo_is_absent_outside_acceptance_test_mode() {
        let router = test_module(BootstrapOptions::default()).build_router();
        let (status, _) = post(router, "/api/v2/echo", json!({"message": "x"})).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn batch_dispatches_items_and_preserves_metadata() {
        let (status, body) = post(
            test_router(),
            "/api/v2/batch",
            json!([
                {
                    "version": "v2", "kind": "ping", "action": "command",
                    "strategy": "synchronous", "content": {"requestId": "abc"},
                },
                {
                    "version": "v2", "kind": "echo", "action": "command",
                    "strategy": "synchronous", "content": {"message": "hi"},
                },
            ]),
        )
        .await;

        assert_eq!(status, StatusCode::MULTI_STATUS);
        let items = body.as_array().unwrap();
        assert_eq!(items[0]["kind"], json!("ping"));
        assert_eq!(items[0]["content"], json!({"requestId": "abc", "statusCode": 0}));
        assert_eq!(items[1]["content"], json!({"message": "hi"}));
    }

    #[tokio::test]
    async fn empty_batch_is_multi_status() {
        let (status, body) = post(test_router(), "/api/v2/batch", json!([])).await;
        assert_eq!(status, StatusCode::MULTI_STATUS);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn batch_object_payload_is_bad_request() {
        let (status, body) =
            post(test_router(), "/api/v2/batch", json!({"requestId": "abc"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["statusCode"], json!(1));
    }

    #[tokio::test]
    async fn batch_isolates_failing_items() {
        let (status, body) = post(
            test_router(),
            "/api/v2/batch",
            json!([
                {
                    "version": "v2", "kind": "ping", "action": "command",
                    "strategy": "synchronous", "content": {"requestId": "abc"},
                },
                {
                    "version": "v9", "kind": "mystery", "action": "command",
                    "strategy": "synchronous", "content": {"requestId": "def"},
                },
            ]),
        )
        .await;

        assert_eq!(status, StatusCode::MULTI_STATUS);
        let items = body.as_array().unwrap();
        assert_eq!(items[0]["content"]["statusCode"], json!(0));
        assert_eq!(items[1]["content"]["statusCode"], json!(3));
    }

    #[tokio::test]
    async fn health_endpoints_respond() {
        let module = test_module(BootstrapOptions::default());
        module.shutdown_controller().set_ready();
        let router = module.build_router();

        let (status, body) = send(router.clone(), Method::GET, "/health", Value::Null).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["state"], json!("ready"));

        let (status, _) = send(router.clone(), Method::GET, "/health/live", Value::Null).await;
        assert_eq!(status, StatusCode::OK);

        let (status, _) = send(router, Method::GET, "/health/ready", Value::Null).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn readiness_fails_before_ready() {
        let router = test_router();
        let (status, _) = send(router, Method::GET, "/health/ready", Value::Null).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn start_binds_to_os_assigned_port() {
        let mut module = test_module(BootstrapOptions::default());
        let port = module.start().await.expect("start should succeed");
        assert!(port > 0, "OS-assigned port should be > 0");
        assert!(module.listener.is_some());
    }

    #[tokio::test]
    #[should_panic(expected = "start() must be called before serve()")]
    async fn serve_panics_without_start() {
        let module = test_module(BootstrapOptions::default());
        let _ = module.serve(std::future::pending::<()>()).await;
    }
}
