//! `Switchyard` server binary: CLI parsing, tracing setup, startup wiring,
//! and graceful shutdown on SIGINT.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use switchyard_server::dispatch::{DispatchStats, Dispatcher};
use switchyard_server::features::{
    build_registry, endpoint_bindings, standard_features, BootstrapOptions, ServiceSettings,
};
use switchyard_server::network::{NetworkConfig, ServerModule, TlsConfig};

#[derive(Debug, Parser)]
#[command(name = "switchyard-server", version, about = "Versioned command-dispatch server")]
struct Cli {
    /// Bind address.
    #[arg(long, env = "SWITCHYARD_HOST", default_value = "0.0.0.0")]
    host: String,

    /// Port to listen on (0 = OS-assigned).
    #[arg(long, env = "SWITCHYARD_PORT", default_value_t = 8080)]
    port: u16,

    /// Allowed CORS origins (comma-separated). Defaults to any origin.
    #[arg(long, env = "SWITCHYARD_CORS_ORIGINS", value_delimiter = ',')]
    cors_origins: Vec<String>,

    /// Maximum request processing time in seconds.
    #[arg(long, env = "SWITCHYARD_REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    request_timeout_secs: u64,

    /// Instrument every dispatched command with timing spans.
    #[arg(long, env = "SWITCHYARD_DEBUG_MODE")]
    debug_mode: bool,

    /// Register the echo feature used by acceptance tests.
    #[arg(long, env = "SWITCHYARD_ACCEPTANCE_TEST_MODE")]
    acceptance_test_mode: bool,

    /// Emit logs as JSON.
    #[arg(long, env = "SWITCHYARD_LOG_JSON")]
    log_json: bool,

    /// Path to the TLS certificate file.
    #[arg(long, env = "SWITCHYARD_TLS_CERT", requires = "tls_key")]
    tls_cert: Option<PathBuf>,

    /// Path to the TLS private key file.
    #[arg(long, env = "SWITCHYARD_TLS_KEY", requires = "tls_cert")]
    tls_key: Option<PathBuf>,
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let options = BootstrapOptions {
        debug_mode: cli.debug_mode,
        acceptance_test_mode: cli.acceptance_test_mode,
    };
    let settings = ServiceSettings {
        service_name: "switchyard".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        host: cli.host.clone(),
        port: cli.port,
        request_timeout_secs: cli.request_timeout_secs,
        debug_mode: cli.debug_mode,
        acceptance_test_mode: cli.acceptance_test_mode,
    };

    let stats = Arc::new(DispatchStats::new());
    let features = standard_features(options, Arc::clone(&stats), settings);
    // A duplicate behavior is a startup configuration conflict: refuse to run
    // with an ambiguous routing table.
    let registry = build_registry(&features, options)?;
    let dispatcher = Arc::new(Dispatcher::new(Arc::new(registry), stats));

    let tls = match (cli.tls_cert, cli.tls_key) {
        (Some(cert_path), Some(key_path)) => Some(TlsConfig {
            cert_path,
            key_path,
        }),
        _ => None,
    };
    let config = NetworkConfig {
        host: cli.host,
        port: cli.port,
        tls,
        cors_origins: if cli.cors_origins.is_empty() {
            vec!["*".to_string()]
        } else {
            cli.cors_origins
        },
        request_timeout: Duration::from_secs(cli.request_timeout_secs),
    };

    let mut module = ServerModule::new(config, dispatcher, endpoint_bindings(&features));
    let port = module.start().await?;
    info!(port, "switchyard server started");

    module
        .serve(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("SIGINT received, shutting down");
        })
        .await
}
