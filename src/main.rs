//! Trace propagation fixture (end-to-end run)
//!
//! Demonstrates that one trace id survives three sequential non-blocking
//! HTTP calls and shows up consistently in both log streams.
//!
//! # Flow
//!
//! ```text
//!                    ┌──────────────────────────────────────────────┐
//!                    │                 FIXTURE RUN                  │
//!                    │                                              │
//!  start span ───────┼─▶ GET /foo ──▶ GET /bar ──▶ GET /baz         │
//!  (trace id T)      │      │            │            │             │
//!                    │      ▼            ▼            ▼             │
//!                    │  stub server logs T to the producer stream   │
//!                    │  chain logs T to the test stream             │
//!                    │                                              │
//!  finish span ──────┼─▶ verify: both streams agree on exactly T    │
//!                    └──────────────────────────────────────────────┘
//! ```
//!
//! Exits nonzero if the chain fails or the log streams disagree.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use trace_chain::config::{load_config, ChainConfig};
use trace_chain::logging::TraceLog;
use trace_chain::trace::Tracer;
use trace_chain::{verify, CallChain, StubServer, UserClient};

#[derive(Parser)]
#[command(name = "trace-chain")]
#[command(about = "Trace id propagation fixture across chained HTTP calls", long_about = None)]
struct Cli {
    /// Path to a TOML config file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the stub server listening port.
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trace_chain=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("trace-chain v0.1.0 starting");

    let cli = Cli::parse();
    let mut config = match cli.config {
        Some(path) => load_config(&path)?,
        None => ChainConfig::default(),
    };
    if let Some(port) = cli.port {
        config.listener.port = port;
    }

    tracing::info!(
        address = %config.socket_addr(),
        sampler = ?config.trace.sampler,
        marker = %config.trace.marker,
        "Configuration loaded"
    );

    let marker = config.trace.marker.clone();
    let producer_log = TraceLog::create(&config.logs.producer_path, &marker)?;
    let test_log = TraceLog::create(&config.logs.test_path, &marker)?;

    // Stub serving side
    let listener = TcpListener::bind(config.socket_addr()).await?;
    tracing::info!(address = %listener.local_addr()?, "Stub services listening");
    let server = StubServer::new(producer_log.clone());
    tokio::spawn(async move {
        if let Err(e) = server.run(listener).await {
            tracing::error!(error = %e, "Stub server failed");
        }
    });

    // Run the chain
    let tracer = Tracer::new(config.trace.sampler);
    let chain = CallChain::new(config.chain_urls()?, tracer.clone(), test_log.clone());
    let outcome = chain.run().await?;
    tracing::info!(
        result = %outcome.result,
        trace_id = %outcome.trace_id,
        "Chain completed"
    );

    // Verify both streams agree on the chain's trace id
    let wait = Duration::from_secs(2);
    verify::wait_for_marker(producer_log.path(), &marker, wait).await?;
    verify::wait_for_marker(test_log.path(), &marker, wait).await?;
    verify::verify_streams(
        &outcome.trace_id,
        &[producer_log.path(), test_log.path()],
        &marker,
    )?;
    tracing::info!(trace_id = %outcome.trace_id, "Log streams agree on one trace id");

    // Exercise the user-lookup client under its own span
    let mut span = tracer.start_span("user-lookup");
    let client = UserClient::new(config.user_api_url()?);
    let users = client.list_users(span.context()).await?;
    tracing::info!(count = users.len(), "Listed users");
    if let Some(first) = users.first() {
        let detail = client.user_detail(span.context(), &first.id).await?;
        tracing::info!(id = %detail.id, name = %detail.name, "Fetched user detail");
    }
    span.finish();

    tracing::info!("Fixture run passed");
    Ok(())
}
