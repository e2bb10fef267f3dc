//! tmux-stat-receiver entrypoint.
//!
//! A local OTLP/HTTP endpoint for Codex telemetry. Codex has no hook system,
//! so its exporter posts logs and traces here; classified events are written
//! to the state files of every pane registered via `/register`.
//!
//! The receiver is started on demand by the launcher and exits on its own
//! once no request has arrived for the idle timeout.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use clap::Parser;
use tmux_stat_core::config::debug_log_enabled;
use tmux_stat_core::{CommandTmux, StateStore};
use tokio::signal::unix::{signal, Signal, SignalKind};
use tokio::sync::oneshot;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

mod activity;
mod config;
mod ingest;
mod marker;
mod protocol;
mod registry;
mod routes;

use config::{Args, Config};
use marker::LivenessMarker;
use registry::STALE_REGISTRATION_SECS;
use routes::AppState;

#[tokio::main]
async fn main() {
    init_logging();

    let config = match Config::from_args(Args::parse()) {
        Ok(config) => config,
        Err(err) => {
            error!(error = %err, "Invalid receiver configuration");
            std::process::exit(1);
        }
    };

    let store = match StateStore::open(&config.state_dir) {
        Ok(store) => store,
        Err(err) => {
            error!(error = %err, "Failed to prepare state directory");
            std::process::exit(1);
        }
    };

    let addr = SocketAddr::from(([127, 0, 0, 1], config.port));
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!(error = %err, %addr, "Failed to bind receiver port");
            std::process::exit(1);
        }
    };

    // Installed before the marker exists, so a SIGTERM can never skip its removal.
    let mut terminate = match signal(SignalKind::terminate()) {
        Ok(terminate) => Some(terminate),
        Err(err) => {
            warn!(error = %err, "Failed to install SIGTERM handler");
            None
        }
    };

    let marker = match LivenessMarker::create(&config.state_dir) {
        Ok(marker) => marker,
        Err(err) => {
            error!(error = %err, "Failed to write liveness marker");
            std::process::exit(1);
        }
    };

    let state = Arc::new(AppState::new(store, Arc::new(CommandTmux)));
    let (idle_tx, idle_rx) = oneshot::channel();
    tokio::spawn(watch_idle(
        Arc::clone(&state),
        config.idle_timeout,
        config.check_interval,
        idle_tx,
    ));

    info!(
        %addr,
        state_dir = %config.state_dir.display(),
        marker = %marker.path().display(),
        idle_timeout_secs = config.idle_timeout.as_secs(),
        "Receiver started"
    );

    let shutdown = async move {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => info!("Interrupted; shutting down"),
            _ = terminated(terminate.as_mut()) => info!("Terminated; shutting down"),
            _ = idle_rx => info!("Idle timeout reached; shutting down"),
        }
    };

    if let Err(err) = axum::serve(listener, routes::router(state))
        .with_graceful_shutdown(shutdown)
        .await
    {
        error!(error = %err, "Receiver server failed");
    }

    drop(marker);
    info!("Receiver stopped");
}

async fn terminated(terminate: Option<&mut Signal>) {
    match terminate {
        Some(terminate) => {
            terminate.recv().await;
        }
        None => std::future::pending().await,
    }
}

/// Prunes stale registrations and fires `idle_tx` once the receiver has gone
/// unused for longer than `idle_timeout`.
async fn watch_idle(
    state: Arc<AppState>,
    idle_timeout: Duration,
    check_interval: Duration,
    idle_tx: oneshot::Sender<()>,
) {
    let mut ticker = tokio::time::interval(check_interval);
    // The first tick completes immediately.
    ticker.tick().await;

    loop {
        ticker.tick().await;

        let pruned = state
            .registry
            .prune_stale(Utc::now().timestamp(), STALE_REGISTRATION_SECS);
        if pruned > 0 {
            info!(pruned, "Pruned stale registrations");
        }

        let now = activity::now_ms();
        debug!(idle_secs = state.activity.idle_for_at(now).as_secs(), "Idle check");
        if state.activity.is_idle_at(now, idle_timeout) {
            let _ = idle_tx.send(());
            return;
        }
    }
}

fn init_logging() {
    let filter = if debug_log_enabled() {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
