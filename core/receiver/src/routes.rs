//! HTTP surface.
//!
//! ```text
//! GET  /health                     → {"status":"ok","mappings":N,"idle_seconds":S}
//! POST /register   {"pane_id"}     → {"status":"registered","mapping_key":K}
//! POST /unregister {"pane_id"}     → {"status":"unregistered"}
//! POST /v1/logs | /v1/traces | /   → {"status":"ok"}   (always, even for garbage)
//! ```
//!
//! Anything else answers `{"status":"ok"}` to POST and 404 otherwise. Every
//! request counts as activity for idle shutdown.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::{Body, Bytes},
    extract::{DefaultBodyLimit, Request, State},
    http::{Method, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use futures_util::StreamExt;
use tmux_stat_core::otlp::parse_envelope;
use tmux_stat_core::{Multiplexer, StateStore};
use tracing::{debug, info, warn};

use crate::activity::ActivityClock;
use crate::ingest::ingest;
use crate::protocol::{
    parse_body, require_pane_id, ErrorReply, HealthReply, RegisterRequest, RegisteredReply,
    StatusReply, UnregisterRequest, MAX_REQUEST_BYTES,
};
use crate::registry::RegistrationTable;

/// Upper bound on blocking work done for a single request.
const HANDLER_TIMEOUT: Duration = Duration::from_secs(5);

pub struct AppState {
    pub registry: RegistrationTable,
    pub activity: ActivityClock,
    pub store: StateStore,
    pub mux: Arc<dyn Multiplexer>,
}

impl AppState {
    pub fn new(store: StateStore, mux: Arc<dyn Multiplexer>) -> Self {
        Self {
            registry: RegistrationTable::default(),
            activity: ActivityClock::default(),
            store,
            mux,
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/register",
            post(register).layer(DefaultBodyLimit::max(MAX_REQUEST_BYTES)),
        )
        .route(
            "/unregister",
            post(unregister).layer(DefaultBodyLimit::max(MAX_REQUEST_BYTES)),
        )
        .route("/v1/logs", post(telemetry))
        .route("/v1/traces", post(telemetry))
        .route("/", post(telemetry))
        .fallback(fallback)
        .method_not_allowed_fallback(fallback)
        .layer(middleware::from_fn_with_state(
            Arc::clone(&state),
            track_activity,
        ))
        .with_state(state)
}

async fn track_activity(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;
    state.activity.touch();
    response
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthReply> {
    let idle_seconds = i64::try_from(state.activity.idle_for().as_secs()).unwrap_or(i64::MAX);
    Json(HealthReply {
        status: "ok",
        mappings: state.registry.len(),
        idle_seconds,
    })
}

async fn register(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let request: RegisterRequest = match parse_body(&body) {
        Ok(request) => request,
        Err(err) => return bad_request(err),
    };
    let pane_id = match require_pane_id(request.pane_id) {
        Ok(pane_id) => pane_id,
        Err(err) => return bad_request(err),
    };

    match state
        .registry
        .register(&pane_id, request.conversation_id, Utc::now().timestamp())
    {
        Ok(mapping_key) => {
            info!(pane = %pane_id, registered = state.registry.len(), "Pane registered");
            Json(RegisteredReply {
                status: "registered",
                mapping_key,
            })
            .into_response()
        }
        Err(err) => bad_request(ErrorReply::new(err.to_string())),
    }
}

async fn unregister(State(state): State<Arc<AppState>>, body: Bytes) -> Response {
    let request: UnregisterRequest = match parse_body(&body) {
        Ok(request) => request,
        Err(err) => return bad_request(err),
    };
    let pane_id = match require_pane_id(request.pane_id) {
        Ok(pane_id) => pane_id,
        Err(err) => return bad_request(err),
    };

    let was_registered = state.registry.unregister(&pane_id);
    info!(pane = %pane_id, was_registered, "Pane unregistered");

    let worker = Arc::clone(&state);
    let cleanup = tokio::task::spawn_blocking(move || {
        if let Err(err) = worker.store.remove(&pane_id) {
            warn!(error = %err, pane = %pane_id, "Failed to remove state on unregister");
        }
        worker.mux.refresh_status();
    });
    if tokio::time::timeout(HANDLER_TIMEOUT, cleanup).await.is_err() {
        warn!("Unregister cleanup timed out");
    }

    Json(StatusReply::UNREGISTERED).into_response()
}

async fn telemetry(State(state): State<Arc<AppState>>, body: Body) -> Json<StatusReply> {
    let Some(body) = read_capped(body, MAX_REQUEST_BYTES).await else {
        return Json(StatusReply::OK);
    };

    let worker = Arc::clone(&state);
    let task = tokio::task::spawn_blocking(move || {
        let events = parse_envelope(&body);
        ingest(
            &events,
            &worker.registry,
            &worker.store,
            worker.mux.as_ref(),
            Utc::now().timestamp(),
        )
    });

    match tokio::time::timeout(HANDLER_TIMEOUT, task).await {
        Ok(Ok(summary)) => debug!(
            events = summary.events,
            classified = summary.classified,
            writes = summary.writes,
            "Telemetry processed"
        ),
        Ok(Err(err)) => warn!(error = %err, "Telemetry processing failed"),
        Err(_) => warn!("Telemetry processing timed out"),
    }

    // The exporter must never see a failure, whatever we made of the payload.
    Json(StatusReply::OK)
}

/// Reads the whole body, keeping it only when it fits in `limit` bytes.
///
/// Oversized bodies are still drained so the exporter gets its 200 instead
/// of a reset connection.
async fn read_capped(body: Body, limit: usize) -> Option<Vec<u8>> {
    let mut stream = body.into_data_stream();
    let mut buffer = Vec::new();
    let mut overflowed = false;

    while let Some(chunk) = stream.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(err) => {
                warn!(error = %err, "Failed to read telemetry body");
                return None;
            }
        };
        if overflowed {
            continue;
        }
        if buffer.len() + chunk.len() > limit {
            overflowed = true;
            buffer = Vec::new();
        } else {
            buffer.extend_from_slice(&chunk);
        }
    }

    if overflowed {
        warn!(limit, "Discarding oversized telemetry body");
        return None;
    }
    Some(buffer)
}

async fn fallback(method: Method) -> Response {
    if method == Method::POST {
        Json(StatusReply::OK).into_response()
    } else {
        (StatusCode::NOT_FOUND, Json(ErrorReply::new("not found"))).into_response()
    }
}

fn bad_request(err: ErrorReply) -> Response {
    (StatusCode::BAD_REQUEST, Json(err)).into_response()
}
