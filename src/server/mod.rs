//! Stub serving side for the fixture.
//!
//! # Responsibilities
//! - Serve the three chain endpoints (`/foo`, `/bar`, `/baz`) as plain
//!   string bodies
//! - Serve the user-lookup API (`/external`, `/external/{id}`) as JSON
//! - Extract the B3 trace context from each request and record a marker
//!   line to the producer-side trace log
//!
//! # Design Decisions
//! - Requests without a parseable trace context are served but not
//!   recorded; the verification harness will flag the missing lines
//! - Unknown user ids return 404 with an empty body

use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::client::{BriefUser, UserDetail};
use crate::logging::TraceLog;
use crate::trace::propagation;

const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Shared state injected into handlers.
#[derive(Clone)]
struct StubState {
    log: TraceLog,
}

/// Stub HTTP server standing in for the downstream services.
pub struct StubServer {
    router: Router,
}

impl StubServer {
    /// Build the router; marker lines go to the given producer log.
    pub fn new(log: TraceLog) -> Self {
        let state = StubState { log };
        let router = Router::new()
            .route("/foo", get(serve_foo))
            .route("/bar", get(serve_bar))
            .route("/baz", get(serve_baz))
            .route("/external", get(list_users))
            .route("/external/{id}", get(user_detail))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(REQUEST_TIMEOUT_SECS)))
            .layer(TraceLayer::new_for_http());

        Self { router }
    }

    /// Serve until the listener closes.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "Stub server starting");
        axum::serve(listener, self.router).await
    }
}

/// Record a producer-side marker line for an instrumented request.
fn record(state: &StubState, headers: &HeaderMap, message: &str) {
    match propagation::extract(headers) {
        Some(ctx) => state.log.record(&ctx, message),
        None => tracing::warn!(message, "Request without trace context"),
    }
}

async fn serve_foo(State(state): State<StubState>, headers: HeaderMap) -> &'static str {
    record(&state, &headers, "serving [foo]");
    "foo"
}

async fn serve_bar(State(state): State<StubState>, headers: HeaderMap) -> &'static str {
    record(&state, &headers, "serving [bar]");
    "bar"
}

async fn serve_baz(State(state): State<StubState>, headers: HeaderMap) -> &'static str {
    record(&state, &headers, "serving [baz]");
    "baz"
}

async fn list_users(State(state): State<StubState>, headers: HeaderMap) -> Json<Vec<BriefUser>> {
    record(&state, &headers, "serving [user list]");
    Json(fixture_users())
}

async fn user_detail(
    State(state): State<StubState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    record(&state, &headers, &format!("serving [user {}]", id));
    match fixture_detail(&id) {
        Some(user) => Json(user).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

fn fixture_users() -> Vec<BriefUser> {
    vec![
        BriefUser { id: "1".to_string(), name: "Alice".to_string() },
        BriefUser { id: "2".to_string(), name: "Bob".to_string() },
    ]
}

fn fixture_detail(id: &str) -> Option<UserDetail> {
    fixture_users().into_iter().find(|u| u.id == id).map(|u| UserDetail {
        email: Some(format!("{}@example.com", u.name.to_lowercase())),
        id: u.id,
        name: u.name,
    })
}
