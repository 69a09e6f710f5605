use axum::{
    extract::{MatchedPath, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{Instrument, Span, info, info_span};
use uuid::Uuid;

use crate::api::AppState;

/// Response extension set by the auth middleware so the request span can
/// carry the logged-in user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser(pub i32);

/// GET /metrics
pub async fn get_metrics(State(state): State<Arc<AppState>>) -> Response {
    match &state.prometheus_handle {
        Some(handle) => handle.render().into_response(),
        None => (StatusCode::NOT_FOUND, "Metrics are disabled").into_response(),
    }
}

fn request_span(req: &Request, route: Option<&str>) -> Span {
    info_span!(
        "request",
        request_id = %Uuid::new_v4(),
        method = %req.method(),
        path = %req.uri().path(),
        route = route.unwrap_or_default(),
        user_id = tracing::field::Empty,
    )
}

fn record(method: &str, route: Option<&str>, status: StatusCode, elapsed: Duration) {
    // Unmatched paths share one label so scanners cannot inflate cardinality.
    let labels = [
        ("method", method.to_string()),
        ("path", route.unwrap_or("unmatched").to_string()),
        ("status", status.as_u16().to_string()),
    ];

    metrics::counter!("http_requests_total", &labels).increment(1);
    metrics::histogram!("http_request_duration_seconds", &labels).record(elapsed.as_secs_f64());
}

/// Wraps every request in a span carrying a fresh request id and records
/// request counters and latency per route template.
pub async fn track_requests(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|mp| mp.as_str().to_string());
    let span = request_span(&req, route.as_deref());

    async move {
        let response = next.run(req).await;
        if let Some(AuthenticatedUser(user_id)) = response.extensions().get() {
            Span::current().record("user_id", *user_id);
        }
        let elapsed = start.elapsed();
        let status = response.status();

        record(&method, route.as_deref(), status, elapsed);

        let outcome = if status.is_server_error() {
            "error"
        } else if status.is_client_error() {
            "client_error"
        } else {
            "success"
        };
        info!(
            duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX),
            status_code = status.as_u16(),
            outcome,
            "Request finished"
        );

        response
    }
    .instrument(span)
    .await
}
