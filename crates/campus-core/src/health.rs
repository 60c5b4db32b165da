use axum::http::StatusCode;

/// Handler for `GET /healthz`, the liveness check. Services provide their own readiness probe.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}
