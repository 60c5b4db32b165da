use anyhow::Context as _;
use axum::{extract::State, http::StatusCode};

use crate::error::AuthServiceError;
use crate::state::AppState;

/// `GET /readyz`: ready once both Postgres and Redis answer.
pub async fn readyz(State(state): State<AppState>) -> Result<StatusCode, AuthServiceError> {
    state.db.ping().await.context("postgres ping")?;
    state.kv_store().ping().await?;
    Ok(StatusCode::OK)
}
