use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;

use crate::domain::types::{CurrentAccount, RequestOrigin};
use crate::error::AuthServiceError;
use crate::state::AppState;
use crate::usecase::account::{ChangePasswordInput, ChangePasswordUseCase};

// ── PATCH /auth/password ──────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Other sessions stay valid; they expire on their own TTL.
pub async fn change_password(
    State(state): State<AppState>,
    current: CurrentAccount,
    origin: RequestOrigin,
    Json(body): Json<ChangePasswordRequest>,
) -> Result<StatusCode, AuthServiceError> {
    let usecase = ChangePasswordUseCase {
        accounts: state.account_store(),
        audit: state.audit_sink(),
    };
    usecase
        .execute(
            &current,
            ChangePasswordInput {
                current_password: body.current_password,
                new_password: body.new_password,
            },
            &origin,
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
