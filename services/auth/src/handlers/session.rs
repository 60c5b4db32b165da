use axum::{
    Json,
    extract::{FromRequestParts, State},
    http::{StatusCode, request::Parts},
    response::IntoResponse,
};
use axum_extra::extract::CookieJar;
use serde::Serialize;

use campus_auth_types::{cookie::clear_session_cookie, identity::presented_token};
use campus_domain::id::AccountId;

use crate::domain::types::{CurrentAccount, RequestOrigin};
use crate::error::AuthServiceError;
use crate::state::AppState;
use crate::usecase::session::{LogoutUseCase, SessionResolver};

impl FromRequestParts<AppState> for CurrentAccount {
    type Rejection = AuthServiceError;

    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let token = presented_token(&parts.headers);
        let state = state.clone();

        async move {
            let token = token.ok_or(AuthServiceError::InvalidSession)?;
            let resolver = SessionResolver {
                accounts: &state.account_store(),
                kv: &state.kv_store(),
            };
            resolver.resolve(&token).await
        }
    }
}

// ── GET /auth/session ─────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct SessionResponse {
    pub account_id: AccountId,
    pub username: String,
    pub role: u8,
}

pub async fn get_session(current: CurrentAccount) -> Json<SessionResponse> {
    Json(SessionResponse {
        account_id: current.account_id,
        username: current.username,
        role: current.role.as_u8(),
    })
}

// ── DELETE /auth/session ──────────────────────────────────────────────────────

pub async fn delete_session(
    State(state): State<AppState>,
    current: CurrentAccount,
    origin: RequestOrigin,
    jar: CookieJar,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = LogoutUseCase {
        kv: state.kv_store(),
        audit: state.audit_sink(),
    };
    usecase.execute(&current, &origin).await?;

    let jar = clear_session_cookie(jar, state.cookie_domain.clone());
    Ok((StatusCode::NO_CONTENT, jar))
}
