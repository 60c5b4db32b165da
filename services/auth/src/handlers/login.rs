use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::CookieJar;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use campus_auth_types::cookie::set_session_cookie;
use campus_core::serde::to_rfc3339_ms;

use crate::domain::types::RequestOrigin;
use crate::error::AuthServiceError;
use crate::state::AppState;
use crate::usecase::login::{LoginInput, LoginUseCase};
use crate::usecase::session::IssuedSession;

// ── POST /auth/login ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub code: Option<String>,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub need_sms: bool,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub expires_at: DateTime<Utc>,
}

impl From<IssuedSession> for LoginResponse {
    fn from(session: IssuedSession) -> Self {
        Self {
            token: session.token,
            need_sms: false,
            expires_at: session.expires_at,
        }
    }
}

pub async fn login(
    State(state): State<AppState>,
    origin: RequestOrigin,
    jar: CookieJar,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse, AuthServiceError> {
    let usecase = LoginUseCase {
        accounts: state.account_store(),
        kv: state.kv_store(),
        sms: state.sms.clone(),
        audit: state.audit_sink(),
        policy: (*state.login).clone(),
    };

    let session = usecase
        .execute(LoginInput {
            username: body.username,
            password: body.password,
            code: body.code,
            origin,
        })
        .await?;

    let jar = set_session_cookie(
        jar,
        session.token.clone(),
        state.cookie_domain.clone(),
        state.login.session_ttl_secs,
    );
    Ok((StatusCode::OK, jar, Json(LoginResponse::from(session))))
}
