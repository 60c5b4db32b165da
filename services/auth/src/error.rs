use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::Value;

use campus_core::error::ErrorEnvelope;

/// Auth service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    #[error("account not found")]
    NotFound,
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("account disabled")]
    Disabled,
    #[error("verification code required")]
    CodeRequired,
    #[error("invalid verification code")]
    CodeMismatch,
    #[error("failed to deliver verification code")]
    DeliveryFailure,
    #[error("session expired")]
    InvalidSession,
    #[error("account already exists")]
    AccountExists,
    #[error("{0}")]
    InvalidInput(String),
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl AuthServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound => "NOT_FOUND",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::Disabled => "DISABLED",
            Self::CodeRequired => "CODE_REQUIRED",
            Self::CodeMismatch => "CODE_MISMATCH",
            Self::DeliveryFailure => "DELIVERY_FAILURE",
            Self::InvalidSession => "INVALID_SESSION",
            Self::AccountExists => "ACCOUNT_EXISTS",
            Self::InvalidInput(_) => "INVALID_INPUT",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::InvalidCredentials | Self::CodeMismatch | Self::InvalidSession => {
                StatusCode::UNAUTHORIZED
            }
            Self::Disabled => StatusCode::FORBIDDEN,
            // Not a failure from the client's point of view: the code is on its way.
            Self::CodeRequired => StatusCode::ACCEPTED,
            Self::DeliveryFailure => StatusCode::BAD_GATEWAY,
            Self::AccountExists => StatusCode::CONFLICT,
            Self::InvalidInput(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// True for failures of the credential check itself, which count against the source address.
    pub fn is_credential_failure(&self) -> bool {
        matches!(
            self,
            Self::NotFound | Self::InvalidCredentials | Self::Disabled
        )
    }
}

impl From<campus_domain::account::AccountFieldError> for AuthServiceError {
    fn from(e: campus_domain::account::AccountFieldError) -> Self {
        Self::InvalidInput(e.to_string())
    }
}

impl IntoResponse for AuthServiceError {
    fn into_response(self) -> Response {
        // Internal errors need the anyhow chain logged so the root cause is traceable.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = format!("{e:#}"), kind = "INTERNAL", "internal error");
        }
        let mut envelope = ErrorEnvelope::new(self.status(), self.kind(), self.to_string());
        if matches!(self, Self::CodeRequired) {
            envelope = envelope
                .with_field("token", Value::Null)
                .with_field("need_sms", true);
        }
        envelope.into_response()
    }
}
