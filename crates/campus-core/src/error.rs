use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::{Map, Value};

/// JSON error envelope returned by every Campus service: `{"kind", "message"}`.
///
/// Extra fields may be attached for errors that carry a client hint
/// (e.g. the login step-up response).
#[derive(Debug, Clone)]
pub struct ErrorEnvelope {
    status: StatusCode,
    body: Map<String, Value>,
}

impl ErrorEnvelope {
    pub fn new(status: StatusCode, kind: &str, message: impl Into<String>) -> Self {
        let mut body = Map::new();
        body.insert("kind".to_owned(), Value::from(kind));
        body.insert("message".to_owned(), Value::from(message.into()));
        Self { status, body }
    }

    pub fn with_field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.body.insert(key.to_owned(), value.into());
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl IntoResponse for ErrorEnvelope {
    fn into_response(self) -> Response {
        // tower-http TraceLayer already records method/uri/status for all requests.
        // Only 5xx get an extra line here; 4xx are expected client errors.
        if self.status.is_server_error() {
            tracing::error!(
                status = self.status.as_u16(),
                kind = self.body.get("kind").and_then(serde_json::Value::as_str).unwrap_or_default(),
                "request failed"
            );
        }
        (self.status, axum::Json(Value::Object(self.body))).into_response()
    }
}
