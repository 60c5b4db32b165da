use axum::{
    Router,
    routing::{get, patch, post},
};
use tower::ServiceBuilder;

use campus_core::health::healthz;
use campus_core::middleware::{propagate_request_id_layer, request_id_layer, trace_layer};

use crate::handlers::{
    health::readyz,
    login::login,
    password::change_password,
    session::{delete_session, get_session},
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Login
        .route("/auth/login", post(login))
        // Session
        .route("/auth/session", get(get_session).delete(delete_session))
        // Account
        .route("/auth/password", patch(change_password))
        .layer(
            ServiceBuilder::new()
                .layer(request_id_layer())
                .layer(trace_layer())
                .layer(propagate_request_id_layer()),
        )
        .with_state(state)
}
