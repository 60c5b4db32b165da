use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context as _;
use sea_orm::Database;
use tracing::info;

use campus_auth::config::AuthConfig;
use campus_auth::infra::sms::{HttpSmsGateway, SmsClient};
use campus_auth::router::build_router;
use campus_auth::state::AppState;
use campus_core::tracing::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AuthConfig::from_env()?;

    let db = Database::connect(&config.database_url)
        .await
        .context("failed to connect to database")?;

    let redis_cfg = deadpool_redis::Config::from_url(&config.redis_url);
    let redis = redis_cfg
        .create_pool(Some(deadpool_redis::Runtime::Tokio1))
        .context("failed to create Redis pool")?;

    let sms = match config.sms_gateway_url {
        Some(url) => SmsClient::Http(HttpSmsGateway::new(url, config.sms_gateway_api_key)?),
        None => {
            info!("SMS_GATEWAY_URL unset; one-time codes will not be delivered");
            SmsClient::LogOnly
        }
    };

    info!(
        allowlisted = config.login.ip_allowlist.len(),
        failure_threshold = config.login.failure_threshold,
        "login policy loaded"
    );

    let state = AppState {
        db,
        redis,
        sms,
        cookie_domain: config.cookie_domain,
        trust_forwarded_for: config.trust_forwarded_for,
        login: Arc::new(config.login),
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.auth_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!("auth service listening on {addr}");
    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("server error")?;
    Ok(())
}
