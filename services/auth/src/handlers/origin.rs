use std::net::{IpAddr, SocketAddr};

use anyhow::anyhow;
use axum::extract::{ConnectInfo, FromRequestParts};
use axum::http::{HeaderMap, header, request::Parts};

use crate::domain::types::RequestOrigin;
use crate::error::AuthServiceError;
use crate::state::AppState;

const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// Client address: first `X-Forwarded-For` hop when the proxy is trusted, else the TCP peer.
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>, trust_forwarded: bool) -> Option<IpAddr> {
    let forwarded = trust_forwarded
        .then(|| {
            headers
                .get(X_FORWARDED_FOR)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.split(',').next())
                .and_then(|hop| hop.trim().parse::<IpAddr>().ok())
        })
        .flatten();
    forwarded.or_else(|| peer.map(|addr| addr.ip()))
}

pub fn user_agent(headers: &HeaderMap) -> String {
    headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_owned()
}

impl FromRequestParts<AppState> for RequestOrigin {
    type Rejection = AuthServiceError;

    // Read everything synchronously and return a 'static future (see axum-core 0.5 signature).
    fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let peer = parts
            .extensions
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| *addr);
        let ip = client_ip(&parts.headers, peer, state.trust_forwarded_for);
        let user_agent = user_agent(&parts.headers);

        async move {
            let ip = ip.ok_or_else(|| AuthServiceError::Internal(anyhow!("client address unavailable")))?;
            Ok(Self { ip, user_agent })
        }
    }
}
