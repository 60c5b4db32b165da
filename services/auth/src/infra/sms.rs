use std::time::Duration;

use anyhow::Context as _;
use serde::Serialize;
use tracing::{info, warn};

use crate::domain::repository::SmsGateway;
use crate::error::AuthServiceError;

const SEND_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Serialize)]
struct SendSmsBody<'a> {
    phone: &'a str,
    template: &'static str,
    code: &'a str,
}

/// Keep the last four digits, enough to tell numbers apart in logs.
pub fn mask_phone(phone: &str) -> String {
    let len = phone.chars().count();
    let hidden = len.saturating_sub(4);
    phone
        .chars()
        .enumerate()
        .map(|(i, c)| if i < hidden { '*' } else { c })
        .collect()
}

/// JSON-over-HTTP SMS gateway: `POST {url}` with `{phone, template, code}`.
#[derive(Clone)]
pub struct HttpSmsGateway {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
}

impl HttpSmsGateway {
    pub fn new(url: String, api_key: Option<String>) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(SEND_TIMEOUT)
            .build()
            .context("build SMS gateway client")?;
        Ok(Self {
            client,
            url,
            api_key,
        })
    }
}

impl SmsGateway for HttpSmsGateway {
    async fn send(&self, destination: &str, code: &str) -> Result<(), AuthServiceError> {
        let body = SendSmsBody {
            phone: destination,
            template: "login_code",
            code,
        };
        let mut request = self.client.post(&self.url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await.map_err(|e| {
            warn!(error = %e, phone = %mask_phone(destination), "SMS gateway unreachable");
            AuthServiceError::DeliveryFailure
        })?;
        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), phone = %mask_phone(destination), "SMS gateway rejected message");
            return Err(AuthServiceError::DeliveryFailure);
        }
        Ok(())
    }
}

/// Gateway selected at startup from configuration.
#[derive(Clone)]
pub enum SmsClient {
    Http(HttpSmsGateway),
    /// No gateway configured (local development): delivery is logged and reported as sent.
    LogOnly,
}

impl SmsGateway for SmsClient {
    async fn send(&self, destination: &str, code: &str) -> Result<(), AuthServiceError> {
        match self {
            Self::Http(gateway) => gateway.send(destination, code).await,
            Self::LogOnly => {
                info!(phone = %mask_phone(destination), "SMS gateway not configured; code not delivered");
                Ok(())
            }
        }
    }
}
