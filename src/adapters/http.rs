use crate::domain::model::{RawResponse, RequestDescriptor};
use crate::domain::ports::Transport;
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

pub const DEFAULT_USER_AGENT: &str = concat!("api-runner/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub timeout: Duration,
    pub user_agent: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// `reqwest`-backed transport. Sends exactly what the descriptor says.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(settings: &HttpSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(settings.timeout)
            .user_agent(settings.user_agent.clone())
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: &RequestDescriptor) -> Result<RawResponse> {
        let mut builder = self
            .client
            .request(request.method().as_reqwest(), request.url().clone());

        for (name, value) in request.headers() {
            builder = builder.header(name, value);
        }
        if !request.body().is_null() {
            builder = builder.json(request.body());
        }

        tracing::debug!("📡 {} {}", request.method(), request.url());
        let response = builder.send().await?;
        let status = response.status().as_u16();
        tracing::debug!("📡 Response status: {}", status);

        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response.text().await?;

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}
