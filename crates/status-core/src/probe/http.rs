use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use super::{HttpProbe, HttpRequest, HttpResponse, ProbeError};

/// HTTP probe backed by a shared, connection-pooling reqwest client.
///
/// The client carries no global timeout; each request sets its own.
#[derive(Debug, Clone)]
pub struct ReqwestProbe {
    client: Client,
}

impl ReqwestProbe {
    pub fn new() -> Result<Self, ProbeError> {
        Ok(Self::with_client(Self::build_client()?))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    pub fn build_client() -> Result<Client, ProbeError> {
        Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .pool_max_idle_per_host(20)
            .gzip(true)
            .build()
            .map_err(|e| ProbeError::Network(e.to_string()))
    }
}

fn map_error(e: reqwest::Error) -> ProbeError {
    if e.is_timeout() {
        ProbeError::Timeout
    } else if e.is_body() || e.is_decode() {
        ProbeError::Body(e.to_string())
    } else {
        ProbeError::Network(e.to_string())
    }
}

#[async_trait]
impl HttpProbe for ReqwestProbe {
    async fn get(&self, request: HttpRequest) -> Result<HttpResponse, ProbeError> {
        let mut builder = self.client.get(&request.url).timeout(request.timeout);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let response = builder.send().await.map_err(map_error)?;
        let status = response.status().as_u16();
        debug!(url = %request.url, status, "HTTP probe response");

        let body = if request.read_body {
            Some(response.text().await.map_err(map_error)?)
        } else {
            None
        };

        Ok(HttpResponse { status, body })
    }
}
