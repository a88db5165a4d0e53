use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use tracing::debug;

use super::Transport;
use crate::error::TransportError;
use crate::jsonrpc::{RpcRequest, RpcResponse};

/// JSON-RPC over HTTP POST with a client owned by this transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpTransport {
    pub fn new(endpoint: &str, timeout: Option<Duration>) -> Result<Self, TransportError> {
        let endpoint =
            Url::parse(endpoint).map_err(|e| TransportError::Endpoint(format!("{endpoint}: {e}")))?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: RpcRequest) -> Result<RpcResponse, TransportError> {
        debug!(method = %request.method, endpoint = %self.endpoint, "sending request upstream");

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.bytes().await?;

        // Nodes often attach a JSON-RPC error body to 4xx/5xx replies; relay it when present.
        match serde_json::from_slice::<RpcResponse>(&body) {
            Ok(envelope) => Ok(envelope),
            Err(_) if !status.is_success() => Err(TransportError::Status(status.as_u16())),
            Err(e) => Err(TransportError::InvalidResponse(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unparseable_endpoint() {
        assert!(matches!(
            HttpTransport::new("not a url", None),
            Err(TransportError::Endpoint(_))
        ));
    }

    #[test]
    fn keeps_endpoint() {
        let transport =
            HttpTransport::new("http://localhost:8545", Some(Duration::from_secs(5))).unwrap();
        assert_eq!(transport.endpoint().as_str(), "http://localhost:8545/");
    }
}
