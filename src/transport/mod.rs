use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::TransportError;
use crate::jsonrpc::{RpcRequest, RpcResponse};

pub mod http;
#[cfg(test)]
pub(crate) mod mock;

pub use http::HttpTransport;

/// Delivers one JSON-RPC request to the node and returns its envelope as-is.
///
/// The provider issues requests from concurrent callers without serializing
/// them, so implementations must tolerate concurrent use.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: RpcRequest) -> Result<RpcResponse, TransportError>;
}

/// Builds the provider's transport from the endpoint and optional timeout.
pub type TransportFactory =
    Arc<dyn Fn(&str, Option<Duration>) -> Result<Arc<dyn Transport>, TransportError> + Send + Sync>;

pub fn http_factory() -> TransportFactory {
    Arc::new(
        |endpoint: &str, timeout: Option<Duration>| -> Result<Arc<dyn Transport>, TransportError> {
            Ok(Arc::new(HttpTransport::new(endpoint, timeout)?))
        },
    )
}
