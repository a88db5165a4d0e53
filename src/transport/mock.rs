use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use super::Transport;
use crate::error::TransportError;
use crate::jsonrpc::{RpcRequest, RpcResponse};

pub(crate) const TX_HASH: &str =
    "0x5c504ed432cb51138bcf09aa5e8a410dd4a1e204ef84bfed1be16dfba1b22060";

type Responder = dyn Fn(&RpcRequest) -> Result<RpcResponse, TransportError> + Send + Sync;

/// In-memory transport recording every request it receives.
pub(crate) struct MockTransport {
    calls: Mutex<Vec<RpcRequest>>,
    responder: Box<Responder>,
}

impl MockTransport {
    pub fn new<F>(responder: F) -> Arc<Self>
    where
        F: Fn(&RpcRequest) -> Result<RpcResponse, TransportError> + Send + Sync + 'static,
    {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            responder: Box::new(responder),
        })
    }

    /// Nonce `0x5`, gas price `0x9`, and a fixed hash for raw transactions.
    pub fn node() -> Arc<Self> {
        Self::new(|request| Ok(node_reply(request)))
    }

    /// Like [`MockTransport::node`], with `method` failing at the transport level.
    pub fn failing(method: &'static str) -> Arc<Self> {
        Self::new(move |request| {
            if request.method == method {
                Err(TransportError::Other(format!("{method} unavailable")))
            } else {
                Ok(node_reply(request))
            }
        })
    }

    pub fn calls(&self) -> Vec<RpcRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn methods(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c.method).collect()
    }
}

pub(crate) fn node_reply(request: &RpcRequest) -> RpcResponse {
    let result = match request.method.as_str() {
        "eth_getTransactionCount" => json!("0x5"),
        "eth_gasPrice" => json!("0x9"),
        "eth_sendRawTransaction" => json!(TX_HASH),
        "eth_accounts" => json!(["0x00000000000000000000000000000000000000aa"]),
        other => Value::String(format!("{other}-result")),
    };
    RpcResponse {
        jsonrpc: request.version().to_string(),
        ..RpcResponse::success(request.response_id(), result)
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: RpcRequest) -> Result<RpcResponse, TransportError> {
        self.calls.lock().unwrap().push(request.clone());
        (self.responder)(&request)
    }
}
