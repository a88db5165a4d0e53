//! JSON-RPC 2.0 envelopes exchanged with the remote node.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::error::TransportError;

pub const JSONRPC_VERSION: &str = "2.0";

/// Request envelope. Optional members stay absent when the caller left them
/// out, so a forwarded request serializes back to what was received; a
/// request without `id` is a notification and must stay one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jsonrpc: Option<String>,
    pub method: String,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub params: Option<Value>,
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<Value>,
    /// Members outside JSON-RPC 2.0, relayed untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcResponse {
    #[serde(default = "default_version")]
    pub jsonrpc: String,
    // `"result": null` is a valid answer and must not collapse into "absent".
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
    #[serde(default)]
    pub id: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

fn default_version() -> String {
    JSONRPC_VERSION.into()
}

fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl RpcRequest {
    pub fn new(id: Value, method: impl Into<String>, params: Value) -> Self {
        Self::with_version(id, JSONRPC_VERSION, method, params)
    }

    /// Same as [`RpcRequest::new`] but keeps the caller's protocol version.
    pub fn with_version(
        id: Value,
        jsonrpc: impl Into<String>,
        method: impl Into<String>,
        params: Value,
    ) -> Self {
        Self {
            jsonrpc: Some(jsonrpc.into()),
            method: method.into(),
            params: Some(params),
            id: Some(id),
            extra: Map::new(),
        }
    }

    /// Protocol version to answer with, `2.0` when the caller sent none.
    pub fn version(&self) -> &str {
        self.jsonrpc.as_deref().unwrap_or(JSONRPC_VERSION)
    }

    /// Id to echo in a locally built response; `null` for notifications.
    pub fn response_id(&self) -> Value {
        self.id.clone().unwrap_or(Value::Null)
    }

    pub fn params_as_array(&self) -> Vec<Value> {
        match &self.params {
            Some(Value::Array(arr)) => arr.clone(),
            None | Some(Value::Null) => vec![],
            Some(other) => vec![other.clone()],
        }
    }
}

impl RpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: default_version(),
            result: Some(result),
            error: None,
            id,
        }
    }

    pub fn error(id: Value, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: default_version(),
            result: None,
            error: Some(error),
            id,
        }
    }

    pub fn into_result(self) -> Result<Value, TransportError> {
        if let Some(error) = self.error {
            return Err(TransportError::Rpc(error));
        }
        self.result.ok_or(TransportError::MissingResult)
    }
}
