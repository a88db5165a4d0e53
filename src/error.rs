use crate::jsonrpc::JsonRpcError;

/// Error type reported by caller-supplied capabilities (signers, key and account providers).
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(thiserror::Error, Debug)]
pub enum ConfigurationError {
    #[error("a signing capability is required (transaction signer or key provider)")]
    MissingSigner,
    #[error("invalid endpoint {endpoint:?}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
    #[error("invalid value {value:?} for {name}")]
    InvalidSetting { name: String, value: String },
    #[error("failed to construct transport: {0}")]
    Transport(#[source] TransportError),
}

#[derive(thiserror::Error, Debug)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("upstream returned HTTP status {0}")]
    Status(u16),
    #[error("invalid endpoint: {0}")]
    Endpoint(String),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
    #[error("JSON-RPC error {}: {}", .0.code, .0.message)]
    Rpc(JsonRpcError),
    #[error("response carried neither a result nor an error")]
    MissingResult,
    #[error("{0}")]
    Other(String),
}

/// Failure of a single [`SignerProvider::handle`](crate::SignerProvider::handle) call.
///
/// Each variant names the step that failed so a caller can tell a nonce lookup
/// failure apart from a signing failure or a failed submission.
#[derive(thiserror::Error, Debug)]
pub enum ProviderError {
    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),
    #[error("Failed to resolve nonce: {0}")]
    NonceResolution(#[source] TransportError),
    #[error("Failed to resolve gas price: {0}")]
    GasPriceResolution(#[source] TransportError),
    #[error("Failed to sign sendTransaction payload: {0}")]
    Signing(#[source] BoxError),
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Accounts(BoxError),
}

impl ProviderError {
    pub fn code(&self) -> i64 {
        match self {
            Self::Transport(TransportError::Rpc(err)) => err.code,
            Self::InvalidTransaction(_) => -32602,
            Self::NonceResolution(_) => -32001,
            Self::GasPriceResolution(_) => -32002,
            Self::Signing(_) => -32003,
            Self::Accounts(_) => -32004,
            Self::Transport(_) => -32603,
        }
    }

    /// Renders the failure as a JSON-RPC error object for callers that answer
    /// their own clients with an envelope.
    pub fn to_rpc_error(&self) -> JsonRpcError {
        JsonRpcError {
            code: self.code(),
            message: self.to_string(),
            data: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accounts_failures_are_not_wrapped() {
        let err = ProviderError::Accounts("keystore locked".into());
        assert_eq!(err.to_string(), "keystore locked");
    }

    #[test]
    fn upstream_rpc_codes_survive() {
        let err = ProviderError::Transport(TransportError::Rpc(JsonRpcError {
            code: -32000,
            message: "nonce too low".into(),
            data: None,
        }));
        let rpc = err.to_rpc_error();
        assert_eq!(rpc.code, -32000);
        assert!(rpc.message.contains("nonce too low"));
    }

    #[test]
    fn step_errors_name_the_step() {
        let nonce = ProviderError::NonceResolution(TransportError::Other("boom".into()));
        let gas = ProviderError::GasPriceResolution(TransportError::Other("boom".into()));
        assert!(nonce.to_string().contains("nonce"));
        assert!(gas.to_string().contains("gas price"));
        assert_ne!(nonce.code(), gas.code());
    }
}
