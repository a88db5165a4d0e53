use std::sync::Arc;
use std::time::Duration;

use reqwest::Url;
use serde_json::json;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::accounts::AccountsProvider;
use crate::config::ProviderConfig;
use crate::error::{ConfigurationError, ProviderError};
use crate::jsonrpc::{RpcRequest, RpcResponse};
use crate::pipeline::TransactionPipeline;
use crate::signers::SigningCapability;
use crate::transaction::RawTransaction;
use crate::transport::{http_factory, Transport};

pub const SEND_TRANSACTION: &str = "eth_sendTransaction";
pub const ACCOUNTS: &str = "eth_accounts";

enum Route<'a> {
    Accounts(&'a dyn AccountsProvider),
    SendTransaction,
    PassThrough,
}

/// JSON-RPC provider that signs `eth_sendTransaction` locally and submits it as
/// `eth_sendRawTransaction`; every other call goes to the node untouched.
///
/// The provider holds no per-request state, so one instance can serve any
/// number of concurrent callers.
pub struct SignerProvider {
    endpoint: String,
    transport: Arc<dyn Transport>,
    signer: SigningCapability,
    accounts: Option<Arc<dyn AccountsProvider>>,
    timeout: Option<Duration>,
    auto_resolve_defaults: bool,
    chain_id: Option<u64>,
}

impl SignerProvider {
    pub fn builder(endpoint: impl Into<String>) -> ProviderConfig {
        ProviderConfig::new(endpoint)
    }

    pub fn new(config: ProviderConfig) -> Result<Self, ConfigurationError> {
        let signer = config.signer.ok_or(ConfigurationError::MissingSigner)?;

        let factory = match config.transport_factory {
            Some(factory) => factory,
            None => {
                validate_endpoint(&config.endpoint)?;
                http_factory()
            }
        };
        let transport =
            factory(&config.endpoint, config.timeout).map_err(ConfigurationError::Transport)?;

        debug!(
            endpoint = %config.endpoint,
            auto_resolve_defaults = config.auto_resolve_defaults,
            "signer provider ready"
        );

        Ok(Self {
            endpoint: config.endpoint,
            transport,
            signer,
            accounts: config.accounts,
            timeout: config.timeout,
            auto_resolve_defaults: config.auto_resolve_defaults,
            chain_id: config.chain_id,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub fn auto_resolve_defaults(&self) -> bool {
        self.auto_resolve_defaults
    }

    pub fn chain_id(&self) -> Option<u64> {
        self.chain_id
    }

    fn route(&self, method: &str) -> Route<'_> {
        match (method, &self.accounts) {
            (ACCOUNTS, Some(accounts)) => Route::Accounts(accounts.as_ref()),
            (SEND_TRANSACTION, _) => Route::SendTransaction,
            _ => Route::PassThrough,
        }
    }

    /// Handle one request. Pass-through responses, including JSON-RPC error
    /// envelopes from the node, come back exactly as the transport returned them.
    pub async fn handle(&self, request: RpcRequest) -> Result<RpcResponse, ProviderError> {
        debug!(method = %request.method, "routing request");

        match self.route(&request.method) {
            Route::Accounts(accounts) => substitute_accounts(accounts, request).await,
            Route::SendTransaction => {
                let params = request.params_as_array();
                let candidate = RawTransaction::from_param(params.first())?;
                TransactionPipeline::new(
                    self.transport.as_ref(),
                    &self.signer,
                    self.auto_resolve_defaults,
                    self.chain_id,
                )
                .rewrite(candidate, request.response_id(), request.version().to_string())
                .await
            }
            Route::PassThrough => Ok(self.transport.send(request).await?),
        }
    }

    /// Callback form of [`SignerProvider::handle`]. The callback runs exactly
    /// once, on a tokio task.
    pub fn send_async<F>(self: &Arc<Self>, request: RpcRequest, callback: F) -> JoinHandle<()>
    where
        F: FnOnce(Result<RpcResponse, ProviderError>) + Send + 'static,
    {
        let provider = Arc::clone(self);
        tokio::spawn(async move {
            let outcome = provider.handle(request).await;
            callback(outcome);
        })
    }
}

async fn substitute_accounts(
    accounts: &dyn AccountsProvider,
    request: RpcRequest,
) -> Result<RpcResponse, ProviderError> {
    let addresses = accounts.accounts().await.map_err(ProviderError::Accounts)?;
    Ok(RpcResponse {
        jsonrpc: request.version().to_string(),
        ..RpcResponse::success(request.response_id(), json!(addresses))
    })
}

fn validate_endpoint(endpoint: &str) -> Result<(), ConfigurationError> {
    let invalid = |reason: String| ConfigurationError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        reason,
    };
    let url = Url::parse(endpoint).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(invalid(format!("unsupported scheme `{other}`"))),
    }
}
