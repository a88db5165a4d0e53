//! Rewrites `eth_sendTransaction` into `eth_sendRawTransaction`.
//!
//! Stages run strictly in order and stop at the first failure:
//! nonce lookup, gas price lookup, merge, gas normalization, signing, submission.

use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::error::{ProviderError, TransportError};
use crate::jsonrpc::{RpcRequest, RpcResponse};
use crate::signers::SigningCapability;
use crate::transaction::RawTransaction;
use crate::transport::Transport;

pub const GET_TRANSACTION_COUNT: &str = "eth_getTransactionCount";
pub const GAS_PRICE: &str = "eth_gasPrice";
pub const SEND_RAW_TRANSACTION: &str = "eth_sendRawTransaction";

pub struct TransactionPipeline<'a> {
    transport: &'a dyn Transport,
    signer: &'a SigningCapability,
    auto_resolve_defaults: bool,
    chain_id: Option<u64>,
}

impl<'a> TransactionPipeline<'a> {
    pub fn new(
        transport: &'a dyn Transport,
        signer: &'a SigningCapability,
        auto_resolve_defaults: bool,
        chain_id: Option<u64>,
    ) -> Self {
        Self {
            transport,
            signer,
            auto_resolve_defaults,
            chain_id,
        }
    }

    pub async fn rewrite(
        &self,
        candidate: RawTransaction,
        id: Value,
        jsonrpc: String,
    ) -> Result<RpcResponse, ProviderError> {
        let tx = if self.auto_resolve_defaults {
            let nonce = self.resolve_nonce(&candidate, &id, &jsonrpc).await?;
            let gas_price = self.resolve_gas_price(&id, &jsonrpc).await?;
            candidate.with_defaults(nonce, gas_price)
        } else {
            candidate
        };
        let tx = tx.normalize_gas();

        let payload = self.signer.sign(&tx, self.chain_id).await.map_err(|e| {
            warn!(error = %e, "signing failed, transaction not submitted");
            e
        })?;

        let request = RpcRequest::with_version(id, jsonrpc, SEND_RAW_TRANSACTION, json!([payload]));
        debug!(id = ?request.id, "submitting signed transaction");

        Ok(self.transport.send(request).await?)
    }

    async fn resolve_nonce(
        &self,
        candidate: &RawTransaction,
        id: &Value,
        jsonrpc: &str,
    ) -> Result<Value, ProviderError> {
        // A missing `from` still goes out; the node's answer is the error the caller sees.
        let from = candidate.get("from").cloned().unwrap_or(Value::Null);
        let request = RpcRequest::with_version(
            id.clone(),
            jsonrpc,
            GET_TRANSACTION_COUNT,
            json!([from, "latest"]),
        );

        let nonce = self
            .auxiliary(request)
            .await
            .map_err(ProviderError::NonceResolution)?;
        debug!(%nonce, "resolved nonce");
        Ok(nonce)
    }

    async fn resolve_gas_price(&self, id: &Value, jsonrpc: &str) -> Result<Value, ProviderError> {
        let request = RpcRequest::with_version(id.clone(), jsonrpc, GAS_PRICE, json!([]));

        let gas_price = self
            .auxiliary(request)
            .await
            .map_err(ProviderError::GasPriceResolution)?;
        debug!(%gas_price, "resolved gas price");
        Ok(gas_price)
    }

    async fn auxiliary(&self, request: RpcRequest) -> Result<Value, TransportError> {
        self.transport.send(request).await?.into_result()
    }
}
