use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{BoxError, ProviderError};
use crate::transaction::RawTransaction;
use crate::utils::is_hex_payload;

pub mod adapters;
pub mod local;

pub use adapters::{CallbackKeyProvider, CallbackSigner, KeyFn, SignFn};
pub use local::{sign_raw_transaction, StaticKeyProvider};

/// Produces a ready-to-send, `0x`-prefixed signed payload from a transaction.
#[async_trait]
pub trait TransactionSigner: Send + Sync {
    async fn sign_transaction(&self, tx: &RawTransaction) -> Result<String, BoxError>;
}

/// Hands out the hex private key for a sender address; the provider signs locally.
#[async_trait]
pub trait KeyProvider: Send + Sync {
    async fn provide_key(&self, address: &str) -> Result<String, BoxError>;
}

#[derive(Clone)]
pub enum SigningCapability {
    Direct(Arc<dyn TransactionSigner>),
    Keyed(Arc<dyn KeyProvider>),
}

impl SigningCapability {
    pub fn direct(signer: impl TransactionSigner + 'static) -> Self {
        Self::Direct(Arc::new(signer))
    }

    pub fn keyed(provider: impl KeyProvider + 'static) -> Self {
        Self::Keyed(Arc::new(provider))
    }

    /// Sign a normalized transaction. Every failure, including a malformed
    /// payload coming back from a direct signer, is a [`ProviderError::Signing`].
    pub async fn sign(
        &self,
        tx: &RawTransaction,
        default_chain_id: Option<u64>,
    ) -> Result<String, ProviderError> {
        let payload = match self {
            Self::Direct(signer) => {
                debug!("signing transaction with direct signer");
                signer
                    .sign_transaction(tx)
                    .await
                    .map_err(ProviderError::Signing)?
            }
            Self::Keyed(provider) => {
                let from = tx.from_address().ok_or_else(|| {
                    ProviderError::Signing("transaction has no `from` address to sign for".into())
                })?;
                debug!(from, "requesting signing key");
                let key = provider
                    .provide_key(from)
                    .await
                    .map_err(ProviderError::Signing)?;
                sign_raw_transaction(tx, &key, default_chain_id).map_err(ProviderError::Signing)?
            }
        };

        if !is_hex_payload(&payload) {
            return Err(ProviderError::Signing(
                format!("signer returned a payload that is not 0x-prefixed hex: {payload:?}")
                    .into(),
            ));
        }
        Ok(payload)
    }
}

impl std::fmt::Debug for SigningCapability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Direct(_) => f.write_str("SigningCapability::Direct"),
            Self::Keyed(_) => f.write_str("SigningCapability::Keyed"),
        }
    }
}
