//! Signing JSON-RPC provider for Ethereum nodes.
//!
//! Sits between a JSON-RPC client and a remote node. Every call is forwarded
//! as-is except:
//!
//! - `eth_sendTransaction`: nonce and gas price are filled in from the node
//!   (`eth_getTransactionCount`, `eth_gasPrice`), `gas` is renamed to `gasLimit`,
//!   the transaction is signed by the configured capability and submitted as
//!   `eth_sendRawTransaction`.
//! - `eth_accounts`: answered by the configured accounts provider, if any.
//!
//! ```text
//! caller -> SignerProvider -> (TransactionPipeline) -> Transport -> node
//! ```
//!
//! ```no_run
//! use signer_provider::{BoxError, RpcRequest, SignFn, SignerProvider};
//! use serde_json::json;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = SignerProvider::builder("http://localhost:8545")
//!     .transaction_signer(SignFn::new(|_tx| async move {
//!         // hand the transaction to a hardware wallet, remote signer, ...
//!         Ok::<_, BoxError>("0xdeadbeef".to_string())
//!     }))
//!     .build()?;
//!
//! let response = provider
//!     .handle(RpcRequest::new(
//!         json!(1),
//!         "eth_sendTransaction",
//!         json!([{"from": "0xabc", "to": "0xdef", "gas": "21000"}]),
//!     ))
//!     .await?;
//! println!("{:?}", response.result);
//! # Ok(())
//! # }
//! ```

pub mod accounts;
pub mod callback;
pub mod config;
pub mod error;
pub mod jsonrpc;
pub mod pipeline;
pub mod provider;
pub mod signers;
pub mod transaction;
pub mod transport;
pub mod utils;


pub use accounts::{AccountsFn, AccountsProvider, CallbackAccounts, StaticAccounts};
pub use callback::{Completion, SignCallback};
pub use config::{ProviderConfig, ProviderSettings};
pub use error::{BoxError, ConfigurationError, ProviderError, TransportError};
pub use jsonrpc::{JsonRpcError, RpcRequest, RpcResponse};
pub use pipeline::TransactionPipeline;
pub use provider::SignerProvider;
pub use signers::{
    CallbackKeyProvider, CallbackSigner, KeyFn, KeyProvider, SignFn, SigningCapability,
    StaticKeyProvider, TransactionSigner,
};
pub use transaction::RawTransaction;
pub use transport::{HttpTransport, Transport, TransportFactory};
