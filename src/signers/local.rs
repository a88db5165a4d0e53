//! Local serialize-and-sign for the key-provider flow.

use alloy::{
    consensus::{SignableTransaction, TxEnvelope, TxLegacy},
    eips::eip2718::Encodable2718,
    primitives::{Address, Bytes, TxKind, U256},
    signers::{local::PrivateKeySigner, SignerSync},
};
use async_trait::async_trait;
use serde_json::Value;

use super::KeyProvider;
use crate::error::BoxError;
use crate::transaction::RawTransaction;
use crate::utils::{parse_quantity, parse_u128, parse_u64};

/// Sign a normalized transaction with a hex private key and return the
/// `0x`-prefixed EIP-2718 encoding, ready for `eth_sendRawTransaction`.
///
/// Produces a legacy transaction. `chainId` on the transaction wins over
/// `default_chain_id`; with neither, the signature is pre-EIP-155.
pub fn sign_raw_transaction(
    tx: &RawTransaction,
    private_key: &str,
    default_chain_id: Option<u64>,
) -> Result<String, BoxError> {
    let signer: PrivateKeySigner = private_key.trim().parse()?;
    let legacy = build_legacy(tx, default_chain_id)?;

    let signature = signer.sign_hash_sync(&legacy.signature_hash())?;
    let envelope = TxEnvelope::Legacy(legacy.into_signed(signature));

    Ok(format!("0x{}", hex::encode(envelope.encoded_2718())))
}

fn build_legacy(tx: &RawTransaction, default_chain_id: Option<u64>) -> Result<TxLegacy, BoxError> {
    let chain_id = match tx.get("chainId") {
        Some(value) => Some(parse_u64("chainId", value)?),
        None => default_chain_id,
    };

    Ok(TxLegacy {
        chain_id,
        nonce: parse_u64("nonce", required(tx, "nonce")?)?,
        gas_price: parse_u128("gasPrice", required(tx, "gasPrice")?)?,
        gas_limit: parse_u64("gasLimit", required(tx, "gasLimit")?)?,
        to: kind(tx.get("to"))?,
        value: match tx.get("value") {
            Some(value) => parse_quantity("value", value)?,
            None => U256::ZERO,
        },
        input: input(tx.get("data").or_else(|| tx.get("input")))?,
    })
}

fn required<'a>(tx: &'a RawTransaction, field: &str) -> Result<&'a Value, BoxError> {
    tx.get(field)
        .ok_or_else(|| format!("transaction is missing `{field}`").into())
}

fn kind(to: Option<&Value>) -> Result<TxKind, BoxError> {
    match to {
        None => Ok(TxKind::Create),
        Some(Value::String(s)) if s.is_empty() || s == "0x" => Ok(TxKind::Create),
        Some(Value::String(s)) => Ok(TxKind::Call(s.parse::<Address>()?)),
        Some(other) => Err(format!("invalid `to` field: {other}").into()),
    }
}

fn input(data: Option<&Value>) -> Result<Bytes, BoxError> {
    match data {
        None => Ok(Bytes::new()),
        Some(Value::String(s)) => {
            let body = s.strip_prefix("0x").unwrap_or(s);
            Ok(Bytes::from(hex::decode(body)?))
        }
        Some(other) => Err(format!("invalid `data` field: {other}").into()),
    }
}

/// Key provider holding a single local key; refuses any other sender.
pub struct StaticKeyProvider {
    signer: PrivateKeySigner,
}

impl StaticKeyProvider {
    pub fn new(signer: PrivateKeySigner) -> Self {
        Self { signer }
    }

    pub fn address(&self) -> Address {
        self.signer.address()
    }
}

#[async_trait]
impl KeyProvider for StaticKeyProvider {
    async fn provide_key(&self, address: &str) -> Result<String, BoxError> {
        let requested: Address = address.parse()?;
        if requested != self.signer.address() {
            return Err(format!("no key available for {address}").into());
        }
        Ok(format!("0x{}", hex::encode(self.signer.to_bytes())))
    }
}
