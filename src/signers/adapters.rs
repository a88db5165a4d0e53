//! Closure and callback adapters for the signing traits.

use std::future::Future;

use async_trait::async_trait;

use super::{KeyProvider, TransactionSigner};
use crate::callback::{wait, SignCallback};
use crate::error::BoxError;
use crate::transaction::RawTransaction;

/// [`TransactionSigner`] backed by an async closure.
pub struct SignFn<F>(F);

impl<F, Fut> SignFn<F>
where
    F: Fn(RawTransaction) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<String, BoxError>> + Send + 'static,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<F, Fut> TransactionSigner for SignFn<F>
where
    F: Fn(RawTransaction) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<String, BoxError>> + Send + 'static,
{
    async fn sign_transaction(&self, tx: &RawTransaction) -> Result<String, BoxError> {
        (self.0)(tx.clone()).await
    }
}

/// [`KeyProvider`] backed by an async closure receiving the sender address.
pub struct KeyFn<F>(F);

impl<F, Fut> KeyFn<F>
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<String, BoxError>> + Send + 'static,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<F, Fut> KeyProvider for KeyFn<F>
where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<String, BoxError>> + Send + 'static,
{
    async fn provide_key(&self, address: &str) -> Result<String, BoxError> {
        (self.0)(address.to_string()).await
    }
}

/// [`TransactionSigner`] for callback-style signing functions:
/// `|tx, done| done.ok(payload)`.
///
/// The callback may complete from any thread. Completing twice has no effect
/// beyond the first call.
pub struct CallbackSigner<F>(F);

impl<F> CallbackSigner<F>
where
    F: Fn(RawTransaction, SignCallback) + Send + Sync + 'static,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<F> TransactionSigner for CallbackSigner<F>
where
    F: Fn(RawTransaction, SignCallback) + Send + Sync + 'static,
{
    async fn sign_transaction(&self, tx: &RawTransaction) -> Result<String, BoxError> {
        let (done, rx) = SignCallback::channel();
        (self.0)(tx.clone(), done);
        wait(rx).await
    }
}

/// [`KeyProvider`] for callback-style key lookups: `|address, done| done.ok(key)`.
pub struct CallbackKeyProvider<F>(F);

impl<F> CallbackKeyProvider<F>
where
    F: Fn(String, SignCallback) + Send + Sync + 'static,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<F> KeyProvider for CallbackKeyProvider<F>
where
    F: Fn(String, SignCallback) + Send + Sync + 'static,
{
    async fn provide_key(&self, address: &str) -> Result<String, BoxError> {
        let (done, rx) = SignCallback::channel();
        (self.0)(address.to_string(), done);
        wait(rx).await
    }
}
