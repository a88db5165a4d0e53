use std::future::Future;

use async_trait::async_trait;

use crate::callback::{wait, Completion};
use crate::error::BoxError;

/// Answers `eth_accounts` locally instead of asking the node.
#[async_trait]
pub trait AccountsProvider: Send + Sync {
    async fn accounts(&self) -> Result<Vec<String>, BoxError>;
}

pub struct StaticAccounts(Vec<String>);

impl StaticAccounts {
    pub fn new<I, S>(accounts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(accounts.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl AccountsProvider for StaticAccounts {
    async fn accounts(&self) -> Result<Vec<String>, BoxError> {
        Ok(self.0.clone())
    }
}

pub struct AccountsFn<F>(F);

impl<F, Fut> AccountsFn<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Vec<String>, BoxError>> + Send + 'static,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<F, Fut> AccountsProvider for AccountsFn<F>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Vec<String>, BoxError>> + Send + 'static,
{
    async fn accounts(&self) -> Result<Vec<String>, BoxError> {
        (self.0)().await
    }
}

/// Callback-style accounts lookup: `|done| done.ok(vec![...])`.
pub struct CallbackAccounts<F>(F);

impl<F> CallbackAccounts<F>
where
    F: Fn(Completion<Vec<String>>) + Send + Sync + 'static,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<F> AccountsProvider for CallbackAccounts<F>
where
    F: Fn(Completion<Vec<String>>) + Send + Sync + 'static,
{
    async fn accounts(&self) -> Result<Vec<String>, BoxError> {
        let (done, rx) = Completion::channel();
        (self.0)(done);
        wait(rx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn static_accounts() {
        let accounts = StaticAccounts::new(["0xc55c58355a32c095c70748374673829241807487"]);
        assert_eq!(
            accounts.accounts().await.unwrap(),
            vec!["0xc55c58355a32c095c70748374673829241807487".to_string()]
        );
    }

    #[tokio::test]
    async fn closure_accounts() {
        let accounts = AccountsFn::new(|| async { Ok::<_, BoxError>(vec!["0xabc".to_string()]) });
        assert_eq!(accounts.accounts().await.unwrap(), vec!["0xabc".to_string()]);
    }

    #[tokio::test]
    async fn callback_accounts_failure() {
        let accounts = CallbackAccounts::new(|done: Completion<Vec<String>>| {
            done.fail("keystore locked")
        });
        assert_eq!(
            accounts.accounts().await.unwrap_err().to_string(),
            "keystore locked"
        );
    }
}
