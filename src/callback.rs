//! Bridge from callback-style capabilities to futures.

use std::sync::{Arc, Mutex};

use tokio::sync::oneshot;
use tracing::warn;

use crate::error::BoxError;

/// Completion handle given to a callback-style capability.
///
/// It can be cloned and moved into other threads or tasks. Only the first call
/// to [`Completion::complete`] is delivered; later calls are dropped so a
/// misbehaving callback can never trigger a second submission.
pub struct Completion<T> {
    slot: Arc<Mutex<Option<oneshot::Sender<Result<T, BoxError>>>>>,
}

/// Completion handle for signing and key lookups.
pub type SignCallback = Completion<String>;

impl<T> Clone for Completion<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<T> Completion<T> {
    pub(crate) fn channel() -> (Self, oneshot::Receiver<Result<T, BoxError>>) {
        let (tx, rx) = oneshot::channel();
        let completion = Self {
            slot: Arc::new(Mutex::new(Some(tx))),
        };
        (completion, rx)
    }

    pub fn complete(&self, outcome: Result<T, BoxError>) {
        let sender = self
            .slot
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        match sender {
            Some(sender) => {
                // The receiver is gone only if the request itself was dropped.
                let _ = sender.send(outcome);
            }
            None => warn!("callback completed more than once, ignoring"),
        }
    }

    pub fn ok(&self, value: T) {
        self.complete(Ok(value));
    }

    pub fn fail(&self, error: impl Into<BoxError>) {
        self.complete(Err(error.into()));
    }
}

pub(crate) async fn wait<T>(rx: oneshot::Receiver<Result<T, BoxError>>) -> Result<T, BoxError> {
    rx.await
        .map_err(|_| BoxError::from("callback dropped without completing"))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn first_completion_wins() {
        let (completion, rx) = Completion::<String>::channel();
        let other = completion.clone();
        completion.ok("0x01".into());
        other.ok("0x02".into());
        completion.fail("late failure");
        assert_eq!(wait(rx).await.unwrap(), "0x01");
    }

    #[tokio::test]
    async fn dropped_completion_is_an_error() {
        let (completion, rx) = Completion::<String>::channel();
        drop(completion);
        assert!(wait(rx).await.is_err());
    }

    #[tokio::test]
    async fn completes_from_another_task() {
        let (completion, rx) = Completion::<Vec<String>>::channel();
        tokio::spawn(async move { completion.ok(vec!["0xabc".into()]) });
        assert_eq!(wait(rx).await.unwrap(), vec!["0xabc".to_string()]);
    }
}
