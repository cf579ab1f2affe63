use crate::error::{Result, StorageError};
use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Per-operation deadline and cancellation signal handed to the record store.
///
/// Cloning is cheap; clones share the same cancellation token.
#[derive(Debug, Clone, Default)]
pub struct Context {
    deadline: Option<Instant>,
    token: CancellationToken,
}

impl Context {
    /// A context that never expires and is only cancelled explicitly.
    pub fn background() -> Self {
        Self::default()
    }

    /// A context that expires `timeout` from now.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::background().timeout(timeout)
    }

    /// Tightens the deadline to `timeout` from now. A later deadline never
    /// replaces an earlier one.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        let deadline = Instant::now() + timeout;
        self.deadline = Some(match self.deadline {
            Some(existing) => existing.min(deadline),
            None => deadline,
        });
        self
    }

    /// Derives a context that is cancelled together with this one but can
    /// also be cancelled on its own.
    pub fn child(&self) -> Self {
        Self {
            deadline: self.deadline,
            token: self.token.child_token(),
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Cancels this context and every child derived from it.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Runs `fut` until it completes, the context is cancelled or the
    /// deadline passes, whichever happens first.
    pub async fn run<F, T>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        if self.token.is_cancelled() {
            return Err(StorageError::Cancelled);
        }
        if self.deadline.is_some_and(|deadline| deadline <= Instant::now()) {
            return Err(StorageError::Timeout("deadline exceeded".to_string()));
        }

        let deadline = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            _ = self.token.cancelled() => Err(StorageError::Cancelled),
            _ = deadline => Err(StorageError::Timeout("deadline exceeded".to_string())),
            result = fut => result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn completes_without_deadline() {
        let ctx = Context::background();
        let value = ctx.run(async { Ok(7) }).await.unwrap();
        assert_eq!(value, 7);
    }

    #[tokio::test]
    async fn already_cancelled_fails_fast() {
        let ctx = Context::background();
        ctx.cancel();
        let err = ctx.run(async { Ok(()) }).await.unwrap_err();
        assert!(matches!(err, StorageError::Cancelled));
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_interrupts_slow_operation() {
        let ctx = Context::with_timeout(Duration::from_millis(50));
        let err = ctx
            .run(async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(())
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Timeout(_)));
    }

    #[tokio::test]
    async fn expired_deadline_fails_before_polling() {
        let ctx = Context::with_timeout(Duration::ZERO);
        let mut started = false;
        let err = ctx
            .run(async {
                started = true;
                Ok(())
            })
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Timeout(_)));
        assert!(!started);
    }

    #[tokio::test]
    async fn cancelling_parent_cancels_child() {
        let parent = Context::background();
        let child = parent.child();

        let handle = tokio::spawn(async move {
            child
                .run(std::future::pending::<Result<()>>())
                .await
        });

        parent.cancel();
        let err = handle.await.unwrap().unwrap_err();
        assert!(matches!(err, StorageError::Cancelled));
    }

    #[tokio::test]
    async fn child_cancel_leaves_parent_running() {
        let parent = Context::background();
        let child = parent.child();
        child.cancel();

        assert!(child.is_cancelled());
        assert!(!parent.is_cancelled());
    }

    #[tokio::test]
    async fn timeout_keeps_earliest_deadline() {
        let short = Context::with_timeout(Duration::from_millis(10));
        let first = short.deadline().unwrap();
        let widened = short.timeout(Duration::from_secs(10));
        assert_eq!(widened.deadline(), Some(first));
    }
}
