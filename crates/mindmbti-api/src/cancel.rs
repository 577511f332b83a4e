// Cancellation tokens for in-flight requests.
//
// A screen that is torn down cancels its tokens; any request raced against a
// cancelled token resolves to `ApiError::Cancelled` and its response is
// dropped unread.

use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;

use crate::error::ApiError;

#[derive(Debug, Clone)]
pub struct CancelToken {
    tx: Arc<watch::Sender<bool>>,
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

impl CancelToken {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        CancelToken { tx: Arc::new(tx) }
    }

    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }

    /// Resolves once [`CancelToken::cancel`] has been called on any clone.
    pub async fn cancelled(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives in `self`, so the channel cannot close under us.
        let _ = rx.wait_for(|cancelled| *cancelled).await;
    }

    /// Run `fut` unless the token is (or becomes) cancelled first.
    pub async fn run<T, F>(&self, fut: F) -> Result<T, ApiError>
    where
        F: Future<Output = Result<T, ApiError>>,
    {
        if self.is_cancelled() {
            return Err(ApiError::Cancelled);
        }
        tokio::select! {
            biased;
            _ = self.cancelled() => Err(ApiError::Cancelled),
            result = fut => result,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn uncancelled_token_passes_result_through() {
        let token = CancelToken::new();
        let result = token.run(async { Ok::<_, ApiError>(7) }).await;
        assert_eq!(result, Ok(7));
    }

    #[tokio::test]
    async fn cancelled_token_short_circuits() {
        let token = CancelToken::new();
        token.cancel();
        let result = token
            .run(async { Ok::<_, ApiError>("never polled") })
            .await;
        assert_eq!(result, Err(ApiError::Cancelled));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_during_flight_drops_the_response() {
        let token = CancelToken::new();
        let clone = token.clone();

        let handle = tokio::spawn(async move {
            clone
                .run(async {
                    tokio::time::sleep(Duration::from_secs(60)).await;
                    Ok::<_, ApiError>("late response")
                })
                .await
        });

        tokio::time::sleep(Duration::from_secs(1)).await;
        token.cancel();
        assert!(token.is_cancelled());
        assert_eq!(handle.await.unwrap(), Err(ApiError::Cancelled));
    }
}
