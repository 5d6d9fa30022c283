//! Non-recoverable conditions and the boundary that reports them.
//!
//! A few situations leave no sensible degraded behavior (the random source
//! failing, hundreds of folder-name collisions in a row). Those unwind out
//! of the call with a [`Fatal`] payload instead of threading a result type
//! through every layer; [`supervise`] turns the unwind back into
//! [`QueueError::Fatal`] at the call boundary so the process survives.

use std::any::Any;
use std::future::Future;
use std::panic::AssertUnwindSafe;

use futures_util::FutureExt;
use tracing::error;

use crate::error::QueueError;

/// Panic payload for non-recoverable conditions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fatal {
    pub message: String,
}

/// Aborts the current call path.
pub fn raise(message: impl Into<String>) -> ! {
    let message = message.into();
    error!(%message, "fatal condition, aborting call");
    std::panic::panic_any(Fatal { message })
}

/// Runs `fut`, reporting any unwind as [`QueueError::Fatal`].
pub async fn supervise<F, T>(fut: F) -> Result<T, QueueError>
where
    F: Future<Output = Result<T, QueueError>>,
{
    match AssertUnwindSafe(fut).catch_unwind().await {
        Ok(result) => result,
        Err(payload) => {
            let message = describe(payload.as_ref());
            error!(%message, "call terminated by fatal condition");
            Err(QueueError::Fatal(message))
        }
    }
}

/// Extracts a message from a panic payload.
pub fn describe(payload: &(dyn Any + Send)) -> String {
    if let Some(fatal) = payload.downcast_ref::<Fatal>() {
        fatal.message.clone()
    } else if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn passes_results_through() {
        let ok = supervise(async { Ok::<_, QueueError>(7) }).await.unwrap();
        assert_eq!(ok, 7);

        let err = supervise(async { Err::<(), _>(QueueError::OperationAborted) }).await;
        assert!(matches!(err, Err(QueueError::OperationAborted)));
    }

    async fn exhausted() -> Result<(), QueueError> {
        raise("random source exhausted")
    }

    async fn boom() -> Result<(), QueueError> {
        panic!("boom {}", 1)
    }

    #[tokio::test]
    async fn fatal_becomes_error() {
        let result = supervise(exhausted()).await;
        match result {
            Err(QueueError::Fatal(msg)) => assert_eq!(msg, "random source exhausted"),
            other => panic!("expected fatal, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn plain_panics_are_reported_too() {
        let result = supervise(boom()).await;
        assert!(matches!(result, Err(QueueError::Fatal(msg)) if msg == "boom 1"));
    }

    #[test]
    fn describe_static_str() {
        let payload: Box<dyn Any + Send> = Box::new("static");
        assert_eq!(describe(payload.as_ref()), "static");
    }
}
