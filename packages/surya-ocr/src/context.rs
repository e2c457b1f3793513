//! Caller supplied cancellation and deadlines for OCR calls.
//!
//! A [`Context`] is cloned into every call that should stop together. It
//! finishes either when its [`CancelHandle`] fires or when its deadline
//! passes, whichever comes first.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;

use crate::engine::OcrError;

#[derive(Debug, Clone, Default)]
pub struct Context {
    cancelled: Option<watch::Receiver<bool>>,
    deadline: Option<Instant>,
}

/// Cancels every clone of the [`Context`] it was created with.
#[derive(Debug, Clone)]
pub struct CancelHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Context {
    /// A context that never finishes.
    pub fn background() -> Self {
        Self::default()
    }

    pub fn with_cancel() -> (Self, CancelHandle) {
        let (tx, rx) = watch::channel(false);
        let ctx = Self {
            cancelled: Some(rx),
            deadline: None,
        };
        (ctx, CancelHandle { tx: Arc::new(tx) })
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::background().child_with_timeout(timeout)
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            cancelled: None,
            deadline: Some(deadline),
        }
    }

    /// Derives a context that also finishes once `timeout` has elapsed.
    /// The earlier of the two deadlines wins. A timeout too large to
    /// represent adds no deadline of its own.
    pub fn child_with_timeout(&self, timeout: Duration) -> Self {
        let deadline = match (self.deadline, Instant::now().checked_add(timeout)) {
            (Some(parent), Some(ours)) => Some(parent.min(ours)),
            (parent, ours) => parent.or(ours),
        };
        Self {
            cancelled: self.cancelled.clone(),
            deadline,
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Returns the reason this context finished, or `None` while it is live.
    pub fn err(&self) -> Option<OcrError> {
        if self.cancelled.as_ref().is_some_and(|rx| *rx.borrow()) {
            return Some(OcrError::Cancelled);
        }
        if self.deadline.is_some_and(|d| Instant::now() >= d) {
            return Some(OcrError::DeadlineExceeded);
        }
        None
    }

    /// Resolves once the context finishes, yielding the matching error.
    pub async fn done(&self) -> OcrError {
        let cancelled = async {
            match &self.cancelled {
                Some(rx) => {
                    let mut rx = rx.clone();
                    let fired = rx.wait_for(|c| *c).await.is_ok();
                    // A dropped handle can no longer cancel us.
                    if !fired {
                        std::future::pending::<()>().await;
                    }
                }
                None => std::future::pending::<()>().await,
            }
        };
        let expired = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            _ = cancelled => OcrError::Cancelled,
            _ = expired => OcrError::DeadlineExceeded,
        }
    }
}
