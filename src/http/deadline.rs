//! Per-request deadline and cancellation signal.
//!
//! # Design Decisions
//! - Cooperative: a handler observes the deadline by awaiting
//!   [`Deadline::done`]; nothing preempts a running handler
//! - The guard half lives in the dispatcher's scope, so the signal is
//!   released on every exit path (normal return, abort, recovered panic)
//!   without any bookkeeping in handlers

use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;

/// The observable half of a request's cancellation signal.
///
/// Cloneable so a handler can move it into a spawned task; resolving once
/// resolves everywhere.
#[derive(Debug, Clone)]
pub struct Deadline {
    expires_at: Option<Instant>,
    rx: watch::Receiver<bool>,
}

/// The releasing half. Dropping it releases the signal, which is how the
/// dispatcher guarantees reclamation on every exit path.
#[derive(Debug)]
pub(crate) struct DeadlineGuard {
    tx: watch::Sender<bool>,
}

impl Deadline {
    /// Build a signal pair. `timeout` of zero means unbounded: the signal
    /// only resolves when the guard is released.
    pub(crate) fn new(timeout: Duration) -> (Deadline, DeadlineGuard) {
        let (tx, rx) = watch::channel(false);
        let expires_at = if timeout.is_zero() {
            None
        } else {
            Some(Instant::now() + timeout)
        };
        (Deadline { expires_at, rx }, DeadlineGuard { tx })
    }

    /// When this request's deadline expires, if it has one.
    pub fn expires_at(&self) -> Option<Instant> {
        self.expires_at
    }

    /// Resolve when the deadline expires or the request scope is released,
    /// whichever comes first.
    pub async fn done(&self) {
        let mut rx = self.rx.clone();
        let released = async move {
            // A closed channel means the guard dropped, which also counts
            // as released.
            let _ = rx.wait_for(|cancelled| *cancelled).await;
        };
        match self.expires_at {
            Some(at) => {
                tokio::select! {
                    _ = tokio::time::sleep_until(at) => {}
                    _ = released => {}
                }
            }
            None => released.await,
        }
    }
}

impl DeadlineGuard {
    pub(crate) fn release(&self) {
        let _ = self.tx.send(true);
    }
}

impl Drop for DeadlineGuard {
    fn drop(&mut self) {
        self.release();
    }
}
