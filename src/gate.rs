//! # Startup Gate
//!
//! A counting rendezvous between the listener and the probe. The listener
//! calls [`StartupGate::signal`] once its socket is listening; the probe
//! calls [`StartupGate::wait`] before its first connect.
//!
//! ```text
//!   Listener                     Probe
//!   ────────                     ─────
//!   bind, listen
//!   signal() ──────────────┐
//!   accept()               └──▶  wait() returns
//!      ▲                         connect()
//!      └──── backlog absorbs a connect issued before accept
//! ```
//!
//! The counter lives in a tokio [`Semaphore`]: `signal` adds one permit,
//! `wait` acquires one and forgets it. Each signal therefore satisfies
//! exactly one wait, and a waiting task is suspended rather than polling.

use std::sync::Arc;

use tokio::sync::Semaphore;

/// Counting wait/signal primitive shared by two tasks.
///
/// Clones share the same counter.
#[derive(Debug, Clone)]
pub struct StartupGate {
    permits: Arc<Semaphore>,
}

impl Default for StartupGate {
    fn default() -> Self {
        Self::new()
    }
}

impl StartupGate {
    /// Create a gate with a counter of zero.
    pub fn new() -> Self {
        Self {
            permits: Arc::new(Semaphore::new(0)),
        }
    }

    /// Increment the counter. Never blocks.
    pub fn signal(&self) {
        self.permits.add_permits(1);
        tracing::trace!(pending = self.pending(), "startup gate signaled");
    }

    /// Suspend until the counter is positive, then decrement it.
    ///
    /// There is no timeout: if no task ever signals, this never returns.
    pub async fn wait(&self) {
        // The semaphore is never closed, so acquire only fails if that changes.
        if let Ok(permit) = self.permits.acquire().await {
            permit.forget();
        }
        tracing::trace!(pending = self.pending(), "startup gate passed");
    }

    /// Decrement the counter if it is positive, without waiting.
    pub fn try_wait(&self) -> bool {
        match self.permits.try_acquire() {
            Ok(permit) => {
                permit.forget();
                true
            }
            Err(_) => false,
        }
    }

    /// Current counter value.
    pub fn pending(&self) -> usize {
        self.permits.available_permits()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::time::Duration;

    #[tokio::test]
    async fn signal_then_wait_does_not_block() {
        let gate = StartupGate::new();
        gate.signal();
        tokio::time::timeout(Duration::from_millis(50), gate.wait())
            .await
            .expect("wait after signal must return immediately");
        assert_eq!(gate.pending(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn wait_blocks_until_signaled_from_another_task() {
        let gate = StartupGate::new();
        let waiter = tokio::spawn({
            let gate = gate.clone();
            async move { gate.wait().await }
        });

        tokio::time::sleep(Duration::from_secs(60)).await;
        assert!(!waiter.is_finished(), "wait returned without a signal");

        gate.signal();
        waiter.await.expect("waiter task");
        assert_eq!(gate.pending(), 0);
    }

    #[tokio::test]
    async fn one_signal_releases_one_waiter() {
        let gate = StartupGate::new();
        let first = tokio::spawn({
            let gate = gate.clone();
            async move { gate.wait().await }
        });
        let second = tokio::spawn({
            let gate = gate.clone();
            async move { gate.wait().await }
        });

        gate.signal();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(
            usize::from(first.is_finished()) + usize::from(second.is_finished()),
            1
        );

        gate.signal();
        first.await.expect("first waiter");
        second.await.expect("second waiter");
    }

    proptest! {
        #[test]
        fn signals_satisfy_exactly_as_many_waits(signals in 0usize..64) {
            let gate = StartupGate::new();
            for _ in 0..signals {
                gate.signal();
            }
            prop_assert_eq!(gate.pending(), signals);
            for _ in 0..signals {
                prop_assert!(gate.try_wait());
            }
            prop_assert!(!gate.try_wait());
            prop_assert_eq!(gate.pending(), 0);
        }
    }
}
