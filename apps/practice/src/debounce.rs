//! Debounced auto-check of typed answers.

use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

/// Delivers a value after a quiet period, cancelling any earlier pending value.
pub struct AutoCheck<T> {
    delay: Duration,
    tx: UnboundedSender<T>,
    pending: Option<JoinHandle<()>>,
}

impl<T: Send + 'static> AutoCheck<T> {
    pub fn new(delay: Duration, tx: UnboundedSender<T>) -> Self {
        Self {
            delay,
            tx,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Replace any pending value with `value`.
    ///
    /// Returns false when called outside a tokio runtime.
    pub fn schedule(&mut self, value: T) -> bool {
        self.cancel();
        let Ok(handle) = Handle::try_current() else {
            tracing::warn!("auto-check requested outside a runtime");
            return false;
        };
        let delay = self.delay;
        let tx = self.tx.clone();
        self.pending = Some(handle.spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(value);
        }));
        true
    }

    pub fn cancel(&mut self) {
        if let Some(task) = self.pending.take() {
            task.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl<T> Drop for AutoCheck<T> {
    fn drop(&mut self) {
        if let Some(task) = self.pending.take() {
            task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test(start_paused = true)]
    async fn test_only_last_value_delivered() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut check = AutoCheck::new(Duration::from_millis(500), tx);

        check.schedule("ni");
        tokio::time::sleep(Duration::from_millis(200)).await;
        check.schedule("ni3");
        assert!(check.is_pending());

        assert_eq!(rx.recv().await, Some("ni3"));
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_drops_pending() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut check = AutoCheck::new(Duration::from_millis(500), tx);
        check.schedule(1);
        check.cancel();
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(rx.try_recv().is_err());
        assert!(!check.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_waits_for_delay() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut check = AutoCheck::new(Duration::from_millis(500), tx);
        check.schedule(7);
        tokio::time::sleep(Duration::from_millis(499)).await;
        assert!(rx.try_recv().is_err());
        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(rx.try_recv().ok(), Some(7));
    }

    #[test]
    fn test_schedule_outside_runtime() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut check = AutoCheck::new(Duration::from_millis(10), tx);
        assert!(!check.schedule(()));
    }
}
