//! Cancellable delayed execution. Scheduling a new job supersedes whatever is
//! still waiting, so a burst of calls runs only the last one.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Identifies one scheduled job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceHandle(u64);

struct Pending {
    handle: DebounceHandle,
    task: JoinHandle<()>,
}

pub struct Debouncer {
    delay: Duration,
    next_id: AtomicU64,
    pending: Mutex<Option<Pending>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            next_id: AtomicU64::new(1),
            pending: Mutex::new(None),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Runs `job` after the quiet period, aborting any job still waiting.
    /// Must be called from within a tokio runtime.
    pub fn schedule<F, Fut>(&self, job: F) -> DebounceHandle
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let handle = DebounceHandle(self.next_id.fetch_add(1, Ordering::Relaxed));
        let delay = self.delay;

        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = pending.take() {
            previous.task.abort();
            tracing::trace!(superseded = previous.handle.0, "Debounced job superseded");
        }

        let task = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            job().await;
        });
        *pending = Some(Pending { handle, task });

        handle
    }

    /// Cancels `handle` if it is still the pending job. Returns whether anything was cancelled.
    pub fn cancel(&self, handle: DebounceHandle) -> bool {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        let is_current = pending
            .as_ref()
            .is_some_and(|p| p.handle == handle && !p.task.is_finished());
        if !is_current {
            return false;
        }
        if let Some(p) = pending.take() {
            p.task.abort();
        }
        true
    }

    /// True while a scheduled job has not yet finished.
    pub fn is_pending(&self) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|p| !p.task.is_finished())
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        let pending = self.pending.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(p) = pending.take() {
            p.task.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn counter_job(
        counter: &Arc<AtomicU64>,
        value: u64,
    ) -> impl FnOnce() -> std::future::Ready<()> {
        let counter = Arc::clone(counter);
        move || {
            counter.store(value, Ordering::SeqCst);
            std::future::ready(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_burst_runs_only_last_job() {
        let debouncer = Debouncer::new(Duration::from_millis(500));
        let last = Arc::new(AtomicU64::new(0));
        let runs = Arc::new(AtomicU64::new(0));

        for i in 1..=5 {
            let last = Arc::clone(&last);
            let runs = Arc::clone(&runs);
            debouncer.schedule(move || async move {
                runs.fetch_add(1, Ordering::SeqCst);
                last.store(i, Ordering::SeqCst);
            });
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        assert_eq!(runs.load(Ordering::SeqCst), 0);
        assert!(debouncer.is_pending());

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert_eq!(last.load(Ordering::SeqCst), 5);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_job_waits_for_quiet_period() {
        let debouncer = Debouncer::new(Duration::from_millis(500));
        let value = Arc::new(AtomicU64::new(0));
        debouncer.schedule(counter_job(&value, 7));

        tokio::time::sleep(Duration::from_millis(499)).await;
        assert_eq!(value.load(Ordering::SeqCst), 0);
        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(value.load(Ordering::SeqCst), 7);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_pending_job() {
        let debouncer = Debouncer::new(Duration::from_millis(500));
        let value = Arc::new(AtomicU64::new(0));
        let handle = debouncer.schedule(counter_job(&value, 1));

        assert!(debouncer.cancel(handle));
        assert!(!debouncer.cancel(handle));
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(value.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stale_handle_is_noop() {
        let debouncer = Debouncer::new(Duration::from_millis(500));
        let value = Arc::new(AtomicU64::new(0));
        let stale = debouncer.schedule(counter_job(&value, 1));
        debouncer.schedule(counter_job(&value, 2));

        assert!(!debouncer.cancel(stale));
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(value.load(Ordering::SeqCst), 2);
    }
}
