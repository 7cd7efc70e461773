//! Runtime helpers for timer-driven work
//!
//! Provides a small spawn/handle abstraction over tokio and the [`Debouncer`]
//! used to delay search-as-you-type queries until typing pauses.

use crate::core::config::SearchConfig;
use crate::prelude::{Arc, Duration, Future, Mutex};
use ::tokio::task::JoinHandle;

/// Handle to a spawned async task
pub trait AsyncHandle: Send + Sync {
    /// Check if the task is finished
    fn is_finished(&self) -> bool;

    /// Cancel the task
    fn cancel(&self);
}

struct TokioHandle(JoinHandle<()>);

impl AsyncHandle for TokioHandle {
    fn is_finished(&self) -> bool {
        self.0.is_finished()
    }

    fn cancel(&self) {
        self.0.abort();
    }
}

/// Spawn a future on the current tokio runtime.
///
/// Must be called from within a runtime context.
pub fn spawn<F>(future: F) -> Box<dyn AsyncHandle>
where
    F: Future<Output = ()> + Send + 'static,
{
    Box::new(TokioHandle(::tokio::spawn(future)))
}

type DebounceCallback<T> = Arc<dyn Fn(T) + Send + Sync>;

/// Cancellable fire-once timer.
///
/// Each [`schedule`](Debouncer::schedule) cancels the pending timer and starts
/// a new one; the callback runs once with the latest value after `delay`
/// passes with no further input. Dropping the debouncer cancels it.
pub struct Debouncer<T> {
    delay: Duration,
    callback: DebounceCallback<T>,
    pending: Mutex<Option<Box<dyn AsyncHandle>>>,
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new<F>(delay: Duration, callback: F) -> Self
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        Self {
            delay,
            callback: Arc::new(callback),
            pending: Mutex::new(None),
        }
    }

    /// Debouncer using the search quiescence window
    pub fn for_search<F>(config: &SearchConfig, callback: F) -> Self
    where
        F: Fn(T) + Send + Sync + 'static,
    {
        Self::new(config.debounce(), callback)
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Restart the quiescence window with a new value
    pub fn schedule(&self, value: T) {
        let callback = self.callback.clone();
        let delay = self.delay;
        let handle = spawn(async move {
            ::tokio::time::sleep(delay).await;
            callback(value);
        });

        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = pending.replace(handle) {
            previous.cancel();
        }
    }

    /// Drop the pending timer, if any
    pub fn cancel(&self) {
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = pending.take() {
            log::debug!("debounced call cancelled");
            previous.cancel();
        }
    }

    pub fn is_pending(&self) -> bool {
        let pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        pending.as_ref().map(|h| !h.is_finished()).unwrap_or(false)
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Ok(mut pending) = self.pending.lock() {
            if let Some(handle) = pending.take() {
                handle.cancel();
            }
        }
    }
}
