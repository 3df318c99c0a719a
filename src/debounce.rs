//! Debounced, fire-and-forget invocation of a callback.
//!
//! Every [`Debouncer::call`] cancels the pending invocation (if any) and
//! schedules a new one after the delay, so only the most recent argument
//! ever reaches the callback. The callback itself can be swapped at any
//! time without touching the pending timer. Dropping the debouncer cancels
//! whatever is pending.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;

type Callback<T> = Box<dyn FnMut(T) + Send>;

struct Shared<T> {
    callback: Callback<T>,
    pending: Option<T>,
    /// Bumped by every `call`; a timer only delivers for its own generation.
    generation: u64,
}

pub struct Debouncer<T> {
    delay: Duration,
    shared: Arc<Mutex<Shared<T>>>,
    timer: Option<JoinHandle<()>>,
}

fn lock<T>(shared: &Mutex<Shared<T>>) -> MutexGuard<'_, Shared<T>> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

impl<T: Send + 'static> Debouncer<T> {
    pub fn new(delay: Duration, callback: impl FnMut(T) + Send + 'static) -> Self {
        Self {
            delay,
            shared: Arc::new(Mutex::new(Shared {
                callback: Box::new(callback),
                pending: None,
                generation: 0,
            })),
            timer: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Replace the callback. A pending call delivers to the new callback.
    pub fn set_callback(&self, callback: impl FnMut(T) + Send + 'static) {
        lock(&self.shared).callback = Box::new(callback);
    }

    /// Schedule `arg` for delivery after the delay, replacing any pending call.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn call(&mut self, arg: T) {
        self.stop_timer();
        let generation = {
            let mut shared = lock(&self.shared);
            shared.pending = Some(arg);
            shared.generation += 1;
            shared.generation
        };

        let shared = Arc::clone(&self.shared);
        let delay = self.delay;
        self.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut shared = lock(&shared);
            if shared.generation != generation {
                return;
            }
            if let Some(arg) = shared.pending.take() {
                (shared.callback)(arg);
            }
        }));
    }

    /// Swap in `callback` and schedule `arg`, as one step.
    pub fn call_with(&mut self, callback: impl FnMut(T) + Send + 'static, arg: T) {
        self.set_callback(callback);
        self.call(arg);
    }

    /// Drop the pending call, if any.
    pub fn cancel(&mut self) {
        self.stop_timer();
        lock(&self.shared).pending = None;
    }

    /// Deliver the pending call now instead of waiting out the delay.
    pub fn flush(&mut self) {
        self.stop_timer();
        let mut shared = lock(&self.shared);
        if let Some(arg) = shared.pending.take() {
            (shared.callback)(arg);
        }
    }

    pub fn is_pending(&self) -> bool {
        lock(&self.shared).pending.is_some()
    }

    fn stop_timer(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}

impl<T> Drop for Debouncer<T> {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
        lock(&self.shared).pending = None;
    }
}

#[cfg(test)]
#[path = "../tests/rust/test_debounce.rs"]
mod tests;
