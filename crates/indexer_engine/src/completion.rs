use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use indexer_core::TaskKind;
use indexer_logging::indexer_error;

/// Broadcast once per run, after the worker exits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunFinished {
    pub task: TaskKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type FinishedCallback = Arc<dyn Fn(&RunFinished) + Send + Sync>;

/// Multicast, non-replaying completion event.
#[derive(Default)]
pub struct CompletionSignal {
    next_id: AtomicU64,
    subscribers: Mutex<Vec<(SubscriptionId, FinishedCallback)>>,
}

impl CompletionSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_finished<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&RunFinished) + Send + Sync + 'static,
    {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.lock().push((id, Arc::new(callback)));
        id
    }

    /// Returns false if `id` was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self.lock();
        let before = subscribers.len();
        subscribers.retain(|(existing, _)| *existing != id);
        subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().len()
    }

    /// Calls every current subscriber; returns how many were called.
    ///
    /// Callbacks run outside the lock, so they may subscribe or unsubscribe.
    pub fn broadcast(&self, event: RunFinished) -> usize {
        let callbacks: Vec<FinishedCallback> = self
            .lock()
            .iter()
            .map(|(_, callback)| callback.clone())
            .collect();
        for callback in &callbacks {
            if panic::catch_unwind(AssertUnwindSafe(|| callback(&event))).is_err() {
                indexer_error!("completion subscriber panicked for task={}", event.task);
            }
        }
        callbacks.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(SubscriptionId, FinishedCallback)>> {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;

    use super::*;

    fn finished() -> RunFinished {
        RunFinished {
            task: TaskKind::Always,
        }
    }

    #[test]
    fn every_subscriber_is_called_once() {
        let signal = CompletionSignal::new();
        let calls = Arc::new(AtomicUsize::new(0));
        for _ in 0..3 {
            let calls = calls.clone();
            signal.on_finished(move |_| {
                calls.fetch_add(1, Ordering::SeqCst);
            });
        }

        assert_eq!(signal.broadcast(finished()), 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn late_subscribers_miss_past_events() {
        let signal = CompletionSignal::new();
        signal.broadcast(finished());

        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        signal.on_finished(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn unsubscribed_callbacks_are_not_called() {
        let signal = CompletionSignal::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let id = signal.on_finished(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(signal.unsubscribe(id));
        assert!(!signal.unsubscribe(id));
        assert_eq!(signal.broadcast(finished()), 0);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn panicking_subscriber_does_not_starve_others() {
        let signal = CompletionSignal::new();
        let calls = Arc::new(AtomicUsize::new(0));
        signal.on_finished(|_| panic!("subscriber bug"));
        let counter = calls.clone();
        signal.on_finished(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert_eq!(signal.broadcast(finished()), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn callback_may_unsubscribe_itself() {
        let signal = Arc::new(CompletionSignal::new());
        let slot: Arc<Mutex<Option<SubscriptionId>>> = Arc::new(Mutex::new(None));
        let (inner_signal, inner_slot) = (signal.clone(), slot.clone());
        let id = signal.on_finished(move |_| {
            if let Some(id) = *inner_slot.lock().unwrap() {
                inner_signal.unsubscribe(id);
            }
        });
        *slot.lock().unwrap() = Some(id);

        signal.broadcast(finished());
        assert_eq!(signal.subscriber_count(), 0);
    }
}
