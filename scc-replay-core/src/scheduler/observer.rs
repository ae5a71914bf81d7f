//! Progress observers.
//!
//! An observer is a callback invoked with a [`Progress`] every time the
//! scheduler moves the cursor. Observers are registered from any thread via
//! the session handle and invoked on the session task.
//!
//! Callbacks run after the registry lock is released, so an observer may
//! subscribe or unsubscribe (itself included) from inside its callback.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::mpsc;

use crate::session::Progress;

/// Unique identifier for a registered observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

impl ObserverId {
    fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Clone)]
enum Sink {
    Callback(Arc<dyn Fn(&Progress) + Send + Sync>),
    Channel(mpsc::UnboundedSender<Progress>),
}

#[derive(Clone)]
struct Observer {
    id: ObserverId,
    sink: Sink,
}

/// Registry shared between handles and the session task.
#[derive(Clone, Default)]
pub(crate) struct Observers {
    inner: Arc<RwLock<Vec<Observer>>>,
}

impl Observers {
    pub(crate) fn subscribe<F>(&self, notify: F) -> ObserverId
    where
        F: Fn(&Progress) + Send + Sync + 'static,
    {
        self.register(Sink::Callback(Arc::new(notify)))
    }

    /// Forward progress into `tx`. The observer is dropped from the registry
    /// once the receiving side is gone.
    pub(crate) fn subscribe_channel(&self, tx: mpsc::UnboundedSender<Progress>) -> ObserverId {
        self.register(Sink::Channel(tx))
    }

    fn register(&self, sink: Sink) -> ObserverId {
        let id = ObserverId::next();
        self.inner.write().push(Observer { id, sink });
        id
    }

    pub(crate) fn unsubscribe(&self, id: ObserverId) -> bool {
        let mut observers = self.inner.write();
        let before = observers.len();
        observers.retain(|o| o.id != id);
        observers.len() != before
    }

    pub(crate) fn notify(&self, progress: &Progress) {
        // Copy the set out so callbacks never run under the lock.
        let observers: Vec<Observer> = self.inner.read().clone();

        let mut closed = Vec::new();
        for observer in &observers {
            match &observer.sink {
                Sink::Callback(notify) => notify(progress),
                Sink::Channel(tx) => {
                    if tx.send(progress.clone()).is_err() {
                        closed.push(observer.id);
                    }
                }
            }
        }

        if !closed.is_empty() {
            self.inner.write().retain(|o| !closed.contains(&o.id));
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.inner.read().len()
    }
}

impl std::fmt::Debug for Observers {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Observers").field("count", &self.len()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    fn progress(cursor: usize) -> Progress {
        Progress {
            cursor,
            total: 10,
            event: None,
        }
    }

    #[test]
    fn notifies_every_observer() {
        let observers = Observers::default();
        let seen = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let seen = seen.clone();
            observers.subscribe(move |p| {
                seen.fetch_add(p.cursor, Ordering::SeqCst);
            });
        }
        observers.notify(&progress(2));

        assert_eq!(seen.load(Ordering::SeqCst), 6);
    }

    #[test]
    fn unsubscribe_stops_notifications() {
        let observers = Observers::default();
        let seen = Arc::new(AtomicUsize::new(0));
        let seen_clone = seen.clone();

        let id = observers.subscribe(move |_| {
            seen_clone.fetch_add(1, Ordering::SeqCst);
        });
        assert!(observers.unsubscribe(id));
        assert!(!observers.unsubscribe(id));

        observers.notify(&progress(0));
        assert_eq!(seen.load(Ordering::SeqCst), 0);
        assert_eq!(observers.len(), 0);
    }

    #[test]
    fn observer_can_unsubscribe_itself() {
        let observers = Observers::default();
        let seen = Arc::new(AtomicUsize::new(0));
        let slot = Arc::new(parking_lot::Mutex::new(None));

        let id = {
            let registry = observers.clone();
            let seen = seen.clone();
            let slot = slot.clone();
            observers.subscribe(move |_| {
                seen.fetch_add(1, Ordering::SeqCst);
                if let Some(id) = slot.lock().take() {
                    registry.unsubscribe(id);
                }
            })
        };
        *slot.lock() = Some(id);

        observers.notify(&progress(0));
        observers.notify(&progress(1));

        assert_eq!(seen.load(Ordering::SeqCst), 1);
        assert_eq!(observers.len(), 0);
    }

    #[test]
    fn observer_can_subscribe_from_callback() {
        let observers = Observers::default();
        let registry = observers.clone();
        observers.subscribe(move |_| {
            registry.subscribe(|_| {});
        });

        observers.notify(&progress(0));
        assert_eq!(observers.len(), 2);
    }

    #[test]
    fn closed_channels_are_pruned() {
        let observers = Observers::default();
        let (tx, rx) = mpsc::unbounded_channel();
        observers.subscribe_channel(tx);

        observers.notify(&progress(0));
        assert_eq!(observers.len(), 1);

        drop(rx);
        observers.notify(&progress(1));
        assert_eq!(observers.len(), 0);
    }
}
