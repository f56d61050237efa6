//! Ordered observer registry shared by every reactive source.
//!
//! Observers are notified in registration order. Notification works on a
//! snapshot of the list, so observers may subscribe or cancel from inside
//! a callback without deadlocking; a cancelled observer is skipped even if
//! it is still present in the snapshot.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

use super::subscription::{SubscriberId, Subscription};

type Callback<E> = Box<dyn Fn(&E) + Send + Sync>;

pub(crate) struct Observer<E> {
    id: SubscriberId,
    active: Arc<AtomicBool>,
    callback: Callback<E>,
}

impl<E> Observer<E> {
    pub(crate) fn notify(&self, event: &E) {
        if self.active.load(Ordering::SeqCst) {
            (self.callback)(event);
        }
    }
}

pub(crate) struct ObserverList<E> {
    observers: Mutex<Vec<Arc<Observer<E>>>>,
}

impl<E: 'static> ObserverList<E> {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            observers: Mutex::new(Vec::new()),
        })
    }

    /// Append an observer. The returned subscription removes it again.
    pub(crate) fn register<F>(self: &Arc<Self>, callback: F) -> (Arc<Observer<E>>, Subscription)
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let id = SubscriberId::new();
        let active = Arc::new(AtomicBool::new(true));
        let observer = Arc::new(Observer {
            id,
            active: Arc::clone(&active),
            callback: Box::new(callback),
        });
        self.observers.lock().push(Arc::clone(&observer));

        let list: Weak<Self> = Arc::downgrade(self);
        let subscription = Subscription::new(id, active, move || {
            if let Some(list) = list.upgrade() {
                list.remove(id);
            }
        });
        (observer, subscription)
    }

    pub(crate) fn notify_all(&self, event: &E) {
        let snapshot: Vec<Arc<Observer<E>>> = self.observers.lock().clone();
        for observer in snapshot {
            observer.notify(event);
        }
    }

    pub(crate) fn remove(&self, id: SubscriberId) {
        self.observers.lock().retain(|o| o.id != id);
    }

    pub(crate) fn clear(&self) {
        let drained: Vec<Arc<Observer<E>>> = std::mem::take(&mut *self.observers.lock());
        for observer in drained {
            observer.active.store(false, Ordering::SeqCst);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.observers.lock().len()
    }
}
