//! Subscription handles.
//!
//! Every observer registration, timer and pending async callback in the
//! graph is represented by a [`Subscription`]. Cancelling a subscription
//! (explicitly or by dropping it) flips its shared active flag and runs its
//! teardown exactly once. Callbacks hold an [`ActiveToken`] and check it
//! before firing, so a cancelled registration never observes anything.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::task::JoinHandle;

/// Unique identifier for an observer registration.
///
/// Each registration gets a unique ID when created. Sources use it to find
/// and remove the observer on cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(u64);

impl SubscriberId {
    /// Generate a new unique subscriber ID.
    ///
    /// Uses an atomic counter to ensure uniqueness across threads.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for SubscriberId {
    fn default() -> Self {
        Self::new()
    }
}

/// Cheap, cloneable view of a subscription's liveness.
#[derive(Debug, Clone)]
pub struct ActiveToken(Arc<AtomicBool>);

impl ActiveToken {
    pub fn is_active(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    /// Mark work as finished on its own, so holders can prune it.
    ///
    /// Returns `false` if the work had already been cancelled. Cancellation
    /// and finishing race on one flag, so exactly one of them wins.
    pub(crate) fn finish(&self) -> bool {
        self.0.swap(false, Ordering::SeqCst)
    }
}

type Teardown = Box<dyn FnOnce() + Send>;

/// Handle to one active registration.
///
/// Dropping this handle cancels the registration.
pub struct Subscription {
    id: SubscriberId,
    active: Arc<AtomicBool>,
    teardown: Option<Teardown>,
}

impl Subscription {
    /// Wrap a registration whose liveness is tracked by `active`.
    ///
    /// `teardown` runs once, on the first cancellation.
    pub(crate) fn new<F>(id: SubscriberId, active: Arc<AtomicBool>, teardown: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            id,
            active,
            teardown: Some(Box::new(teardown)),
        }
    }

    /// A subscription with nothing to tear down but its active flag.
    ///
    /// Used for async work that must not be aborted but whose completion
    /// should be ignored once cancelled (check [`Subscription::token`]).
    pub fn detached() -> Self {
        Self {
            id: SubscriberId::new(),
            active: Arc::new(AtomicBool::new(true)),
            teardown: None,
        }
    }

    /// Tie a spawned task to a subscription: cancelling aborts the task.
    pub fn from_task(active: ActiveToken, handle: JoinHandle<()>) -> Self {
        Self {
            id: SubscriberId::new(),
            active: active.0,
            teardown: Some(Box::new(move || handle.abort())),
        }
    }

    /// A fresh, active token for a task that will be handed to
    /// [`Subscription::from_task`].
    pub fn new_token() -> ActiveToken {
        ActiveToken(Arc::new(AtomicBool::new(true)))
    }

    pub fn id(&self) -> SubscriberId {
        self.id
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }

    pub fn token(&self) -> ActiveToken {
        ActiveToken(Arc::clone(&self.active))
    }

    /// Split into an owning handle and a [`CancelHandle`].
    ///
    /// The owning handle goes to a scope as usual; the cancel handle lets
    /// another part of the graph end the registration early. Whichever
    /// cancels first tears it down.
    pub fn into_shared(self) -> (Subscription, CancelHandle) {
        let id = self.id;
        let slot = Arc::new(Mutex::new(Some(self)));
        let active = Arc::new(AtomicBool::new(true));
        let owned = Arc::clone(&slot);
        let outer = Subscription::new(id, Arc::clone(&active), move || {
            let inner = owned.lock().take();
            drop(inner);
        });
        (outer, CancelHandle { slot, active })
    }

    /// Cancel the registration now.
    pub fn cancel(mut self) {
        self.cancel_in_place();
    }

    fn cancel_in_place(&mut self) {
        if self.active.swap(false, Ordering::SeqCst) {
            if let Some(teardown) = self.teardown.take() {
                teardown();
            }
        }
    }
}

/// Early cancellation for a subscription owned elsewhere.
///
/// See [`Subscription::into_shared`].
#[derive(Clone)]
pub struct CancelHandle {
    slot: Arc<Mutex<Option<Subscription>>>,
    active: Arc<AtomicBool>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        if self.active.swap(false, Ordering::SeqCst) {
            let inner = self.slot.lock().take();
            drop(inner);
        }
    }

    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::SeqCst)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel_in_place();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicI32;

    #[test]
    fn subscriber_ids_are_unique() {
        let id1 = SubscriberId::new();
        let id2 = SubscriberId::new();
        let id3 = SubscriberId::new();

        assert_ne!(id1, id2);
        assert_ne!(id2, id3);
        assert_ne!(id1, id3);
    }

    #[test]
    fn teardown_runs_once_on_cancel() {
        let runs = Arc::new(AtomicI32::new(0));
        let runs_clone = runs.clone();
        let active = Arc::new(AtomicBool::new(true));

        let sub = Subscription::new(SubscriberId::new(), active.clone(), move || {
            runs_clone.fetch_add(1, Ordering::SeqCst);
        });
        let token = sub.token();

        assert!(token.is_active());
        sub.cancel();

        assert!(!token.is_active());
        assert!(!active.load(Ordering::SeqCst));
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn dropping_cancels() {
        let runs = Arc::new(AtomicI32::new(0));
        let runs_clone = runs.clone();

        let sub = Subscription::new(SubscriberId::new(), Arc::new(AtomicBool::new(true)), move || {
            runs_clone.fetch_add(1, Ordering::SeqCst);
        });
        let token = sub.token();
        drop(sub);

        assert!(!token.is_active());
        assert_eq!(runs.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn detached_only_flips_flag() {
        let sub = Subscription::detached();
        let token = sub.token();
        assert!(sub.is_active());

        sub.cancel();
        assert!(!token.is_active());
    }

    #[tokio::test(start_paused = true)]
    async fn task_subscription_aborts_on_cancel() {
        let fired = Arc::new(AtomicBool::new(false));
        let fired_clone = fired.clone();
        let token = Subscription::new_token();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(std::time::Duration::from_secs(1)).await;
            fired_clone.store(true, Ordering::SeqCst);
        });
        let sub = Subscription::from_task(token.clone(), handle);

        sub.cancel();
        tokio::time::sleep(std::time::Duration::from_secs(2)).await;

        assert!(!token.is_active());
        assert!(!fired.load(Ordering::SeqCst));
    }

    #[test]
    fn cancel_handle_ends_registration_early() {
        let cell = crate::reactive::StateCell::new(0);
        let calls = Arc::new(AtomicI32::new(0));
        let calls_clone = calls.clone();
        let sub = cell.subscribe(move |_| {
            calls_clone.fetch_add(1, Ordering::SeqCst);
        });

        let (owned, early) = sub.into_shared();
        early.cancel();

        assert!(!owned.is_active());
        assert!(!early.is_active());
        assert_eq!(cell.observer_count(), 0);
        cell.set(1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn dropping_owned_half_cancels_too() {
        let cell = crate::reactive::StateCell::new(0);
        let (owned, early) = cell.subscribe(|_| {}).into_shared();

        drop(owned);

        assert!(!early.is_active());
        assert_eq!(cell.observer_count(), 0);
    }
}
