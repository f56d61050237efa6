//! StateCell Implementation
//!
//! A StateCell is the single mutable source of truth in the graph. It holds
//! a value and an ordered list of observers.
//!
//! # How StateCells Work
//!
//! 1. `subscribe` registers an observer and immediately replays the current
//!    value to it.
//!
//! 2. `set` replaces the value and notifies every observer, in registration
//!    order, before returning.
//!
//! 3. `update` and `try_update` compute the next value from the current one
//!    while holding the write lock, so two concurrent read-modify-write
//!    callers never start from the same snapshot.
//!
//! # Delivery Gate
//!
//! Every write, and the delivery round that follows it, happens while the
//! cell's delivery gate is held. The gate is re-entrant:
//!
//! - A `set` issued from inside an observer callback (same thread) is
//!   queued and delivered after the current round completes, so every
//!   observer sees the values in the same order and never sees a round
//!   interleaved with another.
//!
//! - A `set` from another thread waits for the running round to finish,
//!   then writes and delivers its own value before returning. Writes and
//!   deliveries can therefore never be reordered across threads, and the
//!   last value delivered is always the value `get` returns.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt::Debug;
use std::sync::Arc;

use parking_lot::{ReentrantMutex, RwLock};

use super::observer::ObserverList;
use super::subscription::Subscription;

struct Delivery<T> {
    queue: VecDeque<T>,
    draining: bool,
}

struct Shared<T> {
    value: RwLock<T>,
    observers: Arc<ObserverList<T>>,
    gate: ReentrantMutex<RefCell<Delivery<T>>>,
}

/// An observable cell holding a value of type T.
///
/// Cloning a `StateCell` produces another handle to the same cell.
///
/// # Example
///
/// ```rust
/// use collage_core::reactive::StateCell;
///
/// let count = StateCell::new(0);
/// let _sub = count.subscribe(|v| println!("count = {v}"));
///
/// count.set(5);
/// assert_eq!(count.get(), 5);
/// ```
pub struct StateCell<T>
where
    T: Clone + Send + Sync + 'static,
{
    shared: Arc<Shared<T>>,
}

impl<T> StateCell<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create a new cell with the given initial value.
    pub fn new(value: T) -> Self {
        Self {
            shared: Arc::new(Shared {
                value: RwLock::new(value),
                observers: ObserverList::new(),
                gate: ReentrantMutex::new(RefCell::new(Delivery {
                    queue: VecDeque::new(),
                    draining: false,
                })),
            }),
        }
    }

    /// Get a clone of the current value.
    pub fn get(&self) -> T {
        self.shared.value.read().clone()
    }

    /// Read the current value through a closure without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.shared.value.read())
    }

    /// Replace the value and notify observers.
    pub fn set(&self, value: T) {
        self.try_update(move |_| Some(value));
    }

    /// Replace the value with one computed from the current value.
    pub fn update<F>(&self, f: F)
    where
        F: FnOnce(&T) -> T,
    {
        self.try_update(move |current| Some(f(current)));
    }

    /// Like [`StateCell::update`], but `f` may decline the change by
    /// returning `None`. Observers are only notified when a value was
    /// written. Returns whether the cell changed.
    pub fn try_update<F>(&self, f: F) -> bool
    where
        F: FnOnce(&T) -> Option<T>,
    {
        let gate = self.shared.gate.lock();
        let next = {
            let mut guard = self.shared.value.write();
            match f(&guard) {
                Some(next) => {
                    *guard = next.clone();
                    next
                }
                None => return false,
            }
        };

        {
            let mut delivery = gate.borrow_mut();
            delivery.queue.push_back(next);
            if delivery.draining {
                return true;
            }
            delivery.draining = true;
        }

        loop {
            let next = gate.borrow_mut().queue.pop_front();
            match next {
                Some(value) => self.shared.observers.notify_all(&value),
                None => break,
            }
        }
        gate.borrow_mut().draining = false;
        true
    }

    /// Register an observer.
    ///
    /// The current value is replayed to the new observer before this
    /// returns; every later change follows. Dropping the returned
    /// subscription stops delivery.
    pub fn subscribe<F>(&self, observer: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let _gate = self.shared.gate.lock();
        let (observer, subscription) = self.shared.observers.register(observer);
        let current = self.get();
        observer.notify(&current);
        subscription
    }

    /// Get the number of registered observers.
    pub fn observer_count(&self) -> usize {
        self.shared.observers.len()
    }
}

impl<T> Clone for StateCell<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> Default for StateCell<T>
where
    T: Clone + Default + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> Debug for StateCell<T>
where
    T: Clone + Send + Sync + Debug + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateCell")
            .field("value", &*self.shared.value.read())
            .field("observer_count", &self.observer_count())
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
