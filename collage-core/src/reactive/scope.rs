//! Subscription Scope
//!
//! The scope is the lifetime boundary of one screen. Every subscription
//! created while the screen is alive is added here and cancelled together
//! by [`SubscriptionScope::release`].
//!
//! # Misuse
//!
//! Adding to a released scope is a programming error. Debug builds panic;
//! release builds cancel the incoming subscription on the spot and return
//! [`CollageError::ScopeReleased`], so nothing registered late can fire.

use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::Mutex;
use tracing::{debug, warn};

use super::subscription::{SubscriberId, Subscription};
use crate::error::{CollageError, Result};

#[derive(Default)]
struct ScopeState {
    held: IndexMap<SubscriberId, Subscription>,
    released: bool,
}

/// Registry of the subscriptions tied to one screen.
///
/// Cloning yields another handle to the same registry, so callbacks deep
/// in the graph can register the work they start.
#[derive(Clone, Default)]
pub struct SubscriptionScope {
    state: Arc<Mutex<ScopeState>>,
}

impl SubscriptionScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of `subscription` until the scope is released.
    pub fn add(&self, subscription: Subscription) -> Result<()> {
        if let Err(subscription) = self.insert(subscription) {
            debug_assert!(false, "subscription registered after scope release");
            warn!("subscription registered after scope release; cancelled");
            subscription.cancel();
            return Err(CollageError::ScopeReleased);
        }
        Ok(())
    }

    /// Like [`SubscriptionScope::add`], for work started by an async
    /// completion that may legitimately race with teardown. A released
    /// scope cancels `subscription` and returns `false`.
    pub(crate) fn add_if_live(&self, subscription: Subscription) -> bool {
        match self.insert(subscription) {
            Ok(()) => true,
            Err(subscription) => {
                debug!("scope released before late work registered; cancelled");
                subscription.cancel();
                false
            }
        }
    }

    fn insert(&self, subscription: Subscription) -> std::result::Result<(), Subscription> {
        let mut state = self.state.lock();
        if state.released {
            return Err(subscription);
        }
        // Drop handles that already finished on their own.
        state.held.retain(|_, held| held.is_active());
        state.held.insert(subscription.id(), subscription);
        Ok(())
    }

    /// Cancel every held subscription.
    ///
    /// Must be called once; further calls are ignored.
    pub fn release(&self) {
        let drained: Vec<Subscription> = {
            let mut state = self.state.lock();
            if state.released {
                warn!("scope released twice");
                return;
            }
            state.released = true;
            state.held.drain(..).map(|(_, sub)| sub).collect()
        };

        debug!(count = drained.len(), "releasing subscription scope");
        for subscription in drained {
            subscription.cancel();
        }
    }

    pub fn is_released(&self) -> bool {
        self.state.lock().released
    }

    /// Number of subscriptions currently held.
    pub fn len(&self) -> usize {
        self.state.lock().held.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for SubscriptionScope {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("SubscriptionScope")
            .field("held", &state.held.len())
            .field("released", &state.released)
            .finish()
    }
}
