//! Reactive Primitives
//!
//! This module implements the event-stream graph the collage session is
//! built from: state cells, hot streams, and the subscriptions that tie
//! observers to them.
//!
//! # Concepts
//!
//! ## StateCells
//!
//! A StateCell is a container for mutable state. New observers get the
//! current value replayed immediately, then every later value. Observers are
//! notified synchronously and in registration order.
//!
//! ## HotStreams
//!
//! A HotStream is a multicast event source. Every observer registered at
//! emission time sees the same event; late observers miss earlier events.
//! Streams end with a terminal completion event.
//!
//! ## Subscriptions and Scopes
//!
//! Every registration returns a Subscription. Dropping or cancelling it
//! detaches the observer. A SubscriptionScope collects the subscriptions of
//! one screen and cancels them together on teardown.
//!
//! # Implementation Notes
//!
//! There is no global runtime or thread-local tracking context: every
//! source owns its observer list, and the whole graph is owned by one
//! session object.

mod observer;
mod state_cell;
mod hot_stream;
mod subscription;
mod scope;

pub use state_cell::StateCell;
pub use hot_stream::{HotStream, StreamEvent};
pub use subscription::{ActiveToken, CancelHandle, SubscriberId, Subscription};
pub use scope::SubscriptionScope;
