//! Multicast (hot) streams.
//!
//! A [`HotStream`] fans every emitted event out to all observers that are
//! registered at the moment of emission. Nothing is buffered: a late
//! observer misses earlier events. Production is never repeated per
//! observer, which is what lets several derived pipelines share one
//! upstream source.
//!
//! A stream ends with [`StreamEvent::Complete`]. Completion is terminal and
//! delivered once; observers that subscribe after completion receive it
//! immediately.

use std::fmt::Debug;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::warn;

use super::observer::ObserverList;
use super::subscription::Subscription;

/// One event on a [`HotStream`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamEvent<T> {
    Next(T),
    Complete,
}

struct Shared<T> {
    observers: Arc<ObserverList<StreamEvent<T>>>,
    completed: AtomicBool,
}

/// A multicast stream with no replay.
pub struct HotStream<T>
where
    T: Clone + Send + Sync + 'static,
{
    shared: Arc<Shared<T>>,
}

impl<T> HotStream<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                observers: ObserverList::new(),
                completed: AtomicBool::new(false),
            }),
        }
    }

    /// Deliver `value` to every current observer.
    ///
    /// Emitting on a completed stream is ignored.
    pub fn emit(&self, value: T) {
        if self.is_completed() {
            warn!("emit on a completed stream ignored");
            return;
        }
        self.shared.observers.notify_all(&StreamEvent::Next(value));
    }

    /// End the stream. Only the first call has any effect.
    pub fn complete(&self) {
        if self.shared.completed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.shared.observers.notify_all(&StreamEvent::Complete);
        self.shared.observers.clear();
    }

    pub fn is_completed(&self) -> bool {
        self.shared.completed.load(Ordering::SeqCst)
    }

    /// Register an observer for future events.
    pub fn subscribe<F>(&self, observer: F) -> Subscription
    where
        F: Fn(&StreamEvent<T>) + Send + Sync + 'static,
    {
        let (observer, subscription) = self.shared.observers.register(observer);
        if self.is_completed() {
            self.shared.observers.remove(subscription.id());
            observer.notify(&StreamEvent::Complete);
        }
        subscription
    }

    /// Derive a stream that forwards events while `predicate` holds.
    ///
    /// The predicate is evaluated per event at arrival time. The first
    /// event that fails it is dropped and completes the derived stream;
    /// upstream completion completes it too. The returned subscription
    /// keeps the derived stream attached to this one.
    pub fn take_while<P>(&self, predicate: P) -> (HotStream<T>, Subscription)
    where
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        let derived = HotStream::new();
        let downstream = derived.clone();
        let subscription = self.subscribe(move |event| match event {
            StreamEvent::Next(value) => {
                if downstream.is_completed() {
                    return;
                }
                if predicate(value) {
                    downstream.emit(value.clone());
                } else {
                    downstream.complete();
                }
            }
            StreamEvent::Complete => downstream.complete(),
        });
        (derived, subscription)
    }

    pub fn observer_count(&self) -> usize {
        self.shared.observers.len()
    }
}

impl<T> Default for HotStream<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for HotStream<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> Debug for HotStream<T>
where
    T: Clone + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HotStream")
            .field("observer_count", &self.observer_count())
            .field("completed", &self.is_completed())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    fn recorder<T: Clone + Send + 'static>() -> (
        Arc<Mutex<Vec<StreamEvent<T>>>>,
        impl Fn(&StreamEvent<T>) + Send + Sync + 'static,
    )
    where
        T: Sync,
    {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        (events, move |e: &StreamEvent<T>| sink.lock().push(e.clone()))
    }

    #[test]
    fn multicasts_to_all_observers() {
        let stream = HotStream::new();
        let (a, record_a) = recorder::<i32>();
        let (b, record_b) = recorder::<i32>();
        let _sa = stream.subscribe(record_a);
        let _sb = stream.subscribe(record_b);

        stream.emit(1);
        stream.emit(2);

        assert_eq!(*a.lock(), vec![StreamEvent::Next(1), StreamEvent::Next(2)]);
        assert_eq!(*a.lock(), *b.lock());
    }

    #[test]
    fn late_observer_misses_past_events() {
        let stream = HotStream::new();
        stream.emit(1);

        let (seen, record) = recorder::<i32>();
        let _sub = stream.subscribe(record);
        stream.emit(2);

        assert_eq!(*seen.lock(), vec![StreamEvent::Next(2)]);
    }

    #[test]
    fn completion_is_terminal() {
        let stream = HotStream::new();
        let (seen, record) = recorder::<i32>();
        let _sub = stream.subscribe(record);

        stream.complete();
        stream.complete();
        stream.emit(3);

        assert_eq!(*seen.lock(), vec![StreamEvent::Complete]);
        assert_eq!(stream.observer_count(), 0);

        let (late, record_late) = recorder::<i32>();
        let _late = stream.subscribe(record_late);
        assert_eq!(*late.lock(), vec![StreamEvent::Complete]);
    }

    #[test]
    fn take_while_cuts_on_first_failure() {
        let stream = HotStream::new();
        let (derived, _link) = stream.take_while(|v: &i32| *v < 3);
        let (seen, record) = recorder::<i32>();
        let _sub = derived.subscribe(record);

        for v in [1, 2, 3, 1] {
            stream.emit(v);
        }

        assert_eq!(
            *seen.lock(),
            vec![StreamEvent::Next(1), StreamEvent::Next(2), StreamEvent::Complete]
        );
        assert!(derived.is_completed());
        assert!(!stream.is_completed());
    }

    #[test]
    fn take_while_forwards_upstream_completion() {
        let stream = HotStream::new();
        let (derived, _link) = stream.take_while(|_: &i32| true);
        let (seen, record) = recorder::<i32>();
        let _sub = derived.subscribe(record);

        stream.emit(5);
        stream.complete();

        assert_eq!(*seen.lock(), vec![StreamEvent::Next(5), StreamEvent::Complete]);
    }

    #[test]
    fn dropping_link_detaches_derived_stream() {
        let stream = HotStream::new();
        let (derived, link) = stream.take_while(|_: &i32| true);
        let (seen, record) = recorder::<i32>();
        let _sub = derived.subscribe(record);

        drop(link);
        stream.emit(1);

        assert!(seen.lock().is_empty());
        assert_eq!(stream.observer_count(), 0);
    }
}
