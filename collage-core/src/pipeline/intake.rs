//! Selection Intake
//!
//! Bridges one run of the photo picker into the session:
//!
//! ```text
//! new_photos ─┬─take_while(len < capacity)──> accepted ──┬─> append to photo list
//!             │                                          └─> on completion: revert title after
//!             │                                              delay, stop the count override
//!             └─> photo that fills or overflows the list: limit alert, then pop
//! chosen_count ──filter(count > 0, len < capacity)──> "Selected N photos" override
//! ```
//!
//! Both streams are hot, so every branch sees the same events without
//! re-triggering the picker. The capacity predicate reads the live photo
//! list on every event, never a snapshot taken at start. The limit alert
//! only reacts to photos: closing the picker without picking never raises
//! it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tracing::{debug, info, warn};

use super::spawn_scoped;
use super::title::TitleController;
use crate::config::CollageConfig;
use crate::error::Result;
use crate::model::{selection_title, Image, PhotoList, UiAffordances};
use crate::ports::{Alerts, Navigator, PhotoPicker};
use crate::reactive::{CancelHandle, HotStream, StateCell, StreamEvent, Subscription, SubscriptionScope};

pub struct SelectionIntake {
    photos: StateCell<PhotoList>,
    titles: TitleController,
    alerts: Arc<dyn Alerts>,
    navigator: Arc<dyn Navigator>,
    scope: SubscriptionScope,
    runtime: Handle,
    capacity: usize,
    revert_delay: Duration,
    empty_title: String,
    limit_title: String,
    limit_body: String,
}

impl SelectionIntake {
    pub fn new(
        config: &CollageConfig,
        photos: StateCell<PhotoList>,
        titles: TitleController,
        alerts: Arc<dyn Alerts>,
        navigator: Arc<dyn Navigator>,
        scope: SubscriptionScope,
        runtime: Handle,
    ) -> Self {
        Self {
            photos,
            titles,
            alerts,
            navigator,
            scope,
            runtime,
            capacity: config.capacity,
            revert_delay: config.title_revert_delay(),
            empty_title: config.empty_title.clone(),
            limit_title: config.limit_alert_title.clone(),
            limit_body: config.limit_alert_message(),
        }
    }

    /// Open the picker and wire its streams into the session.
    ///
    /// The picker starts from a count of zero; capacity is enforced here
    /// against the live list rather than by the picker.
    pub fn start(&self, picker: &dyn PhotoPicker) -> Result<()> {
        let session = picker.select_photos(0);
        debug!(current = self.photos.with(|list| list.len()), "photo selection started");

        let (count_watch, stop_count_watch) =
            self.watch_count(&session.chosen_count).into_shared();
        self.scope.add(count_watch)?;

        let photos = self.photos.clone();
        let capacity = self.capacity;
        let (accepted, link) = session.new_photos.take_while(move |_| {
            let room = photos.with(|list| list.len() < capacity);
            if !room {
                debug!("photo dropped, collage is full");
            }
            room
        });
        self.scope.add(link)?;
        self.scope.add(self.append_accepted(&accepted))?;
        self.scope.add(self.finish_on_completion(&accepted, stop_count_watch))?;
        // Registered after the link, so it sees the list with the photo
        // already appended (or dropped).
        self.scope.add(self.alert_on_limit(&session.new_photos))?;
        Ok(())
    }

    fn watch_count(&self, chosen_count: &StateCell<usize>) -> Subscription {
        let photos = self.photos.clone();
        let titles = self.titles.clone();
        let capacity = self.capacity;
        chosen_count.subscribe(move |count| {
            if *count > 0 && photos.with(|list| list.len() < capacity) {
                titles.show_override(&selection_title(*count));
            }
        })
    }

    fn append_accepted(&self, accepted: &HotStream<Image>) -> Subscription {
        let photos = self.photos.clone();
        let capacity = self.capacity;
        accepted.subscribe(move |event| {
            let StreamEvent::Next(photo) = event else {
                return;
            };
            let appended = photos.try_update(|list| {
                (list.len() < capacity).then(|| {
                    let mut next = list.clone();
                    next.push(photo.clone());
                    next
                })
            });
            if !appended {
                warn!("append rejected at capacity");
            }
        })
    }

    fn finish_on_completion(
        &self,
        accepted: &HotStream<Image>,
        count_watch: CancelHandle,
    ) -> Subscription {
        let photos = self.photos.clone();
        let titles = self.titles.clone();
        let scope = self.scope.clone();
        let runtime = self.runtime.clone();
        let delay = self.revert_delay;
        let capacity = self.capacity;
        let empty_title = self.empty_title.clone();

        accepted.subscribe(move |event| {
            if !matches!(event, StreamEvent::Complete) {
                return;
            }
            debug!(?delay, "photo selection finished, scheduling title revert");
            count_watch.cancel();
            let photos = photos.clone();
            let empty_title = empty_title.clone();
            let timer = titles.schedule_revert(&runtime, delay, move || {
                let count = photos.with(|list| list.len());
                UiAffordances::for_count(count, capacity, &empty_title).title_text
            });
            scope.add_if_live(timer);
        })
    }

    fn alert_on_limit(&self, new_photos: &HotStream<Image>) -> Subscription {
        let photos = self.photos.clone();
        let alerts = Arc::clone(&self.alerts);
        let navigator = Arc::clone(&self.navigator);
        let scope = self.scope.clone();
        let runtime = self.runtime.clone();
        let capacity = self.capacity;
        let title = self.limit_title.clone();
        let body = self.limit_body.clone();
        let fired = AtomicBool::new(false);

        new_photos.subscribe(move |event| {
            if !matches!(event, StreamEvent::Next(_)) {
                return;
            }
            if !photos.with(|list| list.len() >= capacity) {
                return;
            }
            if fired.swap(true, Ordering::SeqCst) {
                return;
            }
            info!(capacity, "photo limit reached");

            let acknowledged = alerts.show_alert(&title, Some(&body));
            let navigator = Arc::clone(&navigator);
            let pending = spawn_scoped(&runtime, move |token| async move {
                acknowledged.await;
                if token.is_active() {
                    navigator.pop_screen();
                }
            });
            scope.add_if_live(pending);
        })
    }
}
