//! Save Pipeline
//!
//! Persists the composed preview and ends the editing session for it. The
//! persist call is never aborted: if the screen is torn down while it is in
//! flight, its completion is dropped instead of being applied.

use std::sync::Arc;

use tokio::runtime::Handle;
use tracing::{debug, info, warn};

use super::composition::PreviewSlot;
use super::spawn_scoped;
use crate::error::{CollageError, Result};
use crate::model::{PhotoList, SaveOutcome};
use crate::ports::{Alerts, PhotoStore};
use crate::reactive::{StateCell, Subscription, SubscriptionScope};

pub struct SavePipeline {
    photos: StateCell<PhotoList>,
    preview: PreviewSlot,
    store: Arc<dyn PhotoStore>,
    alerts: Arc<dyn Alerts>,
    scope: SubscriptionScope,
    runtime: Handle,
}

impl SavePipeline {
    pub fn new(
        photos: StateCell<PhotoList>,
        preview: PreviewSlot,
        store: Arc<dyn PhotoStore>,
        alerts: Arc<dyn Alerts>,
        scope: SubscriptionScope,
        runtime: Handle,
    ) -> Self {
        Self {
            photos,
            preview,
            store,
            alerts,
            scope,
            runtime,
        }
    }

    /// Persist the current preview.
    ///
    /// Returns once the persist call is in flight. On completion exactly one
    /// message is shown (the id, or the failure reason) and the photo list
    /// is reset to empty, whatever the outcome.
    ///
    /// An empty collage is refused quietly with
    /// [`CollageError::NothingToSave`]. Saving before anything was ever
    /// composed is a wiring error: debug builds panic, release builds
    /// refuse the same way.
    pub fn save(&self) -> Result<()> {
        let Some(image) = self.preview.get() else {
            debug_assert!(false, "save requested before the preview was composed");
            warn!("save requested before the preview was composed");
            return Err(CollageError::NothingToSave);
        };
        if image.is_blank() || self.photos.with(|list| list.is_empty()) {
            debug!("save requested on an empty collage");
            return Err(CollageError::NothingToSave);
        }

        let in_flight = Subscription::detached();
        let token = in_flight.token();
        self.scope.add(in_flight)?;

        let pending = self.store.persist(image);
        let photos = self.photos.clone();
        let alerts = Arc::clone(&self.alerts);
        let scope = self.scope.clone();
        let runtime = self.runtime.clone();

        self.runtime.spawn(async move {
            let outcome = SaveOutcome::from(pending.await);
            if !token.finish() {
                warn!(?outcome, "save finished after teardown, ignored");
                return;
            }

            match &outcome {
                SaveOutcome::Success(id) => info!(%id, "collage saved"),
                SaveOutcome::Failure(reason) => info!(%reason, "collage save failed"),
            }
            let (title, body) = outcome.message();
            let acknowledged = alerts.show_alert(&title, body.as_deref());
            scope.add_if_live(spawn_scoped(&runtime, move |_| acknowledged));

            photos.set(PhotoList::new());
        });
        Ok(())
    }
}
