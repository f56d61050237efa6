//! Collage Session
//!
//! One session per collage screen. It owns the photo list, the scope every
//! subscription of the screen is registered in, and the pipelines wired
//! between them. User actions (`add`, `clear`, `save`) enter here;
//! `teardown` releases the whole graph.

use std::sync::Arc;

use tokio::runtime::Handle;
use tracing::info;

use crate::config::CollageConfig;
use crate::error::Result;
use crate::model::{Image, PhotoList, UiAffordances};
use crate::pipeline::{CompositionPipeline, PreviewSlot, SavePipeline, SelectionIntake, TitleController};
use crate::ports::{Alerts, Compositor, Navigator, PhotoPicker, PhotoStore, Screen};
use crate::reactive::{StateCell, SubscriptionScope};

/// The external collaborators a session drives.
#[derive(Clone)]
pub struct Collaborators {
    pub compositor: Arc<dyn Compositor>,
    pub store: Arc<dyn PhotoStore>,
    pub picker: Arc<dyn PhotoPicker>,
    pub alerts: Arc<dyn Alerts>,
    pub navigator: Arc<dyn Navigator>,
    pub screen: Arc<dyn Screen>,
}

pub struct CollageSession {
    config: CollageConfig,
    photos: StateCell<PhotoList>,
    preview: PreviewSlot,
    scope: SubscriptionScope,
    picker: Arc<dyn PhotoPicker>,
    intake: SelectionIntake,
    saver: SavePipeline,
}

impl CollageSession {
    /// Build the graph and render the initial, empty state.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(config: CollageConfig, collaborators: Collaborators) -> Result<Self> {
        config.validate()?;
        let runtime = Handle::try_current()?;

        let photos = StateCell::new(PhotoList::new());
        let preview = PreviewSlot::new();
        let scope = SubscriptionScope::new();
        let titles = TitleController::new(Arc::clone(&collaborators.screen));

        let composition = CompositionPipeline::new(
            &config,
            collaborators.compositor,
            Arc::clone(&collaborators.screen),
            titles.clone(),
            preview.clone(),
        );
        scope.add(composition.attach(&photos))?;

        let intake = SelectionIntake::new(
            &config,
            photos.clone(),
            titles,
            Arc::clone(&collaborators.alerts),
            collaborators.navigator,
            scope.clone(),
            runtime.clone(),
        );
        let saver = SavePipeline::new(
            photos.clone(),
            preview.clone(),
            collaborators.store,
            collaborators.alerts,
            scope.clone(),
            runtime,
        );

        info!(capacity = config.capacity, "collage session started");
        Ok(Self {
            config,
            photos,
            preview,
            scope,
            picker: collaborators.picker,
            intake,
            saver,
        })
    }

    pub fn config(&self) -> &CollageConfig {
        &self.config
    }

    /// Snapshot of the selected photos.
    pub fn photos(&self) -> PhotoList {
        self.photos.get()
    }

    /// The observable photo list, for additional observers.
    pub fn photo_cell(&self) -> &StateCell<PhotoList> {
        &self.photos
    }

    pub fn preview(&self) -> Option<Image> {
        self.preview.get()
    }

    pub fn affordances(&self) -> UiAffordances {
        let count = self.photos.with(|list| list.len());
        UiAffordances::for_count(count, self.config.capacity, &self.config.empty_title)
    }

    /// Open the picker and feed its selections into the collage.
    pub fn add(&self) -> Result<()> {
        self.intake.start(self.picker.as_ref())
    }

    /// Drop every selected photo.
    pub fn clear(&self) {
        self.photos.set(PhotoList::new());
    }

    /// Persist the composed preview; see [`SavePipeline::save`].
    pub fn save(&self) -> Result<()> {
        self.saver.save()
    }

    /// Release every subscription of the screen.
    pub fn teardown(&self) {
        info!("collage session torn down");
        self.scope.release();
    }

    pub fn is_torn_down(&self) -> bool {
        self.scope.is_released()
    }
}

impl Drop for CollageSession {
    fn drop(&mut self) {
        if !self.scope.is_released() {
            self.scope.release();
        }
    }
}
