//! Composition Pipeline
//!
//! Observes the photo list and, for every value it takes on:
//!
//! 1. derives the affordances and pushes button states and title to the
//!    screen (first, so compositing cost never delays them);
//! 2. composites the full list onto the configured canvas and publishes the
//!    result as the preview.
//!
//! There is no incremental update: every emission recomputes from the whole
//! list.

use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use super::title::TitleController;
use crate::config::CollageConfig;
use crate::model::{CanvasSize, Image, PhotoList, UiAffordances};
use crate::ports::{Compositor, Screen};
use crate::reactive::{StateCell, Subscription};

/// The most recent composed preview, shared with the save pipeline.
#[derive(Debug, Clone, Default)]
pub struct PreviewSlot(Arc<RwLock<Option<Image>>>);

impl PreviewSlot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Option<Image> {
        self.0.read().clone()
    }

    fn set(&self, image: Image) {
        *self.0.write() = Some(image);
    }
}

pub struct CompositionPipeline {
    compositor: Arc<dyn Compositor>,
    screen: Arc<dyn Screen>,
    titles: TitleController,
    preview: PreviewSlot,
    capacity: usize,
    canvas: CanvasSize,
    empty_title: String,
}

impl CompositionPipeline {
    pub fn new(
        config: &CollageConfig,
        compositor: Arc<dyn Compositor>,
        screen: Arc<dyn Screen>,
        titles: TitleController,
        preview: PreviewSlot,
    ) -> Self {
        Self {
            compositor,
            screen,
            titles,
            preview,
            capacity: config.capacity,
            canvas: config.canvas,
            empty_title: config.empty_title.clone(),
        }
    }

    /// Start observing `photos`. The current list is processed before this
    /// returns.
    pub fn attach(self, photos: &StateCell<PhotoList>) -> Subscription {
        let pipeline = Arc::new(self);
        photos.subscribe(move |list| pipeline.apply(list))
    }

    fn apply(&self, photos: &[Image]) {
        let affordances = UiAffordances::for_count(photos.len(), self.capacity, &self.empty_title);
        debug!(count = photos.len(), ?affordances, "photo list changed");

        self.screen.set_save_enabled(affordances.save_enabled);
        self.screen.set_clear_enabled(affordances.clear_enabled);
        self.screen.set_add_enabled(affordances.add_enabled);
        self.titles.show_list_title(&affordances.title_text);

        let image = self.compositor.composite(photos, self.canvas);
        self.preview.set(image.clone());
        self.screen.show_preview(&image);
    }
}
