//! Collaborator interfaces.
//!
//! The core coordinates; the work behind these traits (pixel compositing,
//! photo storage, the picker screen, alerts, navigation, widgets) lives
//! outside it.

use futures_util::future::BoxFuture;

use crate::error::PersistError;
use crate::model::{CanvasSize, Image};
use crate::reactive::{HotStream, StateCell};

/// Combines photos into one image.
pub trait Compositor: Send + Sync {
    /// Must be pure and total: an empty `photos` yields a blank canvas.
    fn composite(&self, photos: &[Image], size: CanvasSize) -> Image;
}

/// Persists a composed image.
pub trait PhotoStore: Send + Sync {
    /// Resolves exactly once, with the stored asset's id or a failure.
    fn persist(&self, image: Image) -> BoxFuture<'static, Result<String, PersistError>>;
}

/// Streams exposed by a running photo-selection sub-flow.
#[derive(Debug, Clone)]
pub struct PickerSession {
    /// Number of photos picked so far. Replays the latest count.
    pub chosen_count: StateCell<usize>,
    /// One event per picked photo, shared by all observers.
    pub new_photos: HotStream<Image>,
}

impl PickerSession {
    pub fn new(initial_count: usize) -> Self {
        Self {
            chosen_count: StateCell::new(initial_count),
            new_photos: HotStream::new(),
        }
    }
}

/// Opens the photo-selection sub-flow.
pub trait PhotoPicker: Send + Sync {
    fn select_photos(&self, initial_count: usize) -> PickerSession;
}

/// Transient on-screen messages.
pub trait Alerts: Send + Sync {
    /// Resolves when the user dismisses the alert.
    fn show_alert(&self, title: &str, body: Option<&str>) -> BoxFuture<'static, ()>;
}

pub trait Navigator: Send + Sync {
    /// Leave the picker and return to the collage screen.
    fn pop_screen(&self);
}

/// Widgets the session drives.
pub trait Screen: Send + Sync {
    fn set_save_enabled(&self, enabled: bool);
    fn set_clear_enabled(&self, enabled: bool);
    fn set_add_enabled(&self, enabled: bool);
    fn set_title(&self, title: &str);
    fn show_preview(&self, image: &Image);
}
