//! Data model of a collage session.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::config::{DEFAULT_CAPACITY, DEFAULT_EMPTY_TITLE};
use crate::error::PersistError;

/// Pixel dimensions of a canvas or image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// Opaque image handle.
///
/// The core never inspects pixels; it only moves handles between
/// collaborators. Cloning is cheap. An image with no content is *blank*,
/// which is what compositing an empty photo list yields.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Image {
    size: CanvasSize,
    content: Arc<[u8]>,
}

impl Image {
    pub fn new(size: CanvasSize, content: impl Into<Arc<[u8]>>) -> Self {
        Self {
            size,
            content: content.into(),
        }
    }

    /// A blank canvas of the given size.
    pub fn blank(size: CanvasSize) -> Self {
        Self::new(size, Vec::new())
    }

    pub fn size(&self) -> CanvasSize {
        self.size
    }

    pub fn content(&self) -> &[u8] {
        &self.content
    }

    pub fn is_blank(&self) -> bool {
        self.content.is_empty()
    }
}

impl fmt::Debug for Image {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Image")
            .field("size", &self.size)
            .field("bytes", &self.content.len())
            .finish()
    }
}

/// Selected photos in selection order. Inline storage covers the default
/// capacity.
pub type PhotoList = SmallVec<[Image; DEFAULT_CAPACITY]>;

/// Button states and title derived from the photo list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiAffordances {
    pub save_enabled: bool,
    pub clear_enabled: bool,
    pub add_enabled: bool,
    pub title_text: String,
}

impl UiAffordances {
    /// Derive affordances for a list of `count` photos.
    pub fn for_count(count: usize, capacity: usize, empty_title: &str) -> Self {
        Self {
            save_enabled: count > 0 && count % 2 == 0,
            clear_enabled: count > 0,
            add_enabled: count < capacity,
            title_text: if count > 0 {
                format!("{count} photos")
            } else {
                empty_title.to_string()
            },
        }
    }

    /// Derive affordances under the default capacity and title.
    pub fn for_photos(photos: &[Image]) -> Self {
        Self::for_count(photos.len(), DEFAULT_CAPACITY, DEFAULT_EMPTY_TITLE)
    }
}

/// Transient title shown while photos are being picked.
pub fn selection_title(count: usize) -> String {
    format!("Selected {count} photos")
}

/// Result of one save attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Success(String),
    Failure(String),
}

impl SaveOutcome {
    /// Title and optional body of the message announcing this outcome.
    pub fn message(&self) -> (String, Option<String>) {
        match self {
            SaveOutcome::Success(id) => (format!("Saved with id: {id}"), None),
            SaveOutcome::Failure(reason) => ("Error".to_string(), Some(reason.clone())),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SaveOutcome::Success(_))
    }
}

impl From<std::result::Result<String, PersistError>> for SaveOutcome {
    fn from(result: std::result::Result<String, PersistError>) -> Self {
        match result {
            Ok(id) => SaveOutcome::Success(id),
            Err(err) => SaveOutcome::Failure(err.reason),
        }
    }
}
