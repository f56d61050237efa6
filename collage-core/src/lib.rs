//! Collage Core
//!
//! This crate provides the reactive coordination core of a photo-collage
//! editing screen. It implements:
//!
//! - Reactive primitives (state cells, hot streams, subscriptions, scopes)
//! - The composition pipeline (photo list -> buttons, title, preview)
//! - Capacity-limited photo intake from a picker sub-flow
//! - The async save pipeline with success/failure handling
//!
//! Pixel compositing, storage, alerts, navigation and widgets are
//! collaborators behind the traits in [`ports`].
//!
//! # Architecture
//!
//! - `reactive`: generic observable primitives and subscription lifetimes
//! - `pipeline`: the derived parts of the graph
//! - `session`: one screen's graph, owned by a single object
//! - `model`, `ports`, `config`, `error`
//!
//! # Example
//!
//! ```rust,ignore
//! use collage_core::{CollageConfig, CollageSession, Collaborators};
//!
//! let session = CollageSession::new(CollageConfig::default(), collaborators)?;
//!
//! // Open the picker; picked photos are appended up to the capacity.
//! session.add()?;
//!
//! // Persist the preview. A message is shown and the list is reset.
//! session.save()?;
//!
//! // Screen closed: nothing fires after this.
//! session.teardown();
//! ```

pub mod config;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod ports;
pub mod reactive;
pub mod session;

pub use config::CollageConfig;
pub use error::{CollageError, ConfigError, PersistError, Result};
pub use model::{CanvasSize, Image, PhotoList, SaveOutcome, UiAffordances};
pub use session::{CollageSession, Collaborators};
