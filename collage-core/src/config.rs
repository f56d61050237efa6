//! Session configuration.
//!
//! Every field has a default, so a partial JSON document only needs to name
//! what it overrides:
//!
//! ```rust
//! use collage_core::config::CollageConfig;
//!
//! let config = CollageConfig::from_json(r#"{ "title_revert_delay_ms": 500 }"#).unwrap();
//! assert_eq!(config.capacity, 6);
//! assert_eq!(config.title_revert_delay().as_millis(), 500);
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::model::CanvasSize;

pub const DEFAULT_CAPACITY: usize = 6;
pub const DEFAULT_EMPTY_TITLE: &str = "Collage";
pub const DEFAULT_TITLE_REVERT_DELAY_MS: u64 = 2_000;
pub const DEFAULT_CANVAS: CanvasSize = CanvasSize::new(1024, 1024);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollageConfig {
    /// Maximum number of photos in one collage.
    pub capacity: usize,
    /// Size of the composed preview.
    pub canvas: CanvasSize,
    /// Quiescence interval before a selection title reverts.
    pub title_revert_delay_ms: u64,
    /// Title shown while no photo is selected.
    pub empty_title: String,
    pub limit_alert_title: String,
    /// Body of the limit alert. `{capacity}` is replaced with the
    /// configured capacity.
    pub limit_alert_body: String,
}

impl Default for CollageConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            canvas: DEFAULT_CANVAS,
            title_revert_delay_ms: DEFAULT_TITLE_REVERT_DELAY_MS,
            empty_title: DEFAULT_EMPTY_TITLE.to_string(),
            limit_alert_title: "Limit reached".to_string(),
            limit_alert_body: "To add more than {capacity} photos purchase Collage Pro".to_string(),
        }
    }
}

impl CollageConfig {
    /// Parse and validate a JSON document.
    pub fn from_json(input: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity == 0 {
            return Err(ConfigError::Invalid("capacity must be at least 1".into()));
        }
        if self.canvas.is_empty() {
            return Err(ConfigError::Invalid(format!(
                "canvas must be non-empty, got {}x{}",
                self.canvas.width, self.canvas.height
            )));
        }
        Ok(())
    }

    /// The limit alert body for this configuration's capacity.
    pub fn limit_alert_message(&self) -> String {
        self.limit_alert_body
            .replace("{capacity}", &self.capacity.to_string())
    }

    pub fn title_revert_delay(&self) -> Duration {
        Duration::from_millis(self.title_revert_delay_ms)
    }
}
