//! Viewer configuration handed over by the host page as JSON.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::Deserialize;

use crate::consts::SYNC_VIEW_INTERVAL_MS;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid viewer config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("viewer config has no room code")]
    MissingRoom,
}

/// Per-session settings. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Room code this viewer joins.
    pub room: String,
    /// Name shown in the roster.
    pub display_name: String,
    /// Minimum spacing of outbound view-sync messages.
    pub sync_interval_ms: f64,
    pub color: String,
    pub thickness: f64,
    pub text_size: f64,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            room: String::new(),
            display_name: "Student".to_owned(),
            sync_interval_ms: SYNC_VIEW_INTERVAL_MS,
            color: "#ff0000".to_owned(),
            thickness: 3.0,
            text_size: 24.0,
        }
    }
}

impl ViewerConfig {
    /// A default config for `room`.
    #[must_use]
    pub fn for_room(room: impl Into<String>) -> Self {
        Self { room: room.into(), ..Self::default() }
    }

    /// Parse the host page's JSON config. The room code is trimmed and upper-cased.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Json`] for malformed JSON, [`ConfigError::MissingRoom`] when
    /// the room code is blank.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_json::from_str(text)?;
        config.room = config.room.trim().to_uppercase();
        if config.room.is_empty() {
            return Err(ConfigError::MissingRoom);
        }
        config.thickness = config.thickness.max(1.0);
        Ok(config)
    }
}
