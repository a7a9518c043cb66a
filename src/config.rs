//! Gesture thresholds.
//!
//! Defaults match the browser conventions the engine was tuned against. Hosts
//! that want different thresholds (e.g. a larger drag slop for touch-screens
//! driven through mouse emulation) pass a JSON object; missing fields keep
//! their defaults.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_CLICK_MAX_DURATION_MS, DEFAULT_DOUBLE_CLICK_MAX_INTERVAL_MS, DEFAULT_DRAG_THRESHOLD_PX};

/// Error returned when loading a [`GestureConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The input was not a valid JSON config object.
    #[error("failed to parse gesture config: {0}")]
    Parse(#[from] serde_json::Error),
    /// A field holds a value the engine cannot use.
    #[error("invalid gesture config field `{field}`: {reason}")]
    Invalid { field: &'static str, reason: &'static str },
}

/// How a release that is not a drag gets classified by the recognizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClickPolicy {
    /// Every non-drag release is a click, however long or far.
    #[default]
    Lenient,
    /// Only releases that pass [`crate::gesture::GestureStateManager::is_click`] are clicks.
    Strict,
}

/// Thresholds shared by every recognizer and coordinator bound to one state manager.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GestureConfig {
    /// Travel from the press position, in pixels, at which a session becomes a drag.
    pub drag_threshold_px: f64,
    /// Longest press-to-release duration that still classifies as a click.
    pub click_max_duration_ms: f64,
    /// Longest gap between two clicks that flags the second as a double-click.
    pub double_click_max_interval_ms: f64,
    pub click_policy: ClickPolicy,
    /// Whether detaching a recognizer/coordinator also abandons the shared
    /// in-flight session. Off by default: the session survives until the next
    /// press replaces it.
    pub invalidate_session_on_detach: bool,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            drag_threshold_px: DEFAULT_DRAG_THRESHOLD_PX,
            click_max_duration_ms: DEFAULT_CLICK_MAX_DURATION_MS,
            double_click_max_interval_ms: DEFAULT_DOUBLE_CLICK_MAX_INTERVAL_MS,
            click_policy: ClickPolicy::default(),
            invalidate_session_on_detach: false,
        }
    }
}

impl GestureConfig {
    /// Parse and validate a JSON config object.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON and
    /// [`ConfigError::Invalid`] for out-of-range values.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first field that is
    /// negative or not finite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_threshold("drag_threshold_px", self.drag_threshold_px)?;
        check_threshold("click_max_duration_ms", self.click_max_duration_ms)?;
        check_threshold("double_click_max_interval_ms", self.double_click_max_interval_ms)
    }
}

fn check_threshold(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !value.is_finite() {
        return Err(ConfigError::Invalid { field, reason: "must be finite" });
    }
    if value < 0.0 {
        return Err(ConfigError::Invalid { field, reason: "must not be negative" });
    }
    Ok(())
}
