//! Shared numeric constants for the gesture engine.

// ── Gesture thresholds ──────────────────────────────────────────

/// Pointer travel (pixels) from the press position before a session becomes a drag.
pub const DEFAULT_DRAG_THRESHOLD_PX: f64 = 3.0;

/// Longest press-to-release time (milliseconds) that still counts as a click.
pub const DEFAULT_CLICK_MAX_DURATION_MS: f64 = 300.0;

/// Longest gap (milliseconds) between two clicks that makes the second a double-click.
pub const DEFAULT_DOUBLE_CLICK_MAX_INTERVAL_MS: f64 = 300.0;

// ── Math ────────────────────────────────────────────────────────

/// Tolerance used by approximate vector and point comparisons.
pub const EPSILON: f64 = 1e-9;

/// Milliseconds per second, for speeds in pixels/second.
pub const MS_PER_SECOND: f64 = 1000.0;
