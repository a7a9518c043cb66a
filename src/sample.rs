//! Pointer sample history.
//!
//! A gesture session is a chain of [`DerivedSample`]s. Each one is computed
//! from a [`PrimarySample`] (start/current position and time, gesture state)
//! and, when present, the immediately preceding derived sample. Only scalar
//! data is taken from the predecessor, so a session costs O(1) memory no
//! matter how many moves it sees; no history list is kept and no sample is
//! ever modified after it is built.

#[cfg(test)]
#[path = "sample_test.rs"]
mod sample_test;

use serde::Serialize;

use crate::consts::MS_PER_SECOND;
use crate::error::GeometryError;
use crate::unit::finite;
use crate::vector::Vector2;

/// Lifecycle state of a gesture session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GestureState {
    /// No session.
    #[default]
    Idle,
    /// Pointer is down and has not travelled past the drag threshold.
    Pressed,
    /// Pointer travelled past the drag threshold; never reverts within a session.
    Dragging,
    /// Pointer came up; the session is over.
    Released,
}

/// Raw session data: where and when the gesture started, where it is now.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PrimarySample {
    pub start_position: Vector2,
    pub current_position: Vector2,
    pub start_time_ms: f64,
    pub current_time_ms: f64,
    pub state: GestureState,
}

impl PrimarySample {
    /// The first sample of a session: start and current coincide, state is `Pressed`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::NonFinite`] for a non-finite timestamp.
    pub fn start(position: Vector2, time_ms: f64) -> Result<Self, GeometryError> {
        let time_ms = finite(time_ms)?;
        Ok(Self {
            start_position: position,
            current_position: position,
            start_time_ms: time_ms,
            current_time_ms: time_ms,
            state: GestureState::Pressed,
        })
    }

    /// The same session observed at a new position and time.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::NonFinite`] for a non-finite timestamp.
    pub fn advance(&self, position: Vector2, time_ms: f64, state: GestureState) -> Result<Self, GeometryError> {
        Ok(Self { current_position: position, current_time_ms: finite(time_ms)?, state, ..*self })
    }
}

/// A primary sample enriched with kinematics.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedSample {
    primary: PrimarySample,
    delta_from_start: Vector2,
    distance_from_start: f64,
    duration_ms: f64,
    avg_speed: f64,
    avg_speed_x: f64,
    avg_speed_y: f64,
    delta_from_previous: Vector2,
    distance_from_previous: f64,
    elapsed_from_previous_ms: f64,
}

impl DerivedSample {
    /// Compute kinematics for `primary`, chained off `previous` when given.
    ///
    /// Speeds are in pixels/second and are zero while the duration is not
    /// positive.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::NonFinite`] if a delta overflows.
    pub fn derive(primary: PrimarySample, previous: Option<&DerivedSample>) -> Result<Self, GeometryError> {
        let delta_from_start = primary.current_position.minus(&primary.start_position)?;
        let distance_from_start = delta_from_start.length();
        let duration_ms = primary.current_time_ms - primary.start_time_ms;

        let (avg_speed, avg_speed_x, avg_speed_y) = if duration_ms > 0.0 {
            let seconds = duration_ms / MS_PER_SECOND;
            let abs = delta_from_start.abs();
            (distance_from_start / seconds, abs.x() / seconds, abs.y() / seconds)
        } else {
            (0.0, 0.0, 0.0)
        };

        let (delta_from_previous, elapsed_from_previous_ms) = match previous {
            Some(prev) => (
                primary.current_position.minus(&prev.primary.current_position)?,
                primary.current_time_ms - prev.primary.current_time_ms,
            ),
            None => (Vector2::ZERO, 0.0),
        };

        Ok(Self {
            primary,
            delta_from_start,
            distance_from_start,
            duration_ms,
            avg_speed,
            avg_speed_x,
            avg_speed_y,
            delta_from_previous,
            distance_from_previous: delta_from_previous.length(),
            elapsed_from_previous_ms,
        })
    }

    #[must_use]
    pub fn primary(&self) -> &PrimarySample {
        &self.primary
    }

    #[must_use]
    pub fn state(&self) -> GestureState {
        self.primary.state
    }

    #[must_use]
    pub fn start_position(&self) -> Vector2 {
        self.primary.start_position
    }

    #[must_use]
    pub fn current_position(&self) -> Vector2 {
        self.primary.current_position
    }

    #[must_use]
    pub fn start_time_ms(&self) -> f64 {
        self.primary.start_time_ms
    }

    #[must_use]
    pub fn current_time_ms(&self) -> f64 {
        self.primary.current_time_ms
    }

    #[must_use]
    pub fn delta_from_start(&self) -> Vector2 {
        self.delta_from_start
    }

    #[must_use]
    pub fn distance_from_start(&self) -> f64 {
        self.distance_from_start
    }

    #[must_use]
    pub fn duration_ms(&self) -> f64 {
        self.duration_ms
    }

    /// Average speed since the start, pixels/second.
    #[must_use]
    pub fn avg_speed(&self) -> f64 {
        self.avg_speed
    }

    #[must_use]
    pub fn avg_speed_x(&self) -> f64 {
        self.avg_speed_x
    }

    #[must_use]
    pub fn avg_speed_y(&self) -> f64 {
        self.avg_speed_y
    }

    #[must_use]
    pub fn delta_from_previous(&self) -> Vector2 {
        self.delta_from_previous
    }

    #[must_use]
    pub fn distance_from_previous(&self) -> f64 {
        self.distance_from_previous
    }

    #[must_use]
    pub fn elapsed_from_previous_ms(&self) -> f64 {
        self.elapsed_from_previous_ms
    }
}
