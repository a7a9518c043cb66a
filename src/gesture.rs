//! Gesture session state machine.
//!
//! ARCHITECTURE
//! ============
//! A [`GestureStateManager`] owns at most one in-flight session (single
//! pointer) and the thresholds used to classify it. Recognizers and drag
//! coordinators that should see the same pointer share one manager through
//! [`SharedGestureState`]; hosts that want independent concurrent drags give
//! each binding its own manager.
//!
//! States run `Idle → Pressed → Dragging → Released → Idle`. A press always
//! starts a fresh session (replacing any stale one), each move chains a new
//! derived sample off the previous one, and a release finalizes the session
//! and clears it. Move and release without a session are expected (stray
//! events after focus loss) and return `None`.

#[cfg(test)]
#[path = "gesture_test.rs"]
mod gesture_test;

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, trace};
use uuid::Uuid;

use crate::config::{ConfigError, GestureConfig};
use crate::error::GeometryError;
use crate::sample::{DerivedSample, GestureState, PrimarySample};
use crate::vector::Vector2;

/// Identifier of one press→release session, for log correlation.
pub type SessionId = Uuid;

/// A state manager shared by the bindings of one pointer.
pub type SharedGestureState = Rc<RefCell<GestureStateManager>>;

/// The final sample of a session, returned by [`GestureStateManager::release`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReleasedSession {
    pub id: SessionId,
    /// The release sample; its state is always [`GestureState::Released`].
    pub sample: DerivedSample,
    /// The session's state just before release: `Pressed` or `Dragging`.
    pub session_state: GestureState,
}

impl ReleasedSession {
    #[must_use]
    pub fn was_drag(&self) -> bool {
        self.session_state == GestureState::Dragging
    }
}

#[derive(Debug, Clone, Copy)]
struct Session {
    id: SessionId,
    sample: DerivedSample,
}

/// Owner of the in-flight gesture session and its thresholds.
#[derive(Debug, Default)]
pub struct GestureStateManager {
    config: GestureConfig,
    session: Option<Session>,
}

impl GestureStateManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if `config` fails validation.
    pub fn with_config(config: GestureConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config, session: None })
    }

    /// Wrap this manager for sharing between bindings.
    #[must_use]
    pub fn shared(self) -> SharedGestureState {
        Rc::new(RefCell::new(self))
    }

    #[must_use]
    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Start a new session at `position`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::NonFinite`] for a non-finite timestamp.
    pub fn press(&mut self, position: Vector2, time_ms: f64) -> Result<DerivedSample, GeometryError> {
        let sample = DerivedSample::derive(PrimarySample::start(position, time_ms)?, None)?;
        if let Some(stale) = self.session.take() {
            debug!(session = %stale.id, "press replaced an unreleased session");
        }
        let id = Uuid::new_v4();
        self.session = Some(Session { id, sample });
        debug!(session = %id, %position, time_ms, "gesture session started");
        Ok(sample)
    }

    /// Advance the session to `position`. `None` when no session is active.
    ///
    /// Crossing the drag threshold switches the state to `Dragging`, and it
    /// stays there for the rest of the session.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::NonFinite`] for a non-finite timestamp.
    pub fn move_to(&mut self, position: Vector2, time_ms: f64) -> Result<Option<DerivedSample>, GeometryError> {
        let threshold = self.config.drag_threshold_px;
        let Some(session) = self.session.as_mut() else {
            return Ok(None);
        };
        let previous = session.sample;
        let distance = position.minus(&previous.start_position())?.length();
        let state = if distance >= threshold { GestureState::Dragging } else { previous.state() };
        if state != previous.state() {
            debug!(session = %session.id, distance, "gesture session became a drag");
        }
        let primary = previous.primary().advance(position, time_ms, state)?;
        let sample = DerivedSample::derive(primary, Some(&previous))?;
        session.sample = sample;
        trace!(session = %session.id, %position, distance, "gesture session moved");
        Ok(Some(sample))
    }

    /// Finalize and clear the session. `None` when no session is active.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::NonFinite`] for a non-finite timestamp; the
    /// session is kept in that case.
    pub fn release(&mut self, position: Vector2, time_ms: f64) -> Result<Option<ReleasedSession>, GeometryError> {
        let Some(session) = self.session else {
            return Ok(None);
        };
        let previous = session.sample;
        let primary = previous.primary().advance(position, time_ms, GestureState::Released)?;
        let sample = DerivedSample::derive(primary, Some(&previous))?;
        self.session = None;
        debug!(
            session = %session.id,
            state = ?previous.state(),
            duration_ms = sample.duration_ms(),
            distance = sample.distance_from_start(),
            "gesture session released"
        );
        Ok(Some(ReleasedSession { id: session.id, sample, session_state: previous.state() }))
    }

    /// Short and (nearly) stationary: `duration ≤ click_max_duration_ms` and
    /// `distance_from_start < drag_threshold_px`.
    #[must_use]
    pub fn is_click(&self, sample: &DerivedSample) -> bool {
        sample.duration_ms() <= self.config.click_max_duration_ms
            && sample.distance_from_start() < self.config.drag_threshold_px
    }

    #[must_use]
    pub fn is_drag(&self, sample: &DerivedSample) -> bool {
        sample.state() == GestureState::Dragging
    }

    #[must_use]
    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    /// The latest sample of the in-flight session.
    #[must_use]
    pub fn current(&self) -> Option<&DerivedSample> {
        self.session.as_ref().map(|s| &s.sample)
    }

    #[must_use]
    pub fn session_id(&self) -> Option<SessionId> {
        self.session.as_ref().map(|s| s.id)
    }

    /// Abandon the in-flight session without a release. Returns whether one existed.
    pub fn clear_session(&mut self) -> bool {
        let cleared = self.session.take();
        if let Some(session) = &cleared {
            debug!(session = %session.id, "gesture session abandoned");
        }
        cleared.is_some()
    }
}
