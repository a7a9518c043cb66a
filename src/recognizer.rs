//! Click, double-click and drag recognition for one element.
//!
//! DESIGN
//! ======
//! A [`GestureRecognizer`] listens for presses on its element and for moves
//! and releases on the document, drives the shared [`GestureStateManager`],
//! and reports typed callbacks to its [`GestureListener`]. It only reacts to
//! moves and releases of the session it started itself, so several
//! recognizers can share one manager without double-processing the
//! document-level events.
//!
//! Double-click detection lives here, not in the manager: the recognizer
//! remembers when its last click completed and flags the next click if it
//! completes within `double_click_max_interval_ms`, wherever it lands. A
//! double-click consumes the remembered click, so a third click starts over.
//!
//! [`GestureStateManager`]: crate::gesture::GestureStateManager

#[cfg(test)]
#[path = "recognizer_test.rs"]
mod recognizer_test;

use tracing::{debug, warn};

use crate::binding::{Binding, BindingError, ListenerHost, ListenerScope, PointerHandler};
use crate::config::ClickPolicy;
use crate::element::{Button, PointerEvent, PointerEventKind};
use crate::error::GeometryError;
use crate::gesture::{ReleasedSession, SessionId, SharedGestureState};
use crate::sample::{DerivedSample, GestureState};

/// Listeners registered by [`GestureRecognizer::attach`].
pub const RECOGNIZER_LISTENERS: [(ListenerScope, PointerEventKind); 3] = [
    (ListenerScope::Element, PointerEventKind::Press),
    (ListenerScope::Document, PointerEventKind::Move),
    (ListenerScope::Document, PointerEventKind::Release),
];

/// Gesture callbacks. Every method defaults to a no-op.
pub trait GestureListener {
    /// A press started a session.
    fn on_session_start(&mut self, _sample: &DerivedSample) {}

    /// The session moved.
    fn on_session_update(&mut self, _sample: &DerivedSample) {}

    /// The session was released. Fires before the click or drag-end callback.
    fn on_session_end(&mut self, _session: &ReleasedSession) {}

    fn on_click(&mut self, _sample: &DerivedSample) {}

    /// Fires right after the `on_click` of the second click.
    fn on_double_click(&mut self, _sample: &DerivedSample) {}

    /// The session crossed the drag threshold. Followed by `on_drag_move` for the same sample.
    fn on_drag_start(&mut self, _sample: &DerivedSample) {}

    fn on_drag_move(&mut self, _sample: &DerivedSample) {}

    fn on_drag_end(&mut self, _session: &ReleasedSession) {}
}

/// Recognizes gestures on one element and reports them to `L`.
pub struct GestureRecognizer<L> {
    state: SharedGestureState,
    listener: L,
    binding: Binding,
    session: Option<SessionId>,
    drag_started: bool,
    last_click_ms: Option<f64>,
}

impl<L: GestureListener> GestureRecognizer<L> {
    #[must_use]
    pub fn new(state: SharedGestureState, listener: L) -> Self {
        Self { state, listener, binding: Binding::new(), session: None, drag_started: false, last_click_ms: None }
    }

    /// Register the element press listener and the document move/release listeners.
    /// Returns `false` if already attached.
    ///
    /// # Errors
    ///
    /// Propagates the host's [`BindingError`].
    pub fn attach<H: ListenerHost + ?Sized>(&mut self, host: &mut H) -> Result<bool, BindingError> {
        self.binding.attach(host, &RECOGNIZER_LISTENERS)
    }

    /// Remove the listeners registered by [`GestureRecognizer::attach`] and
    /// forget this recognizer's session. Safe to call when not attached.
    ///
    /// The shared manager's session is only abandoned when
    /// `invalidate_session_on_detach` is configured.
    pub fn detach<H: ListenerHost + ?Sized>(&mut self, host: &mut H) -> bool {
        if !self.binding.detach(host) {
            return false;
        }
        let owned = self.session.take();
        self.drag_started = false;
        self.last_click_ms = None;
        let mut state = self.state.borrow_mut();
        if state.config().invalidate_session_on_detach && owned.is_some() && state.session_id() == owned {
            state.clear_session();
        }
        true
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.binding.is_attached()
    }

    #[must_use]
    pub fn listener(&self) -> &L {
        &self.listener
    }

    pub fn listener_mut(&mut self) -> &mut L {
        &mut self.listener
    }

    #[must_use]
    pub fn into_listener(self) -> L {
        self.listener
    }

    /// Whether the shared manager's current session is the one this recognizer started.
    fn owns_session(&self) -> bool {
        self.session.is_some() && self.state.borrow().session_id() == self.session
    }

    /// # Errors
    ///
    /// Propagates geometry errors from the event coordinates.
    pub fn press(&mut self, event: &PointerEvent) -> Result<(), GeometryError> {
        if event.button != Button::Primary {
            return Ok(());
        }
        let position = event.position()?.vector();
        let sample = {
            let mut state = self.state.borrow_mut();
            let sample = state.press(position, event.time_ms)?;
            self.session = state.session_id();
            sample
        };
        self.drag_started = false;
        self.listener.on_session_start(&sample);
        Ok(())
    }

    /// # Errors
    ///
    /// Propagates geometry errors from the event coordinates.
    pub fn move_to(&mut self, event: &PointerEvent) -> Result<(), GeometryError> {
        if !self.owns_session() {
            return Ok(());
        }
        let position = event.position()?.vector();
        let Some(sample) = self.state.borrow_mut().move_to(position, event.time_ms)? else {
            return Ok(());
        };
        self.listener.on_session_update(&sample);
        if sample.state() == GestureState::Dragging {
            if !self.drag_started {
                self.drag_started = true;
                self.listener.on_drag_start(&sample);
            }
            self.listener.on_drag_move(&sample);
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Propagates geometry errors from the event coordinates.
    pub fn release(&mut self, event: &PointerEvent) -> Result<(), GeometryError> {
        if event.button != Button::Primary || !self.owns_session() {
            return Ok(());
        }
        let position = event.position()?.vector();
        let (released, is_click, policy, interval) = {
            let mut state = self.state.borrow_mut();
            let Some(released) = state.release(position, event.time_ms)? else {
                return Ok(());
            };
            let config = state.config();
            (released, state.is_click(&released.sample), config.click_policy, config.double_click_max_interval_ms)
        };
        self.session = None;
        self.drag_started = false;
        self.listener.on_session_end(&released);

        if released.was_drag() {
            self.last_click_ms = None;
            self.listener.on_drag_end(&released);
            return Ok(());
        }
        let counts_as_click = match policy {
            ClickPolicy::Lenient => true,
            ClickPolicy::Strict => is_click,
        };
        if !counts_as_click {
            debug!(session = %released.id, "release classified as neither click nor drag");
            self.last_click_ms = None;
            return Ok(());
        }

        let now = released.sample.current_time_ms();
        self.listener.on_click(&released.sample);
        match self.last_click_ms {
            Some(last) if now - last <= interval => {
                self.last_click_ms = None;
                self.listener.on_double_click(&released.sample);
            }
            _ => self.last_click_ms = Some(now),
        }
        Ok(())
    }
}

impl<L: GestureListener> PointerHandler for GestureRecognizer<L> {
    fn handle_pointer(&mut self, kind: PointerEventKind, event: &PointerEvent) -> bool {
        let result = match kind {
            PointerEventKind::Press => self.press(event),
            PointerEventKind::Move => self.move_to(event),
            PointerEventKind::Release => self.release(event),
            PointerEventKind::ContextMenu => Ok(()),
        };
        if let Err(e) = result {
            warn!(error = %e, ?kind, "pointer event dropped");
        }
        false
    }
}
