//! Drag fan-out: one source element, many subscribers.
//!
//! ARCHITECTURE
//! ============
//! A [`DragCoordinator`] binds press and context-menu listeners on its source
//! element and move/release listeners on the document, drives the shared
//! gesture manager, and broadcasts each session to every subscriber in
//! registration order.
//!
//! Phases run `DragEnded → DragStarted → DragInProgress → DragEnded`:
//!
//! - a press opens a drag only from `DragEnded` and broadcasts the start;
//! - moves are ignored in `DragEnded`, broadcast otherwise, and the first
//!   threshold-crossing move enters `DragInProgress`;
//! - a release always returns to `DragEnded` but broadcasts the end only from
//!   `DragInProgress`. A click finalizes the manager's session without
//!   notifying drag subscribers.
//!
//! The context menu is a separate channel delivered only to subscribers whose
//! [`DragSubscriber::wants_context_menu`] is true.
//!
//! [`PositionManager`] is the subscriber that makes an element follow the
//! pointer by applying each move's previous-to-current delta.

#[cfg(test)]
#[path = "drag_test.rs"]
mod drag_test;

use std::cell::RefCell;
use std::rc::Rc;

use tracing::{debug, trace, warn};
use uuid::Uuid;

use crate::binding::{Binding, BindingError, ListenerHost, ListenerScope, PointerHandler};
use crate::element::{Button, MovableElement, PointerEvent, PointerEventKind};
use crate::error::GeometryError;
use crate::frame::{DrawingSpace, FramePoint, ScreenPoint};
use crate::gesture::{ReleasedSession, SessionId, SharedGestureState};
use crate::sample::{DerivedSample, GestureState};

/// Listeners registered by [`DragCoordinator::attach`].
pub const COORDINATOR_LISTENERS: [(ListenerScope, PointerEventKind); 4] = [
    (ListenerScope::Element, PointerEventKind::Press),
    (ListenerScope::Element, PointerEventKind::ContextMenu),
    (ListenerScope::Document, PointerEventKind::Move),
    (ListenerScope::Document, PointerEventKind::Release),
];

/// Handle returned by [`DragCoordinator::subscribe`].
pub type SubscriptionId = Uuid;

/// A subscriber shared between the coordinator and its owner.
pub type SharedSubscriber = Rc<RefCell<dyn DragSubscriber>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragPhase {
    #[default]
    DragEnded,
    DragStarted,
    DragInProgress,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragStart {
    pub session: SessionId,
    pub sample: DerivedSample,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragMove {
    pub session: SessionId,
    pub sample: DerivedSample,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragEnd {
    pub session: SessionId,
    pub released: ReleasedSession,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContextMenu {
    pub position: ScreenPoint,
    pub time_ms: f64,
}

/// Receives drag notifications. Every method defaults to a no-op.
pub trait DragSubscriber {
    fn on_drag_start(&mut self, _event: &DragStart) {}

    fn on_drag_move(&mut self, _event: &DragMove) {}

    fn on_drag_end(&mut self, _event: &DragEnd) {}

    /// Opt in to [`DragSubscriber::on_context_menu`].
    fn wants_context_menu(&self) -> bool {
        false
    }

    fn on_context_menu(&mut self, _event: &ContextMenu) {}
}

struct Subscription {
    id: SubscriptionId,
    subscriber: SharedSubscriber,
}

/// Broadcasts one source element's drag sessions to many subscribers.
pub struct DragCoordinator {
    state: SharedGestureState,
    subscribers: Vec<Subscription>,
    binding: Binding,
    session: Option<SessionId>,
    phase: DragPhase,
}

impl DragCoordinator {
    #[must_use]
    pub fn new(state: SharedGestureState) -> Self {
        Self { state, subscribers: Vec::new(), binding: Binding::new(), session: None, phase: DragPhase::DragEnded }
    }

    /// Add a subscriber at the end of the broadcast order.
    pub fn subscribe<S: DragSubscriber + 'static>(&mut self, subscriber: Rc<RefCell<S>>) -> SubscriptionId {
        let id = Uuid::new_v4();
        let subscriber: SharedSubscriber = subscriber;
        self.subscribers.push(Subscription { id, subscriber });
        debug!(subscription = %id, subscribers = self.subscribers.len(), "drag subscriber added");
        id
    }

    /// Returns `false` for an unknown id.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|s| s.id != id);
        self.subscribers.len() != before
    }

    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    #[must_use]
    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    /// Register the element press/context-menu listeners and the document
    /// move/release listeners. Returns `false` if already attached.
    ///
    /// # Errors
    ///
    /// Propagates the host's [`BindingError`].
    pub fn attach<H: ListenerHost + ?Sized>(&mut self, host: &mut H) -> Result<bool, BindingError> {
        self.binding.attach(host, &COORDINATOR_LISTENERS)
    }

    /// Remove the attached listeners and close any open drag without an end
    /// broadcast. Safe to call when not attached.
    pub fn detach<H: ListenerHost + ?Sized>(&mut self, host: &mut H) -> bool {
        if !self.binding.detach(host) {
            return false;
        }
        let owned = self.session.take();
        self.phase = DragPhase::DragEnded;
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

    /// Drop a drag whose session was replaced or cleared behind our back.
    fn sync_phase(&mut self) {
        if self.phase == DragPhase::DragEnded {
            return;
        }
        let current = self.state.borrow().session_id();
        if self.session.is_none() || current != self.session {
            debug!(phase = ?self.phase, "drag session lost; resetting phase");
            self.session = None;
            self.phase = DragPhase::DragEnded;
        }
    }

    /// # Errors
    ///
    /// Propagates geometry errors from the event coordinates.
    pub fn press(&mut self, event: &PointerEvent) -> Result<(), GeometryError> {
        if event.button != Button::Primary {
            return Ok(());
        }
        self.sync_phase();
        if self.phase != DragPhase::DragEnded {
            trace!(phase = ?self.phase, "press ignored while a drag is open");
            return Ok(());
        }
        let position = event.position()?.vector();
        let (session, sample) = {
            let mut state = self.state.borrow_mut();
            let sample = state.press(position, event.time_ms)?;
            let Some(session) = state.session_id() else {
                return Ok(());
            };
            (session, sample)
        };
        self.session = Some(session);
        self.phase = DragPhase::DragStarted;
        let start = DragStart { session, sample };
        self.broadcast(|s| s.on_drag_start(&start));
        Ok(())
    }

    /// # Errors
    ///
    /// Propagates geometry errors from the event coordinates.
    pub fn move_to(&mut self, event: &PointerEvent) -> Result<(), GeometryError> {
        self.sync_phase();
        let Some(session) = self.session else {
            return Ok(());
        };
        let position = event.position()?.vector();
        let Some(sample) = self.state.borrow_mut().move_to(position, event.time_ms)? else {
            return Ok(());
        };
        if sample.state() == GestureState::Dragging && self.phase == DragPhase::DragStarted {
            debug!(session = %session, "drag in progress");
            self.phase = DragPhase::DragInProgress;
        }
        let moved = DragMove { session, sample };
        self.broadcast(|s| s.on_drag_move(&moved));
        Ok(())
    }

    /// # Errors
    ///
    /// Propagates geometry errors from the event coordinates.
    pub fn release(&mut self, event: &PointerEvent) -> Result<(), GeometryError> {
        if event.button != Button::Primary {
            return Ok(());
        }
        self.sync_phase();
        let Some(session) = self.session else {
            return Ok(());
        };
        let position = event.position()?.vector();
        let Some(released) = self.state.borrow_mut().release(position, event.time_ms)? else {
            return Ok(());
        };
        let phase = std::mem::take(&mut self.phase);
        self.session = None;
        if phase == DragPhase::DragInProgress {
            let end = DragEnd { session, released };
            self.broadcast(|s| s.on_drag_end(&end));
        } else {
            debug!(session = %session, "released before the drag threshold; no end broadcast");
        }
        Ok(())
    }

    /// Deliver a context-menu event to the opted-in subscribers. Returns
    /// whether any subscriber received it.
    ///
    /// # Errors
    ///
    /// Propagates geometry errors from the event coordinates.
    pub fn context_menu(&mut self, event: &PointerEvent) -> Result<bool, GeometryError> {
        let menu = ContextMenu { position: event.position()?, time_ms: event.time_ms };
        let mut delivered = false;
        for subscription in &self.subscribers {
            let Ok(mut subscriber) = subscription.subscriber.try_borrow_mut() else {
                warn!(subscription = %subscription.id, "subscriber busy; context menu skipped");
                continue;
            };
            if subscriber.wants_context_menu() {
                subscriber.on_context_menu(&menu);
                delivered = true;
            }
        }
        Ok(delivered)
    }

    fn broadcast(&self, mut notify: impl FnMut(&mut dyn DragSubscriber)) {
        for subscription in &self.subscribers {
            match subscription.subscriber.try_borrow_mut() {
                Ok(mut subscriber) => notify(&mut *subscriber),
                Err(_) => warn!(subscription = %subscription.id, "subscriber busy; notification skipped"),
            }
        }
    }
}

impl PointerHandler for DragCoordinator {
    /// Consumes the context menu when a subscriber took it, so the native menu is suppressed.
    fn handle_pointer(&mut self, kind: PointerEventKind, event: &PointerEvent) -> bool {
        let result = match kind {
            PointerEventKind::Press => self.press(event).map(|()| false),
            PointerEventKind::Move => self.move_to(event).map(|()| false),
            PointerEventKind::Release => self.release(event).map(|()| false),
            PointerEventKind::ContextMenu => self.context_menu(event),
        };
        match result {
            Ok(consumed) => consumed,
            Err(e) => {
                warn!(error = %e, ?kind, "pointer event dropped");
                false
            }
        }
    }
}

// =============================================================================
// POSITION MANAGER
// =============================================================================

/// Moves an element along with the drag.
///
/// The position is captured at drag start and then advanced by each move's
/// `delta_from_previous`, divided by the element frame's view zoom so the
/// element stays under the pointer.
pub struct PositionManager<E> {
    space: Rc<RefCell<DrawingSpace>>,
    element: E,
    position: Option<FramePoint>,
}

impl<E: MovableElement> PositionManager<E> {
    #[must_use]
    pub fn new(space: Rc<RefCell<DrawingSpace>>, element: E) -> Self {
        Self { space, element, position: None }
    }

    #[must_use]
    pub fn element(&self) -> &E {
        &self.element
    }

    pub fn element_mut(&mut self) -> &mut E {
        &mut self.element
    }

    /// The tracked position while a drag is open.
    #[must_use]
    pub fn position(&self) -> Option<FramePoint> {
        self.position
    }

    fn follow(&mut self, sample: &DerivedSample) -> Result<(), GeometryError> {
        let Some(position) = self.position else {
            return Ok(());
        };
        let Ok(space) = self.space.try_borrow() else {
            warn!("drawing space busy; drag move skipped");
            return Ok(());
        };
        let scale = space.scale_of(&position)?;
        let next = position.translated(&sample.delta_from_previous().divide(scale)?)?;
        drop(space);
        self.element.set_position(next);
        self.position = Some(next);
        Ok(())
    }
}

impl<E: MovableElement> DragSubscriber for PositionManager<E> {
    fn on_drag_start(&mut self, _event: &DragStart) {
        self.position = Some(self.element.position());
    }

    fn on_drag_move(&mut self, event: &DragMove) {
        if let Err(e) = self.follow(&event.sample) {
            warn!(session = %event.session, error = %e, "element position not updated");
        }
    }

    fn on_drag_end(&mut self, _event: &DragEnd) {
        self.position = None;
    }
}
