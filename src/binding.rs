//! Listener registration seam between the engine and the host.
//!
//! The engine never touches DOM objects. A [`ListenerHost`] registers native
//! listeners on the bound element (or on its document, so drags that leave
//! the element keep being tracked) and routes the events to a
//! [`PointerHandler`]. [`Binding`] remembers exactly which listeners one
//! attach registered so detach removes those and nothing else.

#[cfg(test)]
#[path = "binding_test.rs"]
pub(crate) mod binding_test;

use tracing::debug;

use crate::element::{PointerEvent, PointerEventKind};

/// Host-assigned handle of one registered native listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// Where a listener is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerScope {
    /// The bound element itself.
    Element,
    /// The element's owner document.
    Document,
}

/// Error returned when a host cannot register a listener.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BindingError {
    #[error("failed to listen for {kind:?} on {scope:?}: {reason}")]
    Listen { scope: ListenerScope, kind: PointerEventKind, reason: String },
}

/// Registers and removes native pointer listeners.
pub trait ListenerHost {
    /// # Errors
    ///
    /// Returns [`BindingError::Listen`] when the native registration fails.
    fn listen(&mut self, scope: ListenerScope, kind: PointerEventKind) -> Result<ListenerId, BindingError>;

    /// Remove a listener previously returned by [`ListenerHost::listen`].
    fn unlisten(&mut self, id: ListenerId);
}

/// Receives the events routed by a [`ListenerHost`].
pub trait PointerHandler {
    /// Handle one raw event. Returns `true` when the event was consumed and
    /// its native default action should be suppressed.
    fn handle_pointer(&mut self, kind: PointerEventKind, event: &PointerEvent) -> bool;
}

/// Listeners registered by one attach.
#[derive(Debug, Default)]
pub struct Binding {
    listeners: Vec<ListenerId>,
}

impl Binding {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_attached(&self) -> bool {
        !self.listeners.is_empty()
    }

    #[must_use]
    pub fn listeners(&self) -> &[ListenerId] {
        &self.listeners
    }

    /// Register one listener per `(scope, kind)`. Returns `false` without
    /// touching the host if already attached.
    ///
    /// # Errors
    ///
    /// Returns the host's [`BindingError`]; listeners registered before the
    /// failure are removed again.
    pub fn attach<H: ListenerHost + ?Sized>(
        &mut self,
        host: &mut H,
        wanted: &[(ListenerScope, PointerEventKind)],
    ) -> Result<bool, BindingError> {
        if self.is_attached() {
            return Ok(false);
        }
        let mut registered = Vec::with_capacity(wanted.len());
        for &(scope, kind) in wanted {
            match host.listen(scope, kind) {
                Ok(id) => registered.push(id),
                Err(e) => {
                    for id in registered {
                        host.unlisten(id);
                    }
                    return Err(e);
                }
            }
        }
        debug!(listeners = registered.len(), "pointer listeners attached");
        self.listeners = registered;
        Ok(true)
    }

    /// Remove the recorded listeners. Returns `false` if nothing was attached.
    pub fn detach<H: ListenerHost + ?Sized>(&mut self, host: &mut H) -> bool {
        if !self.is_attached() {
            return false;
        }
        let listeners = std::mem::take(&mut self.listeners);
        debug!(listeners = listeners.len(), "pointer listeners detached");
        for id in listeners {
            host.unlisten(id);
        }
        true
    }
}
