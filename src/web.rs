//! DOM listener host.
//!
//! [`DomHost`] implements [`ListenerHost`] over one `web_sys::Element` and
//! its owner document. Each registration wraps the handler in a
//! `Closure<dyn FnMut(MouseEvent)>` that converts the native event into a
//! [`PointerEvent`] and calls `preventDefault` when the handler consumed it.
//! The closures are owned by the host and dropped on `unlisten` or when the
//! host itself is dropped.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use tracing::{debug, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{Document, Element, EventTarget, MouseEvent};

use crate::binding::{BindingError, ListenerHost, ListenerId, ListenerScope, PointerHandler};
use crate::element::{Button, PointerEvent, PointerEventKind};

struct Registration {
    target: EventTarget,
    kind: PointerEventKind,
    closure: Closure<dyn FnMut(MouseEvent)>,
}

/// Routes DOM mouse events on an element and its document to a handler.
pub struct DomHost<H> {
    element: Element,
    document: Document,
    handler: Rc<RefCell<H>>,
    next_id: u64,
    registrations: HashMap<ListenerId, Registration>,
}

impl<H: PointerHandler + 'static> DomHost<H> {
    #[must_use]
    pub fn new(element: Element, document: Document, handler: Rc<RefCell<H>>) -> Self {
        Self { element, document, handler, next_id: 0, registrations: HashMap::new() }
    }

    /// Bind to `element` and its owner document. `None` for a detached node
    /// without a document.
    #[must_use]
    pub fn for_element(element: Element, handler: Rc<RefCell<H>>) -> Option<Self> {
        let document = element.owner_document()?;
        Some(Self::new(element, document, handler))
    }

    #[must_use]
    pub fn handler(&self) -> &Rc<RefCell<H>> {
        &self.handler
    }

    fn target(&self, scope: ListenerScope) -> EventTarget {
        match scope {
            ListenerScope::Element => self.element.clone().into(),
            ListenerScope::Document => self.document.clone().into(),
        }
    }
}

fn to_pointer_event(event: &MouseEvent) -> PointerEvent {
    PointerEvent::new(
        f64::from(event.client_x()),
        f64::from(event.client_y()),
        Button::from_code(event.button()),
        event.time_stamp(),
    )
}

impl<H: PointerHandler + 'static> ListenerHost for DomHost<H> {
    fn listen(&mut self, scope: ListenerScope, kind: PointerEventKind) -> Result<ListenerId, BindingError> {
        let handler = Rc::clone(&self.handler);
        let closure = Closure::wrap(Box::new(move |event: MouseEvent| {
            let pointer = to_pointer_event(&event);
            let consumed = match handler.try_borrow_mut() {
                Ok(mut handler) => handler.handle_pointer(kind, &pointer),
                Err(_) => {
                    warn!(?kind, "pointer handler busy; event dropped");
                    false
                }
            };
            if consumed {
                event.prevent_default();
            }
        }) as Box<dyn FnMut(MouseEvent)>);

        let target = self.target(scope);
        let callback: &js_sys::Function = closure.as_ref().unchecked_ref();
        target
            .add_event_listener_with_callback(kind.dom_name(), callback)
            .map_err(|e| BindingError::Listen { scope, kind, reason: format!("{e:?}") })?;

        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.registrations.insert(id, Registration { target, kind, closure });
        debug!(listener = id.0, event = kind.dom_name(), ?scope, "dom listener added");
        Ok(id)
    }

    fn unlisten(&mut self, id: ListenerId) {
        let Some(registration) = self.registrations.remove(&id) else {
            return;
        };
        let callback: &js_sys::Function = registration.closure.as_ref().unchecked_ref();
        if let Err(e) = registration.target.remove_event_listener_with_callback(registration.kind.dom_name(), callback) {
            warn!(listener = id.0, error = ?e, "failed to remove dom listener");
        }
    }
}

impl<H> Drop for DomHost<H> {
    fn drop(&mut self) {
        for (id, registration) in self.registrations.drain() {
            let callback: &js_sys::Function = registration.closure.as_ref().unchecked_ref();
            if let Err(e) = registration.target.remove_event_listener_with_callback(registration.kind.dom_name(), callback)
            {
                warn!(listener = id.0, error = ?e, "failed to remove dom listener on drop");
            }
        }
    }
}
