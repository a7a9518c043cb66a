//! The narrow contract the engine needs from the host's visual elements, and
//! the raw pointer events the host feeds in.

#[cfg(test)]
#[path = "element_test.rs"]
mod element_test;

use serde::{Deserialize, Serialize};

use crate::error::GeometryError;
use crate::frame::{FramePoint, ScreenPoint};

/// Axis-aligned box in screen pixels.
///
/// Zero-size boxes are valid (an element that has not been laid out yet).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundingBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    #[must_use]
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Whether `point` lies inside the box, edges included.
    #[must_use]
    pub fn contains(&self, point: ScreenPoint) -> bool {
        let v = point.vector();
        (self.left..=self.right()).contains(&v.x()) && (self.top..=self.bottom()).contains(&v.y())
    }

    /// # Errors
    ///
    /// Returns [`GeometryError::NonFinite`] if the box has non-finite edges.
    pub fn center(&self) -> Result<ScreenPoint, GeometryError> {
        ScreenPoint::new(self.left + self.width * 0.5, self.top + self.height * 0.5)
    }
}

/// A visual element whose anchor position the engine can read and write.
pub trait MovableElement {
    /// Current anchor position, in whichever frame the element lives in.
    fn position(&self) -> FramePoint;

    fn set_position(&mut self, position: FramePoint);

    fn bounding_box(&self) -> BoundingBox;
}

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button.
    Primary,
    /// Middle mouse button (scroll wheel click).
    Middle,
    /// Right mouse button.
    Secondary,
    /// Any other button code reported by the browser.
    Other(i16),
}

impl Button {
    /// Map a DOM `MouseEvent.button` code.
    #[must_use]
    pub fn from_code(code: i16) -> Self {
        match code {
            0 => Self::Primary,
            1 => Self::Middle,
            2 => Self::Secondary,
            other => Self::Other(other),
        }
    }
}

/// Kind of raw pointer event delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    Press,
    Move,
    Release,
    ContextMenu,
}

impl PointerEventKind {
    /// The DOM event type name.
    #[must_use]
    pub fn dom_name(self) -> &'static str {
        match self {
            Self::Press => "mousedown",
            Self::Move => "mousemove",
            Self::Release => "mouseup",
            Self::ContextMenu => "contextmenu",
        }
    }
}

/// A raw pointer event: viewport-relative position, button and timestamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Viewport x in CSS pixels.
    pub client_x: f64,
    /// Viewport y in CSS pixels.
    pub client_y: f64,
    pub button: Button,
    /// Event timestamp in milliseconds (any monotonic origin).
    pub time_ms: f64,
}

impl PointerEvent {
    #[must_use]
    pub fn new(client_x: f64, client_y: f64, button: Button, time_ms: f64) -> Self {
        Self { client_x, client_y, button, time_ms }
    }

    /// # Errors
    ///
    /// Returns [`GeometryError::NonFinite`] for a non-finite position.
    pub fn position(&self) -> Result<ScreenPoint, GeometryError> {
        ScreenPoint::new(self.client_x, self.client_y)
    }
}
