//! Unit-safe coordinate frames and a pointer gesture engine.
//!
//! This crate turns a raw stream of single-pointer events into classified,
//! kinematically enriched gestures (click, double-click, drag) and moves
//! elements through a nested, pannable/zoomable coordinate space. It is
//! synchronous and single-threaded: every call happens inside one UI event
//! callback. The host layer owns the real DOM nodes and only exposes them
//! through [`element::MovableElement`] and [`binding::ListenerHost`].
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`unit`] | Dimensioned scalars that refuse cross-unit arithmetic |
//! | [`vector`] | 2-D pixel vectors and the zero-padding component vector |
//! | [`frame`] | Screen / drawing / local points and the [`frame::DrawingSpace`] arena |
//! | [`element`] | Movable element contract and pointer event types |
//! | [`sample`] | Pointer sample history with derived kinematics |
//! | [`config`] | Gesture thresholds, loadable from JSON |
//! | [`gesture`] | The shared session state machine |
//! | [`binding`] | Listener registration seam between the engine and the host |
//! | [`recognizer`] | Click / double-click / drag recognition for one element |
//! | [`drag`] | Drag fan-out to many subscribers and the position manager |
//! | [`web`] | DOM listener host (feature `web`) |
//! | [`consts`] | Default thresholds and tolerances |
//! | [`error`] | Geometry error taxonomy |

pub mod binding;
pub mod config;
pub mod consts;
pub mod drag;
pub mod element;
pub mod error;
pub mod frame;
pub mod gesture;
pub mod recognizer;
pub mod sample;
pub mod unit;
pub mod vector;
#[cfg(feature = "web")]
pub mod web;

pub use error::GeometryError;
