//! Error taxonomy for unit arithmetic and frame conversions.
//!
//! Every variant here is a call-site bug: a NaN fed into a constructor, two
//! lengths of different units combined, a conversion asked of a frame that
//! does not exist. They propagate to the caller unchanged. A missing gesture
//! session is not an error and never appears here.

use crate::frame::{DrawingFrameId, LocalFrameId};

/// Error returned by scalar, vector and frame operations.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GeometryError {
    /// A scalar was constructed from NaN or an infinity.
    #[error("scalar value must be finite, got {0}")]
    NonFinite(f64),
    /// Two scalars of different units were combined or compared.
    #[error("unit mismatch: {left} vs {right}")]
    UnitMismatch { left: String, right: String },
    /// A divisor (or ratio denominator) was zero.
    #[error("division by zero")]
    DivisionByZero,
    /// A zoom factor of zero (or non-finite) makes the frame transform non-invertible.
    #[error("degenerate zoom factor: {0}")]
    DegenerateZoom(f64),
    /// A conversion needed the active drawing frame before any was set.
    #[error("no active drawing frame")]
    NoActiveFrame,
    /// The drawing frame id does not belong to this space.
    #[error("unknown drawing frame: {0:?}")]
    UnknownDrawingFrame(DrawingFrameId),
    /// The local frame id does not belong to this space.
    #[error("unknown local frame: {0:?}")]
    UnknownLocalFrame(LocalFrameId),
    /// A point and a local frame hang off different drawing frames.
    #[error("point and frame belong to different drawing frames")]
    FrameMismatch,
    /// Reparenting would make a local frame its own ancestor.
    #[error("reparenting {0:?} would create a frame cycle")]
    FrameCycle(LocalFrameId),
}
