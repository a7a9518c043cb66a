//! Coordinate frames: screen, drawing and local points.
//!
//! DESIGN
//! ======
//! Three point kinds share [`Vector2`] as their payload:
//!
//! - [`ScreenPoint`] is relative to the viewport's top-left and has no parent.
//! - [`DrawingPoint`] is relative to a [`DrawingFrame`]'s pan origin, before
//!   the frame's view zoom is applied.
//! - [`LocalPoint`] is relative to a [`LocalFrame`] whose origin is a drawing
//!   point or another local point, nested to any depth.
//!
//! Frames live in a [`DrawingSpace`] arena and points refer to them by id.
//! Mutating a frame (pan, zoom, reparent) is therefore visible to every point
//! that names it; points themselves are immutable values and are re-derived
//! after a mutation. The one exception is the baked [`DrawingSpace::zoom`],
//! which rescales in a single batch the points explicitly registered with the
//! space and the anchors of the local frames rooted in the zoomed frame.
//!
//! The zoomed drawing→screen transform is `c = ((d + o) - s)·α + s` for pan
//! origin `o`, zoom factor `α` and zoom center `s`. Its exact inverse is
//! [`ScreenPoint::to_drawing_point`]: `d = (c - s·(1-α)) / α - o`.

#[cfg(test)]
#[path = "frame_test.rs"]
mod frame_test;

use tracing::debug;

use crate::error::GeometryError;
use crate::unit::finite;
use crate::vector::Vector2;

/// Index of a [`DrawingFrame`] inside its [`DrawingSpace`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DrawingFrameId(usize);

/// Index of a [`LocalFrame`] inside its [`DrawingSpace`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LocalFrameId(usize);

/// Handle to a drawing point registered for batch zoom updates. Slots are
/// reused after `unregister`; the generation keeps a stale handle from
/// reaching the point that took its slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DependentId {
    slot: usize,
    generation: u32,
}

#[derive(Debug, Clone, Copy, Default)]
struct DependentSlot {
    generation: u32,
    point: Option<DrawingPoint>,
}

// =============================================================================
// SCREEN
// =============================================================================

/// A position relative to the viewport's top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenPoint {
    vector: Vector2,
}

impl ScreenPoint {
    pub const ORIGIN: Self = Self { vector: Vector2::ZERO };

    /// # Errors
    ///
    /// Returns [`GeometryError::NonFinite`] for non-finite coordinates.
    pub fn new(x: f64, y: f64) -> Result<Self, GeometryError> {
        Ok(Self { vector: Vector2::new(x, y)? })
    }

    #[must_use]
    pub fn from_vector(vector: Vector2) -> Self {
        Self { vector }
    }

    #[must_use]
    pub fn vector(&self) -> Vector2 {
        self.vector
    }

    /// Convert into `frame`, undoing its view zoom and pan.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::UnknownDrawingFrame`] for a foreign id and
    /// [`GeometryError::DegenerateZoom`] if the frame's zoom factor is zero.
    pub fn to_drawing_point(&self, space: &DrawingSpace, frame: DrawingFrameId) -> Result<DrawingPoint, GeometryError> {
        let vector = space.drawing_frame(frame)?.screen_to_drawing(self.vector)?;
        Ok(DrawingPoint { vector, frame })
    }

    /// Convert into the space's active drawing frame.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::NoActiveFrame`] before any frame exists.
    pub fn to_active_drawing_point(&self, space: &DrawingSpace) -> Result<DrawingPoint, GeometryError> {
        self.to_drawing_point(space, space.active_frame()?)
    }
}

// =============================================================================
// DRAWING
// =============================================================================

/// A pannable, zoomable origin anchoring a drawing surface to the screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawingFrame {
    origin: ScreenPoint,
    zoom_factor: f64,
    zoom_center: ScreenPoint,
}

impl Default for DrawingFrame {
    fn default() -> Self {
        Self { origin: ScreenPoint::ORIGIN, zoom_factor: 1.0, zoom_center: ScreenPoint::ORIGIN }
    }
}

impl DrawingFrame {
    /// A frame panned to `origin` with no view zoom.
    #[must_use]
    pub fn new(origin: ScreenPoint) -> Self {
        Self { origin, ..Self::default() }
    }

    /// # Errors
    ///
    /// Returns [`GeometryError::DegenerateZoom`] for a zero or non-finite factor.
    pub fn with_view_zoom(self, zoom_factor: f64, zoom_center: ScreenPoint) -> Result<Self, GeometryError> {
        Ok(Self { zoom_factor: check_zoom(zoom_factor)?, zoom_center, ..self })
    }

    #[must_use]
    pub fn origin(&self) -> ScreenPoint {
        self.origin
    }

    #[must_use]
    pub fn zoom_factor(&self) -> f64 {
        self.zoom_factor
    }

    #[must_use]
    pub fn zoom_center(&self) -> ScreenPoint {
        self.zoom_center
    }

    fn screen_to_drawing(&self, c: Vector2) -> Result<Vector2, GeometryError> {
        let alpha = check_zoom(self.zoom_factor)?;
        let s = self.zoom_center.vector;
        let zoomed_origin = s.times(1.0 - alpha)?;
        c.minus(&zoomed_origin)?.divide(alpha)?.minus(&self.origin.vector)
    }

    fn drawing_to_screen_scaled(&self, d: Vector2) -> Result<Vector2, GeometryError> {
        let s = self.zoom_center.vector;
        d.plus(&self.origin.vector)?.minus(&s)?.times(self.zoom_factor)?.plus(&s)
    }
}

fn check_zoom(factor: f64) -> Result<f64, GeometryError> {
    match finite(factor) {
        Ok(f) if f != 0.0 => Ok(f),
        _ => Err(GeometryError::DegenerateZoom(factor)),
    }
}

/// A position relative to a drawing frame's pan origin, before view zoom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawingPoint {
    vector: Vector2,
    frame: DrawingFrameId,
}

impl DrawingPoint {
    #[must_use]
    pub fn new(vector: Vector2, frame: DrawingFrameId) -> Self {
        Self { vector, frame }
    }

    #[must_use]
    pub fn vector(&self) -> Vector2 {
        self.vector
    }

    #[must_use]
    pub fn frame(&self) -> DrawingFrameId {
        self.frame
    }

    /// Screen position ignoring view zoom (origin + vector).
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::UnknownDrawingFrame`] for a foreign id.
    pub fn to_screen_point(&self, space: &DrawingSpace) -> Result<ScreenPoint, GeometryError> {
        let frame = space.drawing_frame(self.frame)?;
        Ok(ScreenPoint::from_vector(self.vector.plus(&frame.origin.vector)?))
    }

    /// Screen position with the frame's view zoom applied.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::UnknownDrawingFrame`] for a foreign id.
    pub fn to_screen_point_scaled(&self, space: &DrawingSpace) -> Result<ScreenPoint, GeometryError> {
        let frame = space.drawing_frame(self.frame)?;
        Ok(ScreenPoint::from_vector(frame.drawing_to_screen_scaled(self.vector)?))
    }

    /// Express this point inside `local`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::FrameMismatch`] when `local` is not rooted in
    /// this point's drawing frame.
    pub fn to_local_point(&self, space: &DrawingSpace, local: LocalFrameId) -> Result<LocalPoint, GeometryError> {
        let (root, offset) = space.root_and_offset(local)?;
        if root != self.frame {
            return Err(GeometryError::FrameMismatch);
        }
        Ok(LocalPoint { vector: self.vector.minus(&offset)?, frame: local })
    }
}

// =============================================================================
// LOCAL
// =============================================================================

/// The point a [`LocalFrame`] is anchored at, and the result of stepping a
/// local point up to its parent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnchorPoint {
    Drawing(DrawingPoint),
    Local(LocalPoint),
}

impl AnchorPoint {
    #[must_use]
    pub fn vector(&self) -> Vector2 {
        match self {
            Self::Drawing(p) => p.vector,
            Self::Local(p) => p.vector,
        }
    }
}

/// A coordinate origin nested inside a drawing frame or another local frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalFrame {
    origin: AnchorPoint,
}

impl LocalFrame {
    #[must_use]
    pub fn origin(&self) -> AnchorPoint {
        self.origin
    }
}

/// A position relative to a local frame's origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalPoint {
    vector: Vector2,
    frame: LocalFrameId,
}

impl LocalPoint {
    #[must_use]
    pub fn new(vector: Vector2, frame: LocalFrameId) -> Self {
        Self { vector, frame }
    }

    #[must_use]
    pub fn vector(&self) -> Vector2 {
        self.vector
    }

    #[must_use]
    pub fn frame(&self) -> LocalFrameId {
        self.frame
    }

    /// Step one level up: add the frame's origin vector.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::UnknownLocalFrame`] for a foreign id.
    pub fn to_parent_point(&self, space: &DrawingSpace) -> Result<AnchorPoint, GeometryError> {
        Ok(match space.local_frame(self.frame)?.origin {
            AnchorPoint::Drawing(p) => AnchorPoint::Drawing(DrawingPoint { vector: self.vector.plus(&p.vector)?, frame: p.frame }),
            AnchorPoint::Local(p) => AnchorPoint::Local(LocalPoint { vector: self.vector.plus(&p.vector)?, frame: p.frame }),
        })
    }

    /// Walk every ancestor and land in the root drawing frame.
    ///
    /// # Errors
    ///
    /// Propagates unknown-frame and cycle errors from the ancestor walk.
    pub fn to_drawing_point(&self, space: &DrawingSpace) -> Result<DrawingPoint, GeometryError> {
        let (root, offset) = space.root_and_offset(self.frame)?;
        Ok(DrawingPoint { vector: self.vector.plus(&offset)?, frame: root })
    }

    /// # Errors
    ///
    /// Propagates errors from [`LocalPoint::to_drawing_point`].
    pub fn to_screen_point(&self, space: &DrawingSpace) -> Result<ScreenPoint, GeometryError> {
        self.to_drawing_point(space)?.to_screen_point(space)
    }

    /// # Errors
    ///
    /// Propagates errors from [`LocalPoint::to_drawing_point`].
    pub fn to_screen_point_scaled(&self, space: &DrawingSpace) -> Result<ScreenPoint, GeometryError> {
        self.to_drawing_point(space)?.to_screen_point_scaled(space)
    }
}

// =============================================================================
// FRAME-TYPED POSITION
// =============================================================================

/// A position in any of the three frame kinds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FramePoint {
    Screen(ScreenPoint),
    Drawing(DrawingPoint),
    Local(LocalPoint),
}

impl FramePoint {
    #[must_use]
    pub fn vector(&self) -> Vector2 {
        match self {
            Self::Screen(p) => p.vector,
            Self::Drawing(p) => p.vector,
            Self::Local(p) => p.vector,
        }
    }

    /// The same point moved by `delta`, expressed in its own frame's units.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::NonFinite`] on overflow.
    pub fn translated(&self, delta: &Vector2) -> Result<Self, GeometryError> {
        let vector = self.vector().plus(delta)?;
        Ok(match self {
            Self::Screen(_) => Self::Screen(ScreenPoint { vector }),
            Self::Drawing(p) => Self::Drawing(DrawingPoint { vector, frame: p.frame }),
            Self::Local(p) => Self::Local(LocalPoint { vector, frame: p.frame }),
        })
    }

    /// Where this point appears on screen, view zoom included.
    ///
    /// # Errors
    ///
    /// Propagates frame lookup errors.
    pub fn to_screen_point_scaled(&self, space: &DrawingSpace) -> Result<ScreenPoint, GeometryError> {
        match self {
            Self::Screen(p) => Ok(*p),
            Self::Drawing(p) => p.to_screen_point_scaled(space),
            Self::Local(p) => p.to_screen_point_scaled(space),
        }
    }
}

// =============================================================================
// SPACE
// =============================================================================

/// Arena owning every frame of one viewport plus the registry of zoom dependents.
#[derive(Debug, Clone, Default)]
pub struct DrawingSpace {
    drawing: Vec<DrawingFrame>,
    local: Vec<LocalFrame>,
    active: Option<DrawingFrameId>,
    dependents: Vec<DependentSlot>,
    free: Vec<usize>,
}

impl DrawingSpace {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a drawing frame. The first frame added becomes the active one.
    pub fn add_drawing_frame(&mut self, frame: DrawingFrame) -> DrawingFrameId {
        let id = DrawingFrameId(self.drawing.len());
        self.drawing.push(frame);
        if self.active.is_none() {
            self.active = Some(id);
        }
        debug!(?id, origin = %frame.origin.vector, "drawing frame added");
        id
    }

    /// # Errors
    ///
    /// Returns [`GeometryError::UnknownDrawingFrame`] for a foreign id.
    pub fn set_active(&mut self, id: DrawingFrameId) -> Result<(), GeometryError> {
        self.drawing_frame(id)?;
        self.active = Some(id);
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`GeometryError::NoActiveFrame`] before any frame was added.
    pub fn active_frame(&self) -> Result<DrawingFrameId, GeometryError> {
        self.active.ok_or(GeometryError::NoActiveFrame)
    }

    /// # Errors
    ///
    /// Returns [`GeometryError::UnknownDrawingFrame`] for a foreign id.
    pub fn drawing_frame(&self, id: DrawingFrameId) -> Result<&DrawingFrame, GeometryError> {
        self.drawing.get(id.0).ok_or(GeometryError::UnknownDrawingFrame(id))
    }

    fn drawing_frame_mut(&mut self, id: DrawingFrameId) -> Result<&mut DrawingFrame, GeometryError> {
        self.drawing.get_mut(id.0).ok_or(GeometryError::UnknownDrawingFrame(id))
    }

    /// Translate the frame's pan origin by `delta` screen pixels.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::UnknownDrawingFrame`] for a foreign id.
    pub fn pan(&mut self, id: DrawingFrameId, delta: Vector2) -> Result<(), GeometryError> {
        let frame = self.drawing_frame_mut(id)?;
        frame.origin = ScreenPoint::from_vector(frame.origin.vector.plus(&delta)?);
        Ok(())
    }

    /// Set the view zoom used by the scaled conversions.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::DegenerateZoom`] for a zero or non-finite
    /// factor; the frame is left unchanged.
    pub fn set_view_zoom(&mut self, id: DrawingFrameId, factor: f64, center: ScreenPoint) -> Result<(), GeometryError> {
        let frame = self.drawing_frame_mut(id)?;
        *frame = frame.with_view_zoom(factor, center)?;
        Ok(())
    }

    /// Bake a zoom about `center` into the frame: the origin becomes
    /// `center + (origin - center)·factor`, and every registered dependent of
    /// the frame and the anchor of every local frame rooted in it are scaled
    /// by `factor`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::DegenerateZoom`] for a zero or non-finite
    /// factor. Nothing is mutated on error.
    pub fn zoom(&mut self, id: DrawingFrameId, factor: f64, center: ScreenPoint) -> Result<(), GeometryError> {
        let factor = check_zoom(factor)?;
        let frame = self.drawing_frame(id)?;
        let c = center.vector;
        let origin = c.plus(&frame.origin.vector.minus(&c)?.times(factor)?)?;

        let mut rescaled = Vec::new();
        for (slot, dependent) in self.dependents.iter().enumerate() {
            if let Some(point) = dependent.point {
                if point.frame == id {
                    rescaled.push((slot, point.vector.times(factor)?));
                }
            }
        }

        // Every anchor on a chain rooted in `id` is an offset in that frame's units.
        let mut anchors = Vec::new();
        for (index, frame) in self.local.iter().enumerate() {
            if self.root_and_offset(LocalFrameId(index))?.0 != id {
                continue;
            }
            let anchor = match frame.origin {
                AnchorPoint::Drawing(p) => AnchorPoint::Drawing(DrawingPoint { vector: p.vector.times(factor)?, ..p }),
                AnchorPoint::Local(p) => AnchorPoint::Local(LocalPoint { vector: p.vector.times(factor)?, ..p }),
            };
            anchors.push((index, anchor));
        }

        self.drawing_frame_mut(id)?.origin = ScreenPoint::from_vector(origin);
        let count = rescaled.len();
        for (slot, vector) in rescaled {
            if let Some(point) = self.dependents.get_mut(slot).and_then(|d| d.point.as_mut()) {
                point.vector = vector;
            }
        }
        let local_frames = anchors.len();
        for (index, anchor) in anchors {
            if let Some(frame) = self.local.get_mut(index) {
                frame.origin = anchor;
            }
        }
        debug!(?id, factor, dependents = count, local_frames, "zoom baked into drawing frame");
        Ok(())
    }

    /// Add a local frame anchored at `origin`.
    ///
    /// # Errors
    ///
    /// Returns an unknown-frame error if `origin` names a frame not in this space.
    pub fn add_local_frame(&mut self, origin: AnchorPoint) -> Result<LocalFrameId, GeometryError> {
        self.check_anchor(origin)?;
        let id = LocalFrameId(self.local.len());
        self.local.push(LocalFrame { origin });
        debug!(?id, "local frame added");
        Ok(id)
    }

    /// # Errors
    ///
    /// Returns [`GeometryError::UnknownLocalFrame`] for a foreign id.
    pub fn local_frame(&self, id: LocalFrameId) -> Result<&LocalFrame, GeometryError> {
        self.local.get(id.0).ok_or(GeometryError::UnknownLocalFrame(id))
    }

    /// Move a local frame under a new origin.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::FrameCycle`] if `origin` lies inside `id`'s own subtree.
    pub fn reparent(&mut self, id: LocalFrameId, origin: AnchorPoint) -> Result<(), GeometryError> {
        self.local_frame(id)?;
        self.check_anchor(origin)?;
        if let AnchorPoint::Local(p) = origin {
            let mut current = Some(p.frame);
            let mut steps = 0;
            while let Some(ancestor) = current {
                if ancestor == id || steps > self.local.len() {
                    return Err(GeometryError::FrameCycle(id));
                }
                current = match self.local_frame(ancestor)?.origin {
                    AnchorPoint::Local(q) => Some(q.frame),
                    AnchorPoint::Drawing(_) => None,
                };
                steps += 1;
            }
        }
        if let Some(frame) = self.local.get_mut(id.0) {
            frame.origin = origin;
        }
        debug!(?id, "local frame reparented");
        Ok(())
    }

    /// The drawing frame at the top of `id`'s ancestor chain.
    ///
    /// # Errors
    ///
    /// Propagates unknown-frame and cycle errors.
    pub fn root_drawing_frame(&self, id: LocalFrameId) -> Result<DrawingFrameId, GeometryError> {
        Ok(self.root_and_offset(id)?.0)
    }

    /// Sum of every parent-relative origin vector from `id` up to the root drawing frame.
    ///
    /// # Errors
    ///
    /// Propagates unknown-frame and cycle errors.
    pub fn offset_from_root(&self, id: LocalFrameId) -> Result<Vector2, GeometryError> {
        Ok(self.root_and_offset(id)?.1)
    }

    fn root_and_offset(&self, id: LocalFrameId) -> Result<(DrawingFrameId, Vector2), GeometryError> {
        let mut offset = Vector2::ZERO;
        let mut current = id;
        for _ in 0..=self.local.len() {
            match self.local_frame(current)?.origin {
                AnchorPoint::Drawing(p) => {
                    self.drawing_frame(p.frame)?;
                    return Ok((p.frame, offset.plus(&p.vector)?));
                }
                AnchorPoint::Local(p) => {
                    offset = offset.plus(&p.vector)?;
                    current = p.frame;
                }
            }
        }
        Err(GeometryError::FrameCycle(id))
    }

    fn check_anchor(&self, anchor: AnchorPoint) -> Result<(), GeometryError> {
        match anchor {
            AnchorPoint::Drawing(p) => self.drawing_frame(p.frame).map(|_| ()),
            AnchorPoint::Local(p) => self.local_frame(p.frame).map(|_| ()),
        }
    }

    /// Register a drawing point so baked zooms on its frame rescale it.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::UnknownDrawingFrame`] for a foreign frame.
    pub fn register(&mut self, point: DrawingPoint) -> Result<DependentId, GeometryError> {
        self.drawing_frame(point.frame)?;
        let slot = match self.free.pop() {
            Some(slot) => slot,
            None => {
                self.dependents.push(DependentSlot::default());
                self.dependents.len() - 1
            }
        };
        let entry = &mut self.dependents[slot];
        entry.point = Some(point);
        Ok(DependentId { slot, generation: entry.generation })
    }

    /// Number of currently registered points.
    #[must_use]
    pub fn dependent_count(&self) -> usize {
        self.dependents.len() - self.free.len()
    }

    fn live_slot(&mut self, id: DependentId) -> Option<&mut DependentSlot> {
        self.dependents.get_mut(id.slot).filter(|d| d.generation == id.generation && d.point.is_some())
    }

    /// The current value of a registered point.
    #[must_use]
    pub fn dependent(&self, id: DependentId) -> Option<DrawingPoint> {
        self.dependents.get(id.slot).filter(|d| d.generation == id.generation).and_then(|d| d.point)
    }

    /// Replace the value of a registered point (e.g. after a drag).
    pub fn update_dependent(&mut self, id: DependentId, point: DrawingPoint) -> bool {
        match self.live_slot(id) {
            Some(entry) => {
                entry.point = Some(point);
                true
            }
            None => false,
        }
    }

    pub fn unregister(&mut self, id: DependentId) -> Option<DrawingPoint> {
        let entry = self.live_slot(id)?;
        let point = entry.point.take();
        entry.generation = entry.generation.wrapping_add(1);
        self.free.push(id.slot);
        point
    }

    /// Screen pixels per frame unit for a point: the root frame's view zoom,
    /// or 1 for screen points.
    ///
    /// # Errors
    ///
    /// Propagates frame lookup errors.
    pub fn scale_of(&self, point: &FramePoint) -> Result<f64, GeometryError> {
        match point {
            FramePoint::Screen(_) => Ok(1.0),
            FramePoint::Drawing(p) => Ok(self.drawing_frame(p.frame)?.zoom_factor),
            FramePoint::Local(p) => Ok(self.drawing_frame(self.root_drawing_frame(p.frame)?)?.zoom_factor),
        }
    }
}
