#![allow(clippy::float_cmp)]

use super::*;
use crate::consts::EPSILON;

fn v(x: f64, y: f64) -> Vector2 {
    Vector2::new(x, y).unwrap()
}

fn sp(x: f64, y: f64) -> ScreenPoint {
    ScreenPoint::new(x, y).unwrap()
}

fn space_with_frame(origin: ScreenPoint) -> (DrawingSpace, DrawingFrameId) {
    let mut space = DrawingSpace::new();
    let id = space.add_drawing_frame(DrawingFrame::new(origin));
    (space, id)
}

// =============================================================
// Screen ↔ drawing
// =============================================================

#[test]
fn identity_frame_maps_screen_to_same_vector() {
    let (space, id) = space_with_frame(ScreenPoint::ORIGIN);
    let d = sp(12.0, 34.0).to_drawing_point(&space, id).unwrap();
    assert_eq!(d.vector(), v(12.0, 34.0));
    assert_eq!(d.frame(), id);
}

#[test]
fn pan_origin_is_subtracted() {
    let (space, id) = space_with_frame(sp(100.0, 50.0));
    let d = sp(130.0, 70.0).to_drawing_point(&space, id).unwrap();
    assert_eq!(d.vector(), v(30.0, 20.0));
}

#[test]
fn unscaled_screen_point_adds_origin() {
    let (mut space, id) = space_with_frame(sp(100.0, 50.0));
    space.set_view_zoom(id, 2.0, sp(10.0, 10.0)).unwrap();
    let s = DrawingPoint::new(v(5.0, 5.0), id).to_screen_point(&space).unwrap();
    assert_eq!(s, sp(105.0, 55.0));
}

#[test]
fn scaled_screen_point_applies_zoom_about_center() {
    let (mut space, id) = space_with_frame(sp(10.0, 0.0));
    space.set_view_zoom(id, 2.0, sp(0.0, 0.0)).unwrap();
    // ((5 + 10) - 0) * 2 + 0 = 30
    let s = DrawingPoint::new(v(5.0, 5.0), id).to_screen_point_scaled(&space).unwrap();
    assert!(s.vector().approx_eq(&v(30.0, 10.0), EPSILON));
}

#[test]
fn screen_drawing_round_trip_holds_across_frames() {
    let frames = [
        (sp(0.0, 0.0), 1.0, sp(0.0, 0.0)),
        (sp(120.0, -40.0), 2.5, sp(300.0, 200.0)),
        (sp(-33.3, 17.0), 0.25, sp(-10.0, 5.0)),
        (sp(5.0, 5.0), -1.5, sp(640.0, 480.0)),
    ];
    let points = [sp(0.0, 0.0), sp(1.0, 2.0), sp(-250.5, 999.0), sp(1e4, -1e4)];

    for (origin, alpha, center) in frames {
        let mut space = DrawingSpace::new();
        let id = space.add_drawing_frame(DrawingFrame::new(origin));
        space.set_view_zoom(id, alpha, center).unwrap();
        for p in points {
            let back = p.to_drawing_point(&space, id).unwrap().to_screen_point_scaled(&space).unwrap();
            assert!(back.vector().approx_eq(&p.vector(), 1e-6), "alpha={alpha} p={:?} back={:?}", p, back);
        }
    }
}

#[test]
fn drawing_screen_round_trip_holds() {
    let (mut space, id) = space_with_frame(sp(40.0, 60.0));
    space.set_view_zoom(id, 3.0, sp(200.0, 100.0)).unwrap();
    let d = DrawingPoint::new(v(-7.0, 11.0), id);
    let back = d.to_screen_point_scaled(&space).unwrap().to_drawing_point(&space, id).unwrap();
    assert!(back.vector().approx_eq(&d.vector(), EPSILON));
}

// =============================================================
// Degenerate input
// =============================================================

#[test]
fn zero_view_zoom_fails_and_leaves_frame_unchanged() {
    let (mut space, id) = space_with_frame(sp(1.0, 1.0));
    let err = space.set_view_zoom(id, 0.0, sp(5.0, 5.0)).unwrap_err();
    assert_eq!(err, GeometryError::DegenerateZoom(0.0));
    assert_eq!(space.drawing_frame(id).unwrap().zoom_factor(), 1.0);
    assert_eq!(space.drawing_frame(id).unwrap().zoom_center(), ScreenPoint::ORIGIN);
}

#[test]
fn nan_view_zoom_fails() {
    let frame = DrawingFrame::default();
    assert!(frame.with_view_zoom(f64::NAN, ScreenPoint::ORIGIN).is_err());
}

#[test]
fn conversion_before_any_frame_fails() {
    let space = DrawingSpace::new();
    assert_eq!(space.active_frame(), Err(GeometryError::NoActiveFrame));
    assert_eq!(sp(1.0, 1.0).to_active_drawing_point(&space), Err(GeometryError::NoActiveFrame));
}

#[test]
fn first_frame_becomes_active() {
    let mut space = DrawingSpace::new();
    let first = space.add_drawing_frame(DrawingFrame::new(sp(10.0, 0.0)));
    let second = space.add_drawing_frame(DrawingFrame::default());
    assert_eq!(space.active_frame().unwrap(), first);
    space.set_active(second).unwrap();
    assert_eq!(sp(10.0, 0.0).to_active_drawing_point(&space).unwrap().vector(), v(10.0, 0.0));
}

#[test]
fn foreign_frame_id_fails() {
    let (space, _) = space_with_frame(ScreenPoint::ORIGIN);
    let mut other = DrawingSpace::new();
    other.add_drawing_frame(DrawingFrame::default());
    let foreign = other.add_drawing_frame(DrawingFrame::default());
    assert_eq!(
        sp(0.0, 0.0).to_drawing_point(&space, foreign),
        Err(GeometryError::UnknownDrawingFrame(foreign))
    );
}

// =============================================================
// Pan / zoom mutation
// =============================================================

#[test]
fn pan_translates_origin() {
    let (mut space, id) = space_with_frame(sp(10.0, 10.0));
    space.pan(id, v(5.0, -3.0)).unwrap();
    assert_eq!(space.drawing_frame(id).unwrap().origin(), sp(15.0, 7.0));
}

#[test]
fn pan_is_seen_by_existing_points() {
    let (mut space, id) = space_with_frame(ScreenPoint::ORIGIN);
    let d = DrawingPoint::new(v(1.0, 1.0), id);
    space.pan(id, v(10.0, 0.0)).unwrap();
    assert_eq!(d.to_screen_point(&space).unwrap(), sp(11.0, 1.0));
}

#[test]
fn baked_zoom_moves_origin_about_center() {
    let (mut space, id) = space_with_frame(sp(100.0, 100.0));
    space.zoom(id, 2.0, sp(50.0, 50.0)).unwrap();
    // 50 + (100 - 50) * 2 = 150
    assert_eq!(space.drawing_frame(id).unwrap().origin(), sp(150.0, 150.0));
}

#[test]
fn baked_zoom_rescales_registered_dependents_only_in_that_frame() {
    let mut space = DrawingSpace::new();
    let a = space.add_drawing_frame(DrawingFrame::default());
    let b = space.add_drawing_frame(DrawingFrame::default());
    let in_a = space.register(DrawingPoint::new(v(3.0, 4.0), a)).unwrap();
    let in_b = space.register(DrawingPoint::new(v(3.0, 4.0), b)).unwrap();

    space.zoom(a, 3.0, ScreenPoint::ORIGIN).unwrap();

    assert_eq!(space.dependent(in_a).unwrap().vector(), v(9.0, 12.0));
    assert_eq!(space.dependent(in_b).unwrap().vector(), v(3.0, 4.0));
}

#[test]
fn baked_zoom_keeps_dependent_screen_position_consistent() {
    let (mut space, id) = space_with_frame(sp(20.0, 30.0));
    let dep = space.register(DrawingPoint::new(v(10.0, 10.0), id)).unwrap();
    let center = sp(0.0, 0.0);
    let before = space.dependent(dep).unwrap().to_screen_point(&space).unwrap();

    space.zoom(id, 2.0, center).unwrap();

    let after = space.dependent(dep).unwrap().to_screen_point(&space).unwrap();
    let expected = center.vector().plus(&before.vector().minus(&center.vector()).unwrap().times(2.0).unwrap()).unwrap();
    assert!(after.vector().approx_eq(&expected, EPSILON));
}

#[test]
fn baked_zoom_zero_factor_fails_without_mutation() {
    let (mut space, id) = space_with_frame(sp(1.0, 2.0));
    let dep = space.register(DrawingPoint::new(v(1.0, 1.0), id)).unwrap();
    assert!(space.zoom(id, 0.0, ScreenPoint::ORIGIN).is_err());
    assert_eq!(space.drawing_frame(id).unwrap().origin(), sp(1.0, 2.0));
    assert_eq!(space.dependent(dep).unwrap().vector(), v(1.0, 1.0));
}

#[test]
fn baked_zoom_rescales_local_frames_rooted_in_frame() {
    let (mut space, root, outer, inner) = nested_space();
    let other = space.add_drawing_frame(DrawingFrame::default());
    let elsewhere = space.add_local_frame(AnchorPoint::Drawing(DrawingPoint::new(v(10.0, 20.0), other))).unwrap();
    let sibling = space.register(DrawingPoint::new(v(10.0, 20.0), root)).unwrap();

    space.zoom(root, 2.0, ScreenPoint::ORIGIN).unwrap();

    assert_eq!(space.dependent(sibling).unwrap().vector(), v(20.0, 40.0));
    assert_eq!(space.local_frame(outer).unwrap().origin().vector(), v(20.0, 40.0));
    assert_eq!(space.local_frame(inner).unwrap().origin().vector(), v(2.0, 4.0));
    assert_eq!(space.local_frame(elsewhere).unwrap().origin().vector(), v(10.0, 20.0));
    assert_eq!(space.offset_from_root(inner).unwrap(), v(22.0, 44.0));

    let shape = LocalPoint::new(Vector2::ZERO, outer).to_screen_point(&space).unwrap();
    let registered = space.dependent(sibling).unwrap().to_screen_point(&space).unwrap();
    assert_eq!(shape, registered);
    assert_eq!(shape, sp(220.0, 240.0));
}

#[test]
fn failed_baked_zoom_leaves_local_frames() {
    let (mut space, root, outer, _) = nested_space();
    assert!(space.zoom(root, f64::NAN, ScreenPoint::ORIGIN).is_err());
    assert_eq!(space.local_frame(outer).unwrap().origin().vector(), v(10.0, 20.0));
}

#[test]
fn unregistered_slots_are_reused() {
    let (mut space, id) = space_with_frame(ScreenPoint::ORIGIN);
    let a = space.register(DrawingPoint::new(v(1.0, 1.0), id)).unwrap();
    let b = space.register(DrawingPoint::new(v(2.0, 2.0), id)).unwrap();
    assert!(space.unregister(a).is_some());
    assert!(space.unregister(a).is_none());
    assert_eq!(space.dependent_count(), 1);

    let c = space.register(DrawingPoint::new(v(3.0, 3.0), id)).unwrap();
    assert_eq!(space.dependent_count(), 2);
    assert_eq!(space.dependents.len(), 2);
    assert_ne!(a, c);
    assert!(space.dependent(a).is_none());
    assert!(!space.update_dependent(a, DrawingPoint::new(v(9.0, 9.0), id)));

    space.zoom(id, 2.0, ScreenPoint::ORIGIN).unwrap();
    assert_eq!(space.dependent(b).unwrap().vector(), v(4.0, 4.0));
    assert_eq!(space.dependent(c).unwrap().vector(), v(6.0, 6.0));
}

#[test]
fn unregistered_dependent_is_gone() {
    let (mut space, id) = space_with_frame(ScreenPoint::ORIGIN);
    let dep = space.register(DrawingPoint::new(v(1.0, 1.0), id)).unwrap();
    assert!(space.unregister(dep).is_some());
    assert!(space.dependent(dep).is_none());
    assert!(!space.update_dependent(dep, DrawingPoint::new(v(2.0, 2.0), id)));
}

#[test]
fn update_dependent_replaces_value() {
    let (mut space, id) = space_with_frame(ScreenPoint::ORIGIN);
    let dep = space.register(DrawingPoint::new(v(1.0, 1.0), id)).unwrap();
    assert!(space.update_dependent(dep, DrawingPoint::new(v(2.0, 2.0), id)));
    assert_eq!(space.dependent(dep).unwrap().vector(), v(2.0, 2.0));
}

// =============================================================
// Local frames
// =============================================================

fn nested_space() -> (DrawingSpace, DrawingFrameId, LocalFrameId, LocalFrameId) {
    let (mut space, root) = space_with_frame(sp(100.0, 100.0));
    let outer = space.add_local_frame(AnchorPoint::Drawing(DrawingPoint::new(v(10.0, 20.0), root))).unwrap();
    let inner = space.add_local_frame(AnchorPoint::Local(LocalPoint::new(v(1.0, 2.0), outer))).unwrap();
    (space, root, outer, inner)
}

#[test]
fn root_drawing_frame_walks_nesting() {
    let (space, root, outer, inner) = nested_space();
    assert_eq!(space.root_drawing_frame(outer).unwrap(), root);
    assert_eq!(space.root_drawing_frame(inner).unwrap(), root);
}

#[test]
fn offset_from_root_sums_chain() {
    let (space, _, outer, inner) = nested_space();
    assert_eq!(space.offset_from_root(outer).unwrap(), v(10.0, 20.0));
    assert_eq!(space.offset_from_root(inner).unwrap(), v(11.0, 22.0));
}

#[test]
fn local_to_parent_adds_origin() {
    let (space, root, outer, inner) = nested_space();
    let p = LocalPoint::new(v(5.0, 5.0), inner);
    assert_eq!(p.to_parent_point(&space).unwrap(), AnchorPoint::Local(LocalPoint::new(v(6.0, 7.0), outer)));
    let q = LocalPoint::new(v(5.0, 5.0), outer);
    assert_eq!(q.to_parent_point(&space).unwrap(), AnchorPoint::Drawing(DrawingPoint::new(v(15.0, 25.0), root)));
}

#[test]
fn local_to_drawing_and_screen() {
    let (space, root, _, inner) = nested_space();
    let p = LocalPoint::new(v(5.0, 5.0), inner);
    assert_eq!(p.to_drawing_point(&space).unwrap(), DrawingPoint::new(v(16.0, 27.0), root));
    assert_eq!(p.to_screen_point(&space).unwrap(), sp(116.0, 127.0));
}

#[test]
fn drawing_into_local_subtracts_offset() {
    let (space, root, _, inner) = nested_space();
    let d = DrawingPoint::new(v(16.0, 27.0), root);
    assert_eq!(d.to_local_point(&space, inner).unwrap(), LocalPoint::new(v(5.0, 5.0), inner));
}

#[test]
fn drawing_into_local_of_other_root_fails() {
    let (mut space, _, _, inner) = nested_space();
    let other = space.add_drawing_frame(DrawingFrame::default());
    let d = DrawingPoint::new(v(0.0, 0.0), other);
    assert_eq!(d.to_local_point(&space, inner), Err(GeometryError::FrameMismatch));
}

#[test]
fn deep_nesting_accumulates() {
    let (mut space, root) = space_with_frame(ScreenPoint::ORIGIN);
    let mut frame = space.add_local_frame(AnchorPoint::Drawing(DrawingPoint::new(v(1.0, 0.0), root))).unwrap();
    for _ in 0..50 {
        frame = space.add_local_frame(AnchorPoint::Local(LocalPoint::new(v(1.0, 1.0), frame))).unwrap();
    }
    assert_eq!(space.offset_from_root(frame).unwrap(), v(51.0, 50.0));
    assert_eq!(space.root_drawing_frame(frame).unwrap(), root);
}

#[test]
fn reparent_moves_subtree() {
    let (mut space, root, outer, inner) = nested_space();
    space.reparent(outer, AnchorPoint::Drawing(DrawingPoint::new(v(0.0, 0.0), root))).unwrap();
    assert_eq!(space.offset_from_root(inner).unwrap(), v(1.0, 2.0));
}

#[test]
fn reparent_under_own_descendant_fails() {
    let (mut space, _, outer, inner) = nested_space();
    let err = space.reparent(outer, AnchorPoint::Local(LocalPoint::new(v(0.0, 0.0), inner))).unwrap_err();
    assert_eq!(err, GeometryError::FrameCycle(outer));
}

#[test]
fn reparent_under_self_fails() {
    let (mut space, _, outer, _) = nested_space();
    let err = space.reparent(outer, AnchorPoint::Local(LocalPoint::new(v(0.0, 0.0), outer))).unwrap_err();
    assert_eq!(err, GeometryError::FrameCycle(outer));
}

#[test]
fn add_local_frame_with_unknown_parent_fails() {
    let (mut space, _, _, _) = nested_space();
    let bogus = LocalFrameId(99);
    let err = space.add_local_frame(AnchorPoint::Local(LocalPoint::new(v(0.0, 0.0), bogus))).unwrap_err();
    assert_eq!(err, GeometryError::UnknownLocalFrame(bogus));
}

// =============================================================
// FramePoint
// =============================================================

#[test]
fn frame_point_translated_keeps_frame() {
    let (_, _, _, inner) = nested_space();
    let p = FramePoint::Local(LocalPoint::new(v(1.0, 1.0), inner));
    let moved = p.translated(&v(2.0, 3.0)).unwrap();
    assert_eq!(moved, FramePoint::Local(LocalPoint::new(v(3.0, 4.0), inner)));
}

#[test]
fn scale_of_uses_root_view_zoom() {
    let (mut space, root, _, inner) = nested_space();
    space.set_view_zoom(root, 4.0, ScreenPoint::ORIGIN).unwrap();
    assert_eq!(space.scale_of(&FramePoint::Screen(ScreenPoint::ORIGIN)).unwrap(), 1.0);
    assert_eq!(space.scale_of(&FramePoint::Drawing(DrawingPoint::new(Vector2::ZERO, root))).unwrap(), 4.0);
    assert_eq!(space.scale_of(&FramePoint::Local(LocalPoint::new(Vector2::ZERO, inner))).unwrap(), 4.0);
}

#[test]
fn frame_point_screen_position() {
    let (space, _, _, inner) = nested_space();
    let p = FramePoint::Local(LocalPoint::new(v(0.0, 0.0), inner));
    assert_eq!(p.to_screen_point_scaled(&space).unwrap(), sp(111.0, 122.0));
}
