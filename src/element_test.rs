use super::*;

// =============================================================
// BoundingBox
// =============================================================

#[test]
fn contains_includes_edges() {
    let b = BoundingBox::new(10.0, 20.0, 30.0, 40.0);
    assert!(b.contains(ScreenPoint::new(10.0, 20.0).unwrap()));
    assert!(b.contains(ScreenPoint::new(40.0, 60.0).unwrap()));
    assert!(b.contains(ScreenPoint::new(25.0, 30.0).unwrap()));
    assert!(!b.contains(ScreenPoint::new(41.0, 30.0).unwrap()));
    assert!(!b.contains(ScreenPoint::new(25.0, 19.0).unwrap()));
}

#[test]
fn zero_size_box_is_empty_but_contains_its_corner() {
    let b = BoundingBox::new(5.0, 5.0, 0.0, 0.0);
    assert!(b.is_empty());
    assert!(b.contains(ScreenPoint::new(5.0, 5.0).unwrap()));
}

#[test]
fn center_is_midpoint() {
    let b = BoundingBox::new(0.0, 0.0, 10.0, 20.0);
    assert_eq!(b.center().unwrap(), ScreenPoint::new(5.0, 10.0).unwrap());
}

#[test]
fn center_with_nan_edge_fails() {
    let b = BoundingBox::new(f64::NAN, 0.0, 10.0, 20.0);
    assert!(b.center().is_err());
}

// =============================================================
// Button
// =============================================================

#[test]
fn button_from_dom_codes() {
    assert_eq!(Button::from_code(0), Button::Primary);
    assert_eq!(Button::from_code(1), Button::Middle);
    assert_eq!(Button::from_code(2), Button::Secondary);
    assert_eq!(Button::from_code(4), Button::Other(4));
}

// =============================================================
// PointerEvent
// =============================================================

#[test]
fn event_kind_dom_names() {
    assert_eq!(PointerEventKind::Press.dom_name(), "mousedown");
    assert_eq!(PointerEventKind::Move.dom_name(), "mousemove");
    assert_eq!(PointerEventKind::Release.dom_name(), "mouseup");
    assert_eq!(PointerEventKind::ContextMenu.dom_name(), "contextmenu");
}

#[test]
fn event_position_is_client_coordinates() {
    let ev = PointerEvent::new(3.0, 4.0, Button::Primary, 0.0);
    assert_eq!(ev.position().unwrap(), ScreenPoint::new(3.0, 4.0).unwrap());
}

#[test]
fn event_position_rejects_nan() {
    let ev = PointerEvent::new(f64::NAN, 4.0, Button::Primary, 0.0);
    assert!(ev.position().is_err());
}
