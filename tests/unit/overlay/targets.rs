use super::*;
use crate::foundation::core::{BezPath, Canvas, Point, Rect};
use crate::map::model::HitTargetRule;
use crate::map::scene::{MapScene, SceneBuilder};
use kurbo::Shape;

fn rect_path(x0: f64, y0: f64, x1: f64, y1: f64) -> BezPath {
    Rect::new(x0, y0, x1, y1).to_path(0.0)
}

fn scene() -> MapScene {
    let mut b = SceneBuilder::new(
        Canvas::new(1000, 600).unwrap(),
        Rect::new(0.0, 0.0, 1000.0, 600.0),
    );
    // Tiny islands next to each other.
    b.path(rect_path(690.0, 364.0, 692.0, 366.0), Some("bs"));
    b.path(rect_path(770.0, 494.0, 772.0, 496.0), Some("tt"));
    b.finish()
}

fn rule(id: &str, radius: f64) -> HitTargetRule {
    HitTargetRule {
        entity_id: id.to_string(),
        radius,
    }
}

#[test]
fn rebuild_places_targets_at_box_centers() {
    let mut overlay = HitTargetOverlay::new();
    overlay.rebuild(&scene(), &[rule("bs", 24.0), rule("tt", 18.0)]);

    assert_eq!(overlay.len(), 2);
    let bs = overlay.get("bs").unwrap();
    assert!((bs.center.x - 691.0).abs() < 1e-9);
    assert!((bs.center.y - 365.0).abs() < 1e-9);
    assert_eq!(bs.radius, 24.0);
}

#[test]
fn unresolvable_entities_are_skipped() {
    let mut overlay = HitTargetOverlay::new();
    overlay.rebuild(&scene(), &[rule("ghost", 24.0), rule("tt", 18.0)]);

    assert!(overlay.get("ghost").is_none());
    assert_eq!(overlay.len(), 1);
}

#[test]
fn hit_test_uses_radius() {
    let mut overlay = HitTargetOverlay::new();
    overlay.rebuild(&scene(), &[rule("bs", 24.0)]);

    // Well outside the native 2x2 box, inside the ring.
    assert_eq!(overlay.hit_test(Point::new(711.0, 365.0)), Some("bs"));
    assert_eq!(overlay.hit_test(Point::new(716.0, 365.0)), None);
}

#[test]
fn overlapping_rings_pick_the_nearest_center() {
    let mut b = SceneBuilder::new(
        Canvas::new(1000, 600).unwrap(),
        Rect::new(0.0, 0.0, 1000.0, 600.0),
    );
    b.path(rect_path(99.0, 99.0, 101.0, 101.0), Some("near"));
    b.path(rect_path(119.0, 99.0, 121.0, 101.0), Some("far"));
    let scene = b.finish();

    let mut overlay = HitTargetOverlay::new();
    overlay.rebuild(&scene, &[rule("near", 20.0), rule("far", 20.0)]);

    assert_eq!(overlay.hit_test(Point::new(105.0, 100.0)), Some("near"));
    assert_eq!(overlay.hit_test(Point::new(115.0, 100.0)), Some("far"));
}

#[test]
fn rebuild_discards_stale_targets() {
    let mut overlay = HitTargetOverlay::new();
    overlay.rebuild(&scene(), &[rule("bs", 24.0)]);
    assert!(!overlay.is_empty());

    overlay.rebuild(&scene(), &[]);
    assert!(overlay.is_empty());
    assert_eq!(overlay.hit_test(Point::new(691.0, 365.0)), None);
}
