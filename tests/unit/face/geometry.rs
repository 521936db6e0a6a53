use kurbo::{PathEl, Shape};

use super::*;

fn square() -> Vec<Point> {
    vec![
        Point::new(0.0, 0.0),
        Point::new(10.0, 0.0),
        Point::new(10.0, 10.0),
        Point::new(0.0, 10.0),
    ]
}

#[test]
fn centroid_and_radius() {
    let pts = square();
    let c = centroid(&pts);
    assert_eq!(c, Point::new(5.0, 5.0));
    assert!((max_radius(&pts, c) - 50f64.sqrt()).abs() < 1e-9);
    assert_eq!(centroid(&[]), Point::ZERO);
    assert_eq!(max_radius(&[], Point::ZERO), 0.0);
}

#[test]
fn polyline_closes_on_request() {
    let open = polyline_path(&square(), false);
    let closed = polyline_path(&square(), true);
    assert_eq!(open.elements().len(), 4);
    assert_eq!(closed.elements().last(), Some(&PathEl::ClosePath));
    assert!(polyline_path(&[], true).elements().is_empty());
}

#[test]
fn spline_starts_and_ends_on_the_points() {
    let pts: Vec<Point> = (0..8)
        .map(|i| {
            let a = i as f64 / 8.0 * std::f64::consts::TAU;
            Point::new(50.0 + 20.0 * a.cos(), 50.0 + 10.0 * a.sin())
        })
        .collect();
    let path = tensioned_spline(&pts, 200.0);
    let els = path.elements();
    assert_eq!(els.first(), Some(&PathEl::MoveTo(pts[0])));
    match els.last() {
        Some(PathEl::QuadTo(c, p)) => {
            assert_eq!(*c, pts[6]);
            assert_eq!(*p, pts[7]);
        }
        other => panic!("unexpected tail {other:?}"),
    }
    assert_eq!(els.len(), 1 + (pts.len() - 3) + 1);
    assert!(path.area().abs() > 100.0);
}

#[test]
fn short_inputs_fall_back_to_lines() {
    let two = [Point::new(0.0, 0.0), Point::new(5.0, 5.0)];
    assert_eq!(tensioned_spline(&two, 100.0).elements().len(), 2);
}

#[test]
fn midpoint_chain_emits_one_cubic_per_interior_point() {
    let mut path = BezPath::new();
    path.move_to((0.0, 0.0));
    midpoint_cubic_chain(&mut path, &square());
    assert_eq!(path.elements().len(), 3);
    assert!(matches!(path.elements()[1], PathEl::CurveTo(..)));
}
