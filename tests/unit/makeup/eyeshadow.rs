use super::*;

use kurbo::Shape;

use crate::face::reference::reference_face;

fn diamond() -> Vec<Point> {
    vec![
        Point::new(10.0, 20.0),
        Point::new(20.0, 15.0),
        Point::new(30.0, 20.0),
        Point::new(20.0, 25.0),
    ]
}

#[test]
fn gradient_is_anchored_on_the_unlifted_contour() {
    let shape = LidShape::new(&diamond());
    assert_eq!(shape.center, Point::new(20.0, 20.0));
    assert!((shape.radius - 12.0).abs() < 1e-9);
}

#[test]
fn only_the_outline_is_lifted() {
    let shape = LidShape::new(&diamond());
    let bounds = shape.path.bounding_box();
    assert_eq!(bounds.y0, 15.0 - LIFT_PX);
    assert_eq!(bounds.y1, 25.0 - LIFT_PX);
    assert_eq!((bounds.x0, bounds.x1), (10.0, 30.0));
}

#[test]
fn reference_lid_gradient_uses_landmark_centroid() {
    let face = reference_face();
    let points = face.px_many(&LEFT_EYE, 400.0, 398.0).unwrap();
    let shape = LidShape::new(&points);
    assert_eq!(shape.center, centroid(&points));
    let lifted = LidShape::new(
        &points
            .iter()
            .map(|&p| p - Vec2::new(0.0, LIFT_PX))
            .collect::<Vec<_>>(),
    );
    assert!((shape.center.y - lifted.center.y - LIFT_PX).abs() < 1e-9);
}
