use kurbo::Rect;

use super::*;

fn total(mask: &Mask) -> f32 {
    mask.data.iter().sum()
}

fn polyline(points: &[(f64, f64)]) -> BezPath {
    let mut path = BezPath::new();
    path.move_to(points[0]);
    for &p in &points[1..] {
        path.line_to(p);
    }
    path
}

#[test]
fn axis_aligned_square_has_exact_area() {
    let path = Rect::new(2.0, 2.0, 6.0, 5.0).to_path(0.1);
    let mask = fill_mask(&path, Affine::IDENTITY, FillRule::NonZero, 10, 10).unwrap();
    assert!((total(&mask) - 12.0).abs() < 0.05);
    assert_eq!(mask.at(3, 3), 1.0);
    assert_eq!(mask.at(8, 8), 0.0);
}

#[test]
fn half_pixel_edges_get_partial_coverage() {
    let path = Rect::new(1.5, 0.0, 3.0, 1.0).to_path(0.1);
    let mask = fill_mask(&path, Affine::IDENTITY, FillRule::NonZero, 4, 1).unwrap();
    assert!((mask.at(1, 0) - 0.5).abs() < 0.02);
    assert!((mask.at(2, 0) - 1.0).abs() < 1e-4);
}

#[test]
fn evenodd_punches_holes_nonzero_does_not() {
    let mut path = Rect::new(0.0, 0.0, 10.0, 10.0).to_path(0.1);
    path.extend(Rect::new(3.0, 3.0, 7.0, 7.0).to_path(0.1));
    let eo = fill_mask(&path, Affine::IDENTITY, FillRule::EvenOdd, 10, 10).unwrap();
    let nz = fill_mask(&path, Affine::IDENTITY, FillRule::NonZero, 10, 10).unwrap();
    assert_eq!(eo.at(5, 5), 0.0);
    assert_eq!(nz.at(5, 5), 1.0);
    assert_eq!(eo.at(1, 1), 1.0);
}

#[test]
fn offscreen_or_degenerate_paths_cover_nothing() {
    let path = Rect::new(-20.0, -20.0, -10.0, -10.0).to_path(0.1);
    assert!(fill_mask(&path, Affine::IDENTITY, FillRule::NonZero, 10, 10).is_none());
    let line = polyline(&[(1.0, 1.0), (5.0, 1.0)]);
    assert!(fill_mask(&line, Affine::IDENTITY, FillRule::NonZero, 10, 10).is_none());
    assert!(fill_mask(&BezPath::new(), Affine::IDENTITY, FillRule::NonZero, 10, 10).is_none());
}

#[test]
fn non_finite_transform_covers_nothing() {
    let path = Rect::new(0.0, 0.0, 2.0, 2.0).to_path(0.1);
    let t = Affine::translate((f64::NAN, 0.0));
    assert!(fill_mask(&path, t, FillRule::NonZero, 10, 10).is_none());
}

#[test]
fn transform_places_the_mask_box() {
    let path = Rect::new(0.0, 0.0, 2.0, 2.0).to_path(0.1);
    let mask = fill_mask(&path, Affine::translate((5.0, 5.0)), FillRule::NonZero, 10, 10).unwrap();
    assert_eq!((mask.x0, mask.y0), (5, 5));
    assert_eq!(mask.at(6, 6), 1.0);
    assert_eq!(mask.at(4, 4), 0.0);
}

#[test]
fn curved_fill_covers_its_interior() {
    let mut path = BezPath::new();
    path.move_to((0.0, 0.0));
    path.quad_to((10.0, 20.0), (20.0, 0.0));
    path.close_path();
    let mask = fill_mask(&path, Affine::IDENTITY, FillRule::NonZero, 30, 30).unwrap();
    assert!(mask.at(10, 5) > 0.99);
    assert_eq!(mask.at(10, 15), 0.0);
}

#[test]
fn round_stroke_covers_segment_and_caps() {
    let line = polyline(&[(5.0, 10.0), (15.0, 10.0)]);
    let mask = stroke_mask(&line, Affine::IDENTITY, StrokeStyle::round(4.0), 30, 30).unwrap();
    assert!(mask.at(10, 10) > 0.99);
    assert!(mask.at(4, 10) > 0.5);
    assert_eq!(mask.at(10, 14), 0.0);
    let covered = total(&mask);
    let expected = 10.0 * 4.0 + std::f32::consts::PI * 4.0;
    assert!((covered - expected).abs() < 3.0, "{covered} vs {expected}");
}

#[test]
fn butt_stroke_has_no_caps() {
    let line = polyline(&[(5.0, 10.0), (15.0, 10.0)]);
    let mask = stroke_mask(&line, Affine::IDENTITY, StrokeStyle::new(2.0), 30, 30).unwrap();
    assert_eq!(mask.at(3, 10), 0.0);
    assert!((total(&mask) - 20.0).abs() < 0.1);
}

#[test]
fn butt_stroke_fills_the_outer_corner_of_a_sharp_turn() {
    // Right angle at (10, 9): pixel (10, 8) sits past the end of both segment bands,
    // so only the join covers it.
    let path = polyline(&[(2.0, 9.0), (10.0, 9.0), (10.0, 18.0)]);
    let mask = stroke_mask(&path, Affine::IDENTITY, StrokeStyle::new(2.0), 20, 20).unwrap();
    assert!(mask.at(5, 8) > 0.99);
    assert!(mask.at(10, 12) > 0.99);
    assert!(mask.at(10, 8) > 0.99, "outer corner left notched");
}

#[test]
fn stroke_width_scales_with_transform() {
    let line = polyline(&[(2.0, 5.0), (8.0, 5.0)]);
    let t = Affine::scale(2.0);
    let mask = stroke_mask(&line, t, StrokeStyle::new(2.0), 30, 30).unwrap();
    assert!(mask.at(10, 8) > 0.99);
    assert!(mask.at(10, 11) > 0.99);
    assert_eq!(mask.at(10, 13), 0.0);
}

#[test]
fn zero_width_stroke_covers_nothing() {
    let line = polyline(&[(2.0, 5.0), (8.0, 5.0)]);
    assert!(stroke_mask(&line, Affine::IDENTITY, StrokeStyle::new(0.0), 10, 10).is_none());
}
