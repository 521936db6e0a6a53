//! Shared geometric layout helpers over pixel-space landmark points.

use kurbo::{BezPath, Point};

/// Arithmetic mean of `points`; the origin for an empty slice.
pub fn centroid(points: &[Point]) -> Point {
    if points.is_empty() {
        return Point::ZERO;
    }
    let n = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Point::new(sx / n, sy / n)
}

/// Largest distance from `center` to any point.
pub fn max_radius(points: &[Point], center: Point) -> f64 {
    points
        .iter()
        .map(|p| p.distance(center))
        .fold(0.0, f64::max)
}

/// Straight-segment path through `points`, optionally closed.
pub fn polyline_path(points: &[Point], close: bool) -> BezPath {
    let mut path = BezPath::new();
    let mut iter = points.iter();
    if let Some(first) = iter.next() {
        path.move_to(*first);
        for p in iter {
            path.line_to(*p);
        }
        if close {
            path.close_path();
        }
    }
    path
}

/// Quadratic spline through midpoints with a tension that shrinks near the centroid.
///
/// The control point is pushed along the incoming direction by
/// `min(0.15, distance_from_center / (surface_width * 0.12))`, which keeps the
/// under-eye contours soft without overshooting at the inner corners.
pub fn tensioned_spline(points: &[Point], surface_width: f64) -> BezPath {
    let mut path = BezPath::new();
    if points.len() < 3 {
        return polyline_path(points, false);
    }
    let center = centroid(points);
    let denom = (surface_width * 0.12).max(f64::EPSILON);

    path.move_to(points[0]);
    for i in 1..points.len() - 2 {
        let mid = points[i].midpoint(points[i + 1]);
        let tension = (center.distance(points[i]) / denom).min(0.15);
        let cp = points[i] + (mid - points[i - 1]) * tension;
        path.quad_to(cp, mid);
    }
    let last = points.len() - 1;
    path.quad_to(points[last - 1], points[last]);
    path
}

/// Cubic chain that visits every interior point via neighbour midpoints, as used for
/// the forehead arc: each segment runs from one midpoint to the next with the point
/// itself as the shared control.
pub fn midpoint_cubic_chain(path: &mut BezPath, points: &[Point]) {
    for i in 1..points.len().saturating_sub(1) {
        let m1 = points[i - 1].midpoint(points[i]);
        let m2 = points[i].midpoint(points[i + 1]);
        path.curve_to(m1, points[i], m2);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/face/geometry.rs"]
mod tests;
