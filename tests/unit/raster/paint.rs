use super::*;

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-3
}

#[test]
fn stops_stay_sorted_and_clamped() {
    let p = Paint::linear(Point::ZERO, Point::new(10.0, 0.0))
        .with_stop(1.0, Rgba::white(1.0))
        .with_stop(-2.0, Rgba::black(1.0))
        .with_stop(0.5, Rgba::white(0.5));
    let Paint::Linear { stops, .. } = &p else {
        panic!("expected linear");
    };
    let offsets: Vec<f64> = stops.iter().map(|s| s.offset).collect();
    assert_eq!(offsets, vec![0.0, 0.5, 1.0]);
}

#[test]
fn linear_pads_beyond_endpoints() {
    let p = Paint::linear(Point::ZERO, Point::new(10.0, 0.0))
        .with_stop(0.0, Rgba::black(1.0))
        .with_stop(1.0, Rgba::white(1.0));
    assert!(approx(p.sample(Point::new(-5.0, 0.0))[0], 0.0));
    assert!(approx(p.sample(Point::new(5.0, 3.0))[0], 0.5));
    assert!(approx(p.sample(Point::new(50.0, 0.0))[0], 1.0));
}

#[test]
fn concentric_radial_fades_with_distance() {
    let p = Paint::radial_centered(Point::new(10.0, 10.0), 0.0, 10.0)
        .with_stop(0.0, Rgba::new(255, 0, 0, 1.0))
        .with_stop(1.0, Rgba::new(255, 0, 0, 0.0));
    assert!(approx(p.sample(Point::new(10.0, 10.0))[3], 1.0));
    assert!(approx(p.sample(Point::new(15.0, 10.0))[3], 0.5));
    assert!(approx(p.sample(Point::new(40.0, 10.0))[3], 0.0));
}

#[test]
fn radial_with_inner_radius_pads_inside() {
    let p = Paint::radial_centered(Point::ZERO, 5.0, 10.0)
        .with_stop(0.0, Rgba::white(0.8))
        .with_stop(1.0, Rgba::white(0.0));
    assert!(approx(p.sample(Point::new(1.0, 0.0))[3], 0.8));
    assert!(approx(p.sample(Point::new(7.5, 0.0))[3], 0.4));
}

#[test]
fn offset_focal_radial_is_brightest_near_focus() {
    let p = Paint::radial(Point::new(0.0, -5.0), 0.0, Point::ZERO, 20.0)
        .with_stop(0.0, Rgba::white(1.0))
        .with_stop(1.0, Rgba::white(0.0));
    let near = p.sample(Point::new(0.0, -4.0))[3];
    let far = p.sample(Point::new(0.0, 15.0))[3];
    assert!(near > far);
}

#[test]
fn premultiplied_output() {
    let p = Paint::Solid(Rgba::new(200, 100, 0, 0.5));
    let s = p.sample(Point::ZERO);
    assert!(approx(s[0], 200.0 / 255.0 * 0.5));
    assert!(approx(s[3], 0.5));
}

#[test]
fn display_lists_exact_colors() {
    let p = Paint::radial_centered(Point::ZERO, 0.0, 1.0).with_stop(0.0, Rgba::new(0xAA, 0xBB, 0xCC, 0.4));
    assert!(p.to_string().contains("rgba(170, 187, 204, 0.4)"));
    assert_eq!(Paint::Solid(Rgba::black(1.0)).to_string(), "rgba(0, 0, 0, 1)");
}
