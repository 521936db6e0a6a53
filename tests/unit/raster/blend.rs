use super::*;

fn close(a: [f32; 4], b: [f32; 4]) -> bool {
    a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < 1e-4)
}

const RED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
const GRAY: [f32; 4] = [0.5, 0.5, 0.5, 1.0];
const CLEAR: [f32; 4] = [0.0; 4];

#[test]
fn names_round_trip() {
    for op in CompositeOp::ALL {
        assert_eq!(op.name().parse::<CompositeOp>().unwrap(), op);
    }
    assert!("hard-mix".parse::<CompositeOp>().is_err());
}

#[test]
fn source_over_opaque_replaces() {
    assert!(close(CompositeOp::SourceOver.apply(RED, GRAY), RED));
}

#[test]
fn blend_modes_over_transparent_act_like_source_over() {
    let half_red = [0.5, 0.0, 0.0, 0.5];
    for op in [
        CompositeOp::Multiply,
        CompositeOp::Screen,
        CompositeOp::Overlay,
        CompositeOp::SoftLight,
        CompositeOp::ColorBurn,
        CompositeOp::Color,
    ] {
        assert!(close(op.apply(half_red, CLEAR), half_red), "{op}");
    }
}

#[test]
fn multiply_and_screen_on_gray() {
    let out = CompositeOp::Multiply.apply(GRAY, GRAY);
    assert!(close(out, [0.25, 0.25, 0.25, 1.0]));
    let out = CompositeOp::Screen.apply(GRAY, GRAY);
    assert!(close(out, [0.75, 0.75, 0.75, 1.0]));
}

#[test]
fn soft_light_neutral_gray_is_identity() {
    let dst = [0.3, 0.6, 0.9, 1.0];
    assert!(close(CompositeOp::SoftLight.apply(GRAY, dst), dst));
}

#[test]
fn overlay_neutral_gray_is_identity() {
    let dst = [0.2, 0.4, 0.8, 1.0];
    assert!(close(CompositeOp::Overlay.apply(GRAY, dst), dst));
}

#[test]
fn destination_out_and_source_in() {
    let half = [0.0, 0.0, 0.0, 0.5];
    assert!(close(
        CompositeOp::DestinationOut.apply(half, RED),
        [0.5, 0.0, 0.0, 0.5]
    ));
    assert!(close(CompositeOp::SourceIn.apply(RED, half), [0.5, 0.0, 0.0, 0.5]));
    assert!(close(CompositeOp::SourceIn.apply(CLEAR, RED), CLEAR));
    assert!(CompositeOp::SourceIn.is_unbounded());
    assert!(!CompositeOp::SourceOver.is_unbounded());
}

#[test]
fn lighter_saturates() {
    assert!(close(CompositeOp::Lighter.apply(GRAY, GRAY), [1.0, 1.0, 1.0, 1.0]));
}

#[test]
fn color_burn_darkens() {
    let out = CompositeOp::ColorBurn.apply(GRAY, [0.8, 0.8, 0.8, 1.0]);
    assert!(out[0] < 0.8);
}

#[test]
fn color_keeps_backdrop_luminosity() {
    let out = CompositeOp::Color.apply(RED, GRAY);
    let l = 0.3 * out[0] + 0.59 * out[1] + 0.11 * out[2];
    assert!((l - 0.5).abs() < 1e-3);
    assert!(out[0] > out[1]);
}
