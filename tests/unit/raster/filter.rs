use super::*;

#[test]
fn blur_radius_0_is_identity() {
    let src = vec![1u8, 2, 3, 4, 5, 6, 7, 8];
    let out = blur_rgba8_premul(&src, 1, 2, 0, 1.0).unwrap();
    assert_eq!(out, src);
}

#[test]
fn blur_spreads_energy_from_single_pixel() {
    let (w, h) = (9u32, 9u32);
    let mut src = vec![0u8; (w * h * 4) as usize];
    let center = ((4 * w + 4) * 4) as usize;
    src[center..center + 4].copy_from_slice(&[255, 255, 255, 255]);

    let out = blur_rgba8_premul(&src, w, h, 3, 1.0).unwrap();
    let nonzero = out.chunks_exact(4).filter(|px| px[3] != 0).count();
    assert!(nonzero > 1);
    let sum_a: u32 = out.chunks_exact(4).map(|px| u32::from(px[3])).sum();
    assert!((sum_a as i32 - 255).abs() <= 8);
}

#[test]
fn blur_rejects_bad_input() {
    assert!(blur_rgba8_premul(&[0u8; 3], 1, 1, 1, 1.0).is_err());
    assert!(blur_rgba8_premul(&[0u8; 4], 1, 1, 1, 0.0).is_err());
}

#[test]
fn radius_covers_three_sigma() {
    assert_eq!(blur_radius(4.2), 13);
    assert_eq!(blur_radius(0.0), 0);
    assert_eq!(blur_radius(f32::NAN), 0);
}

#[test]
fn brightness_then_contrast() {
    let f = Filter::brightness_contrast(1.04, 1.04);
    let out = f.apply_color([0.5, 0.5, 0.5, 1.0]);
    let expected = (0.5 * 1.04 - 0.5) * 1.04 + 0.5;
    assert!((out[0] - expected).abs() < 1e-5);
    assert_eq!(f.to_string(), "brightness(1.04) contrast(1.04)");
}

#[test]
fn color_ops_keep_alpha_and_premultiplication() {
    let f = Filter::brightness_contrast(2.0, 1.0);
    let out = f.apply_color([0.2, 0.1, 0.0, 0.5]);
    assert!((out[0] - 0.4).abs() < 1e-5);
    assert!((out[1] - 0.2).abs() < 1e-5);
    assert_eq!(out[3], 0.5);
}

#[test]
fn blur_only_filters_leave_color_alone() {
    let f = Filter::blur(3.0);
    assert!(!f.has_color_ops());
    assert_eq!(f.apply_color([0.2, 0.3, 0.4, 1.0]), [0.2, 0.3, 0.4, 1.0]);
    assert!((f.blur_sigma() - 3.0).abs() < 1e-6);
    assert_eq!(Filter::none().blur_sigma(), 0.0);
    assert_eq!(Filter::none().to_string(), "none");
}
