use super::*;

use std::sync::Arc;

use crate::face::landmarks::Landmark;
use crate::face::reference::reference_face;
use crate::makeup::sprites::{MemorySpriteLoader, SpriteCache};

fn paint(pattern: &str, seed: u64) -> MakeoverResult<Canvas> {
    let profile = EngineProfile::default();
    let mut style = Lens.default_style(&profile);
    style.pattern = pattern.to_string();
    let mut sprites = SpriteCache::blocking(Arc::new(MemorySpriteLoader::new()));
    let mut cx = LayerContext {
        sprites: &mut sprites,
        profile: &profile,
        clock_ms: 0.0,
        rng: FrameRng::new(seed),
    };
    let mut canvas = Canvas::new(400, 400)?;
    Lens.apply(&style, &reference_face(), &mut canvas, &mut cx)?;
    Ok(canvas)
}

#[test]
fn every_pattern_has_a_texture() {
    for name in PATTERNS {
        assert!(IrisTexture::for_pattern(name).is_some(), "{name}");
    }
    assert!(IrisTexture::for_pattern("natural").is_none());
}

#[test]
fn lens_stays_inside_the_iris() {
    let canvas = paint("crystal-colors", 3).unwrap();
    // One iris sits at (0.39, 0.43) with a radius of 0.011 surface widths.
    let (cx, cy) = (0.39 * 400.0, 0.43 * 400.0);
    assert_ne!(canvas.pixmap().pixel(cx as u32 + 2, cy as u32)[3], 0);
    assert_eq!(canvas.pixmap().pixel(cx as u32 + 12, cy as u32), [0, 0, 0, 0]);
    assert_eq!(canvas.pixmap().pixel(200, 200), [0, 0, 0, 0]);
}

#[test]
fn same_seed_same_lens() {
    let a = paint("rainbow", 9).unwrap();
    let b = paint("rainbow", 9).unwrap();
    assert_eq!(a.pixmap(), b.pixmap());
}

#[test]
fn unknown_pattern_falls_back_to_flat_tint() {
    assert!(!paint("natural", 1).unwrap().pixmap().is_blank());
}

#[test]
fn face_without_iris_points_is_an_error() {
    let face = LandmarkSet::new(vec![Landmark::new(0.5, 0.5); 468]).unwrap();
    let profile = EngineProfile::default();
    let mut sprites = SpriteCache::blocking(Arc::new(MemorySpriteLoader::new()));
    let mut cx = LayerContext {
        sprites: &mut sprites,
        profile: &profile,
        clock_ms: 0.0,
        rng: FrameRng::new(0),
    };
    let mut canvas = Canvas::new(64, 64).unwrap();
    let style = Lens.default_style(&profile);
    assert!(Lens.apply(&style, &face, &mut canvas, &mut cx).is_err());
}
