use std::sync::Arc;

use super::*;

use crate::comparison::{ComparisonController, ContainerBounds};
use crate::dispatch::MakeupStudio;
use crate::entitlements::FeatureManager;
use crate::face::detector::StaticDetector;
use crate::face::reference::reference_face;
use crate::makeup::sprites::{MemorySpriteLoader, SpriteCache};
use crate::render::profile::EngineProfile;

fn studio() -> MakeupStudio {
    let loader = Arc::new(MemorySpriteLoader::builtin().unwrap());
    MakeupStudio::new(EngineProfile::default(), SpriteCache::blocking(loader)).with_seed(9)
}

fn gray(w: u32, h: u32) -> Pixmap {
    Pixmap::from_straight(w, h, [128, 128, 128, 255].repeat((w * h) as usize)).unwrap()
}

fn is_gray(px: [u8; 4]) -> bool {
    px[3] == 255 && px[..3].iter().all(|c| c.abs_diff(128) <= 1)
}

const RED: HexColor = HexColor::rgb(0xFF, 0x00, 0x00);

#[test]
fn letterbox_preserves_aspect_ratio() {
    assert_eq!(letterbox(200, 100, 100, 100), Rect::new(0.0, 25.0, 100.0, 75.0));
    assert_eq!(letterbox(100, 200, 200, 100), Rect::new(75.0, 0.0, 125.0, 100.0));
    assert_eq!(letterbox(50, 50, 200, 200), Rect::new(0.0, 0.0, 200.0, 200.0));
    assert_eq!(letterbox(0, 10, 100, 100), Rect::ZERO);
}

#[test]
fn image_without_face_is_reported_and_left_bare() {
    let mut studio = studio();
    let features = FeatureManager::default();
    let mut cx = RenderContext {
        studio: &mut studio,
        features: &features,
        comparison: None,
    };
    let mut mgr = ImageModeManager::new(Canvas::new(1, 1).unwrap(), 200, 200).unwrap();
    assert!(mgr.update_makeup(MakeupType::Lips, RED, None, None, &mut cx));

    let mut detector = StaticDetector::no_face();
    assert!(!mgr.load_image(gray(200, 200), &mut detector, &mut cx));
    assert!(!mgr.has_face());
    assert!(mgr.landmarks().is_none());
    assert!(!mgr.is_processing());
    assert_eq!(detector.calls(), 1);
    assert!(is_gray(mgr.canvas().pixmap().pixel_straight(100, 132)));
    assert!(!mgr.compose(&mut cx));
}

#[test]
fn detected_face_gets_the_current_selection() {
    let mut studio = studio();
    let features = FeatureManager::default();
    let mut cx = RenderContext {
        studio: &mut studio,
        features: &features,
        comparison: None,
    };
    let mut mgr = ImageModeManager::new(Canvas::new(1, 1).unwrap(), 200, 200).unwrap();
    let mut detector = StaticDetector::new(reference_face());
    assert!(mgr.load_image(gray(200, 200), &mut detector, &mut cx));
    assert!(mgr.has_face());
    // No selection yet: bare image.
    assert!(is_gray(mgr.canvas().pixmap().pixel_straight(100, 132)));

    assert!(mgr.update_makeup(MakeupType::Lips, RED, Some("normal"), Some(0.9), &mut cx));
    let [r, g, _, _] = mgr.canvas().pixmap().pixel_straight(100, 132);
    assert!(r > g.saturating_add(40), "r={r} g={g}");
    assert!(is_gray(mgr.canvas().pixmap().pixel_straight(5, 5)));
}

#[test]
fn updates_are_ignored_while_loading() {
    let mut studio = studio();
    let features = FeatureManager::default();
    let mut cx = RenderContext {
        studio: &mut studio,
        features: &features,
        comparison: None,
    };
    let mut mgr = ImageModeManager::new(Canvas::new(1, 1).unwrap(), 64, 64).unwrap();
    mgr.begin_load();
    assert!(mgr.is_processing());
    assert!(!mgr.update_makeup(MakeupType::Blush, RED, None, None, &mut cx));
    assert_eq!(mgr.selection(), None);
    assert_ne!(cx.studio.style(MakeupType::Blush).color, RED);
}

#[test]
fn omitted_pattern_and_transparency_keep_previous_values() {
    let mut studio = studio();
    let features = FeatureManager::default();
    let mut cx = RenderContext {
        studio: &mut studio,
        features: &features,
        comparison: None,
    };
    let mut mgr = ImageModeManager::new(Canvas::new(1, 1).unwrap(), 64, 64).unwrap();
    mgr.update_makeup(MakeupType::Lips, RED, Some("matte"), Some(0.4), &mut cx);
    mgr.update_makeup(MakeupType::Lips, HexColor::rgb(1, 2, 3), None, None, &mut cx);
    let style = cx.studio.style(MakeupType::Lips);
    assert_eq!(style.pattern, "matte");
    assert!((style.intensity - 0.4).abs() < 1e-9);
    assert_eq!(style.color, HexColor::rgb(1, 2, 3));

    mgr.update_makeup(MakeupType::Lips, RED, None, Some(0.0), &mut cx);
    assert_eq!(cx.studio.style(MakeupType::Lips).intensity, 0.0);
}

#[test]
fn split_view_limits_makeup_to_the_left_part() {
    let mut studio = studio();
    let features = FeatureManager::default();
    let mut split = ComparisonController::new(ContainerBounds {
        left: 0.0,
        width: 200.0,
    });
    split.enable();
    let mut cx = RenderContext {
        studio: &mut studio,
        features: &features,
        comparison: Some(&split),
    };
    let mut mgr = ImageModeManager::new(Canvas::new(1, 1).unwrap(), 200, 200).unwrap();
    mgr.load_image(gray(200, 200), &mut StaticDetector::new(reference_face()), &mut cx);
    mgr.update_makeup(MakeupType::Foundation, RED, None, Some(0.5), &mut cx);
    let out = mgr.canvas().pixmap();
    assert!(is_gray(out.pixel_straight(130, 120)));
    assert!(!is_gray(out.pixel_straight(70, 120)));
}

#[test]
fn loop_reset_and_destroy() {
    let mut studio = studio();
    let features = FeatureManager::default();
    let mut cx = RenderContext {
        studio: &mut studio,
        features: &features,
        comparison: None,
    };
    let mut mgr = ImageModeManager::new(Canvas::new(1, 1).unwrap(), 200, 200).unwrap();
    mgr.load_image(gray(200, 200), &mut StaticDetector::new(reference_face()), &mut cx);
    mgr.update_makeup(MakeupType::Lips, RED, None, None, &mut cx);
    assert!(mgr.is_looping());
    assert!(mgr.tick(&mut cx));

    mgr.reset_image();
    assert_eq!(mgr.selection(), None);
    assert!(is_gray(mgr.canvas().pixmap().pixel_straight(100, 132)));

    let png = mgr.png_bytes().unwrap();
    assert_eq!(&png[..4], b"\x89PNG");

    mgr.stop_render_loop();
    assert!(!mgr.tick(&mut cx));
    mgr.start_render_loop();
    mgr.destroy();
    assert!(!mgr.is_looping());
    assert!(!mgr.has_image() && !mgr.has_face());
    assert!(mgr.canvas().pixmap().is_blank());
    assert!(!mgr.tick(&mut cx));
}

#[test]
fn empty_image_is_rejected_without_panicking() {
    let mut studio = studio();
    let features = FeatureManager::default();
    let mut cx = RenderContext {
        studio: &mut studio,
        features: &features,
        comparison: None,
    };
    let mut mgr = ImageModeManager::new(Canvas::new(1, 1).unwrap(), 32, 32).unwrap();
    let mut detector = StaticDetector::new(reference_face());
    assert!(!mgr.load_image(Pixmap::new(0, 0).unwrap(), &mut detector, &mut cx));
    assert_eq!(detector.calls(), 0);
    assert!(!mgr.is_processing());
}
