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
    MakeupStudio::new(EngineProfile::default(), SpriteCache::blocking(loader)).with_seed(3)
}

fn solid_frame(w: u32, h: u32, v: u8) -> Pixmap {
    let data = [v, v, v, 255].repeat((w * h) as usize);
    Pixmap::from_straight(w, h, data).unwrap()
}

fn close(a: [u8; 4], b: [u8; 4]) -> bool {
    a.iter().zip(b).all(|(x, y)| x.abs_diff(y) <= 1)
}

#[test]
fn render_without_face_only_clears() {
    let mut studio = studio();
    let features = FeatureManager::default();
    let mut cx = RenderContext {
        studio: &mut studio,
        features: &features,
        comparison: None,
    };
    let mut rm = RenderManager::new(Canvas::new(8, 8).unwrap());
    let frame = solid_frame(64, 48, 128);
    assert!(rm.render(&frame, None, MakeupType::Lips, &mut cx));
    assert_eq!((rm.canvas().width(), rm.canvas().height()), (64, 48));
    assert!(rm.canvas().pixmap().is_blank());
}

#[test]
fn render_with_face_filters_and_applies_makeup() {
    let mut studio = studio();
    let features = FeatureManager::default();
    let mut cx = RenderContext {
        studio: &mut studio,
        features: &features,
        comparison: None,
    };
    let mut rm = RenderManager::new(Canvas::new(1, 1).unwrap());
    let frame = solid_frame(200, 200, 128);
    assert!(rm.render(&frame, Some(&reference_face()), MakeupType::Lips, &mut cx));
    let out = rm.canvas().pixmap();
    // Lips center on the reference face.
    let lips = out.pixel_straight(100, 132);
    assert!(lips[0] > lips[2], "lips should be tinted red: {lips:?}");
    // Base frame brightened by the engine filter.
    let corner = out.pixel_straight(2, 2);
    assert!(corner[3] == 255 && corner[1] != 128);
}

#[test]
fn comparison_keeps_the_right_side_untouched() {
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
    let mut rm = RenderManager::new(Canvas::new(1, 1).unwrap());
    let frame = solid_frame(200, 200, 128);
    assert!(rm.render(&frame, Some(&reference_face()), MakeupType::Blush, &mut cx));
    let out = rm.canvas().pixmap();
    for (x, y) in [(150, 100), (190, 10), (120, 180)] {
        assert!(close(out.pixel_straight(x, y), frame.pixel_straight(x, y)));
    }
    assert_ne!(out.pixel_straight(40, 100), frame.pixel_straight(40, 100));
}

#[test]
fn inactive_comparison_renders_the_full_frame() {
    let mut studio = studio();
    let features = FeatureManager::default();
    let split = ComparisonController::default();
    let mut cx = RenderContext {
        studio: &mut studio,
        features: &features,
        comparison: Some(&split),
    };
    assert!(!cx.comparing());
    let mut rm = RenderManager::new(Canvas::new(1, 1).unwrap());
    let frame = solid_frame(100, 100, 128);
    assert!(rm.render(&frame, Some(&reference_face()), MakeupType::Foundation, &mut cx));
    assert_ne!(rm.canvas().pixmap().pixel_straight(90, 50), frame.pixel_straight(90, 50));
}

#[test]
fn pipeline_passes_frame_through_without_face() {
    let mut studio = studio();
    let features = FeatureManager::default();
    let mut cx = RenderContext {
        studio: &mut studio,
        features: &features,
        comparison: None,
    };
    let mut pipeline = CameraPipeline::new(
        Box::new(StaticDetector::no_face()),
        Canvas::new(1, 1).unwrap(),
    );
    let frame = solid_frame(40, 30, 200);
    let outcome = pipeline.process(&frame, MakeupType::Lips, 0.0, &mut cx);
    assert!(!outcome.face_detected);
    assert!(outcome.rendered);
    assert!(!pipeline.face_visible());
    assert!(close(pipeline.canvas().pixmap().pixel_straight(20, 15), [200, 200, 200, 255]));
}

#[test]
fn pipeline_renders_detected_face() {
    let mut studio = studio();
    let features = FeatureManager::default();
    let mut cx = RenderContext {
        studio: &mut studio,
        features: &features,
        comparison: None,
    };
    let mut pipeline = CameraPipeline::new(
        Box::new(StaticDetector::new(reference_face())),
        Canvas::new(1, 1).unwrap(),
    );
    let frame = solid_frame(200, 200, 128);
    let outcome = pipeline.process(&frame, MakeupType::Lips, 16.0, &mut cx);
    assert!(outcome.face_detected && outcome.rendered);
    assert_eq!(outcome.light, None);
    let canvas = pipeline.shutdown();
    assert_eq!((canvas.width(), canvas.height()), (200, 200));
}

#[test]
fn pipeline_raises_low_light_after_consecutive_dark_samples() {
    let mut studio = studio();
    let features = FeatureManager::default();
    let mut cx = RenderContext {
        studio: &mut studio,
        features: &features,
        comparison: None,
    };
    let mut pipeline = CameraPipeline::new(
        Box::new(StaticDetector::no_face()),
        Canvas::new(1, 1).unwrap(),
    );
    let dark = solid_frame(120, 120, 20);
    let events: Vec<_> = [0.0, 1500.0, 2000.0, 2500.0]
        .into_iter()
        .map(|t| pipeline.process(&dark, MakeupType::Lips, t, &mut cx).light)
        .collect();
    assert_eq!(events, [None, None, None, Some(LightEvent::WarningRaised)]);
    assert!(pipeline.light().is_warning());
}
