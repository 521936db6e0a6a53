use super::*;

use crate::entitlements::EntitlementPayload;
use crate::face::reference::reference_face;
use crate::makeup::sprites::MemorySpriteLoader;

fn studio() -> MakeupStudio {
    let loader = Arc::new(MemorySpriteLoader::builtin().unwrap());
    MakeupStudio::new(EngineProfile::default(), SpriteCache::blocking(loader)).with_seed(5)
}

#[test]
fn disabled_type_leaves_surface_untouched() {
    let mut s = studio();
    let mut canvas = Canvas::new(128, 128).unwrap();
    let before = canvas.snapshot();
    s.apply_makeup(
        &reference_face(),
        &mut canvas,
        MakeupType::Lens,
        &FeatureManager::default(),
    );
    assert_eq!(canvas.pixmap(), &before);
}

#[test]
fn enabled_type_draws() {
    let mut s = studio();
    let mut canvas = Canvas::new(128, 128).unwrap();
    s.apply_makeup(
        &reference_face(),
        &mut canvas,
        MakeupType::Blush,
        &FeatureManager::default(),
    );
    assert!(!canvas.pixmap().is_blank());
}

#[test]
fn color_round_trips_into_emitted_paint() {
    let mut s = studio();
    assert!(s.set_color_named("eyeshadow", "#AABBCC"));
    let mut canvas = Canvas::new(160, 160).unwrap();
    canvas.enable_trace();
    s.apply_makeup(
        &reference_face(),
        &mut canvas,
        MakeupType::Eyeshadow,
        &FeatureManager::default(),
    );
    let trace = canvas.take_trace();
    assert!(!trace.is_empty());
    assert!(trace.iter().all(|r| r.paint.contains("rgba(170, 187, 204")));
}

#[test]
fn unknown_names_are_no_ops() {
    let mut s = studio();
    let before = s.styles().clone();
    assert!(!s.set_color_named("mascara", "#000000"));
    assert!(!s.set_pattern_named("mascara", "normal"));
    assert!(!s.set_transparency_named("mascara", 0.5));
    assert!(!s.set_color_named("lips", "red"));
    assert_eq!(s.style(MakeupType::Lips), before.get(MakeupType::Lips));
}

#[test]
fn rejected_sprite_style_triggers_no_load() {
    let mut s = studio();
    assert!(!s.set_pattern(MakeupType::Eyeliner, "bold"));
    assert_eq!(s.style(MakeupType::Eyeliner).pattern, "normal");
    assert_eq!(s.sprites().loads_started(), 0);

    assert!(s.set_pattern(MakeupType::Eyeliner, "lashed"));
    assert_eq!(s.sprites().loads_started(), 1);
    assert!(s.sprites().is_ready(MakeupType::Eyeliner, "lashed"));
}

#[test]
fn transparency_remap_goes_through_the_facade() {
    let mut s = studio();
    assert!(s.set_transparency_named("eyepencil", 0.5));
    assert_eq!(s.style(MakeupType::Eyepencil).intensity, 2.5);
    assert!(s.set_transparency(MakeupType::Concealer, 0.9));
    assert_eq!(s.style(MakeupType::Concealer).intensity, 0.5);
}

#[test]
fn brow_thickness_goes_through_the_facade() {
    let mut s = studio();
    assert!(s.set_thickness_named("brows", 0.05));
    assert_eq!(s.style(MakeupType::Brows).thickness, 0.1);
    assert!(s.set_thickness(MakeupType::Brows, 0.6));
    assert_eq!(s.style(MakeupType::Brows).thickness, 0.6);
    assert!(!s.set_thickness_named("eyeliner", 0.6));
    assert!(!s.set_thickness_named("mascara", 0.6));
}

#[test]
fn payload_can_enable_lens() {
    let payload = EntitlementPayload {
        allowed_features: Some(vec!["lens".to_string()]),
        allowed_patterns: None,
    };
    let features = FeatureManager::new(Some(payload));
    let mut s = studio();
    let mut canvas = Canvas::new(256, 256).unwrap();
    s.apply_makeup(&reference_face(), &mut canvas, MakeupType::Lens, &features);
    assert!(!canvas.pixmap().is_blank());
}
