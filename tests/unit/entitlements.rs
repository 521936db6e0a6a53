use super::*;

#[test]
fn defaults_enable_everything_but_lens() {
    let fm = FeatureManager::default();
    for kind in MakeupType::ALL {
        assert_eq!(fm.is_enabled(kind), kind != MakeupType::Lens, "{kind}");
    }
    assert_eq!(fm.enabled_features().len(), 9);
    assert!(fm.allowed_patterns(MakeupType::Lens).is_empty());
    assert_eq!(
        fm.allowed_patterns(MakeupType::Lips),
        ["normal", "matte", "glossy", "glitter"]
    );
}

#[test]
fn payload_overrides_features_and_falls_back_per_pattern_key() {
    let payload = EntitlementPayload::from_json(
        r#"{"allowedFeatures": ["lips", "lens", "glitter-bomb"],
            "allowedPatterns": {"lens": ["rainbow"]}}"#,
    )
    .unwrap();
    let fm = FeatureManager::new(Some(payload));
    assert!(fm.is_enabled(MakeupType::Lens));
    assert!(!fm.is_enabled(MakeupType::Blush));
    assert!(!fm.is_enabled_name("glitter-bomb"));
    assert_eq!(
        fm.enabled_features(),
        vec![MakeupType::Lips, MakeupType::Lens]
    );
    assert_eq!(fm.allowed_patterns(MakeupType::Lens), ["rainbow"]);
    assert_eq!(fm.allowed_patterns(MakeupType::Eyeliner), ["normal", "lashed"]);
}

#[test]
fn payload_without_features_uses_default_list() {
    let payload = EntitlementPayload::from_json(r#"{"allowedPatterns": {}}"#).unwrap();
    let fm = FeatureManager::new(Some(payload));
    assert!(fm.is_enabled(MakeupType::Brows));
    assert!(!fm.is_enabled(MakeupType::Lens));
}

#[test]
fn malformed_payload_is_a_validation_error() {
    let err = EntitlementPayload::from_json("{\"allowedFeatures\": 3}").unwrap_err();
    assert!(matches!(err, MakeoverError::Validation(_)));
}
