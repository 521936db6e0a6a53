use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        MakeoverError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        MakeoverError::landmarks("x")
            .to_string()
            .contains("landmark error:")
    );
    assert!(MakeoverError::asset("x").to_string().contains("asset error:"));
    assert!(
        MakeoverError::render("x")
            .to_string()
            .contains("render error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = MakeoverError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
