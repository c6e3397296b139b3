use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        GeoquizError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(GeoquizError::asset("x").to_string().contains("asset error:"));
    assert!(
        GeoquizError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = GeoquizError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
