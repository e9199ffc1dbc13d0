use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        CloudError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        CloudError::layout("x")
            .to_string()
            .contains("layout error:")
    );
    assert!(
        CloudError::render("x")
            .to_string()
            .contains("render error:")
    );
    assert!(
        CloudError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = CloudError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
