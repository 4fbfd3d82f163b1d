use woh_core::errors::{ErrorInfo, WohError};
use woh_core::provenance::{ArtefactProvenance, SchemaVersion};

#[test]
fn error_round_trip_json() {
    let err = WohError::Algebra(
        ErrorInfo::new("shape-mismatch", "cannot compose 3x4 with 5x2").with_context("left", "3x4"),
    );
    let json = serde_json::to_string(&err).expect("serialize");
    assert!(json.contains("\"family\":\"Algebra\""));
    let decoded: WohError = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(decoded, err);
}

#[test]
fn provenance_round_trip_json() {
    let provenance = ArtefactProvenance::new("abc123", "woh-complex 0.1.0");
    let json = serde_json::to_string_pretty(&provenance).expect("serialize");
    let decoded: ArtefactProvenance = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(decoded, provenance);
    assert_eq!(decoded.schema_version, SchemaVersion::default());
}

#[test]
fn schema_compatibility() {
    let current = SchemaVersion::new(1, 2, 0);
    assert!(current.is_compatible_with(&SchemaVersion::new(1, 0, 3)));
    assert!(!current.is_compatible_with(&SchemaVersion::new(2, 0, 0)));
    assert!(!current.is_compatible_with(&SchemaVersion::new(1, 3, 0)));
}
