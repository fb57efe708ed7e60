use std::path::PathBuf;

use orcamate::error::OrcaMateError;
use orcamate::profile::catalog::{sized_name, split_name};
use orcamate::profile::reader::read_profile;
use orcamate::profile::types::{FilamentProfile, NozzleSize};
use orcamate::profile::writer::write_profile_atomic;
use orcamate::variant::{rewrite_size_token, IdAllocator};

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn nz(s: &str) -> NozzleSize {
    s.parse().expect("valid nozzle size")
}

#[test]
fn test_round_trip_preserves_all_fields() {
    let path = fixture_path("sample_profile.json");
    let profile = read_profile(&path).expect("Failed to read fixture");

    let original_count = profile.field_count();
    assert!(
        original_count > 15,
        "Fixture should have 15+ fields, got {}",
        original_count
    );

    let json = profile.to_json_4space().expect("Failed to serialize");
    let reparsed = FilamentProfile::from_json(&json).expect("Failed to re-parse");

    assert_eq!(original_count, reparsed.field_count());
    for key in profile.raw().keys() {
        assert_eq!(
            profile.raw().get(key),
            reparsed.raw().get(key),
            "Value for key '{}' changed after round-trip",
            key
        );
    }
}

#[test]
fn test_round_trip_byte_identical() {
    let path = fixture_path("sample_profile.json");
    let raw_input = std::fs::read_to_string(&path).expect("Failed to read fixture file");

    let profile = FilamentProfile::from_json(&raw_input).expect("Failed to parse");
    let output = profile.to_json_4space().expect("Failed to serialize");

    assert_eq!(
        raw_input, output,
        "Round-trip produced different bytes (input {} bytes, output {} bytes)",
        raw_input.len(),
        output.len()
    );
}

#[test]
fn test_missing_required_fields_is_malformed() {
    let err = FilamentProfile::from_json(r#"{"name": "PLA @ 0.4mm"}"#)
        .expect_err("profile without id should be rejected");
    assert!(err.contains("id"), "reason should name the field: {}", err);

    let err = FilamentProfile::from_json(r#"{"id": "PFUS00", "name": 42}"#)
        .expect_err("non-string name should be rejected");
    assert!(err.contains("name"), "reason should name the field: {}", err);

    FilamentProfile::from_json("not json at all").expect_err("garbage should be rejected");
}

#[test]
fn test_read_profile_maps_to_malformed_error() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let path = tmp.path().join("broken.json");
    std::fs::write(&path, "{ truncated").expect("write");

    let err = read_profile(&path).expect_err("broken file should fail");
    match err {
        OrcaMateError::MalformedProfile { path: p, .. } => assert_eq!(p, path),
        other => panic!("expected MalformedProfile, got {:?}", other),
    }
}

#[test]
fn test_atomic_write_creates_file() {
    let path = fixture_path("sample_profile.json");
    let profile = read_profile(&path).expect("Failed to read fixture");

    let tmp_dir = tempfile::tempdir().expect("Failed to create temp dir");
    let target = tmp_dir.path().join("output_profile.json");

    write_profile_atomic(&profile, &target).expect("Failed to write profile");

    assert!(target.exists(), "Written profile file should exist");
    let written = std::fs::read_to_string(&target).expect("Failed to read written file");
    let reparsed = FilamentProfile::from_json(&written).expect("Written file is not valid JSON");
    assert_eq!(profile.field_count(), reparsed.field_count());
    assert_eq!(profile.name(), reparsed.name());
}

#[test]
fn test_split_name_grammar() {
    assert_eq!(split_name("PLA @ 0.4mm"), ("PLA".to_string(), Some(nz("0.4"))));
    assert_eq!(
        split_name("Polymaker ASA @ 0.6MM"),
        ("Polymaker ASA".to_string(), Some(nz("0.6"))),
        "suffix match must be case-insensitive"
    );
    assert_eq!(
        split_name("PETG  @  0.8 mm "),
        ("PETG".to_string(), Some(nz("0.8"))),
        "suffix match must tolerate whitespace"
    );

    // Base profiles: no suffix at all, or an '@' that is not a size
    assert_eq!(split_name("Generic PLA"), ("Generic PLA".to_string(), None));
    assert_eq!(
        split_name("PLA @ X1C"),
        ("PLA @ X1C".to_string(), None),
        "non-numeric suffix is part of the material name"
    );
    assert_eq!(split_name("@ 0.4mm"), ("@ 0.4mm".to_string(), None));
}

#[test]
fn test_sized_name_round_trips() {
    let name = sized_name("PLA", nz("0.6"));
    assert_eq!(name, "PLA @ 0.6mm");
    assert_eq!(split_name(&name), ("PLA".to_string(), Some(nz("0.6"))));
}

#[test]
fn test_nozzle_size_minimal_representation() {
    assert_eq!(nz("0.4").to_string(), "0.4");
    assert_eq!(nz("0.40").to_string(), "0.4");
    assert_eq!(nz("1.0").to_string(), "1");
    assert_eq!(nz("0.25").to_string(), "0.25");
    assert_eq!(nz("0.4"), nz(" 0.4 "));
}

#[test]
fn test_nozzle_size_rejects_invalid() {
    for bad in ["0", "0.0", "-0.2", "abc", ""] {
        let err = bad.parse::<NozzleSize>().expect_err(bad);
        assert!(
            matches!(err, OrcaMateError::InvalidSize(_)),
            "{:?} should be InvalidSize, got {:?}",
            bad,
            err
        );
    }
    NozzleSize::from_mm(f64::NAN).expect_err("NaN should be rejected");
}

#[test]
fn test_rewrite_size_token() {
    let source = nz("0.4");
    let target = nz("0.6");

    assert_eq!(
        rewrite_size_token("PrinterX 0.4 nozzle", source, target),
        "PrinterX 0.6 nozzle"
    );
    // Only the matching token is rewritten; other numbers stay
    assert_eq!(
        rewrite_size_token("Voron 2.4 300 0.4 nozzle", source, target),
        "Voron 2.4 300 0.6 nozzle"
    );
    // Size-agnostic entries are left untouched
    assert_eq!(
        rewrite_size_token("MyPrinter direct drive", source, target),
        "MyPrinter direct drive"
    );
    // A digit embedded in a model number is not the nozzle size
    assert_eq!(
        rewrite_size_token("X4 high flow", source, target),
        "X4 high flow"
    );
    // Equivalent spellings of the source size still match
    assert_eq!(
        rewrite_size_token("PrinterX 0.40 nozzle", source, target),
        "PrinterX 0.6 nozzle"
    );
}

#[test]
fn test_id_allocator_never_reuses() {
    let seed = vec!["PFUSaaaaaaaaaaaaaaaa".to_string()];
    let mut ids = IdAllocator::new(seed.clone());

    let mut seen = std::collections::HashSet::new();
    seen.extend(seed);
    for _ in 0..100 {
        let id = ids.fresh();
        assert!(id.starts_with("PFUS"), "unexpected id shape: {}", id);
        assert_eq!(id.len(), "PFUS".len() + 16, "unexpected id length: {}", id);
        assert!(seen.insert(id), "allocator returned a duplicate id");
    }
}
