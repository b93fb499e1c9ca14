//! Parser behaviour through the public API

use serde_json::json;

use super::common::*;
use receiptvec::{
    parse_and_validate_vector, parse_embedding, ParseRejection, RawVector, VectorEvent,
    VectorParser, EMBEDDING_DIMENSIONS,
};

#[test]
fn test_array_input_scenario() {
    init_test_env();
    assert_eq!(
        parse_and_validate_vector(vec![0.1, 0.2, 0.3], 3),
        Some(vec![0.1, 0.2, 0.3])
    );
}

#[test]
fn test_string_input_scenario() {
    assert_eq!(
        parse_and_validate_vector("[0.1,0.2,0.3]", 3),
        Some(vec![0.1, 0.2, 0.3])
    );
}

#[test]
fn test_unparseable_element_scenario() {
    assert_eq!(parse_and_validate_vector(json!([0.1, "abc", 0.3]), 3), None);
}

#[test]
fn test_default_dimensions() {
    let literal = format!(
        "[{}]",
        vec!["0.5"; EMBEDDING_DIMENSIONS].join(",")
    );
    let parsed = parse_embedding(literal.as_str()).unwrap();
    assert_eq!(parsed.len(), 1536);

    assert!(parse_embedding(vec![0.5; 768]).is_none());
}

#[test]
fn test_embedding_field_from_storage_row() {
    // pgvector column read back as text, wrapped in a JSON row
    let row = json!({ "id": "r-1", "embedding": "[1.5, -2, 3e0]" });
    let parsed = parse_and_validate_vector(row["embedding"].clone(), 3);
    assert_eq!(parsed, Some(vec![1.5, -2.0, 3.0]));

    let missing = parse_and_validate_vector(row["missing"].clone(), 3);
    assert_eq!(missing, None);
}

#[test]
fn test_rejections_are_reported_to_observer() {
    let observer = RecordingObserver::new();
    let parser = VectorParser::with_observer(observer.clone());

    assert!(parser.parse(vec![1.0, 2.0], 2).is_some());
    assert!(parser.parse(RawVector::Absent, 2).is_none());
    assert!(parser.parse(vec![1.0, 2.0, 3.0], 2).is_none());
    assert!(parser.parse(json!(42), 2).is_none());

    let events = observer.events();
    assert_eq!(events.len(), 4);
    assert_eq!(
        events[0],
        VectorEvent::Parsed {
            shape: "sequence",
            dimensions: 2
        }
    );
    assert_eq!(
        events[1],
        VectorEvent::ParseRejected {
            shape: "absent",
            rejection: ParseRejection::Absent
        }
    );
    assert_eq!(
        events[2],
        VectorEvent::ParseRejected {
            shape: "sequence",
            rejection: ParseRejection::DimensionMismatch {
                expected: 2,
                actual: 3
            }
        }
    );
    assert_eq!(
        events[3],
        VectorEvent::ParseRejected {
            shape: "number",
            rejection: ParseRejection::UnsupportedShape { shape: "number" }
        }
    );
}

#[test]
fn test_f32_input_is_widened() {
    let parsed = parse_and_validate_vector(vec![0.5f32, 0.25f32], 2);
    assert_eq!(parsed, Some(vec![0.5, 0.25]));
}

#[test]
fn test_nan_string_is_rejected_as_non_finite() {
    let result = VectorParser::new().try_parse(json!(["1", "NaN"]), 2);
    assert_eq!(result, Err(ParseRejection::NonFinite { index: 1 }));
}
