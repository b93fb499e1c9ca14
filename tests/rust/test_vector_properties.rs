//! Property-based invariants for both entry points

use proptest::prelude::*;
use serde_json::{json, Value};

use super::common::magnitude;
use receiptvec::{parse_and_validate_vector, validate_and_convert_embedding, ConversionError};

/// Finite values spread across the full exponent range, from near-subnormal to 1e300
fn finite_value() -> impl Strategy<Value = f64> {
    prop_oneof![
        -1.0e6f64..1.0e6f64,
        (-1.0f64..1.0, -300i32..=300).prop_map(|(mantissa, exponent)| mantissa * 10f64.powi(exponent)),
    ]
}

fn canonical_literal(values: &[f64]) -> String {
    format!(
        "[{}]",
        values.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(",")
    )
}

fn any_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<f64>().prop_map(|f| json!(f)),
        "[\\[\\]0-9.,eE+\\- a-z]{0,24}".prop_map(Value::String),
    ];
    leaf.prop_recursive(3, 32, 8, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..8).prop_map(Value::Array),
            prop::collection::hash_map("[a-z]{1,4}", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect())),
        ]
    })
}

proptest! {
    #[test]
    fn parse_never_panics_and_honours_invariants(raw in any_json(), expected in 0usize..8) {
        if let Some(vector) = parse_and_validate_vector(raw, expected) {
            prop_assert_eq!(vector.len(), expected);
            prop_assert!(vector.iter().all(|v| v.is_finite()));
        }
    }

    #[test]
    fn parse_accepts_any_finite_vector_of_right_length(
        values in prop::collection::vec(finite_value(), 1..64)
    ) {
        let n = values.len();
        let literal = canonical_literal(&values);
        prop_assert_eq!(parse_and_validate_vector(literal.as_str(), n), Some(values.clone()));
        prop_assert_eq!(parse_and_validate_vector(values.clone(), n), Some(values));
    }

    #[test]
    fn convert_hits_target_and_unit_norm(
        values in prop::collection::vec(finite_value(), 1..400),
        target in 1usize..200
    ) {
        prop_assume!(values.len() <= target * 50);
        let result = validate_and_convert_embedding(&values, target).unwrap();
        prop_assert_eq!(result.len(), target);
        let m = magnitude(&result);
        if values.iter().all(|&v| v == 0.0) {
            prop_assert_eq!(m, 0.0);
        } else {
            prop_assert!((m - 1.0).abs() < 1e-6, "magnitude {} for non-zero input", m);
        }
    }

    #[test]
    fn zero_vectors_stay_zero(n in 1usize..300, target in 1usize..200) {
        prop_assume!(n <= target * 50);
        let result = validate_and_convert_embedding(&vec![0.0; n], target).unwrap();
        prop_assert_eq!(result.len(), target);
        prop_assert!(result.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn oversized_input_is_refused(target in 1usize..64) {
        let input = vec![1.0; target * 51];
        let err = validate_and_convert_embedding(&input, target).unwrap_err();
        let is_suspicious = matches!(err, ConversionError::SuspiciousSize { .. });
        prop_assert!(is_suspicious);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn canonical_length_vectors_need_an_exact_dimension_match(
        values in prop::collection::vec(finite_value(), receiptvec::EMBEDDING_DIMENSIONS),
        offset in prop_oneof![1usize..4, 1usize..1536],
        above in any::<bool>()
    ) {
        let n = receiptvec::EMBEDDING_DIMENSIONS;
        let expected = if above { n + offset } else { n - offset };
        let literal = canonical_literal(&values);

        prop_assert_eq!(parse_and_validate_vector(values.clone(), expected), None);
        prop_assert_eq!(parse_and_validate_vector(literal.as_str(), expected), None);

        prop_assert_eq!(parse_and_validate_vector(literal.as_str(), n), Some(values.clone()));
        prop_assert_eq!(parse_and_validate_vector(values.clone(), n), Some(values));
    }
}
