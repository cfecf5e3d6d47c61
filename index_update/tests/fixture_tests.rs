//! Integration tests: arrays and configs described as JSON fixtures

mod common;
use common::*;

use index_update::*;
use pretty_assertions::assert_eq;
use serde_json::json;

#[test]
fn test_array_from_json() {
    let array: ArrayValue = serde_json::from_value(json!({
        "data": { "I64": [0, 1, 2, 3, 4, 5] },
        "shape": [2, 3]
    }))
    .unwrap();
    assert_eq!(array, arange(&[2, 3]));
}

#[test]
fn test_array_json_shape_is_validated() {
    let result: Result<ArrayValue, _> = serde_json::from_value(json!({
        "data": { "F64": [1.0, 2.0, 3.0] },
        "shape": [2, 2]
    }));
    let err = result.unwrap_err();
    assert!(err.to_string().contains("cannot shape 3 elements"));
}

#[test]
fn test_array_json_shape_overflow_is_rejected() {
    let result: Result<ArrayValue, _> =
        serde_json::from_str(r#"{"data":{"F64":[]},"shape":[9223372036854775808,2]}"#);
    let err = result.unwrap_err();
    assert!(err.to_string().contains("too many elements"));
}

#[test]
fn test_update_result_serializes() {
    let x = ArrayValue::vector(vec![0u8; 3]);
    let result = index_update(&x, &index![vec![2]], &ArrayValue::from(200u8)).unwrap();
    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        json!({ "data": { "U8": [0, 0, 200] }, "shape": [3] })
    );
}

#[test]
fn test_config_json_round_trip() {
    let config = UpdateConfig::default().with_scatter_order(ScatterOrder::Reverse);
    let value = serde_json::to_value(config).unwrap();
    assert_eq!(
        value,
        json!({ "casting": "unsafe", "negative_indices": true, "scatter_order": "reverse" })
    );
    let back: UpdateConfig = serde_json::from_value(value).unwrap();
    assert_eq!(back, config);
}

#[test]
fn test_fixture_cases() {
    // Each case: input array, integer coordinates, value, expected result
    let cases = json!([
        { "x": { "data": { "F64": [0.0, 0.0, 0.0, 0.0] }, "shape": [2, 2] },
          "idx": [1, 0], "y": { "data": { "F64": [3.5] }, "shape": [] },
          "expected": { "data": { "F64": [0.0, 0.0, 3.5, 0.0] }, "shape": [2, 2] } },
        { "x": { "data": { "Bool": [false, false, false] }, "shape": [3] },
          "idx": [-1], "y": { "data": { "I32": [7] }, "shape": [] },
          "expected": { "data": { "Bool": [false, false, true] }, "shape": [3] } }
    ]);

    for case in cases.as_array().unwrap() {
        let x: ArrayValue = serde_json::from_value(case["x"].clone()).unwrap();
        let y: ArrayValue = serde_json::from_value(case["y"].clone()).unwrap();
        let expected: ArrayValue = serde_json::from_value(case["expected"].clone()).unwrap();
        let coords: Vec<i64> = serde_json::from_value(case["idx"].clone()).unwrap();

        let result = index_update(&x, &IndexSpec::from(&coords[..]), &y).unwrap();
        assert_eq!(result, expected, "case {}", case);
    }
}
