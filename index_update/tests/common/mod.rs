//! Shared helpers for integration tests
// Consumed selectively by the integration test files; not every helper is
// referenced from every test target.
#![allow(dead_code)]

use index_update::*;

/// Row-major `0, 1, 2, ...` as Int64 with the given shape
pub fn arange(shape: &[usize]) -> ArrayValue {
    let total: usize = shape.iter().product();
    ArrayValue::from_shape_vec(shape.to_vec(), (0..total as i64).collect::<Vec<i64>>())
        .unwrap_or_else(|e| panic!("arange({:?}) failed: {}", shape, e))
}

/// Float64 zeros of the given shape
pub fn zeros(shape: &[usize]) -> ArrayValue {
    ArrayValue::zeros(ElementType::F64, shape.to_vec())
        .unwrap_or_else(|e| panic!("zeros({:?}) failed: {}", shape, e))
}

/// Int64 storage of an array, panicking on any other element type
pub fn i64s(array: &ArrayValue) -> Vec<i64> {
    array
        .as_slice::<i64>()
        .unwrap_or_else(|| panic!("expected Int64 array, got {}", array.element_type()))
        .to_vec()
}

/// Float64 storage of an array, panicking on any other element type
pub fn f64s(array: &ArrayValue) -> Vec<f64> {
    array
        .as_slice::<f64>()
        .unwrap_or_else(|| panic!("expected Float64 array, got {}", array.element_type()))
        .to_vec()
}

/// Linear offsets at which two arrays of equal shape differ
pub fn changed_offsets(before: &ArrayValue, after: &ArrayValue) -> Vec<usize> {
    assert_eq!(before.shape(), after.shape(), "shapes differ");
    before
        .data()
        .iter_values()
        .zip(after.data().iter_values())
        .enumerate()
        .filter(|(_, (a, b))| a != b)
        .map(|(i, _)| i)
        .collect()
}

/// Run `index_update` and return the error message, panicking on success
pub fn update_error(x: &ArrayValue, idx: &IndexSpec, y: &ArrayValue) -> String {
    match index_update(x, idx, y) {
        Ok(result) => panic!("expected an error, got {:?}", result),
        Err(e) => e.to_string(),
    }
}
