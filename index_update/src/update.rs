//! Functional indexed update.
//!
//! `index_update(x, idx, y)` is NumPy's `x[idx] = y` without the mutation:
//! `x` is left alone and a fresh array holding the result is returned.

use crate::array::ArrayValue;
use crate::broadcast::broadcast_source_indices;
use crate::config::UpdateConfig;
use crate::convert::cast_data;
use crate::error::IndexResult;
use crate::index::IndexSpec;
use crate::resolve::resolve;
use crate::scatter::{put, take};
use crate::trace::update_debug;

/// Copy of `x` with the positions selected by `idx` replaced by `y`,
/// using the default `UpdateConfig`.
///
/// `y` is broadcast to the shape of `x[idx]` and converted to the element
/// type of `x`. If `idx` selects a position more than once, one of the
/// values aimed at it is stored; which one is unspecified.
///
/// ```
/// use index_update::{index, index_update, ArrayValue};
///
/// let x = ArrayValue::vector(vec![0i64; 5]);
/// let result = index_update(&x, &index![2], &ArrayValue::from(5i64)).unwrap();
/// assert_eq!(result.as_slice::<i64>(), Some(&[0, 0, 5, 0, 0][..]));
/// assert_eq!(x.as_slice::<i64>(), Some(&[0; 5][..]));
/// ```
pub fn index_update(x: &ArrayValue, idx: &IndexSpec, y: &ArrayValue) -> IndexResult<ArrayValue> {
    index_update_with(x, idx, y, &UpdateConfig::default())
}

/// `index_update` with explicit policies.
///
/// Everything that can fail (resolution, broadcasting, conversion) runs
/// before the result buffer is allocated.
pub fn index_update_with(
    x: &ArrayValue,
    idx: &IndexSpec,
    y: &ArrayValue,
    config: &UpdateConfig,
) -> IndexResult<ArrayValue> {
    let selection = resolve(idx, x.shape(), config)?;
    let sources = broadcast_source_indices(y.shape(), selection.shape())?;
    let values = cast_data(y.data(), x.element_type(), config.casting)?;

    update_debug!(
        "index_update: {} {:?} <- {} {:?}",
        x.element_type(),
        x.shape(),
        y.element_type(),
        y.shape()
    );

    let mut data = x.data().clone();
    put(
        &mut data,
        selection.offsets(),
        &values,
        &sources,
        config.scatter_order,
    )?;
    ArrayValue::new(data, x.shape().to_vec())
}

/// `x[idx]` as a new array, using the default `UpdateConfig`
pub fn index_get(x: &ArrayValue, idx: &IndexSpec) -> IndexResult<ArrayValue> {
    index_get_with(x, idx, &UpdateConfig::default())
}

/// `index_get` with explicit policies
pub fn index_get_with(
    x: &ArrayValue,
    idx: &IndexSpec,
    config: &UpdateConfig,
) -> IndexResult<ArrayValue> {
    let selection = resolve(idx, x.shape(), config)?;
    let data = take(x.data(), selection.offsets())?;
    let (shape, _) = selection.into_parts();
    ArrayValue::new(data, shape)
}

impl ArrayValue {
    /// Method form of `index_update`
    pub fn updated(&self, idx: &IndexSpec, y: &ArrayValue) -> IndexResult<ArrayValue> {
        index_update(self, idx, y)
    }

    /// Method form of `index_get`
    pub fn select(&self, idx: &IndexSpec) -> IndexResult<ArrayValue> {
        index_get(self, idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::Casting;
    use crate::error::IndexError;
    use crate::index;
    use crate::index::IndexElement;
    use crate::scatter::ScatterOrder;
    use crate::value::Scalar;

    #[test]
    fn test_scalar_update() {
        let x = ArrayValue::vector(vec![0i64; 5]);
        let result = index_update(&x, &index![2], &ArrayValue::from(5i64)).unwrap();
        assert_eq!(result.as_slice::<i64>(), Some(&[0, 0, 5, 0, 0][..]));
        assert_eq!(x.as_slice::<i64>(), Some(&[0; 5][..]));
    }

    #[test]
    fn test_row_update_broadcasts_scalar() {
        let x = ArrayValue::zeros(crate::ElementType::F64, vec![4, 4]).unwrap();
        let result = index_update(&x, &index![1, ..], &ArrayValue::from(7.0f64)).unwrap();
        for i in 0..4 {
            for j in 0..4 {
                let expected = if i == 1 { 7.0 } else { 0.0 };
                assert_eq!(result.get(&[i, j]).unwrap(), Scalar::F64(expected));
            }
        }
    }

    #[test]
    fn test_value_is_cast_to_target_type() {
        let x = ArrayValue::vector(vec![0i32; 3]);
        let result = index_update(&x, &index![0], &ArrayValue::from(2.75f64)).unwrap();
        assert_eq!(result.as_slice::<i32>(), Some(&[2, 0, 0][..]));

        let safe = UpdateConfig::default().with_casting(Casting::Safe);
        let err = index_update_with(&x, &index![0], &ArrayValue::from(2.75f64), &safe)
            .unwrap_err();
        assert!(matches!(err, IndexError::TypeError(_)));
    }

    #[test]
    fn test_errors_come_in_order() {
        let x = ArrayValue::vector(vec![0u8; 3]);
        let wrong_shape = ArrayValue::vector(vec![1.5f64, f64::NAN]);

        // Bounds before shape
        let err = index_update(&x, &index![3], &wrong_shape).unwrap_err();
        assert!(err.is_bounds_error());

        // Shape before type
        let err = index_update(&x, &index![..], &wrong_shape).unwrap_err();
        assert!(err.is_shape_error());

        let err = index_update(&x, &index![0..2], &wrong_shape).unwrap_err();
        assert!(matches!(err, IndexError::TypeError(_)));
    }

    #[test]
    fn test_duplicate_positions_take_one_value() {
        let x = ArrayValue::vector(vec![0i64; 3]);
        let y = ArrayValue::vector(vec![1i64, 2]);
        for order in [ScatterOrder::Forward, ScatterOrder::Reverse] {
            let config = UpdateConfig::default().with_scatter_order(order);
            let result = index_update_with(&x, &index![vec![0, 0]], &y, &config).unwrap();
            let values = result.as_slice::<i64>().unwrap();
            assert!(values[0] == 1 || values[0] == 2);
            assert_eq!(&values[1..], &[0, 0]);
        }
    }

    #[test]
    fn test_index_get_round_trip() {
        let x = ArrayValue::from_shape_vec(vec![2, 3], (0..6).collect::<Vec<i64>>()).unwrap();
        let idx = index![.., IndexElement::from(vec![2, 0])];
        let picked = index_get(&x, &idx).unwrap();
        assert_eq!(picked.shape(), &[2, 2]);
        assert_eq!(picked.as_slice::<i64>(), Some(&[2, 0, 5, 3][..]));
        assert_eq!(index_update(&x, &idx, &picked).unwrap(), x);
    }

    #[test]
    fn test_method_forms() {
        let x = ArrayValue::vector(vec![false; 4]);
        let result = x.updated(&index![-1], &ArrayValue::from(true)).unwrap();
        assert_eq!(result.as_slice::<bool>(), Some(&[false, false, false, true][..]));
        assert_eq!(result.select(&index![3]).unwrap(), ArrayValue::from(true));
    }
}
