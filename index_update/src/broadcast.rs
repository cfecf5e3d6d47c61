// Broadcast helper utilities.
//
// This module provides the NumPy broadcasting primitives used by:
// - resolve.rs: broadcasting fancy-index arrays against each other
// - update.rs: broadcasting the update value onto the selection shape
//
// All shapes and strides are row-major (C-order).

use crate::error::{IndexError, IndexResult};

/// Compute strides for row-major array indexing.
pub fn compute_strides(shape: &[usize]) -> Vec<usize> {
    let mut strides = vec![0; shape.len()];
    let mut stride = 1;
    for (i, &dim) in shape.iter().enumerate().rev() {
        strides[i] = stride;
        stride *= dim;
    }
    strides
}

/// Compute the common shape of several shapes under NumPy broadcasting.
///
/// Shapes are aligned from the right; each pair of dimensions must be equal
/// or one of them must be 1. Returns `None` when the shapes are incompatible.
///
/// Examples:
/// - [3] and [2, 1] → [2, 3]
/// - [] and [4] → [4]
/// - [2] and [3] → incompatible
pub fn broadcast_shapes(shapes: &[&[usize]]) -> Option<Vec<usize>> {
    let max_dims = shapes.iter().map(|s| s.len()).max().unwrap_or(0);
    let mut result = vec![1; max_dims];

    for shape in shapes {
        let offset = max_dims - shape.len();
        for (i, &dim) in shape.iter().enumerate() {
            let slot = &mut result[offset + i];
            if *slot == 1 {
                *slot = dim;
            } else if dim != 1 && dim != *slot {
                return None;
            }
        }
    }

    Some(result)
}

/// Strides that read an array of `orig_shape` as if it had `target_shape`.
///
/// Leading length-1 dimensions of `orig_shape` beyond the target rank are
/// dropped, as NumPy does for assignment. Broadcast dimensions get stride 0.
pub fn broadcast_strides(orig_shape: &[usize], target_shape: &[usize]) -> IndexResult<Vec<usize>> {
    let mut orig = orig_shape;
    while orig.len() > target_shape.len() && orig[0] == 1 {
        orig = &orig[1..];
    }
    if orig.len() > target_shape.len() {
        return Err(IndexError::broadcast_error(orig_shape, target_shape));
    }

    let orig_strides = compute_strides(orig);
    let ndims_diff = target_shape.len() - orig.len();
    let mut strides = vec![0; target_shape.len()];

    for (i, (&dim, &stride)) in orig.iter().zip(orig_strides.iter()).enumerate() {
        let target_dim = target_shape[ndims_diff + i];
        if dim == target_dim {
            strides[ndims_diff + i] = stride;
        } else if dim != 1 {
            return Err(IndexError::broadcast_error(orig_shape, target_shape));
        }
    }

    Ok(strides)
}

/// Compute the source array index for a given result index during broadcast.
///
/// `result_strides` are the row-major strides of the result shape and
/// `source_strides` come from `broadcast_strides`.
pub fn broadcast_get_index(
    linear_idx: usize,
    result_strides: &[usize],
    source_strides: &[usize],
) -> usize {
    let mut source_idx = 0;
    let mut remaining = linear_idx;

    for (&result_stride, &source_stride) in result_strides.iter().zip(source_strides) {
        let dim_idx = remaining / result_stride;
        remaining %= result_stride;
        source_idx += dim_idx * source_stride;
    }

    source_idx
}

/// For every element of `target_shape` (row-major), the linear index of the
/// element of an `orig_shape` array that broadcasts onto it.
pub fn broadcast_source_indices(
    orig_shape: &[usize],
    target_shape: &[usize],
) -> IndexResult<Vec<usize>> {
    let source_strides = broadcast_strides(orig_shape, target_shape)?;
    let result_strides = compute_strides(target_shape);
    let total: usize = target_shape.iter().product();

    Ok((0..total)
        .map(|i| broadcast_get_index(i, &result_strides, &source_strides))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_strides() {
        assert_eq!(compute_strides(&[2, 3, 4]), vec![12, 4, 1]);
        assert_eq!(compute_strides(&[5]), vec![1]);
        assert!(compute_strides(&[]).is_empty());
    }

    #[test]
    fn test_broadcast_shapes() {
        assert_eq!(broadcast_shapes(&[&[3], &[2, 1]]), Some(vec![2, 3]));
        assert_eq!(broadcast_shapes(&[&[], &[4]]), Some(vec![4]));
        assert_eq!(broadcast_shapes(&[&[1, 5], &[4, 1], &[5]]), Some(vec![4, 5]));
        assert_eq!(broadcast_shapes(&[&[2], &[3]]), None);
        assert_eq!(broadcast_shapes(&[]), Some(vec![]));
    }

    #[test]
    fn test_broadcast_strides() {
        assert_eq!(broadcast_strides(&[3], &[2, 3]).unwrap(), vec![0, 1]);
        assert_eq!(broadcast_strides(&[2, 1], &[2, 3]).unwrap(), vec![1, 0]);
        assert_eq!(broadcast_strides(&[], &[2, 2]).unwrap(), vec![0, 0]);
        assert_eq!(broadcast_strides(&[1, 1, 4], &[4]).unwrap(), vec![1]);

        let err = broadcast_strides(&[2, 4], &[4]).unwrap_err();
        assert_eq!(err, IndexError::broadcast_error(&[2, 4], &[4]));
        assert!(broadcast_strides(&[3], &[4]).is_err());
    }

    #[test]
    fn test_broadcast_source_indices() {
        // Row vector repeated down two rows
        assert_eq!(
            broadcast_source_indices(&[3], &[2, 3]).unwrap(),
            vec![0, 1, 2, 0, 1, 2]
        );
        // Column vector repeated across three columns
        assert_eq!(
            broadcast_source_indices(&[2, 1], &[2, 3]).unwrap(),
            vec![0, 0, 0, 1, 1, 1]
        );
        assert_eq!(broadcast_source_indices(&[], &[3]).unwrap(), vec![0, 0, 0]);
        assert!(broadcast_source_indices(&[2], &[0]).is_err());
        assert!(broadcast_source_indices(&[1], &[0]).unwrap().is_empty());
    }
}
