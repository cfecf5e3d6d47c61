//! Index resolution
//!
//! Turns an `IndexSpec` into the row-major linear offsets it selects,
//! following NumPy's basic and advanced indexing rules:
//!
//! - integers fix an axis, slices and new axes shape the selection in order;
//! - once any index array is present, integers count as 0-d index arrays and
//!   all index arrays are broadcast together into one block of dimensions;
//! - that block replaces the index arrays in place when they are adjacent,
//!   and moves to the front of the selection otherwise.

// SAFETY: i64→usize casts are guarded by `adjusted >= 0` in `normalize` and by
// slice positions staying inside `0..len` after `SliceSpec::indices`.
#![allow(clippy::cast_sign_loss)]

use crate::broadcast::{
    broadcast_get_index, broadcast_shapes, broadcast_strides, compute_strides,
};
use crate::config::UpdateConfig;
use crate::error::{IndexError, IndexResult};
use crate::index::{IndexElement, IndexSpec, SliceSpec};
use crate::trace::update_debug;

/// Resolved index: the shape of the selected region and the linear offsets
/// it addresses, in row-major iteration order of that shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    shape: Vec<usize>,
    offsets: Vec<usize>,
}

impl Selection {
    /// Shape of the selected region (`x[idx].shape` in NumPy terms)
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Linear offsets into the indexed array's storage
    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }

    /// Number of selected positions, counting repeats
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    /// Number of offsets that repeat an earlier one
    pub fn duplicate_count(&self) -> usize {
        let mut sorted = self.offsets.clone();
        sorted.sort_unstable();
        sorted.windows(2).filter(|w| w[0] == w[1]).count()
    }

    pub fn into_parts(self) -> (Vec<usize>, Vec<usize>) {
        (self.shape, self.offsets)
    }
}

/// Integer coordinates along one axis, already normalized to `0..size`
#[derive(Debug, Clone)]
struct Coords {
    values: Vec<usize>,
    shape: Vec<usize>,
}

fn normalize(index: i64, axis: usize, size: usize, allow_negative: bool) -> IndexResult<usize> {
    let len = size as i64;
    let adjusted = if index < 0 && allow_negative {
        index + len
    } else {
        index
    };
    if adjusted < 0 || adjusted >= len {
        return Err(IndexError::bounds_error(axis, index, size));
    }
    Ok(adjusted as usize)
}

fn coords_of(
    element: &IndexElement,
    axis: usize,
    size: usize,
    allow_negative: bool,
) -> IndexResult<Option<Coords>> {
    match element {
        IndexElement::Int(index) => Ok(Some(Coords {
            values: vec![normalize(*index, axis, size, allow_negative)?],
            shape: Vec::new(),
        })),
        IndexElement::Array(array) => {
            let values = array
                .data()
                .to_index_vec(axis, size)?
                .into_iter()
                .map(|index| normalize(index, axis, size, allow_negative))
                .collect::<IndexResult<Vec<_>>>()?;
            Ok(Some(Coords {
                values,
                shape: array.shape().to_vec(),
            }))
        }
        _ => Ok(None),
    }
}

/// Broadcast shape of a set of index arrays
fn block_shape(coords: &[&Coords]) -> IndexResult<Vec<usize>> {
    let shapes: Vec<&[usize]> = coords.iter().map(|c| c.shape.as_slice()).collect();
    broadcast_shapes(&shapes).ok_or_else(|| IndexError::IndexShapeMismatch {
        shapes: coords.iter().map(|c| c.shape.clone()).collect(),
    })
}

fn ravel_coords(coords: &[Coords], dims: &[usize]) -> IndexResult<Selection> {
    let refs: Vec<&Coords> = coords.iter().collect();
    let shape = block_shape(&refs)?;
    let dim_strides = compute_strides(dims);
    let coord_strides = coords
        .iter()
        .map(|c| broadcast_strides(&c.shape, &shape))
        .collect::<IndexResult<Vec<_>>>()?;
    let result_strides = compute_strides(&shape);
    let total: usize = shape.iter().product();

    let mut offsets = Vec::with_capacity(total);
    for i in 0..total {
        let mut offset = 0;
        for (axis, c) in coords.iter().enumerate() {
            let source = broadcast_get_index(i, &result_strides, &coord_strides[axis]);
            offset += c.values[source] * dim_strides[axis];
        }
        offsets.push(offset);
    }

    Ok(Selection { shape, offsets })
}

/// Convert a tuple of coordinate arrays into linear offsets.
///
/// `multi_index[k]` holds the coordinates along dimension `k` of an array
/// of shape `dims`; the coordinate arrays are broadcast together. Bounds
/// are checked strictly: negative or too-large coordinates are errors,
/// never clipped or wrapped.
pub fn ravel_multi_index(
    multi_index: &[IndexElement],
    dims: &[usize],
) -> IndexResult<Selection> {
    if multi_index.len() != dims.len() {
        return Err(IndexError::argument_error(format!(
            "multi_index must have one coordinate array per dimension: expected {}, got {}",
            dims.len(),
            multi_index.len()
        )));
    }
    let coords = multi_index
        .iter()
        .zip(dims)
        .enumerate()
        .map(|(axis, (element, &size))| {
            coords_of(element, axis, size, false)?.ok_or_else(|| {
                IndexError::type_error("multi_index entries must be integers or integer arrays")
            })
        })
        .collect::<IndexResult<Vec<_>>>()?;
    ravel_coords(&coords, dims)
}

/// One consumed or inserted axis after ellipsis expansion
#[derive(Debug)]
enum Item {
    Int { axis: usize, index: usize },
    Slice { axis: usize, start: i64, step: i64, len: usize },
    NewAxis,
    Advanced { axis: usize, coords: Coords },
}

/// One axis group of the selection, in output order
#[derive(Debug)]
enum OutAxis {
    Slice { axis: usize, start: i64, step: i64 },
    NewAxis,
    Block,
}

fn expand<'a>(spec: &'a IndexSpec, ndim: usize) -> IndexResult<Vec<Option<&'a IndexElement>>> {
    let ellipses = spec
        .elements()
        .iter()
        .filter(|e| matches!(e, IndexElement::Ellipsis))
        .count();
    if ellipses > 1 {
        return Err(IndexError::argument_error(
            "an index can only have a single ellipsis ('...')",
        ));
    }
    let consumed = spec.consumed_axes();
    if consumed > ndim {
        return Err(IndexError::TooManyIndices {
            ndim,
            given: consumed,
        });
    }

    // `None` stands for a full slice
    let fill = ndim - consumed;
    let mut expanded = Vec::with_capacity(spec.len() + fill);
    for element in spec {
        if matches!(element, IndexElement::Ellipsis) {
            expanded.extend(std::iter::repeat(None).take(fill));
        } else {
            expanded.push(Some(element));
        }
    }
    if ellipses == 0 {
        expanded.extend(std::iter::repeat(None).take(fill));
    }
    Ok(expanded)
}

/// Resolve `spec` against an array of `shape`.
pub fn resolve(spec: &IndexSpec, shape: &[usize], config: &UpdateConfig) -> IndexResult<Selection> {
    let expanded = expand(spec, shape.len())?;
    let allow_negative = config.negative_indices;

    // One integer or index array per dimension: a plain multi-index
    let is_multi_index = spec.len() == shape.len()
        && spec
            .elements()
            .iter()
            .all(|e| matches!(e, IndexElement::Int(_) | IndexElement::Array(_)));
    let selection = if is_multi_index && spec.has_arrays() {
        let coords = spec
            .elements()
            .iter()
            .zip(shape)
            .enumerate()
            .filter_map(|(axis, (element, &size))| {
                coords_of(element, axis, size, allow_negative).transpose()
            })
            .collect::<IndexResult<Vec<_>>>()?;
        ravel_coords(&coords, shape)?
    } else {
        resolve_items(&expanded, shape, allow_negative)?
    };

    update_debug!(
        "resolve: shape {:?} -> selection {:?}, {} offsets, {} duplicates",
        shape,
        selection.shape,
        selection.offsets.len(),
        selection.duplicate_count()
    );
    Ok(selection)
}

fn resolve_items(
    expanded: &[Option<&IndexElement>],
    shape: &[usize],
    allow_negative: bool,
) -> IndexResult<Selection> {
    let has_advanced = expanded
        .iter()
        .any(|e| matches!(e, Some(IndexElement::Array(_))));

    let mut items = Vec::with_capacity(expanded.len());
    let mut axis = 0;
    for element in expanded {
        let item = match element {
            None => {
                let (start, step, len) = SliceSpec::full().indices(shape[axis])?;
                Item::Slice { axis, start, step, len }
            }
            Some(IndexElement::NewAxis) => {
                items.push(Item::NewAxis);
                continue;
            }
            Some(IndexElement::Slice(slice)) => {
                let (start, step, len) = slice.indices(shape[axis])?;
                Item::Slice { axis, start, step, len }
            }
            Some(IndexElement::Int(index)) if !has_advanced => Item::Int {
                axis,
                index: normalize(*index, axis, shape[axis], allow_negative)?,
            },
            Some(element) => match coords_of(element, axis, shape[axis], allow_negative)? {
                Some(coords) => Item::Advanced { axis, coords },
                // Ellipsis was removed by `expand`
                None => continue,
            },
        };
        items.push(item);
        axis += 1;
    }

    let dim_strides = compute_strides(shape);

    // Advanced block: shape, per-array strides into it, and placement
    let advanced: Vec<(usize, &Coords)> = items
        .iter()
        .filter_map(|item| match item {
            Item::Advanced { axis, coords } => Some((*axis, coords)),
            _ => None,
        })
        .collect();
    let advanced_positions: Vec<usize> = items
        .iter()
        .enumerate()
        .filter(|(_, item)| matches!(item, Item::Advanced { .. }))
        .map(|(i, _)| i)
        .collect();
    let block = if advanced.is_empty() {
        Vec::new()
    } else {
        let refs: Vec<&Coords> = advanced.iter().map(|(_, c)| *c).collect();
        block_shape(&refs)?
    };
    let block_strides = advanced
        .iter()
        .map(|(_, c)| broadcast_strides(&c.shape, &block))
        .collect::<IndexResult<Vec<_>>>()?;
    let adjacent = match (advanced_positions.first(), advanced_positions.last()) {
        (Some(first), Some(last)) => last - first + 1 == advanced_positions.len(),
        _ => true,
    };

    let mut base = 0;
    let mut out_axes = Vec::new();
    if !advanced.is_empty() && !adjacent {
        out_axes.push(OutAxis::Block);
    }
    for (position, item) in items.iter().enumerate() {
        match item {
            Item::Int { axis, index } => base += index * dim_strides[*axis],
            Item::Slice {
                axis, start, step, ..
            } => out_axes.push(OutAxis::Slice {
                axis: *axis,
                start: *start,
                step: *step,
            }),
            Item::NewAxis => out_axes.push(OutAxis::NewAxis),
            Item::Advanced { .. } => {
                if adjacent && advanced_positions.first() == Some(&position) {
                    out_axes.push(OutAxis::Block);
                }
            }
        }
    }

    let mut out_shape = Vec::new();
    let mut slice_lens = items.iter().filter_map(|item| match item {
        Item::Slice { len, .. } => Some(*len),
        _ => None,
    });
    for out_axis in &out_axes {
        match out_axis {
            OutAxis::Slice { .. } => out_shape.push(slice_lens.next().unwrap_or(0)),
            OutAxis::NewAxis => out_shape.push(1),
            OutAxis::Block => out_shape.extend_from_slice(&block),
        }
    }

    let total: usize = out_shape.iter().product();
    let mut offsets = Vec::with_capacity(total);
    let mut coord = vec![0usize; out_shape.len()];
    for _ in 0..total {
        let mut offset = base;
        let mut dim = 0;
        for out_axis in &out_axes {
            match out_axis {
                OutAxis::Slice { axis, start, step } => {
                    // Stays inside 0..shape[axis] by construction of the slice
                    let position = start + coord[dim] as i64 * step;
                    offset += position as usize * dim_strides[*axis];
                    dim += 1;
                }
                OutAxis::NewAxis => dim += 1,
                OutAxis::Block => {
                    let block_coord = &coord[dim..dim + block.len()];
                    for ((axis, coords), strides) in advanced.iter().zip(&block_strides) {
                        let source: usize = block_coord
                            .iter()
                            .zip(strides)
                            .map(|(c, s)| c * s)
                            .sum();
                        offset += coords.values[source] * dim_strides[*axis];
                    }
                    dim += block.len();
                }
            }
        }
        offsets.push(offset);

        // Row-major odometer step
        for d in (0..coord.len()).rev() {
            coord[d] += 1;
            if coord[d] < out_shape[d] {
                break;
            }
            coord[d] = 0;
        }
    }

    Ok(Selection {
        shape: out_shape,
        offsets,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::ArrayValue;
    use crate::index;

    fn resolve_default(spec: &IndexSpec, shape: &[usize]) -> IndexResult<Selection> {
        resolve(spec, shape, &UpdateConfig::default())
    }

    #[test]
    fn test_ravel_multi_index() {
        let sel = ravel_multi_index(&[IndexElement::from(1), IndexElement::from(2)], &[3, 3])
            .unwrap();
        assert_eq!(sel.shape(), &[] as &[usize]);
        assert_eq!(sel.offsets(), &[5]);

        let sel = ravel_multi_index(
            &[IndexElement::from(vec![0, 1, 2]), IndexElement::from(vec![2, 1, 0])],
            &[3, 4],
        )
        .unwrap();
        assert_eq!(sel.shape(), &[3]);
        assert_eq!(sel.offsets(), &[2, 5, 8]);
    }

    #[test]
    fn test_ravel_multi_index_is_strict() {
        let err = ravel_multi_index(&[IndexElement::from(2), IndexElement::from(3)], &[3, 3])
            .unwrap_err();
        assert_eq!(err, IndexError::bounds_error(1, 3, 3));

        let err = ravel_multi_index(&[IndexElement::from(-1)], &[3]).unwrap_err();
        assert_eq!(err, IndexError::bounds_error(0, -1, 3));

        assert!(matches!(
            ravel_multi_index(&[IndexElement::from(0)], &[3, 3]),
            Err(IndexError::ArgumentError(_))
        ));
        assert!(matches!(
            ravel_multi_index(&[IndexElement::from(..)], &[3]),
            Err(IndexError::TypeError(_))
        ));
    }

    #[test]
    fn test_basic_indexing() {
        let sel = resolve_default(&index![2], &[5]).unwrap();
        assert_eq!(sel.shape(), &[] as &[usize]);
        assert_eq!(sel.offsets(), &[2]);

        let sel = resolve_default(&index![1, ..], &[4, 4]).unwrap();
        assert_eq!(sel.shape(), &[4]);
        assert_eq!(sel.offsets(), &[4, 5, 6, 7]);

        let sel = resolve_default(&index![.., 1], &[3, 2]).unwrap();
        assert_eq!(sel.offsets(), &[1, 3, 5]);

        let sel = resolve_default(&index![], &[2, 2]).unwrap();
        assert_eq!(sel.shape(), &[2, 2]);
        assert_eq!(sel.offsets(), &[0, 1, 2, 3]);
    }

    #[test]
    fn test_negative_indices() {
        let sel = resolve_default(&index![-1], &[5]).unwrap();
        assert_eq!(sel.offsets(), &[4]);

        let err = resolve_default(&index![-6], &[5]).unwrap_err();
        assert_eq!(err, IndexError::bounds_error(0, -6, 5));

        let strict = UpdateConfig {
            negative_indices: false,
            ..UpdateConfig::default()
        };
        let err = resolve(&index![-1], &[5], &strict).unwrap_err();
        assert!(err.is_bounds_error());
    }

    #[test]
    fn test_strided_and_reversed_slices() {
        let idx = index![SliceSpec::full().with_step(-2)];
        let sel = resolve_default(&idx, &[5]).unwrap();
        assert_eq!(sel.offsets(), &[4, 2, 0]);

        let sel = resolve_default(&index![.., 1..3], &[2, 4]).unwrap();
        assert_eq!(sel.shape(), &[2, 2]);
        assert_eq!(sel.offsets(), &[1, 2, 5, 6]);

        let sel = resolve_default(&index![3..1], &[5]).unwrap();
        assert!(sel.is_empty());
        assert_eq!(sel.shape(), &[0]);
    }

    #[test]
    fn test_ellipsis_and_newaxis() {
        let sel = resolve_default(&index![IndexElement::Ellipsis, 1], &[2, 3]).unwrap();
        assert_eq!(sel.shape(), &[2]);
        assert_eq!(sel.offsets(), &[1, 4]);

        let sel = resolve_default(&index![IndexElement::NewAxis, 0], &[2, 3]).unwrap();
        assert_eq!(sel.shape(), &[1, 3]);
        assert_eq!(sel.offsets(), &[0, 1, 2]);

        let err = resolve_default(
            &index![IndexElement::Ellipsis, IndexElement::Ellipsis],
            &[2],
        )
        .unwrap_err();
        assert!(matches!(err, IndexError::ArgumentError(_)));
    }

    #[test]
    fn test_too_many_indices() {
        let err = resolve_default(&index![0, 0], &[3]).unwrap_err();
        assert_eq!(err, IndexError::TooManyIndices { ndim: 1, given: 2 });
    }

    #[test]
    fn test_fancy_indexing_with_duplicates() {
        let sel = resolve_default(&index![vec![0, 0]], &[3]).unwrap();
        assert_eq!(sel.shape(), &[2]);
        assert_eq!(sel.offsets(), &[0, 0]);
        assert_eq!(sel.duplicate_count(), 1);
    }

    #[test]
    fn test_fancy_block_in_place() {
        // x[:, [2, 0]] on a 2x3 array
        let sel = resolve_default(&index![.., vec![2, 0]], &[2, 3]).unwrap();
        assert_eq!(sel.shape(), &[2, 2]);
        assert_eq!(sel.offsets(), &[2, 0, 5, 3]);

        // Integer next to an array is part of the same block
        let sel = resolve_default(&index![1, vec![0, 2]], &[2, 3]).unwrap();
        assert_eq!(sel.shape(), &[2]);
        assert_eq!(sel.offsets(), &[3, 5]);
    }

    #[test]
    fn test_fancy_block_moves_to_front() {
        // x[[0, 1], :, 0] on a 2x2x2 array: arrays separated by a slice
        let sel = resolve_default(&index![vec![0, 1], .., 0], &[2, 2, 2]).unwrap();
        assert_eq!(sel.shape(), &[2, 2]);
        assert_eq!(sel.offsets(), &[0, 2, 4, 6]);
    }

    #[test]
    fn test_fancy_arrays_broadcast() {
        let rows = ArrayValue::from_shape_vec(vec![2, 1], vec![0i64, 1]).unwrap();
        let cols = ArrayValue::vector(vec![0i64, 2]);
        let sel = resolve_default(&index![rows, cols], &[2, 3]).unwrap();
        assert_eq!(sel.shape(), &[2, 2]);
        assert_eq!(sel.offsets(), &[0, 2, 3, 5]);

        let err = resolve_default(&index![vec![0, 1], vec![0, 1, 2]], &[3, 3]).unwrap_err();
        assert!(matches!(err, IndexError::IndexShapeMismatch { .. }));
    }

    #[test]
    fn test_index_array_must_be_integer() {
        let err = resolve_default(&index![ArrayValue::vector(vec![0.0f64])], &[3]).unwrap_err();
        assert!(matches!(err, IndexError::TypeError(_)));
    }
}
