//! Index specifications
//!
//! An `IndexSpec` is the NumPy-style index of an indexed assignment
//! `x[idx] = y`: an ordered list of integers, slices, an optional ellipsis,
//! new axes and integer index arrays.

// SAFETY: the i64→u64/usize casts in `SliceSpec::indices` happen only after
// the comparisons that make their operands non-negative.
#![allow(clippy::cast_sign_loss)]

use std::ops::{Range, RangeFrom, RangeFull, RangeInclusive, RangeTo};

use crate::array::ArrayValue;
use crate::error::{IndexError, IndexResult};

/// Python-style slice: `start:stop:step`, every part optional
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SliceSpec {
    pub start: Option<i64>,
    pub stop: Option<i64>,
    pub step: Option<i64>,
}

impl SliceSpec {
    /// `:`, the whole axis
    pub fn full() -> Self {
        Self::default()
    }

    /// `start:stop:step`
    pub fn new(start: Option<i64>, stop: Option<i64>, step: Option<i64>) -> Self {
        Self { start, stop, step }
    }

    /// `start:stop`
    pub fn range(start: i64, stop: i64) -> Self {
        Self::new(Some(start), Some(stop), None)
    }

    /// Same slice with a different step
    pub fn with_step(self, step: i64) -> Self {
        Self {
            step: Some(step),
            ..self
        }
    }

    /// Resolve against an axis of length `len`.
    ///
    /// Returns `(start, step, count)` with the same clamping rules as
    /// Python's `slice.indices`: out-of-range bounds are clipped, never
    /// reported. A zero step is an argument error.
    pub fn indices(&self, len: usize) -> IndexResult<(i64, i64, usize)> {
        let step = self.step.unwrap_or(1);
        if step == 0 {
            return Err(IndexError::argument_error("slice step cannot be zero"));
        }

        let len = len as i64;
        let (lower, upper) = if step > 0 { (0, len) } else { (-1, len - 1) };

        let clamp = |bound: i64| {
            if bound < 0 {
                (bound + len).max(lower)
            } else {
                bound.min(upper)
            }
        };

        let start = self
            .start
            .map(clamp)
            .unwrap_or(if step > 0 { lower } else { upper });
        let stop = self
            .stop
            .map(clamp)
            .unwrap_or(if step > 0 { upper } else { lower });

        // `unsigned_abs` keeps `i64::MIN` steps from overflowing
        let stride = step.unsigned_abs();
        let count = if step > 0 && stop > start {
            (stop - start - 1) as u64 / stride + 1
        } else if step < 0 && start > stop {
            (start - stop - 1) as u64 / stride + 1
        } else {
            0
        };

        Ok((start, step, count as usize))
    }
}

/// One element of an index specification
#[derive(Debug, Clone, PartialEq)]
pub enum IndexElement {
    /// Select one coordinate; removes the axis
    Int(i64),
    /// Select a strided range along the axis
    Slice(SliceSpec),
    /// Stand-in for as many full slices as needed
    Ellipsis,
    /// Insert a length-1 axis
    NewAxis,
    /// Integer array of coordinates along the axis (fancy indexing)
    Array(ArrayValue),
}

impl IndexElement {
    /// Whether this element addresses one axis of the indexed array
    pub fn consumes_axis(&self) -> bool {
        matches!(
            self,
            IndexElement::Int(_) | IndexElement::Slice(_) | IndexElement::Array(_)
        )
    }
}

impl From<i64> for IndexElement {
    fn from(index: i64) -> Self {
        IndexElement::Int(index)
    }
}

impl From<SliceSpec> for IndexElement {
    fn from(slice: SliceSpec) -> Self {
        IndexElement::Slice(slice)
    }
}

impl From<ArrayValue> for IndexElement {
    fn from(array: ArrayValue) -> Self {
        IndexElement::Array(array)
    }
}

impl From<Vec<i64>> for IndexElement {
    fn from(coords: Vec<i64>) -> Self {
        IndexElement::Array(ArrayValue::vector(coords))
    }
}

impl From<Range<i64>> for IndexElement {
    fn from(range: Range<i64>) -> Self {
        IndexElement::Slice(SliceSpec::range(range.start, range.end))
    }
}

impl From<RangeInclusive<i64>> for IndexElement {
    fn from(range: RangeInclusive<i64>) -> Self {
        let (start, end) = range.into_inner();
        // `a..=-1` and `a..=i64::MAX` must still reach the last element
        let stop = match end {
            -1 => None,
            end => end.checked_add(1),
        };
        IndexElement::Slice(SliceSpec::new(Some(start), stop, None))
    }
}

impl From<RangeFrom<i64>> for IndexElement {
    fn from(range: RangeFrom<i64>) -> Self {
        IndexElement::Slice(SliceSpec::new(Some(range.start), None, None))
    }
}

impl From<RangeTo<i64>> for IndexElement {
    fn from(range: RangeTo<i64>) -> Self {
        IndexElement::Slice(SliceSpec::new(None, Some(range.end), None))
    }
}

impl From<RangeFull> for IndexElement {
    fn from(_: RangeFull) -> Self {
        IndexElement::Slice(SliceSpec::full())
    }
}

/// Ordered index specification
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IndexSpec(Vec<IndexElement>);

impl IndexSpec {
    /// Empty specification; selects the whole array
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an element
    pub fn with(mut self, element: impl Into<IndexElement>) -> Self {
        self.0.push(element.into());
        self
    }

    /// Elements in order
    pub fn elements(&self) -> &[IndexElement] {
        &self.0
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of axes of the indexed array this specification addresses
    pub fn consumed_axes(&self) -> usize {
        self.0.iter().filter(|e| e.consumes_axis()).count()
    }

    /// Whether any element is an index array
    pub fn has_arrays(&self) -> bool {
        self.0.iter().any(|e| matches!(e, IndexElement::Array(_)))
    }
}

impl From<Vec<IndexElement>> for IndexSpec {
    fn from(elements: Vec<IndexElement>) -> Self {
        IndexSpec(elements)
    }
}

impl From<&[i64]> for IndexSpec {
    fn from(coords: &[i64]) -> Self {
        IndexSpec(coords.iter().map(|&i| IndexElement::Int(i)).collect())
    }
}

impl FromIterator<IndexElement> for IndexSpec {
    fn from_iter<I: IntoIterator<Item = IndexElement>>(iter: I) -> Self {
        IndexSpec(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a IndexSpec {
    type Item = &'a IndexElement;
    type IntoIter = std::slice::Iter<'a, IndexElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Build an `IndexSpec` from anything convertible to `IndexElement`.
///
/// ```
/// use index_update::{index, IndexElement};
///
/// let idx = index![1, .., IndexElement::NewAxis, 0..4];
/// assert_eq!(idx.len(), 4);
/// ```
#[macro_export]
macro_rules! index {
    () => {
        $crate::IndexSpec::new()
    };
    ($($element:expr),+ $(,)?) => {
        $crate::IndexSpec::from(vec![$($crate::IndexElement::from($element)),+])
    };
}
