//! ArrayValue - N-dimensional array with type-segregated storage.
//!
//! Elements are stored in row-major (C) order. A 0-dimensional array holds
//! exactly one element and is how scalars are passed as update values.

use serde::{Deserialize, Serialize};

use crate::broadcast::compute_strides;
use crate::convert::{cast_data, Casting};
use crate::data::{ArrayData, Element};
use crate::element::ElementType;
use crate::error::{IndexError, IndexResult};
use crate::value::Scalar;

/// N-dimensional array value with type-segregated storage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawArray")]
pub struct ArrayValue {
    data: ArrayData,
    shape: Vec<usize>,
}

/// Unvalidated serde form of `ArrayValue`
#[derive(Deserialize)]
struct RawArray {
    data: ArrayData,
    shape: Vec<usize>,
}

impl TryFrom<RawArray> for ArrayValue {
    type Error = IndexError;

    fn try_from(raw: RawArray) -> IndexResult<Self> {
        ArrayValue::new(raw.data, raw.shape)
    }
}

/// Number of elements of `shape`, or an error when it overflows `usize`
fn element_count(shape: &[usize]) -> IndexResult<usize> {
    shape
        .iter()
        .try_fold(1usize, |acc, &dim| acc.checked_mul(dim))
        .ok_or_else(|| {
            IndexError::argument_error(format!("shape {:?} has too many elements", shape))
        })
}

impl ArrayValue {
    /// Create a new array with given data and shape.
    ///
    /// The product of `shape` must equal the number of stored elements.
    pub fn new(data: ArrayData, shape: Vec<usize>) -> IndexResult<Self> {
        let expected = element_count(&shape)?;
        if expected != data.len() {
            return Err(IndexError::argument_error(format!(
                "cannot shape {} elements as {:?}",
                data.len(),
                shape
            )));
        }
        Ok(Self { data, shape })
    }

    /// Create an array from a typed vector and a shape
    pub fn from_shape_vec<T: Element>(shape: Vec<usize>, values: Vec<T>) -> IndexResult<Self> {
        Self::new(T::into_data(values), shape)
    }

    /// Create a 1D array
    pub fn vector<T: Element>(values: Vec<T>) -> Self {
        let len = values.len();
        Self {
            data: T::into_data(values),
            shape: vec![len],
        }
    }

    /// Create a 0-dimensional array holding one value
    pub fn scalar<T: Element>(value: T) -> Self {
        Self {
            data: T::into_data(vec![value]),
            shape: Vec::new(),
        }
    }

    /// Create a zeros array
    pub fn zeros(element_type: ElementType, shape: Vec<usize>) -> IndexResult<Self> {
        let total = element_count(&shape)?;
        Ok(Self {
            data: ArrayData::zeros(element_type, total),
            shape,
        })
    }

    /// Create an array filled with `value`
    pub fn full(value: Scalar, shape: Vec<usize>) -> IndexResult<Self> {
        let total = element_count(&shape)?;
        Ok(Self {
            data: ArrayData::full(value, total),
            shape,
        })
    }

    /// Shape of the array
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Number of dimensions
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Total number of elements
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the array has no elements
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Element type of the array
    pub fn element_type(&self) -> ElementType {
        self.data.element_type()
    }

    /// Row-major strides
    pub fn strides(&self) -> Vec<usize> {
        compute_strides(&self.shape)
    }

    /// Underlying storage
    pub fn data(&self) -> &ArrayData {
        &self.data
    }

    /// Consume the array, returning its storage
    pub fn into_data(self) -> ArrayData {
        self.data
    }

    /// Borrow the elements as a typed slice, if the element type matches
    pub fn as_slice<T: Element>(&self) -> Option<&[T]> {
        T::slice(&self.data)
    }

    /// Linear offset of a full coordinate tuple (0-based)
    pub fn linear_index(&self, indices: &[usize]) -> IndexResult<usize> {
        if indices.len() != self.ndim() {
            return Err(IndexError::argument_error(format!(
                "expected {} indices for array of shape {:?}, got {}",
                self.ndim(),
                self.shape,
                indices.len()
            )));
        }
        let mut linear = 0;
        for (axis, ((&index, &size), stride)) in indices
            .iter()
            .zip(&self.shape)
            .zip(self.strides())
            .enumerate()
        {
            if index >= size {
                return Err(IndexError::bounds_error(axis, index as i128, size));
            }
            linear += index * stride;
        }
        Ok(linear)
    }

    /// Get element at a full coordinate tuple (0-based)
    pub fn get(&self, indices: &[usize]) -> IndexResult<Scalar> {
        let linear = self.linear_index(indices)?;
        self.data
            .get_value(linear)
            .ok_or(IndexError::offset_error(linear, self.len()))
    }

    /// Same elements viewed with a different shape
    pub fn reshape(self, shape: Vec<usize>) -> IndexResult<Self> {
        Self::new(self.data, shape)
    }

    /// Copy of the array converted to `element_type`
    pub fn astype(&self, element_type: ElementType, casting: Casting) -> IndexResult<Self> {
        let data = cast_data(&self.data, element_type, casting)?.into_owned();
        Ok(Self {
            data,
            shape: self.shape.clone(),
        })
    }
}

macro_rules! impl_array_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for ArrayValue {
                fn from(value: $ty) -> Self {
                    ArrayValue::scalar(value)
                }
            }

            impl From<Vec<$ty>> for ArrayValue {
                fn from(values: Vec<$ty>) -> Self {
                    ArrayValue::vector(values)
                }
            }
        )*
    };
}

impl_array_from!(f32, f64, i8, i16, i32, i64, u8, u16, u32, u64, bool);

impl From<Scalar> for ArrayValue {
    fn from(value: Scalar) -> Self {
        Self {
            data: ArrayData::full(value, 1),
            shape: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_validates_shape() {
        assert!(ArrayValue::new(ArrayData::F64(vec![0.0; 6]), vec![2, 3]).is_ok());
        let err = ArrayValue::new(ArrayData::F64(vec![0.0; 5]), vec![2, 3]).unwrap_err();
        assert!(matches!(err, IndexError::ArgumentError(_)));
    }

    #[test]
    fn test_zeros_and_full() {
        let arr = ArrayValue::zeros(ElementType::I32, vec![2, 3]).unwrap();
        assert_eq!(arr.len(), 6);
        assert_eq!(arr.shape(), &[2, 3]);
        assert_eq!(arr.as_slice::<i32>(), Some(&[0; 6][..]));

        let arr = ArrayValue::full(Scalar::U8(7), vec![2]).unwrap();
        assert_eq!(arr.as_slice::<u8>(), Some(&[7, 7][..]));

        let arr = ArrayValue::full(Scalar::Bool(true), Vec::new()).unwrap();
        assert_eq!(arr.get(&[]).unwrap(), Scalar::Bool(true));
        assert_eq!(ArrayValue::from(Scalar::F32(1.5)), ArrayValue::from(1.5f32));
    }

    #[test]
    fn test_oversized_shapes_are_rejected() {
        let huge = vec![usize::MAX / 2 + 1, 2];
        for err in [
            ArrayValue::zeros(ElementType::U8, huge.clone()).unwrap_err(),
            ArrayValue::full(Scalar::I64(1), huge.clone()).unwrap_err(),
            ArrayValue::new(ArrayData::U8(Vec::new()), huge).unwrap_err(),
        ] {
            assert!(matches!(err, IndexError::ArgumentError(_)));
            assert!(err.to_string().contains("too many elements"));
        }
        // a zero-length axis keeps the product small
        assert_eq!(ArrayValue::zeros(ElementType::U8, vec![usize::MAX, 0]).unwrap().len(), 0);
    }

    #[test]
    fn test_scalar_is_zero_dimensional() {
        let arr = ArrayValue::from(5i64);
        assert_eq!(arr.ndim(), 0);
        assert_eq!(arr.len(), 1);
        assert_eq!(arr.get(&[]).unwrap(), Scalar::I64(5));
    }

    #[test]
    fn test_get_row_major() {
        let arr = ArrayValue::from_shape_vec(vec![2, 3], vec![0, 1, 2, 3, 4, 5i32]).unwrap();
        assert_eq!(arr.strides(), vec![3, 1]);
        assert_eq!(arr.get(&[1, 0]).unwrap(), Scalar::I32(3));
        assert_eq!(arr.get(&[0, 2]).unwrap(), Scalar::I32(2));

        let err = arr.get(&[2, 0]).unwrap_err();
        assert_eq!(err, IndexError::bounds_error(0, 2, 2));
        assert!(matches!(
            arr.get(&[0]),
            Err(IndexError::ArgumentError(_))
        ));
    }

    #[test]
    fn test_reshape_and_astype() {
        let arr = ArrayValue::vector(vec![1.5f64, 2.5, 3.5, 4.5]);
        let arr = arr.reshape(vec![2, 2]).unwrap();
        assert_eq!(arr.shape(), &[2, 2]);

        let ints = arr.astype(ElementType::I64, Casting::Unsafe).unwrap();
        assert_eq!(ints.as_slice::<i64>(), Some(&[1, 2, 3, 4][..]));
        assert_eq!(ints.shape(), &[2, 2]);
        assert!(arr.astype(ElementType::I64, Casting::Safe).is_err());
    }
}
