//! ArrayData - Type-segregated array storage.
//!
//! This module contains the `ArrayData` enum which holds one homogeneous
//! vector per supported element type, plus the dispatch macros used to write
//! element-type-agnostic code over it.

use serde::{Deserialize, Serialize};

use crate::element::ElementType;
use crate::error::{IndexError, IndexResult};
use crate::value::Scalar;

/// Type-segregated array storage
/// Each variant holds a homogeneous vector of the corresponding type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ArrayData {
    // Floating point types
    F32(Vec<f32>),
    F64(Vec<f64>),
    // Signed integer types
    I8(Vec<i8>),
    I16(Vec<i16>),
    I32(Vec<i32>),
    I64(Vec<i64>),
    // Unsigned integer types
    U8(Vec<u8>),
    U16(Vec<u16>),
    U32(Vec<u32>),
    U64(Vec<u64>),
    // Other types
    Bool(Vec<bool>),
}

/// Evaluate `$body` with `$v` bound to the inner vector of any variant.
macro_rules! array_data_dispatch {
    ($data:expr, $v:ident => $body:expr) => {
        match $data {
            $crate::data::ArrayData::F32($v) => $body,
            $crate::data::ArrayData::F64($v) => $body,
            $crate::data::ArrayData::I8($v) => $body,
            $crate::data::ArrayData::I16($v) => $body,
            $crate::data::ArrayData::I32($v) => $body,
            $crate::data::ArrayData::I64($v) => $body,
            $crate::data::ArrayData::U8($v) => $body,
            $crate::data::ArrayData::U16($v) => $body,
            $crate::data::ArrayData::U32($v) => $body,
            $crate::data::ArrayData::U64($v) => $body,
            $crate::data::ArrayData::Bool($v) => $body,
        }
    };
}

/// Like `array_data_dispatch!`, but `$body` yields a new vector that is
/// wrapped back into the same variant.
macro_rules! array_data_map {
    ($data:expr, $v:ident => $body:expr) => {
        match $data {
            $crate::data::ArrayData::F32($v) => $crate::data::ArrayData::F32($body),
            $crate::data::ArrayData::F64($v) => $crate::data::ArrayData::F64($body),
            $crate::data::ArrayData::I8($v) => $crate::data::ArrayData::I8($body),
            $crate::data::ArrayData::I16($v) => $crate::data::ArrayData::I16($body),
            $crate::data::ArrayData::I32($v) => $crate::data::ArrayData::I32($body),
            $crate::data::ArrayData::I64($v) => $crate::data::ArrayData::I64($body),
            $crate::data::ArrayData::U8($v) => $crate::data::ArrayData::U8($body),
            $crate::data::ArrayData::U16($v) => $crate::data::ArrayData::U16($body),
            $crate::data::ArrayData::U32($v) => $crate::data::ArrayData::U32($body),
            $crate::data::ArrayData::U64($v) => $crate::data::ArrayData::U64($body),
            $crate::data::ArrayData::Bool($v) => $crate::data::ArrayData::Bool($body),
        }
    };
}

pub(crate) use array_data_map;

impl ArrayData {
    /// Storage of `len` zero (or `false`) elements
    pub fn zeros(element_type: ElementType, len: usize) -> Self {
        match element_type {
            ElementType::F32 => ArrayData::F32(vec![0.0; len]),
            ElementType::F64 => ArrayData::F64(vec![0.0; len]),
            ElementType::I8 => ArrayData::I8(vec![0; len]),
            ElementType::I16 => ArrayData::I16(vec![0; len]),
            ElementType::I32 => ArrayData::I32(vec![0; len]),
            ElementType::I64 => ArrayData::I64(vec![0; len]),
            ElementType::U8 => ArrayData::U8(vec![0; len]),
            ElementType::U16 => ArrayData::U16(vec![0; len]),
            ElementType::U32 => ArrayData::U32(vec![0; len]),
            ElementType::U64 => ArrayData::U64(vec![0; len]),
            ElementType::Bool => ArrayData::Bool(vec![false; len]),
        }
    }

    /// Storage of `len` copies of `value`, typed after the scalar
    pub fn full(value: Scalar, len: usize) -> Self {
        match value {
            Scalar::F32(v) => ArrayData::F32(vec![v; len]),
            Scalar::F64(v) => ArrayData::F64(vec![v; len]),
            Scalar::I8(v) => ArrayData::I8(vec![v; len]),
            Scalar::I16(v) => ArrayData::I16(vec![v; len]),
            Scalar::I32(v) => ArrayData::I32(vec![v; len]),
            Scalar::I64(v) => ArrayData::I64(vec![v; len]),
            Scalar::U8(v) => ArrayData::U8(vec![v; len]),
            Scalar::U16(v) => ArrayData::U16(vec![v; len]),
            Scalar::U32(v) => ArrayData::U32(vec![v; len]),
            Scalar::U64(v) => ArrayData::U64(vec![v; len]),
            Scalar::Bool(v) => ArrayData::Bool(vec![v; len]),
        }
    }

    /// Build storage of `element_type` from boxed scalars.
    ///
    /// Every scalar must already have exactly that element type; conversions
    /// belong to `convert`.
    pub fn from_scalars(element_type: ElementType, values: &[Scalar]) -> IndexResult<Self> {
        let mut data = ArrayData::zeros(element_type, values.len());
        for (i, value) in values.iter().enumerate() {
            data.set_value(i, *value)?;
        }
        Ok(data)
    }

    /// Get the element type of this data
    pub fn element_type(&self) -> ElementType {
        match self {
            ArrayData::F32(_) => ElementType::F32,
            ArrayData::F64(_) => ElementType::F64,
            ArrayData::I8(_) => ElementType::I8,
            ArrayData::I16(_) => ElementType::I16,
            ArrayData::I32(_) => ElementType::I32,
            ArrayData::I64(_) => ElementType::I64,
            ArrayData::U8(_) => ElementType::U8,
            ArrayData::U16(_) => ElementType::U16,
            ArrayData::U32(_) => ElementType::U32,
            ArrayData::U64(_) => ElementType::U64,
            ArrayData::Bool(_) => ElementType::Bool,
        }
    }

    /// Number of stored elements
    pub fn len(&self) -> usize {
        array_data_dispatch!(self, v => v.len())
    }

    /// Check if the data is empty
    pub fn is_empty(&self) -> bool {
        array_data_dispatch!(self, v => v.is_empty())
    }

    /// Get a value at a linear index
    pub fn get_value(&self, index: usize) -> Option<Scalar> {
        array_data_dispatch!(self, v => v.get(index).map(|&x| Scalar::from(x)))
    }

    /// Set a value at a linear index; the scalar must match the element type
    pub fn set_value(&mut self, index: usize, value: Scalar) -> IndexResult<()> {
        let len = self.len();
        if index >= len {
            return Err(IndexError::offset_error(index, len));
        }
        match (self, value) {
            (ArrayData::F32(v), Scalar::F32(x)) => v[index] = x,
            (ArrayData::F64(v), Scalar::F64(x)) => v[index] = x,
            (ArrayData::I8(v), Scalar::I8(x)) => v[index] = x,
            (ArrayData::I16(v), Scalar::I16(x)) => v[index] = x,
            (ArrayData::I32(v), Scalar::I32(x)) => v[index] = x,
            (ArrayData::I64(v), Scalar::I64(x)) => v[index] = x,
            (ArrayData::U8(v), Scalar::U8(x)) => v[index] = x,
            (ArrayData::U16(v), Scalar::U16(x)) => v[index] = x,
            (ArrayData::U32(v), Scalar::U32(x)) => v[index] = x,
            (ArrayData::U64(v), Scalar::U64(x)) => v[index] = x,
            (ArrayData::Bool(v), Scalar::Bool(x)) => v[index] = x,
            (data, value) => {
                return Err(IndexError::type_error(format!(
                    "cannot store {} in {} storage",
                    value.type_name(),
                    data.element_type()
                )))
            }
        }
        Ok(())
    }

    /// Iterate over all elements as boxed scalars
    pub fn iter_values(&self) -> impl Iterator<Item = Scalar> + '_ {
        (0..self.len()).filter_map(move |i| self.get_value(i))
    }

    /// Read integer storage as i64 coordinates.
    ///
    /// Used for fancy-index arrays: floating point and Bool storage is a type
    /// error, and a `UInt64` coordinate above `i64::MAX` is reported as a
    /// bounds error on `axis`.
    pub fn to_index_vec(&self, axis: usize, size: usize) -> IndexResult<Vec<i64>> {
        let element_type = self.element_type();
        if !element_type.is_integer() {
            return Err(IndexError::type_error(format!(
                "arrays used as indices must be of integer type, got {}",
                element_type
            )));
        }
        self.iter_values()
            .map(|value| {
                value.as_i64().ok_or_else(|| match value {
                    Scalar::U64(v) => IndexError::bounds_error(axis, v, size),
                    other => IndexError::type_error(format!(
                        "index {} cannot be used as a coordinate",
                        other
                    )),
                })
            })
            .collect()
    }
}

/// Rust primitive that can be stored in `ArrayData`
pub trait Element: Copy + Into<Scalar> {
    /// Element type tag for this primitive
    const ELEMENT_TYPE: ElementType;

    /// Wrap a vector into the matching variant
    fn into_data(values: Vec<Self>) -> ArrayData;

    /// Borrow the matching variant's elements, if `data` has this type
    fn slice(data: &ArrayData) -> Option<&[Self]>;
}

macro_rules! impl_element {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl Element for $ty {
                const ELEMENT_TYPE: ElementType = ElementType::$variant;

                fn into_data(values: Vec<Self>) -> ArrayData {
                    ArrayData::$variant(values)
                }

                fn slice(data: &ArrayData) -> Option<&[Self]> {
                    match data {
                        ArrayData::$variant(v) => Some(v),
                        _ => None,
                    }
                }
            }
        )*
    };
}

impl_element!(
    f32 => F32,
    f64 => F64,
    i8 => I8,
    i16 => I16,
    i32 => I32,
    i64 => I64,
    u8 => U8,
    u16 => U16,
    u32 => U32,
    u64 => U64,
    bool => Bool,
);
