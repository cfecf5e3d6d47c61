//! Functional indexed update for N-dimensional arrays
//!
//! This crate computes what NumPy's `x[idx] = y` would produce, without
//! mutating `x`. It includes:
//!
//! - `ArrayValue` with type-segregated row-major storage
//! - `IndexSpec` for integer, slice, ellipsis, new-axis and fancy indices
//! - `resolve` / `ravel_multi_index` turning indices into linear offsets
//! - `put` / `take` scatter and gather over storage
//! - `index_update` / `index_get` built on top of them
//! - `UpdateConfig` for casting, negative-index and write-order policies
//!
//! ```
//! use index_update::prelude::*;
//! use index_update::index;
//!
//! let x = ArrayValue::zeros(ElementType::F64, vec![4, 4]).unwrap();
//! let y = index_update(&x, &index![1, ..], &ArrayValue::from(7.0f64)).unwrap();
//! assert_eq!(y.get(&[1, 3]).unwrap(), Scalar::F64(7.0));
//! assert_eq!(x.get(&[1, 3]).unwrap(), Scalar::F64(0.0));
//! ```

pub mod array;
pub mod broadcast;
pub mod config;
pub mod convert;
pub mod data;
pub mod element;
pub mod error;
pub mod index;
pub mod resolve;
pub mod scatter;
pub mod trace;
pub mod update;
pub mod value;

/// Prelude module for convenient imports
///
/// # Example
/// ```
/// use index_update::prelude::*;
/// ```
pub mod prelude {
    pub use super::array::ArrayValue;
    pub use super::config::UpdateConfig;
    pub use super::convert::Casting;
    pub use super::data::{ArrayData, Element};
    pub use super::element::ElementType;
    pub use super::error::{IndexError, IndexResult};
    pub use super::index::{IndexElement, IndexSpec, SliceSpec};
    pub use super::resolve::{ravel_multi_index, resolve, Selection};
    pub use super::scatter::{put, take, ScatterOrder};
    pub use super::update::{index_get, index_get_with, index_update, index_update_with};
    pub use super::value::Scalar;
}

pub use prelude::*;
