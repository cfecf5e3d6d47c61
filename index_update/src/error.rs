//! Error types for indexed updates
//!
//! Every failure is a contract error at the call site: nothing is retried,
//! and the input array is never touched when an error is returned.

use thiserror::Error;

/// Error raised by index resolution, broadcasting, casting or scattering.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    /// A coordinate lies outside its dimension
    #[error("BoundsError: index {index} is out of bounds for axis {axis} with size {size}")]
    BoundsError {
        /// Axis of the indexed array
        axis: usize,
        /// Coordinate as given by the caller, wide enough for any `UInt64`
        index: i128,
        /// Length of the axis
        size: usize,
    },

    /// A linear offset lies outside the element storage
    #[error("BoundsError: offset {offset} is out of bounds for storage of length {len}")]
    OffsetOutOfBounds {
        /// Offending linear offset
        offset: usize,
        /// Number of stored elements
        len: usize,
    },

    /// The index consumes more dimensions than the array has
    #[error(
        "IndexError: too many indices for array: array is {ndim}-dimensional, but {given} were indexed"
    )]
    TooManyIndices {
        /// Dimensionality of the array
        ndim: usize,
        /// Dimensions consumed by the index
        given: usize,
    },

    /// Fancy-index arrays whose shapes cannot be broadcast together
    #[error("IndexError: shape mismatch: indexing arrays could not be broadcast together with shapes {shapes:?}")]
    IndexShapeMismatch {
        /// Shapes of the participating index arrays
        shapes: Vec<Vec<usize>>,
    },

    /// The update value cannot be broadcast to the selected region
    #[error("ShapeError: could not broadcast value of shape {from:?} into shape {to:?}")]
    BroadcastError {
        /// Shape of the update value
        from: Vec<usize>,
        /// Shape of the selection
        to: Vec<usize>,
    },

    /// Element type mismatch or failed conversion
    #[error("TypeError: {0}")]
    TypeError(String),

    /// Malformed index specification or array construction
    #[error("ArgumentError: {0}")]
    ArgumentError(String),

    /// Invalid configuration input
    #[error("ConfigError: {0}")]
    ConfigError(String),
}

impl IndexError {
    /// Create a bounds error for a coordinate on `axis`
    pub fn bounds_error(axis: usize, index: impl Into<i128>, size: usize) -> Self {
        IndexError::BoundsError {
            axis,
            index: index.into(),
            size,
        }
    }

    /// Create a bounds error for a linear offset
    pub fn offset_error(offset: usize, len: usize) -> Self {
        IndexError::OffsetOutOfBounds { offset, len }
    }

    /// Create a broadcast error
    pub fn broadcast_error(from: &[usize], to: &[usize]) -> Self {
        IndexError::BroadcastError {
            from: from.to_vec(),
            to: to.to_vec(),
        }
    }

    /// Create a type error
    pub fn type_error<S: Into<String>>(msg: S) -> Self {
        IndexError::TypeError(msg.into())
    }

    /// Create an argument error
    pub fn argument_error<S: Into<String>>(msg: S) -> Self {
        IndexError::ArgumentError(msg.into())
    }

    /// Create a config error
    pub fn config_error<S: Into<String>>(msg: S) -> Self {
        IndexError::ConfigError(msg.into())
    }

    /// True for both coordinate and offset bounds errors
    pub fn is_bounds_error(&self) -> bool {
        matches!(
            self,
            IndexError::BoundsError { .. } | IndexError::OffsetOutOfBounds { .. }
        )
    }

    /// True for errors about incompatible shapes
    pub fn is_shape_error(&self) -> bool {
        matches!(
            self,
            IndexError::BroadcastError { .. } | IndexError::IndexShapeMismatch { .. }
        )
    }
}

/// Result type alias for index operations
pub type IndexResult<T> = Result<T, IndexError>;
