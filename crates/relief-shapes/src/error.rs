//! Error types for shape construction and use.

use thiserror::Error;

/// Errors raised while building or using a shape.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ShapeError {
    /// A required scene parameter was not supplied.
    #[error("missing required parameter \"{0}\"")]
    MissingParameter(&'static str),

    /// Grid resolution must be at least 2 samples per axis, with a sample
    /// count that does not overflow.
    #[error("invalid grid resolution {nx}x{ny}: both axes need at least 2 samples and the sample count must fit in memory")]
    InvalidResolution {
        /// Samples along x.
        nx: i64,
        /// Samples along y.
        ny: i64,
    },

    /// The elevation array does not hold one sample per grid vertex.
    #[error("expected {expected} elevation samples, got {actual}")]
    SampleCountMismatch {
        /// `nx * ny`.
        expected: usize,
        /// Length of the supplied array.
        actual: usize,
    },

    /// An elevation sample is NaN or infinite.
    #[error("elevation sample {index} is not finite")]
    NonFiniteSample {
        /// Row-major index of the sample.
        index: usize,
    },

    /// The shape cannot be decomposed into simpler primitives.
    #[error("{0} shapes intersect directly and cannot be refined")]
    RefineUnsupported(&'static str),
}

/// Result type for shape operations.
pub type Result<T> = std::result::Result<T, ShapeError>;
