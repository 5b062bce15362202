//! Error types for feature engine operations.
//!
//! Every failure the engine can report is a variant of [`EngineError`]. The
//! variants fall into three kinds (see [`ErrorKind`]): shape errors, invalid
//! parameters and unknown kernels. Degenerate numeric situations (period longer
//! than the series, zero RSI denominators) are defined outputs, not errors.

use thiserror::Error;

use crate::ohlcv::Field;

/// Result type alias for engine operations that may fail.
pub type Result<T> = core::result::Result<T, EngineError>;

/// Coarse classification of an [`EngineError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Input buffers or output columns have an unusable shape.
    Shape,
    /// A period or secondary parameter is out of range.
    InvalidParameter,
    /// The requested kernel name is not registered.
    UnknownKernel,
}

/// Errors that can occur while building inputs or running a pipeline.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum EngineError {
    /// A series buffer or series set has no rows.
    #[error("Empty series: length must be >= 1")]
    EmptySeries,

    /// A buffer length disagrees with the rest of the run.
    #[error("Series length mismatch for '{field}': expected {expected}, got {actual}")]
    LengthMismatch {
        /// Field (or view) whose length disagreed.
        field: String,
        /// Length shared by the run.
        expected: usize,
        /// Length that was supplied.
        actual: usize,
    },

    /// A kernel reads a field the series set does not contain.
    #[error("Kernel '{kernel}' requires field '{field}' which is not in the series set")]
    MissingField {
        /// Kernel that was requested.
        kernel: String,
        /// Field it needs.
        field: Field,
    },

    /// A caller named an input array that is not an OHLCV field.
    #[error("Unknown input field: '{0}'")]
    UnknownField(String),

    /// Matrix storage does not match the declared shape.
    #[error("Matrix shape mismatch: expected {expected} values, got {actual}")]
    MatrixShape {
        /// rows * cols.
        expected: usize,
        /// Values supplied.
        actual: usize,
    },

    /// Invalid parameter value.
    #[error("Invalid parameter '{name}': {value} (expected {expected})")]
    InvalidParameter {
        /// Name of the parameter.
        name: &'static str,
        /// Provided value as string.
        value: String,
        /// Description of expected value.
        expected: String,
    },

    /// Kernel name not present in the registry.
    #[error("Unknown kernel: '{0}'")]
    UnknownKernel(String),
}

impl EngineError {
    /// Create an invalid parameter error.
    #[must_use]
    pub fn invalid_parameter(
        name: &'static str,
        value: impl ToString,
        expected: impl Into<String>,
    ) -> Self {
        Self::InvalidParameter {
            name,
            value: value.to_string(),
            expected: expected.into(),
        }
    }

    /// Classify this error.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptySeries
            | Self::LengthMismatch { .. }
            | Self::MissingField { .. }
            | Self::UnknownField(_)
            | Self::MatrixShape { .. } => ErrorKind::Shape,
            Self::InvalidParameter { .. } => ErrorKind::InvalidParameter,
            Self::UnknownKernel(_) => ErrorKind::UnknownKernel,
        }
    }

    /// Returns `true` for shape errors.
    #[must_use]
    pub fn is_shape(&self) -> bool {
        self.kind() == ErrorKind::Shape
    }
}
