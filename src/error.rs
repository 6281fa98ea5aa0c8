//! Error types for matadapt

use std::ops::Range;

use thiserror::Error;

use crate::precond::{ApplyMode, VectorKind};

/// Result type alias using [`AdapterError`]
pub type Result<T> = std::result::Result<T, AdapterError>;

/// Errors reported by the adapters and the in-memory matrix
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AdapterError {
    /// A caller-supplied output buffer cannot hold the extraction
    #[error("Output buffer '{buffer}' too small: need {required}, got {actual}")]
    BufferTooSmall {
        /// Which buffer was undersized
        buffer: &'static str,
        /// Minimum length required
        required: usize,
        /// Length supplied
        actual: usize,
    },

    /// The wrapped operator cannot be applied in this mode
    #[error("Apply mode {0:?} is not supported by this operator")]
    UnsupportedMode(ApplyMode),

    /// A vector handle could not be converted to the representation required
    #[error("Vector kind mismatch: expected {expected:?}, found {found:?}")]
    VectorKindMismatch {
        /// Representation the operator needs
        expected: VectorKind,
        /// Representation of the supplied handle
        found: VectorKind,
    },

    /// Operand shapes do not line up
    #[error("Shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        /// Expected shape
        expected: Vec<usize>,
        /// Actual shape
        got: Vec<usize>,
    },

    /// Global row is not owned by the calling rank
    #[error("Global row {row} is not owned by this rank (owned: {range:?})")]
    RowNotOwned {
        /// Offending global row
        row: usize,
        /// Rows owned by this rank
        range: Range<usize>,
    },

    /// Column index is outside the matrix
    #[error("Column index {col} out of bounds (n_cols = {n_cols})")]
    ColumnOutOfBounds {
        /// Offending column
        col: usize,
        /// Number of global columns
        n_cols: usize,
    },

    /// Index and value slices passed together have different lengths
    #[error("Length mismatch: {cols} column indices but {vals} values")]
    LengthMismatch {
        /// Number of indices
        cols: usize,
        /// Number of values
        vals: usize,
    },

    /// A row received more distinct entries than it was allocated for
    #[error("Row {row} exceeds its allocation of {max} entries")]
    RowCapacityExceeded {
        /// Offending global row
        row: usize,
        /// Allocated entries per row
        max: usize,
    },

    /// A value update does not match the finalized sparsity pattern
    #[error("Structure of row {row} does not match the finalized matrix")]
    StructureMismatch {
        /// Offending local row
        row: usize,
    },

    /// In-place update requested while the matrix handle is shared
    #[error("Matrix is shared with other handles and cannot be updated in place")]
    SharedMatrix,

    /// Failure reported by the wrapped multigrid hierarchy
    #[error("Multigrid hierarchy failed: {0}")]
    Hierarchy(String),
}
