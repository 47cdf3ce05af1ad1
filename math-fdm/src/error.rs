//! Error types for grid functions and the finite-difference driver.

use solvers::SolverError;
use thiserror::Error;

/// Errors that can occur while building or operating on grid functions.
#[derive(Debug, Error)]
pub enum FdmError {
    /// Two grid functions with different resolution met in one operation.
    #[error("shape mismatch: expected n = {expected}, got n = {actual}")]
    ShapeMismatch {
        /// Interior points per axis of the left-hand operand
        expected: usize,
        /// Interior points per axis of the right-hand operand
        actual: usize,
    },

    /// A grid needs at least one interior point per axis.
    #[error("invalid grid size: n = {n} (must be >= 1)")]
    InvalidSize {
        /// The rejected number of interior points
        n: usize,
    },

    /// Storage for the grid could not be obtained.
    #[error("cannot allocate a grid function with n = {n} interior points per axis")]
    AllocationFailure {
        /// Requested number of interior points per axis
        n: usize,
    },

    /// Writing grid data failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A configuration file could not be parsed or written.
    #[error("configuration error: {0}")]
    Config(#[from] serde_json::Error),

    /// A configuration value is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Failure reported by the iterative solver.
    #[error(transparent)]
    Solver(#[from] SolverError),
}

/// A specialized `Result` type for finite-difference operations.
pub type Result<T> = std::result::Result<T, FdmError>;

impl FdmError {
    /// Returns `true` if this is a shape mismatch between two grid functions.
    pub fn is_shape_error(&self) -> bool {
        matches!(self, FdmError::ShapeMismatch { .. })
    }

    /// Returns `true` if the grid could not be created.
    pub fn is_allocation_error(&self) -> bool {
        matches!(
            self,
            FdmError::AllocationFailure { .. } | FdmError::InvalidSize { .. }
        )
    }

    /// Returns `true` if this is a configuration error.
    pub fn is_config_error(&self) -> bool {
        matches!(self, FdmError::Config(_) | FdmError::InvalidConfig(_))
    }
}
