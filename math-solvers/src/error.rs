//! Error types for the iterative solvers.
//!
//! Vector-operation failures belong to the vector representation and travel
//! through [`VectorSpace::Error`](crate::VectorSpace::Error); the variants here
//! cover what the solvers themselves and the dense adapters can detect.

use thiserror::Error;

/// Errors raised by the solvers and the dense `ndarray` adapters.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolverError {
    /// Two operands have different lengths.
    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Length of the left-hand operand
        expected: usize,
        /// Length of the right-hand operand
        actual: usize,
    },

    /// `<p, A p>` vanished or became non-finite, so the step length is undefined.
    #[error("CG breakdown at iteration {iteration}: <p, Ap> = {curvature:e}")]
    Breakdown {
        /// Iteration at which the breakdown occurred
        iteration: usize,
        /// The offending value of `<p, A p>`
        curvature: f64,
    },

    /// The residual norm is NaN or infinite (non-finite input data).
    #[error("non-finite residual at iteration {iteration}")]
    NonFiniteResidual {
        /// Iteration at which the residual was evaluated
        iteration: usize,
    },

    /// Tolerance is negative or NaN.
    #[error("invalid tolerance: {tolerance} (must be >= 0)")]
    InvalidTolerance {
        /// The rejected tolerance
        tolerance: f64,
    },
}

/// A specialized `Result` type for solver operations.
pub type Result<T> = std::result::Result<T, SolverError>;

impl SolverError {
    /// Returns `true` if the operands had incompatible shapes.
    pub fn is_dimension_error(&self) -> bool {
        matches!(self, SolverError::DimensionMismatch { .. })
    }

    /// Returns `true` if the iteration itself broke down.
    pub fn is_breakdown(&self) -> bool {
        matches!(
            self,
            SolverError::Breakdown { .. } | SolverError::NonFiniteResidual { .. }
        )
    }
}
