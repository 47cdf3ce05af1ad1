//! Iterative solvers for linear systems
//!
//! Krylov methods written against [`VectorSpace`](crate::VectorSpace) and
//! [`LinearOperator`](crate::LinearOperator):
//! - [`cg`]: Conjugate Gradient - for symmetric positive definite operators

mod cg;

pub use cg::{CgConfig, CgSolution, CgStatus, CgWorkspace, cg};
