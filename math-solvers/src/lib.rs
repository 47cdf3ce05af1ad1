//! Operator-agnostic iterative solvers
//!
//! This crate provides Krylov solvers that never look at the representation
//! of the vectors they iterate on. A solver only sees two capabilities:
//!
//! - [`VectorSpace`]: add-scaled, scale, clear, dot product and norm
//! - [`LinearOperator`]: the accumulating product `y ← y + a·A·x`
//!
//! so the same routine serves a matrix-free stencil on a grid function, a
//! dense `ndarray` matrix, or anything else implementing both traits. All
//! storage (unknown, right-hand side and scratch vectors) belongs to the
//! caller; the solvers never allocate.
//!
//! # Example
//!
//! ```
//! use math_fdm_solvers::{CgConfig, CgWorkspace, cg};
//! use ndarray::{Array1, array};
//!
//! let a = array![[4.0_f64, 1.0], [1.0, 3.0]];
//! let b = array![1.0_f64, 2.0];
//! let mut x = Array1::zeros(2);
//! let mut work = CgWorkspace::new(Array1::zeros(2), Array1::zeros(2), Array1::zeros(2));
//!
//! let solution = cg(&a, &b, &mut x, &mut work, &CgConfig::default()).unwrap();
//! assert!(solution.converged());
//! ```

pub mod dense;
pub mod error;
pub mod iterative;
pub mod traits;

pub use error::SolverError;
pub use traits::{LinearOperator, RealField, VectorSpace};

pub use iterative::{CgConfig, CgSolution, CgStatus, CgWorkspace, cg};
