//! Matrix-free finite-difference Poisson solver on the unit square
//!
//! This crate discretises `-Δu = f` on `[0,1]²` with Dirichlet data using the
//! standard 5-point stencil on a uniform grid and solves the resulting
//! symmetric positive definite system with Conjugate Gradient, without ever
//! assembling a matrix.
//!
//! # Features
//!
//! - **Grid functions**: `(n+2)²` samples with a boundary ring that carries
//!   Dirichlet data, vector operations on the interior only
//! - **Stencil operator**: [`Laplacian`] plugs into the generic CG of
//!   `math-fdm-solvers`
//! - **Output**: gnuplot-ready text frames
//! - **Parallel sweeps**: enable the `rayon` feature for large grids
//!
//! # Example
//!
//! ```
//! use math_fdm::{GridFunction, SolverSettings, apply_laplacian, solve_poisson};
//! use solvers::VectorSpace;
//!
//! let n = 16;
//! let mut exact = GridFunction::<f64>::new(n)?;
//! exact.init_interior(|x, y| x * (1.0 - x) * y * (1.0 - y));
//!
//! let mut rhs = GridFunction::new(n)?;
//! apply_laplacian(1.0, &exact, &mut rhs)?;
//!
//! let mut x = GridFunction::new(n)?;
//! let settings = SolverSettings { tolerance: 1e-10, ..Default::default() };
//! let solution = solve_poisson(&rhs, &mut x, &settings)?;
//! assert!(solution.converged);
//!
//! x.add_scaled(-1.0, &exact)?;
//! assert!(x.norm() < 1e-8);
//! # Ok::<(), math_fdm::FdmError>(())
//! ```

pub mod config;
pub mod error;
pub mod grid;
pub mod io;
pub mod laplace;
pub mod solver;

pub use config::{GridConfig, OutputConfig, PoissonConfig, SolverSettings};
pub use error::{FdmError, Result};
pub use grid::GridFunction;
pub use io::{frame_path, save_to_file, write_frame, write_frame_in, write_grid};
pub use laplace::{Laplacian, apply_laplacian};
pub use solver::{
    PoissonWorkspace, Solution, residual_norm, solve_poisson, solve_poisson_with, workspace,
};

/// Library version
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
