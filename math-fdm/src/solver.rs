//! Poisson solves on grid functions
//!
//! Thin layer over [`solvers::cg`] with the [`Laplacian`] as operator. It
//! allocates the scratch grid functions, times the run and summarises it.
//!
//! The boundary ring of the unknown carries the Dirichlet data: the solve
//! only ever updates interior values, and the right-hand side's boundary is
//! ignored.

use crate::config::SolverSettings;
use crate::error::Result;
use crate::grid::GridFunction;
use crate::laplace::{Laplacian, apply_laplacian};
use solvers::{CgSolution, CgStatus, CgWorkspace, RealField, VectorSpace, cg};
use std::time::{Duration, Instant};

/// Scratch grid functions for CG on an `n × n` interior
pub type PoissonWorkspace<T = f64> = CgWorkspace<GridFunction<T>>;

/// Allocate the three scratch grid functions CG needs.
pub fn workspace<T: RealField>(n: usize) -> Result<PoissonWorkspace<T>> {
    Ok(CgWorkspace::new(
        GridFunction::new(n)?,
        GridFunction::new(n)?,
        GridFunction::new(n)?,
    ))
}

/// Summary of a Poisson solve
#[derive(Debug, Clone)]
pub struct Solution<T> {
    /// Number of CG iterations
    pub iterations: usize,
    /// Final CG stopping quantity (norm of the search direction)
    pub residual: T,
    /// Norm of the initial residual
    pub initial_residual: T,
    /// Whether the tolerance was met
    pub converged: bool,
    /// Wall-clock time of the solve
    pub elapsed: Duration,
}

impl<T> From<(CgSolution<T>, Duration)> for Solution<T> {
    fn from((cg, elapsed): (CgSolution<T>, Duration)) -> Self {
        Self {
            iterations: cg.iterations,
            residual: cg.residual,
            initial_residual: cg.initial_residual,
            converged: cg.status == CgStatus::Converged,
            elapsed,
        }
    }
}

/// Solve `-Δh x = rhs` with CG, reusing caller-provided scratch space.
///
/// `x` holds the initial guess on entry (its boundary ring is the Dirichlet
/// data) and the approximate solution on return.
pub fn solve_poisson_with<T: RealField>(
    rhs: &GridFunction<T>,
    x: &mut GridFunction<T>,
    workspace: &mut PoissonWorkspace<T>,
    settings: &SolverSettings,
) -> Result<Solution<T>> {
    rhs.check_shape(x)?;

    if settings.verbosity > 0 {
        log::info!(
            "[FDM] System: {} x {} interior points, h = {:.3e}, tolerance {:.1e}",
            x.n(),
            x.n(),
            x.h().to_f64_lossy(),
            settings.tolerance
        );
    }

    let start = Instant::now();
    let result = cg(&Laplacian, rhs, x, workspace, &settings.cg_config())?;
    let solution = Solution::from((result, start.elapsed()));

    if settings.verbosity > 0 {
        log::info!(
            "[FDM] Solve: {} iters, residual {:.2e}, converged {}, time {:.1}ms",
            solution.iterations,
            solution.residual.to_f64_lossy(),
            solution.converged,
            solution.elapsed.as_secs_f64() * 1000.0
        );
    }

    Ok(solution)
}

/// Solve `-Δh x = rhs` with CG, allocating the scratch space.
pub fn solve_poisson<T: RealField>(
    rhs: &GridFunction<T>,
    x: &mut GridFunction<T>,
    settings: &SolverSettings,
) -> Result<Solution<T>> {
    let mut work = workspace(x.n())?;
    solve_poisson_with(rhs, x, &mut work, settings)
}

/// Norm of the true residual `rhs - (-Δh) x` on the interior.
pub fn residual_norm<T: RealField>(rhs: &GridFunction<T>, x: &GridFunction<T>) -> Result<T> {
    let mut r = GridFunction::new(x.n())?;
    r.add_scaled(T::one(), rhs)?;
    apply_laplacian(-T::one(), x, &mut r)?;
    Ok(r.norm())
}
