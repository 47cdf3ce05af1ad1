//! CG (Conjugate Gradient) solver
//!
//! The Conjugate Gradient method for symmetric positive definite systems,
//! written purely in terms of [`VectorSpace`] and [`LinearOperator`]. It has
//! no knowledge of how vectors are stored and never allocates: the residual,
//! search direction and operator image live in a caller-owned [`CgWorkspace`].
//!
//! Using the accumulating convention `y ← y + a·A·x`, one iteration reads
//!
//! ```text
//! q     = A p
//! beta  = <p, q>
//! alpha = <p, r> / beta
//! x     = x + alpha p
//! r     = r - alpha q
//! gamma = <q, r> / beta
//! p     = r - gamma p
//! ```
//!
//! and the loop stops once `||p|| <= tolerance` (absolute) or after
//! `max_iterations` steps. Since `r` is orthogonal to the previous direction,
//! `||r|| <= ||p||`, so the criterion also bounds the true residual.

use crate::error::SolverError;
use crate::traits::{LinearOperator, RealField, VectorSpace};
use num_traits::{Float, One, Zero};

/// CG solver configuration
#[derive(Debug, Clone)]
pub struct CgConfig<R> {
    /// Maximum number of iterations
    pub max_iterations: usize,
    /// Absolute tolerance on the norm of the search direction
    pub tolerance: R,
    /// Print progress every N iterations (0 = no output)
    pub print_interval: usize,
}

impl Default for CgConfig<f64> {
    fn default() -> Self {
        Self {
            max_iterations: 2000,
            tolerance: 1e-6,
            print_interval: 0,
        }
    }
}

impl Default for CgConfig<f32> {
    fn default() -> Self {
        Self {
            max_iterations: 2000,
            tolerance: 1e-6,
            print_interval: 0,
        }
    }
}

/// Terminal state of a CG run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CgStatus {
    /// `||p|| <= tolerance` was reached
    Converged,
    /// The iteration cap was hit first; the solution is a best effort
    IterationCapReached,
}

/// CG solver result
///
/// The solution itself is written into the `x` passed to [`cg`].
#[derive(Debug, Clone)]
pub struct CgSolution<R> {
    /// How the iteration ended
    pub status: CgStatus,
    /// Number of iterations performed
    pub iterations: usize,
    /// Final norm of the search direction (the stopping quantity)
    pub residual: R,
    /// Norm of the initial residual `b - A x0`
    pub initial_residual: R,
}

impl<R> CgSolution<R> {
    /// Whether the tolerance was met
    pub fn converged(&self) -> bool {
        self.status == CgStatus::Converged
    }
}

/// Scratch vectors for [`cg`].
///
/// All three must be shape-compatible with the unknown. Their contents on
/// entry are irrelevant and are overwritten; after a solve, `residual` holds
/// `b - A x` for the returned `x`.
#[derive(Debug, Clone)]
pub struct CgWorkspace<V> {
    /// Residual `r = b - A x`
    pub residual: V,
    /// Search direction `p`
    pub direction: V,
    /// Operator image `A p`
    pub image: V,
}

impl<V> CgWorkspace<V> {
    /// Wrap three caller-allocated vectors
    pub fn new(residual: V, direction: V, image: V) -> Self {
        Self {
            residual,
            direction,
            image,
        }
    }

    /// Hand the vectors back to the caller
    pub fn into_parts(self) -> (V, V, V) {
        (self.residual, self.direction, self.image)
    }
}

/// Solve `A x = b` using the Conjugate Gradient method
///
/// `x` holds the initial guess on entry and the approximate solution on
/// return; `rhs` is left untouched. Failures of the vector operations (for
/// instance mismatched shapes) are propagated unchanged. Running out of
/// iterations is not an error: inspect [`CgSolution::status`].
///
/// Note: This method is only correct for symmetric positive definite operators.
pub fn cg<V, A>(
    operator: &A,
    rhs: &V,
    x: &mut V,
    workspace: &mut CgWorkspace<V>,
    config: &CgConfig<V::Scalar>,
) -> Result<CgSolution<V::Scalar>, V::Error>
where
    V: VectorSpace,
    V::Error: From<SolverError>,
    A: LinearOperator<V> + ?Sized,
{
    let tolerance = config.tolerance;
    if tolerance.is_nan() || tolerance < V::Scalar::zero() {
        return Err(SolverError::InvalidTolerance {
            tolerance: tolerance.to_f64_lossy(),
        }
        .into());
    }

    let one = V::Scalar::one();
    let CgWorkspace {
        residual: r,
        direction: p,
        image: q,
    } = workspace;

    // r = b - A x, p = r
    p.clear();
    r.clear();
    r.add_scaled(one, rhs)?;
    operator.apply_add(-one, x, r)?;
    p.add_scaled(one, r)?;

    let initial_residual = p.norm();
    if !initial_residual.is_finite() {
        return Err(SolverError::NonFiniteResidual { iteration: 0 }.into());
    }
    let mut error = initial_residual;
    let mut iterations = 0;

    while error > tolerance && iterations < config.max_iterations {
        q.clear();
        operator.apply_add(one, p, q)?;

        let beta = p.dot(q)?;
        if beta.is_zero() || !beta.is_finite() {
            return Err(SolverError::Breakdown {
                iteration: iterations,
                curvature: beta.to_f64_lossy(),
            }
            .into());
        }

        let alpha = p.dot(r)? / beta;
        x.add_scaled(alpha, p)?;
        r.add_scaled(-alpha, q)?;

        let gamma = q.dot(r)? / beta;
        p.scale(-gamma);
        p.add_scaled(one, r)?;

        error = p.norm();
        iterations += 1;
        if !error.is_finite() {
            return Err(SolverError::NonFiniteResidual {
                iteration: iterations,
            }
            .into());
        }

        if config.print_interval > 0 && iterations % config.print_interval == 0 {
            log::info!(
                "CG iteration {}: residual = {:.6e}",
                iterations,
                error.to_f64_lossy()
            );
        }
    }

    let status = if error <= tolerance {
        log::debug!(
            "CG converged in {} iterations (residual {:.3e})",
            iterations,
            error.to_f64_lossy()
        );
        CgStatus::Converged
    } else {
        log::warn!(
            "CG stopped after {} iterations without reaching tolerance {:.3e} (residual {:.3e})",
            iterations,
            tolerance.to_f64_lossy(),
            error.to_f64_lossy()
        );
        CgStatus::IterationCapReached
    };

    Ok(CgSolution {
        status,
        iterations,
        residual: error,
        initial_residual,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, Array2, array};

    fn workspace(n: usize) -> CgWorkspace<Array1<f64>> {
        CgWorkspace::new(Array1::zeros(n), Array1::zeros(n), Array1::zeros(n))
    }

    fn residual_norm(a: &Array2<f64>, x: &Array1<f64>, b: &Array1<f64>) -> f64 {
        (a.dot(x) - b).iter().map(|e| e * e).sum::<f64>().sqrt()
    }

    #[test]
    fn test_cg_spd() {
        let a = array![[4.0_f64, 1.0], [1.0, 3.0]];
        let b = array![1.0_f64, 2.0];
        let mut x = Array1::zeros(2);

        let config = CgConfig {
            max_iterations: 100,
            tolerance: 1e-10,
            print_interval: 0,
        };

        let solution = cg(&a, &b, &mut x, &mut workspace(2), &config).unwrap();

        assert!(solution.converged(), "CG should converge for SPD matrix");
        assert!(solution.iterations <= 2);
        assert!(residual_norm(&a, &x, &b) < 1e-8);
    }

    #[test]
    fn test_cg_identity() {
        let n = 5;
        let id: Array2<f64> = Array2::eye(n);
        let b = Array1::from_iter((1..=n).map(|i| i as f64));
        let mut x = Array1::zeros(n);

        let config = CgConfig {
            max_iterations: 10,
            tolerance: 1e-12,
            print_interval: 0,
        };

        let solution = cg(&id, &b, &mut x, &mut workspace(n), &config).unwrap();

        assert!(solution.converged());
        assert_eq!(solution.iterations, 1);

        let error: f64 = (&x - &b).iter().map(|e| e * e).sum::<f64>().sqrt();
        assert!(error < 1e-10);
    }

    #[test]
    fn test_cg_exact_initial_guess_takes_no_steps() {
        let a = array![[2.0_f64, 0.0], [0.0, 5.0]];
        let b = array![4.0_f64, 10.0];
        let mut x = array![2.0_f64, 2.0];

        let solution = cg(&a, &b, &mut x, &mut workspace(2), &CgConfig::default()).unwrap();

        assert!(solution.converged());
        assert_eq!(solution.iterations, 0);
        assert_eq!(solution.initial_residual, 0.0);
        assert_eq!(x, array![2.0, 2.0]);
    }

    #[test]
    fn test_cg_reports_iteration_cap() {
        // 1D Dirichlet Laplacian tridiag(-1, 2, -1): needs n steps in exact arithmetic
        let n = 30;
        let mut a = Array2::<f64>::zeros((n, n));
        for i in 0..n {
            a[[i, i]] = 2.0;
            if i > 0 {
                a[[i, i - 1]] = -1.0;
                a[[i - 1, i]] = -1.0;
            }
        }
        let b = Array1::from_elem(n, 1.0);
        let mut x = Array1::zeros(n);

        let config = CgConfig {
            max_iterations: 3,
            tolerance: 1e-12,
            print_interval: 1,
        };

        let solution = cg(&a, &b, &mut x, &mut workspace(n), &config).unwrap();

        assert_eq!(solution.status, CgStatus::IterationCapReached);
        assert!(!solution.converged());
        assert_eq!(solution.iterations, 3);
        assert!(solution.residual > 1e-12);
    }

    #[test]
    fn test_cg_leaves_rhs_and_keeps_residual() {
        let a = array![[3.0_f64, 1.0, 0.0], [1.0, 4.0, 1.0], [0.0, 1.0, 5.0]];
        let b = array![1.0_f64, -2.0, 3.0];
        let b_before = b.clone();
        let mut x = Array1::zeros(3);
        let mut work = workspace(3);

        let config = CgConfig {
            max_iterations: 50,
            tolerance: 1e-12,
            print_interval: 0,
        };
        cg(&a, &b, &mut x, &mut work, &config).unwrap();

        assert_eq!(b, b_before);
        let true_residual = &b - &a.dot(&x);
        for (r, t) in work.residual.iter().zip(true_residual.iter()) {
            assert!((r - t).abs() < 1e-10);
        }
    }

    #[test]
    fn test_cg_rejects_negative_tolerance() {
        let a: Array2<f64> = Array2::eye(2);
        let b = array![1.0_f64, 1.0];
        let mut x = Array1::zeros(2);
        let config = CgConfig {
            max_iterations: 10,
            tolerance: -1.0,
            print_interval: 0,
        };

        let err = cg(&a, &b, &mut x, &mut workspace(2), &config).unwrap_err();
        assert!(matches!(err, SolverError::InvalidTolerance { .. }));
    }

    #[test]
    fn test_cg_breakdown_on_singular_direction() {
        // A annihilates the initial residual direction
        let a = array![[0.0_f64, 0.0], [0.0, 1.0]];
        let b = array![1.0_f64, 0.0];
        let mut x = Array1::zeros(2);

        let err = cg(&a, &b, &mut x, &mut workspace(2), &CgConfig::default()).unwrap_err();
        assert!(err.is_breakdown());
    }

    #[test]
    fn test_cg_rejects_non_finite_rhs() {
        let a: Array2<f64> = Array2::eye(2);
        let b = array![f64::NAN, 1.0];
        let mut x = Array1::zeros(2);

        let err = cg(&a, &b, &mut x, &mut workspace(2), &CgConfig::default()).unwrap_err();
        assert_eq!(err, SolverError::NonFiniteResidual { iteration: 0 });
        assert_eq!(x, array![0.0, 0.0]);

        let b = array![f64::INFINITY, 1.0];
        let err = cg(&a, &b, &mut x, &mut workspace(2), &CgConfig::default()).unwrap_err();
        assert!(err.is_breakdown());
    }

    #[test]
    fn test_cg_dimension_mismatch_propagates() {
        let a: Array2<f64> = Array2::eye(3);
        let b = array![1.0_f64, 1.0];
        let mut x = Array1::zeros(3);

        let err = cg(&a, &b, &mut x, &mut workspace(3), &CgConfig::default()).unwrap_err();
        assert!(err.is_dimension_error());
    }
}
