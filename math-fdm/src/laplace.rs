//! Matrix-free 5-point discrete Laplacian
//!
//! At every interior point `(i, j)` the negative discrete Laplacian is
//!
//! ```text
//! (-Δh u)[i,j] = (4 u[i,j] - u[i+1,j] - u[i-1,j] - u[i,j+1] - u[i,j-1]) / h²
//! ```
//!
//! Neighbours of edge-adjacent interior points are boundary values of `u`, so
//! the boundary ring of the input enters the result while the boundary of the
//! output is never written. No matrix is ever assembled: each application is
//! one O(n²) sweep over shifted views of the input.

use crate::error::Result;
use crate::grid::GridFunction;
use ndarray::{Zip, s};
use solvers::{LinearOperator, RealField};

/// The negative discrete Laplacian `-Δh` on the unit square.
///
/// As a [`LinearOperator`] it plugs straight into [`solvers::cg`]. It carries
/// no data: the mesh width is read from the grid functions it acts on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Laplacian;

impl<T: RealField> LinearOperator<GridFunction<T>> for Laplacian {
    #[inline]
    fn apply_add(&self, a: T, x: &GridFunction<T>, y: &mut GridFunction<T>) -> Result<()> {
        apply_laplacian(a, x, y)
    }
}

/// Accumulate `v ← v + a·(-Δh)·u` on the interior of `v`.
///
/// `v` is not cleared first. Both grid functions must share `n` (and hence
/// `h`); otherwise [`ShapeMismatch`](crate::FdmError::ShapeMismatch) is
/// returned before any value is read or written.
pub fn apply_laplacian<T: RealField>(
    a: T,
    u: &GridFunction<T>,
    v: &mut GridFunction<T>,
) -> Result<()> {
    // h is derived from n, so matching n means matching h
    u.check_shape(v)?;

    let n = u.n();
    let h = u.h();
    let factor = a / (h * h);
    let four = T::from_f64_lossy(4.0);

    let values = u.values();
    let centre = values.slice(s![1..=n, 1..=n]);
    let east = values.slice(s![2..n + 2, 1..=n]);
    let west = values.slice(s![0..n, 1..=n]);
    let north = values.slice(s![1..=n, 2..n + 2]);
    let south = values.slice(s![1..=n, 0..n]);

    let sweep = Zip::from(v.interior_mut())
        .and(centre)
        .and(east)
        .and(west)
        .and(north)
        .and(south);

    #[cfg(feature = "rayon")]
    {
        if n * n >= crate::grid::PARALLEL_THRESHOLD {
            sweep.par_for_each(|y, &c, &e, &w, &nn, &s| {
                *y += factor * (four * c - e - w - nn - s);
            });
            return Ok(());
        }
    }

    sweep.for_each(|y, &c, &e, &w, &nn, &s| {
        *y += factor * (four * c - e - w - nn - s);
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use solvers::VectorSpace;

    #[test]
    fn test_impulse_gives_hand_checkable_stencil() {
        let n = 3;
        let mut u = GridFunction::<f64>::new(n).unwrap();
        let mut v = GridFunction::<f64>::new(n).unwrap();
        u[(2, 2)] = 1.0;

        apply_laplacian(1.0, &u, &mut v).unwrap();

        let inv_h2 = 16.0;
        assert_relative_eq!(v[(2, 2)], 4.0 * inv_h2);
        for (i, j) in [(1, 2), (3, 2), (2, 1), (2, 3)] {
            assert_relative_eq!(v[(i, j)], -inv_h2);
        }
        for (i, j) in [(1, 1), (1, 3), (3, 1), (3, 3)] {
            assert_eq!(v[(i, j)], 0.0);
        }
    }

    #[test]
    fn test_accumulates_instead_of_overwriting() {
        let mut u = GridFunction::<f64>::new(3).unwrap();
        u[(2, 2)] = 1.0;
        let mut v = GridFunction::<f64>::new(3).unwrap();
        v.init_interior(|_, _| 1.0);

        apply_laplacian(0.5, &u, &mut v).unwrap();

        assert_relative_eq!(v[(2, 2)], 1.0 + 0.5 * 64.0);
        assert_relative_eq!(v[(1, 1)], 1.0);
    }

    #[test]
    fn test_boundary_of_input_feeds_edge_points() {
        let n = 2;
        let mut u = GridFunction::<f64>::new(n).unwrap();
        u.init_boundary(|_, _| 1.0);
        let mut v = GridFunction::<f64>::new(n).unwrap();

        apply_laplacian(1.0, &u, &mut v).unwrap();

        // every interior point of a 2x2 grid touches exactly two boundary points
        let inv_h2 = 9.0;
        for i in 1..=n {
            for j in 1..=n {
                assert_relative_eq!(v[(i, j)], -2.0 * inv_h2, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn test_output_boundary_is_never_written() {
        let mut u = GridFunction::<f64>::new(4).unwrap();
        u.init_interior(|x, y| x * x + y);
        u.init_boundary(|x, y| x - y);
        let mut v = GridFunction::<f64>::new(4).unwrap();
        v.init_boundary(|_, _| 42.0);

        apply_laplacian(-3.0, &u, &mut v).unwrap();

        for k in 0..=5 {
            assert_eq!(v[(0, k)], 42.0);
            assert_eq!(v[(5, k)], 42.0);
            assert_eq!(v[(k, 0)], 42.0);
            assert_eq!(v[(k, 5)], 42.0);
        }
    }

    #[test]
    fn test_operator_trait_matches_free_function() {
        let mut u = GridFunction::<f64>::new(5).unwrap();
        u.init_interior(|x, y| (x * 3.0).sin() * y);
        let mut v1 = GridFunction::<f64>::new(5).unwrap();
        let mut v2 = GridFunction::<f64>::new(5).unwrap();

        apply_laplacian(2.0, &u, &mut v1).unwrap();
        Laplacian.apply_add(2.0, &u, &mut v2).unwrap();

        assert_eq!(v1, v2);
        assert!(v1.norm() > 0.0);
    }

    #[test]
    fn test_shape_mismatch_leaves_output_alone() {
        let mut u = GridFunction::<f64>::new(3).unwrap();
        u.init_interior(|_, _| 1.0);
        let mut v = GridFunction::<f64>::new(4).unwrap();
        v.init_interior(|_, _| 7.0);
        let before = v.clone();

        let err = apply_laplacian(1.0, &u, &mut v).unwrap_err();
        assert!(err.is_shape_error());
        assert_eq!(v, before);
    }
}
