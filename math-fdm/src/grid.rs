//! Grid functions on the unit square
//!
//! A [`GridFunction`] samples a scalar field on the uniform
//! `(n+2) × (n+2)` point grid covering `[0,1]²`: `n` interior points per axis
//! plus one boundary layer on each side, with mesh width `h = 1/(n+1)`.
//!
//! Values are stored in an owned `Array2` indexed `[[i, j]]`, where `i` is the
//! x-index and `j` the y-index, so point `(i, j)` sits at `(i·h, j·h)`.
//! Indices `0` and `n+1` along either axis form the boundary ring, `1..=n`
//! the interior. All linear-algebra primitives (the [`VectorSpace`] impl and
//! [`GridFunction::copy_from`]) act on interior points only; boundary values
//! are only written by [`GridFunction::init_boundary`] or direct indexing.

use crate::error::{FdmError, Result};
use ndarray::{Array2, ArrayView2, ArrayViewMut2, Zip, s};
use solvers::{RealField, VectorSpace};
use std::ops::{Index, IndexMut};

/// Interior point count from which sweeps go parallel (feature `rayon`)
#[cfg(feature = "rayon")]
pub const PARALLEL_THRESHOLD: usize = 256 * 256;

/// Scalar field sampled on the `(n+2) × (n+2)` grid of the unit square
#[derive(Debug, Clone, PartialEq)]
pub struct GridFunction<T: RealField = f64> {
    /// Interior points per axis
    n: usize,
    /// Mesh width `1/(n+1)`
    h: T,
    /// All grid values, boundary included
    values: Array2<T>,
}

impl<T: RealField> GridFunction<T> {
    /// Create a zero-filled grid function with `n` interior points per axis.
    ///
    /// Fails with [`FdmError::InvalidSize`] for `n == 0` and with
    /// [`FdmError::AllocationFailure`] if `(n+2)²` values cannot be stored.
    pub fn new(n: usize) -> Result<Self> {
        if n == 0 {
            return Err(FdmError::InvalidSize { n });
        }

        let side = n
            .checked_add(2)
            .ok_or(FdmError::AllocationFailure { n })?;
        let len = side
            .checked_mul(side)
            .ok_or(FdmError::AllocationFailure { n })?;

        let mut storage = Vec::new();
        storage
            .try_reserve_exact(len)
            .map_err(|_| FdmError::AllocationFailure { n })?;
        storage.resize(len, T::zero());

        let values = Array2::from_shape_vec((side, side), storage)
            .map_err(|_| FdmError::AllocationFailure { n })?;

        Ok(Self {
            n,
            h: T::from_f64_lossy(1.0 / (n as f64 + 1.0)),
            values,
        })
    }

    /// Interior points per axis
    #[inline]
    pub fn n(&self) -> usize {
        self.n
    }

    /// Mesh width
    #[inline]
    pub fn h(&self) -> T {
        self.h
    }

    /// Total number of stored points, `(n+2)²`
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Always `false`: a grid has at least one interior point
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Physical coordinate `i·h` of grid index `i` (along either axis)
    #[inline]
    pub fn coordinate(&self, i: usize) -> T {
        T::from_f64_lossy(i as f64) * self.h
    }

    /// Whether `other` has the same resolution (and therefore the same `h`)
    #[inline]
    pub fn same_shape(&self, other: &Self) -> bool {
        self.n == other.n
    }

    /// Fail with [`FdmError::ShapeMismatch`] unless `other` matches this grid.
    #[inline]
    pub fn check_shape(&self, other: &Self) -> Result<()> {
        if !self.same_shape(other) {
            return Err(FdmError::ShapeMismatch {
                expected: self.n,
                actual: other.n,
            });
        }
        Ok(())
    }

    /// All values, boundary included
    pub fn values(&self) -> ArrayView2<'_, T> {
        self.values.view()
    }

    /// Interior values, indices `1..=n` on both axes
    pub fn interior(&self) -> ArrayView2<'_, T> {
        let n = self.n;
        self.values.slice(s![1..=n, 1..=n])
    }

    /// Mutable interior values, indices `1..=n` on both axes
    pub fn interior_mut(&mut self) -> ArrayViewMut2<'_, T> {
        let n = self.n;
        self.values.slice_mut(s![1..=n, 1..=n])
    }

    /// Overwrite the interior with the interior of `source`.
    ///
    /// The boundary of `self` is left untouched.
    pub fn copy_from(&mut self, source: &Self) -> Result<()> {
        self.check_shape(source)?;
        self.interior_mut().assign(&source.interior());
        Ok(())
    }

    /// Set every interior point to `f(x, y)` at its physical coordinate.
    pub fn init_interior<F>(&mut self, f: F)
    where
        F: Fn(T, T) -> T,
    {
        let h = self.h;
        let coord = move |k: usize| T::from_f64_lossy(k as f64) * h;
        Zip::indexed(self.interior_mut()).for_each(|(i, j), v| {
            *v = f(coord(i + 1), coord(j + 1));
        });
    }

    /// Set every boundary point to `f(x, y)` at its physical coordinate.
    ///
    /// Interior values are left untouched.
    pub fn init_boundary<F>(&mut self, f: F)
    where
        F: Fn(T, T) -> T,
    {
        let last = self.n + 1;
        let edge = self.coordinate(last);
        for j in 1..last {
            let y = self.coordinate(j);
            self.values[[0, j]] = f(T::zero(), y);
            self.values[[last, j]] = f(edge, y);
        }
        for i in 0..=last {
            let x = self.coordinate(i);
            self.values[[i, 0]] = f(x, T::zero());
            self.values[[i, last]] = f(x, edge);
        }
    }

    #[cfg(feature = "rayon")]
    #[inline]
    fn interior_points(&self) -> usize {
        self.n * self.n
    }
}

impl<T: RealField> Index<(usize, usize)> for GridFunction<T> {
    type Output = T;

    #[inline]
    fn index(&self, (i, j): (usize, usize)) -> &T {
        &self.values[[i, j]]
    }
}

impl<T: RealField> IndexMut<(usize, usize)> for GridFunction<T> {
    #[inline]
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut T {
        &mut self.values[[i, j]]
    }
}

impl<T: RealField> VectorSpace for GridFunction<T> {
    type Scalar = T;
    type Error = FdmError;

    fn add_scaled(&mut self, a: T, x: &Self) -> Result<()> {
        self.check_shape(x)?;
        #[cfg(feature = "rayon")]
        {
            if self.interior_points() >= PARALLEL_THRESHOLD {
                Zip::from(self.interior_mut())
                    .and(x.interior())
                    .par_for_each(|y, &xv| *y += a * xv);
                return Ok(());
            }
        }
        Zip::from(self.interior_mut())
            .and(x.interior())
            .for_each(|y, &xv| *y += a * xv);
        Ok(())
    }

    fn scale(&mut self, a: T) {
        #[cfg(feature = "rayon")]
        {
            if self.interior_points() >= PARALLEL_THRESHOLD {
                self.interior_mut().par_mapv_inplace(|v| v * a);
                return;
            }
        }
        self.interior_mut().mapv_inplace(|v| v * a);
    }

    fn clear(&mut self) {
        self.interior_mut().fill(T::zero());
    }

    fn dot(&self, other: &Self) -> Result<T> {
        self.check_shape(other)?;
        Ok(Zip::from(self.interior())
            .and(other.interior())
            .fold(T::zero(), |acc, &u, &v| acc + u * v))
    }

    fn norm(&self) -> T {
        self.interior()
            .fold(T::zero(), |acc, &u| acc + u * u)
            .sqrt()
    }
}
