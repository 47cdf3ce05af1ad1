//! Dense `ndarray` adapters
//!
//! Implements [`VectorSpace`] for `Array1<T>` and [`LinearOperator`] for
//! `Array2<T>`, so the matrix-free solvers can also be run on small assembled
//! systems (handy for validating an operator against its explicit matrix).

use crate::error::SolverError;
use crate::traits::{LinearOperator, RealField, VectorSpace};
use ndarray::{Array1, Array2, Zip};

fn check_len(expected: usize, actual: usize) -> Result<(), SolverError> {
    if expected != actual {
        return Err(SolverError::DimensionMismatch { expected, actual });
    }
    Ok(())
}

impl<T: RealField> VectorSpace for Array1<T> {
    type Scalar = T;
    type Error = SolverError;

    #[inline]
    fn add_scaled(&mut self, a: T, x: &Self) -> Result<(), SolverError> {
        check_len(self.len(), x.len())?;
        self.scaled_add(a, x);
        Ok(())
    }

    #[inline]
    fn scale(&mut self, a: T) {
        self.mapv_inplace(|v| v * a);
    }

    #[inline]
    fn clear(&mut self) {
        self.fill(T::zero());
    }

    #[inline]
    fn dot(&self, other: &Self) -> Result<T, SolverError> {
        check_len(self.len(), other.len())?;
        Ok(Zip::from(self)
            .and(other)
            .fold(T::zero(), |acc, &x, &y| acc + x * y))
    }

    #[inline]
    fn norm(&self) -> T {
        self.iter().fold(T::zero(), |acc, &x| acc + x * x).sqrt()
    }
}

impl<T: RealField> LinearOperator<Array1<T>> for Array2<T> {
    fn apply_add(&self, a: T, x: &Array1<T>, y: &mut Array1<T>) -> Result<(), SolverError> {
        check_len(self.ncols(), x.len())?;
        check_len(self.nrows(), y.len())?;
        for (yi, row) in y.iter_mut().zip(self.rows()) {
            let ax = Zip::from(&row)
                .and(x)
                .fold(T::zero(), |acc, &aij, &xj| acc + aij * xj);
            *yi += a * ax;
        }
        Ok(())
    }
}
