//! Core traits for matrix-free linear algebra
//!
//! This module defines the abstractions the iterative solvers are written against:
//! - [`RealField`]: Trait for the real scalar types (f64 and f32)
//! - [`VectorSpace`]: Elementwise primitives on a vector representation
//! - [`LinearOperator`]: Accumulating operator application `y ← y + a·A·x`
//!
//! The solvers never look inside a vector. Everything they need is expressed
//! through these traits, so a grid function, a plain `Array1` or any other
//! container can be solved for as long as it implements [`VectorSpace`].

use num_traits::{Float, FromPrimitive, NumAssign, ToPrimitive};
use std::fmt::Debug;

/// Trait for real scalar types usable in the solvers.
///
/// Implemented for `f64` (the default everywhere) and `f32` for
/// memory-constrained runs.
pub trait RealField:
    Float + NumAssign + FromPrimitive + ToPrimitive + Send + Sync + Debug + Default + 'static
{
    /// Convert from an `f64` constant.
    ///
    /// Every `f64` is representable (possibly rounded) in both implementors,
    /// so this never fails.
    fn from_f64_lossy(v: f64) -> Self;

    /// Widen to `f64` for logging and reporting.
    fn to_f64_lossy(self) -> f64;
}

impl RealField for f64 {
    #[inline]
    fn from_f64_lossy(v: f64) -> Self {
        v
    }

    #[inline]
    fn to_f64_lossy(self) -> f64 {
        self
    }
}

impl RealField for f32 {
    #[inline]
    fn from_f64_lossy(v: f64) -> Self {
        v as f32
    }

    #[inline]
    fn to_f64_lossy(self) -> f64 {
        self as f64
    }
}

/// Vector-space primitives required by the Krylov solvers.
///
/// All operations mutate in place; nothing here allocates. Binary operations
/// must validate that both operands are compatible before touching any value
/// and report a mismatch through [`VectorSpace::Error`].
pub trait VectorSpace {
    /// Scalar field of the vector space
    type Scalar: RealField;

    /// Error raised by binary operations on incompatible operands
    type Error;

    /// `self ← self + a·x`
    fn add_scaled(&mut self, a: Self::Scalar, x: &Self) -> Result<(), Self::Error>;

    /// `self ← a·self`
    fn scale(&mut self, a: Self::Scalar);

    /// `self ← 0`
    fn clear(&mut self);

    /// Inner product `<self, other>`
    fn dot(&self, other: &Self) -> Result<Self::Scalar, Self::Error>;

    /// Euclidean norm `sqrt(<self, self>)`
    fn norm(&self) -> Self::Scalar;
}

/// Trait for linear operators applied without assembling a matrix.
///
/// The implementing value carries whatever auxiliary data the operator needs
/// (mesh parameters, coefficients, a stored matrix); it is the solver's
/// "context" and is only ever borrowed immutably.
pub trait LinearOperator<V: VectorSpace> {
    /// Accumulate the operator image: `y ← y + a·A·x`
    ///
    /// `y` is not cleared first. Callers wanting `y = A·x` clear it beforehand.
    fn apply_add(&self, a: V::Scalar, x: &V, y: &mut V) -> Result<(), V::Error>;
}
