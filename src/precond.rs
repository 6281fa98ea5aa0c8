//! Operator interface for iterative solvers, and a multigrid preconditioner
//! exposed through it
//!
//! An iterative solver sees every operator (the system matrix, a
//! preconditioner) as something that maps a multivector `x` to `y`. The
//! solver hands over generic [`MultiVec`] handles; each operator converts
//! them to the representation it needs with [`MultiVec::try_dense`], which
//! fails with [`AdapterError::VectorKindMismatch`] instead of proceeding on a
//! handle it cannot use.

use std::fmt;
use std::sync::Arc;

use ndarray::{Array2, ArrayView2, ArrayViewMut2};
use num_traits::Zero;
use sprs::CsMat;
use tracing::debug;

use crate::error::{AdapterError, Result};

/// How an operator is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApplyMode {
    /// y = A x
    NoTranspose,
    /// y = Aᵀ x
    Transpose,
    /// y = Aᴴ x
    ConjugateTranspose,
}

/// Storage representation behind a [`MultiVec`] handle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VectorKind {
    /// Column-major or row-major dense block (`ndarray`)
    Dense,
    /// Compressed sparse block (`sprs`)
    Sparse,
}

/// A block of vectors handed to an [`Operator`]
///
/// Rows index vector entries, columns index the individual vectors.
pub trait MultiVec<T> {
    fn kind(&self) -> VectorKind;

    /// (entries per vector, number of vectors)
    fn shape(&self) -> (usize, usize);

    /// Borrows the block as a dense array, if it is one
    fn try_dense(&self) -> Result<ArrayView2<'_, T>>;

    /// Mutable counterpart of [`try_dense`](Self::try_dense)
    fn try_dense_mut(&mut self) -> Result<ArrayViewMut2<'_, T>>;
}

impl<T> MultiVec<T> for Array2<T> {
    fn kind(&self) -> VectorKind {
        VectorKind::Dense
    }

    fn shape(&self) -> (usize, usize) {
        self.dim()
    }

    fn try_dense(&self) -> Result<ArrayView2<'_, T>> {
        Ok(self.view())
    }

    fn try_dense_mut(&mut self) -> Result<ArrayViewMut2<'_, T>> {
        Ok(self.view_mut())
    }
}

impl<T> MultiVec<T> for CsMat<T> {
    fn kind(&self) -> VectorKind {
        VectorKind::Sparse
    }

    fn shape(&self) -> (usize, usize) {
        (self.rows(), self.cols())
    }

    fn try_dense(&self) -> Result<ArrayView2<'_, T>> {
        Err(AdapterError::VectorKindMismatch {
            expected: VectorKind::Dense,
            found: VectorKind::Sparse,
        })
    }

    fn try_dense_mut(&mut self) -> Result<ArrayViewMut2<'_, T>> {
        Err(AdapterError::VectorKindMismatch {
            expected: VectorKind::Dense,
            found: VectorKind::Sparse,
        })
    }
}

/// A linear operator as seen by an iterative solver
pub trait Operator<T> {
    /// Computes `y = op(A) x` for the requested mode
    ///
    /// # Errors
    ///
    /// [`AdapterError::UnsupportedMode`] when `supports_mode(mode)` is false,
    /// [`AdapterError::VectorKindMismatch`] when a handle has the wrong
    /// representation, [`AdapterError::ShapeMismatch`] when the blocks do not
    /// fit the operator.
    fn apply(&self, x: &dyn MultiVec<T>, y: &mut dyn MultiVec<T>, mode: ApplyMode) -> Result<()>;

    fn supports_mode(&self, mode: ApplyMode) -> bool;
}

/// A multigrid hierarchy built elsewhere
///
/// Setup (coarsening, smoothers, coarse solver) is the provider's business;
/// the adapter only runs cycles.
pub trait MultigridHierarchy<T>: Send + Sync {
    /// Runs `n_iterations` cycles on `A x = b`, updating `x` in place
    ///
    /// With `zero_initial_guess` the provider may assume `x` is zero on entry.
    fn iterate(
        &self,
        b: ArrayView2<'_, T>,
        x: ArrayViewMut2<'_, T>,
        n_iterations: usize,
        zero_initial_guess: bool,
    ) -> Result<()>;
}

/// Presents one multigrid cycle as a preconditioner `y = M⁻¹ x`
///
/// Cloning shares the hierarchy.
pub struct PreconditionerOp<H> {
    hierarchy: Arc<H>,
}

impl<H> PreconditionerOp<H> {
    pub fn new(hierarchy: Arc<H>) -> Self {
        Self { hierarchy }
    }

    pub fn hierarchy(&self) -> &Arc<H> {
        &self.hierarchy
    }
}

impl<H> Clone for PreconditionerOp<H> {
    fn clone(&self) -> Self {
        Self {
            hierarchy: Arc::clone(&self.hierarchy),
        }
    }
}

impl<H> fmt::Debug for PreconditionerOp<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreconditionerOp").finish_non_exhaustive()
    }
}

impl<T, H> Operator<T> for PreconditionerOp<H>
where
    T: Copy + Zero,
    H: MultigridHierarchy<T>,
{
    fn apply(&self, x: &dyn MultiVec<T>, y: &mut dyn MultiVec<T>, mode: ApplyMode) -> Result<()> {
        if !self.supports_mode(mode) {
            return Err(AdapterError::UnsupportedMode(mode));
        }

        let x = x.try_dense()?;
        let mut y = y.try_dense_mut()?;

        if x.dim() != y.dim() {
            return Err(AdapterError::ShapeMismatch {
                expected: x.shape().to_vec(),
                got: y.shape().to_vec(),
            });
        }

        debug!(rows = x.nrows(), vectors = x.ncols(), "applying multigrid cycle");

        y.fill(T::zero());
        self.hierarchy.iterate(x, y, 1, true)
    }

    /// Multigrid cycles are not transposable
    fn supports_mode(&self, mode: ApplyMode) -> bool {
        mode == ApplyMode::NoTranspose
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Scales by 1/d: an exact inverse of d·I in one cycle
    struct ScaledIdentity {
        d: f64,
        saw_nonzero_guess: AtomicUsize,
    }

    impl MultigridHierarchy<f64> for ScaledIdentity {
        fn iterate(
            &self,
            b: ArrayView2<'_, f64>,
            mut x: ArrayViewMut2<'_, f64>,
            n_iterations: usize,
            zero_initial_guess: bool,
        ) -> Result<()> {
            assert_eq!(n_iterations, 1);
            assert!(zero_initial_guess);
            if x.iter().any(|&v| v != 0.0) {
                self.saw_nonzero_guess.fetch_add(1, Ordering::SeqCst);
            }
            x.zip_mut_with(&b, |xi, &bi| *xi += bi / self.d);
            Ok(())
        }
    }

    fn op() -> PreconditionerOp<ScaledIdentity> {
        PreconditionerOp::new(Arc::new(ScaledIdentity {
            d: 2.0,
            saw_nonzero_guess: AtomicUsize::new(0),
        }))
    }

    #[test]
    fn test_apply_zeroes_output_then_cycles() {
        let op = op();
        let x = array![[2.0, 4.0], [6.0, 8.0]];
        let mut y = array![[9.0, 9.0], [9.0, 9.0]];

        let dyn_op: &dyn Operator<f64> = &op;
        dyn_op.apply(&x, &mut y, ApplyMode::NoTranspose).unwrap();

        assert_eq!(y, array![[1.0, 2.0], [3.0, 4.0]]);
        assert_eq!(op.hierarchy().saw_nonzero_guess.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_transpose_modes_rejected() {
        let op = op();
        let op: &dyn Operator<f64> = &op;
        let x = array![[1.0]];
        let mut y = array![[5.0]];

        for mode in [ApplyMode::Transpose, ApplyMode::ConjugateTranspose] {
            assert!(!op.supports_mode(mode));
            assert_eq!(
                op.apply(&x, &mut y, mode),
                Err(AdapterError::UnsupportedMode(mode))
            );
        }
        assert!(op.supports_mode(ApplyMode::NoTranspose));
        assert_eq!(y, array![[5.0]]);
    }

    #[test]
    fn test_sparse_handle_is_rejected() {
        let op = op();
        let op: &dyn Operator<f64> = &op;
        let x: CsMat<f64> = CsMat::eye(2);
        let mut y = Array2::<f64>::zeros((2, 1));

        assert_eq!(MultiVec::<f64>::kind(&x), VectorKind::Sparse);
        assert_eq!(MultiVec::<f64>::shape(&x), (2, 2));
        assert_eq!(
            op.apply(&x, &mut y, ApplyMode::NoTranspose),
            Err(AdapterError::VectorKindMismatch {
                expected: VectorKind::Dense,
                found: VectorKind::Sparse,
            })
        );
    }

    #[test]
    fn test_shape_mismatch() {
        let op = op();
        let op: &dyn Operator<f64> = &op;
        let x = Array2::<f64>::zeros((3, 1));
        let mut y = Array2::<f64>::zeros((2, 1));

        assert!(matches!(
            op.apply(&x, &mut y, ApplyMode::NoTranspose),
            Err(AdapterError::ShapeMismatch { .. })
        ));
    }
}
