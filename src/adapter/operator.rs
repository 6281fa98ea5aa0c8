//! The adapter as the system-matrix operator of an iterative solver

use ndarray::Array2;
use num_traits::Num;

use crate::error::{AdapterError, Result};
use crate::matrix::traits::DistributedMatrix;
use crate::precond::{ApplyMode, MultiVec, Operator};

use super::MatrixAdapter;

/// Sparse products over the owned rows
///
/// `NoTranspose` reads a `global_num_cols × k` block and writes the
/// `local_num_rows × k` owned slice of `A x`. `Transpose` reads the owned
/// `local_num_rows × k` slice and writes this process's
/// `global_num_cols × k` contribution to `Aᵀ x`; summing contributions
/// across processes is up to the caller.
impl<M> Operator<M::Scalar> for MatrixAdapter<M>
where
    M: DistributedMatrix,
    M::Scalar: Num,
{
    fn apply(
        &self,
        x: &dyn MultiVec<M::Scalar>,
        y: &mut dyn MultiVec<M::Scalar>,
        mode: ApplyMode,
    ) -> Result<()> {
        if !self.supports_mode(mode) {
            return Err(AdapterError::UnsupportedMode(mode));
        }

        let x = x.try_dense()?;
        let mut y = y.try_dense_mut()?;

        let (n_local, n_cols) = (self.local_num_rows(), self.global_num_cols());
        let (x_rows, y_rows) = match mode {
            ApplyMode::Transpose => (n_local, n_cols),
            _ => (n_cols, n_local),
        };

        if x.nrows() != x_rows {
            return Err(AdapterError::ShapeMismatch {
                expected: vec![x_rows, x.ncols()],
                got: x.shape().to_vec(),
            });
        }
        if y.dim() != (y_rows, x.ncols()) {
            return Err(AdapterError::ShapeMismatch {
                expected: vec![y_rows, x.ncols()],
                got: y.shape().to_vec(),
            });
        }

        let owned = self.matrix.owned_rows();
        let mut acc = Array2::<M::Scalar>::zeros(y.dim());

        for (local, row) in owned.clone().enumerate() {
            let (cols, vals) = self.matrix.global_row(row).ok_or_else(|| {
                AdapterError::RowNotOwned {
                    row,
                    range: owned.clone(),
                }
            })?;

            for (&col, &val) in cols.iter().zip(vals) {
                for k in 0..x.ncols() {
                    match mode {
                        ApplyMode::Transpose => {
                            acc[[col, k]] = acc[[col, k]] + val * x[[local, k]];
                        }
                        _ => {
                            acc[[local, k]] = acc[[local, k]] + val * x[[col, k]];
                        }
                    }
                }
            }
        }

        y.assign(&acc);
        Ok(())
    }

    /// Conjugation is not expressible for a generic scalar
    fn supports_mode(&self, mode: ApplyMode) -> bool {
        matches!(mode, ApplyMode::NoTranspose | ApplyMode::Transpose)
    }
}
