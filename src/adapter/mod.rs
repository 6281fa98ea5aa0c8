//! Direct-solver view of a distributed sparse matrix
//!
//! [`MatrixAdapter`] wraps a shared handle to a finalized [`DistributedMatrix`]
//! and hands its locally owned rows out in the two layouts sparse direct
//! solvers consume:
//!
//! - **CRS** ([`MatrixAdapter::get_crs`]): entries grouped by row. The order
//!   of entries inside a row is unspecified unless
//!   [`AdapterConfig::sort_crs_rows`] is set.
//! - **CCS** ([`MatrixAdapter::get_ccs`]): entries grouped by column, row
//!   indices strictly increasing inside every column.
//!
//! Indices are 0-based and global. Extraction never modifies the matrix and
//! can be repeated; on a single process the local rows are the whole matrix.
//!
//! ```
//! use std::sync::Arc;
//! use matadapt::{CrsMatrixBuilder, MatrixAdapter, RowMap, SerialComm};
//!
//! let map = RowMap::uniform_contiguous(2, Arc::new(SerialComm));
//! let mut builder = CrsMatrixBuilder::new(map, 2);
//! builder.insert_global_values(0, &[0, 1], &[4.0, -1.0]).unwrap();
//! builder.insert_global_values(1, &[1], &[3.0]).unwrap();
//! let adapter = MatrixAdapter::new(Arc::new(builder.fill_complete(2).unwrap()));
//!
//! let ccs = adapter.ccs().unwrap();
//! assert_eq!(ccs.col_ptr, vec![0, 1, 3]);
//! assert_eq!(ccs.row_idx, vec![0, 0, 1]);
//! assert_eq!(ccs.values, vec![4.0, -1.0, 3.0]);
//! ```

pub mod config;
mod extract;
mod operator;

use std::fmt;
use std::sync::{Arc, OnceLock};

use num_traits::Zero;
use rayon::{ThreadPool, ThreadPoolBuilder};
use tracing::{debug, warn};

use crate::error::{AdapterError, Result};
use crate::matrix::traits::{DistributedMatrix, ReplaceValues};
use crate::matrix::{SparseMatrixCSC, SparseMatrixCSR};

pub use config::AdapterConfig;
use extract::{check_len, extract_ccs, extract_crs, Execution};

/// Shallow, read-only view of a distributed matrix for direct solvers
///
/// Cloning copies the handle, not the matrix: clones see the same data and
/// extract identical results.
pub struct MatrixAdapter<M> {
    matrix: Arc<M>,
    config: AdapterConfig,
    /// Dedicated pool for [`AdapterConfig::n_threads`], shared by clones and
    /// left unset until an extraction goes parallel
    pool: Arc<OnceLock<Option<ThreadPool>>>,
}

impl<M: DistributedMatrix> MatrixAdapter<M> {
    /// Wraps `matrix` with the default [`AdapterConfig`]
    pub fn new(matrix: Arc<M>) -> Self {
        Self::with_config(matrix, AdapterConfig::default())
    }

    pub fn with_config(matrix: Arc<M>, config: AdapterConfig) -> Self {
        debug!(
            global_rows = matrix.global_num_rows(),
            global_cols = matrix.global_num_cols(),
            local_rows = matrix.local_num_rows(),
            local_nnz = matrix.local_num_entries(),
            threads = ?config.n_threads,
            "matrix adapter created"
        );

        Self {
            matrix,
            config,
            pool: Arc::new(OnceLock::new()),
        }
    }

    /// The shared handle to the underlying matrix
    pub fn matrix(&self) -> &Arc<M> {
        &self.matrix
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    pub fn global_num_rows(&self) -> usize {
        self.matrix.global_num_rows()
    }

    pub fn global_num_cols(&self) -> usize {
        self.matrix.global_num_cols()
    }

    pub fn local_num_rows(&self) -> usize {
        self.matrix.local_num_rows()
    }

    pub fn local_num_cols(&self) -> usize {
        self.matrix.local_num_cols()
    }

    /// Non-zeros across all processes
    pub fn global_nnz(&self) -> usize {
        self.matrix.global_num_entries()
    }

    /// Non-zeros on the calling process
    pub fn local_nnz(&self) -> usize {
        self.matrix.local_num_entries()
    }

    /// Largest number of non-zeros in any single row, over all processes
    pub fn max_nnz(&self) -> usize {
        self.matrix.global_max_row_entries()
    }

    fn execution(&self) -> Execution<'_> {
        if self.config.use_parallel(self.local_num_rows()) {
            Execution::Parallel(self.dedicated_pool())
        } else {
            Execution::Serial
        }
    }

    /// The pool sized by `config.n_threads`, if one is needed
    ///
    /// Nothing is built when no width was requested or when rayon's global
    /// pool already has it.
    fn dedicated_pool(&self) -> Option<&ThreadPool> {
        let n_threads = self.config.n_threads?;
        self.pool
            .get_or_init(|| {
                if n_threads == rayon::current_num_threads() {
                    return None;
                }
                match ThreadPoolBuilder::new().num_threads(n_threads).build() {
                    Ok(pool) => {
                        debug!(n_threads, "built extraction thread pool");
                        Some(pool)
                    }
                    Err(err) => {
                        warn!(%err, "falling back to the global rayon pool");
                        None
                    }
                }
            })
            .as_ref()
    }

    /// Writes the owned rows in compressed row form and returns the
    /// number of entries written
    ///
    /// `rowptr` needs `local_num_rows() + 1` slots and `nzvals`/`colind`
    /// need `local_nnz()`; longer buffers keep their tails untouched.
    ///
    /// # Errors
    ///
    /// [`AdapterError::BufferTooSmall`] if any buffer is short. Nothing is
    /// written in that case.
    pub fn get_crs(
        &self,
        nzvals: &mut [M::Scalar],
        colind: &mut [usize],
        rowptr: &mut [usize],
    ) -> Result<usize> {
        let execution = self.execution();
        let nnz = extract_crs(
            self.matrix.as_ref(),
            self.config.sort_crs_rows,
            execution,
            nzvals,
            colind,
            rowptr,
        )?;

        debug!(
            rows = self.local_num_rows(),
            nnz,
            parallel = matches!(execution, Execution::Parallel(_)),
            "extracted CRS"
        );
        Ok(nnz)
    }

    /// Writes the owned rows in compressed column form and returns the
    /// number of entries written
    ///
    /// `colptr` needs `global_num_cols() + 1` slots and `nzvals`/`rowind`
    /// need `local_nnz()`. Row indices are global and strictly increasing
    /// within each column.
    ///
    /// # Errors
    ///
    /// [`AdapterError::BufferTooSmall`] if any buffer is short. Nothing is
    /// written in that case.
    pub fn get_ccs(
        &self,
        nzvals: &mut [M::Scalar],
        rowind: &mut [usize],
        colptr: &mut [usize],
    ) -> Result<usize> {
        let nnz = extract_ccs(self.matrix.as_ref(), nzvals, rowind, colptr)?;

        debug!(cols = self.global_num_cols(), nnz, "extracted CCS");
        Ok(nnz)
    }

    /// Pushes new values for the existing sparsity pattern into the matrix
    ///
    /// The buffers describe the owned rows in CRS form, as produced by
    /// [`get_crs`](Self::get_crs); entries may come in any order within a
    /// row but must name exactly the stored columns. Validation happens
    /// before any value changes.
    ///
    /// # Errors
    ///
    /// [`AdapterError::SharedMatrix`] if another handle to the matrix exists
    /// (including clones of this adapter), [`AdapterError::StructureMismatch`]
    /// if a row's columns differ from the stored pattern or `rowptr` does not
    /// start at zero and never decrease, [`AdapterError::BufferTooSmall`]
    /// for short buffers.
    pub fn update_values_crs(
        &mut self,
        nzvals: &[M::Scalar],
        colind: &[usize],
        rowptr: &[usize],
    ) -> Result<()>
    where
        M: ReplaceValues,
    {
        let matrix = Arc::get_mut(&mut self.matrix).ok_or(AdapterError::SharedMatrix)?;
        let owned = matrix.owned_rows();

        check_len("rowptr", owned.len() + 1, rowptr.len())?;
        if rowptr[0] != 0 {
            return Err(AdapterError::StructureMismatch { row: owned.start });
        }
        if let Some(local) = (0..owned.len()).find(|&i| rowptr[i] > rowptr[i + 1]) {
            return Err(AdapterError::StructureMismatch {
                row: owned.start + local,
            });
        }

        let nnz = rowptr[owned.len()];
        check_len("nzvals", nnz, nzvals.len())?;
        check_len("colind", nnz, colind.len())?;

        for (local, row) in owned.clone().enumerate() {
            let (start, end) = (rowptr[local], rowptr[local + 1]);
            let (stored, _) = matrix.global_row(row).ok_or_else(|| AdapterError::RowNotOwned {
                row,
                range: owned.clone(),
            })?;

            let mut given = colind[start..end].to_vec();
            let mut expected = stored.to_vec();
            given.sort_unstable();
            expected.sort_unstable();
            if given != expected {
                return Err(AdapterError::StructureMismatch { row });
            }
        }

        for (local, row) in owned.enumerate() {
            let (start, end) = (rowptr[local], rowptr[local + 1]);
            matrix.replace_global_values(row, &colind[start..end], &nzvals[start..end])?;
        }

        debug!(nnz, "updated matrix values");
        Ok(())
    }
}

impl<M> MatrixAdapter<M>
where
    M: DistributedMatrix,
    M::Scalar: Zero,
{
    /// Owned CRS copy of the local rows
    ///
    /// The result spans `local_num_rows() × global_num_cols()`; local row
    /// `i` is global row `owned_rows().start + i`.
    pub fn crs(&self) -> Result<SparseMatrixCSR<M::Scalar>> {
        let n_rows = self.local_num_rows();
        let nnz = self.local_nnz();
        let mut row_ptr = vec![0; n_rows + 1];
        let mut col_idx = vec![0; nnz];
        let mut values = vec![M::Scalar::zero(); nnz];

        self.get_crs(&mut values, &mut col_idx, &mut row_ptr)?;

        SparseMatrixCSR::try_new(n_rows, self.global_num_cols(), row_ptr, col_idx, values)
    }

    /// Owned CCS copy of the local rows
    ///
    /// The result spans `global_num_rows() × global_num_cols()`; rows not
    /// owned by this process are empty.
    pub fn ccs(&self) -> Result<SparseMatrixCSC<M::Scalar>> {
        let n_cols = self.global_num_cols();
        let nnz = self.local_nnz();
        let mut col_ptr = vec![0; n_cols + 1];
        let mut row_idx = vec![0; nnz];
        let mut values = vec![M::Scalar::zero(); nnz];

        self.get_ccs(&mut values, &mut row_idx, &mut col_ptr)?;

        SparseMatrixCSC::try_new(self.global_num_rows(), n_cols, col_ptr, row_idx, values)
    }
}

impl<M> Clone for MatrixAdapter<M> {
    fn clone(&self) -> Self {
        Self {
            matrix: Arc::clone(&self.matrix),
            config: self.config.clone(),
            pool: Arc::clone(&self.pool),
        }
    }
}

impl<M: DistributedMatrix> fmt::Debug for MatrixAdapter<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatrixAdapter")
            .field("global_num_rows", &self.global_num_rows())
            .field("global_num_cols", &self.global_num_cols())
            .field("local_nnz", &self.local_nnz())
            .field("config", &self.config)
            .finish()
    }
}
