//! Interop with the `sprs` crate

use std::ops::Range;

use num_traits::Num;
use sprs::CsMat;

use crate::matrix::traits::DistributedMatrix;
use crate::matrix::{SparseMatrixCSC, SparseMatrixCSR};

/// Converts our CRS matrix to an sprs `CsMat` in CSR storage
///
/// sprs requires sorted, duplicate-free indices per row; sort the extraction
/// (see [`AdapterConfig::with_sorted_crs_rows`](crate::AdapterConfig::with_sorted_crs_rows))
/// before converting.
pub fn to_sprs_csr<T>(matrix: &SparseMatrixCSR<T>) -> CsMat<T>
where
    T: Copy + Num + Default,
{
    CsMat::new(
        (matrix.n_rows, matrix.n_cols),
        matrix.row_ptr.clone(),
        matrix.col_idx.clone(),
        matrix.values.clone(),
    )
}

/// Converts our CCS matrix to an sprs `CsMat` in CSC storage
pub fn to_sprs_csc<T>(matrix: &SparseMatrixCSC<T>) -> CsMat<T>
where
    T: Copy + Num + Default,
{
    CsMat::new_csc(
        (matrix.n_rows, matrix.n_cols),
        matrix.col_ptr.clone(),
        matrix.row_idx.clone(),
        matrix.values.clone(),
    )
}

/// Converts an sprs `CsMat` to our CRS format
pub fn from_sprs_csr<T>(matrix: CsMat<T>) -> SparseMatrixCSR<T>
where
    T: Copy + Num + Default,
{
    let matrix = if matrix.is_csr() { matrix } else { matrix.to_csr() };

    let (n_rows, n_cols) = matrix.shape();
    let (indptr, indices, data) = matrix.into_raw_storage();

    SparseMatrixCSR::new(n_rows, n_cols, indptr, indices, data)
}

/// Converts an sprs `CsMat` to our CCS format
pub fn from_sprs_csc<T>(matrix: CsMat<T>) -> SparseMatrixCSC<T>
where
    T: Copy + Num + Default,
{
    let matrix = if matrix.is_csc() { matrix } else { matrix.to_csc() };

    let (n_rows, n_cols) = matrix.shape();
    let (indptr, indices, data) = matrix.into_raw_storage();

    SparseMatrixCSC::new(n_rows, n_cols, indptr, indices, data)
}

/// A single-process [`DistributedMatrix`] backed by an sprs matrix
///
/// The matrix is held in CSR storage; CSC input is converted once on
/// construction. Every row is owned by the calling process.
#[derive(Debug, Clone)]
pub struct SprsView<T> {
    matrix: CsMat<T>,
    local_num_cols: usize,
    max_row_entries: usize,
}

impl<T> SprsView<T>
where
    T: Copy + Num + Default,
{
    pub fn new(matrix: CsMat<T>) -> Self {
        let matrix = if matrix.is_csr() { matrix } else { matrix.to_csr() };

        let mut referenced = vec![false; matrix.cols()];
        for &col in matrix.indices() {
            referenced[col] = true;
        }

        let max_row_entries = (0..matrix.rows())
            .map(|i| matrix.indptr().outer_inds_sz(i).len())
            .max()
            .unwrap_or(0);

        Self {
            local_num_cols: referenced.iter().filter(|&&r| r).count(),
            max_row_entries,
            matrix,
        }
    }

    pub fn inner(&self) -> &CsMat<T> {
        &self.matrix
    }
}

impl<T> DistributedMatrix for SprsView<T>
where
    T: Copy + Send + Sync,
{
    type Scalar = T;

    fn owned_rows(&self) -> Range<usize> {
        0..self.matrix.rows()
    }

    fn global_row(&self, row: usize) -> Option<(&[usize], &[T])> {
        if row >= self.matrix.rows() {
            return None;
        }
        let range = self.matrix.indptr().outer_inds_sz(row);
        Some((&self.matrix.indices()[range.clone()], &self.matrix.data()[range]))
    }

    fn global_num_rows(&self) -> usize {
        self.matrix.rows()
    }

    fn global_num_cols(&self) -> usize {
        self.matrix.cols()
    }

    fn local_num_cols(&self) -> usize {
        self.local_num_cols
    }

    fn global_num_entries(&self) -> usize {
        self.matrix.nnz()
    }

    fn local_num_entries(&self) -> usize {
        self.matrix.nnz()
    }

    fn global_max_row_entries(&self) -> usize {
        self.max_row_entries
    }
}
