//! Compressed Column Storage (CCS) container

use std::fmt;

use crate::error::{AdapterError, Result};

/// An owned sparse matrix in Compressed Column Storage format
///
/// The CCS format stores a sparse matrix using three arrays:
/// - col_ptr: Array of size n_cols + 1 containing offsets into row_idx and values
/// - row_idx: Array of size nnz containing (global) row indices
/// - values: Array of size nnz containing the non-zero values
///
/// Matrices produced by the adapter keep row indices strictly increasing
/// within each column.
#[derive(Clone, PartialEq)]
pub struct SparseMatrixCSC<T> {
    /// Number of rows in the matrix
    pub n_rows: usize,

    /// Number of columns in the matrix
    pub n_cols: usize,

    /// Column pointers (size: n_cols + 1)
    /// col_ptr[j] is the index in row_idx and values where column j starts
    /// col_ptr[n_cols] is equal to nnz
    pub col_ptr: Vec<usize>,

    /// Row indices (size: nnz)
    pub row_idx: Vec<usize>,

    /// Non-zero values (size: nnz)
    pub values: Vec<T>,
}

impl<T: Copy> SparseMatrixCSC<T> {
    /// Creates a new CCS matrix with the given dimensions and data
    ///
    /// # Panics
    ///
    /// Panics if the input arrays are inconsistent:
    /// - col_ptr.len() must be n_cols + 1
    /// - row_idx.len() must equal values.len()
    /// - col_ptr[n_cols] must equal row_idx.len()
    /// - every row index must be below n_rows
    pub fn new(
        n_rows: usize,
        n_cols: usize,
        col_ptr: Vec<usize>,
        row_idx: Vec<usize>,
        values: Vec<T>,
    ) -> Self {
        assert_eq!(col_ptr.len(), n_cols + 1, "col_ptr.len() must be n_cols + 1");
        assert_eq!(row_idx.len(), values.len(), "row_idx.len() must equal values.len()");
        assert_eq!(
            col_ptr[n_cols],
            row_idx.len(),
            "col_ptr[n_cols] must equal row_idx.len()"
        );

        for &row in &row_idx {
            assert!(row < n_rows, "Row index {} out of bounds (n_rows = {})", row, n_rows);
        }

        Self {
            n_rows,
            n_cols,
            col_ptr,
            row_idx,
            values,
        }
    }

    /// Fallible variant of [`SparseMatrixCSC::new`]
    pub fn try_new(
        n_rows: usize,
        n_cols: usize,
        col_ptr: Vec<usize>,
        row_idx: Vec<usize>,
        values: Vec<T>,
    ) -> Result<Self> {
        if col_ptr.len() != n_cols + 1 {
            return Err(AdapterError::ShapeMismatch {
                expected: vec![n_cols + 1],
                got: vec![col_ptr.len()],
            });
        }
        if row_idx.len() != values.len() {
            return Err(AdapterError::LengthMismatch {
                cols: row_idx.len(),
                vals: values.len(),
            });
        }
        if col_ptr[n_cols] != row_idx.len() || col_ptr.windows(2).any(|w| w[0] > w[1]) {
            return Err(AdapterError::ShapeMismatch {
                expected: vec![row_idx.len()],
                got: vec![col_ptr[n_cols]],
            });
        }
        if let Some(&row) = row_idx.iter().find(|&&row| row >= n_rows) {
            return Err(AdapterError::RowNotOwned {
                row,
                range: 0..n_rows,
            });
        }

        Ok(Self {
            n_rows,
            n_cols,
            col_ptr,
            row_idx,
            values,
        })
    }

    /// Returns the number of non-zero elements in the matrix
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Returns an iterator over the non-zero elements in column j
    ///
    /// Each item is a tuple (row_idx, value) representing a non-zero element
    pub fn col_iter(&self, j: usize) -> impl Iterator<Item = (usize, &T)> {
        assert!(j < self.n_cols, "Column index out of bounds");

        let start = self.col_ptr[j];
        let end = self.col_ptr[j + 1];

        self.row_idx[start..end]
            .iter()
            .zip(&self.values[start..end])
            .map(|(&row, val)| (row, val))
    }

    /// Whether every column lists its row indices in strictly increasing order
    pub fn has_sorted_columns(&self) -> bool {
        self.col_ptr
            .windows(2)
            .all(|w| self.row_idx[w[0]..w[1]].windows(2).all(|r| r[0] < r[1]))
    }
}

impl<T: fmt::Debug + Copy> fmt::Debug for SparseMatrixCSC<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "SparseMatrixCSC {{")?;
        writeln!(f, "  dimensions: {} × {}", self.n_rows, self.n_cols)?;
        writeln!(f, "  nnz: {}", self.nnz())?;

        let max_cols_to_print = 5.min(self.n_cols);

        if max_cols_to_print > 0 {
            writeln!(f, "  content sample:")?;

            for j in 0..max_cols_to_print {
                write!(f, "    col {}: ", j)?;
                let start = self.col_ptr[j];
                let end = self.col_ptr[j + 1];

                if start == end {
                    writeln!(f, "(empty)")?;
                    continue;
                }

                let max_elements = 5.min(end - start);
                for i in start..(start + max_elements) {
                    write!(f, "({}, {:?}) ", self.row_idx[i], self.values[i])?;
                }
                if end - start > max_elements {
                    write!(f, "... ({} more)", end - start - max_elements)?;
                }
                writeln!(f)?;
            }

            if self.n_cols > max_cols_to_print {
                writeln!(f, "    ... ({} more columns)", self.n_cols - max_cols_to_print)?;
            }
        }

        write!(f, "}}")
    }
}
