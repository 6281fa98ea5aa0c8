//! Row-major to column-major conversion

use num_traits::Num;

use crate::matrix::{SparseMatrixCSC, SparseMatrixCSR};

/// Scatters row-major entries into column-major buffers
///
/// `row(i)` yields the column indices and values of local row `i`. Rows are
/// visited in increasing order, so every column receives its row indices
/// (`row_base + i`) in increasing order as long as no row repeats a column.
///
/// Buffers must already be long enough: `colptr` at least `n_cols + 1`,
/// `nzvals` and `rowind` at least the total entry count. Returns the number
/// of entries written.
pub(crate) fn scatter_columns<'a, T, F>(
    n_rows: usize,
    n_cols: usize,
    row_base: usize,
    row: F,
    nzvals: &mut [T],
    rowind: &mut [usize],
    colptr: &mut [usize],
) -> usize
where
    T: Copy + 'a,
    F: Fn(usize) -> (&'a [usize], &'a [T]),
{
    let colptr = &mut colptr[..=n_cols];

    // Count non-zeros per column, shifted by one for the prefix sum
    colptr.fill(0);
    for i in 0..n_rows {
        for &col in row(i).0 {
            colptr[col + 1] += 1;
        }
    }

    for j in 0..n_cols {
        colptr[j + 1] += colptr[j];
    }

    let mut next = colptr[..n_cols].to_vec();

    for i in 0..n_rows {
        let (cols, vals) = row(i);
        for (&col, &val) in cols.iter().zip(vals) {
            let pos = next[col];
            rowind[pos] = row_base + i;
            nzvals[pos] = val;
            next[col] += 1;
        }
    }

    colptr[n_cols]
}

impl<T: Copy + Num> SparseMatrixCSR<T> {
    /// Converts this CRS matrix to CCS format
    ///
    /// Row indices come out sorted within every column.
    pub fn to_csc(&self) -> SparseMatrixCSC<T> {
        let nnz = self.nnz();
        let mut col_ptr = vec![0; self.n_cols + 1];
        let mut row_idx = vec![0; nnz];
        let mut values = vec![T::zero(); nnz];

        scatter_columns(
            self.n_rows,
            self.n_cols,
            0,
            |i| {
                let (start, end) = (self.row_ptr[i], self.row_ptr[i + 1]);
                (&self.col_idx[start..end], &self.values[start..end])
            },
            &mut values,
            &mut row_idx,
            &mut col_ptr,
        );

        SparseMatrixCSC::new(self.n_rows, self.n_cols, col_ptr, row_idx, values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_csr_to_csc_conversion() {
        // Create a CSR matrix
        //    [1 2 0]
        //    [0 3 0]
        //    [4 0 5]
        let csr = SparseMatrixCSR::new(
            3,
            3,
            vec![0, 2, 3, 5],
            vec![0, 1, 1, 0, 2],
            vec![1, 2, 3, 4, 5],
        );

        let csc = csr.to_csc();

        assert_eq!(csc.n_rows, 3);
        assert_eq!(csc.n_cols, 3);
        assert_eq!(csc.nnz(), 5);
        assert_eq!(csc.col_ptr, vec![0, 2, 4, 5]);

        let col0: Vec<_> = csc.col_iter(0).collect();
        assert_eq!(col0, vec![(0, &1), (2, &4)]);

        let col1: Vec<_> = csc.col_iter(1).collect();
        assert_eq!(col1, vec![(0, &2), (1, &3)]);
    }

    #[test]
    fn test_unsorted_rows_still_give_sorted_columns() {
        // Row 1 stores its columns out of order
        let csr = SparseMatrixCSR::new(
            3,
            2,
            vec![0, 1, 3, 4],
            vec![1, 1, 0, 0],
            vec![1.0, 2.0, 3.0, 4.0],
        );

        let csc = csr.to_csc();

        assert_eq!(csc.col_ptr, vec![0, 2, 4]);
        assert_eq!(csc.row_idx, vec![1, 2, 0, 1]);
        assert_eq!(csc.values, vec![3.0, 4.0, 1.0, 2.0]);
        assert!(csc.has_sorted_columns());
    }

    #[test]
    fn test_row_base_offsets_row_indices() {
        let cols = [vec![0usize], vec![0usize]];
        let vals = [vec![5.0], vec![6.0]];
        let mut nzvals = [0.0; 2];
        let mut rowind = [0; 2];
        let mut colptr = [0; 2];

        let nnz = scatter_columns(
            2,
            1,
            10,
            |i| (cols[i].as_slice(), vals[i].as_slice()),
            &mut nzvals,
            &mut rowind,
            &mut colptr,
        );

        assert_eq!(nnz, 2);
        assert_eq!(rowind, [10, 11]);
        assert_eq!(colptr, [0, 2]);
    }
}
