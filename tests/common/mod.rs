//! Shared fixtures for the integration tests

#![allow(dead_code)]

use std::ops::Range;
use std::sync::Arc;

use matadapt::{Communicator, CrsMatrix, CrsMatrixBuilder, RowMap, SerialComm};

/// Rows of the 6×6 reference matrix, as (columns, values) in insertion order
///
/// ```text
/// [  7  0 -3  0 -1  0 ]
/// [  2  8  0  0  0  0 ]
/// [  0  0  1  0  0  0 ]
/// [ -3  0  0  5  0  0 ]
/// [  0 -1  0  0  4  0 ]
/// [  0  0  0 -2  0  6 ]
/// ```
pub const REFERENCE_ROWS: [(&[usize], &[i8]); 6] = [
    (&[0, 2, 4], &[7, -3, -1]),
    (&[0, 1], &[2, 8]),
    (&[2], &[1]),
    (&[0, 3], &[-3, 5]),
    (&[1, 4], &[-1, 4]),
    (&[3, 5], &[-2, 6]),
];

/// Builds the rows of the reference matrix owned by `map`
pub fn build_reference<T, C>(map: RowMap<C>) -> CrsMatrix<T, C>
where
    T: Copy + From<i8> + std::ops::AddAssign + Send + Sync,
    C: Communicator,
{
    let owned = map.range();
    let mut builder = CrsMatrixBuilder::new(map, 3);
    for row in owned {
        let (cols, vals) = REFERENCE_ROWS[row];
        let vals: Vec<T> = vals.iter().map(|&v| T::from(v)).collect();
        builder.insert_global_values(row, cols, &vals).unwrap();
    }
    builder.fill_complete(6).unwrap()
}

pub fn reference_matrix() -> CrsMatrix<f64, SerialComm> {
    build_reference(RowMap::uniform_contiguous(6, Arc::new(SerialComm)))
}

/// n×n identity on a single process
pub fn identity(n: usize) -> CrsMatrix<f64, SerialComm> {
    let map = RowMap::with_local_len(n, Arc::new(SerialComm));
    let mut builder = CrsMatrixBuilder::new(map, 1);
    for i in 0..n {
        builder.insert_global_values(i, &[i], &[1.0]).unwrap();
    }
    builder.fill_complete(n).unwrap()
}

/// Stands in for one rank of a larger run
///
/// Reductions return the preset global answers instead of communicating.
pub struct StubComm {
    pub rank: usize,
    pub size: usize,
    pub global_nnz: usize,
    pub global_max: usize,
}

impl Communicator for StubComm {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }

    fn sum_all(&self, _local: usize) -> usize {
        self.global_nnz
    }

    fn max_all(&self, _local: usize) -> usize {
        self.global_max
    }

    fn scan_exclusive(&self, local: usize) -> usize {
        local * self.rank
    }
}

/// Rank `rank` of a two-rank run over the reference matrix
pub fn reference_rank(rank: usize) -> CrsMatrix<f64, StubComm> {
    let comm = StubComm {
        rank,
        size: 2,
        global_nnz: 12,
        global_max: 3,
    };
    build_reference(RowMap::uniform_contiguous(6, Arc::new(comm)))
}

/// Sorted (column, value) pairs of a CRS row slice
pub fn row_pairs<T: Copy + PartialOrd>(
    cols: &[usize],
    vals: &[T],
    range: Range<usize>,
) -> Vec<(usize, T)> {
    let mut pairs: Vec<_> = cols[range.clone()]
        .iter()
        .copied()
        .zip(vals[range].iter().copied())
        .collect();
    pairs.sort_by(|a, b| a.0.cmp(&b.0));
    pairs
}
