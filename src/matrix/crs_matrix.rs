//! In-memory row-distributed matrix with an insert-then-finalize lifecycle
//!
//! Entries are inserted by global row with [`CrsMatrixBuilder::insert_global_values`].
//! [`CrsMatrixBuilder::fill_complete`] locks the sparsity pattern and computes
//! the global counts through the row map's communicator. Rows keep their
//! insertion order; duplicate `(row, col)` insertions are summed.

use std::collections::HashMap;
use std::fmt;
use std::ops::{AddAssign, Range};

use tracing::trace;

use crate::comm::Communicator;
use crate::error::{AdapterError, Result};
use crate::map::RowMap;
use crate::matrix::traits::{DistributedMatrix, ReplaceValues};
use crate::utils::exclusive_scan;

/// Collects entries for the rows owned by this rank
pub struct CrsMatrixBuilder<T, C> {
    map: RowMap<C>,
    max_entries_per_row: usize,
    rows: Vec<Vec<(usize, T)>>,
}

impl<T, C> CrsMatrixBuilder<T, C>
where
    T: Copy + AddAssign + Send + Sync,
    C: Communicator,
{
    /// Starts a matrix over `map`
    ///
    /// `max_entries_per_row` bounds the distinct entries of each row; zero
    /// means unbounded.
    pub fn new(map: RowMap<C>, max_entries_per_row: usize) -> Self {
        let rows = (0..map.local_len())
            .map(|_| Vec::with_capacity(max_entries_per_row))
            .collect();

        Self {
            map,
            max_entries_per_row,
            rows,
        }
    }

    /// Adds `(cols[k], vals[k])` to global row `row`
    pub fn insert_global_values(&mut self, row: usize, cols: &[usize], vals: &[T]) -> Result<()> {
        if cols.len() != vals.len() {
            return Err(AdapterError::LengthMismatch {
                cols: cols.len(),
                vals: vals.len(),
            });
        }

        let local = self.map.to_local(row).ok_or_else(|| AdapterError::RowNotOwned {
            row,
            range: self.map.range(),
        })?;

        self.rows[local].extend(cols.iter().copied().zip(vals.iter().copied()));
        Ok(())
    }

    /// Locks the sparsity pattern of a matrix with `num_global_cols` columns
    pub fn fill_complete(self, num_global_cols: usize) -> Result<CrsMatrix<T, C>> {
        let mut counts = Vec::with_capacity(self.rows.len());
        let mut col_idx = Vec::new();
        let mut values = Vec::new();
        let mut referenced = vec![false; num_global_cols];

        for (local, entries) in self.rows.into_iter().enumerate() {
            let start = col_idx.len();
            let mut slot: HashMap<usize, usize> = HashMap::with_capacity(entries.len());

            for (col, val) in entries {
                if col >= num_global_cols {
                    return Err(AdapterError::ColumnOutOfBounds {
                        col,
                        n_cols: num_global_cols,
                    });
                }

                match slot.get(&col) {
                    Some(&pos) => values[pos] += val,
                    None => {
                        slot.insert(col, col_idx.len());
                        col_idx.push(col);
                        values.push(val);
                        referenced[col] = true;
                    }
                }
            }

            let len = col_idx.len() - start;
            if self.max_entries_per_row > 0 && len > self.max_entries_per_row {
                return Err(AdapterError::RowCapacityExceeded {
                    row: self.map.to_global(local),
                    max: self.max_entries_per_row,
                });
            }
            counts.push(len);
        }

        let row_ptr = exclusive_scan(&counts);
        let local_max = counts.iter().copied().max().unwrap_or(0);
        let comm = self.map.comm();
        let global_num_entries = comm.sum_all(col_idx.len());
        let global_max_row_entries = comm.max_all(local_max);
        let local_num_cols = referenced.iter().filter(|&&r| r).count();

        trace!(
            rank = comm.rank(),
            rows = ?self.map.range(),
            local_nnz = col_idx.len(),
            global_nnz = global_num_entries,
            "matrix finalized"
        );

        Ok(CrsMatrix {
            map: self.map,
            n_cols: num_global_cols,
            row_ptr,
            col_idx,
            values,
            local_num_cols,
            global_num_entries,
            global_max_row_entries,
        })
    }
}

/// A finalized row-distributed sparse matrix
///
/// Holds the owned rows in compressed row form with global column indices.
#[derive(Clone)]
pub struct CrsMatrix<T, C> {
    map: RowMap<C>,
    n_cols: usize,
    row_ptr: Vec<usize>,
    col_idx: Vec<usize>,
    values: Vec<T>,
    local_num_cols: usize,
    global_num_entries: usize,
    global_max_row_entries: usize,
}

impl<T, C: Communicator> CrsMatrix<T, C> {
    pub fn row_map(&self) -> &RowMap<C> {
        &self.map
    }

    fn local_range(&self, row: usize) -> Option<Range<usize>> {
        let local = self.map.to_local(row)?;
        Some(self.row_ptr[local]..self.row_ptr[local + 1])
    }
}

impl<T, C> DistributedMatrix for CrsMatrix<T, C>
where
    T: Copy + Send + Sync,
    C: Communicator,
{
    type Scalar = T;

    fn owned_rows(&self) -> Range<usize> {
        self.map.range()
    }

    fn global_row(&self, row: usize) -> Option<(&[usize], &[T])> {
        let range = self.local_range(row)?;
        Some((&self.col_idx[range.clone()], &self.values[range]))
    }

    fn global_num_rows(&self) -> usize {
        self.map.global_len()
    }

    fn global_num_cols(&self) -> usize {
        self.n_cols
    }

    fn local_num_cols(&self) -> usize {
        self.local_num_cols
    }

    fn global_num_entries(&self) -> usize {
        self.global_num_entries
    }

    fn local_num_entries(&self) -> usize {
        self.values.len()
    }

    fn global_max_row_entries(&self) -> usize {
        self.global_max_row_entries
    }
}

impl<T, C> ReplaceValues for CrsMatrix<T, C>
where
    T: Copy + Send + Sync,
    C: Communicator,
{
    fn replace_global_values(&mut self, row: usize, cols: &[usize], vals: &[T]) -> Result<()> {
        if cols.len() != vals.len() {
            return Err(AdapterError::LengthMismatch {
                cols: cols.len(),
                vals: vals.len(),
            });
        }

        let range = self.local_range(row).ok_or_else(|| AdapterError::RowNotOwned {
            row,
            range: self.map.range(),
        })?;

        // Resolve every position first so a bad column leaves the row untouched
        let stored = &self.col_idx[range.clone()];
        let positions = cols
            .iter()
            .map(|col| {
                stored
                    .iter()
                    .position(|c| c == col)
                    .map(|offset| range.start + offset)
                    .ok_or(AdapterError::StructureMismatch { row })
            })
            .collect::<Result<Vec<_>>>()?;

        for (pos, &val) in positions.into_iter().zip(vals) {
            self.values[pos] = val;
        }
        Ok(())
    }
}

impl<T: fmt::Debug, C> fmt::Debug for CrsMatrix<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CrsMatrix")
            .field("map", &self.map)
            .field("n_cols", &self.n_cols)
            .field("local_nnz", &self.values.len())
            .field("global_nnz", &self.global_num_entries)
            .finish()
    }
}
