//! The read-only view a distributed sparse matrix presents to the adapters

use std::ops::Range;

/// A finalized, row-distributed sparse matrix
///
/// Each rank owns the contiguous global rows in [`owned_rows`](Self::owned_rows).
/// Column indices are global. Implementations must be structurally immutable
/// for as long as a view is alive; only values may change, and only through
/// an exclusive borrow.
pub trait DistributedMatrix: Send + Sync {
    /// Scalar type of the stored values
    type Scalar: Copy + Send + Sync;

    /// Global rows owned by the calling rank
    fn owned_rows(&self) -> Range<usize>;

    /// Column indices and values of an owned global row, in storage order
    ///
    /// Returns `None` for rows not owned by this rank.
    fn global_row(&self, row: usize) -> Option<(&[usize], &[Self::Scalar])>;

    fn global_num_rows(&self) -> usize;

    fn global_num_cols(&self) -> usize;

    fn local_num_rows(&self) -> usize {
        self.owned_rows().len()
    }

    /// Number of distinct global columns referenced by the owned rows
    fn local_num_cols(&self) -> usize;

    /// Stored entries across all ranks
    fn global_num_entries(&self) -> usize;

    /// Stored entries on this rank
    fn local_num_entries(&self) -> usize;

    /// Largest number of entries in any row, over all ranks
    fn global_max_row_entries(&self) -> usize;
}

/// In-place value refresh on a finalized matrix
pub trait ReplaceValues: DistributedMatrix {
    /// Overwrites the values of an owned row without touching its structure
    ///
    /// Every `(col, val)` pair must name an existing entry of `row`.
    fn replace_global_values(
        &mut self,
        row: usize,
        cols: &[usize],
        vals: &[Self::Scalar],
    ) -> crate::Result<()>;
}
