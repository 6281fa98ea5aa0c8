//! Contiguous row distribution across ranks

use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use crate::comm::Communicator;

/// Assignment of a contiguous block of global rows to the calling rank
///
/// Each rank owns `range`; ranges of consecutive ranks are adjacent and
/// together cover `0..global_len`.
pub struct RowMap<C> {
    global_len: usize,
    range: Range<usize>,
    comm: Arc<C>,
}

impl<C> Clone for RowMap<C> {
    fn clone(&self) -> Self {
        Self {
            global_len: self.global_len,
            range: self.range.clone(),
            comm: Arc::clone(&self.comm),
        }
    }
}

impl<C: Communicator> RowMap<C> {
    /// Splits `global_len` rows as evenly as possible, lower ranks taking
    /// the remainder
    pub fn uniform_contiguous(global_len: usize, comm: Arc<C>) -> Self {
        let size = comm.size().max(1);
        let rank = comm.rank();
        let base = global_len / size;
        let extra = global_len % size;

        let start = rank * base + rank.min(extra);
        let len = base + usize::from(rank < extra);

        Self {
            global_len,
            range: start..start + len,
            comm,
        }
    }

    /// Every rank contributes `local_len` rows, in rank order
    pub fn with_local_len(local_len: usize, comm: Arc<C>) -> Self {
        let start = comm.scan_exclusive(local_len);
        let global_len = comm.sum_all(local_len);

        Self {
            global_len,
            range: start..start + local_len,
            comm,
        }
    }

    /// Total number of rows across all ranks
    pub fn global_len(&self) -> usize {
        self.global_len
    }

    /// Number of rows owned by this rank
    pub fn local_len(&self) -> usize {
        self.range.len()
    }

    /// Global rows owned by this rank
    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }

    /// Whether `row` is owned by this rank
    pub fn owns(&self, row: usize) -> bool {
        self.range.contains(&row)
    }

    /// Local index of a global row, if owned
    pub fn to_local(&self, row: usize) -> Option<usize> {
        self.owns(row).then(|| row - self.range.start)
    }

    /// Global index of a local row
    pub fn to_global(&self, local: usize) -> usize {
        self.range.start + local
    }

    pub fn comm(&self) -> &C {
        &self.comm
    }
}

impl<C> fmt::Debug for RowMap<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowMap")
            .field("global_len", &self.global_len)
            .field("range", &self.range)
            .finish()
    }
}
