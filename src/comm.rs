//! Process communicator seam
//!
//! Matrices are distributed by rows across ranks. The adapter itself never
//! communicates; only the matrix's global counts need a reduction, and those
//! go through this trait. Message passing proper lives outside the crate.

/// The collective operations a distributed matrix needs
pub trait Communicator: Send + Sync {
    /// Rank of the calling process
    fn rank(&self) -> usize;

    /// Number of processes in the communicator
    fn size(&self) -> usize;

    /// Sum of `local` over all ranks
    fn sum_all(&self, local: usize) -> usize;

    /// Maximum of `local` over all ranks
    fn max_all(&self, local: usize) -> usize;

    /// Exclusive prefix sum of `local` over ranks `0..rank`
    fn scan_exclusive(&self, local: usize) -> usize;
}

/// Single-process communicator: every reduction is the identity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SerialComm;

impl Communicator for SerialComm {
    fn rank(&self) -> usize {
        0
    }

    fn size(&self) -> usize {
        1
    }

    fn sum_all(&self, local: usize) -> usize {
        local
    }

    fn max_all(&self, local: usize) -> usize {
        local
    }

    fn scan_exclusive(&self, _local: usize) -> usize {
        0
    }
}
