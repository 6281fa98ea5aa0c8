//! # matadapt: sparse matrix adapters for direct and multigrid solvers
//!
//! Linear solver stacks pass one assembled, row-distributed sparse matrix
//! between several packages. This crate provides the glue on two seams:
//!
//! - [`MatrixAdapter`] presents a finalized [`DistributedMatrix`] to sparse
//!   direct solvers as Compressed Row Storage (CRS) or Compressed Column
//!   Storage (CCS) buffers, together with its dimension and non-zero counts.
//! - [`PreconditionerOp`] lets a [`MultigridHierarchy`] serve as the
//!   preconditioner [`Operator`] of an iterative solver.
//!
//! ## Extraction contract
//!
//! - CRS: `rowptr[r]..rowptr[r + 1]` delimits row `r`; entry order inside a
//!   row is unspecified (storage order unless sorting is requested).
//! - CCS: `colptr[c]..colptr[c + 1]` delimits column `c`; row indices are
//!   strictly increasing.
//! - Both cover the rows owned by the calling process and use global,
//!   0-based indices. Undersized buffers are rejected with
//!   [`AdapterError::BufferTooSmall`] before anything is written.
//!
//! ## Usage
//!
//! ```
//! use std::sync::Arc;
//! use matadapt::{CrsMatrixBuilder, MatrixAdapter, RowMap, SerialComm};
//!
//! let map = RowMap::uniform_contiguous(3, Arc::new(SerialComm));
//! let mut builder = CrsMatrixBuilder::new(map, 1);
//! for i in 0..3 {
//!     builder.insert_global_values(i, &[i], &[2.0]).unwrap();
//! }
//! let adapter = MatrixAdapter::new(Arc::new(builder.fill_complete(3).unwrap()));
//!
//! let mut nzvals = vec![0.0; adapter.global_nnz()];
//! let mut colind = vec![0; adapter.global_nnz()];
//! let mut rowptr = vec![0; adapter.global_num_rows() + 1];
//! let nnz = adapter.get_crs(&mut nzvals, &mut colind, &mut rowptr).unwrap();
//!
//! assert_eq!(nnz, 3);
//! assert_eq!(rowptr, vec![0, 1, 2, 3]);
//! ```

pub mod adapter;
pub mod comm;
pub mod error;
pub mod map;
pub mod matrix;
pub mod precond;
pub mod utils;

// Re-export primary components
pub use adapter::{AdapterConfig, MatrixAdapter};
pub use comm::{Communicator, SerialComm};
pub use error::{AdapterError, Result};
pub use map::RowMap;
pub use matrix::{CrsMatrix, CrsMatrixBuilder, DistributedMatrix, ReplaceValues};
pub use matrix::{SparseMatrixCSC, SparseMatrixCSR};
pub use precond::{ApplyMode, MultiVec, MultigridHierarchy, Operator, PreconditionerOp, VectorKind};
pub use utils::{from_sprs_csc, from_sprs_csr, to_sprs_csc, to_sprs_csr, SprsView};

/// Version information for the matadapt library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
