// Matrix containers, the distributed-matrix seam and its in-memory implementation

pub mod conversion;
pub mod crs_matrix;
pub mod csc;
pub mod csr;
pub mod traits;

pub use crs_matrix::{CrsMatrix, CrsMatrixBuilder};
pub use csc::SparseMatrixCSC;
pub use csr::SparseMatrixCSR;
pub use traits::{DistributedMatrix, ReplaceValues};
