use std::sync::Arc;

use matadapt::{CrsMatrixBuilder, MatrixAdapter, RowMap, SerialComm};
use tracing_subscriber::EnvFilter;

fn main() -> matadapt::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_target(true).init();

    println!("matadapt {}: CRS/CCS extraction demo", matadapt::VERSION);

    // [  7  0 -3  0 -1  0 ]
    // [  2  8  0  0  0  0 ]
    // [  0  0  1  0  0  0 ]
    // [ -3  0  0  5  0  0 ]
    // [  0 -1  0  0  4  0 ]
    // [  0  0  0 -2  0  6 ]
    let map = RowMap::uniform_contiguous(6, Arc::new(SerialComm));
    let mut builder = CrsMatrixBuilder::new(map, 3);
    builder.insert_global_values(0, &[0, 2, 4], &[7.0, -3.0, -1.0])?;
    builder.insert_global_values(1, &[0, 1], &[2.0, 8.0])?;
    builder.insert_global_values(2, &[2], &[1.0])?;
    builder.insert_global_values(3, &[0, 3], &[-3.0, 5.0])?;
    builder.insert_global_values(4, &[1, 4], &[-1.0, 4.0])?;
    builder.insert_global_values(5, &[3, 5], &[-2.0, 6.0])?;

    let adapter = MatrixAdapter::new(Arc::new(builder.fill_complete(6)?));

    println!("\nAdapter:");
    println!(
        "  global: {} × {}, nnz {}",
        adapter.global_num_rows(),
        adapter.global_num_cols(),
        adapter.global_nnz()
    );
    println!(
        "  local:  {} × {}, nnz {}",
        adapter.local_num_rows(),
        adapter.local_num_cols(),
        adapter.local_nnz()
    );
    println!("  max row nnz: {}", adapter.max_nnz());

    println!("\nCRS:");
    println!("{:?}", adapter.crs()?);

    println!("\nCCS:");
    let ccs = adapter.ccs()?;
    println!("{:?}", ccs);
    println!("  nzvals: {:?}", ccs.values);
    println!("  rowind: {:?}", ccs.row_idx);
    println!("  colptr: {:?}", ccs.col_ptr);

    Ok(())
}
