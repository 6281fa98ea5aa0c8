//! Benchmarks for CRS and CCS extraction

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use matadapt::{
    AdapterConfig, CrsMatrix, CrsMatrixBuilder, DistributedMatrix, MatrixAdapter, RowMap,
    SerialComm,
};

/// 2D five-point Laplacian on a `side × side` grid
fn laplacian(side: usize) -> CrsMatrix<f64, SerialComm> {
    let n = side * side;
    let map = RowMap::uniform_contiguous(n, Arc::new(SerialComm));
    let mut builder = CrsMatrixBuilder::new(map, 5);

    for row in 0..n {
        let (i, j) = (row / side, row % side);
        let mut cols = vec![row];
        let mut vals = vec![4.0];
        if i > 0 {
            cols.push(row - side);
            vals.push(-1.0);
        }
        if i + 1 < side {
            cols.push(row + side);
            vals.push(-1.0);
        }
        if j > 0 {
            cols.push(row - 1);
            vals.push(-1.0);
        }
        if j + 1 < side {
            cols.push(row + 1);
            vals.push(-1.0);
        }
        builder.insert_global_values(row, &cols, &vals).unwrap();
    }

    builder.fill_complete(n).unwrap()
}

fn bench_extraction(c: &mut Criterion) {
    let matrix = Arc::new(laplacian(300));
    let nnz = matrix.local_num_entries();

    let serial = MatrixAdapter::with_config(
        Arc::clone(&matrix),
        AdapterConfig::default().with_threads(1),
    );
    let parallel = MatrixAdapter::with_config(
        Arc::clone(&matrix),
        AdapterConfig::default()
            .with_parallel_threshold(1024)
            .with_all_cores(),
    );
    let sorted = MatrixAdapter::with_config(
        Arc::clone(&matrix),
        AdapterConfig::default().with_sorted_crs_rows(true),
    );

    let n_rows = serial.local_num_rows();
    let mut nzvals = vec![0.0; nnz];
    let mut indices = vec![0; nnz];
    let mut rowptr = vec![0; n_rows + 1];
    let mut colptr = vec![0; serial.global_num_cols() + 1];

    c.bench_function("crs_serial", |b| {
        b.iter(|| serial.get_crs(black_box(&mut nzvals), &mut indices, &mut rowptr).unwrap())
    });

    c.bench_function("crs_parallel", |b| {
        b.iter(|| parallel.get_crs(black_box(&mut nzvals), &mut indices, &mut rowptr).unwrap())
    });

    c.bench_function("crs_sorted_rows", |b| {
        b.iter(|| sorted.get_crs(black_box(&mut nzvals), &mut indices, &mut rowptr).unwrap())
    });

    c.bench_function("ccs", |b| {
        b.iter(|| serial.get_ccs(black_box(&mut nzvals), &mut indices, &mut colptr).unwrap())
    });
}

criterion_group!(benches, bench_extraction);
criterion_main!(benches);
