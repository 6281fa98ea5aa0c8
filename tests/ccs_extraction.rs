//! CCS extraction: exact positional comparison, row indices sorted per column

mod common;

use std::sync::Arc;

use matadapt::{AdapterError, MatrixAdapter, RowMap, SerialComm};

use common::{build_reference, reference_matrix, reference_rank};

fn check_reference_ccs<T>()
where
    T: Copy
        + From<i8>
        + std::ops::AddAssign
        + Send
        + Sync
        + num_traits::Zero
        + PartialEq
        + std::fmt::Debug,
{
    let matrix = build_reference::<T, _>(RowMap::uniform_contiguous(6, Arc::new(SerialComm)));
    let adapter = MatrixAdapter::new(Arc::new(matrix));

    let expected_vals: Vec<T> = [7, 2, -3, 8, -1, -3, 1, 5, -2, -1, 4, 6]
        .iter()
        .map(|&v: &i8| T::from(v))
        .collect();

    let mut nzvals = vec![T::zero(); adapter.global_nnz()];
    let mut rowind = vec![0; adapter.global_nnz()];
    let mut colptr = vec![0; adapter.global_num_rows() + 1];

    let nnz = adapter.get_ccs(&mut nzvals, &mut rowind, &mut colptr).unwrap();

    assert_eq!(nnz, 12);
    assert_eq!(nzvals, expected_vals);
    assert_eq!(rowind, vec![0, 1, 3, 1, 4, 0, 2, 3, 5, 0, 4, 5]);
    assert_eq!(colptr, vec![0, 3, 5, 7, 9, 11, 12]);
}

#[test]
fn test_ccs_reference_f64() {
    check_reference_ccs::<f64>();
}

#[test]
fn test_ccs_reference_f32() {
    check_reference_ccs::<f32>();
}

#[test]
fn test_ccs_reference_i64() {
    check_reference_ccs::<i64>();
}

#[test]
fn test_ccs_rows_strictly_increasing() {
    let adapter = MatrixAdapter::new(Arc::new(reference_matrix()));
    let ccs = adapter.ccs().unwrap();

    assert!(ccs.has_sorted_columns());
    for col in 0..ccs.n_cols {
        let rows: Vec<_> = ccs.col_iter(col).map(|(row, _)| row).collect();
        assert!(rows.windows(2).all(|w| w[0] < w[1]), "column {}", col);
    }
}

#[test]
fn test_ccs_with_reversed_row_storage() {
    // Same matrix, every row inserted back to front
    let map = RowMap::uniform_contiguous(6, Arc::new(SerialComm));
    let mut builder = matadapt::CrsMatrixBuilder::new(map, 3);
    for (row, (cols, vals)) in common::REFERENCE_ROWS.iter().enumerate() {
        let cols: Vec<usize> = cols.iter().rev().copied().collect();
        let vals: Vec<f64> = vals.iter().rev().map(|&v| f64::from(v)).collect();
        builder.insert_global_values(row, &cols, &vals).unwrap();
    }
    let reversed = MatrixAdapter::new(Arc::new(builder.fill_complete(6).unwrap()));
    let forward = MatrixAdapter::new(Arc::new(reference_matrix()));

    assert_ne!(reversed.crs().unwrap(), forward.crs().unwrap());
    assert_eq!(reversed.ccs().unwrap(), forward.ccs().unwrap());
}

#[test]
fn test_ccs_on_a_partition_uses_global_rows() {
    let adapter = MatrixAdapter::new(Arc::new(reference_rank(1)));
    let ccs = adapter.ccs().unwrap();

    assert_eq!(ccs.n_rows, 6);
    assert_eq!(ccs.col_ptr, vec![0, 1, 2, 2, 4, 5, 6]);
    assert_eq!(ccs.row_idx, vec![3, 4, 3, 5, 4, 5]);
    assert_eq!(ccs.values, vec![-3.0, -1.0, 5.0, -2.0, 4.0, 6.0]);
}

#[test]
fn test_ccs_undersized_colptr() {
    let adapter = MatrixAdapter::new(Arc::new(reference_matrix()));
    let mut nzvals = vec![0.0; 12];
    let mut rowind = vec![0; 12];
    let mut colptr = vec![0; 6];

    assert_eq!(
        adapter.get_ccs(&mut nzvals, &mut rowind, &mut colptr),
        Err(AdapterError::BufferTooSmall {
            buffer: "colptr",
            required: 7,
            actual: 6
        })
    );
    assert_eq!(
        adapter.get_ccs(&mut nzvals[..11], &mut rowind, &mut vec![0; 7]),
        Err(AdapterError::BufferTooSmall {
            buffer: "nzvals",
            required: 12,
            actual: 11
        })
    );
    assert_eq!(
        adapter.get_ccs(&mut nzvals, &mut rowind[..3], &mut vec![0; 7]),
        Err(AdapterError::BufferTooSmall {
            buffer: "rowind",
            required: 12,
            actual: 3
        })
    );
}

#[test]
fn test_ccs_matches_native_conversion() {
    let adapter = MatrixAdapter::new(Arc::new(reference_matrix()));
    assert_eq!(adapter.crs().unwrap().to_csc(), adapter.ccs().unwrap());
}
