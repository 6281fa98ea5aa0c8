//! CRS and CCS extraction kernels

use rayon::prelude::*;
use rayon::ThreadPool;
use tracing::warn;

use crate::error::{AdapterError, Result};
use crate::matrix::conversion::scatter_columns;
use crate::matrix::traits::DistributedMatrix;
use crate::utils::exclusive_scan;

type RowSlices<'a, T> = Vec<(&'a [usize], &'a [T])>;

/// Borrows every owned row of `matrix`, in global row order
pub(crate) fn owned_row_slices<M: DistributedMatrix>(
    matrix: &M,
) -> Result<RowSlices<'_, M::Scalar>> {
    let owned = matrix.owned_rows();
    owned
        .clone()
        .map(|row| {
            matrix.global_row(row).ok_or_else(|| AdapterError::RowNotOwned {
                row,
                range: owned.clone(),
            })
        })
        .collect()
}

pub(crate) fn check_len(buffer: &'static str, required: usize, actual: usize) -> Result<()> {
    if actual < required {
        warn!(buffer, required, actual, "output buffer too small");
        return Err(AdapterError::BufferTooSmall {
            buffer,
            required,
            actual,
        });
    }
    Ok(())
}

/// Copies one row into its output slot, optionally sorted by column
fn write_row<T: Copy>(
    (cols, vals): (&[usize], &[T]),
    out_vals: &mut [T],
    out_cols: &mut [usize],
    sort: bool,
) {
    if !sort {
        out_cols.copy_from_slice(cols);
        out_vals.copy_from_slice(vals);
        return;
    }

    let mut order: Vec<usize> = (0..cols.len()).collect();
    order.sort_unstable_by_key(|&k| cols[k]);

    for (slot, &k) in order.iter().enumerate() {
        out_cols[slot] = cols[k];
        out_vals[slot] = vals[k];
    }
}

/// Where CRS rows are written
#[derive(Clone, Copy)]
pub(crate) enum Execution<'p> {
    Serial,
    /// Rayon's global pool, or a dedicated one
    Parallel(Option<&'p ThreadPool>),
}

/// Fills CRS buffers with the owned rows of `matrix`
///
/// Nothing is written unless every buffer is large enough.
pub(crate) fn extract_crs<M: DistributedMatrix>(
    matrix: &M,
    sort_rows: bool,
    execution: Execution<'_>,
    nzvals: &mut [M::Scalar],
    colind: &mut [usize],
    rowptr: &mut [usize],
) -> Result<usize> {
    let rows = owned_row_slices(matrix)?;
    let counts: Vec<usize> = rows.iter().map(|(cols, _)| cols.len()).collect();
    let offsets = exclusive_scan(&counts);
    let nnz = offsets[rows.len()];

    check_len("rowptr", rows.len() + 1, rowptr.len())?;
    check_len("nzvals", nnz, nzvals.len())?;
    check_len("colind", nnz, colind.len())?;

    rowptr[..offsets.len()].copy_from_slice(&offsets);

    // Carve the outputs into one disjoint slot per row
    let mut slots = Vec::with_capacity(rows.len());
    let (mut vals_rest, mut cols_rest) = (&mut nzvals[..nnz], &mut colind[..nnz]);
    for &count in &counts {
        let (vals_head, vals_tail) = std::mem::take(&mut vals_rest).split_at_mut(count);
        let (cols_head, cols_tail) = std::mem::take(&mut cols_rest).split_at_mut(count);
        slots.push((vals_head, cols_head));
        vals_rest = vals_tail;
        cols_rest = cols_tail;
    }

    match execution {
        Execution::Serial => {
            for ((out_vals, out_cols), &row) in slots.into_iter().zip(&rows) {
                write_row(row, out_vals, out_cols, sort_rows);
            }
        }
        Execution::Parallel(pool) => {
            let fan_out = || {
                slots
                    .into_par_iter()
                    .zip(rows.par_iter())
                    .for_each(|((out_vals, out_cols), &row)| {
                        write_row(row, out_vals, out_cols, sort_rows)
                    })
            };
            match pool {
                Some(pool) => pool.install(fan_out),
                None => fan_out(),
            }
        }
    }

    Ok(nnz)
}

/// Fills CCS buffers with the owned rows of `matrix`, rows ascending per column
pub(crate) fn extract_ccs<M: DistributedMatrix>(
    matrix: &M,
    nzvals: &mut [M::Scalar],
    rowind: &mut [usize],
    colptr: &mut [usize],
) -> Result<usize> {
    let rows = owned_row_slices(matrix)?;
    let n_cols = matrix.global_num_cols();
    let nnz: usize = rows.iter().map(|(cols, _)| cols.len()).sum();

    check_len("colptr", n_cols + 1, colptr.len())?;
    check_len("nzvals", nnz, nzvals.len())?;
    check_len("rowind", nnz, rowind.len())?;

    Ok(scatter_columns(
        rows.len(),
        n_cols,
        matrix.owned_rows().start,
        |i| rows[i],
        nzvals,
        rowind,
        colptr,
    ))
}
