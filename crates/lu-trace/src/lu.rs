use serde::{Deserialize, Serialize};

use crate::error::LuError;
use crate::matrix::Matrix;
use crate::solver::{SingularPolicy, SolverOptions};
use crate::trace::{sum_terms, Section, Step, Term, Trace};

/// Result of the LU decomposition with partial pivoting.
///
/// All values keep full precision. `l * u` equals `a`, the input matrix with
/// its rows reordered by `permutation`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Factorization {
    /// Unit lower triangular factor.
    pub l: Matrix,
    /// Upper triangular factor.
    pub u: Matrix,
    /// The coefficient matrix after all row swaps.
    pub a: Matrix,
    /// The right-hand side after all row swaps.
    #[serde(with = "crate::float_serde::vec")]
    pub b: Vec<f64>,
    /// `permutation[i]` is the original row now stored at row `i`.
    pub permutation: Vec<usize>,
    /// The recorded steps, starting with the decomposition heading.
    pub trace: Trace,
}

/// Active entry of column `col` in row `row`, i.e. what is left of `A[row, col]`
/// once the previous columns have been eliminated.
fn reduced_entry(a: &Matrix, l: &Matrix, u: &Matrix, row: usize, col: usize) -> f64 {
    a[(row, col)] - (0..col).fold(0.0, |acc, k| acc + l[(row, k)] * u[(k, col)])
}

/// Find the row `k >= col` holding the largest reduced entry in magnitude.
///
/// Ties keep the upper row, so no swap happens when the diagonal already wins.
fn select_pivot(a: &Matrix, l: &Matrix, u: &Matrix, col: usize) -> usize {
    let n = a.nrows();
    let mut max_row = col;
    let mut max_val = reduced_entry(a, l, u, col, col).abs();
    for row in (col + 1)..n {
        let val = reduced_entry(a, l, u, row, col).abs();
        if val > max_val {
            max_val = val;
            max_row = row;
        }
    }
    max_row
}

/// Decompose `a` into `L * U` with partial pivoting, recording every step.
///
/// The matrix and the right-hand side are taken by value; their rows are
/// swapped in lockstep and returned in the [`Factorization`].
///
/// For each column `i`:
///
/// 1. the row with the largest reduced entry in column `i` is swapped into
///    position `i` (rows of A, b and the computed part of L),
/// 2. row `i` of U is computed as `U[i,j] = A[i,j] - Σ L[i,k]·U[k,j]`,
/// 3. column `i` of L is computed as `L[j,i] = (A[j,i] - Σ L[j,k]·U[k,i]) / U[i,i]`.
///
/// The pivot candidates are the reduced entries of column `i`, not the raw
/// entries of A. From the second column on this can pick a different row than
/// a scan of the raw column: on `[[1, 1, 0], [1, 1, 1], [1, 0, 1]]` rows 2 and
/// 3 are swapped although the raw column is all ones.
///
/// # Arguments
///
/// * `a` - The square coefficient matrix.
/// * `b` - The right-hand side, one entry per row of `a`.
/// * `options` - The solver options, see [`SolverOptions`].
///
/// # Errors
///
/// * [`LuError::NotSquare`] if `a` is not square.
/// * [`LuError::InvalidShape`] if `b` does not have one entry per row.
/// * [`LuError::SingularPivot`] if a pivot is within the tolerance and the
///   policy is [`SingularPolicy::Fail`].
pub fn factorize(
    mut a: Matrix,
    mut b: Vec<f64>,
    options: &SolverOptions,
) -> Result<Factorization, LuError> {
    if !a.is_square() {
        return Err(LuError::NotSquare {
            rows: a.nrows(),
            cols: a.ncols(),
        });
    }

    let n = a.nrows();
    if b.len() != n {
        return Err(LuError::InvalidShape(b.len(), n));
    }

    let mut l = Matrix::zeros(n, n);
    let mut u = Matrix::zeros(n, n);
    let mut permutation = (0..n).collect::<Vec<_>>();

    let mut trace = Trace::new();
    trace.push(Step::Section {
        section: Section::Decomposition,
    });
    trace.push(Step::Section {
        section: Section::Legend,
    });

    for i in 0..n {
        let max_row = select_pivot(&a, &l, &u, i);
        if max_row != i {
            a.swap_rows(i, max_row);
            b.swap(i, max_row);
            // only the columns of L computed so far travel with the row
            l.swap_row_prefix(i, max_row, i);
            permutation.swap(i, max_row);
            log::debug!("column {}: swap row {} with row {}", i + 1, i + 1, max_row + 1);
            trace.push(Step::Pivot {
                row: i,
                with: max_row,
            });
        }

        // row i of U
        for j in i..n {
            let terms = (0..i)
                .map(|k| Term {
                    lhs: l[(i, k)],
                    rhs: u[(k, j)],
                })
                .collect::<Vec<_>>();
            let value = a[(i, j)] - sum_terms(&terms);
            u[(i, j)] = value;
            trace.push(Step::UpperEntry {
                row: i,
                col: j,
                a: a[(i, j)],
                terms,
                value,
            });
        }

        let pivot = u[(i, i)];
        if pivot.is_nan() || pivot.abs() <= options.pivot_tolerance {
            match options.singular_policy {
                SingularPolicy::Fail => {
                    return Err(LuError::SingularPivot {
                        row: i + 1,
                        value: pivot,
                    })
                }
                SingularPolicy::Propagate => {
                    log::warn!(
                        "pivot {} at row {} is singular, propagating non-finite values",
                        pivot,
                        i + 1
                    );
                }
            }
        }

        // column i of L
        l[(i, i)] = 1.0;
        trace.push(Step::UnitDiagonal { index: i });

        for j in (i + 1)..n {
            let terms = (0..i)
                .map(|k| Term {
                    lhs: l[(j, k)],
                    rhs: u[(k, i)],
                })
                .collect::<Vec<_>>();
            let value = (a[(j, i)] - sum_terms(&terms)) / pivot;
            l[(j, i)] = value;
            trace.push(Step::LowerEntry {
                row: j,
                col: i,
                a: a[(j, i)],
                terms,
                pivot,
                value,
            });
        }
    }

    log::debug!(
        "factorized {n}x{n} matrix with permutation {:?}",
        permutation
    );

    Ok(Factorization {
        l,
        u,
        a,
        b,
        permutation,
        trace,
    })
}
