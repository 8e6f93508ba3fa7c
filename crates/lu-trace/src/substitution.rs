use crate::error::LuError;
use crate::matrix::Matrix;
use crate::trace::{sum_terms, Section, Step, Term, Trace};

/// Check that `m` is square and that `v` has one entry per row.
fn check_system(m: &Matrix, v: &[f64]) -> Result<usize, LuError> {
    if !m.is_square() {
        return Err(LuError::NotSquare {
            rows: m.nrows(),
            cols: m.ncols(),
        });
    }
    if v.len() != m.nrows() {
        return Err(LuError::InvalidShape(v.len(), m.nrows()));
    }
    Ok(m.nrows())
}

/// Solve `L y = b` top to bottom.
///
/// `L` has a unit diagonal so no division takes place.
///
/// # Arguments
///
/// * `l` - The unit lower triangular factor.
/// * `b` - The right-hand side, already permuted like the rows of `l`.
///
/// # Returns
///
/// The full precision vector `y` and the recorded steps, starting with the
/// forward substitution heading.
///
/// # Errors
///
/// * [`LuError::NotSquare`] if `l` is not square.
/// * [`LuError::InvalidShape`] if `b` does not have one entry per row.
pub fn forward_substitution(l: &Matrix, b: &[f64]) -> Result<(Vec<f64>, Trace), LuError> {
    let n = check_system(l, b)?;

    let mut trace = Trace::new();
    trace.push(Step::Section {
        section: Section::ForwardSubstitution,
    });

    let mut y = vec![0.0; n];
    for i in 0..n {
        let terms = (0..i)
            .map(|k| Term {
                lhs: l[(i, k)],
                rhs: y[k],
            })
            .collect::<Vec<_>>();
        y[i] = b[i] - sum_terms(&terms);
        trace.push(Step::ForwardEntry {
            index: i,
            b: b[i],
            terms,
            value: y[i],
        });
    }

    Ok((y, trace))
}

/// Solve `U x = y` bottom to top.
///
/// A zero on the diagonal of `U` yields non-finite entries, the factorization
/// is responsible for rejecting such matrices.
///
/// # Errors
///
/// Same shape checks as [`forward_substitution`].
pub fn backward_substitution(u: &Matrix, y: &[f64]) -> Result<(Vec<f64>, Trace), LuError> {
    let n = check_system(u, y)?;

    let mut trace = Trace::new();
    trace.push(Step::Section {
        section: Section::BackSubstitution,
    });

    let mut x = vec![0.0; n];
    for i in (0..n).rev() {
        let terms = ((i + 1)..n)
            .map(|k| Term {
                lhs: u[(i, k)],
                rhs: x[k],
            })
            .collect::<Vec<_>>();
        let pivot = u[(i, i)];
        x[i] = (y[i] - sum_terms(&terms)) / pivot;
        trace.push(Step::BackwardEntry {
            index: i,
            y: y[i],
            terms,
            pivot,
            value: x[i],
        });
    }

    if x.iter().any(|v| !v.is_finite()) {
        log::warn!("back substitution produced non-finite values: {:?}", x);
    }

    Ok((x, trace))
}
