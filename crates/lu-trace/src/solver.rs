use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::LuError;
use crate::lu::factorize;
use crate::matrix::{join_values, Matrix};
use crate::parse::{parse_matrix, parse_vector};
use crate::substitution::{backward_substitution, forward_substitution};
use crate::trace::{round4, Trace};

/// What to do when a pivot vanishes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SingularPolicy {
    /// Stop with [`LuError::SingularPivot`].
    #[default]
    Fail,
    /// Keep going and let infinities and NaNs flow into the results.
    Propagate,
}

/// Structure to define the solver parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverOptions {
    /// Behaviour on a pivot whose magnitude is at most `pivot_tolerance`.
    pub singular_policy: SingularPolicy,
    /// Pivots with a magnitude at or below this value are singular.
    pub pivot_tolerance: f64,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            singular_policy: SingularPolicy::Fail,
            pivot_tolerance: 0.0,
        }
    }
}

/// The solution of `A x = b` with its derivation.
///
/// Every number is rounded to 4 decimals, see [`round4`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Solution {
    /// Unit lower triangular factor.
    pub l: Matrix,
    /// Upper triangular factor.
    pub u: Matrix,
    /// Intermediate vector, `L y = P b`.
    #[serde(with = "crate::float_serde::vec")]
    pub y: Vec<f64>,
    /// The solution, `U x = y`.
    #[serde(with = "crate::float_serde::vec")]
    pub x: Vec<f64>,
    /// `permutation[i]` is the original row of A that ended up at row `i`.
    pub permutation: Vec<usize>,
    /// Every step of the decomposition and the substitutions.
    pub trace: Trace,
}

impl Solution {
    /// Serialize the solution, trace included, as pretty printed JSON.
    pub fn to_json(&self) -> Result<String, LuError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// The report shown to the user: banner, trace, factors, then vectors.
impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "LU Decomposition with Partial Pivoting Successful!")?;
        writeln!(f)?;
        writeln!(f, "Step-by-step computation (mathematical expressions):")?;
        writeln!(f, "{}", self.trace)?;
        writeln!(f)?;
        writeln!(f, "Lower Triangular Matrix L:")?;
        writeln!(f, "{}", self.l)?;
        writeln!(f)?;
        writeln!(f, "Upper Triangular Matrix U:")?;
        writeln!(f, "{}", self.u)?;
        writeln!(f)?;
        writeln!(f, "Intermediate vector y (Ly = b):")?;
        writeln!(f, "{}", join_values(&self.y))?;
        writeln!(f)?;
        writeln!(f, "Solution x (Ux = y):")?;
        write!(f, "{}", join_values(&self.x))
    }
}

/// Solve `A x = b` with LU decomposition and partial pivoting.
///
/// Takes ownership of the inputs, clone them to keep the originals.
///
/// # Arguments
///
/// * `a` - The square coefficient matrix.
/// * `b` - The right-hand side.
/// * `options` - The solver options.
///
/// # Example
///
/// ```
/// use lu_trace::{solve, Matrix, SolverOptions};
///
/// let a = Matrix::from_rows(vec![vec![2.0, 1.0], vec![4.0, 3.0]]).unwrap();
/// let solution = solve(a, vec![5.0, 11.0], &SolverOptions::default()).unwrap();
/// assert_eq!(solution.x, vec![2.0, 1.0]);
/// ```
pub fn solve(a: Matrix, b: Vec<f64>, options: &SolverOptions) -> Result<Solution, LuError> {
    let factorization = factorize(a, b, options)?;

    let (y, forward) = forward_substitution(&factorization.l, &factorization.b)?;
    let (x, backward) = backward_substitution(&factorization.u, &y)?;

    let mut trace = factorization.trace;
    trace.append(forward);
    trace.append(backward);

    Ok(Solution {
        l: factorization.l.map(round4),
        u: factorization.u.map(round4),
        y: y.into_iter().map(round4).collect(),
        x: x.into_iter().map(round4).collect(),
        permutation: factorization.permutation,
        trace,
    })
}

/// Parse the two text blocks and solve the system.
///
/// The expected vector length is the number of rows of the parsed matrix.
///
/// # Example
///
/// ```
/// use lu_trace::{solve_text, SolverOptions};
///
/// let solution = solve_text("2 1\n4 3", "5 11", &SolverOptions::default()).unwrap();
/// assert_eq!(solution.x, vec![2.0, 1.0]);
/// ```
pub fn solve_text(
    matrix_text: &str,
    vector_text: &str,
    options: &SolverOptions,
) -> Result<Solution, LuError> {
    let a = parse_matrix(matrix_text)?;
    let b = parse_vector(vector_text, a.nrows())?;
    solve(a, b, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ParseError;
    use crate::trace::Step;

    #[test]
    fn test_solve_2x2() -> Result<(), LuError> {
        let solution = solve_text("2 1\n4 3", "5 11", &SolverOptions::default())?;
        assert_eq!(solution.l.as_slice(), &[1.0, 0.0, 0.5, 1.0]);
        assert_eq!(solution.u.as_slice(), &[4.0, 3.0, 0.0, -0.5]);
        assert_eq!(solution.y, vec![11.0, -0.5]);
        assert_eq!(solution.x, vec![2.0, 1.0]);
        assert_eq!(solution.permutation, vec![1, 0]);
        Ok(())
    }

    #[test]
    fn test_solve_rounds_artifacts() -> Result<(), LuError> {
        let solution = solve_text("3 0\n0 3", "1 2", &SolverOptions::default())?;
        assert_eq!(solution.x, vec![0.3333, 0.6667]);
        Ok(())
    }

    #[test]
    fn test_solve_text_errors() {
        assert!(matches!(
            solve_text("", "1", &SolverOptions::default()),
            Err(LuError::Parse(ParseError::EmptyInput { what: "Matrix A" }))
        ));
        assert!(matches!(
            solve_text("1 2\n3 4", "5 6 7", &SolverOptions::default()),
            Err(LuError::Parse(ParseError::LengthMismatch {
                expected: 2,
                actual: 3
            }))
        ));
        assert!(matches!(
            solve_text("1 2 3\n4 5 6", "1 2", &SolverOptions::default()),
            Err(LuError::NotSquare { rows: 2, cols: 3 })
        ));
    }

    #[test]
    fn test_solve_propagate_singular() -> Result<(), LuError> {
        let options = SolverOptions {
            singular_policy: SingularPolicy::Propagate,
            ..Default::default()
        };
        let solution = solve_text("1 2\n2 4", "1 2", &options)?;
        assert!(solution.x.iter().any(|v| !v.is_finite()));
        Ok(())
    }

    #[test]
    fn test_trace_sections_in_order() -> Result<(), LuError> {
        let solution = solve_text("2 1\n4 3", "5 11", &SolverOptions::default())?;
        let text = solution.trace.to_string();
        let decomposition = text.find("--- LU Decomposition");
        let forward = text.find("--- Forward substitution");
        let backward = text.find("--- Back substitution");
        assert!(decomposition < forward && forward < backward);
        assert!(matches!(
            solution.trace.steps().last(),
            Some(Step::BackwardEntry { index: 0, .. })
        ));
        Ok(())
    }

    #[test]
    fn test_report() -> Result<(), LuError> {
        let solution = solve_text("2 1\n4 3", "5 11", &SolverOptions::default())?;
        let expected = "\
LU Decomposition with Partial Pivoting Successful!

Step-by-step computation (mathematical expressions):
--- LU Decomposition with Partial Pivoting ---

Legend: U[i,j] = upper triangular, L[i,j] = lower triangular, x[i] = solution, y[i] = intermediate

Pivoting: swap row 1 with row 2
U[1,1] = A[1,1] - Σ(L[1,k]·U[k,1]) = 4 - (0) = 4
U[1,2] = A[1,2] - Σ(L[1,k]·U[k,2]) = 3 - (0) = 3
L[1,1] = 1 (diagonal)
L[2,1] = (A[2,1] - Σ(L[2,k]·U[k,1])) / U[1,1] = (2 - (0)) / 4 = 0.5
U[2,2] = A[2,2] - Σ(L[2,k]·U[k,2]) = 1 - ((0.5·3)) = -0.5
L[2,2] = 1 (diagonal)

--- Forward substitution: Ly = b ---
y[1] = b[1] - Σ(L[1,k]·y[k]) = 11 - (0) = 11
y[2] = b[2] - Σ(L[2,k]·y[k]) = 5 - ((0.5·11)) = -0.5

--- Back substitution: Ux = y ---
x[2] = (y[2] - Σ(U[2,k]·x[k])) / U[2,2] = (-0.5 - (0)) / -0.5 = 1
x[1] = (y[1] - Σ(U[1,k]·x[k])) / U[1,1] = (11 - ((3·1))) / 4 = 2

Lower Triangular Matrix L:
1 0
0.5 1

Upper Triangular Matrix U:
4 3
0 -0.5

Intermediate vector y (Ly = b):
11 -0.5

Solution x (Ux = y):
2 1";
        assert_eq!(solution.to_string(), expected);
        Ok(())
    }

    #[test]
    fn test_to_json() -> Result<(), LuError> {
        let solution = solve_text("2 1\n4 3", "5 11", &SolverOptions::default())?;
        let json = solution.to_json()?;
        let back: Solution = serde_json::from_str(&json)?;
        assert_eq!(back, solution);
        Ok(())
    }

    #[test]
    fn test_to_json_keeps_non_finite_values() -> Result<(), LuError> {
        let options = SolverOptions {
            singular_policy: SingularPolicy::Propagate,
            ..Default::default()
        };

        let solution = solve_text("1 2\n2 4", "1 2", &options)?;
        assert!(solution.x.iter().all(|v| v.is_nan()));
        let json = solution.to_json()?;
        assert!(json.contains("\"NaN\""));
        let back: Solution = serde_json::from_str(&json)?;
        assert!(back.x.iter().all(|v| v.is_nan()));
        assert_eq!(back.trace.len(), solution.trace.len());

        let solution = solve_text("1 1\n1 1", "1 2", &options)?;
        assert_eq!(solution.x, vec![f64::NEG_INFINITY, f64::INFINITY]);
        let json = solution.to_json()?;
        assert!(json.contains("\"-inf\"") && json.contains("\"inf\""));
        let back: Solution = serde_json::from_str(&json)?;
        assert_eq!(back, solution);
        Ok(())
    }
}
