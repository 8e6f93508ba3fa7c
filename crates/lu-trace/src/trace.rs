use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of decimals kept in every displayed or returned value.
pub const DISPLAY_DECIMALS: i32 = 4;

/// Round a value to 4 decimals, half away from zero.
///
/// Only used for display and for the returned artifacts. The factorization
/// and the substitutions always carry full precision forward.
///
/// Negative zero is mapped to zero so the trace never prints `-0`.
///
/// # Example
///
/// ```
/// use lu_trace::round4;
///
/// assert_eq!(round4(2.23455), 2.2346);
/// assert_eq!(round4(2.00001), 2.0);
/// ```
pub fn round4(value: f64) -> f64 {
    let scale = 10f64.powi(DISPLAY_DECIMALS);
    let rounded = (value * scale).round() / scale;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}

/// A single product `lhs·rhs` inside a summation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Term {
    /// Left operand, an entry of L or U.
    #[serde(with = "crate::float_serde")]
    pub lhs: f64,
    /// Right operand, an entry of U, y or x.
    #[serde(with = "crate::float_serde")]
    pub rhs: f64,
}

impl Term {
    /// The full precision product.
    #[inline]
    pub fn product(&self) -> f64 {
        self.lhs * self.rhs
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}·{})", round4(self.lhs), round4(self.rhs))
    }
}

/// Sum the products of a set of terms in order.
pub(crate) fn sum_terms(terms: &[Term]) -> f64 {
    terms.iter().fold(0.0, |acc, t| acc + t.product())
}

/// Render a summation, the empty sum is the literal `0`.
fn format_sum(terms: &[Term]) -> String {
    if terms.is_empty() {
        return "0".to_string();
    }
    terms
        .iter()
        .map(Term::to_string)
        .collect::<Vec<_>>()
        .join(" + ")
}

/// Headings separating the phases of the trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    /// Title of the decomposition phase.
    Decomposition,
    /// Notation reminder.
    Legend,
    /// Start of `Ly = b`.
    ForwardSubstitution,
    /// Start of `Ux = y`.
    BackSubstitution,
}

/// One recorded step of the solve.
///
/// Indices are 0-based, operands are stored with full precision. Rendering
/// through [`fmt::Display`] switches to 1-based indices and rounded values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Step {
    /// A phase heading.
    Section {
        /// Which heading.
        section: Section,
    },
    /// Row `row` was exchanged with row `with` to bring the pivot up.
    Pivot {
        /// The pivot row receiving the largest candidate.
        row: usize,
        /// The row the candidate came from.
        with: usize,
    },
    /// `U[row, col] = A[row, col] - Σ L[row, k]·U[k, col]`.
    UpperEntry {
        /// Row index.
        row: usize,
        /// Column index.
        col: usize,
        /// The entry of the row-permuted A.
        #[serde(with = "crate::float_serde")]
        a: f64,
        /// The products subtracted from `a`.
        terms: Vec<Term>,
        /// The computed entry.
        #[serde(with = "crate::float_serde")]
        value: f64,
    },
    /// `L[index, index] = 1`.
    UnitDiagonal {
        /// Diagonal index.
        index: usize,
    },
    /// `L[row, col] = (A[row, col] - Σ L[row, k]·U[k, col]) / U[col, col]`.
    LowerEntry {
        /// Row index.
        row: usize,
        /// Column index.
        col: usize,
        /// The entry of the row-permuted A.
        #[serde(with = "crate::float_serde")]
        a: f64,
        /// The products subtracted from `a`.
        terms: Vec<Term>,
        /// The divisor `U[col, col]`.
        #[serde(with = "crate::float_serde")]
        pivot: f64,
        /// The computed entry.
        #[serde(with = "crate::float_serde")]
        value: f64,
    },
    /// `y[index] = b[index] - Σ L[index, k]·y[k]`.
    ForwardEntry {
        /// Entry index.
        index: usize,
        /// The entry of the row-permuted b.
        #[serde(with = "crate::float_serde")]
        b: f64,
        /// The products subtracted from `b`.
        terms: Vec<Term>,
        /// The computed entry.
        #[serde(with = "crate::float_serde")]
        value: f64,
    },
    /// `x[index] = (y[index] - Σ U[index, k]·x[k]) / U[index, index]`.
    BackwardEntry {
        /// Entry index.
        index: usize,
        /// The entry of y.
        #[serde(with = "crate::float_serde")]
        y: f64,
        /// The products subtracted from `y`.
        terms: Vec<Term>,
        /// The divisor `U[index, index]`.
        #[serde(with = "crate::float_serde")]
        pivot: f64,
        /// The computed entry.
        #[serde(with = "crate::float_serde")]
        value: f64,
    },
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Section::Decomposition => {
                writeln!(f, "--- LU Decomposition with Partial Pivoting ---")
            }
            Section::Legend => writeln!(
                f,
                "Legend: U[i,j] = upper triangular, L[i,j] = lower triangular, \
                 x[i] = solution, y[i] = intermediate"
            ),
            Section::ForwardSubstitution => {
                write!(f, "\n--- Forward substitution: Ly = b ---")
            }
            Section::BackSubstitution => write!(f, "\n--- Back substitution: Ux = y ---"),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Section { section } => write!(f, "{section}"),
            Step::Pivot { row, with } => {
                write!(f, "Pivoting: swap row {} with row {}", row + 1, with + 1)
            }
            Step::UpperEntry {
                row,
                col,
                a,
                terms,
                value,
            } => {
                let (i, j) = (row + 1, col + 1);
                write!(
                    f,
                    "U[{i},{j}] = A[{i},{j}] - Σ(L[{i},k]·U[k,{j}]) = {} - ({}) = {}",
                    round4(*a),
                    format_sum(terms),
                    round4(*value)
                )
            }
            Step::UnitDiagonal { index } => {
                write!(f, "L[{0},{0}] = 1 (diagonal)", index + 1)
            }
            Step::LowerEntry {
                row,
                col,
                a,
                terms,
                pivot,
                value,
            } => {
                let (j, i) = (row + 1, col + 1);
                write!(
                    f,
                    "L[{j},{i}] = (A[{j},{i}] - Σ(L[{j},k]·U[k,{i}])) / U[{i},{i}] = ({} - ({})) / {} = {}",
                    round4(*a),
                    format_sum(terms),
                    round4(*pivot),
                    round4(*value)
                )
            }
            Step::ForwardEntry {
                index,
                b,
                terms,
                value,
            } => {
                let i = index + 1;
                write!(
                    f,
                    "y[{i}] = b[{i}] - Σ(L[{i},k]·y[k]) = {} - ({}) = {}",
                    round4(*b),
                    format_sum(terms),
                    round4(*value)
                )
            }
            Step::BackwardEntry {
                index,
                y,
                terms,
                pivot,
                value,
            } => {
                let i = index + 1;
                write!(
                    f,
                    "x[{i}] = (y[{i}] - Σ(U[{i},k]·x[k])) / U[{i},{i}] = ({} - ({})) / {} = {}",
                    round4(*y),
                    format_sum(terms),
                    round4(*pivot),
                    round4(*value)
                )
            }
        }
    }
}

/// Ordered, append-only log of the steps of a solve.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Trace {
    steps: Vec<Step>,
}

impl Trace {
    /// Create an empty trace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a step.
    pub fn push(&mut self, step: Step) {
        self.steps.push(step);
    }

    /// Append all the steps of another trace.
    pub fn append(&mut self, other: Trace) {
        self.steps.extend(other.steps);
    }

    /// The recorded steps.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Number of recorded steps.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether nothing has been recorded.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The row swaps recorded so far, as `(row, with)` pairs.
    pub fn pivots(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.steps.iter().filter_map(|s| match s {
            Step::Pivot { row, with } => Some((*row, *with)),
            _ => None,
        })
    }
}

impl<'a> IntoIterator for &'a Trace {
    type Item = &'a Step;
    type IntoIter = std::slice::Iter<'a, Step>;

    fn into_iter(self) -> Self::IntoIter {
        self.steps.iter()
    }
}

/// One step per line, headings keep their blank separator lines.
impl fmt::Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{step}")?;
        }
        Ok(())
    }
}
