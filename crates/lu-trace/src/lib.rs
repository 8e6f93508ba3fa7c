#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for parsing and solving.
pub mod error;

/// Reading systems from files and writing reports.
pub mod io;

/// LU decomposition with partial pivoting.
pub mod lu;

mod float_serde;

/// Dense row-major matrix.
pub mod matrix;

/// Parsing of the matrix and vector text input.
pub mod parse;

/// End-to-end solve and the final report.
pub mod solver;

/// Forward and backward substitution.
pub mod substitution;

/// Recorded steps and their human readable rendering.
pub mod trace;

pub use crate::error::{LuError, ParseError, TokenLocation};
pub use crate::lu::{factorize, Factorization};
pub use crate::matrix::Matrix;
pub use crate::solver::{solve, solve_text, SingularPolicy, Solution, SolverOptions};
pub use crate::trace::{round4, Section, Step, Term, Trace};
