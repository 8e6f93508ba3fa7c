use std::{fs, path::Path};

use crate::error::LuError;
use crate::matrix::Matrix;
use crate::parse::{parse_matrix, parse_vector};
use crate::solver::Solution;

/// Read a coefficient matrix from a text file.
///
/// # Arguments
///
/// * `path` - The path to the file, one row per line.
///
/// # Returns
///
/// The parsed matrix.
pub fn read_matrix(path: impl AsRef<Path>) -> Result<Matrix, LuError> {
    let text = fs::read_to_string(path)?;
    Ok(parse_matrix(&text)?)
}

/// Read a right-hand side vector from a text file.
///
/// # Arguments
///
/// * `path` - The path to the file, whitespace separated values.
/// * `expected_len` - The number of rows of the matrix.
pub fn read_vector(path: impl AsRef<Path>, expected_len: usize) -> Result<Vec<f64>, LuError> {
    let text = fs::read_to_string(path)?;
    Ok(parse_vector(&text, expected_len)?)
}

/// Write the rendered report of a solution to a file.
pub fn write_report(path: impl AsRef<Path>, solution: &Solution) -> Result<(), LuError> {
    let path = path.as_ref();
    fs::write(path, format!("{solution}\n"))?;
    log::debug!("report written to {}", path.display());
    Ok(())
}

/// Write a solution, trace included, as JSON.
pub fn write_json(path: impl AsRef<Path>, solution: &Solution) -> Result<(), LuError> {
    fs::write(path, solution.to_json()?)?;
    Ok(())
}
