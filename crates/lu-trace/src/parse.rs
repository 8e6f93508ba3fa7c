use crate::error::{ParseError, TokenLocation};
use crate::matrix::Matrix;

/// Parse a single token as a finite `f64`.
fn parse_token(token: &str, location: TokenLocation) -> Result<f64, ParseError> {
    token
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ParseError::InvalidNumber {
            token: token.to_string(),
            location,
        })
}

/// Parse the coefficient matrix from free-form text.
///
/// One row per line, columns separated by whitespace.
///
/// # Arguments
///
/// * `text` - The raw matrix text.
///
/// # Returns
///
/// The validated rectangular matrix. Squareness is checked by the solver.
///
/// # Errors
///
/// Checked in this order: blank input, blank lines, invalid tokens, then rows
/// whose length differs from the first row.
///
/// # Example
///
/// ```
/// use lu_trace::parse::parse_matrix;
///
/// let a = parse_matrix("1 2\n3 4").unwrap();
/// assert_eq!(a.as_slice(), &[1.0, 2.0, 3.0, 4.0]);
/// ```
pub fn parse_matrix(text: &str) -> Result<Matrix, ParseError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ParseError::EmptyInput { what: "Matrix A" });
    }

    let lines = text.lines().collect::<Vec<_>>();
    if let Some(idx) = lines.iter().position(|line| line.trim().is_empty()) {
        return Err(ParseError::BlankLine { row: idx + 1 });
    }

    let rows = lines
        .iter()
        .enumerate()
        .map(|(idx, line)| {
            line.split_whitespace()
                .map(|token| parse_token(token, TokenLocation::Row(idx + 1)))
                .collect::<Result<Vec<_>, _>>()
        })
        .collect::<Result<Vec<_>, _>>()?;

    // NOTE: rows is non-empty since the trimmed text is non-empty
    let ncols = rows[0].len();
    if let Some((idx, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != ncols) {
        return Err(ParseError::RaggedRow {
            row: idx + 1,
            len: row.len(),
            expected: ncols,
        });
    }

    let nrows = rows.len();
    Ok(Matrix::from_validated(
        nrows,
        ncols,
        rows.into_iter().flatten().collect(),
    ))
}

/// Parse the right-hand side vector from free-form text.
///
/// # Arguments
///
/// * `text` - Whitespace separated numbers.
/// * `expected_len` - Required number of entries, the row count of the matrix.
///
/// # Errors
///
/// Checked in this order: blank input, token count, invalid tokens.
pub fn parse_vector(text: &str, expected_len: usize) -> Result<Vec<f64>, ParseError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ParseError::EmptyInput { what: "Vector b" });
    }

    let parts = text.split_whitespace().collect::<Vec<_>>();
    if parts.len() != expected_len {
        return Err(ParseError::LengthMismatch {
            expected: expected_len,
            actual: parts.len(),
        });
    }

    parts
        .into_iter()
        .map(|token| parse_token(token, TokenLocation::Vector))
        .collect()
}
