use std::fmt;

/// Where an invalid token was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenLocation {
    /// A row of the matrix, 1-based.
    Row(usize),
    /// The right-hand side vector.
    Vector,
}

impl fmt::Display for TokenLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenLocation::Row(row) => write!(f, "in row {row}"),
            TokenLocation::Vector => write!(f, "in vector b"),
        }
    }
}

/// Validation errors raised while parsing the text input.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    /// The input text is blank.
    #[error("{what} cannot be empty. Please enter values.")]
    EmptyInput {
        /// Name of the input, e.g. `Matrix A`.
        what: &'static str,
    },

    /// The matrix text contains an empty line.
    #[error("Matrix A contains an empty line at row {row}. Remove extra blank lines.")]
    BlankLine {
        /// 1-based line number.
        row: usize,
    },

    /// A token is not a finite number.
    #[error("Invalid number '{token}' {location}. Only numeric values allowed.")]
    InvalidNumber {
        /// The offending token.
        token: String,
        /// Where the token was found.
        location: TokenLocation,
    },

    /// A matrix row has a different number of columns than the first row.
    #[error("Row {row} has a different number of columns ({len}). All rows must have {expected} columns.")]
    RaggedRow {
        /// 1-based row number.
        row: usize,
        /// Number of columns found in the row.
        len: usize,
        /// Number of columns of the first row.
        expected: usize,
    },

    /// The vector does not have one entry per matrix row.
    #[error("Vector b must have {expected} elements. You entered {actual}.")]
    LengthMismatch {
        /// Number of rows of the matrix.
        expected: usize,
        /// Number of tokens found.
        actual: usize,
    },
}

/// Error type for the solver.
#[derive(thiserror::Error, Debug)]
pub enum LuError {
    /// The text input failed validation.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The data length does not match the matrix size.
    #[error("Data length ({0}) does not match the matrix size ({1})")]
    InvalidShape(usize, usize),

    /// The coefficient matrix is not square.
    #[error("Matrix A must be square (n × n), got {rows} × {cols}.")]
    NotSquare {
        /// Number of rows.
        rows: usize,
        /// Number of columns.
        cols: usize,
    },

    /// The selected pivot is zero (or below the configured tolerance).
    #[error("Zero pivot encountered at row {row} (value {value}). Matrix may be singular.")]
    SingularPivot {
        /// 1-based pivot row.
        row: usize,
        /// The pivot value.
        value: f64,
    },

    /// Error reading or writing a file.
    #[error("error reading or writing file: {0}")]
    IoError(#[from] std::io::Error),

    /// Error serializing the solution.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_messages() {
        let err = ParseError::RaggedRow {
            row: 2,
            len: 1,
            expected: 2,
        };
        assert_eq!(
            err.to_string(),
            "Row 2 has a different number of columns (1). All rows must have 2 columns."
        );

        let err = ParseError::InvalidNumber {
            token: "abc".to_string(),
            location: TokenLocation::Row(3),
        };
        assert_eq!(
            err.to_string(),
            "Invalid number 'abc' in row 3. Only numeric values allowed."
        );

        let err = ParseError::LengthMismatch {
            expected: 3,
            actual: 2,
        };
        assert_eq!(
            err.to_string(),
            "Vector b must have 3 elements. You entered 2."
        );
    }

    #[test]
    fn test_lu_error_is_transparent_over_parse() {
        let err: LuError = ParseError::EmptyInput { what: "Matrix A" }.into();
        assert_eq!(
            err.to_string(),
            "Matrix A cannot be empty. Please enter values."
        );
    }

    #[test]
    fn test_io_error_message_keeps_source() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "a.txt not found");
        let err = LuError::from(io);
        assert_eq!(
            err.to_string(),
            "error reading or writing file: a.txt not found"
        );
    }
}
