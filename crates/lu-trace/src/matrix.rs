use std::fmt;
use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};

use crate::error::LuError;

/// A dense matrix of `f64` values stored in row-major order.
///
/// The matrix owns its storage. Solving consumes the caller's matrix (or a
/// clone of it) so row swaps never leak back into the input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    #[serde(with = "crate::float_serde::vec")]
    data: Vec<f64>,
}

impl Matrix {
    /// Create a new matrix from row-major data.
    ///
    /// # Arguments
    ///
    /// * `rows` - The number of rows.
    /// * `cols` - The number of columns.
    /// * `data` - The values in row-major order.
    ///
    /// # Errors
    ///
    /// Returns [`LuError::InvalidShape`] if `data.len() != rows * cols`.
    ///
    /// # Example
    ///
    /// ```
    /// use lu_trace::Matrix;
    ///
    /// let a = Matrix::new(2, 2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
    /// assert_eq!(a[(1, 0)], 3.0);
    /// ```
    pub fn new(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self, LuError> {
        if data.len() != rows * cols {
            return Err(LuError::InvalidShape(data.len(), rows * cols));
        }
        Ok(Self { rows, cols, data })
    }

    /// Create a matrix from a list of rows.
    ///
    /// All rows must have the length of the first one.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self, LuError> {
        let nrows = rows.len();
        let ncols = rows.first().map_or(0, Vec::len);
        if let Some(row) = rows.iter().find(|r| r.len() != ncols) {
            return Err(LuError::InvalidShape(row.len(), ncols));
        }
        let data = rows.into_iter().flatten().collect::<Vec<_>>();
        Self::new(nrows, ncols, data)
    }

    /// Build a matrix from storage already known to hold `rows * cols` values.
    pub(crate) fn from_validated(rows: usize, cols: usize, data: Vec<f64>) -> Self {
        debug_assert_eq!(data.len(), rows * cols);
        Self { rows, cols, data }
    }

    /// Create a matrix filled with zeros.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// The number of rows.
    #[inline]
    pub fn nrows(&self) -> usize {
        self.rows
    }

    /// The number of columns.
    #[inline]
    pub fn ncols(&self) -> usize {
        self.cols
    }

    /// Whether the matrix has as many rows as columns.
    #[inline]
    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// The underlying row-major storage.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    /// Borrow a single row.
    pub fn row(&self, i: usize) -> &[f64] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    /// Iterate over the rows of the matrix.
    pub fn row_iter(&self) -> impl Iterator<Item = &[f64]> {
        // NOTE: chunks(0) panics, an empty matrix has no rows anyway
        self.data.chunks(self.cols.max(1))
    }

    /// Swap two rows in place.
    pub fn swap_rows(&mut self, a: usize, b: usize) {
        self.swap_row_prefix(a, b, self.cols);
    }

    /// Swap the first `len` entries of two rows in place.
    pub fn swap_row_prefix(&mut self, a: usize, b: usize, len: usize) {
        if a == b {
            return;
        }
        for j in 0..len {
            self.data.swap(a * self.cols + j, b * self.cols + j);
        }
    }

    /// Apply a function to every entry and return the new matrix.
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        Self {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|&v| f(v)).collect(),
        }
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    #[inline]
    fn index(&self, (i, j): (usize, usize)) -> &f64 {
        &self.data[i * self.cols + j]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    #[inline]
    fn index_mut(&mut self, (i, j): (usize, usize)) -> &mut f64 {
        &mut self.data[i * self.cols + j]
    }
}

/// Rows on separate lines, entries separated by a single space.
impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.row_iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", join_values(row))?;
        }
        Ok(())
    }
}

/// Join values with a single space using the shortest `f64` representation.
pub(crate) fn join_values(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_invalid_shape() {
        let res = Matrix::new(2, 2, vec![1.0, 2.0, 3.0]);
        assert!(matches!(res, Err(LuError::InvalidShape(3, 4))));

        let res = Matrix::from_rows(vec![vec![1.0], vec![2.0, 3.0]]);
        assert!(matches!(res, Err(LuError::InvalidShape(2, 1))));
    }

    #[test]
    fn test_swap_rows() -> Result<(), LuError> {
        let mut m = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]])?;
        m.swap_rows(0, 1);
        assert_eq!(m.as_slice(), &[3.0, 4.0, 1.0, 2.0]);
        Ok(())
    }

    #[test]
    fn test_swap_row_prefix() -> Result<(), LuError> {
        let mut m = Matrix::from_rows(vec![
            vec![1.0, 2.0, 3.0],
            vec![4.0, 5.0, 6.0],
            vec![7.0, 8.0, 9.0],
        ])?;
        m.swap_row_prefix(0, 2, 1);
        assert_eq!(m.row(0), &[7.0, 2.0, 3.0]);
        assert_eq!(m.row(2), &[1.0, 8.0, 9.0]);
        Ok(())
    }

    #[test]
    fn test_display() -> Result<(), LuError> {
        let a = Matrix::from_rows(vec![vec![1.0, 0.0], vec![0.5, -1.25]])?;
        assert_eq!(a.to_string(), "1 0\n0.5 -1.25");
        Ok(())
    }
}
