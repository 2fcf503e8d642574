use std::{
    fmt::Display,
    ops::{Index, IndexMut, Mul},
};

use thiserror::Error;

use crate::{domains::rational::Rational, printer::MatrixPrinter};

/// A dense matrix of exact rationals, stored row-major.
#[derive(Clone, Hash, PartialEq, Eq, Debug)]
pub struct Matrix {
    pub(crate) data: Vec<Rational>,
    pub(crate) nrows: u32,
    pub(crate) ncols: u32,
}

/// Errors that can occur when performing matrix operations.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MatrixError {
    #[error("Augmented matrix must be at least 1x2, got {nrows}x{ncols}")]
    TooSmall { nrows: u32, ncols: u32 },
    #[error("The matrix is not square: {nrows}x{ncols}")]
    NotSquare { nrows: u32, ncols: u32 },
    #[error("The matrix is singular")]
    Singular,
    #[error("All rows must be the same size: row {row} has {found} entries instead of {expected}")]
    RowWidth {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("The shape of the matrix is not compatible")]
    ShapeMismatch,
}

impl MatrixError {
    /// Return true iff the error is caused by the dimensions of the input.
    pub fn is_dimension_error(&self) -> bool {
        matches!(
            self,
            MatrixError::TooSmall { .. } | MatrixError::NotSquare { .. }
        )
    }
}

impl Matrix {
    /// Create a new zeroed matrix with `nrows` rows and `ncols` columns.
    pub fn new(nrows: u32, ncols: u32) -> Matrix {
        Matrix {
            data: vec![Rational::zero(); nrows as usize * ncols as usize],
            nrows,
            ncols,
        }
    }

    /// Create a new square matrix with `nrows` rows and ones on the main diagonal and zeroes elsewhere.
    pub fn identity(nrows: u32) -> Matrix {
        Matrix {
            data: (0..nrows as usize * nrows as usize)
                .map(|i| {
                    if i % nrows as usize == i / nrows as usize {
                        Rational::one()
                    } else {
                        Rational::zero()
                    }
                })
                .collect(),
            nrows,
            ncols: nrows,
        }
    }

    /// Convert a linear representation of a matrix to a `Matrix`.
    pub fn from_linear(data: Vec<Rational>, nrows: u32, ncols: u32) -> Result<Matrix, MatrixError> {
        if data.len() == nrows as usize * ncols as usize {
            Ok(Matrix { data, nrows, ncols })
        } else {
            Err(MatrixError::ShapeMismatch)
        }
    }

    /// Create a new matrix from a 2-dimensional vector of scalars.
    /// All rows must have the same length.
    pub fn from_nested_vec(matrix: Vec<Vec<Rational>>) -> Result<Matrix, MatrixError> {
        let nrows = matrix.len();
        let cols = matrix.first().map(|r| r.len()).unwrap_or(0);

        let mut data = Vec::with_capacity(nrows * cols);
        for (row, d) in matrix.into_iter().enumerate() {
            if d.len() != cols {
                return Err(MatrixError::RowWidth {
                    row,
                    expected: cols,
                    found: d.len(),
                });
            }

            data.extend(d);
        }

        Ok(Matrix {
            data,
            nrows: nrows as u32,
            ncols: cols as u32,
        })
    }

    /// Return the number of rows.
    pub fn nrows(&self) -> usize {
        self.nrows as usize
    }

    /// Return the number of columns.
    pub fn ncols(&self) -> usize {
        self.ncols as usize
    }

    pub fn is_square(&self) -> bool {
        self.nrows == self.ncols
    }

    /// Return true iff the matrix is square with exact ones on the diagonal and exact zeroes elsewhere.
    pub fn is_identity(&self) -> bool {
        self.is_square()
            && self.data.iter().enumerate().all(|(i, e)| {
                if i as u32 % self.ncols == i as u32 / self.ncols {
                    e.is_one()
                } else {
                    e == &Rational::zero()
                }
            })
    }

    /// Return the column of the first non-zero entry of `row`, scanning the full width,
    /// or `None` if the row is empty.
    pub fn leading(&self, row: u32) -> Option<u32> {
        (0..self.ncols).find(|&c| !self[(row, c)].is_zero())
    }

    pub fn is_zero_row(&self, row: u32) -> bool {
        self.leading(row).is_none()
    }

    /// Check that the matrix is in reduced row-echelon form: every leading entry is one,
    /// it is the only non-zero entry of its column, leading columns strictly increase going
    /// down and empty rows come last.
    pub fn is_rref(&self) -> bool {
        let mut prev_lead = None;
        let mut seen_empty = false;

        for r in 0..self.nrows {
            let Some(c) = self.leading(r) else {
                seen_empty = true;
                continue;
            };

            if seen_empty || prev_lead.is_some_and(|p| p >= c) || !self[(r, c)].is_one() {
                return false;
            }

            if (0..self.nrows).any(|o| o != r && !self[(o, c)].is_zero()) {
                return false;
            }

            prev_lead = Some(c);
        }

        true
    }

    /// Place `other` to the right of `self`. Both matrices must have the same number of rows.
    pub fn augment(&self, other: &Matrix) -> Result<Matrix, MatrixError> {
        if self.nrows != other.nrows {
            return Err(MatrixError::ShapeMismatch);
        }

        let mut data = Vec::with_capacity(self.data.len() + other.data.len());
        for r in 0..self.nrows {
            data.extend_from_slice(&self[r]);
            data.extend_from_slice(&other[r]);
        }

        Ok(Matrix {
            data,
            nrows: self.nrows,
            ncols: self.ncols + other.ncols,
        })
    }

    /// Copy the columns `start..end` of every row into a new matrix.
    pub fn column_block(&self, start: u32, end: u32) -> Result<Matrix, MatrixError> {
        if start > end || end > self.ncols {
            return Err(MatrixError::ShapeMismatch);
        }

        let data = (0..self.nrows)
            .flat_map(|r| (start..end).map(move |c| (r, c)))
            .map(|i| self[i].clone())
            .collect();

        Ok(Matrix {
            data,
            nrows: self.nrows,
            ncols: end - start,
        })
    }

    /// Exchange the rows `a` and `b`.
    pub fn swap_rows(&mut self, a: u32, b: u32) {
        if a == b {
            return;
        }

        for l in 0..self.ncols {
            self.data
                .swap((self.ncols * a + l) as usize, (self.ncols * b + l) as usize);
        }
    }

    /// Multiply every entry of `row` by `factor`.
    pub fn scale_row(&mut self, row: u32, factor: &Rational) {
        for l in 0..self.ncols {
            self[(row, l)] *= factor;
        }
    }

    /// Add `factor` times the row `src` to the row `dst`.
    pub fn combine_rows(&mut self, dst: u32, src: u32, factor: &Rational) {
        for l in 0..self.ncols {
            let scaled = &self[(src, l)] * factor;
            self[(dst, l)] += &scaled;
        }
    }
}

impl Index<u32> for Matrix {
    type Output = [Rational];

    /// Get the `index`th row of the matrix.
    #[inline]
    fn index(&self, index: u32) -> &Self::Output {
        &self.data[index as usize * self.ncols as usize..(index as usize + 1) * self.ncols as usize]
    }
}

impl Index<(u32, u32)> for Matrix {
    type Output = Rational;

    /// Get the `i`th row and `j`th column of the matrix, where `index=(i,j)`.
    #[inline]
    fn index(&self, index: (u32, u32)) -> &Self::Output {
        &self.data[(index.0 * self.ncols + index.1) as usize]
    }
}

impl IndexMut<(u32, u32)> for Matrix {
    /// Get the `i`th row and `j`th column of the matrix, where `index=(i,j)`.
    #[inline]
    fn index_mut(&mut self, index: (u32, u32)) -> &mut Rational {
        &mut self.data[(index.0 * self.ncols + index.1) as usize]
    }
}

impl Display for Matrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        MatrixPrinter::new(self).fmt(f)
    }
}

impl Mul<&Matrix> for &Matrix {
    type Output = Matrix;

    /// Multiply two matrices.
    fn mul(self, rhs: &Matrix) -> Self::Output {
        if self.ncols != rhs.nrows {
            panic!(
                "Cannot multiply matrices because of a dimension mismatch: ({},{}) vs ({},{})",
                self.nrows, self.ncols, rhs.nrows, rhs.ncols
            );
        }

        let mut m = Matrix::new(self.nrows, rhs.ncols);

        for i in 0..self.nrows {
            for j in 0..rhs.ncols {
                m[(i, j)] = (0..self.ncols)
                    .map(|k| &self[(i, k)] * &rhs[(k, j)])
                    .sum();
            }
        }

        m
    }
}
