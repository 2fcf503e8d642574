use tracing::{debug, instrument};

use crate::tensors::{
    matrix::{Matrix, MatrixError},
    row_reduce::ReductionObserver,
};

impl Matrix {
    /// Compute the inverse of a square matrix, if it exists.
    /// Otherwise, this function returns `MatrixError::Singular`.
    pub fn inv(&self) -> Result<Matrix, MatrixError> {
        self.inv_with(&mut ())
    }

    /// Compute the inverse by row reducing `[A | I]`, reporting every step to `observer`.
    #[instrument(level = "trace", skip_all, fields(n = self.nrows))]
    pub fn inv_with<O: ReductionObserver + ?Sized>(
        &self,
        observer: &mut O,
    ) -> Result<Matrix, MatrixError> {
        let mut m = self.augment_identity()?;
        m.row_reduce_with(observer)?;
        m.extract_inverse()
    }

    /// Create the augmented matrix `[A | I]` for a non-empty square matrix `A`.
    pub fn augment_identity(&self) -> Result<Matrix, MatrixError> {
        if self.nrows == 0 {
            return Err(MatrixError::TooSmall {
                nrows: self.nrows,
                ncols: self.ncols,
            });
        }

        if !self.is_square() {
            return Err(MatrixError::NotSquare {
                nrows: self.nrows,
                ncols: self.ncols,
            });
        }

        self.augment(&Matrix::identity(self.nrows))
    }

    /// Take the inverse out of a row-reduced augmented matrix `[I | B]`.
    ///
    /// Fails with `MatrixError::Singular` if the left block is not exactly the identity.
    pub fn extract_inverse(&self) -> Result<Matrix, MatrixError> {
        let n = self.nrows;
        if self.ncols != 2 * n {
            return Err(MatrixError::ShapeMismatch);
        }

        if !self.column_block(0, n)?.is_identity() {
            debug!("Left block is not the identity");
            return Err(MatrixError::Singular);
        }

        self.column_block(n, 2 * n)
    }
}

#[cfg(test)]
mod test {
    use crate::{
        domains::rational::Rational,
        tensors::{
            matrix::{Matrix, MatrixError},
            row_reduce::RowOperation,
        },
    };

    fn q(rows: &[&[i64]]) -> Matrix {
        Matrix::from_nested_vec(
            rows.iter()
                .map(|r| r.iter().map(|&x| Rational::from(x)).collect())
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn two_by_two() {
        let a = q(&[&[1, 1], &[1, 2]]);
        assert_eq!(a.inv().unwrap(), q(&[&[2, -1], &[-1, 1]]));
    }

    #[test]
    fn three_by_three() {
        let a = q(&[&[1, 2, 3], &[4, 5, 16], &[7, 8, 9]]);

        let expected = Matrix::from_linear(
            vec![
                Rational::new(-83, 60),
                Rational::new(1, 10),
                Rational::new(17, 60),
                Rational::new(19, 15),
                Rational::new(-1, 5),
                Rational::new(-1, 15),
                Rational::new(-1, 20),
                Rational::new(1, 10),
                Rational::new(-1, 20),
            ],
            3,
            3,
        )
        .unwrap();

        let inv = a.inv().unwrap();
        assert_eq!(inv, expected);
        assert!((&a * &inv).is_identity());
        assert!((&inv * &a).is_identity());
    }

    #[test]
    fn round_trip() {
        let a = q(&[
            &[3, 2, 15, 4],
            &[9, 6, 7, 8],
            &[17, 45, 23, 12],
            &[13, 14, 15, 16],
        ]);

        let inv = a.inv().unwrap();
        assert_eq!(&a * &inv, Matrix::identity(4));
        assert_eq!(&inv * &a, Matrix::identity(4));
        assert_eq!(inv.inv().unwrap(), a);
    }

    #[test]
    fn singular() {
        assert_eq!(q(&[&[1, 2], &[2, 4]]).inv(), Err(MatrixError::Singular));
        assert_eq!(
            q(&[&[1, 2, 3], &[4, 5, 6], &[1, 2, 3]]).inv(),
            Err(MatrixError::Singular)
        );
        assert_eq!(Matrix::new(1, 1).inv(), Err(MatrixError::Singular));
    }

    #[test]
    fn dimensions() {
        let err = q(&[&[1, 2, 3], &[4, 5, 6]]).inv().unwrap_err();
        assert_eq!(err, MatrixError::NotSquare { nrows: 2, ncols: 3 });
        assert!(err.is_dimension_error());

        let err = Matrix::new(0, 0).inv().unwrap_err();
        assert!(err.is_dimension_error());
        assert_eq!(
            Matrix::new(0, 0).augment_identity(),
            Err(MatrixError::TooSmall { nrows: 0, ncols: 0 })
        );

        assert_eq!(
            q(&[&[1, 2, 3]]).extract_inverse(),
            Err(MatrixError::ShapeMismatch)
        );
    }

    #[test]
    fn one_by_one() {
        let a = Matrix::from_nested_vec(vec![vec![Rational::new(-2, 3)]]).unwrap();
        assert_eq!(
            a.inv().unwrap(),
            Matrix::from_nested_vec(vec![vec![Rational::new(-3, 2)]]).unwrap()
        );
    }

    #[test]
    fn observed_inverse() {
        let mut ops: Vec<RowOperation> = vec![];
        let inv = q(&[&[0, 1], &[1, 0]]).inv_with(&mut ops).unwrap();

        assert_eq!(inv, q(&[&[0, 1], &[1, 0]]));
        assert_eq!(ops[0], RowOperation::Swap(1, 0));
    }
}
