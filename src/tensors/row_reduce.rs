//! Gaussian elimination to reduced row-echelon form using only elementary row operations.
//!
//! The reduction runs in three phases:
//! 1. echelon form, found by repeated passes over the rows until a pass makes no change,
//! 2. normalization of every leading entry to one,
//! 3. elimination of every entry above a leading one, from the bottom row up.
//!
//! Every row operation and every decision of the first phase is reported to a
//! [ReductionObserver], which is how the interactive narration of the command line tools
//! is implemented. The engine itself does not print anything.

use std::fmt::Display;

use tracing::{debug, instrument, trace};

use crate::{
    domains::rational::Rational,
    tensors::matrix::{Matrix, MatrixError},
};

/// An elementary row operation applied by the engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RowOperation {
    /// Exchange two rows.
    Swap(u32, u32),
    /// Multiply `row` by `factor`.
    Scale { row: u32, factor: Rational },
    /// Add `factor` times `src` to `dst`.
    Combine {
        dst: u32,
        src: u32,
        factor: Rational,
    },
}

impl Display for RowOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RowOperation::Swap(a, b) => write!(f, "Swap row {} <-> row {}:", a, b),
            RowOperation::Scale { row, factor } => write!(f, "row {} *= {}:", row, factor),
            RowOperation::Combine { dst, src, factor } => {
                write!(f, "row {} += {} * row {}", dst, factor, src)
            }
        }
    }
}

/// A decision taken by the engine between row operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReductionStep {
    /// The reduction is about to start.
    Start,
    /// A new pass of the echelon phase starts.
    Pass,
    EmptyRow { row: u32 },
    /// `row` leads before the current pivot row and will be swapped with it.
    OutOfOrder { row: u32, pivot_row: u32 },
    /// `row` leads in the same column as the current pivot row and will be eliminated.
    DuplicateLead { row: u32, pivot_row: u32 },
    PivotAccepted { row: u32 },
    /// An empty row is moved below the non-empty ones.
    SinkEmptyRow { row: u32 },
    EchelonFormFound,
    NormalizationComplete,
}

impl Display for ReductionStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReductionStep::Start => f.write_str("[start]"),
            ReductionStep::Pass => f.write_str("[iterate]"),
            ReductionStep::EmptyRow { row } => write!(f, "[row {} empty]", row),
            ReductionStep::OutOfOrder { row, pivot_row } => {
                write!(f, "[row {} behind row {} -- rearrange]", row, pivot_row)
            }
            ReductionStep::DuplicateLead { row, pivot_row } => write!(
                f,
                "[lead in row {} directly below row {} -- eliminate]",
                row, pivot_row
            ),
            ReductionStep::PivotAccepted { .. } => f.write_str("[leading row OK]"),
            ReductionStep::SinkEmptyRow { row } => write!(f, "[row {} empty -- move down]", row),
            ReductionStep::EchelonFormFound => f.write_str("Echelon form found--normalizing"),
            ReductionStep::NormalizationComplete => {
                f.write_str("Normalization complete--reducing")
            }
        }
    }
}

/// Receives the progress of a row reduction.
///
/// `row_operation` is called after the operation has been applied, with the updated matrix.
pub trait ReductionObserver {
    fn step(&mut self, _step: &ReductionStep, _matrix: &Matrix) {}

    fn row_operation(&mut self, _operation: &RowOperation, _matrix: &Matrix) {}
}

/// The silent observer.
impl ReductionObserver for () {}

/// Collects every reported row operation.
impl ReductionObserver for Vec<RowOperation> {
    fn row_operation(&mut self, operation: &RowOperation, _matrix: &Matrix) {
        self.push(operation.clone());
    }
}

impl Matrix {
    /// Apply `op` and report it.
    fn apply<O: ReductionObserver + ?Sized>(&mut self, op: RowOperation, observer: &mut O) {
        trace!("{}", op);

        match &op {
            RowOperation::Swap(a, b) => self.swap_rows(*a, *b),
            RowOperation::Scale { row, factor } => self.scale_row(*row, factor),
            RowOperation::Combine { dst, src, factor } => self.combine_rows(*dst, *src, factor),
        }

        observer.row_operation(&op, self);
    }

    /// Row-reduce the matrix in-place to reduced row-echelon form.
    ///
    /// The matrix needs at least one row and two columns.
    pub fn row_reduce(&mut self) -> Result<(), MatrixError> {
        self.row_reduce_with(&mut ())
    }

    /// Row-reduce the matrix in-place, reporting every step to `observer`.
    #[instrument(level = "trace", skip_all, fields(nrows = self.nrows, ncols = self.ncols))]
    pub fn row_reduce_with<O: ReductionObserver + ?Sized>(
        &mut self,
        observer: &mut O,
    ) -> Result<(), MatrixError> {
        if self.nrows < 1 || self.ncols < 2 {
            return Err(MatrixError::TooSmall {
                nrows: self.nrows,
                ncols: self.ncols,
            });
        }

        observer.step(&ReductionStep::Start, self);

        let passes = self.echelon_form(observer);
        self.sink_empty_rows(observer);
        debug!("Echelon form found after {} passes", passes);
        observer.step(&ReductionStep::EchelonFormFound, self);

        self.normalize_leading(observer);
        observer.step(&ReductionStep::NormalizationComplete, self);

        self.back_eliminate(observer);

        Ok(())
    }

    /// Bring the matrix in echelon form by repeating passes until a pass makes no change.
    /// Returns the number of passes.
    fn echelon_form<O: ReductionObserver + ?Sized>(&mut self, observer: &mut O) -> usize {
        let mut passes = 0;

        loop {
            passes += 1;
            observer.step(&ReductionStep::Pass, self);

            let mut changes = false;
            // (column, row) of the last accepted pivot
            let mut pivot: Option<(u32, u32)> = None;

            for row in 0..self.nrows {
                let Some(lead) = self.leading(row) else {
                    observer.step(&ReductionStep::EmptyRow { row }, self);
                    continue;
                };

                match pivot {
                    Some((pivot_col, pivot_row)) if lead < pivot_col => {
                        observer.step(&ReductionStep::OutOfOrder { row, pivot_row }, self);
                        self.apply(RowOperation::Swap(row, pivot_row), observer);
                        changes = true;
                        break;
                    }
                    Some((pivot_col, pivot_row)) if lead == pivot_col => {
                        observer.step(&ReductionStep::DuplicateLead { row, pivot_row }, self);
                        let factor = &(-&self[(row, lead)]) / &self[(pivot_row, pivot_col)];
                        let before = self[row].to_vec();
                        self.apply(
                            RowOperation::Combine {
                                dst: row,
                                src: pivot_row,
                                factor,
                            },
                            observer,
                        );
                        // a row of degenerate `x/0` entries can absorb the combination unchanged
                        if self[row] != before[..] {
                            changes = true;
                        }
                    }
                    _ => {
                        observer.step(&ReductionStep::PivotAccepted { row }, self);
                        pivot = Some((lead, row));
                    }
                }
            }

            if !changes {
                return passes;
            }
        }
    }

    /// Move the empty rows below the other rows, keeping the order of the non-empty rows.
    fn sink_empty_rows<O: ReductionObserver + ?Sized>(&mut self, observer: &mut O) {
        let mut target = 0;
        for row in 0..self.nrows {
            if self.is_zero_row(row) {
                continue;
            }

            if row != target {
                observer.step(&ReductionStep::SinkEmptyRow { row: target }, self);
                self.apply(RowOperation::Swap(row, target), observer);
            }
            target += 1;
        }
    }

    /// Scale every non-empty row so that its leading entry is one.
    fn normalize_leading<O: ReductionObserver + ?Sized>(&mut self, observer: &mut O) {
        for row in 0..self.nrows {
            if let Some(lcol) = self.leading(row) {
                let factor = 1i64 / &self[(row, lcol)];
                self.apply(RowOperation::Scale { row, factor }, observer);
            }
        }
    }

    /// Clear the entries above every leading one, from the bottom row up.
    fn back_eliminate<O: ReductionObserver + ?Sized>(&mut self, observer: &mut O) {
        for row in (0..self.nrows).rev() {
            let Some(lcol) = self.leading(row) else {
                continue;
            };

            for nrow in (0..row).rev() {
                if !self[(nrow, lcol)].is_zero() {
                    let factor = &(-&self[(nrow, lcol)]) / &self[(row, lcol)];
                    self.apply(
                        RowOperation::Combine {
                            dst: nrow,
                            src: row,
                            factor,
                        },
                        observer,
                    );
                }
            }
        }
    }

    /// Get the rank of the matrix, i.e. the number of non-empty rows of its reduced form.
    pub fn rank(&self) -> Result<usize, MatrixError> {
        let mut m = self.clone();
        m.row_reduce()?;
        Ok((0..m.nrows).filter(|&r| !m.is_zero_row(r)).count())
    }
}

#[cfg(test)]
mod test {
    use crate::{
        domains::rational::Rational,
        tensors::{
            matrix::{Matrix, MatrixError},
            row_reduce::{ReductionObserver, ReductionStep, RowOperation},
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
    fn independent_rows() {
        let mut a = q(&[&[2, 1], &[1, 1]]);
        a.row_reduce().unwrap();
        assert_eq!(a, Matrix::identity(2));
    }

    #[test]
    fn rank_deficient() {
        let mut a = q(&[&[1, 2, 3], &[4, 5, 6], &[7, 8, 9]]);
        a.row_reduce().unwrap();
        assert_eq!(a, q(&[&[1, 0, -1], &[0, 1, 2], &[0, 0, 0]]));
        assert!(a.is_rref());

        assert_eq!(q(&[&[1, 2, 3], &[4, 5, 6], &[7, 8, 9]]).rank(), Ok(2));
    }

    #[test]
    fn fractions() {
        let mut a = Matrix::from_nested_vec(vec![
            vec![Rational::new(1, 2), Rational::new(1, 3), 1i64.into()],
            vec![Rational::new(1, 4), Rational::new(1, 5), 2i64.into()],
        ])
        .unwrap();
        a.row_reduce().unwrap();

        // x/2 + y/3 = 1, x/4 + y/5 = 2
        assert_eq!(
            a,
            Matrix::from_nested_vec(vec![
                vec![1i64.into(), 0i64.into(), (-28i64).into()],
                vec![0i64.into(), 1i64.into(), 45i64.into()],
            ])
            .unwrap()
        );
    }

    #[test]
    fn swaps_out_of_order_rows() {
        let mut a = q(&[&[0, 1], &[1, 0]]);
        let mut ops: Vec<RowOperation> = vec![];
        a.row_reduce_with(&mut ops).unwrap();

        assert_eq!(a, Matrix::identity(2));
        assert_eq!(ops[0], RowOperation::Swap(1, 0));
    }

    #[test]
    fn empty_rows_sink() {
        let mut a = q(&[&[0, 0, 0], &[1, 2, 3], &[0, 0, 0], &[2, 4, 7]]);
        a.row_reduce().unwrap();
        assert_eq!(a, q(&[&[1, 2, 0], &[0, 0, 1], &[0, 0, 0], &[0, 0, 0]]));
        assert!(a.is_rref());

        let mut z = Matrix::new(2, 3);
        z.row_reduce().unwrap();
        assert_eq!(z, Matrix::new(2, 3));
    }

    #[test]
    fn idempotent() {
        let mut a = q(&[&[3, 1, 4, 1], &[5, 9, 2, 6], &[5, 3, 5, 8]]);
        a.row_reduce().unwrap();
        let reduced = a.clone();
        a.row_reduce().unwrap();
        assert_eq!(a, reduced);
    }

    #[test]
    fn too_small() {
        assert_eq!(
            q(&[&[1], &[2]]).row_reduce(),
            Err(MatrixError::TooSmall { nrows: 2, ncols: 1 })
        );
        assert_eq!(
            Matrix::new(0, 0).row_reduce(),
            Err(MatrixError::TooSmall { nrows: 0, ncols: 0 })
        );

        let mut single = q(&[&[4, 2]]);
        single.row_reduce().unwrap();
        assert_eq!(
            single,
            Matrix::from_nested_vec(vec![vec![1i64.into(), Rational::new(1, 2)]]).unwrap()
        );
    }

    #[test]
    fn degenerate_entries() {
        // `0/0` is not zero, so it leads its row and spreads through the scaling
        let mut a: Matrix = "0/0 1\n".parse().unwrap();
        assert_eq!(a.leading(0), Some(0));
        a.row_reduce().unwrap();
        assert_eq!(a.to_string(), "[ 0/0 0/0 ]\n");

        let mut b: Matrix = "0/0 1\n0/0 2\n".parse().unwrap();
        let mut ops: Vec<RowOperation> = vec![];
        b.row_reduce_with(&mut ops).unwrap();
        assert_eq!(b.to_string(), "[ 0/0 0/0 ]\n[ 0/0 0/0 ]\n");
        assert!(matches!(ops[0], RowOperation::Combine { dst: 1, src: 0, .. }));

        let mut c: Matrix = "1 2\n1/0 3\n".parse().unwrap();
        c.row_reduce().unwrap();
        assert!(!c.is_rref());
    }

    #[test]
    fn reported_steps() {
        #[derive(Default)]
        struct Log(Vec<String>);

        impl ReductionObserver for Log {
            fn step(&mut self, step: &ReductionStep, _matrix: &Matrix) {
                self.0.push(step.to_string());
            }

            fn row_operation(&mut self, operation: &RowOperation, _matrix: &Matrix) {
                self.0.push(operation.to_string());
            }
        }

        let mut log = Log::default();
        q(&[&[2, 1], &[1, 1]]).row_reduce_with(&mut log).unwrap();

        assert_eq!(
            log.0,
            vec![
                "[start]",
                "[iterate]",
                "[leading row OK]",
                "[lead in row 1 directly below row 0 -- eliminate]",
                "row 1 += -1/2 * row 0",
                "[iterate]",
                "[leading row OK]",
                "[leading row OK]",
                "Echelon form found--normalizing",
                "row 0 *= 1/2:",
                "row 1 *= 2:",
                "Normalization complete--reducing",
                "row 0 += -1/2 * row 1",
            ]
        );
    }
}
