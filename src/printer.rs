use std::fmt::{self, Write};

use crate::tensors::matrix::Matrix;

/// Prints a matrix one row per line as `[ a b c ]`, with every column
/// right-aligned to its widest entry.
pub struct MatrixPrinter<'a> {
    pub matrix: &'a Matrix,
}

impl<'a> MatrixPrinter<'a> {
    pub fn new(matrix: &'a Matrix) -> MatrixPrinter<'a> {
        MatrixPrinter { matrix }
    }

    /// Compute the width of every column.
    fn column_widths(&self) -> (Vec<String>, Vec<usize>) {
        let entries: Vec<String> = self.matrix.data.iter().map(|e| e.to_string()).collect();

        let mut widths = vec![0; self.matrix.ncols()];
        for (i, e) in entries.iter().enumerate() {
            let w = &mut widths[i % self.matrix.ncols()];
            *w = (*w).max(e.chars().count());
        }

        (entries, widths)
    }
}

impl<'a> fmt::Display for MatrixPrinter<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.matrix.nrows() == 0 {
            return f.write_str("[]");
        }

        let (entries, widths) = self.column_widths();
        let ncols = self.matrix.ncols();

        for r in 0..self.matrix.nrows() {
            f.write_str("[ ")?;
            for (c, width) in widths.iter().enumerate() {
                write!(f, "{:>width$}", entries[r * ncols + c], width = width)?;
                f.write_char(' ')?;
            }
            f.write_str("]\n")?;
        }

        Ok(())
    }
}
