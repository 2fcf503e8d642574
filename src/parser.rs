//! Reading matrices in the plain text format: one row per line, entries separated by
//! whitespace, each entry an integer or a fraction `n/d`. Input ends at the first
//! blank line or at the end of the stream.

use std::{
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
    str::FromStr,
};

use thiserror::Error;

use crate::{
    domains::rational::{ParseRationalError, Rational},
    tensors::matrix::{Matrix, MatrixError},
};

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("line {line}: {source}")]
    InvalidEntry {
        line: usize,
        #[source]
        source: ParseRationalError,
    },
    #[error("line {line}: all rows must be the same size, expected {expected} entries but found {found}")]
    RowWidth {
        line: usize,
        expected: usize,
        found: usize,
    },
    #[error(transparent)]
    Matrix(#[from] MatrixError),
    #[error("could not read matrix: {0}")]
    Io(#[from] io::Error),
}

/// Parse a matrix from `reader`. Empty input gives a `0x0` matrix.
pub fn parse_matrix<R: BufRead>(reader: R) -> Result<Matrix, ParseError> {
    let mut rows: Vec<Vec<Rational>> = vec![];

    for (i, line) in reader.lines().enumerate() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            break;
        }

        let row = line
            .split_whitespace()
            .map(Rational::from_str)
            .collect::<Result<Vec<_>, _>>()
            .map_err(|source| ParseError::InvalidEntry { line: i + 1, source })?;

        if let Some(first) = rows.first() {
            if first.len() != row.len() {
                return Err(ParseError::RowWidth {
                    line: i + 1,
                    expected: first.len(),
                    found: row.len(),
                });
            }
        }

        rows.push(row);
    }

    Ok(Matrix::from_nested_vec(rows)?)
}

/// Read a matrix from the file at `path`, or from standard input if no path is given.
pub fn read_matrix(path: Option<&Path>) -> Result<Matrix, ParseError> {
    match path {
        Some(p) => parse_matrix(BufReader::new(File::open(p)?)),
        None => parse_matrix(io::stdin().lock()),
    }
}

impl FromStr for Matrix {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_matrix(s.as_bytes())
    }
}

#[cfg(test)]
mod test {
    use crate::{
        domains::rational::{ParseRationalError, Rational},
        parser::ParseError,
        tensors::matrix::Matrix,
    };

    #[test]
    fn rows_and_fractions() {
        let m: Matrix = "1 2/4  -3\n  0\t1 6/-9 \n".parse().unwrap();
        assert_eq!(
            m,
            Matrix::from_nested_vec(vec![
                vec![1i64.into(), Rational::new(1, 2), (-3i64).into()],
                vec![0i64.into(), 1i64.into(), Rational::new(-2, 3)],
            ])
            .unwrap()
        );
    }

    #[test]
    fn stops_at_blank_line() {
        let m: Matrix = "1 2\n3 4\n   \n5 6 7\n".parse().unwrap();
        assert_eq!((m.nrows(), m.ncols()), (2, 2));

        let m: Matrix = "".parse().unwrap();
        assert_eq!((m.nrows(), m.ncols()), (0, 0));
    }

    #[test]
    fn errors() {
        match "1 2\n3 4 5\n".parse::<Matrix>() {
            Err(ParseError::RowWidth {
                line,
                expected,
                found,
            }) => assert_eq!((line, expected, found), (2, 2, 3)),
            r => panic!("Unexpected result: {:?}", r),
        }

        match "1 2\n3 1/2/3\n".parse::<Matrix>() {
            Err(ParseError::InvalidEntry { line, source }) => {
                assert_eq!(line, 2);
                assert_eq!(
                    source,
                    ParseRationalError {
                        text: "1/2/3".to_string()
                    }
                );
            }
            r => panic!("Unexpected result: {:?}", r),
        }

        let err = "a".parse::<Matrix>().unwrap_err();
        assert_eq!(err.to_string(), "line 1: Invalid rational format: 'a'");
    }
}
