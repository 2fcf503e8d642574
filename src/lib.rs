//! Exact Gaussian elimination over the rational numbers.
//!
//! Matrices hold arbitrary-precision fractions, so reducing a matrix to reduced
//! row-echelon form or inverting it never rounds.
//!
//! For example:
//!
//! ```
//! use exact_rref::tensors::matrix::Matrix;
//!
//! let a: Matrix = "1 1\n1 2\n".parse().unwrap();
//! let inv = a.inv().unwrap();
//! assert_eq!(inv.to_string(), "[  2 -1 ]\n[ -1  1 ]\n");
//!
//! let mut b: Matrix = "1 2 3\n4 5 6\n".parse().unwrap();
//! b.row_reduce().unwrap();
//! assert_eq!(b.to_string(), "[ 1 0 -1 ]\n[ 0 1  2 ]\n");
//! ```

pub mod domains;
pub mod narrator;
pub mod parser;
pub mod printer;
pub mod tensors;
