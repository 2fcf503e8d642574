//! Matrices over the rationals and the linear algebra built on row reduction.

pub mod inverse;
pub mod matrix;
pub mod row_reduce;
