//! linalg — polymorphic dense linear-algebra kernel.
//!
//! Purpose
//! -------
//! Provide shape-checked vector and matrix containers with a complete
//! operator set, an optimized contiguous (dense) specialization, and a narrow
//! bridge to factorization routines. Higher layers (notably
//! [`crate::timeseries`]) store their values in [`DenseVector`].
//!
//! Key behaviors
//! -------------
//! - [`Vector`] and [`Matrix`] are object-safe traits whose provided methods
//!   implement every operation generically through element accessors.
//! - [`DenseVector`] and [`DenseMatrix`] expose contiguous storage and
//!   override hot operations with slice loops and bulk copies; they fall
//!   back to the generic routines when an operand is not dense.
//! - GEMM (`C = alpha·op(A)·op(B) + beta·C`) has flat and generic kernels,
//!   four transpose specializations each, and an aliasing-safe entry point
//!   ([`Matrix::gemm_with`]).
//! - Determinant, inverse, solve, condition number, and 2-norm are delegated
//!   to [`decomposition`] (nalgebra LU / Cholesky / SVD).
//!
//! Invariants & assumptions
//! ------------------------
//! - Every constructed vector has `count >= 1`; every matrix has
//!   `rows >= 1` and `columns >= 1`.
//! - Dense matrices are column-major.
//!
//! Conventions
//! -----------
//! - Fallible operations return [`LinalgResult`]; element accessors
//!   (`value_at`, indexing) panic on out-of-range indices like slices do.
//! - Binary operators on two dense operands (`&a + &b`, `&a * &b`) return
//!   `LinalgResult` since shapes may not conform; scalar operators do not.
//!
//! Testing notes
//! -------------
//! - Each file carries unit tests; generic paths are exercised through small
//!   non-dense test implementors so that dense overrides cannot mask them.

pub mod decomposition;
pub mod dense_matrix;
pub mod dense_vector;
pub mod errors;
pub mod gemm;
pub mod iter;
pub mod matrix;
pub mod vector;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::decomposition::{CholeskyFactor, Decomposition, Lu, Svd};
pub use self::dense_matrix::DenseMatrix;
pub use self::dense_vector::DenseVector;
pub use self::errors::{LinalgError, LinalgResult};
pub use self::gemm::{GemmOperand, Transpose};
pub use self::iter::{Columns, IndexedValues, Rows, Values};
pub use self::matrix::{MATRIX_HASH_SPAN, Matrix};
pub use self::vector::{VECTOR_HASH_SPAN, Vector};

// ---- Optional convenience prelude for downstream crates -------------------
//
// Downstream crates can write
//
//     use calendar_numerics::linalg::prelude::*;
//
// to import the kernel traits and dense types in a single line.

pub mod prelude {
    pub use super::dense_matrix::DenseMatrix;
    pub use super::dense_vector::DenseVector;
    pub use super::errors::{LinalgError, LinalgResult};
    pub use super::gemm::{GemmOperand, Transpose};
    pub use super::matrix::Matrix;
    pub use super::vector::Vector;
}
