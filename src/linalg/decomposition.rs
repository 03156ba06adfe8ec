//! decomposition — factorization collaborator backed by `nalgebra`.
//!
//! Purpose
//! -------
//! Supply the factorization-dependent queries the kernel exposes on
//! [`Matrix`]: determinant, inverse, and linear solves via LU; Cholesky for
//! symmetric positive-definite systems; condition number and spectral
//! 2-norm via singular values.
//!
//! Key behaviors
//! -------------
//! - Inputs are copied into a `nalgebra::DMatrix` (a straight column-major
//!   slice copy when the source is dense) and results are copied back into
//!   [`DenseMatrix`] / [`DenseVector`].
//! - A singular LU surfaces as [`LinalgError::Singular`]; a failed Cholesky
//!   as [`LinalgError::NotPositiveDefinite`]; an SVD that fails to converge as
//!   [`LinalgError::NoConvergence`].
//!
//! Conventions
//! -----------
//! - LU and Cholesky require square input; SVD accepts any shape.
//! - The condition number of a matrix with a zero singular value is `+∞`.

use nalgebra::{Cholesky, DMatrix, DVector, Dyn, LU};
use tracing::debug;

use crate::linalg::dense_matrix::DenseMatrix;
use crate::linalg::dense_vector::DenseVector;
use crate::linalg::errors::{LinalgError, LinalgResult};
use crate::linalg::matrix::{Matrix, ensure_square};
use crate::linalg::vector::{Vector, ensure_same_count};

/// Common surface of the square factorizations.
pub trait Decomposition {
    fn order(&self) -> usize;

    fn determinant(&self) -> f64;

    fn inverse(&self) -> LinalgResult<DenseMatrix>;

    fn solve(&self, rhs: &dyn Matrix) -> LinalgResult<DenseMatrix>;

    fn solve_vector(&self, rhs: &dyn Vector) -> LinalgResult<DenseVector>;
}

// ---- Conversions ----

pub(crate) fn to_nalgebra<M: Matrix + ?Sized>(source: &M) -> DMatrix<f64> {
    match source.as_column_major() {
        Some(data) => DMatrix::from_column_slice(source.rows(), source.columns(), data),
        None => DMatrix::from_fn(source.rows(), source.columns(), |r, c| source.value_at(r, c)),
    }
}

fn from_nalgebra(source: &DMatrix<f64>) -> DenseMatrix {
    DenseMatrix::from_column_major_unchecked(source.nrows(), source.ncols(), source.as_slice().to_vec())
}

fn vector_to_nalgebra(source: &dyn Vector) -> DVector<f64> {
    match source.as_slice() {
        Some(data) => DVector::from_column_slice(data),
        None => DVector::from_fn(source.count(), |i, _| source.value_at(i)),
    }
}

fn ensure_rhs_rows(order: usize, rhs: &dyn Matrix) -> LinalgResult<()> {
    if rhs.rows() != order {
        return Err(LinalgError::NotConformable {
            parameter: "rhs",
            expected: (order, rhs.columns()),
            found: rhs.shape(),
        });
    }
    Ok(())
}

// ---- LU ----

/// LU factorization with partial pivoting.
#[derive(Debug, Clone)]
pub struct Lu {
    lu: LU<f64, Dyn, Dyn>,
    order: usize,
}

impl Lu {
    /// Factorize a square matrix.
    ///
    /// Errors
    /// ------
    /// - `LinalgError::NotSquare` when `rows != columns`.
    pub fn new<M: Matrix + ?Sized>(matrix: &M) -> LinalgResult<Self> {
        ensure_square(matrix.rows(), matrix.columns())?;
        Ok(Lu { lu: to_nalgebra(matrix).lu(), order: matrix.rows() })
    }
}

impl Decomposition for Lu {
    fn order(&self) -> usize {
        self.order
    }

    fn determinant(&self) -> f64 {
        self.lu.determinant()
    }

    fn inverse(&self) -> LinalgResult<DenseMatrix> {
        match self.lu.try_inverse() {
            Some(inv) => Ok(from_nalgebra(&inv)),
            None => {
                debug!(order = self.order, "LU inverse rejected singular matrix");
                Err(LinalgError::Singular)
            }
        }
    }

    fn solve(&self, rhs: &dyn Matrix) -> LinalgResult<DenseMatrix> {
        ensure_rhs_rows(self.order, rhs)?;
        match self.lu.solve(&to_nalgebra(rhs)) {
            Some(x) => Ok(from_nalgebra(&x)),
            None => {
                debug!(order = self.order, "LU solve rejected singular matrix");
                Err(LinalgError::Singular)
            }
        }
    }

    fn solve_vector(&self, rhs: &dyn Vector) -> LinalgResult<DenseVector> {
        ensure_same_count("rhs", self.order, rhs.count())?;
        match self.lu.solve(&vector_to_nalgebra(rhs)) {
            Some(x) => Ok(DenseVector::from_vec_unchecked(x.as_slice().to_vec())),
            None => {
                debug!(order = self.order, "LU solve rejected singular matrix");
                Err(LinalgError::Singular)
            }
        }
    }
}

// ---- Cholesky ----

/// Cholesky factorization `A = L·Lᵀ` of a symmetric positive-definite matrix.
#[derive(Debug, Clone)]
pub struct CholeskyFactor {
    chol: Cholesky<f64, Dyn>,
    order: usize,
}

impl CholeskyFactor {
    /// Errors
    /// ------
    /// - `LinalgError::NotSquare` when `rows != columns`.
    /// - `LinalgError::NotPositiveDefinite` when the factorization breaks down.
    pub fn new<M: Matrix + ?Sized>(matrix: &M) -> LinalgResult<Self> {
        ensure_square(matrix.rows(), matrix.columns())?;
        match Cholesky::new(to_nalgebra(matrix)) {
            Some(chol) => Ok(CholeskyFactor { chol, order: matrix.rows() }),
            None => {
                debug!(order = matrix.rows(), "Cholesky rejected matrix");
                Err(LinalgError::NotPositiveDefinite)
            }
        }
    }

    /// Lower-triangular factor `L`.
    pub fn factor(&self) -> DenseMatrix {
        from_nalgebra(&self.chol.l())
    }
}

impl Decomposition for CholeskyFactor {
    fn order(&self) -> usize {
        self.order
    }

    fn determinant(&self) -> f64 {
        let l = self.chol.l_dirty();
        (0..self.order).map(|i| l[(i, i)]).product::<f64>().powi(2)
    }

    fn inverse(&self) -> LinalgResult<DenseMatrix> {
        Ok(from_nalgebra(&self.chol.inverse()))
    }

    fn solve(&self, rhs: &dyn Matrix) -> LinalgResult<DenseMatrix> {
        ensure_rhs_rows(self.order, rhs)?;
        Ok(from_nalgebra(&self.chol.solve(&to_nalgebra(rhs))))
    }

    fn solve_vector(&self, rhs: &dyn Vector) -> LinalgResult<DenseVector> {
        ensure_same_count("rhs", self.order, rhs.count())?;
        let x = self.chol.solve(&vector_to_nalgebra(rhs));
        Ok(DenseVector::from_vec_unchecked(x.as_slice().to_vec()))
    }
}

// ---- Singular values ----

/// Singular values of a matrix, sorted descending.
#[derive(Debug, Clone, PartialEq)]
pub struct Svd {
    singular_values: Vec<f64>,
}

impl Svd {
    pub fn new<M: Matrix + ?Sized>(matrix: &M) -> LinalgResult<Self> {
        let (rows, columns) = (matrix.rows(), matrix.columns());
        let svd = to_nalgebra(matrix).try_svd(false, false, f64::EPSILON, 0).ok_or_else(|| {
            debug!(rows, columns, "SVD did not converge");
            LinalgError::NoConvergence { algorithm: "SVD" }
        })?;
        let mut singular_values: Vec<f64> = svd.singular_values.iter().copied().collect();
        singular_values.sort_by(|a, b| b.total_cmp(a));
        Ok(Svd { singular_values })
    }

    pub fn singular_values(&self) -> &[f64] {
        &self.singular_values
    }

    /// Spectral norm: the largest singular value.
    pub fn norm2(&self) -> f64 {
        self.singular_values.first().copied().unwrap_or(0.0)
    }

    /// `σ_max / σ_min`.
    pub fn condition_number(&self) -> f64 {
        match (self.singular_values.first(), self.singular_values.last()) {
            (Some(&max), Some(&min)) if min > 0.0 => max / min,
            _ => f64::INFINITY,
        }
    }
}
