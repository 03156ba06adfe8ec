//! matrix — the abstract Matrix contract and its generic implementation.
//!
//! Purpose
//! -------
//! Define the [`Matrix`] trait: a fixed `rows × columns` grid of `f64` with
//! elementwise arithmetic, block construction (append/stack/diagonal stack),
//! products (GEMM, matrix-vector, Kronecker), extraction and mutation of
//! rows, columns, diagonals, triangles and sub-blocks, norms, and the
//! factorization-backed queries routed to [`crate::linalg::decomposition`].
//!
//! Key behaviors
//! -------------
//! - Shape conformance is checked before any element is touched; operand
//!   mismatches raise [`LinalgError::NotConformable`] and wrong result
//!   buffers raise [`LinalgError::ResultNotConformable`].
//! - Determinant, inverse, trace and solve require a square matrix and raise
//!   [`LinalgError::NotSquare`] otherwise.
//! - Products that read the result as an operand go through
//!   [`Matrix::gemm_with`] / [`Matrix::multiply_assign`] /
//!   [`Matrix::multiply_vector_assign`], which snapshot the aliased operand
//!   before writing.
//!
//! Invariants & assumptions
//! ------------------------
//! - `rows() >= 1` and `columns() >= 1` for every constructed matrix.
//! - Implementors exposing [`Matrix::as_column_major`] store element `(r, c)`
//!   at `c * rows + r`.
//!
//! Conventions
//! -----------
//! - Row-major exports (`to_row_major_vec`, `to_rows`) exist for interop;
//!   the native order is column-major.
//! - Norm orders are `u32`; `p == 0` is rejected.

use std::fmt;

use crate::linalg::decomposition::{Decomposition, Lu, Svd};
use crate::linalg::dense_matrix::DenseMatrix;
use crate::linalg::dense_vector::DenseVector;
use crate::linalg::errors::{LinalgError, LinalgResult, ensure_index, ensure_range};
use crate::linalg::gemm::{self, GemmOperand, Transpose};
use crate::linalg::iter::{Columns, Rows};
use crate::linalg::vector::{Vector, ensure_result_count, ensure_same_count};

/// Number of leading (column-major) elements folded into [`Matrix::hash_code`].
pub const MATRIX_HASH_SPAN: usize = 25;

pub trait Matrix: fmt::Debug {
    // ---- Required storage access ----

    fn rows(&self) -> usize;

    fn columns(&self) -> usize;

    fn value_at(&self, row: usize, column: usize) -> f64;

    fn set_value_at(&mut self, row: usize, column: usize, value: f64);

    // ---- Storage exposure ----

    /// Column-major view of the elements, when the storage has one.
    fn as_column_major(&self) -> Option<&[f64]> {
        None
    }

    fn as_column_major_mut(&mut self) -> Option<&mut [f64]> {
        None
    }

    // ---- Shape, checked access, and export ----

    fn shape(&self) -> (usize, usize) {
        (self.rows(), self.columns())
    }

    fn is_square(&self) -> bool {
        self.rows() == self.columns()
    }

    fn get(&self, row: usize, column: usize) -> LinalgResult<f64> {
        ensure_index("row", row, self.rows())?;
        ensure_index("column", column, self.columns())?;
        Ok(self.value_at(row, column))
    }

    fn set(&mut self, row: usize, column: usize, value: f64) -> LinalgResult<()> {
        ensure_index("row", row, self.rows())?;
        ensure_index("column", column, self.columns())?;
        self.set_value_at(row, column, value);
        Ok(())
    }

    fn to_dense(&self) -> DenseMatrix {
        DenseMatrix::from_column_major_unchecked(self.rows(), self.columns(), self.to_column_major_vec())
    }

    fn to_column_major_vec(&self) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.rows() * self.columns());
        for c in 0..self.columns() {
            for r in 0..self.rows() {
                out.push(self.value_at(r, c));
            }
        }
        out
    }

    fn to_row_major_vec(&self) -> Vec<f64> {
        let mut out = Vec::with_capacity(self.rows() * self.columns());
        for r in 0..self.rows() {
            for c in 0..self.columns() {
                out.push(self.value_at(r, c));
            }
        }
        out
    }

    /// Row arrays, outer index = row.
    fn to_rows(&self) -> Vec<Vec<f64>> {
        (0..self.rows()).map(|r| (0..self.columns()).map(|c| self.value_at(r, c)).collect()).collect()
    }

    // ---- Elementwise arithmetic ----

    fn add_scalar(&mut self, scalar: f64) {
        generic::map_in_place(self, |v| v + scalar);
    }

    fn add_scalar_into(&self, scalar: f64, result: &mut dyn Matrix) -> LinalgResult<()> {
        generic::map_into(self, result, |v| v + scalar)
    }

    fn add_assign(&mut self, other: &dyn Matrix) -> LinalgResult<()> {
        generic::combine_assign(self, other, |a, b| a + b)
    }

    fn add_into(&self, other: &dyn Matrix, result: &mut dyn Matrix) -> LinalgResult<()> {
        generic::combine_into(self, other, result, |a, b| a + b)
    }

    fn subtract_scalar(&mut self, scalar: f64) {
        self.add_scalar(-scalar);
    }

    fn subtract_scalar_into(&self, scalar: f64, result: &mut dyn Matrix) -> LinalgResult<()> {
        self.add_scalar_into(-scalar, result)
    }

    fn subtract_assign(&mut self, other: &dyn Matrix) -> LinalgResult<()> {
        generic::combine_assign(self, other, |a, b| a - b)
    }

    fn subtract_into(&self, other: &dyn Matrix, result: &mut dyn Matrix) -> LinalgResult<()> {
        generic::combine_into(self, other, result, |a, b| a - b)
    }

    fn multiply_scalar(&mut self, scalar: f64) {
        if scalar != 1.0 {
            generic::map_in_place(self, |v| v * scalar);
        }
    }

    fn multiply_scalar_into(&self, scalar: f64, result: &mut dyn Matrix) -> LinalgResult<()> {
        generic::map_into(self, result, |v| v * scalar)
    }

    fn divide_scalar(&mut self, scalar: f64) {
        self.multiply_scalar(1.0 / scalar);
    }

    fn divide_scalar_into(&self, scalar: f64, result: &mut dyn Matrix) -> LinalgResult<()> {
        self.multiply_scalar_into(1.0 / scalar, result)
    }

    fn negate(&mut self) {
        self.multiply_scalar(-1.0);
    }

    fn negate_into(&self, result: &mut dyn Matrix) -> LinalgResult<()> {
        self.multiply_scalar_into(-1.0, result)
    }

    fn pointwise_multiply_into(&self, other: &dyn Matrix, result: &mut dyn Matrix) -> LinalgResult<()> {
        generic::combine_into(self, other, result, |a, b| a * b)
    }

    fn pointwise_multiply(&self, other: &dyn Matrix) -> LinalgResult<DenseMatrix> {
        let mut result = DenseMatrix::zeros(self.rows(), self.columns())?;
        self.pointwise_multiply_into(other, &mut result)?;
        Ok(result)
    }

    fn clear(&mut self) {
        generic::map_in_place(self, |_| 0.0);
    }

    fn copy_to(&self, target: &mut dyn Matrix) -> LinalgResult<()> {
        generic::map_into(self, target, |v| v)
    }

    // ---- Block construction ----

    /// `[self | right]`.
    fn append_into(&self, right: &dyn Matrix, result: &mut dyn Matrix) -> LinalgResult<()> {
        if right.rows() != self.rows() {
            return Err(LinalgError::NotConformable {
                parameter: "right",
                expected: (self.rows(), right.columns()),
                found: right.shape(),
            });
        }
        ensure_result_shape(result, (self.rows(), self.columns() + right.columns()))?;
        generic::write_block(self, result, 0, 0);
        generic::write_block(right, result, 0, self.columns());
        Ok(())
    }

    fn append(&self, right: &dyn Matrix) -> LinalgResult<DenseMatrix> {
        let mut result = DenseMatrix::zeros(self.rows(), self.columns() + right.columns())?;
        self.append_into(right, &mut result)?;
        Ok(result)
    }

    /// `[self ; lower]`.
    fn stack_into(&self, lower: &dyn Matrix, result: &mut dyn Matrix) -> LinalgResult<()> {
        if lower.columns() != self.columns() {
            return Err(LinalgError::NotConformable {
                parameter: "lower",
                expected: (lower.rows(), self.columns()),
                found: lower.shape(),
            });
        }
        ensure_result_shape(result, (self.rows() + lower.rows(), self.columns()))?;
        generic::write_block(self, result, 0, 0);
        generic::write_block(lower, result, self.rows(), 0);
        Ok(())
    }

    fn stack(&self, lower: &dyn Matrix) -> LinalgResult<DenseMatrix> {
        let mut result = DenseMatrix::zeros(self.rows() + lower.rows(), self.columns())?;
        self.stack_into(lower, &mut result)?;
        Ok(result)
    }

    /// Block diagonal `[[self, 0], [0, lower]]`.
    fn diagonal_stack_into(&self, lower: &dyn Matrix, result: &mut dyn Matrix) -> LinalgResult<()> {
        ensure_result_shape(result, (self.rows() + lower.rows(), self.columns() + lower.columns()))?;
        result.clear();
        generic::write_block(self, result, 0, 0);
        generic::write_block(lower, result, self.rows(), self.columns());
        Ok(())
    }

    fn diagonal_stack(&self, lower: &dyn Matrix) -> LinalgResult<DenseMatrix> {
        let mut result = DenseMatrix::zeros(self.rows() + lower.rows(), self.columns() + lower.columns())?;
        self.diagonal_stack_into(lower, &mut result)?;
        Ok(result)
    }

    fn kronecker_into(&self, other: &dyn Matrix, result: &mut dyn Matrix) -> LinalgResult<()> {
        let (r2, c2) = other.shape();
        ensure_result_shape(result, (self.rows() * r2, self.columns() * c2))?;
        for j in 0..self.columns() {
            for i in 0..self.rows() {
                let factor = self.value_at(i, j);
                for l in 0..c2 {
                    for k in 0..r2 {
                        result.set_value_at(i * r2 + k, j * c2 + l, factor * other.value_at(k, l));
                    }
                }
            }
        }
        Ok(())
    }

    fn kronecker(&self, other: &dyn Matrix) -> LinalgResult<DenseMatrix> {
        let mut result = DenseMatrix::zeros(self.rows() * other.rows(), self.columns() * other.columns())?;
        self.kronecker_into(other, &mut result)?;
        Ok(result)
    }

    fn transpose_into(&self, result: &mut dyn Matrix) -> LinalgResult<()> {
        ensure_result_shape(result, (self.columns(), self.rows()))?;
        for c in 0..self.columns() {
            for r in 0..self.rows() {
                result.set_value_at(c, r, self.value_at(r, c));
            }
        }
        Ok(())
    }

    fn transpose(&self) -> DenseMatrix {
        let mut data = Vec::with_capacity(self.rows() * self.columns());
        for r in 0..self.rows() {
            for c in 0..self.columns() {
                data.push(self.value_at(r, c));
            }
        }
        DenseMatrix::from_column_major_unchecked(self.columns(), self.rows(), data)
    }

    fn trace(&self) -> LinalgResult<f64> {
        ensure_square(self.rows(), self.columns())?;
        Ok((0..self.rows()).map(|i| self.value_at(i, i)).sum())
    }

    // ---- Products ----

    /// `self = alpha · op(a) · op(b) + beta · self`.
    ///
    /// Parameters
    /// ----------
    /// - `alpha`, `beta`: `f64`
    ///   Scale factors. `alpha == 0 && beta == 0` zeroes `self` without
    ///   reading `a` or `b`; `beta == 0` never reads the prior contents of
    ///   `self`.
    /// - `op_a`, `op_b`: [`Transpose`]
    ///   Per-operand transpose selection.
    /// - `a`, `b`: `&dyn Matrix`
    ///   Operands. Use [`Matrix::gemm_with`] when an operand is `self`.
    ///
    /// Errors
    /// ------
    /// - `NotConformable { parameter: "b", .. }` when the inner dimensions of
    ///   `op(a)` and `op(b)` differ.
    /// - `ResultNotConformable` when `self` is not `rows(op(a)) × columns(op(b))`.
    fn gemm(
        &mut self, alpha: f64, beta: f64, op_a: Transpose, op_b: Transpose, a: &dyn Matrix,
        b: &dyn Matrix,
    ) -> LinalgResult<()> {
        gemm::gemm(self, alpha, beta, op_a, op_b, a, b)
    }

    /// GEMM where either operand may be `self`; an aliased operand is read
    /// from a snapshot taken before any write.
    fn gemm_with(
        &mut self, alpha: f64, beta: f64, op_a: Transpose, op_b: Transpose, a: GemmOperand<'_>,
        b: GemmOperand<'_>,
    ) -> LinalgResult<()> {
        match (a, b) {
            (GemmOperand::Other(a), GemmOperand::Other(b)) => gemm::gemm(self, alpha, beta, op_a, op_b, a, b),
            (GemmOperand::This, GemmOperand::Other(b)) => {
                let snapshot = self.to_dense();
                gemm::gemm(self, alpha, beta, op_a, op_b, &snapshot, b)
            }
            (GemmOperand::Other(a), GemmOperand::This) => {
                let snapshot = self.to_dense();
                gemm::gemm(self, alpha, beta, op_a, op_b, a, &snapshot)
            }
            (GemmOperand::This, GemmOperand::This) => {
                let snapshot = self.to_dense();
                gemm::gemm(self, alpha, beta, op_a, op_b, &snapshot, &snapshot)
            }
        }
    }

    fn multiply_into(&self, other: &dyn Matrix, result: &mut dyn Matrix) -> LinalgResult<()> {
        if self.columns() != other.rows() {
            return Err(LinalgError::NotConformable {
                parameter: "other",
                expected: (self.columns(), other.columns()),
                found: other.shape(),
            });
        }
        ensure_result_shape(result, (self.rows(), other.columns()))?;
        gemm::gemm(result, 1.0, 0.0, Transpose::No, Transpose::No, self, other)
    }

    fn multiply(&self, other: &dyn Matrix) -> LinalgResult<DenseMatrix> {
        let mut result = DenseMatrix::zeros(self.rows(), other.columns())?;
        self.multiply_into(other, &mut result)?;
        Ok(result)
    }

    /// `self = self · other`; `other` must be square with `self.columns()` rows.
    fn multiply_assign(&mut self, other: &dyn Matrix) -> LinalgResult<()> {
        self.gemm_with(1.0, 0.0, Transpose::No, Transpose::No, GemmOperand::This, GemmOperand::Other(other))
    }

    /// `result = self · v`.
    fn multiply_vector_into(&self, v: &dyn Vector, result: &mut dyn Vector) -> LinalgResult<()> {
        ensure_same_count("v", self.columns(), v.count())?;
        ensure_result_count(self.rows(), result)?;
        for r in 0..self.rows() {
            let mut acc = 0.0;
            for c in 0..self.columns() {
                acc += self.value_at(r, c) * v.value_at(c);
            }
            result.set_value_at(r, acc);
        }
        Ok(())
    }

    fn multiply_vector(&self, v: &dyn Vector) -> LinalgResult<DenseVector> {
        let mut result = DenseVector::zeros(self.rows())?;
        self.multiply_vector_into(v, &mut result)?;
        Ok(result)
    }

    /// `v = self · v` for square `self`, reading `v` from a snapshot.
    fn multiply_vector_assign(&self, v: &mut dyn Vector) -> LinalgResult<()> {
        ensure_square(self.rows(), self.columns())?;
        let snapshot = v.to_dense();
        self.multiply_vector_into(&snapshot, v)
    }

    /// `result = vᵀ · self`.
    fn left_multiply_into(&self, v: &dyn Vector, result: &mut dyn Vector) -> LinalgResult<()> {
        ensure_same_count("v", self.rows(), v.count())?;
        ensure_result_count(self.columns(), result)?;
        for c in 0..self.columns() {
            let mut acc = 0.0;
            for r in 0..self.rows() {
                acc += v.value_at(r) * self.value_at(r, c);
            }
            result.set_value_at(c, acc);
        }
        Ok(())
    }

    fn left_multiply(&self, v: &dyn Vector) -> LinalgResult<DenseVector> {
        let mut result = DenseVector::zeros(self.columns())?;
        self.left_multiply_into(v, &mut result)?;
        Ok(result)
    }

    // ---- Rows, columns, diagonal ----

    fn column(&self, index: usize) -> LinalgResult<DenseVector> {
        self.column_range(index, 0, self.rows())
    }

    /// `length` elements of column `index`, starting at `row_index`.
    fn column_range(&self, index: usize, row_index: usize, length: usize) -> LinalgResult<DenseVector> {
        let mut result = DenseVector::zeros(length)?;
        self.column_into(index, row_index, length, &mut result)?;
        Ok(result)
    }

    fn column_into(
        &self, index: usize, row_index: usize, length: usize, result: &mut dyn Vector,
    ) -> LinalgResult<()> {
        ensure_index("index", index, self.columns())?;
        ensure_range("row_index", row_index, length, self.rows())?;
        ensure_result_count(length, result)?;
        for i in 0..length {
            result.set_value_at(i, self.value_at(row_index + i, index));
        }
        Ok(())
    }

    fn row(&self, index: usize) -> LinalgResult<DenseVector> {
        self.row_range(index, 0, self.columns())
    }

    fn row_range(&self, index: usize, column_index: usize, length: usize) -> LinalgResult<DenseVector> {
        let mut result = DenseVector::zeros(length)?;
        self.row_into(index, column_index, length, &mut result)?;
        Ok(result)
    }

    fn row_into(
        &self, index: usize, column_index: usize, length: usize, result: &mut dyn Vector,
    ) -> LinalgResult<()> {
        ensure_index("index", index, self.rows())?;
        ensure_range("column_index", column_index, length, self.columns())?;
        ensure_result_count(length, result)?;
        for i in 0..length {
            result.set_value_at(i, self.value_at(index, column_index + i));
        }
        Ok(())
    }

    fn set_column(&mut self, index: usize, column: &dyn Vector) -> LinalgResult<()> {
        ensure_index("index", index, self.columns())?;
        ensure_same_count("column", self.rows(), column.count())?;
        for r in 0..self.rows() {
            self.set_value_at(r, index, column.value_at(r));
        }
        Ok(())
    }

    fn set_column_values(&mut self, index: usize, column: &[f64]) -> LinalgResult<()> {
        ensure_index("index", index, self.columns())?;
        ensure_array_len("column", self.rows(), column.len())?;
        for (r, &value) in column.iter().enumerate() {
            self.set_value_at(r, index, value);
        }
        Ok(())
    }

    fn set_row(&mut self, index: usize, row: &dyn Vector) -> LinalgResult<()> {
        ensure_index("index", index, self.rows())?;
        ensure_same_count("row", self.columns(), row.count())?;
        for c in 0..self.columns() {
            self.set_value_at(index, c, row.value_at(c));
        }
        Ok(())
    }

    fn set_row_values(&mut self, index: usize, row: &[f64]) -> LinalgResult<()> {
        ensure_index("index", index, self.rows())?;
        ensure_array_len("row", self.columns(), row.len())?;
        for (c, &value) in row.iter().enumerate() {
            self.set_value_at(index, c, value);
        }
        Ok(())
    }

    /// Main diagonal, length `min(rows, columns)`.
    fn diagonal(&self) -> DenseVector {
        let n = self.rows().min(self.columns());
        DenseVector::from_vec_unchecked((0..n).map(|i| self.value_at(i, i)).collect())
    }

    fn set_diagonal(&mut self, diagonal: &dyn Vector) -> LinalgResult<()> {
        ensure_same_count("diagonal", self.rows().min(self.columns()), diagonal.count())?;
        for i in 0..diagonal.count() {
            self.set_value_at(i, i, diagonal.value_at(i));
        }
        Ok(())
    }

    fn set_diagonal_values(&mut self, diagonal: &[f64]) -> LinalgResult<()> {
        ensure_array_len("diagonal", self.rows().min(self.columns()), diagonal.len())?;
        for (i, &value) in diagonal.iter().enumerate() {
            self.set_value_at(i, i, value);
        }
        Ok(())
    }

    // ---- Sub-blocks and triangles ----

    fn sub_matrix(
        &self, row_index: usize, row_length: usize, column_index: usize, column_length: usize,
    ) -> LinalgResult<DenseMatrix> {
        ensure_range("row_index", row_index, row_length, self.rows())?;
        ensure_range("column_index", column_index, column_length, self.columns())?;
        let mut data = Vec::with_capacity(row_length * column_length);
        for c in column_index..column_index + column_length {
            for r in row_index..row_index + row_length {
                data.push(self.value_at(r, c));
            }
        }
        Ok(DenseMatrix::from_column_major_unchecked(row_length, column_length, data))
    }

    /// Overwrite the block starting at `(row_index, column_index)` with `block`.
    fn set_sub_matrix(&mut self, row_index: usize, column_index: usize, block: &dyn Matrix) -> LinalgResult<()> {
        ensure_range("row_index", row_index, block.rows(), self.rows())?;
        ensure_range("column_index", column_index, block.columns(), self.columns())?;
        for c in 0..block.columns() {
            for r in 0..block.rows() {
                self.set_value_at(row_index + r, column_index + c, block.value_at(r, c));
            }
        }
        Ok(())
    }

    fn lower_triangle(&self) -> DenseMatrix {
        generic::triangle(self, |r, c| r >= c)
    }

    fn lower_triangle_into(&self, result: &mut dyn Matrix) -> LinalgResult<()> {
        generic::triangle_into(self, result, |r, c| r >= c)
    }

    fn strictly_lower_triangle(&self) -> DenseMatrix {
        generic::triangle(self, |r, c| r > c)
    }

    fn strictly_lower_triangle_into(&self, result: &mut dyn Matrix) -> LinalgResult<()> {
        generic::triangle_into(self, result, |r, c| r > c)
    }

    fn upper_triangle(&self) -> DenseMatrix {
        generic::triangle(self, |r, c| r <= c)
    }

    fn upper_triangle_into(&self, result: &mut dyn Matrix) -> LinalgResult<()> {
        generic::triangle_into(self, result, |r, c| r <= c)
    }

    fn strictly_upper_triangle(&self) -> DenseMatrix {
        generic::triangle(self, |r, c| r < c)
    }

    fn strictly_upper_triangle_into(&self, result: &mut dyn Matrix) -> LinalgResult<()> {
        generic::triangle_into(self, result, |r, c| r < c)
    }

    /// Copy with `column` inserted before position `index` (`index == columns` appends).
    fn insert_column(&self, index: usize, column: &dyn Vector) -> LinalgResult<DenseMatrix> {
        ensure_index("index", index, self.columns() + 1)?;
        ensure_same_count("column", self.rows(), column.count())?;
        let mut result = DenseMatrix::zeros(self.rows(), self.columns() + 1)?;
        for c in 0..=self.columns() {
            for r in 0..self.rows() {
                let value = match c.cmp(&index) {
                    std::cmp::Ordering::Less => self.value_at(r, c),
                    std::cmp::Ordering::Equal => column.value_at(r),
                    std::cmp::Ordering::Greater => self.value_at(r, c - 1),
                };
                result.set_value_at(r, c, value);
            }
        }
        Ok(result)
    }

    /// Copy with `row` inserted before position `index` (`index == rows` appends).
    fn insert_row(&self, index: usize, row: &dyn Vector) -> LinalgResult<DenseMatrix> {
        ensure_index("index", index, self.rows() + 1)?;
        ensure_same_count("row", self.columns(), row.count())?;
        let mut result = DenseMatrix::zeros(self.rows() + 1, self.columns())?;
        for c in 0..self.columns() {
            for r in 0..=self.rows() {
                let value = match r.cmp(&index) {
                    std::cmp::Ordering::Less => self.value_at(r, c),
                    std::cmp::Ordering::Equal => row.value_at(c),
                    std::cmp::Ordering::Greater => self.value_at(r - 1, c),
                };
                result.set_value_at(r, c, value);
            }
        }
        Ok(result)
    }

    // ---- Norms ----

    /// Maximum absolute column sum.
    fn l1_norm(&self) -> f64 {
        (0..self.columns())
            .map(|c| (0..self.rows()).map(|r| self.value_at(r, c).abs()).sum::<f64>())
            .fold(0.0, f64::max)
    }

    /// Maximum absolute row sum.
    fn infinity_norm(&self) -> f64 {
        (0..self.rows())
            .map(|r| (0..self.columns()).map(|c| self.value_at(r, c).abs()).sum::<f64>())
            .fold(0.0, f64::max)
    }

    /// `sqrt(trace(A·Aᵀ))`, i.e. the root of the sum of squared entries.
    fn frobenius_norm(&self) -> f64 {
        let mut total = 0.0;
        for c in 0..self.columns() {
            for r in 0..self.rows() {
                total += self.value_at(r, c).powi(2);
            }
        }
        total.sqrt()
    }

    /// Largest singular value.
    fn l2_norm(&self) -> LinalgResult<f64> {
        Ok(Svd::new(self)?.norm2())
    }

    fn normalize_columns(&self, p: u32) -> LinalgResult<DenseMatrix> {
        let mut result = self.to_dense();
        for c in 0..self.columns() {
            let norm = self.column(c)?.p_norm(p)?;
            for r in 0..self.rows() {
                result.set_value_at(r, c, self.value_at(r, c) / norm);
            }
        }
        Ok(result)
    }

    fn normalize_rows(&self, p: u32) -> LinalgResult<DenseMatrix> {
        let mut result = self.to_dense();
        for r in 0..self.rows() {
            let norm = self.row(r)?.p_norm(p)?;
            for c in 0..self.columns() {
                result.set_value_at(r, c, self.value_at(r, c) / norm);
            }
        }
        Ok(result)
    }

    // ---- Decomposition-backed queries ----

    fn determinant(&self) -> LinalgResult<f64> {
        Ok(Lu::new(self)?.determinant())
    }

    fn inverse(&self) -> LinalgResult<DenseMatrix> {
        Lu::new(self)?.inverse()
    }

    /// Solve `self · X = rhs`.
    fn solve(&self, rhs: &dyn Matrix) -> LinalgResult<DenseMatrix> {
        Lu::new(self)?.solve(rhs)
    }

    /// Solve `self · x = rhs`.
    fn solve_vector(&self, rhs: &dyn Vector) -> LinalgResult<DenseVector> {
        Lu::new(self)?.solve_vector(rhs)
    }

    /// Ratio of the largest to the smallest singular value.
    fn condition_number(&self) -> LinalgResult<f64> {
        Ok(Svd::new(self)?.condition_number())
    }

    // ---- Identity ----

    fn equals(&self, other: &dyn Matrix) -> bool {
        if self.shape() != other.shape() {
            return false;
        }
        (0..self.columns()).all(|c| (0..self.rows()).all(|r| self.value_at(r, c) == other.value_at(r, c)))
    }

    /// Bounded distribution hash over the first [`MATRIX_HASH_SPAN`]
    /// column-major elements.
    fn hash_code(&self) -> i32 {
        let span = (self.rows() * self.columns()).min(MATRIX_HASH_SPAN);
        let rows = self.rows();
        let folded = (0..span).fold(0_u64, |acc, i| acc ^ self.value_at(i % rows, i / rows).to_bits());
        (folded >> 32) as u32 as i32
    }

    // ---- Iteration ----

    fn row_iter(&self) -> Rows<'_>
    where
        Self: Sized,
    {
        Rows::new(self)
    }

    fn column_iter(&self) -> Columns<'_>
    where
        Self: Sized,
    {
        Columns::new(self)
    }
}

// ---- Conformance helpers ----

pub(crate) fn ensure_square(rows: usize, columns: usize) -> LinalgResult<()> {
    if rows != columns {
        return Err(LinalgError::NotSquare { rows, columns });
    }
    Ok(())
}

pub(crate) fn ensure_same_shape(
    parameter: &'static str, expected: (usize, usize), found: (usize, usize),
) -> LinalgResult<()> {
    if expected != found {
        return Err(LinalgError::NotConformable { parameter, expected, found });
    }
    Ok(())
}

pub(crate) fn ensure_result_shape(result: &dyn Matrix, expected: (usize, usize)) -> LinalgResult<()> {
    if result.shape() != expected {
        return Err(LinalgError::ResultNotConformable { parameter: "result", expected, found: result.shape() });
    }
    Ok(())
}

fn ensure_array_len(parameter: &'static str, expected: usize, found: usize) -> LinalgResult<()> {
    if expected != found {
        return Err(LinalgError::ArrayNotConformable { parameter, expected, found });
    }
    Ok(())
}

/// Element-by-element routines shared by trait defaults and dense fallbacks.
pub(crate) mod generic {
    use super::*;

    pub(crate) fn map_in_place<M, F>(this: &mut M, op: F)
    where
        M: Matrix + ?Sized,
        F: Fn(f64) -> f64,
    {
        for c in 0..this.columns() {
            for r in 0..this.rows() {
                let value = op(this.value_at(r, c));
                this.set_value_at(r, c, value);
            }
        }
    }

    pub(crate) fn map_into<M, F>(this: &M, result: &mut dyn Matrix, op: F) -> LinalgResult<()>
    where
        M: Matrix + ?Sized,
        F: Fn(f64) -> f64,
    {
        ensure_result_shape(result, this.shape())?;
        for c in 0..this.columns() {
            for r in 0..this.rows() {
                result.set_value_at(r, c, op(this.value_at(r, c)));
            }
        }
        Ok(())
    }

    pub(crate) fn combine_assign<M, F>(this: &mut M, other: &dyn Matrix, op: F) -> LinalgResult<()>
    where
        M: Matrix + ?Sized,
        F: Fn(f64, f64) -> f64,
    {
        ensure_same_shape("other", this.shape(), other.shape())?;
        for c in 0..this.columns() {
            for r in 0..this.rows() {
                let value = op(this.value_at(r, c), other.value_at(r, c));
                this.set_value_at(r, c, value);
            }
        }
        Ok(())
    }

    pub(crate) fn combine_into<M, F>(
        this: &M, other: &dyn Matrix, result: &mut dyn Matrix, op: F,
    ) -> LinalgResult<()>
    where
        M: Matrix + ?Sized,
        F: Fn(f64, f64) -> f64,
    {
        ensure_same_shape("other", this.shape(), other.shape())?;
        ensure_result_shape(result, this.shape())?;
        for c in 0..this.columns() {
            for r in 0..this.rows() {
                result.set_value_at(r, c, op(this.value_at(r, c), other.value_at(r, c)));
            }
        }
        Ok(())
    }

    /// Write `block` into `result` with its top-left corner at `(row, column)`.
    /// Callers have already checked that the block fits.
    pub(crate) fn write_block<M: Matrix + ?Sized>(block: &M, result: &mut dyn Matrix, row: usize, column: usize) {
        for c in 0..block.columns() {
            for r in 0..block.rows() {
                result.set_value_at(row + r, column + c, block.value_at(r, c));
            }
        }
    }

    pub(crate) fn triangle<M, K>(this: &M, keep: K) -> DenseMatrix
    where
        M: Matrix + ?Sized,
        K: Fn(usize, usize) -> bool,
    {
        let mut data = Vec::with_capacity(this.rows() * this.columns());
        for c in 0..this.columns() {
            for r in 0..this.rows() {
                data.push(if keep(r, c) { this.value_at(r, c) } else { 0.0 });
            }
        }
        DenseMatrix::from_column_major_unchecked(this.rows(), this.columns(), data)
    }

    pub(crate) fn triangle_into<M, K>(this: &M, result: &mut dyn Matrix, keep: K) -> LinalgResult<()>
    where
        M: Matrix + ?Sized,
        K: Fn(usize, usize) -> bool,
    {
        ensure_result_shape(result, this.shape())?;
        for c in 0..this.columns() {
            for r in 0..this.rows() {
                result.set_value_at(r, c, if keep(r, c) { this.value_at(r, c) } else { 0.0 });
            }
        }
        Ok(())
    }
}
