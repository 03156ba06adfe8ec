//! DenseMatrix — contiguous column-major backing for [`Matrix`].
//!
//! Purpose
//! -------
//! Provide the concrete matrix type used throughout the crate. Element
//! `(r, c)` lives at `data[c * rows + r]`, which makes whole columns
//! contiguous and lets GEMM, transpose, append and column extraction run as
//! flat loops or bulk slice copies.
//!
//! Key behaviors
//! -------------
//! - Exposes its storage via [`Matrix::as_column_major`]; the GEMM driver
//!   picks the flat kernel when every participant is dense.
//! - Overrides of add/subtract/copy/clear take the bulk path only when the
//!   other operand (and result, where relevant) is also column-major, and
//!   otherwise defer to [`crate::linalg::matrix::generic`].
//!
//! Invariants & assumptions
//! ------------------------
//! - `rows >= 1`, `columns >= 1`, `data.len() == rows * columns`.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Div, Index, IndexMut, Mul, Neg, Sub};

use ndarray::{Array2, ArrayView2};

use crate::linalg::dense_vector::DenseVector;
use crate::linalg::errors::{LinalgError, LinalgResult, ensure_index, ensure_positive, ensure_range};
use crate::linalg::matrix::{Matrix, ensure_result_shape, ensure_same_shape, generic};
use crate::linalg::vector::{Vector, ensure_result_count};

#[derive(Debug, Clone)]
pub struct DenseMatrix {
    rows: usize,
    columns: usize,
    data: Vec<f64>,
}

impl DenseMatrix {
    pub fn zeros(rows: usize, columns: usize) -> LinalgResult<Self> {
        Self::from_value(rows, columns, 0.0)
    }

    pub fn from_value(rows: usize, columns: usize, value: f64) -> LinalgResult<Self> {
        ensure_positive("rows", rows)?;
        ensure_positive("columns", columns)?;
        Ok(DenseMatrix { rows, columns, data: vec![value; rows * columns] })
    }

    /// `n × n` multiplicative identity.
    pub fn identity(n: usize) -> LinalgResult<Self> {
        let mut m = Self::zeros(n, n)?;
        for i in 0..n {
            m.data[i * n + i] = 1.0;
        }
        Ok(m)
    }

    /// Wrap a column-major buffer.
    ///
    /// Errors
    /// ------
    /// - `NotPositive` for a zero dimension.
    /// - `ArrayNotConformable { parameter: "data" }` when
    ///   `data.len() != rows * columns`.
    pub fn from_column_major(rows: usize, columns: usize, data: Vec<f64>) -> LinalgResult<Self> {
        ensure_positive("rows", rows)?;
        ensure_positive("columns", columns)?;
        if data.len() != rows * columns {
            return Err(LinalgError::ArrayNotConformable {
                parameter: "data",
                expected: rows * columns,
                found: data.len(),
            });
        }
        Ok(DenseMatrix { rows, columns, data })
    }

    pub fn from_row_major(rows: usize, columns: usize, data: &[f64]) -> LinalgResult<Self> {
        ensure_positive("rows", rows)?;
        ensure_positive("columns", columns)?;
        if data.len() != rows * columns {
            return Err(LinalgError::ArrayNotConformable {
                parameter: "data",
                expected: rows * columns,
                found: data.len(),
            });
        }
        let mut out = Vec::with_capacity(data.len());
        for c in 0..columns {
            for r in 0..rows {
                out.push(data[r * columns + c]);
            }
        }
        Ok(DenseMatrix { rows, columns, data: out })
    }

    /// Build from row arrays; every row must have the same non-zero length.
    pub fn from_rows(rows: &[Vec<f64>]) -> LinalgResult<Self> {
        ensure_positive("rows", rows.len())?;
        let columns = rows[0].len();
        ensure_positive("columns", columns)?;
        for (row, values) in rows.iter().enumerate() {
            if values.len() != columns {
                return Err(LinalgError::RaggedRows { row, expected: columns, found: values.len() });
            }
        }
        let mut data = Vec::with_capacity(rows.len() * columns);
        for c in 0..columns {
            data.extend(rows.iter().map(|row| row[c]));
        }
        Ok(DenseMatrix { rows: rows.len(), columns, data })
    }

    /// Dense copy of any [`Matrix`].
    pub fn from_matrix(source: &dyn Matrix) -> Self {
        source.to_dense()
    }

    pub fn from_array(values: ArrayView2<'_, f64>) -> LinalgResult<Self> {
        let (rows, columns) = values.dim();
        ensure_positive("rows", rows)?;
        ensure_positive("columns", columns)?;
        let mut data = Vec::with_capacity(rows * columns);
        for column in values.columns() {
            data.extend(column.iter().copied());
        }
        Ok(DenseMatrix { rows, columns, data })
    }

    pub(crate) fn from_column_major_unchecked(rows: usize, columns: usize, data: Vec<f64>) -> Self {
        debug_assert!(rows > 0 && columns > 0 && data.len() == rows * columns);
        DenseMatrix { rows, columns, data }
    }

    /// Column-major storage.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    pub fn to_array2(&self) -> Array2<f64> {
        Array2::from_shape_fn((self.rows, self.columns), |(r, c)| self.data[c * self.rows + r])
    }

    #[inline]
    fn offset(&self, row: usize, column: usize) -> usize {
        column * self.rows + row
    }
}

impl Matrix for DenseMatrix {
    fn rows(&self) -> usize {
        self.rows
    }

    fn columns(&self) -> usize {
        self.columns
    }

    fn value_at(&self, row: usize, column: usize) -> f64 {
        self.data[self.offset(row, column)]
    }

    fn set_value_at(&mut self, row: usize, column: usize, value: f64) {
        let at = self.offset(row, column);
        self.data[at] = value;
    }

    fn as_column_major(&self) -> Option<&[f64]> {
        Some(&self.data)
    }

    fn as_column_major_mut(&mut self) -> Option<&mut [f64]> {
        Some(&mut self.data)
    }

    fn to_dense(&self) -> DenseMatrix {
        self.clone()
    }

    fn to_column_major_vec(&self) -> Vec<f64> {
        self.data.clone()
    }

    fn add_scalar(&mut self, scalar: f64) {
        self.data.iter_mut().for_each(|x| *x += scalar);
    }

    fn multiply_scalar(&mut self, scalar: f64) {
        if scalar != 1.0 {
            self.data.iter_mut().for_each(|x| *x *= scalar);
        }
    }

    fn add_assign(&mut self, other: &dyn Matrix) -> LinalgResult<()> {
        ensure_same_shape("other", self.shape(), other.shape())?;
        match other.as_column_major() {
            Some(src) => {
                self.data.iter_mut().zip(src).for_each(|(a, b)| *a += b);
                Ok(())
            }
            None => generic::combine_assign(self, other, |a, b| a + b),
        }
    }

    fn add_into(&self, other: &dyn Matrix, result: &mut dyn Matrix) -> LinalgResult<()> {
        ensure_same_shape("other", self.shape(), other.shape())?;
        ensure_result_shape(result, self.shape())?;
        if let (Some(src), Some(dst)) = (other.as_column_major(), result.as_column_major_mut()) {
            for ((d, a), b) in dst.iter_mut().zip(&self.data).zip(src) {
                *d = a + b;
            }
            return Ok(());
        }
        generic::combine_into(self, other, result, |a, b| a + b)
    }

    fn subtract_assign(&mut self, other: &dyn Matrix) -> LinalgResult<()> {
        ensure_same_shape("other", self.shape(), other.shape())?;
        match other.as_column_major() {
            Some(src) => {
                self.data.iter_mut().zip(src).for_each(|(a, b)| *a -= b);
                Ok(())
            }
            None => generic::combine_assign(self, other, |a, b| a - b),
        }
    }

    fn subtract_into(&self, other: &dyn Matrix, result: &mut dyn Matrix) -> LinalgResult<()> {
        ensure_same_shape("other", self.shape(), other.shape())?;
        ensure_result_shape(result, self.shape())?;
        if let (Some(src), Some(dst)) = (other.as_column_major(), result.as_column_major_mut()) {
            for ((d, a), b) in dst.iter_mut().zip(&self.data).zip(src) {
                *d = a - b;
            }
            return Ok(());
        }
        generic::combine_into(self, other, result, |a, b| a - b)
    }

    fn pointwise_multiply_into(&self, other: &dyn Matrix, result: &mut dyn Matrix) -> LinalgResult<()> {
        ensure_same_shape("other", self.shape(), other.shape())?;
        ensure_result_shape(result, self.shape())?;
        if let (Some(src), Some(dst)) = (other.as_column_major(), result.as_column_major_mut()) {
            for ((d, a), b) in dst.iter_mut().zip(&self.data).zip(src) {
                *d = a * b;
            }
            return Ok(());
        }
        generic::combine_into(self, other, result, |a, b| a * b)
    }

    fn clear(&mut self) {
        self.data.fill(0.0);
    }

    fn copy_to(&self, target: &mut dyn Matrix) -> LinalgResult<()> {
        ensure_result_shape(target, self.shape())?;
        if let Some(dst) = target.as_column_major_mut() {
            dst.copy_from_slice(&self.data);
            return Ok(());
        }
        generic::map_into(self, target, |v| v)
    }

    fn append_into(&self, right: &dyn Matrix, result: &mut dyn Matrix) -> LinalgResult<()> {
        if right.rows() != self.rows {
            return Err(LinalgError::NotConformable {
                parameter: "right",
                expected: (self.rows, right.columns()),
                found: right.shape(),
            });
        }
        ensure_result_shape(result, (self.rows, self.columns + right.columns()))?;
        // Column-major: appending columns is concatenation of the buffers.
        if let (Some(src), Some(dst)) = (right.as_column_major(), result.as_column_major_mut()) {
            let split = self.data.len();
            dst[..split].copy_from_slice(&self.data);
            dst[split..].copy_from_slice(src);
            return Ok(());
        }
        generic::write_block(self, result, 0, 0);
        generic::write_block(right, result, 0, self.columns);
        Ok(())
    }

    fn transpose(&self) -> DenseMatrix {
        let (rows, columns) = (self.rows, self.columns);
        let mut data = vec![0.0; rows * columns];
        for c in 0..columns {
            for r in 0..rows {
                data[r * columns + c] = self.data[c * rows + r];
            }
        }
        DenseMatrix { rows: columns, columns: rows, data }
    }

    fn column_into(
        &self, index: usize, row_index: usize, length: usize, result: &mut dyn Vector,
    ) -> LinalgResult<()> {
        ensure_index("index", index, self.columns)?;
        ensure_range("row_index", row_index, length, self.rows)?;
        ensure_result_count(length, result)?;
        let start = self.offset(row_index, index);
        let src = &self.data[start..start + length];
        match result.as_mut_slice() {
            Some(dst) => dst.copy_from_slice(src),
            None => {
                for (i, &value) in src.iter().enumerate() {
                    result.set_value_at(i, value);
                }
            }
        }
        Ok(())
    }

    fn set_column_values(&mut self, index: usize, column: &[f64]) -> LinalgResult<()> {
        ensure_index("index", index, self.columns)?;
        if column.len() != self.rows {
            return Err(LinalgError::ArrayNotConformable {
                parameter: "column",
                expected: self.rows,
                found: column.len(),
            });
        }
        let start = index * self.rows;
        self.data[start..start + self.rows].copy_from_slice(column);
        Ok(())
    }
}

// ---- Conversions ----

impl TryFrom<Array2<f64>> for DenseMatrix {
    type Error = LinalgError;

    fn try_from(values: Array2<f64>) -> LinalgResult<Self> {
        DenseMatrix::from_array(values.view())
    }
}

impl From<DenseMatrix> for Array2<f64> {
    fn from(m: DenseMatrix) -> Self {
        m.to_array2()
    }
}

// ---- Indexing, equality, hashing, formatting ----

impl Index<(usize, usize)> for DenseMatrix {
    type Output = f64;

    fn index(&self, (row, column): (usize, usize)) -> &f64 {
        assert!(row < self.rows && column < self.columns, "matrix index out of range");
        &self.data[self.offset(row, column)]
    }
}

impl IndexMut<(usize, usize)> for DenseMatrix {
    fn index_mut(&mut self, (row, column): (usize, usize)) -> &mut f64 {
        assert!(row < self.rows && column < self.columns, "matrix index out of range");
        let at = self.offset(row, column);
        &mut self.data[at]
    }
}

impl PartialEq for DenseMatrix {
    fn eq(&self, other: &Self) -> bool {
        self.rows == other.rows && self.columns == other.columns && self.data == other.data
    }
}

impl Hash for DenseMatrix {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_i32(self.hash_code());
    }
}

impl fmt::Display for DenseMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..self.rows {
            if r > 0 {
                writeln!(f)?;
            }
            for c in 0..self.columns {
                if c > 0 {
                    f.write_str("\t")?;
                }
                let value = self.value_at(r, c);
                match f.precision() {
                    Some(p) => write!(f, "{value:.p$}")?,
                    None => write!(f, "{value}")?,
                }
            }
        }
        Ok(())
    }
}

// ---- Operators ----

impl Add for &DenseMatrix {
    type Output = LinalgResult<DenseMatrix>;

    fn add(self, rhs: &DenseMatrix) -> Self::Output {
        let mut out = self.clone();
        Matrix::add_assign(&mut out, rhs)?;
        Ok(out)
    }
}

impl Sub for &DenseMatrix {
    type Output = LinalgResult<DenseMatrix>;

    fn sub(self, rhs: &DenseMatrix) -> Self::Output {
        let mut out = self.clone();
        Matrix::subtract_assign(&mut out, rhs)?;
        Ok(out)
    }
}

impl Mul for &DenseMatrix {
    type Output = LinalgResult<DenseMatrix>;

    fn mul(self, rhs: &DenseMatrix) -> Self::Output {
        self.multiply(rhs)
    }
}

impl Mul<&DenseVector> for &DenseMatrix {
    type Output = LinalgResult<DenseVector>;

    fn mul(self, rhs: &DenseVector) -> Self::Output {
        self.multiply_vector(rhs)
    }
}

impl Mul<f64> for &DenseMatrix {
    type Output = DenseMatrix;

    fn mul(self, rhs: f64) -> DenseMatrix {
        let mut out = self.clone();
        out.multiply_scalar(rhs);
        out
    }
}

impl Div<f64> for &DenseMatrix {
    type Output = DenseMatrix;

    fn div(self, rhs: f64) -> DenseMatrix {
        let mut out = self.clone();
        out.divide_scalar(rhs);
        out
    }
}

impl Neg for &DenseMatrix {
    type Output = DenseMatrix;

    fn neg(self) -> DenseMatrix {
        let mut out = self.clone();
        out.negate();
        out
    }
}
