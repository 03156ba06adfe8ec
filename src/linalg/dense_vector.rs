//! DenseVector — contiguous `Vec<f64>` backing for [`Vector`].
//!
//! Dense-to-dense operations run over slices (bulk copies, zipped loops);
//! whenever the other operand or the result does not expose a slice the
//! implementation falls back to [`crate::linalg::vector::generic`], so mixing
//! storage kinds is always correct.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Add, Div, Index, IndexMut, Mul, Neg, Sub};

use ndarray::{Array1, ArrayView1};

use crate::linalg::errors::{LinalgError, LinalgResult, ensure_positive, ensure_range};
use crate::linalg::vector::{Vector, ensure_result_count, ensure_same_count, generic};

#[derive(Debug, Clone)]
pub struct DenseVector {
    data: Vec<f64>,
}

impl DenseVector {
    /// Zero-filled vector of length `count`.
    ///
    /// Errors
    /// ------
    /// - `LinalgError::NotPositive { parameter: "count" }` when `count == 0`.
    pub fn zeros(count: usize) -> LinalgResult<Self> {
        Self::from_value(count, 0.0)
    }

    pub fn from_value(count: usize, value: f64) -> LinalgResult<Self> {
        ensure_positive("count", count)?;
        Ok(DenseVector { data: vec![value; count] })
    }

    pub fn from_slice(values: &[f64]) -> LinalgResult<Self> {
        Self::from_vec(values.to_vec())
    }

    /// Take ownership of `values` without copying.
    pub fn from_vec(values: Vec<f64>) -> LinalgResult<Self> {
        ensure_positive("values", values.len())?;
        Ok(DenseVector { data: values })
    }

    /// Dense copy of any [`Vector`].
    pub fn from_vector(source: &dyn Vector) -> Self {
        source.to_dense()
    }

    pub fn from_array(values: ArrayView1<'_, f64>) -> LinalgResult<Self> {
        Self::from_vec(values.iter().copied().collect())
    }

    /// Internal constructor for call sites that already guarantee a
    /// non-empty buffer (copies of existing vectors, matrix rows/columns).
    pub(crate) fn from_vec_unchecked(values: Vec<f64>) -> Self {
        debug_assert!(!values.is_empty());
        DenseVector { data: values }
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }

    pub fn into_vec(self) -> Vec<f64> {
        self.data
    }

    pub fn to_array1(&self) -> Array1<f64> {
        Array1::from_vec(self.data.clone())
    }

    /// Grow to `count` slots, filling the new tail with `fill`. Never shrinks.
    pub(crate) fn grow(&mut self, count: usize, fill: f64) {
        if count > self.data.len() {
            self.data.resize(count, fill);
        }
    }
}

impl Vector for DenseVector {
    fn count(&self) -> usize {
        self.data.len()
    }

    fn value_at(&self, index: usize) -> f64 {
        self.data[index]
    }

    fn set_value_at(&mut self, index: usize, value: f64) {
        self.data[index] = value;
    }

    fn as_slice(&self) -> Option<&[f64]> {
        Some(&self.data)
    }

    fn as_mut_slice(&mut self) -> Option<&mut [f64]> {
        Some(&mut self.data)
    }

    fn to_dense(&self) -> DenseVector {
        self.clone()
    }

    fn to_vec(&self) -> Vec<f64> {
        self.data.clone()
    }

    fn add_scalar(&mut self, scalar: f64) {
        self.data.iter_mut().for_each(|x| *x += scalar);
    }

    fn add_assign(&mut self, other: &dyn Vector) -> LinalgResult<()> {
        if let Some(src) = other.as_slice() {
            ensure_same_count("other", self.data.len(), src.len())?;
            self.data.iter_mut().zip(src).for_each(|(a, b)| *a += b);
            return Ok(());
        }
        generic::combine_assign(self, other, |a, b| a + b)
    }

    fn add_into(&self, other: &dyn Vector, result: &mut dyn Vector) -> LinalgResult<()> {
        ensure_same_count("other", self.data.len(), other.count())?;
        ensure_result_count(self.data.len(), result)?;
        if let (Some(src), Some(dst)) = (other.as_slice(), result.as_mut_slice()) {
            for ((d, a), b) in dst.iter_mut().zip(&self.data).zip(src) {
                *d = a + b;
            }
            return Ok(());
        }
        generic::combine_into(self, other, result, |a, b| a + b)
    }

    fn subtract_assign(&mut self, other: &dyn Vector) -> LinalgResult<()> {
        if let Some(src) = other.as_slice() {
            ensure_same_count("other", self.data.len(), src.len())?;
            self.data.iter_mut().zip(src).for_each(|(a, b)| *a -= b);
            return Ok(());
        }
        generic::combine_assign(self, other, |a, b| a - b)
    }

    fn subtract_into(&self, other: &dyn Vector, result: &mut dyn Vector) -> LinalgResult<()> {
        ensure_same_count("other", self.data.len(), other.count())?;
        ensure_result_count(self.data.len(), result)?;
        if let (Some(src), Some(dst)) = (other.as_slice(), result.as_mut_slice()) {
            for ((d, a), b) in dst.iter_mut().zip(&self.data).zip(src) {
                *d = a - b;
            }
            return Ok(());
        }
        generic::combine_into(self, other, result, |a, b| a - b)
    }

    fn multiply_scalar(&mut self, scalar: f64) {
        if scalar != 1.0 {
            self.data.iter_mut().for_each(|x| *x *= scalar);
        }
    }

    fn pointwise_multiply_into(&self, other: &dyn Vector, result: &mut dyn Vector) -> LinalgResult<()> {
        ensure_same_count("other", self.data.len(), other.count())?;
        ensure_result_count(self.data.len(), result)?;
        if let (Some(src), Some(dst)) = (other.as_slice(), result.as_mut_slice()) {
            for ((d, a), b) in dst.iter_mut().zip(&self.data).zip(src) {
                *d = a * b;
            }
            return Ok(());
        }
        generic::combine_into(self, other, result, |a, b| a * b)
    }

    fn dot(&self, other: &dyn Vector) -> LinalgResult<f64> {
        match other.as_slice() {
            Some(src) => {
                ensure_same_count("other", self.data.len(), src.len())?;
                Ok(self.data.iter().zip(src).map(|(a, b)| a * b).sum())
            }
            None => generic::dot(self, other),
        }
    }

    fn clear(&mut self) {
        self.data.fill(0.0);
    }

    fn copy_to(&self, target: &mut dyn Vector) -> LinalgResult<()> {
        ensure_result_count(self.data.len(), target)?;
        if let Some(dst) = target.as_mut_slice() {
            dst.copy_from_slice(&self.data);
            return Ok(());
        }
        generic::copy_to(self, target)
    }

    fn copy_range_to(
        &self, target: &mut dyn Vector, offset: usize, dest_offset: usize, count: usize,
    ) -> LinalgResult<()> {
        ensure_range("offset", offset, count, self.data.len())?;
        ensure_range("dest_offset", dest_offset, count, target.count())?;
        if let Some(dst) = target.as_mut_slice() {
            dst[dest_offset..dest_offset + count].copy_from_slice(&self.data[offset..offset + count]);
            return Ok(());
        }
        generic::copy_range_to(self, target, offset, dest_offset, count)
    }

    fn set_values(&mut self, values: &[f64]) -> LinalgResult<()> {
        if values.len() != self.data.len() {
            return Err(LinalgError::ArrayNotConformable {
                parameter: "values",
                expected: self.data.len(),
                found: values.len(),
            });
        }
        self.data.copy_from_slice(values);
        Ok(())
    }

    fn sub_vector(&self, index: usize, length: usize) -> LinalgResult<DenseVector> {
        ensure_range("index", index, length, self.data.len())?;
        Ok(DenseVector { data: self.data[index..index + length].to_vec() })
    }

    fn sum(&self) -> f64 {
        self.data.iter().sum()
    }
}

// ---- Conversions ----

impl TryFrom<Vec<f64>> for DenseVector {
    type Error = LinalgError;

    fn try_from(values: Vec<f64>) -> LinalgResult<Self> {
        DenseVector::from_vec(values)
    }
}

impl TryFrom<Array1<f64>> for DenseVector {
    type Error = LinalgError;

    fn try_from(values: Array1<f64>) -> LinalgResult<Self> {
        DenseVector::from_array(values.view())
    }
}

impl From<DenseVector> for Array1<f64> {
    fn from(v: DenseVector) -> Self {
        Array1::from_vec(v.data)
    }
}

impl From<DenseVector> for Vec<f64> {
    fn from(v: DenseVector) -> Self {
        v.data
    }
}

// ---- Indexing, equality, hashing, formatting ----

impl Index<usize> for DenseVector {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.data[index]
    }
}

impl IndexMut<usize> for DenseVector {
    fn index_mut(&mut self, index: usize) -> &mut f64 {
        &mut self.data[index]
    }
}

impl PartialEq for DenseVector {
    fn eq(&self, other: &Self) -> bool {
        self.data == other.data
    }
}

impl Hash for DenseVector {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_i32(self.hash_code());
    }
}

impl fmt::Display for DenseVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, value) in self.data.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match f.precision() {
                Some(p) => write!(f, "{value:.p$}")?,
                None => write!(f, "{value}")?,
            }
        }
        f.write_str("]")
    }
}

// ---- Operators ----
//
// Vector-vector operators return `LinalgResult` because the operands may not
// conform; scalar operators cannot fail.

impl Add for &DenseVector {
    type Output = LinalgResult<DenseVector>;

    fn add(self, rhs: &DenseVector) -> Self::Output {
        let mut out = self.clone();
        Vector::add_assign(&mut out, rhs)?;
        Ok(out)
    }
}

impl Sub for &DenseVector {
    type Output = LinalgResult<DenseVector>;

    fn sub(self, rhs: &DenseVector) -> Self::Output {
        let mut out = self.clone();
        Vector::subtract_assign(&mut out, rhs)?;
        Ok(out)
    }
}

impl Add<f64> for &DenseVector {
    type Output = DenseVector;

    fn add(self, rhs: f64) -> DenseVector {
        let mut out = self.clone();
        out.add_scalar(rhs);
        out
    }
}

impl Sub<f64> for &DenseVector {
    type Output = DenseVector;

    fn sub(self, rhs: f64) -> DenseVector {
        let mut out = self.clone();
        out.subtract_scalar(rhs);
        out
    }
}

impl Mul<f64> for &DenseVector {
    type Output = DenseVector;

    fn mul(self, rhs: f64) -> DenseVector {
        let mut out = self.clone();
        out.multiply_scalar(rhs);
        out
    }
}

impl Mul<&DenseVector> for f64 {
    type Output = DenseVector;

    fn mul(self, rhs: &DenseVector) -> DenseVector {
        rhs * self
    }
}

impl Div<f64> for &DenseVector {
    type Output = DenseVector;

    fn div(self, rhs: f64) -> DenseVector {
        let mut out = self.clone();
        out.divide_scalar(rhs);
        out
    }
}

impl Neg for &DenseVector {
    type Output = DenseVector;

    fn neg(self) -> DenseVector {
        let mut out = self.clone();
        out.negate();
        out
    }
}
