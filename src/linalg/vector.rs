//! vector — the abstract Vector contract and its generic implementation.
//!
//! Purpose
//! -------
//! Define the [`Vector`] trait: a fixed-length, indexable sequence of `f64`
//! with a full operator set (elementwise arithmetic, dot products, norms,
//! extreme values, sub-vector extraction, hashing). Every provided method is
//! written against `count`/`value_at`/`set_value_at` only, so any storage that
//! implements the three required accessors gets the whole surface.
//!
//! Key behaviors
//! -------------
//! - Binary operations check exact length conformance first and report the
//!   offending parameter by name ([`LinalgError::NotConformable`] for operands,
//!   [`LinalgError::ResultNotConformable`] for output buffers).
//! - Storage exposure through [`Vector::as_slice`] lets dense implementors
//!   specialize without runtime type inspection; implementors that return
//!   `None` always take the generic path.
//! - The `generic` submodule holds the element-by-element routines that
//!   dense overrides fall back to when the other operand is not dense.
//!
//! Invariants & assumptions
//! ------------------------
//! - `count()` never changes after construction.
//! - `value_at`/`set_value_at` may panic on out-of-range indices, like slice
//!   indexing; the checked [`Vector::get`]/[`Vector::set`] return errors.
//!
//! Conventions
//! -----------
//! - "into" variants write into a caller-provided buffer. The borrow checker
//!   already rules out the destination aliasing an input, so the aliased form
//!   of each operation is the in-place variant (`add_assign`, `negate`, ...).
//! - Norm orders are `u32`; `p == 0` is rejected with
//!   [`LinalgError::InvalidNorm`].

use std::fmt;

use crate::linalg::dense_matrix::DenseMatrix;
use crate::linalg::dense_vector::DenseVector;
use crate::linalg::errors::{LinalgError, LinalgResult, ensure_index, ensure_range};
use crate::linalg::iter::{IndexedValues, Values};
use crate::linalg::matrix::Matrix;

/// Number of leading elements folded into [`Vector::hash_code`].
pub const VECTOR_HASH_SPAN: usize = 20;

pub trait Vector: fmt::Debug {
    // ---- Required storage access ----

    fn count(&self) -> usize;

    fn value_at(&self, index: usize) -> f64;

    fn set_value_at(&mut self, index: usize, value: f64);

    // ---- Storage exposure ----

    /// Contiguous view of the elements, when the storage has one.
    fn as_slice(&self) -> Option<&[f64]> {
        None
    }

    fn as_mut_slice(&mut self) -> Option<&mut [f64]> {
        None
    }

    // ---- Checked access and conversion ----

    fn get(&self, index: usize) -> LinalgResult<f64> {
        ensure_index("index", index, self.count())?;
        Ok(self.value_at(index))
    }

    fn set(&mut self, index: usize, value: f64) -> LinalgResult<()> {
        ensure_index("index", index, self.count())?;
        self.set_value_at(index, value);
        Ok(())
    }

    /// Dense copy of this vector.
    fn to_dense(&self) -> DenseVector {
        DenseVector::from_vec_unchecked(self.to_vec())
    }

    fn to_vec(&self) -> Vec<f64> {
        (0..self.count()).map(|i| self.value_at(i)).collect()
    }

    // ---- Addition and subtraction ----

    fn add_scalar(&mut self, scalar: f64) {
        for i in 0..self.count() {
            let value = self.value_at(i);
            self.set_value_at(i, value + scalar);
        }
    }

    fn add_scalar_into(&self, scalar: f64, result: &mut dyn Vector) -> LinalgResult<()> {
        ensure_result_count(self.count(), result)?;
        for i in 0..self.count() {
            result.set_value_at(i, self.value_at(i) + scalar);
        }
        Ok(())
    }

    fn add_assign(&mut self, other: &dyn Vector) -> LinalgResult<()> {
        generic::combine_assign(self, other, |a, b| a + b)
    }

    fn add_into(&self, other: &dyn Vector, result: &mut dyn Vector) -> LinalgResult<()> {
        generic::combine_into(self, other, result, |a, b| a + b)
    }

    /// `self += scale * other` (axpy).
    fn add_scaled(&mut self, scale: f64, other: &dyn Vector) -> LinalgResult<()> {
        generic::combine_assign(self, other, |a, b| a + scale * b)
    }

    fn add_scaled_into(
        &self, scale: f64, other: &dyn Vector, result: &mut dyn Vector,
    ) -> LinalgResult<()> {
        generic::combine_into(self, other, result, |a, b| a + scale * b)
    }

    fn subtract_scalar(&mut self, scalar: f64) {
        self.add_scalar(-scalar);
    }

    fn subtract_scalar_into(&self, scalar: f64, result: &mut dyn Vector) -> LinalgResult<()> {
        self.add_scalar_into(-scalar, result)
    }

    fn subtract_assign(&mut self, other: &dyn Vector) -> LinalgResult<()> {
        generic::combine_assign(self, other, |a, b| a - b)
    }

    fn subtract_into(&self, other: &dyn Vector, result: &mut dyn Vector) -> LinalgResult<()> {
        generic::combine_into(self, other, result, |a, b| a - b)
    }

    // ---- Scaling ----

    fn multiply_scalar(&mut self, scalar: f64) {
        if scalar == 1.0 {
            return;
        }
        for i in 0..self.count() {
            let value = self.value_at(i);
            self.set_value_at(i, value * scalar);
        }
    }

    fn multiply_scalar_into(&self, scalar: f64, result: &mut dyn Vector) -> LinalgResult<()> {
        ensure_result_count(self.count(), result)?;
        for i in 0..self.count() {
            result.set_value_at(i, self.value_at(i) * scalar);
        }
        Ok(())
    }

    fn divide_scalar(&mut self, scalar: f64) {
        self.multiply_scalar(1.0 / scalar);
    }

    fn divide_scalar_into(&self, scalar: f64, result: &mut dyn Vector) -> LinalgResult<()> {
        self.multiply_scalar_into(1.0 / scalar, result)
    }

    fn negate(&mut self) {
        self.multiply_scalar(-1.0);
    }

    fn negate_into(&self, result: &mut dyn Vector) -> LinalgResult<()> {
        self.multiply_scalar_into(-1.0, result)
    }

    // ---- Products ----

    fn pointwise_multiply_into(&self, other: &dyn Vector, result: &mut dyn Vector) -> LinalgResult<()> {
        generic::combine_into(self, other, result, |a, b| a * b)
    }

    fn pointwise_multiply(&self, other: &dyn Vector) -> LinalgResult<DenseVector> {
        let mut result = DenseVector::zeros(self.count())?;
        self.pointwise_multiply_into(other, &mut result)?;
        Ok(result)
    }

    fn dot(&self, other: &dyn Vector) -> LinalgResult<f64> {
        generic::dot(self, other)
    }

    /// Outer product `self · otherᵀ` written into a `count × other.count` matrix.
    fn outer_product_into(&self, other: &dyn Vector, result: &mut dyn Matrix) -> LinalgResult<()> {
        let expected = (self.count(), other.count());
        if (result.rows(), result.columns()) != expected {
            return Err(LinalgError::ResultNotConformable {
                parameter: "result",
                expected,
                found: (result.rows(), result.columns()),
            });
        }
        for c in 0..other.count() {
            let factor = other.value_at(c);
            for r in 0..self.count() {
                result.set_value_at(r, c, self.value_at(r) * factor);
            }
        }
        Ok(())
    }

    fn outer_product(&self, other: &dyn Vector) -> LinalgResult<DenseMatrix> {
        let mut result = DenseMatrix::zeros(self.count(), other.count())?;
        self.outer_product_into(other, &mut result)?;
        Ok(result)
    }

    // ---- Copy and mutation ----

    fn clear(&mut self) {
        for i in 0..self.count() {
            self.set_value_at(i, 0.0);
        }
    }

    fn copy_to(&self, target: &mut dyn Vector) -> LinalgResult<()> {
        generic::copy_to(self, target)
    }

    /// Copy `count` elements starting at `offset` into `target` at `dest_offset`.
    fn copy_range_to(
        &self, target: &mut dyn Vector, offset: usize, dest_offset: usize, count: usize,
    ) -> LinalgResult<()> {
        generic::copy_range_to(self, target, offset, dest_offset, count)
    }

    fn set_values(&mut self, values: &[f64]) -> LinalgResult<()> {
        if values.len() != self.count() {
            return Err(LinalgError::ArrayNotConformable {
                parameter: "values",
                expected: self.count(),
                found: values.len(),
            });
        }
        for (i, &value) in values.iter().enumerate() {
            self.set_value_at(i, value);
        }
        Ok(())
    }

    fn sub_vector(&self, index: usize, length: usize) -> LinalgResult<DenseVector> {
        ensure_range("index", index, length, self.count())?;
        Ok(DenseVector::from_vec_unchecked((index..index + length).map(|i| self.value_at(i)).collect()))
    }

    // ---- Reductions and norms ----

    fn sum(&self) -> f64 {
        (0..self.count()).map(|i| self.value_at(i)).sum()
    }

    fn sum_magnitudes(&self) -> f64 {
        (0..self.count()).map(|i| self.value_at(i).abs()).sum()
    }

    /// `(Σ |xᵢ|ᵖ)^(1/p)`; `p == 1` is the sum of magnitudes.
    fn p_norm(&self, p: u32) -> LinalgResult<f64> {
        match p {
            0 => Err(LinalgError::InvalidNorm { p }),
            1 => Ok(self.sum_magnitudes()),
            2 => Ok((0..self.count()).map(|i| self.value_at(i).powi(2)).sum::<f64>().sqrt()),
            _ => {
                let exponent = p as f64;
                let total: f64 = (0..self.count()).map(|i| self.value_at(i).abs().powf(exponent)).sum();
                Ok(total.powf(1.0 / exponent))
            }
        }
    }

    fn infinity_norm(&self) -> f64 {
        (0..self.count()).fold(0.0_f64, |acc, i| acc.max(self.value_at(i).abs()))
    }

    /// Copy scaled to unit `p`-norm.
    fn normalize(&self, p: u32) -> LinalgResult<DenseVector> {
        let norm = self.p_norm(p)?;
        let mut result = self.to_dense();
        result.divide_scalar(norm);
        Ok(result)
    }

    // ---- Extreme values ----

    fn maximum_index(&self) -> usize {
        generic::extreme_index(self, |v| v, |candidate, best| candidate > best)
    }

    fn maximum(&self) -> f64 {
        self.value_at(self.maximum_index())
    }

    fn minimum_index(&self) -> usize {
        generic::extreme_index(self, |v| v, |candidate, best| candidate < best)
    }

    fn minimum(&self) -> f64 {
        self.value_at(self.minimum_index())
    }

    fn absolute_maximum_index(&self) -> usize {
        generic::extreme_index(self, f64::abs, |candidate, best| candidate > best)
    }

    fn absolute_maximum(&self) -> f64 {
        self.value_at(self.absolute_maximum_index()).abs()
    }

    fn absolute_minimum_index(&self) -> usize {
        generic::extreme_index(self, f64::abs, |candidate, best| candidate < best)
    }

    fn absolute_minimum(&self) -> f64 {
        self.value_at(self.absolute_minimum_index()).abs()
    }

    // ---- Identity ----

    /// Elementwise equality; NaN never equals NaN.
    fn equals(&self, other: &dyn Vector) -> bool {
        self.count() == other.count() && (0..self.count()).all(|i| self.value_at(i) == other.value_at(i))
    }

    /// Bounded distribution hash over the first [`VECTOR_HASH_SPAN`] elements.
    ///
    /// Notes
    /// -----
    /// - XOR of the raw bit patterns, folded to the upper 32 bits. Equal
    ///   vectors hash equally; the converse does not hold, and `equals`
    ///   remains authoritative.
    fn hash_code(&self) -> i32 {
        let span = self.count().min(VECTOR_HASH_SPAN);
        let folded = (0..span).fold(0_u64, |acc, i| acc ^ self.value_at(i).to_bits());
        (folded >> 32) as u32 as i32
    }

    // ---- Iteration ----

    fn values(&self) -> Values<'_>
    where
        Self: Sized,
    {
        Values::new(self)
    }

    /// `(index, value)` pairs over `[index, index + length)`.
    fn indexed_range(&self, index: usize, length: usize) -> LinalgResult<IndexedValues<'_>>
    where
        Self: Sized,
    {
        ensure_range("index", index, length, self.count())?;
        Ok(IndexedValues::new(self, index, index + length))
    }
}

// ---- Conformance helpers ----

pub(crate) fn ensure_same_count(parameter: &'static str, expected: usize, found: usize) -> LinalgResult<()> {
    if expected != found {
        return Err(LinalgError::NotConformable { parameter, expected: (expected, 1), found: (found, 1) });
    }
    Ok(())
}

pub(crate) fn ensure_result_count(expected: usize, result: &dyn Vector) -> LinalgResult<()> {
    if result.count() != expected {
        return Err(LinalgError::ResultNotConformable {
            parameter: "result",
            expected: (expected, 1),
            found: (result.count(), 1),
        });
    }
    Ok(())
}

/// Element-by-element routines shared by the trait defaults and by dense
/// overrides that meet a non-dense operand.
pub(crate) mod generic {
    use super::*;

    pub(crate) fn combine_assign<V, F>(this: &mut V, other: &dyn Vector, op: F) -> LinalgResult<()>
    where
        V: Vector + ?Sized,
        F: Fn(f64, f64) -> f64,
    {
        ensure_same_count("other", this.count(), other.count())?;
        for i in 0..this.count() {
            let value = op(this.value_at(i), other.value_at(i));
            this.set_value_at(i, value);
        }
        Ok(())
    }

    pub(crate) fn combine_into<V, F>(
        this: &V, other: &dyn Vector, result: &mut dyn Vector, op: F,
    ) -> LinalgResult<()>
    where
        V: Vector + ?Sized,
        F: Fn(f64, f64) -> f64,
    {
        ensure_same_count("other", this.count(), other.count())?;
        ensure_result_count(this.count(), result)?;
        for i in 0..this.count() {
            result.set_value_at(i, op(this.value_at(i), other.value_at(i)));
        }
        Ok(())
    }

    pub(crate) fn dot<V: Vector + ?Sized>(this: &V, other: &dyn Vector) -> LinalgResult<f64> {
        ensure_same_count("other", this.count(), other.count())?;
        Ok((0..this.count()).map(|i| this.value_at(i) * other.value_at(i)).sum())
    }

    pub(crate) fn copy_to<V: Vector + ?Sized>(this: &V, target: &mut dyn Vector) -> LinalgResult<()> {
        ensure_result_count(this.count(), target)?;
        for i in 0..this.count() {
            target.set_value_at(i, this.value_at(i));
        }
        Ok(())
    }

    pub(crate) fn copy_range_to<V: Vector + ?Sized>(
        this: &V, target: &mut dyn Vector, offset: usize, dest_offset: usize, count: usize,
    ) -> LinalgResult<()> {
        ensure_range("offset", offset, count, this.count())?;
        ensure_range("dest_offset", dest_offset, count, target.count())?;
        for i in 0..count {
            target.set_value_at(dest_offset + i, this.value_at(offset + i));
        }
        Ok(())
    }

    /// Index of the first element whose projection wins `better` against all others.
    pub(crate) fn extreme_index<V, P, B>(this: &V, project: P, better: B) -> usize
    where
        V: Vector + ?Sized,
        P: Fn(f64) -> f64,
        B: Fn(f64, f64) -> bool,
    {
        let mut best_index = 0;
        let mut best = project(this.value_at(0));
        for i in 1..this.count() {
            let candidate = project(this.value_at(i));
            if better(candidate, best) {
                best_index = i;
                best = candidate;
            }
        }
        best_index
    }
}

#[cfg(test)]
mod tests {
    //! Scope
    //! -----
    //! Exercise the provided (generic) methods of [`Vector`] through a minimal
    //! non-dense implementor, so none of the dense fast paths are involved.
    use super::*;
    use approx::assert_relative_eq;

    /// Strided view over a buffer; deliberately exposes no contiguous slice.
    #[derive(Debug)]
    struct Strided {
        data: Vec<f64>,
    }

    impl Vector for Strided {
        fn count(&self) -> usize {
            self.data.len() / 2
        }
        fn value_at(&self, index: usize) -> f64 {
            self.data[2 * index]
        }
        fn set_value_at(&mut self, index: usize, value: f64) {
            self.data[2 * index] = value;
        }
    }

    fn strided(values: &[f64]) -> Strided {
        Strided { data: values.iter().flat_map(|&v| [v, -99.0]).collect() }
    }

    #[test]
    // Purpose
    // -------
    // Adding then subtracting the same operand restores the original values.
    //
    // Given
    // -----
    // - A generic vector `a` and a dense operand `b`.
    //
    // Expect
    // ------
    // - `(a + b) - b ≈ a` elementwise.
    fn add_then_subtract_round_trips_on_generic_path() {
        let mut a = strided(&[0.1, -2.5, 3.75]);
        let b = DenseVector::from_slice(&[1e3, 0.3, -7.0]).unwrap();

        a.add_assign(&b).unwrap();
        a.subtract_assign(&b).unwrap();

        for (got, want) in a.to_vec().iter().zip([0.1, -2.5, 3.75]) {
            assert_relative_eq!(*got, want, epsilon = 1e-12);
        }
    }

    #[test]
    fn add_into_rejects_wrong_result_length() {
        let a = strided(&[1.0, 2.0]);
        let b = strided(&[3.0, 4.0]);
        let mut result = DenseVector::zeros(3).unwrap();

        let err = a.add_into(&b, &mut result).unwrap_err();

        assert!(matches!(err, LinalgError::ResultNotConformable { parameter: "result", .. }));
    }

    #[test]
    fn dot_rejects_mismatched_operand() {
        let a = strided(&[1.0, 2.0]);
        let b = strided(&[3.0]);
        assert!(matches!(a.dot(&b), Err(LinalgError::NotConformable { parameter: "other", .. })));
    }

    #[test]
    fn norms_follow_their_definitions() {
        let v = strided(&[3.0, -4.0]);

        assert_relative_eq!(v.p_norm(1).unwrap(), 7.0);
        assert_relative_eq!(v.p_norm(2).unwrap(), 5.0);
        assert_relative_eq!(v.p_norm(3).unwrap(), (27.0_f64 + 64.0).powf(1.0 / 3.0), epsilon = 1e-12);
        assert_relative_eq!(v.infinity_norm(), 4.0);
        assert_eq!(v.p_norm(0), Err(LinalgError::InvalidNorm { p: 0 }));
    }

    #[test]
    fn extreme_values_report_first_winning_index() {
        let v = strided(&[2.0, -5.0, 5.0, 0.5]);

        assert_eq!(v.maximum_index(), 2);
        assert_eq!(v.minimum_index(), 1);
        assert_eq!(v.absolute_maximum_index(), 1);
        assert_eq!(v.absolute_minimum_index(), 3);
        assert_relative_eq!(v.absolute_maximum(), 5.0);
    }

    #[test]
    fn hash_ignores_elements_past_the_span() {
        let mut a: Vec<f64> = (0..25).map(f64::from).collect();
        let left = strided(&a);
        a[24] = 1e9;
        let right = strided(&a);

        assert_eq!(left.hash_code(), right.hash_code());
        assert!(!left.equals(&right));
    }

    #[test]
    fn copy_range_to_checks_both_windows() {
        let source = strided(&[1.0, 2.0, 3.0]);
        let mut target = DenseVector::zeros(4).unwrap();

        source.copy_range_to(&mut target, 1, 2, 2).unwrap();
        assert_eq!(target.to_vec(), vec![0.0, 0.0, 2.0, 3.0]);

        assert!(source.copy_range_to(&mut target, 1, 3, 2).is_err());
    }

    #[test]
    fn outer_product_has_expected_shape_and_values() {
        let a = strided(&[1.0, 2.0]);
        let b = strided(&[3.0, 4.0, 5.0]);

        let m = a.outer_product(&b).unwrap();

        assert_eq!((m.rows(), m.columns()), (2, 3));
        assert_relative_eq!(m.value_at(1, 2), 10.0);
    }
}
