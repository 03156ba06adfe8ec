//! gemm — generalized matrix multiply-accumulate.
//!
//! Computes `C = alpha · op(A) · op(B) + beta · C` with `op` chosen per operand.
//! [`gemm`] validates shapes, handles the `alpha == 0 && beta == 0` shortcut,
//! and then picks one of two kernels:
//!
//! - a flat index-arithmetic kernel when all three matrices expose
//!   column-major storage;
//! - a generic kernel through `value_at`/`set_value_at` otherwise.
//!
//! Each kernel has four loop specializations, one per transpose pair.

use crate::linalg::errors::{LinalgError, LinalgResult};
use crate::linalg::matrix::Matrix;

/// Whether an operand enters the product as-is or transposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transpose {
    #[default]
    No,
    Yes,
}

impl Transpose {
    /// Shape of `op(M)` given the stored shape of `M`.
    fn apply(self, shape: (usize, usize)) -> (usize, usize) {
        match self {
            Transpose::No => shape,
            Transpose::Yes => (shape.1, shape.0),
        }
    }
}

/// GEMM operand that may name the result matrix itself.
#[derive(Debug, Clone, Copy)]
pub enum GemmOperand<'a> {
    /// The matrix receiving the result.
    This,
    Other(&'a dyn Matrix),
}

/// Validate shapes and run the best available kernel.
pub(crate) fn gemm<R, A, B>(
    result: &mut R, alpha: f64, beta: f64, op_a: Transpose, op_b: Transpose, a: &A, b: &B,
) -> LinalgResult<()>
where
    R: Matrix + ?Sized,
    A: Matrix + ?Sized,
    B: Matrix + ?Sized,
{
    let (m, k) = op_a.apply(a.shape());
    let (k_b, n) = op_b.apply(b.shape());
    if k != k_b {
        return Err(LinalgError::NotConformable { parameter: "b", expected: (k, n), found: (k_b, n) });
    }
    if result.shape() != (m, n) {
        return Err(LinalgError::ResultNotConformable { parameter: "result", expected: (m, n), found: result.shape() });
    }

    if alpha == 0.0 && beta == 0.0 {
        result.clear();
        return Ok(());
    }

    let scale = Scale { alpha, beta };
    if let (Some(a_data), Some(b_data)) = (a.as_column_major(), b.as_column_major()) {
        let dims = Dims { m, n, k, a_rows: a.rows(), b_rows: b.rows() };
        if let Some(c_data) = result.as_column_major_mut() {
            flat(c_data, a_data, b_data, dims, scale, op_a, op_b);
            return Ok(());
        }
    }
    generic(result, a, b, (m, n, k), scale, op_a, op_b);
    Ok(())
}

#[derive(Debug, Clone, Copy)]
struct Scale {
    alpha: f64,
    beta: f64,
}

impl Scale {
    /// Combine an accumulated product with the prior result value. `prior` is
    /// only invoked when `beta != 0`.
    #[inline]
    fn finish(self, sum: f64, prior: impl FnOnce() -> f64) -> f64 {
        let scaled = if self.alpha == 1.0 { sum } else { self.alpha * sum };
        if self.beta == 0.0 { scaled } else { scaled + self.beta * prior() }
    }
}

#[derive(Debug, Clone, Copy)]
struct Dims {
    m: usize,
    n: usize,
    k: usize,
    a_rows: usize,
    b_rows: usize,
}

// ---- Flat column-major kernel ----

fn flat(
    c: &mut [f64], a: &[f64], b: &[f64], dims: Dims, scale: Scale, op_a: Transpose, op_b: Transpose,
) {
    let Dims { m, n, k, a_rows, b_rows } = dims;
    match (op_a, op_b) {
        (Transpose::No, Transpose::No) => {
            // Column-oriented: C[:, j] = beta·C[:, j] + Σ_p alpha·B[p, j]·A[:, p]
            for j in 0..n {
                let c_col = &mut c[j * m..(j + 1) * m];
                if scale.beta == 0.0 {
                    c_col.fill(0.0);
                } else if scale.beta != 1.0 {
                    c_col.iter_mut().for_each(|x| *x *= scale.beta);
                }
                for p in 0..k {
                    let b_pj = b[j * b_rows + p];
                    let factor = if scale.alpha == 1.0 { b_pj } else { scale.alpha * b_pj };
                    let a_col = &a[p * a_rows..p * a_rows + m];
                    for (c_ij, &a_ip) in c_col.iter_mut().zip(a_col) {
                        *c_ij += a_ip * factor;
                    }
                }
            }
        }
        (Transpose::Yes, Transpose::No) => {
            // op(A)(i, p) = A[p, i]: contiguous column i of A against column j of B.
            for j in 0..n {
                let b_col = &b[j * b_rows..j * b_rows + k];
                for i in 0..m {
                    let a_col = &a[i * a_rows..i * a_rows + k];
                    let sum: f64 = a_col.iter().zip(b_col).map(|(x, y)| x * y).sum();
                    let idx = j * m + i;
                    let value = scale.finish(sum, || c[idx]);
                    c[idx] = value;
                }
            }
        }
        (Transpose::No, Transpose::Yes) => {
            // op(B)(p, j) = B[j, p].
            for j in 0..n {
                for i in 0..m {
                    let mut sum = 0.0;
                    for p in 0..k {
                        sum += a[p * a_rows + i] * b[p * b_rows + j];
                    }
                    let idx = j * m + i;
                    let value = scale.finish(sum, || c[idx]);
                    c[idx] = value;
                }
            }
        }
        (Transpose::Yes, Transpose::Yes) => {
            for j in 0..n {
                for i in 0..m {
                    let mut sum = 0.0;
                    for p in 0..k {
                        sum += a[i * a_rows + p] * b[p * b_rows + j];
                    }
                    let idx = j * m + i;
                    let value = scale.finish(sum, || c[idx]);
                    c[idx] = value;
                }
            }
        }
    }
}

// ---- Generic kernel ----

fn generic<R, A, B>(
    c: &mut R, a: &A, b: &B, (m, n, k): (usize, usize, usize), scale: Scale, op_a: Transpose,
    op_b: Transpose,
) where
    R: Matrix + ?Sized,
    A: Matrix + ?Sized,
    B: Matrix + ?Sized,
{
    match (op_a, op_b) {
        (Transpose::No, Transpose::No) => {
            for j in 0..n {
                for i in 0..m {
                    let sum = (0..k).map(|p| a.value_at(i, p) * b.value_at(p, j)).sum::<f64>();
                    let value = scale.finish(sum, || c.value_at(i, j));
                    c.set_value_at(i, j, value);
                }
            }
        }
        (Transpose::Yes, Transpose::No) => {
            for j in 0..n {
                for i in 0..m {
                    let sum = (0..k).map(|p| a.value_at(p, i) * b.value_at(p, j)).sum::<f64>();
                    let value = scale.finish(sum, || c.value_at(i, j));
                    c.set_value_at(i, j, value);
                }
            }
        }
        (Transpose::No, Transpose::Yes) => {
            for j in 0..n {
                for i in 0..m {
                    let sum = (0..k).map(|p| a.value_at(i, p) * b.value_at(j, p)).sum::<f64>();
                    let value = scale.finish(sum, || c.value_at(i, j));
                    c.set_value_at(i, j, value);
                }
            }
        }
        (Transpose::Yes, Transpose::Yes) => {
            for j in 0..n {
                for i in 0..m {
                    let sum = (0..k).map(|p| a.value_at(p, i) * b.value_at(j, p)).sum::<f64>();
                    let value = scale.finish(sum, || c.value_at(i, j));
                    c.set_value_at(i, j, value);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    // Scope
    // -----
    // Shape validation, the alpha/beta shortcuts, and agreement between the
    // flat and generic kernels for all four transpose pairs.
    use super::*;
    use crate::linalg::dense_matrix::DenseMatrix;
    use approx::assert_relative_eq;

    /// Row-major wrapper with no column-major exposure; forces the generic kernel.
    #[derive(Debug)]
    struct Opaque(DenseMatrix);

    impl Matrix for Opaque {
        fn rows(&self) -> usize {
            self.0.rows()
        }
        fn columns(&self) -> usize {
            self.0.columns()
        }
        fn value_at(&self, row: usize, column: usize) -> f64 {
            self.0.value_at(row, column)
        }
        fn set_value_at(&mut self, row: usize, column: usize, value: f64) {
            self.0.set_value_at(row, column, value);
        }
    }

    fn naive(a: &DenseMatrix, b: &DenseMatrix) -> DenseMatrix {
        let mut out = DenseMatrix::zeros(a.rows(), b.columns()).unwrap();
        for i in 0..a.rows() {
            for j in 0..b.columns() {
                let mut s = 0.0;
                for p in 0..a.columns() {
                    s += a.value_at(i, p) * b.value_at(p, j);
                }
                out.set_value_at(i, j, s);
            }
        }
        out
    }

    fn sample(rows: usize, columns: usize, seed: f64) -> DenseMatrix {
        let data = (0..rows * columns).map(|i| ((i as f64 + seed) * 0.731).sin() * 3.0).collect();
        DenseMatrix::from_column_major(rows, columns, data).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Flat and generic kernels agree with the naive triple loop for every
    // transpose combination.
    //
    // Given
    // -----
    // - A: 3x4, B: 4x2 stored so that op(A)·op(B) is always 3x2.
    //
    // Expect
    // ------
    // - Both kernels match `naive` within 1e-12 for alpha = 1, beta = 0.
    fn all_transpose_pairs_match_naive_product() {
        let a = sample(3, 4, 0.0);
        let b = sample(4, 2, 1.0);
        let expected = naive(&a, &b);
        let at = a.transpose();
        let bt = b.transpose();

        let cases: [(Transpose, &DenseMatrix, Transpose, &DenseMatrix); 4] = [
            (Transpose::No, &a, Transpose::No, &b),
            (Transpose::Yes, &at, Transpose::No, &b),
            (Transpose::No, &a, Transpose::Yes, &bt),
            (Transpose::Yes, &at, Transpose::Yes, &bt),
        ];

        for (op_a, lhs, op_b, rhs) in cases {
            let mut flat_c = DenseMatrix::zeros(3, 2).unwrap();
            gemm(&mut flat_c, 1.0, 0.0, op_a, op_b, lhs, rhs).unwrap();

            let mut generic_c = Opaque(DenseMatrix::zeros(3, 2).unwrap());
            gemm(&mut generic_c, 1.0, 0.0, op_a, op_b, &Opaque(lhs.clone()), rhs).unwrap();

            for i in 0..3 {
                for j in 0..2 {
                    assert_relative_eq!(flat_c.value_at(i, j), expected.value_at(i, j), epsilon = 1e-12);
                    assert_relative_eq!(generic_c.value_at(i, j), expected.value_at(i, j), epsilon = 1e-12);
                }
            }
        }
    }

    #[test]
    fn zero_alpha_and_beta_clear_result_without_reading_operands() {
        let a = DenseMatrix::from_value(2, 2, f64::NAN).unwrap();
        let b = DenseMatrix::from_value(2, 2, f64::INFINITY).unwrap();
        let mut c = DenseMatrix::from_value(2, 2, 7.0).unwrap();

        gemm(&mut c, 0.0, 0.0, Transpose::No, Transpose::No, &a, &b).unwrap();

        assert!(c.to_column_major_vec().iter().all(|&x| x == 0.0));
    }

    #[test]
    fn zero_beta_ignores_non_finite_prior_result() {
        let a = DenseMatrix::identity(2).unwrap();
        let b = sample(2, 2, 3.0);
        let mut c = DenseMatrix::from_value(2, 2, f64::NAN).unwrap();

        gemm(&mut c, 1.0, 0.0, Transpose::No, Transpose::Yes, &a, &b).unwrap();

        assert!(c.equals(&b.transpose()));
    }

    #[test]
    fn alpha_and_beta_scale_product_and_prior() {
        let a = DenseMatrix::identity(2).unwrap();
        let b = DenseMatrix::from_value(2, 2, 1.0).unwrap();
        let mut flat_c = DenseMatrix::from_value(2, 2, 10.0).unwrap();
        let mut generic_c = Opaque(DenseMatrix::from_value(2, 2, 10.0).unwrap());

        gemm(&mut flat_c, 2.0, 0.5, Transpose::No, Transpose::No, &a, &b).unwrap();
        gemm(&mut generic_c, 2.0, 0.5, Transpose::No, Transpose::No, &a, &b).unwrap();

        assert!(flat_c.to_column_major_vec().iter().all(|&x| x == 7.0));
        assert!(generic_c.0.to_column_major_vec().iter().all(|&x| x == 7.0));
    }

    #[test]
    fn inner_dimension_mismatch_names_second_operand() {
        let a = sample(2, 3, 0.0);
        let b = sample(2, 2, 0.0);
        let mut c = DenseMatrix::zeros(2, 2).unwrap();

        let err = gemm(&mut c, 1.0, 0.0, Transpose::No, Transpose::No, &a, &b).unwrap_err();
        assert!(matches!(err, LinalgError::NotConformable { parameter: "b", .. }));

        // Transposing A makes it 3x2, still not conformable with 2x2 result rows.
        let err = gemm(&mut c, 1.0, 0.0, Transpose::Yes, Transpose::No, &a, &b).unwrap_err();
        assert!(matches!(err, LinalgError::ResultNotConformable { .. }));
    }

    #[test]
    fn aliased_operand_reads_snapshot() {
        let mut c = DenseMatrix::from_rows(&[vec![1.0, 1.0], vec![0.0, 1.0]]).unwrap();

        c.gemm_with(1.0, 0.0, Transpose::No, Transpose::No, GemmOperand::This, GemmOperand::This).unwrap();

        assert_eq!(c.to_rows(), vec![vec![1.0, 2.0], vec![0.0, 1.0]]);
    }

    #[test]
    // Purpose
    // -------
    // The aliased form reads a snapshot under a transposed operand and a
    // non-zero beta.
    //
    // Given
    // -----
    // - C = A = [[1, 2], [3, 4]], alpha = 1, beta = 1, op(A) = Aᵀ.
    //
    // Expect
    // ------
    // - C = AᵀA + A = [[10, 14], [14, 20]] + A = [[11, 16], [17, 24]].
    fn aliased_transposed_operand_reads_snapshot() {
        let a = DenseMatrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        let mut c = a.clone();

        c.gemm_with(1.0, 1.0, Transpose::Yes, Transpose::No, GemmOperand::This, GemmOperand::This).unwrap();

        assert_eq!(c.to_rows(), vec![vec![11.0, 16.0], vec![17.0, 24.0]]);
    }
}
