//! Integration tests for the dense kernel, the time-series engine, and the
//! statistics layer.
//!
//! Purpose
//! -------
//! - Validate the crate's public surface end to end: kernel algebra and GEMM
//!   against naive references, series append/remove and lookup, hole
//!   alignment, synchronization, and the statistics the series layer feeds.
//! - Run the documented worked scenarios exactly as a caller would.
//!
//! Coverage
//! --------
//! - `linalg`:
//!   - `(a + b) − b ≈ a`, GEMM vs triple loop, double transpose, `A·I = A`.
//!   - Transposed GEMM flavors and the aliased form.
//! - `timeseries`:
//!   - Append then index, remove then absent; hole round trip; Exact and
//!     Latest synchronization; a small returns / statistics pipeline.
//!   - `TimeSeriesCollection` export through `ndarray`.
//! - `statistics`:
//!   - Welford vs two-pass moments, Kendall tau of monotone paths.
//!
//! Exclusions
//! ----------
//! - Decomposition numerics beyond what the kernel exposes; those are the
//!   backend's responsibility and covered by unit tests.
//! - Concurrency stress beyond the unit test in `timeseries::shared`.
use approx::assert_relative_eq;
use calendar_numerics::linalg::prelude::*;
use calendar_numerics::statistics::{kendall_tau, mean, variance};
use calendar_numerics::timeseries::prelude::*;
use chrono::{NaiveDate, NaiveDateTime};

/// Midnight on 2024-01-`d`.
fn day(d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, d).unwrap().and_hms_opt(0, 0, 0).unwrap()
}

/// Deterministic, non-trivial fill for an `r × c` matrix.
fn filled(rows: usize, columns: usize, seed: f64) -> DenseMatrix {
    let data: Vec<f64> =
        (0..rows * columns).map(|k| ((k as f64 + 1.0) * seed).sin() * 3.0 + (k % 5) as f64 * 0.25).collect();
    DenseMatrix::from_column_major(rows, columns, data).unwrap()
}

fn naive_product(a: &DenseMatrix, b: &DenseMatrix) -> DenseMatrix {
    let mut out = DenseMatrix::zeros(a.rows(), b.columns()).unwrap();
    for i in 0..a.rows() {
        for j in 0..b.columns() {
            let mut sum = 0.0;
            for k in 0..a.columns() {
                sum += a.value_at(i, k) * b.value_at(k, j);
            }
            out.set_value_at(i, j, sum);
        }
    }
    out
}

fn assert_matrix_close(got: &DenseMatrix, want: &DenseMatrix) {
    assert_eq!(got.shape(), want.shape());
    for (g, w) in got.data().iter().zip(want.data()) {
        assert_relative_eq!(*g, *w, epsilon = 1e-10);
    }
}

// ---- Kernel -----------------------------------------------------------------

#[test]
fn scenario_vector_addition() {
    let a = DenseVector::from_slice(&[1.0, 2.0, 3.0]).unwrap();
    let b = DenseVector::from_slice(&[4.0, 5.0, 6.0]).unwrap();

    let sum = (&a + &b).unwrap();
    assert_eq!(sum.data(), &[5.0, 7.0, 9.0]);

    let back = (&sum - &b).unwrap();
    for i in 0..3 {
        assert_relative_eq!(back[i], a[i]);
    }
}

#[test]
fn scenario_identity_product() {
    let a = DenseMatrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
    let product = a.multiply(&DenseMatrix::identity(2).unwrap()).unwrap();

    assert_eq!(product, a);
}

#[test]
// Purpose
// -------
// GEMM agrees with the naive product for every transpose pair.
//
// Given
// -----
// - A (4 × 3), B (3 × 5) and their transposes.
//
// Expect
// ------
// - alpha = 1, beta = 0 matches the triple loop in all four flavors.
fn gemm_matches_naive_product_in_all_flavors() {
    let a = filled(4, 3, 0.7);
    let b = filled(3, 5, 1.3);
    let want = naive_product(&a, &b);
    let (at, bt) = (a.transpose(), b.transpose());

    let cases: [(Transpose, Transpose, &DenseMatrix, &DenseMatrix); 4] = [
        (Transpose::No, Transpose::No, &a, &b),
        (Transpose::Yes, Transpose::No, &at, &b),
        (Transpose::No, Transpose::Yes, &a, &bt),
        (Transpose::Yes, Transpose::Yes, &at, &bt),
    ];
    for (op_a, op_b, left, right) in cases {
        let mut c = DenseMatrix::from_value(4, 5, f64::NAN).unwrap();
        c.gemm(1.0, 0.0, op_a, op_b, left, right).unwrap();
        assert_matrix_close(&c, &want);
    }
}

#[test]
fn aliased_gemm_squares_in_place() {
    let a = filled(3, 3, 0.4);
    let want = naive_product(&a, &a);

    let mut c = a.clone();
    c.gemm_with(1.0, 0.0, Transpose::No, Transpose::No, GemmOperand::This, GemmOperand::This).unwrap();
    assert_matrix_close(&c, &want);
}

#[test]
fn transpose_twice_and_right_identity() {
    let a = filled(5, 2, 0.9);

    assert_eq!(a.transpose().transpose(), a);
    assert_eq!(a.multiply(&DenseMatrix::identity(2).unwrap()).unwrap(), a);
    assert!(matches!(
        a.multiply(&DenseMatrix::identity(3).unwrap()),
        Err(LinalgError::NotConformable { parameter: "other", .. })
    ));
}

// ---- Time series ------------------------------------------------------------

#[test]
fn scenario_append_to_three_point_series() {
    let mut ts = TimeSeries::from_parts(vec![day(1), day(2), day(3)], vec![10.0, 11.0, 12.0]).unwrap();
    ts.add_data_point(day(4), 15.0);

    assert_eq!(ts.count(), 4);
    assert_eq!(ts.get_date_index(day(4)), Some(3));

    assert!(ts.remove_data_point(day(4)));
    assert!(!ts.contains_date(day(4)));
    assert_eq!(ts.count(), 3);
}

#[test]
// Purpose
// -------
// Holes removed from a series come back at exactly the same positions.
//
// Given
// -----
// - {Jan 1: 10, Jan 2: NaN, Jan 3: 12}.
//
// Expect
// ------
// - remove_holes gives {10, 12} with dropped = [1]; add_holes restores
//   {10, NaN, 12}.
fn scenario_hole_round_trip() {
    let ts = TimeSeries::from_parts(vec![day(1), day(2), day(3)], vec![10.0, f64::NAN, 12.0]).unwrap();

    let (compacted, holes) = remove_holes(&[&ts]);
    assert_eq!(compacted[0].values(), &[10.0, 12.0]);
    assert_eq!(holes.positions(), &[1]);

    let restored = add_holes(&compacted[0], &holes).unwrap();
    assert_eq!(restored.dates(), ts.dates());
    assert_eq!(restored[0], 10.0);
    assert!(restored[1].is_nan());
    assert_eq!(restored[2], 12.0);
}

#[test]
fn synchronization_properties() {
    let primary: TimeSeries = (1..=6).map(|d| (day(d), d as f64)).collect();
    let sparse = TimeSeries::from_parts(vec![day(2), day(5)], vec![20.0, 50.0]).unwrap();

    let exact = primary.synchronize(&sparse, SyncMethod::Exact);
    for (i, date) in primary.dates().iter().enumerate() {
        if sparse.contains_date(*date) {
            assert_eq!(exact[i], sparse.value_at_date(*date));
        } else {
            assert!(exact[i].is_nan());
        }
    }

    let single = TimeSeries::from_parts(vec![day(3)], vec![7.0]).unwrap();
    let latest = primary.synchronize(&single, SyncMethod::Latest);
    for (date, value) in latest.iter() {
        if date >= day(3) {
            assert_eq!(value, 7.0);
        } else {
            assert!(value.is_nan());
        }
    }
}

#[test]
fn returns_pipeline_feeds_statistics_and_panels() {
    let prices: TimeSeries =
        [100.0, 102.0, 101.0, 105.0, 104.0].iter().enumerate().map(|(i, p)| (day(i as u32 + 1), *p)).collect();
    let benchmark: TimeSeries =
        [50.0, 50.5, 50.0, 51.0, 51.5].iter().enumerate().map(|(i, p)| (day(i as u32 + 1), *p)).collect();

    let returns = prices.ratio_return();
    assert_eq!(returns.count(), 4);
    assert_relative_eq!(returns.mean().unwrap(), mean(returns.values()).unwrap(), epsilon = 1e-15);

    let excess = &returns - &benchmark.ratio_return();
    assert_eq!(excess.dates(), returns.dates());

    let mut panel = TimeSeriesCollection::new();
    panel.add("asset", returns.clone()).unwrap();
    panel.add("excess", excess).unwrap();
    let matrix = panel.to_array2();
    assert_eq!(matrix.dim(), (4, 2));

    let asset = DenseVector::from_array(matrix.column(0)).unwrap();
    assert_eq!(asset.data(), returns.values());
}

// ---- Statistics -------------------------------------------------------------

#[test]
fn scenario_moments_and_kendall_tau() {
    let data = [1.0, 2.0, 3.0, 4.0];
    let reversed = [4.0, 3.0, 2.0, 1.0];

    assert_eq!(mean(&data), Ok(2.5));
    assert_relative_eq!(variance(&data).unwrap(), 5.0 / 3.0, epsilon = 1e-15);
    assert_eq!(kendall_tau(&data, &reversed), Ok(-1.0));
    assert_eq!(kendall_tau(&data, &data), Ok(1.0));
}

#[test]
fn welford_matches_two_pass_on_long_series() {
    let data: Vec<f64> = (0..20_000).map(|i| 250.0 + ((i as f64) * 0.013).cos() * 4.0).collect();
    let n = data.len() as f64;
    let two_pass_mean = data.iter().sum::<f64>() / n;
    let two_pass_var = data.iter().map(|x| (x - two_pass_mean).powi(2)).sum::<f64>() / (n - 1.0);

    assert_relative_eq!(mean(&data).unwrap(), two_pass_mean, max_relative = 1e-12);
    assert_relative_eq!(variance(&data).unwrap(), two_pass_var, max_relative = 1e-8);
}
