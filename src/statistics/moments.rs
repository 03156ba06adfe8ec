//! moments — location, scale, and extreme-value statistics.
//!
//! Purpose
//! -------
//! One-pass summaries over plain `f64` slices and over optional-value slices
//! (`&[Option<f64>]`, where `None` is an unset entry that does not count).
//!
//! Key behaviors
//! -------------
//! - [`RunningMoments`] implements Welford's incremental update; [`mean`],
//!   [`variance`] and [`standard_deviation`] are thin wrappers over it.
//! - [`median`] sorts a copy and averages the two middle values for even
//!   lengths.
//! - Extremes and the median reject empty input with
//!   [`StatsError::EmptyCollection`]; variance needs two observations.
//!
//! Conventions
//! -----------
//! - Variance is the sample variance (divisor `n − 1`).
//! - NaN is an ordinary number here and propagates through sums; removing
//!   holes is the caller's job. [`maximum`]/[`minimum`] use `f64::max`/`min`
//!   semantics, which skip NaN unless every value is NaN.

use crate::statistics::errors::{StatsError, StatsResult};

/// Welford accumulator for count, mean, and sum of squared deviations.
///
/// Notes
/// -----
/// - `push` updates `mean += δ/n` and `m2 += δ·(x − mean_new)`, which avoids
///   the cancellation of the textbook `Σx² − n·x̄²` form on long series.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RunningMoments {
    count: usize,
    mean: f64,
    m2: f64,
}

impl RunningMoments {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: f64) {
        self.count += 1;
        let delta = value - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (value - self.mean);
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn mean(&self) -> StatsResult<f64> {
        if self.count == 0 {
            return Err(StatsError::EmptyCollection { parameter: "data" });
        }
        Ok(self.mean)
    }

    /// Sample variance.
    pub fn variance(&self) -> StatsResult<f64> {
        if self.count < 2 {
            return Err(StatsError::InsufficientData { needed: 2, found: self.count });
        }
        Ok(self.m2 / (self.count - 1) as f64)
    }

    pub fn standard_deviation(&self) -> StatsResult<f64> {
        self.variance().map(f64::sqrt)
    }
}

impl Extend<f64> for RunningMoments {
    fn extend<I: IntoIterator<Item = f64>>(&mut self, iter: I) {
        iter.into_iter().for_each(|x| self.push(x));
    }
}

impl FromIterator<f64> for RunningMoments {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut moments = RunningMoments::new();
        moments.extend(iter);
        moments
    }
}

// ---- Plain slices ----

pub fn maximum(data: &[f64]) -> StatsResult<f64> {
    extreme(data.iter().copied(), f64::max)
}

pub fn minimum(data: &[f64]) -> StatsResult<f64> {
    extreme(data.iter().copied(), f64::min)
}

pub fn mean(data: &[f64]) -> StatsResult<f64> {
    data.iter().copied().collect::<RunningMoments>().mean()
}

/// Sample variance via [`RunningMoments`].
///
/// Errors
/// ------
/// - `StatsError::InsufficientData` when `data.len() < 2`.
pub fn variance(data: &[f64]) -> StatsResult<f64> {
    data.iter().copied().collect::<RunningMoments>().variance()
}

pub fn standard_deviation(data: &[f64]) -> StatsResult<f64> {
    variance(data).map(f64::sqrt)
}

pub fn median(data: &[f64]) -> StatsResult<f64> {
    median_of(data.to_vec())
}

// ---- Optional-value slices ----

pub fn maximum_opt(data: &[Option<f64>]) -> StatsResult<f64> {
    extreme(data.iter().flatten().copied(), f64::max)
}

pub fn minimum_opt(data: &[Option<f64>]) -> StatsResult<f64> {
    extreme(data.iter().flatten().copied(), f64::min)
}

pub fn mean_opt(data: &[Option<f64>]) -> StatsResult<f64> {
    data.iter().flatten().copied().collect::<RunningMoments>().mean()
}

pub fn variance_opt(data: &[Option<f64>]) -> StatsResult<f64> {
    data.iter().flatten().copied().collect::<RunningMoments>().variance()
}

pub fn standard_deviation_opt(data: &[Option<f64>]) -> StatsResult<f64> {
    variance_opt(data).map(f64::sqrt)
}

pub fn median_opt(data: &[Option<f64>]) -> StatsResult<f64> {
    median_of(data.iter().flatten().copied().collect())
}

// ---- Helpers ----

fn extreme(mut values: impl Iterator<Item = f64>, pick: fn(f64, f64) -> f64) -> StatsResult<f64> {
    let first = values.next().ok_or(StatsError::EmptyCollection { parameter: "data" })?;
    Ok(values.fold(first, pick))
}

fn median_of(mut values: Vec<f64>) -> StatsResult<f64> {
    if values.is_empty() {
        return Err(StatsError::EmptyCollection { parameter: "data" });
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 0 { Ok((values[mid - 1] + values[mid]) / 2.0) } else { Ok(values[mid]) }
}

#[cfg(test)]
mod tests {
    // Scope
    // -----
    // Welford accumulator against two-pass formulas and statrs, median
    // parity rules, and optional-value overloads.
    use super::*;
    use approx::assert_relative_eq;
    use statrs::statistics::Statistics;

    fn synthetic(n: usize) -> Vec<f64> {
        (0..n).map(|i| 1e3 + ((i as f64) * 0.37).sin() * 5.0 + (i % 7) as f64 * 0.01).collect()
    }

    #[test]
    // Purpose
    // -------
    // Mean and sample variance of a small integer series.
    //
    // Given
    // -----
    // - [1, 2, 3, 4].
    //
    // Expect
    // ------
    // - Mean 2.5 and variance 5/3.
    fn mean_and_variance_of_one_to_four() {
        let data = [1.0, 2.0, 3.0, 4.0];

        assert_relative_eq!(mean(&data).unwrap(), 2.5);
        assert_relative_eq!(variance(&data).unwrap(), 5.0 / 3.0, epsilon = 1e-15);
    }

    #[test]
    fn welford_matches_two_pass_on_offset_series() {
        let data = synthetic(5_000);
        let n = data.len() as f64;
        let two_pass_mean = data.iter().sum::<f64>() / n;
        let two_pass_var = data.iter().map(|x| (x - two_pass_mean).powi(2)).sum::<f64>() / (n - 1.0);

        assert_relative_eq!(mean(&data).unwrap(), two_pass_mean, max_relative = 1e-12);
        assert_relative_eq!(variance(&data).unwrap(), two_pass_var, max_relative = 1e-8);
        assert_relative_eq!(variance(&data).unwrap(), data.iter().variance(), max_relative = 1e-8);
        assert_relative_eq!(standard_deviation(&data).unwrap(), data.iter().std_dev(), max_relative = 1e-8);
    }

    #[test]
    fn median_averages_middle_pair_for_even_length() {
        assert_relative_eq!(median(&[4.0, 1.0, 3.0, 2.0]).unwrap(), 2.5);
        assert_relative_eq!(median(&[5.0, 1.0, 3.0]).unwrap(), 3.0);
        assert_eq!(median(&[]), Err(StatsError::EmptyCollection { parameter: "data" }));
    }

    #[test]
    fn extremes_reject_empty_input() {
        assert_eq!(maximum(&[]), Err(StatsError::EmptyCollection { parameter: "data" }));
        assert_eq!(minimum_opt(&[None, None]), Err(StatsError::EmptyCollection { parameter: "data" }));
        assert_eq!(maximum(&[-1.0, 3.0, 2.0]), Ok(3.0));
        assert_eq!(minimum(&[-1.0, 3.0, 2.0]), Ok(-1.0));
    }

    #[test]
    fn optional_overloads_skip_unset_entries() {
        let data = [Some(1.0), None, Some(2.0), Some(3.0), None, Some(4.0)];

        assert_relative_eq!(mean_opt(&data).unwrap(), 2.5);
        assert_relative_eq!(variance_opt(&data).unwrap(), 5.0 / 3.0, epsilon = 1e-15);
        assert_relative_eq!(median_opt(&data).unwrap(), 2.5);
        assert_eq!(maximum_opt(&data), Ok(4.0));
    }

    #[test]
    fn inline_nan_is_not_skipped() {
        assert!(mean(&[1.0, f64::NAN, 3.0]).unwrap().is_nan());
        assert!(variance_opt(&[Some(1.0), Some(f64::NAN)]).unwrap().is_nan());
    }

    #[test]
    fn variance_needs_two_observations() {
        assert_eq!(variance(&[1.0]), Err(StatsError::InsufficientData { needed: 2, found: 1 }));

        let mut acc = RunningMoments::new();
        acc.push(10.0);
        assert_eq!(acc.count(), 1);
        assert_eq!(acc.mean(), Ok(10.0));
        assert!(acc.standard_deviation().is_err());
    }
}
