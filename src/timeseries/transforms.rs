//! transforms — value replacement, logarithms, and return series.
//!
//! Purpose
//! -------
//! Derive new series from observed values: hole/non-finite replacement,
//! natural log, one-period returns, and dividend-reinvested total return.
//!
//! Key behaviors
//! -------------
//! - Return series need a lag: they start at the second observation and have
//!   `count − 1` points. A series with fewer than two points yields an empty
//!   result.
//! - Log and ratio returns mark a non-finite result (zero or hole inputs) as
//!   a hole so the output stays aligned with its dates; difference returns
//!   use `0.0` instead.
//! - [`TimeSeries::total_return`] compounds price ratios and adds the
//!   dividend paid on each date, with missing dividends counted as zero.
//!
//! Conventions
//! -----------
//! - Inputs are never mutated; every transform returns a new series with the
//!   source's options.

use crate::timeseries::ops::unary;
use crate::timeseries::options::SyncMethod;
use crate::timeseries::series::TimeSeries;

fn finite_or(value: f64, fallback: f64) -> f64 {
    if value.is_finite() { value } else { fallback }
}

impl TimeSeries {
    // ---- Replacement ----

    /// Replace every observed `old` with `new`. Holes are untouched, so a NaN
    /// `old` leaves the series unchanged; use [`TimeSeries::replace_nan`].
    pub fn replace(&self, old: f64, new: f64) -> TimeSeries {
        unary(self, |x| if x == old { new } else { x })
    }

    /// Fill holes with `value`.
    pub fn replace_nan(&self, value: f64) -> TimeSeries {
        self.map_values(|x| if x.is_nan() { value } else { x })
    }

    /// Fill holes and infinities with `value`.
    pub fn replace_nan_infinity(&self, value: f64) -> TimeSeries {
        self.map_values(|x| finite_or(x, value))
    }

    /// Drop points whose value is NaN or infinite, together with their dates.
    pub fn remove_nan_infinity(&self) -> TimeSeries {
        let (dates, values): (Vec<_>, Vec<_>) = self.iter().filter(|(_, v)| v.is_finite()).unzip();
        self.derive(dates, values)
    }

    fn map_values(&self, op: impl Fn(f64) -> f64) -> TimeSeries {
        self.derive(self.dates().to_vec(), self.values().iter().map(|&x| op(x)).collect())
    }

    // ---- Logs and returns ----

    /// Natural log; non-positive values and holes become holes.
    pub fn log(&self) -> TimeSeries {
        unary(self, |x| if x > 0.0 { x.ln() } else { f64::NAN })
    }

    /// `ln(xᵢ / xᵢ₋₁)` on dates 1..n.
    pub fn log_return(&self) -> TimeSeries {
        self.lagged(|previous, current| finite_or((current / previous).ln(), f64::NAN))
    }

    /// `xᵢ / xᵢ₋₁ − 1` on dates 1..n.
    pub fn ratio_return(&self) -> TimeSeries {
        self.lagged(|previous, current| finite_or(current / previous - 1.0, f64::NAN))
    }

    /// `xᵢ − xᵢ₋₁` on dates 1..n; non-finite differences become `0.0`.
    pub fn difference_return(&self) -> TimeSeries {
        self.lagged(|previous, current| finite_or(current - previous, 0.0))
    }

    fn lagged(&self, op: impl Fn(f64, f64) -> f64) -> TimeSeries {
        if self.count() < 2 {
            return TimeSeries::empty_with(self.options());
        }
        let values = self.values().windows(2).map(|w| op(w[0], w[1])).collect();
        self.derive(self.dates()[1..].to_vec(), values)
    }

    /// Total-return index: price path with dividends reinvested.
    ///
    /// Parameters
    /// ----------
    /// - `dividends`: cash amounts by date. When its calendar differs from
    ///   this series' calendar it is exact-synchronized onto it first.
    ///
    /// Returns
    /// -------
    /// - A series on this calendar. Leading holes are kept; from the first
    ///   observed price `v₀` onward, `vᵢ = vᵢ₋₁ · (pᵢ / pᵢ₋₁) + dᵢ`.
    ///
    /// Notes
    /// -----
    /// - A hole in the price path after the start propagates through the rest
    ///   of the index.
    pub fn total_return(&self, dividends: &TimeSeries) -> TimeSeries {
        let adjustment = if self.dates() == dividends.dates() {
            dividends.replace_nan(0.0)
        } else {
            self.synchronize(dividends, SyncMethod::Exact).replace_nan(0.0)
        };
        let prices = self.values();
        let mut index = prices.to_vec();
        let Some(start) = prices.iter().position(|p| !p.is_nan()) else {
            return self.derive(self.dates().to_vec(), index);
        };

        let mut level = prices[start];
        for i in start + 1..prices.len() {
            level = level * (prices[i] / prices[i - 1]) + adjustment.values()[i];
            index[i] = level;
        }
        self.derive(self.dates().to_vec(), index)
    }
}

#[cfg(test)]
mod tests {
    // Scope
    // -----
    // Replacement, log, the three return flavors, and total return with
    // matching and differing dividend calendars.
    use super::*;
    use crate::timeseries::series::tests::{day, series};
    use approx::assert_relative_eq;

    #[test]
    fn replacement_family() {
        let ts = series(&[1.0, f64::NAN, f64::INFINITY, 1.0]);

        assert_eq!(ts.replace(1.0, 9.0), series(&[9.0, f64::NAN, f64::INFINITY, 9.0]));
        assert_eq!(ts.replace(f64::NAN, 9.0), ts);
        assert_eq!(ts.replace_nan(0.0), series(&[1.0, 0.0, f64::INFINITY, 1.0]));
        assert_eq!(ts.replace_nan_infinity(0.0), series(&[1.0, 0.0, 0.0, 1.0]));

        let cleaned = ts.remove_nan_infinity();
        assert_eq!(cleaned.values(), &[1.0, 1.0]);
        assert_eq!(cleaned.dates(), &[day(1), day(4)]);
    }

    #[test]
    fn log_marks_non_positive_values_as_holes() {
        let logged = series(&[std::f64::consts::E, 0.0, -1.0, f64::NAN]).log();

        assert_relative_eq!(logged[0], 1.0, epsilon = 1e-15);
        assert!(logged.values()[1..].iter().all(|v| v.is_nan()));
    }

    #[test]
    // Purpose
    // -------
    // Returns start at the second date and stay aligned with their dates.
    //
    // Given
    // -----
    // - Prices [100, 110, NaN, 121].
    //
    // Expect
    // ------
    // - Ratio returns [0.1, NaN, NaN] on Jan 2..4.
    // - Difference returns [10, 0, 0].
    fn returns_drop_first_date_and_stay_aligned() {
        let prices = series(&[100.0, 110.0, f64::NAN, 121.0]);

        let ratio = prices.ratio_return();
        assert_eq!(ratio.dates(), &[day(2), day(3), day(4)]);
        assert_relative_eq!(ratio[0], 0.1, epsilon = 1e-12);
        assert!(ratio[1].is_nan() && ratio[2].is_nan());

        let log = prices.log_return();
        assert_relative_eq!(log[0], (1.1f64).ln(), epsilon = 1e-12);
        assert_eq!(log.count(), 3);

        assert_eq!(prices.difference_return().values(), &[10.0, 0.0, 0.0]);
        assert!(series(&[1.0]).log_return().is_empty());
    }

    #[test]
    // Purpose
    // -------
    // Total return compounds price ratios and adds dividends.
    //
    // Given
    // -----
    // - Prices [NaN, 100, 110, 99] and a dividend of 1 on Jan 3.
    //
    // Expect
    // ------
    // - [NaN, 100, 111, 99.9]: 100·1.1 + 1 = 111, then 111·0.9 = 99.9.
    fn total_return_reinvests_dividends() {
        let prices = series(&[f64::NAN, 100.0, 110.0, 99.0]);
        let sparse = TimeSeries::from_parts(vec![day(3)], vec![1.0]).unwrap();
        let dense = series(&[f64::NAN, 0.0, 1.0, f64::NAN]);

        for dividends in [&sparse, &dense] {
            let index = prices.total_return(dividends);
            assert!(index[0].is_nan());
            assert_relative_eq!(index[1], 100.0);
            assert_relative_eq!(index[2], 111.0, epsilon = 1e-12);
            assert_relative_eq!(index[3], 99.9, epsilon = 1e-12);
        }
    }
}
