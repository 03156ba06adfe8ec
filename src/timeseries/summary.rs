//! summary — descriptive statistics of a series' observed values.
//!
//! Every accessor except [`TimeSeries::annual_volatility`] first drops NaN
//! and infinite values, then delegates to [`crate::statistics`].
//! Annualized volatility works on consecutive observed pairs and scales each
//! squared ratio return by the elapsed time in 252-day trading years.

use crate::statistics::{self, StatsResult};
use crate::timeseries::series::TimeSeries;

const TRADING_DAYS_PER_YEAR: f64 = 252.0;
const SECONDS_PER_DAY: f64 = 86_400.0;

impl TimeSeries {
    pub fn maximum(&self) -> StatsResult<f64> {
        statistics::maximum(&self.finite_values())
    }

    pub fn minimum(&self) -> StatsResult<f64> {
        statistics::minimum(&self.finite_values())
    }

    pub fn mean(&self) -> StatsResult<f64> {
        statistics::mean(&self.finite_values())
    }

    pub fn median(&self) -> StatsResult<f64> {
        statistics::median(&self.finite_values())
    }

    /// Sample variance of the finite values; `0.0` with fewer than two.
    pub fn variance(&self) -> StatsResult<f64> {
        let finite = self.finite_values();
        if finite.len() <= 1 {
            return Ok(0.0);
        }
        statistics::variance(&finite)
    }

    pub fn std_dev(&self) -> StatsResult<f64> {
        self.variance().map(f64::sqrt)
    }

    /// Root mean square of the finite values.
    pub fn quadratic_variation(&self) -> StatsResult<f64> {
        statistics::quadratic_variation(&self.finite_values())
    }

    /// Annualized volatility of ratio returns on an irregular calendar.
    ///
    /// Notes
    /// -----
    /// - For each consecutive pair without a hole,
    ///   `(vᵢ / vᵢ₋₁ − 1)² / (Δdaysᵢ / 252)` is accumulated; the result is the
    ///   square root of the average. Zero when no pair qualifies.
    pub fn annual_volatility(&self) -> f64 {
        let (dates, values) = (self.dates(), self.values());
        let mut sum = 0.0;
        let mut pairs = 0usize;
        for i in 1..values.len() {
            let (previous, current) = (values[i - 1], values[i]);
            if previous.is_nan() || current.is_nan() {
                continue;
            }
            let elapsed = dates[i].signed_duration_since(dates[i - 1]).num_seconds() as f64 / SECONDS_PER_DAY;
            sum += (current / previous - 1.0).powi(2) / (elapsed / TRADING_DAYS_PER_YEAR);
            pairs += 1;
        }
        if pairs > 0 {
            sum /= pairs as f64;
        }
        sum.sqrt()
    }
}
