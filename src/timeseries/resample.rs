//! resample — windows, resampling, and rank queries.
//!
//! Purpose
//! -------
//! Cut a series by index or date window, resample it onto coarser
//! calendars, and answer positional range and percentile questions.
//!
//! Key behaviors
//! -------------
//! - [`TimeSeries::get_range`] keeps finite observations inside an inclusive
//!   date window, or (with [`FillMethod::Days`]) produces one as-of point per
//!   calendar day of the window.
//! - [`TimeSeries::get_range_by_index`] copies an inclusive index window,
//!   holes included.
//! - [`TimeSeries::get_end_of_months`] keeps the last observation of each
//!   calendar month; [`TimeSeries::get_intervals`] samples as-of values on a
//!   regular grid; [`TimeSeries::get_sparse_subset`] keeps every
//!   `distance`-th point counted back from the last one.
//!
//! Invariants & assumptions
//! ------------------------
//! - As-of sampling (`Days` fill, intervals) relies on ascending dates.
//! - Resampled outputs are in ascending date order.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDateTime, TimeDelta};

use crate::statistics::moments::{maximum, minimum};
use crate::statistics::StatsError;
use crate::timeseries::errors::{SeriesError, SeriesResult, ensure_index, ensure_positive};
use crate::timeseries::options::{DateSearchType, FillMethod, IntervalUnit};
use crate::timeseries::series::TimeSeries;

impl TimeSeries {
    // ---- Windows ----

    /// Points with `start <= date <= end`.
    ///
    /// Parameters
    /// ----------
    /// - `start`, `end`: inclusive window bounds.
    /// - `fill`: [`FillMethod::None`] keeps finite observations inside the
    ///   window; [`FillMethod::Days`] steps one day at a time from `start`
    ///   and keeps each finite as-of value.
    ///
    /// Returns
    /// -------
    /// - A new series, empty when nothing qualifies.
    pub fn get_range(&self, start: NaiveDateTime, end: NaiveDateTime, fill: FillMethod) -> TimeSeries {
        let points: Vec<(NaiveDateTime, f64)> = match fill {
            FillMethod::None => self
                .iter()
                .take_while(|(date, _)| *date <= end)
                .filter(|(date, value)| *date >= start && value.is_finite())
                .collect(),
            FillMethod::Days => {
                let mut points = Vec::new();
                let mut date = start;
                while date <= end {
                    let value = self.value_at_closest(date, DateSearchType::Previous);
                    if value.is_finite() {
                        points.push((date, value));
                    }
                    match date.checked_add_signed(TimeDelta::days(1)) {
                        Some(next) => date = next,
                        None => break,
                    }
                }
                points
            }
        };
        let (dates, values) = points.into_iter().unzip();
        self.derive(dates, values)
    }

    /// Inclusive index window `[start, end]`.
    ///
    /// Errors
    /// ------
    /// - `SeriesError::InvalidRange` when `start > end`.
    /// - `SeriesError::IndexOutOfRange` when `end >= count`.
    pub fn get_range_by_index(&self, start: usize, end: usize) -> SeriesResult<TimeSeries> {
        self.ensure_window(start, end)?;
        Ok(self.derive(self.dates()[start..=end].to_vec(), self.values()[start..=end].to_vec()))
    }

    /// `(maximum, minimum)` over the inclusive index window, skipping holes.
    ///
    /// Errors
    /// ------
    /// - Window errors as for [`TimeSeries::get_range_by_index`].
    /// - `SeriesError::Stats(EmptyCollection)` when the window holds only
    ///   holes.
    pub fn max_min(&self, start: usize, end: usize) -> SeriesResult<(f64, f64)> {
        self.ensure_window(start, end)?;
        let observed: Vec<f64> = self.values()[start..=end].iter().copied().filter(|v| !v.is_nan()).collect();
        Ok((maximum(&observed)?, minimum(&observed)?))
    }

    fn ensure_window(&self, start: usize, end: usize) -> SeriesResult<()> {
        if start > end {
            return Err(SeriesError::InvalidRange { start, end });
        }
        ensure_index("end", end, self.count())
    }

    /// Fraction of observed values less than or equal to `value`.
    ///
    /// Errors
    /// ------
    /// - `SeriesError::Stats(EmptyCollection)` when the series has no
    ///   observed value.
    pub fn percentile(&self, value: f64) -> SeriesResult<f64> {
        let observed: Vec<f64> = self.values().iter().copied().filter(|v| !v.is_nan()).collect();
        if observed.is_empty() {
            return Err(StatsError::EmptyCollection { parameter: "series" }.into());
        }
        let below = observed.iter().filter(|&&v| v <= value).count();
        Ok(below as f64 / observed.len() as f64)
    }

    // ---- Resampling ----

    /// Last observation of every calendar month, in month order.
    pub fn get_end_of_months(&self) -> TimeSeries {
        let mut last_in_month: BTreeMap<(i32, u32), usize> = BTreeMap::new();
        for (i, date) in self.dates().iter().enumerate() {
            last_in_month
                .entry((date.year(), date.month()))
                .and_modify(|best| {
                    if *date > self.dates()[*best] {
                        *best = i;
                    }
                })
                .or_insert(i);
        }
        let (dates, values) = last_in_month.into_values().map(|i| (self.dates()[i], self.values()[i])).unzip();
        self.derive(dates, values)
    }

    /// As-of values on a regular grid.
    ///
    /// Parameters
    /// ----------
    /// - `interval`: grid spacing in `unit`s. Must be ≥ 1.
    /// - `unit`: grid granularity; the first grid point is the first date
    ///   truncated to this unit (clamped up to the first date).
    ///
    /// Errors
    /// ------
    /// - `SeriesError::NotPositive { parameter: "interval" }` for a zero
    ///   interval.
    pub fn get_intervals(&self, interval: u32, unit: IntervalUnit) -> SeriesResult<TimeSeries> {
        ensure_positive("interval", interval as usize)?;
        let (Some(&first), Some(&last)) = (self.dates().first(), self.dates().last()) else {
            return Ok(TimeSeries::empty_with(self.options()));
        };

        let step = unit.step(interval);
        let mut dates = Vec::new();
        let mut values = Vec::new();
        let mut grid = unit.truncate(first);
        while grid <= last {
            let date = grid.max(first);
            dates.push(date);
            values.push(self.value_at_closest(date, DateSearchType::Previous));
            match grid.checked_add_signed(step) {
                Some(next) => grid = next,
                None => break,
            }
        }
        Ok(self.derive(dates, values))
    }

    /// Every `distance`-th point counted back from the last one, returned in
    /// ascending order.
    ///
    /// Errors
    /// ------
    /// - `SeriesError::NotPositive { parameter: "distance" }` for zero.
    pub fn get_sparse_subset(&self, distance: usize) -> SeriesResult<TimeSeries> {
        ensure_positive("distance", distance)?;
        let mut picked: Vec<usize> = (0..self.count()).rev().step_by(distance).collect();
        picked.reverse();
        let (dates, values) = picked.into_iter().map(|i| (self.dates()[i], self.values()[i])).unzip();
        Ok(self.derive(dates, values))
    }
}

#[cfg(test)]
mod tests {
    // Scope
    // -----
    // Date and index windows, daily fill, max/min and percentile over holes,
    // month-end, interval, and sparse resampling.
    use super::*;
    use crate::timeseries::series::tests::{day, series};
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d).unwrap().and_hms_opt(h, 0, 0).unwrap()
    }

    #[test]
    fn date_window_keeps_finite_points_inside_bounds() {
        let ts = series(&[1.0, f64::NAN, 3.0, 4.0, 5.0]);

        let window = ts.get_range(day(2), day(4), FillMethod::None);
        assert_eq!(window.dates(), &[day(3), day(4)]);
        assert_eq!(window.values(), &[3.0, 4.0]);

        assert!(ts.get_range(day(10), day(12), FillMethod::None).is_empty());
    }

    #[test]
    // Purpose
    // -------
    // Daily fill produces one as-of point per day of the window.
    //
    // Given
    // -----
    // - Observations on Jan 2 (2.0) and Jan 5 (5.0).
    //
    // Expect
    // ------
    // - Window Jan 1..6: Jan 1 has no prior observation and is skipped;
    //   Jan 2..4 carry 2.0; Jan 5..6 carry 5.0.
    fn daily_fill_carries_values_forward() {
        let ts = TimeSeries::from_parts(vec![day(2), day(5)], vec![2.0, 5.0]).unwrap();

        let filled = ts.get_range(day(1), day(6), FillMethod::Days);
        assert_eq!(filled.dates(), &[day(2), day(3), day(4), day(5), day(6)]);
        assert_eq!(filled.values(), &[2.0, 2.0, 2.0, 5.0, 5.0]);
    }

    #[test]
    fn index_window_keeps_holes_and_checks_bounds() {
        let ts = series(&[1.0, f64::NAN, 3.0]);

        let window = ts.get_range_by_index(1, 2).unwrap();
        assert_eq!(window, TimeSeries::from_parts(vec![day(2), day(3)], vec![f64::NAN, 3.0]).unwrap());

        assert_eq!(ts.get_range_by_index(2, 1), Err(SeriesError::InvalidRange { start: 2, end: 1 }));
        assert!(matches!(ts.get_range_by_index(0, 3), Err(SeriesError::IndexOutOfRange { .. })));
    }

    #[test]
    fn max_min_and_percentile_skip_holes() {
        let ts = series(&[4.0, f64::NAN, -1.0, 2.0]);

        assert_eq!(ts.max_min(0, 3), Ok((4.0, -1.0)));
        assert_eq!(ts.max_min(1, 1), Err(SeriesError::Stats(StatsError::EmptyCollection { parameter: "data" })));
        assert_eq!(ts.percentile(2.0), Ok(2.0 / 3.0));
        assert!(TimeSeries::empty().percentile(0.0).is_err());
    }

    #[test]
    fn end_of_months_keeps_last_observation_per_month() {
        let dates = vec![
            at(2024, 1, 30, 0),
            at(2024, 1, 31, 0),
            at(2024, 2, 1, 0),
            at(2024, 2, 29, 0),
            at(2024, 3, 4, 0),
        ];
        let ts = TimeSeries::from_parts(dates, vec![1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();

        let months = ts.get_end_of_months();
        assert_eq!(months.dates(), &[at(2024, 1, 31, 0), at(2024, 2, 29, 0), at(2024, 3, 4, 0)]);
        assert_eq!(months.values(), &[2.0, 4.0, 5.0]);
    }

    #[test]
    // Purpose
    // -------
    // Interval sampling walks a regular grid from the truncated first date.
    //
    // Given
    // -----
    // - Hourly observations at 09:00 (1), 10:00 (2), 13:00 (3).
    //
    // Expect
    // ------
    // - A 2-hour grid 09, 11, 13 with as-of values 1, 2, 3.
    fn intervals_sample_as_of_values() {
        let dates = vec![at(2024, 1, 1, 9), at(2024, 1, 1, 10), at(2024, 1, 1, 13)];
        let ts = TimeSeries::from_parts(dates, vec![1.0, 2.0, 3.0]).unwrap();

        let grid = ts.get_intervals(2, IntervalUnit::Hour).unwrap();
        assert_eq!(grid.dates(), &[at(2024, 1, 1, 9), at(2024, 1, 1, 11), at(2024, 1, 1, 13)]);
        assert_eq!(grid.values(), &[1.0, 2.0, 3.0]);

        assert_eq!(ts.get_intervals(0, IntervalUnit::Hour), Err(SeriesError::NotPositive { parameter: "interval" }));
    }

    #[test]
    fn sparse_subset_anchors_on_last_point() {
        let ts = series(&[1.0, 2.0, 3.0, 4.0, 5.0]);

        let sparse = ts.get_sparse_subset(2).unwrap();
        assert_eq!(sparse.dates(), &[day(1), day(3), day(5)]);
        assert_eq!(ts.get_sparse_subset(3).unwrap().values(), &[2.0, 5.0]);
        assert!(ts.get_sparse_subset(0).is_err());
    }
}
