//! TimeSeries — values on a calendar with O(1) date lookup and amortized
//! append.
//!
//! Purpose
//! -------
//! Hold a [`DenseVector`] of values and a parallel [`DateTimeList`], plus a
//! `date → position` map that is kept consistent by every structural
//! mutation. This file owns storage, construction, lookup, and the
//! append/remove/sort mutations; operators, alignment, synchronization,
//! transforms, resampling, and summary statistics live in sibling modules
//! as further `impl TimeSeries` blocks.
//!
//! Key behaviors
//! -------------
//! - Backing storage may be longer than the visible series: the trailing
//!   `spare` slots hold NaN at [`SENTINEL`] and are consumed by appends before
//!   any reallocation. Growth happens in chunks of
//!   [`SeriesOptions::growth_chunk`] slots (260 by default).
//! - A series created with [`TimeSeries::new`] is in the *uninitialized*
//!   state: one NaN point at [`SENTINEL`]. The first append overwrites that
//!   point instead of appending after it.
//! - [`TimeSeries::remove_data_point`] compacts: later points move one slot
//!   left, the freed tail slot becomes NaN at [`SENTINEL`], and the spare
//!   count grows. Storage never shrinks.
//!
//! Invariants & assumptions
//! ------------------------
//! - `data.count() == dates.len()` and `count() == data.count() - spare`.
//! - The index maps each visible non-sentinel date to its position. When a
//!   calendar repeats a date, the later position wins.
//! - Closest-date lookups assume the visible dates are ascending; call
//!   [`TimeSeries::sort`] after out-of-order appends.
//! - A hole is NaN at a timestamp. Holes are values, never gaps in the
//!   calendar.
//!
//! Conventions
//! -----------
//! - Positional access through `Index`/`IndexMut` panics out of range like a
//!   slice; [`TimeSeries::get`] and [`TimeSeries::set_value`] are the checked
//!   forms.
//! - Date-keyed reads return NaN for absent dates; date-keyed writes to an
//!   absent date are errors.
//! - Mutation requires `&mut self`. Shared handles that need concurrent
//!   appends go through [`crate::timeseries::SharedTimeSeries`].
//!
//! Testing notes
//! -------------
//! - Unit tests cover the uninitialized-state overwrite, chunked growth,
//!   remove/compaction, closest-date edge cases, and construction errors.

use std::collections::HashMap;
use std::fmt;
use std::ops::{Index, IndexMut};

use chrono::NaiveDateTime;
use ndarray::{Array1, ArrayView1};
use tracing::debug;

use crate::linalg::dense_vector::DenseVector;
use crate::linalg::vector::Vector;
use crate::timeseries::calendar::{DateTimeList, SENTINEL};
use crate::timeseries::errors::{SeriesError, SeriesResult, ensure_index};
use crate::timeseries::options::{DateSearchType, SeriesOptions};

#[derive(Debug, Clone)]
pub struct TimeSeries {
    data: DenseVector,
    dates: DateTimeList,
    spare: usize,
    index: HashMap<NaiveDateTime, usize>,
    options: SeriesOptions,
}

fn build_index(dates: &[NaiveDateTime]) -> HashMap<NaiveDateTime, usize> {
    dates.iter().enumerate().filter(|(_, d)| **d != SENTINEL).map(|(i, d)| (*d, i)).collect()
}

impl TimeSeries {
    // ---- Construction ----

    /// Uninitialized series: a single NaN point at [`SENTINEL`].
    pub fn new() -> Self {
        Self::with_options(SeriesOptions::default())
    }

    pub fn with_options(options: SeriesOptions) -> Self {
        TimeSeries {
            data: DenseVector::from_vec_unchecked(vec![f64::NAN]),
            dates: DateTimeList::with_len(1),
            spare: 0,
            index: HashMap::new(),
            options,
        }
    }

    /// Series with zero visible points.
    pub fn empty() -> Self {
        Self::empty_with(SeriesOptions::default())
    }

    pub(crate) fn empty_with(options: SeriesOptions) -> Self {
        TimeSeries { spare: 1, ..Self::with_options(options) }
    }

    /// `size` holes on the first `size` dates of `dates`.
    ///
    /// Errors
    /// ------
    /// - `SeriesError::CalendarTooShort` when `dates.len() < size`.
    pub fn with_size(size: usize, dates: &DateTimeList) -> SeriesResult<Self> {
        if dates.len() < size {
            return Err(SeriesError::CalendarTooShort { dates: dates.len(), size });
        }
        Ok(Self::from_raw(dates.as_slice()[..size].to_vec(), vec![f64::NAN; size], SeriesOptions::default()))
    }

    /// Pair `values` with the leading dates of `dates`.
    ///
    /// Parameters
    /// ----------
    /// - `dates`: calendar; extra trailing dates are ignored.
    /// - `values`: observations, NaN marking holes.
    ///
    /// Errors
    /// ------
    /// - `SeriesError::CalendarTooShort` when there are fewer dates than
    ///   values.
    pub fn from_parts(dates: impl Into<DateTimeList>, values: Vec<f64>) -> SeriesResult<Self> {
        let mut dates = dates.into();
        if dates.len() < values.len() {
            return Err(SeriesError::CalendarTooShort { dates: dates.len(), size: values.len() });
        }
        dates.truncate(values.len());
        Ok(Self::from_raw(dates.into_vec(), values, SeriesOptions::default()))
    }

    pub fn from_array(dates: impl Into<DateTimeList>, values: ArrayView1<'_, f64>) -> SeriesResult<Self> {
        Self::from_parts(dates, values.iter().copied().collect())
    }

    /// Series over the values of any kernel [`Vector`].
    pub fn from_vector(dates: impl Into<DateTimeList>, values: &dyn Vector) -> SeriesResult<Self> {
        Self::from_parts(dates, values.to_vec())
    }

    /// Builder for derived series; lengths must already agree.
    pub(crate) fn from_raw(dates: Vec<NaiveDateTime>, values: Vec<f64>, options: SeriesOptions) -> Self {
        debug_assert_eq!(dates.len(), values.len());
        if values.is_empty() {
            return Self::empty_with(options);
        }
        let index = build_index(&dates);
        TimeSeries { data: DenseVector::from_vec_unchecked(values), dates: dates.into(), spare: 0, index, options }
    }

    /// New series sharing this series' options.
    pub(crate) fn derive(&self, dates: Vec<NaiveDateTime>, values: Vec<f64>) -> Self {
        Self::from_raw(dates, values, self.options)
    }

    // ---- Shape ----

    /// Visible points (allocated slots minus spare growth slots).
    pub fn count(&self) -> usize {
        self.data.count() - self.spare
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Growth slots available before the next reallocation.
    pub fn spare_capacity(&self) -> usize {
        self.spare
    }

    pub fn options(&self) -> SeriesOptions {
        self.options
    }

    fn is_uninitialized(&self) -> bool {
        self.count() == 1 && self.dates[0] == SENTINEL
    }

    // ---- Views ----

    pub fn values(&self) -> &[f64] {
        &self.data.data()[..self.count()]
    }

    pub fn dates(&self) -> &[NaiveDateTime] {
        &self.dates.as_slice()[..self.count()]
    }

    /// Owned copy of the visible calendar.
    pub fn calendar(&self) -> DateTimeList {
        DateTimeList::from(self.dates())
    }

    pub fn get(&self, index: usize) -> Option<f64> {
        self.values().get(index).copied()
    }

    pub fn date_at(&self, index: usize) -> Option<NaiveDateTime> {
        self.dates().get(index).copied()
    }

    /// `(date, value)` pairs in position order.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDateTime, f64)> + '_ {
        self.dates().iter().copied().zip(self.values().iter().copied())
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.values().to_vec()
    }

    pub fn to_array1(&self) -> Array1<f64> {
        Array1::from(self.to_vec())
    }

    /// Visible values with NaN and infinities dropped.
    pub(crate) fn finite_values(&self) -> Vec<f64> {
        self.values().iter().copied().filter(|v| v.is_finite()).collect()
    }

    // ---- Lookup ----

    pub fn contains_date(&self, date: NaiveDateTime) -> bool {
        self.index.contains_key(&date)
    }

    /// Position of an exactly observed date.
    pub fn get_date_index(&self, date: NaiveDateTime) -> Option<usize> {
        self.index.get(&date).copied()
    }

    /// Position of `date` or of its neighbor in the `search` direction.
    ///
    /// Returns
    /// -------
    /// - The exact position when `date` is observed.
    /// - `None` when the series is empty or `date` precedes the first date.
    /// - The last position when `date` is at or after the last date.
    /// - Otherwise the last position before `date` (`Previous`) or the first
    ///   position after it (`Next`).
    pub fn get_closest_date_index(&self, date: NaiveDateTime, search: DateSearchType) -> Option<usize> {
        if let Some(position) = self.get_date_index(date) {
            return Some(position);
        }
        let dates = self.dates();
        let (first, last) = (*dates.first()?, *dates.last()?);
        if date >= last {
            return Some(dates.len() - 1);
        }
        if date < first {
            return None;
        }
        let after = dates.partition_point(|d| *d < date);
        match search {
            DateSearchType::Previous => Some(after - 1),
            DateSearchType::Next => Some(after),
        }
    }

    /// Value at an exactly observed date, NaN when absent.
    pub fn value_at_date(&self, date: NaiveDateTime) -> f64 {
        self.get_date_index(date).map_or(f64::NAN, |i| self.values()[i])
    }

    /// Value at the closest date in the `search` direction, NaN when none.
    pub fn value_at_closest(&self, date: NaiveDateTime, search: DateSearchType) -> f64 {
        self.get_closest_date_index(date, search).map_or(f64::NAN, |i| self.values()[i])
    }

    // ---- Mutation ----

    pub fn set_value(&mut self, index: usize, value: f64) -> SeriesResult<()> {
        ensure_index("index", index, self.count())?;
        self.data[index] = value;
        Ok(())
    }

    /// Errors
    /// ------
    /// - `SeriesError::DateNotFound` when `date` is not observed.
    pub fn set_value_at_date(&mut self, date: NaiveDateTime, value: f64) -> SeriesResult<()> {
        let position = self.get_date_index(date).ok_or(SeriesError::DateNotFound { date })?;
        self.data[position] = value;
        Ok(())
    }

    /// Insert or overwrite the observation at `date`.
    ///
    /// Notes
    /// -----
    /// - An existing date is overwritten in place.
    /// - The uninitialized sentinel point is replaced rather than kept.
    /// - Otherwise the point lands in the next spare slot, reserving a new
    ///   chunk of slots first when none is left. The date is appended at the
    ///   end regardless of order.
    pub fn add_data_point(&mut self, date: NaiveDateTime, value: f64) {
        if let Some(&position) = self.index.get(&date) {
            self.data[position] = value;
            return;
        }
        if self.is_uninitialized() {
            self.data[0] = value;
            self.dates[0] = date;
            self.index.insert(date, 0);
            return;
        }
        if self.spare == 0 {
            let chunk = self.options.growth_chunk();
            let capacity = self.data.count() + chunk;
            self.data.grow(capacity, f64::NAN);
            self.dates.grow(capacity);
            self.spare = chunk;
            debug!(count = self.count(), capacity, "time series storage grown");
        }
        let slot = self.count();
        self.data[slot] = value;
        self.dates[slot] = date;
        self.spare -= 1;
        self.index.insert(date, slot);
    }

    /// Remove the observation at `date`; returns whether one was removed.
    pub fn remove_data_point(&mut self, date: NaiveDateTime) -> bool {
        let Some(position) = self.index.remove(&date) else {
            return false;
        };
        let last = self.count() - 1;
        self.data.data_mut()[position..=last].rotate_left(1);
        self.dates.as_mut_slice()[position..=last].rotate_left(1);
        self.data[last] = f64::NAN;
        self.dates[last] = SENTINEL;
        for i in position..last {
            self.index.insert(self.dates[i], i);
        }
        self.spare += 1;
        true
    }

    /// Reorder points by ascending date. Equal dates keep their relative
    /// order.
    pub fn sort(&mut self) {
        let count = self.count();
        let mut points: Vec<(NaiveDateTime, f64)> = self.iter().collect();
        points.sort_by_key(|(date, _)| *date);
        for (i, (date, value)) in points.into_iter().enumerate() {
            self.dates[i] = date;
            self.data[i] = value;
        }
        self.index = build_index(&self.dates.as_slice()[..count]);
    }
}

impl Default for TimeSeries {
    fn default() -> Self {
        Self::new()
    }
}

/// Equal calendars and equal values, with a hole matching only a hole.
impl PartialEq for TimeSeries {
    fn eq(&self, other: &Self) -> bool {
        self.dates() == other.dates()
            && self.values().iter().zip(other.values()).all(|(a, b)| a == b || (a.is_nan() && b.is_nan()))
    }
}

impl Index<usize> for TimeSeries {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.values()[index]
    }
}

impl IndexMut<usize> for TimeSeries {
    fn index_mut(&mut self, index: usize) -> &mut f64 {
        let count = self.count();
        &mut self.data.data_mut()[..count][index]
    }
}

impl Extend<(NaiveDateTime, f64)> for TimeSeries {
    fn extend<I: IntoIterator<Item = (NaiveDateTime, f64)>>(&mut self, iter: I) {
        iter.into_iter().for_each(|(date, value)| self.add_data_point(date, value));
    }
}

impl FromIterator<(NaiveDateTime, f64)> for TimeSeries {
    fn from_iter<I: IntoIterator<Item = (NaiveDateTime, f64)>>(iter: I) -> Self {
        let mut series = TimeSeries::empty();
        series.extend(iter);
        series
    }
}

impl fmt::Display for TimeSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (date, value) in self.iter() {
            writeln!(f, "{date}\t{value}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    // Scope
    // -----
    // Storage and lookup: construction, the uninitialized state, chunked
    // growth, remove/compaction, exact and closest-date lookups, sort.
    use super::*;
    use chrono::NaiveDate;

    pub(crate) fn day(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap().and_hms_opt(0, 0, 0).unwrap()
    }

    pub(crate) fn series(values: &[f64]) -> TimeSeries {
        let dates: Vec<NaiveDateTime> = (1..=values.len() as u32).map(day).collect();
        TimeSeries::from_parts(dates, values.to_vec()).unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Appending a new date to a sized series extends it by one point.
    //
    // Given
    // -----
    // - A 3-point series on Jan 1..3.
    //
    // Expect
    // ------
    // - After appending (Jan 4, 15): count 4, index of Jan 4 is 3.
    fn append_extends_series() {
        let mut ts = series(&[10.0, 11.0, 12.0]);
        ts.add_data_point(day(4), 15.0);

        assert_eq!(ts.count(), 4);
        assert_eq!(ts.get_date_index(day(4)), Some(3));
        assert_eq!(ts[3], 15.0);
        assert_eq!(ts.spare_capacity(), 259);
    }

    #[test]
    fn first_append_replaces_sentinel_point() {
        let mut ts = TimeSeries::new();
        assert_eq!(ts.count(), 1);
        assert!(ts[0].is_nan());

        ts.add_data_point(day(2), 7.0);
        assert_eq!(ts.count(), 1);
        assert_eq!(ts.dates(), &[day(2)]);
        assert_eq!(ts.value_at_date(day(2)), 7.0);

        ts.add_data_point(day(3), 8.0);
        assert_eq!(ts.count(), 2);
    }

    #[test]
    fn existing_date_is_overwritten_in_place() {
        let mut ts = series(&[1.0, 2.0]);
        ts.add_data_point(day(1), 5.0);

        assert_eq!(ts.count(), 2);
        assert_eq!(ts.values(), &[5.0, 2.0]);
    }

    #[test]
    // Purpose
    // -------
    // Growth reserves a whole chunk and later appends consume it without
    // reallocating.
    //
    // Given
    // -----
    // - An empty series with growth chunk 3.
    //
    // Expect
    // ------
    // - Spare capacity 2, 1, 0 after the first three appends past the
    //   initial slot, then a fresh chunk.
    fn growth_consumes_chunk_before_reallocating() {
        let mut ts: TimeSeries = [(day(1), 1.0)].into_iter().collect();
        ts.options = SeriesOptions::new(3).unwrap();
        assert_eq!(ts.spare_capacity(), 0);

        ts.add_data_point(day(2), 2.0);
        assert_eq!(ts.spare_capacity(), 2);
        ts.add_data_point(day(3), 3.0);
        ts.add_data_point(day(4), 4.0);
        assert_eq!(ts.spare_capacity(), 0);
        ts.add_data_point(day(5), 5.0);
        assert_eq!(ts.spare_capacity(), 2);

        assert_eq!(ts.count(), 5);
        assert_eq!(ts.values(), &[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(ts.data.count(), 7);
    }

    #[test]
    fn remove_compacts_and_frees_a_slot() {
        let mut ts = series(&[1.0, 2.0, 3.0]);

        assert!(ts.remove_data_point(day(2)));
        assert!(!ts.contains_date(day(2)));
        assert!(!ts.remove_data_point(day(2)));

        assert_eq!(ts.count(), 2);
        assert_eq!(ts.spare_capacity(), 1);
        assert_eq!(ts.values(), &[1.0, 3.0]);
        assert_eq!(ts.get_date_index(day(3)), Some(1));

        // The freed slot is reused before any growth.
        ts.add_data_point(day(9), 9.0);
        assert_eq!(ts.spare_capacity(), 0);
        assert_eq!(ts.get_date_index(day(9)), Some(2));
    }

    #[test]
    // Purpose
    // -------
    // Remove, sort, and re-append keep values, dates, and the index in step.
    //
    // Given
    // -----
    // - Out-of-order appends on Jan 5, 1, 3, 2, 4 (value = day).
    //
    // Expect
    // ------
    // - After removing Jan 3 and sorting: dates Jan 1, 2, 4, 5 with matching
    //   values, and every date resolves to its own position.
    // - Re-adding Jan 3 reuses the freed slot at the end, without growth.
    fn remove_sort_and_reappend_keep_index_consistent() {
        let mut ts: TimeSeries = [5, 1, 3, 2, 4].into_iter().map(|d| (day(d), d as f64)).collect();
        let spare = ts.spare_capacity();

        assert!(ts.remove_data_point(day(3)));
        ts.sort();

        assert_eq!(ts.dates(), &[day(1), day(2), day(4), day(5)]);
        assert_eq!(ts.values(), &[1.0, 2.0, 4.0, 5.0]);
        for (position, date) in ts.dates().iter().enumerate() {
            assert_eq!(ts.get_date_index(*date), Some(position));
        }
        assert_eq!(ts.get_date_index(day(3)), None);
        assert_eq!(ts.spare_capacity(), spare + 1);

        ts.add_data_point(day(3), 33.0);
        assert_eq!(ts.count(), 5);
        assert_eq!(ts.spare_capacity(), spare);
        assert_eq!(ts.get_date_index(day(3)), Some(4));
        assert_eq!(ts.value_at_date(day(3)), 33.0);
        for (position, date) in ts.dates().iter().enumerate() {
            assert_eq!(ts.get_date_index(*date), Some(position));
            assert_eq!(ts[position], ts.value_at_date(*date));
        }
    }

    #[test]
    // Purpose
    // -------
    // Closest-date lookup honors the documented boundary contract.
    //
    // Given
    // -----
    // - Observations on Jan 2, 4, 6.
    //
    // Expect
    // ------
    // - Before Jan 2: None. After Jan 6: last index.
    // - Jan 3: Previous → 0, Next → 1. Exact dates return themselves.
    fn closest_date_lookup_boundaries() {
        let ts = TimeSeries::from_parts(vec![day(2), day(4), day(6)], vec![1.0, 2.0, 3.0]).unwrap();

        assert_eq!(ts.get_closest_date_index(day(1), DateSearchType::Previous), None);
        assert_eq!(ts.get_closest_date_index(day(9), DateSearchType::Next), Some(2));
        assert_eq!(ts.get_closest_date_index(day(3), DateSearchType::Previous), Some(0));
        assert_eq!(ts.get_closest_date_index(day(3), DateSearchType::Next), Some(1));
        assert_eq!(ts.get_closest_date_index(day(5), DateSearchType::Next), Some(2));
        assert_eq!(ts.get_closest_date_index(day(4), DateSearchType::Next), Some(1));

        assert!(ts.value_at_closest(day(1), DateSearchType::Previous).is_nan());
        assert_eq!(ts.value_at_closest(day(5), DateSearchType::Previous), 2.0);
        assert!(TimeSeries::empty().get_closest_date_index(day(1), DateSearchType::Previous).is_none());
    }

    #[test]
    fn construction_rejects_short_calendar() {
        let dates = DateTimeList::from(vec![day(1), day(2)]);

        assert_eq!(TimeSeries::with_size(3, &dates), Err(SeriesError::CalendarTooShort { dates: 2, size: 3 }));
        assert!(TimeSeries::from_parts(vec![day(1)], vec![1.0, 2.0]).is_err());

        let sized = TimeSeries::with_size(1, &dates).unwrap();
        assert_eq!(sized.count(), 1);
        assert_eq!(sized.dates(), &[day(1)]);
        assert!(sized[0].is_nan());
    }

    #[test]
    fn date_keyed_access() {
        let mut ts = series(&[1.0, 2.0]);

        assert!(ts.value_at_date(day(7)).is_nan());
        assert_eq!(ts.set_value_at_date(day(7), 1.0), Err(SeriesError::DateNotFound { date: day(7) }));
        ts.set_value_at_date(day(2), 4.0).unwrap();
        assert_eq!(ts.get(1), Some(4.0));
        assert!(matches!(ts.set_value(2, 0.0), Err(SeriesError::IndexOutOfRange { .. })));
    }

    #[test]
    fn sort_reorders_values_with_dates() {
        let mut ts: TimeSeries = [(day(3), 3.0), (day(1), 1.0), (day(2), 2.0)].into_iter().collect();
        ts.sort();

        assert_eq!(ts.dates(), &[day(1), day(2), day(3)]);
        assert_eq!(ts.values(), &[1.0, 2.0, 3.0]);
        assert_eq!(ts.get_date_index(day(3)), Some(2));
    }

    #[test]
    fn equality_matches_holes_with_holes() {
        let a = series(&[1.0, f64::NAN]);
        let b = series(&[1.0, f64::NAN]);
        let c = series(&[1.0, 0.0]);

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn vector_and_array_interop() {
        let values = DenseVector::from_slice(&[1.0, 2.0]).unwrap();
        let ts = TimeSeries::from_vector(vec![day(1), day(2)], &values).unwrap();

        assert_eq!(ts.to_array1(), Array1::from(vec![1.0, 2.0]));
        assert_eq!(TimeSeries::from_array(vec![day(1), day(2)], ts.to_array1().view()).unwrap(), ts);
    }
}
