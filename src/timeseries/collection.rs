//! TimeSeriesCollection — an ordered set of named, equal-length series.
//!
//! Purpose
//! -------
//! Group series that share a calendar (a panel of instruments, factor
//! returns) and address them by position or by name, or export them as one
//! `ndarray` matrix.
//!
//! Key behaviors
//! -------------
//! - Insertion order is preserved; names are unique.
//! - Every member has the length of the first member.
//! - The collection calendar is taken from the first member added (or from
//!   [`TimeSeriesCollection::with_dates`]).
//!
//! Downstream usage
//! ----------------
//! - [`TimeSeriesCollection::to_array2`] yields a `time × series` matrix for
//!   numerical code that works on plain arrays.

use std::collections::HashMap;

use ndarray::Array2;

use crate::timeseries::calendar::DateTimeList;
use crate::timeseries::errors::{SeriesError, SeriesResult, ensure_index};
use crate::timeseries::series::TimeSeries;

#[derive(Debug, Clone, Default)]
pub struct TimeSeriesCollection {
    series: Vec<TimeSeries>,
    names: Vec<String>,
    positions: HashMap<String, usize>,
    dates: Option<DateTimeList>,
}

impl TimeSeriesCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// `count` hole-filled series on `dates`, named `"0"`, `"1"`, ….
    pub fn with_dates(dates: &DateTimeList, count: usize) -> SeriesResult<Self> {
        let mut collection = Self::new();
        for i in 0..count {
            collection.add(i.to_string(), TimeSeries::with_size(dates.len(), dates)?)?;
        }
        collection.dates = Some(dates.clone());
        Ok(collection)
    }

    /// Append a named series.
    ///
    /// Errors
    /// ------
    /// - `SeriesError::DuplicateName` when `name` is taken.
    /// - `SeriesError::LengthMismatch` when the series length differs from
    ///   the first member's.
    pub fn add(&mut self, name: impl Into<String>, series: TimeSeries) -> SeriesResult<()> {
        let name = name.into();
        if self.positions.contains_key(&name) {
            return Err(SeriesError::DuplicateName { name });
        }
        if let Some(first) = self.series.first() {
            if series.count() != first.count() {
                return Err(SeriesError::LengthMismatch { expected: first.count(), found: series.count() });
            }
        }
        if self.dates.is_none() {
            self.dates = Some(series.calendar());
        }
        self.positions.insert(name.clone(), self.series.len());
        self.names.push(name);
        self.series.push(series);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn dates(&self) -> Option<&DateTimeList> {
        self.dates.as_ref()
    }

    pub fn get(&self, index: usize) -> Option<&TimeSeries> {
        self.series.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut TimeSeries> {
        self.series.get_mut(index)
    }

    pub fn get_by_name(&self, name: &str) -> Option<&TimeSeries> {
        self.positions.get(name).map(|&i| &self.series[i])
    }

    pub fn get_by_name_mut(&mut self, name: &str) -> Option<&mut TimeSeries> {
        let position = *self.positions.get(name)?;
        self.series.get_mut(position)
    }

    /// Value of series `index` at time position `t`.
    pub fn value(&self, index: usize, t: usize) -> Option<f64> {
        self.series.get(index)?.get(t)
    }

    pub fn set_value(&mut self, index: usize, t: usize, value: f64) -> SeriesResult<()> {
        ensure_index("index", index, self.series.len())?;
        self.series[index].set_value(t, value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TimeSeries)> {
        self.names.iter().map(String::as_str).zip(self.series.iter())
    }

    /// Rows are time positions, columns are series in insertion order.
    pub fn to_array2(&self) -> Array2<f64> {
        let rows = self.series.first().map_or(0, TimeSeries::count);
        Array2::from_shape_fn((rows, self.series.len()), |(t, s)| self.series[s][t])
    }
}
