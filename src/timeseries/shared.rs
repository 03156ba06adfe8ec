//! SharedTimeSeries — a cloneable handle for appending to one series from
//! several threads.
//!
//! The handle wraps the series in `Arc<parking_lot::RwLock<_>>`. Appends and
//! removals take the write lock for the whole read-modify-write sequence
//! (value buffer, calendar, and date index together), so a concurrent reader
//! never sees an index that disagrees with the buffers. Readers take the read
//! lock and may run in parallel.

use std::sync::Arc;

use chrono::NaiveDateTime;
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::timeseries::series::TimeSeries;

#[derive(Debug, Clone, Default)]
pub struct SharedTimeSeries {
    inner: Arc<RwLock<TimeSeries>>,
}

impl SharedTimeSeries {
    pub fn new(series: TimeSeries) -> Self {
        SharedTimeSeries { inner: Arc::new(RwLock::new(series)) }
    }

    pub fn add_data_point(&self, date: NaiveDateTime, value: f64) {
        self.inner.write().add_data_point(date, value);
    }

    pub fn remove_data_point(&self, date: NaiveDateTime) -> bool {
        self.inner.write().remove_data_point(date)
    }

    pub fn count(&self) -> usize {
        self.inner.read().count()
    }

    pub fn value_at_date(&self, date: NaiveDateTime) -> f64 {
        self.inner.read().value_at_date(date)
    }

    pub fn read(&self) -> RwLockReadGuard<'_, TimeSeries> {
        self.inner.read()
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, TimeSeries> {
        self.inner.write()
    }

    /// Owned copy of the current state.
    pub fn snapshot(&self) -> TimeSeries {
        self.inner.read().clone()
    }
}

impl From<TimeSeries> for SharedTimeSeries {
    fn from(series: TimeSeries) -> Self {
        Self::new(series)
    }
}
