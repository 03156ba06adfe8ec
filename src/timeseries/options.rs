//! Series options — configuration knobs and policy selectors for the
//! time-series engine.
//!
//! Purpose
//! -------
//! Keep every tunable and every "which behavior" switch in one place so call
//! sites pass explicit, validated values instead of ad-hoc integers.
//!
//! Key behaviors
//! -------------
//! - [`SeriesOptions`] carries the append growth chunk (default
//!   [`DEFAULT_GROWTH_CHUNK`] slots) and is validated on construction.
//! - [`DateSearchType`], [`SyncMethod`], [`FillMethod`], and [`IntervalUnit`]
//!   select lookup direction, synchronization policy, range filling, and
//!   resampling granularity respectively.
//!
//! Conventions
//! -----------
//! - Enums are `Copy` and carry a `Default` matching the behavior callers get
//!   when they do not ask for anything specific.
//! - [`IntervalUnit`] owns the calendar arithmetic for its unit (truncation
//!   and stepping) so resampling code stays unit-agnostic.

use chrono::{NaiveDateTime, NaiveTime, TimeDelta, Timelike};

use crate::timeseries::errors::{SeriesResult, ensure_positive};

/// Slots added to a series' backing storage when an append finds no spare
/// capacity.
pub const DEFAULT_GROWTH_CHUNK: usize = 260;

/// SeriesOptions: storage policy for a [`crate::timeseries::TimeSeries`].
///
/// Fields
/// ------
/// - `growth_chunk`: number of slots reserved at once when an append runs out
///   of spare capacity. Must be ≥ 1.
///
/// Notes
/// -----
/// - Options are inherited by every series derived from a source series, so
///   a tuned growth policy survives transforms and synchronization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeriesOptions {
    growth_chunk: usize,
}

impl SeriesOptions {
    /// Errors
    /// ------
    /// - `SeriesError::NotPositive { parameter: "growth_chunk" }` when
    ///   `growth_chunk == 0`.
    pub fn new(growth_chunk: usize) -> SeriesResult<Self> {
        ensure_positive("growth_chunk", growth_chunk)?;
        Ok(SeriesOptions { growth_chunk })
    }

    pub fn growth_chunk(&self) -> usize {
        self.growth_chunk
    }
}

impl Default for SeriesOptions {
    fn default() -> Self {
        SeriesOptions { growth_chunk: DEFAULT_GROWTH_CHUNK }
    }
}

/// Direction for closest-date lookups when the date is not observed exactly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum DateSearchType {
    /// Last observation strictly before the date.
    #[default]
    Previous,
    /// First observation strictly after the date.
    Next,
}

/// How a secondary series is re-expressed on a primary calendar.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SyncMethod {
    /// Secondary value on exact date matches only, hole elsewhere.
    Exact,
    /// As-of join: last secondary observation at or before each date.
    #[default]
    Latest,
    /// Reindex onto the dates present in every calendar involved.
    Union,
}

/// Filling policy for date-window ranges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum FillMethod {
    /// Observed points inside the window only.
    #[default]
    None,
    /// One point per calendar day, carrying the last observation forward.
    Days,
}

/// Granularity for interval resampling.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum IntervalUnit {
    Second,
    Minute,
    Hour,
    #[default]
    Day,
}

impl IntervalUnit {
    fn seconds(self) -> i64 {
        match self {
            IntervalUnit::Second => 1,
            IntervalUnit::Minute => 60,
            IntervalUnit::Hour => 3_600,
            IntervalUnit::Day => 86_400,
        }
    }

    /// Drop every field finer than the unit (sub-second precision included).
    pub fn truncate(self, date: NaiveDateTime) -> NaiveDateTime {
        let truncated = match self {
            IntervalUnit::Second => date.with_nanosecond(0),
            IntervalUnit::Minute => date.with_nanosecond(0).and_then(|d| d.with_second(0)),
            IntervalUnit::Hour => {
                date.with_nanosecond(0).and_then(|d| d.with_second(0)).and_then(|d| d.with_minute(0))
            }
            IntervalUnit::Day => Some(date.date().and_time(NaiveTime::MIN)),
        };
        truncated.unwrap_or(date)
    }

    /// Length of `count` units.
    pub fn step(self, count: u32) -> TimeDelta {
        TimeDelta::seconds(i64::from(count) * self.seconds())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeseries::errors::SeriesError;
    use chrono::NaiveDate;

    #[test]
    fn default_growth_chunk_is_260() {
        assert_eq!(SeriesOptions::default().growth_chunk(), 260);
        assert_eq!(SeriesOptions::new(5).unwrap().growth_chunk(), 5);
        assert_eq!(SeriesOptions::new(0), Err(SeriesError::NotPositive { parameter: "growth_chunk" }));
    }

    #[test]
    // Purpose
    // -------
    // Truncation removes exactly the fields finer than the unit.
    //
    // Given
    // -----
    // - 2024-03-05 14:37:52.250.
    //
    // Expect
    // ------
    // - Second: 14:37:52, Minute: 14:37:00, Hour: 14:00:00, Day: 00:00:00.
    fn truncate_drops_finer_fields() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap().and_hms_milli_opt(14, 37, 52, 250).unwrap();
        let day = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();

        assert_eq!(IntervalUnit::Second.truncate(date), day.and_hms_opt(14, 37, 52).unwrap());
        assert_eq!(IntervalUnit::Minute.truncate(date), day.and_hms_opt(14, 37, 0).unwrap());
        assert_eq!(IntervalUnit::Hour.truncate(date), day.and_hms_opt(14, 0, 0).unwrap());
        assert_eq!(IntervalUnit::Day.truncate(date), day.and_hms_opt(0, 0, 0).unwrap());
    }

    #[test]
    fn step_scales_by_unit() {
        assert_eq!(IntervalUnit::Minute.step(15), TimeDelta::minutes(15));
        assert_eq!(IntervalUnit::Day.step(2), TimeDelta::days(2));
    }

    #[test]
    fn policy_defaults() {
        assert_eq!(SyncMethod::default(), SyncMethod::Latest);
        assert_eq!(DateSearchType::default(), DateSearchType::Previous);
        assert_eq!(FillMethod::default(), FillMethod::None);
    }
}
