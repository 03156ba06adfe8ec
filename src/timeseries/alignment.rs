//! alignment — compact holes out of a group of series and put them back.
//!
//! [`remove_holes`] scans its inputs in lock-step up to the longest length
//! and drops every position where any input is a hole or has run out. The
//! dropped positions and the longest input's calendar are kept in
//! [`Holes`], so [`add_holes`] can restore the original length with NaN in
//! exactly those positions. Multi-series relational operators and shifts use
//! this pair to behave as if holes did not exist.

use chrono::NaiveDateTime;

use crate::timeseries::errors::{SeriesError, SeriesResult};
use crate::timeseries::series::TimeSeries;

/// Positions dropped by [`remove_holes`] plus the calendar they came from.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Holes {
    positions: Vec<usize>,
    calendar: Vec<NaiveDateTime>,
}

impl Holes {
    /// Dropped positions, ascending.
    pub fn positions(&self) -> &[usize] {
        &self.positions
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Length of the series before holes were removed.
    pub fn original_len(&self) -> usize {
        self.calendar.len()
    }
}

/// Compact every input to the positions where all inputs hold a value.
///
/// Returns
/// -------
/// - One compacted series per input, in input order, each on the kept dates
///   of the longest input.
/// - The [`Holes`] record needed to restore them.
pub fn remove_holes(series: &[&TimeSeries]) -> (Vec<TimeSeries>, Holes) {
    let Some(longest) = series.iter().copied().reduce(|best, s| if s.count() > best.count() { s } else { best })
    else {
        return (Vec::new(), Holes::default());
    };
    let len = longest.count();

    let dropped: Vec<bool> =
        (0..len).map(|j| series.iter().any(|s| j >= s.count() || s.values()[j].is_nan())).collect();
    let positions: Vec<usize> = (0..len).filter(|&j| dropped[j]).collect();

    let kept_dates: Vec<NaiveDateTime> = (0..len).filter(|&j| !dropped[j]).map(|j| longest.dates()[j]).collect();
    let compacted = series
        .iter()
        .map(|s| {
            let values = (0..len).filter(|&j| !dropped[j]).map(|j| s.values()[j]).collect();
            s.derive(kept_dates.clone(), values)
        })
        .collect();

    (compacted, Holes { positions, calendar: longest.dates().to_vec() })
}

/// Reinsert holes removed by [`remove_holes`].
///
/// Errors
/// ------
/// - `SeriesError::LengthMismatch` when `series` does not have exactly the
///   number of points that survived compaction.
pub fn add_holes(series: &TimeSeries, holes: &Holes) -> SeriesResult<TimeSeries> {
    let expected = holes.calendar.len() - holes.positions.len();
    if series.count() != expected {
        return Err(SeriesError::LengthMismatch { expected, found: series.count() });
    }
    Ok(restore(series, holes))
}

pub(crate) fn restore(series: &TimeSeries, holes: &Holes) -> TimeSeries {
    let mut pending = holes.positions.iter().peekable();
    let mut kept = series.values().iter();
    let values = (0..holes.calendar.len())
        .map(|j| {
            if pending.next_if_eq(&&j).is_some() {
                f64::NAN
            } else {
                kept.next().copied().unwrap_or(f64::NAN)
            }
        })
        .collect();
    series.derive(holes.calendar.clone(), values)
}

impl TimeSeries {
    /// Move values `amount` observations toward the start, skipping holes.
    ///
    /// Notes
    /// -----
    /// - Holes are compacted out before shifting and restored afterwards, so
    ///   a hole never moves and never absorbs a value.
    /// - Positions shifted in from beyond either end become holes.
    /// - A negative `amount` shifts right.
    pub fn shift_left(&self, amount: isize) -> TimeSeries {
        let (compacted, holes) = remove_holes(&[self]);
        let Some(base) = compacted.first() else {
            return self.clone();
        };
        let values = base.values();
        let n = values.len() as isize;
        let shifted = (0..n)
            .map(|k| {
                let source = k + amount;
                if (0..n).contains(&source) { values[source as usize] } else { f64::NAN }
            })
            .collect();
        restore(&base.derive(base.dates().to_vec(), shifted), &holes)
    }

    pub fn shift_right(&self, amount: isize) -> TimeSeries {
        self.shift_left(-amount)
    }
}
