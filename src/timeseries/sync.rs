//! sync — re-express series on another calendar.
//!
//! Purpose
//! -------
//! Align a secondary series with a primary calendar (or a group of series
//! with each other) under one of three [`SyncMethod`] policies.
//!
//! Key behaviors
//! -------------
//! - `Exact`: the secondary value where the secondary observes the primary
//!   date exactly, a hole elsewhere.
//! - `Latest`: as-of join; the last secondary observation at or before each
//!   primary date, a hole before the secondary's first observation.
//! - `Union`: reindex onto the dates observed in *every* calendar involved,
//!   in primary order. Despite the name this is an intersection; the name is
//!   kept for compatibility with existing callers.
//!
//! Invariants & assumptions
//! ------------------------
//! - As-of lookups use binary search, so the secondary's dates must be
//!   ascending.
//! - Sentinel slots are never part of any calendar here.

use std::collections::{BTreeSet, HashSet};

use chrono::NaiveDateTime;
use tracing::debug;

use crate::timeseries::options::{DateSearchType, SyncMethod};
use crate::timeseries::series::TimeSeries;

/// Primary dates also observed by every other series, first occurrence
/// order.
fn common_dates(primary: &TimeSeries, others: &[&TimeSeries]) -> Vec<NaiveDateTime> {
    let mut seen = HashSet::new();
    primary
        .dates()
        .iter()
        .copied()
        .filter(|d| primary.contains_date(*d) && others.iter().all(|o| o.contains_date(*d)))
        .filter(|d| seen.insert(*d))
        .collect()
}

impl TimeSeries {
    /// Re-express `secondary` on this series' calendar.
    ///
    /// Parameters
    /// ----------
    /// - `secondary`: series providing the values.
    /// - `method`: alignment policy, see the module docs.
    ///
    /// Returns
    /// -------
    /// - `Exact` / `Latest`: a series on this calendar holding secondary
    ///   values.
    /// - `Union`: a series on the shared dates holding secondary values.
    pub fn synchronize(&self, secondary: &TimeSeries, method: SyncMethod) -> TimeSeries {
        let result = match method {
            SyncMethod::Exact => {
                let values = self.dates().iter().map(|&d| secondary.value_at_date(d)).collect();
                self.derive(self.dates().to_vec(), values)
            }
            SyncMethod::Latest => {
                let values =
                    self.dates().iter().map(|&d| secondary.value_at_closest(d, DateSearchType::Previous)).collect();
                self.derive(self.dates().to_vec(), values)
            }
            SyncMethod::Union => {
                let dates = common_dates(self, &[secondary]);
                let values = dates.iter().map(|&d| secondary.value_at_date(d)).collect();
                self.derive(dates, values)
            }
        };
        debug!(
            ?method,
            primary = self.count(),
            secondary = secondary.count(),
            result = result.count(),
            "synchronized series"
        );
        result
    }

    /// Align this series with a group of others; values always come from
    /// `self`.
    ///
    /// Returns
    /// -------
    /// - `Union`: this series restricted to the dates every series observes.
    /// - `Latest`: every date observed by any series, ascending, from the
    ///   first date all series share; values are this series' as-of values.
    /// - `Exact`: the same calendar as `Latest` with exact-match values.
    /// - An empty series when the group shares no date.
    pub fn synchronize_many(&self, others: &[&TimeSeries], method: SyncMethod) -> TimeSeries {
        let common = common_dates(self, others);
        let result = match method {
            SyncMethod::Union => {
                let values = common.iter().map(|&d| self.value_at_date(d)).collect();
                self.derive(common, values)
            }
            SyncMethod::Latest | SyncMethod::Exact => match common.iter().min().copied() {
                None => TimeSeries::empty_with(self.options()),
                Some(first) => {
                    let calendar: Vec<NaiveDateTime> = std::iter::once(self)
                        .chain(others.iter().copied())
                        .flat_map(|s| s.dates().iter().copied().filter(|d| s.contains_date(*d)))
                        .filter(|d| *d >= first)
                        .collect::<BTreeSet<_>>()
                        .into_iter()
                        .collect();
                    let values = calendar
                        .iter()
                        .map(|&d| match method {
                            SyncMethod::Exact => self.value_at_date(d),
                            _ => self.value_at_closest(d, DateSearchType::Previous),
                        })
                        .collect();
                    self.derive(calendar, values)
                }
            },
        };
        debug!(?method, series = others.len() + 1, result = result.count(), "synchronized series group");
        result
    }
}
