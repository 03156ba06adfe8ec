//! calendar — the ordered timestamp list that runs parallel to a series'
//! values.
//!
//! [`DateTimeList`] is a thin owned wrapper over `Vec<NaiveDateTime>`.
//! [`SENTINEL`] marks slots that hold no real observation: the single point
//! of a freshly created series and the unused growth slots behind the
//! visible range.

use std::ops::{Index, IndexMut};

use chrono::NaiveDateTime;

/// Placeholder timestamp for slots without a real observation.
pub const SENTINEL: NaiveDateTime = NaiveDateTime::MIN;

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct DateTimeList {
    dates: Vec<NaiveDateTime>,
}

impl DateTimeList {
    pub fn new() -> Self {
        Self::default()
    }

    /// `len` sentinel slots.
    pub fn with_len(len: usize) -> Self {
        DateTimeList { dates: vec![SENTINEL; len] }
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<NaiveDateTime> {
        self.dates.get(index).copied()
    }

    pub fn first(&self) -> Option<NaiveDateTime> {
        self.dates.first().copied()
    }

    pub fn last(&self) -> Option<NaiveDateTime> {
        self.dates.last().copied()
    }

    pub fn push(&mut self, date: NaiveDateTime) {
        self.dates.push(date);
    }

    pub fn contains(&self, date: &NaiveDateTime) -> bool {
        self.dates.contains(date)
    }

    pub fn as_slice(&self) -> &[NaiveDateTime] {
        &self.dates
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NaiveDateTime> {
        self.dates.iter()
    }

    pub fn into_vec(self) -> Vec<NaiveDateTime> {
        self.dates
    }

    /// Non-decreasing order check.
    pub fn is_sorted(&self) -> bool {
        self.dates.windows(2).all(|w| w[0] <= w[1])
    }

    pub fn sort(&mut self) {
        self.dates.sort();
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [NaiveDateTime] {
        &mut self.dates
    }

    /// Grow to `len` slots with sentinel fill. Never shrinks.
    pub(crate) fn grow(&mut self, len: usize) {
        if len > self.dates.len() {
            self.dates.resize(len, SENTINEL);
        }
    }

    pub(crate) fn truncate(&mut self, len: usize) {
        self.dates.truncate(len);
    }
}

impl From<Vec<NaiveDateTime>> for DateTimeList {
    fn from(dates: Vec<NaiveDateTime>) -> Self {
        DateTimeList { dates }
    }
}

impl From<&[NaiveDateTime]> for DateTimeList {
    fn from(dates: &[NaiveDateTime]) -> Self {
        DateTimeList { dates: dates.to_vec() }
    }
}

impl FromIterator<NaiveDateTime> for DateTimeList {
    fn from_iter<I: IntoIterator<Item = NaiveDateTime>>(iter: I) -> Self {
        DateTimeList { dates: iter.into_iter().collect() }
    }
}

impl<'a> IntoIterator for &'a DateTimeList {
    type Item = &'a NaiveDateTime;
    type IntoIter = std::slice::Iter<'a, NaiveDateTime>;

    fn into_iter(self) -> Self::IntoIter {
        self.dates.iter()
    }
}

impl Index<usize> for DateTimeList {
    type Output = NaiveDateTime;

    fn index(&self, index: usize) -> &NaiveDateTime {
        &self.dates[index]
    }
}

impl IndexMut<usize> for DateTimeList {
    fn index_mut(&mut self, index: usize) -> &mut NaiveDateTime {
        &mut self.dates[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap().and_hms_opt(0, 0, 0).unwrap()
    }

    #[test]
    fn grow_fills_with_sentinel_and_never_shrinks() {
        let mut list = DateTimeList::from(vec![day(1), day(2)]);
        list.grow(4);
        assert_eq!(list.len(), 4);
        assert_eq!(list[3], SENTINEL);

        list.grow(1);
        assert_eq!(list.len(), 4);
    }

    #[test]
    fn sort_and_order_check() {
        let mut list: DateTimeList = [day(3), day(1), day(2)].into_iter().collect();
        assert!(!list.is_sorted());

        list.sort();
        assert!(list.is_sorted());
        assert_eq!(list.first(), Some(day(1)));
        assert_eq!(list.last(), Some(day(3)));
    }
}
