//! Hole-aware elementwise algebra on [`TimeSeries`].
//!
//! Purpose
//! -------
//! Every unary and binary transform (arithmetic, comparisons, higher/lower,
//! abs, logical and/or) runs through one template so hole handling is
//! identical everywhere.
//!
//! Key behaviors
//! -------------
//! - A hole (NaN) in any input position yields a hole in the output and the
//!   scalar operator is not evaluated there.
//! - Two series of different length are scanned over the shorter span; the
//!   remaining positions of the longer operand become holes, and the result
//!   takes the longer operand's calendar.
//! - A scalar operand applies at every position; only the series side can
//!   contribute a hole.
//! - If either series operand is empty the result is empty.
//! - Comparisons and logical operators produce `1.0` / `0.0`; logical
//!   operators treat any non-zero value as true.
//! - Crossing detectors align their inputs with
//!   [`crate::timeseries::alignment::remove_holes`] so holes never create
//!   false crossings, then restore the original calendar.
//!
//! Conventions
//! -----------
//! - `+ - * /` and unary `-` are `std::ops` impls on `&TimeSeries` (and
//!   `f64` on either side). Comparisons have named methods because Rust's
//!   comparison traits return `bool`.
//! - Methods taking `impl Into<Operand>` accept either `&TimeSeries` or
//!   `f64`.

use std::ops::{Add, Div, Mul, Neg, Sub};

use crate::timeseries::alignment::{remove_holes, restore};
use crate::timeseries::series::TimeSeries;

/// Right-hand side of a series operation.
#[derive(Debug, Clone, Copy)]
pub enum Operand<'a> {
    Series(&'a TimeSeries),
    Value(f64),
}

impl<'a> From<&'a TimeSeries> for Operand<'a> {
    fn from(series: &'a TimeSeries) -> Self {
        Operand::Series(series)
    }
}

impl From<f64> for Operand<'_> {
    fn from(value: f64) -> Self {
        Operand::Value(value)
    }
}

// ---- Template ----

fn is_hole(value: f64) -> bool {
    value.is_nan()
}

fn flag(condition: bool) -> f64 {
    if condition { 1.0 } else { 0.0 }
}

pub(crate) fn unary(series: &TimeSeries, op: impl Fn(f64) -> f64) -> TimeSeries {
    let values = series.values().iter().map(|&x| if is_hole(x) { x } else { op(x) }).collect();
    series.derive(series.dates().to_vec(), values)
}

pub(crate) fn binary(lhs: &TimeSeries, rhs: &TimeSeries, op: impl Fn(f64, f64) -> f64) -> TimeSeries {
    let scanned = lhs.count().min(rhs.count());
    if scanned == 0 {
        return TimeSeries::empty_with(lhs.options());
    }
    let longer = if rhs.count() > lhs.count() { rhs } else { lhs };

    let mut values = Vec::with_capacity(longer.count());
    values.extend(
        lhs.values()[..scanned]
            .iter()
            .zip(&rhs.values()[..scanned])
            .map(|(&a, &b)| if is_hole(a) || is_hole(b) { f64::NAN } else { op(a, b) }),
    );
    values.resize(longer.count(), f64::NAN);
    lhs.derive(longer.dates().to_vec(), values)
}

fn apply<'a>(lhs: &TimeSeries, rhs: impl Into<Operand<'a>>, op: impl Fn(f64, f64) -> f64) -> TimeSeries {
    match rhs.into() {
        Operand::Series(series) => binary(lhs, series, op),
        Operand::Value(value) => unary(lhs, |x| op(x, value)),
    }
}

impl TimeSeries {
    // ---- Unary ----

    pub fn abs(&self) -> TimeSeries {
        unary(self, f64::abs)
    }

    pub fn negate(&self) -> TimeSeries {
        unary(self, |x| -x)
    }

    // ---- Higher / lower ----

    /// Pointwise maximum.
    pub fn higher<'a>(&self, other: impl Into<Operand<'a>>) -> TimeSeries {
        apply(self, other, f64::max)
    }

    /// Pointwise minimum.
    pub fn lower<'a>(&self, other: impl Into<Operand<'a>>) -> TimeSeries {
        apply(self, other, f64::min)
    }

    /// Cap every value at `value`.
    pub fn set_ceiling(&self, value: f64) -> TimeSeries {
        self.lower(value)
    }

    /// Raise every value to at least `value`.
    pub fn set_floor(&self, value: f64) -> TimeSeries {
        self.higher(value)
    }

    // ---- Logical ----

    pub fn and<'a>(&self, other: impl Into<Operand<'a>>) -> TimeSeries {
        apply(self, other, |a, b| flag(a != 0.0 && b != 0.0))
    }

    pub fn or<'a>(&self, other: impl Into<Operand<'a>>) -> TimeSeries {
        apply(self, other, |a, b| flag(a != 0.0 || b != 0.0))
    }

    // ---- Comparisons ----

    pub fn is_equal<'a>(&self, other: impl Into<Operand<'a>>) -> TimeSeries {
        apply(self, other, |a, b| flag(a == b))
    }

    pub fn is_not_equal<'a>(&self, other: impl Into<Operand<'a>>) -> TimeSeries {
        apply(self, other, |a, b| flag(a != b))
    }

    pub fn is_greater<'a>(&self, other: impl Into<Operand<'a>>) -> TimeSeries {
        apply(self, other, |a, b| flag(a > b))
    }

    pub fn is_greater_equal<'a>(&self, other: impl Into<Operand<'a>>) -> TimeSeries {
        apply(self, other, |a, b| flag(a >= b))
    }

    pub fn is_less<'a>(&self, other: impl Into<Operand<'a>>) -> TimeSeries {
        apply(self, other, |a, b| flag(a < b))
    }

    pub fn is_less_equal<'a>(&self, other: impl Into<Operand<'a>>) -> TimeSeries {
        apply(self, other, |a, b| flag(a <= b))
    }

    // ---- Direction and crossings ----

    /// 1 where the value rose from the previous observation. The first
    /// observation has no predecessor and is a hole.
    pub fn is_rising(&self) -> TimeSeries {
        self.shift_right(1).is_less(self)
    }

    pub fn is_falling(&self) -> TimeSeries {
        self.shift_right(1).is_greater(self)
    }

    /// 1 where the series crosses `other` in either direction between the
    /// previous observation and this one.
    pub fn is_crossing<'a>(&self, other: impl Into<Operand<'a>>) -> TimeSeries {
        self.crossing(other.into(), |p, q, c, d| (p >= q && c < d) || (p <= q && c > d))
    }

    /// 1 where the series moves from at or below `other` to above it.
    pub fn is_crossing_above<'a>(&self, other: impl Into<Operand<'a>>) -> TimeSeries {
        self.crossing(other.into(), |p, q, c, d| p <= q && c > d)
    }

    /// 1 where the series moves from at or above `other` to below it.
    pub fn is_crossing_below<'a>(&self, other: impl Into<Operand<'a>>) -> TimeSeries {
        self.crossing(other.into(), |p, q, c, d| p >= q && c < d)
    }

    /// `rule(previous_self, previous_other, self, other)` over hole-free
    /// aligned inputs.
    fn crossing(&self, other: Operand<'_>, rule: impl Fn(f64, f64, f64, f64) -> bool) -> TimeSeries {
        let previous = self.shift_right(1);
        match other {
            Operand::Series(other) => {
                let other_previous = other.shift_right(1);
                let (aligned, holes) = remove_holes(&[&previous, &other_previous, self, other]);
                let [p, q, c, d] = [0, 1, 2, 3].map(|k| aligned[k].values());
                let values = (0..p.len()).map(|i| flag(rule(p[i], q[i], c[i], d[i]))).collect();
                restore(&aligned[0].derive(aligned[0].dates().to_vec(), values), &holes)
            }
            Operand::Value(level) => {
                let (aligned, holes) = remove_holes(&[&previous, self]);
                let [p, c] = [0, 1].map(|k| aligned[k].values());
                let values = (0..p.len()).map(|i| flag(rule(p[i], level, c[i], level))).collect();
                restore(&aligned[0].derive(aligned[0].dates().to_vec(), values), &holes)
            }
        }
    }
}

// ---- std::ops ----

macro_rules! series_arithmetic {
    ($trait:ident, $method:ident, $op:tt) => {
        impl $trait<&TimeSeries> for &TimeSeries {
            type Output = TimeSeries;

            fn $method(self, rhs: &TimeSeries) -> TimeSeries {
                binary(self, rhs, |a, b| a $op b)
            }
        }

        impl $trait<f64> for &TimeSeries {
            type Output = TimeSeries;

            fn $method(self, rhs: f64) -> TimeSeries {
                unary(self, |a| a $op rhs)
            }
        }

        impl $trait<&TimeSeries> for f64 {
            type Output = TimeSeries;

            fn $method(self, rhs: &TimeSeries) -> TimeSeries {
                unary(rhs, |b| self $op b)
            }
        }
    };
}

series_arithmetic!(Add, add, +);
series_arithmetic!(Sub, sub, -);
series_arithmetic!(Mul, mul, *);
series_arithmetic!(Div, div, /);

impl Neg for &TimeSeries {
    type Output = TimeSeries;

    fn neg(self) -> TimeSeries {
        self.negate()
    }
}
