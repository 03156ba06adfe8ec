//! timeseries — calendar-aware series with hole semantics.
//!
//! Purpose
//! -------
//! Store financial observations as values on a calendar and provide the
//! operations reporting and analytics code needs: O(1) date lookup,
//! amortized append, hole-aware algebra, alignment of sparse series,
//! multi-calendar synchronization, returns, resampling, and summary
//! statistics.
//!
//! Key behaviors
//! -------------
//! - [`TimeSeries`] keeps a [`crate::linalg::DenseVector`] of values, a
//!   parallel [`DateTimeList`], and a date index maintained by every
//!   structural mutation (`series`).
//! - A hole is NaN at a timestamp. Every elementwise operator propagates
//!   holes through one shared template (`ops`).
//! - [`remove_holes`] / [`add_holes`] compact and restore holes across a group
//!   of series (`alignment`).
//! - [`TimeSeries::synchronize`] re-expresses a series on another calendar
//!   under [`SyncMethod::Exact`], [`SyncMethod::Latest`], or
//!   [`SyncMethod::Union`] (`sync`).
//! - Returns, logs, and replacement live in `transforms`; windows and
//!   resampling in `resample`; descriptive statistics in `summary`.
//! - [`TimeSeriesCollection`] groups named equal-length series;
//!   [`SharedTimeSeries`] guards one series behind a lock for concurrent
//!   appends.
//!
//! Invariants & assumptions
//! ------------------------
//! - Visible count equals the number of visible dates; spare growth slots
//!   are invisible to every operation.
//! - Derived series are always newly allocated and inherit the source's
//!   [`SeriesOptions`].
//!
//! Conventions
//! -----------
//! - Fallible operations return [`SeriesResult`]; statistics accessors
//!   return [`crate::statistics::StatsResult`].
//! - Structural events (storage growth, synchronization) are logged at
//!   `debug` level through `tracing`.
//!
//! Testing notes
//! -------------
//! - Each file carries unit tests; `tests/integration_kernel_and_series.rs`
//!   runs the end-to-end scenarios.

pub mod alignment;
pub mod calendar;
pub mod collection;
pub mod errors;
pub mod ops;
pub mod options;
pub mod resample;
pub mod series;
pub mod shared;
pub mod summary;
pub mod sync;
pub mod transforms;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::alignment::{Holes, add_holes, remove_holes};
pub use self::calendar::{DateTimeList, SENTINEL};
pub use self::collection::TimeSeriesCollection;
pub use self::errors::{SeriesError, SeriesResult};
pub use self::ops::Operand;
pub use self::options::{
    DEFAULT_GROWTH_CHUNK, DateSearchType, FillMethod, IntervalUnit, SeriesOptions, SyncMethod,
};
pub use self::series::TimeSeries;
pub use self::shared::SharedTimeSeries;

// ---- Optional convenience prelude for downstream crates -------------------

pub mod prelude {
    pub use super::alignment::{Holes, add_holes, remove_holes};
    pub use super::calendar::DateTimeList;
    pub use super::collection::TimeSeriesCollection;
    pub use super::errors::{SeriesError, SeriesResult};
    pub use super::options::{DateSearchType, FillMethod, IntervalUnit, SeriesOptions, SyncMethod};
    pub use super::series::TimeSeries;
    pub use super::shared::SharedTimeSeries;
}
