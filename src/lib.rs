//! calendar_numerics — dense linear algebra and calendar-aware time series.
//!
//! Purpose
//! -------
//! Serve as the crate root for a numerical kernel used to compute financial
//! returns, alignment, and statistics: a polymorphic vector/matrix layer with
//! a dense specialization, a time-series engine built on top of it, and a
//! small statistics layer shared by both.
//!
//! Key behaviors
//! -------------
//! - [`linalg`]: `Vector` / `Matrix` traits with generic default
//!   implementations, `DenseVector` / `DenseMatrix` with bulk fast paths,
//!   transpose-aware GEMM, and LU / Cholesky / SVD through `nalgebra`.
//! - [`timeseries`]: `TimeSeries` with O(1) date lookup, amortized append,
//!   hole-aware operators, alignment, synchronization, returns, and
//!   resampling; `TimeSeriesCollection` for named panels.
//! - [`statistics`]: Welford moments, median, covariance, Kendall-style sign
//!   agreement, and (co-)quadratic variation.
//!
//! Invariants & assumptions
//! ------------------------
//! - Everything is synchronous and in-process. The only lock in the crate
//!   guards a shared series' append/remove sequence.
//! - NaN is the hole marker in the time-series layer and an ordinary number
//!   everywhere else.
//!
//! Conventions
//! -----------
//! - Each module owns its error enum and result alias (`LinalgError`,
//!   `SeriesError`, `StatsError`); errors are returned at the detecting call
//!   and never swallowed.
//! - Diagnostics are emitted through `tracing`; the crate never installs a
//!   subscriber.
//!
//! Downstream usage
//! ----------------
//! - Import a module prelude, e.g. `use calendar_numerics::timeseries::prelude::*;`.
//! - `ndarray` arrays convert to and from the dense containers and series.
//!
//! Testing notes
//! -------------
//! - Unit tests live beside each module; `tests/` holds end-to-end scenarios
//!   spanning the kernel, the series engine, and statistics.

pub mod linalg;
pub mod statistics;
pub mod timeseries;
