//! statistics — descriptive and dependence statistics over plain arrays.
//!
//! Purpose
//! -------
//! Summaries consumed by the time-series layer and by reporting code:
//! extremes, mean, median, sample variance and standard deviation (one-pass
//! Welford), covariance, Kendall-style sign agreement, quadratic and
//! co-quadratic variation.
//!
//! Key behaviors
//! -------------
//! - Every function returns [`StatsResult`]; empty input, too few
//!   observations, and mismatched pair lengths are reported, never papered
//!   over with a default value.
//! - `*_opt` overloads accept `&[Option<f64>]` and skip `None` entries from
//!   the running count.
//!
//! Invariants & assumptions
//! ------------------------
//! - Inputs are hole-free by convention: the time-series layer strips NaN
//!   and infinities before calling in. A NaN that does reach this layer is
//!   treated as an ordinary number.
//!
//! Testing notes
//! -------------
//! - Unit tests compare against two-pass formulas and against `statrs` as an
//!   independent reference implementation.

pub mod dependence;
pub mod errors;
pub mod moments;

// ---- Re-exports (primary public surface) ----------------------------------

pub use self::dependence::{co_quadratic_variation, covariance, kendall_tau, quadratic_variation};
pub use self::errors::{StatsError, StatsResult};
pub use self::moments::{
    RunningMoments, maximum, maximum_opt, mean, mean_opt, median, median_opt, minimum, minimum_opt,
    standard_deviation, standard_deviation_opt, variance, variance_opt,
};
