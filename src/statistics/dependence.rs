//! dependence — paired and path statistics.
//!
//! Covariance, Kendall-style sign agreement over successive differences,
//! quadratic variation (root mean square), and co-quadratic variation.
//! Paired inputs must have equal length.

use crate::statistics::errors::{StatsError, StatsResult};
use crate::statistics::moments::mean;

fn ensure_paired(left: &[f64], right: &[f64]) -> StatsResult<()> {
    if left.len() != right.len() {
        return Err(StatsError::LengthMismatch { left: left.len(), right: right.len() });
    }
    Ok(())
}

fn ensure_at_least(needed: usize, found: usize) -> StatsResult<()> {
    if found < needed {
        return Err(StatsError::InsufficientData { needed, found });
    }
    Ok(())
}

/// Sample covariance `Σ (xᵢ − x̄)(yᵢ − ȳ) / (n − 1)`.
pub fn covariance(x: &[f64], y: &[f64]) -> StatsResult<f64> {
    ensure_paired(x, y)?;
    ensure_at_least(2, x.len())?;
    let (mx, my) = (mean(x)?, mean(y)?);
    let total: f64 = x.iter().zip(y).map(|(a, b)| (a - mx) * (b - my)).sum();
    Ok(total / (x.len() as f64 - 1.0))
}

/// Agreement of successive-difference signs, in `[-1, 1]`.
///
/// Each step `i` (from 1 to n−1) is concordant when
/// `sign(xᵢ − xᵢ₋₁) == sign(yᵢ − yᵢ₋₁)` and discordant otherwise; the
/// result is `(concordant − discordant) / (n − 1)`. Identical paths give
/// `1`, mirrored paths give `-1`.
///
/// Errors
/// ------
/// - `LengthMismatch` for unequal inputs.
/// - `InsufficientData` when fewer than two observations are supplied.
pub fn kendall_tau(x: &[f64], y: &[f64]) -> StatsResult<f64> {
    ensure_paired(x, y)?;
    ensure_at_least(2, x.len())?;
    let mut balance = 0.0;
    for i in 1..x.len() {
        if sign(x[i] - x[i - 1]) == sign(y[i] - y[i - 1]) {
            balance += 1.0;
        } else {
            balance -= 1.0;
        }
    }
    Ok(balance / (x.len() - 1) as f64)
}

/// `sqrt(Σ xᵢ² / n)`.
pub fn quadratic_variation(data: &[f64]) -> StatsResult<f64> {
    ensure_at_least(1, data.len())?;
    let total: f64 = data.iter().map(|x| x * x).sum();
    Ok((total / data.len() as f64).sqrt())
}

/// `Σ xᵢ·yᵢ / (n − 1)`.
pub fn co_quadratic_variation(x: &[f64], y: &[f64]) -> StatsResult<f64> {
    ensure_paired(x, y)?;
    ensure_at_least(2, x.len())?;
    let total: f64 = x.iter().zip(y).map(|(a, b)| a * b).sum();
    Ok(total / (x.len() as f64 - 1.0))
}

/// -1, 0 or 1; NaN maps to 0.
fn sign(value: f64) -> i8 {
    if value > 0.0 {
        1
    } else if value < 0.0 {
        -1
    } else {
        0
    }
}
