//! Errors for the calendar-aware time-series layer.
//!
//! Kernel and statistics failures raised underneath a series operation are
//! wrapped (`SeriesError::Linalg`, `SeriesError::Stats`) so that `?` works
//! across layers without erasing the original variant.

use chrono::NaiveDateTime;

use crate::linalg::errors::LinalgError;
use crate::statistics::errors::StatsError;

pub type SeriesResult<T> = Result<T, SeriesError>;

#[derive(Debug, Clone, PartialEq)]
pub enum SeriesError {
    // ---- Construction ----
    /// The supplied calendar holds fewer dates than the declared size.
    CalendarTooShort { dates: usize, size: usize },

    /// A count-like argument (growth chunk, interval, distance) was zero.
    NotPositive { parameter: &'static str },

    // ---- Access ----
    IndexOutOfRange { parameter: &'static str, index: usize, bound: usize },

    /// `start > end` for an inclusive index window.
    InvalidRange { start: usize, end: usize },

    DateNotFound { date: NaiveDateTime },

    // ---- Alignment / collections ----
    LengthMismatch { expected: usize, found: usize },

    DuplicateName { name: String },

    // ---- Wrapped ----
    Linalg(LinalgError),
    Stats(StatsError),
}

impl std::error::Error for SeriesError {}

impl std::fmt::Display for SeriesError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SeriesError::CalendarTooShort { dates, size } => {
                write!(f, "Series Error: date list contains fewer dates ({dates}) than number of points ({size}).")
            }
            SeriesError::NotPositive { parameter } => {
                write!(f, "Series Error: `{parameter}` must be strictly positive.")
            }
            SeriesError::IndexOutOfRange { parameter, index, bound } => {
                write!(f, "Series Error: `{parameter}` = {index} is out of range (bound {bound}).")
            }
            SeriesError::InvalidRange { start, end } => {
                write!(f, "Series Error: range start {start} is after range end {end}.")
            }
            SeriesError::DateNotFound { date } => {
                write!(f, "Series Error: no observation at {date}.")
            }
            SeriesError::LengthMismatch { expected, found } => {
                write!(f, "Series Error: expected {expected} points, found {found}.")
            }
            SeriesError::DuplicateName { name } => {
                write!(f, "Series Error: a series named `{name}` already exists.")
            }
            SeriesError::Linalg(err) => write!(f, "Series Error: {err}"),
            SeriesError::Stats(err) => write!(f, "Series Error: {err}"),
        }
    }
}

impl From<LinalgError> for SeriesError {
    fn from(err: LinalgError) -> Self {
        SeriesError::Linalg(err)
    }
}

impl From<StatsError> for SeriesError {
    fn from(err: StatsError) -> Self {
        SeriesError::Stats(err)
    }
}

pub(crate) fn ensure_index(parameter: &'static str, index: usize, bound: usize) -> SeriesResult<()> {
    if index >= bound {
        return Err(SeriesError::IndexOutOfRange { parameter, index, bound });
    }
    Ok(())
}

pub(crate) fn ensure_positive(parameter: &'static str, value: usize) -> SeriesResult<()> {
    if value == 0 {
        return Err(SeriesError::NotPositive { parameter });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrapped_errors_keep_their_message() {
        let err: SeriesError = StatsError::EmptyCollection { parameter: "data" }.into();
        assert_eq!(err.to_string(), "Series Error: Statistics Error: `data` contains no values.");

        let err: SeriesError = LinalgError::Singular.into();
        assert!(matches!(err, SeriesError::Linalg(LinalgError::Singular)));
    }

    #[test]
    fn calendar_message_names_both_counts() {
        let err = SeriesError::CalendarTooShort { dates: 2, size: 3 };
        assert_eq!(err.to_string(), "Series Error: date list contains fewer dates (2) than number of points (3).");
    }

    #[test]
    fn guards_reject_out_of_range_and_zero() {
        assert_eq!(
            ensure_index("index", 3, 3),
            Err(SeriesError::IndexOutOfRange { parameter: "index", index: 3, bound: 3 })
        );
        assert!(ensure_index("index", 2, 3).is_ok());
        assert_eq!(ensure_positive("interval", 0), Err(SeriesError::NotPositive { parameter: "interval" }));
    }
}
