//! Errors for the statistics layer.

pub type StatsResult<T> = Result<T, StatsError>;

#[derive(Debug, Clone, PartialEq)]
pub enum StatsError {
    /// The input held no (set) values.
    EmptyCollection { parameter: &'static str },

    /// Fewer observations than the statistic needs.
    InsufficientData { needed: usize, found: usize },

    /// Paired inputs differ in length.
    LengthMismatch { left: usize, right: usize },
}

impl std::error::Error for StatsError {}

impl std::fmt::Display for StatsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatsError::EmptyCollection { parameter } => {
                write!(f, "Statistics Error: `{parameter}` contains no values.")
            }
            StatsError::InsufficientData { needed, found } => {
                write!(f, "Statistics Error: need at least {needed} observations, found {found}.")
            }
            StatsError::LengthMismatch { left, right } => {
                write!(f, "Statistics Error: paired inputs differ in length ({left} vs {right}).")
            }
        }
    }
}
