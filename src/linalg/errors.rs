//! Errors for the linear-algebra kernel (vectors, matrices, decompositions).
//!
//! Every failure is raised at the call that detects it; nothing in the kernel
//! retries or recovers. Message text lives in [`messages`] so that callers and
//! tests can match on stable strings without a global resource table.

/// Static message table used by [`LinalgError`]'s `Display` implementation.
pub mod messages {
    pub const NOT_POSITIVE: &str = "must be strictly positive";
    pub const PARAMETER_NOT_CONFORMABLE: &str = "operand shape does not conform to the operation";
    pub const RESULT_NOT_CONFORMABLE: &str = "result buffer has incorrect dimensions";
    pub const ARRAY_NOT_CONFORMABLE: &str = "array length does not conform to the target";
    pub const RAGGED_ROWS: &str = "row arrays have differing lengths";
    pub const NOT_SQUARE: &str = "matrix must be square";
    pub const SINGULAR: &str = "matrix is singular";
    pub const NOT_POSITIVE_DEFINITE: &str = "matrix is not positive definite";
    pub const NO_CONVERGENCE: &str = "decomposition did not converge";
    pub const INDEX_OUT_OF_RANGE: &str = "index is out of range";
    pub const INVALID_NORM: &str = "p-norm order must be at least 1";
}

pub type LinalgResult<T> = Result<T, LinalgError>;

#[derive(Debug, Clone, PartialEq)]
pub enum LinalgError {
    // ---- Construction ----
    /// A dimension or length that must be ≥ 1 was zero.
    NotPositive { parameter: &'static str },

    /// Row arrays supplied to a matrix constructor differ in length.
    RaggedRows { row: usize, expected: usize, found: usize },

    // ---- Shape ----
    /// An operand does not conform to the operation.
    NotConformable { parameter: &'static str, expected: (usize, usize), found: (usize, usize) },

    /// A result buffer has the wrong shape for the operation.
    ResultNotConformable { parameter: &'static str, expected: (usize, usize), found: (usize, usize) },

    /// A plain array does not conform to the target length.
    ArrayNotConformable { parameter: &'static str, expected: usize, found: usize },

    /// Determinant, inverse, trace, and solve require a square matrix.
    NotSquare { rows: usize, columns: usize },

    // ---- Indexing ----
    IndexOutOfRange { parameter: &'static str, index: usize, bound: usize },

    // ---- Decomposition ----
    Singular,
    NotPositiveDefinite,
    NoConvergence { algorithm: &'static str },

    // ---- Norms ----
    InvalidNorm { p: u32 },
}

impl std::error::Error for LinalgError {}

impl std::fmt::Display for LinalgError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use messages::*;
        match self {
            LinalgError::NotPositive { parameter } => {
                write!(f, "Linalg Error: `{parameter}` {NOT_POSITIVE}.")
            }
            LinalgError::RaggedRows { row, expected, found } => {
                write!(f, "Linalg Error: {RAGGED_ROWS} (row {row} has {found}, expected {expected}).")
            }
            LinalgError::NotConformable { parameter, expected, found } => write!(
                f,
                "Linalg Error: `{parameter}` {PARAMETER_NOT_CONFORMABLE} (expected {}x{}, found {}x{}).",
                expected.0, expected.1, found.0, found.1
            ),
            LinalgError::ResultNotConformable { parameter, expected, found } => write!(
                f,
                "Linalg Error: `{parameter}` {RESULT_NOT_CONFORMABLE} (expected {}x{}, found {}x{}).",
                expected.0, expected.1, found.0, found.1
            ),
            LinalgError::ArrayNotConformable { parameter, expected, found } => write!(
                f,
                "Linalg Error: `{parameter}` {ARRAY_NOT_CONFORMABLE} (expected {expected}, found {found})."
            ),
            LinalgError::NotSquare { rows, columns } => {
                write!(f, "Linalg Error: {NOT_SQUARE} (found {rows}x{columns}).")
            }
            LinalgError::IndexOutOfRange { parameter, index, bound } => write!(
                f,
                "Linalg Error: `{parameter}` {INDEX_OUT_OF_RANGE} (index {index}, bound {bound})."
            ),
            LinalgError::Singular => write!(f, "Linalg Error: {SINGULAR}."),
            LinalgError::NotPositiveDefinite => write!(f, "Linalg Error: {NOT_POSITIVE_DEFINITE}."),
            LinalgError::NoConvergence { algorithm } => {
                write!(f, "Linalg Error: {algorithm} {NO_CONVERGENCE}.")
            }
            LinalgError::InvalidNorm { p } => write!(f, "Linalg Error: {INVALID_NORM} (found {p})."),
        }
    }
}

// ---- Shape-check helpers ----

/// Require `value >= 1`.
pub(crate) fn ensure_positive(parameter: &'static str, value: usize) -> LinalgResult<()> {
    if value == 0 {
        return Err(LinalgError::NotPositive { parameter });
    }
    Ok(())
}

/// Require `index < bound`.
pub(crate) fn ensure_index(parameter: &'static str, index: usize, bound: usize) -> LinalgResult<()> {
    if index >= bound {
        return Err(LinalgError::IndexOutOfRange { parameter, index, bound });
    }
    Ok(())
}

/// Require that `[start, start + length)` lies within `[0, bound)` and is non-empty.
pub(crate) fn ensure_range(
    parameter: &'static str, start: usize, length: usize, bound: usize,
) -> LinalgResult<()> {
    ensure_positive(parameter, length)?;
    ensure_index(parameter, start, bound)?;
    match start.checked_add(length) {
        Some(end) if end <= bound => Ok(()),
        _ => Err(LinalgError::IndexOutOfRange { parameter, index: start.saturating_add(length - 1), bound }),
    }
}
