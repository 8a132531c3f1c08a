use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum FitError {
    InvalidInput(InputError),
    InsufficientKnots { count: usize },
    UnknownSignal(String),
    NoPopulatedTimeslice,
    DataError(String),
}

/// Reasons an argument was rejected before any fitting happened.
#[derive(Debug, Clone, PartialEq)]
pub enum InputError {
    LengthMismatch { x: usize, y: usize },
    NotAscending { index: usize },
    NotStrictlyIncreasing { index: usize },
    NonFinite { index: usize },
    NegativePower(f64),
    NegativeSpacing(f64),
    Empty,
    EmptyGrid,
}

pub type Result<T> = std::result::Result<T, FitError>;

impl From<InputError> for FitError {
    fn from(e: InputError) -> Self {
        FitError::InvalidInput(e)
    }
}

impl fmt::Display for FitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput(e) => write!(f, "invalid input: {e}"),
            Self::InsufficientKnots { count } => {
                write!(f, "a natural cubic spline needs at least 2 knots, got {count}")
            }
            Self::UnknownSignal(name) => write!(f, "unknown signal: {name}"),
            Self::NoPopulatedTimeslice => write!(f, "no timeslice with a nonzero knot count"),
            Self::DataError(msg) => write!(f, "data error: {msg}"),
        }
    }
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LengthMismatch { x, y } => {
                write!(f, "x has {x} values but y has {y}")
            }
            Self::NotAscending { index } => write!(f, "x decreases at index {index}"),
            Self::NotStrictlyIncreasing { index } => {
                write!(f, "x is not strictly increasing at index {index}")
            }
            Self::NonFinite { index } => write!(f, "non-finite value at index {index}"),
            Self::NegativePower(p) => write!(f, "power must be nonnegative, got {p}"),
            Self::NegativeSpacing(s) => write!(f, "minimum spacing must be nonnegative, got {s}"),
            Self::Empty => write!(f, "no samples"),
            Self::EmptyGrid => write!(f, "evaluation grid needs at least one point"),
        }
    }
}

impl std::error::Error for FitError {}

impl std::error::Error for InputError {}
