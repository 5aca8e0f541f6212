use std::fmt;

#[derive(Debug)]
pub enum ModelError {
    InvalidGrid(usize),
    InvalidHalfPeriod(f64),
    InvalidPrime(u64),
    InvalidWeight { prime: u64, weight: f64 },
    WeightMismatch { primes: usize, weights: usize },
    ModeOutOfRange { mode: usize, dim: usize },
    DimensionMismatch { expected: usize, actual: usize },
    NonFiniteOperator { entries: usize },
    Json(serde_json::Error),
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::InvalidGrid(n) => write!(
                f,
                "grid needs at least {} points, got {n}",
                crate::constants::MIN_POINTS
            ),
            ModelError::InvalidHalfPeriod(t) => {
                write!(f, "half-period must be finite and positive, got {t}")
            }
            ModelError::InvalidPrime(p) => write!(f, "shift must be at least 2, got {p}"),
            ModelError::InvalidWeight { prime, weight } => {
                write!(f, "weight for p={prime} must be finite, got {weight}")
            }
            ModelError::WeightMismatch { primes, weights } => write!(
                f,
                "length of weights ({weights}) must match length of primes ({primes})"
            ),
            ModelError::ModeOutOfRange { mode, dim } => {
                write!(f, "mode {mode} out of range for dimension {dim}")
            }
            ModelError::DimensionMismatch { expected, actual } => {
                write!(f, "vector has length {actual}, expected {expected}")
            }
            ModelError::NonFiniteOperator { entries } => write!(
                f,
                "assembled operator has {entries} non-finite entries; half-period or weights overflow"
            ),
            ModelError::Json(e) => write!(f, "JSON error: {e}"),
        }
    }
}

impl std::error::Error for ModelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ModelError::Json(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for ModelError {
    fn from(e: serde_json::Error) -> Self {
        ModelError::Json(e)
    }
}

pub type Result<T> = std::result::Result<T, ModelError>;
