use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("{field} must be a finite number, got {value}")]
    NonFinite { field: &'static str, value: f64 },
    #[error("{field} must be >= 0, got {value}")]
    Negative { field: &'static str, value: f64 },
    #[error("{field} must be between 0 and 100, got {value}")]
    PercentOutOfRange { field: &'static str, value: f64 },
    #[error("years must be > 0")]
    ZeroHorizon,
    #[error("balance series must have {expected} entries for this horizon, got {actual}")]
    SeriesLength { expected: usize, actual: usize },
}

pub type EngineResult<T> = Result<T, EngineError>;
