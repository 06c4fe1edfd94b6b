use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TrackError {
    #[error("Unknown robust estimator: {0} (expected none, huber or tukey)")]
    UnknownEstimator(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid image dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("Non-finite pixel at row {row}, column {col}")]
    NonFiniteImage { row: usize, col: usize },

    #[error("Invalid rectangle: {0}")]
    InvalidRect(String),
}

pub type Result<T> = std::result::Result<T, TrackError>;
