//! Error types for the training engine

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SvmError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Data shape error: {0}")]
    DataShape(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Numeric divergence: loss became non-finite, last finite loss was {last_loss}")]
    NumericDivergence { last_loss: f64 },

    #[error("Unknown label: {0}")]
    UnknownLabel(String),

    #[error("Empty dataset")]
    EmptyDataset,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

pub type Result<T> = std::result::Result<T, SvmError>;
