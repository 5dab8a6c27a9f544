//! Core types and error definitions

pub mod error;
pub mod types;

pub use error::{Result, SvmError};
pub use types::{Matrix, PredictionRecord, TrainingConfig, TrainingContext, FEATURE_DIM};
