//! Multi-class Gaussian-kernel SVM trainer for protein family embeddings
//!
//! Trains a one-vs-rest kernel SVM over fixed-length protein sequence
//! embeddings and evaluates it with seeded k-fold cross-validation.

pub mod core;
pub mod data;
pub mod kernel;
pub mod metrics;
pub mod model;
pub mod persistence;
pub mod validation;

// Re-export main types for convenience
pub use crate::core::error::{Result, SvmError};
pub use crate::core::types::{Matrix, PredictionRecord, TrainingConfig, TrainingContext, FEATURE_DIM};
pub use crate::data::{LabelCodec, MinMaxScaler, ProteinDataset};
pub use crate::kernel::RbfKernel;
pub use crate::metrics::{ClassTally, MetricsReport};
pub use crate::model::MulticlassSvm;
pub use crate::validation::{CrossValidationDriver, CrossValidationOutcome, Fold, KFold};

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
