//! Dataset ingestion, label encoding and feature scaling

pub mod codec;
pub mod csv;
pub mod scaling;

pub use codec::{one_hot_block, LabelCodec};
pub use csv::ProteinDataset;
pub use scaling::MinMaxScaler;
