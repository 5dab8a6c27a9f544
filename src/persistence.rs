//! Model checkpoint serialization
//!
//! Saves and restores the trained dual coefficients together with the
//! label table and the run configuration, mirroring the original
//! pipeline's checkpoint of the coefficient variable and class count.

use crate::core::types::{Matrix, TrainingConfig};
use crate::core::{Result, SvmError};
use crate::data::LabelCodec;
use crate::model::MulticlassSvm;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Serializable representation of a trained model
#[derive(Serialize, Deserialize)]
pub struct SerializableCheckpoint {
    /// Dual coefficients, one row per class
    pub coefficients: Vec<Vec<f64>>,
    /// Number of classes
    pub num_classes: usize,
    /// Batch width the coefficients were trained with
    pub batch_size: usize,
    /// Ordered class label table (the codec's bijection)
    pub classes: Vec<String>,
    /// Checkpoint metadata
    pub metadata: CheckpointMetadata,
}

/// Checkpoint metadata for tracking and validation
#[derive(Serialize, Deserialize)]
pub struct CheckpointMetadata {
    /// Library version used to create the checkpoint
    pub library_version: String,
    /// Training parameters used
    pub training_params: TrainingParams,
    /// Creation timestamp
    pub created_at: String,
}

/// Training parameters for reference
#[derive(Serialize, Deserialize)]
pub struct TrainingParams {
    pub gamma: f64,
    pub batch_size: usize,
    pub learning_rate: f64,
    pub folds: usize,
    pub seed: u64,
}

impl SerializableCheckpoint {
    /// Create a checkpoint from a trained model
    pub fn from_model(model: &MulticlassSvm, codec: &LabelCodec, config: &TrainingConfig) -> Self {
        let coefficients = (0..model.num_classes())
            .map(|c| model.coefficients().row(c).to_vec())
            .collect();

        Self {
            coefficients,
            num_classes: model.num_classes(),
            batch_size: model.batch_size(),
            classes: codec.classes().to_vec(),
            metadata: CheckpointMetadata {
                library_version: env!("CARGO_PKG_VERSION").to_string(),
                training_params: TrainingParams {
                    gamma: config.gamma,
                    batch_size: config.batch_size,
                    learning_rate: config.learning_rate,
                    folds: config.folds,
                    seed: config.seed,
                },
                created_at: chrono::Utc::now().to_rfc3339(),
            },
        }
    }

    /// Save checkpoint to file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        let writer = BufWriter::new(file);
        serde_json::to_writer_pretty(writer, self)
            .map_err(|e| SvmError::Serialization(e.to_string()))?;
        Ok(())
    }

    /// Load checkpoint from file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        let checkpoint = serde_json::from_reader(reader)
            .map_err(|e| SvmError::Serialization(e.to_string()))?;
        Ok(checkpoint)
    }

    /// Rebuild the model from the stored coefficients
    pub fn to_model(&self) -> Result<MulticlassSvm> {
        if self.coefficients.len() != self.num_classes {
            return Err(SvmError::Serialization(format!(
                "checkpoint holds {} coefficient rows for {} classes",
                self.coefficients.len(),
                self.num_classes
            )));
        }
        if self.classes.len() != self.num_classes {
            return Err(SvmError::Serialization(format!(
                "checkpoint holds {} labels for {} classes",
                self.classes.len(),
                self.num_classes
            )));
        }
        for row in &self.coefficients {
            if row.len() != self.batch_size {
                return Err(SvmError::Serialization(format!(
                    "coefficient row has {} entries, expected batch size {}",
                    row.len(),
                    self.batch_size
                )));
            }
        }

        let matrix = Matrix::from_rows(self.coefficients.clone())?;
        MulticlassSvm::from_coefficients(matrix)
    }

    /// Rebuild the label codec from the stored class table
    pub fn to_codec(&self) -> LabelCodec {
        LabelCodec::from_classes(self.classes.clone())
    }

    /// Print checkpoint summary
    pub fn print_summary(&self) {
        println!("=== SVM Checkpoint Summary ===");
        println!("Classes: {}", self.num_classes);
        println!("Batch size: {}", self.batch_size);
        println!("Library Version: {}", self.metadata.library_version);
        println!("Created: {}", self.metadata.created_at);
        println!("Training Parameters:");
        println!("  gamma: {}", self.metadata.training_params.gamma);
        println!(
            "  learning rate: {}",
            self.metadata.training_params.learning_rate
        );
        println!("  folds: {}", self.metadata.training_params.folds);
        println!("  seed: {}", self.metadata.training_params.seed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tempfile::NamedTempFile;

    fn fixture() -> (MulticlassSvm, LabelCodec, TrainingConfig) {
        let mut rng = StdRng::seed_from_u64(7);
        let model = MulticlassSvm::new(3, 4, &mut rng);
        let codec = LabelCodec::from_classes(vec![
            "PF1".to_string(),
            "PF2".to_string(),
            "PF3".to_string(),
        ]);
        (model, codec, TrainingConfig::default().with_batch_size(4))
    }

    #[test]
    fn test_checkpoint_round_trip() {
        let (model, codec, config) = fixture();
        let checkpoint = SerializableCheckpoint::from_model(&model, &codec, &config);

        let temp_file = NamedTempFile::new().expect("Failed to create temp file");
        checkpoint.save_to_file(temp_file.path()).unwrap();
        let loaded = SerializableCheckpoint::load_from_file(temp_file.path()).unwrap();

        assert_eq!(loaded.num_classes, 3);
        assert_eq!(loaded.batch_size, 4);
        assert_eq!(loaded.classes, codec.classes());
        assert_eq!(loaded.metadata.training_params.seed, config.seed);

        let restored = loaded.to_model().unwrap();
        assert_eq!(restored.coefficients(), model.coefficients());
        assert_eq!(loaded.to_codec(), codec);
    }

    #[test]
    fn test_to_model_rejects_inconsistent_shapes() {
        let (model, codec, config) = fixture();
        let mut checkpoint = SerializableCheckpoint::from_model(&model, &codec, &config);
        checkpoint.coefficients.pop();
        assert!(checkpoint.to_model().is_err());

        let mut checkpoint = SerializableCheckpoint::from_model(&model, &codec, &config);
        checkpoint.coefficients[0].push(0.0);
        assert!(checkpoint.to_model().is_err());

        let mut checkpoint = SerializableCheckpoint::from_model(&model, &codec, &config);
        checkpoint.classes.pop();
        assert!(checkpoint.to_model().is_err());
    }
}
