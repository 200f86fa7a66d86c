//! Verdict classifier.
//!
//! This module provides featurization, training, evaluation and model
//! persistence for the post-text → verdict-label classifier.

pub mod featurizer;
pub mod metrics;
pub mod naive_bayes;

pub use featurizer::Featurizer;
pub use metrics::evaluate;
pub use naive_bayes::{HoaxModel, NaiveBayesTrainer};

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Errors raised while training.
#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("no labeled examples to train on")]
    EmptyTrainingSet,

    #[error("smoothing must be positive, got {0}")]
    InvalidSmoothing(f64),
}

/// Write a trained model as JSON, creating parent directories as needed.
pub fn save_model(model: &HoaxModel, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create model directory {}", parent.display()))?;
    }

    let data = serde_json::to_vec_pretty(model).context("Failed to serialize model")?;
    fs::write(path, data).with_context(|| format!("Failed to write model to {}", path.display()))?;

    info!("Model saved to {}", path.display());
    Ok(())
}

/// Read a model previously written by [`save_model`].
pub fn load_model(path: &Path) -> Result<HoaxModel> {
    let data =
        fs::read(path).with_context(|| format!("Failed to read model {}", path.display()))?;
    serde_json::from_slice(&data)
        .with_context(|| format!("Failed to parse model {}", path.display()))
}
