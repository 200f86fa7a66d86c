//! Data models for the hoax classifier.
//!
//! This module contains the core data structures shared across the
//! pipeline: raw records, aggregated label counts, predictions and
//! evaluation metrics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A single fact-check post as read from the input CSV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Raw verdict label (e.g. "HOAX", "misleading "). May be missing or empty.
    pub flag: Option<String>,
    /// Post body.
    pub text: String,
}

impl Record {
    /// Creates a record from a flag and a body.
    #[allow(dead_code)] // Constructor for fixtures
    pub fn new(flag: Option<&str>, text: &str) -> Self {
        Self {
            flag: flag.map(String::from),
            text: text.to_string(),
        }
    }
}

/// A normalized label together with its frequency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelCount {
    /// Normalized label (uppercased, trimmed, aliased).
    pub label: String,
    /// Number of records carrying this label. Always at least 1.
    pub count: usize,
}

impl fmt::Display for LabelCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label, self.count)
    }
}

/// A post text paired with its normalized label, ready for training.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledText {
    pub label: String,
    pub text: String,
}

impl LabeledText {
    #[allow(dead_code)] // Constructor for fixtures
    pub fn new(label: &str, text: &str) -> Self {
        Self {
            label: label.to_string(),
            text: text.to_string(),
        }
    }
}

/// Output of a single prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// The most probable label.
    pub label: String,
    /// Class probabilities, aligned with the model's label order.
    pub scores: Vec<f32>,
}

impl Prediction {
    /// Probability assigned to the predicted label.
    pub fn confidence(&self) -> f32 {
        self.scores.iter().cloned().fold(0.0, f32::max)
    }
}

/// Multiclass evaluation metrics computed on the held-out split.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluationMetrics {
    /// Fraction of test examples predicted correctly.
    pub micro_accuracy: f64,
    /// Mean per-class recall over the classes present in the test set.
    pub macro_accuracy: f64,
    /// Mean negative log-probability of the true label.
    pub log_loss: f64,
    /// Relative improvement of the log loss over the label-frequency prior.
    pub log_loss_reduction: f64,
    /// Log loss restricted to the examples of each true label.
    pub per_class_log_loss: BTreeMap<String, f64>,
    /// Number of test examples evaluated.
    pub test_count: usize,
    /// Confusion matrix (rows = actual, columns = predicted).
    pub confusion: ConfusionMatrix,
}

/// Confusion matrix over the model's label set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub labels: Vec<String>,
    pub counts: Vec<Vec<usize>>,
}

impl ConfusionMatrix {
    /// Creates an all-zero matrix for the given labels.
    pub fn new(labels: &[String]) -> Self {
        Self {
            labels: labels.to_vec(),
            counts: vec![vec![0; labels.len()]; labels.len()],
        }
    }

    /// Number of examples with the given actual and predicted labels.
    pub fn get(&self, actual: &str, predicted: &str) -> usize {
        let row = self.labels.iter().position(|l| l == actual);
        let col = self.labels.iter().position(|l| l == predicted);
        match (row, col) {
            (Some(r), Some(c)) => self.counts[r][c],
            _ => 0,
        }
    }
}

/// Metadata about a pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMetadata {
    /// Input CSV path.
    pub data_path: String,
    /// When the run finished.
    pub run_date: DateTime<Utc>,
    /// Records read from the CSV.
    pub records_loaded: usize,
    /// Examples used for training.
    pub train_count: usize,
    /// Where the model was written.
    pub model_path: String,
    /// Where the chart was written, if it was rendered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart_path: Option<String>,
    /// Wall-clock duration in seconds.
    pub duration_seconds: f64,
}

/// The sample prediction performed at the end of training.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplePrediction {
    pub text: String,
    /// Model labels, in score-vector order.
    pub labels: Vec<String>,
    pub prediction: Prediction,
}

impl SamplePrediction {
    /// Label/probability pairs, most probable first.
    pub fn ranked_scores(&self) -> Vec<(&str, f32)> {
        let mut ranked: Vec<(&str, f32)> = self
            .labels
            .iter()
            .map(String::as_str)
            .zip(self.prediction.scores.iter().copied())
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked
    }
}

/// Everything a run produces, for the summary report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub metadata: RunMetadata,
    pub label_distribution: Vec<LabelCount>,
    pub metrics: EvaluationMetrics,
    pub sample: SamplePrediction,
}
