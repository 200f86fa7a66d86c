//! Evaluation of a trained model on held-out examples.

use super::naive_bayes::HoaxModel;
use crate::models::{ConfusionMatrix, EvaluationMetrics, LabeledText};
use std::collections::{BTreeMap, HashMap};

/// Probability floor applied before taking logarithms.
const MIN_PROBABILITY: f64 = 1e-15;

fn clamped_log_loss(probability: f64) -> f64 {
    -probability.max(MIN_PROBABILITY).ln()
}

#[derive(Default)]
struct ClassTally {
    total: usize,
    correct: usize,
    loss: f64,
}

/// Compute multiclass metrics for `model` on `test`.
///
/// An empty test set yields zeroed metrics.
pub fn evaluate(model: &HoaxModel, test: &[LabeledText]) -> EvaluationMetrics {
    let mut confusion = ConfusionMatrix::new(&model.labels);

    if test.is_empty() {
        return EvaluationMetrics {
            confusion,
            ..Default::default()
        };
    }

    let mut tallies: HashMap<&str, ClassTally> = HashMap::new();
    let mut correct = 0usize;
    let mut total_loss = 0.0;

    for example in test {
        let prediction = model.predict(&example.text);
        let actual = model.label_index(&example.label);

        let p_true = actual
            .and_then(|i| prediction.scores.get(i))
            .map(|&p| p as f64)
            .unwrap_or(0.0);
        let loss = clamped_log_loss(p_true);
        let hit = prediction.label == example.label;

        if let (Some(row), Some(col)) = (actual, model.label_index(&prediction.label)) {
            confusion.counts[row][col] += 1;
        }

        let tally = tallies.entry(example.label.as_str()).or_default();
        tally.total += 1;
        tally.loss += loss;
        if hit {
            tally.correct += 1;
            correct += 1;
        }
        total_loss += loss;
    }

    let n = test.len() as f64;
    let log_loss = total_loss / n;

    let macro_accuracy = tallies
        .values()
        .map(|t| t.correct as f64 / t.total as f64)
        .sum::<f64>()
        / tallies.len() as f64;

    // entropy of the test label distribution
    let prior_log_loss: f64 = tallies
        .values()
        .map(|t| {
            let freq = t.total as f64 / n;
            -freq * freq.ln()
        })
        .sum();

    let log_loss_reduction = if prior_log_loss > 0.0 {
        1.0 - log_loss / prior_log_loss
    } else {
        0.0
    };

    let per_class_log_loss: BTreeMap<String, f64> = tallies
        .iter()
        .map(|(label, t)| (label.to_string(), t.loss / t.total as f64))
        .collect();

    EvaluationMetrics {
        micro_accuracy: correct as f64 / n,
        macro_accuracy,
        log_loss,
        log_loss_reduction,
        per_class_log_loss,
        test_count: test.len(),
        confusion,
    }
}
