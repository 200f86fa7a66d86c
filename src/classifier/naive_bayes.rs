//! Multinomial Naive Bayes text classifier.
//!
//! Training counts n-gram occurrences per label; prediction sums the
//! smoothed log-likelihoods of the known features and normalizes the
//! per-label scores into probabilities.

use super::featurizer::Featurizer;
use super::ClassifierError;
use crate::models::{LabeledText, Prediction};
use chrono::{DateTime, Utc};
use indicatif::{ProgressBar, ProgressStyle};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, info};

/// A trained classifier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoaxModel {
    /// Known labels, ascending. Score vectors follow this order.
    pub labels: Vec<String>,
    /// Feature extractor the model was trained with.
    pub featurizer: Featurizer,
    /// ln P(label).
    log_priors: Vec<f64>,
    /// ln P(feature | label), one entry per label.
    feature_log_probs: HashMap<String, Vec<f64>>,
    /// Number of examples seen during training.
    pub trained_examples: usize,
    /// When training finished.
    pub trained_at: DateTime<Utc>,
}

impl HoaxModel {
    /// Number of distinct features in the vocabulary.
    pub fn vocabulary_size(&self) -> usize {
        self.feature_log_probs.len()
    }

    /// Position of a label in the score vector.
    pub fn label_index(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    /// Classify a text.
    ///
    /// Features absent from the vocabulary are ignored; a text with no known
    /// features falls back to the label priors.
    pub fn predict(&self, text: &str) -> Prediction {
        let mut log_scores = self.log_priors.clone();

        for feature in self.featurizer.features(text) {
            if let Some(log_probs) = self.feature_log_probs.get(&feature) {
                for (score, lp) in log_scores.iter_mut().zip(log_probs) {
                    *score += lp;
                }
            }
        }

        let scores = softmax(&log_scores);
        let best = scores
            .iter()
            .enumerate()
            .fold(None, |best: Option<(usize, f32)>, (i, &p)| match best {
                Some((_, bp)) if bp >= p => best,
                _ => Some((i, p)),
            })
            .map(|(i, _)| i)
            .unwrap_or(0);

        Prediction {
            label: self.labels.get(best).cloned().unwrap_or_default(),
            scores,
        }
    }
}

/// Numerically stable softmax over log scores.
fn softmax(log_scores: &[f64]) -> Vec<f32> {
    let max = log_scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = log_scores.iter().map(|s| (s - max).exp()).collect();
    let total: f64 = exps.iter().sum();
    exps.iter().map(|e| (e / total) as f32).collect()
}

/// Trainer settings.
#[derive(Debug, Clone)]
pub struct NaiveBayesTrainer {
    /// Additive smoothing.
    pub alpha: f64,
    pub featurizer: Featurizer,
    pub show_progress: bool,
}

impl Default for NaiveBayesTrainer {
    fn default() -> Self {
        Self {
            alpha: 1.0,
            featurizer: Featurizer::default(),
            show_progress: false,
        }
    }
}

impl NaiveBayesTrainer {
    pub fn new(alpha: f64, featurizer: Featurizer) -> Self {
        Self {
            alpha,
            featurizer,
            show_progress: false,
        }
    }

    /// Draw a progress bar while counting.
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Fit a model on labeled examples.
    pub fn fit(&self, examples: &[LabeledText]) -> Result<HoaxModel, ClassifierError> {
        if examples.is_empty() {
            return Err(ClassifierError::EmptyTrainingSet);
        }
        if self.alpha.is_nan() || self.alpha <= 0.0 {
            return Err(ClassifierError::InvalidSmoothing(self.alpha));
        }

        let labels: Vec<String> = examples
            .iter()
            .map(|e| e.label.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let index: HashMap<&str, usize> = labels
            .iter()
            .enumerate()
            .map(|(i, l)| (l.as_str(), i))
            .collect();

        info!(
            "Training on {} examples across {} labels",
            examples.len(),
            labels.len()
        );

        let progress = self.progress_bar(examples.len() as u64);

        let mut doc_counts = vec![0usize; labels.len()];
        let mut feature_totals = vec![0usize; labels.len()];
        let mut feature_counts: HashMap<String, Vec<usize>> = HashMap::new();

        for example in examples {
            let class = index[example.label.as_str()];
            doc_counts[class] += 1;

            for feature in self.featurizer.features(&example.text) {
                feature_counts
                    .entry(feature)
                    .or_insert_with(|| vec![0; labels.len()])[class] += 1;
                feature_totals[class] += 1;
            }

            if let Some(ref pb) = progress {
                pb.inc(1);
            }
        }

        if let Some(pb) = progress {
            pb.finish_and_clear();
        }

        let n_docs = examples.len() as f64;
        let log_priors = doc_counts
            .iter()
            .map(|&c| (c as f64 / n_docs).ln())
            .collect();

        let vocab = feature_counts.len() as f64;
        let denominators: Vec<f64> = feature_totals
            .iter()
            .map(|&t| t as f64 + self.alpha * vocab)
            .collect();

        let feature_log_probs = feature_counts
            .into_iter()
            .map(|(feature, counts)| {
                let log_probs = counts
                    .iter()
                    .zip(&denominators)
                    .map(|(&c, d)| ((c as f64 + self.alpha) / d).ln())
                    .collect();
                (feature, log_probs)
            })
            .collect::<HashMap<_, _>>();

        debug!("Vocabulary size: {}", feature_log_probs.len());

        Ok(HoaxModel {
            labels,
            featurizer: self.featurizer,
            log_priors,
            feature_log_probs,
            trained_examples: examples.len(),
            trained_at: Utc::now(),
        })
    }

    fn progress_bar(&self, len: u64) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }

        let pb = ProgressBar::new(len);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        Some(pb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Vec<LabeledText> {
        vec![
            LabeledText::new("HOAX", "vaksin mengandung chip pelacak"),
            LabeledText::new("HOAX", "chip pelacak di dalam vaksin"),
            LabeledText::new("HOAX", "vaksin chip berbahaya"),
            LabeledText::new("SATIRE", "presiden naik kuda ke kantor"),
            LabeledText::new("SATIRE", "menteri naik kuda terbang"),
        ]
    }

    #[test]
    fn test_fit_empty() {
        let result = NaiveBayesTrainer::default().fit(&[]);
        assert!(matches!(result, Err(ClassifierError::EmptyTrainingSet)));
    }

    #[test]
    fn test_fit_rejects_zero_alpha() {
        let trainer = NaiveBayesTrainer::new(0.0, Featurizer::default());
        assert!(matches!(
            trainer.fit(&corpus()),
            Err(ClassifierError::InvalidSmoothing(_))
        ));
    }

    #[test]
    fn test_labels_sorted() {
        let model = NaiveBayesTrainer::default().fit(&corpus()).unwrap();
        assert_eq!(model.labels, vec!["HOAX", "SATIRE"]);
        assert_eq!(model.label_index("SATIRE"), Some(1));
        assert_eq!(model.trained_examples, 5);
        assert!(model.vocabulary_size() > 0);
    }

    #[test]
    fn test_predict() {
        let model = NaiveBayesTrainer::default().fit(&corpus()).unwrap();

        let hoax = model.predict("awas vaksin ada chip");
        assert_eq!(hoax.label, "HOAX");

        let satire = model.predict("gubernur naik kuda");
        assert_eq!(satire.label, "SATIRE");
    }

    #[test]
    fn test_scores_are_probabilities() {
        let model = NaiveBayesTrainer::default().fit(&corpus()).unwrap();
        let prediction = model.predict("vaksin kuda");

        assert_eq!(prediction.scores.len(), 2);
        let total: f32 = prediction.scores.iter().sum();
        assert!((total - 1.0).abs() < 1e-5);
        assert!(prediction.scores.iter().all(|&p| (0.0..=1.0).contains(&p)));
    }

    #[test]
    fn test_unknown_text_uses_priors() {
        let model = NaiveBayesTrainer::default().fit(&corpus()).unwrap();
        let prediction = model.predict("zzz qqq");

        assert_eq!(prediction.label, "HOAX");
        assert!((prediction.scores[0] - 0.6).abs() < 1e-5);
    }

    #[test]
    fn test_softmax_stability() {
        let probs = softmax(&[-1000.0, -1001.0]);
        assert!(probs[0] > probs[1]);
        assert!((probs.iter().sum::<f32>() - 1.0).abs() < 1e-5);
    }
}
