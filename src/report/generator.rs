//! Run summary generation.
//!
//! Renders the label distribution, evaluation metrics and sample
//! prediction of a run as Markdown or JSON.

use crate::analysis::total_labeled;
use crate::models::{EvaluationMetrics, LabelCount, RunMetadata, RunReport, SamplePrediction};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Generate a complete Markdown summary.
pub fn generate_markdown_report(report: &RunReport) -> String {
    let mut output = String::new();

    output.push_str("# HoaxDetect Run Summary\n\n");
    output.push_str(&generate_metadata_section(
        &report.metadata,
        report.metrics.test_count,
    ));
    output.push_str(&generate_distribution_section(&report.label_distribution));
    output.push_str(&generate_metrics_section(&report.metrics));
    output.push_str(&generate_sample_section(&report.sample));
    output.push_str("---\n\n*Generated by HoaxDetect*\n");

    output
}

/// Generate a JSON summary.
pub fn generate_json_report(report: &RunReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("Failed to serialize report to JSON")
}

/// Write rendered report content, creating parent directories as needed.
pub fn write_report(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create report directory {}", parent.display()))?;
    }
    fs::write(path, content)
        .with_context(|| format!("Failed to write report to {}", path.display()))
}

fn generate_metadata_section(metadata: &RunMetadata, test_count: usize) -> String {
    let mut section = String::new();

    section.push_str("## Run\n\n");
    section.push_str(&format!("- **Dataset:** `{}`\n", metadata.data_path));
    section.push_str(&format!(
        "- **Date:** {}\n",
        metadata.run_date.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Records Loaded:** {}\n", metadata.records_loaded));
    section.push_str(&format!(
        "- **Train / Test:** {} / {}\n",
        metadata.train_count, test_count
    ));
    section.push_str(&format!("- **Model:** `{}`\n", metadata.model_path));
    if let Some(ref chart) = metadata.chart_path {
        section.push_str(&format!("- **Chart:** `{}`\n", chart));
    }
    section.push_str(&format!(
        "- **Duration:** {:.1}s\n\n",
        metadata.duration_seconds
    ));

    section
}

fn generate_distribution_section(distribution: &[LabelCount]) -> String {
    let mut section = String::new();

    section.push_str("## Label Distribution\n\n");
    if distribution.is_empty() {
        section.push_str("No labeled records.\n\n");
        return section;
    }

    let total = total_labeled(distribution) as f64;
    section.push_str("| Label | Count | Share |\n");
    section.push_str("|-------|------:|------:|\n");
    for lc in distribution {
        section.push_str(&format!(
            "| {} | {} | {:.1}% |\n",
            lc.label,
            lc.count,
            lc.count as f64 / total * 100.0
        ));
    }
    section.push('\n');

    section
}

fn generate_metrics_section(metrics: &EvaluationMetrics) -> String {
    let mut section = String::new();

    section.push_str("## Evaluation\n\n");
    if metrics.test_count == 0 {
        section.push_str("No held-out examples; evaluation skipped.\n\n");
        return section;
    }

    section.push_str(&format!("- **Test Examples:** {}\n", metrics.test_count));
    section.push_str(&format!("- **MicroAccuracy:** {:.4}\n", metrics.micro_accuracy));
    section.push_str(&format!("- **MacroAccuracy:** {:.4}\n", metrics.macro_accuracy));
    section.push_str(&format!("- **LogLoss:** {:.4}\n", metrics.log_loss));
    section.push_str(&format!(
        "- **LogLossReduction:** {:.4}\n\n",
        metrics.log_loss_reduction
    ));

    if !metrics.per_class_log_loss.is_empty() {
        section.push_str("### Per-Class Log Loss\n\n");
        for (label, loss) in &metrics.per_class_log_loss {
            section.push_str(&format!("- {}: {:.4}\n", label, loss));
        }
        section.push('\n');
    }

    let confusion = &metrics.confusion;
    if !confusion.labels.is_empty() {
        section.push_str("### Confusion Matrix\n\n");
        section.push_str("| Actual \\ Predicted |");
        for label in &confusion.labels {
            section.push_str(&format!(" {} |", label));
        }
        section.push('\n');
        section.push_str("|---|");
        section.push_str(&"---:|".repeat(confusion.labels.len()));
        section.push('\n');

        for actual in &confusion.labels {
            section.push_str(&format!("| {} |", actual));
            for predicted in &confusion.labels {
                section.push_str(&format!(" {} |", confusion.get(actual, predicted)));
            }
            section.push('\n');
        }
        section.push('\n');
    }

    section
}

fn generate_sample_section(sample: &SamplePrediction) -> String {
    let mut section = format!(
        "## Sample Prediction\n\n> {}\n\n- **Predicted:** {}\n- **Confidence:** {:.1}%\n\n",
        sample.text,
        sample.prediction.label,
        sample.prediction.confidence() * 100.0
    );

    if !sample.labels.is_empty() {
        section.push_str("| Label | Score |\n");
        section.push_str("|-------|------:|\n");
        for (label, score) in sample.ranked_scores() {
            section.push_str(&format!("| {} | {:.4} |\n", label, score));
        }
        section.push('\n');
    }

    section
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ConfusionMatrix, Prediction};
    use chrono::Utc;
    use std::collections::BTreeMap;

    fn create_test_report() -> RunReport {
        let labels = vec!["HOAX".to_string(), "SATIRE".to_string()];
        let mut confusion = ConfusionMatrix::new(&labels);
        confusion.counts = vec![vec![4, 1], vec![0, 2]];

        RunReport {
            metadata: RunMetadata {
                data_path: "Data/posts.csv".to_string(),
                run_date: Utc::now(),
                records_loaded: 40,
                train_count: 28,
                model_path: "Model/hoax_model.json".to_string(),
                chart_path: None,
                duration_seconds: 1.5,
            },
            label_distribution: vec![
                LabelCount {
                    label: "HOAX".to_string(),
                    count: 25,
                },
                LabelCount {
                    label: "SATIRE".to_string(),
                    count: 10,
                },
            ],
            metrics: EvaluationMetrics {
                micro_accuracy: 6.0 / 7.0,
                macro_accuracy: 0.9,
                log_loss: 0.35,
                log_loss_reduction: 0.4,
                per_class_log_loss: BTreeMap::from([
                    ("HOAX".to_string(), 0.3),
                    ("SATIRE".to_string(), 0.45),
                ]),
                test_count: 7,
                confusion,
            },
            sample: SamplePrediction {
                text: "vaksin chip".to_string(),
                labels: labels.clone(),
                prediction: Prediction {
                    label: "HOAX".to_string(),
                    scores: vec![0.9, 0.1],
                },
            },
        }
    }

    #[test]
    fn test_generate_markdown_report() {
        let markdown = generate_markdown_report(&create_test_report());

        assert!(markdown.contains("# HoaxDetect Run Summary"));
        assert!(markdown.contains("| HOAX | 25 | 71.4% |"));
        assert!(markdown.contains("- **MicroAccuracy:** 0.8571"));
        assert!(markdown.contains("| HOAX | 4 | 1 |"));
        assert!(markdown.contains("- **Predicted:** HOAX"));
        assert!(markdown.contains("- **Train / Test:** 28 / 7"));
        assert!(markdown.contains("| HOAX | 0.9000 |"));
        assert!(markdown.contains("| SATIRE | 0.1000 |"));
        assert!(!markdown.contains("**Chart:**"));
    }

    #[test]
    fn test_metrics_section_without_test_set() {
        let section = generate_metrics_section(&EvaluationMetrics::default());
        assert!(section.contains("evaluation skipped"));
    }

    #[test]
    fn test_generate_json_report() {
        let json = generate_json_report(&create_test_report()).unwrap();

        assert!(json.contains("\"label_distribution\""));
        assert!(json.contains("\"micro_accuracy\""));
        assert!(!json.contains("\"chart_path\""));
    }

    #[test]
    fn test_write_report_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("summary.md");

        write_report(&path, "# hi\n").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "# hi\n");
    }
}
