//! Command-line interface argument parsing.
//!
//! Every flag is optional: running with no arguments trains on the
//! configured dataset with default settings.

use clap::Parser;
use std::path::PathBuf;

/// HoaxDetect - fact-check post classifier
///
/// Trains a text classifier that maps post text to a verdict label
/// (HOAX, MISLEADING, SATIRE, ...), evaluates it on a held-out split,
/// charts the label distribution and saves the model.
///
/// Examples:
///   hoaxdetect
///   hoaxdetect --data Data/posts.csv --model-out Model/model.json
///   hoaxdetect --no-chart --format json --report run.json
///   hoaxdetect --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Path to configuration file
    ///
    /// If not specified, looks for .hoaxdetect.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Semicolon-delimited input CSV
    #[arg(short, long, value_name = "FILE", env = "HOAXDETECT_DATA")]
    pub data: Option<PathBuf>,

    /// Where to write the trained model
    #[arg(long, value_name = "FILE")]
    pub model_out: Option<PathBuf>,

    /// Where to write the label distribution chart
    #[arg(long, value_name = "FILE")]
    pub chart_out: Option<PathBuf>,

    /// Where to write the run summary
    #[arg(short, long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Output format for the run summary (markdown, json)
    #[arg(long, default_value = "markdown", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Skip rendering the label distribution chart
    #[arg(long)]
    pub no_chart: bool,

    /// Fraction of examples held out for evaluation (0.0 - 1.0, exclusive)
    #[arg(long, value_name = "FRACTION")]
    pub test_fraction: Option<f64>,

    /// Seed for the train/test shuffle
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Text to classify after training
    #[arg(long, value_name = "TEXT")]
    pub sample_text: Option<String>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .hoaxdetect.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the run summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        if self.init_config {
            return Ok(());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(fraction) = self.test_fraction {
            if !(0.0..1.0).contains(&fraction) {
                return Err("Test fraction must be at least 0.0 and below 1.0".to_string());
            }
        }

        if let Some(ref data) = self.data {
            if !data.is_file() {
                return Err(format!("Input file does not exist: {}", data.display()));
            }
        }

        if let Some(ref text) = self.sample_text {
            if text.trim().is_empty() {
                return Err("Sample text must not be empty".to_string());
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
