//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.hoaxdetect.toml` files. Every pipeline stage receives its settings
//! from here rather than from fixed paths.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".hoaxdetect.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Input and output locations.
    #[serde(default)]
    pub paths: PathsConfig,

    /// CSV layout.
    #[serde(default)]
    pub dataset: DatasetConfig,

    /// Training settings.
    #[serde(default)]
    pub training: TrainingConfig,

    /// Chart rendering settings.
    #[serde(default)]
    pub chart: ChartConfig,
}

/// File locations for the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Semicolon-delimited input CSV.
    #[serde(default = "default_data_path")]
    pub data: PathBuf,

    /// Where the trained model is written.
    #[serde(default = "default_model_path")]
    pub model: PathBuf,

    /// Where the label distribution chart is written.
    #[serde(default = "default_chart_path")]
    pub chart: PathBuf,

    /// Where the run summary is written.
    #[serde(default = "default_report_path")]
    pub report: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            data: default_data_path(),
            model: default_model_path(),
            chart: default_chart_path(),
            report: default_report_path(),
        }
    }
}

fn default_data_path() -> PathBuf {
    PathBuf::from("Data/turnbackhoax.csv")
}

fn default_model_path() -> PathBuf {
    PathBuf::from("Model/hoax_model.json")
}

fn default_chart_path() -> PathBuf {
    PathBuf::from("Output/label_distribution.png")
}

fn default_report_path() -> PathBuf {
    PathBuf::from("Output/hoax_report.md")
}

/// CSV layout settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetConfig {
    /// Field delimiter.
    #[serde(default = "default_delimiter")]
    pub delimiter: char,

    /// Whether the first row is a header.
    #[serde(default = "default_true")]
    pub has_headers: bool,

    /// Zero-based index of the verdict column.
    #[serde(default = "default_flag_column")]
    pub flag_column: usize,

    /// Zero-based index of the post text column.
    #[serde(default = "default_text_column")]
    pub text_column: usize,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            has_headers: true,
            flag_column: default_flag_column(),
            text_column: default_text_column(),
        }
    }
}

fn default_delimiter() -> char {
    ';'
}

fn default_true() -> bool {
    true
}

fn default_flag_column() -> usize {
    3
}

fn default_text_column() -> usize {
    5
}

/// Classifier training settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingConfig {
    /// Fraction of examples held out for evaluation.
    #[serde(default = "default_test_fraction")]
    pub test_fraction: f64,

    /// Seed for the train/test shuffle.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Additive smoothing for unseen feature counts.
    #[serde(default = "default_alpha")]
    pub alpha: f64,

    /// Emit word bigrams in addition to unigrams.
    #[serde(default = "default_true")]
    pub use_bigrams: bool,

    /// Text classified after training as a smoke test.
    #[serde(default = "default_sample_text")]
    pub sample_text: String,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            test_fraction: default_test_fraction(),
            seed: default_seed(),
            alpha: default_alpha(),
            use_bigrams: true,
            sample_text: default_sample_text(),
        }
    }
}

fn default_test_fraction() -> f64 {
    0.2
}

fn default_seed() -> u64 {
    12345
}

fn default_alpha() -> f64 {
    1.0
}

fn default_sample_text() -> String {
    "Beredar pesan berantai bahwa minum air es setelah makan dapat menyebabkan kanker".to_string()
}

/// Remote chart rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Render the label distribution chart.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// QuickChart-compatible render endpoint.
    #[serde(default = "default_chart_url")]
    pub url: String,

    /// Image width in pixels.
    #[serde(default = "default_chart_width")]
    pub width: u32,

    /// Image height in pixels.
    #[serde(default = "default_chart_height")]
    pub height: u32,

    /// Chart title.
    #[serde(default = "default_chart_title")]
    pub title: String,

    /// Bar fill colour.
    #[serde(default = "default_chart_color")]
    pub color: String,

    /// Background colour.
    #[serde(default = "default_chart_background")]
    pub background: String,

    /// Request timeout in seconds.
    #[serde(default = "default_chart_timeout")]
    pub timeout_seconds: u64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: default_chart_url(),
            width: default_chart_width(),
            height: default_chart_height(),
            title: default_chart_title(),
            color: default_chart_color(),
            background: default_chart_background(),
            timeout_seconds: default_chart_timeout(),
        }
    }
}

fn default_chart_url() -> String {
    "https://quickchart.io/chart".to_string()
}

fn default_chart_width() -> u32 {
    800
}

fn default_chart_height() -> u32 {
    500
}

fn default_chart_title() -> String {
    "Label Distribution".to_string()
}

fn default_chart_color() -> String {
    "rgba(54, 162, 235, 0.8)".to_string()
}

fn default_chart_background() -> String {
    "white".to_string()
}

fn default_chart_timeout() -> u64 {
    30
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE_NAME);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were given explicitly.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref data) = args.data {
            self.paths.data = data.clone();
        }
        if let Some(ref model) = args.model_out {
            self.paths.model = model.clone();
        }
        if let Some(ref chart) = args.chart_out {
            self.paths.chart = chart.clone();
        }
        if let Some(ref report) = args.report {
            self.paths.report = report.clone();
        }

        if let Some(fraction) = args.test_fraction {
            self.training.test_fraction = fraction;
        }
        if let Some(seed) = args.seed {
            self.training.seed = seed;
        }
        if let Some(ref text) = args.sample_text {
            self.training.sample_text = text.clone();
        }

        if args.no_chart {
            self.chart.enabled = false;
        }
    }

    /// Check values that would otherwise fail deep inside the pipeline.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..1.0).contains(&self.training.test_fraction) {
            anyhow::bail!(
                "test_fraction must be in [0, 1), got {}",
                self.training.test_fraction
            );
        }
        if self.training.alpha <= 0.0 {
            anyhow::bail!("alpha must be positive, got {}", self.training.alpha);
        }
        if !self.dataset.delimiter.is_ascii() {
            anyhow::bail!("delimiter must be a single ASCII character");
        }
        Ok(())
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}
