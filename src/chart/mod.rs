//! Label distribution chart rendering.
//!
//! Builds a Chart.js bar-chart description from the aggregated labels and
//! has a QuickChart-compatible service render it to PNG. A failed render
//! never stops the pipeline.

use crate::analysis::ChartSeries;
use crate::config::ChartConfig;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Url;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors raised while rendering a chart.
#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid chart service URL: {0}")]
    InvalidUrl(String),

    #[error("failed to encode chart payload: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("chart request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("chart service returned HTTP {0}")]
    Status(u16),

    #[error("failed to write chart image: {0}")]
    Io(#[from] std::io::Error),
}

/// Build the Chart.js description for a bar chart of the series.
pub fn build_chart_config(series: &ChartSeries, config: &ChartConfig) -> Value {
    json!({
        "type": "bar",
        "data": {
            "labels": series.labels,
            "datasets": [{
                "label": "Posts",
                "data": series.values,
                "backgroundColor": config.color,
            }]
        },
        "options": {
            "plugins": {
                "title": { "display": true, "text": config.title },
                "legend": { "display": false }
            },
            "scales": {
                "y": { "beginAtZero": true }
            }
        }
    })
}

/// Encode the chart description as a GET request against the render service.
pub fn chart_url(base: &str, chart: &Value, config: &ChartConfig) -> Result<Url, ChartError> {
    let payload = serde_json::to_string(chart)?;
    let width = config.width.to_string();
    let height = config.height.to_string();

    Url::parse_with_params(
        base,
        &[
            ("c", payload.as_str()),
            ("w", width.as_str()),
            ("h", height.as_str()),
            ("bkg", config.background.as_str()),
        ],
    )
    .map_err(|e| ChartError::InvalidUrl(format!("{}: {}", base, e)))
}

/// Client for the remote chart renderer.
pub struct ChartClient {
    config: ChartConfig,
    http_client: reqwest::Client,
    show_progress: bool,
}

impl ChartClient {
    pub fn new(config: ChartConfig, show_progress: bool) -> Result<Self, ChartError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            config,
            http_client,
            show_progress,
        })
    }

    /// Render the series and write the PNG to `path`.
    ///
    /// Makes a single request; there is no retry.
    pub async fn render_to_file(
        &self,
        series: &ChartSeries,
        path: &Path,
    ) -> Result<PathBuf, ChartError> {
        let chart = build_chart_config(series, &self.config);
        let url = chart_url(&self.config.url, &chart, &self.config)?;
        debug!("Chart request URL length: {}", url.as_str().len());

        let spinner = self.spinner();

        let response = self.http_client.get(url).send().await;
        if let Some(ref pb) = spinner {
            pb.finish_and_clear();
        }
        let response = response?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChartError::Status(status.as_u16()));
        }

        let bytes = response.bytes().await?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, &bytes).await?;

        info!("Chart saved to {} ({} bytes)", path.display(), bytes.len());
        Ok(path.to_path_buf())
    }

    fn spinner(&self) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }

        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message("Rendering chart...");
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    }
}

/// Render the chart, logging instead of failing.
///
/// Returns the written path on success, `None` when the series is empty or
/// the render failed.
pub async fn render_chart(
    client: &ChartClient,
    series: &ChartSeries,
    path: &Path,
) -> Option<PathBuf> {
    if series.is_empty() {
        warn!("No labeled records; skipping chart");
        return None;
    }

    match client.render_to_file(series, path).await {
        Ok(written) => Some(written),
        Err(e) => {
            warn!("Chart rendering failed: {}", e);
            println!("   ⚠️  Could not render chart: {}", e);
            None
        }
    }
}
