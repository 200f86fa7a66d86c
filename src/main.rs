//! HoaxDetect - fact-check post classifier
//!
//! Loads a semicolon-delimited export of fact-check posts, trains a
//! verdict classifier on the post text, evaluates it on a held-out split,
//! charts the label distribution and saves the model.
//!
//! Exit codes:
//!   0 - Success (a failed chart render does not change this)
//!   1 - Runtime error (missing input, malformed CSV, training or save failure)

mod analysis;
mod chart;
mod classifier;
mod cli;
mod config;
mod dataset;
mod models;
mod report;

use anyhow::{Context, Result};
use chrono::Utc;
use classifier::{Featurizer, NaiveBayesTrainer};
use cli::{Args, OutputFormat};
use config::{Config, CONFIG_FILE_NAME};
use models::{RunMetadata, RunReport, SamplePrediction};
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse_args();

    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    if args.init_config {
        return handle_init_config();
    }

    init_logging(&args);

    info!("HoaxDetect v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run_pipeline(args).await {
        error!("Run failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .hoaxdetect.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", CONFIG_FILE_NAME);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}

/// Run load → aggregate → train → evaluate → predict → chart → save.
async fn run_pipeline(args: Args) -> Result<()> {
    let start_time = Instant::now();

    let mut config = load_config(&args)?;
    config.merge_with_args(&args);
    config.validate()?;

    // Step 1: Load the dataset
    println!("📥 Loading dataset: {}", config.paths.data.display());
    let records = dataset::load_records(&config.paths.data, &config.dataset)?;
    info!("Loaded {} records", records.len());

    // Step 2: Label distribution
    let distribution = analysis::aggregate(&records);
    println!("\n🏷️  Label distribution:");
    for lc in &distribution {
        println!("   {:<20} {}", lc.label, lc.count);
    }

    // Step 3: Train
    let examples = dataset::training_examples(&records);
    let split = dataset::train_test_split(
        examples,
        config.training.test_fraction,
        config.training.seed,
    );
    println!(
        "\n🧠 Training classifier ({} train / {} test)...",
        split.train.len(),
        split.test.len()
    );

    let trainer = NaiveBayesTrainer::new(
        config.training.alpha,
        Featurizer::new(config.training.use_bigrams),
    )
    .with_progress(!args.quiet);
    let model = trainer
        .fit(&split.train)
        .context("Failed to train classifier")?;

    // Step 4: Evaluate
    let metrics = classifier::evaluate(&model, &split.test);
    println!("\n📊 Evaluation:");
    if metrics.test_count == 0 {
        println!("   No held-out examples; evaluation skipped.");
    } else {
        println!("   MicroAccuracy: {:.4}", metrics.micro_accuracy);
        println!("   MacroAccuracy: {:.4}", metrics.macro_accuracy);
        println!("   LogLoss:       {:.4}", metrics.log_loss);
    }

    // Step 5: Sample prediction
    let sample_text = config.training.sample_text.clone();
    let prediction = model.predict(&sample_text);
    println!("\n🔮 Sample prediction:");
    println!("   Text:       {}", sample_text);
    let sample = SamplePrediction {
        text: sample_text,
        labels: model.labels.clone(),
        prediction,
    };
    println!(
        "   Prediction: {} ({:.1}%)",
        sample.prediction.label,
        sample.prediction.confidence() * 100.0
    );
    for (label, score) in sample.ranked_scores() {
        println!("     {:<20} {:.4}", label, score);
    }

    // Step 6: Chart (non-fatal)
    let chart_path = if config.chart.enabled {
        println!("\n📈 Rendering label distribution chart...");
        match chart::ChartClient::new(config.chart.clone(), !args.quiet) {
            Ok(client) => {
                let series = analysis::chart_series(&distribution);
                chart::render_chart(&client, &series, &config.paths.chart).await
            }
            Err(e) => {
                warn!("Could not create chart client: {}", e);
                None
            }
        }
    } else {
        debug!("Chart rendering disabled");
        None
    };

    // Step 7: Save the model
    classifier::save_model(&model, &config.paths.model)?;
    let reloaded = classifier::load_model(&config.paths.model)?;
    if reloaded.labels != model.labels {
        anyhow::bail!(
            "Saved model at {} does not match the trained model",
            config.paths.model.display()
        );
    }
    debug!(
        "Model verified: {} labels, {} features",
        reloaded.labels.len(),
        reloaded.vocabulary_size()
    );

    // Step 8: Summary report
    let report = RunReport {
        metadata: RunMetadata {
            data_path: config.paths.data.display().to_string(),
            run_date: Utc::now(),
            records_loaded: records.len(),
            train_count: split.train.len(),
            model_path: config.paths.model.display().to_string(),
            chart_path: chart_path.map(|p| p.display().to_string()),
            duration_seconds: start_time.elapsed().as_secs_f64(),
        },
        label_distribution: distribution,
        metrics,
        sample,
    };

    let output = match args.format {
        OutputFormat::Json => report::generate_json_report(&report)?,
        OutputFormat::Markdown => report::generate_markdown_report(&report),
    };
    report::write_report(&config.paths.report, &output)?;

    println!("\n✅ Done!");
    println!("   Model:  {}", config.paths.model.display());
    if let Some(ref chart) = report.metadata.chart_path {
        println!("   Chart:  {}", chart);
    }
    println!("   Report: {}", config.paths.report.display());
    println!("   Duration: {:.1}s", report.metadata.duration_seconds);

    Ok(())
}
