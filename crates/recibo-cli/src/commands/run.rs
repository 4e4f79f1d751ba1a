//! Run command - process a batch of receipt files.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use recibo_core::models::ReciboConfig;
use recibo_core::parse::OpenAiParser;
use recibo_core::pipeline::ProgressSink;
use recibo_core::{DocumentExtractor, Pipeline};

/// Arguments for the run command.
#[derive(Args)]
pub struct RunArgs {
    /// Input files or glob pattern (defaults to the configured input folder)
    input: Option<String>,

    /// Destination folder for processed receipts (defaults to the configured
    /// output folder)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// CSV ledger path (defaults to the configured log folder)
    #[arg(short, long)]
    ledger: Option<PathBuf>,

    /// Override the model used for field parsing
    #[arg(short, long)]
    model: Option<String>,

    /// Override the OCR model directory
    #[arg(long)]
    model_dir: Option<PathBuf>,
}

/// Renders pipeline progress lines without clobbering the spinner.
struct ConsoleSink {
    bar: ProgressBar,
}

impl ProgressSink for ConsoleSink {
    fn info(&self, message: &str) {
        self.bar.println(format!("{} {}", style("ℹ").blue(), message));
    }

    fn warning(&self, message: &str) {
        self.bar.println(format!("{} {}", style("⚠").yellow(), message));
    }

    fn error(&self, message: &str) {
        self.bar.println(format!("{} {}", style("✗").red(), message));
    }
}

pub async fn run(args: RunArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    // Load configuration
    let mut config = if let Some(path) = config_path {
        ReciboConfig::from_file(std::path::Path::new(path))?
    } else {
        ReciboConfig::default()
    };

    if let Some(model) = args.model {
        config.parser.model = model;
    }
    if let Some(model_dir) = args.model_dir {
        config.models.model_dir = model_dir;
    }

    let pattern = args.input.unwrap_or_else(|| {
        config
            .folders
            .input_folder
            .join("*")
            .to_string_lossy()
            .to_string()
    });
    let output_dir = args
        .output_dir
        .unwrap_or_else(|| config.folders.output_folder.clone());

    // Expand glob pattern; every matched file gets a ledger row, including
    // unsupported formats, which the pipeline routes to the error bucket.
    let files: Vec<PathBuf> = glob(&pattern)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            if p.is_dir() {
                debug!("Skipping directory {}", p.display());
                return false;
            }
            true
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", pattern);
    }

    let api_key = std::env::var("OPENAI_API_KEY").map_err(|_| {
        anyhow::anyhow!(
            "OPENAI_API_KEY is not set. Export it or add it to a .env file \
             in the working directory."
        )
    })?;

    let ledger_path = args.ledger.unwrap_or_else(|| config.ledger_path());

    let extractor = DocumentExtractor::new(config.models.clone());
    let parser = OpenAiParser::new(&config.parser, api_key)?;
    let pipeline = Pipeline::new(extractor, parser);

    let bar = ProgressBar::new_spinner();
    bar.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap(),
    );
    bar.enable_steady_tick(std::time::Duration::from_millis(100));
    bar.set_message("Processing receipts...");

    let sink = ConsoleSink { bar: bar.clone() };
    let summary = pipeline
        .run(&files, &output_dir, &ledger_path, &sink)
        .await?;

    bar.finish_and_clear();

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        summary.processed,
        start.elapsed()
    );
    println!(
        "   {} successful, {} missing data, {} errored",
        style(summary.succeeded).green(),
        style(summary.failed).yellow(),
        style(summary.errored).red()
    );

    if summary.critical > 0 {
        println!();
        println!(
            "{} {} file(s) hit CRITICAL errors and were left in place. \
             Review the ledger at {} before deleting any originals.",
            style("✗").red(),
            summary.critical,
            ledger_path.display()
        );
    }

    Ok(())
}
