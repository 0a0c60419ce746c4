//! Batch command - extract entities from many documents.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use futures_util::stream::{self, StreamExt};
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, error, warn};

use docent_core::is_supported_file;
use docent_vision::create_provider;

use super::config::load_config;
use super::{
    open_history, resolve_api_key, resolve_document_type, resolve_provider, save_to_history,
};
use crate::pipeline::{extract_file, FileExtraction, OutputFormat};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern matching input documents
    #[arg(required = true)]
    input: String,

    /// Output directory for per-file results
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Document type applied to every file
    #[arg(short = 't', long = "type")]
    document_type: Option<String>,

    /// Vision provider (openai, gemini)
    #[arg(short, long)]
    provider: Option<String>,

    /// Model name
    #[arg(short, long)]
    model: Option<String>,

    /// API key (default: OPENAI_API_KEY or GOOGLE_API_KEY)
    #[arg(short = 'k', long)]
    api_key: Option<String>,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of requests in flight
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,

    /// Do not record extractions in history
    #[arg(long)]
    no_history: bool,
}

/// Outcome for one matched file.
struct BatchEntry {
    path: PathBuf,
    extraction: Option<FileExtraction>,
    error: Option<String>,
}

impl BatchEntry {
    fn from_outcome(path: PathBuf, outcome: anyhow::Result<FileExtraction>) -> Self {
        match outcome {
            Ok(extraction) => {
                let error = if extraction.result.is_success() {
                    None
                } else {
                    Some(
                        extraction
                            .error
                            .clone()
                            .unwrap_or_else(|| "no text extracted".to_string()),
                    )
                };
                Self {
                    path,
                    extraction: Some(extraction),
                    error,
                }
            }
            Err(e) => Self {
                path,
                extraction: None,
                error: Some(e.to_string()),
            },
        }
    }

    fn filename(&self) -> &str {
        self.path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("")
    }
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let mut files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| is_supported_file(p))
        .collect();
    files.sort();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    let provider_kind = resolve_provider(args.provider.as_deref(), &config)?;
    let document_type = resolve_document_type(args.document_type.as_deref(), &config);
    let api_key = resolve_api_key(args.api_key.clone(), provider_kind)?;
    let provider = create_provider(
        provider_kind,
        &api_key,
        args.model.as_deref(),
        &config.provider,
    )?;
    let history = open_history(&config, args.no_history);

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let provider = provider.as_ref();
    let quality = config.extraction.jpeg_quality;
    let mut outcomes = stream::iter(files)
        .map(|path| async move {
            let outcome = extract_file(&path, document_type, provider, quality).await;
            (path, outcome)
        })
        .buffer_unordered(args.jobs.max(1));

    let mut entries = Vec::new();
    while let Some((path, outcome)) = outcomes.next().await {
        let entry = BatchEntry::from_outcome(path, outcome);
        overall_pb.inc(1);

        if let Some(error_msg) = &entry.error {
            if args.continue_on_error {
                warn!("Failed to process {}: {}", entry.path.display(), error_msg);
            } else {
                error!("Failed to process {}: {}", entry.path.display(), error_msg);
                overall_pb.abandon();
                anyhow::bail!("Processing failed for {}: {}", entry.path.display(), error_msg);
            }
        }

        if let Some(extraction) = &entry.extraction {
            save_to_history(extraction, history.as_ref());
            match &args.output_dir {
                Some(output_dir) if entry.error.is_none() => {
                    write_entry(extraction, output_dir, args.format)?;
                }
                _ => {}
            }
        }

        entries.push(entry);
    }

    overall_pb.finish_with_message("Complete");
    entries.sort_by(|a, b| a.path.cmp(&b.path));

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(fs::File::create(&summary_path)?, &entries)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let failed: Vec<_> = entries.iter().filter(|e| e.error.is_some()).collect();

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        entries.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} failed",
        style(entries.len() - failed.len()).green(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for entry in &failed {
            println!(
                "  - {}: {}",
                entry.path.display(),
                entry.error.as_deref().unwrap_or("unknown error")
            );
        }
    }

    Ok(())
}

fn write_entry(
    extraction: &FileExtraction,
    output_dir: &Path,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let output_path = output_dir.join(extraction.output_name(format));
    fs::write(&output_path, extraction.render(format)?)?;
    debug!("Wrote output to {}", output_path.display());
    Ok(())
}

fn write_summary<W: io::Write>(writer: W, entries: &[BatchEntry]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    wtr.write_record([
        "filename",
        "status",
        "document_type",
        "character_count",
        "word_count",
        "line_count",
        "processing_time_ms",
        "error",
    ])?;

    for entry in entries {
        let count = |value: Option<usize>| value.map(|v| v.to_string()).unwrap_or_default();

        match &entry.extraction {
            Some(extraction) => {
                let stats = extraction.result.stats();
                wtr.write_record([
                    entry.filename(),
                    stats.status.as_str(),
                    extraction.document_type.label(),
                    &count(stats.character_count()),
                    &count(stats.word_count()),
                    &count(stats.line_count()),
                    &extraction.processing_time_ms.to_string(),
                    entry.error.as_deref().unwrap_or(""),
                ])?;
            }
            None => {
                wtr.write_record([
                    entry.filename(),
                    "Error",
                    "",
                    "",
                    "",
                    "",
                    "",
                    entry.error.as_deref().unwrap_or(""),
                ])?;
            }
        }
    }

    wtr.flush()?;
    Ok(())
}
