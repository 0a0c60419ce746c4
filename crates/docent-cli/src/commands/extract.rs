//! Extract command - pull entities out of a single document.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::debug;

use docent_vision::create_provider;

use super::config::load_config;
use super::{
    open_history, resolve_api_key, resolve_document_type, resolve_provider, save_to_history,
};
use crate::pipeline::{check_input, extract_file, FileExtraction, OutputFormat};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input document (png, jpg, jpeg, pdf, bmp, gif)
    #[arg(required = true)]
    input: PathBuf,

    /// Document type (Auto-detect, Invoice, Receipt, Email, General Document)
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

    /// Output file or directory (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Do not record this extraction in history
    #[arg(long)]
    no_history: bool,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    check_input(&args.input)?;

    let provider_kind = resolve_provider(args.provider.as_deref(), &config)?;
    let document_type = resolve_document_type(args.document_type.as_deref(), &config);
    let api_key = resolve_api_key(args.api_key, provider_kind)?;
    let provider = create_provider(
        provider_kind,
        &api_key,
        args.model.as_deref(),
        &config.provider,
    )?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message(format!(
        "Extracting entities with {} ({})...",
        provider.provider().display_name(),
        provider.model()
    ));
    pb.enable_steady_tick(Duration::from_millis(100));

    let extraction = extract_file(
        &args.input,
        document_type,
        provider.as_ref(),
        config.extraction.jpeg_quality,
    )
    .await;
    pb.finish_and_clear();
    let extraction = extraction?;

    if !extraction.result.is_success() {
        if let Some(error) = &extraction.error {
            eprintln!("{} {}", style("✗").red(), error);
        }
        anyhow::bail!("Failed to extract entities. Please try again.");
    }

    write_output(&extraction, args.output.as_deref(), args.format)?;

    let history = open_history(&config, args.no_history);
    save_to_history(&extraction, history.as_ref());

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn write_output(
    extraction: &FileExtraction,
    output: Option<&Path>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let content = extraction.render(format)?;

    let Some(output) = output else {
        println!("{}", content);
        return Ok(());
    };

    let output_path = output_path(extraction, output, format);
    fs::write(&output_path, content)?;

    println!(
        "{} Output written to {}",
        style("✓").green(),
        output_path.display()
    );

    Ok(())
}

/// Where `-o` output goes: a directory gets the default download name.
fn output_path(extraction: &FileExtraction, output: &Path, format: OutputFormat) -> PathBuf {
    if output.is_dir() {
        output.join(extraction.output_name(format))
    } else {
        output.to_path_buf()
    }
}
