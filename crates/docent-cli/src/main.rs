//! CLI for extracting named entities from document images with vision LLMs.

mod commands;
mod history;
mod pipeline;

use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{batch, config, extract, history as history_cmd, prompt, types};

/// Docent - extract key entities from invoices, receipts, emails and other documents
#[derive(Parser)]
#[command(name = "docent")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract entities from a single document
    Extract(extract::ExtractArgs),

    /// Extract entities from multiple documents
    Batch(batch::BatchArgs),

    /// List document types and the fields extracted for each
    Types(types::TypesArgs),

    /// Print the prompt sent for a document type
    Prompt(prompt::PromptArgs),

    /// Browse past extractions
    History(history_cmd::HistoryArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // API keys may live in a local .env file
    dotenvy::dotenv().ok();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config_path = cli.config.as_deref();
    match cli.command {
        Commands::Extract(args) => extract::run(args, config_path).await,
        Commands::Batch(args) => batch::run(args, config_path).await,
        Commands::Types(args) => types::run(args),
        Commands::Prompt(args) => prompt::run(args, config_path),
        Commands::History(args) => history_cmd::run(args, config_path),
        Commands::Config(args) => config::run(args, config_path).await,
    }
}
