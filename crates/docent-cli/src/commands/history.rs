//! History command - browse and prune past extractions.

use clap::{Args, Subcommand};
use console::style;

use docent_core::{DocentConfig, ExtractionRecord};

use super::config::load_config;
use crate::history::{default_database_path, HistoryStore};

/// Arguments for the history command.
#[derive(Args)]
pub struct HistoryArgs {
    #[command(subcommand)]
    command: HistoryCommand,
}

#[derive(Subcommand)]
enum HistoryCommand {
    /// List recent extractions
    List {
        /// Maximum number of entries
        #[arg(short = 'n', long, default_value = "20")]
        limit: usize,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one extraction in full
    Show {
        /// Extraction id
        id: i64,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete an extraction
    Delete {
        /// Extraction id
        id: i64,
    },
}

pub fn run(args: HistoryArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let store = open_store(&config)?;

    match args.command {
        HistoryCommand::List { limit, json } => list(&store, limit, json),
        HistoryCommand::Show { id, json } => show(&store, id, json),
        HistoryCommand::Delete { id } => delete(&store, id),
    }
}

fn open_store(config: &DocentConfig) -> anyhow::Result<HistoryStore> {
    let path = config
        .history
        .database_path
        .clone()
        .unwrap_or_else(default_database_path);
    HistoryStore::open(&path)
}

fn list(store: &HistoryStore, limit: usize, json: bool) -> anyhow::Result<()> {
    let records = store.list(limit)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    if records.is_empty() {
        println!("{} No extractions recorded yet.", style("ℹ").blue());
        return Ok(());
    }

    for record in &records {
        println!("{}", summary_line(record));
    }

    Ok(())
}

fn summary_line(record: &ExtractionRecord) -> String {
    format!(
        "{:>5}  {}  {:<16}  {}  ({}, {})",
        record.id.map(|id| id.to_string()).unwrap_or_default(),
        record.created_at.get(..19).unwrap_or(record.created_at.as_str()),
        record.document_type,
        record.filename,
        record.provider,
        record.model
    )
}

fn show(store: &HistoryStore, id: i64, json: bool) -> anyhow::Result<()> {
    let Some(record) = store.get(id)? else {
        anyhow::bail!("No extraction with id {}", id);
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
        return Ok(());
    }

    println!("{} {}", style("File:").bold(), record.filename);
    println!("{} {}", style("Type:").bold(), record.document_type);
    println!(
        "{} {} ({})",
        style("Provider:").bold(),
        record.provider,
        record.model
    );
    println!("{} {}", style("Created:").bold(), record.created_at);
    println!();
    println!("{}", record.extracted_text);

    Ok(())
}

fn delete(store: &HistoryStore, id: i64) -> anyhow::Result<()> {
    if !store.delete(id)? {
        anyhow::bail!("No extraction with id {}", id);
    }
    println!("{} Deleted extraction {}", style("✓").green(), id);
    Ok(())
}
