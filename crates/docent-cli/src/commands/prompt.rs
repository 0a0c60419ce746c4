//! Prompt command - show the instruction text sent to the provider.

use clap::Args;

use super::config::load_config;
use super::resolve_document_type;
use docent_core::build_prompt;

/// Arguments for the prompt command.
#[derive(Args)]
pub struct PromptArgs {
    /// Document type (default: configured default type)
    #[arg(short = 't', long = "type")]
    document_type: Option<String>,
}

pub fn run(args: PromptArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let document_type = resolve_document_type(args.document_type.as_deref(), &config);

    print!("{}", build_prompt(document_type));

    Ok(())
}
