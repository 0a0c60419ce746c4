//! Types command - list document types and their fields.

use clap::Args;
use console::style;
use serde::Serialize;

use docent_core::{fields_for, DocumentType};

/// Arguments for the types command.
#[derive(Args)]
pub struct TypesArgs {
    /// Print as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct TypeEntry {
    label: &'static str,
    fields: &'static [&'static str],
    #[serde(skip_serializing_if = "Option::is_none")]
    alias_of: Option<&'static str>,
}

fn entries() -> Vec<TypeEntry> {
    DocumentType::ALL
        .iter()
        .map(|&doc_type| TypeEntry {
            label: doc_type.label(),
            fields: fields_for(doc_type),
            alias_of: doc_type
                .is_auto_detect()
                .then(|| doc_type.resolve().label()),
        })
        .collect()
}

pub fn run(args: TypesArgs) -> anyhow::Result<()> {
    let entries = entries();

    if args.json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    for entry in &entries {
        match entry.alias_of {
            Some(target) => println!(
                "{} {}",
                style(entry.label).bold(),
                style(format!("(uses {} fields)", target)).dim()
            ),
            None => println!("{}", style(entry.label).bold()),
        }
        for field in entry.fields {
            println!("  - {}", field);
        }
        println!();
    }

    Ok(())
}
