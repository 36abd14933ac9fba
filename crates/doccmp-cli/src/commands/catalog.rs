//! Catalog command - list configured document types and their fields.

use clap::Args;
use console::style;

use doccmp_core::models::catalog::FieldCatalog;

use super::{OutputFormat, load_config};

/// Arguments for the catalog command.
#[derive(Args)]
pub struct CatalogArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

pub async fn run(args: CatalogArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    println!("{}", format_catalog(&config.catalog, args.format)?);
    Ok(())
}

fn format_catalog(catalog: &FieldCatalog, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(catalog)?),
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(vec![]);
            wtr.write_record(["stage", "category", "doc_type", "fields"])?;
            for entry in catalog.entries() {
                wtr.write_record([&entry.stage, &entry.category, &entry.doc_type, &entry.fields])?;
            }
            Ok(String::from_utf8(wtr.into_inner()?)?)
        }
        OutputFormat::Text => {
            if catalog.entries().is_empty() {
                return Ok(format!("{} No document types configured.", style("ℹ").blue()));
            }

            let mut output = String::new();
            for entry in catalog.entries() {
                output.push_str(&format!(
                    "{} / {} / {}\n    {}\n",
                    entry.stage, entry.category, entry.doc_type, entry.fields
                ));
            }
            Ok(output)
        }
    }
}
