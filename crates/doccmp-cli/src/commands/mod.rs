//! Subcommands and the helpers they share.

pub mod catalog;
pub mod compare;
pub mod config;
pub mod extract;

use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use console::style;
use tracing::{debug, warn};

use doccmp_core::fields::FieldRequest;
use doccmp_core::models::config::DoccmpConfig;
use doccmp_core::ocr::{AutoSource, FragmentSource};

/// Output format shared by every command.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

/// How the fields to extract are chosen.
#[derive(Args, Debug)]
pub struct RequestArgs {
    /// Comma-separated field list, e.g. "Name of Work, Est. Value"
    #[arg(long, conflicts_with_all = ["stage", "category", "doc_type"])]
    fields: Option<String>,

    /// Workflow stage used for the catalog lookup
    #[arg(long)]
    stage: Option<String>,

    /// Document type category used for the catalog lookup
    #[arg(long)]
    category: Option<String>,

    /// Document type used for the catalog lookup
    #[arg(long = "doc-type")]
    doc_type: Option<String>,
}

impl RequestArgs {
    /// Resolve the field request from the flags or the catalog.
    pub fn resolve(&self, config: &DoccmpConfig) -> anyhow::Result<FieldRequest> {
        match (&self.fields, &self.stage, &self.category, &self.doc_type) {
            (Some(fields), _, _, _) => Ok(FieldRequest::parse(fields)?),
            (None, Some(stage), Some(category), Some(doc_type)) => {
                Ok(config.catalog.request_for(stage, category, doc_type)?)
            }
            _ => anyhow::bail!(
                "Specify --fields, or all of --stage, --category and --doc-type"
            ),
        }
    }
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("doccmp")
        .join("config.json")
}

/// Load the configuration from `--config`, the default path, or defaults.
pub fn load_config(config_path: Option<&str>) -> anyhow::Result<DoccmpConfig> {
    if let Some(path) = config_path {
        return Ok(DoccmpConfig::from_file(Path::new(path))?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Using config from {}", default_path.display());
        Ok(DoccmpConfig::from_file(&default_path)?)
    } else {
        Ok(DoccmpConfig::default())
    }
}

/// Build the fragment source. The OCR engine, when compiled in, is loaded once here.
pub fn build_source(
    config: &DoccmpConfig,
    model_dir: Option<&Path>,
) -> anyhow::Result<Box<dyn FragmentSource>> {
    let mut ocr = config.ocr.clone();
    if let Some(dir) = model_dir {
        ocr.model_dir = dir.to_path_buf();
    }

    #[cfg(feature = "ocr")]
    {
        use doccmp_core::ocr::OcrImageSource;

        if OcrImageSource::models_present(&ocr) {
            let engine = OcrImageSource::from_config(ocr)?;
            return Ok(Box::new(AutoSource::new().with_engine(engine)));
        }
    }

    warn_images_unsupported(&ocr.model_dir);
    Ok(Box::new(AutoSource::new()))
}

fn warn_images_unsupported(model_dir: &Path) {
    if cfg!(feature = "ocr") {
        warn!(
            "OCR models not found at {}, only JSON OCR dumps can be read",
            model_dir.display()
        );
    } else {
        debug!("Built without the ocr feature, only JSON OCR dumps can be read");
    }
}

/// Write to `output` or print to stdout.
pub fn write_output(output: &str, path: Option<&Path>) -> anyhow::Result<()> {
    if let Some(path) = path {
        fs::write(path, output)?;
        println!("{} Output written to {}", style("✓").green(), path.display());
    } else {
        println!("{}", output);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(fields: Option<&str>, triple: Option<(&str, &str, &str)>) -> RequestArgs {
        RequestArgs {
            fields: fields.map(str::to_string),
            stage: triple.map(|t| t.0.to_string()),
            category: triple.map(|t| t.1.to_string()),
            doc_type: triple.map(|t| t.2.to_string()),
        }
    }

    #[test]
    fn test_resolve_explicit_fields() {
        let request = args(Some("Name of Work"), None)
            .resolve(&DoccmpConfig::default())
            .unwrap();
        assert_eq!(request.names(), ["name of work"]);
    }

    #[test]
    fn test_resolve_from_catalog() {
        let triple = ("Technical Sanction", "For Migration", "Technical Sanction copy");
        let request = args(None, Some(triple))
            .resolve(&DoccmpConfig::default())
            .unwrap();
        assert_eq!(request.len(), 2);
    }

    #[test]
    fn test_resolve_unknown_document_type() {
        let err = args(None, Some(("a", "b", "c")))
            .resolve(&DoccmpConfig::default())
            .unwrap_err();
        assert!(err.to_string().contains("unsupported document type"));
    }

    #[test]
    fn test_resolve_requires_a_selection() {
        assert!(args(None, None).resolve(&DoccmpConfig::default()).is_err());
    }
}
