//! Extract command - pull the requested fields out of one document.

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use doccmp_core::fields::{FieldExtractor, FieldMatcher, FieldRequest, FieldValueMap, NOT_FOUND};
use doccmp_core::ocr::TextFragment;

use super::{OutputFormat, RequestArgs, build_source, load_config, write_output};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input file (OCR dump as JSON, or an image when built with OCR support)
    #[arg(required = true)]
    input: PathBuf,

    #[command(flatten)]
    request: RequestArgs,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// OCR model directory
    #[arg(short, long)]
    model_dir: Option<PathBuf>,

    /// Show which fragment was taken as each field's label
    #[arg(long)]
    explain: bool,
}

pub async fn run(args: ExtractArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;
    let request = args.request.resolve(&config)?;

    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Extracting [{}] from {}", request, args.input.display());

    let source = build_source(&config, args.model_dir.as_deref())?;
    let fragments = source.fragments(&args.input)?;

    let extractor = FieldExtractor::with_matcher(FieldMatcher::from_config(&config.matching));
    let values = extractor.extract(&fragments, &request);

    if args.explain {
        explain(&extractor, &fragments, &request);
    }

    let output = format_values(&values, args.format)?;
    write_output(&output, args.output.as_deref())?;

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

fn explain(extractor: &FieldExtractor, fragments: &[TextFragment], request: &FieldRequest) {
    for name in request.iter() {
        match extractor.matcher().find_label(fragments, name) {
            Some(label) => eprintln!(
                "{} {}: label {:?} at #{} (score {:.1})",
                style("ℹ").blue(),
                name,
                fragments[label.index].text,
                label.index,
                label.score
            ),
            None => eprintln!(
                "{} {}: no fragment scored above {}",
                style("ℹ").yellow(),
                name,
                extractor.matcher().threshold()
            ),
        }
    }
}

fn format_values(values: &FieldValueMap, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(values)?),
        OutputFormat::Csv => {
            let mut wtr = csv::Writer::from_writer(vec![]);
            wtr.write_record(["field", "value"])?;
            for (name, value) in values.iter() {
                wtr.write_record([name, value.unwrap_or(NOT_FOUND)])?;
            }
            Ok(String::from_utf8(wtr.into_inner()?)?)
        }
        OutputFormat::Text => {
            let mut output = String::new();
            for (name, value) in values.iter() {
                output.push_str(&format!("{}: {}\n", name, value.unwrap_or(NOT_FOUND)));
            }
            Ok(output)
        }
    }
}
