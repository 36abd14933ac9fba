//! Compare command - extract both documents and score their fields.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use doccmp_core::compare::{ComparisonReport, MissingValuePolicy};
use doccmp_core::pipeline::ComparisonPipeline;

use super::{OutputFormat, RequestArgs, build_source, load_config, write_output};

/// Arguments for the compare command.
#[derive(Args)]
pub struct CompareArgs {
    /// First document (OCR dump as JSON, or an image when built with OCR support)
    #[arg(required = true)]
    first: PathBuf,

    /// Second document
    #[arg(required = true)]
    second: PathBuf,

    #[command(flatten)]
    request: RequestArgs,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// OCR model directory
    #[arg(short, long)]
    model_dir: Option<PathBuf>,

    /// Override how fields that were not found are scored
    #[arg(long, value_enum)]
    missing_values: Option<MissingValuesArg>,

    /// Exit with an error when the match percentage is below this value
    #[arg(long)]
    fail_under: Option<f64>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum MissingValuesArg {
    /// Score not-found values as the literal string "N/A"
    Literal,
    /// Leave fields with a not-found value out of the mean
    Exclude,
}

impl From<MissingValuesArg> for MissingValuePolicy {
    fn from(arg: MissingValuesArg) -> Self {
        match arg {
            MissingValuesArg::Literal => MissingValuePolicy::Literal,
            MissingValuesArg::Exclude => MissingValuePolicy::Exclude,
        }
    }
}

pub async fn run(args: CompareArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let mut config = load_config(config_path)?;
    if let Some(policy) = args.missing_values {
        config.comparison.missing_values = policy.into();
    }

    let request = Arc::new(args.request.resolve(&config)?);

    for input in [&args.first, &args.second] {
        if !input.exists() {
            anyhow::bail!("Input file not found: {}", input.display());
        }
    }

    info!(
        "Comparing {} and {} on [{}]",
        args.first.display(),
        args.second.display(),
        request
    );

    let source = build_source(&config, args.model_dir.as_deref())?;
    let pipeline = Arc::new(ComparisonPipeline::new(source, &config));

    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.set_message("Extracting fields from both documents...");
    pb.enable_steady_tick(Duration::from_millis(100));

    // The two extraction passes share nothing mutable and run in parallel.
    let first = {
        let (pipeline, request, path) = (pipeline.clone(), request.clone(), args.first.clone());
        tokio::task::spawn_blocking(move || pipeline.extract(&path, &request))
    };
    let second = {
        let (pipeline, request, path) = (pipeline.clone(), request.clone(), args.second.clone());
        tokio::task::spawn_blocking(move || pipeline.extract(&path, &request))
    };

    let (values1, values2) = tokio::try_join!(first, second)?;
    pb.finish_and_clear();

    let report = pipeline
        .comparator()
        .compare(&values1?, &values2?)
        .stamped(Utc::now());

    let output = format_report(&report, args.format)?;
    write_output(&output, args.output.as_deref())?;

    debug!("Total processing time: {:?}", start.elapsed());

    if let Some(minimum) = args.fail_under {
        if report.match_percentage < minimum {
            anyhow::bail!(
                "Match percentage {:.2}% is below the required {:.2}%",
                report.match_percentage,
                minimum
            );
        }
    }

    Ok(())
}

fn format_report(report: &ComparisonReport, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Csv => format_csv(report),
        OutputFormat::Text => Ok(format_text(report)),
    }
}

fn format_csv(report: &ComparisonReport) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["field", "doc1", "doc2", "score"])?;

    for field in &report.fields {
        let score = field.score.map(|s| format!("{:.2}", s)).unwrap_or_default();
        wtr.write_record([&field.field, &field.doc1, &field.doc2, &score])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(report: &ComparisonReport) -> String {
    let mut output = String::new();

    for field in &report.fields {
        let score = match field.score {
            Some(s) if s >= 90.0 => style(format!("{:>6.2}", s)).green(),
            Some(s) if s >= 60.0 => style(format!("{:>6.2}", s)).yellow(),
            Some(s) => style(format!("{:>6.2}", s)).red(),
            None => style(format!("{:>6}", "-")).dim(),
        };

        output.push_str(&format!("{} {}\n", score, style(&field.field).bold()));
        output.push_str(&format!("       doc1: {}\n", field.doc1));
        output.push_str(&format!("       doc2: {}\n", field.doc2));
    }

    output.push('\n');
    output.push_str(&format!(
        "Match: {:.2}% ({} of {} fields scored)\n",
        report.match_percentage,
        report.scored_fields,
        report.fields.len()
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use doccmp_core::compare::DocumentComparator;
    use doccmp_core::fields::FieldValueMap;

    fn report() -> ComparisonReport {
        let doc1: FieldValueMap = vec![
            ("name of work", Some("Bridge Phase 2".to_string())),
            ("est. value", None),
        ]
        .into_iter()
        .collect();
        let doc2 = doc1.clone();
        DocumentComparator::new().compare(&doc1, &doc2)
    }

    #[test]
    fn test_format_csv() {
        let csv = format_csv(&report()).unwrap();
        assert_eq!(
            csv,
            "field,doc1,doc2,score\nname of work,Bridge Phase 2,Bridge Phase 2,100.00\nest. value,N/A,N/A,100.00\n"
        );
    }

    #[test]
    fn test_format_text_summary() {
        let text = format_text(&report());
        assert!(text.contains("Match: 100.00% (2 of 2 fields scored)"));
        assert!(text.contains("doc2: N/A"));
    }

    #[test]
    fn test_format_csv_leaves_unscored_blank() {
        let doc1: FieldValueMap = vec![("est. value", None::<String>)].into_iter().collect();
        let doc2: FieldValueMap = vec![("est. value", Some("Rs. 10".to_string()))]
            .into_iter()
            .collect();
        let report = DocumentComparator::new()
            .with_missing_values(MissingValuePolicy::Exclude)
            .compare(&doc1, &doc2);

        let csv = format_csv(&report).unwrap();
        assert_eq!(csv, "field,doc1,doc2,score\nest. value,N/A,Rs. 10,\n");
    }
}
