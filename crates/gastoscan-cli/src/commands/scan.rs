//! Scan command - extract expense fields from a single receipt.

use std::path::{Path, PathBuf};

use clap::Args;
use console::style;
use serde::Serialize;
use tokio::io::AsyncReadExt;
use tracing::{debug, info};

use gastoscan_core::extract::rules::format_euro_amount;
use gastoscan_core::models::config::{GastoscanConfig, OutputConfig};
use gastoscan_core::{
    ExpenseDraft, ExtractionResult, ReceiptExtractor, ReceiptParser, ReviewPolicy, ReviewStatus,
};

use super::load_config;

/// Arguments for the scan command.
#[derive(Args)]
pub struct ScanArgs {
    /// OCR text file (reads stdin when omitted or "-")
    input: Option<PathBuf>,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Show extraction confidence
    #[arg(long)]
    show_confidence: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

/// Extraction plus the draft the review policy made of it.
#[derive(Serialize)]
struct ScanReport<'a> {
    extraction: &'a ExtractionResult,
    draft: &'a ExpenseDraft,
}

pub async fn run(args: ScanArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;

    let text = read_input(args.input.as_deref()).await?;
    info!("Scanning {} bytes of OCR text", text.len());

    let result = ReceiptExtractor::new().parse(&text);
    let draft = ReviewPolicy::from(&config.review).review(&result);

    let output = format_receipt(&result, &draft, args.format, &config)?;

    if let Some(output_path) = &args.output {
        tokio::fs::write(output_path, &output).await?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    if args.show_confidence {
        eprintln!(
            "{} Extraction confidence: {}% ({})",
            style("ℹ").blue(),
            result.confidence(),
            result.confidence_level().label()
        );
    }

    Ok(())
}

async fn read_input(input: Option<&Path>) -> anyhow::Result<String> {
    match input {
        Some(path) if path != Path::new("-") => {
            if !path.exists() {
                anyhow::bail!("Input file not found: {}", path.display());
            }
            debug!("Reading OCR text from {}", path.display());
            Ok(tokio::fs::read_to_string(path).await?)
        }
        _ => {
            debug!("Reading OCR text from stdin");
            let mut text = String::new();
            tokio::io::stdin().read_to_string(&mut text).await?;
            Ok(text)
        }
    }
}

/// Render one receipt in the requested format.
pub fn format_receipt(
    result: &ExtractionResult,
    draft: &ExpenseDraft,
    format: OutputFormat,
    config: &GastoscanConfig,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => format_json(result, draft, &config.output),
        OutputFormat::Csv => format_csv(result, draft),
        OutputFormat::Text => Ok(format_text(result, draft)),
    }
}

fn format_json(
    result: &ExtractionResult,
    draft: &ExpenseDraft,
    output: &OutputConfig,
) -> anyhow::Result<String> {
    let mut json = serde_json::to_value(ScanReport {
        extraction: result,
        draft,
    })?;

    if !output.include_raw_text {
        if let Some(extraction) = json.get_mut("extraction").and_then(|e| e.as_object_mut()) {
            extraction.remove("rawText");
        }
    }

    if output.pretty_json {
        Ok(serde_json::to_string_pretty(&json)?)
    } else {
        Ok(serde_json::to_string(&json)?)
    }
}

fn format_csv(result: &ExtractionResult, draft: &ExpenseDraft) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "amount",
        "date",
        "merchant",
        "category",
        "description",
        "confidence",
        "status",
    ])?;

    wtr.write_record(&[
        draft.amount.map(|a| a.to_string()).unwrap_or_default(),
        draft.date.map(|d| d.to_string()).unwrap_or_default(),
        result.merchant().unwrap_or_default().to_string(),
        draft.category.map(|c| c.to_string()).unwrap_or_default(),
        draft.description.clone(),
        draft.confidence.to_string(),
        status_label(draft).to_string(),
    ])?;

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(result: &ExtractionResult, draft: &ExpenseDraft) -> String {
    let mut output = String::new();

    output.push_str(&format!("Description: {}\n", draft.description));
    match draft.amount {
        Some(amount) => output.push_str(&format!("Amount:      {}\n", format_euro_amount(amount))),
        None => output.push_str("Amount:      -\n"),
    }
    match draft.date {
        Some(date) => output.push_str(&format!("Date:        {}\n", date.format("%d/%m/%Y"))),
        None => output.push_str("Date:        -\n"),
    }
    match draft.category {
        Some(category) => output.push_str(&format!("Category:    {}\n", category)),
        None => output.push_str("Category:    -\n"),
    }
    output.push('\n');

    output.push_str(&format!(
        "Confidence:  {}% ({})\n",
        result.confidence(),
        result.confidence_level().label()
    ));
    output.push_str(&format!("Status:      {}\n", status_label(draft)));

    output
}

/// Short name of a draft's review status.
pub fn status_label(draft: &ExpenseDraft) -> &'static str {
    match draft.status {
        ReviewStatus::PendingReview => "pending_review",
        ReviewStatus::Approved => "approved",
        ReviewStatus::Skipped => "skipped",
    }
}
