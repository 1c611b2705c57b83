//! Batch command - extract expense fields from many OCR text files.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tracing::{debug, error, warn};

use gastoscan_core::{
    ExpenseDraft, ExtractionResult, ReceiptExtractor, ReceiptParser, ReviewPolicy, ReviewStatus,
};

use super::load_config;
use super::scan::{format_receipt, status_label, OutputFormat};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Glob pattern matching OCR text files (e.g. "receipts/*.txt")
    #[arg(required = true)]
    input: String,

    /// Output directory for per-file results
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Keep going when a file cannot be read (blank files are not errors;
    /// they produce an empty, skipped draft)
    #[arg(long)]
    continue_on_error: bool,
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    outcome: Result<(ExtractionResult, ExpenseDraft), String>,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();
    let config = load_config(config_path)?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| {
            let ext = p.extension().and_then(|e| e.to_str()).unwrap_or("");
            ext.eq_ignore_ascii_case("txt")
        })
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        tokio::fs::create_dir_all(output_dir).await?;
    }

    let pb = ProgressBar::new(files.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let extractor = Arc::new(ReceiptExtractor::new());
    let policy = Arc::new(ReviewPolicy::from(&config.review));
    let semaphore = Arc::new(Semaphore::new(args.jobs.max(1)));

    let mut handles = Vec::with_capacity(files.len());
    for path in files {
        let extractor = Arc::clone(&extractor);
        let policy = Arc::clone(&policy);
        let semaphore = Arc::clone(&semaphore);
        let pb = pb.clone();

        handles.push(tokio::spawn(async move {
            let _permit = semaphore.acquire_owned().await?;
            let file_start = Instant::now();

            let outcome = process_single_file(&path, extractor)
                .await
                .map(|result| {
                    let draft = policy.review(&result);
                    (result, draft)
                })
                .map_err(|e| e.to_string());

            pb.inc(1);
            anyhow::Ok(ProcessResult {
                path,
                outcome,
                processing_time_ms: file_start.elapsed().as_millis() as u64,
            })
        }));
    }

    // Join in input order so outputs and summary are deterministic
    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        let result = handle.await??;

        if let Err(error_msg) = &result.outcome {
            if args.continue_on_error {
                warn!("Failed to process {}: {}", result.path.display(), error_msg);
            } else {
                error!("Failed to process {}: {}", result.path.display(), error_msg);
                pb.abandon();
                anyhow::bail!("Processing failed: {}", error_msg);
            }
        }

        results.push(result);
    }

    pb.finish_and_clear();

    if let Some(output_dir) = &args.output_dir {
        let mut used_names = HashSet::new();
        for result in &results {
            let Ok((extraction, draft)) = &result.outcome else {
                continue;
            };

            let output_name = output_file_name(&result.path, args.format.extension(), &mut used_names);
            let output_path = output_dir.join(output_name);

            let content = format_receipt(extraction, draft, args.format, &config)?;
            tokio::fs::write(&output_path, content).await?;
            debug!("Wrote output to {}", output_path.display());
        }
    }

    if args.summary {
        let summary_path = args
            .output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    let drafts: Vec<&ExpenseDraft> = results
        .iter()
        .filter_map(|r| r.outcome.as_ref().ok().map(|(_, draft)| draft))
        .collect();
    let count = |status: ReviewStatus| drafts.iter().filter(|d| d.status == status).count();
    let failed: Vec<&ProcessResult> = results.iter().filter(|r| r.outcome.is_err()).collect();

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} approved, {} pending review, {} skipped, {} failed",
        style(count(ReviewStatus::Approved)).green(),
        style(count(ReviewStatus::PendingReview)).yellow(),
        style(count(ReviewStatus::Skipped)).dim(),
        style(failed.len()).red()
    );

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            if let Err(error_msg) = &result.outcome {
                println!("  - {}: {}", result.path.display(), error_msg);
            }
        }
    }

    Ok(())
}

async fn process_single_file(
    path: &Path,
    extractor: Arc<ReceiptExtractor>,
) -> anyhow::Result<ExtractionResult> {
    let text = tokio::fs::read_to_string(path).await?;
    if text.trim().is_empty() {
        debug!("{} has no text", path.display());
    }

    let result = tokio::task::spawn_blocking(move || extractor.parse(&text)).await?;
    Ok(result)
}

/// Output file name for one input, numbered when an earlier input with the
/// same stem (e.g. `a/x.txt` and `b/x.txt`) already took it.
fn output_file_name(path: &Path, extension: &str, used: &mut HashSet<String>) -> String {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("receipt");

    let mut name = format!("{}.{}", stem, extension);
    let mut n = 2;
    while used.contains(&name) {
        name = format!("{}-{}.{}", stem, n, extension);
        n += 1;
    }

    used.insert(name.clone());
    name
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "amount",
        "date",
        "merchant",
        "category",
        "confidence",
        "review",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result
            .path
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_string();

        let record = match &result.outcome {
            Ok((extraction, draft)) => [
                filename,
                "success".to_string(),
                draft.amount.map(|a| a.to_string()).unwrap_or_default(),
                draft.date.map(|d| d.to_string()).unwrap_or_default(),
                extraction.merchant().unwrap_or_default().to_string(),
                draft.category.map(|c| c.to_string()).unwrap_or_default(),
                extraction.confidence().to_string(),
                status_label(draft).to_string(),
                result.processing_time_ms.to_string(),
                String::new(),
            ],
            Err(error_msg) => [
                filename,
                "error".to_string(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                String::new(),
                result.processing_time_ms.to_string(),
                error_msg.clone(),
            ],
        };

        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_process_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ticket.txt");
        std::fs::write(&path, "LIDL\nTotal 4,20 €").unwrap();

        let result = process_single_file(&path, Arc::new(ReceiptExtractor::new()))
            .await
            .unwrap();
        assert_eq!(result.merchant(), Some("Lidl"));
        assert_eq!(result.confidence(), 70);
    }

    #[tokio::test]
    async fn test_process_blank_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blank.txt");
        std::fs::write(&path, "  \n ").unwrap();

        let result = process_single_file(&path, Arc::new(ReceiptExtractor::new()))
            .await
            .unwrap();
        assert!(result.is_empty());
        assert_eq!(ReviewPolicy::new().review(&result).status, ReviewStatus::Skipped);
    }

    #[tokio::test]
    async fn test_process_unreadable_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("binary.txt");
        std::fs::write(&path, [0xff, 0xfe, 0x00]).unwrap();

        assert!(process_single_file(&path, Arc::new(ReceiptExtractor::new()))
            .await
            .is_err());
    }

    #[test]
    fn test_output_file_names_do_not_collide() {
        let mut used = HashSet::new();

        assert_eq!(output_file_name(Path::new("a/x.txt"), "json", &mut used), "x.json");
        assert_eq!(output_file_name(Path::new("b/x.txt"), "json", &mut used), "x-2.json");
        assert_eq!(output_file_name(Path::new("b/y.txt"), "json", &mut used), "y.json");
        assert_eq!(output_file_name(Path::new("c/x-2.txt"), "json", &mut used), "x-2-2.json");
        assert_eq!(output_file_name(Path::new("c/x.txt"), "json", &mut used), "x-3.json");
    }

    #[test]
    fn test_write_summary() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("summary.csv");

        let extraction = gastoscan_core::extract("ZARA 15-03-2024 Total: 29,95 €");
        let draft = ReviewPolicy::new().review(&extraction);
        let results = vec![
            ProcessResult {
                path: PathBuf::from("a.txt"),
                outcome: Ok((extraction, draft)),
                processing_time_ms: 1,
            },
            ProcessResult {
                path: PathBuf::from("b.txt"),
                outcome: Err("stream did not contain valid UTF-8".to_string()),
                processing_time_ms: 0,
            },
        ];

        write_summary(&path, &results).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1], "a.txt,success,29.95,2024-03-15,Zara,Ropa,100,pending_review,1,");
        assert_eq!(lines[2], "b.txt,error,,,,,,,0,stream did not contain valid UTF-8");
    }
}
