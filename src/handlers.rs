//! Request orchestration for the CLI: multi-root aggregation, diff-mode
//! aggregation, and size estimation.
//!
//! Roots are scanned as sibling tasks and each outcome is collected
//! individually, so one root's fatal error never cancels the scans still
//! in flight.

use crate::cli::Cli;
use crate::diff::{build_args, parse, DiffInvoker, DiffMode, HunkLineMap};
use crate::error::{RepocatError, Result};
use crate::generator::{DocumentBuilder, ScannedRoot};
use crate::scanner::tree::{DirectoryNode, ScanOptions};
use crate::scanner::{DirectoryScanner, Estimate, SizeEstimator};
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tokio::task::JoinSet;
use tracing::{debug, warn};

/// Result of scanning one root, labeled with the root it came from.
pub struct RootOutcome {
    pub root: PathBuf,
    pub result: Result<DirectoryNode>,
}

/// Scan all roots concurrently, gathering settled per-root results in
/// input order.
pub async fn scan_roots(roots: &[PathBuf], options: &ScanOptions) -> Vec<RootOutcome> {
    let mut set = JoinSet::new();
    for (index, root) in roots.iter().enumerate() {
        let scanner = DirectoryScanner::new(options.clone());
        let root = root.clone();
        set.spawn(async move {
            let result = scanner.scan(&root).await;
            (index, root, result)
        });
    }

    let mut slots: Vec<Option<RootOutcome>> = roots.iter().map(|_| None).collect();
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((index, root, result)) => slots[index] = Some(RootOutcome { root, result }),
            Err(err) => warn!(error = %err, "scan task failed to complete"),
        }
    }

    slots
        .into_iter()
        .zip(roots)
        .map(|(slot, root)| {
            slot.unwrap_or_else(|| RootOutcome {
                root: root.clone(),
                result: Err(RepocatError::Internal("scan task panicked".to_string())),
            })
        })
        .collect()
}

/// Labels for the top-level document groups: directory names, falling back
/// to the full path when two roots share a name.
fn root_labels(roots: &[PathBuf]) -> Vec<String> {
    let short: Vec<String> = roots
        .iter()
        .map(|root| {
            root.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| root.display().to_string())
        })
        .collect();

    short
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let duplicated = short
                .iter()
                .enumerate()
                .any(|(j, other)| i != j && other == label);
            if duplicated {
                roots[i].display().to_string()
            } else {
                label.clone()
            }
        })
        .collect()
}

/// Normal mode: scan every root and assemble the document.
pub async fn run_aggregate(cli: &Cli) -> ExitCode {
    let options = cli.scan_options();
    let outcomes = scan_roots(&cli.roots, &options).await;
    let labels = root_labels(&cli.roots);

    let mut scanned = Vec::new();
    let mut failures = 0usize;
    for (outcome, label) in outcomes.into_iter().zip(labels) {
        match outcome.result {
            Ok(tree) => scanned.push(ScannedRoot { label, tree }),
            Err(err) => {
                failures += 1;
                eprintln!("repocat: {}: {err}", outcome.root.display());
            }
        }
    }

    if scanned.is_empty() {
        return ExitCode::from(2);
    }

    let document = DocumentBuilder::new(cli.format)
        .with_prefix(cli.prefix.clone())
        .with_yaml_content(cli.yaml_content)
        .build(&scanned);

    if let Err(err) = emit(cli, &document) {
        eprintln!("repocat: {err}");
        return ExitCode::from(2);
    }

    if failures > 0 {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}

/// Diff mode: restrict the document to files touched by the diff, and
/// optionally to their changed lines.
pub async fn run_diff(cli: &Cli) -> ExitCode {
    if cli.roots.len() > 1 {
        warn!("diff mode uses the first root only; ignoring the rest");
    }
    let root = &cli.roots[0];

    match aggregate_diff(cli, root).await {
        Ok(document) => {
            if let Err(err) = emit(cli, &document) {
                eprintln!("repocat: {err}");
                return ExitCode::from(2);
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("repocat: {}", diff_remediation(&err));
            ExitCode::from(2)
        }
    }
}

async fn aggregate_diff(cli: &Cli, root: &Path) -> Result<String> {
    let invoker = DiffInvoker::new();
    let range = cli.range.as_deref();

    let name_args = build_args(DiffMode::NameOnly, range)?;
    let changed = invoker.run_lines(root, &name_args)?;
    debug!(files = changed.len(), "diff touched files");

    let line_map: HunkLineMap = if cli.diff_lines {
        let unified_args = build_args(DiffMode::Unified0, range)?;
        parse(&invoker.run(root, &unified_args)?)
    } else {
        HunkLineMap::new()
    };

    let allowed: HashSet<PathBuf> = changed.iter().map(PathBuf::from).collect();
    let scanner = DirectoryScanner::new(cli.scan_options());
    let mut tree = scanner.scan_restricted(root, &allowed).await?;
    if !line_map.is_empty() {
        tree.annotate_changed_lines(&line_map);
    }

    let label = root_labels(std::slice::from_ref(&root.to_path_buf()))
        .pop()
        .unwrap_or_else(|| root.display().to_string());
    let scanned = vec![ScannedRoot { label, tree }];

    Ok(DocumentBuilder::new(cli.format)
        .with_prefix(cli.prefix.clone())
        .with_yaml_content(cli.yaml_content)
        .build(&scanned))
}

/// Actionable message per diff failure kind.
fn diff_remediation(err: &RepocatError) -> String {
    match err {
        RepocatError::InvalidRangeToken { .. } => {
            format!("{err}. Range tokens may only contain revision characters.")
        }
        RepocatError::NotARepository(_) => {
            format!("{err}. Run diff mode inside a git work tree.")
        }
        RepocatError::ToolNotFound => {
            format!("{err}. Install git or add it to PATH.")
        }
        RepocatError::ProcessError { .. } => {
            format!("{err}. Check that the range names existing revisions.")
        }
        other => other.to_string(),
    }
}

#[derive(Serialize)]
struct EstimateReport {
    root: String,
    #[serde(flatten)]
    estimate: Estimate,
}

/// Estimate mode: per-root metrics without materializing content.
pub async fn run_estimate(cli: &Cli) -> ExitCode {
    let options = cli.scan_options();
    let mut reports = Vec::new();
    let mut failures = 0usize;

    for root in &cli.roots {
        match SizeEstimator::new(options.clone()).estimate(root).await {
            Ok(estimate) => reports.push(EstimateReport {
                root: root.display().to_string(),
                estimate,
            }),
            Err(err) => {
                failures += 1;
                eprintln!("repocat: {}: {err}", root.display());
            }
        }
    }

    if reports.is_empty() {
        return ExitCode::from(2);
    }

    if cli.json {
        match serde_json::to_string_pretty(&reports) {
            Ok(json) => println!("{json}"),
            Err(err) => {
                eprintln!("repocat: {err}");
                return ExitCode::from(2);
            }
        }
    } else {
        for report in &reports {
            println!(
                "{}: {} files, {}, ~{} tokens",
                report.root,
                report.estimate.file_count,
                crate::generator::format_size(report.estimate.total_bytes),
                report.estimate.estimated_tokens
            );
        }
    }

    if failures > 0 {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}

fn emit(cli: &Cli, document: &str) -> Result<()> {
    match &cli.output {
        Some(path) => std::fs::write(path, document)
            .map_err(|err| RepocatError::write_error(path.clone(), err)),
        None => {
            print!("{document}");
            Ok(())
        }
    }
}
