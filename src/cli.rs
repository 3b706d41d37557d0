//! Command handler functions for the covgate CLI.
//!
//! Each `cmd_*` function returns its output as a `String`, making them easy
//! to test without capturing stdout.

use std::fmt::Write;
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::Utc;
use clap::ValueEnum;

use crate::diff;
use crate::diffcov;
use crate::gate::{self, GateMetrics, GateOutcome, ThresholdSet};
use crate::ingest;
use crate::report::{MarkdownFormatter, ReportFormatter, TextFormatter};

/// Output style for rendered results.
#[derive(Clone, Copy, ValueEnum)]
pub enum Style {
    Text,
    Markdown,
    Json,
}

fn formatter(style: Style) -> Box<dyn ReportFormatter> {
    match style {
        Style::Markdown => Box::new(MarkdownFormatter),
        _ => Box::new(TextFormatter),
    }
}

pub fn cmd_summary(file: &Path, format: Option<&str>, style: Style) -> Result<String> {
    let (report, detected) = ingest::load_coverage(file, format)?;

    if let Style::Json = style {
        return Ok(serde_json::to_string_pretty(&report)? + "\n");
    }

    let mut out = String::new();
    writeln!(out, "Format:     {detected}").unwrap();
    writeln!(out, "Files:      {}", report.files_by_path.len()).unwrap();
    writeln!(
        out,
        "Lines:      {}/{} ({:.1}%)",
        report.covered_lines, report.total_lines, report.coverage_pct
    )
    .unwrap();
    Ok(out)
}

pub fn cmd_mutation(file: &Path, format: Option<&str>, style: Style) -> Result<String> {
    let (report, detected) = ingest::load_mutation(file, format)?;

    if let Style::Json = style {
        return Ok(serde_json::to_string_pretty(&report)? + "\n");
    }

    let t = report.totals;
    let mut out = String::new();
    writeln!(out, "Format:     {detected}").unwrap();
    writeln!(out, "Mutants:    {}", t.total).unwrap();
    writeln!(out, "Killed:     {}", t.killed).unwrap();
    writeln!(out, "Survived:   {}", t.survived).unwrap();
    writeln!(out, "No cover:   {}", t.no_coverage).unwrap();
    writeln!(out, "Timeout:    {}", t.timeout).unwrap();
    writeln!(out, "Mem error:  {}", t.memory_error).unwrap();
    writeln!(out, "Score:      {:.1}%", report.score).unwrap();

    let survivors: Vec<_> = report.surviving().collect();
    if !survivors.is_empty() {
        out.push('\n');
        writeln!(out, "Surviving mutants:").unwrap();
        for m in survivors {
            if m.source_file.is_empty() {
                writeln!(out, "  line {}: {}", m.line, m.mutator_kind).unwrap();
            } else {
                writeln!(out, "  {}:{}: {}", m.source_file, m.line, m.mutator_kind).unwrap();
            }
        }
    }
    Ok(out)
}

pub fn cmd_diff_coverage(
    coverage_file: &Path,
    format: Option<&str>,
    diff_text: &str,
    path_prefix: Option<&str>,
    style: Style,
) -> Result<String> {
    let (report, _) = ingest::load_coverage(coverage_file, format)?;

    let mut diff_lines = diff::parse_diff(diff_text);
    if let Some(prefix) = path_prefix {
        diff_lines = diff::apply_path_prefix(diff_lines, prefix);
    }
    let selections = diff::to_selections(diff_lines);
    let summary = diffcov::compute(&report, &selections);

    if let Style::Json = style {
        return Ok(serde_json::to_string_pretty(&summary)? + "\n");
    }
    Ok(formatter(style).diff_coverage(&summary))
}

/// Inputs for the `gate` command, assembled by the argument parser.
#[derive(Default)]
pub struct GateOptions {
    pub coverage: Option<PathBuf>,
    pub coverage_format: Option<String>,
    pub mutation: Option<PathBuf>,
    pub mutation_format: Option<String>,
    pub diff_text: Option<String>,
    pub path_prefix: Option<String>,
    pub critical_paths_covered: Option<bool>,
    pub thresholds: ThresholdSet,
    pub warn_thresholds: ThresholdSet,
}

pub fn cmd_gate(options: &GateOptions, style: Style) -> Result<(String, GateOutcome)> {
    let mut metrics = GateMetrics::new();
    let mut diff_summary = None;

    if let Some(path) = &options.coverage {
        let (report, _) = ingest::load_coverage(path, options.coverage_format.as_deref())?;
        metrics = metrics.with_coverage(&report);

        if let Some(diff_text) = &options.diff_text {
            let mut diff_lines = diff::parse_diff(diff_text);
            if let Some(prefix) = &options.path_prefix {
                diff_lines = diff::apply_path_prefix(diff_lines, prefix);
            }
            let selections = diff::to_selections(diff_lines);
            let summary = diffcov::compute(&report, &selections);
            metrics = metrics.with_diff_coverage(&summary);
            diff_summary = Some(summary);
        }
    }

    if let Some(path) = &options.mutation {
        let (report, _) = ingest::load_mutation(path, options.mutation_format.as_deref())?;
        metrics = metrics.with_mutation(&report);
    }

    metrics.critical_paths_covered = options.critical_paths_covered;

    let verdict = if options.warn_thresholds.is_empty() {
        gate::evaluate(&metrics, &options.thresholds)
    } else {
        gate::evaluate_with_warnings(&metrics, &options.thresholds, &options.warn_thresholds)
    };
    let outcome = verdict.outcome();

    if let Style::Json = style {
        let body = serde_json::json!({
            "verdict": verdict,
            "diffCoverage": diff_summary,
        });
        return Ok((serde_json::to_string_pretty(&body)? + "\n", outcome));
    }

    let formatter = formatter(style);
    let mut out = formatter.verdict(&verdict, Utc::now());
    if let Some(summary) = &diff_summary {
        out.push('\n');
        out.push_str(&formatter.diff_coverage(summary));
    }
    Ok((out, outcome))
}
