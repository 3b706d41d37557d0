//! Output formatting for diff coverage results and gate verdicts.

use std::fmt::Write;

use chrono::{DateTime, Utc};

use crate::diffcov::DiffCoverageSummary;
use crate::gate::{GateOutcome, GateVerdict, Severity};

/// Coalesce sorted line numbers into `(start, end)` ranges of consecutive
/// lines.
#[must_use]
pub fn coalesce_ranges(lines: &[u32]) -> Vec<(u32, u32)> {
    if lines.is_empty() {
        return Vec::new();
    }

    let mut ranges: Vec<(u32, u32)> = Vec::new();
    let mut start = lines[0];
    let mut end = lines[0];

    for &line in &lines[1..] {
        if line == end + 1 {
            end = line;
        } else {
            ranges.push((start, end));
            start = line;
            end = line;
        }
    }

    ranges.push((start, end));
    ranges
}

/// Format line numbers into compact range notation, e.g. "1, 3-5, 8".
///
/// The input slice must be sorted in ascending order.
#[must_use]
pub fn format_line_ranges(lines: &[u32]) -> String {
    coalesce_ranges(lines)
        .iter()
        .map(|&(start, end)| {
            if start == end {
                start.to_string()
            } else {
                format!("{start}-{end}")
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Trait for rendering engine results for humans.
pub trait ReportFormatter {
    /// Render a diff-coverage summary.
    fn diff_coverage(&self, summary: &DiffCoverageSummary) -> String;

    /// Render a gate verdict.
    fn verdict(&self, verdict: &GateVerdict, evaluated_at: DateTime<Utc>) -> String;
}

/// Plain text formatter.
pub struct TextFormatter;

impl ReportFormatter for TextFormatter {
    fn diff_coverage(&self, summary: &DiffCoverageSummary) -> String {
        let mut out = String::new();

        if summary.lines_in_diff == 0 {
            out.push_str("No changed lines to cover.\n");
            return out;
        }

        writeln!(
            out,
            "Diff coverage: {:.1}% ({}/{} lines covered)",
            summary.pct, summary.lines_covered, summary.lines_in_diff
        )
        .unwrap();

        let files_with_misses: Vec<_> = summary
            .files
            .iter()
            .filter(|f| !f.missed_lines.is_empty())
            .collect();
        if !files_with_misses.is_empty() {
            out.push('\n');
            for f in files_with_misses {
                writeln!(
                    out,
                    "  {}  {}/{} ({:.1}%)  missed: {}",
                    f.file,
                    f.lines_covered,
                    f.lines_in_diff,
                    f.pct,
                    format_line_ranges(&f.missed_lines),
                )
                .unwrap();
            }
        }

        out
    }

    fn verdict(&self, verdict: &GateVerdict, evaluated_at: DateTime<Utc>) -> String {
        let mut out = String::new();

        let outcome = match verdict.outcome() {
            GateOutcome::Pass => "PASS",
            GateOutcome::Warn => "WARN",
            GateOutcome::Fail => "FAIL",
        };
        writeln!(
            out,
            "Quality gate: {outcome} (evaluated {})",
            evaluated_at.format("%Y-%m-%d %H:%M:%S UTC")
        )
        .unwrap();

        for v in &verdict.violations {
            let tag = match v.severity {
                Severity::Blocking => "FAIL",
                Severity::Warning => "WARN",
            };
            writeln!(
                out,
                "  [{tag}] {}: {} (threshold {:.1}, actual {:.1})",
                v.gate_name, v.message, v.threshold_value, v.actual_value
            )
            .unwrap();
            for step in &v.remediation {
                writeln!(out, "         - {step}").unwrap();
            }
        }

        out
    }
}

/// Markdown formatter, suitable for CI summaries and PR comments.
pub struct MarkdownFormatter;

impl ReportFormatter for MarkdownFormatter {
    fn diff_coverage(&self, summary: &DiffCoverageSummary) -> String {
        let mut md = String::new();

        writeln!(md, "### Diff Coverage: {:.1}%\n", summary.pct).unwrap();

        if summary.lines_in_diff == 0 {
            md.push_str("No changed lines to cover.\n");
            return md;
        }

        writeln!(
            md,
            "**{}** of **{}** changed lines covered\n",
            summary.lines_covered, summary.lines_in_diff
        )
        .unwrap();

        let files_with_misses: Vec<_> = summary
            .files
            .iter()
            .filter(|f| !f.missed_lines.is_empty())
            .collect();

        if files_with_misses.is_empty() {
            md.push_str("All changed lines are covered.\n");
        } else {
            md.push_str("| File | Covered | Missed lines |\n");
            md.push_str("|:-----|--------:|:-------------|\n");
            for f in &files_with_misses {
                writeln!(
                    md,
                    "| `{}` | {}/{} | {} |",
                    f.file,
                    f.lines_covered,
                    f.lines_in_diff,
                    format_line_ranges(&f.missed_lines)
                )
                .unwrap();
            }
        }

        md
    }

    fn verdict(&self, verdict: &GateVerdict, evaluated_at: DateTime<Utc>) -> String {
        let mut md = String::new();

        let heading = match verdict.outcome() {
            GateOutcome::Pass => "Quality Gate: PASS ✅",
            GateOutcome::Warn => "Quality Gate: WARN ⚠️",
            GateOutcome::Fail => "Quality Gate: FAIL ❌",
        };
        writeln!(md, "### {heading}\n").unwrap();

        if verdict.violations.is_empty() {
            md.push_str("All configured gates passed.\n");
        } else {
            md.push_str("| Gate | Severity | Threshold | Actual |\n");
            md.push_str("|:-----|:---------|----------:|-------:|\n");
            for v in &verdict.violations {
                let severity = match v.severity {
                    Severity::Blocking => "blocking",
                    Severity::Warning => "warning",
                };
                writeln!(
                    md,
                    "| {} | {severity} | {:.1} | {:.1} |",
                    v.gate_name, v.threshold_value, v.actual_value
                )
                .unwrap();
            }

            md.push_str("\n<details>\n<summary>Remediation</summary>\n\n");
            for v in &verdict.violations {
                if v.remediation.is_empty() {
                    continue;
                }
                writeln!(md, "**{}**", v.gate_name).unwrap();
                for step in &v.remediation {
                    writeln!(md, "- {step}").unwrap();
                }
                md.push('\n');
            }
            md.push_str("</details>\n");
        }

        writeln!(
            md,
            "\n<sub>Evaluated {}</sub>",
            evaluated_at.format("%Y-%m-%d %H:%M UTC")
        )
        .unwrap();

        md
    }
}
