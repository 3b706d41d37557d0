//! Diff-scoped coverage: given the changed lines of each file and a parsed
//! coverage report, compute how many of the changed lines are covered.
//!
//! Files whose path cannot be reconciled against the report count as fully
//! uncovered; silently excluding them would let unmeasured code pass the
//! gate. Changed lines absent from the coverage data (not instrumented)
//! also count as uncovered.

use std::collections::{BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::model::{pct, CoverageReport};
use crate::paths;

/// The changed/added lines of one file, as derived from a version-control
/// diff by the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiffSelection {
    pub file: String,
    pub lines: BTreeSet<u32>,
}

impl DiffSelection {
    #[must_use]
    pub fn new(file: impl Into<String>, lines: impl IntoIterator<Item = u32>) -> Self {
        Self {
            file: file.into(),
            lines: lines.into_iter().collect(),
        }
    }
}

/// Diff coverage for one file.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffCoverageResult {
    pub file: String,
    pub lines_in_diff: u64,
    pub lines_covered: u64,
    /// 0 when `lines_in_diff` is 0.
    pub pct: f64,
    /// Changed lines that are not covered, sorted ascending.
    pub missed_lines: Vec<u32>,
}

/// Aggregate diff coverage across every file in the selection.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffCoverageSummary {
    pub files: Vec<DiffCoverageResult>,
    pub lines_in_diff: u64,
    pub lines_covered: u64,
    /// Computed from the summed counts, never a mean of per-file
    /// percentages. An empty selection yields 100 by convention: no
    /// changed lines means nothing to fail on.
    pub pct: f64,
}

/// Compute per-file and aggregate diff coverage for a set of selections.
#[must_use]
pub fn compute(report: &CoverageReport, selections: &[DiffSelection]) -> DiffCoverageSummary {
    let keys: Vec<&str> = report.files_by_path.keys().map(String::as_str).collect();

    let mut files = Vec::with_capacity(selections.len());
    let mut total_lines_in_diff: u64 = 0;
    let mut total_lines_covered: u64 = 0;

    for selection in selections {
        let result = match paths::resolve(&selection.file, &keys) {
            Some(resolution) => {
                let file = &report.files_by_path[&resolution.key];

                // Concatenated blocks may repeat a line number; a line is
                // covered if any record for it is covered.
                let mut covered_by_line: HashMap<u32, bool> = HashMap::new();
                for record in &file.lines {
                    *covered_by_line.entry(record.line).or_insert(false) |= record.covered;
                }

                let mut lines_covered = 0;
                let mut missed_lines = Vec::new();
                for &line in &selection.lines {
                    if covered_by_line.get(&line).copied().unwrap_or(false) {
                        lines_covered += 1;
                    } else {
                        missed_lines.push(line);
                    }
                }

                let lines_in_diff = selection.lines.len() as u64;
                DiffCoverageResult {
                    file: selection.file.clone(),
                    lines_in_diff,
                    lines_covered,
                    pct: pct(lines_covered, lines_in_diff),
                    missed_lines,
                }
            }
            None => DiffCoverageResult {
                file: selection.file.clone(),
                lines_in_diff: selection.lines.len() as u64,
                lines_covered: 0,
                pct: 0.0,
                missed_lines: selection.lines.iter().copied().collect(),
            },
        };

        total_lines_in_diff += result.lines_in_diff;
        total_lines_covered += result.lines_covered;
        files.push(result);
    }

    let aggregate_pct = if total_lines_in_diff == 0 {
        100.0
    } else {
        pct(total_lines_covered, total_lines_in_diff)
    };

    DiffCoverageSummary {
        files,
        lines_in_diff: total_lines_in_diff,
        lines_covered: total_lines_covered,
        pct: aggregate_pct,
    }
}
