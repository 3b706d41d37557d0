//! Uniform in-memory representation of line coverage, independent of any
//! specific report format. Parsers produce a [`CoverageReport`] which is
//! consumed by the diff-coverage calculator and the quality-gate evaluator.

use std::collections::BTreeMap;

use serde::Serialize;

/// Compute a percentage, returning 0.0 when the total is zero.
#[must_use]
pub fn pct(covered: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        covered as f64 / total as f64 * 100.0
    }
}

/// A single instrumentable line and its hit count.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineRecord {
    pub line: u32,
    pub hits: u64,
    pub covered: bool,
}

impl LineRecord {
    #[must_use]
    pub fn new(line: u32, hits: u64) -> Self {
        Self {
            line,
            hits,
            covered: hits > 0,
        }
    }
}

/// Coverage data for a single source file, keyed by the path exactly as it
/// appeared in the source report.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileCoverage {
    pub path: String,
    pub lines: Vec<LineRecord>,
    pub total_lines: u64,
    pub covered_lines: u64,
    pub coverage_pct: f64,
}

impl FileCoverage {
    #[must_use]
    pub fn new(path: String) -> Self {
        Self {
            path,
            ..Default::default()
        }
    }

    /// Sort records by line number and recompute the counts. Called once
    /// when parsing completes; the value is read-only afterwards.
    pub(crate) fn finalize(&mut self) {
        self.lines.sort_by_key(|l| l.line);
        self.total_lines = self.lines.len() as u64;
        self.covered_lines = self.lines.iter().filter(|l| l.covered).count() as u64;
        self.coverage_pct = pct(self.covered_lines, self.total_lines);
    }
}

/// The complete result of parsing a single coverage report.
///
/// Files are keyed by their raw report path. A `BTreeMap` keeps iteration
/// deterministic, which the path reconciler's basename and suffix
/// strategies rely on.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageReport {
    pub files_by_path: BTreeMap<String, FileCoverage>,
    pub total_lines: u64,
    pub covered_lines: u64,
    pub coverage_pct: f64,
}

impl CoverageReport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parsed file block. When the same path was already seen (the
    /// line-record text format may re-open a file in a later block), the
    /// records are concatenated onto the existing entry. Overlapping line
    /// numbers across blocks are kept as-is.
    pub(crate) fn add_file(&mut self, file: FileCoverage) {
        match self.files_by_path.get_mut(&file.path) {
            Some(existing) => existing.lines.extend(file.lines),
            None => {
                self.files_by_path.insert(file.path.clone(), file);
            }
        }
    }

    /// Finalize every file and recompute the aggregate counts. The
    /// aggregate percentage is the ratio of the summed counts, not a mean
    /// of per-file percentages.
    pub(crate) fn finalize(&mut self) {
        self.total_lines = 0;
        self.covered_lines = 0;
        for file in self.files_by_path.values_mut() {
            file.finalize();
            self.total_lines += file.total_lines;
            self.covered_lines += file.covered_lines;
        }
        self.coverage_pct = pct(self.covered_lines, self.total_lines);
    }

    /// Look up a file by its raw report path.
    #[must_use]
    pub fn file(&self, path: &str) -> Option<&FileCoverage> {
        self.files_by_path.get(path)
    }
}
