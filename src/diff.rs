/// Parse a unified diff to extract which lines were added in each file,
/// producing the [`DiffSelection`] set the diff-coverage calculator
/// consumes.
///
/// Also provides a [`DiffSource`] trait abstracting over where the diff
/// text comes from (stdin, a file, a git invocation).
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::Command;

use anyhow::{Context, Result};

use crate::diffcov::DiffSelection;

// ---------------------------------------------------------------------------
// Diff sources
// ---------------------------------------------------------------------------

/// A source for obtaining a unified diff.
pub trait DiffSource {
    /// Fetch the diff text.
    fn fetch_diff(&self) -> Result<String>;
}

/// Diff from stdin.
pub struct StdinDiff;

impl DiffSource for StdinDiff {
    fn fetch_diff(&self) -> Result<String> {
        std::io::read_to_string(std::io::stdin()).context("Failed to read diff from stdin")
    }
}

/// Diff from a file on disk.
pub struct FileDiff {
    pub path: PathBuf,
}

impl DiffSource for FileDiff {
    fn fetch_diff(&self) -> Result<String> {
        std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read diff from {}", self.path.display()))
    }
}

/// Diff from a git command (e.g., `git diff HEAD~1`).
pub struct GitDiff {
    /// Arguments to pass to `git diff`.
    pub args: String,
}

impl DiffSource for GitDiff {
    fn fetch_diff(&self) -> Result<String> {
        let diff_args: Vec<&str> = self.args.split_whitespace().collect();
        let output = Command::new("git")
            .arg("diff")
            .args(&diff_args)
            .output()
            .context("Failed to run git diff")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("git diff failed: {stderr}");
        }

        String::from_utf8(output.stdout).context("git diff output not valid UTF-8")
    }
}

// ---------------------------------------------------------------------------
// Diff parsing
// ---------------------------------------------------------------------------

/// Parse a unified diff (e.g., `git diff`) and return a map of
/// file path -> added line numbers (in the new file).
pub fn parse_diff(diff_text: &str) -> BTreeMap<String, Vec<u32>> {
    let mut result: BTreeMap<String, Vec<u32>> = BTreeMap::new();
    let mut current_file: Option<String> = None;
    let mut new_line_number: u32 = 0;

    for line in diff_text.lines() {
        if let Some(rest) = line.strip_prefix("+++ ") {
            if rest == "/dev/null" {
                current_file = None; // file was deleted
            } else {
                // Strip the VCS prefix ("b/" for git, "a/" for some
                // tools); --no-prefix diffs have none.
                let path = rest
                    .strip_prefix("b/")
                    .or_else(|| rest.strip_prefix("a/"))
                    .unwrap_or(rest);
                current_file = Some(path.to_string());
            }
        } else if line.starts_with("@@ ") {
            if let Some(new_start) = parse_hunk_header(line) {
                new_line_number = new_start;
            }
        } else if let Some(ref file) = current_file {
            if line.starts_with('\\') {
                // "\ No newline at end of file" — metadata, not a line
            } else if line.starts_with('+') && !line.starts_with("+++") {
                result
                    .entry(file.clone())
                    .or_default()
                    .push(new_line_number);
                new_line_number += 1;
            } else if line.starts_with('-') && !line.starts_with("---") {
                // deleted line — doesn't advance the new-file counter
            } else {
                new_line_number += 1;
            }
        }
    }

    result
}

/// Parse the "new" start line from a hunk header like "@@ -10,5 +20,8 @@".
fn parse_hunk_header(line: &str) -> Option<u32> {
    let after_at = line.strip_prefix("@@ ")?;
    let new_part = after_at
        .split(' ')
        .nth(1)?
        .strip_prefix('+')?;
    new_part.split(',').next()?.parse::<u32>().ok()
}

/// Prepend a path prefix to every file in a parsed diff.
pub fn apply_path_prefix(
    diff_lines: BTreeMap<String, Vec<u32>>,
    prefix: &str,
) -> BTreeMap<String, Vec<u32>> {
    let prefix = prefix.trim_end_matches('/');
    diff_lines
        .into_iter()
        .map(|(path, lines)| (format!("{prefix}/{path}"), lines))
        .collect()
}

/// Convert a parsed diff into the selection set the calculator consumes.
pub fn to_selections(diff_lines: BTreeMap<String, Vec<u32>>) -> Vec<DiffSelection> {
    diff_lines
        .into_iter()
        .map(|(file, lines)| DiffSelection::new(file, lines))
        .collect()
}
