/// Auto-detection of report formats.
///
/// Strategy:
///   1. Check the file extension for strong hints
///   2. Peek at the first bytes of the content
///   3. Fall back to the CLI --format override (handled by caller)
use std::path::Path;

use crate::error::CovgateError;

/// Supported input formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Line-record text coverage (LCOV-style).
    Lcov,
    /// Hierarchical XML coverage (JaCoCo-style).
    Jacoco,
    /// Structured mutation XML (PIT-style).
    MutationXml,
    /// Line-oriented mutation tool transcript.
    MutationLog,
}

impl Format {
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Lcov => "lcov",
            Format::Jacoco => "jacoco",
            Format::MutationXml => "mutation-xml",
            Format::MutationLog => "mutation-log",
        }
    }

    /// Whether this format produces a line-coverage report.
    pub fn is_coverage(&self) -> bool {
        matches!(self, Format::Lcov | Format::Jacoco)
    }

    /// Whether this format produces a mutation report.
    pub fn is_mutation(&self) -> bool {
        !self.is_coverage()
    }
}

impl std::str::FromStr for Format {
    type Err = CovgateError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "lcov" => Ok(Format::Lcov),
            "jacoco" => Ok(Format::Jacoco),
            "mutation-xml" => Ok(Format::MutationXml),
            "mutation-log" => Ok(Format::MutationLog),
            _ => Err(CovgateError::Parse(format!(
                "Unknown format: '{}'. Supported: lcov, jacoco, mutation-xml, mutation-log",
                s
            ))),
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Detect the report format from filename and content.
pub fn detect_format(path: &Path, content: &[u8]) -> Option<Format> {
    if let Some(fmt) = detect_by_extension(path) {
        return Some(fmt);
    }
    detect_by_content(content)
}

fn detect_by_extension(path: &Path) -> Option<Format> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    match ext.as_str() {
        "info" | "lcov" => Some(Format::Lcov),
        // xml could be coverage or mutation, and log/txt could be lcov
        // or a transcript; both need content inspection.
        _ => None,
    }
}

fn detect_by_content(content: &[u8]) -> Option<Format> {
    // The first few KB are enough to tell the formats apart.
    let head_len = content.len().min(4096);
    let head = String::from_utf8_lossy(&content[..head_len]);

    // Line-record text: lines actually starting with the record tags, to
    // avoid false positives on files that merely contain these strings.
    let has_sf = head.lines().any(|l| l.starts_with("SF:"));
    let has_da = head.lines().any(|l| l.starts_with("DA:"));
    if has_sf && has_da {
        return Some(Format::Lcov);
    }

    // Mutation transcript: the fixed ">> Line" outcome marker.
    if head.lines().any(|l| l.starts_with(">> Line ")) {
        return Some(Format::MutationLog);
    }

    // XML-based formats, told apart by their root element.
    if head.contains("<?xml") || head.trim_start().starts_with('<') {
        if head.contains("<mutations") || head.contains("<mutation ") {
            return Some(Format::MutationXml);
        }
        if head.contains("<report") {
            return Some(Format::Jacoco);
        }
    }

    None
}
