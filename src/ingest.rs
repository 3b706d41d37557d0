use std::path::Path;

use crate::detect::{detect_format, Format};
use crate::error::{CovgateError, Result};
use crate::model::CoverageReport;
use crate::mutation::{self, MutationReport};
use crate::parsers::{jacoco, lcov};

/// Read a coverage report file, resolve its format (declared override or
/// auto-detection), and parse it. This is the only place the crate touches
/// the filesystem; the parsers themselves operate on in-memory bytes.
pub fn load_coverage(
    path: &Path,
    format_override: Option<&str>,
) -> Result<(CoverageReport, Format)> {
    let content = std::fs::read(path)?;
    let format = resolve_format(path, &content, format_override)?;
    let report = match format {
        Format::Lcov => lcov::parse(&content)?,
        Format::Jacoco => jacoco::parse(&content)?,
        other => {
            return Err(CovgateError::Parse(format!(
                "'{other}' is a mutation format, expected a line-coverage format"
            )))
        }
    };
    Ok((report, format))
}

/// Read a mutation report file, resolve its format, and parse it.
pub fn load_mutation(
    path: &Path,
    format_override: Option<&str>,
) -> Result<(MutationReport, Format)> {
    let content = std::fs::read(path)?;
    let format = resolve_format(path, &content, format_override)?;
    let report = match format {
        Format::MutationXml => mutation::xml::parse(&content)?,
        Format::MutationLog => mutation::transcript::parse(&String::from_utf8_lossy(&content))?,
        other => {
            return Err(CovgateError::Parse(format!(
                "'{other}' is a line-coverage format, expected a mutation format"
            )))
        }
    };
    Ok((report, format))
}

fn resolve_format(path: &Path, content: &[u8], format_override: Option<&str>) -> Result<Format> {
    match format_override {
        Some(s) => s.parse(),
        None => detect_format(path, content).ok_or(CovgateError::UnknownFormat),
    }
}
