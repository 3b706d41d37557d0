/// Parser for the line-record text format (LCOV-style `.info` files).
///
/// Recognized records:
///   SF:<path to source file>     opens a file block
///   DA:<line number>,<hit count> records one line
///   end_of_record                closes the block
///
/// Anything else is ignored. Parsing is a single left-to-right scan with a
/// "current file" state: a `DA` record outside an open block is dropped
/// silently, as are records with non-numeric fields. Malformed input
/// degrades gracefully rather than failing the whole report.
use crate::error::Result;
use crate::model::{CoverageReport, FileCoverage, LineRecord};

use super::Parser;

/// Line-record text format parser.
pub struct LcovParser;

impl Parser for LcovParser {
    fn parse(&self, input: &[u8]) -> Result<CoverageReport> {
        parse(input)
    }
}

/// Parse line-record text coverage data from raw bytes.
pub fn parse(input: &[u8]) -> Result<CoverageReport> {
    let text = String::from_utf8_lossy(input);

    let mut report = CoverageReport::new();
    let mut current_file: Option<FileCoverage> = None;

    for raw_line in text.lines() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        if line == "end_of_record" {
            if let Some(file) = current_file.take() {
                report.add_file(file);
            }
            continue;
        }

        let (tag, value) = match line.split_once(':') {
            Some(pair) => pair,
            None => continue,
        };

        match tag {
            "SF" => {
                // A new SF before end_of_record closes the previous block.
                if let Some(file) = current_file.take() {
                    report.add_file(file);
                }
                current_file = Some(FileCoverage::new(value.to_string()));
            }
            "DA" => {
                // DA:<line_number>,<hit_count>[,<checksum>]
                let Some(file) = current_file.as_mut() else {
                    continue; // orphaned record, no open file block
                };
                let mut parts = value.splitn(3, ',');
                let line_number = parts.next().and_then(|v| v.parse::<u32>().ok());
                let hits = parts.next().and_then(|v| v.parse::<u64>().ok());
                if let (Some(line_number), Some(hits)) = (line_number, hits) {
                    if line_number > 0 {
                        file.lines.push(LineRecord::new(line_number, hits));
                    }
                }
            }
            _ => {}
        }
    }

    // A trailing block without end_of_record still counts.
    if let Some(file) = current_file.take() {
        report.add_file(file);
    }

    report.finalize();
    Ok(report)
}
