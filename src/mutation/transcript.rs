/// Parser for the line-oriented transcript a mutation tool writes to
/// standard output. Only lines matching the fixed pattern
///
///   >> Line <N>: <MutatorName> <STATUS>[ by <killingTest>]
///
/// produce mutants; every other line is ignored. A matched line whose
/// status keyword falls outside the closed enumeration aborts the parse.
/// The transcript names no source file, so `sourceFile` is empty and ids
/// are synthesized as `:<line>:<ordinal>`.
use std::sync::LazyLock;

use regex::Regex;

use crate::error::Result;

use super::{Mutant, MutantStatus, MutationReport};

/// Pre-compiled pattern for one mutant outcome line.
static MUTANT_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^>> Line (\d+): (\S+) ([A-Z_]+)(?: by (.+))?$").unwrap()
});

/// Parse a mutation transcript from raw text.
pub fn parse(input: &str) -> Result<MutationReport> {
    let mut mutants: Vec<Mutant> = Vec::new();

    for raw_line in input.lines() {
        let line = raw_line.trim_end();
        let Some(caps) = MUTANT_LINE_RE.captures(line) else {
            continue;
        };

        // The pattern guarantees digits; out-of-range values degrade to 0.
        let line_number: u32 = caps[1].parse().unwrap_or(0);
        let mutator = caps[2].to_string();
        let id = format!(":{line_number}:{}", mutants.len());
        let status = MutantStatus::parse(&caps[3], &id)?;
        let killed_by = caps
            .get(4)
            .map(|m| vec![m.as_str().to_string()])
            .unwrap_or_default();

        mutants.push(Mutant {
            id,
            source_file: String::new(),
            line: line_number,
            mutator_kind: mutator,
            status,
            killed_by,
            original_text: None,
            mutated_text: None,
        });
    }

    Ok(MutationReport::from_mutants(mutants))
}
