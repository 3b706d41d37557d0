//! Uniform in-memory representation of mutation-testing results. Both the
//! structured XML parser and the transcript parser converge on
//! [`MutationReport`]; totals and score are always recomputed from the
//! mutant list, never trusted from summary fields embedded in the input.

pub mod transcript;
pub mod xml;

use std::collections::BTreeSet;

use serde::Serialize;

use crate::error::{CovgateError, Result};
use crate::model::pct;

/// Terminal outcome of a single mutant. The enumeration is closed: a
/// status string outside it is a correctness-affecting ambiguity and
/// fails the parse, unlike the skip-and-continue policy of the coverage
/// parsers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MutantStatus {
    Killed,
    Survived,
    NoCoverage,
    Timeout,
    MemoryError,
}

impl MutantStatus {
    /// Map an uppercase report keyword onto the closed enumeration.
    /// `mutant_id` is carried into the error for diagnostics.
    pub fn parse(keyword: &str, mutant_id: &str) -> Result<Self> {
        match keyword {
            "KILLED" => Ok(Self::Killed),
            "SURVIVED" => Ok(Self::Survived),
            "NO_COVERAGE" => Ok(Self::NoCoverage),
            "TIMED_OUT" | "TIMEOUT" => Ok(Self::Timeout),
            "MEMORY_ERROR" => Ok(Self::MemoryError),
            other => Err(CovgateError::UnrecognizedMutationStatus {
                status: other.to_string(),
                mutant_id: mutant_id.to_string(),
            }),
        }
    }
}

/// A single artificially-introduced code modification and its outcome.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Mutant {
    /// Unique within one report. Synthesized as `<file>:<line>:<ordinal>`
    /// when the source format carries no explicit id.
    pub id: String,
    pub source_file: String,
    pub line: u32,
    pub mutator_kind: String,
    pub status: MutantStatus,
    pub killed_by: Vec<String>,
    pub original_text: Option<String>,
    pub mutated_text: Option<String>,
}

/// Counts per status. `total` always equals the sum of the others.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationTotals {
    pub total: u64,
    pub killed: u64,
    pub survived: u64,
    pub no_coverage: u64,
    pub timeout: u64,
    pub memory_error: u64,
}

/// The complete result of parsing a single mutation report.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MutationReport {
    pub mutants: Vec<Mutant>,
    pub totals: MutationTotals,
    /// Percentage of mutants killed, 0 when there are no mutants.
    pub score: f64,
}

impl MutationReport {
    /// Build a report from parsed mutants, computing totals and score.
    #[must_use]
    pub fn from_mutants(mutants: Vec<Mutant>) -> Self {
        let mut totals = MutationTotals::default();
        for mutant in &mutants {
            totals.total += 1;
            match mutant.status {
                MutantStatus::Killed => totals.killed += 1,
                MutantStatus::Survived => totals.survived += 1,
                MutantStatus::NoCoverage => totals.no_coverage += 1,
                MutantStatus::Timeout => totals.timeout += 1,
                MutantStatus::MemoryError => totals.memory_error += 1,
            }
        }
        let score = pct(totals.killed, totals.total);
        Self {
            mutants,
            totals,
            score,
        }
    }

    /// Mutants the test suite failed to kill.
    pub fn surviving(&self) -> impl Iterator<Item = &Mutant> {
        self.mutants
            .iter()
            .filter(|m| m.status == MutantStatus::Survived)
    }

    /// The distinct source-file universe of this report, for path
    /// reconciliation.
    #[must_use]
    pub fn source_files(&self) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        self.mutants
            .iter()
            .map(|m| m.source_file.as_str())
            .filter(|f| seen.insert(*f))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mutant(status: MutantStatus) -> Mutant {
        Mutant {
            id: "a.ts:1:0".to_string(),
            source_file: "a.ts".to_string(),
            line: 1,
            mutator_kind: "MathMutator".to_string(),
            status,
            killed_by: vec![],
            original_text: None,
            mutated_text: None,
        }
    }

    #[test]
    fn test_status_keywords() {
        assert_eq!(
            MutantStatus::parse("KILLED", "m0").unwrap(),
            MutantStatus::Killed
        );
        assert_eq!(
            MutantStatus::parse("NO_COVERAGE", "m0").unwrap(),
            MutantStatus::NoCoverage
        );
        assert_eq!(
            MutantStatus::parse("TIMED_OUT", "m0").unwrap(),
            MutantStatus::Timeout
        );
        assert_eq!(
            MutantStatus::parse("TIMEOUT", "m0").unwrap(),
            MutantStatus::Timeout
        );
    }

    #[test]
    fn test_unrecognized_status_is_fatal() {
        let err = MutantStatus::parse("RUN_ERROR", "a.ts:3:1").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("RUN_ERROR"));
        assert!(msg.contains("a.ts:3:1"));
    }

    #[test]
    fn test_totals_sum_invariant() {
        let report = MutationReport::from_mutants(vec![
            mutant(MutantStatus::Killed),
            mutant(MutantStatus::Killed),
            mutant(MutantStatus::Survived),
            mutant(MutantStatus::NoCoverage),
            mutant(MutantStatus::Timeout),
            mutant(MutantStatus::MemoryError),
        ]);

        let t = report.totals;
        assert_eq!(t.total, 6);
        assert_eq!(
            t.total,
            t.killed + t.survived + t.no_coverage + t.timeout + t.memory_error
        );
        assert!((report.score - 100.0 * 2.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_report_scores_zero() {
        let report = MutationReport::from_mutants(vec![]);
        assert_eq!(report.totals.total, 0);
        assert_eq!(report.score, 0.0);
    }

    #[test]
    fn test_source_files_deduplicated() {
        let mut a = mutant(MutantStatus::Killed);
        a.source_file = "b.ts".to_string();
        let report =
            MutationReport::from_mutants(vec![mutant(MutantStatus::Killed), a.clone(), a]);
        assert_eq!(report.source_files(), vec!["a.ts", "b.ts"]);
    }

    #[test]
    fn test_json_field_names() {
        let report = MutationReport::from_mutants(vec![mutant(MutantStatus::Survived)]);
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["totals"]["noCoverage"], 0);
        assert_eq!(value["totals"]["memoryError"], 0);
        assert_eq!(value["mutants"][0]["sourceFile"], "a.ts");
        assert_eq!(value["mutants"][0]["mutatorKind"], "MathMutator");
        assert_eq!(value["mutants"][0]["status"], "Survived");
        assert!(value["mutants"][0]["killedBy"].is_array());
    }
}
