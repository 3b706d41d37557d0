//! Threshold-based quality gates over coverage, mutation, and diff-scoped
//! coverage metrics. Evaluation is a pure function: it never errors and
//! always returns a [`GateVerdict`]. A configured threshold whose metric
//! was never supplied is itself a violation, because in a gating context
//! a missing report is as dangerous as a failing one.

use serde::{Deserialize, Serialize};

use crate::diffcov::DiffCoverageSummary;
use crate::model::CoverageReport;
use crate::mutation::MutationReport;
use crate::report::format_line_ranges;

/// Upper bound on remediation entries per violation, to keep CI output
/// readable.
const MAX_REMEDIATION_ITEMS: usize = 10;

/// Numeric thresholds to enforce. All fields are optional; an absent
/// field is not evaluated. Defaulting is a caller concern, the engine
/// substitutes nothing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThresholdSet {
    pub min_line_or_branch_pct: Option<f64>,
    pub min_mutation_score_pct: Option<f64>,
    pub min_diff_coverage_pct: Option<f64>,
    pub require_critical_paths_covered: Option<bool>,
}

impl ThresholdSet {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min_line_or_branch_pct.is_none()
            && self.min_mutation_score_pct.is_none()
            && self.min_diff_coverage_pct.is_none()
            && self.require_critical_paths_covered.is_none()
    }
}

/// A surviving mutant, carried for remediation text only.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SurvivorRef {
    pub file: String,
    pub line: u32,
    pub mutator: String,
}

/// The metric inputs to one gate evaluation. Absent metrics are reported
/// as violations when their gate is configured. The survivor and
/// missed-line details feed remediation messages, never the pass/fail
/// comparison itself.
#[derive(Debug, Clone, Default)]
pub struct GateMetrics {
    pub line: Option<f64>,
    pub branch: Option<f64>,
    pub mutation: Option<f64>,
    pub diff_coverage: Option<f64>,
    pub critical_paths_covered: Option<bool>,
    pub surviving: Vec<SurvivorRef>,
    pub missed_diff_lines: Vec<(String, Vec<u32>)>,
}

impl GateMetrics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_coverage(mut self, report: &CoverageReport) -> Self {
        self.line = Some(report.coverage_pct);
        self
    }

    #[must_use]
    pub fn with_mutation(mut self, report: &MutationReport) -> Self {
        self.mutation = Some(report.score);
        let mut surviving: Vec<SurvivorRef> = report
            .surviving()
            .map(|m| SurvivorRef {
                file: m.source_file.clone(),
                line: m.line,
                mutator: m.mutator_kind.clone(),
            })
            .collect();
        surviving.sort_by(|a, b| a.file.cmp(&b.file).then(a.line.cmp(&b.line)));
        self.surviving = surviving;
        self
    }

    #[must_use]
    pub fn with_diff_coverage(mut self, summary: &DiffCoverageSummary) -> Self {
        self.diff_coverage = Some(summary.pct);
        self.missed_diff_lines = summary
            .files
            .iter()
            .filter(|f| !f.missed_lines.is_empty())
            .map(|f| (f.file.clone(), f.missed_lines.clone()))
            .collect();
        self
    }
}

/// How severe a violation is. Blocking violations fail the gate; warning
/// violations only downgrade the outcome to [`GateOutcome::Warn`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    Blocking,
    Warning,
}

/// One failed gate.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    pub gate_name: String,
    pub threshold_value: f64,
    pub actual_value: f64,
    pub message: String,
    pub remediation: Vec<String>,
    pub severity: Severity,
}

/// The structured result of one evaluation. `passed` is true iff no
/// blocking violation exists; violations are ordered by threshold
/// declaration order.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GateVerdict {
    pub passed: bool,
    pub violations: Vec<Violation>,
}

/// Tri-state outcome, mapped to process exit codes by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GateOutcome {
    Pass,
    Warn,
    Fail,
}

impl GateVerdict {
    #[must_use]
    pub fn outcome(&self) -> GateOutcome {
        if self
            .violations
            .iter()
            .any(|v| v.severity == Severity::Blocking)
        {
            GateOutcome::Fail
        } else if !self.violations.is_empty() {
            GateOutcome::Warn
        } else {
            GateOutcome::Pass
        }
    }
}

/// Evaluate every configured threshold at blocking severity.
#[must_use]
pub fn evaluate(metrics: &GateMetrics, thresholds: &ThresholdSet) -> GateVerdict {
    let mut violations = Vec::new();
    evaluate_into(metrics, thresholds, Severity::Blocking, &mut violations);
    GateVerdict {
        passed: violations.is_empty(),
        violations,
    }
}

/// Evaluate a blocking threshold set plus a warning-level set. Gates that
/// already produced a blocking violation are not re-reported at warning
/// severity.
#[must_use]
pub fn evaluate_with_warnings(
    metrics: &GateMetrics,
    fail: &ThresholdSet,
    warn: &ThresholdSet,
) -> GateVerdict {
    let mut violations = Vec::new();
    evaluate_into(metrics, fail, Severity::Blocking, &mut violations);

    let mut warnings = Vec::new();
    evaluate_into(metrics, warn, Severity::Warning, &mut warnings);
    warnings.retain(|w| !violations.iter().any(|v| v.gate_name == w.gate_name));
    let passed = violations.is_empty();
    violations.extend(warnings);

    GateVerdict { passed, violations }
}

fn evaluate_into(
    metrics: &GateMetrics,
    thresholds: &ThresholdSet,
    severity: Severity,
    violations: &mut Vec<Violation>,
) {
    // Evaluation order matches the ThresholdSet declaration order.
    if let Some(threshold) = thresholds.min_line_or_branch_pct {
        let actual = metrics.line.or(metrics.branch);
        check_pct_gate(
            "line-coverage",
            threshold,
            actual,
            "line coverage",
            line_remediation(threshold, actual),
            severity,
            violations,
        );
    }

    if let Some(threshold) = thresholds.min_mutation_score_pct {
        check_pct_gate(
            "mutation-score",
            threshold,
            metrics.mutation,
            "mutation score",
            mutation_remediation(&metrics.surviving),
            severity,
            violations,
        );
    }

    if let Some(threshold) = thresholds.min_diff_coverage_pct {
        check_pct_gate(
            "diff-coverage",
            threshold,
            metrics.diff_coverage,
            "diff coverage",
            diff_remediation(&metrics.missed_diff_lines),
            severity,
            violations,
        );
    }

    if thresholds.require_critical_paths_covered == Some(true) {
        match metrics.critical_paths_covered {
            Some(true) => {}
            Some(false) => violations.push(Violation {
                gate_name: "critical-paths".to_string(),
                threshold_value: 1.0,
                actual_value: 0.0,
                message: "critical paths are not fully covered".to_string(),
                remediation: vec![
                    "Add tests for every critical path before merging".to_string()
                ],
                severity,
            }),
            None => violations.push(missing_metric_violation(
                "critical-paths",
                1.0,
                "critical-path coverage",
                severity,
            )),
        }
    }
}

fn check_pct_gate(
    gate_name: &str,
    threshold: f64,
    actual: Option<f64>,
    metric_label: &str,
    remediation: Vec<String>,
    severity: Severity,
    violations: &mut Vec<Violation>,
) {
    match actual {
        Some(actual) if actual >= threshold => {}
        Some(actual) => violations.push(Violation {
            gate_name: gate_name.to_string(),
            threshold_value: threshold,
            actual_value: actual,
            message: format!("{metric_label} {actual:.1}% is below the minimum {threshold:.1}%"),
            remediation,
            severity,
        }),
        None => violations.push(missing_metric_violation(
            gate_name,
            threshold,
            metric_label,
            severity,
        )),
    }
}

fn missing_metric_violation(
    gate_name: &str,
    threshold: f64,
    metric_label: &str,
    severity: Severity,
) -> Violation {
    Violation {
        gate_name: gate_name.to_string(),
        threshold_value: threshold,
        actual_value: 0.0,
        message: format!("metric unavailable for configured gate: {metric_label}"),
        remediation: vec![format!(
            "Generate the {metric_label} report and pass it to the gate"
        )],
        severity,
    }
}

fn line_remediation(threshold: f64, actual: Option<f64>) -> Vec<String> {
    match actual {
        Some(actual) if actual < threshold => vec![format!(
            "Raise line coverage by at least {:.1} percentage points",
            threshold - actual
        )],
        _ => vec![],
    }
}

fn mutation_remediation(surviving: &[SurvivorRef]) -> Vec<String> {
    let mut remediation: Vec<String> = surviving
        .iter()
        .take(MAX_REMEDIATION_ITEMS)
        .map(|s| {
            if s.file.is_empty() {
                format!("Add a test that kills {} at line {}", s.mutator, s.line)
            } else {
                format!("Add a test that kills {} at {}:{}", s.mutator, s.file, s.line)
            }
        })
        .collect();
    if surviving.len() > MAX_REMEDIATION_ITEMS {
        remediation.push(format!(
            "... and {} more surviving mutants",
            surviving.len() - MAX_REMEDIATION_ITEMS
        ));
    }
    remediation
}

fn diff_remediation(missed: &[(String, Vec<u32>)]) -> Vec<String> {
    missed
        .iter()
        .take(MAX_REMEDIATION_ITEMS)
        .map(|(file, lines)| {
            format!("Cover changed lines in {}: {}", file, format_line_ranges(lines))
        })
        .collect()
}
