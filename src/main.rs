use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use covgate::cli::{self, GateOptions, Style};
use covgate::diff::{DiffSource, FileDiff, GitDiff, StdinDiff};
use covgate::gate::{GateOutcome, ThresholdSet};

/// covgate: coverage and mutation report analysis with diff-scoped
/// quality gates.
#[derive(Parser)]
#[command(name = "covgate", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a summary of a line-coverage report.
    Summary {
        /// Path to the coverage report.
        file: PathBuf,

        /// Override format detection (lcov, jacoco).
        #[arg(long)]
        format: Option<String>,

        /// Output style.
        #[arg(long, value_enum, default_value = "text")]
        style: Style,
    },

    /// Show a summary of a mutation report.
    Mutation {
        /// Path to the mutation report or transcript.
        file: PathBuf,

        /// Override format detection (mutation-xml, mutation-log).
        #[arg(long)]
        format: Option<String>,

        /// Output style.
        #[arg(long, value_enum, default_value = "text")]
        style: Style,
    },

    /// Compute coverage for the lines changed by a diff.
    DiffCoverage {
        /// Path to the coverage report.
        #[arg(long)]
        coverage: PathBuf,

        /// Override coverage format detection.
        #[arg(long)]
        format: Option<String>,

        /// Git diff arguments, e.g. "HEAD~1" or "main..HEAD".
        #[arg(long)]
        git_diff: Option<String>,

        /// Read a unified diff from this file ("-" for stdin).
        #[arg(long)]
        diff_file: Option<PathBuf>,

        /// Path prefix to prepend to diff paths before matching.
        #[arg(long)]
        path_prefix: Option<String>,

        /// Output style.
        #[arg(long, value_enum, default_value = "text")]
        style: Style,
    },

    /// Evaluate quality gates and exit 0 (pass), 1 (fail) or 2 (warn).
    Gate {
        /// Path to the coverage report.
        #[arg(long)]
        coverage: Option<PathBuf>,

        /// Override coverage format detection.
        #[arg(long)]
        coverage_format: Option<String>,

        /// Path to the mutation report or transcript.
        #[arg(long)]
        mutation: Option<PathBuf>,

        /// Override mutation format detection.
        #[arg(long)]
        mutation_format: Option<String>,

        /// Git diff arguments, e.g. "HEAD~1" or "main..HEAD".
        #[arg(long)]
        git_diff: Option<String>,

        /// Read a unified diff from this file ("-" for stdin).
        #[arg(long)]
        diff_file: Option<PathBuf>,

        /// Path prefix to prepend to diff paths before matching.
        #[arg(long)]
        path_prefix: Option<String>,

        /// Minimum overall line (or branch) coverage percentage.
        #[arg(long)]
        min_line_pct: Option<f64>,

        /// Minimum mutation score percentage.
        #[arg(long)]
        min_mutation_score: Option<f64>,

        /// Minimum diff coverage percentage.
        #[arg(long)]
        min_diff_coverage: Option<f64>,

        /// Require the critical-path coverage flag to be true.
        #[arg(long)]
        require_critical_paths: bool,

        /// Whether critical paths are covered, as reported by an
        /// external analysis.
        #[arg(long)]
        critical_paths_covered: Option<bool>,

        /// Warning-level minimum line coverage percentage.
        #[arg(long)]
        warn_min_line_pct: Option<f64>,

        /// Warning-level minimum mutation score percentage.
        #[arg(long)]
        warn_min_mutation_score: Option<f64>,

        /// Warning-level minimum diff coverage percentage.
        #[arg(long)]
        warn_min_diff_coverage: Option<f64>,

        /// Output style.
        #[arg(long, value_enum, default_value = "text")]
        style: Style,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Summary {
            file,
            format,
            style,
        } => {
            print!("{}", cli::cmd_summary(&file, format.as_deref(), style)?);
        }
        Commands::Mutation {
            file,
            format,
            style,
        } => {
            print!("{}", cli::cmd_mutation(&file, format.as_deref(), style)?);
        }
        Commands::DiffCoverage {
            coverage,
            format,
            git_diff,
            diff_file,
            path_prefix,
            style,
        } => {
            let diff_text = fetch_diff_text(git_diff, diff_file)?
                .ok_or_else(|| anyhow::anyhow!("either --git-diff or --diff-file is required"))?;
            print!(
                "{}",
                cli::cmd_diff_coverage(
                    &coverage,
                    format.as_deref(),
                    &diff_text,
                    path_prefix.as_deref(),
                    style,
                )?
            );
        }
        Commands::Gate {
            coverage,
            coverage_format,
            mutation,
            mutation_format,
            git_diff,
            diff_file,
            path_prefix,
            min_line_pct,
            min_mutation_score,
            min_diff_coverage,
            require_critical_paths,
            critical_paths_covered,
            warn_min_line_pct,
            warn_min_mutation_score,
            warn_min_diff_coverage,
            style,
        } => {
            let options = GateOptions {
                coverage,
                coverage_format,
                mutation,
                mutation_format,
                diff_text: fetch_diff_text(git_diff, diff_file)?,
                path_prefix,
                critical_paths_covered,
                thresholds: ThresholdSet {
                    min_line_or_branch_pct: min_line_pct,
                    min_mutation_score_pct: min_mutation_score,
                    min_diff_coverage_pct: min_diff_coverage,
                    require_critical_paths_covered: require_critical_paths.then_some(true),
                },
                warn_thresholds: ThresholdSet {
                    min_line_or_branch_pct: warn_min_line_pct,
                    min_mutation_score_pct: warn_min_mutation_score,
                    min_diff_coverage_pct: warn_min_diff_coverage,
                    require_critical_paths_covered: None,
                },
            };

            let (out, outcome) = cli::cmd_gate(&options, style)?;
            print!("{out}");

            // Exit-code convention: 0 = all gates pass, 1 = at least one
            // blocking violation, 2 = only warning-level violations.
            match outcome {
                GateOutcome::Pass => {}
                GateOutcome::Fail => std::process::exit(1),
                GateOutcome::Warn => std::process::exit(2),
            }
        }
    }

    Ok(())
}

/// Obtain the diff text from whichever source was requested.
fn fetch_diff_text(git_diff: Option<String>, diff_file: Option<PathBuf>) -> Result<Option<String>> {
    let source: Option<Box<dyn DiffSource>> = match (git_diff, diff_file) {
        (Some(args), _) => Some(Box::new(GitDiff { args })),
        (None, Some(path)) if path.as_os_str() == "-" => Some(Box::new(StdinDiff)),
        (None, Some(path)) => Some(Box::new(FileDiff { path })),
        (None, None) => None,
    };
    source.map(|s| s.fetch_diff()).transpose()
}
