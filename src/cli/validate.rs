//! Validate command - check an existing matching against the rankings.
//!
//! Reports capacity and acceptability violations and every blocking pair for
//! the requested stability notion. Exits non-zero when the matching is not
//! valid, so it can gate a pipeline.

use std::path::PathBuf;

use clap::Args;
use tracing::warn;

use crate::cli::{InputArgs, OutputFormat};
use crate::core::assignment::Matching;
use crate::core::types::StabilityMode;
use crate::matching::validator::{validate, ValidationReport};
use crate::parsing::assignments::parse_matching_file;

#[derive(Args)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Matching to check, one `mentor,mentee,...` row per mentor
    #[arg(required = true)]
    pub matching: PathBuf,

    /// Stability notion to check against
    #[arg(long, default_value = "super")]
    pub mode: ModeArg,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum ModeArg {
    /// No pair where both sides are at least as well off together
    Super,
    /// No pair where both sides are strictly better off together
    Weak,
}

impl From<ModeArg> for StabilityMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Super => Self::Super,
            ModeArg::Weak => Self::Weak,
        }
    }
}

pub fn run(args: ValidateArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let problem = args.input.load_problem()?;

    let rows = parse_matching_file(&args.matching, &args.input.format_for(&args.matching)?).map_err(|e| {
        warn!("Failed to load {}: {e}", args.matching.display());
        anyhow::anyhow!("{}: {e}", args.matching.display())
    })?;
    let matching = Matching::from_named(problem.model(), &rows).map_err(|e| {
        warn!("Invalid matching: {e}");
        anyhow::anyhow!("{}: {e}", args.matching.display())
    })?;

    if verbose {
        eprintln!(
            "Checking {} assignments across {} mentors",
            matching.matched_count(),
            matching.host_count()
        );
    }

    let report = validate(&matching, &problem, args.mode.into());

    match format {
        OutputFormat::Text => print_text_report(&report),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
        OutputFormat::Csv => print_csv_report(&report),
    }

    if !report.is_valid() {
        anyhow::bail!("Matching is not valid: {}", report.summary());
    }

    Ok(())
}

fn print_text_report(report: &ValidationReport) {
    println!("Validation Results");
    println!("{}", "=".repeat(60));
    println!("\nMode: {}", report.mode);
    println!("Feasible: {}", if report.is_feasible() { "yes" } else { "no" });
    println!("Stable: {}", if report.is_stable() { "yes" } else { "no" });

    if !report.violations.is_empty() {
        println!("\nViolations ({}):", report.violations.len());
        for violation in &report.violations {
            println!("  - {violation}");
        }
    }

    if !report.blocking_pairs.is_empty() {
        println!("\nBlocking pairs ({}):", report.blocking_pairs.len());
        for pair in &report.blocking_pairs {
            println!("  - {pair}");
        }
    }
}

fn print_csv_report(report: &ValidationReport) {
    print!("{}", format_csv_report(report));
}

fn format_csv_report(report: &ValidationReport) -> String {
    let mut out = String::from("kind,detail\n");
    let rows = report
        .violations
        .iter()
        .map(|v| ("violation", v.to_string()))
        .chain(report.blocking_pairs.iter().map(|p| ("blocking_pair", p.to_string())));
    for (kind, detail) in rows {
        out.push_str(kind);
        out.push(',');
        out.push_str(&csv_field(&detail));
        out.push('\n');
    }
    out
}

/// Quote a CSV field, doubling embedded quotes
fn csv_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}
