use std::path::PathBuf;

use clap::Args;
use tracing::warn;

use crate::cli::{InputArgs, OutputFormat};
use crate::core::assignment::NamedMatching;
use crate::core::problem::MatchProblem;
use crate::core::types::ParticipantId;
use crate::matching::engine::{MatchOutcome, MatchingConfig, MatchingEngine};
use crate::parsing::assignments::{format_matching, write_matching_file};
use crate::parsing::rows::DelimitedFormat;

#[derive(Args)]
pub struct SolveArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Also write the matching to this file, one `mentor,mentee,...` row per mentor
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Make every pair acceptable by appending unranked participants as
    /// trailing ties, so every mentee is matched when capacity allows
    #[arg(long)]
    pub complete_rankings: bool,

    /// Fail instead of falling back when no super-stable matching exists
    #[arg(long)]
    pub super_only: bool,
}

pub fn run(args: SolveArgs, format: OutputFormat, verbose: bool) -> anyhow::Result<()> {
    let problem = args.input.load_problem()?;

    if verbose {
        let model = problem.model();
        eprintln!(
            "Loaded {} mentees, {} mentors, {} places",
            model.proposer_count(),
            model.host_count(),
            problem.capacities().total()
        );
    }

    let config = MatchingConfig {
        complete_rankings: args.complete_rankings,
        require_super_stable: args.super_only,
    };
    let outcome = MatchingEngine::with_config(&problem, config)
        .solve()
        .map_err(|e| {
            warn!("Matching failed: {e}");
            anyhow::anyhow!(e)
        })?;

    let named = outcome.named(&problem);
    let unmatched = outcome.unmatched(&problem);

    if let Some(path) = &args.output {
        let output_format = args.input.format_for(path)?;
        write_matching_file(path, &named, &output_format)?;
        if verbose {
            eprintln!("Wrote matching to {}", path.display());
        }
    }

    match format {
        OutputFormat::Text => print_text_results(&problem, &outcome, &named, &unmatched),
        OutputFormat::Json => print_json_results(&outcome, &named, &unmatched)?,
        OutputFormat::Csv => print!("{}", format_matching(&named, &DelimitedFormat::default())),
    }

    Ok(())
}

fn print_text_results(
    problem: &MatchProblem,
    outcome: &MatchOutcome,
    named: &NamedMatching,
    unmatched: &[ParticipantId],
) {
    println!("Matching Results");
    println!("{}", "=".repeat(60));
    println!("\nStability: {}", outcome.stability);
    if outcome.completed {
        println!("Rankings completed before solving");
    }

    println!("\nAssignments:");
    let width = named.iter().map(|(h, _)| h.as_str().len()).max().unwrap_or(0);
    for (mentor, mentees) in named.iter() {
        let capacity = problem.capacities().get(mentor).unwrap_or(0);
        let names: Vec<&str> = mentees.iter().map(ParticipantId::as_str).collect();
        println!(
            "  {:<width$}  [{}/{capacity}]  {}",
            mentor.as_str(),
            mentees.len(),
            if names.is_empty() { "-".to_string() } else { names.join(", ") }
        );
    }

    if unmatched.is_empty() {
        println!("\nAll mentees matched.");
    } else {
        let names: Vec<&str> = unmatched.iter().map(ParticipantId::as_str).collect();
        println!("\nUnmatched mentees ({}): {}", unmatched.len(), names.join(", "));
    }
}

fn print_json_results(
    outcome: &MatchOutcome,
    named: &NamedMatching,
    unmatched: &[ParticipantId],
) -> anyhow::Result<()> {
    let output = serde_json::json!({
        "stability": outcome.stability,
        "completed": outcome.completed,
        "matching": named,
        "unmatched": unmatched,
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
