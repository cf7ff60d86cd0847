//! Command-line interface for mentor-match.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **solve**: Compute a super-stable matching, or a weakly stable one when
//!   none exists
//! - **validate**: Check an existing matching for feasibility and stability
//!
//! ## Usage
//!
//! ```text
//! # Solve and write the row-per-mentor matching
//! mentor-match solve mentees.csv mentors.csv capacities.csv -o matching.csv
//!
//! # Make every pair acceptable first, so everyone gets a mentor
//! mentor-match solve mentees.csv mentors.csv capacities.csv --complete-rankings
//!
//! # JSON output for scripting
//! mentor-match --format json solve mentees.csv mentors.csv capacities.csv
//!
//! # Check a hand-edited matching
//! mentor-match validate mentees.csv mentors.csv capacities.csv matching.csv --mode weak
//! ```

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing::warn;

use crate::core::capacity::CapacityTable;
use crate::core::problem::MatchProblem;
use crate::parsing::capacities::parse_capacities_file;
use crate::parsing::rankings::parse_rankings_file;
use crate::parsing::rows::DelimitedFormat;

pub mod solve;
pub mod validate;

#[derive(Parser)]
#[command(name = "mentor-match")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Stable mentor/mentee matching from ranked preferences with ties")]
#[command(
    long_about = "mentor-match assigns mentees to mentors given each side's rankings and each mentor's capacity.\n\nRankings may contain ties. The solver looks for a super-stable matching, one no mentee/mentor pair would even weakly prefer to abandon, and falls back to a weakly stable matching when none exists:\n- Ties are broken in favour of candidates who rank you strictly\n- Every result is checked against the original rankings before it is reported"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute a stable matching
    Solve(solve::SolveArgs),

    /// Check a matching against the rankings
    Validate(validate::ValidateArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Csv,
}

/// Ranking and capacity inputs shared by every subcommand
#[derive(clap::Args)]
pub struct InputArgs {
    /// Mentee rankings: one row per mentee, mentors from most to least preferred
    #[arg(required = true)]
    pub mentee_rankings: PathBuf,

    /// Mentor rankings: one row per mentor, mentees from most to least preferred
    #[arg(required = true)]
    pub mentor_rankings: PathBuf,

    /// Mentor capacities: `mentor,capacity` rows
    #[arg(required = true)]
    pub capacities: PathBuf,

    /// Field delimiter [default: tab for .tsv files, comma otherwise]
    #[arg(long)]
    pub delimiter: Option<char>,

    /// Separator for equally ranked identifiers within one field
    #[arg(long)]
    pub tie_delimiter: Option<char>,
}

impl InputArgs {
    /// Delimiters for one input file, flags taking precedence over the extension
    ///
    /// # Errors
    ///
    /// Returns an error if the field and tie delimiters coincide.
    pub fn format_for(&self, path: &Path) -> anyhow::Result<DelimitedFormat> {
        let mut format = DelimitedFormat::for_path(path);
        if let Some(delimiter) = self.delimiter {
            format.delimiter = delimiter;
        }
        if let Some(tie_delimiter) = self.tie_delimiter {
            format.tie_delimiter = tie_delimiter;
        }
        if format.delimiter == format.tie_delimiter {
            anyhow::bail!(
                "Field delimiter and tie delimiter are both '{}'",
                format.delimiter.escape_default()
            );
        }
        Ok(format)
    }

    /// Parse all three inputs and assemble the problem.
    ///
    /// # Errors
    ///
    /// Returns an error naming the offending file if any input cannot be read
    /// or parsed, or if the rankings and capacities are inconsistent.
    pub fn load_problem(&self) -> anyhow::Result<MatchProblem> {
        let mentees = parse_rankings_file(&self.mentee_rankings, &self.format_for(&self.mentee_rankings)?)
            .map_err(|e| input_error(&self.mentee_rankings, &e))?;
        let mentors = parse_rankings_file(&self.mentor_rankings, &self.format_for(&self.mentor_rankings)?)
            .map_err(|e| input_error(&self.mentor_rankings, &e))?;
        let entries = parse_capacities_file(&self.capacities, &self.format_for(&self.capacities)?)
            .map_err(|e| input_error(&self.capacities, &e))?;

        let capacities = CapacityTable::new(entries).map_err(|e| input_error(&self.capacities, &e))?;

        MatchProblem::new(&mentees, &mentors, capacities).map_err(|e| {
            warn!("Invalid input: {e}");
            anyhow::anyhow!("Invalid input: {e}")
        })
    }
}

fn input_error(path: &Path, error: &dyn std::fmt::Display) -> anyhow::Error {
    warn!("Failed to load {}: {error}", path.display());
    anyhow::anyhow!("{}: {error}", path.display())
}
