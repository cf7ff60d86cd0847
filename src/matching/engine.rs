use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::assignment::{Matching, NamedMatching};
use crate::core::problem::MatchProblem;
use crate::core::types::{ParticipantId, StabilityMode};
use crate::matching::linearize::linearize_problem;
use crate::matching::super_stable::SuperStableSolver;
use crate::matching::validator::validate;
use crate::matching::weak_stable::WeakStableSolver;
use crate::matching::SolveError;

/// Configuration for the matching pipeline
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// Make every pair acceptable before solving, see [`MatchProblem::completed`]
    pub complete_rankings: bool,
    /// Report super-stable infeasibility instead of falling back
    pub require_super_stable: bool,
}

/// Result of running the pipeline
#[derive(Debug, Clone)]
pub struct MatchOutcome {
    /// The matching, by model index
    pub matching: Matching,
    /// Stability notion the matching satisfies
    pub stability: StabilityMode,
    /// Whether rankings were completed before solving
    pub completed: bool,
}

impl MatchOutcome {
    #[must_use]
    pub fn named(&self, problem: &MatchProblem) -> NamedMatching {
        self.matching.to_named(problem.model())
    }

    /// Proposers left without a host, sorted by identifier
    #[must_use]
    pub fn unmatched(&self, problem: &MatchProblem) -> Vec<ParticipantId> {
        let model = problem.model();
        let mut ids: Vec<ParticipantId> = self
            .matching
            .unmatched(model.proposer_count())
            .into_iter()
            .map(|p| model.proposer_id(p).clone())
            .collect();
        ids.sort();
        ids
    }
}

/// Runs the super-stable solver and, when no super-stable matching exists,
/// the linearized weakly-stable fallback
pub struct MatchingEngine<'a> {
    problem: &'a MatchProblem,
    config: MatchingConfig,
}

impl<'a> MatchingEngine<'a> {
    /// Create a new matching engine with default configuration
    pub fn new(problem: &'a MatchProblem) -> Self {
        Self {
            problem,
            config: MatchingConfig::default(),
        }
    }

    /// Create a new matching engine with custom configuration
    pub fn with_config(problem: &'a MatchProblem, config: MatchingConfig) -> Self {
        Self { problem, config }
    }

    /// The problem actually solved: completed if so configured
    #[must_use]
    pub fn effective_problem(&self) -> Cow<'a, MatchProblem> {
        if self.config.complete_rankings {
            Cow::Owned(self.problem.completed())
        } else {
            Cow::Borrowed(self.problem)
        }
    }

    /// Solve the problem.
    ///
    /// # Errors
    ///
    /// Returns `SolveError::Infeasible` only when `require_super_stable` is set
    /// and no super-stable matching exists; `SolveError::InvariantViolation`
    /// indicates a solver defect.
    pub fn solve(&self) -> Result<MatchOutcome, SolveError> {
        let problem = self.effective_problem();
        let model = problem.model();
        info!(
            proposers = model.proposer_count(),
            hosts = model.host_count(),
            places = problem.capacities().total(),
            acceptable_pairs = model.acceptable_pair_count(),
            "Solving matching problem"
        );

        match SuperStableSolver::new(&problem).solve() {
            Ok(matching) => {
                info!(matched = matching.matched_count(), "Found super-stable matching");
                Ok(self.outcome(matching, StabilityMode::Super))
            }
            Err(SolveError::Infeasible(StabilityMode::Super)) if !self.config.require_super_stable => {
                info!("No super-stable matching exists; falling back to a weakly stable matching");
                let linear = linearize_problem(&problem);
                let matching = WeakStableSolver::new(&linear).solve()?;

                // Stability must hold for the original ties, not just the refinement
                let report = validate(&matching, &problem, StabilityMode::Weak);
                if !report.is_valid() {
                    return Err(SolveError::InvariantViolation {
                        mode: StabilityMode::Weak,
                        detail: report.summary(),
                    });
                }

                info!(matched = matching.matched_count(), "Found weakly stable matching");
                Ok(self.outcome(matching, StabilityMode::Weak))
            }
            Err(e) => Err(e),
        }
    }

    fn outcome(&self, matching: Matching, stability: StabilityMode) -> MatchOutcome {
        MatchOutcome {
            matching,
            stability,
            completed: self.config.complete_rankings,
        }
    }
}
