//! Matching engine: solvers, linearization, and validation.
//!
//! This module provides the core matching functionality:
//!
//! - [`MatchingEngine`]: Main entry point, runs the full pipeline
//! - [`SuperStableSolver`]: Extended deferred acceptance with bidirectional deletion
//! - [`linearize_problem`]: Refines ties into strict orders for the fallback
//! - [`WeakStableSolver`]: Classical capacitated deferred acceptance
//! - [`validate`]: Feasibility and stability oracle
//!
//! ## Pipeline
//!
//! 1. **Super-stable attempt**: find a matching no pair would even weakly
//!    improve on, or certify that none exists
//! 2. **Linearization**: break every tie, favouring candidates that express a
//!    strict preference back
//! 3. **Weakly stable fallback**: proposer-optimal deferred acceptance over
//!    the linearized preferences
//!
//! Each solver validates its own result before returning it; a failed check is
//! reported as [`SolveError::InvariantViolation`], never as an input problem.
//!
//! ## Example
//!
//! ```rust
//! use mentor_match::core::capacity::CapacityTable;
//! use mentor_match::core::preference::RankingRow;
//! use mentor_match::core::problem::MatchProblem;
//! use mentor_match::matching::MatchingEngine;
//!
//! let mentees = vec![
//!     RankingRow::strict("S1", ["M1", "M2"]),
//!     RankingRow::strict("S2", ["M1"]),
//! ];
//! let mentors = vec![
//!     RankingRow::strict("M1", ["S2", "S1"]),
//!     RankingRow::strict("M2", ["S1"]),
//! ];
//! let capacities = CapacityTable::new([("M1", 1), ("M2", 1)]).unwrap();
//! let problem = MatchProblem::new(&mentees, &mentors, capacities).unwrap();
//!
//! let outcome = MatchingEngine::new(&problem).solve().unwrap();
//! for (mentor, assigned) in outcome.named(&problem).iter() {
//!     println!("{mentor}: {assigned:?}");
//! }
//! ```

use thiserror::Error;

use crate::core::types::StabilityMode;

pub mod engine;
pub mod linearize;
pub mod super_stable;
pub mod validator;
pub mod weak_stable;

pub use engine::{MatchOutcome, MatchingConfig, MatchingEngine};
pub use linearize::{linearize_model, linearize_problem};
pub use super_stable::SuperStableSolver;
pub use validator::{validate, ValidationReport};
pub use weak_stable::WeakStableSolver;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolveError {
    #[error("No {0} matching exists for this instance")]
    Infeasible(StabilityMode),

    #[error("Internal error: {mode} solver produced an invalid result: {detail}")]
    InvariantViolation { mode: StabilityMode, detail: String },
}
