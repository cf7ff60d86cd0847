//! # mentor-match
//!
//! A library for assigning mentees to mentors from ranked preferences.
//!
//! Both sides rank the other, possibly with ties ("I'd be equally happy with
//! M2 or M3"), and every mentor can take a fixed number of mentees. Plain
//! deferred acceptance needs strict rankings; breaking ties arbitrarily can
//! leave pairs that would happily swap.
//!
//! `mentor-match` first looks for a **super-stable** matching, one that no
//! pair would even weakly prefer to abandon. Such a matching does not always
//! exist. When it doesn't, ties are broken in favour of candidates who rank
//! you strictly, and a **weakly stable** matching is computed instead.
//!
//! ## Features
//!
//! - **Ties on both sides**: rank positions may hold several identifiers
//! - **Capacities**: each mentor takes up to its capacity
//! - **Certified results**: every matching is re-checked before it is returned
//! - **Ranking completion**: optionally make everyone acceptable so all mentees
//!   are placed when capacity allows
//! - **Validation**: check any matching for feasibility and blocking pairs
//!
//! ## Example
//!
//! ```rust
//! use mentor_match::{CapacityTable, MatchProblem, MatchingEngine, RankingRow, StabilityMode};
//!
//! let mentees = vec![
//!     RankingRow::strict("S1", ["M2", "M1"]),
//!     RankingRow::strict("S2", ["M1", "M2"]),
//! ];
//! let mentors = vec![
//!     RankingRow::strict("M1", ["S1", "S2"]),
//!     RankingRow::strict("M2", ["S2", "S1"]),
//! ];
//! let capacities = CapacityTable::new([("M1", 1), ("M2", 1)]).unwrap();
//! let problem = MatchProblem::new(&mentees, &mentors, capacities).unwrap();
//!
//! let outcome = MatchingEngine::new(&problem).solve().unwrap();
//! assert_eq!(outcome.stability, StabilityMode::Super);
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Identifiers, preference lists, capacities, and matchings
//! - [`matching`]: Solvers, linearization, validation, and the pipeline
//! - [`parsing`]: Delimited ranking, capacity, and matching files
//! - [`cli`]: Command-line interface implementation
//! - [`utils`]: Input limits and identifier suggestions

pub mod cli;
pub mod core;
pub mod matching;
pub mod parsing;
pub mod utils;

// Re-export commonly used types for convenience
pub use crate::core::assignment::{Matching, NamedMatching};
pub use crate::core::capacity::CapacityTable;
pub use crate::core::preference::{PreferenceModel, RankingRow};
pub use crate::core::problem::{MatchProblem, ProblemError};
pub use crate::core::types::*;
pub use crate::matching::engine::{MatchOutcome, MatchingConfig, MatchingEngine};
pub use crate::matching::SolveError;
