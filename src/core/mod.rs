//! Core data types for capacity-constrained two-sided matching.
//!
//! This module provides the fundamental types used throughout the library:
//!
//! - [`ParticipantId`], [`Side`], [`StabilityMode`], [`Preference`]: identifiers and classification types
//! - [`PreferenceList`], [`PreferenceModel`]: tie-permitting preference sequences for both sides
//! - [`CapacityTable`]: host capacities, validated to be strictly positive
//! - [`MatchProblem`]: preferences and capacities validated together
//! - [`Matching`], [`NamedMatching`]: solver output by index and by identifier
//!
//! ## Preference Sequences
//!
//! A preference sequence is an ordered list of tie-groups. Candidates in the
//! same group are equally preferred; a candidate that does not appear at all is
//! unacceptable and is never matched to the participant.
//!
//! | Ranking  | Meaning                                     |
//! |----------|---------------------------------------------|
//! | `M1, M2` | M1 strictly before M2                       |
//! | `M1\|M2` | M1 and M2 tied                              |
//! | (absent) | unacceptable                                |
//!
//! [`ParticipantId`]: types::ParticipantId
//! [`Side`]: types::Side
//! [`StabilityMode`]: types::StabilityMode
//! [`Preference`]: types::Preference
//! [`PreferenceList`]: preference::PreferenceList
//! [`PreferenceModel`]: preference::PreferenceModel
//! [`CapacityTable`]: capacity::CapacityTable
//! [`MatchProblem`]: problem::MatchProblem
//! [`Matching`]: assignment::Matching
//! [`NamedMatching`]: assignment::NamedMatching

pub mod assignment;
pub mod capacity;
pub mod preference;
pub mod problem;
pub mod types;
