//! Extended deferred acceptance for super-stable matchings.
//!
//! Free proposers propose, in rounds, to every host in the head tie-group of
//! their active sequence. Each host keeps a retention frontier:
//!
//! - when it holds more proposers than its capacity, the whole tail tie-group
//!   of its active sequence is deleted, held members included;
//! - when it holds exactly its capacity, every candidate strictly worse than
//!   its worst held proposer is deleted.
//!
//! Every deletion is bidirectional: the host leaves the proposer's active
//! sequence and the proposer leaves the host's. Each acceptable pair is
//! deleted at most once and a proposer only proposes again after losing all
//! its provisional hosts, so the loop is bounded by the number of acceptable
//! pairs.
//!
//! At termination, no super-stable matching exists if some proposer is still
//! provisionally held by more than one host, or if some host that was full at
//! some point ends with a free place. Otherwise the provisional assignment is
//! super-stable.

use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use crate::core::assignment::Matching;
use crate::core::preference::PreferenceList;
use crate::core::problem::MatchProblem;
use crate::core::types::StabilityMode;
use crate::matching::validator::validate;
use crate::matching::SolveError;

/// A solver-local, shrinking copy of one preference sequence.
///
/// Group positions keep their original rank indices, so a rank taken from the
/// immutable list stays valid while members are deleted.
#[derive(Debug, Clone)]
struct ActiveList {
    groups: Vec<Vec<usize>>,
    ranks: HashMap<usize, usize>,
    remaining: usize,
}

impl ActiveList {
    fn new(groups: Vec<Vec<usize>>) -> Self {
        let mut ranks = HashMap::new();
        for (rank, group) in groups.iter().enumerate() {
            for &c in group {
                ranks.insert(c, rank);
            }
        }
        let remaining = ranks.len();
        Self {
            groups,
            ranks,
            remaining,
        }
    }

    fn from_list(list: &PreferenceList, keep: impl Fn(usize) -> bool) -> Self {
        Self::new(
            list.groups()
                .iter()
                .map(|g| g.iter().copied().filter(|&c| keep(c)).collect())
                .collect(),
        )
    }

    fn is_empty(&self) -> bool {
        self.remaining == 0
    }

    fn rank_of(&self, candidate: usize) -> Option<usize> {
        self.ranks.get(&candidate).copied()
    }

    fn head(&self) -> Option<&[usize]> {
        self.groups
            .iter()
            .find(|g| !g.is_empty())
            .map(Vec::as_slice)
    }

    fn tail(&self) -> Option<&[usize]> {
        self.groups
            .iter()
            .rev()
            .find(|g| !g.is_empty())
            .map(Vec::as_slice)
    }

    /// Candidates ranked strictly below `rank`
    fn after(&self, rank: usize) -> Vec<usize> {
        self.groups
            .iter()
            .skip(rank + 1)
            .flatten()
            .copied()
            .collect()
    }

    fn remove(&mut self, candidate: usize) -> bool {
        let Some(rank) = self.ranks.remove(&candidate) else {
            return false;
        };
        self.groups[rank].retain(|&c| c != candidate);
        self.remaining -= 1;
        true
    }
}

/// Working state of one solve; discarded afterwards
struct SolverState {
    proposer_lists: Vec<ActiveList>,
    host_lists: Vec<ActiveList>,
    capacities: Vec<usize>,
    /// host -> provisionally held proposers
    held: Vec<BTreeSet<usize>>,
    /// proposer -> hosts provisionally holding it
    holders: Vec<BTreeSet<usize>>,
    /// host reached its capacity at some point
    was_full: Vec<bool>,
    deletions: usize,
}

impl SolverState {
    fn new(problem: &MatchProblem) -> Self {
        let model = problem.model();
        let proposer_lists = (0..model.proposer_count())
            .map(|p| ActiveList::from_list(model.proposer_prefs(p), |h| model.host_prefs(h).contains(p)))
            .collect();
        let host_lists = (0..model.host_count())
            .map(|h| ActiveList::from_list(model.host_prefs(h), |p| model.proposer_prefs(p).contains(h)))
            .collect();

        Self {
            proposer_lists,
            host_lists,
            capacities: problem.capacity_vec(),
            held: vec![BTreeSet::new(); model.host_count()],
            holders: vec![BTreeSet::new(); model.proposer_count()],
            was_full: vec![false; model.host_count()],
            deletions: 0,
        }
    }

    fn is_free(&self, proposer: usize) -> bool {
        self.holders[proposer].is_empty() && !self.proposer_lists[proposer].is_empty()
    }

    /// Delete the pair from both active sequences, breaking any provisional hold
    fn delete(&mut self, proposer: usize, host: usize) {
        let removed = self.proposer_lists[proposer].remove(host);
        self.host_lists[host].remove(proposer);
        if self.held[host].remove(&proposer) {
            self.holders[proposer].remove(&host);
        }
        if removed {
            self.deletions += 1;
        }
    }

    fn propose(&mut self, proposer: usize, host: usize) {
        self.held[host].insert(proposer);
        self.holders[proposer].insert(host);

        let capacity = self.capacities[host];
        while self.held[host].len() > capacity {
            let Some(tail) = self.host_lists[host].tail().map(<[usize]>::to_vec) else {
                break;
            };
            debug!(
                host,
                dropped = tail.len(),
                "host oversubscribed, dropping its tail tie-group"
            );
            for p in tail {
                self.delete(p, host);
            }
        }

        if self.held[host].len() == capacity {
            self.was_full[host] = true;
            let worst = self.held[host]
                .iter()
                .filter_map(|&p| self.host_lists[host].rank_of(p))
                .max();
            if let Some(worst) = worst {
                for p in self.host_lists[host].after(worst) {
                    self.delete(p, host);
                }
            }
        }
    }
}

/// Finds a super-stable matching or certifies that none exists
pub struct SuperStableSolver<'a> {
    problem: &'a MatchProblem,
}

impl<'a> SuperStableSolver<'a> {
    pub fn new(problem: &'a MatchProblem) -> Self {
        Self { problem }
    }

    /// Run the solver.
    ///
    /// # Errors
    ///
    /// Returns `SolveError::Infeasible(StabilityMode::Super)` if no
    /// super-stable matching exists, and `SolveError::InvariantViolation` if
    /// the result fails validation.
    pub fn solve(&self) -> Result<Matching, SolveError> {
        let model = self.problem.model();
        let mut state = SolverState::new(self.problem);
        let mut round = 0usize;

        loop {
            let free: Vec<usize> = (0..model.proposer_count()).filter(|&p| state.is_free(p)).collect();
            if free.is_empty() {
                break;
            }
            round += 1;
            debug!(round, free = free.len(), "super-stable proposal round");

            for p in free {
                // Earlier proposals this round may have shortened p's sequence
                if !state.is_free(p) {
                    continue;
                }
                let Some(head) = state.proposer_lists[p].head().map(<[usize]>::to_vec) else {
                    continue;
                };
                for h in head {
                    state.propose(p, h);
                }
            }
        }

        if let Some(p) = (0..model.proposer_count()).find(|&p| state.holders[p].len() > 1) {
            debug!(
                proposer = %model.proposer_id(p),
                hosts = state.holders[p].len(),
                "proposer held by several tied hosts, no super-stable matching"
            );
            return Err(SolveError::Infeasible(StabilityMode::Super));
        }

        if let Some(h) = (0..model.host_count())
            .find(|&h| state.was_full[h] && state.held[h].len() < state.capacities[h])
        {
            debug!(
                host = %model.host_id(h),
                "host was full but ends with a free place, no super-stable matching"
            );
            return Err(SolveError::Infeasible(StabilityMode::Super));
        }

        debug!(rounds = round, deletions = state.deletions, "super-stable matching found");

        let matching = Matching::from_assignments(
            state.held.into_iter().map(|ps| ps.into_iter().collect()).collect(),
        );

        let report = validate(&matching, self.problem, StabilityMode::Super);
        if !report.is_valid() {
            return Err(SolveError::InvariantViolation {
                mode: StabilityMode::Super,
                detail: report.summary(),
            });
        }

        Ok(matching)
    }
}
