//! Feasibility and stability checks for a candidate matching.
//!
//! Both stability notions share the feasibility check and differ only in the
//! blocking-pair rule, selected by [`StabilityMode`]:
//!
//! - **Super**: `(p, h)` blocks if `p` is unmatched or at least as happy with
//!   `h` as with its host, *and* `h` has a free place or is at least as happy
//!   with `p` as with its worst assignee.
//! - **Weak**: the same with "strictly prefers" on both sides.

use serde::Serialize;

use crate::core::assignment::Matching;
use crate::core::problem::MatchProblem;
use crate::core::types::{ParticipantId, Preference, StabilityMode};

/// A feasibility violation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    /// More proposers than the host's capacity
    OverCapacity {
        host: ParticipantId,
        assigned: usize,
        capacity: usize,
    },
    /// A proposer appears under more than one host
    MultipleAssignment {
        proposer: ParticipantId,
        hosts: Vec<ParticipantId>,
    },
    /// The pair is not mutually acceptable
    Unacceptable {
        proposer: ParticipantId,
        host: ParticipantId,
    },
    /// The matching does not cover the problem's hosts
    HostCountMismatch { expected: usize, found: usize },
    /// A proposer index beyond the problem's proposers
    UnknownProposer { index: usize },
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OverCapacity {
                host,
                assigned,
                capacity,
            } => write!(f, "host {host} holds {assigned} proposers but has capacity {capacity}"),
            Self::MultipleAssignment { proposer, hosts } => {
                let hosts: Vec<&str> = hosts.iter().map(ParticipantId::as_str).collect();
                write!(f, "proposer {proposer} is assigned to several hosts [{}]", hosts.join(", "))
            }
            Self::Unacceptable { proposer, host } => {
                write!(f, "proposer {proposer} and host {host} do not both rank each other")
            }
            Self::HostCountMismatch { expected, found } => {
                write!(f, "matching covers {found} hosts, expected {expected}")
            }
            Self::UnknownProposer { index } => write!(f, "unknown proposer index {index}"),
        }
    }
}

/// A pair that would rather be matched to each other
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlockingPair {
    pub proposer: ParticipantId,
    pub host: ParticipantId,
}

impl std::fmt::Display for BlockingPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.proposer, self.host)
    }
}

/// Result of validating a matching
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    pub mode: StabilityMode,
    pub violations: Vec<Violation>,
    pub blocking_pairs: Vec<BlockingPair>,
}

impl ValidationReport {
    #[must_use]
    pub fn is_feasible(&self) -> bool {
        self.violations.is_empty()
    }

    #[must_use]
    pub fn is_stable(&self) -> bool {
        self.blocking_pairs.is_empty()
    }

    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.is_feasible() && self.is_stable()
    }

    /// One-line description of the first problems found
    #[must_use]
    pub fn summary(&self) -> String {
        let mut parts: Vec<String> = self.violations.iter().take(3).map(ToString::to_string).collect();
        if !self.blocking_pairs.is_empty() {
            let pairs: Vec<String> = self.blocking_pairs.iter().take(3).map(ToString::to_string).collect();
            parts.push(format!(
                "{} blocking pair(s) for {}: {}",
                self.blocking_pairs.len(),
                self.mode,
                pairs.join(", ")
            ));
        }
        if parts.is_empty() {
            format!("matching is feasible and {}", self.mode)
        } else {
            parts.join("; ")
        }
    }
}

/// Check a matching for feasibility and for stability under `mode`.
///
/// Never mutates its inputs. Blocking pairs are only searched among mutually
/// acceptable pairs; a proposer assigned to several hosts is judged by the
/// first of them.
#[must_use]
pub fn validate(matching: &Matching, problem: &MatchProblem, mode: StabilityMode) -> ValidationReport {
    let violations = feasibility_violations(matching, problem);

    // Stability is meaningless against a matching for a different host table
    let blocking_pairs = if violations
        .iter()
        .any(|v| matches!(v, Violation::HostCountMismatch { .. } | Violation::UnknownProposer { .. }))
    {
        Vec::new()
    } else {
        blocking_pairs(matching, problem, mode)
    };

    ValidationReport {
        mode,
        violations,
        blocking_pairs,
    }
}

fn feasibility_violations(matching: &Matching, problem: &MatchProblem) -> Vec<Violation> {
    let model = problem.model();
    let mut violations = Vec::new();

    if matching.host_count() != model.host_count() {
        violations.push(Violation::HostCountMismatch {
            expected: model.host_count(),
            found: matching.host_count(),
        });
        return violations;
    }

    if let Some((p, _)) = matching.pairs().find(|&(p, _)| p >= model.proposer_count()) {
        violations.push(Violation::UnknownProposer { index: p });
        return violations;
    }

    let capacities = problem.capacity_vec();
    for (h, &capacity) in capacities.iter().enumerate() {
        let assigned = matching.assigned(h).len();
        if assigned > capacity {
            violations.push(Violation::OverCapacity {
                host: model.host_id(h).clone(),
                assigned,
                capacity,
            });
        }
    }

    for (p, hosts) in matching.hosts_by_proposer(model.proposer_count()).iter().enumerate() {
        if hosts.len() > 1 {
            violations.push(Violation::MultipleAssignment {
                proposer: model.proposer_id(p).clone(),
                hosts: hosts.iter().map(|&h| model.host_id(h).clone()).collect(),
            });
        }
    }

    for (p, h) in matching.pairs() {
        if !model.is_acceptable(p, h) {
            violations.push(Violation::Unacceptable {
                proposer: model.proposer_id(p).clone(),
                host: model.host_id(h).clone(),
            });
        }
    }

    violations
}

fn blocking_pairs(matching: &Matching, problem: &MatchProblem, mode: StabilityMode) -> Vec<BlockingPair> {
    let model = problem.model();
    let capacities = problem.capacity_vec();
    let hosts_of = matching.hosts_by_proposer(model.proposer_count());

    // Rank of each host's worst assignee; unranked assignees rank below everyone
    let worst_rank: Vec<usize> = (0..model.host_count())
        .map(|h| {
            matching
                .assigned(h)
                .iter()
                .map(|&p| model.host_rank(h, p).unwrap_or(usize::MAX))
                .max()
                .unwrap_or(usize::MAX)
        })
        .collect();

    let accepts = |pref: Preference| match mode {
        StabilityMode::Super => pref.at_least_as_good(),
        StabilityMode::Weak => pref == Preference::Prefers,
    };

    let mut pairs = Vec::new();
    for p in 0..model.proposer_count() {
        let current = hosts_of[p].first().copied();
        for h in model.proposer_prefs(p).candidates() {
            if current == Some(h) {
                continue;
            }
            let Some(host_rank_of_p) = model.host_rank(h, p) else {
                continue;
            };

            let proposer_side = match current {
                None => true,
                Some(cur) => {
                    let cur_rank = model.proposer_rank(p, cur).unwrap_or(usize::MAX);
                    let h_rank = model.proposer_rank(p, h).unwrap_or(usize::MAX);
                    accepts(Preference::from_ranks(h_rank, cur_rank))
                }
            };
            if !proposer_side {
                continue;
            }

            let host_side = matching.assigned(h).len() < capacities[h]
                || accepts(Preference::from_ranks(host_rank_of_p, worst_rank[h]));

            if host_side {
                pairs.push(BlockingPair {
                    proposer: model.proposer_id(p).clone(),
                    host: model.host_id(h).clone(),
                });
            }
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::capacity::CapacityTable;
    use crate::core::preference::RankingRow;
    use crate::core::types::ParticipantId;

    fn tied(id: &str, names: &[&str]) -> RankingRow {
        RankingRow::new(id, vec![names.iter().map(|n| ParticipantId::from(*n)).collect()])
    }

    fn all_tied_problem() -> MatchProblem {
        let proposers = vec![tied("P1", &["H1", "H2"]), tied("P2", &["H1", "H2"])];
        let hosts = vec![tied("H1", &["P1", "P2"]), tied("H2", &["P1", "P2"])];
        MatchProblem::new(&proposers, &hosts, CapacityTable::new([("H1", 1), ("H2", 1)]).unwrap()).unwrap()
    }

    #[test]
    fn test_ties_block_only_under_super() {
        let problem = all_tied_problem();
        let matching = Matching::from_assignments(vec![vec![0], vec![1]]);

        let weak = validate(&matching, &problem, StabilityMode::Weak);
        assert!(weak.is_valid(), "{}", weak.summary());

        let super_report = validate(&matching, &problem, StabilityMode::Super);
        assert!(super_report.is_feasible());
        assert!(!super_report.is_stable());
        assert_eq!(super_report.blocking_pairs.len(), 2);
    }

    #[test]
    fn test_unmatched_proposer_blocks_free_host() {
        let problem = all_tied_problem();
        let matching = Matching::from_assignments(vec![vec![0], vec![]]);

        // P1 is indifferent between H1 and H2, so only the unmatched P2 blocks
        let report = validate(&matching, &problem, StabilityMode::Weak);
        assert_eq!(
            report.blocking_pairs,
            vec![BlockingPair {
                proposer: ParticipantId::from("P2"),
                host: ParticipantId::from("H2")
            }]
        );
    }

    #[test]
    fn test_feasibility_violations() {
        let proposers = vec![RankingRow::strict("P1", ["H1"]), RankingRow::strict("P2", ["H1"])];
        let hosts = vec![RankingRow::strict("H1", ["P1"]), RankingRow::strict("H2", ["P1"])];
        let problem =
            MatchProblem::new(&proposers, &hosts, CapacityTable::new([("H1", 1), ("H2", 1)]).unwrap()).unwrap();

        let matching = Matching::from_assignments(vec![vec![0, 1], vec![0]]);
        let report = validate(&matching, &problem, StabilityMode::Weak);
        assert!(!report.is_feasible());
        assert!(report
            .violations
            .iter()
            .any(|v| matches!(v, Violation::OverCapacity { assigned: 2, capacity: 1, .. })));
        assert!(report
            .violations
            .iter()
            .any(|v| matches!(v, Violation::MultipleAssignment { .. })));
        // P2 is not ranked by H1, and P1 does not rank H2
        assert_eq!(
            report
                .violations
                .iter()
                .filter(|v| matches!(v, Violation::Unacceptable { .. }))
                .count(),
            2
        );
    }

    #[test]
    fn test_host_count_mismatch() {
        let problem = all_tied_problem();
        let report = validate(&Matching::new(5), &problem, StabilityMode::Super);
        assert_eq!(
            report.violations,
            vec![Violation::HostCountMismatch { expected: 2, found: 5 }]
        );
        assert!(report.blocking_pairs.is_empty());
    }

    #[test]
    fn test_strict_preference_blocks_weakly() {
        let proposers = vec![RankingRow::strict("P1", ["H1", "H2"]), RankingRow::strict("P2", ["H1"])];
        let hosts = vec![RankingRow::strict("H1", ["P1", "P2"]), RankingRow::strict("H2", ["P1"])];
        let problem =
            MatchProblem::new(&proposers, &hosts, CapacityTable::new([("H1", 1), ("H2", 1)]).unwrap()).unwrap();

        // P1 and H1 both prefer each other to their partners
        let matching = Matching::from_assignments(vec![vec![1], vec![0]]);
        let report = validate(&matching, &problem, StabilityMode::Weak);
        assert!(report.is_feasible());
        assert_eq!(report.blocking_pairs.len(), 1);
        assert!(report.summary().contains("(P1, H1)"));
    }
}
