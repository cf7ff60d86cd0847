use std::collections::VecDeque;

use tracing::debug;

use crate::core::assignment::Matching;
use crate::core::problem::MatchProblem;
use crate::core::types::StabilityMode;
use crate::matching::validator::validate;
use crate::matching::SolveError;

/// Proposer-proposing capacitated deferred acceptance over strict preferences.
///
/// Expects a problem whose preferences carry no ties, as produced by
/// [`linearize_problem`](crate::matching::linearize::linearize_problem). The
/// result is the proposer-optimal stable matching for those preferences.
pub struct WeakStableSolver<'a> {
    problem: &'a MatchProblem,
}

impl<'a> WeakStableSolver<'a> {
    pub fn new(problem: &'a MatchProblem) -> Self {
        Self { problem }
    }

    /// Run deferred acceptance.
    ///
    /// # Errors
    ///
    /// Returns `SolveError::InvariantViolation` if the preferences contain
    /// ties, if more proposals are made than there are acceptable pairs, or if
    /// the result fails weak-stability validation. None of these can happen
    /// for a linearized problem.
    pub fn solve(&self) -> Result<Matching, SolveError> {
        let model = self.problem.model();
        let violation = |detail: String| SolveError::InvariantViolation {
            mode: StabilityMode::Weak,
            detail,
        };

        if let Some(p) = (0..model.proposer_count()).find(|&p| !model.proposer_prefs(p).is_strict()) {
            return Err(violation(format!(
                "proposer {} still has tied preferences",
                model.proposer_id(p)
            )));
        }
        if let Some(h) = (0..model.host_count()).find(|&h| !model.host_prefs(h).is_strict()) {
            return Err(violation(format!("host {} still has tied preferences", model.host_id(h))));
        }

        let lists: Vec<Vec<usize>> = (0..model.proposer_count())
            .map(|p| {
                model
                    .proposer_prefs(p)
                    .candidates()
                    .filter(|&h| model.host_prefs(h).contains(p))
                    .collect()
            })
            .collect();
        let capacities = self.problem.capacity_vec();
        let max_proposals: usize = lists.iter().map(Vec::len).sum();

        let mut next = vec![0usize; model.proposer_count()];
        let mut held: Vec<Vec<usize>> = vec![Vec::new(); model.host_count()];
        let mut queue: VecDeque<usize> = (0..model.proposer_count()).collect();
        let mut proposals = 0usize;

        while let Some(p) = queue.pop_front() {
            while let Some(&h) = lists[p].get(next[p]) {
                next[p] += 1;
                proposals += 1;
                if proposals > max_proposals {
                    return Err(violation(format!(
                        "deferred acceptance exceeded {max_proposals} proposals"
                    )));
                }

                if held[h].len() < capacities[h] {
                    held[h].push(p);
                    break;
                }

                // Host is full: displace its worst held proposer if p is better
                let rank = |q: usize| model.host_rank(h, q).unwrap_or(usize::MAX);
                let Some((slot, &worst)) = held[h].iter().enumerate().max_by_key(|&(_, &q)| rank(q)) else {
                    continue;
                };
                if rank(p) < rank(worst) {
                    held[h][slot] = p;
                    queue.push_back(worst);
                    break;
                }
            }
        }

        debug!(proposals, "deferred acceptance finished");

        let matching = Matching::from_assignments(held);
        let report = validate(&matching, self.problem, StabilityMode::Weak);
        if !report.is_valid() {
            return Err(violation(report.summary()));
        }

        Ok(matching)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::capacity::CapacityTable;
    use crate::core::preference::RankingRow;
    use crate::core::types::ParticipantId;

    fn problem(proposers: Vec<RankingRow>, hosts: Vec<RankingRow>, capacities: &[(&str, i64)]) -> MatchProblem {
        MatchProblem::new(
            &proposers,
            &hosts,
            CapacityTable::new(capacities.iter().copied()).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_proposer_optimal_one_to_one() {
        // Classic instance where proposers get their first choices
        let problem = problem(
            vec![RankingRow::strict("A", ["X", "Y"]), RankingRow::strict("B", ["Y", "X"])],
            vec![RankingRow::strict("X", ["B", "A"]), RankingRow::strict("Y", ["A", "B"])],
            &[("X", 1), ("Y", 1)],
        );

        let matching = WeakStableSolver::new(&problem).solve().unwrap();
        assert_eq!(matching.assigned(0), &[0]);
        assert_eq!(matching.assigned(1), &[1]);
    }

    #[test]
    fn test_host_displaces_worse_proposer() {
        let problem = problem(
            vec![
                RankingRow::strict("A", ["X"]),
                RankingRow::strict("B", ["X", "Y"]),
                RankingRow::strict("C", ["X", "Y"]),
            ],
            vec![
                RankingRow::strict("X", ["C", "A", "B"]),
                RankingRow::strict("Y", ["B", "C"]),
            ],
            &[("X", 2), ("Y", 1)],
        );

        let matching = WeakStableSolver::new(&problem).solve().unwrap();
        let named = matching.to_named(problem.model());
        assert_eq!(
            named.get("X").unwrap(),
            &[ParticipantId::from("A"), ParticipantId::from("C")]
        );
        assert_eq!(named.get("Y").unwrap(), &[ParticipantId::from("B")]);
    }

    #[test]
    fn test_rejected_everywhere_stays_unmatched() {
        let problem = problem(
            vec![RankingRow::strict("A", ["X"]), RankingRow::strict("B", ["X"])],
            vec![RankingRow::strict("X", ["B", "A"]), RankingRow::strict("Y", Vec::<&str>::new())],
            &[("X", 1), ("Y", 1)],
        );

        let matching = WeakStableSolver::new(&problem).solve().unwrap();
        assert_eq!(matching.assigned(0), &[1]);
        assert_eq!(matching.unmatched(2), vec![0]);
    }

    #[test]
    fn test_ties_are_an_invariant_violation() {
        let problem = problem(
            vec![RankingRow::new(
                "A",
                vec![vec![ParticipantId::from("X"), ParticipantId::from("Y")]],
            )],
            vec![RankingRow::strict("X", ["A"]), RankingRow::strict("Y", ["A"])],
            &[("X", 1), ("Y", 1)],
        );

        assert!(matches!(
            WeakStableSolver::new(&problem).solve(),
            Err(SolveError::InvariantViolation {
                mode: StabilityMode::Weak,
                ..
            })
        ));
    }
}
