//! Refinement of tie-permitting preferences into strict orders.
//!
//! Within a tie-group `G` of participant `X`, members that rank `X` strictly
//! (alone in one of their own groups) come first, ordered by how highly they
//! rank `X`; the remaining members, who rank `X` only as part of a tie or not
//! at all, follow. Any remaining ties keep input order. Strict preferences are
//! never reversed, so the result is a linear extension of the original.

use crate::core::preference::{PreferenceList, PreferenceModel};
use crate::core::problem::MatchProblem;

/// Refine one preference sequence.
///
/// `view_of_owner(m)` returns how member `m` ranks the owner of `list`:
/// `Some(rank)` if `m` ranks it strictly at group `rank`, `None` if `m` ranks
/// it within a tie or not at all.
pub fn linearize_list(list: &PreferenceList, view_of_owner: impl Fn(usize) -> Option<usize>) -> PreferenceList {
    let mut order = Vec::with_capacity(list.len());
    for group in list.groups() {
        let mut strict: Vec<(usize, usize, usize)> = Vec::new();
        let mut indifferent: Vec<usize> = Vec::new();
        for (position, &member) in group.iter().enumerate() {
            match view_of_owner(member) {
                Some(rank) => strict.push((rank, position, member)),
                None => indifferent.push(member),
            }
        }
        strict.sort_unstable();
        order.extend(strict.into_iter().map(|(_, _, member)| member));
        order.extend(indifferent);
    }
    PreferenceList::from_unique_groups(order.into_iter().map(|member| vec![member]).collect())
}

/// Linearize every participant's preferences, both sides independently
#[must_use]
pub fn linearize_model(model: &PreferenceModel) -> PreferenceModel {
    let proposer_lists = (0..model.proposer_count())
        .map(|p| {
            linearize_list(model.proposer_prefs(p), |h| {
                strict_rank(model.host_prefs(h), p)
            })
        })
        .collect();
    let host_lists = (0..model.host_count())
        .map(|h| {
            linearize_list(model.host_prefs(h), |p| {
                strict_rank(model.proposer_prefs(p), h)
            })
        })
        .collect();

    model.with_preferences(proposer_lists, host_lists)
}

/// The same problem with linearized preferences and unchanged capacities
#[must_use]
pub fn linearize_problem(problem: &MatchProblem) -> MatchProblem {
    problem.with_model(linearize_model(problem.model()))
}

fn strict_rank(list: &PreferenceList, candidate: usize) -> Option<usize> {
    if list.ranks_strictly(candidate) {
        list.rank_of(candidate)
    } else {
        None
    }
}
