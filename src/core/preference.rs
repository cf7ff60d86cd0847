//! Tie-permitting preference sequences.
//!
//! A [`PreferenceList`] is an ordered sequence of tie-groups over candidate
//! indices; the first group is the most desirable. Candidates that do not
//! appear are unacceptable. The [`PreferenceModel`] owns one list per proposer
//! (over host indices) and one per host (over proposer indices), together with
//! the identifier tables that resolve names to indices.

use std::collections::{HashMap, HashSet};

use crate::core::problem::ProblemError;
use crate::core::types::{ParticipantId, Preference, Side};
use crate::utils::validation::closest_match;

/// One raw ranking row: a participant and its tie-groups of named candidates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankingRow {
    pub id: ParticipantId,
    pub groups: Vec<Vec<ParticipantId>>,
    /// 1-based source line, when the row came from a file
    pub line: Option<usize>,
}

impl RankingRow {
    pub fn new(id: impl Into<String>, groups: Vec<Vec<ParticipantId>>) -> Self {
        Self {
            id: ParticipantId::new(id),
            groups,
            line: None,
        }
    }

    /// A row without ties: each candidate is its own group
    pub fn strict<I, S>(id: impl Into<String>, candidates: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let groups = candidates
            .into_iter()
            .map(|c| vec![ParticipantId::new(c)])
            .collect();
        Self::new(id, groups)
    }

    #[must_use]
    pub fn with_line(mut self, line: usize) -> Self {
        self.line = Some(line);
        self
    }

    fn location(&self) -> String {
        self.line
            .map(|l| format!(" (line {l})"))
            .unwrap_or_default()
    }
}

/// An ordered sequence of tie-groups over candidate indices
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreferenceList {
    groups: Vec<Vec<usize>>,
    /// candidate -> index of its group
    ranks: HashMap<usize, usize>,
}

impl PreferenceList {
    /// Build from tie-groups, dropping empty groups.
    ///
    /// # Errors
    ///
    /// Returns the first candidate that appears more than once.
    pub fn new(groups: Vec<Vec<usize>>) -> Result<Self, usize> {
        let groups: Vec<Vec<usize>> = groups.into_iter().filter(|g| !g.is_empty()).collect();
        let mut ranks = HashMap::new();
        for (rank, group) in groups.iter().enumerate() {
            for &candidate in group {
                if ranks.insert(candidate, rank).is_some() {
                    return Err(candidate);
                }
            }
        }
        Ok(Self { groups, ranks })
    }

    /// Build from tie-groups already known to hold each candidate at most once
    pub(crate) fn from_unique_groups(groups: Vec<Vec<usize>>) -> Self {
        let groups: Vec<Vec<usize>> = groups.into_iter().filter(|g| !g.is_empty()).collect();
        let ranks: HashMap<usize, usize> = groups
            .iter()
            .enumerate()
            .flat_map(|(rank, group)| group.iter().map(move |&candidate| (candidate, rank)))
            .collect();
        debug_assert_eq!(ranks.len(), groups.iter().map(Vec::len).sum::<usize>());
        Self { groups, ranks }
    }

    /// Build a strict order with one candidate per group
    ///
    /// # Errors
    ///
    /// Returns the first candidate that appears more than once.
    pub fn strict(order: impl IntoIterator<Item = usize>) -> Result<Self, usize> {
        Self::new(order.into_iter().map(|c| vec![c]).collect())
    }

    #[must_use]
    pub fn groups(&self) -> &[Vec<usize>] {
        &self.groups
    }

    /// Number of ranked candidates
    #[must_use]
    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    /// Candidates in preference order, ties in input order
    pub fn candidates(&self) -> impl Iterator<Item = usize> + '_ {
        self.groups.iter().flatten().copied()
    }

    #[must_use]
    pub fn rank_of(&self, candidate: usize) -> Option<usize> {
        self.ranks.get(&candidate).copied()
    }

    #[must_use]
    pub fn contains(&self, candidate: usize) -> bool {
        self.ranks.contains_key(&candidate)
    }

    /// True if the candidate is ranked alone in its group
    #[must_use]
    pub fn ranks_strictly(&self, candidate: usize) -> bool {
        self.rank_of(candidate)
            .is_some_and(|rank| self.groups[rank].len() == 1)
    }

    /// True if no group holds more than one candidate
    #[must_use]
    pub fn is_strict(&self) -> bool {
        self.groups.iter().all(|g| g.len() == 1)
    }

    /// Compare two candidates; `None` if either is unranked
    #[must_use]
    pub fn compare(&self, a: usize, b: usize) -> Option<Preference> {
        Some(Preference::from_ranks(self.rank_of(a)?, self.rank_of(b)?))
    }
}

/// A participant's identifier and preference sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub id: ParticipantId,
    pub preferences: PreferenceList,
}

/// Normalized preferences of both sides, indexed by participant position
#[derive(Debug, Clone)]
pub struct PreferenceModel {
    proposers: Vec<Participant>,
    hosts: Vec<Participant>,
    proposer_index: HashMap<ParticipantId, usize>,
    host_index: HashMap<ParticipantId, usize>,
}

impl PreferenceModel {
    /// Build the model from raw ranking rows.
    ///
    /// Proposer and host tables are the row identifiers, in row order.
    ///
    /// # Errors
    ///
    /// Returns `ProblemError::MalformedInput` for a duplicate row, a duplicate
    /// identifier within one ranking, or a ranked identifier absent from the
    /// opposite table.
    pub fn new(proposer_rows: &[RankingRow], host_rows: &[RankingRow]) -> Result<Self, ProblemError> {
        let proposer_index = index_rows(proposer_rows, Side::Proposer)?;
        let host_index = index_rows(host_rows, Side::Host)?;

        let proposers = resolve_rows(proposer_rows, Side::Proposer, &host_index)?;
        let hosts = resolve_rows(host_rows, Side::Host, &proposer_index)?;

        Ok(Self {
            proposers,
            hosts,
            proposer_index,
            host_index,
        })
    }

    /// Same participants, replacement preference lists
    pub(crate) fn with_preferences(
        &self,
        proposer_lists: Vec<PreferenceList>,
        host_lists: Vec<PreferenceList>,
    ) -> Self {
        let rebuild = |participants: &[Participant], lists: Vec<PreferenceList>| {
            participants
                .iter()
                .zip(lists)
                .map(|(p, preferences)| Participant {
                    id: p.id.clone(),
                    preferences,
                })
                .collect()
        };

        Self {
            proposers: rebuild(&self.proposers, proposer_lists),
            hosts: rebuild(&self.hosts, host_lists),
            proposer_index: self.proposer_index.clone(),
            host_index: self.host_index.clone(),
        }
    }

    #[must_use]
    pub fn proposer_count(&self) -> usize {
        self.proposers.len()
    }

    #[must_use]
    pub fn host_count(&self) -> usize {
        self.hosts.len()
    }

    #[must_use]
    pub fn proposers(&self) -> &[Participant] {
        &self.proposers
    }

    #[must_use]
    pub fn hosts(&self) -> &[Participant] {
        &self.hosts
    }

    #[must_use]
    pub fn proposer_id(&self, proposer: usize) -> &ParticipantId {
        &self.proposers[proposer].id
    }

    #[must_use]
    pub fn host_id(&self, host: usize) -> &ParticipantId {
        &self.hosts[host].id
    }

    #[must_use]
    pub fn proposer_index_of(&self, id: &str) -> Option<usize> {
        self.proposer_index.get(&ParticipantId::from(id)).copied()
    }

    #[must_use]
    pub fn host_index_of(&self, id: &str) -> Option<usize> {
        self.host_index.get(&ParticipantId::from(id)).copied()
    }

    /// A proposer's ranking of hosts
    #[must_use]
    pub fn proposer_prefs(&self, proposer: usize) -> &PreferenceList {
        &self.proposers[proposer].preferences
    }

    /// A host's ranking of proposers
    #[must_use]
    pub fn host_prefs(&self, host: usize) -> &PreferenceList {
        &self.hosts[host].preferences
    }

    /// Both sides rank each other
    #[must_use]
    pub fn is_acceptable(&self, proposer: usize, host: usize) -> bool {
        self.proposer_prefs(proposer).contains(host) && self.host_prefs(host).contains(proposer)
    }

    /// Rank-group index of `host` in the proposer's sequence
    #[must_use]
    pub fn proposer_rank(&self, proposer: usize, host: usize) -> Option<usize> {
        self.proposer_prefs(proposer).rank_of(host)
    }

    /// Rank-group index of `proposer` in the host's sequence
    #[must_use]
    pub fn host_rank(&self, host: usize, proposer: usize) -> Option<usize> {
        self.host_prefs(host).rank_of(proposer)
    }

    /// How the proposer regards host `a` relative to host `b`
    #[must_use]
    pub fn compare_hosts(&self, proposer: usize, a: usize, b: usize) -> Option<Preference> {
        self.proposer_prefs(proposer).compare(a, b)
    }

    /// How the host regards proposer `a` relative to proposer `b`
    #[must_use]
    pub fn compare_proposers(&self, host: usize, a: usize, b: usize) -> Option<Preference> {
        self.host_prefs(host).compare(a, b)
    }

    /// Total number of mutually acceptable pairs
    #[must_use]
    pub fn acceptable_pair_count(&self) -> usize {
        (0..self.proposer_count())
            .map(|p| {
                self.proposer_prefs(p)
                    .candidates()
                    .filter(|&h| self.host_prefs(h).contains(p))
                    .count()
            })
            .sum()
    }
}

fn index_rows(rows: &[RankingRow], side: Side) -> Result<HashMap<ParticipantId, usize>, ProblemError> {
    let mut index = HashMap::with_capacity(rows.len());
    for (i, row) in rows.iter().enumerate() {
        if index.insert(row.id.clone(), i).is_some() {
            return Err(ProblemError::MalformedInput(format!(
                "{side} {} appears in more than one ranking row{}",
                row.id,
                row.location()
            )));
        }
    }
    Ok(index)
}

fn resolve_rows(
    rows: &[RankingRow],
    side: Side,
    opposite: &HashMap<ParticipantId, usize>,
) -> Result<Vec<Participant>, ProblemError> {
    rows.iter()
        .map(|row| {
            let mut seen = HashSet::new();
            let mut duplicates = Vec::new();
            let mut groups = Vec::with_capacity(row.groups.len());

            for group in &row.groups {
                let mut resolved = Vec::with_capacity(group.len());
                for candidate in group {
                    if !seen.insert(candidate) {
                        duplicates.push(candidate.as_str());
                        continue;
                    }
                    let Some(&idx) = opposite.get(candidate) else {
                        let suggestion = closest_match(candidate.as_str(), opposite.keys().map(ParticipantId::as_str))
                            .unwrap_or("UNKNOWN");
                        return Err(ProblemError::MalformedInput(format!(
                            "{side} {} ranked a {} {candidate} that does not exist{}. The closest candidate is {suggestion}",
                            row.id,
                            side.opposite(),
                            row.location()
                        )));
                    };
                    resolved.push(idx);
                }
                groups.push(resolved);
            }

            if !duplicates.is_empty() {
                return Err(ProblemError::MalformedInput(format!(
                    "{side} {} has duplicate rankings [{}]{}",
                    row.id,
                    duplicates.join(", "),
                    row.location()
                )));
            }

            // Duplicates were rejected above, so construction cannot fail here
            let preferences = PreferenceList::new(groups).map_err(|_| {
                ProblemError::MalformedInput(format!("{side} {} has duplicate rankings", row.id))
            })?;

            if preferences.is_empty() {
                tracing::debug!("{side} {} ranks nobody", row.id);
            }

            Ok(Participant {
                id: row.id.clone(),
                preferences,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<ParticipantId> {
        names.iter().map(|n| ParticipantId::from(*n)).collect()
    }

    #[test]
    fn test_preference_list_ranks_and_ties() {
        let list = PreferenceList::new(vec![vec![2], vec![0, 1], vec![], vec![3]]).unwrap();
        assert_eq!(list.groups().len(), 3);
        assert_eq!(list.len(), 4);
        assert_eq!(list.rank_of(2), Some(0));
        assert_eq!(list.rank_of(1), Some(1));
        assert_eq!(list.rank_of(3), Some(2));
        assert_eq!(list.rank_of(9), None);
        assert!(list.ranks_strictly(2));
        assert!(!list.ranks_strictly(0));
        assert!(!list.is_strict());
        assert_eq!(list.candidates().collect::<Vec<_>>(), vec![2, 0, 1, 3]);
    }

    #[test]
    fn test_preference_list_compare() {
        let list = PreferenceList::new(vec![vec![0], vec![1, 2]]).unwrap();
        assert_eq!(list.compare(0, 1), Some(Preference::Prefers));
        assert_eq!(list.compare(1, 2), Some(Preference::Indifferent));
        assert_eq!(list.compare(2, 0), Some(Preference::Disprefers));
        assert_eq!(list.compare(0, 7), None);
    }

    #[test]
    fn test_preference_list_rejects_duplicates() {
        assert_eq!(PreferenceList::new(vec![vec![0, 1], vec![0]]), Err(0));
        assert_eq!(PreferenceList::strict([3, 4, 3]), Err(3));
    }

    #[test]
    fn test_preference_list_from_unique_groups() {
        let groups = vec![vec![2, 0], vec![], vec![1]];
        let list = PreferenceList::from_unique_groups(groups.clone());
        assert_eq!(list, PreferenceList::new(groups).unwrap());
        assert_eq!(list.groups().len(), 2);
        assert_eq!(list.rank_of(1), Some(1));
    }

    #[test]
    fn test_model_resolves_indices() {
        let proposers = vec![
            RankingRow::new("S1", vec![ids(&["M2", "M1"])]),
            RankingRow::strict("S2", ["M1"]),
        ];
        let hosts = vec![
            RankingRow::strict("M1", ["S2", "S1"]),
            RankingRow::strict("M2", ["S1"]),
        ];

        let model = PreferenceModel::new(&proposers, &hosts).unwrap();
        assert_eq!(model.proposer_count(), 2);
        assert_eq!(model.host_count(), 2);
        assert_eq!(model.proposer_index_of("S2"), Some(1));
        assert_eq!(model.host_index_of("M2"), Some(1));
        assert_eq!(model.proposer_rank(0, 0), Some(0));
        assert_eq!(model.proposer_rank(0, 1), Some(0));
        assert_eq!(model.compare_hosts(0, 0, 1), Some(Preference::Indifferent));
        assert_eq!(model.compare_proposers(0, 1, 0), Some(Preference::Prefers));
        assert!(model.is_acceptable(1, 0));
        assert!(!model.is_acceptable(1, 1));
        assert_eq!(model.acceptable_pair_count(), 3);
    }

    #[test]
    fn test_model_rejects_duplicate_ranking() {
        let proposers = vec![RankingRow::strict("S1", ["M1", "M1"])];
        let hosts = vec![RankingRow::strict("M1", ["S1"])];

        let err = PreferenceModel::new(&proposers, &hosts).unwrap_err();
        assert!(matches!(err, ProblemError::MalformedInput(ref msg) if msg.contains("duplicate")));
    }

    #[test]
    fn test_model_rejects_tied_duplicate() {
        let proposers = vec![RankingRow::new("S1", vec![ids(&["M1"]), ids(&["M2", "M1"])])];
        let hosts = vec![RankingRow::strict("M1", ["S1"]), RankingRow::strict("M2", ["S1"])];

        assert!(PreferenceModel::new(&proposers, &hosts).is_err());
    }

    #[test]
    fn test_model_rejects_duplicate_rows() {
        let proposers = vec![RankingRow::strict("S1", ["M1"]), RankingRow::strict("S1", ["M1"])];
        let hosts = vec![RankingRow::strict("M1", ["S1"])];

        let err = PreferenceModel::new(&proposers, &hosts).unwrap_err();
        assert!(err.to_string().contains("more than one ranking row"));
    }

    #[test]
    fn test_model_suggests_closest_identifier() {
        let proposers = vec![RankingRow::strict("S1", ["m1"]).with_line(4)];
        let hosts = vec![RankingRow::strict("M1", ["S1"]), RankingRow::strict("Zed", ["S1"])];

        let err = PreferenceModel::new(&proposers, &hosts).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("closest candidate is M1"), "{msg}");
        assert!(msg.contains("line 4"), "{msg}");
    }

    #[test]
    fn test_model_rejects_unknown_proposer() {
        let proposers = vec![RankingRow::strict("S1", ["M1"])];
        let hosts = vec![RankingRow::strict("M1", ["S2"])];

        assert!(PreferenceModel::new(&proposers, &hosts).is_err());
    }
}
