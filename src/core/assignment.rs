use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::preference::PreferenceModel;
use crate::core::problem::ProblemError;
use crate::core::types::ParticipantId;

/// A matching by model index: host -> assigned proposers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Matching {
    assigned: Vec<Vec<usize>>,
}

impl Matching {
    /// An empty matching over `host_count` hosts
    #[must_use]
    pub fn new(host_count: usize) -> Self {
        Self {
            assigned: vec![Vec::new(); host_count],
        }
    }

    /// Build from per-host proposer lists; each list is sorted
    #[must_use]
    pub fn from_assignments(mut assigned: Vec<Vec<usize>>) -> Self {
        for proposers in &mut assigned {
            proposers.sort_unstable();
        }
        Self { assigned }
    }

    pub fn assign(&mut self, host: usize, proposer: usize) {
        let proposers = &mut self.assigned[host];
        if let Err(pos) = proposers.binary_search(&proposer) {
            proposers.insert(pos, proposer);
        }
    }

    #[must_use]
    pub fn host_count(&self) -> usize {
        self.assigned.len()
    }

    /// Proposers assigned to a host, ascending by index
    #[must_use]
    pub fn assigned(&self, host: usize) -> &[usize] {
        self.assigned.get(host).map_or(&[] as &[usize], Vec::as_slice)
    }

    /// All `(proposer, host)` pairs
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.assigned
            .iter()
            .enumerate()
            .flat_map(|(h, ps)| ps.iter().map(move |&p| (p, h)))
    }

    /// Hosts each proposer is assigned to; more than one only in infeasible matchings
    #[must_use]
    pub fn hosts_by_proposer(&self, proposer_count: usize) -> Vec<Vec<usize>> {
        let mut hosts = vec![Vec::new(); proposer_count];
        for (p, h) in self.pairs() {
            if let Some(entry) = hosts.get_mut(p) {
                entry.push(h);
            }
        }
        hosts
    }

    #[must_use]
    pub fn host_of(&self, proposer: usize) -> Option<usize> {
        self.pairs().find(|&(p, _)| p == proposer).map(|(_, h)| h)
    }

    #[must_use]
    pub fn matched_count(&self) -> usize {
        self.assigned.iter().map(Vec::len).sum()
    }

    /// Proposers not assigned to any host
    #[must_use]
    pub fn unmatched(&self, proposer_count: usize) -> Vec<usize> {
        let hosts = self.hosts_by_proposer(proposer_count);
        (0..proposer_count).filter(|&p| hosts[p].is_empty()).collect()
    }

    /// Resolve indices to identifiers
    #[must_use]
    pub fn to_named(&self, model: &PreferenceModel) -> NamedMatching {
        let rows = self
            .assigned
            .iter()
            .enumerate()
            .map(|(h, ps)| {
                let mut proposers: Vec<ParticipantId> =
                    ps.iter().map(|&p| model.proposer_id(p).clone()).collect();
                proposers.sort();
                (model.host_id(h).clone(), proposers)
            })
            .collect();
        NamedMatching(rows)
    }

    /// Resolve named rows against a model.
    ///
    /// Hosts not mentioned get an empty assignment.
    ///
    /// # Errors
    ///
    /// Returns `ProblemError::MalformedInput` for unknown identifiers or a host
    /// listed twice.
    pub fn from_named(
        model: &PreferenceModel,
        rows: &[(ParticipantId, Vec<ParticipantId>)],
    ) -> Result<Self, ProblemError> {
        let mut assigned: Vec<Option<Vec<usize>>> = vec![None; model.host_count()];
        for (host, proposers) in rows {
            let h = model.host_index_of(host.as_str()).ok_or_else(|| {
                ProblemError::MalformedInput(format!("matching lists unknown host {host}"))
            })?;
            if assigned[h].is_some() {
                return Err(ProblemError::MalformedInput(format!(
                    "matching lists host {host} more than once"
                )));
            }
            let resolved = proposers
                .iter()
                .map(|p| {
                    model.proposer_index_of(p.as_str()).ok_or_else(|| {
                        ProblemError::MalformedInput(format!(
                            "matching assigns unknown proposer {p} to host {host}"
                        ))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            assigned[h] = Some(resolved);
        }
        Ok(Self::from_assignments(
            assigned.into_iter().map(Option::unwrap_or_default).collect(),
        ))
    }
}

/// A matching by identifier, hosts and proposers sorted
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NamedMatching(pub BTreeMap<ParticipantId, Vec<ParticipantId>>);

impl NamedMatching {
    #[must_use]
    pub fn get(&self, host: &str) -> Option<&[ParticipantId]> {
        self.0.get(&ParticipantId::from(host)).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ParticipantId, &[ParticipantId])> {
        self.0.iter().map(|(h, ps)| (h, ps.as_slice()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::preference::RankingRow;

    fn model() -> PreferenceModel {
        let proposers = vec![
            RankingRow::strict("S1", ["M1"]),
            RankingRow::strict("S2", ["M1"]),
            RankingRow::strict("S3", ["M2"]),
        ];
        let hosts = vec![
            RankingRow::strict("M1", ["S1", "S2"]),
            RankingRow::strict("M2", ["S3"]),
        ];
        PreferenceModel::new(&proposers, &hosts).unwrap()
    }

    #[test]
    fn test_assign_keeps_sorted_and_unique() {
        let mut matching = Matching::new(2);
        matching.assign(0, 1);
        matching.assign(0, 0);
        matching.assign(0, 1);
        assert_eq!(matching.assigned(0), &[0, 1]);
        assert_eq!(matching.matched_count(), 2);
        assert_eq!(matching.host_of(1), Some(0));
        assert_eq!(matching.host_of(2), None);
        assert_eq!(matching.unmatched(3), vec![2]);
        assert_eq!(matching.assigned(7), &[] as &[usize]);
    }

    #[test]
    fn test_named_round_trip_through_model() {
        let model = model();
        let matching = Matching::from_assignments(vec![vec![1, 0], vec![]]);
        let named = matching.to_named(&model);
        assert_eq!(named.len(), 2);
        assert_eq!(
            named.get("M1").unwrap(),
            &[ParticipantId::from("S1"), ParticipantId::from("S2")]
        );
        assert!(named.get("M2").unwrap().is_empty());

        let rows: Vec<_> = named.iter().map(|(h, ps)| (h.clone(), ps.to_vec())).collect();
        assert_eq!(Matching::from_named(&model, &rows).unwrap(), matching);
    }

    #[test]
    fn test_from_named_rejects_unknown() {
        let model = model();
        let rows = vec![(ParticipantId::from("M9"), vec![])];
        assert!(Matching::from_named(&model, &rows).is_err());

        let rows = vec![(ParticipantId::from("M1"), vec![ParticipantId::from("S9")])];
        assert!(Matching::from_named(&model, &rows).is_err());
    }
}
