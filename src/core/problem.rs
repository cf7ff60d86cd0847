use thiserror::Error;

use crate::core::capacity::CapacityTable;
use crate::core::preference::{PreferenceList, PreferenceModel, RankingRow};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProblemError {
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    #[error("Invalid capacity {capacity} for host {host}: capacities must be strictly positive integers")]
    InvalidCapacity { host: String, capacity: i64 },

    #[error("Insufficient capacity: hosts offer {available} places for {required} proposers; increase capacity for one or more hosts")]
    InsufficientCapacity { available: u64, required: usize },
}

/// A validated matching problem: both preference tables plus host capacities.
///
/// Host indices in the model follow the capacity table's order, so host `h`
/// of the model has capacity `capacity_vec()[h]`.
#[derive(Debug, Clone)]
pub struct MatchProblem {
    model: PreferenceModel,
    capacities: CapacityTable,
}

impl MatchProblem {
    /// Validate and assemble a problem from raw rankings and capacities.
    ///
    /// Hosts listed in the capacity table without a ranking row rank nobody.
    ///
    /// # Errors
    ///
    /// Returns `ProblemError::MalformedInput` if a host ranking row has no
    /// capacity entry or the rankings are malformed, and
    /// `ProblemError::InsufficientCapacity` if the hosts cannot seat every
    /// proposer.
    pub fn new(
        proposer_rows: &[RankingRow],
        host_rows: &[RankingRow],
        capacities: CapacityTable,
    ) -> Result<Self, ProblemError> {
        let mut ordered: Vec<Option<RankingRow>> = vec![None; capacities.len()];
        for row in host_rows {
            let Some(pos) = capacities.position(&row.id) else {
                let line = row.line.map(|l| format!(" (line {l})")).unwrap_or_default();
                return Err(ProblemError::MalformedInput(format!(
                    "host {} is not listed in the capacity table{line}",
                    row.id
                )));
            };
            if ordered[pos].is_some() {
                return Err(ProblemError::MalformedInput(format!(
                    "host {} appears in more than one ranking row",
                    row.id
                )));
            }
            ordered[pos] = Some(row.clone());
        }

        let host_rows: Vec<RankingRow> = ordered
            .into_iter()
            .zip(capacities.iter())
            .map(|(row, (host, _))| row.unwrap_or_else(|| RankingRow::new(host.as_str(), Vec::new())))
            .collect();

        let model = PreferenceModel::new(proposer_rows, &host_rows)?;
        capacities.check_sufficient(model.proposer_count())?;

        Ok(Self { model, capacities })
    }

    /// Same capacities, different preferences over the same participants
    pub(crate) fn with_model(&self, model: PreferenceModel) -> Self {
        Self {
            model,
            capacities: self.capacities.clone(),
        }
    }

    #[must_use]
    pub fn model(&self) -> &PreferenceModel {
        &self.model
    }

    #[must_use]
    pub fn capacities(&self) -> &CapacityTable {
        &self.capacities
    }

    /// Capacities aligned with model host indices
    #[must_use]
    pub fn capacity_vec(&self) -> Vec<usize> {
        self.capacities.iter().map(|(_, c)| c as usize).collect()
    }

    /// Extend every preference sequence so that all pairs are acceptable.
    ///
    /// Two tie-groups are appended to each participant's sequence: first the
    /// opposite-side participants that ranked it but were not ranked back,
    /// then everyone else not yet ranked.
    #[must_use]
    pub fn completed(&self) -> Self {
        let model = &self.model;
        let proposer_count = model.proposer_count();
        let host_count = model.host_count();

        let proposer_lists = (0..proposer_count)
            .map(|p| {
                complete_list(model.proposer_prefs(p), host_count, |h| {
                    model.host_prefs(h).contains(p)
                })
            })
            .collect();
        let host_lists = (0..host_count)
            .map(|h| {
                complete_list(model.host_prefs(h), proposer_count, |p| {
                    model.proposer_prefs(p).contains(h)
                })
            })
            .collect();

        self.with_model(model.with_preferences(proposer_lists, host_lists))
    }
}

fn complete_list(
    list: &PreferenceList,
    opposite_count: usize,
    ranks_owner: impl Fn(usize) -> bool,
) -> PreferenceList {
    let (admirers, rest): (Vec<usize>, Vec<usize>) = (0..opposite_count)
        .filter(|&c| !list.contains(c))
        .partition(|&c| ranks_owner(c));

    let mut groups = list.groups().to_vec();
    groups.push(admirers);
    groups.push(rest);
    PreferenceList::from_unique_groups(groups)
}
