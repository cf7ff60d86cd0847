use std::collections::HashMap;

use crate::core::problem::ProblemError;
use crate::core::types::ParticipantId;

/// Host identifier to strictly positive capacity, in input order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapacityTable {
    entries: Vec<(ParticipantId, u32)>,
    index: HashMap<ParticipantId, usize>,
}

impl CapacityTable {
    /// Build a capacity table from raw `(host, capacity)` pairs.
    ///
    /// # Errors
    ///
    /// Returns `ProblemError::InvalidCapacity` for a capacity below one (or one
    /// too large to represent), and `ProblemError::MalformedInput` if a host is
    /// listed twice.
    pub fn new<I, S>(entries: I) -> Result<Self, ProblemError>
    where
        I: IntoIterator<Item = (S, i64)>,
        S: Into<String>,
    {
        let mut table = Self::default();
        for (host, capacity) in entries {
            let host = ParticipantId::new(host);
            let value = u32::try_from(capacity)
                .ok()
                .filter(|&c| c > 0)
                .ok_or_else(|| ProblemError::InvalidCapacity {
                    host: host.to_string(),
                    capacity,
                })?;

            if table.index.contains_key(&host) {
                return Err(ProblemError::MalformedInput(format!(
                    "host {host} appears more than once in the capacity table"
                )));
            }
            table.index.insert(host.clone(), table.entries.len());
            table.entries.push((host, value));
        }
        Ok(table)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn get(&self, host: &ParticipantId) -> Option<u32> {
        self.index.get(host).map(|&i| self.entries[i].1)
    }

    #[must_use]
    pub fn contains(&self, host: &ParticipantId) -> bool {
        self.index.contains_key(host)
    }

    /// Position of a host in input order
    #[must_use]
    pub fn position(&self, host: &ParticipantId) -> Option<usize> {
        self.index.get(host).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ParticipantId, u32)> {
        self.entries.iter().map(|(h, c)| (h, *c))
    }

    /// Sum of all host capacities
    #[must_use]
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, c)| u64::from(*c)).sum()
    }

    /// Check that every proposer can be seated.
    ///
    /// # Errors
    ///
    /// Returns `ProblemError::InsufficientCapacity` if the total capacity is
    /// below `proposers`.
    pub fn check_sufficient(&self, proposers: usize) -> Result<(), ProblemError> {
        let available = self.total();
        if available < proposers as u64 {
            return Err(ProblemError::InsufficientCapacity {
                available,
                required: proposers,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_table_preserves_order() {
        let table = CapacityTable::new([("M2", 2), ("M1", 1)]).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.total(), 3);
        assert_eq!(table.get(&ParticipantId::from("M1")), Some(1));
        assert_eq!(table.position(&ParticipantId::from("M2")), Some(0));
        let hosts: Vec<&str> = table.iter().map(|(h, _)| h.as_str()).collect();
        assert_eq!(hosts, vec!["M2", "M1"]);
    }

    #[test]
    fn test_capacity_must_be_positive() {
        for bad in [0, -1, i64::from(u32::MAX) + 1] {
            let err = CapacityTable::new([("M1", bad)]).unwrap_err();
            assert!(matches!(err, ProblemError::InvalidCapacity { capacity, .. } if capacity == bad));
        }
    }

    #[test]
    fn test_duplicate_host_rejected() {
        let err = CapacityTable::new([("M1", 1), ("M1", 1)]).unwrap_err();
        assert!(matches!(err, ProblemError::MalformedInput(_)));
    }

    #[test]
    fn test_check_sufficient() {
        let table = CapacityTable::new([("M1", 1), ("M2", 1)]).unwrap();
        assert!(table.check_sufficient(2).is_ok());
        assert_eq!(
            table.check_sufficient(3),
            Err(ProblemError::InsufficientCapacity {
                available: 2,
                required: 3
            })
        );
    }
}
