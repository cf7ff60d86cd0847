use serde::{Deserialize, Serialize};

/// Opaque, unique identifier of a proposer or a host
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParticipantId(pub String);

impl ParticipantId {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ParticipantId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ParticipantId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Which side of the market a participant belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    /// Proposes during deferred acceptance (mentees)
    Proposer,
    /// Holds proposals up to its capacity (mentors)
    Host,
}

impl Side {
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Proposer => Self::Host,
            Self::Host => Self::Proposer,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Proposer => write!(f, "proposer"),
            Self::Host => write!(f, "host"),
        }
    }
}

/// Stability notion a matching is checked against or was solved for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StabilityMode {
    /// No pair where both sides are at least as well off switching to each other
    Super,
    /// No pair where both sides are strictly better off switching to each other
    Weak,
}

impl std::fmt::Display for StabilityMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Super => write!(f, "super-stable"),
            Self::Weak => write!(f, "weakly stable"),
        }
    }
}

/// Outcome of comparing two candidates from one participant's viewpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preference {
    Prefers,
    Indifferent,
    Disprefers,
}

impl Preference {
    /// Build from two rank-group indices, where a lower index is more desirable
    #[must_use]
    pub fn from_ranks(a: usize, b: usize) -> Self {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Self::Prefers,
            std::cmp::Ordering::Equal => Self::Indifferent,
            std::cmp::Ordering::Greater => Self::Disprefers,
        }
    }

    /// True unless the first candidate is strictly worse
    #[must_use]
    pub fn at_least_as_good(self) -> bool {
        !matches!(self, Self::Disprefers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preference_from_ranks() {
        assert_eq!(Preference::from_ranks(0, 1), Preference::Prefers);
        assert_eq!(Preference::from_ranks(2, 2), Preference::Indifferent);
        assert_eq!(Preference::from_ranks(3, 1), Preference::Disprefers);
        assert!(Preference::Indifferent.at_least_as_good());
        assert!(!Preference::Disprefers.at_least_as_good());
    }

    #[test]
    fn test_participant_id_serializes_as_string() {
        let id = ParticipantId::new("M1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"M1\"");
        assert_eq!(id.to_string(), "M1");
    }
}
