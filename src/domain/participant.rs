use serde::{Deserialize, Serialize};

/// A person taking part in shared expenses, identified by their normalized name.
///
/// Names are trimmed and lower-cased on construction, so "  Mary " and "mary"
/// are the same participant. Display never restores the original capitalization.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Participant(String);

impl Participant {
    /// Normalize a raw name. Returns `None` when nothing is left after trimming.
    pub fn new(name: &str) -> Option<Self> {
        let normalized = name.trim().to_lowercase();
        if normalized.is_empty() {
            None
        } else {
            Some(Self(normalized))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Participant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(&self.0)
    }
}

/// Join participant names with ", " for display.
pub fn join_names(participants: &[Participant]) -> String {
    participants
        .iter()
        .map(Participant::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
