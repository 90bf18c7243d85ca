use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a member of a shared-expense group.
///
/// Identifiers are opaque strings assigned by the record store that owns
/// the group. The engine never parses them; it only compares and hashes.
///
/// # Examples
///
/// ```
/// use splitledger::core::member::MemberId;
///
/// let alice = MemberId::new("usr-alice");
/// let bob = MemberId::new("usr-bob");
/// assert_ne!(alice, bob);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(String);

impl MemberId {
    /// Create a new member identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the string representation of this member ID.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for MemberId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// A person tracked within a group's ledger.
///
/// Members are created and persisted by the surrounding application;
/// the engine treats them as immutable identity + display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
}

impl Member {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: MemberId::new(id),
            name: name.into(),
        }
    }
}
