//! Entity type discriminator used by policy and uniqueness tables.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifies one of the four managed entity types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// A staff user account.
    Staff,
    /// A client record.
    Client,
    /// A contract record.
    Contract,
    /// An event record.
    Event,
}

impl EntityKind {
    /// Return the kind as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Staff => "staff",
            Self::Client => "client",
            Self::Contract => "contract",
            Self::Event => "event",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
