//! Participant and Registrant data structures.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a participant: a registered player id, a `manual_*` placeholder, or `bye`.
pub type ParticipantId = String;

/// Id carried by the synthetic bye opponent.
pub const BYE_ID: &str = "bye";

/// Prefix of ids generated for manually typed participants.
pub const PLACEHOLDER_PREFIX: &str = "manual_";

/// Someone who can sit in a group table or a bracket slot.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    #[serde(default)]
    pub club: String,
}

impl Participant {
    pub fn new(id: impl Into<String>, name: impl Into<String>, club: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            club: club.into(),
        }
    }

    /// A participant typed in by the operator with no backing player record.
    pub fn placeholder(name: impl Into<String>, club: impl Into<String>) -> Self {
        Self::new(
            format!("{}{}", PLACEHOLDER_PREFIX, Uuid::new_v4()),
            name,
            club,
        )
    }

    /// The empty opponent used to fill a non-power-of-two bracket.
    pub fn bye() -> Self {
        Self::new(BYE_ID, "BYE", "")
    }

    pub fn is_bye(&self) -> bool {
        self.id == BYE_ID
    }

    pub fn is_placeholder(&self) -> bool {
        self.id.starts_with(PLACEHOLDER_PREFIX)
    }
}

/// A registration as supplied by the participant registry.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registrant {
    pub id: ParticipantId,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, alias = "clubAffiliation")]
    pub club: String,
    pub participation_type: String,
}

impl Registrant {
    /// Display name: "First Last", trimmed when either part is missing.
    pub fn display_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }

    pub fn to_participant(&self) -> Participant {
        Participant::new(self.id.clone(), self.display_name(), self.club.clone())
    }
}
