//! Derived, read-only views: qualified players and final rankings.

use crate::models::participant::ParticipantId;
use serde::{Deserialize, Serialize};

/// A group player marked 1 or 2 for qualification.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualifiedPlayer {
    pub id: ParticipantId,
    pub name: String,
    #[serde(default)]
    pub club: String,
    pub group_name: String,
    pub position: u32,
}

/// One placement in the tournament's final ranking.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalRanking {
    pub position: u32,
    pub player_id: ParticipantId,
    pub player_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prize: Option<String>,
}

impl FinalRanking {
    pub fn new(position: u32, player_id: impl Into<String>, player_name: impl Into<String>) -> Self {
        Self {
            position,
            player_id: player_id.into(),
            player_name: player_name.into(),
            prize: None,
        }
    }
}
