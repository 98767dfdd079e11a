//! The persisted results document and the per-participation-type slice of it.

use crate::models::group::GroupStageTable;
use crate::models::knockout::KnockoutMatch;
use crate::models::participant::ParticipantId;
use crate::models::ranking::FinalRanking;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Errors raised by result editing operations. Each one aborts the action with no state change.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ResultsError {
    /// Fewer than two players are marked 1 or 2 across the groups.
    NotEnoughQualifiers { found: usize },
    /// No group with this name.
    GroupNotFound(String),
    /// A group with this name already exists.
    DuplicateGroup(String),
    /// Group name is empty.
    EmptyGroupName,
    /// Participant not found where it was expected.
    ParticipantNotFound(ParticipantId),
    /// Participant already seated in this group.
    DuplicateParticipant(ParticipantId),
    /// The id is reserved for bracket byes.
    ReservedId(ParticipantId),
    /// Display name is empty.
    EmptyName,
    /// Result cell outside the group's matrix.
    CellOutOfRange { row: usize, col: usize, size: usize },
    /// A player cannot play themselves.
    SelfMatch(usize),
    /// No knockout match with this id.
    MatchNotFound(String),
    /// Match is missing a participant or involves a bye.
    MatchNotPlayable(String),
    /// Entered games contradict the declared winner or the match length.
    InconsistentScore { match_id: String, score: String },
    /// No semi-final round to seed the third-place match from.
    NoSemiFinals,
    /// Ranking position must be at least 1.
    InvalidRankingPosition(u32),
}

impl std::fmt::Display for ResultsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResultsError::NotEnoughQualifiers { found } => write!(
                f,
                "At least 2 qualified players are needed to generate the bracket (found {})",
                found
            ),
            ResultsError::GroupNotFound(name) => write!(f, "Group '{}' not found", name),
            ResultsError::DuplicateGroup(name) => write!(f, "Group '{}' already exists", name),
            ResultsError::EmptyGroupName => write!(f, "Group name must not be empty"),
            ResultsError::ParticipantNotFound(id) => write!(f, "Participant {} not found", id),
            ResultsError::DuplicateParticipant(id) => {
                write!(f, "Participant {} is already in this group", id)
            }
            ResultsError::ReservedId(id) => {
                write!(f, "Participant id '{}' is reserved for byes", id)
            }
            ResultsError::EmptyName => write!(f, "Name must not be empty"),
            ResultsError::CellOutOfRange { row, col, size } => write!(
                f,
                "Cell ({}, {}) is outside a {}x{} result table",
                row, col, size, size
            ),
            ResultsError::SelfMatch(i) => write!(f, "Player {} cannot play themselves", i),
            ResultsError::MatchNotFound(id) => write!(f, "Match {} not found", id),
            ResultsError::MatchNotPlayable(id) => {
                write!(f, "Match {} needs two real participants", id)
            }
            ResultsError::InconsistentScore { match_id, score } => write!(
                f,
                "Score {} does not match the declared winner of {}",
                score, match_id
            ),
            ResultsError::NoSemiFinals => write!(f, "Bracket has no semi-final round"),
            ResultsError::InvalidRankingPosition(p) => {
                write!(f, "Ranking position {} is invalid (must be 1 or more)", p)
            }
        }
    }
}

impl std::error::Error for ResultsError {}

/// Everything recorded for one participation type.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParticipationResults {
    #[serde(default)]
    pub group_stage_results: Vec<GroupStageTable>,
    #[serde(default)]
    pub knockout_results: Vec<KnockoutMatch>,
    #[serde(default)]
    pub final_rankings: Vec<FinalRanking>,
    /// Operator-entered placements and prize text, merged into `final_rankings`.
    #[serde(default)]
    pub ranking_overrides: Vec<FinalRanking>,
}

/// The whole results document for one tournament.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TournamentResults {
    pub tournament_id: String,
    #[serde(default)]
    pub group_stage_results: BTreeMap<String, Vec<GroupStageTable>>,
    #[serde(default)]
    pub knockout_results: BTreeMap<String, Vec<KnockoutMatch>>,
    #[serde(default)]
    pub final_rankings: BTreeMap<String, Vec<FinalRanking>>,
    #[serde(default)]
    pub ranking_overrides: BTreeMap<String, Vec<FinalRanking>>,
    #[serde(default)]
    pub is_published: bool,
    /// Incremented on every save.
    #[serde(default)]
    pub version: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl TournamentResults {
    /// The default-empty document returned for a tournament with no saved results.
    pub fn empty(tournament_id: impl Into<String>) -> Self {
        Self {
            tournament_id: tournament_id.into(),
            ..Self::default()
        }
    }

    /// Copy out one participation type's slice (empty if never saved).
    pub fn participation(&self, participation_type: &str) -> ParticipationResults {
        ParticipationResults {
            group_stage_results: self
                .group_stage_results
                .get(participation_type)
                .cloned()
                .unwrap_or_default(),
            knockout_results: self
                .knockout_results
                .get(participation_type)
                .cloned()
                .unwrap_or_default(),
            final_rankings: self
                .final_rankings
                .get(participation_type)
                .cloned()
                .unwrap_or_default(),
            ranking_overrides: self
                .ranking_overrides
                .get(participation_type)
                .cloned()
                .unwrap_or_default(),
        }
    }

    /// Replace one participation type's slice, leaving every other type untouched.
    pub fn replace_participation(&mut self, participation_type: &str, results: ParticipationResults) {
        let key = participation_type.to_string();
        self.group_stage_results
            .insert(key.clone(), results.group_stage_results);
        self.knockout_results
            .insert(key.clone(), results.knockout_results);
        self.final_rankings.insert(key.clone(), results.final_rankings);
        if results.ranking_overrides.is_empty() {
            self.ranking_overrides.remove(&key);
        } else {
            self.ranking_overrides.insert(key, results.ranking_overrides);
        }
    }

    /// Participation types that have any saved results.
    pub fn participation_types(&self) -> Vec<String> {
        let mut types: Vec<String> = self
            .group_stage_results
            .keys()
            .chain(self.knockout_results.keys())
            .chain(self.final_rankings.keys())
            .cloned()
            .collect();
        types.sort();
        types.dedup();
        types
    }
}

/// Body of a save: one participation type's three fields plus optional concurrency guard.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveResultsRequest {
    pub participation_type: String,
    #[serde(default)]
    pub group_stage_results: Vec<GroupStageTable>,
    #[serde(default)]
    pub knockout_results: Vec<KnockoutMatch>,
    #[serde(default)]
    pub final_rankings: Vec<FinalRanking>,
    #[serde(default)]
    pub ranking_overrides: Vec<FinalRanking>,
    /// When set, the save is refused unless the stored document has this version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_version: Option<u64>,
}

impl SaveResultsRequest {
    pub fn new(participation_type: impl Into<String>, results: ParticipationResults) -> Self {
        Self {
            participation_type: participation_type.into(),
            group_stage_results: results.group_stage_results,
            knockout_results: results.knockout_results,
            final_rankings: results.final_rankings,
            ranking_overrides: results.ranking_overrides,
            expected_version: None,
        }
    }

    pub fn with_expected_version(mut self, version: u64) -> Self {
        self.expected_version = Some(version);
        self
    }

    pub fn into_parts(self) -> (String, ParticipationResults, Option<u64>) {
        (
            self.participation_type,
            ParticipationResults {
                group_stage_results: self.group_stage_results,
                knockout_results: self.knockout_results,
                final_rankings: self.final_rankings,
                ranking_overrides: self.ranking_overrides,
            },
            self.expected_version,
        )
    }
}
