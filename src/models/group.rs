//! Group stage table: players, pairwise result matrix, derived standings.

use crate::models::participant::{Participant, ParticipantId};
use crate::models::results::ResultsError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A recorded match score `"<first>-<second>"` from the row player's point of view.
///
/// Game counts are kept as normalized digit strings, so any length of `\d+` parses.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MatchScore {
    pub first: String,
    pub second: String,
}

impl MatchScore {
    /// Parse `"<int>-<int>"` with optional whitespace around either number.
    /// Anything else (including the empty string) is `None`: the match is not played yet.
    pub fn parse(cell: &str) -> Option<Self> {
        let (a, b) = cell.split_once('-')?;
        Some(Self {
            first: parse_count(a)?,
            second: parse_count(b)?,
        })
    }

    /// The same match seen from the column player's side.
    pub fn inverse(self) -> Self {
        Self {
            first: self.second,
            second: self.first,
        }
    }

    /// `Greater` when the row player won.
    pub fn outcome(&self) -> Ordering {
        self.first
            .len()
            .cmp(&self.second.len())
            .then_with(|| self.first.cmp(&self.second))
    }
}

/// Digits with leading zeros stripped (`"0"` for all zeros).
fn parse_count(s: &str) -> Option<String> {
    let s = s.trim();
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let digits = s.trim_start_matches('0');
    Some(if digits.is_empty() { "0" } else { digits }.to_string())
}

impl fmt::Display for MatchScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.first, self.second)
    }
}

/// Operator-entered qualification mark. Kept exactly as received (number, text or any
/// other JSON value) so that a saved document reloads unchanged.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PositionMark {
    Number(i64),
    Text(String),
    Other(serde_json::Value),
}

// JSON values never hold NaN, so equality is total.
impl Eq for PositionMark {}

impl PositionMark {
    /// Integer value of the mark, if it has one. Integral floats such as `1.0` count.
    pub fn as_rank(&self) -> Option<i64> {
        match self {
            PositionMark::Number(n) => Some(*n),
            PositionMark::Text(s) => s.trim().parse().ok(),
            PositionMark::Other(serde_json::Value::Number(n)) => n
                .as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64),
            PositionMark::Other(_) => None,
        }
    }
}

/// A player seated in a group.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupPlayer {
    pub id: ParticipantId,
    pub name: String,
    #[serde(default)]
    pub club: String,
    /// Mirror of the computed standing's wins, for display.
    #[serde(default)]
    pub wins: u32,
    /// Qualification mark (1-7). Not the computed table rank, see [`Standing::position`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<PositionMark>,
}

impl GroupPlayer {
    pub fn from_participant(p: &Participant) -> Self {
        Self {
            id: p.id.clone(),
            name: p.name.clone(),
            club: p.club.clone(),
            wins: 0,
            position: None,
        }
    }

    pub fn participant(&self) -> Participant {
        Participant::new(self.id.clone(), self.name.clone(), self.club.clone())
    }

    /// Qualification rank if the mark parses as an integer.
    pub fn qualification_rank(&self) -> Option<i64> {
        self.position.as_ref().and_then(PositionMark::as_rank)
    }
}

/// One row of the computed group table.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Standing {
    /// Computed table rank (1-based), independent of the operator's qualification mark.
    pub position: u32,
    pub player_id: ParticipantId,
    pub player_name: String,
    #[serde(default)]
    pub club: String,
    pub wins: u32,
    pub losses: u32,
    pub total_matches: u32,
    pub points: u32,
}

/// A named round-robin group.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupStageTable {
    pub group_name: String,
    #[serde(default)]
    pub players: Vec<GroupPlayer>,
    /// `result_matrix[i][j]` is player i's score against player j.
    #[serde(default)]
    pub result_matrix: Vec<Vec<String>>,
    #[serde(default)]
    pub standings: Vec<Standing>,
}

impl GroupStageTable {
    pub fn new(group_name: impl Into<String>) -> Self {
        Self {
            group_name: group_name.into(),
            ..Self::default()
        }
    }

    pub fn player_index(&self, id: &str) -> Option<usize> {
        self.players.iter().position(|p| p.id == id)
    }

    /// Seat a participant; the matrix grows by one row and one column of unplayed cells.
    pub fn add_player(&mut self, participant: &Participant) -> Result<(), ResultsError> {
        if participant.is_bye() {
            return Err(ResultsError::ReservedId(participant.id.clone()));
        }
        if self.player_index(&participant.id).is_some() {
            return Err(ResultsError::DuplicateParticipant(participant.id.clone()));
        }
        self.normalize_matrix();
        self.players.push(GroupPlayer::from_participant(participant));
        let n = self.players.len();
        for row in &mut self.result_matrix {
            row.push(String::new());
        }
        self.result_matrix.push(vec![String::new(); n]);
        Ok(())
    }

    /// Remove a player together with their row and column.
    pub fn remove_player(&mut self, id: &str) -> Result<(), ResultsError> {
        let idx = self
            .player_index(id)
            .ok_or_else(|| ResultsError::ParticipantNotFound(id.to_string()))?;
        self.normalize_matrix();
        self.players.remove(idx);
        self.result_matrix.remove(idx);
        for row in &mut self.result_matrix {
            row.remove(idx);
        }
        Ok(())
    }

    /// Cell text, `None` when out of range.
    pub fn result(&self, row: usize, col: usize) -> Option<&str> {
        self.result_matrix
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
    }

    /// Write a score and keep the mirrored cell in step.
    ///
    /// A parseable `a-b` stores `b-a` in the mirror, an empty score clears both cells,
    /// and unparseable text is kept in the edited cell while the mirror is cleared.
    pub fn set_result(&mut self, row: usize, col: usize, score: &str) -> Result<(), ResultsError> {
        let n = self.players.len();
        if row >= n || col >= n {
            return Err(ResultsError::CellOutOfRange { row, col, size: n });
        }
        if row == col {
            return Err(ResultsError::SelfMatch(row));
        }
        self.normalize_matrix();
        let trimmed = score.trim();
        let mirror = match MatchScore::parse(trimmed) {
            Some(parsed) => {
                self.result_matrix[row][col] = parsed.to_string();
                parsed.inverse().to_string()
            }
            None => {
                self.result_matrix[row][col] = trimmed.to_string();
                String::new()
            }
        };
        self.result_matrix[col][row] = mirror;
        Ok(())
    }

    /// Pad or truncate the matrix so that it is square with side `players.len()`.
    pub fn normalize_matrix(&mut self) {
        let n = self.players.len();
        self.result_matrix.resize_with(n, Vec::new);
        for row in &mut self.result_matrix {
            row.resize(n, String::new());
        }
    }

    /// Update the display name of a seated player (and their standing row).
    pub fn rename_player(&mut self, id: &str, name: &str) -> bool {
        let mut found = false;
        for p in self.players.iter_mut().filter(|p| p.id == id) {
            p.name = name.to_string();
            found = true;
        }
        for s in self.standings.iter_mut().filter(|s| s.player_id == id) {
            s.player_name = name.to_string();
        }
        found
    }
}
