//! Knockout bracket matches and result entry types.

use crate::models::participant::Participant;
use serde::{Deserialize, Serialize};

/// Id of the optional match for third place.
pub const THIRD_PLACE_MATCH_ID: &str = "third_place_playoff";

/// Score recorded for a match decided by a bye.
pub const BYE_SCORE: &str = "BYE";

/// Bracket id for slot `index` (0-based) of `round` (1-based).
pub fn match_id(round: u32, index: usize) -> String {
    format!("match_{}_{}", round, index)
}

/// Inverse of [`match_id`]. `None` for the third-place id or anything malformed.
pub fn parse_match_id(id: &str) -> Option<(u32, usize)> {
    let rest = id.strip_prefix("match_")?;
    let (round, index) = rest.split_once('_')?;
    Some((round.parse().ok()?, index.parse().ok()?))
}

/// Grid coordinates used by the bracket view.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct GridPosition {
    pub x: i32,
    pub y: i32,
}

/// Which slot of a match.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

/// How a match was decided.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum ResultType {
    #[default]
    #[serde(rename = "normal")]
    Normal,
    /// Walkover.
    #[serde(rename = "WO")]
    Walkover,
    /// Retirement.
    #[serde(rename = "RET")]
    Retired,
}

/// Match length in games.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum BestOf {
    #[default]
    Five,
    Seven,
}

impl BestOf {
    /// Games needed to take the match.
    pub fn games_to_win(self) -> u32 {
        match self {
            BestOf::Five => 3,
            BestOf::Seven => 4,
        }
    }

    /// Score recorded for walkovers and retirements.
    pub fn sweep_score(self) -> String {
        format!("{}-0", self.games_to_win())
    }
}

impl TryFrom<u8> for BestOf {
    type Error = String;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            5 => Ok(BestOf::Five),
            7 => Ok(BestOf::Seven),
            other => Err(format!("best of {} is not supported (use 5 or 7)", other)),
        }
    }
}

impl From<BestOf> for u8 {
    fn from(b: BestOf) -> u8 {
        match b {
            BestOf::Five => 5,
            BestOf::Seven => 7,
        }
    }
}

/// A single knockout match.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KnockoutMatch {
    pub id: String,
    pub round: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player1: Option<Participant>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player2: Option<Participant>,
    /// `"<gamesA>-<gamesB>"` or `"BYE"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<String>,
    /// None until decided.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub winner: Option<Participant>,
    #[serde(default)]
    pub position: GridPosition,
}

impl KnockoutMatch {
    /// An empty bracket match.
    pub fn new(round: u32, index: usize, position: GridPosition) -> Self {
        Self {
            id: match_id(round, index),
            round,
            player1: None,
            player2: None,
            score: None,
            winner: None,
            position,
        }
    }

    pub fn third_place(round: u32, position: GridPosition) -> Self {
        Self {
            id: THIRD_PLACE_MATCH_ID.to_string(),
            ..Self::new(round, 0, position)
        }
    }

    pub fn is_third_place(&self) -> bool {
        self.id == THIRD_PLACE_MATCH_ID
    }

    /// Slot index within its round, `None` for the third-place match.
    pub fn index(&self) -> Option<usize> {
        parse_match_id(&self.id).map(|(_, index)| index)
    }

    pub fn is_decided(&self) -> bool {
        self.winner.is_some()
    }

    pub fn player(&self, side: Side) -> Option<&Participant> {
        match side {
            Side::A => self.player1.as_ref(),
            Side::B => self.player2.as_ref(),
        }
    }

    pub fn slot_mut(&mut self, side: Side) -> &mut Option<Participant> {
        match side {
            Side::A => &mut self.player1,
            Side::B => &mut self.player2,
        }
    }

    /// Both slots hold a real (non-bye) participant.
    pub fn is_playable(&self) -> bool {
        matches!(
            (&self.player1, &self.player2),
            (Some(a), Some(b)) if !a.is_bye() && !b.is_bye()
        )
    }

    /// The participant who did not win, once decided.
    pub fn loser(&self) -> Option<&Participant> {
        let winner = self.winner.as_ref()?;
        [self.player1.as_ref(), self.player2.as_ref()]
            .into_iter()
            .flatten()
            .find(|p| p.id != winner.id)
    }

    /// Resolve a real-vs-bye pairing. Returns true if the match was resolved.
    pub fn resolve_bye(&mut self) -> bool {
        let winner = match (&self.player1, &self.player2) {
            (Some(a), Some(b)) if a.is_bye() && !b.is_bye() => b.clone(),
            (Some(a), Some(b)) if !a.is_bye() && b.is_bye() => a.clone(),
            _ => return false,
        };
        self.winner = Some(winner);
        self.score = Some(BYE_SCORE.to_string());
        true
    }
}

/// Operator input for one knockout match.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResultEntry {
    pub match_id: String,
    pub winner: Side,
    #[serde(default)]
    pub result_type: ResultType,
    #[serde(default)]
    pub best_of: BestOf,
    #[serde(default)]
    pub sets_won_a: u32,
    #[serde(default)]
    pub sets_won_b: u32,
}
