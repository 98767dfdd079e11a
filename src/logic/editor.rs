//! Editing aggregate for one participation type's results.
//!
//! Every change goes through [`ResultsEditor::apply`]; standings and the final ranking are
//! recomputed there, never by callers. A command that fails leaves the results untouched,
//! and so does a batch in which any command fails.

use crate::logic::advancement::{
    derive_final_rankings, record_result, seed_third_place, set_match_participant,
};
use crate::logic::bracket::generate_bracket;
use crate::logic::qualification::select_qualified;
use crate::logic::rankings::{merge_rankings, upsert_override};
use crate::logic::standings::calculate_standings;
use crate::models::{
    FinalRanking, GroupStageTable, MatchResultEntry, Participant, ParticipantId,
    ParticipationResults, PositionMark, QualifiedPlayer, ResultsError, Side,
};
use serde::{Deserialize, Serialize};

/// Qualifier count below which a bracket is allowed but unusual.
const RECOMMENDED_QUALIFIERS: usize = 4;

/// One operator action on the results.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum EditCommand {
    AddGroup {
        group_name: String,
    },
    RemoveGroup {
        group_name: String,
    },
    /// Seat a registered participant in a group.
    AddGroupPlayer {
        group_name: String,
        participant: Participant,
    },
    /// Seat a typed-in name with no player record behind it.
    AddManualGroupPlayer {
        group_name: String,
        name: String,
        #[serde(default)]
        club: String,
    },
    RemoveGroupPlayer {
        group_name: String,
        player_id: ParticipantId,
    },
    /// Enter `score` for row player vs column player; the mirror cell follows.
    SetGroupResult {
        group_name: String,
        row: usize,
        col: usize,
        score: String,
    },
    /// Operator's qualification mark (1 and 2 qualify). Not the computed table rank.
    SetQualificationPosition {
        group_name: String,
        player_id: ParticipantId,
        #[serde(default)]
        position: Option<PositionMark>,
    },
    RenameParticipant {
        player_id: ParticipantId,
        name: String,
    },
    /// Replace the bracket with a fresh one built from the current qualifiers.
    GenerateBracket,
    RecordMatchResult(MatchResultEntry),
    SetMatchParticipant {
        match_id: String,
        side: Side,
        #[serde(default)]
        participant: Option<Participant>,
    },
    SeedThirdPlace,
    SetRankingOverride {
        position: u32,
        player_id: ParticipantId,
        player_name: String,
        #[serde(default)]
        prize: Option<String>,
    },
    ClearRankingOverride {
        position: u32,
    },
}

/// Owns one participation type's results while they are being edited.
#[derive(Clone, Debug, Default)]
pub struct ResultsEditor {
    results: ParticipationResults,
}

impl ResultsEditor {
    pub fn new(results: ParticipationResults) -> Self {
        Self { results }
    }

    pub fn results(&self) -> &ParticipationResults {
        &self.results
    }

    pub fn into_results(self) -> ParticipationResults {
        self.results
    }

    /// Players currently marked to qualify, in group then player order.
    pub fn qualified(&self) -> Vec<QualifiedPlayer> {
        select_qualified(&self.results.group_stage_results)
    }

    /// Apply one command. On error nothing changes.
    pub fn apply(&mut self, command: EditCommand) -> Result<(), ResultsError> {
        self.apply_all(std::iter::once(command))
    }

    /// Apply commands in order; if any fails none of them take effect.
    pub fn apply_all(
        &mut self,
        commands: impl IntoIterator<Item = EditCommand>,
    ) -> Result<(), ResultsError> {
        let mut next = self.results.clone();
        for command in commands {
            execute(&mut next, command)?;
            refresh(&mut next);
        }
        self.results = next;
        Ok(())
    }
}

fn group_mut<'a>(
    results: &'a mut ParticipationResults,
    name: &str,
) -> Result<&'a mut GroupStageTable, ResultsError> {
    results
        .group_stage_results
        .iter_mut()
        .find(|g| g.group_name == name)
        .ok_or_else(|| ResultsError::GroupNotFound(name.to_string()))
}

fn non_empty(s: &str, err: ResultsError) -> Result<String, ResultsError> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(err);
    }
    Ok(trimmed.to_string())
}

fn execute(results: &mut ParticipationResults, command: EditCommand) -> Result<(), ResultsError> {
    match command {
        EditCommand::AddGroup { group_name } => {
            let name = non_empty(&group_name, ResultsError::EmptyGroupName)?;
            if results.group_stage_results.iter().any(|g| g.group_name == name) {
                return Err(ResultsError::DuplicateGroup(name));
            }
            results.group_stage_results.push(GroupStageTable::new(name));
        }
        EditCommand::RemoveGroup { group_name } => {
            let before = results.group_stage_results.len();
            results
                .group_stage_results
                .retain(|g| g.group_name != group_name);
            if results.group_stage_results.len() == before {
                return Err(ResultsError::GroupNotFound(group_name));
            }
        }
        EditCommand::AddGroupPlayer {
            group_name,
            participant,
        } => {
            group_mut(results, &group_name)?.add_player(&participant)?;
        }
        EditCommand::AddManualGroupPlayer {
            group_name,
            name,
            club,
        } => {
            let name = non_empty(&name, ResultsError::EmptyName)?;
            let participant = Participant::placeholder(name, club.trim());
            group_mut(results, &group_name)?.add_player(&participant)?;
        }
        EditCommand::RemoveGroupPlayer {
            group_name,
            player_id,
        } => {
            group_mut(results, &group_name)?.remove_player(&player_id)?;
        }
        EditCommand::SetGroupResult {
            group_name,
            row,
            col,
            score,
        } => {
            group_mut(results, &group_name)?.set_result(row, col, &score)?;
        }
        EditCommand::SetQualificationPosition {
            group_name,
            player_id,
            position,
        } => {
            let group = group_mut(results, &group_name)?;
            let player = group
                .players
                .iter_mut()
                .find(|p| p.id == player_id)
                .ok_or(ResultsError::ParticipantNotFound(player_id))?;
            player.position = position;
        }
        EditCommand::RenameParticipant { player_id, name } => {
            let name = non_empty(&name, ResultsError::EmptyName)?;
            rename_everywhere(results, &player_id, &name)?;
        }
        EditCommand::GenerateBracket => {
            let qualified = select_qualified(&results.group_stage_results);
            if qualified.len() < RECOMMENDED_QUALIFIERS {
                log::warn!(
                    "Generating a bracket from only {} qualifier(s)",
                    qualified.len()
                );
            }
            results.knockout_results = generate_bracket(&qualified)?;
            log::info!(
                "Generated bracket with {} matches from {} qualifiers",
                results.knockout_results.len(),
                qualified.len()
            );
        }
        EditCommand::RecordMatchResult(entry) => {
            record_result(&mut results.knockout_results, &entry)?;
        }
        EditCommand::SetMatchParticipant {
            match_id,
            side,
            participant,
        } => {
            set_match_participant(&mut results.knockout_results, &match_id, side, participant)?;
        }
        EditCommand::SeedThirdPlace => {
            seed_third_place(&mut results.knockout_results)?;
        }
        EditCommand::SetRankingOverride {
            position,
            player_id,
            player_name,
            prize,
        } => {
            if position == 0 {
                return Err(ResultsError::InvalidRankingPosition(position));
            }
            let mut entry = FinalRanking::new(position, player_id, player_name.trim());
            entry.prize = prize.filter(|p| !p.trim().is_empty());
            upsert_override(&mut results.ranking_overrides, entry);
        }
        EditCommand::ClearRankingOverride { position } => {
            results.ranking_overrides.retain(|r| r.position != position);
        }
    }
    Ok(())
}

fn rename_everywhere(
    results: &mut ParticipationResults,
    id: &str,
    name: &str,
) -> Result<(), ResultsError> {
    let mut found = false;
    for group in &mut results.group_stage_results {
        found |= group.rename_player(id, name);
    }
    for m in &mut results.knockout_results {
        for p in [&mut m.player1, &mut m.player2, &mut m.winner]
            .into_iter()
            .flatten()
            .filter(|p| p.id == id)
        {
            p.name = name.to_string();
            found = true;
        }
    }
    for r in results
        .ranking_overrides
        .iter_mut()
        .filter(|r| r.player_id == id)
    {
        r.player_name = name.to_string();
        found = true;
    }
    if !found {
        return Err(ResultsError::ParticipantNotFound(id.to_string()));
    }
    Ok(())
}

/// Recompute every derived field.
fn refresh(results: &mut ParticipationResults) {
    for group in &mut results.group_stage_results {
        calculate_standings(group);
    }
    let derived = derive_final_rankings(&results.knockout_results);
    results.final_rankings = merge_rankings(&derived, &results.ranking_overrides);
}
