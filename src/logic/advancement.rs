//! Knockout results: recording a match, moving the winner on, deriving the podium.

use crate::models::{
    match_id, parse_match_id, FinalRanking, KnockoutMatch, MatchResultEntry, Participant,
    ResultType, ResultsError, Side, BYE_SCORE,
};

/// Id and slot of the match the winner of `m` moves into. The slot is `A` for an
/// even index and `B` for an odd one.
fn next_slot(m: &KnockoutMatch) -> Option<(String, Side)> {
    if m.is_third_place() {
        return None;
    }
    let (round, index) = parse_match_id(&m.id)?;
    let side = if index % 2 == 0 { Side::A } else { Side::B };
    Some((match_id(round + 1, index / 2), side))
}

fn find_index(matches: &[KnockoutMatch], id: &str) -> Result<usize, ResultsError> {
    matches
        .iter()
        .position(|m| m.id == id)
        .ok_or_else(|| ResultsError::MatchNotFound(id.to_string()))
}

/// Carry the result of `matches[from]` into its next-round slot. A changed occupant voids
/// the next match's decision and the walk continues, clearing later rounds that depended on
/// it. A real participant landing opposite a bye decides the next match and the walk
/// continues as well.
fn advance_from(matches: &mut [KnockoutMatch], mut from: usize) {
    loop {
        let winner = matches[from].winner.clone();
        let Some((target_id, side)) = next_slot(&matches[from]) else {
            return;
        };
        let Some(target) = matches.iter().position(|m| m.id == target_id) else {
            return;
        };
        let m = &mut matches[target];
        if *m.slot_mut(side) == winner {
            return;
        }
        *m.slot_mut(side) = winner;
        let was_decided = m.winner.take().is_some();
        m.score = None;
        if was_decided {
            log::debug!("Cleared decision of {} after an earlier result changed", m.id);
        }
        if !m.resolve_bye() && !was_decided {
            return;
        }
        from = target;
    }
}

fn final_round(matches: &[KnockoutMatch]) -> u32 {
    matches
        .iter()
        .filter(|m| !m.is_third_place())
        .map(|m| m.round)
        .max()
        .unwrap_or(0)
}

/// Losers of the semi-finals with the third-place slot each one feeds (even index → A).
fn semi_final_losers(matches: &[KnockoutMatch]) -> Vec<(Side, Option<Participant>)> {
    let last = final_round(matches);
    if last < 2 {
        return Vec::new();
    }
    matches
        .iter()
        .filter(|m| m.round == last - 1 && !m.is_third_place())
        .filter_map(|m| {
            let side = if m.index()? % 2 == 0 { Side::A } else { Side::B };
            Some((side, m.loser().cloned()))
        })
        .collect()
}

/// A third-place slot still holding a semi-final's previous loser follows that semi-final's
/// current loser, and the third-place decision is voided.
fn follow_semi_final_losers(matches: &mut [KnockoutMatch], before: Vec<(Side, Option<Participant>)>) {
    let after = semi_final_losers(matches);
    let Some(third) = matches.iter_mut().find(|m| m.is_third_place()) else {
        return;
    };
    for ((side, old), (_, new)) in before.into_iter().zip(after) {
        if old.is_some() && old != new && *third.slot_mut(side) == old {
            *third.slot_mut(side) = new;
            third.winner = None;
            third.score = None;
        }
    }
}

/// Push bye winners (and bye-vs-bye pairings, as a bye) forward, round by round, right
/// after a bracket is built.
pub(crate) fn propagate_byes(matches: &mut [KnockoutMatch]) {
    for round in 1..final_round(matches) {
        for i in 0..matches.len() {
            if matches[i].round != round || matches[i].is_third_place() {
                continue;
            }
            let forward = if matches[i].score.as_deref() == Some(BYE_SCORE) {
                matches[i].winner.clone()
            } else if matches[i].player1.as_ref().is_some_and(Participant::is_bye)
                && matches[i].player2.as_ref().is_some_and(Participant::is_bye)
            {
                Some(Participant::bye())
            } else {
                None
            };
            let (Some(p), Some((target_id, side))) = (forward, next_slot(&matches[i])) else {
                continue;
            };
            if let Some(target) = matches.iter_mut().find(|m| m.id == target_id) {
                *target.slot_mut(side) = Some(p);
                if target.winner.is_none() {
                    target.resolve_bye();
                }
            }
        }
    }
}

/// Score text for an entry, checked against the declared winner.
fn entry_score(entry: &MatchResultEntry) -> Result<String, ResultsError> {
    let needed = entry.best_of.games_to_win();
    match entry.result_type {
        ResultType::Walkover | ResultType::Retired => Ok(match entry.winner {
            Side::A => format!("{}-0", needed),
            Side::B => format!("0-{}", needed),
        }),
        ResultType::Normal => {
            let score = format!("{}-{}", entry.sets_won_a, entry.sets_won_b);
            let (won, lost) = match entry.winner {
                Side::A => (entry.sets_won_a, entry.sets_won_b),
                Side::B => (entry.sets_won_b, entry.sets_won_a),
            };
            if won != needed || lost >= needed {
                return Err(ResultsError::InconsistentScore {
                    match_id: entry.match_id.clone(),
                    score,
                });
            }
            Ok(score)
        }
    }
}

/// Record the outcome of a knockout match and move the winner on.
///
/// Refuses matches with a missing or bye participant, and normal results whose games do
/// not give the declared winner the match. Re-recording a decided match overwrites it;
/// when that changes who moves on, later decisions built on the old winner are cleared.
/// Returns the podium derived from the updated bracket.
pub fn record_result(
    matches: &mut [KnockoutMatch],
    entry: &MatchResultEntry,
) -> Result<Vec<FinalRanking>, ResultsError> {
    let idx = find_index(matches, &entry.match_id)?;
    if !matches[idx].is_playable() {
        return Err(ResultsError::MatchNotPlayable(entry.match_id.clone()));
    }
    let score = entry_score(entry)?;
    let semi_losers = semi_final_losers(matches);

    let m = &mut matches[idx];
    m.winner = m.player(entry.winner).cloned();
    m.score = Some(score);
    log::debug!(
        "Recorded {} ({:?}): winner {:?}",
        m.id,
        entry.result_type,
        m.winner.as_ref().map(|p| &p.name)
    );

    advance_from(matches, idx);
    follow_semi_final_losers(matches, semi_losers);
    Ok(derive_final_rankings(matches))
}

/// Fill or clear one slot by hand. A changed slot voids the match's previous decision and
/// everything later that depended on it.
pub fn set_match_participant(
    matches: &mut [KnockoutMatch],
    id: &str,
    side: Side,
    participant: Option<Participant>,
) -> Result<(), ResultsError> {
    let idx = find_index(matches, id)?;
    if *matches[idx].slot_mut(side) == participant {
        return Ok(());
    }
    let semi_losers = semi_final_losers(matches);
    let m = &mut matches[idx];
    *m.slot_mut(side) = participant;
    let was_decided = m.winner.take().is_some();
    m.score = None;
    if m.resolve_bye() || was_decided {
        advance_from(matches, idx);
    }
    follow_semi_final_losers(matches, semi_losers);
    Ok(())
}

/// Put the two semi-final losers into the third-place match (even semi index → slot A).
pub fn seed_third_place(matches: &mut [KnockoutMatch]) -> Result<(), ResultsError> {
    let third = matches
        .iter()
        .position(KnockoutMatch::is_third_place)
        .ok_or(ResultsError::NoSemiFinals)?;
    if final_round(matches) < 2 {
        return Err(ResultsError::NoSemiFinals);
    }
    let id = matches[third].id.clone();
    for (side, loser) in semi_final_losers(matches) {
        set_match_participant(matches, &id, side, loser)?;
    }
    Ok(())
}

/// Podium from the bracket: final winner 1st, the other finalist 2nd, third-place winner 3rd.
pub fn derive_final_rankings(matches: &[KnockoutMatch]) -> Vec<FinalRanking> {
    let mut rankings = Vec::new();
    let final_match = matches
        .iter()
        .filter(|m| !m.is_third_place())
        .max_by_key(|m| m.round);
    if let Some(f) = final_match {
        if let Some(winner) = &f.winner {
            rankings.push(FinalRanking::new(1, winner.id.clone(), winner.name.clone()));
            if let Some(runner_up) = f.loser().filter(|p| !p.is_bye()) {
                rankings.push(FinalRanking::new(2, runner_up.id.clone(), runner_up.name.clone()));
            }
        }
    }
    if let Some(third) = matches.iter().find(|m| m.is_third_place()) {
        if let Some(winner) = &third.winner {
            rankings.push(FinalRanking::new(3, winner.id.clone(), winner.name.clone()));
        }
    }
    rankings
}
