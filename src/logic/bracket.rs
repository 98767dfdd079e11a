//! Knockout bracket generation from the group stage qualifiers.

use crate::logic::advancement::propagate_byes;
use crate::models::{
    GridPosition, KnockoutMatch, Participant, QualifiedPlayer, ResultsError,
};

/// Horizontal distance between rounds in the bracket view.
const ROUND_SPACING_X: i32 = 300;
/// Vertical distance between first-round matches in the bracket view.
const SLOT_SPACING_Y: i32 = 100;

/// Interleave qualifiers so that group winners come first, then runners-up:
/// A1, B1, C1, ..., A2, B2, C2, ...
///
/// Groups keep the order in which they are first seen; within a group players are
/// ordered by their qualification position.
pub fn cross_seed(qualified: &[QualifiedPlayer]) -> Vec<Participant> {
    let mut groups: Vec<(&str, Vec<&QualifiedPlayer>)> = Vec::new();
    for q in qualified {
        match groups.iter_mut().find(|(name, _)| *name == q.group_name) {
            Some((_, members)) => members.push(q),
            None => groups.push((q.group_name.as_str(), vec![q])),
        }
    }
    for (_, members) in &mut groups {
        members.sort_by_key(|q| q.position);
    }

    let per_group = groups.iter().map(|(_, m)| m.len()).max().unwrap_or(0);
    let mut seeded = Vec::with_capacity(qualified.len());
    for slot in 0..per_group {
        for (_, members) in &groups {
            if let Some(q) = members.get(slot) {
                seeded.push(Participant::new(q.id.clone(), q.name.clone(), q.club.clone()));
            }
        }
    }
    seeded
}

/// Grid position of match `index` in `round` (1-based). Each round doubles the spacing so
/// that a match sits midway between its two feeders.
pub fn bracket_position(round: u32, index: usize) -> GridPosition {
    let spacing = SLOT_SPACING_Y << (round.saturating_sub(1));
    GridPosition {
        x: (round as i32 - 1) * ROUND_SPACING_X,
        y: index as i32 * spacing + (spacing - SLOT_SPACING_Y) / 2,
    }
}

/// Build a single-elimination bracket (plus third-place match) from the qualifiers.
///
/// The bracket size is the next power of two; missing first-round opponents are byes and
/// those matches are decided on the spot. Bye winners are moved into round 2 straight away.
pub fn generate_bracket(qualified: &[QualifiedPlayer]) -> Result<Vec<KnockoutMatch>, ResultsError> {
    let seeded = cross_seed(qualified);
    let n = seeded.len();
    if n < 2 {
        return Err(ResultsError::NotEnoughQualifiers { found: n });
    }
    let size = n.next_power_of_two();
    let rounds = size.trailing_zeros();
    log::debug!(
        "Generating bracket: {} qualifiers, size {}, {} byes, {} rounds",
        n,
        size,
        size - n,
        rounds
    );

    let slot = |i: usize| seeded.get(i).cloned().unwrap_or_else(Participant::bye);
    let mut matches: Vec<KnockoutMatch> = (0..size / 2)
        .map(|k| {
            let mut m = KnockoutMatch::new(1, k, bracket_position(1, k));
            m.player1 = Some(slot(2 * k));
            m.player2 = Some(slot(2 * k + 1));
            m.resolve_bye();
            m
        })
        .collect();

    for round in 2..=rounds {
        let count = size >> round;
        matches.extend((0..count).map(|k| KnockoutMatch::new(round, k, bracket_position(round, k))));
    }

    if rounds >= 2 {
        let final_pos = bracket_position(rounds, 0);
        matches.push(KnockoutMatch::third_place(
            rounds,
            GridPosition {
                x: final_pos.x,
                y: final_pos.y + 2 * SLOT_SPACING_Y,
            },
        ));
    }

    propagate_byes(&mut matches);
    Ok(matches)
}
