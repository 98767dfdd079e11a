//! Final rankings: derived podium merged with operator overrides.

use crate::models::FinalRanking;

/// Merge the bracket-derived podium with operator-entered placements.
///
/// A derived entry keeps its slot; an override at the same position only contributes its
/// prize text (when the derived entry has none). Overrides at other positions are added
/// as they are. The result is ordered by position.
pub fn merge_rankings(derived: &[FinalRanking], overrides: &[FinalRanking]) -> Vec<FinalRanking> {
    let mut merged: Vec<FinalRanking> = derived.to_vec();
    for o in overrides {
        match merged.iter_mut().find(|r| r.position == o.position) {
            Some(existing) => {
                if existing.prize.is_none() {
                    existing.prize = o.prize.clone();
                }
            }
            None => merged.push(o.clone()),
        }
    }
    merged.sort_by_key(|r| r.position);
    merged
}

/// Insert or replace the override at `entry.position`.
pub fn upsert_override(overrides: &mut Vec<FinalRanking>, entry: FinalRanking) {
    match overrides.iter_mut().find(|r| r.position == entry.position) {
        Some(existing) => *existing = entry,
        None => overrides.push(entry),
    }
    overrides.sort_by_key(|r| r.position);
}
