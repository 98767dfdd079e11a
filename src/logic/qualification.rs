//! Qualification: players the operator marked 1 or 2 in their group.

use crate::models::{GroupStageTable, QualifiedPlayer};

/// Collect every group player whose qualification mark is 1 or 2.
///
/// Output follows group order, then player order within the group. Missing or
/// non-numeric marks are ignored.
pub fn select_qualified(groups: &[GroupStageTable]) -> Vec<QualifiedPlayer> {
    groups
        .iter()
        .flat_map(|group| {
            group.players.iter().filter_map(move |p| match p.qualification_rank() {
                Some(rank @ (1 | 2)) => Some(QualifiedPlayer {
                    id: p.id.clone(),
                    name: p.name.clone(),
                    club: p.club.clone(),
                    group_name: group.group_name.clone(),
                    position: rank as u32,
                }),
                _ => None,
            })
        })
        .collect()
}
