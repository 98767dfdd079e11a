//! Group standings: wins, losses and points derived from the result matrix.

use crate::models::{GroupStageTable, MatchScore, Standing};
use std::cmp::Ordering;

/// Recompute `table.standings` from scratch (and mirror wins onto `table.players`).
///
/// For each player every cell of their row (except the diagonal) is scanned. A cell that
/// parses as `"<int>-<int>"` counts as a played match: higher first number is a win, lower
/// a loss, equal a draw. Empty or malformed cells are skipped. Rows are then ordered by
/// wins, then matches played (both descending), ties keeping player order.
pub fn calculate_standings(table: &mut GroupStageTable) {
    let mut standings: Vec<Standing> = table
        .players
        .iter()
        .enumerate()
        .map(|(i, player)| {
            let mut wins = 0;
            let mut losses = 0;
            let mut total_matches = 0;
            let row = table.result_matrix.get(i).map(Vec::as_slice).unwrap_or(&[]);
            for (j, cell) in row.iter().enumerate() {
                if j == i || j >= table.players.len() {
                    continue;
                }
                let Some(score) = MatchScore::parse(cell) else {
                    continue;
                };
                total_matches += 1;
                match score.outcome() {
                    Ordering::Greater => wins += 1,
                    Ordering::Less => losses += 1,
                    Ordering::Equal => {}
                }
            }
            let draws = total_matches - wins - losses;
            Standing {
                position: 0,
                player_id: player.id.clone(),
                player_name: player.name.clone(),
                club: player.club.clone(),
                wins,
                losses,
                total_matches,
                points: wins * 2 + draws,
            }
        })
        .collect();

    // sort_by is stable: equal keys keep player order.
    standings.sort_by(|a, b| {
        b.wins
            .cmp(&a.wins)
            .then_with(|| b.total_matches.cmp(&a.total_matches))
    });
    for (i, s) in standings.iter_mut().enumerate() {
        s.position = i as u32 + 1;
    }

    for player in &mut table.players {
        if let Some(s) = standings.iter().find(|s| s.player_id == player.id) {
            player.wins = s.wins;
        }
    }
    table.standings = standings;
}
