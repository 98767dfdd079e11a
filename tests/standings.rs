//! Integration tests for group standings and qualification.

use tt_results::{
    calculate_standings, select_qualified, GroupStageTable, Participant, PositionMark,
};

fn group_with_players(name: &str, n: usize) -> GroupStageTable {
    let mut g = GroupStageTable::new(name);
    for i in 0..n {
        g.add_player(&Participant::new(format!("{name}{i}"), format!("P{i}"), "TTC"))
            .unwrap();
    }
    g
}

#[test]
fn two_player_group_example() {
    let mut g = group_with_players("A", 2);
    g.result_matrix = vec![
        vec!["".to_string(), "3-1".to_string()],
        vec!["1-3".to_string(), "".to_string()],
    ];
    calculate_standings(&mut g);

    let first = &g.standings[0];
    assert_eq!(first.player_id, "A0");
    assert_eq!((first.wins, first.losses, first.total_matches), (1, 0, 1));
    assert_eq!(first.points, 2);
    assert_eq!(first.position, 1);

    let second = &g.standings[1];
    assert_eq!(second.player_id, "A1");
    assert_eq!((second.wins, second.losses), (0, 1));
    assert_eq!(second.points, 0);
    assert_eq!(second.position, 2);

    assert_eq!(g.players[0].wins, 1);
    assert_eq!(g.players[1].wins, 0);
}

#[test]
fn malformed_and_empty_cells_are_not_counted() {
    let mut g = group_with_players("A", 3);
    g.result_matrix[0][1] = "abc".to_string();
    g.result_matrix[1][0] = "".to_string();
    g.result_matrix[0][2] = "3 - 2".to_string();
    g.result_matrix[2][0] = "2-3".to_string();
    calculate_standings(&mut g);

    let s1 = g.standings.iter().find(|s| s.player_id == "A1").unwrap();
    assert_eq!((s1.wins, s1.losses, s1.total_matches), (0, 0, 0));
    let s0 = g.standings.iter().find(|s| s.player_id == "A0").unwrap();
    assert_eq!((s0.wins, s0.losses, s0.total_matches), (1, 0, 1));
}

#[test]
fn draws_count_one_point_and_matches_played() {
    let mut g = group_with_players("A", 2);
    g.set_result(0, 1, "2-2").unwrap();
    calculate_standings(&mut g);
    for s in &g.standings {
        assert_eq!((s.wins, s.losses, s.total_matches, s.points), (0, 0, 1, 1));
    }
}

#[test]
fn ties_on_wins_break_by_matches_played_then_input_order() {
    let mut g = group_with_players("A", 4);
    // A0 beats A1; A2 beats A3 and loses to A1; A3 has nothing else.
    g.set_result(0, 1, "3-0").unwrap();
    g.set_result(2, 3, "3-1").unwrap();
    g.set_result(1, 2, "3-2").unwrap();
    calculate_standings(&mut g);
    let order: Vec<&str> = g.standings.iter().map(|s| s.player_id.as_str()).collect();
    // A1 and A2 both 1 win over 2 matches, A0 1 win over 1 match, A3 none.
    assert_eq!(order, vec!["A1", "A2", "A0", "A3"]);
    let positions: Vec<u32> = g.standings.iter().map(|s| s.position).collect();
    assert_eq!(positions, vec![1, 2, 3, 4]);
}

#[test]
fn standings_are_idempotent() {
    let mut g = group_with_players("A", 3);
    g.set_result(0, 1, "3-1").unwrap();
    g.set_result(1, 2, "1-3").unwrap();
    calculate_standings(&mut g);
    let first = g.standings.clone();
    calculate_standings(&mut g);
    assert_eq!(g.standings, first);
}

#[test]
fn set_result_keeps_mirror_cell_in_step() {
    let mut g = group_with_players("A", 2);
    g.set_result(0, 1, " 3 - 1 ").unwrap();
    assert_eq!(g.result(0, 1), Some("3-1"));
    assert_eq!(g.result(1, 0), Some("1-3"));

    g.set_result(1, 0, "oops").unwrap();
    assert_eq!(g.result(1, 0), Some("oops"));
    assert_eq!(g.result(0, 1), Some(""));

    g.set_result(0, 1, "").unwrap();
    assert_eq!(g.result(0, 1), Some(""));
    assert_eq!(g.result(1, 0), Some(""));

    assert!(g.set_result(0, 0, "3-0").is_err());
    assert!(g.set_result(0, 2, "3-0").is_err());
}

#[test]
fn removing_a_player_drops_row_and_column() {
    let mut g = group_with_players("A", 3);
    g.set_result(0, 2, "3-0").unwrap();
    g.remove_player("A1").unwrap();
    assert_eq!(g.result_matrix.len(), 2);
    assert!(g.result_matrix.iter().all(|row| row.len() == 2));
    assert_eq!(g.result(0, 1), Some("3-0"));
}

#[test]
fn qualification_uses_marks_not_standings() {
    let mut a = group_with_players("A", 3);
    a.players[0].position = Some(PositionMark::Number(2));
    a.players[1].position = Some(PositionMark::Text("1".into()));
    a.players[2].position = Some(PositionMark::Number(3));
    let mut b = group_with_players("B", 2);
    b.players[0].position = Some(PositionMark::Text("winner".into()));
    b.players[1].position = Some(PositionMark::Number(1));

    let q = select_qualified(&[a, b]);
    let ids: Vec<(&str, &str, u32)> = q
        .iter()
        .map(|p| (p.id.as_str(), p.group_name.as_str(), p.position))
        .collect();
    assert_eq!(ids, vec![("A0", "A", 2), ("A1", "A", 1), ("B1", "B", 1)]);
}

#[test]
fn oversized_game_counts_still_count_as_played() {
    let mut g = group_with_players("A", 2);
    g.result_matrix[0][1] = "99999999999-1".to_string();
    g.result_matrix[1][0] = "1-99999999999".to_string();
    calculate_standings(&mut g);
    assert_eq!(g.standings[0].player_id, "A0");
    assert_eq!((g.standings[0].wins, g.standings[0].total_matches), (1, 1));
    assert_eq!((g.standings[1].losses, g.standings[1].total_matches), (1, 1));
}

#[test]
fn odd_position_values_load_and_are_ignored_unless_integral() {
    let json = r#"{
        "groupName": "A",
        "players": [
            {"id": "p1", "name": "P1", "position": 1.0},
            {"id": "p2", "name": "P2", "position": true},
            {"id": "p3", "name": "P3", "position": {"rank": 2}}
        ],
        "resultMatrix": [["", "", ""], ["", "", ""], ["", "", ""]],
        "standings": []
    }"#;
    let g: GroupStageTable = serde_json::from_str(json).unwrap();
    let ranks: Vec<Option<i64>> = g.players.iter().map(|p| p.qualification_rank()).collect();
    assert_eq!(ranks, vec![Some(1), None, None]);

    let qualified = select_qualified(std::slice::from_ref(&g));
    assert_eq!(qualified.len(), 1);
    assert_eq!(qualified[0].id, "p1");

    let reloaded: GroupStageTable =
        serde_json::from_str(&serde_json::to_string(&g).unwrap()).unwrap();
    assert_eq!(reloaded, g);
    assert_eq!(
        serde_json::to_value(&g.players[2]).unwrap()["position"],
        serde_json::json!({"rank": 2})
    );
}

#[test]
fn bye_id_cannot_be_seated() {
    let mut g = group_with_players("A", 1);
    assert_eq!(
        g.add_player(&Participant::new("bye", "Real Person", "")),
        Err(tt_results::ResultsError::ReservedId("bye".into()))
    );
    assert_eq!(g.players.len(), 1);
}
