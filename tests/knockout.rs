//! Integration tests for knockout result entry, advancement and final rankings.

use tt_results::{
    derive_final_rankings, generate_bracket, merge_rankings, record_result, seed_third_place,
    set_match_participant, BestOf, FinalRanking, KnockoutMatch, MatchResultEntry, Participant,
    QualifiedPlayer, ResultType, ResultsError, Side, THIRD_PLACE_MATCH_ID,
};

fn q(id: &str, group: &str, position: u32) -> QualifiedPlayer {
    QualifiedPlayer {
        id: id.to_string(),
        name: format!("Player {id}"),
        club: String::new(),
        group_name: group.to_string(),
        position,
    }
}

/// A1 v B1 (match_1_0), A2 v B2 (match_1_1).
fn four_player_bracket() -> Vec<KnockoutMatch> {
    generate_bracket(&[q("A1", "A", 1), q("A2", "A", 2), q("B1", "B", 1), q("B2", "B", 2)])
        .unwrap()
}

fn entry(match_id: &str, winner: Side, a: u32, b: u32) -> MatchResultEntry {
    MatchResultEntry {
        match_id: match_id.to_string(),
        winner,
        result_type: ResultType::Normal,
        best_of: BestOf::Five,
        sets_won_a: a,
        sets_won_b: b,
    }
}

fn find<'a>(matches: &'a [KnockoutMatch], id: &str) -> &'a KnockoutMatch {
    matches.iter().find(|m| m.id == id).unwrap()
}

#[test]
fn winner_of_even_match_fills_player1_of_next_round_only() {
    let mut matches = four_player_bracket();
    let before = matches.clone();
    record_result(&mut matches, &entry("match_1_0", Side::A, 3, 1)).unwrap();

    let decided = find(&matches, "match_1_0");
    assert_eq!(decided.winner.as_ref().unwrap().id, "A1");
    assert_eq!(decided.score.as_deref(), Some("3-1"));

    let next = find(&matches, "match_2_0");
    assert_eq!(next.player1.as_ref().unwrap().id, "A1");
    assert!(next.player2.is_none());

    for (old, new) in before.iter().zip(&matches) {
        if new.id != "match_1_0" && new.id != "match_2_0" {
            assert_eq!(old, new);
        }
    }
}

#[test]
fn winner_of_odd_match_fills_player2() {
    let mut matches = four_player_bracket();
    record_result(&mut matches, &entry("match_1_1", Side::B, 1, 3)).unwrap();
    let next = find(&matches, "match_2_0");
    assert!(next.player1.is_none());
    assert_eq!(next.player2.as_ref().unwrap().id, "B2");
}

#[test]
fn walkover_and_retirement_use_sweep_score() {
    let mut matches = four_player_bracket();
    let mut wo = entry("match_1_0", Side::A, 0, 0);
    wo.result_type = ResultType::Walkover;
    record_result(&mut matches, &wo).unwrap();
    assert_eq!(find(&matches, "match_1_0").score.as_deref(), Some("3-0"));

    let mut ret = entry("match_1_1", Side::B, 2, 1);
    ret.result_type = ResultType::Retired;
    ret.best_of = BestOf::Seven;
    record_result(&mut matches, &ret).unwrap();
    assert_eq!(find(&matches, "match_1_1").score.as_deref(), Some("0-4"));
}

#[test]
fn score_contradicting_winner_is_rejected_without_change() {
    let mut matches = four_player_bracket();
    let before = matches.clone();
    let err = record_result(&mut matches, &entry("match_1_0", Side::A, 1, 3)).unwrap_err();
    assert!(matches!(err, ResultsError::InconsistentScore { .. }));
    // Not a finished best-of-5 either.
    assert!(record_result(&mut matches, &entry("match_1_0", Side::A, 2, 1)).is_err());
    assert!(record_result(&mut matches, &entry("match_1_0", Side::A, 3, 3)).is_err());
    assert_eq!(matches, before);
}

#[test]
fn bye_and_empty_matches_are_not_playable() {
    let mut matches =
        generate_bracket(&[q("A1", "A", 1), q("B1", "B", 1), q("C1", "C", 1)]).unwrap();
    assert_eq!(
        record_result(&mut matches, &entry("match_1_1", Side::A, 3, 0)),
        Err(ResultsError::MatchNotPlayable("match_1_1".into()))
    );
    assert_eq!(
        record_result(&mut matches, &entry(THIRD_PLACE_MATCH_ID, Side::A, 3, 0)),
        Err(ResultsError::MatchNotPlayable(THIRD_PLACE_MATCH_ID.into()))
    );
    assert_eq!(
        record_result(&mut matches, &entry("match_9_9", Side::A, 3, 0)),
        Err(ResultsError::MatchNotFound("match_9_9".into()))
    );
}

#[test]
fn final_and_third_place_produce_podium() {
    let mut matches = four_player_bracket();
    record_result(&mut matches, &entry("match_1_0", Side::A, 3, 0)).unwrap(); // A1 beats B1
    record_result(&mut matches, &entry("match_1_1", Side::B, 2, 3)).unwrap(); // B2 beats A2
    seed_third_place(&mut matches).unwrap();
    let third = find(&matches, THIRD_PLACE_MATCH_ID);
    assert_eq!(third.player1.as_ref().unwrap().id, "B1");
    assert_eq!(third.player2.as_ref().unwrap().id, "A2");

    record_result(&mut matches, &entry("match_2_0", Side::A, 3, 2)).unwrap(); // X = A1, Y = B2
    record_result(&mut matches, &entry(THIRD_PLACE_MATCH_ID, Side::B, 1, 3)).unwrap(); // Z = A2

    let rankings = record_result(&mut matches, &entry("match_2_0", Side::A, 3, 2)).unwrap();
    let summary: Vec<(u32, &str)> = rankings
        .iter()
        .map(|r| (r.position, r.player_id.as_str()))
        .collect();
    assert_eq!(summary, vec![(1, "A1"), (2, "B2"), (3, "A2")]);
    assert_eq!(rankings, derive_final_rankings(&matches));
}

#[test]
fn rerecording_overwrites_previous_decision() {
    let mut matches = four_player_bracket();
    record_result(&mut matches, &entry("match_1_0", Side::A, 3, 0)).unwrap();
    record_result(&mut matches, &entry("match_1_0", Side::B, 1, 3)).unwrap();
    assert_eq!(find(&matches, "match_1_0").winner.as_ref().unwrap().id, "B1");
    assert_eq!(find(&matches, "match_2_0").player1.as_ref().unwrap().id, "B1");
}

#[test]
fn rerecording_semi_final_clears_later_decisions() {
    let mut matches = four_player_bracket();
    record_result(&mut matches, &entry("match_1_0", Side::A, 3, 0)).unwrap(); // A1 beats B1
    record_result(&mut matches, &entry("match_1_1", Side::A, 3, 1)).unwrap(); // A2 beats B2
    seed_third_place(&mut matches).unwrap();
    record_result(&mut matches, &entry("match_2_0", Side::A, 3, 1)).unwrap(); // A1 champion
    record_result(&mut matches, &entry(THIRD_PLACE_MATCH_ID, Side::A, 3, 2)).unwrap(); // B1 third

    let rankings = record_result(&mut matches, &entry("match_1_0", Side::B, 2, 3)).unwrap();

    let final_match = find(&matches, "match_2_0");
    assert_eq!(final_match.player1.as_ref().unwrap().id, "B1");
    assert_eq!(final_match.player2.as_ref().unwrap().id, "A2");
    assert!(final_match.winner.is_none());
    assert!(final_match.score.is_none());

    let third = find(&matches, THIRD_PLACE_MATCH_ID);
    assert_eq!(third.player1.as_ref().unwrap().id, "A1");
    assert_eq!(third.player2.as_ref().unwrap().id, "B2");
    assert!(third.winner.is_none());
    assert!(rankings.is_empty());

    let rankings = record_result(&mut matches, &entry("match_2_0", Side::B, 0, 3)).unwrap();
    let summary: Vec<(u32, &str)> = rankings
        .iter()
        .map(|r| (r.position, r.player_id.as_str()))
        .collect();
    assert_eq!(summary, vec![(1, "A2"), (2, "B1")]);
}

#[test]
fn rerecording_with_same_winner_keeps_later_rounds() {
    let mut matches = four_player_bracket();
    record_result(&mut matches, &entry("match_1_0", Side::A, 3, 0)).unwrap();
    record_result(&mut matches, &entry("match_1_1", Side::A, 3, 1)).unwrap();
    record_result(&mut matches, &entry("match_2_0", Side::A, 3, 1)).unwrap();
    record_result(&mut matches, &entry("match_1_0", Side::A, 3, 2)).unwrap();
    assert_eq!(find(&matches, "match_2_0").winner.as_ref().unwrap().id, "A1");
    assert_eq!(find(&matches, "match_1_0").score.as_deref(), Some("3-2"));
}

#[test]
fn manual_slot_change_clears_decision() {
    let mut matches = four_player_bracket();
    record_result(&mut matches, &entry("match_1_0", Side::A, 3, 0)).unwrap();
    let sub = Participant::new("X9", "Substitute", "");
    set_match_participant(&mut matches, "match_1_0", Side::B, Some(sub)).unwrap();
    let m = find(&matches, "match_1_0");
    assert!(m.winner.is_none());
    assert!(m.score.is_none());
    assert_eq!(m.player2.as_ref().unwrap().id, "X9");
}

#[test]
fn manual_bye_in_slot_resolves_and_advances() {
    let mut matches = four_player_bracket();
    set_match_participant(&mut matches, "match_1_1", Side::B, Some(Participant::bye())).unwrap();
    assert_eq!(find(&matches, "match_1_1").winner.as_ref().unwrap().id, "A2");
    assert_eq!(find(&matches, "match_2_0").player2.as_ref().unwrap().id, "A2");
}

#[test]
fn overrides_add_prizes_and_lower_places() {
    let derived = vec![
        FinalRanking::new(1, "A1", "Ann"),
        FinalRanking::new(2, "B2", "Bob"),
    ];
    let mut prize = FinalRanking::new(1, "", "");
    prize.prize = Some("Trophy".into());
    let fourth = FinalRanking::new(4, "C1", "Cid");
    let merged = merge_rankings(&derived, &[fourth.clone(), prize]);
    assert_eq!(merged.len(), 3);
    assert_eq!(merged[0].player_id, "A1");
    assert_eq!(merged[0].prize.as_deref(), Some("Trophy"));
    assert_eq!(merged[1].player_id, "B2");
    assert_eq!(merged[2], fourth);
}
