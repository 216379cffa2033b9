//! Integration tests for the match-report boundary: whole-or-nothing
//! validation and tally bookkeeping.

use league_core::{
    report_conference_match, report_promotion_match, start_division, start_division_post_season,
    Competitor, CompetitorId, Division, EngineError, LeagueError, MatchId, ScoreReport,
};

fn named(id: CompetitorId) -> Competitor {
    Competitor::new(id, format!("C{id}"), 1)
}

/// Two competitors, one conference, one match (S1 R1 M1).
fn tiny_division() -> Division {
    let mut division = Division::new("Tiny", 2, 2).with_promotion_percent(0.5);
    division.add_competitors([named(129), named(130)]).unwrap();
    start_division(&mut division).unwrap();
    division
}

fn entry(competitor_id: CompetitorId, score: u32) -> ScoreReport {
    ScoreReport { competitor_id, score }
}

fn tally(division: &Division, id: CompetitorId) -> (u32, u32, u32) {
    let c = division.competitor(id).unwrap();
    (c.wins, c.losses, c.draws)
}

#[test]
fn report_applies_once_then_rejects_the_duplicate() {
    let mut division = tiny_division();
    let id = MatchId::new(1, 1, 1);
    let report = [entry(129, 2), entry(130, 1)];

    report_conference_match(&mut division, 0, id, &report).unwrap();
    assert_eq!(tally(&division, 129), (1, 0, 0));
    assert_eq!(tally(&division, 130), (0, 1, 0));

    assert!(matches!(
        report_conference_match(&mut division, 0, id, &report),
        Err(LeagueError::AlreadyReported(_))
    ));
    // The first result stands untouched.
    assert_eq!(tally(&division, 129), (1, 0, 0));
    assert_eq!(tally(&division, 130), (0, 1, 0));
    let played = division.conferences[0].engine.find_match(id).unwrap();
    assert_eq!(played.score, Some([2, 1]));
}

#[test]
fn unknown_competitor_rejects_the_whole_report() {
    let mut division = tiny_division();
    let id = MatchId::new(1, 1, 1);

    assert!(matches!(
        report_conference_match(&mut division, 0, id, &[entry(129, 2), entry(1337, 1)]),
        Err(LeagueError::UnknownCompetitor(1337))
    ));
    // No partial application: the valid side's tally is untouched and the
    // match is still open.
    assert_eq!(tally(&division, 129), (0, 0, 0));
    assert!(division.conferences[0].engine.find_match(id).unwrap().score.is_none());

    report_conference_match(&mut division, 0, id, &[entry(129, 2), entry(130, 1)]).unwrap();
    assert_eq!(tally(&division, 129), (1, 0, 0));
}

#[test]
fn report_must_cover_both_participants_exactly_once() {
    let mut division = tiny_division();
    let id = MatchId::new(1, 1, 1);

    assert!(matches!(
        report_conference_match(&mut division, 0, id, &[entry(129, 2)]),
        Err(LeagueError::MalformedReport { expected: 2, got: 1 })
    ));
    assert!(matches!(
        report_conference_match(
            &mut division,
            0,
            id,
            &[entry(129, 2), entry(130, 1), entry(130, 0)]
        ),
        Err(LeagueError::MalformedReport { expected: 2, got: 3 })
    ));
    assert!(matches!(
        report_conference_match(&mut division, 0, id, &[entry(129, 2), entry(129, 1)]),
        Err(LeagueError::MalformedReport { .. })
    ));
    assert!(division.conferences[0].engine.find_match(id).unwrap().score.is_none());
}

#[test]
fn report_addressing_is_checked_before_content() {
    let mut division = tiny_division();
    let report = [entry(129, 2), entry(130, 1)];

    assert!(matches!(
        report_conference_match(&mut division, 7, MatchId::new(1, 1, 1), &report),
        Err(LeagueError::UnknownConference(7))
    ));
    assert!(matches!(
        report_conference_match(&mut division, 0, MatchId::new(1, 9, 9), &report),
        Err(LeagueError::UnknownMatch(_))
    ));
}

#[test]
fn participant_check_is_per_match_not_per_conference() {
    let mut division = Division::new("Open", 4, 4).with_promotion_percent(0.25);
    division.add_competitors((1..=4).map(named)).unwrap();
    start_division(&mut division).unwrap();

    // S1 R1 M1 pairs seeds 1 and 4; competitor 2 is in the conference but
    // not in this match.
    assert!(matches!(
        report_conference_match(
            &mut division,
            0,
            MatchId::new(1, 1, 1),
            &[entry(1, 2), entry(2, 1)]
        ),
        Err(LeagueError::CompetitorNotInMatch(2))
    ));
}

#[test]
fn drawn_group_match_counts_for_both() {
    let mut division = Division::new("Open", 4, 4).with_promotion_percent(0.25);
    division.add_competitors((1..=4).map(named)).unwrap();
    start_division(&mut division).unwrap();

    report_conference_match(
        &mut division,
        0,
        MatchId::new(1, 1, 1),
        &[entry(1, 1), entry(4, 1)],
    )
    .unwrap();
    assert_eq!(tally(&division, 1), (0, 0, 1));
    assert_eq!(tally(&division, 4), (0, 0, 1));
}

#[test]
fn tallies_follow_the_winning_side_either_way_round() {
    let mut division = Division::new("Open", 4, 4).with_promotion_percent(0.25);
    division.add_competitors((1..=4).map(named)).unwrap();
    start_division(&mut division).unwrap();

    // S1 R1 M1 pairs seeds 1 and 4; the home side takes it.
    report_conference_match(
        &mut division,
        0,
        MatchId::new(1, 1, 1),
        &[entry(1, 3), entry(4, 1)],
    )
    .unwrap();
    assert_eq!(tally(&division, 1), (1, 0, 0));
    assert_eq!(tally(&division, 4), (0, 1, 0));

    // S1 R1 M2 pairs seeds 2 and 3; the away side takes it.
    report_conference_match(
        &mut division,
        0,
        MatchId::new(1, 1, 2),
        &[entry(2, 0), entry(3, 2)],
    )
    .unwrap();
    assert_eq!(tally(&division, 2), (0, 1, 0));
    assert_eq!(tally(&division, 3), (1, 0, 0));
}

/// Through the group stage into the post-season: 8 competitors, two
/// conferences, two playoff brackets of three.
fn division_in_playoffs() -> Division {
    let mut division = Division::new("Open", 8, 4).with_promotion_percent(0.5);
    division.add_competitors((1..=8).map(named)).unwrap();
    start_division(&mut division).unwrap();
    for index in 0..division.conferences.len() {
        let fixtures: Vec<(MatchId, CompetitorId, CompetitorId)> = division.conferences[index]
            .engine
            .matches()
            .iter()
            .map(|m| {
                let [a, b] = m.seeds().unwrap();
                let conference = &division.conferences[index];
                (
                    m.id,
                    conference.competitor_by_seed(a).unwrap(),
                    conference.competitor_by_seed(b).unwrap(),
                )
            })
            .collect();
        for (id, home, away) in fixtures {
            let report = [
                entry(home, if home < away { 2 } else { 0 }),
                entry(away, if away < home { 2 } else { 0 }),
            ];
            report_conference_match(&mut division, index, id, &report).unwrap();
        }
    }
    assert!(start_division_post_season(&mut division).unwrap());
    division
}

#[test]
fn promotion_bracket_rejects_ties() {
    let mut division = division_in_playoffs();
    // Bracket 0 holds ids 2, 3, 4; its only round-one pairing is 3 vs 4.
    assert!(matches!(
        report_promotion_match(
            &mut division,
            0,
            MatchId::new(1, 1, 2),
            &[entry(3, 1), entry(4, 1)]
        ),
        Err(LeagueError::Engine(EngineError::TiedScore(_)))
    ));
}

#[test]
fn bracket_match_cannot_be_reported_before_its_feed() {
    let mut division = division_in_playoffs();
    // The final's second slot waits for the 3 vs 4 winner.
    assert!(matches!(
        report_promotion_match(
            &mut division,
            0,
            MatchId::new(1, 2, 1),
            &[entry(2, 2), entry(3, 0)]
        ),
        Err(LeagueError::Engine(EngineError::MissingCompetitors(_)))
    ));
}

#[test]
fn bracket_play_leaves_roster_tallies_alone() {
    let mut division = division_in_playoffs();
    let before = tally(&division, 3);

    report_promotion_match(
        &mut division,
        0,
        MatchId::new(1, 1, 2),
        &[entry(3, 2), entry(4, 0)],
    )
    .unwrap();
    assert_eq!(tally(&division, 3), before);
}
