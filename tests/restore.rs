//! Integration tests for snapshots: save/restore round trips and the
//! validation that rejects tampered or stale saves.

use league_core::{
    report_conference_match, report_stage_match, stage_is_done, start_division, start_league,
    start_minor, Competitor, CompetitorId, EngineError, League, LeagueError, MatchId, Minor,
    ScoreEvent, ScoreReport, SavedLeague, SavedMinor,
};

fn named(id: CompetitorId) -> Competitor {
    Competitor::new(id, format!("C{id}"), 1)
}

fn entry(competitor_id: CompetitorId, score: u32) -> ScoreReport {
    ScoreReport { competitor_id, score }
}

/// A league mid-season: one division of 8, a single match already reported.
fn mid_season_league() -> League {
    let mut league = League::new("Pyramid");
    let division = league.add_division("Open", 8, 4);
    division.promotion_percent = 0.5;
    division.add_competitors((1..=8).map(named)).unwrap();
    start_league(&mut league).unwrap();
    report_conference_match(
        &mut league.divisions[0],
        0,
        MatchId::new(1, 1, 1),
        &[entry(1, 3), entry(4, 2)],
    )
    .unwrap();
    league
}

#[test]
fn league_snapshot_round_trips_through_json() {
    let league = mid_season_league();

    let json = serde_json::to_string(&league.save()).unwrap();
    let saved: SavedLeague = serde_json::from_str(&json).unwrap();
    let restored = saved.restore().unwrap();

    assert_eq!(restored, league);
}

#[test]
fn restored_league_keeps_scoring_identically() {
    let mut league = mid_season_league();
    let mut restored = league.save().restore().unwrap();

    let id = MatchId::new(1, 2, 1);
    let report = [entry(1, 0), entry(3, 2)];
    report_conference_match(&mut league.divisions[0], 0, id, &report).unwrap();
    report_conference_match(&mut restored.divisions[0], 0, id, &report).unwrap();

    assert_eq!(restored, league);
    assert_eq!(
        restored.divisions[0].conferences[0].engine.results(),
        league.divisions[0].conferences[0].engine.results()
    );
    assert_eq!(
        restored.divisions[0].is_done(),
        league.divisions[0].is_done()
    );
}

#[test]
fn restore_rejects_a_version_it_does_not_know() {
    let mut saved = mid_season_league().save();
    saved.version = 99;
    assert!(matches!(
        saved.restore(),
        Err(LeagueError::RestoreMismatch { field: "version" })
    ));
}

#[test]
fn restore_rejects_a_conference_member_outside_the_roster() {
    let mut saved = mid_season_league().save();
    saved.divisions[0].conferences[0].competitor_ids[0] = 999;
    assert!(matches!(
        saved.restore(),
        Err(LeagueError::RestoreMismatch { field: "conference member" })
    ));
}

#[test]
fn restore_rejects_a_short_conference_partition() {
    let mut saved = mid_season_league().save();
    saved.divisions[0].conferences[1].competitor_ids.pop();
    assert!(matches!(
        saved.restore(),
        Err(LeagueError::RestoreMismatch { field: "conference partition" })
    ));
}

#[test]
fn restore_rejects_a_double_assigned_conference_member() {
    let mut saved = mid_season_league().save();
    // Counts still add up: competitor 1 now sits in both conferences while
    // 5 sits in neither.
    saved.divisions[0].conferences[1].competitor_ids[0] = 1;
    assert!(matches!(
        saved.restore(),
        Err(LeagueError::RestoreMismatch { field: "conference partition" })
    ));
}

#[test]
fn restore_rejects_a_tampered_score_log() {
    let mut saved = mid_season_league().save();
    saved.divisions[0].conferences[0].engine.state.push(ScoreEvent {
        id: MatchId::new(9, 9, 9),
        score: [1, 0],
    });
    assert!(matches!(
        saved.restore(),
        Err(LeagueError::Engine(EngineError::UnknownMatch(_)))
    ));
}

/// A minor mid-playoffs: group phase done, a four-way bracket built (group
/// winners 1, 4, 2, 3), one semifinal in.
fn mid_bracket_minor() -> Minor {
    let mut minor = Minor::new("Tour");
    minor
        .add_stage("Open", 8, 4, true)
        .add_competitors((1..=8).map(named).collect())
        .unwrap();
    start_minor(&mut minor).unwrap();

    let stage = minor.current_stage_mut().unwrap();
    let fixtures: Vec<(MatchId, CompetitorId, CompetitorId)> = stage
        .group
        .as_ref()
        .unwrap()
        .matches()
        .iter()
        .map(|m| {
            let [a, b] = m.seeds().unwrap();
            (
                m.id,
                stage.competitor_by_seed(a).unwrap().id,
                stage.competitor_by_seed(b).unwrap().id,
            )
        })
        .collect();
    for (id, home, away) in fixtures {
        let report = [
            entry(home, if home < away { 2 } else { 0 }),
            entry(away, if away < home { 2 } else { 0 }),
        ];
        report_stage_match(stage, id, &report).unwrap();
    }
    assert!(!stage_is_done(stage).unwrap());
    // Semifinal one pairs bracket seeds 1 and 4, competitors 1 and 3.
    report_stage_match(stage, MatchId::new(1, 1, 1), &[entry(1, 2), entry(3, 1)]).unwrap();
    minor
}

#[test]
fn minor_snapshot_round_trips_through_json() {
    let mut minor = mid_bracket_minor();

    let json = serde_json::to_string(&minor.save()).unwrap();
    let saved: SavedMinor = serde_json::from_str(&json).unwrap();
    let mut restored = saved.restore().unwrap();
    assert_eq!(restored, minor);

    // Both copies finish the bracket the same way: second semifinal, final,
    // bronze final.
    for m in [&mut minor, &mut restored] {
        let stage = m.current_stage_mut().unwrap();
        report_stage_match(stage, MatchId::new(1, 1, 2), &[entry(4, 0), entry(2, 2)]).unwrap();
        report_stage_match(stage, MatchId::new(1, 2, 1), &[entry(1, 2), entry(2, 1)]).unwrap();
        report_stage_match(stage, MatchId::new(2, 1, 1), &[entry(3, 2), entry(4, 1)]).unwrap();
        assert!(stage_is_done(stage).unwrap());
        assert_eq!(stage.playoff_winner().unwrap().id, 1);
    }
    assert_eq!(restored, minor);
}

#[test]
fn stage_restore_rejects_a_bracket_the_stage_never_declared() {
    let mut saved = mid_bracket_minor().save();
    saved.stages[0].playoffs = false;
    assert!(matches!(
        saved.restore(),
        Err(LeagueError::RestoreMismatch { field: "bracket on a stage without playoffs" })
    ));
}

#[test]
fn minor_restore_rejects_inconsistent_start_bookkeeping() {
    let mut saved = mid_bracket_minor().save();
    saved.started = vec![5];
    assert!(matches!(
        saved.restore(),
        Err(LeagueError::RestoreMismatch { field: "started stage index" })
    ));

    let mut saved = mid_bracket_minor().save();
    saved.started.clear();
    assert!(matches!(
        saved.restore(),
        Err(LeagueError::RestoreMismatch { field: "drawn stage never started" })
    ));
}

#[test]
fn division_restore_rejects_a_foreign_promotion() {
    let mut league = League::new("Pyramid");
    let division = league.add_division("Open", 4, 4);
    division.promotion_percent = 0.25;
    division.add_competitors((1..=4).map(named)).unwrap();
    start_division(&mut league.divisions[0]).unwrap();

    let mut saved = league.save();
    saved.divisions[0].automatic_promotions.push(77);
    assert!(matches!(
        saved.restore(),
        Err(LeagueError::RestoreMismatch { field: "promoted competitor" })
    ));
}
