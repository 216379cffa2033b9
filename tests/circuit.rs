//! Integration tests for cup circuits: stages, playoff brackets over group
//! winners, and multi-stage minors.

use league_core::{
    minor_is_done, report_stage_match, stage_is_done, start_minor, Competitor, CompetitorId,
    LeagueError, MatchId, Minor, ScoreReport, Stage,
};

fn named(id: CompetitorId) -> Competitor {
    Competitor::new(id, format!("C{id}"), 0)
}

fn report_pair(home: CompetitorId, away: CompetitorId) -> [ScoreReport; 2] {
    [
        ScoreReport {
            competitor_id: home,
            score: if home < away { 2 } else { 0 },
        },
        ScoreReport {
            competitor_id: away,
            score: if away < home { 2 } else { 0 },
        },
    ]
}

/// Score every playable match in the stage's current phase; lower id wins.
fn play_phase(stage: &mut Stage) {
    loop {
        let fixtures: Vec<(MatchId, CompetitorId, CompetitorId)> = match &stage.bracket {
            Some(bracket) => bracket
                .matches()
                .iter()
                .filter(|m| m.score.is_none())
                .filter_map(|m| {
                    let [a, b] = m.seeds()?;
                    Some((
                        m.id,
                        stage.playoff_competitor_by_seed(a).unwrap().id,
                        stage.playoff_competitor_by_seed(b).unwrap().id,
                    ))
                })
                .collect(),
            None => stage
                .group
                .as_ref()
                .unwrap()
                .matches()
                .iter()
                .filter(|m| m.score.is_none())
                .map(|m| {
                    let [a, b] = m.seeds().unwrap();
                    (
                        m.id,
                        stage.competitor_by_seed(a).unwrap().id,
                        stage.competitor_by_seed(b).unwrap().id,
                    )
                })
                .collect(),
        };
        if fixtures.is_empty() {
            break;
        }
        for (id, home, away) in fixtures {
            report_stage_match(stage, id, &report_pair(home, away)).unwrap();
        }
    }
}

#[test]
fn stage_without_playoffs_tracks_its_groups_directly() {
    let mut minor = Minor::new("Tour");
    minor
        .add_stage("Open", 8, 8, false)
        .add_competitors((1..=8).map(named).collect())
        .unwrap();
    assert!(start_minor(&mut minor).unwrap());

    let stage = minor.current_stage_mut().unwrap();
    assert!(!stage_is_done(stage).unwrap());
    play_phase(stage);
    assert!(stage_is_done(stage).unwrap());
    assert!(stage.bracket.is_none());
    assert!(minor_is_done(&mut minor).unwrap());
}

#[test]
fn group_winners_follow_the_qualify_count() {
    let mut minor = Minor::new("Tour");
    minor
        .add_stage("Open", 8, 4, false)
        .add_competitors((1..=8).map(named).collect())
        .unwrap();
    start_minor(&mut minor).unwrap();

    let stage = minor.current_stage_mut().unwrap();
    play_phase(stage);

    // Serpentine groups {1,4,5,8} and {2,3,6,7}; two qualify per group,
    // group-major.
    let winners: Vec<CompetitorId> = stage
        .group_winners()
        .iter()
        .map(|row| stage.competitor_by_seed(row.seed).unwrap().id)
        .collect();
    assert_eq!(winners, vec![1, 4, 2, 3]);
}

#[test]
fn playoff_bracket_seeds_group_winners_in_standings_order() {
    let mut minor = Minor::new("Tour");
    minor
        .add_stage("Open", 8, 4, true)
        .add_competitors((1..=8).map(named).collect())
        .unwrap();
    start_minor(&mut minor).unwrap();
    let stage = minor.current_stage_mut().unwrap();

    play_phase(stage);
    assert!(!stage_is_done(stage).unwrap());

    let entrants: Vec<CompetitorId> = stage.playoff_competitors.iter().map(|c| c.id).collect();
    assert_eq!(entrants, vec![1, 4, 2, 3]);

    play_phase(stage);
    assert!(stage_is_done(stage).unwrap());
    assert_eq!(stage.playoff_winner().unwrap().id, 1);

    // Bracket play never touches the roster counters: champion C1 keeps
    // exactly the three group wins.
    let champion = stage.competitors.iter().find(|c| c.id == 1).unwrap();
    assert_eq!((champion.wins, champion.losses), (3, 0));
    assert!(minor_is_done(&mut minor).unwrap());
}

#[test]
fn too_few_qualifiers_fails_loudly() {
    let mut minor = Minor::new("Tour");
    let stage = minor.add_stage("Tiny", 2, 2, true);
    stage.group_qualify_num = 1;
    stage.add_competitors(vec![named(1), named(2)]).unwrap();
    start_minor(&mut minor).unwrap();

    let stage = minor.current_stage_mut().unwrap();
    play_phase(stage);
    assert!(matches!(
        stage_is_done(stage),
        Err(LeagueError::TooFewQualifiers { qualifiers: 1 })
    ));
}

#[test]
fn next_stage_waits_for_the_current_one() {
    let mut minor = Minor::new("Tour");
    minor
        .add_stage("One", 4, 4, false)
        .add_competitors((1..=4).map(named).collect())
        .unwrap();
    minor.add_stage("Two", 4, 4, false);
    start_minor(&mut minor).unwrap();

    assert_eq!(start_minor(&mut minor), Ok(false));
    assert_eq!(minor.started, vec![0]);
}

#[test]
fn qualifiers_carry_into_the_next_stage_with_fresh_records() {
    let mut minor = Minor::new("Tour");
    minor
        .add_stage("Qualifier", 4, 4, false)
        .add_competitors((1..=4).map(named).collect())
        .unwrap();
    minor
        .add_stage("Main", 4, 4, false)
        .add_competitors(vec![named(9), named(10)])
        .unwrap();

    start_minor(&mut minor).unwrap();
    play_phase(minor.current_stage_mut().unwrap());
    assert!(start_minor(&mut minor).unwrap());
    assert_eq!(minor.started, vec![0, 1]);

    // Direct entrants first, then the carried qualifiers, records reset.
    let main = minor.current_stage().unwrap();
    let roster: Vec<CompetitorId> = main.competitors.iter().map(|c| c.id).collect();
    assert_eq!(roster, vec![9, 10, 1, 2]);
    let carried = main.competitors.iter().find(|c| c.id == 1).unwrap();
    assert_eq!((carried.wins, carried.losses, carried.draws), (0, 0, 0));

    assert!(!minor_is_done(&mut minor).unwrap());
    play_phase(minor.current_stage_mut().unwrap());
    assert!(minor_is_done(&mut minor).unwrap());
    assert_eq!(start_minor(&mut minor), Ok(false));
}

#[test]
fn a_spent_single_stage_minor_advances_nothing() {
    let mut minor = Minor::new("Tour");
    minor
        .add_stage("Open", 4, 4, false)
        .add_competitors((1..=4).map(named).collect())
        .unwrap();
    assert!(start_minor(&mut minor).unwrap());
    assert_eq!(start_minor(&mut minor), Ok(false));
    assert_eq!(minor.started, vec![0]);

    play_phase(minor.current_stage_mut().unwrap());
    assert!(minor_is_done(&mut minor).unwrap());
    assert_eq!(start_minor(&mut minor), Ok(false));
}
