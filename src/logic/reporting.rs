//! The match-report boundary: validate caller-supplied results end to end
//! before anything is applied.
//!
//! A report is rejected whole or applied whole. Checks run in a fixed
//! order: the match must exist, must not already have a result, the report
//! must cover both participants exactly once, and every named competitor
//! must play in that match. Scores arrive keyed by competitor and are
//! reordered to the engine's seed order here.

use crate::engine::{EngineError, MatchId, Seed};
use crate::models::{Competitor, CompetitorId, Division, LeagueError, Stage};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// One competitor's side of a match result.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ScoreReport {
    pub competitor_id: CompetitorId,
    pub score: u32,
}

/// Report a conference (group stage) match result.
///
/// On success the score lands in the conference's round robin and both
/// participants' win/loss/draw counters are updated on the division roster.
pub fn report_conference_match(
    division: &mut Division,
    conference: usize,
    id: MatchId,
    report: &[ScoreReport],
) -> Result<(), LeagueError> {
    let conf = division
        .conferences
        .get(conference)
        .ok_or(LeagueError::UnknownConference(conference))?;
    let found = conf.engine.find_match(id).ok_or(LeagueError::UnknownMatch(id))?;
    if found.score.is_some() {
        return Err(LeagueError::AlreadyReported(id));
    }
    let seeds = found
        .seeds()
        .ok_or(LeagueError::CorruptSeason("round-robin match missing a competitor"))?;
    let score = ordered_score(report, |c| conf.seed_of(c), seeds)?;
    let home = conf
        .competitor_by_seed(seeds[0])
        .ok_or(LeagueError::CorruptSeason("match seed outside the conference"))?;
    let away = conf
        .competitor_by_seed(seeds[1])
        .ok_or(LeagueError::CorruptSeason("match seed outside the conference"))?;

    division
        .conferences
        .get_mut(conference)
        .ok_or(LeagueError::UnknownConference(conference))?
        .engine
        .score(id, score)?;
    apply_counters(&mut division.competitors, [home, away], score)
}

/// Report a promotion playoff match result.
///
/// Elimination rules apply: ties and re-reports are rejected, and a match
/// whose participants are not yet decided cannot be scored. Bracket play
/// does not touch the win/loss/draw counters.
pub fn report_promotion_match(
    division: &mut Division,
    bracket: usize,
    id: MatchId,
    report: &[ScoreReport],
) -> Result<(), LeagueError> {
    let pc = division
        .promotion_conferences
        .get(bracket)
        .ok_or(LeagueError::UnknownConference(bracket))?;
    let found = pc.bracket.find_match(id).ok_or(LeagueError::UnknownMatch(id))?;
    if found.score.is_some() {
        return Err(LeagueError::AlreadyReported(id));
    }
    let seeds = found
        .seeds()
        .ok_or(LeagueError::Engine(EngineError::MissingCompetitors(id)))?;
    let score = ordered_score(report, |c| pc.seed_of(c), seeds)?;

    division
        .promotion_conferences
        .get_mut(bracket)
        .ok_or(LeagueError::UnknownConference(bracket))?
        .bracket
        .score(id, score)?;
    Ok(())
}

/// Report a stage match result, routed by phase: once the playoff bracket
/// exists, reports address the bracket, otherwise the group phase. Group
/// results update the stage roster's counters; bracket results do not.
pub fn report_stage_match(
    stage: &mut Stage,
    id: MatchId,
    report: &[ScoreReport],
) -> Result<(), LeagueError> {
    if let Some(bracket) = stage.bracket.as_mut() {
        let entrants = &stage.playoff_competitors;
        let found = bracket.find_match(id).ok_or(LeagueError::UnknownMatch(id))?;
        if found.score.is_some() {
            return Err(LeagueError::AlreadyReported(id));
        }
        let seeds = found
            .seeds()
            .ok_or(LeagueError::Engine(EngineError::MissingCompetitors(id)))?;
        let score = ordered_score(report, |c| seed_in(entrants, c), seeds)?;
        bracket.score(id, score)?;
        return Ok(());
    }

    let group = stage.group.as_ref().ok_or(LeagueError::InvalidState)?;
    let found = group.find_match(id).ok_or(LeagueError::UnknownMatch(id))?;
    if found.score.is_some() {
        return Err(LeagueError::AlreadyReported(id));
    }
    let seeds = found
        .seeds()
        .ok_or(LeagueError::CorruptSeason("round-robin match missing a competitor"))?;
    let score = ordered_score(report, |c| seed_in(&stage.competitors, c), seeds)?;
    let home = stage
        .competitor_by_seed(seeds[0])
        .map(|c| c.id)
        .ok_or(LeagueError::CorruptSeason("match seed outside the stage roster"))?;
    let away = stage
        .competitor_by_seed(seeds[1])
        .map(|c| c.id)
        .ok_or(LeagueError::CorruptSeason("match seed outside the stage roster"))?;

    stage
        .group
        .as_mut()
        .ok_or(LeagueError::InvalidState)?
        .score(id, score)?;
    apply_counters(&mut stage.competitors, [home, away], score)
}

/// Reorder a by-competitor report into the match's seed order, rejecting
/// anything that does not name both participants exactly once.
fn ordered_score<F>(
    report: &[ScoreReport],
    seed_of: F,
    seeds: [Seed; 2],
) -> Result<[u32; 2], LeagueError>
where
    F: Fn(CompetitorId) -> Option<Seed>,
{
    if report.len() != 2 {
        return Err(LeagueError::MalformedReport {
            expected: 2,
            got: report.len(),
        });
    }
    let mut slots = [None; 2];
    for entry in report {
        let seed = seed_of(entry.competitor_id)
            .ok_or(LeagueError::UnknownCompetitor(entry.competitor_id))?;
        let slot = if seed == seeds[0] {
            0
        } else if seed == seeds[1] {
            1
        } else {
            return Err(LeagueError::CompetitorNotInMatch(entry.competitor_id));
        };
        if slots[slot].is_some() {
            return Err(LeagueError::MalformedReport {
                expected: 2,
                got: report.len(),
            });
        }
        slots[slot] = Some(entry.score);
    }
    match slots {
        [Some(home), Some(away)] => Ok([home, away]),
        _ => Err(LeagueError::MalformedReport {
            expected: 2,
            got: report.len(),
        }),
    }
}

fn seed_in(roster: &[Competitor], id: CompetitorId) -> Option<Seed> {
    roster.iter().position(|c| c.id == id).map(|i| i + 1)
}

/// Update both participants' records from a seed-ordered score.
fn apply_counters(
    roster: &mut [Competitor],
    participants: [CompetitorId; 2],
    score: [u32; 2],
) -> Result<(), LeagueError> {
    let outcome = score[0].cmp(&score[1]);
    for (slot, id) in participants.into_iter().enumerate() {
        let competitor = roster
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(LeagueError::CorruptSeason("participant missing from the roster"))?;
        let home = slot == 0;
        match (outcome, home) {
            (Ordering::Greater, true) | (Ordering::Less, false) => competitor.add_win(),
            (Ordering::Less, true) | (Ordering::Greater, false) => competitor.add_loss(),
            (Ordering::Equal, _) => competitor.add_draw(),
        }
    }
    Ok(())
}
