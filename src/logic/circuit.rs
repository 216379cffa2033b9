//! Circuit events: stages with a group phase, playoff brackets over the
//! group winners, and minors that chain stages together.

use crate::engine::{Elimination, EliminationOptions, RoundRobin, RoundRobinOptions};
use crate::models::{Competitor, LeagueError, Minor, Stage};

/// Start a minor circuit, or advance it by one stage.
///
/// The first call starts the first declared stage. Later calls advance: once
/// the current stage has fully resolved, its qualifiers (the group winners)
/// carry over with fresh records, after anyone entered into the next stage
/// directly, and that stage starts. Returns `Ok(false)` when nothing
/// advanced, either because the current stage is still playing or because no
/// stage remains.
pub fn start_minor(minor: &mut Minor) -> Result<bool, LeagueError> {
    if let Some(&current) = minor.started.last() {
        let stage = minor
            .stages
            .get_mut(current)
            .ok_or(LeagueError::CorruptSeason("started stage index out of range"))?;
        if !stage_is_done(stage)? {
            return Ok(false);
        }
    }
    let next = match minor.next_unstarted_index() {
        Some(index) => index,
        None => return Ok(false),
    };
    if let Some(&previous) = minor.started.last() {
        let finished = minor
            .stages
            .get(previous)
            .ok_or(LeagueError::CorruptSeason("started stage index out of range"))?;
        let carried = carried_competitors(finished)?;
        minor.stages[next].add_competitors(carried)?;
    }

    let stage = &mut minor.stages[next];
    if stage.competitors.is_empty() || stage.group_size == 0 {
        return Err(LeagueError::InvalidState);
    }
    let engine = RoundRobin::new(
        stage.competitors.len(),
        RoundRobinOptions {
            group_size: stage.group_size,
            meet_twice: stage.meet_twice,
        },
    )?;
    stage.group = Some(engine);
    log::debug!(
        "Stage '{}' started with {} competitor(s)",
        stage.name,
        stage.competitors.len()
    );
    minor.started.push(next);
    Ok(true)
}

/// Whether a stage has fully resolved, building its playoff bracket as a
/// side effect the first time the group phase is found complete.
///
/// The bracket draw is the group winners in standings order (top
/// `group_qualify_num` per group, group-major). A stage without playoffs is
/// done when its groups are; an unstarted stage is not done.
pub fn stage_is_done(stage: &mut Stage) -> Result<bool, LeagueError> {
    let group = match &stage.group {
        Some(engine) => engine,
        None => return Ok(false),
    };
    if !group.is_done() {
        return Ok(false);
    }
    if !stage.playoffs {
        return Ok(true);
    }
    if stage.bracket.is_none() {
        build_playoff_bracket(stage)?;
    }
    Ok(stage.bracket.as_ref().is_some_and(|b| b.is_done()))
}

/// Whether every declared stage has been started and the last one has
/// resolved. May build the final stage's bracket as a side effect.
pub fn minor_is_done(minor: &mut Minor) -> Result<bool, LeagueError> {
    if minor.next_unstarted_index().is_some() {
        return Ok(false);
    }
    match minor.started.last().copied() {
        Some(index) => {
            let stage = minor
                .stages
                .get_mut(index)
                .ok_or(LeagueError::CorruptSeason("started stage index out of range"))?;
            stage_is_done(stage)
        }
        None => Ok(true),
    }
}

fn build_playoff_bracket(stage: &mut Stage) -> Result<(), LeagueError> {
    let winners = stage.group_winners();
    if winners.len() < 2 {
        return Err(LeagueError::TooFewQualifiers {
            qualifiers: winners.len(),
        });
    }
    let mut entrants = Vec::with_capacity(winners.len());
    for row in &winners {
        let competitor = stage
            .competitor_by_seed(row.seed)
            .ok_or(LeagueError::CorruptSeason("group winner outside the stage roster"))?;
        entrants.push(competitor.clone());
    }
    let bracket = Elimination::new(entrants.len(), EliminationOptions { short: false })?;
    log::debug!(
        "Stage '{}' playoffs: {} qualifier(s) seeded",
        stage.name,
        entrants.len()
    );
    stage.playoff_competitors = entrants;
    stage.bracket = Some(bracket);
    Ok(())
}

/// Fresh-record copies of a finished stage's qualifiers, group-major.
fn carried_competitors(stage: &Stage) -> Result<Vec<Competitor>, LeagueError> {
    let mut carried = Vec::new();
    for row in stage.group_winners() {
        let competitor = stage
            .competitor_by_seed(row.seed)
            .ok_or(LeagueError::CorruptSeason("group winner outside the stage roster"))?;
        carried.push(competitor.carry_over());
    }
    Ok(carried)
}
