//! Division post-season: collect conference winners, form the promotion
//! playoff brackets, and size relegation.

use crate::models::{CompetitorId, Division, League, LeagueError, PromotionConference};

/// Start one division's post-season once its group stage has finished.
///
/// Returns `Ok(false)` while conferences are still playing. On success the
/// conference winners are recorded as automatic promotions and the rest of
/// the promotion quota is put up for playoffs: positions 2 through
/// [`Division::PLAYOFF_TOP_N`] of every conference pool together
/// (conference-major, best position first) and split evenly across the
/// remaining slots, one bracket per slot.
pub fn start_division_post_season(division: &mut Division) -> Result<bool, LeagueError> {
    if division.post_season_started() {
        return Err(LeagueError::InvalidState);
    }
    if !division.is_done() {
        return Ok(false);
    }

    let mut automatic = Vec::with_capacity(division.conferences.len());
    for conference in &division.conferences {
        let winner = conference
            .winner_id()
            .ok_or(LeagueError::CorruptSeason("finished conference has no winner"))?;
        automatic.push(winner);
    }

    let quota = division.promotion_quota();
    let slots = quota
        .checked_sub(automatic.len())
        .ok_or(LeagueError::NegativePromotionSlots {
            quota,
            automatic: automatic.len(),
        })?;

    let mut brackets = Vec::new();
    if slots > 0 {
        let pool = playoff_pool(division)?;
        if pool.is_empty() || pool.len() % slots != 0 {
            return Err(LeagueError::UnevenPlayoffSplit {
                pool: pool.len(),
                slots,
            });
        }
        let per_bracket = pool.len() / slots;
        for chunk in pool.chunks(per_bracket) {
            brackets.push(PromotionConference::new(chunk.to_vec())?);
        }
    }

    log::debug!(
        "Division '{}' post-season: {} automatic promotion(s), {} playoff bracket(s)",
        division.name,
        automatic.len(),
        brackets.len()
    );
    division.automatic_promotions = automatic;
    division.promotion_conferences = brackets;
    Ok(true)
}

/// Start the post-season across a whole league, lowest tier first.
///
/// Stops with `Ok(false)` at the first division whose group stage is still
/// playing; divisions walked before it keep their brackets, and a later call
/// skips them and resumes from the stop point. Each non-bottom division's
/// relegation is sized to its lower neighbor's promotion quota when the walk
/// reaches it; seats lost downward match seats gained from below. Calling
/// again once every division has started is an error.
pub fn start_league_post_season(league: &mut League) -> Result<bool, LeagueError> {
    if league.divisions.is_empty() {
        return Ok(false);
    }
    if league.divisions.iter().all(|d| d.post_season_started()) {
        return Err(LeagueError::InvalidState);
    }

    for i in 0..league.divisions.len() {
        if league.divisions[i].post_season_started() {
            continue;
        }
        if i > 0 {
            league.divisions[i].relegation_slots = league.divisions[i - 1].promotion_quota();
        }
        if !start_division_post_season(&mut league.divisions[i])? {
            return Ok(false);
        }
    }
    log::info!("League '{}' entered its post-season", league.name);
    Ok(true)
}

/// Record every playoff bracket's winner once all brackets have resolved.
///
/// Returns `Ok(false)` while any bracket is still playing. Idempotent once
/// done; the recorded winners feed the season rollover.
pub fn end_league_post_season(league: &mut League) -> Result<bool, LeagueError> {
    if !league.is_done() {
        return Ok(false);
    }
    for division in &mut league.divisions {
        division.playoff_promotions = division.playoff_winners();
    }
    Ok(true)
}

/// Positions 2 through [`Division::PLAYOFF_TOP_N`] of every conference,
/// conference-major, best position first.
fn playoff_pool(division: &Division) -> Result<Vec<CompetitorId>, LeagueError> {
    let mut pool = Vec::new();
    for conference in &division.conferences {
        for row in conference.engine.results() {
            if row.gpos < 2 || row.gpos > Division::PLAYOFF_TOP_N {
                continue;
            }
            let id = conference
                .competitor_by_seed(row.seed)
                .ok_or(LeagueError::CorruptSeason("standings seed outside the conference"))?;
            pool.push(id);
        }
    }
    Ok(pool)
}
