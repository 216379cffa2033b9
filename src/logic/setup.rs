//! Season setup: partition division rosters into conferences and schedule
//! their round robins.

use crate::models::{Conference, Division, League, LeagueError};

/// Start a division's season: chunk the roster (arrival order) into
/// conferences of `conference_size` and schedule each one. The last
/// conference takes the remainder and may run short.
///
/// Fails before touching anything when the promotion arithmetic cannot work:
/// a division whose conference count already exceeds its promotion quota
/// would owe more automatic promotions than it has seats for.
pub fn start_division(division: &mut Division) -> Result<(), LeagueError> {
    if division.is_started() {
        return Err(LeagueError::InvalidState);
    }
    if division.competitors.is_empty() || division.conference_size == 0 {
        return Err(LeagueError::InvalidState);
    }

    let conference_count = division.competitors.len().div_ceil(division.conference_size);
    let quota = division.promotion_quota();
    if quota < conference_count {
        return Err(LeagueError::NegativePromotionSlots {
            quota,
            automatic: conference_count,
        });
    }

    let mut conferences = Vec::with_capacity(conference_count);
    for chunk in division.competitors.chunks(division.conference_size) {
        let ids = chunk.iter().map(|c| c.id).collect();
        conferences.push(Conference::new(ids)?);
    }
    log::debug!(
        "Division '{}' started with {} conference(s)",
        division.name,
        conferences.len()
    );
    division.set_conferences(conferences)
}

/// Start every division of a league, lowest tier first. A failure aborts at
/// the offending division; divisions already started stay started.
pub fn start_league(league: &mut League) -> Result<(), LeagueError> {
    for division in &mut league.divisions {
        start_division(division)?;
    }
    log::info!(
        "League '{}' started with {} division(s)",
        league.name,
        league.divisions.len()
    );
    Ok(())
}
