//! Season rollover: move promoted and relegated competitors between
//! neighboring tiers and rebuild every division for the next season.

use crate::models::{Competitor, CompetitorId, Division, League, LeagueError};

/// End a finished season and roll the league over.
///
/// Returns `Ok(false)` while any group stage or promotion bracket is still
/// playing. On success every adjacent pair of tiers exchanges competitors,
/// all computed from the season's final state:
///
/// 1. The lower tier's promoted set (conference winners plus playoff
///    winners) moves up one tier.
/// 2. The upper tier sends down its globally worst finishers, exactly as
///    many as arrived from below.
///
/// Each next-season roster lists relegated arrivals first, then promoted
/// arrivals, then survivors in their old order, everyone with fresh
/// win/loss/draw records. The topmost tier's promoted set stays put as the
/// season's champions. The rebuilt divisions land in
/// `post_season_divisions` and become the league's live divisions.
pub fn end_league(league: &mut League) -> Result<bool, LeagueError> {
    if !league.is_done() {
        return Ok(false);
    }
    for division in &mut league.divisions {
        division.playoff_promotions = division.playoff_winners();
    }

    let season = league.divisions.clone();
    let mut relegated_in: Vec<Vec<Competitor>> = vec![Vec::new(); season.len()];
    let mut promoted_in: Vec<Vec<Competitor>> = vec![Vec::new(); season.len()];
    let mut leaving: Vec<Vec<CompetitorId>> = vec![Vec::new(); season.len()];

    for lower in 0..season.len().saturating_sub(1) {
        let upper = lower + 1;

        let promoted = season[lower].promoted_ids();
        if promoted.len() != season[lower].promotion_quota() {
            return Err(LeagueError::CorruptSeason(
                "promotion quota not fully decided",
            ));
        }
        for id in promoted {
            let mut moved = competitor_from(&season[lower], id)?.carry_over();
            moved.tier += 1;
            leaving[lower].push(id);
            promoted_in[upper].push(moved);
        }

        let seats = season[upper].relegation_slots;
        let down = season[upper].relegation_candidates(seats);
        if down.len() < seats {
            return Err(LeagueError::CorruptSeason(
                "fewer finishers than relegation seats",
            ));
        }
        for id in down {
            let mut moved = competitor_from(&season[upper], id)?.carry_over();
            moved.tier = moved.tier.saturating_sub(1);
            leaving[upper].push(id);
            relegated_in[lower].push(moved);
        }
    }

    let mut next = Vec::with_capacity(season.len());
    for (i, old) in season.iter().enumerate() {
        let mut division = Division::new(old.name.clone(), old.size, old.conference_size)
            .with_promotion_percent(old.promotion_percent);
        let mut roster: Vec<Competitor> = Vec::with_capacity(old.competitors.len());
        roster.append(&mut relegated_in[i]);
        roster.append(&mut promoted_in[i]);
        for competitor in &old.competitors {
            if leaving[i].contains(&competitor.id) {
                continue;
            }
            roster.push(competitor.carry_over());
        }
        division.add_competitors(roster)?;
        next.push(division);
    }

    league.post_season_divisions = next;
    league.divisions = league.post_season_divisions.clone();
    log::info!("League '{}' rolled over into a new season", league.name);
    Ok(true)
}

fn competitor_from(division: &Division, id: CompetitorId) -> Result<&Competitor, LeagueError> {
    division
        .competitor(id)
        .ok_or(LeagueError::CorruptSeason("mover missing from its roster"))
}
