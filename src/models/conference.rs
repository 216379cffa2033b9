//! Conference (round-robin bucket) and PromotionConference (playoff bracket).

use crate::engine::{Elimination, EliminationOptions, RoundRobin, RoundRobinOptions, Seed};
use crate::models::competitor::CompetitorId;
use crate::models::error::LeagueError;
use uuid::Uuid;

/// Generated identifier for a conference or promotion bracket.
pub type ConferenceId = Uuid;

/// A fixed-size round-robin bucket within a division.
///
/// Holds competitor ids in seed order (the division owns the values). Engine
/// seed `i` is `competitor_ids[i - 1]`: the one place the 1-indexed engine
/// seeds meet the 0-indexed sequence.
#[derive(Clone, Debug, PartialEq)]
pub struct Conference {
    pub id: ConferenceId,
    pub competitor_ids: Vec<CompetitorId>,
    pub engine: RoundRobin,
}

impl Conference {
    /// Build a conference over one roster slice, with a round-robin engine
    /// sized to the slice (a single internal group).
    pub fn new(competitor_ids: Vec<CompetitorId>) -> Result<Self, LeagueError> {
        let engine = RoundRobin::new(
            competitor_ids.len(),
            RoundRobinOptions {
                group_size: competitor_ids.len(),
                meet_twice: false,
            },
        )?;
        Ok(Self {
            id: Uuid::new_v4(),
            competitor_ids,
            engine,
        })
    }

    pub(crate) fn from_parts(
        id: ConferenceId,
        competitor_ids: Vec<CompetitorId>,
        engine: RoundRobin,
    ) -> Self {
        Self { id, competitor_ids, engine }
    }

    /// 1-indexed seed lookup; None when out of range.
    pub fn competitor_by_seed(&self, seed: Seed) -> Option<CompetitorId> {
        seed.checked_sub(1).and_then(|i| self.competitor_ids.get(i)).copied()
    }

    /// This competitor's engine seed, when they play in this conference.
    pub fn seed_of(&self, id: CompetitorId) -> Option<Seed> {
        self.competitor_ids.iter().position(|&c| c == id).map(|i| i + 1)
    }

    pub fn is_done(&self) -> bool {
        self.engine.is_done()
    }

    /// The conference winner, once every match has been played.
    pub fn winner_id(&self) -> Option<CompetitorId> {
        if !self.engine.is_done() {
            return None;
        }
        let top = self.engine.results().into_iter().find(|r| r.gpos == 1)?;
        self.competitor_by_seed(top.seed)
    }
}

/// An elimination bracket deciding one chunk of the playoff-eligible pool.
/// Only the winner matters for a promotion slot, so the bracket is built
/// without a bronze final.
#[derive(Clone, Debug, PartialEq)]
pub struct PromotionConference {
    pub id: ConferenceId,
    pub competitor_ids: Vec<CompetitorId>,
    pub bracket: Elimination,
}

impl PromotionConference {
    pub fn new(competitor_ids: Vec<CompetitorId>) -> Result<Self, LeagueError> {
        let bracket = Elimination::new(competitor_ids.len(), EliminationOptions { short: true })?;
        Ok(Self {
            id: Uuid::new_v4(),
            competitor_ids,
            bracket,
        })
    }

    pub(crate) fn from_parts(
        id: ConferenceId,
        competitor_ids: Vec<CompetitorId>,
        bracket: Elimination,
    ) -> Self {
        Self { id, competitor_ids, bracket }
    }

    /// 1-indexed seed lookup; None when out of range.
    pub fn competitor_by_seed(&self, seed: Seed) -> Option<CompetitorId> {
        seed.checked_sub(1).and_then(|i| self.competitor_ids.get(i)).copied()
    }

    /// This competitor's bracket seed, when they play in this bracket.
    pub fn seed_of(&self, id: CompetitorId) -> Option<Seed> {
        self.competitor_ids.iter().position(|&c| c == id).map(|i| i + 1)
    }

    pub fn is_done(&self) -> bool {
        self.bracket.is_done()
    }

    /// Who takes this bracket's promotion slot, once decided.
    pub fn winner_id(&self) -> Option<CompetitorId> {
        self.bracket.winner().and_then(|seed| self.competitor_by_seed(seed))
    }
}
