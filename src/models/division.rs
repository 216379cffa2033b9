//! Division: one skill tier's roster for one season, partitioned into
//! round-robin conferences, with promotion math on top.

use crate::engine::GroupResult;
use crate::models::competitor::{Competitor, CompetitorId};
use crate::models::conference::{Conference, PromotionConference};
use crate::models::error::LeagueError;

/// One tier of a league pyramid for a single season.
///
/// The flat `competitors` vector (arrival order) owns the Competitor values;
/// conferences and promotion brackets reference them by id in seed order.
/// `conferences` is set exactly once per season; roster mutation is
/// forbidden afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct Division {
    pub name: String,
    /// Target roster count for this tier.
    pub size: usize,
    pub conference_size: usize,
    /// Fraction of `size` eligible for promotion (automatic + playoff).
    pub promotion_percent: f64,
    /// Seats lost to the tier below at season end; sized from the lower
    /// neighbor's promotion quota during the league post-season pass.
    pub relegation_slots: usize,
    pub competitors: Vec<Competitor>,
    pub conferences: Vec<Conference>,
    pub promotion_conferences: Vec<PromotionConference>,
    /// Conference winners, in conference order; filled by the post-season.
    pub automatic_promotions: Vec<CompetitorId>,
    /// Promotion-bracket winners, finalized when the league post-season ends.
    pub playoff_promotions: Vec<CompetitorId>,
}

impl Division {
    /// Default share of a division promoted each season.
    pub const DEFAULT_PROMOTION_PERCENT: f64 = 0.15;
    /// Conference finishing positions (1-indexed, inclusive) that promote or
    /// enter the promotion playoffs: position 1 promotes directly, positions
    /// 2 through this bound join the playoff pool.
    pub const PLAYOFF_TOP_N: usize = 4;

    pub fn new(name: impl Into<String>, size: usize, conference_size: usize) -> Self {
        Self {
            name: name.into(),
            size,
            conference_size,
            promotion_percent: Self::DEFAULT_PROMOTION_PERCENT,
            relegation_slots: 0,
            competitors: Vec::new(),
            conferences: Vec::new(),
            promotion_conferences: Vec::new(),
            automatic_promotions: Vec::new(),
            playoff_promotions: Vec::new(),
        }
    }

    /// Same division with a non-default promotion share.
    pub fn with_promotion_percent(mut self, promotion_percent: f64) -> Self {
        self.promotion_percent = promotion_percent;
        self
    }

    /// Append one competitor. Only legal before the roster is partitioned.
    pub fn add_competitor(&mut self, competitor: Competitor) -> Result<(), LeagueError> {
        if self.is_started() {
            return Err(LeagueError::InvalidState);
        }
        self.competitors.push(competitor);
        Ok(())
    }

    /// Append several competitors. Only legal before the roster is partitioned.
    pub fn add_competitors(
        &mut self,
        competitors: impl IntoIterator<Item = Competitor>,
    ) -> Result<(), LeagueError> {
        if self.is_started() {
            return Err(LeagueError::InvalidState);
        }
        self.competitors.extend(competitors);
        Ok(())
    }

    /// Single-shot conference assignment; the partition cannot be replaced
    /// mid-season.
    pub fn set_conferences(&mut self, conferences: Vec<Conference>) -> Result<(), LeagueError> {
        if self.is_started() {
            return Err(LeagueError::InvalidState);
        }
        self.conferences = conferences;
        Ok(())
    }

    /// Whether the roster has been partitioned into conferences.
    pub fn is_started(&self) -> bool {
        !self.conferences.is_empty()
    }

    /// Group stage finished: every conference's engine reports done. A
    /// division that never started is not done.
    pub fn is_done(&self) -> bool {
        self.is_started() && self.conferences.iter().all(|c| c.is_done())
    }

    /// Whether the post-season pass has run (it always yields at least one
    /// conference winner).
    pub fn post_season_started(&self) -> bool {
        !self.automatic_promotions.is_empty()
    }

    /// Post-season finished: the pass ran and every promotion bracket is
    /// decided.
    pub fn is_post_season_done(&self) -> bool {
        self.post_season_started() && self.promotion_conferences.iter().all(|p| p.is_done())
    }

    /// Total promotion seats for this tier: `floor(size × promotion_percent)`.
    pub fn promotion_quota(&self) -> usize {
        (self.size as f64 * self.promotion_percent).floor() as usize
    }

    /// 1-indexed lookup into the flat roster; None when out of range.
    pub fn competitor_by_seed(&self, seed: usize) -> Option<&Competitor> {
        seed.checked_sub(1).and_then(|i| self.competitors.get(i))
    }

    pub fn competitor(&self, id: CompetitorId) -> Option<&Competitor> {
        self.competitors.iter().find(|c| c.id == id)
    }

    /// Mutable roster lookup by id (the reporting boundary updates counters
    /// through this).
    pub fn competitor_mut(&mut self, id: CompetitorId) -> Option<&mut Competitor> {
        self.competitors.iter_mut().find(|c| c.id == id)
    }

    /// Ad-hoc standings lookup by competitor name: linear scan across
    /// conferences, then that conference engine's record. None when no
    /// conference contains the name. O(conferences × conference_size).
    pub fn competitor_results(&self, name: &str) -> Option<GroupResult> {
        for conference in &self.conferences {
            for (index, id) in conference.competitor_ids.iter().enumerate() {
                let matches_name = self
                    .competitor(*id)
                    .is_some_and(|c| c.name == name);
                if matches_name {
                    return conference.engine.results_for(index + 1);
                }
            }
        }
        None
    }

    /// Promotion-bracket winners resolved to competitor ids; empty while any
    /// bracket is still running.
    pub fn playoff_winners(&self) -> Vec<CompetitorId> {
        self.promotion_conferences
            .iter()
            .filter_map(|p| p.winner_id())
            .collect()
    }

    /// Everyone leaving this tier upwards: conference winners plus playoff
    /// bracket winners.
    pub fn promoted_ids(&self) -> Vec<CompetitorId> {
        let mut ids = self.automatic_promotions.clone();
        ids.extend(self.playoff_winners());
        ids
    }

    /// The `count` worst finishers across the whole division, worst first:
    /// in-conference position descending, then points, then wins, then the
    /// latest roster arrival. Deterministic for any roster. Competitors who
    /// earned promotion are never candidates, whatever their record.
    pub fn relegation_candidates(&self, count: usize) -> Vec<CompetitorId> {
        let promoted = self.promoted_ids();
        let mut table: Vec<(CompetitorId, GroupResult, usize)> = Vec::new();
        for conference in &self.conferences {
            for (index, id) in conference.competitor_ids.iter().enumerate() {
                if promoted.contains(id) {
                    continue;
                }
                if let Some(record) = conference.engine.results_for(index + 1) {
                    let arrival = self
                        .competitors
                        .iter()
                        .position(|c| c.id == *id)
                        .unwrap_or(usize::MAX);
                    table.push((*id, record, arrival));
                }
            }
        }
        table.sort_by(|(_, a, ai), (_, b, bi)| {
            b.gpos
                .cmp(&a.gpos)
                .then(a.pts.cmp(&b.pts))
                .then(a.wins.cmp(&b.wins))
                .then(bi.cmp(ai))
        });
        table.into_iter().take(count).map(|(id, _, _)| id).collect()
    }
}
