//! Round-robin engine: partitions a draw into groups and schedules everyone
//! against everyone within each group.
//!
//! Groups are dealt serpentine-style so seeds spread evenly; fixtures come
//! from the circle method (one competitor fixed, the rest rotating). The
//! caller addresses matches by [`MatchId`] where `section` is the group
//! number.

use crate::engine::{
    EngineError, EngineMatch, MatchId, ScoreEvent, Seed, ENGINE_FORMAT_VERSION,
};
use serde::{Deserialize, Serialize};

/// Draw-shaping options, fixed at creation.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RoundRobinOptions {
    /// Maximum members per group.
    pub group_size: usize,
    /// Play every pairing twice (home/away flipped).
    pub meet_twice: bool,
}

/// One competitor's record within its group.
///
/// `grp` and `gpos` are 1-indexed; ranking within a group is points
/// descending, then wins descending, then seed ascending.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GroupResult {
    pub seed: Seed,
    pub grp: usize,
    pub gpos: usize,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
    pub pts: u32,
}

/// Static engine descriptor serialized alongside the score log.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct RoundRobinMetadata {
    pub version: u32,
    pub competitor_count: usize,
    pub options: RoundRobinOptions,
}

/// A scheduled, scoreable round-robin draw.
#[derive(Clone, Debug, PartialEq)]
pub struct RoundRobin {
    competitor_count: usize,
    options: RoundRobinOptions,
    groups: Vec<Vec<Seed>>,
    matches: Vec<EngineMatch>,
    events: Vec<ScoreEvent>,
}

impl RoundRobin {
    /// Schedule a draw of `competitor_count` seeds. A draw of one is legal
    /// (no matches, instantly done); a draw of zero is not.
    pub fn new(competitor_count: usize, options: RoundRobinOptions) -> Result<Self, EngineError> {
        if competitor_count == 0 {
            return Err(EngineError::InvalidCompetitorCount(0));
        }
        if options.group_size == 0 {
            return Err(EngineError::InvalidGroupSize);
        }
        let groups = deal_groups(competitor_count, options.group_size);
        let mut matches = Vec::new();
        for (index, members) in groups.iter().enumerate() {
            schedule_group(index as u32 + 1, members, options.meet_twice, &mut matches);
        }
        Ok(Self {
            competitor_count,
            options,
            groups,
            matches,
            events: Vec::new(),
        })
    }

    pub fn competitor_count(&self) -> usize {
        self.competitor_count
    }

    pub fn options(&self) -> RoundRobinOptions {
        self.options
    }

    /// Seed partition, group-major. Mostly useful to size qualifier pools.
    pub fn groups(&self) -> &[Vec<Seed>] {
        &self.groups
    }

    pub fn matches(&self) -> &[EngineMatch] {
        &self.matches
    }

    pub fn find_match(&self, id: MatchId) -> Option<&EngineMatch> {
        self.matches.iter().find(|m| m.id == id)
    }

    /// Apply a score. Re-scoring a match overwrites the previous result;
    /// rejecting duplicates is the reporting boundary's responsibility.
    pub fn score(&mut self, id: MatchId, score: [u32; 2]) -> Result<(), EngineError> {
        let m = self
            .matches
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(EngineError::UnknownMatch(id))?;
        m.score = Some(score);
        self.events.push(ScoreEvent { id, score });
        Ok(())
    }

    pub fn is_done(&self) -> bool {
        self.matches.iter().all(|m| m.score.is_some())
    }

    /// Current standings, ordered by (group, in-group position). Valid at any
    /// point of the phase; unplayed matches simply contribute nothing.
    pub fn results(&self) -> Vec<GroupResult> {
        let mut out = Vec::with_capacity(self.competitor_count);
        for (index, members) in self.groups.iter().enumerate() {
            let grp = index + 1;
            let section = grp as u32;
            let mut table: Vec<GroupResult> = members
                .iter()
                .map(|&seed| self.tally(section, seed, grp))
                .collect();
            table.sort_by(|a, b| {
                b.pts
                    .cmp(&a.pts)
                    .then(b.wins.cmp(&a.wins))
                    .then(a.seed.cmp(&b.seed))
            });
            for (pos, entry) in table.iter_mut().enumerate() {
                entry.gpos = pos + 1;
            }
            out.extend(table);
        }
        out
    }

    /// One competitor's record, or None for a seed outside the draw.
    pub fn results_for(&self, seed: Seed) -> Option<GroupResult> {
        self.results().into_iter().find(|r| r.seed == seed)
    }

    pub fn metadata(&self) -> RoundRobinMetadata {
        RoundRobinMetadata {
            version: ENGINE_FORMAT_VERSION,
            competitor_count: self.competitor_count,
            options: self.options,
        }
    }

    /// Rebuild an engine from its serialized parts, replaying the score log
    /// in receipt order. Every field is checked; a log referencing unknown
    /// matches or metadata disagreeing with the arguments fails loudly.
    pub fn restore(
        competitor_count: usize,
        options: RoundRobinOptions,
        state: Vec<ScoreEvent>,
        metadata: RoundRobinMetadata,
    ) -> Result<Self, EngineError> {
        if metadata.version != ENGINE_FORMAT_VERSION {
            return Err(EngineError::RestoreMismatch { field: "version" });
        }
        if metadata.competitor_count != competitor_count {
            return Err(EngineError::RestoreMismatch { field: "competitor_count" });
        }
        if metadata.options != options {
            return Err(EngineError::RestoreMismatch { field: "options" });
        }
        let mut engine = Self::new(competitor_count, options)?;
        for event in state {
            engine.score(event.id, event.score)?;
        }
        Ok(engine)
    }

    /// Ordered score log (the engine's serialized `state`).
    pub fn state(&self) -> &[ScoreEvent] {
        &self.events
    }

    fn tally(&self, section: u32, seed: Seed, grp: usize) -> GroupResult {
        let mut record = GroupResult {
            seed,
            grp,
            gpos: 0,
            wins: 0,
            losses: 0,
            draws: 0,
            pts: 0,
        };
        for m in self.matches.iter().filter(|m| m.id.section == section) {
            let (score, seeds) = match (m.score, m.seeds()) {
                (Some(score), Some(seeds)) => (score, seeds),
                _ => continue,
            };
            let slot = match seeds.iter().position(|&s| s == seed) {
                Some(slot) => slot,
                None => continue,
            };
            let (own, other) = (score[slot], score[1 - slot]);
            if own > other {
                record.wins += 1;
            } else if own < other {
                record.losses += 1;
            } else {
                record.draws += 1;
            }
        }
        record.pts = record.wins * 3 + record.draws;
        record
    }
}

/// Serpentine deal: seeds run down the groups and back, so every group gets
/// an even spread of high and low seeds.
fn deal_groups(competitor_count: usize, group_size: usize) -> Vec<Vec<Seed>> {
    let group_count = competitor_count.div_ceil(group_size);
    let mut groups: Vec<Vec<Seed>> = vec![Vec::new(); group_count];
    for seed in 1..=competitor_count {
        let index = seed - 1;
        let row = index / group_count;
        let col = index % group_count;
        let g = if row % 2 == 0 { col } else { group_count - 1 - col };
        groups[g].push(seed);
    }
    for members in &mut groups {
        members.sort_unstable();
    }
    groups
}

/// Circle-method fixtures for one group: member one stays fixed, the rest
/// rotate one place per round. Odd groups get a phantom bye slot whose
/// pairings are skipped.
fn schedule_group(section: u32, members: &[Seed], meet_twice: bool, out: &mut Vec<EngineMatch>) {
    let mut ring: Vec<Option<Seed>> = members.iter().copied().map(Some).collect();
    if ring.len() % 2 == 1 {
        ring.push(None);
    }
    let slots = ring.len();
    if slots < 2 {
        return;
    }
    let rounds = slots - 1;
    let cycles = if meet_twice { 2 } else { 1 };
    for cycle in 0..cycles {
        let mut ring = ring.clone();
        for round in 0..rounds {
            let mut number = 1;
            for pair in 0..slots / 2 {
                let (home, away) = (ring[pair], ring[slots - 1 - pair]);
                let (home, away) = match (home, away) {
                    (Some(h), Some(a)) => (h, a),
                    _ => continue,
                };
                // Second cycle flips home/away.
                let competitors = if cycle == 0 {
                    [Some(home), Some(away)]
                } else {
                    [Some(away), Some(home)]
                };
                let id = MatchId::new(section, (cycle * rounds + round + 1) as u32, number);
                out.push(EngineMatch::new(id, competitors));
                number += 1;
            }
            // Rotate everything but the first slot.
            let last = ring.pop();
            if let Some(last) = last {
                ring.insert(1, last);
            }
        }
    }
}
