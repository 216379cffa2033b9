//! Stages and minors: standalone circuit events outside the league pyramid.
//!
//! A stage runs a group phase and, optionally, a playoff bracket seeded by
//! the group winners. A minor chains stages and carries each stage's
//! qualifiers into the next one.

use crate::engine::{Elimination, GroupResult, RoundRobin};
use crate::models::competitor::{Competitor, CompetitorId};
use crate::models::error::LeagueError;

/// One circuit event. Fields are open for inspection; the roster locks once
/// the group phase starts.
///
/// Group-phase seed `s` is `competitors[s - 1]`; bracket seed `s` is
/// `playoff_competitors[s - 1]` once the bracket exists.
#[derive(Clone, Debug, PartialEq)]
pub struct Stage {
    pub name: String,
    /// Intended draw capacity. Informational: the engines size themselves to
    /// the roster actually entered.
    pub size: usize,
    pub group_size: usize,
    /// How many qualify per group, for the bracket and for carry-over.
    pub group_qualify_num: usize,
    pub meet_twice: bool,
    /// Whether a playoff bracket follows the group phase.
    pub playoffs: bool,
    pub competitors: Vec<Competitor>,
    /// Bracket entrants in bracket-seed order, filled when the bracket is
    /// built.
    pub playoff_competitors: Vec<Competitor>,
    pub group: Option<RoundRobin>,
    pub bracket: Option<Elimination>,
}

impl Stage {
    pub const DEFAULT_GROUP_QUALIFY_NUM: usize = 2;

    pub fn new(name: impl Into<String>, size: usize, group_size: usize, playoffs: bool) -> Self {
        Self {
            name: name.into(),
            size,
            group_size,
            group_qualify_num: Self::DEFAULT_GROUP_QUALIFY_NUM,
            meet_twice: false,
            playoffs,
            competitors: Vec::new(),
            playoff_competitors: Vec::new(),
            group: None,
            bracket: None,
        }
    }

    pub fn is_started(&self) -> bool {
        self.group.is_some()
    }

    /// Enter one competitor. Fails once the group phase has started.
    pub fn add_competitor(&mut self, competitor: Competitor) -> Result<(), LeagueError> {
        if self.is_started() {
            return Err(LeagueError::InvalidState);
        }
        self.competitors.push(competitor);
        Ok(())
    }

    pub fn add_competitors(&mut self, competitors: Vec<Competitor>) -> Result<(), LeagueError> {
        if self.is_started() {
            return Err(LeagueError::InvalidState);
        }
        self.competitors.extend(competitors);
        Ok(())
    }

    /// Group-phase seed lookup, 1-indexed.
    pub fn competitor_by_seed(&self, seed: usize) -> Option<&Competitor> {
        seed.checked_sub(1).and_then(|i| self.competitors.get(i))
    }

    pub fn seed_of(&self, id: CompetitorId) -> Option<usize> {
        self.competitors.iter().position(|c| c.id == id).map(|i| i + 1)
    }

    /// Bracket seed lookup, 1-indexed. Empty until the bracket is built.
    pub fn playoff_competitor_by_seed(&self, seed: usize) -> Option<&Competitor> {
        seed.checked_sub(1)
            .and_then(|i| self.playoff_competitors.get(i))
    }

    pub fn playoff_seed_of(&self, id: CompetitorId) -> Option<usize> {
        self.playoff_competitors
            .iter()
            .position(|c| c.id == id)
            .map(|i| i + 1)
    }

    /// Current group standings bucketed per group, each bucket ordered by
    /// in-group position. Empty before the group phase starts.
    pub fn group_results(&self) -> Vec<Vec<GroupResult>> {
        let engine = match &self.group {
            Some(engine) => engine,
            None => return Vec::new(),
        };
        let mut buckets: Vec<Vec<GroupResult>> = vec![Vec::new(); engine.groups().len()];
        for row in engine.results() {
            if let Some(bucket) = buckets.get_mut(row.grp - 1) {
                bucket.push(row);
            }
        }
        buckets
    }

    /// The top `group_qualify_num` rows of every group, group-major. This is
    /// both the bracket draw order and the carry-over set for the next stage
    /// of a minor.
    pub fn group_winners(&self) -> Vec<GroupResult> {
        self.group_results()
            .into_iter()
            .flat_map(|bucket| bucket.into_iter().take(self.group_qualify_num))
            .collect()
    }

    /// Bracket champion, once the bracket has fully resolved.
    pub fn playoff_winner(&self) -> Option<&Competitor> {
        let bracket = self.bracket.as_ref()?;
        let seed = bracket.winner()?;
        self.playoff_competitor_by_seed(seed)
    }
}

/// A multi-stage circuit. Stages are declared up front and started one at a
/// time; finishing a stage feeds its qualifiers into the next.
#[derive(Clone, Debug, PartialEq)]
pub struct Minor {
    pub name: String,
    pub stages: Vec<Stage>,
    /// Stage indexes in start order; the last entry is the stage currently
    /// in play.
    pub started: Vec<usize>,
}

impl Minor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            stages: Vec::new(),
            started: Vec::new(),
        }
    }

    /// Declare the next stage of the circuit. Stages run in declaration
    /// order.
    pub fn add_stage(
        &mut self,
        name: impl Into<String>,
        size: usize,
        group_size: usize,
        playoffs: bool,
    ) -> &mut Stage {
        let idx = self.stages.len();
        self.stages.push(Stage::new(name, size, group_size, playoffs));
        &mut self.stages[idx]
    }

    /// The stage most recently started, if any.
    pub fn current_stage(&self) -> Option<&Stage> {
        self.started.last().and_then(|&i| self.stages.get(i))
    }

    pub fn current_stage_mut(&mut self) -> Option<&mut Stage> {
        match self.started.last() {
            Some(&i) => self.stages.get_mut(i),
            None => None,
        }
    }

    /// Index of the first stage that has not been started yet.
    pub fn next_unstarted_index(&self) -> Option<usize> {
        self.stages.iter().position(|s| !s.is_started())
    }
}
