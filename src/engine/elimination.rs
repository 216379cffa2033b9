//! Single-elimination engine: a seeded knockout bracket with byes.
//!
//! The bracket is sized to the next power of two; round one follows standard
//! seeding (1 meets the weakest seed, 2 the next weakest slot, and so on),
//! and missing seeds become byes that advance their opponent at build time.
//! Bracket matches are `section` 1; an optional bronze final between the
//! semifinal losers is `section` 2.

use crate::engine::{
    EngineError, EngineMatch, MatchId, ScoreEvent, Seed, ENGINE_FORMAT_VERSION,
};
use serde::{Deserialize, Serialize};

const BRACKET: u32 = 1;
const BRONZE: u32 = 2;

/// Bracket-shaping options, fixed at creation.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct EliminationOptions {
    /// Skip the bronze final (semifinal losers are simply out).
    pub short: bool,
}

/// Static engine descriptor serialized alongside the score log.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct EliminationMetadata {
    pub version: u32,
    pub competitor_count: usize,
    pub options: EliminationOptions,
}

/// A seeded, scoreable knockout bracket.
#[derive(Clone, Debug, PartialEq)]
pub struct Elimination {
    competitor_count: usize,
    options: EliminationOptions,
    rounds: u32,
    matches: Vec<EngineMatch>,
    events: Vec<ScoreEvent>,
}

impl Elimination {
    /// Build a bracket for at least two competitors.
    pub fn new(competitor_count: usize, options: EliminationOptions) -> Result<Self, EngineError> {
        if competitor_count < 2 {
            return Err(EngineError::InvalidCompetitorCount(competitor_count));
        }
        let bracket_size = competitor_count.next_power_of_two();
        let rounds = bracket_size.trailing_zeros();

        let mut matches = Vec::new();
        let order = seeding_order(bracket_size);
        for number in 1..=(bracket_size / 2) as u32 {
            let a = order[(number as usize - 1) * 2];
            let b = order[(number as usize - 1) * 2 + 1];
            let real = |seed: Seed| if seed <= competitor_count { Some(seed) } else { None };
            matches.push(EngineMatch::new(
                MatchId::new(BRACKET, 1, number),
                [real(a), real(b)],
            ));
        }
        for round in 2..=rounds {
            for number in 1..=(bracket_size >> round) as u32 {
                matches.push(EngineMatch::new(MatchId::new(BRACKET, round, number), [None, None]));
            }
        }
        // A bronze final needs two semifinal losers. With three competitors
        // the semifinal round holds a bye, so only one loser ever exists.
        let has_semifinals = rounds >= 2;
        let both_semis_playable = rounds > 2 || competitor_count == 4;
        if !options.short && has_semifinals && both_semis_playable {
            matches.push(EngineMatch::new(MatchId::new(BRONZE, 1, 1), [None, None]));
        }

        let mut engine = Self {
            competitor_count,
            options,
            rounds,
            matches,
            events: Vec::new(),
        };
        engine.advance_byes();
        Ok(engine)
    }

    pub fn competitor_count(&self) -> usize {
        self.competitor_count
    }

    pub fn options(&self) -> EliminationOptions {
        self.options
    }

    pub fn matches(&self) -> &[EngineMatch] {
        &self.matches
    }

    pub fn find_match(&self, id: MatchId) -> Option<&EngineMatch> {
        self.matches.iter().find(|m| m.id == id)
    }

    /// Apply a score. Elimination results are final: ties, unfilled matches,
    /// and re-scores are all rejected (a winner may already have advanced).
    pub fn score(&mut self, id: MatchId, score: [u32; 2]) -> Result<(), EngineError> {
        let index = self
            .matches
            .iter()
            .position(|m| m.id == id)
            .ok_or(EngineError::UnknownMatch(id))?;
        if score[0] == score[1] {
            return Err(EngineError::TiedScore(id));
        }
        if self.matches[index].score.is_some() {
            return Err(EngineError::AlreadyScored(id));
        }
        let [a, b] = self.matches[index]
            .seeds()
            .ok_or(EngineError::MissingCompetitors(id))?;
        self.matches[index].score = Some(score);
        self.events.push(ScoreEvent { id, score });

        let (winner, loser) = if score[0] > score[1] { (a, b) } else { (b, a) };
        if id.section == BRACKET && id.round < self.rounds {
            let (next, slot) = next_slot(id);
            self.place(next, slot, winner);
            if id.round == self.rounds - 1 {
                // Semifinal loser feeds the bronze final, when one exists.
                let slot = (id.number as usize - 1) % 2;
                self.place(MatchId::new(BRONZE, 1, 1), slot, loser);
            }
        }
        Ok(())
    }

    /// Done once the final is scored (and the bronze final, when one exists).
    /// Bye matches never receive scores and never block completion.
    pub fn is_done(&self) -> bool {
        let scored = |id| self.find_match(id).is_some_and(|m| m.score.is_some());
        let bronze_done = match self.find_match(MatchId::new(BRONZE, 1, 1)) {
            Some(m) => m.score.is_some(),
            None => true,
        };
        scored(MatchId::new(BRACKET, self.rounds, 1)) && bronze_done
    }

    /// The bracket winner's seed, once the final has been played.
    pub fn winner(&self) -> Option<Seed> {
        let last = self.find_match(MatchId::new(BRACKET, self.rounds, 1))?;
        let score = last.score?;
        let [a, b] = last.seeds()?;
        Some(if score[0] > score[1] { a } else { b })
    }

    /// Lowest round with a playable, unscored match; None once the bracket is
    /// decided. The bronze final counts as part of the last round.
    pub fn current_round(&self) -> Option<u32> {
        let playable = |m: &EngineMatch| m.score.is_none() && m.seeds().is_some();
        for round in 1..=self.rounds {
            if self
                .matches
                .iter()
                .any(|m| m.id.section == BRACKET && m.id.round == round && playable(m))
            {
                return Some(round);
            }
        }
        if self.matches.iter().any(|m| m.id.section == BRONZE && playable(m)) {
            return Some(self.rounds);
        }
        None
    }

    /// Human label for a bracket round ("Final", "Semifinals", ...).
    pub fn round_label(&self, round: u32) -> String {
        match self.rounds.saturating_sub(round) {
            0 => "Final".to_string(),
            1 => "Semifinals".to_string(),
            2 => "Quarterfinals".to_string(),
            _ => format!("Round of {}", 1usize << (self.rounds - round + 1)),
        }
    }

    pub fn metadata(&self) -> EliminationMetadata {
        EliminationMetadata {
            version: ENGINE_FORMAT_VERSION,
            competitor_count: self.competitor_count,
            options: self.options,
        }
    }

    /// Rebuild a bracket from its serialized parts, replaying the score log
    /// in receipt order so every advancement is re-derived.
    pub fn restore(
        competitor_count: usize,
        options: EliminationOptions,
        state: Vec<ScoreEvent>,
        metadata: EliminationMetadata,
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

    fn place(&mut self, id: MatchId, slot: usize, seed: Seed) {
        if let Some(m) = self.matches.iter_mut().find(|m| m.id == id) {
            m.competitors[slot] = Some(seed);
        }
    }

    /// Round-one matches with a single real competitor advance that
    /// competitor immediately. Byes cannot meet each other: a bracket is
    /// never more than half empty.
    fn advance_byes(&mut self) {
        if self.rounds < 2 {
            return;
        }
        let walkovers: Vec<(MatchId, Seed)> = self
            .matches
            .iter()
            .filter(|m| m.id.section == BRACKET && m.id.round == 1)
            .filter_map(|m| match m.competitors {
                [Some(seed), None] | [None, Some(seed)] => Some((m.id, seed)),
                _ => None,
            })
            .collect();
        for (id, seed) in walkovers {
            let (next, slot) = next_slot(id);
            self.place(next, slot, seed);
        }
    }
}

/// Where a match's winner goes: the parent match one round up, slot by the
/// match number's parity.
fn next_slot(id: MatchId) -> (MatchId, usize) {
    let next = MatchId::new(BRACKET, id.round + 1, (id.number + 1) / 2);
    (next, (id.number as usize - 1) % 2)
}

/// Standard bracket seeding order: double the list, mirroring each seed with
/// its complement, so seed 1 and seed 2 can only meet in the final.
fn seeding_order(bracket_size: usize) -> Vec<Seed> {
    let mut order = vec![1];
    let mut size = 1;
    while size < bracket_size {
        size *= 2;
        let mut next = Vec::with_capacity(size);
        for &seed in &order {
            next.push(seed);
            next.push(size + 1 - seed);
        }
        order = next;
    }
    order
}
