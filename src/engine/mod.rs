//! Scheduling engines consumed by the season core: round-robin groups and
//! single-elimination brackets. Both speak 1-indexed seeds and structural
//! match ids only; mapping seeds to competitors is the caller's job.

mod elimination;
mod round_robin;

pub use elimination::{Elimination, EliminationMetadata, EliminationOptions};
pub use round_robin::{GroupResult, RoundRobin, RoundRobinMetadata, RoundRobinOptions};

use serde::{Deserialize, Serialize};

/// 1-indexed competitor position within an engine's draw.
pub type Seed = usize;

/// Version tag carried in engine metadata so stale saves fail restore loudly.
pub const ENGINE_FORMAT_VERSION: u32 = 1;

/// Structural match identifier: section (group number, or bracket 1 / bronze 2),
/// round within the section, match number within the round. All 1-indexed.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct MatchId {
    pub section: u32,
    pub round: u32,
    pub number: u32,
}

impl MatchId {
    pub fn new(section: u32, round: u32, number: u32) -> Self {
        Self { section, round, number }
    }
}

impl std::fmt::Display for MatchId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "S{} R{} M{}", self.section, self.round, self.number)
    }
}

/// A single scheduled match. Elimination slots stay `None` until fed by an
/// earlier round (or forever, for a round-one bye); round-robin slots are
/// always filled.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct EngineMatch {
    pub id: MatchId,
    pub competitors: [Option<Seed>; 2],
    /// None if not yet played.
    pub score: Option<[u32; 2]>,
}

impl EngineMatch {
    fn new(id: MatchId, competitors: [Option<Seed>; 2]) -> Self {
        Self { id, competitors, score: None }
    }

    /// Both seeds, when the match is ready to be played.
    pub fn seeds(&self) -> Option<[Seed; 2]> {
        match self.competitors {
            [Some(a), Some(b)] => Some([a, b]),
            _ => None,
        }
    }
}

/// One applied score, in receipt order. The ordered log is the serialized
/// `state` of an engine; restore replays it onto a fresh instance.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ScoreEvent {
    pub id: MatchId,
    pub score: [u32; 2],
}

/// Errors from the scheduling engines.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum EngineError {
    /// Draw size the engine cannot schedule (empty, or below two for a bracket).
    InvalidCompetitorCount(usize),
    /// Group size of zero cannot partition a draw.
    InvalidGroupSize,
    /// No match with this id exists in the draw.
    UnknownMatch(MatchId),
    /// Elimination match whose slots are not yet both filled (bye or pending feed).
    MissingCompetitors(MatchId),
    /// Elimination match scored twice; the winner may already have advanced.
    AlreadyScored(MatchId),
    /// Elimination scores must produce a winner.
    TiedScore(MatchId),
    /// Serialized engine state disagrees with the restore arguments.
    RestoreMismatch { field: &'static str },
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::InvalidCompetitorCount(n) => {
                write!(f, "Cannot schedule a draw of {} competitor(s)", n)
            }
            EngineError::InvalidGroupSize => write!(f, "Group size must be at least 1"),
            EngineError::UnknownMatch(id) => write!(f, "No match {} in this draw", id),
            EngineError::MissingCompetitors(id) => {
                write!(f, "Match {} does not have both competitors yet", id)
            }
            EngineError::AlreadyScored(id) => write!(f, "Match {} already has a score", id),
            EngineError::TiedScore(id) => write!(f, "Match {} cannot end in a tie", id),
            EngineError::RestoreMismatch { field } => {
                write!(f, "Saved engine state does not match its metadata: {}", field)
            }
        }
    }
}

impl std::error::Error for EngineError {}
