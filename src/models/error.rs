//! Errors for season orchestration and the match-report boundary.

use crate::engine::{EngineError, MatchId};
use crate::models::competitor::CompetitorId;

/// Errors that can occur while driving a league season or cup circuit.
///
/// Timing questions ("is this ready?") are answered with booleans, not
/// errors; everything here indicates misuse, a broken competition
/// definition, or a rejected match report.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum LeagueError {
    /// Operation not legal in the current phase (e.g. roster mutation after
    /// the conferences are set, or starting a season twice).
    InvalidState,
    /// Conference or promotion-bracket index out of range.
    UnknownConference(usize),
    /// No match with this id in the addressed draw.
    UnknownMatch(MatchId),
    /// The match already has a reported result.
    AlreadyReported(MatchId),
    /// Report references a competitor this draw does not contain.
    UnknownCompetitor(CompetitorId),
    /// Competitor exists but is not one of the match's two participants.
    CompetitorNotInMatch(CompetitorId),
    /// Report must carry exactly one entry per match participant.
    MalformedReport { expected: usize, got: usize },
    /// Promotion math came out negative: more conference winners than the
    /// promotion quota allows.
    NegativePromotionSlots { quota: usize, automatic: usize },
    /// Playoff pool does not divide evenly into the configured bracket count.
    UnevenPlayoffSplit { pool: usize, slots: usize },
    /// A playoff stage needs at least two group-phase qualifiers.
    TooFewQualifiers { qualifiers: usize },
    /// Saved season state failed a consistency check.
    RestoreMismatch { field: &'static str },
    /// Live season state is internally inconsistent; automatic advancement
    /// must halt rather than guess.
    CorruptSeason(&'static str),
    /// Error surfaced by an embedded scheduling engine.
    Engine(EngineError),
}

impl std::fmt::Display for LeagueError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LeagueError::InvalidState => write!(f, "Invalid state for this action"),
            LeagueError::UnknownConference(index) => {
                write!(f, "No conference or bracket at index {}", index)
            }
            LeagueError::UnknownMatch(id) => write!(f, "No match {} in this draw", id),
            LeagueError::AlreadyReported(id) => {
                write!(f, "Match {} was already reported", id)
            }
            LeagueError::UnknownCompetitor(id) => {
                write!(f, "Competitor {} is not part of this draw", id)
            }
            LeagueError::CompetitorNotInMatch(id) => {
                write!(f, "Competitor {} is not in this match", id)
            }
            LeagueError::MalformedReport { expected, got } => {
                write!(f, "Report must carry {} entries (got {})", expected, got)
            }
            LeagueError::NegativePromotionSlots { quota, automatic } => write!(
                f,
                "Promotion quota {} cannot cover {} conference winners",
                quota, automatic
            ),
            LeagueError::UnevenPlayoffSplit { pool, slots } => write!(
                f,
                "Playoff pool of {} does not split evenly into {} bracket(s)",
                pool, slots
            ),
            LeagueError::TooFewQualifiers { qualifiers } => write!(
                f,
                "Playoff phase needs at least two qualifiers (would get {})",
                qualifiers
            ),
            LeagueError::RestoreMismatch { field } => {
                write!(f, "Saved season state is inconsistent: {}", field)
            }
            LeagueError::CorruptSeason(what) => {
                write!(f, "Season state is corrupt: {}", what)
            }
            LeagueError::Engine(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for LeagueError {}

impl From<EngineError> for LeagueError {
    fn from(e: EngineError) -> Self {
        LeagueError::Engine(e)
    }
}
