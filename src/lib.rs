//! League pyramid engine: tiered divisions of round-robin conferences with
//! promotion and relegation between neighbors, plus standalone cup circuits
//! (stages and minors) built on the same scheduling engines.

pub mod engine;
pub mod logic;
pub mod models;

pub use engine::{
    Elimination, EliminationMetadata, EliminationOptions, EngineError, EngineMatch, GroupResult,
    MatchId, RoundRobin, RoundRobinMetadata, RoundRobinOptions, ScoreEvent, Seed,
};
pub use logic::{
    end_league, end_league_post_season, minor_is_done, report_conference_match,
    report_promotion_match, report_stage_match, stage_is_done, start_division,
    start_division_post_season, start_league, start_league_post_season, start_minor,
    ScoreReport,
};
pub use models::{
    Competitor, CompetitorId, Conference, ConferenceId, Division, League, LeagueError, Minor,
    PromotionConference, SavedConference, SavedDivision, SavedElimination, SavedLeague, SavedMinor,
    SavedPromotionConference, SavedRoundRobin, SavedStage, Stage, SAVE_FORMAT_VERSION,
};
