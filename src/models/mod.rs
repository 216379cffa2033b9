//! Data structures for the pyramid: competitors, conferences, divisions,
//! leagues and the circuit types built on top of them.

mod competitor;
mod conference;
mod division;
mod error;
mod league;
mod saved;
mod stage;

pub use competitor::{Competitor, CompetitorId};
pub use conference::{Conference, ConferenceId, PromotionConference};
pub use division::Division;
pub use error::LeagueError;
pub use league::League;
pub use saved::{
    SavedConference, SavedDivision, SavedElimination, SavedLeague, SavedMinor,
    SavedPromotionConference, SavedRoundRobin, SavedStage, SAVE_FORMAT_VERSION,
};
pub use stage::{Minor, Stage};
