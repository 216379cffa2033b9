//! Season and circuit business logic: setup, post-season, rollover, and the
//! match-report boundary.

mod circuit;
mod post_season;
mod reporting;
mod rollover;
mod setup;

pub use circuit::{minor_is_done, stage_is_done, start_minor};
pub use post_season::{
    end_league_post_season, start_division_post_season, start_league_post_season,
};
pub use reporting::{
    report_conference_match, report_promotion_match, report_stage_match, ScoreReport,
};
pub use rollover::end_league;
pub use setup::{start_division, start_league};
