//! Competitor: stable identity plus a running season record.

use serde::{Deserialize, Serialize};

/// Origin-system key for a competitor (team or player). Uniqueness within one
/// division/season is the caller's responsibility.
pub type CompetitorId = u32;

/// A competitor embedded in a division roster or cup stage.
///
/// The win/loss/draw counters are only touched while the competitor sits in
/// an active round-robin phase; elimination results never reach them.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Competitor {
    pub id: CompetitorId,
    pub name: String,
    /// Pyramid level, adjusted by season rollover on promotion or relegation.
    /// Nothing in scheduling branches on it.
    pub tier: u32,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
}

impl Competitor {
    /// Create a competitor with a clean record.
    pub fn new(id: CompetitorId, name: impl Into<String>, tier: u32) -> Self {
        Self {
            id,
            name: name.into(),
            tier,
            wins: 0,
            losses: 0,
            draws: 0,
        }
    }

    /// Fresh copy for the next season or the next cup stage: same identity,
    /// counters reset. Promotion and relegation copy competitors, never move
    /// the live value.
    pub fn carry_over(&self) -> Self {
        Self::new(self.id, self.name.clone(), self.tier)
    }

    /// Record a won round-robin match.
    pub fn add_win(&mut self) {
        self.wins += 1;
    }

    /// Record a lost round-robin match.
    pub fn add_loss(&mut self) {
        self.losses += 1;
    }

    /// Record a drawn round-robin match.
    pub fn add_draw(&mut self) {
        self.draws += 1;
    }
}
