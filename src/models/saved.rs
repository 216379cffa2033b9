//! Durable snapshots. Leagues and minors serialize to plain data trees;
//! restoring validates every field against the surrounding structure and
//! replays each engine's score log rather than trusting derived state.

use crate::engine::{
    Elimination, EliminationMetadata, EliminationOptions, RoundRobin, RoundRobinMetadata,
    RoundRobinOptions, ScoreEvent,
};
use crate::models::competitor::{Competitor, CompetitorId};
use crate::models::conference::{Conference, ConferenceId, PromotionConference};
use crate::models::division::Division;
use crate::models::error::LeagueError;
use crate::models::league::League;
use crate::models::stage::{Minor, Stage};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stamped into every snapshot; bumped when the snapshot layout changes.
pub const SAVE_FORMAT_VERSION: u32 = 1;

/// A round robin reduced to its static descriptor plus ordered score log.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SavedRoundRobin {
    pub metadata: RoundRobinMetadata,
    pub state: Vec<ScoreEvent>,
}

impl SavedRoundRobin {
    pub fn capture(engine: &RoundRobin) -> Self {
        Self {
            metadata: engine.metadata(),
            state: engine.state().to_vec(),
        }
    }

    /// Rebuild, checking the snapshot against the shape the surrounding
    /// structure expects.
    pub fn restore(
        self,
        competitor_count: usize,
        options: RoundRobinOptions,
    ) -> Result<RoundRobin, LeagueError> {
        Ok(RoundRobin::restore(
            competitor_count,
            options,
            self.state,
            self.metadata,
        )?)
    }
}

/// An elimination bracket reduced the same way.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SavedElimination {
    pub metadata: EliminationMetadata,
    pub state: Vec<ScoreEvent>,
}

impl SavedElimination {
    pub fn capture(engine: &Elimination) -> Self {
        Self {
            metadata: engine.metadata(),
            state: engine.state().to_vec(),
        }
    }

    pub fn restore(
        self,
        competitor_count: usize,
        options: EliminationOptions,
    ) -> Result<Elimination, LeagueError> {
        Ok(Elimination::restore(
            competitor_count,
            options,
            self.state,
            self.metadata,
        )?)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SavedConference {
    pub id: ConferenceId,
    pub competitor_ids: Vec<CompetitorId>,
    pub engine: SavedRoundRobin,
}

impl SavedConference {
    pub fn capture(conference: &Conference) -> Self {
        Self {
            id: conference.id,
            competitor_ids: conference.competitor_ids.clone(),
            engine: SavedRoundRobin::capture(&conference.engine),
        }
    }

    pub fn restore(self) -> Result<Conference, LeagueError> {
        let count = self.competitor_ids.len();
        let engine = self.engine.restore(
            count,
            RoundRobinOptions {
                group_size: count,
                meet_twice: false,
            },
        )?;
        Ok(Conference::from_parts(self.id, self.competitor_ids, engine))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SavedPromotionConference {
    pub id: ConferenceId,
    pub competitor_ids: Vec<CompetitorId>,
    pub bracket: SavedElimination,
}

impl SavedPromotionConference {
    pub fn capture(bracket: &PromotionConference) -> Self {
        Self {
            id: bracket.id,
            competitor_ids: bracket.competitor_ids.clone(),
            bracket: SavedElimination::capture(&bracket.bracket),
        }
    }

    pub fn restore(self) -> Result<PromotionConference, LeagueError> {
        let count = self.competitor_ids.len();
        let bracket = self
            .bracket
            .restore(count, EliminationOptions { short: true })?;
        Ok(PromotionConference::from_parts(
            self.id,
            self.competitor_ids,
            bracket,
        ))
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SavedDivision {
    pub name: String,
    pub size: usize,
    pub conference_size: usize,
    pub promotion_percent: f64,
    pub relegation_slots: usize,
    pub competitors: Vec<Competitor>,
    pub conferences: Vec<SavedConference>,
    pub promotion_conferences: Vec<SavedPromotionConference>,
    pub automatic_promotions: Vec<CompetitorId>,
    pub playoff_promotions: Vec<CompetitorId>,
}

impl SavedDivision {
    pub fn capture(division: &Division) -> Self {
        Self {
            name: division.name.clone(),
            size: division.size,
            conference_size: division.conference_size,
            promotion_percent: division.promotion_percent,
            relegation_slots: division.relegation_slots,
            competitors: division.competitors.clone(),
            conferences: division.conferences.iter().map(SavedConference::capture).collect(),
            promotion_conferences: division
                .promotion_conferences
                .iter()
                .map(SavedPromotionConference::capture)
                .collect(),
            automatic_promotions: division.automatic_promotions.clone(),
            playoff_promotions: division.playoff_promotions.clone(),
        }
    }

    /// Rebuild one division, checking that every id the snapshot mentions
    /// actually belongs to its roster and that a started division's
    /// conferences partition that roster exactly.
    pub fn restore(self) -> Result<Division, LeagueError> {
        let roster_ids: Vec<CompetitorId> = self.competitors.iter().map(|c| c.id).collect();

        for saved in &self.conferences {
            if saved.competitor_ids.iter().any(|id| !roster_ids.contains(id)) {
                return Err(LeagueError::RestoreMismatch {
                    field: "conference member",
                });
            }
        }
        if !self.conferences.is_empty() {
            let mut assigned: Vec<CompetitorId> = self
                .conferences
                .iter()
                .flat_map(|c| c.competitor_ids.iter().copied())
                .collect();
            assigned.sort_unstable();
            let mut roster = roster_ids.clone();
            roster.sort_unstable();
            if assigned != roster {
                return Err(LeagueError::RestoreMismatch {
                    field: "conference partition",
                });
            }
        }
        for saved in &self.promotion_conferences {
            if saved.competitor_ids.iter().any(|id| !roster_ids.contains(id)) {
                return Err(LeagueError::RestoreMismatch {
                    field: "playoff entrant",
                });
            }
        }
        if self
            .automatic_promotions
            .iter()
            .chain(&self.playoff_promotions)
            .any(|id| !roster_ids.contains(id))
        {
            return Err(LeagueError::RestoreMismatch {
                field: "promoted competitor",
            });
        }

        let mut conferences = Vec::with_capacity(self.conferences.len());
        for saved in self.conferences {
            conferences.push(saved.restore()?);
        }
        let mut promotion_conferences = Vec::with_capacity(self.promotion_conferences.len());
        for saved in self.promotion_conferences {
            promotion_conferences.push(saved.restore()?);
        }

        Ok(Division {
            name: self.name,
            size: self.size,
            conference_size: self.conference_size,
            promotion_percent: self.promotion_percent,
            relegation_slots: self.relegation_slots,
            competitors: self.competitors,
            conferences,
            promotion_conferences,
            automatic_promotions: self.automatic_promotions,
            playoff_promotions: self.playoff_promotions,
        })
    }
}

/// A whole league at a point in time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SavedLeague {
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    pub name: String,
    pub divisions: Vec<SavedDivision>,
    pub post_season_divisions: Vec<SavedDivision>,
}

impl SavedLeague {
    /// Rebuild the league. Fails loudly on a version the running code does
    /// not understand or on any internal inconsistency.
    pub fn restore(self) -> Result<League, LeagueError> {
        if self.version != SAVE_FORMAT_VERSION {
            return Err(LeagueError::RestoreMismatch { field: "version" });
        }
        let mut divisions = Vec::with_capacity(self.divisions.len());
        for saved in self.divisions {
            divisions.push(saved.restore()?);
        }
        let mut post_season_divisions = Vec::with_capacity(self.post_season_divisions.len());
        for saved in self.post_season_divisions {
            post_season_divisions.push(saved.restore()?);
        }
        Ok(League {
            name: self.name,
            divisions,
            post_season_divisions,
        })
    }
}

impl League {
    /// Snapshot this league for storage.
    pub fn save(&self) -> SavedLeague {
        SavedLeague {
            version: SAVE_FORMAT_VERSION,
            saved_at: Utc::now(),
            name: self.name.clone(),
            divisions: self.divisions.iter().map(SavedDivision::capture).collect(),
            post_season_divisions: self
                .post_season_divisions
                .iter()
                .map(SavedDivision::capture)
                .collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SavedStage {
    pub name: String,
    pub size: usize,
    pub group_size: usize,
    pub group_qualify_num: usize,
    pub meet_twice: bool,
    pub playoffs: bool,
    pub competitors: Vec<Competitor>,
    pub playoff_competitors: Vec<Competitor>,
    pub group: Option<SavedRoundRobin>,
    pub bracket: Option<SavedElimination>,
}

impl SavedStage {
    pub fn capture(stage: &Stage) -> Self {
        Self {
            name: stage.name.clone(),
            size: stage.size,
            group_size: stage.group_size,
            group_qualify_num: stage.group_qualify_num,
            meet_twice: stage.meet_twice,
            playoffs: stage.playoffs,
            competitors: stage.competitors.clone(),
            playoff_competitors: stage.playoff_competitors.clone(),
            group: stage.group.as_ref().map(SavedRoundRobin::capture),
            bracket: stage.bracket.as_ref().map(SavedElimination::capture),
        }
    }

    pub fn restore(self) -> Result<Stage, LeagueError> {
        if self.bracket.is_some() && self.group.is_none() {
            return Err(LeagueError::RestoreMismatch {
                field: "bracket without a group phase",
            });
        }
        if self.bracket.is_some() && !self.playoffs {
            return Err(LeagueError::RestoreMismatch {
                field: "bracket on a stage without playoffs",
            });
        }
        let roster_ids: Vec<CompetitorId> = self.competitors.iter().map(|c| c.id).collect();
        if self
            .playoff_competitors
            .iter()
            .any(|c| !roster_ids.contains(&c.id))
        {
            return Err(LeagueError::RestoreMismatch {
                field: "playoff entrant outside the stage roster",
            });
        }

        let group = match self.group {
            Some(saved) => Some(saved.restore(
                self.competitors.len(),
                RoundRobinOptions {
                    group_size: self.group_size,
                    meet_twice: self.meet_twice,
                },
            )?),
            None => None,
        };
        let bracket = match self.bracket {
            Some(saved) => Some(saved.restore(
                self.playoff_competitors.len(),
                EliminationOptions { short: false },
            )?),
            None => None,
        };

        Ok(Stage {
            name: self.name,
            size: self.size,
            group_size: self.group_size,
            group_qualify_num: self.group_qualify_num,
            meet_twice: self.meet_twice,
            playoffs: self.playoffs,
            competitors: self.competitors,
            playoff_competitors: self.playoff_competitors,
            group,
            bracket,
        })
    }
}

/// A whole circuit at a point in time.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SavedMinor {
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    pub name: String,
    pub stages: Vec<SavedStage>,
    pub started: Vec<usize>,
}

impl SavedMinor {
    pub fn restore(self) -> Result<Minor, LeagueError> {
        if self.version != SAVE_FORMAT_VERSION {
            return Err(LeagueError::RestoreMismatch { field: "version" });
        }
        for (pos, &index) in self.started.iter().enumerate() {
            if index >= self.stages.len() {
                return Err(LeagueError::RestoreMismatch {
                    field: "started stage index",
                });
            }
            if self.started[..pos].contains(&index) {
                return Err(LeagueError::RestoreMismatch {
                    field: "stage started twice",
                });
            }
            if self.stages[index].group.is_none() {
                return Err(LeagueError::RestoreMismatch {
                    field: "started stage without a draw",
                });
            }
        }
        for (index, stage) in self.stages.iter().enumerate() {
            if stage.group.is_some() && !self.started.contains(&index) {
                return Err(LeagueError::RestoreMismatch {
                    field: "drawn stage never started",
                });
            }
        }

        let mut stages = Vec::with_capacity(self.stages.len());
        for saved in self.stages {
            stages.push(saved.restore()?);
        }
        Ok(Minor {
            name: self.name,
            stages,
            started: self.started,
        })
    }
}

impl Minor {
    /// Snapshot this circuit for storage.
    pub fn save(&self) -> SavedMinor {
        SavedMinor {
            version: SAVE_FORMAT_VERSION,
            saved_at: Utc::now(),
            name: self.name.clone(),
            stages: self.stages.iter().map(SavedStage::capture).collect(),
            started: self.started.clone(),
        }
    }
}
