//! League: an ordered pyramid of divisions with promotion/relegation between
//! neighbors.

use crate::models::division::Division;

/// A league career: the divisions are replaced wholesale at season rollover
/// while the league itself persists.
///
/// Index 0 is the lowest tier; `divisions[i + 1]` is the tier directly above
/// `divisions[i]`. Promotion moves competitors into the upper neighbor's
/// next-season roster, relegation into the lower neighbor's.
#[derive(Clone, Debug, PartialEq)]
pub struct League {
    pub name: String,
    pub divisions: Vec<Division>,
    /// Working set while the end-of-season replacement divisions are built.
    pub post_season_divisions: Vec<Division>,
}

impl League {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            divisions: Vec::new(),
            post_season_divisions: Vec::new(),
        }
    }

    /// Append a division above the current topmost tier. No duplicate-name
    /// check is performed here.
    pub fn add_division(
        &mut self,
        name: impl Into<String>,
        size: usize,
        conference_size: usize,
    ) -> &mut Division {
        let idx = self.divisions.len();
        self.divisions.push(Division::new(name, size, conference_size));
        &mut self.divisions[idx]
    }

    /// Every division's group stage finished, short-circuiting. A league
    /// with no divisions has nothing finished.
    pub fn is_group_stage_done(&self) -> bool {
        !self.divisions.is_empty() && self.divisions.iter().all(|d| d.is_done())
    }

    /// Every division's group stage and promotion playoffs finished.
    pub fn is_done(&self) -> bool {
        self.is_group_stage_done()
            && self.divisions.iter().all(|d| d.is_post_season_done())
    }
}
