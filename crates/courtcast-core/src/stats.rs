// Per-player season stat lines as delivered by the data sources.

use serde::{Deserialize, Serialize};

use crate::category::Category;

/// Market consensus for one player: average draft position and its
/// 1-based ordinal among all ranked players.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdpEntry {
    pub adp: f64,
    pub adp_rank: u32,
}

/// One player-season of per-game production.
///
/// Counting categories are per-game rates; season totals are derived from
/// `games`. Shooting is carried as made/attempted pairs so percentages can be
/// volume-weighted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerStatLine {
    pub name: String,
    pub team: String,
    pub position: String,
    pub games: u32,
    pub minutes: f64,
    pub points: f64,
    pub rebounds: f64,
    pub assists: f64,
    pub steals: f64,
    pub blocks: f64,
    pub threes: f64,
    pub turnovers: f64,
    pub fgm: f64,
    pub fga: f64,
    pub ftm: f64,
    pub fta: f64,
    #[serde(default)]
    pub adp: Option<AdpEntry>,
}

impl PlayerStatLine {
    /// Per-game rate for a counting category. Shooting categories return
    /// the plain per-game percentage (0 when no attempts).
    pub fn per_game(&self, category: Category) -> f64 {
        match category {
            Category::Points => self.points,
            Category::Rebounds => self.rebounds,
            Category::Assists => self.assists,
            Category::Steals => self.steals,
            Category::Blocks => self.blocks,
            Category::Threes => self.threes,
            Category::Turnovers => self.turnovers,
            Category::FgPct => ratio(self.fgm, self.fga),
            Category::FtPct => ratio(self.ftm, self.fta),
        }
    }

    pub fn total(&self, per_game: f64) -> f64 {
        per_game * self.games as f64
    }

    pub fn total_fgm(&self) -> f64 {
        self.total(self.fgm)
    }

    pub fn total_fga(&self) -> f64 {
        self.total(self.fga)
    }

    pub fn total_ftm(&self) -> f64 {
        self.total(self.ftm)
    }

    pub fn total_fta(&self) -> f64 {
        self.total(self.fta)
    }

    pub fn adp_rank(&self) -> Option<u32> {
        self.adp.map(|a| a.adp_rank)
    }
}

fn ratio(made: f64, attempted: f64) -> f64 {
    if attempted > 0.0 {
        made / attempted
    } else {
        0.0
    }
}
