// Scoring categories and per-invocation category weighting.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Category
// ---------------------------------------------------------------------------

/// One scored statistical dimension of a nine-category league.
///
/// Declaration order is the canonical column order used for display and
/// export, so the derived `Ord` doubles as presentation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Points,
    Rebounds,
    Assists,
    Steals,
    Blocks,
    Threes,
    FgPct,
    FtPct,
    Turnovers,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::Points,
        Category::Rebounds,
        Category::Assists,
        Category::Steals,
        Category::Blocks,
        Category::Threes,
        Category::FgPct,
        Category::FtPct,
        Category::Turnovers,
    ];

    /// Stable snake_case key, matching config files and export columns.
    pub fn key(self) -> &'static str {
        match self {
            Category::Points => "points",
            Category::Rebounds => "rebounds",
            Category::Assists => "assists",
            Category::Steals => "steals",
            Category::Blocks => "blocks",
            Category::Threes => "threes",
            Category::FgPct => "fg_pct",
            Category::FtPct => "ft_pct",
            Category::Turnovers => "turnovers",
        }
    }

    /// Short label for terminal tables.
    pub fn label(self) -> &'static str {
        match self {
            Category::Points => "PTS",
            Category::Rebounds => "REB",
            Category::Assists => "AST",
            Category::Steals => "STL",
            Category::Blocks => "BLK",
            Category::Threes => "3PM",
            Category::FgPct => "FG%",
            Category::FtPct => "FT%",
            Category::Turnovers => "TO",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category `{0}`")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    /// Accepts the snake_case key or the short label, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.key() == needle || c.label().to_lowercase() == needle)
            .ok_or_else(|| UnknownCategory(s.trim().to_string()))
    }
}

// ---------------------------------------------------------------------------
// Weight profile
// ---------------------------------------------------------------------------

/// Weight applied to a category when the profile does not mention it.
pub const DEFAULT_CATEGORY_WEIGHT: f64 = 1.0;

/// Category emphasis for one valuation run.
///
/// `punted` is the legacy way of zeroing a category and is equivalent to a
/// weight of 0. Negative or non-finite weights resolve to 0.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryWeightProfile {
    #[serde(default)]
    pub weights: BTreeMap<Category, f64>,
    #[serde(default)]
    pub punted: BTreeSet<Category>,
}

impl CategoryWeightProfile {
    pub fn new(weights: BTreeMap<Category, f64>, punted: BTreeSet<Category>) -> Self {
        CategoryWeightProfile { weights, punted }
    }

    /// Effective weight for a category after applying the punt set.
    pub fn resolve(&self, category: Category) -> f64 {
        if self.punted.contains(&category) {
            return 0.0;
        }
        let w = self
            .weights
            .get(&category)
            .copied()
            .unwrap_or(DEFAULT_CATEGORY_WEIGHT);
        if w.is_finite() && w > 0.0 {
            w
        } else {
            0.0
        }
    }

    /// True if the category contributes nothing to scoring.
    pub fn is_excluded(&self, category: Category) -> bool {
        self.resolve(category) == 0.0
    }

    /// Categories that survive punting, in canonical order.
    pub fn included(&self) -> impl Iterator<Item = Category> + '_ {
        Category::ALL.into_iter().filter(|&c| !self.is_excluded(c))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_keys_and_labels() {
        assert_eq!("points".parse::<Category>(), Ok(Category::Points));
        assert_eq!("FG%".parse::<Category>(), Ok(Category::FgPct));
        assert_eq!(" ft_pct ".parse::<Category>(), Ok(Category::FtPct));
        assert_eq!("3pm".parse::<Category>(), Ok(Category::Threes));
        assert_eq!("TO".parse::<Category>(), Ok(Category::Turnovers));
        assert!("hustle".parse::<Category>().is_err());
    }

    #[test]
    fn key_roundtrips_through_from_str() {
        for cat in Category::ALL {
            assert_eq!(cat.key().parse::<Category>(), Ok(cat));
        }
    }

    #[test]
    fn unspecified_weight_defaults_to_one() {
        let profile = CategoryWeightProfile::default();
        for cat in Category::ALL {
            assert_eq!(profile.resolve(cat), 1.0);
        }
        assert_eq!(profile.included().count(), 9);
    }

    #[test]
    fn punted_set_overrides_explicit_weight() {
        let mut profile = CategoryWeightProfile::default();
        profile.weights.insert(Category::Blocks, 2.0);
        profile.punted.insert(Category::Blocks);
        assert_eq!(profile.resolve(Category::Blocks), 0.0);
        assert!(profile.is_excluded(Category::Blocks));
        assert!(!profile.included().any(|c| c == Category::Blocks));
    }

    #[test]
    fn negative_and_nan_weights_resolve_to_zero() {
        let mut profile = CategoryWeightProfile::default();
        profile.weights.insert(Category::Steals, -1.0);
        profile.weights.insert(Category::Assists, f64::NAN);
        assert_eq!(profile.resolve(Category::Steals), 0.0);
        assert_eq!(profile.resolve(Category::Assists), 0.0);
    }

    #[test]
    fn weight_map_deserializes_from_toml_keys() {
        let text = r#"
punted = ["turnovers"]

[weights]
fg_pct = 0.25
points = 1.5
"#;
        let profile: CategoryWeightProfile = toml::from_str(text).unwrap();
        assert_eq!(profile.resolve(Category::FgPct), 0.25);
        assert_eq!(profile.resolve(Category::Points), 1.5);
        assert_eq!(profile.resolve(Category::Turnovers), 0.0);
        assert_eq!(profile.resolve(Category::Rebounds), 1.0);
    }
}
