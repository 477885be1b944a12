// Configuration loading and parsing (league.toml, strategy.toml).

use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::category::{Category, CategoryWeightProfile};

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Engine configuration
// ---------------------------------------------------------------------------

/// Roster size assumed by the budget math, independent of the configured
/// roster size used for the replacement baseline.
pub const BUDGET_ROSTER_SIZE: usize = 13;

/// Everything the valuation engine needs for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct ValuationConfig {
    /// Legacy full punts; equivalent to a weight of 0.
    pub punted_cats: BTreeSet<Category>,
    /// Per-category weights; categories not listed weigh 1.0.
    pub category_weights: BTreeMap<Category, f64>,
    /// Percentage applied to every final dollar value after blending.
    pub inflation_rate: f64,
    pub league_teams: usize,
    pub roster_size: usize,
    pub budget: u32,
    pub min_games: u32,
    /// Scale on the rank-tiered market blend. 0 disables ADP blending.
    pub adp_weight: f64,
}

impl ValuationConfig {
    pub fn weight_profile(&self) -> CategoryWeightProfile {
        CategoryWeightProfile::new(self.category_weights.clone(), self.punted_cats.clone())
    }

    /// Roster slots across the league for the replacement baseline.
    pub fn rostered_players(&self) -> usize {
        self.league_teams * self.roster_size
    }

    /// Roster slots across the league for budget allocation.
    pub fn budget_roster_spots(&self) -> usize {
        self.league_teams * BUDGET_ROSTER_SIZE
    }
}

impl Default for ValuationConfig {
    fn default() -> Self {
        ValuationConfig {
            punted_cats: BTreeSet::new(),
            category_weights: BTreeMap::new(),
            inflation_rate: 0.0,
            league_teams: 12,
            roster_size: 13,
            budget: 200,
            min_games: 20,
            adp_weight: 1.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub base_dir: PathBuf,
    pub league: LeagueConfig,
    pub strategy: StrategyConfig,
    pub data_paths: DataPaths,
    pub export: ExportConfig,
}

impl Config {
    /// Assemble the engine configuration from the league and strategy files.
    pub fn valuation_config(&self) -> ValuationConfig {
        ValuationConfig {
            punted_cats: self.strategy.punted_cats.clone(),
            category_weights: self.strategy.category_weights.clone(),
            inflation_rate: self.strategy.inflation_rate,
            league_teams: self.league.num_teams,
            roster_size: self.league.roster_size,
            budget: self.league.budget,
            min_games: self.strategy.min_games,
            adp_weight: self.strategy.adp_weight,
        }
    }

    /// Resolve a configured path against the base directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        let p = Path::new(path);
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.base_dir.join(p)
        }
    }
}

// ---------------------------------------------------------------------------
// league.toml structs
// ---------------------------------------------------------------------------

/// Wrapper for the top-level `[league]` table in league.toml.
#[derive(Debug, Clone, Deserialize)]
struct LeagueFile {
    league: LeagueConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeagueConfig {
    pub name: String,
    pub season: String,
    pub num_teams: usize,
    pub roster_size: usize,
    pub budget: u32,
}

// ---------------------------------------------------------------------------
// strategy.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire strategy.toml file.
#[derive(Debug, Clone, Deserialize)]
struct StrategyFile {
    valuation: ValuationSection,
    #[serde(default)]
    category_weights: BTreeMap<Category, f64>,
    data_paths: DataPaths,
    export: ExportConfig,
}

#[derive(Debug, Clone, Deserialize)]
struct ValuationSection {
    min_games: u32,
    #[serde(default)]
    inflation_rate: f64,
    #[serde(default = "default_adp_weight")]
    adp_weight: f64,
    #[serde(default)]
    punted_cats: BTreeSet<Category>,
}

fn default_adp_weight() -> f64 {
    1.0
}

/// The public strategy config assembled from the strategy.toml sections.
#[derive(Debug, Clone)]
pub struct StrategyConfig {
    pub min_games: u32,
    pub inflation_rate: f64,
    pub adp_weight: f64,
    pub punted_cats: BTreeSet<Category>,
    pub category_weights: BTreeMap<Category, f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    pub stats: String,
    pub adp: String,
    /// Secondary stat file consulted only when `stats` cannot be loaded.
    #[serde(default)]
    pub fallback_stats: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    pub dir: String,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/league.toml` and
/// `config/strategy.toml`, relative to the given `base_dir`.
///
/// Does not seed missing files; [`load_config_at`] does.
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let config_dir = base_dir.join("config");

    // --- league.toml (required) ---
    let league_path = config_dir.join("league.toml");
    let league_text = read_file(&league_path)?;
    let league_file: LeagueFile =
        toml::from_str(&league_text).map_err(|e| ConfigError::ParseError {
            path: league_path.clone(),
            source: e,
        })?;

    // --- strategy.toml (required) ---
    let strategy_path = config_dir.join("strategy.toml");
    let strategy_text = read_file(&strategy_path)?;
    let strategy_file: StrategyFile =
        toml::from_str(&strategy_text).map_err(|e| ConfigError::ParseError {
            path: strategy_path.clone(),
            source: e,
        })?;

    let strategy = StrategyConfig {
        min_games: strategy_file.valuation.min_games,
        inflation_rate: strategy_file.valuation.inflation_rate,
        adp_weight: strategy_file.valuation.adp_weight,
        punted_cats: strategy_file.valuation.punted_cats,
        category_weights: strategy_file.category_weights,
    };

    let config = Config {
        base_dir: base_dir.to_path_buf(),
        league: league_file.league,
        strategy,
        data_paths: strategy_file.data_paths,
        export: strategy_file.export,
    };

    validate(&config)?;

    Ok(config)
}

/// Files a project needs under `config/`, seeded from `defaults/`.
pub const CONFIG_FILES: &[&str] = &["league.toml", "strategy.toml"];

/// Copy each of [`CONFIG_FILES`] missing from `config/` out of `defaults/`.
/// Existing files are never overwritten. Returns the paths written.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.is_dir() && !config_dir.is_dir() {
        return Err(ConfigError::DefaultsCopyError {
            message: format!(
                "neither defaults/ nor config/ directory found in {}; \
                 run from the project root or pass --base-dir",
                base_dir.display()
            ),
        });
    }

    let mut copied = Vec::new();
    for file in CONFIG_FILES {
        let target = config_dir.join(file);
        let seed = defaults_dir.join(file);
        if target.exists() || !seed.is_file() {
            continue;
        }
        std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to create {}: {e}", config_dir.display()),
        })?;
        std::fs::copy(&seed, &target).map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to copy {} to {}: {e}", seed.display(), target.display()),
        })?;
        copied.push(target);
    }

    Ok(copied)
}

/// Seed missing config files from defaults, then load from `base_dir`.
pub fn load_config_at(base_dir: &Path) -> Result<Config, ConfigError> {
    ensure_config_files(base_dir)?;
    load_config_from(base_dir)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let league = &config.league;
    let league_fields: &[(&str, usize)] = &[
        ("league.num_teams", league.num_teams),
        ("league.roster_size", league.roster_size),
    ];
    for (name, val) in league_fields {
        if *val == 0 {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: "must be greater than 0".into(),
            });
        }
    }

    // Every budget-roster slot reserves $1.
    if (league.budget as usize) < BUDGET_ROSTER_SIZE {
        return Err(ConfigError::ValidationError {
            field: "league.budget".into(),
            message: format!(
                "must cover ${BUDGET_ROSTER_SIZE} of roster minimums, got {}",
                league.budget
            ),
        });
    }

    let strategy = &config.strategy;
    let scalar_fields: &[(&str, f64)] = &[
        ("valuation.inflation_rate", strategy.inflation_rate),
        ("valuation.adp_weight", strategy.adp_weight),
    ];
    for (name, val) in scalar_fields {
        if !val.is_finite() || *val < 0.0 {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: format!("must be a finite value >= 0, got {val}"),
            });
        }
    }

    for (cat, w) in &strategy.category_weights {
        if !w.is_finite() || *w < 0.0 {
            return Err(ConfigError::ValidationError {
                field: format!("category_weights.{cat}"),
                message: format!("must be a finite value >= 0, got {w}"),
            });
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    /// Helper: returns the repository root holding `defaults/`
    /// (works whether `cargo test` runs from the crate dir or the repo root).
    fn project_root() -> PathBuf {
        let cwd = std::env::current_dir().unwrap();
        if cwd.join("defaults").exists() {
            cwd
        } else if cwd.join("../../defaults").exists() {
            cwd.join("../..")
        } else {
            panic!("Cannot locate defaults/ directory from CWD {:?}", cwd);
        }
    }

    /// Fresh temp dir with a `config/` holding copies of the default files.
    fn temp_config_dir(name: &str) -> PathBuf {
        let tmp = std::env::temp_dir().join(name);
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();
        let root = project_root();
        for file in ["league.toml", "strategy.toml"] {
            fs::copy(root.join("defaults").join(file), tmp.join("config").join(file)).unwrap();
        }
        tmp
    }

    fn replace_in(path: &Path, from: &str, to: &str) {
        let text = fs::read_to_string(path).unwrap();
        assert!(text.contains(from), "expected `{from}` in {}", path.display());
        fs::write(path, text.replace(from, to)).unwrap();
    }

    #[test]
    fn load_valid_config_from_default_files() {
        let tmp = temp_config_dir("courtcast_config_defaults");
        let config = load_config_from(&tmp).expect("should load valid config");

        assert_eq!(config.league.num_teams, 12);
        assert_eq!(config.league.roster_size, 13);
        assert_eq!(config.league.budget, 200);
        assert_eq!(config.league.season, "2025");
        assert_eq!(config.strategy.min_games, 20);
        assert!(config.strategy.punted_cats.is_empty());
        assert!((config.strategy.adp_weight - 1.0).abs() < f64::EPSILON);
        assert_eq!(config.strategy.category_weights.len(), 9);
        assert_eq!(config.data_paths.stats, "data/stats/per_game.csv");
        assert!(config.data_paths.fallback_stats.is_some());
        assert_eq!(config.export.dir, "exports");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn valuation_config_mirrors_files() {
        let tmp = temp_config_dir("courtcast_config_valuation");
        replace_in(
            &tmp.join("config/strategy.toml"),
            "punted_cats = []",
            "punted_cats = [\"fg_pct\"]",
        );
        let config = load_config_from(&tmp).unwrap();
        let vc = config.valuation_config();

        assert_eq!(vc.league_teams, 12);
        assert_eq!(vc.rostered_players(), 156);
        assert_eq!(vc.budget_roster_spots(), 156);
        assert!(vc.punted_cats.contains(&Category::FgPct));
        assert_eq!(vc.weight_profile().resolve(Category::FgPct), 0.0);
        assert_eq!(vc.weight_profile().resolve(Category::Points), 1.0);

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_copies_missing_and_keeps_existing() {
        let tmp = std::env::temp_dir().join("courtcast_config_seed");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("defaults")).unwrap();
        fs::create_dir_all(tmp.join("config")).unwrap();

        let root = project_root();
        for file in ["league.toml", "strategy.toml"] {
            fs::copy(root.join("defaults").join(file), tmp.join("defaults").join(file)).unwrap();
        }
        fs::write(tmp.join("defaults/notes.toml"), "x = 1\n").unwrap();
        fs::write(tmp.join("config/league.toml"), "custom").unwrap();

        let copied = ensure_config_files(&tmp).unwrap();
        assert_eq!(copied, vec![tmp.join("config/strategy.toml")]);
        assert_eq!(fs::read_to_string(tmp.join("config/league.toml")).unwrap(), "custom");
        assert!(!tmp.join("config/notes.toml").exists());

        // Second run has nothing left to seed.
        assert!(ensure_config_files(&tmp).unwrap().is_empty());

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_without_defaults_keeps_config() {
        let tmp = temp_config_dir("courtcast_config_no_defaults");
        assert!(!tmp.join("defaults").exists());

        assert!(ensure_config_files(&tmp).unwrap().is_empty());
        assert!(load_config_at(&tmp).is_ok());

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn roster_helpers_split_baseline_from_budget_slots() {
        let vc = ValuationConfig {
            league_teams: 10,
            roster_size: 15,
            ..Default::default()
        };
        assert_eq!(vc.rostered_players(), 150);
        assert_eq!(vc.budget_roster_spots(), 10 * BUDGET_ROSTER_SIZE);
    }

    #[test]
    fn missing_directories_is_defaults_copy_error() {
        let tmp = std::env::temp_dir().join("courtcast_config_nothing");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();

        let err = load_config_at(&tmp).unwrap_err();
        assert!(matches!(err, ConfigError::DefaultsCopyError { .. }));

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn missing_league_file_is_file_not_found() {
        let tmp = temp_config_dir("courtcast_config_no_league");
        fs::remove_file(tmp.join("config/league.toml")).unwrap();

        match load_config_from(&tmp).unwrap_err() {
            ConfigError::FileNotFound { path } => assert!(path.ends_with("league.toml")),
            other => panic!("expected FileNotFound, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_num_teams_zero() {
        let tmp = temp_config_dir("courtcast_config_teams_zero");
        replace_in(&tmp.join("config/league.toml"), "num_teams = 12", "num_teams = 0");

        match load_config_from(&tmp).unwrap_err() {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, "league.num_teams"),
            other => panic!("expected ValidationError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_budget_below_roster_minimums() {
        let tmp = temp_config_dir("courtcast_config_budget_low");
        replace_in(&tmp.join("config/league.toml"), "budget = 200", "budget = 5");

        match load_config_from(&tmp).unwrap_err() {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, "league.budget"),
            other => panic!("expected ValidationError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_negative_category_weight() {
        let tmp = temp_config_dir("courtcast_config_negative_weight");
        replace_in(&tmp.join("config/strategy.toml"), "steals = 1.0", "steals = -0.5");

        match load_config_from(&tmp).unwrap_err() {
            ConfigError::ValidationError { field, .. } => {
                assert_eq!(field, "category_weights.steals")
            }
            other => panic!("expected ValidationError, got: {other}"),
        }

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn rejects_unknown_category_key() {
        let tmp = temp_config_dir("courtcast_config_unknown_cat");
        replace_in(&tmp.join("config/strategy.toml"), "steals = 1.0", "hustle = 1.0");

        let err = load_config_from(&tmp).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }), "got: {err}");

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn resolve_path_joins_relative_paths() {
        let tmp = temp_config_dir("courtcast_config_resolve");
        let config = load_config_from(&tmp).unwrap();
        assert_eq!(config.resolve_path("data/x.csv"), tmp.join("data/x.csv"));
        let _ = fs::remove_dir_all(&tmp);
    }
}
