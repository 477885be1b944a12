// Command-line arguments and per-invocation config overrides.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

use courtcast_core::category::Category;
use courtcast_core::config::ValuationConfig;

#[derive(Parser, Debug)]
#[command(name = "courtcast")]
#[command(about = "Auction values for head-to-head category basketball leagues", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Directory holding config/, defaults/, and data/ (defaults to cwd)
    #[arg(long, global = true)]
    pub base_dir: Option<PathBuf>,

    /// Punt a category for this run (repeatable), e.g. --punt ft_pct
    #[arg(long = "punt", value_name = "CAT", global = true)]
    pub punts: Vec<Category>,

    /// Override a category weight (repeatable), e.g. --weight blocks=1.8
    #[arg(long = "weight", value_name = "CAT=W", value_parser = parse_weight, global = true)]
    pub weights: Vec<(Category, f64)>,

    /// Inflation percentage applied to final values
    #[arg(long, value_name = "PCT", global = true)]
    pub inflation: Option<f64>,

    /// Minimum games played to enter the pool
    #[arg(long, value_name = "N", global = true)]
    pub min_games: Option<u32>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Print the ranked value table (default if no subcommand)
    Values {
        /// Only show the first N players
        #[arg(long, default_value_t = 50)]
        top: usize,
    },
    /// Show stats and category scores for matching players
    Player {
        /// Name parts; every part must appear in the player's name
        #[arg(required = true)]
        name: Vec<String>,
    },
    /// Compare the most valuable players inside a scoring band
    Similar {
        /// Lowest points per game, inclusive
        #[arg(long, default_value_t = 19.0)]
        min_pts: f64,
        /// Highest points per game, inclusive
        #[arg(long, default_value_t = 21.0)]
        max_pts: f64,
        #[arg(long, default_value_t = 10)]
        limit: usize,
    },
    /// Write the full value table to a file
    Export {
        #[arg(long, value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,
        /// Output directory (defaults to the configured export dir)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

impl Default for Command {
    fn default() -> Self {
        Command::Values { top: 50 }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

/// Parse a `CAT=W` weight override.
pub fn parse_weight(s: &str) -> Result<(Category, f64), String> {
    let (cat, weight) = s
        .split_once('=')
        .ok_or_else(|| format!("expected CAT=WEIGHT, got '{s}'"))?;
    let category: Category = cat.trim().parse().map_err(|e| format!("{e}"))?;
    let weight: f64 = weight
        .trim()
        .parse()
        .map_err(|_| format!("invalid weight '{}' for {}", weight.trim(), category))?;
    if !weight.is_finite() || weight < 0.0 {
        return Err(format!("weight for {category} must be a finite number >= 0"));
    }
    Ok((category, weight))
}

impl Cli {
    /// Layer command-line overrides on top of the file configuration.
    pub fn apply_overrides(&self, config: &mut ValuationConfig) -> Result<(), String> {
        config.punted_cats.extend(self.punts.iter().copied());
        for &(cat, weight) in &self.weights {
            config.category_weights.insert(cat, weight);
        }
        if let Some(rate) = self.inflation {
            if !rate.is_finite() || rate < 0.0 {
                return Err(format!("--inflation must be a finite number >= 0, got {rate}"));
            }
            config.inflation_rate = rate;
        }
        if let Some(min_games) = self.min_games {
            config.min_games = min_games;
        }
        Ok(())
    }
}
