// Stat-line and ADP data sources.
//
// Sources are the only I/O in the system. Failures surface as `SourceError`;
// a fallback source may stand in for a failed primary, but the result is
// always labeled with the origin that produced it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::stats::{AdpEntry, PlayerStatLine};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("validation error: {0}")]
    Validation(String),

    #[error("all sources failed: {}", .0.join("; "))]
    Exhausted(Vec<String>),
}

// ---------------------------------------------------------------------------
// Source traits
// ---------------------------------------------------------------------------

/// Provider of season stat lines.
#[async_trait]
pub trait StatSource: Send + Sync {
    /// Human-readable label used in logs and origin tags.
    fn name(&self) -> &str;

    async fn fetch_stat_lines(&self) -> Result<Vec<PlayerStatLine>, SourceError>;
}

/// Provider of average-draft-position data.
#[async_trait]
pub trait AdpSource: Send + Sync {
    fn name(&self) -> &str;

    async fn fetch_adp(&self) -> Result<AdpBoard, SourceError>;
}

// ---------------------------------------------------------------------------
// Origin labeling and fallback
// ---------------------------------------------------------------------------

/// Which source in a chain produced a dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataOrigin {
    Primary,
    Fallback(String),
}

impl DataOrigin {
    pub fn is_fallback(&self) -> bool {
        matches!(self, DataOrigin::Fallback(_))
    }
}

/// A dataset tagged with where and when it came from.
#[derive(Debug, Clone)]
pub struct Sourced<T> {
    pub data: T,
    pub origin: DataOrigin,
    pub fetched_at: DateTime<Utc>,
}

/// Try each stat source in order and return the first success.
///
/// The first source is the primary; any later source that answers is tagged
/// as a fallback. When every source fails the individual errors are collected
/// into `SourceError::Exhausted`.
pub async fn fetch_stats_with_fallback(
    sources: &[&dyn StatSource],
) -> Result<Sourced<Vec<PlayerStatLine>>, SourceError> {
    let mut failures = Vec::new();

    for (i, source) in sources.iter().enumerate() {
        match source.fetch_stat_lines().await {
            Ok(data) => {
                let origin = if i == 0 {
                    DataOrigin::Primary
                } else {
                    warn!(
                        "using fallback stat source '{}' after {} failure(s)",
                        source.name(),
                        failures.len()
                    );
                    DataOrigin::Fallback(source.name().to_string())
                };
                info!("loaded {} stat lines from '{}'", data.len(), source.name());
                return Ok(Sourced {
                    data,
                    origin,
                    fetched_at: Utc::now(),
                });
            }
            Err(e) => {
                warn!("stat source '{}' failed: {}", source.name(), e);
                failures.push(format!("{}: {}", source.name(), e));
            }
        }
    }

    Err(SourceError::Exhausted(failures))
}

// ---------------------------------------------------------------------------
// ADP board
// ---------------------------------------------------------------------------

/// ADP entries keyed by normalized player name.
#[derive(Debug, Clone, Default)]
pub struct AdpBoard {
    entries: HashMap<String, AdpEntry>,
}

impl AdpBoard {
    /// Build a board from `(name, adp)` pairs. Ranks are assigned 1.. in
    /// ascending ADP order; equal ADPs keep their input order.
    pub fn from_pairs(pairs: Vec<(String, f64)>) -> Self {
        let mut sorted = pairs;
        sorted.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

        let entries = sorted
            .into_iter()
            .enumerate()
            .map(|(i, (name, adp))| {
                (
                    normalize_name(&name),
                    AdpEntry {
                        adp,
                        adp_rank: i as u32 + 1,
                    },
                )
            })
            .collect();

        AdpBoard { entries }
    }

    pub fn get(&self, name: &str) -> Option<AdpEntry> {
        self.entries.get(&normalize_name(name)).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Attach ADP to each stat line by normalized name.
///
/// Players missing from the board keep `adp = None`; no rank is invented
/// for them.
pub fn merge_adp(lines: &[PlayerStatLine], board: &AdpBoard) -> Vec<PlayerStatLine> {
    let merged: Vec<PlayerStatLine> = lines
        .iter()
        .map(|line| PlayerStatLine {
            adp: board.get(&line.name),
            ..line.clone()
        })
        .collect();

    let matched = merged.iter().filter(|l| l.adp.is_some()).count();
    info!(
        "matched ADP for {} of {} players ({} board entries)",
        matched,
        merged.len(),
        board.len()
    );
    merged
}

// ---------------------------------------------------------------------------
// Name normalization
// ---------------------------------------------------------------------------

/// Normalize a player name for cross-source matching: lowercase, common
/// Latin diacritics folded, whitespace collapsed.
pub fn normalize_name(name: &str) -> String {
    name.split_whitespace()
        .map(|word| word.to_lowercase().chars().map(fold_diacritic).collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

fn fold_diacritic(c: char) -> char {
    match c {
        'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' | 'ā' | 'ă' | 'ą' => 'a',
        'ç' | 'ć' | 'č' => 'c',
        'ď' | 'đ' => 'd',
        'é' | 'è' | 'ê' | 'ë' | 'ē' | 'ė' | 'ę' | 'ě' => 'e',
        'ğ' => 'g',
        'í' | 'ì' | 'î' | 'ï' | 'ī' => 'i',
        'ł' | 'ľ' => 'l',
        'ñ' | 'ń' | 'ň' => 'n',
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' | 'ø' | 'ō' => 'o',
        'ř' => 'r',
        'ś' | 'š' | 'ş' => 's',
        'ţ' | 'ť' => 't',
        'ú' | 'ù' | 'û' | 'ü' | 'ū' | 'ů' => 'u',
        'ý' | 'ÿ' => 'y',
        'ź' | 'ż' | 'ž' => 'z',
        other => other,
    }
}

// ---------------------------------------------------------------------------
// Traded-player deduplication
// ---------------------------------------------------------------------------

/// Team codes used for a traded player's combined season row.
const COMBINED_TEAM_CODES: &[&str] = &["TOT", "2TM", "3TM", "4TM"];

fn is_combined_row(line: &PlayerStatLine) -> bool {
    COMBINED_TEAM_CODES.contains(&line.team.as_str())
}

/// Collapse a traded player's per-team rows into one.
///
/// A combined-season row always wins. Without one, the row with the most
/// games is kept (the earlier row on a tie). First-seen order is preserved.
pub fn dedupe_traded_players(lines: Vec<PlayerStatLine>) -> Vec<PlayerStatLine> {
    let mut kept: Vec<PlayerStatLine> = Vec::with_capacity(lines.len());
    let mut index: HashMap<String, usize> = HashMap::new();

    for line in lines {
        match index.get(&line.name) {
            None => {
                index.insert(line.name.clone(), kept.len());
                kept.push(line);
            }
            Some(&i) => {
                let existing = &kept[i];
                let replace = is_combined_row(&line)
                    || (!is_combined_row(existing) && line.games > existing.games);
                if replace {
                    debug!("replacing '{}' row {} with {}", line.name, existing.team, line.team);
                    kept[i] = line;
                }
            }
        }
    }

    kept
}

// ---------------------------------------------------------------------------
// Raw CSV serde structs (private)
// ---------------------------------------------------------------------------

/// Per-game season row in basketball-reference column naming. Columns the
/// engine does not use (Rk, Age, FG%, ...) are ignored. Missing cells read
/// as 0.
#[derive(Debug, Deserialize)]
struct RawPerGameRow {
    #[serde(rename = "Player", alias = "Name")]
    name: String,
    #[serde(rename = "Team", alias = "Tm", default)]
    team: String,
    #[serde(rename = "Pos", default)]
    position: String,
    #[serde(rename = "G")]
    games: f64,
    #[serde(rename = "MP")]
    minutes: Option<f64>,
    #[serde(rename = "PTS")]
    points: Option<f64>,
    #[serde(rename = "TRB", alias = "REB")]
    rebounds: Option<f64>,
    #[serde(rename = "AST")]
    assists: Option<f64>,
    #[serde(rename = "STL")]
    steals: Option<f64>,
    #[serde(rename = "BLK")]
    blocks: Option<f64>,
    #[serde(rename = "3P", alias = "3PM")]
    threes: Option<f64>,
    #[serde(rename = "TOV", alias = "TO")]
    turnovers: Option<f64>,
    #[serde(rename = "FG", alias = "FGM")]
    fgm: Option<f64>,
    #[serde(rename = "FGA")]
    fga: Option<f64>,
    #[serde(rename = "FT", alias = "FTM")]
    ftm: Option<f64>,
    #[serde(rename = "FTA")]
    fta: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawAdpRow {
    #[serde(rename = "Name", alias = "Player")]
    name: String,
    #[serde(rename = "ADP")]
    adp: f64,
}

/// Returns true if all given f64 values are finite (not NaN or Infinity).
fn all_finite(values: &[f64]) -> bool {
    values.iter().all(|v| v.is_finite())
}

// ---------------------------------------------------------------------------
// Reader-based loaders (enable testing without temp files)
// ---------------------------------------------------------------------------

/// Header names a stat CSV must carry; each inner slice lists accepted
/// spellings of one column.
const REQUIRED_STAT_COLUMNS: &[&[&str]] = &[&["Player", "Name"], &["G"]];

const REQUIRED_ADP_COLUMNS: &[&[&str]] = &[&["Name", "Player"], &["ADP"]];

fn csv_error(label: &str, source: csv::Error) -> SourceError {
    SourceError::Csv {
        path: label.to_string(),
        source,
    }
}

/// Read the header row and fail on any required column that is absent.
fn check_headers<R: Read>(
    reader: &mut csv::Reader<R>,
    required: &[&[&str]],
    label: &str,
) -> Result<(), SourceError> {
    let headers = reader.headers().map_err(|e| csv_error(label, e))?;
    for names in required {
        if !names.iter().any(|n| headers.iter().any(|h| h.trim() == *n)) {
            return Err(SourceError::Validation(format!(
                "{label} is missing required column '{}'",
                names[0]
            )));
        }
    }
    Ok(())
}

/// Malformed rows are skipped; an I/O failure mid-file aborts the load.
fn load_stat_lines_from_reader<R: Read>(
    rdr: R,
    label: &str,
) -> Result<Vec<PlayerStatLine>, SourceError> {
    let mut reader = csv::Reader::from_reader(rdr);
    check_headers(&mut reader, REQUIRED_STAT_COLUMNS, label)?;
    let mut lines = Vec::new();
    for result in reader.deserialize::<RawPerGameRow>() {
        match result {
            Ok(raw) => {
                let name = raw.name.trim().to_string();
                let line = PlayerStatLine {
                    team: raw.team.trim().to_string(),
                    position: raw.position.trim().to_string(),
                    games: 0,
                    minutes: raw.minutes.unwrap_or(0.0),
                    points: raw.points.unwrap_or(0.0),
                    rebounds: raw.rebounds.unwrap_or(0.0),
                    assists: raw.assists.unwrap_or(0.0),
                    steals: raw.steals.unwrap_or(0.0),
                    blocks: raw.blocks.unwrap_or(0.0),
                    threes: raw.threes.unwrap_or(0.0),
                    turnovers: raw.turnovers.unwrap_or(0.0),
                    fgm: raw.fgm.unwrap_or(0.0),
                    fga: raw.fga.unwrap_or(0.0),
                    ftm: raw.ftm.unwrap_or(0.0),
                    fta: raw.fta.unwrap_or(0.0),
                    adp: None,
                    name,
                };
                let numbers = [
                    raw.games,
                    line.minutes,
                    line.points,
                    line.rebounds,
                    line.assists,
                    line.steals,
                    line.blocks,
                    line.threes,
                    line.turnovers,
                    line.fgm,
                    line.fga,
                    line.ftm,
                    line.fta,
                ];
                if !all_finite(&numbers) || raw.games < 0.0 {
                    warn!("skipping '{}': non-finite or negative stat value", line.name);
                    continue;
                }
                if line.name.is_empty() {
                    warn!("skipping stat row with empty player name");
                    continue;
                }
                lines.push(PlayerStatLine {
                    games: raw.games.round() as u32,
                    ..line
                });
            }
            Err(e) if e.is_io_error() => return Err(csv_error(label, e)),
            Err(e) => {
                warn!("skipping malformed stat row: {}", e);
            }
        }
    }
    Ok(lines)
}

fn load_adp_from_reader<R: Read>(rdr: R, label: &str) -> Result<AdpBoard, SourceError> {
    let mut reader = csv::Reader::from_reader(rdr);
    check_headers(&mut reader, REQUIRED_ADP_COLUMNS, label)?;
    let mut pairs: Vec<(String, f64)> = Vec::new();
    let mut seen: HashMap<String, usize> = HashMap::new();

    for result in reader.deserialize::<RawAdpRow>() {
        match result {
            Ok(raw) => {
                let name = raw.name.trim().to_string();
                if !raw.adp.is_finite() {
                    warn!("skipping ADP entry for '{}': non-finite value", name);
                    continue;
                }
                let key = normalize_name(&name);
                if let Some(&i) = seen.get(&key) {
                    warn!("duplicate ADP entry for '{}', using latest value", name);
                    pairs[i].1 = raw.adp;
                } else {
                    seen.insert(key, pairs.len());
                    pairs.push((name, raw.adp));
                }
            }
            Err(e) if e.is_io_error() => return Err(csv_error(label, e)),
            Err(e) => {
                warn!("skipping malformed ADP row: {}", e);
            }
        }
    }

    Ok(AdpBoard::from_pairs(pairs))
}

async fn read_bytes(path: &Path) -> Result<Vec<u8>, SourceError> {
    tokio::fs::read(path).await.map_err(|e| SourceError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

// ---------------------------------------------------------------------------
// File-backed sources
// ---------------------------------------------------------------------------

/// Stat lines from a per-game CSV export.
#[derive(Debug, Clone)]
pub struct CsvStatSource {
    label: String,
    path: PathBuf,
}

impl CsvStatSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        CsvStatSource {
            label: path.display().to_string(),
            path,
        }
    }
}

#[async_trait]
impl StatSource for CsvStatSource {
    fn name(&self) -> &str {
        &self.label
    }

    async fn fetch_stat_lines(&self) -> Result<Vec<PlayerStatLine>, SourceError> {
        let bytes = read_bytes(&self.path).await?;
        let lines = load_stat_lines_from_reader(bytes.as_slice(), &self.label)?;
        if lines.is_empty() {
            return Err(SourceError::Validation(format!(
                "{} produced zero valid stat rows",
                self.label
            )));
        }
        Ok(dedupe_traded_players(lines))
    }
}

/// ADP from a `Name,ADP` CSV.
#[derive(Debug, Clone)]
pub struct CsvAdpSource {
    label: String,
    path: PathBuf,
}

impl CsvAdpSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        CsvAdpSource {
            label: path.display().to_string(),
            path,
        }
    }
}

#[async_trait]
impl AdpSource for CsvAdpSource {
    fn name(&self) -> &str {
        &self.label
    }

    async fn fetch_adp(&self) -> Result<AdpBoard, SourceError> {
        let bytes = read_bytes(&self.path).await?;
        load_adp_from_reader(bytes.as_slice(), &self.label)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
