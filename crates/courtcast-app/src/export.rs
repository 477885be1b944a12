// CSV and JSON export of a valuation run.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use courtcast_basketball::valuation::ValuationResult;
use courtcast_core::category::Category;

use crate::cli::ExportFormat;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV export error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON export error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One exported row. Category z-scores are empty for punted categories.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportRow {
    pub value_rank: u32,
    pub blend_rank: u32,
    pub name: String,
    pub team: String,
    pub position: String,
    pub games: u32,
    pub auction_value: u32,
    pub stat_value: u32,
    pub market_value: u32,
    pub adp: Option<f64>,
    pub adp_rank: Option<u32>,
    pub total_score: f64,
    pub points_z: Option<f64>,
    pub rebounds_z: Option<f64>,
    pub assists_z: Option<f64>,
    pub steals_z: Option<f64>,
    pub blocks_z: Option<f64>,
    pub threes_z: Option<f64>,
    pub fg_pct_z: Option<f64>,
    pub ft_pct_z: Option<f64>,
    pub turnovers_z: Option<f64>,
}

impl From<&ValuationResult> for ExportRow {
    fn from(r: &ValuationResult) -> Self {
        let z = |cat: Category| r.category_scores.get(&cat).copied();
        ExportRow {
            value_rank: r.value_rank,
            blend_rank: r.blend_rank,
            name: r.stats.name.clone(),
            team: r.stats.team.clone(),
            position: r.position_group.to_string(),
            games: r.stats.games,
            auction_value: r.auction_value,
            stat_value: r.stat_value,
            market_value: r.market_value,
            adp: r.stats.adp.map(|a| a.adp),
            adp_rank: r.adp_rank(),
            total_score: r.total_score,
            points_z: z(Category::Points),
            rebounds_z: z(Category::Rebounds),
            assists_z: z(Category::Assists),
            steals_z: z(Category::Steals),
            blocks_z: z(Category::Blocks),
            threes_z: z(Category::Threes),
            fg_pct_z: z(Category::FgPct),
            ft_pct_z: z(Category::FtPct),
            turnovers_z: z(Category::Turnovers),
        }
    }
}

pub fn to_rows(results: &[ValuationResult]) -> Vec<ExportRow> {
    results.iter().map(ExportRow::from).collect()
}

/// Write results as CSV with a header row.
pub fn write_csv<W: Write>(writer: W, results: &[ValuationResult]) -> Result<(), ExportError> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in to_rows(results) {
        wtr.serialize(row)?;
    }
    wtr.flush().map_err(|e| ExportError::Io {
        path: "<csv writer>".into(),
        source: e,
    })?;
    Ok(())
}

/// Write results as a pretty-printed JSON array.
pub fn write_json<W: Write>(writer: W, results: &[ValuationResult]) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(writer, &to_rows(results))?;
    Ok(())
}

/// `nba_auction_values_YYYYMMDD.<ext>`
pub fn export_file_name(format: ExportFormat, date: NaiveDate) -> String {
    format!(
        "nba_auction_values_{}.{}",
        date.format("%Y%m%d"),
        format.extension()
    )
}

fn io_err(path: &Path) -> impl FnOnce(std::io::Error) -> ExportError {
    let path = path.display().to_string();
    move |source| ExportError::Io { path, source }
}

/// Write results into `dir`, creating it if needed. Returns the file path.
pub fn write_export(
    dir: &Path,
    format: ExportFormat,
    date: NaiveDate,
    results: &[ValuationResult],
) -> Result<PathBuf, ExportError> {
    std::fs::create_dir_all(dir).map_err(io_err(dir))?;
    let path = dir.join(export_file_name(format, date));
    let file = File::create(&path).map_err(io_err(&path))?;
    let mut writer = BufWriter::new(file);

    match format {
        ExportFormat::Csv => write_csv(&mut writer, results)?,
        ExportFormat::Json => write_json(&mut writer, results)?,
    }
    writer.flush().map_err(io_err(&path))?;

    info!("exported {} players to {}", results.len(), path.display());
    Ok(path)
}
