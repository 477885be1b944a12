// Load the configured data sources and build the player pool for a run.

use anyhow::Context;
use tracing::{info, warn};

use courtcast_core::config::Config;
use courtcast_core::source::{
    fetch_stats_with_fallback, merge_adp, AdpBoard, AdpSource, CsvAdpSource, CsvStatSource,
    DataOrigin, StatSource,
};
use courtcast_core::stats::PlayerStatLine;

/// Stat lines with ADP attached, plus where they came from.
#[derive(Debug, Clone)]
pub struct PlayerPool {
    pub players: Vec<PlayerStatLine>,
    pub origin: DataOrigin,
    /// Name of the stat source that answered.
    pub stats_source: String,
    /// Number of ADP board entries; 0 when ADP could not be loaded.
    pub adp_entries: usize,
}

/// Read stats (primary, then the configured fallback) and ADP from disk.
///
/// Stat loading failures are fatal. ADP is optional: if it cannot be read
/// the pool is valued on statistics alone.
pub async fn load_player_pool(config: &Config) -> anyhow::Result<PlayerPool> {
    let primary = CsvStatSource::new(config.resolve_path(&config.data_paths.stats));
    let fallback = config
        .data_paths
        .fallback_stats
        .as_deref()
        .map(|p| CsvStatSource::new(config.resolve_path(p)));

    let mut sources: Vec<&dyn StatSource> = Vec::with_capacity(2);
    sources.push(&primary);
    if let Some(fb) = &fallback {
        sources.push(fb);
    }

    let sourced = fetch_stats_with_fallback(&sources)
        .await
        .context("failed to load player stats")?;
    let stats_source = match &sourced.origin {
        DataOrigin::Primary => primary.name().to_string(),
        DataOrigin::Fallback(name) => name.clone(),
    };
    if sourced.origin.is_fallback() {
        warn!("valuing fallback data from {}", stats_source);
    }

    let adp_source = CsvAdpSource::new(config.resolve_path(&config.data_paths.adp));
    let board = match adp_source.fetch_adp().await {
        Ok(board) => board,
        Err(e) => {
            warn!("ADP unavailable, valuing on statistics only: {}", e);
            AdpBoard::default()
        }
    };

    let players = merge_adp(&sourced.data, &board);
    info!(
        "player pool ready: {} players from {} at {}",
        players.len(),
        stats_source,
        sourced.fetched_at.format("%Y-%m-%d %H:%M:%S UTC")
    );

    Ok(PlayerPool {
        players,
        origin: sourced.origin,
        stats_source,
        adp_entries: board.len(),
    })
}
