// Valuation engine: z-scores, replacement baseline, auction dollars,
// ADP market blend, rank reconciliation.

pub mod auction;
pub mod blend;
pub mod market;
pub mod position;
pub mod rank;
pub mod replacement;
pub mod zscore;

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, info};

use courtcast_core::category::Category;
use courtcast_core::config::ValuationConfig;
use courtcast_core::stats::PlayerStatLine;

use self::position::{normalize_position, PositionGroup};

/// Final valuation for one player in the pool.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValuationResult {
    pub stats: PlayerStatLine,
    pub position_group: PositionGroup,
    /// Weighted z-score sum plus specialist bonus.
    pub total_score: f64,
    /// Unweighted z-scores for the categories that were not punted.
    pub category_scores: BTreeMap<Category, f64>,
    /// Dollars from statistics alone.
    pub stat_value: u32,
    /// Dollars implied by ADP rank alone.
    pub market_value: u32,
    /// Final dollars after the market blend and inflation.
    pub auction_value: u32,
    pub value_rank: u32,
    pub blend_rank: u32,
}

impl ValuationResult {
    pub fn name(&self) -> &str {
        &self.stats.name
    }

    pub fn adp_rank(&self) -> Option<u32> {
        self.stats.adp_rank()
    }
}

/// Indices of `values` ordered from largest to smallest. Stable, so equal
/// values keep input order.
pub(crate) fn order_desc(values: &[f64]) -> Vec<usize> {
    let mut idx: Vec<usize> = (0..values.len()).collect();
    idx.sort_by(|&a, &b| values[b].partial_cmp(&values[a]).unwrap_or(Ordering::Equal));
    idx
}

/// Value a pool of players under one league configuration.
///
/// Players with no games, or fewer than `min_games`, are dropped before any
/// pool statistic is computed. The result is sorted by `value_rank`.
pub fn compute_valuations(
    players: &[PlayerStatLine],
    config: &ValuationConfig,
) -> Vec<ValuationResult> {
    // ---- 1. Filter pool ----
    let pool: Vec<&PlayerStatLine> = players
        .iter()
        .filter(|p| p.games > 0 && p.games >= config.min_games)
        .collect();
    debug!(
        "valuation pool: {} of {} players (min_games={})",
        pool.len(),
        players.len(),
        config.min_games
    );
    if pool.is_empty() {
        info!("no eligible players, nothing to value");
        return Vec::new();
    }

    // ---- 2. Category scores ----
    let profile = config.weight_profile();
    let scored = zscore::score_players(&pool, &profile);
    let totals: Vec<f64> = scored.iter().map(|s| s.total_score).collect();

    // ---- 3. Replacement baseline + statistical dollars ----
    let baseline = replacement::replacement_level(&totals, config.rostered_players());
    debug!("replacement baseline: {:.3}", baseline);
    let stat_values = auction::allocate_dollars(&totals, baseline, config);

    // ---- 4. Market blend + inflation ----
    let aggressiveness = blend::punt_aggressiveness(&profile);
    let effective = blend::effective_adp_weight(config.adp_weight, aggressiveness);
    debug!(
        "punt aggressiveness {:.2}, effective ADP weight {:.3}",
        aggressiveness, effective
    );

    let adp_ranks: Vec<Option<u32>> = pool.iter().map(|p| p.adp_rank()).collect();
    let cutoff = config.budget_roster_spots();
    let market_values: Vec<u32> = adp_ranks
        .iter()
        .map(|&r| market::market_value(r, cutoff, config.budget))
        .collect();
    let auction_values: Vec<u32> = stat_values
        .iter()
        .zip(&market_values)
        .zip(&adp_ranks)
        .map(|((&stat, &market), &adp)| {
            let blended = blend::blend_value(stat, market, adp, effective);
            auction::apply_inflation(blended, config.inflation_rate)
        })
        .collect();

    // ---- 5. Ranks ----
    let ranks = rank::reconcile_ranks(&auction_values, &adp_ranks);

    let mut results: Vec<ValuationResult> = pool
        .iter()
        .zip(scored)
        .enumerate()
        .map(|(i, (line, score))| ValuationResult {
            stats: (*line).clone(),
            position_group: normalize_position(&line.position),
            total_score: score.total_score,
            category_scores: score.raw_scores(),
            stat_value: stat_values[i],
            market_value: market_values[i],
            auction_value: auction_values[i],
            value_rank: ranks.value_rank[i],
            blend_rank: ranks.blend_rank[i],
        })
        .collect();
    results.sort_by_key(|r| r.value_rank);

    info!(
        "valued {} players ({} with ADP), top: {} ${}",
        results.len(),
        adp_ranks.iter().filter(|r| r.is_some()).count(),
        results[0].name(),
        results[0].auction_value
    );

    results
}
