// Category z-scores with punt and emphasis weighting.

use serde::Serialize;
use std::collections::BTreeMap;

use courtcast_core::category::{Category, CategoryWeightProfile};
use courtcast_core::stats::PlayerStatLine;

// ---------------------------------------------------------------------------
// Pool statistics
// ---------------------------------------------------------------------------

/// Mean and standard deviation for a single statistical category across a player pool.
#[derive(Debug, Clone, Copy)]
pub struct PoolStats {
    pub mean: f64,
    pub stdev: f64,
}

/// Threshold below which standard deviation is treated as zero.
const STDEV_EPSILON: f64 = 1e-9;

/// Offset added to shot attempts so zero-attempt players score 0%.
pub const PERCENTAGE_EPSILON: f64 = 1e-6;

/// Weights below this shrink quadratically.
pub const DEEMPHASIS_THRESHOLD: f64 = 0.5;

/// Weights above this grow as `w^1.5`.
pub const EMPHASIS_THRESHOLD: f64 = 1.5;

/// Weights at or above this earn the specialist bonus.
pub const SPECIALIST_WEIGHT: f64 = 1.5;

/// Raw z-score a player must exceed to earn the specialist bonus.
pub const SPECIALIST_Z: f64 = 1.5;

/// Share of the excess z-score paid out as bonus (before the weight).
pub const SPECIALIST_RATE: f64 = 0.5;

/// Compute mean and standard deviation for a slice of values.
///
/// Returns `PoolStats { mean: 0.0, stdev: 0.0 }` for an empty slice.
/// Uses the population standard deviation (N denominator), since the pool
/// represents the full relevant player universe rather than a sample.
pub fn compute_pool_stats(values: &[f64]) -> PoolStats {
    if values.is_empty() {
        return PoolStats {
            mean: 0.0,
            stdev: 0.0,
        };
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    PoolStats {
        mean,
        stdev: variance.sqrt(),
    }
}

/// Compute a z-score given a value and pool stats.
///
/// Returns 0.0 if the standard deviation is approximately zero (guarding
/// against division by zero).
pub fn compute_zscore(value: f64, stats: &PoolStats) -> f64 {
    if stats.stdev < STDEV_EPSILON {
        return 0.0;
    }
    (value - stats.mean) / stats.stdev
}

// ---------------------------------------------------------------------------
// Category series and weighting
// ---------------------------------------------------------------------------

/// The number a category is scored on for one player.
///
/// Counting stats use per-game rates, shooting uses season makes over
/// attempts, and turnovers are negated so fewer is better.
pub fn category_value(line: &PlayerStatLine, category: Category) -> f64 {
    match category {
        Category::FgPct => line.total_fgm() / (line.total_fga() + PERCENTAGE_EPSILON),
        Category::FtPct => line.total_ftm() / (line.total_fta() + PERCENTAGE_EPSILON),
        Category::Turnovers => -line.turnovers,
        counting => line.per_game(counting),
    }
}

/// Apply the nonlinear emphasis curve to a raw z-score.
pub fn scale_weighted(raw: f64, weight: f64) -> f64 {
    if weight < DEEMPHASIS_THRESHOLD {
        raw * weight * weight
    } else if weight > EMPHASIS_THRESHOLD {
        raw * weight.powf(1.5)
    } else {
        raw * weight
    }
}

/// Extra credit for being elite in a category the user is emphasizing.
///
/// The weight is applied here on top of the emphasis curve, so an
/// emphasized specialist is rewarded twice. Kept as tuned.
pub fn specialist_bonus(raw: f64, weight: f64) -> f64 {
    if weight < SPECIALIST_WEIGHT {
        return 0.0;
    }
    (raw - SPECIALIST_Z).max(0.0) * SPECIALIST_RATE * weight
}

// ---------------------------------------------------------------------------
// Scored players
// ---------------------------------------------------------------------------

/// Display z-score and aggregation z-score for one (player, category).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CategoryScore {
    pub raw: f64,
    pub weighted: f64,
}

/// Category scores for one player, aligned by index with the scored pool.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredPlayer {
    /// Only categories that survived punting appear here.
    pub scores: BTreeMap<Category, CategoryScore>,
    pub specialist_bonus: f64,
    pub total_score: f64,
}

impl ScoredPlayer {
    /// Raw z-scores for display.
    pub fn raw_scores(&self) -> BTreeMap<Category, f64> {
        self.scores.iter().map(|(&c, s)| (c, s.raw)).collect()
    }
}

/// Score every player against the pool they belong to.
///
/// The returned vector is index-aligned with `players`. Pool statistics
/// come from exactly this set, so results must be recomputed whenever the
/// set or the profile changes.
pub fn score_players(
    players: &[&PlayerStatLine],
    profile: &CategoryWeightProfile,
) -> Vec<ScoredPlayer> {
    let mut scored: Vec<ScoredPlayer> = players
        .iter()
        .map(|_| ScoredPlayer {
            scores: BTreeMap::new(),
            specialist_bonus: 0.0,
            total_score: 0.0,
        })
        .collect();

    for category in profile.included() {
        let weight = profile.resolve(category);
        let series: Vec<f64> = players
            .iter()
            .map(|p| category_value(p, category))
            .collect();
        let stats = compute_pool_stats(&series);

        for (player, value) in scored.iter_mut().zip(&series) {
            let raw = compute_zscore(*value, &stats);
            let weighted = scale_weighted(raw, weight);
            player.scores.insert(category, CategoryScore { raw, weighted });
            player.specialist_bonus += specialist_bonus(raw, weight);
        }
    }

    for player in scored.iter_mut() {
        let weighted_sum: f64 = player.scores.values().map(|s| s.weighted).sum();
        player.total_score = weighted_sum + player.specialist_bonus;
    }

    scored
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    fn player(points: f64, turnovers: f64) -> PlayerStatLine {
        PlayerStatLine {
            name: format!("P{points}"),
            games: 50,
            points,
            turnovers,
            fgm: 5.0,
            fga: 10.0,
            ftm: 4.0,
            fta: 5.0,
            ..Default::default()
        }
    }

    /// Profile with every category except `keep` fully punted.
    fn only(keep: Category, weight: f64) -> CategoryWeightProfile {
        let punted: BTreeSet<Category> = Category::ALL
            .into_iter()
            .filter(|&c| c != keep)
            .collect();
        let mut weights = BTreeMap::new();
        weights.insert(keep, weight);
        CategoryWeightProfile::new(weights, punted)
    }

    // ---- Pool stats ----

    #[test]
    fn pool_stats_population_stdev() {
        let stats = compute_pool_stats(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert!(approx_eq(stats.mean, 5.0, 1e-12));
        assert!(approx_eq(stats.stdev, 2.0, 1e-12));
    }

    #[test]
    fn pool_stats_empty_slice() {
        let stats = compute_pool_stats(&[]);
        assert_eq!(stats.mean, 0.0);
        assert_eq!(stats.stdev, 0.0);
    }

    #[test]
    fn zscore_zero_stdev_is_zero() {
        let stats = PoolStats {
            mean: 3.0,
            stdev: 0.0,
        };
        assert_eq!(compute_zscore(10.0, &stats), 0.0);
    }

    // ---- Weighting curve ----

    #[test]
    fn deemphasis_is_quadratic() {
        assert!(approx_eq(scale_weighted(2.0, 0.25), 0.125, 1e-12));
        assert!(approx_eq(scale_weighted(-1.0, 0.3), -0.09, 1e-12));
    }

    #[test]
    fn middle_band_is_linear() {
        assert!(approx_eq(scale_weighted(2.0, 0.5), 1.0, 1e-12));
        assert!(approx_eq(scale_weighted(2.0, 1.0), 2.0, 1e-12));
        assert!(approx_eq(scale_weighted(2.0, 1.5), 3.0, 1e-12));
    }

    #[test]
    fn emphasis_grows_as_power_one_and_a_half() {
        assert!(approx_eq(scale_weighted(2.0, 4.0), 16.0, 1e-12));
        assert!(approx_eq(scale_weighted(2.0, 2.0), 2.0 * 8f64.sqrt(), 1e-12));
    }

    #[test]
    fn specialist_bonus_needs_weight_and_excess() {
        assert!(approx_eq(specialist_bonus(2.5, 2.0), 1.0, 1e-12));
        assert!(approx_eq(specialist_bonus(3.5, 1.5), 1.5, 1e-12));
        assert_eq!(specialist_bonus(1.4, 2.0), 0.0);
        assert_eq!(specialist_bonus(3.0, 1.0), 0.0);
    }

    // ---- Category series ----

    #[test]
    fn percentages_use_season_totals_with_epsilon() {
        let mut p = player(10.0, 1.0);
        p.fga = 0.0;
        p.fgm = 0.0;
        assert_eq!(category_value(&p, Category::FgPct), 0.0);

        let q = player(10.0, 1.0);
        assert!(approx_eq(category_value(&q, Category::FgPct), 0.5, 1e-6));
        assert!(approx_eq(category_value(&q, Category::FtPct), 0.8, 1e-6));
    }

    #[test]
    fn turnovers_are_negated() {
        let p = player(10.0, 3.5);
        assert_eq!(category_value(&p, Category::Turnovers), -3.5);
    }

    // ---- Scoring ----

    #[test]
    fn elite_emphasized_player_gets_curve_and_bonus() {
        let lines: Vec<PlayerStatLine> = [10.0, 10.0, 10.0, 10.0, 50.0]
            .into_iter()
            .map(|pts| player(pts, 2.0))
            .collect();
        let refs: Vec<&PlayerStatLine> = lines.iter().collect();

        let scored = score_players(&refs, &only(Category::Points, 2.0));

        // mean 18, stdev 16: elite raw = 2.0, others = -0.5
        let elite = &scored[4];
        let pts = elite.scores[&Category::Points];
        assert!(approx_eq(pts.raw, 2.0, 1e-9));
        assert!(approx_eq(pts.weighted, 2.0 * 8f64.sqrt(), 1e-9));
        assert!(approx_eq(elite.specialist_bonus, 0.5, 1e-9));
        assert!(approx_eq(elite.total_score, 2.0 * 8f64.sqrt() + 0.5, 1e-9));

        let other = &scored[0];
        assert!(approx_eq(other.scores[&Category::Points].raw, -0.5, 1e-9));
        assert_eq!(other.specialist_bonus, 0.0);
        assert!(approx_eq(other.total_score, -0.5 * 8f64.sqrt(), 1e-9));
    }

    #[test]
    fn zero_variance_category_scores_zero() {
        // Nobody blocks a shot.
        let lines = vec![player(10.0, 1.0), player(20.0, 2.0), player(30.0, 3.0)];
        let refs: Vec<&PlayerStatLine> = lines.iter().collect();

        let scored = score_players(&refs, &CategoryWeightProfile::default());
        for p in &scored {
            let blk = p.scores[&Category::Blocks];
            assert_eq!(blk.raw, 0.0);
            assert_eq!(blk.weighted, 0.0);
            assert!(p.total_score.is_finite());
        }
    }

    #[test]
    fn punted_category_has_no_column_and_no_contribution() {
        let lines = vec![player(10.0, 1.0), player(20.0, 2.0), player(30.0, 3.0)];
        let refs: Vec<&PlayerStatLine> = lines.iter().collect();

        let mut profile = CategoryWeightProfile::default();
        profile.weights.insert(Category::Points, 0.0);
        let scored = score_players(&refs, &profile);

        for p in &scored {
            assert!(!p.scores.contains_key(&Category::Points));
            assert!(p.scores.contains_key(&Category::Turnovers));
        }
        // Points and turnovers are perfectly correlated here; with points gone
        // the low-turnover player leads.
        assert!(scored[0].total_score > scored[2].total_score);
    }

    #[test]
    fn fewer_turnovers_score_higher() {
        let lines = vec![player(10.0, 1.0), player(10.0, 4.0)];
        let refs: Vec<&PlayerStatLine> = lines.iter().collect();

        let scored = score_players(&refs, &only(Category::Turnovers, 1.0));
        assert!(scored[0].scores[&Category::Turnovers].raw > 0.0);
        assert!(scored[1].scores[&Category::Turnovers].raw < 0.0);
    }

    #[test]
    fn raw_scores_unaffected_by_weight() {
        let lines = vec![player(10.0, 1.0), player(25.0, 2.0), player(30.0, 3.0)];
        let refs: Vec<&PlayerStatLine> = lines.iter().collect();

        let base = score_players(&refs, &only(Category::Points, 1.0));
        let heavy = score_players(&refs, &only(Category::Points, 3.0));
        for (a, b) in base.iter().zip(&heavy) {
            assert_eq!(a.raw_scores(), b.raw_scores());
        }
    }

    #[test]
    fn empty_pool_scores_nothing() {
        let scored = score_players(&[], &CategoryWeightProfile::default());
        assert!(scored.is_empty());
    }
}
