// Auction dollar value conversion.
//
// Converts value above replacement (VAR) into auction dollars for a
// salary-cap draft. Every budget-roster slot reserves $1, and the remaining
// dollars are distributed proportionally to VAR across the top of the pool.

use courtcast_core::config::ValuationConfig;
use tracing::debug;

use super::order_desc;

/// How many of the highest-VAR players get the elite boost.
pub const ELITE_BOOST_COUNT: usize = 80;

/// Multiplier applied to elite VAR.
pub const ELITE_BOOST: f64 = 1.5;

// ---------------------------------------------------------------------------
// AuctionValues struct
// ---------------------------------------------------------------------------

/// League-wide conversion factors for turning VAR into auction dollars.
#[derive(Debug, Clone, Copy)]
pub struct AuctionValues {
    /// Dollars left after reserving $1 for every budget-roster slot.
    pub total_dollars: f64,
    /// Boosted VAR summed over the top `budget_slots` players.
    pub total_var: f64,
    /// Dollars per unit of boosted VAR. 0 when nobody is above replacement.
    pub dollars_per_var: f64,
}

// ---------------------------------------------------------------------------
// VAR
// ---------------------------------------------------------------------------

/// Value above replacement, floored at 0.
pub fn value_above_replacement(total_scores: &[f64], baseline: f64) -> Vec<f64> {
    total_scores
        .iter()
        .map(|s| (s - baseline).max(0.0))
        .collect()
}

/// Multiply the VAR of the `ELITE_BOOST_COUNT` highest-VAR players by
/// `ELITE_BOOST`. Ties at the boundary go to the earlier player.
pub fn boost_elite(var: &mut [f64]) {
    for i in order_desc(var).into_iter().take(ELITE_BOOST_COUNT) {
        var[i] *= ELITE_BOOST;
    }
}

// ---------------------------------------------------------------------------
// Core computation
// ---------------------------------------------------------------------------

/// Compute the league-wide auction dollar conversion factors.
///
/// Algorithm:
/// 1. `total_dollars` = `league_budget - budget_slots`
/// 2. `total_var` = sum of the `budget_slots` largest (boosted) VARs
/// 3. `dollars_per_var` = `total_dollars / total_var`, or 0 when
///    `total_var` is 0 so that every player lands on the $1 floor.
pub fn compute_auction_values(
    var: &[f64],
    budget_slots: usize,
    league_budget: f64,
) -> AuctionValues {
    let total_dollars = (league_budget - budget_slots as f64).max(0.0);

    let total_var: f64 = order_desc(var)
        .into_iter()
        .take(budget_slots)
        .map(|i| var[i])
        .sum();

    let dollars_per_var = if total_var > 0.0 {
        total_dollars / total_var
    } else {
        0.0
    };

    AuctionValues {
        total_dollars,
        total_var,
        dollars_per_var,
    }
}

/// Dollar value for one player: `VAR * dollars_per_var + $1`, rounded,
/// never below $1.
pub fn player_dollar_value(var: f64, auction: &AuctionValues) -> u32 {
    let raw = var * auction.dollars_per_var + 1.0;
    raw.round().max(1.0) as u32
}

// ---------------------------------------------------------------------------
// Inflation
// ---------------------------------------------------------------------------

/// Mark a final dollar value up by `rate` percent, keeping the $1 floor.
pub fn apply_inflation(value: u32, rate: f64) -> u32 {
    if rate <= 0.0 {
        return value;
    }
    (value as f64 * (1.0 + rate / 100.0)).round().max(1.0) as u32
}

// ---------------------------------------------------------------------------
// Pipeline entry point
// ---------------------------------------------------------------------------

/// Statistical dollar values for every player, index-aligned with
/// `total_scores`. Dollars are spread over `config.budget_roster_spots()`.
pub fn allocate_dollars(total_scores: &[f64], baseline: f64, config: &ValuationConfig) -> Vec<u32> {
    let mut var = value_above_replacement(total_scores, baseline);
    boost_elite(&mut var);

    let league_budget = config.league_teams as f64 * config.budget as f64;
    let auction = compute_auction_values(&var, config.budget_roster_spots(), league_budget);
    debug!(
        "auction: ${:.0} over {:.3} VAR = ${:.3}/VAR",
        auction.total_dollars,
        auction.total_var,
        auction.dollars_per_var
    );

    var.iter()
        .map(|&v| player_dollar_value(v, &auction))
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    fn league(teams: usize) -> ValuationConfig {
        ValuationConfig {
            league_teams: teams,
            ..Default::default()
        }
    }

    #[test]
    fn var_floors_at_zero() {
        let var = value_above_replacement(&[5.0, 1.0, -3.0], 1.0);
        assert_eq!(var, vec![4.0, 0.0, 0.0]);
    }

    #[test]
    fn boost_hits_only_the_top_eighty() {
        let mut var: Vec<f64> = (0..100).map(|i| 100.0 - i as f64).collect();
        boost_elite(&mut var);
        assert!(approx_eq(var[0], 150.0, 1e-9));
        assert!(approx_eq(var[79], 21.0 * 1.5, 1e-9));
        assert!(approx_eq(var[80], 20.0, 1e-9));
        assert!(approx_eq(var[99], 1.0, 1e-9));
    }

    #[test]
    fn boost_boundary_ties_go_to_earlier_players() {
        let mut var = vec![1.0; 85];
        boost_elite(&mut var);
        assert!(var[..80].iter().all(|&v| approx_eq(v, 1.5, 1e-12)));
        assert!(var[80..].iter().all(|&v| approx_eq(v, 1.0, 1e-12)));
    }

    #[test]
    fn basic_auction_values() {
        // 156 slots, total_dollars = 2400 - 156 = 2244
        let var = vec![10.0, 6.0, 4.0, 0.0];
        let av = compute_auction_values(&var, 156, 2400.0);
        assert!(approx_eq(av.total_dollars, 2244.0, 1e-9));
        assert!(approx_eq(av.total_var, 20.0, 1e-9));
        assert!(approx_eq(av.dollars_per_var, 112.2, 1e-9));
    }

    #[test]
    fn total_var_counts_only_top_players() {
        let var: Vec<f64> = (0..20).map(|_| 1.0).collect();
        let av = compute_auction_values(&var, 13, 200.0);
        assert!(approx_eq(av.total_var, 13.0, 1e-9));
        assert!(approx_eq(av.total_dollars, 187.0, 1e-9));
    }

    #[test]
    fn player_dollar_value_rounds_and_floors() {
        let av = AuctionValues {
            total_dollars: 100.0,
            total_var: 10.0,
            dollars_per_var: 10.0,
        };
        assert_eq!(player_dollar_value(2.26, &av), 24);
        assert_eq!(player_dollar_value(0.0, &av), 1);
        assert_eq!(player_dollar_value(0.01, &av), 1);
    }

    #[test]
    fn degenerate_pool_is_all_one_dollar() {
        let values = allocate_dollars(&[2.0, 2.0, 2.0], 2.0, &league(12));
        assert_eq!(values, vec![1, 1, 1]);
    }

    #[test]
    fn budget_sum_sanity_check() {
        // 2 teams: 26 budget slots, $400 total, $374 distributable.
        let scores: Vec<f64> = (0..40).map(|i| 10.0 - i as f64 * 0.25).collect();
        let baseline = 10.0 - 30.0 * 0.25;
        let values = allocate_dollars(&scores, baseline, &league(2));

        let top_sum: u32 = values[..26].iter().sum();
        assert!(
            (top_sum as i64 - 400).abs() <= 13,
            "top 26 should sum to ~$400, got {top_sum}"
        );
        assert!(values.iter().all(|&v| v >= 1));
        assert!(values.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn dollars_spread_over_budget_slots_not_roster_size() {
        // 20 equal players, 1 team: only the 13 budget slots share $187,
        // even with a 20-man roster.
        let config = ValuationConfig {
            league_teams: 1,
            roster_size: 20,
            ..Default::default()
        };
        let values = allocate_dollars(&[3.0; 20], 1.0, &config);
        // VAR 2.0, boosted to 3.0; 3.0 * 187 / 39 + 1 = 15.38
        assert!(values.iter().all(|&v| v == 15), "got {values:?}");
    }

    #[test]
    fn inflation_scales_and_keeps_floor() {
        assert_eq!(apply_inflation(40, 10.0), 44);
        assert_eq!(apply_inflation(1, 10.0), 1);
        assert_eq!(apply_inflation(1, 60.0), 2);
        assert_eq!(apply_inflation(17, 0.0), 17);
    }
}
