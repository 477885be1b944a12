// Market-implied auction dollars from ADP rank alone.

/// One linear piece of the market curve, covering ranks up to and
/// including `rank_upper_bound`: `value = intercept + slope * rank`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurveSegment {
    pub rank_upper_bound: u32,
    pub slope: f64,
    pub intercept: f64,
}

/// Per-team budget the curve is calibrated against.
pub const REFERENCE_BUDGET: f64 = 200.0;

/// Typical auction prices by ADP rank for a $200 budget.
///
/// Continuous at every boundary: $55 at rank 1, $43 at 5, $23 at 10, $8 at
/// 20, $4 at 40, $2 at 80, $1 at 120.
pub const MARKET_CURVE: &[CurveSegment] = &[
    CurveSegment { rank_upper_bound: 5, slope: -3.0, intercept: 58.0 },
    CurveSegment { rank_upper_bound: 10, slope: -4.0, intercept: 63.0 },
    CurveSegment { rank_upper_bound: 20, slope: -1.5, intercept: 38.0 },
    CurveSegment { rank_upper_bound: 40, slope: -0.2, intercept: 12.0 },
    CurveSegment { rank_upper_bound: 80, slope: -0.05, intercept: 6.0 },
    CurveSegment { rank_upper_bound: 120, slope: -0.025, intercept: 4.0 },
];

/// Unscaled curve value at `rank`; $1 past the last segment.
pub fn curve_value(segments: &[CurveSegment], rank: u32) -> f64 {
    segments
        .iter()
        .find(|s| rank <= s.rank_upper_bound)
        .map(|s| s.intercept + s.slope * rank as f64)
        .unwrap_or(1.0)
        .max(1.0)
}

/// Market dollar value for a player's ADP rank.
///
/// Unranked players and players drafted past `cutoff` (the league's budget
/// roster spots) are worth $1. The surplus over $1 scales with the per-team
/// budget.
pub fn market_value(adp_rank: Option<u32>, cutoff: usize, budget: u32) -> u32 {
    let rank = match adp_rank {
        Some(r) if r >= 1 && (r as usize) <= cutoff => r,
        _ => return 1,
    };

    let base = curve_value(MARKET_CURVE, rank);
    let scaled = 1.0 + (base - 1.0) * (budget as f64 / REFERENCE_BUDGET);
    scaled.round().max(1.0) as u32
}
