// Blend statistical and market dollar values by ADP tier.
//
// Near the top of the draft the market price is a strong signal; deeper down
// the statistical value takes over. Punt-heavy strategies lean further on
// their own numbers, so the market's pull shrinks as punt aggressiveness grows.

use courtcast_core::category::{Category, CategoryWeightProfile};

/// Only players with an ADP rank at or above this cutoff are blended.
pub const BLEND_RANK_LIMIT: u32 = 200;

/// Floor on the aggressiveness multiplier applied to `adp_weight`.
pub const MIN_AGGRESSIVENESS_SCALE: f64 = 0.2;

/// Multiplier shrink per unit of punt aggressiveness.
pub const AGGRESSIVENESS_PENALTY: f64 = 0.15;

/// Category weights above this count as an emphasis toward aggressiveness.
pub const EMPHASIS_THRESHOLD: f64 = 1.5;

/// Aggressiveness contributed per unit of weight above `EMPHASIS_THRESHOLD`.
pub const EMPHASIS_RATE: f64 = 0.25;

/// ADP-rank tier: ranks up to and including `rank_upper_bound` get `weight`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlendTier {
    pub rank_upper_bound: u32,
    pub weight: f64,
}

/// Market weight for dollar values by ADP rank. Past the last tier: 0.
pub const VALUE_BLEND_TIERS: &[BlendTier] = &[
    BlendTier { rank_upper_bound: 10, weight: 0.70 },
    BlendTier { rank_upper_bound: 25, weight: 0.55 },
    BlendTier { rank_upper_bound: 40, weight: 0.40 },
    BlendTier { rank_upper_bound: 60, weight: 0.25 },
];

/// Weight of the first tier covering `rank`, or 0 past the table.
pub fn tier_weight(tiers: &[BlendTier], rank: u32) -> f64 {
    tiers
        .iter()
        .find(|t| rank <= t.rank_upper_bound)
        .map(|t| t.weight)
        .unwrap_or(0.0)
}

/// How far a weight profile departs from a balanced build.
///
/// Each punted or zero-weight category counts 1.0, a partial de-emphasis
/// counts `1 - w`, and a heavy emphasis counts `0.25 * (w - 1.5)`.
pub fn punt_aggressiveness(profile: &CategoryWeightProfile) -> f64 {
    Category::ALL
        .iter()
        .map(|&cat| {
            let w = profile.resolve(cat);
            if w <= 0.0 {
                1.0
            } else if w < 1.0 {
                1.0 - w
            } else if w > EMPHASIS_THRESHOLD {
                EMPHASIS_RATE * (w - EMPHASIS_THRESHOLD)
            } else {
                0.0
            }
        })
        .sum()
}

/// `adp_weight` scaled down by punt aggressiveness, never below 20% of it.
pub fn effective_adp_weight(adp_weight: f64, aggressiveness: f64) -> f64 {
    let scale = (1.0 - AGGRESSIVENESS_PENALTY * aggressiveness).max(MIN_AGGRESSIVENESS_SCALE);
    adp_weight * scale
}

/// Final pre-inflation dollar value for one player.
///
/// Players without ADP, or drafted past `BLEND_RANK_LIMIT`, keep their
/// statistical value.
pub fn blend_value(stat_value: u32, market_value: u32, adp_rank: Option<u32>, effective_weight: f64) -> u32 {
    let rank = match adp_rank {
        Some(r) if r <= BLEND_RANK_LIMIT => r,
        _ => return stat_value,
    };

    let w = (tier_weight(VALUE_BLEND_TIERS, rank) * effective_weight).clamp(0.0, 1.0);
    let blended = market_value as f64 * w + stat_value as f64 * (1.0 - w);
    blended.round().max(1.0) as u32
}
