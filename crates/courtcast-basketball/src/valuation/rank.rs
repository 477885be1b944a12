// Value rank and ADP-blended rank.

use super::blend::{tier_weight, BlendTier, BLEND_RANK_LIMIT};
use super::order_desc;

/// ADP pull on the displayed rank. Past the last tier: 0.
pub const RANK_BLEND_TIERS: &[BlendTier] = &[
    BlendTier { rank_upper_bound: 20, weight: 0.6 },
    BlendTier { rank_upper_bound: 40, weight: 0.4 },
    BlendTier { rank_upper_bound: 60, weight: 0.2 },
];

/// Both orderings for a pool, index-aligned with the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ranks {
    pub value_rank: Vec<u32>,
    pub blend_rank: Vec<u32>,
}

/// Rank a pool by final dollar value, then blend that rank with ADP rank.
///
/// Both orderings are permutations of `1..=N` and break ties by input order.
pub fn reconcile_ranks(auction_values: &[u32], adp_ranks: &[Option<u32>]) -> Ranks {
    let n = auction_values.len();
    let dollars: Vec<f64> = auction_values.iter().map(|&v| v as f64).collect();

    let mut value_rank = vec![0u32; n];
    for (pos, idx) in order_desc(&dollars).into_iter().enumerate() {
        value_rank[idx] = pos as u32 + 1;
    }

    let provisional: Vec<f64> = (0..n)
        .map(|i| {
            let vr = value_rank[i] as f64;
            match adp_ranks.get(i).copied().flatten() {
                Some(adp) if adp <= BLEND_RANK_LIMIT => {
                    let w = tier_weight(RANK_BLEND_TIERS, adp);
                    adp as f64 * w + vr * (1.0 - w)
                }
                _ => vr,
            }
        })
        .collect();

    let mut blend_order: Vec<usize> = (0..n).collect();
    blend_order.sort_by(|&a, &b| {
        provisional[a]
            .partial_cmp(&provisional[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let mut blend_rank = vec![0u32; n];
    for (pos, idx) in blend_order.into_iter().enumerate() {
        blend_rank[idx] = pos as u32 + 1;
    }

    Ranks {
        value_rank,
        blend_rank,
    }
}
