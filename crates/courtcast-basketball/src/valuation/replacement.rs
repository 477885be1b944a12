// Replacement-level baseline: the total score a freely available player provides.

/// Extra players beyond the roster cutoff required before the averaging
/// window is used.
pub const WINDOW_MIN_SURPLUS: usize = 10;

/// The averaging window spans ranks `[N - START_OFFSET, N - END_OFFSET)`.
pub const WINDOW_START_OFFSET: usize = 26;
pub const WINDOW_END_OFFSET: usize = 6;

/// Determine the replacement-level total score.
///
/// With `N = rostered` players on league rosters:
/// 1. When the pool holds at least `N + 10` players, average the 20 scores
///    at 0-based ranks `[N - 26, N - 6)`. This straddles the typical
///    replacement tier and smooths single-player noise at the cutoff.
/// 2. When the pool is larger than `N`, use the score of the first
///    unrostered player (rank `N + 1`).
/// 3. Otherwise use the lowest score in the pool, or 0 for an empty pool.
pub fn replacement_level(total_scores: &[f64], rostered: usize) -> f64 {
    let mut sorted: Vec<f64> = total_scores.to_vec();
    sorted.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));

    if sorted.len() >= rostered + WINDOW_MIN_SURPLUS {
        let start = rostered.saturating_sub(WINDOW_START_OFFSET);
        let end = rostered.saturating_sub(WINDOW_END_OFFSET);
        if end > start {
            let window = &sorted[start..end];
            return window.iter().sum::<f64>() / window.len() as f64;
        }
    }

    if sorted.len() > rostered {
        sorted[rostered]
    } else if let Some(&last) = sorted.last() {
        last
    } else {
        0.0
    }
}
