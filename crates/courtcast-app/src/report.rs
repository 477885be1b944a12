// Plain-text reports for the terminal.

use std::fmt::Write;

use courtcast_basketball::valuation::ValuationResult;
use courtcast_core::category::Category;
use courtcast_core::source::normalize_name;

/// Ranked value table, one row per player, limited to `top` rows.
pub fn format_values_table(results: &[ValuationResult], top: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:>4} {:>5}  {:<26} {:<4} {:<4} {:>4} {:>5} {:>5} {:>6} {:>5} {:>7}",
        "RK", "BLEND", "PLAYER", "TEAM", "POS", "G", "$", "STAT$", "MKT$", "ADP", "SCORE"
    );
    for r in results.iter().take(top) {
        let adp = r
            .adp_rank()
            .map(|rank| rank.to_string())
            .unwrap_or_else(|| "-".into());
        let _ = writeln!(
            out,
            "{:>4} {:>5}  {:<26} {:<4} {:<4} {:>4} {:>5} {:>5} {:>6} {:>5} {:>7.2}",
            r.value_rank,
            r.blend_rank,
            truncate(r.name(), 26),
            r.stats.team,
            r.position_group,
            r.stats.games,
            r.auction_value,
            r.stat_value,
            r.market_value,
            adp,
            r.total_score
        );
    }
    out
}

/// Players whose name contains every query part, case- and
/// accent-insensitively.
pub fn find_players<'a>(results: &'a [ValuationResult], parts: &[String]) -> Vec<&'a ValuationResult> {
    let needles: Vec<String> = parts
        .iter()
        .map(|p| normalize_name(p))
        .filter(|p| !p.is_empty())
        .collect();
    if needles.is_empty() {
        return Vec::new();
    }
    results
        .iter()
        .filter(|r| {
            let name = normalize_name(r.name());
            needles.iter().all(|n| name.contains(n.as_str()))
        })
        .collect()
}

/// The `limit` highest-valued players scoring between `min_pts` and
/// `max_pts` points per game, inclusive.
pub fn similar_producers(
    results: &[ValuationResult],
    min_pts: f64,
    max_pts: f64,
    limit: usize,
) -> Vec<&ValuationResult> {
    let mut hits: Vec<&ValuationResult> = results
        .iter()
        .filter(|r| (min_pts..=max_pts).contains(&r.stats.points))
        .collect();
    // Stable, so equal values keep value-rank order.
    hits.sort_by(|a, b| b.auction_value.cmp(&a.auction_value));
    hits.truncate(limit);
    hits
}

/// Side-by-side box score for players from [`similar_producers`].
pub fn format_similar_table(hits: &[&ValuationResult]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<26} {:>5} {:>7} {:>5} {:>5} {:>5} {:>4} {:>4} {:>4} {:>6} {:>6} {:>4}",
        "PLAYER", "$", "SCORE", "PTS", "REB", "AST", "STL", "BLK", "3PM", "FG%", "FT%", "TO"
    );
    for r in hits {
        let s = &r.stats;
        let _ = writeln!(
            out,
            "{:<26} {:>5} {:>7.2} {:>5.1} {:>5.1} {:>5.1} {:>4.1} {:>4.1} {:>4.1} {:>6.3} {:>6.3} {:>4.1}",
            truncate(r.name(), 26),
            r.auction_value,
            r.total_score,
            s.points,
            s.rebounds,
            s.assists,
            s.steals,
            s.blocks,
            s.threes,
            s.per_game(Category::FgPct),
            s.per_game(Category::FtPct),
            s.turnovers
        );
    }
    out
}

/// Per-game line, values, and category z-scores for one player.
pub fn format_player_detail(r: &ValuationResult) -> String {
    let s = &r.stats;
    let mut out = String::new();
    let _ = writeln!(out, "{} ({}, {})", s.name, s.team, r.position_group);
    let _ = writeln!(
        out,
        "  value ${}  (stat ${}, market ${})  rank {}  blend rank {}",
        r.auction_value, r.stat_value, r.market_value, r.value_rank, r.blend_rank
    );
    match s.adp {
        Some(adp) => {
            let _ = writeln!(out, "  ADP {:.1} (#{})", adp.adp, adp.adp_rank);
        }
        None => {
            let _ = writeln!(out, "  ADP -");
        }
    }
    let _ = writeln!(
        out,
        "  {} G  {:.1} MIN  {:.1} PTS  {:.1} REB  {:.1} AST  {:.1} STL  {:.1} BLK  {:.1} 3PM  {:.1} TO",
        s.games, s.minutes, s.points, s.rebounds, s.assists, s.steals, s.blocks, s.threes, s.turnovers
    );
    let _ = writeln!(
        out,
        "  FG {:.1}/{:.1} ({:.3})  FT {:.1}/{:.1} ({:.3})",
        s.fgm,
        s.fga,
        s.per_game(Category::FgPct),
        s.ftm,
        s.fta,
        s.per_game(Category::FtPct)
    );

    let _ = write!(out, "  z:");
    for cat in Category::ALL {
        match r.category_scores.get(&cat) {
            Some(z) => {
                let _ = write!(out, "  {} {:+.2}", cat.label(), z);
            }
            None => {
                let _ = write!(out, "  {} punt", cat.label());
            }
        }
    }
    let _ = writeln!(out, "  total {:+.2}", r.total_score);
    out
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut t: String = s.chars().take(max.saturating_sub(1)).collect();
        t.push('…');
        t
    }
}
