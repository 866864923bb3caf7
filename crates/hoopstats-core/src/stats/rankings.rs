// League statistics for one category: average, rank, percent-from-average,
// and the z-score / percentile / classification variant.

use serde::Serialize;
use std::cmp::Ordering;

use crate::stats::aggregate::AggregatedTeamStats;
use crate::stats::category::Direction;

// ---------------------------------------------------------------------------
// Pool statistics
// ---------------------------------------------------------------------------

/// Mean and standard deviation of one category across the league.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PoolStats {
    pub mean: f64,
    pub stdev: f64,
}

/// Threshold below which standard deviation is treated as zero.
const STDEV_EPSILON: f64 = 1e-9;

/// Mean and population standard deviation (N denominator: the league is the
/// whole population, not a sample). `{0, 0}` for an empty slice.
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

/// Z-score against pool stats; 0.0 when the stdev is approximately zero.
pub fn compute_zscore(value: f64, stats: &PoolStats) -> f64 {
    if stats.stdev < STDEV_EPSILON {
        return 0.0;
    }
    (value - stats.mean) / stats.stdev
}

/// `(value - avg) / avg * 100`, with a zero average mapping to 0.
pub fn percent_diff(value: f64, league_avg: f64) -> f64 {
    if league_avg == 0.0 {
        return 0.0;
    }
    (value - league_avg) / league_avg * 100.0
}

/// Percentile from rank: rank 1 is 100, last place is 0. A one-team league
/// is 100.
pub fn percentile_from_rank(rank: usize, total_teams: usize) -> f64 {
    if total_teams <= 1 {
        return 100.0;
    }
    100.0 * total_teams.saturating_sub(rank) as f64 / (total_teams - 1) as f64
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Percentile at or above which a team is elite in a category.
pub const ELITE_PERCENTILE: f64 = 75.0;
/// Percentile at or above which a team is strong.
pub const STRONG_PERCENTILE: f64 = 50.0;
/// Percentile at or above which a team is average; below is weak.
pub const AVERAGE_PERCENTILE: f64 = 25.0;

/// Coarse standing label derived from percentile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Classification {
    Elite,
    Strong,
    Average,
    Weak,
}

impl Classification {
    pub fn from_percentile(percentile: f64) -> Self {
        if percentile >= ELITE_PERCENTILE {
            Classification::Elite
        } else if percentile >= STRONG_PERCENTILE {
            Classification::Strong
        } else if percentile >= AVERAGE_PERCENTILE {
            Classification::Average
        } else {
            Classification::Weak
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Classification::Elite => "ELITE",
            Classification::Strong => "STRONG",
            Classification::Average => "AVERAGE",
            Classification::Weak => "WEAK",
        }
    }
}

// ---------------------------------------------------------------------------
// Ranking
// ---------------------------------------------------------------------------

/// One team's value for the category being ranked.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamValue {
    pub team_key: String,
    pub team_name: String,
    pub value: f64,
}

/// Pull `stat_id` out of every aggregated team, missing values as 0.
pub fn team_values(teams: &[AggregatedTeamStats], stat_id: &str) -> Vec<TeamValue> {
    teams
        .iter()
        .map(|t| TeamValue {
            team_key: t.team_key.clone(),
            team_name: t.team_name.clone(),
            value: t.stat(stat_id),
        })
        .collect()
}

/// A team's standing in one category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRanking {
    pub team_key: String,
    pub team_name: String,
    pub value: f64,
    pub league_avg: f64,
    pub percent_diff: f64,
    /// 1 is best under the category's direction.
    pub rank: usize,
    pub total_teams: usize,
}

/// Rank every team in one category.
///
/// Results come back in input order. Ranks are `1..=n` with no sharing:
/// teams are stably sorted by value (descending for higher-is-better,
/// ascending for lower-is-better) and equal values keep their input order,
/// so the team seen first gets the better rank.
pub fn rank_category(values: &[TeamValue], direction: Direction) -> Vec<CategoryRanking> {
    let total_teams = values.len();
    let raw: Vec<f64> = values.iter().map(|v| v.value).collect();
    let league_avg = compute_pool_stats(&raw).mean;

    let mut order: Vec<usize> = (0..total_teams).collect();
    order.sort_by(|&a, &b| compare_for_direction(raw[a], raw[b], direction));

    let mut ranks = vec![0usize; total_teams];
    for (position, &idx) in order.iter().enumerate() {
        ranks[idx] = position + 1;
    }

    values
        .iter()
        .zip(ranks)
        .map(|(v, rank)| CategoryRanking {
            team_key: v.team_key.clone(),
            team_name: v.team_name.clone(),
            value: v.value,
            league_avg,
            percent_diff: percent_diff(v.value, league_avg),
            rank,
            total_teams,
        })
        .collect()
}

fn compare_for_direction(a: f64, b: f64, direction: Direction) -> Ordering {
    match direction {
        Direction::Higher => b.total_cmp(&a),
        Direction::Lower => a.total_cmp(&b),
    }
}

// ---------------------------------------------------------------------------
// Standing variant (z-score, percentile, classification)
// ---------------------------------------------------------------------------

/// `CategoryRanking` plus its distribution-relative measures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryStanding {
    #[serde(flatten)]
    pub ranking: CategoryRanking,
    /// Raw `(value - mean) / stdev`; not sign-flipped for lower-is-better.
    pub z_score: f64,
    pub percentile: f64,
    pub classification: Classification,
}

/// Rank a category and attach z-score, percentile and classification.
pub fn category_standings(values: &[TeamValue], direction: Direction) -> Vec<CategoryStanding> {
    let raw: Vec<f64> = values.iter().map(|v| v.value).collect();
    let pool = compute_pool_stats(&raw);

    rank_category(values, direction)
        .into_iter()
        .map(|ranking| {
            let percentile = percentile_from_rank(ranking.rank, ranking.total_teams);
            CategoryStanding {
                z_score: compute_zscore(ranking.value, &pool),
                percentile,
                classification: Classification::from_percentile(percentile),
                ranking,
            }
        })
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

    fn values(pairs: &[(&str, f64)]) -> Vec<TeamValue> {
        pairs
            .iter()
            .map(|(k, v)| TeamValue {
                team_key: k.to_string(),
                team_name: format!("Team {k}"),
                value: *v,
            })
            .collect()
    }

    fn ranks(rankings: &[CategoryRanking]) -> Vec<(String, usize)> {
        rankings.iter().map(|r| (r.team_key.clone(), r.rank)).collect()
    }

    // ---- pool stats / zscore (same contract as the projection engine) ----

    #[test]
    fn pool_stats_known_values() {
        // Mean 5, population variance 32/8 = 4, stdev 2.
        let stats = compute_pool_stats(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert!(approx_eq(stats.mean, 5.0, 1e-10));
        assert!(approx_eq(stats.stdev, 2.0, 1e-10));
    }

    #[test]
    fn pool_stats_empty() {
        let stats = compute_pool_stats(&[]);
        assert_eq!(stats, PoolStats { mean: 0.0, stdev: 0.0 });
    }

    #[test]
    fn zscore_zero_stdev_returns_zero() {
        let stats = PoolStats { mean: 42.0, stdev: 0.0 };
        assert_eq!(compute_zscore(100.0, &stats), 0.0);
        let tiny = PoolStats { mean: 10.0, stdev: 1e-12 };
        assert_eq!(compute_zscore(100.0, &tiny), 0.0);
    }

    // ---- ranking ----

    #[test]
    fn turnovers_scenario() {
        let v = values(&[("A", 120.0), ("B", 95.0), ("C", 95.0)]);
        let r = rank_category(&v, Direction::Lower);
        assert_eq!(
            ranks(&r),
            vec![("A".into(), 3), ("B".into(), 1), ("C".into(), 2)]
        );
        assert!(approx_eq(r[0].league_avg, 103.333_333, 1e-5));
        assert!(approx_eq(r[0].percent_diff, 16.129, 1e-3));
        assert!(r.iter().all(|x| x.total_teams == 3));
    }

    #[test]
    fn higher_is_better_largest_gets_first() {
        let v = values(&[("A", 10.0), ("B", 30.0), ("C", 20.0)]);
        let r = rank_category(&v, Direction::Higher);
        assert_eq!(
            ranks(&r),
            vec![("A".into(), 3), ("B".into(), 1), ("C".into(), 2)]
        );
    }

    #[test]
    fn ties_break_by_input_order_in_both_directions() {
        let v = values(&[("X", 5.0), ("Y", 5.0), ("Z", 5.0)]);
        for dir in [Direction::Higher, Direction::Lower] {
            let r = rank_category(&v, dir);
            assert_eq!(
                ranks(&r),
                vec![("X".into(), 1), ("Y".into(), 2), ("Z".into(), 3)]
            );
        }
    }

    #[test]
    fn ranks_are_a_permutation() {
        let v = values(&[
            ("a", 3.0), ("b", 1.0), ("c", 4.0), ("d", 1.0), ("e", 5.0),
            ("f", 9.0), ("g", 2.0), ("h", 6.0), ("i", 5.0), ("j", 3.0),
        ]);
        for dir in [Direction::Higher, Direction::Lower] {
            let mut got: Vec<usize> = rank_category(&v, dir).iter().map(|r| r.rank).collect();
            got.sort_unstable();
            assert_eq!(got, (1..=10).collect::<Vec<_>>());
        }
    }

    #[test]
    fn zero_average_guard() {
        let v = values(&[("A", 0.0), ("B", 0.0), ("C", 0.0)]);
        let r = rank_category(&v, Direction::Higher);
        assert!(r.iter().all(|x| x.league_avg == 0.0 && x.percent_diff == 0.0));
        assert!(r.iter().all(|x| x.percent_diff.is_finite()));
    }

    #[test]
    fn zeros_pull_the_average_down() {
        let v = values(&[("A", 100.0), ("B", 0.0)]);
        let r = rank_category(&v, Direction::Higher);
        assert!(approx_eq(r[0].league_avg, 50.0, 1e-12));
        assert!(approx_eq(r[0].percent_diff, 100.0, 1e-12));
        assert!(approx_eq(r[1].percent_diff, -100.0, 1e-12));
    }

    #[test]
    fn empty_input_ranks_nothing() {
        assert!(rank_category(&[], Direction::Higher).is_empty());
        assert!(category_standings(&[], Direction::Lower).is_empty());
    }

    // ---- standings variant ----

    #[test]
    fn single_team_is_first_and_hundredth_percentile() {
        let v = values(&[("solo", 42.0)]);
        let s = category_standings(&v, Direction::Higher);
        assert_eq!(s.len(), 1);
        assert_eq!(s[0].ranking.rank, 1);
        assert_eq!(s[0].ranking.total_teams, 1);
        assert_eq!(s[0].percentile, 100.0);
        assert_eq!(s[0].z_score, 0.0);
        assert_eq!(s[0].classification, Classification::Elite);
    }

    #[test]
    fn percentile_mapping() {
        assert_eq!(percentile_from_rank(1, 5), 100.0);
        assert_eq!(percentile_from_rank(3, 5), 50.0);
        assert_eq!(percentile_from_rank(5, 5), 0.0);
        assert_eq!(percentile_from_rank(1, 1), 100.0);
        assert_eq!(percentile_from_rank(1, 0), 100.0);
    }

    #[test]
    fn classification_cut_points() {
        assert_eq!(Classification::from_percentile(ELITE_PERCENTILE), Classification::Elite);
        assert_eq!(Classification::from_percentile(ELITE_PERCENTILE - 0.01), Classification::Strong);
        assert_eq!(Classification::from_percentile(STRONG_PERCENTILE), Classification::Strong);
        assert_eq!(Classification::from_percentile(STRONG_PERCENTILE - 0.01), Classification::Average);
        assert_eq!(Classification::from_percentile(AVERAGE_PERCENTILE), Classification::Average);
        assert_eq!(Classification::from_percentile(AVERAGE_PERCENTILE - 0.01), Classification::Weak);
        assert_eq!(Classification::from_percentile(0.0), Classification::Weak);
    }

    #[test]
    fn standings_zscores_and_labels() {
        // Values 2,4,4,4,5,5,7,9: mean 5, stdev 2.
        let v = values(&[
            ("a", 2.0), ("b", 4.0), ("c", 4.0), ("d", 4.0),
            ("e", 5.0), ("f", 5.0), ("g", 7.0), ("h", 9.0),
        ]);
        let s = category_standings(&v, Direction::Higher);
        let h = s.iter().find(|x| x.ranking.team_key == "h").unwrap();
        assert!(approx_eq(h.z_score, 2.0, 1e-10));
        assert_eq!(h.ranking.rank, 1);
        assert_eq!(h.classification, Classification::Elite);
        let a = s.iter().find(|x| x.ranking.team_key == "a").unwrap();
        assert!(approx_eq(a.z_score, -1.5, 1e-10));
        assert_eq!(a.ranking.rank, 8);
        assert_eq!(a.percentile, 0.0);
        assert_eq!(a.classification, Classification::Weak);
    }

    #[test]
    fn lower_is_better_zscore_is_not_flipped() {
        let v = values(&[("A", 10.0), ("B", 20.0)]);
        let s = category_standings(&v, Direction::Lower);
        assert_eq!(s[0].ranking.rank, 1);
        assert!(s[0].z_score < 0.0);
        assert_eq!(s[0].classification, Classification::Elite);
    }

    #[test]
    fn team_values_default_missing_to_zero() {
        let teams = vec![AggregatedTeamStats {
            team_key: "a".into(),
            team_name: "Alpha".into(),
            stats: [("12".to_string(), 7.0)].into_iter().collect(),
            records_counted: 1,
        }];
        assert_eq!(team_values(&teams, "12")[0].value, 7.0);
        assert_eq!(team_values(&teams, "19")[0].value, 0.0);
    }
}
