// Category aggregation: many TeamRecords -> one AggregatedTeamStats per team
// for a requested window.
//
// Season window: one record per team, values copied through.
// Multi-week window: counting stats summed across the team's weeks;
// percentage stats keep the most recent week's value.

use serde::Serialize;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

use crate::provider::TeamRecord;
use crate::stats::category::CategoryDefinition;

// ---------------------------------------------------------------------------
// Window
// ---------------------------------------------------------------------------

/// The time span stats are reduced over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AggregationWindow {
    /// Season totals as reported, one record per team.
    Season,
    /// Inclusive week range.
    Weeks { from: u32, to: u32 },
}

impl AggregationWindow {
    /// The `n` weeks ending at `current_week`, clamped so the range never
    /// starts before week 1.
    pub fn last_weeks(current_week: u32, n: u32) -> Self {
        let to = current_week.max(1);
        let from = to.saturating_sub(n.max(1) - 1).max(1);
        AggregationWindow::Weeks { from, to }
    }

    pub fn is_season(&self) -> bool {
        matches!(self, AggregationWindow::Season)
    }

    pub fn contains(&self, week: u32) -> bool {
        match self {
            AggregationWindow::Season => true,
            AggregationWindow::Weeks { from, to } => (*from..=*to).contains(&week),
        }
    }

    /// Divisor for the weekly-average view. The season window counts as one.
    pub fn num_weeks(&self) -> u32 {
        match self {
            AggregationWindow::Season => 1,
            AggregationWindow::Weeks { from, to } => to.saturating_sub(*from).saturating_add(1),
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// One team's stats reduced over a window. Built fresh per aggregation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatedTeamStats {
    pub team_key: String,
    pub team_name: String,
    pub stats: BTreeMap<String, f64>,
    /// How many records were folded into this team's totals.
    pub records_counted: u32,
}

impl AggregatedTeamStats {
    fn seed(record: &TeamRecord) -> Self {
        AggregatedTeamStats {
            team_key: record.team_key.clone(),
            team_name: record.team_name.clone(),
            stats: BTreeMap::new(),
            records_counted: 0,
        }
    }

    /// Aggregated value for `stat_id`, 0 when never reported.
    pub fn stat(&self, stat_id: &str) -> f64 {
        self.stats.get(stat_id).copied().unwrap_or(0.0)
    }
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Reduce `records` to one entry per team for `window`.
///
/// Output order is the order each `team_key` was first seen. `categories`
/// is consulted only to tell percentage stats apart from counting stats.
pub fn aggregate(
    records: &[TeamRecord],
    categories: &[CategoryDefinition],
    window: &AggregationWindow,
) -> Vec<AggregatedTeamStats> {
    match window {
        AggregationWindow::Season => aggregate_season(records),
        AggregationWindow::Weeks { .. } => aggregate_weeks(records, categories, window),
    }
}

fn aggregate_season(records: &[TeamRecord]) -> Vec<AggregatedTeamStats> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut out = Vec::with_capacity(records.len());
    for record in records {
        if !seen.insert(record.team_key.as_str()) {
            debug!(
                "season window: duplicate record for {}, keeping first",
                record.team_key
            );
            continue;
        }
        let mut team = AggregatedTeamStats::seed(record);
        team.stats = record.stats.clone();
        team.records_counted = 1;
        out.push(team);
    }
    out
}

fn aggregate_weeks(
    records: &[TeamRecord],
    categories: &[CategoryDefinition],
    window: &AggregationWindow,
) -> Vec<AggregatedTeamStats> {
    let percentage_ids: Vec<&str> = categories
        .iter()
        .filter(|c| c.is_percentage())
        .map(|c| c.stat_id.as_str())
        .collect();

    let mut index_by_key: HashMap<&str, usize> = HashMap::new();
    let mut out: Vec<AggregatedTeamStats> = Vec::new();
    // Latest week seen per (team index, percentage stat).
    let mut latest_week: HashMap<(usize, &str), u32> = HashMap::new();

    for record in records {
        match record.week {
            Some(week) if !window.contains(week) => continue,
            None => debug!(
                "{}: untagged record in multi-week window, counting it",
                record.team_key
            ),
            _ => {}
        }

        let idx = *index_by_key.entry(record.team_key.as_str()).or_insert_with(|| {
            out.push(AggregatedTeamStats::seed(record));
            out.len() - 1
        });
        let team = &mut out[idx];
        team.records_counted += 1;

        let week = record.week.unwrap_or(0);
        for (stat_id, value) in &record.stats {
            if percentage_ids.contains(&stat_id.as_str()) {
                let latest = latest_week.entry((idx, stat_id.as_str())).or_insert(0);
                if week >= *latest {
                    *latest = week;
                    team.stats.insert(stat_id.clone(), *value);
                }
            } else {
                *team.stats.entry(stat_id.clone()).or_insert(0.0) += value;
            }
        }
    }

    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
