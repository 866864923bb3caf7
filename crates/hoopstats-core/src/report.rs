// Category table: the full normalize -> aggregate -> rank -> format flow for
// one league and window.

use serde::Serialize;
use tracing::info;

use crate::format::{
    display_value, format_percent_diff, heat_opacity, ordinal, DisplayView, HeatTone,
    DEFAULT_HEAT_CEILING_PERCENT,
};
use crate::provider::{LeagueInfo, TeamRecord};
use crate::stats::aggregate::{aggregate, AggregationWindow};
use crate::stats::category::{scoring_categories, Direction, DirectionTable};
use crate::stats::rankings::{category_standings, team_values, CategoryStanding, Classification};

// ---------------------------------------------------------------------------
// Options
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableOptions {
    pub window: AggregationWindow,
    /// Show counting stats as per-week averages instead of window totals.
    pub weekly_average: bool,
    pub heat_ceiling_percent: f64,
}

impl TableOptions {
    pub fn view(&self) -> DisplayView {
        if self.weekly_average {
            DisplayView::WeeklyAverage {
                num_weeks: self.window.num_weeks(),
            }
        } else {
            DisplayView::Total
        }
    }
}

impl Default for TableOptions {
    fn default() -> Self {
        TableOptions {
            window: AggregationWindow::Season,
            weekly_average: false,
            heat_ceiling_percent: DEFAULT_HEAT_CEILING_PERCENT,
        }
    }
}

// ---------------------------------------------------------------------------
// Table types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryColumn {
    pub stat_id: String,
    pub label: String,
    pub direction: Direction,
    pub is_percentage: bool,
}

/// One team in one category, ranked and formatted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCell {
    pub stat_id: String,
    pub standing: CategoryStanding,
    pub display: String,
    pub ordinal: String,
    pub percent_diff_text: String,
    pub heat_opacity: f64,
    pub heat_tone: HeatTone,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamSummary {
    /// Mean rank across scoring categories; 0 when there are none.
    pub average_rank: f64,
    pub elite_count: usize,
    pub weak_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamRow {
    pub team_key: String,
    pub team_name: String,
    /// One cell per column, in column order.
    pub cells: Vec<CategoryCell>,
    pub summary: TeamSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTable {
    pub league_key: String,
    pub league_name: String,
    pub window: AggregationWindow,
    pub view: DisplayView,
    pub columns: Vec<CategoryColumn>,
    pub rows: Vec<TeamRow>,
}

impl CategoryTable {
    /// Rows ordered by average category rank, best first. Equal averages
    /// keep table order.
    pub fn rows_by_average_rank(&self) -> Vec<&TeamRow> {
        let mut rows: Vec<&TeamRow> = self.rows.iter().collect();
        rows.sort_by(|a, b| a.summary.average_rank.total_cmp(&b.summary.average_rank));
        rows
    }
}

// ---------------------------------------------------------------------------
// Building
// ---------------------------------------------------------------------------

/// Build the category table for `league` from raw team records.
///
/// Only scoring categories become columns, so display-only stats and stat
/// ids the league does not declare never get ranked.
pub fn build_category_table(
    league: &LeagueInfo,
    records: &[TeamRecord],
    directions: &DirectionTable,
    options: &TableOptions,
) -> CategoryTable {
    let teams = aggregate(records, &league.categories, &options.window);
    let view = options.view();
    let categories = scoring_categories(&league.categories);

    let mut rows: Vec<TeamRow> = teams
        .iter()
        .map(|t| TeamRow {
            team_key: t.team_key.clone(),
            team_name: t.team_name.clone(),
            cells: Vec::with_capacity(categories.len()),
            summary: TeamSummary {
                average_rank: 0.0,
                elite_count: 0,
                weak_count: 0,
            },
        })
        .collect();

    let mut columns = Vec::with_capacity(categories.len());
    for category in &categories {
        let direction = directions.direction_for(category);
        columns.push(CategoryColumn {
            stat_id: category.stat_id.clone(),
            label: category.label().to_string(),
            direction,
            is_percentage: category.is_percentage(),
        });

        let standings = category_standings(&team_values(&teams, &category.stat_id), direction);
        for (row, standing) in rows.iter_mut().zip(standings) {
            let pd = standing.ranking.percent_diff;
            row.cells.push(CategoryCell {
                stat_id: category.stat_id.clone(),
                display: display_value(category, standing.ranking.value, view),
                ordinal: ordinal(standing.ranking.rank),
                percent_diff_text: format_percent_diff(pd),
                heat_opacity: heat_opacity(pd, options.heat_ceiling_percent),
                heat_tone: HeatTone::from_percent_diff(pd, direction),
                standing,
            });
        }
    }

    for row in &mut rows {
        row.summary = summarize(&row.cells);
    }

    info!(
        "category table for {}: {} teams x {} categories",
        league.league_key,
        rows.len(),
        columns.len()
    );

    CategoryTable {
        league_key: league.league_key.clone(),
        league_name: league.name.clone(),
        window: options.window,
        view,
        columns,
        rows,
    }
}

fn summarize(cells: &[CategoryCell]) -> TeamSummary {
    let count_of = |class: Classification| {
        cells
            .iter()
            .filter(|c| c.standing.classification == class)
            .count()
    };
    let average_rank = if cells.is_empty() {
        0.0
    } else {
        cells.iter().map(|c| c.standing.ranking.rank as f64).sum::<f64>() / cells.len() as f64
    };
    TeamSummary {
        average_rank,
        elite_count: count_of(Classification::Elite),
        weak_count: count_of(Classification::Weak),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
