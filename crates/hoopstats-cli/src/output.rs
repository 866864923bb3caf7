// Rendering a CategoryTable for the terminal and for CSV export.

use std::io::Write;

use hoopstats_core::format::DisplayView;
use hoopstats_core::report::{CategoryTable, TeamRow};
use hoopstats_core::stats::aggregate::AggregationWindow;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Text table
// ---------------------------------------------------------------------------

pub fn window_label(window: &AggregationWindow) -> String {
    match window {
        AggregationWindow::Season => "season".to_string(),
        AggregationWindow::Weeks { from, to } if from == to => format!("week {from}"),
        AggregationWindow::Weeks { from, to } => format!("weeks {from}-{to}"),
    }
}

/// Fixed-width text table: one row per team, each cell "value rank",
/// plus the team's average rank. `by_rank` lists teams best average rank
/// first instead of in table order.
pub fn render_text(table: &CategoryTable, by_rank: bool) -> String {
    let view = match table.view {
        DisplayView::Total => "totals",
        DisplayView::WeeklyAverage { .. } => "weekly averages",
    };
    let mut out = format!(
        "{} ({}) - {}, {}\n",
        table.league_name,
        table.league_key,
        window_label(&table.window),
        view
    );

    let mut header: Vec<String> = vec!["Team".to_string()];
    header.extend(table.columns.iter().map(|c| c.label.clone()));
    header.push("Avg".to_string());

    let rows: Vec<&TeamRow> = if by_rank {
        table.rows_by_average_rank()
    } else {
        table.rows.iter().collect()
    };

    let body: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            let mut line = vec![row.team_name.clone()];
            line.extend(
                row.cells
                    .iter()
                    .map(|cell| format!("{} {}", cell.display, cell.ordinal)),
            );
            line.push(format!("{:.2}", row.summary.average_rank));
            line
        })
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.len()).collect();
    for line in &body {
        for (width, text) in widths.iter_mut().zip(line) {
            *width = (*width).max(text.chars().count());
        }
    }

    push_line(&mut out, &header, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_line(&mut out, &rule, &widths);
    for line in &body {
        push_line(&mut out, line, &widths);
    }
    out
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(i, (text, &width))| {
            if i == 0 {
                format!("{text:<width$}")
            } else {
                format!("{text:>width$}")
            }
        })
        .collect();
    out.push_str(padded.join("  ").trim_end());
    out.push('\n');
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct CsvRow<'a> {
    pub team_key: &'a str,
    pub team_name: &'a str,
    pub stat_id: &'a str,
    pub category: &'a str,
    pub value: f64,
    pub display: &'a str,
    pub rank: usize,
    pub total_teams: usize,
    pub league_avg: f64,
    pub percent_diff: f64,
    pub z_score: f64,
    pub percentile: f64,
    pub classification: &'static str,
}

/// One row per team per category, in table order.
pub fn csv_rows(table: &CategoryTable) -> Vec<CsvRow<'_>> {
    let mut rows = Vec::with_capacity(table.rows.len() * table.columns.len());
    for row in &table.rows {
        for (column, cell) in table.columns.iter().zip(&row.cells) {
            let standing = &cell.standing;
            rows.push(CsvRow {
                team_key: &row.team_key,
                team_name: &row.team_name,
                stat_id: &cell.stat_id,
                category: &column.label,
                value: standing.ranking.value,
                display: &cell.display,
                rank: standing.ranking.rank,
                total_teams: standing.ranking.total_teams,
                league_avg: standing.ranking.league_avg,
                percent_diff: standing.ranking.percent_diff,
                z_score: standing.z_score,
                percentile: standing.percentile,
                classification: standing.classification.label(),
            });
        }
    }
    rows
}

pub fn write_csv<W: Write>(table: &CategoryTable, writer: W) -> Result<(), csv::Error> {
    let mut wtr = csv::Writer::from_writer(writer);
    for row in csv_rows(table) {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
