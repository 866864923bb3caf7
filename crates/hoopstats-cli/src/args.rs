// Command-line arguments.

use std::path::PathBuf;

use clap::Parser;
use hoopstats_core::stats::aggregate::AggregationWindow;

#[derive(Debug, Parser)]
#[command(name = "hoopstats")]
#[command(about = "Category rankings for head-to-head fantasy basketball leagues", long_about = None)]
pub struct Cli {
    /// League settings payload (JSON)
    #[arg(long)]
    pub settings: PathBuf,

    /// Standings payload with season totals (JSON)
    #[arg(long)]
    pub standings: Option<PathBuf>,

    /// Weekly scoreboard payloads (JSON); repeat or list several
    #[arg(long, num_args = 1..)]
    pub scoreboard: Vec<PathBuf>,

    /// Aggregation window: season, last:N or weeks:A-B
    #[arg(long, value_parser = parse_window)]
    pub window: Option<WindowArg>,

    /// Show counting stats as per-week averages
    #[arg(long)]
    pub weekly_average: bool,

    /// List teams by average category rank, best first
    #[arg(long)]
    pub by_rank: bool,

    /// Also write one CSV row per team per category to this file
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Print the table as JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Directory holding league.toml (defaults to the platform config dir)
    #[arg(long)]
    pub config_dir: Option<PathBuf>,
}

/// `--window` as typed; resolved once the league's current week is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowArg {
    Season,
    Last(u32),
    Weeks { from: u32, to: u32 },
}

impl WindowArg {
    /// Without a current week, `last:N` covers weeks `1..=N`.
    pub fn resolve(self, current_week: Option<u32>) -> AggregationWindow {
        match self {
            WindowArg::Season => AggregationWindow::Season,
            WindowArg::Last(n) => AggregationWindow::last_weeks(current_week.unwrap_or(n), n),
            WindowArg::Weeks { from, to } => AggregationWindow::Weeks { from, to },
        }
    }
}

pub fn parse_window(raw: &str) -> Result<WindowArg, String> {
    let raw = raw.trim();
    if raw.eq_ignore_ascii_case("season") {
        return Ok(WindowArg::Season);
    }
    if let Some(n) = raw.strip_prefix("last:") {
        let n = parse_week(n)?;
        return Ok(WindowArg::Last(n));
    }
    if let Some(range) = raw.strip_prefix("weeks:") {
        let (from, to) = match range.split_once('-') {
            Some((from, to)) => (parse_week(from)?, parse_week(to)?),
            None => {
                let week = parse_week(range)?;
                (week, week)
            }
        };
        if from > to {
            return Err(format!("week range {from}-{to} is reversed"));
        }
        return Ok(WindowArg::Weeks { from, to });
    }
    Err(format!(
        "unknown window `{raw}`; expected season, last:N or weeks:A-B"
    ))
}

fn parse_week(raw: &str) -> Result<u32, String> {
    match raw.trim().parse::<u32>() {
        Ok(0) => Err("weeks start at 1".to_string()),
        Ok(n) => Ok(n),
        Err(_) => Err(format!("`{raw}` is not a week number")),
    }
}
