// hoopstats entry point.
//
// Startup sequence:
// 1. Initialize tracing (stderr, so stdout carries only the report)
// 2. Parse arguments and load config
// 3. Normalize the league settings payload
// 4. Resolve the aggregation window and display options
// 5. Normalize the team payloads the window needs
// 6. Build the category table
// 7. Write the report (text or JSON, plus optional CSV)

mod args;
mod output;

use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::Parser;
use hoopstats_core::config;
use hoopstats_core::provider::{self, TeamRecord};
use hoopstats_core::report::build_category_table;
use serde_json::Value;
use tracing::info;

use crate::args::Cli;

fn main() -> anyhow::Result<()> {
    // 1. Initialize tracing
    init_tracing()?;

    // 2. Parse arguments and load config
    let cli = Cli::parse();
    let config = match &cli.config_dir {
        Some(dir) => load_config_in(dir),
        None => config::load_config().context("failed to load configuration"),
    }?;

    // 3. League settings
    let settings = read_json(&cli.settings)?;
    let mut league = provider::parse_league_info(&settings)
        .with_context(|| format!("no league found in {}", cli.settings.display()))?;
    if let Some(name) = &config.league.name {
        league.name = name.clone();
    }
    info!(
        "League {} ({}): {} categories, current week {:?}",
        league.name,
        league.league_key,
        league.categories.len(),
        league.current_week
    );

    // 4. Window and display options; flags win over config
    let mut options = config.table_options(league.current_week);
    if let Some(window) = cli.window {
        options.window = window.resolve(league.current_week);
    }
    if cli.weekly_average {
        options.weekly_average = true;
    }
    info!("Aggregating over {}", output::window_label(&options.window));

    // 5. Team records
    let records = if options.window.is_season() {
        let Some(path) = &cli.standings else {
            bail!("the season window needs --standings");
        };
        provider::parse_standings(&read_json(path)?)
    } else {
        if cli.scoreboard.is_empty() {
            bail!("a weekly window needs at least one --scoreboard");
        }
        load_scoreboards(&cli.scoreboard)?
    };
    info!("Loaded {} team records", records.len());

    // 6. Category table
    let table = build_category_table(&league, &records, &config.direction_table(), &options);

    // 7. Output
    if cli.json {
        let json = serde_json::to_string_pretty(&table).context("failed to serialize table")?;
        println!("{json}");
    } else {
        print!("{}", output::render_text(&table, cli.by_rank));
    }

    if let Some(path) = &cli.csv {
        let file = File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        output::write_csv(&table, file)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!("Wrote CSV to {}", path.display());
    }

    Ok(())
}

/// Ensure a default league.toml exists in `dir`, then load it.
fn load_config_in(dir: &Path) -> anyhow::Result<config::Config> {
    if let Some(written) = config::ensure_config_file(dir)
        .with_context(|| format!("failed to prepare config in {}", dir.display()))?
    {
        info!("Wrote default config to {}", written.display());
    }
    config::load_config_from(dir)
        .with_context(|| format!("failed to load configuration from {}", dir.display()))
}

fn load_scoreboards(paths: &[PathBuf]) -> anyhow::Result<Vec<TeamRecord>> {
    let mut records = Vec::new();
    for path in paths {
        let weekly = provider::parse_scoreboard(&read_json(path)?);
        info!("{}: {} team records", path.display(), weekly.len());
        records.extend(weekly);
    }
    Ok(records)
}

fn read_json(path: &Path) -> anyhow::Result<Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("{} is not valid JSON", path.display()))
}

/// Initialize tracing to stderr.
fn init_tracing() -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt::Subscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("hoopstats=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
