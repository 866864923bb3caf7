// Configuration loading and parsing (league.toml).

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::format::DEFAULT_HEAT_CEILING_PERCENT;
use crate::report::TableOptions;
use crate::stats::aggregate::AggregationWindow;
use crate::stats::category::{Direction, DirectionTable, DEFAULT_LOWER_IS_BETTER};

/// File name looked up inside the config directory.
pub const CONFIG_FILE_NAME: &str = "league.toml";

/// Built-in defaults written on first run.
pub const DEFAULT_LEAGUE_TOML: &str = include_str!("../defaults/league.toml");

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to write default config: {message}")]
    DefaultsWriteError { message: String },

    #[error("could not determine a config directory for this platform")]
    NoConfigDir,
}

// ---------------------------------------------------------------------------
// league.toml structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub league: LeagueSection,
    #[serde(default)]
    pub categories: CategoriesSection,
    #[serde(default)]
    pub window: WindowSection,
    #[serde(default)]
    pub display: DisplaySection,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeagueSection {
    /// Overrides the provider's league name in reports.
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoriesSection {
    #[serde(default = "default_lower_is_better")]
    pub lower_is_better: Vec<String>,
    /// `stat_id -> "higher" | "lower"`.
    #[serde(default)]
    pub directions: BTreeMap<String, String>,
}

impl Default for CategoriesSection {
    fn default() -> Self {
        CategoriesSection {
            lower_is_better: default_lower_is_better(),
            directions: BTreeMap::new(),
        }
    }
}

fn default_lower_is_better() -> Vec<String> {
    DEFAULT_LOWER_IS_BETTER.iter().map(|s| s.to_string()).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowKind {
    Season,
    LastWeeks,
    Weeks,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WindowSection {
    pub kind: WindowKind,
    #[serde(default = "default_last_weeks")]
    pub last_weeks: u32,
    #[serde(default = "default_week")]
    pub from: u32,
    #[serde(default = "default_week")]
    pub to: u32,
}

impl Default for WindowSection {
    fn default() -> Self {
        WindowSection {
            kind: WindowKind::Season,
            last_weeks: default_last_weeks(),
            from: default_week(),
            to: default_week(),
        }
    }
}

fn default_last_weeks() -> u32 {
    3
}

fn default_week() -> u32 {
    1
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
    Total,
    WeeklyAverage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DisplaySection {
    pub view: ViewKind,
    #[serde(default = "default_heat_ceiling")]
    pub heat_ceiling_percent: f64,
}

impl Default for DisplaySection {
    fn default() -> Self {
        DisplaySection {
            view: ViewKind::Total,
            heat_ceiling_percent: default_heat_ceiling(),
        }
    }
}

fn default_heat_ceiling() -> f64 {
    DEFAULT_HEAT_CEILING_PERCENT
}

// ---------------------------------------------------------------------------
// Derived runtime values
// ---------------------------------------------------------------------------

impl Config {
    /// The lower-is-better name list plus explicit `stat_id` overrides.
    pub fn direction_table(&self) -> DirectionTable {
        let mut table =
            DirectionTable::empty().with_lower_is_better_names(self.categories.lower_is_better.clone());
        for (stat_id, raw) in &self.categories.directions {
            if let Some(direction) = Direction::parse(raw) {
                table.set(stat_id, direction);
            }
        }
        table
    }

    /// The configured aggregation window. `last_weeks` counts back from
    /// `current_week`; without one it covers weeks `1..=last_weeks`.
    pub fn window(&self, current_week: Option<u32>) -> AggregationWindow {
        match self.window.kind {
            WindowKind::Season => AggregationWindow::Season,
            WindowKind::LastWeeks => {
                let n = self.window.last_weeks;
                AggregationWindow::last_weeks(current_week.unwrap_or(n), n)
            }
            WindowKind::Weeks => AggregationWindow::Weeks {
                from: self.window.from,
                to: self.window.to,
            },
        }
    }

    pub fn table_options(&self, current_week: Option<u32>) -> TableOptions {
        TableOptions {
            window: self.window(current_week),
            weekly_average: self.display.view == ViewKind::WeeklyAverage,
            heat_ceiling_percent: self.display.heat_ceiling_percent,
        }
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Parse and validate config text. `path` is only used in error messages.
pub fn parse_config(text: &str, path: &Path) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;
    validate(&config)?;
    Ok(config)
}

/// Load and validate `league.toml` from `config_dir`.
pub fn load_config_from(config_dir: &Path) -> Result<Config, ConfigError> {
    let path = config_dir.join(CONFIG_FILE_NAME);
    let text = read_file(&path)?;
    parse_config(&text, &path)
}

/// Write the built-in `league.toml` into `config_dir` if it is missing.
/// Returns the path written, or `None` when a file already existed.
pub fn ensure_config_file(config_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    std::fs::create_dir_all(config_dir).map_err(|e| ConfigError::DefaultsWriteError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let target = config_dir.join(CONFIG_FILE_NAME);
    match std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&target)
    {
        Ok(mut dest) => {
            std::io::Write::write_all(&mut dest, DEFAULT_LEAGUE_TOML.as_bytes()).map_err(|e| {
                ConfigError::DefaultsWriteError {
                    message: format!("failed to write {}: {e}", target.display()),
                }
            })?;
            Ok(Some(target))
        }
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => Ok(None),
        Err(e) => Err(ConfigError::DefaultsWriteError {
            message: format!("failed to create {}: {e}", target.display()),
        }),
    }
}

/// Platform config directory for hoopstats.
pub fn default_config_dir() -> Result<PathBuf, ConfigError> {
    directories::ProjectDirs::from("", "", "hoopstats")
        .map(|dirs| dirs.config_dir().to_path_buf())
        .ok_or(ConfigError::NoConfigDir)
}

/// Convenience wrapper: ensures the default file exists in the platform
/// config directory, then loads it.
pub fn load_config() -> Result<Config, ConfigError> {
    let dir = default_config_dir()?;
    ensure_config_file(&dir)?;
    load_config_from(&dir)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let window = &config.window;
    match window.kind {
        WindowKind::Season => {}
        WindowKind::LastWeeks => {
            if window.last_weeks == 0 {
                return Err(ConfigError::ValidationError {
                    field: "window.last_weeks".into(),
                    message: "must be greater than 0".into(),
                });
            }
        }
        WindowKind::Weeks => {
            if window.from == 0 {
                return Err(ConfigError::ValidationError {
                    field: "window.from".into(),
                    message: "weeks start at 1".into(),
                });
            }
            if window.from > window.to {
                return Err(ConfigError::ValidationError {
                    field: "window.to".into(),
                    message: format!("must be >= window.from ({}), got {}", window.from, window.to),
                });
            }
        }
    }

    let ceiling = config.display.heat_ceiling_percent;
    if !(ceiling.is_finite() && ceiling > 0.0) {
        return Err(ConfigError::ValidationError {
            field: "display.heat_ceiling_percent".into(),
            message: format!("must be > 0, got {ceiling}"),
        });
    }

    for (stat_id, raw) in &config.categories.directions {
        if Direction::parse(raw).is_none() {
            return Err(ConfigError::ValidationError {
                field: format!("categories.directions.{stat_id}"),
                message: format!("expected \"higher\" or \"lower\", got \"{raw}\""),
            });
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
