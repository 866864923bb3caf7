// Scoring category definitions and the direction table that decides whether
// a higher or lower raw value is favorable.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ---------------------------------------------------------------------------
// Direction
// ---------------------------------------------------------------------------

/// Whether a higher or lower raw value wins a category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    #[serde(alias = "higher_is_better")]
    Higher,
    #[serde(alias = "lower_is_better")]
    Lower,
}

impl Direction {
    pub fn is_lower_better(self) -> bool {
        self == Direction::Lower
    }

    /// Parse a config value (`"higher"` / `"lower"`, case-insensitive).
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "higher" | "higher_is_better" => Some(Direction::Higher),
            "lower" | "lower_is_better" => Some(Direction::Lower),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Category definition
// ---------------------------------------------------------------------------

/// One statistic a league tracks, as declared by the settings payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryDefinition {
    pub stat_id: String,
    pub name: String,
    pub display_name: String,
    /// Shown for information only; never ranked.
    pub is_only_display_stat: bool,
}

impl CategoryDefinition {
    pub fn new(stat_id: &str, name: &str, display_name: &str) -> Self {
        CategoryDefinition {
            stat_id: stat_id.to_string(),
            name: name.to_string(),
            display_name: display_name.to_string(),
            is_only_display_stat: false,
        }
    }

    pub fn display_only(mut self) -> Self {
        self.is_only_display_stat = true;
        self
    }

    /// Percentage categories hold a 0-1 fraction and are never summed or
    /// divided by a week count.
    pub fn is_percentage(&self) -> bool {
        self.name.contains("Percentage") || self.display_name.ends_with('%')
    }

    /// Short label for table headers; falls back to the full name.
    pub fn label(&self) -> &str {
        if self.display_name.is_empty() {
            &self.name
        } else {
            &self.display_name
        }
    }
}

/// Categories that take part in scoring, in league order.
pub fn scoring_categories(categories: &[CategoryDefinition]) -> Vec<&CategoryDefinition> {
    categories.iter().filter(|c| !c.is_only_display_stat).collect()
}

// ---------------------------------------------------------------------------
// Direction table
// ---------------------------------------------------------------------------

/// Category names treated as lower-is-better when no explicit `stat_id`
/// override exists.
pub const DEFAULT_LOWER_IS_BETTER: &[&str] = &["Turnovers", "TO"];

/// Injectable `stat_id -> Direction` table.
///
/// Resolution order: explicit `stat_id` entry, then a match of the
/// category's name or abbreviation against the lower-is-better name list,
/// then `Direction::Higher`.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionTable {
    by_stat_id: HashMap<String, Direction>,
    lower_is_better_names: Vec<String>,
}

impl DirectionTable {
    /// A table with no overrides and no name list: everything is
    /// higher-is-better.
    pub fn empty() -> Self {
        DirectionTable {
            by_stat_id: HashMap::new(),
            lower_is_better_names: Vec::new(),
        }
    }

    pub fn with_lower_is_better_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lower_is_better_names = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn set(&mut self, stat_id: &str, direction: Direction) {
        self.by_stat_id.insert(stat_id.to_string(), direction);
    }

    pub fn direction_for(&self, category: &CategoryDefinition) -> Direction {
        if let Some(direction) = self.by_stat_id.get(&category.stat_id) {
            return *direction;
        }
        let named_lower = self.lower_is_better_names.iter().any(|n| {
            n.eq_ignore_ascii_case(&category.name) || n.eq_ignore_ascii_case(&category.display_name)
        });
        if named_lower {
            Direction::Lower
        } else {
            Direction::Higher
        }
    }
}

impl Default for DirectionTable {
    fn default() -> Self {
        DirectionTable::empty().with_lower_is_better_names(DEFAULT_LOWER_IS_BETTER.iter().copied())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
