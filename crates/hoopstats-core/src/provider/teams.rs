// Team entities and the standings payload -> Vec<TeamRecord>.

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::{debug, warn};

use super::indexed::{
    as_array, collection_items, field, field_or_first_slot, find_slot, merge_properties,
    scalar_string, scalar_u32,
};
use super::league::league_slots;
use super::NormalizeError;
use crate::stats::parse::{parse_json_stat_value, parse_stat_value};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Win/loss standing attached to a team when the payload carries one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamStanding {
    pub rank: Option<u32>,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    /// Win percentage as a 0-1 fraction.
    pub percentage: f64,
}

/// One team's stats for exactly one observation window (a week or the
/// season). A `stat_id` appears at most once; absent stats read as 0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamRecord {
    pub team_key: String,
    pub team_name: String,
    pub manager: Option<String>,
    /// Observation week for weekly records; `None` for season totals.
    pub week: Option<u32>,
    pub stats: BTreeMap<String, f64>,
    pub standing: Option<TeamStanding>,
}

impl TeamRecord {
    pub fn new(team_key: &str, team_name: &str) -> Self {
        TeamRecord {
            team_key: team_key.to_string(),
            team_name: team_name.to_string(),
            manager: None,
            week: None,
            stats: BTreeMap::new(),
            standing: None,
        }
    }

    pub fn in_week(mut self, week: u32) -> Self {
        self.week = Some(week);
        self
    }

    pub fn with_stat(mut self, stat_id: &str, value: f64) -> Self {
        self.stats.insert(stat_id.to_string(), value);
        self
    }

    /// Value for `stat_id`, 0 when the team did not report it.
    pub fn stat(&self, stat_id: &str) -> f64 {
        self.stats.get(stat_id).copied().unwrap_or(0.0)
    }
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Parse every team in a standings payload. Teams that cannot be read are
/// skipped; an unreadable collection yields an empty `Vec`.
pub fn parse_standings(payload: &Value) -> Vec<TeamRecord> {
    let teams = match standings_teams(payload) {
        Ok(teams) => teams,
        Err(e) => {
            warn!("standings unreadable: {}", e);
            return Vec::new();
        }
    };
    parse_team_collection(teams, None, "standings")
}

/// Parse a single `{"team": [...]}` wrapper or bare team entity array.
pub fn parse_team(entity: &Value) -> Option<TeamRecord> {
    match try_parse_team(entity, None) {
        Ok(team) => Some(team),
        Err(e) => {
            warn!("team unreadable: {}", e);
            None
        }
    }
}

fn standings_teams(payload: &Value) -> Result<&Value, NormalizeError> {
    let slots = league_slots(payload)?;
    let standings = find_slot(slots, "standings").ok_or_else(|| NormalizeError::missing("standings"))?;
    let teams = match standings {
        Value::Array(parts) => find_slot(parts, "teams"),
        other => field_or_first_slot(other, "teams"),
    };
    teams.ok_or_else(|| NormalizeError::missing("teams"))
}

/// Parse an indexed `teams` collection, skipping unreadable teams.
pub(crate) fn parse_team_collection(
    teams: &Value,
    week: Option<u32>,
    section: &str,
) -> Vec<TeamRecord> {
    let items = match collection_items(teams, "teams") {
        Ok(items) => items,
        Err(e) => {
            warn!("{}: team collection unreadable: {}", section, e);
            return Vec::new();
        }
    };

    let mut records = Vec::with_capacity(items.len());
    for (i, item) in items.into_iter().enumerate() {
        match try_parse_team(item, week) {
            Ok(team) => records.push(team),
            Err(e) => warn!("{}: skipping team #{}: {}", section, i, e),
        }
    }
    records
}

// ---------------------------------------------------------------------------
// Entity parsing
// ---------------------------------------------------------------------------

pub(crate) fn try_parse_team(item: &Value, week: Option<u32>) -> Result<TeamRecord, NormalizeError> {
    let entity = item.get("team").unwrap_or(item);
    let slots = as_array(entity, "team")?;
    let props_slot = slots.first().ok_or_else(|| NormalizeError::missing("team[0]"))?;
    let props = merge_properties(props_slot, "team[0]")?;

    let team_key =
        scalar_string(props.get("team_key")).ok_or_else(|| NormalizeError::missing("team_key"))?;
    let team_name = scalar_string(props.get("name")).unwrap_or_else(|| team_key.clone());
    let detail_slots = &slots[1..];

    let (stats, stats_week) = match find_slot(detail_slots, "team_stats") {
        Some(team_stats) => match parse_team_stats(team_stats) {
            Ok(parsed) => parsed,
            Err(e) => {
                debug!("team {}: stats unreadable ({}), treating as empty", team_key, e);
                (BTreeMap::new(), None)
            }
        },
        None => {
            debug!("team {}: no team_stats slot", team_key);
            (BTreeMap::new(), None)
        }
    };

    let standing = find_slot(detail_slots, "team_standings").and_then(|s| {
        parse_standing(s)
            .map_err(|e| debug!("team {}: standings unreadable: {}", team_key, e))
            .ok()
    });

    Ok(TeamRecord {
        manager: first_manager(&props),
        week: stats_week.or(week),
        team_key,
        team_name,
        stats,
        standing,
    })
}

fn first_manager(props: &Map<String, Value>) -> Option<String> {
    let managers = props.get("managers")?;
    let first = match managers {
        Value::Array(list) => list.first()?,
        other => other.get("0")?,
    };
    let manager = first.get("manager").unwrap_or(first);
    scalar_string(manager.get("nickname"))
}

type ParsedStats = (BTreeMap<String, f64>, Option<u32>);

fn parse_team_stats(team_stats: &Value) -> Result<ParsedStats, NormalizeError> {
    let week = scalar_u32(team_stats.get("week"));
    let stats = field(team_stats, "stats")?;
    let mut values = BTreeMap::new();
    for item in collection_items(stats, "team_stats.stats")? {
        let stat = item.get("stat").unwrap_or(item);
        let Some(stat_id) = scalar_string(stat.get("stat_id")) else {
            debug!("stat entry without stat_id, skipping");
            continue;
        };
        let value = stat.get("value").map(parse_json_stat_value).unwrap_or(0.0);
        values.insert(stat_id, value);
    }
    Ok((values, week))
}

fn parse_standing(standings: &Value) -> Result<TeamStanding, NormalizeError> {
    if !standings.is_object() {
        return Err(NormalizeError::wrong_type("team_standings", "object"));
    }
    let totals = field(standings, "outcome_totals")?;
    let percentage = match totals.get("percentage") {
        Some(Value::String(s)) => parse_stat_value(s),
        Some(other) => parse_json_stat_value(other),
        None => 0.0,
    };
    Ok(TeamStanding {
        rank: scalar_u32(standings.get("rank")),
        wins: scalar_u32(totals.get("wins")).unwrap_or(0),
        losses: scalar_u32(totals.get("losses")).unwrap_or(0),
        ties: scalar_u32(totals.get("ties")).unwrap_or(0),
        percentage,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
