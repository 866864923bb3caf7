// League settings payload -> LeagueInfo.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::indexed::{
    as_array, collection_items, field, find_slot, scalar_flag, scalar_string, scalar_u32,
    unwrap_envelope,
};
use super::NormalizeError;
use crate::stats::category::CategoryDefinition;

/// League identity plus the categories it tracks. Built once from a
/// settings payload and not modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeagueInfo {
    pub league_key: String,
    pub name: String,
    pub current_week: Option<u32>,
    pub start_week: Option<u32>,
    pub end_week: Option<u32>,
    pub categories: Vec<CategoryDefinition>,
}

/// Locate the `league` entity array shared by every league-scoped payload.
pub(crate) fn league_slots(payload: &Value) -> Result<&[Value], NormalizeError> {
    let league = field(unwrap_envelope(payload), "league")?;
    as_array(league, "league")
}

/// Parse a settings payload. Returns `None` when the league identity itself
/// cannot be read. A missing category section yields a league with no
/// categories.
pub fn parse_league_info(payload: &Value) -> Option<LeagueInfo> {
    match try_parse_league_info(payload) {
        Ok(info) => Some(info),
        Err(e) => {
            warn!("league settings unreadable: {}", e);
            None
        }
    }
}

fn try_parse_league_info(payload: &Value) -> Result<LeagueInfo, NormalizeError> {
    let slots = league_slots(payload)?;
    let meta = slots.first().ok_or_else(|| NormalizeError::missing("league[0]"))?;
    if !meta.is_object() {
        return Err(NormalizeError::wrong_type("league[0]", "object"));
    }

    let league_key =
        scalar_string(meta.get("league_key")).ok_or_else(|| NormalizeError::missing("league_key"))?;
    let name = scalar_string(meta.get("name")).unwrap_or_else(|| league_key.clone());

    let categories = match parse_categories(&slots[1..]) {
        Ok(categories) => categories,
        Err(e) => {
            warn!("league {}: stat categories unreadable: {}", league_key, e);
            Vec::new()
        }
    };

    Ok(LeagueInfo {
        league_key,
        name,
        current_week: scalar_u32(meta.get("current_week")),
        start_week: scalar_u32(meta.get("start_week")),
        end_week: scalar_u32(meta.get("end_week")),
        categories,
    })
}

fn parse_categories(slots: &[Value]) -> Result<Vec<CategoryDefinition>, NormalizeError> {
    let settings = find_slot(slots, "settings").ok_or_else(|| NormalizeError::missing("settings"))?;

    // `settings` is usually a one-element array, occasionally a bare object.
    let stat_categories = match settings {
        Value::Array(parts) => find_slot(parts, "stat_categories"),
        other => other.get("stat_categories"),
    }
    .ok_or_else(|| NormalizeError::missing("stat_categories"))?;

    let stats = field(stat_categories, "stats")?;
    let mut categories: Vec<CategoryDefinition> = Vec::new();
    for item in collection_items(stats, "stat_categories.stats")? {
        let Some(stat) = item.get("stat") else {
            debug!("stat category entry without `stat` key, skipping");
            continue;
        };
        let Some(stat_id) = scalar_string(stat.get("stat_id")) else {
            debug!("stat category without stat_id, skipping");
            continue;
        };
        if categories.iter().any(|c| c.stat_id == stat_id) {
            debug!("duplicate stat_id {} in categories, keeping first", stat_id);
            continue;
        }
        let name = scalar_string(stat.get("name")).unwrap_or_default();
        let display_name = scalar_string(stat.get("display_name"))
            .or_else(|| scalar_string(stat.get("abbr")))
            .unwrap_or_default();
        categories.push(CategoryDefinition {
            stat_id,
            name,
            display_name,
            is_only_display_stat: scalar_flag(stat.get("is_only_display_stat")),
        });
    }
    Ok(categories)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
