// Weekly scoreboard payload -> one TeamRecord per team per matchup, each
// tagged with the matchup's week.

use serde_json::Value;
use tracing::{debug, warn};

use super::indexed::{collection_items, field_or_first_slot, find_slot, scalar_u32};
use super::league::league_slots;
use super::teams::{parse_team_collection, TeamRecord};
use super::NormalizeError;

/// Parse every team appearing in a scoreboard payload.
pub fn parse_scoreboard(payload: &Value) -> Vec<TeamRecord> {
    let (matchups, default_week) = match scoreboard_matchups(payload) {
        Ok(found) => found,
        Err(e) => {
            warn!("scoreboard unreadable: {}", e);
            return Vec::new();
        }
    };

    let items = match collection_items(matchups, "matchups") {
        Ok(items) => items,
        Err(e) => {
            warn!("scoreboard matchups unreadable: {}", e);
            return Vec::new();
        }
    };

    let mut records = Vec::new();
    for (i, item) in items.into_iter().enumerate() {
        let matchup = item.get("matchup").unwrap_or(item);
        let week = scalar_u32(matchup.get("week")).or(default_week);
        let Some(teams) = field_or_first_slot(matchup, "teams") else {
            debug!("matchup #{} has no teams, skipping", i);
            continue;
        };
        records.extend(parse_team_collection(teams, week, "scoreboard"));
    }
    records
}

fn scoreboard_matchups(payload: &Value) -> Result<(&Value, Option<u32>), NormalizeError> {
    let slots = league_slots(payload)?;
    let scoreboard =
        find_slot(slots, "scoreboard").ok_or_else(|| NormalizeError::missing("scoreboard"))?;
    let week = scalar_u32(scoreboard.get("week"));
    let matchups = field_or_first_slot(scoreboard, "matchups")
        .ok_or_else(|| NormalizeError::missing("matchups"))?;
    Ok((matchups, week))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn team(key: &str, pts: u32) -> Value {
        json!({"team": [
            [{"team_key": key}, {"name": format!("Team {key}")}],
            {"team_stats": {"coverage_type": "week", "stats": [
                {"stat": {"stat_id": "12", "value": pts.to_string()}}
            ]}}
        ]})
    }

    #[test]
    fn parses_all_matchups_with_week() {
        let payload = json!({"fantasy_content": {"league": [
            {"league_key": "l"},
            {"scoreboard": {"week": "3", "0": {"matchups": {
                "0": {"matchup": {"week": "3", "0": {"teams": {"0": team("a", 80), "1": team("b", 95), "count": 2}}}},
                "1": {"matchup": {"0": {"teams": {"0": team("c", 70), "1": team("d", 60), "count": 2}}}},
                "count": 2
            }}}}
        ]}});
        let records = parse_scoreboard(&payload);
        let keys: Vec<&str> = records.iter().map(|r| r.team_key.as_str()).collect();
        assert_eq!(keys, vec!["a", "b", "c", "d"]);
        assert!(records.iter().all(|r| r.week == Some(3)));
        assert_eq!(records[1].stat("12"), 95.0);
    }

    #[test]
    fn matchup_week_overrides_scoreboard_week() {
        let payload = json!({"league": [
            {"league_key": "l"},
            {"scoreboard": {"week": 3, "matchups": [
                {"matchup": {"week": 2, "teams": [team("a", 10)]}}
            ]}}
        ]});
        let records = parse_scoreboard(&payload);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].week, Some(2));
    }

    #[test]
    fn matchup_without_teams_is_skipped() {
        let payload = json!({"league": [
            {"league_key": "l"},
            {"scoreboard": {"matchups": {
                "0": {"matchup": {"week": "1"}},
                "1": {"matchup": {"week": "1", "teams": {"0": team("z", 5), "count": 1}}},
                "count": 2
            }}}
        ]});
        let records = parse_scoreboard(&payload);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].team_key, "z");
    }

    #[test]
    fn unreadable_scoreboard_is_empty() {
        assert!(parse_scoreboard(&json!({})).is_empty());
        assert!(parse_scoreboard(&json!({"league": [{"league_key": "l"}]})).is_empty());
        assert!(parse_scoreboard(&json!({"league": [{}, {"scoreboard": {"matchups": 7}}]})).is_empty());
    }
}
