// Walking helpers for the provider's index-keyed JSON convention.

use serde_json::{Map, Value};
use tracing::debug;

use super::NormalizeError;

/// Step into `key` of an object.
pub fn field<'a>(value: &'a Value, key: &str) -> Result<&'a Value, NormalizeError> {
    value.get(key).ok_or_else(|| NormalizeError::missing(key))
}

pub fn as_array<'a>(value: &'a Value, at: &str) -> Result<&'a [Value], NormalizeError> {
    value
        .as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| NormalizeError::wrong_type(at, "array"))
}

/// Strip the optional `fantasy_content` envelope the proxy may leave on.
pub fn unwrap_envelope(payload: &Value) -> &Value {
    payload.get("fantasy_content").unwrap_or(payload)
}

/// Read the explicit `count` of an indexed pseudo-array. Accepts a JSON
/// number or a numeric string.
pub fn collection_count(collection: &Value, at: &str) -> Result<usize, NormalizeError> {
    let raw = field(collection, "count")?;
    let count = match raw {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    count
        .and_then(|c| usize::try_from(c).ok())
        .ok_or_else(|| NormalizeError::BadCount { at: at.to_string() })
}

/// The items of a collection, in order.
///
/// Indexed pseudo-arrays are walked `0..count` by the explicit `count`
/// field; an absent slot is skipped. Only slots the object actually holds
/// are visited, so the work is bounded by the object's size whatever
/// `count` claims. A real JSON array is returned as-is.
pub fn collection_items<'a>(collection: &'a Value, at: &str) -> Result<Vec<&'a Value>, NormalizeError> {
    if let Some(items) = collection.as_array() {
        return Ok(items.iter().collect());
    }
    let Some(obj) = collection.as_object() else {
        return Err(NormalizeError::wrong_type(at, "indexed collection"));
    };

    let count = collection_count(collection, at)?;
    let mut slots: Vec<(usize, &Value)> = obj
        .iter()
        .filter_map(|(key, item)| {
            let index = key.parse::<usize>().ok()?;
            // "01" and "+1" are not slot keys.
            (index < count && index.to_string() == *key).then_some((index, item))
        })
        .collect();
    slots.sort_unstable_by_key(|(index, _)| *index);

    if slots.len() < count {
        debug!(
            "{at}: {} of {count} slots absent, skipping",
            count - slots.len()
        );
    }
    Ok(slots.into_iter().map(|(_, item)| item).collect())
}

/// Merge an array of single-key objects into one flat map. Later keys win
/// on collision; non-object entries (the provider pads with `[]`) are
/// ignored.
pub fn merge_properties(props: &Value, at: &str) -> Result<Map<String, Value>, NormalizeError> {
    let entries = as_array(props, at)?;
    let mut merged = Map::new();
    for entry in entries {
        if let Some(obj) = entry.as_object() {
            for (k, v) in obj {
                merged.insert(k.clone(), v.clone());
            }
        }
    }
    Ok(merged)
}

/// Find the first slot among `slots` that is an object holding `key`, and
/// return that key's value.
pub fn find_slot<'a>(slots: &'a [Value], key: &str) -> Option<&'a Value> {
    slots.iter().find_map(|slot| slot.as_object().and_then(|o| o.get(key)))
}

/// Look up `key` directly, or one level down under the `"0"` slot, which is
/// where the provider places some wrapped substructures.
pub fn field_or_first_slot<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    value
        .get(key)
        .or_else(|| value.get("0").and_then(|inner| inner.get(key)))
}

/// Render a scalar field as a string. Strings are trimmed; numbers are
/// formatted; anything else is `None`.
pub fn scalar_string(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Read a non-negative integer that may be encoded as a number or a string.
pub fn scalar_u32(value: Option<&Value>) -> Option<u32> {
    match value? {
        Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    }
}

/// Read a provider flag: `"1"`, `1` and `true` are set.
pub fn scalar_flag(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_u64() == Some(1),
        Some(Value::String(s)) => s.trim() == "1",
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn count_driven_iteration_skips_absent_slots() {
        let coll = json!({"0": "a", "2": "c", "count": 3, "99": "ignored"});
        let items = collection_items(&coll, "test").unwrap();
        assert_eq!(items, vec![&json!("a"), &json!("c")]);
    }

    #[test]
    fn count_may_be_a_string() {
        let coll = json!({"0": 1, "1": 2, "count": "2"});
        assert_eq!(collection_items(&coll, "test").unwrap().len(), 2);
    }

    #[test]
    fn missing_count_is_an_error() {
        let coll = json!({"0": 1});
        assert_eq!(
            collection_items(&coll, "test"),
            Err(NormalizeError::missing("count"))
        );
        let bad = json!({"0": 1, "count": "many"});
        assert!(matches!(
            collection_items(&bad, "test"),
            Err(NormalizeError::BadCount { .. })
        ));
    }

    #[test]
    fn oversized_count_only_visits_present_slots() {
        let coll = json!({"0": "a", "1": "b", "count": u64::MAX});
        let items = collection_items(&coll, "test").unwrap();
        assert_eq!(items, vec![&json!("a"), &json!("b")]);
        assert!(collection_items(&json!({"count": u64::MAX}), "test")
            .unwrap()
            .is_empty());
        let huge = json!({"0": "a", "name": "x", "count": 10_000_000_000u64});
        assert_eq!(collection_items(&huge, "test").unwrap().len(), 1);
    }

    #[test]
    fn non_canonical_index_keys_are_not_slots() {
        let coll = json!({"00": "zero", "01": "one", "1": "real", "count": 2});
        assert_eq!(collection_items(&coll, "test").unwrap(), vec![&json!("real")]);
    }

    #[test]
    fn real_arrays_pass_through() {
        let coll = json!([1, 2, 3]);
        assert_eq!(collection_items(&coll, "test").unwrap().len(), 3);
        assert!(collection_items(&json!("nope"), "test").is_err());
    }

    #[test]
    fn merge_properties_unions_and_last_wins() {
        let props = json!([{"team_key": "t.1"}, [], {"name": "First"}, {"name": "Second"}]);
        let merged = merge_properties(&props, "team").unwrap();
        assert_eq!(merged.get("team_key"), Some(&json!("t.1")));
        assert_eq!(merged.get("name"), Some(&json!("Second")));
        assert_eq!(merged.len(), 2);
    }

    #[test]
    fn merge_properties_rejects_non_array() {
        assert!(merge_properties(&json!({"name": "x"}), "team").is_err());
    }

    #[test]
    fn find_slot_scans_objects() {
        let slots = vec![json!([]), json!({"team_points": 1}), json!({"team_stats": {"x": 1}})];
        assert_eq!(find_slot(&slots, "team_stats"), Some(&json!({"x": 1})));
        assert_eq!(find_slot(&slots, "team_standings"), None);
    }

    #[test]
    fn field_or_first_slot_looks_one_level_down() {
        let direct = json!({"teams": 1});
        let wrapped = json!({"0": {"teams": 2}});
        assert_eq!(field_or_first_slot(&direct, "teams"), Some(&json!(1)));
        assert_eq!(field_or_first_slot(&wrapped, "teams"), Some(&json!(2)));
        assert_eq!(field_or_first_slot(&json!({}), "teams"), None);
    }

    #[test]
    fn scalar_helpers() {
        assert_eq!(scalar_string(Some(&json!(" Hoops "))), Some("Hoops".into()));
        assert_eq!(scalar_string(Some(&json!(12))), Some("12".into()));
        assert_eq!(scalar_string(Some(&json!(null))), None);
        assert_eq!(scalar_u32(Some(&json!("7"))), Some(7));
        assert_eq!(scalar_u32(Some(&json!(7))), Some(7));
        assert_eq!(scalar_u32(Some(&json!("-1"))), None);
        assert!(scalar_flag(Some(&json!("1"))));
        assert!(scalar_flag(Some(&json!(true))));
        assert!(!scalar_flag(Some(&json!("0"))));
        assert!(!scalar_flag(None));
    }

    #[test]
    fn envelope_is_optional() {
        let wrapped = json!({"fantasy_content": {"league": []}});
        let bare = json!({"league": []});
        assert_eq!(unwrap_envelope(&wrapped), &json!({"league": []}));
        assert_eq!(unwrap_envelope(&bare), &bare);
    }
}
