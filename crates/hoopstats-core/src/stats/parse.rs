// Stat value parsing: raw provider strings to finite numbers.
//
// Rules, first match wins:
// 1. Leading `.` (".485"): a 0-1 fraction, returned as-is.
// 2. Contains `/` ("56/66"): a made/attempted display value, returns 0.
// 3. Anything else parses as a float; failure or a non-finite result is 0.

use serde_json::Value;

/// Parse one raw stat string into a finite number.
pub fn parse_stat_value(raw: &str) -> f64 {
    let trimmed = raw.trim();

    if trimmed.starts_with('.') {
        return trimmed
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .unwrap_or(0.0);
    }

    if trimmed.contains('/') {
        return 0.0;
    }

    trimmed
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Parse a stat value straight from JSON. Numbers are rendered to their
/// string form first so both spellings share one rule set; `null`, bools,
/// arrays and objects are 0.
pub fn parse_json_stat_value(raw: &Value) -> f64 {
    match raw {
        Value::String(s) => parse_stat_value(s),
        Value::Number(n) => parse_stat_value(&n.to_string()),
        _ => 0.0,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
