// Display formatting for category tables.
//
// Pure functions only: no numeric logic is re-derived here beyond scaling
// and dividing what the statistics engine already produced.

use serde::Serialize;

use crate::stats::category::{CategoryDefinition, Direction};

// ---------------------------------------------------------------------------
// View
// ---------------------------------------------------------------------------

/// How counting categories are shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DisplayView {
    /// The aggregated total for the window.
    Total,
    /// The aggregated total divided by the window's week count.
    WeeklyAverage { num_weeks: u32 },
}

// ---------------------------------------------------------------------------
// Numbers
// ---------------------------------------------------------------------------

/// Ordinal suffix for a rank: 1st, 2nd, 3rd, everything else "th".
///
/// Keyed on the last digit only, so 11, 12 and 13 come out as "11st",
/// "12nd" and "13rd". Leagues are expected to stay at or below ten teams.
pub fn ordinal(rank: usize) -> String {
    let suffix = match rank % 10 {
        1 => "st",
        2 => "nd",
        3 => "rd",
        _ => "th",
    };
    format!("{rank}{suffix}")
}

/// A 0-1 fraction as a one-decimal percentage: 0.485 -> "48.5%".
pub fn format_percentage(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

/// Total divided by week count to one decimal. A zero week count shows the
/// total unchanged.
pub fn format_weekly_average(total: f64, num_weeks: u32) -> String {
    if num_weeks == 0 {
        return format_total(total);
    }
    format!("{:.1}", total / num_weeks as f64)
}

/// Whole totals without decimals, fractional totals to one decimal.
pub fn format_total(total: f64) -> String {
    if total.fract() == 0.0 {
        format!("{:.0}", total)
    } else {
        format!("{:.1}", total)
    }
}

/// Signed one-decimal percent difference: "+16.1%", "-8.0%", "0.0%".
pub fn format_percent_diff(percent_diff: f64) -> String {
    if percent_diff > 0.0 {
        format!("+{:.1}%", percent_diff)
    } else if percent_diff < 0.0 {
        format!("{:.1}%", percent_diff)
    } else {
        "0.0%".to_string()
    }
}

/// Display string for an aggregated category value. Percentage categories
/// ignore the view and are never divided by the week count.
pub fn display_value(category: &CategoryDefinition, value: f64, view: DisplayView) -> String {
    if category.is_percentage() {
        return format_percentage(value);
    }
    match view {
        DisplayView::Total => format_total(value),
        DisplayView::WeeklyAverage { num_weeks } => format_weekly_average(value, num_weeks),
    }
}

// ---------------------------------------------------------------------------
// Heat mapping
// ---------------------------------------------------------------------------

/// Opacity at a percent diff of zero.
pub const MIN_HEAT_OPACITY: f64 = 0.1;
/// Opacity at or beyond the ceiling.
pub const MAX_HEAT_OPACITY: f64 = 0.6;
/// `|percent_diff|` at which intensity saturates.
pub const DEFAULT_HEAT_CEILING_PERCENT: f64 = 25.0;

/// Linear opacity from `MIN_HEAT_OPACITY` at 0 to `MAX_HEAT_OPACITY` at
/// `ceiling_percent`, clamped beyond it. A non-positive ceiling saturates
/// immediately.
pub fn heat_opacity(percent_diff: f64, ceiling_percent: f64) -> f64 {
    let magnitude = percent_diff.abs();
    if ceiling_percent <= 0.0 {
        return MAX_HEAT_OPACITY;
    }
    let t = (magnitude / ceiling_percent).min(1.0);
    MIN_HEAT_OPACITY + (MAX_HEAT_OPACITY - MIN_HEAT_OPACITY) * t
}

/// Whether a cell's deviation from average is good news for the team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HeatTone {
    Favorable,
    Unfavorable,
    Neutral,
}

impl HeatTone {
    pub fn from_percent_diff(percent_diff: f64, direction: Direction) -> Self {
        if percent_diff == 0.0 {
            return HeatTone::Neutral;
        }
        let above = percent_diff > 0.0;
        if above != direction.is_lower_better() {
            HeatTone::Favorable
        } else {
            HeatTone::Unfavorable
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    #[test]
    fn ordinal_basic() {
        assert_eq!(ordinal(1), "1st");
        assert_eq!(ordinal(2), "2nd");
        assert_eq!(ordinal(3), "3rd");
        assert_eq!(ordinal(4), "4th");
        assert_eq!(ordinal(10), "10th");
    }

    #[test]
    fn ordinal_keeps_naive_teens() {
        assert_eq!(ordinal(11), "11st");
        assert_eq!(ordinal(12), "12nd");
        assert_eq!(ordinal(13), "13rd");
        assert_eq!(ordinal(14), "14th");
    }

    #[test]
    fn percentage_formatting() {
        assert_eq!(format_percentage(0.485), "48.5%");
        assert_eq!(format_percentage(0.0), "0.0%");
        assert_eq!(format_percentage(1.0), "100.0%");
    }

    #[test]
    fn weekly_average_formatting() {
        assert_eq!(format_weekly_average(175.0, 2), "87.5");
        assert_eq!(format_weekly_average(180.0, 2), "90.0");
        assert_eq!(format_weekly_average(175.0, 0), "175");
    }

    #[test]
    fn total_formatting() {
        assert_eq!(format_total(1200.0), "1200");
        assert_eq!(format_total(12.34), "12.3");
        assert_eq!(format_total(0.0), "0");
    }

    #[test]
    fn percent_diff_formatting() {
        assert_eq!(format_percent_diff(16.129), "+16.1%");
        assert_eq!(format_percent_diff(-8.0), "-8.0%");
        assert_eq!(format_percent_diff(0.0), "0.0%");
    }

    #[test]
    fn display_value_never_divides_percentages() {
        let fg = CategoryDefinition::new("5", "Field Goal Percentage", "FG%");
        let pts = CategoryDefinition::new("12", "Points Scored", "PTS");
        let weekly = DisplayView::WeeklyAverage { num_weeks: 2 };
        assert_eq!(display_value(&fg, 0.485, weekly), "48.5%");
        assert_eq!(display_value(&fg, 0.485, DisplayView::Total), "48.5%");
        assert_eq!(display_value(&pts, 175.0, weekly), "87.5");
        assert_eq!(display_value(&pts, 175.0, DisplayView::Total), "175");
    }

    #[test]
    fn heat_opacity_boundaries() {
        let ceiling = DEFAULT_HEAT_CEILING_PERCENT;
        assert!(approx_eq(heat_opacity(0.0, ceiling), MIN_HEAT_OPACITY, 1e-12));
        assert!(approx_eq(heat_opacity(12.5, ceiling), 0.35, 1e-12));
        assert!(approx_eq(heat_opacity(-12.5, ceiling), 0.35, 1e-12));
        assert!(approx_eq(heat_opacity(25.0, ceiling), MAX_HEAT_OPACITY, 1e-12));
        assert!(approx_eq(heat_opacity(80.0, ceiling), MAX_HEAT_OPACITY, 1e-12));
        assert!(approx_eq(heat_opacity(5.0, 0.0), MAX_HEAT_OPACITY, 1e-12));
    }

    #[test]
    fn heat_tone_respects_direction() {
        assert_eq!(HeatTone::from_percent_diff(10.0, Direction::Higher), HeatTone::Favorable);
        assert_eq!(HeatTone::from_percent_diff(-10.0, Direction::Higher), HeatTone::Unfavorable);
        assert_eq!(HeatTone::from_percent_diff(10.0, Direction::Lower), HeatTone::Unfavorable);
        assert_eq!(HeatTone::from_percent_diff(-10.0, Direction::Lower), HeatTone::Favorable);
        assert_eq!(HeatTone::from_percent_diff(0.0, Direction::Lower), HeatTone::Neutral);
    }
}
