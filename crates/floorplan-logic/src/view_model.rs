//! Table rows derived from an [`EvaluationResult`].
//!
//! Pure function of the result; no network, no parsing. Four tables:
//! floor summary, zone-area targets, general constraints, and zone-specific
//! constraints.

use serde::Serialize;

use crate::metrics::EvaluationResult;
use crate::zones::{ZoneCategory, AREA_TARGETS};

/// Check text for constraints the scorer does not verify yet.
pub const ASSERTED: &str = "True";

/// Formats a number the way the tables show it, matching JavaScript's
/// number-to-string: shortest round-trip digits, exponent form outside
/// `[1e-6, 1e21)`, and negative zero shown as `0`.
pub fn format_number(v: f64) -> String {
    if v == 0.0 {
        return "0".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    let magnitude = v.abs();
    if magnitude >= 1e21 {
        // `{:e}` omits the sign of a positive exponent
        format!("{v:e}").replacen('e', "e+", 1)
    } else if magnitude < 1e-6 {
        format!("{v:e}")
    } else {
        format!("{v}")
    }
}

pub fn format_area(v: f64) -> String {
    format!("{} sq.ft", format_number(v))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub label: &'static str,
    pub area: f64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ZoneAreaRow {
    pub zone: &'static str,
    pub category: ZoneCategory,
    pub desired_area: f64,
    pub actual_area: f64,
    pub desired_text: String,
    pub actual_text: String,
}

/// How a constraint row's check was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Check {
    /// Static placeholder, not verified by anyone.
    Asserted,
    /// Derived from the scorer's metrics.
    Computed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstraintRow {
    pub constraint: &'static str,
    pub check: String,
    pub kind: Check,
}

impl ConstraintRow {
    fn asserted(constraint: &'static str) -> Self {
        Self {
            constraint,
            check: ASSERTED.to_string(),
            kind: Check::Asserted,
        }
    }

    fn computed(constraint: &'static str, check: String) -> Self {
        Self {
            constraint,
            check,
            kind: Check::Computed,
        }
    }
}

/// Everything the result tables display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationView {
    pub summary: Vec<SummaryRow>,
    pub zone_area: Vec<ZoneAreaRow>,
    pub general: Vec<ConstraintRow>,
    pub zone_specific: Vec<ConstraintRow>,
}

impl Default for EvaluationView {
    fn default() -> Self {
        Self::from_result(&EvaluationResult::default())
    }
}

impl EvaluationView {
    pub fn from_result(result: &EvaluationResult) -> Self {
        Self {
            summary: summary_rows(result),
            zone_area: zone_area_rows(result),
            general: general_rows(result),
            zone_specific: zone_specific_rows(result),
        }
    }
}

fn summary_rows(result: &EvaluationResult) -> Vec<SummaryRow> {
    [
        ("Total Area", result.total_area),
        ("Total Usable Area", result.total_usable_area),
        ("Total Used Area", result.total_used_area),
    ]
    .into_iter()
    .map(|(label, area)| SummaryRow {
        label,
        area,
        text: format_area(area),
    })
    .collect()
}

fn zone_area_rows(result: &EvaluationResult) -> Vec<ZoneAreaRow> {
    AREA_TARGETS
        .iter()
        .map(|target| {
            let desired_area = target.fraction * result.total_usable_area;
            let actual_area = result.consumed_area(target.category);
            ZoneAreaRow {
                zone: target.label,
                category: target.category,
                desired_area,
                actual_area,
                desired_text: format_area(desired_area),
                actual_text: format_area(actual_area),
            }
        })
        .collect()
}

fn general_rows(result: &EvaluationResult) -> Vec<ConstraintRow> {
    vec![
        ConstraintRow::asserted(
            "Enclosure: All the Zones should be located inside of the floor plan boundary.",
        ),
        ConstraintRow::asserted("Non-overlapping: There is no overlap between zones."),
        ConstraintRow::computed(
            "Full-coverage: The zones should collectively cover all the floor area.",
            format!("{} have not been used", format_area(result.unused_area())),
        ),
        ConstraintRow::asserted("Accessibility: All zones can access to circulate."),
    ]
}

fn zone_specific_rows(result: &EvaluationResult) -> Vec<ConstraintRow> {
    let lounge = result.lounge_score;
    vec![
        ConstraintRow::asserted("CIRCULATE is a minimum of 4 ft. wide."),
        ConstraintRow::computed(
            "ENTRANCE LOUNGE should be close to the elevator lobby and have good views/daylight.",
            format!(
                "Access to elevator: {}; Access to views: {}",
                format_number(lounge.touch_core),
                format_number(lounge.touch_gv)
            ),
        ),
        ConstraintRow::computed(
            "Maximize WORK area along the exterior boundary.",
            format!("Exterior workspace is {}", format_area(result.work_ext_score)),
        ),
        ConstraintRow::computed(
            "Minimize corners/turns of CIRCULATE.",
            format!(
                "There are {} corners.",
                format_number(result.hallway_number)
            ),
        ),
        ConstraintRow::asserted("CIRCULATE should connect to floor exits and elevators."),
        ConstraintRow::asserted("Conference rooms are preferred to be located alongside the core."),
        ConstraintRow::asserted("Phone booths and printers are better distributed across a floor."),
    ]
}
