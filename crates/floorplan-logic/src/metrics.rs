//! Decoding of the scorer's evaluation response.
//!
//! The scorer writes every field through Python's `str()`, so a scalar may
//! arrive as `1000` or `"1000.0"`, and a nested mapping may arrive as a JSON
//! object or as a dict literal like `"{'WORK': -120.5}"`. Both ambiguities
//! are resolved here, once, before anything downstream sees the result.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{EvaluationError, MetricDecodeError};
use crate::zones::{ZoneCategory, AREA_TARGETS};

/// Per-key numeric metrics, e.g. `size_score` keyed by category name.
pub type Metrics = BTreeMap<String, f64>;

/// Categories the scorer reports in `size_score`. `OBS` (obstacles) is a
/// scorer-side category with no zone of its own.
pub const SCORED_CATEGORIES: [&str; 7] =
    ["CIRC", "OPERATE", "WORK", "ENTRANCE", "MEET", "WASH", "OBS"];

/// A numeric field as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(f64),
    Text(String),
}

impl Scalar {
    pub fn to_f64(&self, field: &'static str) -> Result<f64, MetricDecodeError> {
        match self {
            Self::Number(v) => Ok(*v),
            Self::Text(s) => s.trim().parse().map_err(|_| MetricDecodeError::Scalar {
                field,
                value: s.clone(),
            }),
        }
    }
}

/// A mapping-valued field as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    /// Python dict literal, single-quoted.
    Encoded(String),
    Decoded(Map<String, Value>),
}

impl MetricValue {
    /// The one place the string-or-object ambiguity is resolved.
    pub fn normalize(self, field: &'static str) -> Result<Metrics, MetricDecodeError> {
        let map = match self {
            Self::Decoded(map) => map,
            Self::Encoded(text) => {
                let rewritten = text.replace('\'', "\"");
                serde_json::from_str::<Map<String, Value>>(&rewritten).map_err(|source| {
                    MetricDecodeError::Encoded {
                        field,
                        value: text,
                        source,
                    }
                })?
            }
        };
        map.into_iter()
            .map(|(key, value)| match entry_f64(&value) {
                Some(v) => Ok((key, v)),
                None => Err(MetricDecodeError::Entry { field, key }),
            })
            .collect()
    }
}

fn entry_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Response body exactly as the scorer sends it.
#[derive(Debug, Clone, Deserialize)]
struct WireEvaluation {
    total_area: Scalar,
    total_usable_area: Scalar,
    total_used_area: Scalar,
    align_score: Scalar,
    hallway_access_score: Scalar,
    hallway_number: Scalar,
    work_ext_score: Scalar,
    meet_score: Scalar,
    size_score: MetricValue,
    lounge_score: MetricValue,
    #[serde(default)]
    desired_size: Option<MetricValue>,
}

/// Whether the entrance lounge touches the core and good views. Counts of
/// touching edges; 0 means no contact.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct LoungeScore {
    pub touch_core: f64,
    pub touch_gv: f64,
}

/// A fully decoded evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationResult {
    pub total_area: f64,
    pub total_usable_area: f64,
    pub total_used_area: f64,
    pub align_score: f64,
    pub hallway_access_score: f64,
    pub hallway_number: f64,
    pub work_ext_score: f64,
    pub meet_score: f64,
    /// Desired-minus-used area per category; negative means area consumed.
    pub size_score: Metrics,
    pub lounge_score: LoungeScore,
    pub desired_size: Option<Metrics>,
}

impl Default for EvaluationResult {
    /// The zeroed result shown before any evaluation succeeds.
    fn default() -> Self {
        Self {
            total_area: 0.0,
            total_usable_area: 0.0,
            total_used_area: 0.0,
            align_score: 0.0,
            hallway_access_score: 0.0,
            hallway_number: 0.0,
            work_ext_score: 0.0,
            meet_score: 0.0,
            size_score: SCORED_CATEGORIES
                .iter()
                .map(|c| (c.to_string(), 0.0))
                .collect(),
            lounge_score: LoungeScore::default(),
            desired_size: None,
        }
    }
}

impl EvaluationResult {
    /// Decodes a response body. Fails with [`EvaluationError::Shape`] when
    /// the body is not an object with the expected fields, and with
    /// [`EvaluationError::Decode`] when a field cannot be normalized.
    pub fn from_json_str(body: &str) -> Result<Self, EvaluationError> {
        let wire: WireEvaluation =
            serde_json::from_str(body).map_err(|e| EvaluationError::shape(e.to_string()))?;
        Self::from_wire(wire)
    }

    fn from_wire(wire: WireEvaluation) -> Result<Self, EvaluationError> {
        let size_score = wire.size_score.normalize("size_score")?;
        for target in &AREA_TARGETS {
            let name = target.category.name();
            if !size_score.contains_key(name) {
                return Err(EvaluationError::shape(format!(
                    "size_score has no entry for {name}"
                )));
            }
        }

        let lounge = wire.lounge_score.normalize("lounge_score")?;
        let lounge_entry = |key: &str| {
            lounge
                .get(key)
                .copied()
                .ok_or_else(|| EvaluationError::shape(format!("lounge_score has no {key}")))
        };
        let lounge_score = LoungeScore {
            touch_core: lounge_entry("touch_core")?,
            touch_gv: lounge_entry("touch_gv")?,
        };

        let desired_size = wire
            .desired_size
            .map(|v| v.normalize("desired_size"))
            .transpose()?;

        Ok(Self {
            total_area: wire.total_area.to_f64("total_area")?,
            total_usable_area: wire.total_usable_area.to_f64("total_usable_area")?,
            total_used_area: wire.total_used_area.to_f64("total_used_area")?,
            align_score: wire.align_score.to_f64("align_score")?,
            hallway_access_score: wire.hallway_access_score.to_f64("hallway_access_score")?,
            hallway_number: wire.hallway_number.to_f64("hallway_number")?,
            work_ext_score: wire.work_ext_score.to_f64("work_ext_score")?,
            meet_score: wire.meet_score.to_f64("meet_score")?,
            size_score,
            lounge_score,
            desired_size,
        })
    }

    /// Raw `size_score` entry for a category, 0 when absent.
    pub fn size_delta(&self, category: ZoneCategory) -> f64 {
        self.size_score
            .get(category.name())
            .copied()
            .unwrap_or(0.0)
    }

    /// Area a category actually occupies. The scorer reports consumed area
    /// as a negative delta, so the sign is flipped here.
    pub fn consumed_area(&self, category: ZoneCategory) -> f64 {
        -self.size_delta(category)
    }

    pub fn unused_area(&self) -> f64 {
        self.total_usable_area - self.total_used_area
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PYTHON_STYLE: &str = r#"{
        "align_score": "3.5",
        "size_score": "{'CIRC': -20.0, 'OPERATE': 0.0, 'WORK': -120.5, 'ENTRANCE': -4, 'MEET': -6.0, 'WASH': 0.0, 'OBS': 0.0}",
        "desired_size": "{'CIRC': 0.0, 'WORK': 0.0}",
        "lounge_score": "{'touch_gv': 2, 'touch_core': 1}",
        "hallway_access_score": "0",
        "work_ext_score": "96.0",
        "meet_score": "0",
        "hallway_number": "3",
        "total_area": "1000.0",
        "total_usable_area": "1000.0",
        "total_used_area": "900.0"
    }"#;

    const JSON_STYLE: &str = r#"{
        "align_score": 3.5,
        "size_score": {"CIRC": -20.0, "OPERATE": 0.0, "WORK": -120.5, "ENTRANCE": -4, "MEET": -6.0, "WASH": 0.0, "OBS": 0.0},
        "lounge_score": {"touch_gv": 2, "touch_core": 1},
        "hallway_access_score": 0,
        "work_ext_score": 96,
        "meet_score": 0,
        "hallway_number": 3,
        "total_area": 1000,
        "total_usable_area": 1000,
        "total_used_area": 900
    }"#;

    #[test]
    fn test_encoded_equals_decoded() {
        let encoded = MetricValue::Encoded("{'WORK': -120.5}".into())
            .normalize("size_score")
            .unwrap();
        let decoded: MetricValue = serde_json::from_str(r#"{"WORK": -120.5}"#).unwrap();
        assert_eq!(encoded, decoded.normalize("size_score").unwrap());
        assert_eq!(encoded["WORK"], -120.5);
    }

    #[test]
    fn test_invalid_encoded_string() {
        let err = MetricValue::Encoded("{'WORK': oops}".into())
            .normalize("size_score")
            .unwrap_err();
        assert!(matches!(
            err,
            MetricDecodeError::Encoded {
                field: "size_score",
                ..
            }
        ));
    }

    #[test]
    fn test_non_numeric_entry() {
        let err = MetricValue::Encoded("{'WORK': [1]}".into())
            .normalize("size_score")
            .unwrap_err();
        assert!(matches!(err, MetricDecodeError::Entry { .. }));
    }

    #[test]
    fn test_scalar_text_and_number() {
        assert_eq!(Scalar::Text(" 12.5 ".into()).to_f64("x").unwrap(), 12.5);
        assert_eq!(Scalar::Number(3.0).to_f64("x").unwrap(), 3.0);
        assert!(Scalar::Text("many".into()).to_f64("x").is_err());
    }

    #[test]
    fn test_python_style_response_matches_json_style() {
        let a = EvaluationResult::from_json_str(PYTHON_STYLE).unwrap();
        let b = EvaluationResult::from_json_str(JSON_STYLE).unwrap();
        assert_eq!(a.size_score, b.size_score);
        assert_eq!(a.lounge_score, b.lounge_score);
        assert_eq!(a.total_usable_area, 1000.0);
        assert_eq!(a.hallway_number, 3.0);
        assert!(a.desired_size.is_some());
        assert!(b.desired_size.is_none());
    }

    #[test]
    fn test_consumed_area_flips_sign() {
        let r = EvaluationResult::from_json_str(JSON_STYLE).unwrap();
        assert_eq!(r.size_delta(ZoneCategory::Work), -120.5);
        assert_eq!(r.consumed_area(ZoneCategory::Work), 120.5);
        assert_eq!(r.unused_area(), 100.0);
    }

    #[test]
    fn test_missing_field_is_shape_error() {
        let err = EvaluationResult::from_json_str(r#"{"total_area": 1}"#).unwrap_err();
        assert!(matches!(err, EvaluationError::Shape { .. }));
        let err = EvaluationResult::from_json_str("[]").unwrap_err();
        assert!(matches!(err, EvaluationError::Shape { .. }));
    }

    #[test]
    fn test_missing_target_category_is_shape_error() {
        let body = JSON_STYLE.replace(r#""MEET": -6.0, "#, "");
        let err = EvaluationResult::from_json_str(&body).unwrap_err();
        match err {
            EvaluationError::Shape { reason } => assert!(reason.contains("MEET")),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_missing_lounge_key_is_shape_error() {
        let body = JSON_STYLE.replace(r#""touch_gv": 2, "#, "");
        let err = EvaluationResult::from_json_str(&body).unwrap_err();
        assert!(matches!(err, EvaluationError::Shape { .. }));
    }

    #[test]
    fn test_undecodable_metric_is_decode_error() {
        let body = PYTHON_STYLE.replace("'touch_gv': 2", "'touch_gv': two");
        let err = EvaluationResult::from_json_str(&body).unwrap_err();
        assert!(matches!(err, EvaluationError::Decode(_)));
    }

    #[test]
    fn test_default_is_zeroed() {
        let r = EvaluationResult::default();
        assert_eq!(r.size_score.len(), SCORED_CATEGORIES.len());
        assert!(r.size_score.values().all(|v| *v == 0.0));
        assert_eq!(r.unused_area(), 0.0);
    }
}
