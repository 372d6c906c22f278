//! Floor-plan documents as uploaded by the user.
//!
//! A document maps zone categories to rectangles in grid units:
//!
//! ```
//! use floorplan_logic::document::FloorPlanDocument;
//!
//! let doc = FloorPlanDocument::from_json_str(r#"{"WORK": [[0, 0, 10, 8]], "CIRC": []}"#).unwrap();
//! assert_eq!(doc.zones().len(), 2);
//! assert_eq!(doc.rectangle_count(), 1);
//! ```
//!
//! Zones keep the order in which their keys appear in the file. A repeated
//! key keeps its first position and takes the last value, as `JSON.parse`
//! does.

use serde_json::{Map, Value};

use crate::error::FloorPlanError;
use crate::zones::ZoneCategory;

/// Document shown before the user uploads anything.
pub const INITIAL_DOCUMENT: &str = r#"{"ENTRANCE":[[1,2,3,4]]}"#;

/// Axis-aligned rectangle given by two opposite corners, in grid units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rectangle4 {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl Rectangle4 {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn coords(&self) -> [f64; 4] {
        [self.x0, self.y0, self.x1, self.y1]
    }
}

/// All rectangles of one category.
#[derive(Debug, Clone, PartialEq)]
pub struct Zone {
    pub category: ZoneCategory,
    pub rectangles: Vec<Rectangle4>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FloorPlanDocument {
    zones: Vec<Zone>,
}

impl FloorPlanDocument {
    /// Builds a document from zones, merging repeated categories the same
    /// way a repeated JSON key is handled.
    pub fn from_zones(zones: impl IntoIterator<Item = Zone>) -> Self {
        let mut doc = Self::default();
        for zone in zones {
            doc.insert(zone);
        }
        doc
    }

    pub fn initial() -> Self {
        Self::from_zones([Zone {
            category: ZoneCategory::Entrance,
            rectangles: vec![Rectangle4::new(1.0, 2.0, 3.0, 4.0)],
        }])
    }

    /// Parses uploaded file contents.
    ///
    /// Fails with [`FloorPlanError::MalformedDocument`] for non-JSON input or
    /// a non-object top level, [`FloorPlanError::UnknownCategory`] for a key
    /// that is not a zone category, and
    /// [`FloorPlanError::MalformedRectangle`] for any entry that is not an
    /// array of exactly four numbers.
    pub fn from_json_str(text: &str) -> Result<Self, FloorPlanError> {
        let value: Value = serde_json::from_str(text)
            .map_err(|e| FloorPlanError::MalformedDocument(e.to_string()))?;
        let Value::Object(map) = value else {
            return Err(FloorPlanError::MalformedDocument(format!(
                "expected an object of zone categories, found {}",
                json_kind(&value)
            )));
        };
        Self::from_map(map)
    }

    fn from_map(map: Map<String, Value>) -> Result<Self, FloorPlanError> {
        let mut zones = Vec::with_capacity(map.len());
        for (key, value) in map {
            let category = ZoneCategory::from_name(&key)
                .ok_or_else(|| FloorPlanError::UnknownCategory(key.clone()))?;
            let Value::Array(items) = value else {
                return Err(FloorPlanError::MalformedDocument(format!(
                    "{key} must map to an array of rectangles, found {}",
                    json_kind(&value)
                )));
            };
            let rectangles = items
                .iter()
                .enumerate()
                .map(|(index, item)| parse_rectangle(category, index, item))
                .collect::<Result<Vec<_>, _>>()?;
            zones.push(Zone {
                category,
                rectangles,
            });
        }
        Ok(Self { zones })
    }

    fn insert(&mut self, zone: Zone) {
        match self.zones.iter_mut().find(|z| z.category == zone.category) {
            Some(existing) => existing.rectangles = zone.rectangles,
            None => self.zones.push(zone),
        }
    }

    /// Zones in document-iteration order.
    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn rectangle_count(&self) -> usize {
        self.zones.iter().map(|z| z.rectangles.len()).sum()
    }

    /// Serializes back to the JSON shape the scorer expects, keeping zone
    /// order and the original (unrounded) coordinates.
    pub fn to_json(&self) -> String {
        let mut map = Map::with_capacity(self.zones.len());
        for zone in &self.zones {
            let rects = zone
                .rectangles
                .iter()
                .map(|r| Value::Array(r.coords().into_iter().map(number).collect()))
                .collect();
            map.insert(zone.category.name().to_string(), Value::Array(rects));
        }
        Value::Object(map).to_string()
    }
}

/// Largest coordinate magnitude accepted; every integer up to it is exact
/// in an `f64`.
pub const MAX_COORDINATE: f64 = 9.0e15;

fn parse_rectangle(
    category: ZoneCategory,
    index: usize,
    item: &Value,
) -> Result<Rectangle4, FloorPlanError> {
    let malformed = |reason: String| FloorPlanError::MalformedRectangle {
        category,
        index,
        reason,
    };
    let Value::Array(coords) = item else {
        return Err(malformed(format!(
            "expected an array of 4 coordinates, found {}",
            json_kind(item)
        )));
    };
    if coords.len() != 4 {
        return Err(malformed(format!(
            "expected 4 coordinates, found {}",
            coords.len()
        )));
    }
    let mut out = [0.0; 4];
    for (slot, coord) in out.iter_mut().zip(coords) {
        *slot = coord
            .as_f64()
            .ok_or_else(|| malformed(format!("coordinate {coord} is not a number")))?;
        if slot.abs() > MAX_COORDINATE {
            return Err(malformed(format!("coordinate {coord} is out of range")));
        }
    }
    Ok(Rectangle4::new(out[0], out[1], out[2], out[3]))
}

/// Whole-valued coordinates are written as integers so the payload looks
/// like the file the user uploaded.
fn number(v: f64) -> Value {
    if v.fract() == 0.0 && v.abs() <= MAX_COORDINATE {
        Value::from(v as i64)
    } else {
        serde_json::Number::from_f64(v).map_or(Value::Null, Value::Number)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
