//! Projection of a floor-plan document into render-ready rectangles.
//!
//! Draw order is a fixed rule: every CIRC rectangle comes first so hallways
//! are painted under all other zones, then every other category in
//! document order. Order within each group follows the document.

use serde::Serialize;

use crate::document::{FloorPlanDocument, Rectangle4};
use crate::error::FloorPlanError;
use crate::zones::{Rgba, ZoneCategory};

/// A rectangle snapped to whole grid cells, with its fill color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RenderRectangle {
    pub x0: i64,
    pub y0: i64,
    pub x1: i64,
    pub y1: i64,
    pub category: ZoneCategory,
    pub color: Rgba,
}

/// Rounds half-way values toward positive infinity: 2.5 → 3, −2.5 → −2.
pub fn round_half_up(v: f64) -> i64 {
    // `(v + 0.5).floor()` is off by one where the addition itself rounds
    let f = v.floor();
    let rounded = if v - f >= 0.5 { f + 1.0 } else { f };
    rounded as i64
}

fn snap(rect: &Rectangle4, category: ZoneCategory) -> RenderRectangle {
    RenderRectangle {
        x0: round_half_up(rect.x0),
        y0: round_half_up(rect.y0),
        x1: round_half_up(rect.x1),
        y1: round_half_up(rect.y1),
        category,
        color: category.color(),
    }
}

/// Produces the ordered render sequence for a parsed document.
pub fn render_rectangles(doc: &FloorPlanDocument) -> Vec<RenderRectangle> {
    let (circ, rest): (Vec<_>, Vec<_>) = doc
        .zones()
        .iter()
        .flat_map(|zone| zone.rectangles.iter().map(|r| snap(r, zone.category)))
        .partition(|r| r.category == ZoneCategory::Circ);
    let mut out = circ;
    out.extend(rest);
    out
}

/// Parses uploaded text straight to rectangles. Any parse error aborts
/// before a single rectangle is produced.
pub fn parse_floor_plan(text: &str) -> Result<Vec<RenderRectangle>, FloorPlanError> {
    let doc = FloorPlanDocument::from_json_str(text)?;
    let rects = render_rectangles(&doc);
    log::debug!(
        "parsed floor plan: {} zones, {} rectangles",
        doc.zones().len(),
        rects.len()
    );
    Ok(rects)
}
