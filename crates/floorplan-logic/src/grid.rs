//! Pixel map geometry for drawing a floor plan.
//!
//! The map is a square of `cells × cells` grid cells, each `cell_px`
//! pixels wide, where one cell is one square foot. The square spans
//! `[min_v, max_v]` on both axes with the origin one fifth of the way in,
//! so plans with small negative coordinates still fit.
//!
//! The map collaborator takes points in row/column (`[y, x]`) order.

use serde::Serialize;

use crate::render::RenderRectangle;

/// A `[y, x]` point in map pixels.
pub type MapPoint = [f64; 2];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapGrid {
    pub cell_px: f64,
    pub cells: u32,
    pub min_zoom: i32,
}

impl Default for MapGrid {
    fn default() -> Self {
        Self {
            cell_px: 128.0,
            cells: 500,
            min_zoom: -5,
        }
    }
}

/// One gridline, drawn from `from` to `to`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GridLine {
    pub from: MapPoint,
    pub to: MapPoint,
    /// Stroke weight; every tenth line is drawn heavier.
    pub weight: f64,
}

impl MapGrid {
    pub fn min_v(&self) -> f64 {
        -(f64::from(self.cells) / 5.0) * self.cell_px
    }

    pub fn max_v(&self) -> f64 {
        4.0 * (f64::from(self.cells) / 5.0) * self.cell_px
    }

    /// South-west and north-east corners of the pannable area.
    pub fn bounds(&self) -> [MapPoint; 2] {
        let (lo, hi) = (self.min_v(), self.max_v());
        [[lo, lo], [hi, hi]]
    }

    pub fn center(&self) -> MapPoint {
        let mid = (self.min_v() + self.max_v()) / 2.0;
        [mid, mid]
    }

    /// Pixel bounds of a rectangle, corners in `[y, x]` order.
    pub fn pixel_bounds(&self, rect: &RenderRectangle) -> [MapPoint; 2] {
        let px = self.cell_px;
        [
            [rect.y0 as f64 * px, rect.x0 as f64 * px],
            [rect.y1 as f64 * px, rect.x1 as f64 * px],
        ]
    }

    /// Horizontal lines first, then vertical; `cells + 1` of each.
    pub fn gridlines(&self) -> Vec<GridLine> {
        let (lo, hi) = (self.min_v(), self.max_v());
        let n = self.cells as usize + 1;
        let mut lines = Vec::with_capacity(n * 2);
        for idx in 0..n {
            let at = idx as f64 * self.cell_px + lo;
            lines.push(GridLine {
                from: [at, lo],
                to: [at, hi],
                weight: line_weight(idx),
            });
        }
        for idx in 0..n {
            let at = idx as f64 * self.cell_px + lo;
            lines.push(GridLine {
                from: [lo, at],
                to: [hi, at],
                weight: line_weight(idx),
            });
        }
        lines
    }
}

fn line_weight(idx: usize) -> f64 {
    if idx % 10 == 0 {
        0.1
    } else {
        0.05
    }
}
