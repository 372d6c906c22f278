//! Plain-text rendering of the map legend, rectangles, and result tables.

use std::fmt::Write as _;

use floorplan_logic::grid::MapGrid;
use floorplan_logic::state::{NoticeLevel, ViewState};
use floorplan_logic::view_model::{ConstraintRow, EvaluationView};
use floorplan_logic::{RenderRectangle, ZoneCategory};
use serde::Serialize;

/// Everything the CLI prints, in machine-readable form.
#[derive(Debug, Serialize)]
pub struct Report<'a> {
    pub grid: MapGrid,
    pub rectangles: &'a [RenderRectangle],
    pub view: &'a EvaluationView,
    pub notice: Option<&'a str>,
}

impl<'a> Report<'a> {
    pub fn new(state: &'a ViewState, grid: MapGrid) -> Self {
        Self {
            grid,
            rectangles: state.rectangles(),
            view: state.view(),
            notice: state.notice().map(|n| n.message.as_str()),
        }
    }
}

/// Bordered table with columns sized to their widest cell.
pub fn table(title: &str, headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }
    let rule: String = widths
        .iter()
        .map(|w| "-".repeat(w + 2))
        .collect::<Vec<_>>()
        .join("+");

    let mut out = String::new();
    let _ = writeln!(out, "{title}");
    let _ = writeln!(out, "+{rule}+");
    let _ = writeln!(out, "{}", table_line(headers.iter().copied(), &widths));
    let _ = writeln!(out, "+{rule}+");
    for row in rows {
        let _ = writeln!(out, "{}", table_line(row.iter().map(String::as_str), &widths));
    }
    let _ = writeln!(out, "+{rule}+");
    out
}

fn table_line<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .zip(widths)
        .map(|(c, &w)| format!(" {c:<w$} "))
        .collect();
    format!("|{}|", padded.join("|"))
}

pub fn legend() -> String {
    let rows: Vec<Vec<String>> = ZoneCategory::LEGEND
        .iter()
        .map(|c| vec![c.name().to_string(), c.color().to_string()])
        .collect();
    table("Legend", &["Zone", "Color"], &rows)
}

pub fn rectangles(grid: &MapGrid, rects: &[RenderRectangle]) -> String {
    let rows: Vec<Vec<String>> = rects
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let [[y0, x0], [y1, x1]] = grid.pixel_bounds(r);
            vec![
                i.to_string(),
                r.category.name().to_string(),
                format!("({}, {}) → ({}, {})", r.x0, r.y0, r.x1, r.y1),
                format!("[[{y0}, {x0}], [{y1}, {x1}]]"),
            ]
        })
        .collect();
    table(
        "Floor Plan (draw order)",
        &["#", "Zone", "Grid", "Pixel bounds"],
        &rows,
    )
}

fn constraint_rows(rows: &[ConstraintRow]) -> Vec<Vec<String>> {
    rows.iter()
        .map(|r| vec![r.constraint.to_string(), r.check.clone()])
        .collect()
}

pub fn view(view: &EvaluationView) -> String {
    let summary: Vec<Vec<String>> = view
        .summary
        .iter()
        .map(|r| vec![r.label.to_string(), r.text.clone()])
        .collect();
    let areas: Vec<Vec<String>> = view
        .zone_area
        .iter()
        .map(|r| {
            vec![
                r.zone.to_string(),
                r.desired_text.clone(),
                r.actual_text.clone(),
            ]
        })
        .collect();
    [
        table("Floor Summary", &["Key Stats", "Area"], &summary),
        table(
            "Zone-Area Constraints",
            &["Zone Types", "Desired Target Area", "Actual Area"],
            &areas,
        ),
        table(
            "General Constraints",
            &["Constraints", "Check_Origin"],
            &constraint_rows(&view.general),
        ),
        table(
            "Zone-Specific Constraints",
            &["Constraints", "Check_Origin"],
            &constraint_rows(&view.zone_specific),
        ),
    ]
    .join("\n")
}

/// Notice line, prefixed by its level; empty when there is none.
pub fn notice(state: &ViewState) -> String {
    match state.notice() {
        Some(n) => {
            let tag = match n.level {
                NoticeLevel::Info => "info",
                NoticeLevel::Error => "error",
            };
            format!("[{tag}] {}\n", n.message)
        }
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_pads_columns() {
        let out = table(
            "T",
            &["a", "bb"],
            &[vec!["long".into(), "x".into()]],
        );
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines[0], "T");
        assert_eq!(lines[1], "+------+----+");
        assert_eq!(lines[2], "| a    | bb |");
        assert_eq!(lines[4], "| long | x  |");
        assert_eq!(lines.len(), 6);
    }

    #[test]
    fn test_legend_lists_seven_zones() {
        let out = legend();
        assert!(out.contains("| CIRC "));
        assert!(out.contains("rgba(0, 0, 0, 255)"));
        assert!(!out.contains("EMPTY"));
    }

    #[test]
    fn test_default_view_tables() {
        let out = view(&EvaluationView::default());
        assert!(out.contains("Floor Summary"));
        assert!(out.contains("| Total Usable Area | 0 sq.ft |"));
        assert!(out.contains("CIRCULATE"));
        assert!(out.contains("0 sq.ft have not been used"));
        assert!(out.contains("There are 0 corners."));
    }

    #[test]
    fn test_rectangles_show_pixel_bounds() {
        let state = ViewState::default();
        let out = rectangles(&MapGrid::default(), state.rectangles());
        assert!(out.contains("ENTRANCE"));
        assert!(out.contains("(1, 2) → (3, 4)"));
        assert!(out.contains("[[256, 128], [512, 384]]"));
    }

    #[test]
    fn test_notice_line() {
        assert_eq!(notice(&ViewState::default()), "");
    }

    #[test]
    fn test_report_serializes() {
        let state = ViewState::default();
        let json = serde_json::to_value(Report::new(&state, MapGrid::default())).unwrap();
        assert_eq!(json["rectangles"][0]["category"], "ENTRANCE");
        assert_eq!(json["view"]["general"][2]["kind"], "Computed");
        assert!(json["notice"].is_null());
    }
}
