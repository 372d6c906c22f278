//! Floor-plan evaluation headless harness
//!
//! Validates the parse, render, decode, and sequencing logic against the
//! bundled sample data. Runs entirely in-process with no scorer and no
//! networking.
//!
//! Usage:
//!   cargo run -p floorplan-simtest
//!   cargo run -p floorplan-simtest -- --verbose

use floorplan_logic::grid::MapGrid;
use floorplan_logic::render::round_half_up;
use floorplan_logic::state::{NoticeLevel, Outcome};
use floorplan_logic::view_model::Check;
use floorplan_logic::{
    parse_floor_plan, update, EvaluationError, EvaluationResult, EvaluationView, Event,
    FloorPlanDocument, FloorPlanError, RequestId, ViewState, ZoneCategory,
};

// ── Bundled samples (same files the integration tests use) ─────────────
const PLAN_JSON: &str = include_str!("../../../data/sample_floor_plan.json");
const EVALUATION_JSON: &str = include_str!("../../../data/sample_evaluation.json");

// ── Test harness ────────────────────────────────────────────────────────

struct TestResult {
    name: String,
    passed: bool,
    detail: String,
}

impl TestResult {
    fn check(name: &str, passed: bool, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed,
            detail: detail.into(),
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("error")).init();
    let verbose = std::env::args().any(|a| a == "--verbose");
    println!("=== Floor Plan Evaluation Harness ===\n");

    let mut results = Vec::new();

    // 1. Parser ordering and rounding
    results.extend(validate_parser());

    // 2. Malformed documents
    results.extend(validate_rejections());

    // 3. Map geometry
    results.extend(validate_grid());

    // 4. Scorer response decoding and tables
    results.extend(validate_evaluation());

    // 5. Request sequencing
    results.extend(validate_sequencing());

    // ── Summary ──
    println!();
    let passed = results.iter().filter(|r| r.passed).count();
    let failed = results.len() - passed;

    for r in &results {
        let icon = if r.passed { "✓" } else { "✗" };
        if !r.passed || verbose {
            println!("  {} {}: {}", icon, r.name, r.detail);
        }
    }

    println!(
        "\n=== RESULT: {}/{} passed, {} failed ===",
        passed,
        results.len(),
        failed
    );

    if failed > 0 {
        std::process::exit(1);
    }
}

// ── 1. Parser ───────────────────────────────────────────────────────────

fn validate_parser() -> Vec<TestResult> {
    println!("--- Parser ---");
    let mut results = Vec::new();

    let rects = match parse_floor_plan(PLAN_JSON) {
        Ok(r) => r,
        Err(e) => {
            results.push(TestResult::check(
                "plan_parse",
                false,
                format!("sample plan rejected: {e}"),
            ));
            return results;
        }
    };

    let expected = FloorPlanDocument::from_json_str(PLAN_JSON)
        .map(|d| d.rectangle_count())
        .unwrap_or(0);
    results.push(TestResult::check(
        "plan_rectangle_count",
        rects.len() == expected && expected == 9,
        format!("{} rectangles rendered, {} in document", rects.len(), expected),
    ));

    let circ = rects
        .iter()
        .take_while(|r| r.category == ZoneCategory::Circ)
        .count();
    let stray_circ = rects[circ..]
        .iter()
        .any(|r| r.category == ZoneCategory::Circ);
    results.push(TestResult::check(
        "plan_circ_first",
        circ == 2 && !stray_circ,
        format!("{circ} CIRC rectangles lead the draw order"),
    ));

    let rest: Vec<_> = rects[circ..].iter().map(|r| r.category.name()).collect();
    let want = ["WORK", "WORK", "MEET", "ENTRANCE", "WASH", "OPERATE", "EMPTY"];
    results.push(TestResult::check(
        "plan_document_order",
        rest == want,
        format!("remaining order {}", rest.join(", ")),
    ));

    let work = rects
        .iter()
        .filter(|r| r.category == ZoneCategory::Work)
        .nth(1)
        .map(|r| (r.x0, r.y0, r.x1, r.y1));
    let entrance = rects
        .iter()
        .find(|r| r.category == ZoneCategory::Entrance)
        .map(|r| r.y1);
    results.push(TestResult::check(
        "plan_rounding",
        work == Some((20, 0, 40, 12)) && entrance == Some(26),
        format!("12.4 → {:?}, 25.5 → {:?}", work.map(|w| w.3), entrance),
    ));

    let halves = [
        (2.5, 3),
        (-2.5, -2),
        (-0.5, 0),
        (0.49, 0),
    ];
    let bad: Vec<_> = halves
        .iter()
        .filter(|(v, want)| round_half_up(*v) != *want)
        .collect();
    results.push(TestResult::check(
        "rounding_half_up",
        bad.is_empty(),
        if bad.is_empty() {
            "halves round toward +∞".to_string()
        } else {
            format!("{} values rounded wrong: {bad:?}", bad.len())
        },
    ));

    let colors_ok = rects.iter().all(|r| r.color == r.category.color());
    results.push(TestResult::check(
        "plan_colors",
        colors_ok,
        "every rectangle carries its zone color",
    ));

    results
}

// ── 2. Rejections ───────────────────────────────────────────────────────

fn validate_rejections() -> Vec<TestResult> {
    println!("--- Rejections ---");
    let cases: [(&str, &str, fn(&FloorPlanError) -> bool); 4] = [
        ("reject_not_object", "[1, 2]", |e| {
            matches!(e, FloorPlanError::MalformedDocument(_))
        }),
        ("reject_short_rectangle", r#"{"WORK": [[0, 0, 1]]}"#, |e| {
            matches!(e, FloorPlanError::MalformedRectangle { .. })
        }),
        ("reject_text_coordinate", r#"{"WORK": [[0, "a", 1, 1]]}"#, |e| {
            matches!(e, FloorPlanError::MalformedRectangle { .. })
        }),
        ("reject_unknown_zone", r#"{"ATRIUM": [[0, 0, 1, 1]]}"#, |e| {
            matches!(e, FloorPlanError::UnknownCategory(_))
        }),
    ];

    cases
        .into_iter()
        .map(|(name, text, expected)| match parse_floor_plan(text) {
            Ok(rects) => TestResult::check(
                name,
                false,
                format!("accepted with {} rectangles", rects.len()),
            ),
            Err(e) => TestResult::check(name, expected(&e), e.to_string()),
        })
        .collect()
}

// ── 3. Map geometry ─────────────────────────────────────────────────────

fn validate_grid() -> Vec<TestResult> {
    println!("--- Map Grid ---");
    let grid = MapGrid::default();
    let mut results = Vec::new();

    results.push(TestResult::check(
        "grid_bounds",
        grid.min_v() == -12800.0 && grid.max_v() == 51200.0,
        format!("[{}, {}]", grid.min_v(), grid.max_v()),
    ));

    let lines = grid.gridlines();
    let heavy = lines.iter().filter(|l| l.weight > 0.05).count();
    results.push(TestResult::check(
        "grid_lines",
        lines.len() == 1002 && heavy == 102,
        format!("{} lines, {} heavy", lines.len(), heavy),
    ));

    let rects = parse_floor_plan(PLAN_JSON).unwrap_or_default();
    let (lo, hi) = (grid.min_v(), grid.max_v());
    let outside = rects
        .iter()
        .map(|r| grid.pixel_bounds(r))
        .filter(|b| b.iter().flatten().any(|v| *v < lo || *v > hi))
        .count();
    results.push(TestResult::check(
        "grid_sample_fits",
        !rects.is_empty() && outside == 0,
        format!("{} rectangles, {} outside the map", rects.len(), outside),
    ));

    results
}

// ── 4. Evaluation ───────────────────────────────────────────────────────

fn validate_evaluation() -> Vec<TestResult> {
    println!("--- Evaluation ---");
    let mut results = Vec::new();

    let result = match EvaluationResult::from_json_str(EVALUATION_JSON) {
        Ok(r) => r,
        Err(e) => {
            results.push(TestResult::check(
                "evaluation_decode",
                false,
                format!("sample response rejected: {e}"),
            ));
            return results;
        }
    };
    results.push(TestResult::check(
        "evaluation_decode",
        true,
        "single-quoted metrics decoded",
    ));

    results.push(TestResult::check(
        "evaluation_size_score",
        result.consumed_area(ZoneCategory::Circ) == 216.0
            && result.consumed_area(ZoneCategory::Work) == 120.5,
        format!(
            "CIRC {} WORK {}",
            result.consumed_area(ZoneCategory::Circ),
            result.consumed_area(ZoneCategory::Work)
        ),
    ));

    let view = EvaluationView::from_result(&result);
    let desired: Vec<_> = view
        .zone_area
        .iter()
        .map(|r| r.desired_text.as_str())
        .collect();
    results.push(TestResult::check(
        "view_desired_areas",
        desired == ["540 sq.ft", "60 sq.ft", "100 sq.ft", "200 sq.ft"],
        desired.join(", "),
    ));

    let coverage = &view.general[2];
    results.push(TestResult::check(
        "view_full_coverage",
        coverage.check == "100 sq.ft have not been used" && coverage.kind == Check::Computed,
        coverage.check.clone(),
    ));

    let lounge = &view.zone_specific[1].check;
    results.push(TestResult::check(
        "view_lounge_access",
        lounge == "Access to elevator: 1; Access to views: 2",
        lounge.clone(),
    ));

    let asserted = view
        .general
        .iter()
        .chain(&view.zone_specific)
        .filter(|r| r.kind == Check::Asserted)
        .count();
    results.push(TestResult::check(
        "view_placeholders_marked",
        asserted == 7,
        format!("{asserted} rows are static placeholders"),
    ));

    let missing_key = EvaluationResult::from_json_str(r#"{"total_area": 1}"#);
    results.push(TestResult::check(
        "evaluation_shape_error",
        matches!(missing_key, Err(EvaluationError::Shape { .. })),
        "incomplete response rejected",
    ));

    results
}

// ── 5. Sequencing ───────────────────────────────────────────────────────

fn submit(state: &ViewState, text: &str) -> Option<(ViewState, RequestId)> {
    let doc = FloorPlanDocument::from_json_str(text).ok()?;
    match update(state, Event::DocumentLoaded(doc)) {
        (next, Outcome::Submit(req)) => Some((next, req.id)),
        _ => None,
    }
}

fn finish(
    state: &ViewState,
    request: RequestId,
    outcome: Result<EvaluationResult, EvaluationError>,
) -> (ViewState, Outcome) {
    update(state, Event::EvaluationFinished { request, outcome })
}

fn validate_sequencing() -> Vec<TestResult> {
    println!("--- Sequencing ---");
    let mut results = Vec::new();

    let s0 = ViewState::default();
    let Some((s1, a)) = submit(&s0, r#"{"WORK": [[0, 0, 1, 1]]}"#) else {
        results.push(TestResult::check("sequence_submit", false, "load rejected"));
        return results;
    };
    let Some((s2, b)) = submit(&s1, PLAN_JSON) else {
        results.push(TestResult::check("sequence_submit", false, "load rejected"));
        return results;
    };
    results.push(TestResult::check(
        "sequence_ids_increase",
        b > a && s2.pending() == Some(b),
        format!("{} then {}", a.get(), b.get()),
    ));

    let late = EvaluationResult {
        total_area: 1.0,
        ..EvaluationResult::default()
    };
    let (s3, outcome) = finish(&s2, a, Ok(late));
    results.push(TestResult::check(
        "sequence_stale_dropped",
        matches!(outcome, Outcome::Stale(_)) && s3 == s2,
        "superseded response left the state unchanged",
    ));

    let fresh = EvaluationResult::from_json_str(EVALUATION_JSON).unwrap_or_default();
    let (s4, outcome) = finish(&s3, b, Ok(fresh));
    results.push(TestResult::check(
        "sequence_latest_applied",
        matches!(outcome, Outcome::Applied(_)) && s4.evaluation().total_area == 1000.0,
        format!("total area {}", s4.evaluation().total_area),
    ));

    let Some((s5, c)) = submit(&s4, PLAN_JSON) else {
        results.push(TestResult::check("sequence_submit", false, "load rejected"));
        return results;
    };
    let (s6, outcome) = finish(&s5, c, Err(EvaluationError::Status { status: 502 }));
    let notice_is_error = s6
        .notice()
        .map(|n| n.level == NoticeLevel::Error)
        .unwrap_or(false);
    results.push(TestResult::check(
        "sequence_failure_keeps_view",
        matches!(outcome, Outcome::Failed(_)) && notice_is_error && s6.view() == s4.view(),
        s6.notice().map(|n| n.message.clone()).unwrap_or_default(),
    ));

    results
}
