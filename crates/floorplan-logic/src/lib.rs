//! Pure floor-plan evaluation logic.
//!
//! This crate contains everything the evaluation client does that is
//! independent of networking or any UI framework. Functions take plain data
//! and return results, so the whole pipeline is unit-testable and can be
//! driven from the CLI, the headless harness, or any future front end.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`zones`] | Zone categories, fixed colors, legend, target area fractions |
//! | [`document`] | `FloorPlanDocument` parsing from uploaded JSON |
//! | [`render`] | Render-ready rectangles with CIRC-first draw order |
//! | [`grid`] | Pixel map geometry (bounds, gridlines, rectangle bounds) |
//! | [`metrics`] | Lenient decoding of the scorer's `EvaluationResult` |
//! | [`view_model`] | Table rows derived from an evaluation result |
//! | [`state`] | Immutable view state, update function, request sequencing |
//! | [`error`] | Parse-time and evaluation-time error types |

pub mod document;
pub mod error;
pub mod grid;
pub mod metrics;
pub mod render;
pub mod state;
pub mod view_model;
pub mod zones;

pub use document::{FloorPlanDocument, Rectangle4, Zone};
pub use error::{EvaluationError, FloorPlanError, MetricDecodeError};
pub use metrics::EvaluationResult;
pub use render::{parse_floor_plan, render_rectangles, RenderRectangle};
pub use state::{update, Event, RequestId, ViewState};
pub use view_model::EvaluationView;
pub use zones::{Rgba, ZoneCategory};
