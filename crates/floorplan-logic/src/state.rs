//! View state and its update function.
//!
//! The state is immutable: [`update`] takes the current state and one
//! [`Event`] and returns the next state plus an [`Outcome`] telling the
//! caller what happened. Loading a document issues a new [`RequestId`];
//! only a completion carrying the id of the latest request is applied, so
//! a slow response for a superseded document can never overwrite the model.
//!
//! # Event Flow
//!
//! 1. Caller parses uploaded text into a `FloorPlanDocument` (parse errors
//!    stop here, the state is untouched)
//! 2. `DocumentLoaded` → rectangles replaced, info notice set,
//!    `Outcome::Submit(request)`
//! 3. Caller sends the request and later feeds back `EvaluationFinished`
//! 4. Matching id → result and view replaced (or notice set on failure);
//!    any other id → `Outcome::Stale`, state unchanged

use std::sync::Arc;

use crate::document::FloorPlanDocument;
use crate::error::EvaluationError;
use crate::metrics::EvaluationResult;
use crate::render::{render_rectangles, RenderRectangle};
use crate::view_model::EvaluationView;

/// Identity of one evaluation request. Ids increase monotonically within a
/// state lineage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

impl RequestId {
    pub fn get(self) -> u64 {
        self.0
    }
}

/// An evaluation the caller must dispatch.
#[derive(Debug, Clone)]
pub struct EvaluationRequest {
    pub id: RequestId,
    pub document: Arc<FloorPlanDocument>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Transient message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

#[derive(Debug)]
pub enum Event {
    DocumentLoaded(FloorPlanDocument),
    EvaluationFinished {
        request: RequestId,
        outcome: Result<EvaluationResult, EvaluationError>,
    },
    NoticeDismissed,
}

/// What an event did to the state.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// A document was accepted; dispatch this request.
    Submit(EvaluationRequest),
    /// The result for the active request replaced the view.
    Applied(RequestId),
    /// The active request failed; the last good view is kept.
    Failed(RequestId),
    /// A completion for a superseded or already-finished request. Ignored.
    Stale(RequestId),
    Dismissed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    document: Arc<FloorPlanDocument>,
    rectangles: Arc<[RenderRectangle]>,
    evaluation: Arc<EvaluationResult>,
    view: Arc<EvaluationView>,
    pending: Option<RequestId>,
    issued: u64,
    notice: Option<Notice>,
}

impl Default for ViewState {
    /// Initial document, zeroed evaluation, nothing in flight.
    fn default() -> Self {
        let document = FloorPlanDocument::initial();
        let rectangles = render_rectangles(&document).into();
        Self {
            document: Arc::new(document),
            rectangles,
            evaluation: Arc::new(EvaluationResult::default()),
            view: Arc::new(EvaluationView::default()),
            pending: None,
            issued: 0,
            notice: None,
        }
    }
}

impl ViewState {
    pub fn document(&self) -> &FloorPlanDocument {
        &self.document
    }

    /// Render sequence for the current document.
    pub fn rectangles(&self) -> &[RenderRectangle] {
        &self.rectangles
    }

    /// Last successfully applied evaluation (zeroed before the first).
    pub fn evaluation(&self) -> &EvaluationResult {
        &self.evaluation
    }

    pub fn view(&self) -> &EvaluationView {
        &self.view
    }

    /// Request whose completion would be applied, if one is outstanding.
    pub fn pending(&self) -> Option<RequestId> {
        self.pending
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// The `DocumentLoaded` transition: replaces the document and its
    /// rectangles and issues the request that supersedes any pending one.
    pub fn with_document(
        &self,
        document: FloorPlanDocument,
    ) -> (ViewState, EvaluationRequest) {
        let id = RequestId(self.issued + 1);
        let document = Arc::new(document);
        let next = ViewState {
            rectangles: render_rectangles(&document).into(),
            document: Arc::clone(&document),
            pending: Some(id),
            issued: id.0,
            notice: Some(Notice {
                level: NoticeLevel::Info,
                message: format!(
                    "Floor plan loaded ({} rectangles)",
                    document.rectangle_count()
                ),
            }),
            ..self.clone()
        };
        if let Some(prev) = self.pending {
            log::debug!("request {} superseded by {}", prev.0, id.0);
        }
        log::info!(
            "loaded floor plan with {} rectangles, evaluation request {}",
            next.rectangles.len(),
            id.0
        );
        (next, EvaluationRequest { id, document })
    }
}

/// Transition the state by one event.
pub fn update(state: &ViewState, event: Event) -> (ViewState, Outcome) {
    match event {
        Event::DocumentLoaded(document) => {
            let (next, request) = state.with_document(document);
            (next, Outcome::Submit(request))
        }
        Event::EvaluationFinished { request, outcome } => {
            if state.pending != Some(request) {
                log::warn!(
                    "discarding stale evaluation response for request {}",
                    request.0
                );
                return (state.clone(), Outcome::Stale(request));
            }
            match outcome {
                Ok(result) => {
                    log::info!("applied evaluation for request {}", request.0);
                    let next = ViewState {
                        view: Arc::new(EvaluationView::from_result(&result)),
                        evaluation: Arc::new(result),
                        pending: None,
                        notice: None,
                        ..state.clone()
                    };
                    (next, Outcome::Applied(request))
                }
                Err(err) => {
                    log::warn!("evaluation request {} failed: {err}", request.0);
                    let next = ViewState {
                        pending: None,
                        notice: Some(Notice {
                            level: NoticeLevel::Error,
                            message: format!("Evaluation failed: {err}"),
                        }),
                        ..state.clone()
                    };
                    (next, Outcome::Failed(request))
                }
            }
        }
        Event::NoticeDismissed => (
            ViewState {
                notice: None,
                ..state.clone()
            },
            Outcome::Dismissed,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{Rectangle4, Zone};
    use crate::zones::ZoneCategory;

    fn doc(category: ZoneCategory, n: usize) -> FloorPlanDocument {
        FloorPlanDocument::from_zones([Zone {
            category,
            rectangles: (0..n)
                .map(|i| Rectangle4::new(i as f64, 0.0, i as f64 + 1.0, 1.0))
                .collect(),
        }])
    }

    fn result_with_area(total: f64) -> EvaluationResult {
        EvaluationResult {
            total_area: total,
            total_usable_area: total,
            ..EvaluationResult::default()
        }
    }

    fn submit(state: &ViewState, d: FloorPlanDocument) -> (ViewState, RequestId) {
        match update(state, Event::DocumentLoaded(d)) {
            (next, Outcome::Submit(req)) => (next, req.id),
            (_, other) => panic!("expected Submit, got {other:?}"),
        }
    }

    fn finish(
        state: &ViewState,
        request: RequestId,
        outcome: Result<EvaluationResult, EvaluationError>,
    ) -> (ViewState, Outcome) {
        update(state, Event::EvaluationFinished { request, outcome })
    }

    #[test]
    fn test_default_state() {
        let s = ViewState::default();
        assert_eq!(s.rectangles().len(), 1);
        assert_eq!(s.pending(), None);
        assert_eq!(s.evaluation(), &EvaluationResult::default());
    }

    #[test]
    fn test_document_replaces_rectangles_and_issues_request() {
        let s0 = ViewState::default();
        let (s1, id1) = submit(&s0, doc(ZoneCategory::Work, 3));
        assert_eq!(s1.rectangles().len(), 3);
        assert_eq!(s1.pending(), Some(id1));
        // Previous state untouched
        assert_eq!(s0.rectangles().len(), 1);
        let (_, id2) = submit(&s1, doc(ZoneCategory::Meet, 1));
        assert!(id2 > id1);
    }

    #[test]
    fn test_stale_response_is_discarded() {
        let s0 = ViewState::default();
        let (s1, a) = submit(&s0, doc(ZoneCategory::Work, 1));
        let (s2, b) = submit(&s1, doc(ZoneCategory::Meet, 2));

        let (s3, outcome) = finish(&s2, a, Ok(result_with_area(111.0)));
        assert!(matches!(outcome, Outcome::Stale(id) if id == a));
        assert_eq!(s3, s2);

        let (s4, outcome) = finish(&s3, b, Ok(result_with_area(222.0)));
        assert!(matches!(outcome, Outcome::Applied(id) if id == b));
        assert_eq!(s4.evaluation().total_area, 222.0);
        assert_eq!(s4.view().summary[0].text, "222 sq.ft");
        assert_eq!(s4.pending(), None);
    }

    #[test]
    fn test_duplicate_completion_is_stale() {
        let (s1, a) = submit(&ViewState::default(), doc(ZoneCategory::Work, 1));
        let (s2, _) = finish(&s1, a, Ok(result_with_area(5.0)));
        let (s3, outcome) = finish(&s2, a, Ok(result_with_area(6.0)));
        assert!(matches!(outcome, Outcome::Stale(_)));
        assert_eq!(s3.evaluation().total_area, 5.0);
    }

    #[test]
    fn test_failure_keeps_last_good_view() {
        let (s1, a) = submit(&ViewState::default(), doc(ZoneCategory::Work, 1));
        let (s2, _) = finish(&s1, a, Ok(result_with_area(50.0)));
        let (s3, b) = submit(&s2, doc(ZoneCategory::Work, 2));
        let (s4, outcome) = finish(
            &s3,
            b,
            Err(EvaluationError::Status { status: 500 }),
        );
        assert!(matches!(outcome, Outcome::Failed(_)));
        assert_eq!(s4.evaluation().total_area, 50.0);
        assert_eq!(s4.view(), s2.view());
        let notice = s4.notice().unwrap();
        assert_eq!(notice.level, NoticeLevel::Error);
        assert!(notice.message.contains("HTTP 500"));
        // New document is still displayed
        assert_eq!(s4.rectangles().len(), 2);
    }

    #[test]
    fn test_success_clears_notice_and_dismiss() {
        let (s1, a) = submit(&ViewState::default(), doc(ZoneCategory::Work, 1));
        let (s2, _) = finish(
            &s1,
            a,
            Err(EvaluationError::shape("not an object")),
        );
        assert!(s2.notice().is_some());
        let (s3, _) = update(&s2, Event::NoticeDismissed);
        assert!(s3.notice().is_none());

        let (s4, b) = submit(&s2, doc(ZoneCategory::Work, 1));
        let (s5, _) = finish(&s4, b, Ok(result_with_area(1.0)));
        assert!(s5.notice().is_none());
    }

    #[test]
    fn test_stale_failure_sets_no_notice() {
        let (s1, a) = submit(&ViewState::default(), doc(ZoneCategory::Work, 1));
        let (s2, _) = submit(&s1, doc(ZoneCategory::Work, 1));
        let (s3, _) = finish(&s2, a, Err(EvaluationError::Status { status: 502 }));
        assert_eq!(s3.notice().unwrap().level, NoticeLevel::Info);
        assert!(s3.pending().is_some());
    }
}
