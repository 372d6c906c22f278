//! Evaluation session: the view state plus the requests it has in flight.
//!
//! Loading a document updates the state immediately and spawns its
//! evaluation on the tokio runtime. Completions come back over a channel
//! tagged with their request id and are folded into the state through the
//! same update function, which drops any that belong to a superseded
//! document. Must be used from within a tokio runtime.

use std::sync::Arc;

use floorplan_logic::state::{update, Event, EvaluationRequest, Outcome, ViewState};
use floorplan_logic::{
    EvaluationError, EvaluationResult, FloorPlanDocument, FloorPlanError, RequestId,
};
use tokio::sync::mpsc;

use crate::networking::{EvaluationClient, Scorer};

struct Completion {
    request: RequestId,
    outcome: Result<EvaluationResult, EvaluationError>,
}

/// Sends exactly one completion per spawned request. If the task unwinds
/// before reporting, the drop sends [`EvaluationError::Aborted`].
struct CompletionGuard {
    tx: mpsc::UnboundedSender<Completion>,
    request: Option<RequestId>,
}

impl CompletionGuard {
    fn complete(mut self, outcome: Result<EvaluationResult, EvaluationError>) {
        if let Some(request) = self.request.take() {
            // Receiver is gone only if the session was dropped
            let _ = self.tx.send(Completion { request, outcome });
        }
    }
}

impl Drop for CompletionGuard {
    fn drop(&mut self) {
        if let Some(request) = self.request.take() {
            log::error!("evaluation task for request {} aborted", request.get());
            let _ = self.tx.send(Completion {
                request,
                outcome: Err(EvaluationError::Aborted),
            });
        }
    }
}

pub struct Session<S> {
    state: ViewState,
    client: Arc<EvaluationClient<S>>,
    tx: mpsc::UnboundedSender<Completion>,
    rx: mpsc::UnboundedReceiver<Completion>,
    in_flight: usize,
}

impl<S: Scorer> Session<S> {
    pub fn new(client: EvaluationClient<S>) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            state: ViewState::default(),
            client: Arc::new(client),
            tx,
            rx,
            in_flight: 0,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Requests spawned whose completions have not been folded in yet,
    /// stale ones included.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Parses uploaded text and loads it. A parse error leaves the state
    /// exactly as it was.
    pub fn load_str(&mut self, text: &str) -> Result<RequestId, FloorPlanError> {
        let doc = FloorPlanDocument::from_json_str(text)?;
        Ok(self.load(doc))
    }

    /// Replaces the current document and starts its evaluation.
    pub fn load(&mut self, doc: FloorPlanDocument) -> RequestId {
        let (next, request) = self.state.with_document(doc);
        self.state = next;
        let id = request.id;
        self.dispatch(request);
        id
    }

    fn dispatch(&mut self, request: EvaluationRequest) {
        let client = Arc::clone(&self.client);
        let guard = CompletionGuard {
            tx: self.tx.clone(),
            request: Some(request.id),
        };
        self.in_flight += 1;
        log::debug!("dispatching evaluation request {}", request.id.get());
        tokio::spawn(async move {
            let outcome = client.evaluate(&request.document).await;
            guard.complete(outcome);
        });
    }

    /// Waits for the next completion and applies it. `None` when nothing is
    /// in flight.
    pub async fn next_completion(&mut self) -> Option<Outcome> {
        if self.in_flight == 0 {
            return None;
        }
        let completion = self.rx.recv().await?;
        self.in_flight -= 1;
        let (next, outcome) = update(
            &self.state,
            Event::EvaluationFinished {
                request: completion.request,
                outcome: completion.outcome,
            },
        );
        self.state = next;
        Some(outcome)
    }

    /// Waits until every spawned request has completed.
    pub async fn settle(&mut self) -> Vec<Outcome> {
        let mut outcomes = Vec::new();
        while let Some(outcome) = self.next_completion().await {
            outcomes.push(outcome);
        }
        outcomes
    }

    pub fn dismiss_notice(&mut self) {
        let (next, _) = update(&self.state, Event::NoticeDismissed);
        self.state = next;
    }
}
