//! The two-view state machine behind every front end.
//!
//! A session is either `Submitting` (editing text, maybe with a request in
//! flight) or `Showing` a result. Results reach the results view only through
//! a [`Transition`], and a request that was abandoned can never update the view.

use crate::analysis::AnalysisResponse;
use crate::client::{AnalysisError, Analyzer};
use thiserror::Error;

/// Inline message for whitespace-only input
pub const EMPTY_INPUT_MESSAGE: &str = "Please enter some text to analyze.";

/// Inline message for every network or decode failure
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong!";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter some text to analyze.")]
    EmptyInput,
}

/// Identifies one submission, so late results can be matched or dropped
pub type RequestId = u64;

/// A validated submission waiting to be sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    pub id: RequestId,
    pub text: String,
}

/// Data handed from the submission view to the results view
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transition {
    pub result: Option<AnalysisResponse>,
}

impl Transition {
    pub fn with_result(result: AnalysisResponse) -> Self {
        Self {
            result: Some(result),
        }
    }

    /// Direct navigation: nothing carried
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Text entry state
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmissionView {
    input: String,
    error: Option<String>,
    in_flight: Option<RequestId>,
}

impl SubmissionView {
    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn push_char(&mut self, c: char) {
        self.input.push(c);
    }

    pub fn pop_char(&mut self) {
        self.input.pop();
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn clear(&mut self) {
        self.input.clear();
    }
}

/// What the results view shows
#[derive(Debug, Clone, PartialEq)]
pub enum ResultsView {
    Found(AnalysisResponse),
    /// Reached without a carried payload, or with a blank prediction
    NoResult,
}

impl From<Transition> for ResultsView {
    fn from(transition: Transition) -> Self {
        match transition.result {
            // A blank label carries nothing worth showing
            Some(result) if !result.prediction.trim().is_empty() => ResultsView::Found(result),
            _ => ResultsView::NoResult,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Submitting(SubmissionView),
    Showing(ResultsView),
}

/// How a completed request affected the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// Moved to the results view
    Shown,
    /// Stayed on the submission view with the generic error
    Failed,
    /// Result belonged to an abandoned request and was dropped
    Stale,
}

#[derive(Debug, Clone)]
pub struct Session {
    view: View,
    next_id: RequestId,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Start on an empty submission view
    pub fn new() -> Self {
        Self {
            view: View::Submitting(SubmissionView::default()),
            next_id: 1,
        }
    }

    /// Start on the results view, as when navigating there directly
    pub fn showing(transition: Transition) -> Self {
        Self {
            view: View::Showing(transition.into()),
            next_id: 1,
        }
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn submission(&self) -> Option<&SubmissionView> {
        match &self.view {
            View::Submitting(form) => Some(form),
            View::Showing(_) => None,
        }
    }

    pub fn submission_mut(&mut self) -> Option<&mut SubmissionView> {
        match &mut self.view {
            View::Submitting(form) => Some(form),
            View::Showing(_) => None,
        }
    }

    pub fn results(&self) -> Option<&ResultsView> {
        match &self.view {
            View::Showing(results) => Some(results),
            View::Submitting(_) => None,
        }
    }

    /// Validate the current input and mark a request as in flight.
    ///
    /// Returns `Ok(None)` when there is nothing to do: the session is showing
    /// results, or a request is already in flight. The raw, untrimmed input is
    /// what gets sent.
    pub fn begin_submit(&mut self) -> Result<Option<PendingRequest>, ValidationError> {
        let View::Submitting(form) = &mut self.view else {
            return Ok(None);
        };
        if form.in_flight.is_some() {
            return Ok(None);
        }

        form.error = None;
        if form.input.trim().is_empty() {
            form.error = Some(EMPTY_INPUT_MESSAGE.to_string());
            return Err(ValidationError::EmptyInput);
        }

        let id = self.next_id;
        self.next_id += 1;
        form.in_flight = Some(id);

        Ok(Some(PendingRequest {
            id,
            text: form.input.clone(),
        }))
    }

    /// Apply the outcome of request `id`.
    pub fn complete(
        &mut self,
        id: RequestId,
        outcome: Result<AnalysisResponse, AnalysisError>,
    ) -> Completion {
        let View::Submitting(form) = &mut self.view else {
            return Completion::Stale;
        };
        if form.in_flight != Some(id) {
            tracing::debug!(request = id, "dropping result of abandoned request");
            return Completion::Stale;
        }
        form.in_flight = None;

        match outcome {
            Ok(result) => {
                tracing::info!(request = id, prediction = %result.prediction, "analysis complete");
                self.view = View::Showing(Transition::with_result(result).into());
                Completion::Shown
            }
            Err(e) => {
                tracing::error!(request = id, error = %e, "analysis request failed");
                // Input stays so the user can resubmit without retyping
                form.error = Some(GENERIC_FAILURE_MESSAGE.to_string());
                Completion::Failed
            }
        }
    }

    /// Stop waiting for the in-flight request; its result will be dropped.
    pub fn abandon(&mut self) -> Option<RequestId> {
        match &mut self.view {
            View::Submitting(form) => form.in_flight.take(),
            View::Showing(_) => None,
        }
    }

    /// Return from the results view to a fresh submission view
    pub fn go_back(&mut self) {
        if let View::Showing(_) = self.view {
            self.view = View::Submitting(SubmissionView::default());
        }
    }

    /// Validate, send and apply one submission in sequence.
    pub async fn submit<A: Analyzer>(&mut self, analyzer: &A) -> Result<Completion, ValidationError> {
        let Some(pending) = self.begin_submit()? else {
            return Ok(Completion::Stale);
        };
        let outcome = analyzer.analyze(&pending.text).await;
        Ok(self.complete(pending.id, outcome))
    }
}
