use thiserror::Error;

use crate::audit::{AuditRecord, AuditSink, DialogActivity, SessionRef};
use crate::flows::states::{FlowAction, FlowEvent, FlowState, TransitionOutcome};

pub trait FlowDefinition {
    fn initial_state(&self) -> FlowState;
    fn transition(
        &self,
        current: &FlowState,
        event: &FlowEvent,
    ) -> Result<TransitionOutcome, FlowTransitionError>;
}

#[derive(Clone, Debug, Default)]
pub struct QuoteDialogFlow;

impl FlowDefinition for QuoteDialogFlow {
    fn initial_state(&self) -> FlowState {
        FlowState::Idle
    }

    fn transition(
        &self,
        current: &FlowState,
        event: &FlowEvent,
    ) -> Result<TransitionOutcome, FlowTransitionError> {
        transition_quote_dialog(current, event)
    }
}

pub struct FlowEngine<F> {
    flow: F,
}

impl<F> FlowEngine<F>
where
    F: FlowDefinition,
{
    pub fn new(flow: F) -> Self {
        Self { flow }
    }

    pub fn initial_state(&self) -> FlowState {
        self.flow.initial_state()
    }

    pub fn apply(
        &self,
        current: &FlowState,
        event: &FlowEvent,
    ) -> Result<TransitionOutcome, FlowTransitionError> {
        self.flow.transition(current, event)
    }

    /// Applies the event and records the transition, or its rejection, for
    /// the given session.
    pub fn apply_with_audit<S>(
        &self,
        current: &FlowState,
        event: &FlowEvent,
        sink: &S,
        session: &SessionRef,
    ) -> Result<TransitionOutcome, FlowTransitionError>
    where
        S: AuditSink + ?Sized,
    {
        let result = self.apply(current, event);
        let activity = match &result {
            Ok(outcome) => DialogActivity::Transition {
                from: outcome.from,
                to: outcome.to,
                event: outcome.event,
            },
            Err(error) => DialogActivity::TransitionRejected {
                from: *current,
                event: *event,
                reason: error.to_string(),
            },
        };
        sink.record(AuditRecord::new(session, activity));
        result
    }
}

impl Default for FlowEngine<QuoteDialogFlow> {
    fn default() -> Self {
        Self::new(QuoteDialogFlow)
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FlowTransitionError {
    #[error("invalid transition from {state:?} using event {event:?}")]
    InvalidTransition { state: FlowState, event: FlowEvent },
}

fn transition_quote_dialog(
    current: &FlowState,
    event: &FlowEvent,
) -> Result<TransitionOutcome, FlowTransitionError> {
    use FlowAction::{ClearError, DiscardDraft, ResetDraft};
    use FlowEvent::{CloseRequested, Opened, SubmitFailed, SubmitRequested, SubmitSucceeded};
    use FlowState::{Closed, Editing, Failed, Idle, Submitting};

    let (to, actions) = match (current, event) {
        (Idle, Opened) | (Closed, Opened) => (Editing, vec![ResetDraft, ClearError]),
        (Editing, SubmitRequested) | (Failed, SubmitRequested) => (Submitting, Vec::new()),
        (Submitting, SubmitSucceeded) => (Closed, vec![DiscardDraft, ClearError]),
        // The rejected draft stays for correction.
        (Submitting, SubmitFailed) => (Failed, Vec::new()),
        (Editing, CloseRequested) | (Failed, CloseRequested) | (Submitting, CloseRequested) => {
            (Closed, vec![DiscardDraft, ClearError])
        }
        _ => {
            return Err(FlowTransitionError::InvalidTransition { state: *current, event: *event });
        }
    };

    Ok(TransitionOutcome { from: *current, to, event: *event, actions })
}
