use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowState {
    Idle,
    Editing,
    Submitting,
    /// Editing with the last submission failure retained.
    Failed,
    Closed,
}

impl FlowState {
    pub fn is_editable(&self) -> bool {
        matches!(self, Self::Editing | Self::Failed)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowEvent {
    Opened,
    SubmitRequested,
    SubmitSucceeded,
    SubmitFailed,
    CloseRequested,
}

/// Side effects the dialog applies to its draft after a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FlowAction {
    /// Refill the draft from the source-of-truth quote.
    ResetDraft,
    DiscardDraft,
    ClearError,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionOutcome {
    pub from: FlowState,
    pub to: FlowState,
    pub event: FlowEvent,
    pub actions: Vec<FlowAction>,
}

/// Asynchronous work a dialog can have outstanding; at most one of each kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Submit,
    Translate,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Submit => f.write_str("submit"),
            Self::Translate => f.write_str("translate"),
        }
    }
}
