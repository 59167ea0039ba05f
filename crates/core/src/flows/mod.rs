pub mod dialog;
pub mod draft;
pub mod engine;
pub mod states;

pub use dialog::{QuoteDialog, SubmitOutcome, SubmitTicket, TranslateOutcome, TranslateTicket};
pub use draft::QuoteDraft;
pub use engine::{FlowDefinition, FlowEngine, FlowTransitionError, QuoteDialogFlow};
pub use states::{FlowAction, FlowEvent, FlowState, Operation, TransitionOutcome};
