//! Per-dialog quote submission session.
//!
//! A `QuoteDialog` owns the draft of one product's quote and drives it through
//! the `QuoteDialogFlow` states. Asynchronous work (the submit callback and
//! translation) is split into `begin_*` / `complete_*` halves: `begin_*`
//! claims the in-flight slot and hands out a ticket, `complete_*` releases it
//! and applies the result only if the ticket still belongs to the current
//! session. `submit` and `translate` run both halves around the await and
//! give the slot back if they are dropped before the result arrives.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tracing::{debug, info, warn};

use crate::audit::{AuditRecord, AuditSink, DialogActivity, SessionRef};
use crate::domain::product::Product;
use crate::domain::quote::{Quote, QuoteSubmission};
use crate::errors::{ApplicationError, DomainError};
use crate::flows::draft::QuoteDraft;
use crate::flows::engine::{FlowEngine, QuoteDialogFlow};
use crate::flows::states::{FlowAction, FlowEvent, FlowState, Operation, TransitionOutcome};
use crate::submission::{QuoteSubmitter, SubmissionError};
use crate::translation::{
    Language, TranslationError, TranslationRequest, TranslationResult, Translator,
};

type Today = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmitTicket {
    session: u64,
    submission: QuoteSubmission,
}

impl SubmitTicket {
    pub fn session(&self) -> u64 {
        self.session
    }

    pub fn submission(&self) -> &QuoteSubmission {
        &self.submission
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TranslateTicket {
    session: u64,
    request: TranslationRequest,
}

impl TranslateTicket {
    pub fn session(&self) -> u64 {
        self.session
    }

    pub fn request(&self) -> &TranslationRequest {
        &self.request
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    Submitted,
    Failed(ApplicationError),
    /// The result arrived for a session that is no longer current.
    Stale,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TranslateOutcome {
    Applied { translated_text: String },
    Failed(ApplicationError),
    Stale,
}

pub struct QuoteDialog {
    product: Product,
    source: Option<Quote>,
    draft: QuoteDraft,
    state: FlowState,
    session: u64,
    submit_in_flight: bool,
    translate_in_flight: bool,
    last_error: Option<ApplicationError>,
    engine: FlowEngine<QuoteDialogFlow>,
    audit: Option<Arc<dyn AuditSink>>,
    actor: String,
    today: Today,
}

impl QuoteDialog {
    pub fn new(product: Product, source: Option<Quote>) -> Self {
        let engine = FlowEngine::default();
        Self {
            product,
            source,
            draft: QuoteDraft::default(),
            state: engine.initial_state(),
            session: 0,
            submit_in_flight: false,
            translate_in_flight: false,
            last_error: None,
            engine,
            audit: None,
            actor: "supplier".to_string(),
            today: Arc::new(|| Utc::now().date_naive()),
        }
    }

    pub fn with_audit_sink(mut self, sink: Arc<dyn AuditSink>) -> Self {
        self.audit = Some(sink);
        self
    }

    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = actor.into();
        self
    }

    /// Overrides the day delivery dates are validated against.
    pub fn with_clock<F>(mut self, today: F) -> Self
    where
        F: Fn() -> NaiveDate + Send + Sync + 'static,
    {
        self.today = Arc::new(today);
        self
    }

    pub fn product(&self) -> &Product {
        &self.product
    }

    pub fn source(&self) -> Option<&Quote> {
        self.source.as_ref()
    }

    pub fn draft(&self) -> &QuoteDraft {
        &self.draft
    }

    pub fn state(&self) -> FlowState {
        self.state
    }

    pub fn session(&self) -> u64 {
        self.session
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, FlowState::Editing | FlowState::Submitting | FlowState::Failed)
    }

    pub fn is_submitting(&self) -> bool {
        self.submit_in_flight
    }

    pub fn is_translating(&self) -> bool {
        self.translate_in_flight
    }

    /// Failure of the last submit attempt in this session, if it was rejected.
    pub fn last_error(&self) -> Option<&ApplicationError> {
        self.last_error.as_ref()
    }

    pub fn title_key(&self) -> &'static str {
        if self.source.is_some() {
            "update_your_quote"
        } else {
            "submit_your_quote"
        }
    }

    pub fn submit_label_key(&self) -> &'static str {
        if self.submit_in_flight {
            "submitting"
        } else if self.source.is_some() {
            "update_quote"
        } else {
            "submit_quote_rmb"
        }
    }

    pub fn usd_estimate(&self) -> Option<String> {
        self.draft.usd_estimate()
    }

    /// Whether the submit control is enabled.
    pub fn can_submit(&self) -> bool {
        self.state.is_editable()
            && !self.submit_in_flight
            && self.draft.missing_required_fields().is_empty()
    }

    /// Replaces the source-of-truth quote used the next time the dialog opens.
    pub fn refresh_source(&mut self, source: Option<Quote>) {
        self.source = source;
    }

    pub fn open(&mut self) -> Result<(), ApplicationError> {
        self.transition(FlowEvent::Opened)?;
        self.session += 1;
        debug!(
            event_name = "quote_dialog.opened",
            product_id = %self.product.id,
            session = self.session,
            update = self.source.is_some(),
            "quote dialog opened"
        );
        Ok(())
    }

    /// Closes the dialog and drops the draft. An outstanding submit is not
    /// cancelled; its result is ignored when it arrives.
    pub fn close(&mut self) -> Result<(), ApplicationError> {
        self.transition(FlowEvent::CloseRequested)?;
        Ok(())
    }

    pub fn set_price(&mut self, raw: impl Into<String>) -> Result<(), ApplicationError> {
        self.ensure_editable()?;
        self.draft.set_price(raw);
        Ok(())
    }

    pub fn set_delivery_date(&mut self, date: Option<NaiveDate>) -> Result<(), ApplicationError> {
        self.ensure_editable()?;
        self.draft.set_delivery_date(date);
        Ok(())
    }

    pub fn set_message(&mut self, message: impl Into<String>) -> Result<(), ApplicationError> {
        self.ensure_editable()?;
        self.draft.set_message(message)?;
        Ok(())
    }

    pub fn begin_submit(&mut self) -> Result<SubmitTicket, ApplicationError> {
        if self.submit_in_flight {
            return Err(DomainError::Busy { operation: Operation::Submit }.into());
        }
        self.ensure_editable()?;

        let (price, delivery_date) = self.draft.validate((self.today)())?;
        self.transition(FlowEvent::SubmitRequested)?;
        self.submit_in_flight = true;

        debug!(
            event_name = "quote_dialog.submit_started",
            product_id = %self.product.id,
            session = self.session,
            "quote submission dispatched"
        );

        Ok(SubmitTicket {
            session: self.session,
            submission: QuoteSubmission {
                product_id: self.product.id.clone(),
                price,
                delivery_date,
                message: self.draft.message().to_string(),
                existing_quote: self.source.clone(),
            },
        })
    }

    pub fn complete_submit(
        &mut self,
        ticket: SubmitTicket,
        result: Result<(), SubmissionError>,
    ) -> SubmitOutcome {
        self.submit_in_flight = false;

        if ticket.session != self.session || self.state != FlowState::Submitting {
            debug!(
                event_name = "quote_dialog.submit_result_stale",
                product_id = %self.product.id,
                ticket_session = ticket.session,
                session = self.session,
                succeeded = result.is_ok(),
                "ignoring submit result for a session that is no longer active"
            );
            return SubmitOutcome::Stale;
        }

        match result {
            Ok(()) => {
                if let Err(error) = self.transition(FlowEvent::SubmitSucceeded) {
                    return SubmitOutcome::Failed(error);
                }
                self.record(DialogActivity::Submitted { update: ticket.submission.is_update() });
                info!(
                    event_name = "quote_dialog.submitted",
                    product_id = %self.product.id,
                    update = ticket.submission.is_update(),
                    "quote submitted"
                );
                SubmitOutcome::Submitted
            }
            Err(error) => {
                let error = ApplicationError::from(error);
                if let Err(transition_error) = self.transition(FlowEvent::SubmitFailed) {
                    return SubmitOutcome::Failed(transition_error);
                }
                warn!(
                    event_name = "quote_dialog.submit_failed",
                    product_id = %self.product.id,
                    session = self.session,
                    error = %error,
                    "quote submission rejected, draft retained"
                );
                self.record(DialogActivity::SubmitFailed { reason: error.to_string() });
                self.last_error = Some(error.clone());
                SubmitOutcome::Failed(error)
            }
        }
    }

    /// Validates, invokes the submitter once, and applies its result. No retry
    /// is attempted.
    pub async fn submit<S>(&mut self, submitter: &S) -> Result<SubmitOutcome, ApplicationError>
    where
        S: QuoteSubmitter + ?Sized,
    {
        let ticket = self.begin_submit()?;
        let mut slot = InFlightSlot { dialog: self, operation: Operation::Submit };
        let result = submitter.submit(ticket.submission.clone()).await;
        Ok(slot.dialog.complete_submit(ticket, result))
    }

    pub fn begin_translate(&mut self, target: Language) -> Result<TranslateTicket, ApplicationError> {
        if self.translate_in_flight {
            return Err(DomainError::Busy { operation: Operation::Translate }.into());
        }
        self.ensure_editable()?;

        let request = TranslationRequest::new(self.draft.message(), target).map_err(|error| {
            info!(
                event_name = "quote_dialog.translate_skipped",
                product_id = %self.product.id,
                "nothing to translate"
            );
            ApplicationError::from(error)
        })?;
        self.translate_in_flight = true;

        Ok(TranslateTicket { session: self.session, request })
    }

    /// Folds a translation into the message. Failures, oversized results and
    /// stale results leave the draft as it is.
    pub fn complete_translate(
        &mut self,
        ticket: TranslateTicket,
        result: Result<TranslationResult, TranslationError>,
    ) -> TranslateOutcome {
        self.translate_in_flight = false;

        if ticket.session != self.session || !self.state.is_editable() {
            debug!(
                event_name = "quote_dialog.translation_stale",
                product_id = %self.product.id,
                ticket_session = ticket.session,
                session = self.session,
                "ignoring translation for a session that is no longer editable"
            );
            return TranslateOutcome::Stale;
        }

        let target = ticket.request.target;
        let outcome = match result {
            Ok(translation) => match self.draft.set_message(translation.translated_text.clone()) {
                Ok(()) => TranslateOutcome::Applied { translated_text: translation.translated_text },
                Err(error) => TranslateOutcome::Failed(error.into()),
            },
            Err(error) => TranslateOutcome::Failed(error.into()),
        };

        match &outcome {
            TranslateOutcome::Applied { .. } => {
                self.record(DialogActivity::TranslationApplied { target });
            }
            TranslateOutcome::Failed(error) => {
                warn!(
                    event_name = "quote_dialog.translation_failed",
                    product_id = %self.product.id,
                    target = %target,
                    error = %error,
                    "translation not applied"
                );
                self.record(DialogActivity::TranslationFailed {
                    target,
                    reason: error.to_string(),
                });
            }
            TranslateOutcome::Stale => {}
        }

        outcome
    }

    pub async fn translate<T>(
        &mut self,
        translator: &T,
        target: Language,
    ) -> Result<TranslateOutcome, ApplicationError>
    where
        T: Translator + ?Sized,
    {
        let ticket = self.begin_translate(target)?;
        let mut slot = InFlightSlot { dialog: self, operation: Operation::Translate };
        let result = translator.translate(&ticket.request).await;
        Ok(slot.dialog.complete_translate(ticket, result))
    }

    fn ensure_editable(&self) -> Result<(), ApplicationError> {
        if self.state.is_editable() {
            return Ok(());
        }
        Err(DomainError::InvariantViolation(format!(
            "quote draft cannot be edited while the dialog is {:?}",
            self.state
        ))
        .into())
    }

    fn transition(&mut self, event: FlowEvent) -> Result<TransitionOutcome, ApplicationError> {
        let outcome = match &self.audit {
            Some(sink) => self.engine.apply_with_audit(
                &self.state,
                &event,
                sink.as_ref(),
                &self.session_ref(),
            ),
            None => self.engine.apply(&self.state, &event),
        }
        .map_err(DomainError::from)?;

        self.state = outcome.to;
        for action in &outcome.actions {
            match action {
                FlowAction::ResetDraft => self.draft.reset(self.source.as_ref()),
                FlowAction::DiscardDraft => self.draft = QuoteDraft::default(),
                FlowAction::ClearError => self.last_error = None,
            }
        }
        Ok(outcome)
    }

    /// Frees an in-flight slot whose result will never be completed.
    fn release(&mut self, operation: Operation) {
        let slot = match operation {
            Operation::Submit => &mut self.submit_in_flight,
            Operation::Translate => &mut self.translate_in_flight,
        };
        if std::mem::replace(slot, false) {
            debug!(
                event_name = "quote_dialog.in_flight_abandoned",
                product_id = %self.product.id,
                session = self.session,
                operation = %operation,
                "in-flight work dropped before its result arrived"
            );
        }
    }

    fn session_ref(&self) -> SessionRef {
        SessionRef {
            product_id: self.product.id.clone(),
            session: self.session,
            actor: self.actor.clone(),
        }
    }

    fn record(&self, activity: DialogActivity) {
        if let Some(sink) = &self.audit {
            sink.record(AuditRecord::new(&self.session_ref(), activity));
        }
    }
}

/// Holds the dialog across an await. Dropping it, on completion or on
/// cancellation, releases the slot; a completed ticket has already cleared it.
struct InFlightSlot<'a> {
    dialog: &'a mut QuoteDialog,
    operation: Operation,
}

impl Drop for InFlightSlot<'_> {
    fn drop(&mut self) {
        self.dialog.release(self.operation);
    }
}
