//! Audit records for quote dialog sessions.
//!
//! Every record names the product, the dialog session it belongs to and the
//! supplier acting in it, so a late or abandoned result can be traced back to
//! the session that started it.

use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::product::ProductId;
use crate::flows::states::{FlowEvent, FlowState};
use crate::translation::Language;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRef {
    pub product_id: ProductId,
    pub session: u64,
    pub actor: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DialogActivity {
    Transition { from: FlowState, to: FlowState, event: FlowEvent },
    TransitionRejected { from: FlowState, event: FlowEvent, reason: String },
    Submitted { update: bool },
    SubmitFailed { reason: String },
    TranslationApplied { target: Language },
    TranslationFailed { target: Language, reason: String },
}

impl DialogActivity {
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::Transition { .. } => "quote_dialog.transition_applied",
            Self::TransitionRejected { .. } => "quote_dialog.transition_rejected",
            Self::Submitted { .. } => "quote_dialog.submitted",
            Self::SubmitFailed { .. } => "quote_dialog.submit_failed",
            Self::TranslationApplied { .. } => "quote_dialog.translation_applied",
            Self::TranslationFailed { .. } => "quote_dialog.translation_failed",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub session: SessionRef,
    pub activity: DialogActivity,
    pub recorded_at: DateTime<Utc>,
}

impl AuditRecord {
    pub fn new(session: &SessionRef, activity: DialogActivity) -> Self {
        Self { session: session.clone(), activity, recorded_at: Utc::now() }
    }

    pub fn event_type(&self) -> &'static str {
        self.activity.event_type()
    }
}

pub trait AuditSink: Send + Sync {
    fn record(&self, record: AuditRecord);
}

/// Keeps records in memory; clones share the same log.
#[derive(Clone, Default)]
pub struct InMemoryAuditSink {
    records: Arc<Mutex<Vec<AuditRecord>>>,
}

impl InMemoryAuditSink {
    pub fn records(&self) -> Vec<AuditRecord> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn event_types(&self) -> Vec<&'static str> {
        self.records().iter().map(AuditRecord::event_type).collect()
    }
}

impl AuditSink for InMemoryAuditSink {
    fn record(&self, record: AuditRecord) {
        self.records.lock().unwrap_or_else(PoisonError::into_inner).push(record);
    }
}
