pub mod audit;
pub mod catalog;
pub mod config;
pub mod currency;
pub mod domain;
pub mod errors;
pub mod flows;
pub mod submission;
pub mod translation;

pub use audit::{AuditRecord, AuditSink, DialogActivity, InMemoryAuditSink, SessionRef};
pub use catalog::{FieldType, FieldViolation, FormConfigRegistry, FormFieldConfig, ProductFormConfig};
pub use domain::product::{Product, ProductId};
pub use domain::quote::{Quote, QuoteId, QuoteSubmission, MAX_NOTES_CHARS};
pub use errors::{ApplicationError, DomainError, InterfaceError, ValidationError};
pub use flows::{QuoteDialog, QuoteDraft, SubmitOutcome, TranslateOutcome};
pub use submission::{InMemoryQuoteBook, QuoteSubmitter, SubmissionError};
pub use translation::{Language, TranslationError, TranslationRequest, TranslationResult, Translator};
