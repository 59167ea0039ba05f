use chrono::NaiveDate;
use thiserror::Error;

use crate::flows::{FlowTransitionError, Operation};
use crate::submission::SubmissionError;
use crate::translation::TranslationError;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("price is required")]
    MissingPrice,
    #[error("price `{0}` is not a number")]
    InvalidPrice(String),
    #[error("price must be greater than zero")]
    NonPositivePrice,
    #[error("delivery date is required")]
    MissingDeliveryDate,
    #[error("delivery date {date} must be after {today}")]
    DeliveryDateNotInFuture { date: NaiveDate, today: NaiveDate },
    #[error("message has {length} characters, the limit is {max}")]
    MessageTooLong { length: usize, max: usize },
    #[error("nothing to translate")]
    NothingToTranslate,
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    FlowTransition(#[from] FlowTransitionError),
    #[error("a {operation} request is already in flight")]
    Busy { operation: Operation },
    #[error("domain invariant violation: {0}")]
    InvariantViolation(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("configuration failure: {0}")]
    Configuration(String),
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("submission failure: {0}")]
    Submission(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InterfaceError {
    #[error("bad request: {message}")]
    BadRequest { message: String, correlation_id: String },
    #[error("service unavailable: {message}")]
    ServiceUnavailable { message: String, correlation_id: String },
    #[error("internal error: {message}")]
    Internal { message: String, correlation_id: String },
}

impl From<ValidationError> for ApplicationError {
    fn from(value: ValidationError) -> Self {
        Self::Domain(DomainError::Validation(value))
    }
}

impl From<TranslationError> for ApplicationError {
    fn from(value: TranslationError) -> Self {
        match value {
            TranslationError::EmptyText => ValidationError::NothingToTranslate.into(),
            TranslationError::UnsupportedLanguage(_) => {
                Self::Domain(DomainError::InvariantViolation(value.to_string()))
            }
            TranslationError::MissingCredential => Self::Configuration(value.to_string()),
            TranslationError::ProviderStatus { .. }
            | TranslationError::EmptyResponse
            | TranslationError::Transport(_) => Self::Transport(value.to_string()),
        }
    }
}

impl From<SubmissionError> for ApplicationError {
    fn from(value: SubmissionError) -> Self {
        Self::Submission(value.message)
    }
}

impl ApplicationError {
    /// Whether the user can reasonably try the same action again without
    /// changing input or configuration.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Submission(_))
    }

    /// i18n key of the notice shown for this failure.
    pub fn notice_key(&self) -> &'static str {
        match self {
            Self::Domain(DomainError::Validation(ValidationError::NothingToTranslate)) => {
                "no_text_to_translate"
            }
            Self::Domain(DomainError::Validation(ValidationError::MessageTooLong { .. })) => {
                "message_too_long"
            }
            Self::Domain(DomainError::Busy { .. }) => "request_in_progress",
            Self::Domain(_) => "check_quote_fields",
            Self::Configuration(_) => "translation_not_configured",
            Self::Transport(_) => "translation_failed",
            Self::Submission(_) => "quote_submit_failed",
        }
    }

    pub fn into_interface(self, correlation_id: impl Into<String>) -> InterfaceError {
        let correlation_id = correlation_id.into();
        let mut mapped = InterfaceError::from(self);
        match &mut mapped {
            InterfaceError::BadRequest { correlation_id: id, .. }
            | InterfaceError::ServiceUnavailable { correlation_id: id, .. }
            | InterfaceError::Internal { correlation_id: id, .. } => *id = correlation_id,
        }
        mapped
    }
}

impl InterfaceError {
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::BadRequest { .. } => "The quote could not be processed. Check inputs and try again.",
            Self::ServiceUnavailable { .. } => {
                "The service is temporarily unavailable. Please try again."
            }
            Self::Internal { .. } => "This feature is not configured. Contact an administrator.",
        }
    }
}

impl From<ApplicationError> for InterfaceError {
    fn from(value: ApplicationError) -> Self {
        match value {
            ApplicationError::Domain(error) => Self::BadRequest {
                message: error.to_string(),
                correlation_id: "unassigned".to_owned(),
            },
            ApplicationError::Transport(message) | ApplicationError::Submission(message) => {
                Self::ServiceUnavailable { message, correlation_id: "unassigned".to_owned() }
            }
            ApplicationError::Configuration(message) => {
                Self::Internal { message, correlation_id: "unassigned".to_owned() }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::{ApplicationError, DomainError, InterfaceError, ValidationError};
    use crate::submission::SubmissionError;
    use crate::translation::TranslationError;

    #[test]
    fn validation_error_maps_to_bad_request_interface_error() {
        let interface =
            ApplicationError::from(ValidationError::MissingDeliveryDate).into_interface("dlg-1");

        assert!(matches!(
            interface,
            InterfaceError::BadRequest {
                ref correlation_id,
                ..
            } if correlation_id == "dlg-1"
        ));
        assert_eq!(
            interface.user_message(),
            "The quote could not be processed. Check inputs and try again."
        );
    }

    #[test]
    fn translation_failures_follow_error_taxonomy() {
        assert_eq!(
            ApplicationError::from(TranslationError::EmptyText),
            ApplicationError::Domain(DomainError::Validation(ValidationError::NothingToTranslate))
        );
        assert!(matches!(
            ApplicationError::from(TranslationError::MissingCredential),
            ApplicationError::Configuration(_)
        ));
        assert!(matches!(
            ApplicationError::from(TranslationError::ProviderStatus { status: 403 }),
            ApplicationError::Transport(ref message) if message.contains("403")
        ));
        assert!(matches!(
            ApplicationError::from(TranslationError::Transport("connection reset".to_owned())),
            ApplicationError::Transport(_)
        ));
    }

    #[test]
    fn only_transport_and_submission_failures_are_retryable() {
        assert!(ApplicationError::Transport("timeout".to_owned()).is_retryable());
        assert!(ApplicationError::from(SubmissionError::new("db offline")).is_retryable());
        assert!(!ApplicationError::Configuration("missing key".to_owned()).is_retryable());
        assert!(!ApplicationError::from(ValidationError::MissingPrice).is_retryable());
    }

    #[test]
    fn configuration_error_maps_to_internal() {
        let interface = ApplicationError::from(TranslationError::MissingCredential)
            .into_interface("dlg-4");

        assert!(matches!(interface, InterfaceError::Internal { .. }));
        assert_eq!(ApplicationError::Configuration(String::new()).notice_key(), "translation_not_configured");
    }

    #[test]
    fn submission_error_maps_to_service_unavailable() {
        let error = ApplicationError::from(SubmissionError::new("write conflict"));
        assert_eq!(error.notice_key(), "quote_submit_failed");

        let interface = error.into_interface("dlg-3");
        assert!(matches!(
            interface,
            InterfaceError::ServiceUnavailable { ref message, .. } if message == "write conflict"
        ));
    }

    #[test]
    fn empty_translation_has_its_own_notice() {
        let error = ApplicationError::from(TranslationError::EmptyText);
        assert_eq!(error.notice_key(), "no_text_to_translate");
    }
}
