pub mod config;
pub mod convert;
pub mod doctor;
pub mod fields;
pub mod quote;
pub mod translate;

use anyhow::Context;
use quoteflow_core::config::ConfigError;
use quoteflow_core::errors::ApplicationError;
use serde::Serialize;
use tokio::runtime::Runtime;

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub exit_code: u8,
    pub output: String,
}

#[derive(Debug, Serialize)]
struct CommandOutcome {
    command: String,
    status: String,
    error_class: Option<String>,
    message: String,
}

impl CommandResult {
    pub fn success(command: &str, message: impl Into<String>) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "ok".to_string(),
            error_class: None,
            message: message.into(),
        };
        Self { exit_code: 0, output: serialize_payload(payload) }
    }

    pub fn failure(
        command: &str,
        error_class: &str,
        message: impl Into<String>,
        exit_code: u8,
    ) -> Self {
        let payload = CommandOutcome {
            command: command.to_string(),
            status: "error".to_string(),
            error_class: Some(error_class.to_string()),
            message: message.into(),
        };
        Self { exit_code, output: serialize_payload(payload) }
    }

    pub(crate) fn config_failure(command: &str, error: &ConfigError) -> Self {
        Self::failure(command, "config_validation", error.to_string(), 3)
    }

    /// Workflow failures keep their notice key as the error class. Input
    /// problems exit 2, configuration 3, provider and store failures 4.
    pub(crate) fn application_failure(command: &str, error: &ApplicationError) -> Self {
        let exit_code = match error {
            ApplicationError::Domain(_) => 2,
            ApplicationError::Configuration(_) => 3,
            ApplicationError::Transport(_) | ApplicationError::Submission(_) => 4,
        };
        Self::failure(command, error.notice_key(), error.to_string(), exit_code)
    }
}

pub(crate) fn build_runtime() -> anyhow::Result<Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to initialize async runtime")
}

fn serialize_payload(payload: CommandOutcome) -> String {
    serde_json::to_string(&payload).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"unknown\",\"status\":\"error\",\"error_class\":\"serialization\",\"message\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    })
}
