use clap::Args;
use quoteflow_core::config::{AppConfig, LoadOptions};
use quoteflow_core::errors::ApplicationError;
use quoteflow_core::translation::{Language, TranslationRequest, Translator};
use quoteflow_translate::GoogleTranslateGateway;

use crate::commands::{build_runtime, CommandResult};

#[derive(Debug, Clone, Args)]
pub struct TranslateArgs {
    #[arg(long, help = "Target language: en, de or zh")]
    pub to: String,
    #[arg(long, help = "Source language hint; detected by the provider when omitted")]
    pub from: Option<String>,
    #[arg(help = "Text to translate")]
    pub text: String,
}

pub fn run(options: &LoadOptions, args: &TranslateArgs) -> CommandResult {
    let target = match args.to.parse::<Language>() {
        Ok(language) => language,
        Err(error) => return CommandResult::failure("translate", "unsupported_language", error.to_string(), 2),
    };
    let source = match args.from.as_deref().map(str::parse::<Language>).transpose() {
        Ok(language) => language,
        Err(error) => return CommandResult::failure("translate", "unsupported_language", error.to_string(), 2),
    };

    let request = match TranslationRequest::new(args.text.as_str(), target) {
        Ok(request) => match source {
            Some(source) => request.with_source(source),
            None => request,
        },
        Err(error) => {
            return CommandResult::application_failure("translate", &ApplicationError::from(error))
        }
    };

    let config = match AppConfig::load(options.clone()) {
        Ok(config) => config,
        Err(error) => return CommandResult::config_failure("translate", &error),
    };
    let gateway = match GoogleTranslateGateway::from_config(&config.translation) {
        Ok(gateway) => gateway,
        Err(error) => return CommandResult::failure("translate", "client_build", error.to_string(), 5),
    };
    let runtime = match build_runtime() {
        Ok(runtime) => runtime,
        Err(error) => return CommandResult::failure("translate", "runtime", format!("{error:#}"), 5),
    };

    match runtime.block_on(gateway.translate(&request)) {
        Ok(result) => CommandResult::success("translate", result.translated_text),
        Err(error) => {
            CommandResult::application_failure("translate", &ApplicationError::from(error))
        }
    }
}
