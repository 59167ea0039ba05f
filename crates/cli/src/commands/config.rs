use std::env;
use std::fs;
use std::path::Path;

use quoteflow_core::config::{resolve_config_path, AppConfig, LoadOptions};
use secrecy::ExposeSecret;
use toml::Value;

pub fn run(options: &LoadOptions) -> String {
    let config = match AppConfig::load(options.clone()) {
        Ok(config) => config,
        Err(error) => return format!("config validation failed: {error}"),
    };

    let config_file_path = resolve_config_path(options.config_path.as_deref());
    let config_file_doc = load_config_file_doc(config_file_path.as_deref());
    let source = |key_path: &str, env_keys: &[&str]| {
        field_source(key_path, env_keys, config_file_doc.as_ref(), config_file_path.as_deref())
    };

    let mut lines =
        vec!["effective config (source precedence: override > env > file > default):".to_string()];

    let api_key = match config.translation.api_key() {
        Ok(key) => redact_key(key.expose_secret()),
        Err(_) => "<unset>".to_string(),
    };
    lines.push(render_line(
        "translation.api_key",
        &api_key,
        source(
            "translation.api_key",
            &["QUOTEFLOW_TRANSLATION_API_KEY", "GOOGLE_TRANSLATE_API_KEY"],
        ),
    ));
    lines.push(render_line(
        "translation.endpoint",
        &config.translation.endpoint,
        source("translation.endpoint", &["QUOTEFLOW_TRANSLATION_ENDPOINT"]),
    ));
    lines.push(render_line(
        "translation.timeout_secs",
        &config.translation.timeout_secs.to_string(),
        source("translation.timeout_secs", &["QUOTEFLOW_TRANSLATION_TIMEOUT_SECS"]),
    ));

    lines.push(render_line(
        "logging.level",
        &config.logging.level,
        source("logging.level", &["QUOTEFLOW_LOGGING_LEVEL", "QUOTEFLOW_LOG_LEVEL"]),
    ));
    lines.push(render_line(
        "logging.format",
        &format!("{:?}", config.logging.format),
        source("logging.format", &["QUOTEFLOW_LOGGING_FORMAT", "QUOTEFLOW_LOG_FORMAT"]),
    ));

    lines.join("\n")
}

fn load_config_file_doc(path: Option<&Path>) -> Option<Value> {
    let path = path?;
    let raw = fs::read_to_string(path).ok()?;
    raw.parse::<Value>().ok()
}

fn field_source(
    key_path: &str,
    env_keys: &[&str],
    config_file_doc: Option<&Value>,
    config_file_path: Option<&Path>,
) -> String {
    if let Some(env_key) =
        env_keys.iter().find(|key| env::var(key).is_ok_and(|value| !value.trim().is_empty()))
    {
        return format!("env ({env_key})");
    }

    if let Some(doc) = config_file_doc {
        if contains_path(doc, key_path) {
            let file_path = config_file_path
                .map(|path| path.display().to_string())
                .unwrap_or_else(|| "config file".to_string());
            return format!("file ({file_path})");
        }
    }

    "default".to_string()
}

fn contains_path(root: &Value, key_path: &str) -> bool {
    let mut current = root;
    for key in key_path.split('.') {
        let Some(next) = current.get(key) else {
            return false;
        };
        current = next;
    }
    true
}

fn render_line(key: &str, value: &str, source: String) -> String {
    format!("- {key} = {value} (source: {source})")
}

/// Keeps the first four characters so operators can tell keys apart.
fn redact_key(key: &str) -> String {
    let trimmed = key.trim();
    let prefix = trimmed.chars().take(4).collect::<String>();
    if trimmed.chars().count() <= 8 {
        return "<redacted>".to_string();
    }
    format!("{prefix}***")
}

#[cfg(test)]
mod tests {
    use super::redact_key;

    #[test]
    fn short_keys_are_fully_redacted() {
        assert_eq!(redact_key("abc"), "<redacted>");
        assert_eq!(redact_key("AIzaSyExampleKey123"), "AIza***");
    }
}
