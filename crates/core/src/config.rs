use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_TRANSLATION_ENDPOINT: &str =
    "https://translation.googleapis.com/language/translate/v2";

/// Config file names probed in the working directory, in order.
pub const CONFIG_FILE_CANDIDATES: [&str; 2] = ["quoteflow.toml", "config/quoteflow.toml"];

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub translation: TranslationConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct TranslationConfig {
    pub api_key: Option<SecretString>,
    pub endpoint: String,
    pub timeout_secs: u64,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub translation_api_key: Option<String>,
    pub translation_endpoint: Option<String>,
    pub translation_timeout_secs: Option<u64>,
    pub log_level: Option<String>,
    pub log_format: Option<LogFormat>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
    #[error(
        "translation.api_key is not configured. Set QUOTEFLOW_TRANSLATION_API_KEY or add it to the [translation] section"
    )]
    MissingTranslationKey,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            translation: TranslationConfig {
                api_key: None,
                endpoint: DEFAULT_TRANSLATION_ENDPOINT.to_string(),
                timeout_secs: 15,
            },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl TranslationConfig {
    /// The provider credential, rejected when unset or blank. Callers check
    /// this before any request is attempted.
    pub fn api_key(&self) -> Result<&SecretString, ConfigError> {
        self.api_key
            .as_ref()
            .filter(|key| !key.expose_secret().trim().is_empty())
            .ok_or(ConfigError::MissingTranslationKey)
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key().is_ok()
    }
}

fn secret_value(value: String) -> SecretString {
    value.into()
}

impl std::str::FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options
                .config_path
                .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_CANDIDATES[0]));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(translation) = patch.translation {
            if let Some(api_key_value) = translation.api_key {
                self.translation.api_key = Some(secret_value(api_key_value));
            }
            if let Some(endpoint) = translation.endpoint {
                self.translation.endpoint = endpoint;
            }
            if let Some(timeout_secs) = translation.timeout_secs {
                self.translation.timeout_secs = timeout_secs;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        let api_key = read_env("QUOTEFLOW_TRANSLATION_API_KEY")
            .or_else(|| read_env("GOOGLE_TRANSLATE_API_KEY"));
        if let Some(value) = api_key {
            self.translation.api_key = Some(secret_value(value));
        }
        if let Some(value) = read_env("QUOTEFLOW_TRANSLATION_ENDPOINT") {
            self.translation.endpoint = value;
        }
        if let Some(value) = read_env("QUOTEFLOW_TRANSLATION_TIMEOUT_SECS") {
            self.translation.timeout_secs =
                parse_u64("QUOTEFLOW_TRANSLATION_TIMEOUT_SECS", &value)?;
        }

        let log_level =
            read_env("QUOTEFLOW_LOGGING_LEVEL").or_else(|| read_env("QUOTEFLOW_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("QUOTEFLOW_LOGGING_FORMAT").or_else(|| read_env("QUOTEFLOW_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(api_key) = overrides.translation_api_key {
            self.translation.api_key = Some(secret_value(api_key));
        }
        if let Some(endpoint) = overrides.translation_endpoint {
            self.translation.endpoint = endpoint;
        }
        if let Some(timeout_secs) = overrides.translation_timeout_secs {
            self.translation.timeout_secs = timeout_secs;
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
        if let Some(log_format) = overrides.log_format {
            self.logging.format = log_format;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_translation(&self.translation)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

/// The config file `load` would read for `explicit_path`, if any exists.
pub fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    CONFIG_FILE_CANDIDATES.into_iter().map(PathBuf::from).find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_translation(translation: &TranslationConfig) -> Result<(), ConfigError> {
    let endpoint = translation.endpoint.trim();
    if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
        return Err(ConfigError::Validation(
            "translation.endpoint must start with http:// or https://".to_string(),
        ));
    }

    if translation.timeout_secs == 0 || translation.timeout_secs > 120 {
        return Err(ConfigError::Validation(
            "translation.timeout_secs must be in range 1..=120".to_string(),
        ));
    }

    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    translation: Option<TranslationPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct TranslationPatch {
    api_key: Option<String>,
    endpoint: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}

#[cfg(test)]
mod tests {
    use std::env;
    use std::fs;
    use std::io;
    use std::sync::{Mutex, OnceLock};

    use secrecy::ExposeSecret;
    use tempfile::TempDir;

    use super::{
        AppConfig, ConfigError, ConfigOverrides, LoadOptions, LogFormat,
        DEFAULT_TRANSLATION_ENDPOINT,
    };

    static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

    const CONFIG_VARS: [&str; 8] = [
        "QUOTEFLOW_TRANSLATION_API_KEY",
        "GOOGLE_TRANSLATE_API_KEY",
        "QUOTEFLOW_TRANSLATION_ENDPOINT",
        "QUOTEFLOW_TRANSLATION_TIMEOUT_SECS",
        "QUOTEFLOW_LOGGING_LEVEL",
        "QUOTEFLOW_LOGGING_FORMAT",
        "QUOTEFLOW_LOG_LEVEL",
        "QUOTEFLOW_LOG_FORMAT",
    ];

    fn env_lock() -> &'static Mutex<()> {
        ENV_LOCK.get_or_init(|| Mutex::new(()))
    }

    fn clear_vars(vars: &[&str]) {
        for var in vars {
            env::remove_var(var);
        }
    }

    fn ensure(condition: bool, message: &'static str) -> Result<(), String> {
        if condition {
            Ok(())
        } else {
            Err(message.to_string())
        }
    }

    #[test]
    fn defaults_load_without_file_or_credential() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(&CONFIG_VARS);

        let config = AppConfig::load(LoadOptions::default())
            .map_err(|err| format!("config load failed: {err}"))?;

        ensure(
            config.translation.endpoint == DEFAULT_TRANSLATION_ENDPOINT,
            "default endpoint should be the v2 API",
        )?;
        ensure(config.translation.timeout_secs == 15, "default timeout should be 15s")?;
        ensure(!config.translation.has_api_key(), "no key should be configured")?;
        ensure(
            matches!(config.translation.api_key(), Err(ConfigError::MissingTranslationKey)),
            "missing key should be reported on access",
        )?;
        ensure(
            matches!(config.logging.format, LogFormat::Compact),
            "default logging format should be compact",
        )
    }

    #[test]
    fn file_load_supports_env_interpolation() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(&CONFIG_VARS);

        env::set_var("TEST_TRANSLATE_KEY", "key-from-interpolation");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("quoteflow.toml");
            fs::write(
                &path,
                r#"
[translation]
api_key = "${TEST_TRANSLATE_KEY}"
timeout_secs = 5
"#,
            )
            .map_err(|err| err.to_string())?;

            let config =
                AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() })
                    .map_err(|err| format!("config load failed: {err}"))?;

            let key = config.translation.api_key().map_err(|err| err.to_string())?;
            ensure(
                key.expose_secret() == "key-from-interpolation",
                "api key should be interpolated from environment",
            )?;
            ensure(config.translation.timeout_secs == 5, "timeout should come from file")?;
            Ok(())
        })();

        clear_vars(&["TEST_TRANSLATE_KEY"]);
        result
    }

    #[test]
    fn missing_interpolation_variable_fails_load() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(&CONFIG_VARS);

        let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
        let path = dir.path().join("quoteflow.toml");
        fs::write(&path, "[translation]\napi_key = \"${QUOTEFLOW_TEST_UNSET_VAR}\"\n")
            .map_err(|err| err.to_string())?;

        let result =
            AppConfig::load(LoadOptions { config_path: Some(path), ..LoadOptions::default() });

        ensure(
            matches!(
                result,
                Err(ConfigError::MissingEnvInterpolation { ref var }) if var == "QUOTEFLOW_TEST_UNSET_VAR"
            ),
            "unset interpolation variable should be named in the error",
        )
    }

    #[test]
    fn legacy_key_variable_is_accepted() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(&CONFIG_VARS);

        env::set_var("GOOGLE_TRANSLATE_API_KEY", "legacy-key");
        env::set_var("QUOTEFLOW_LOG_LEVEL", "warn");
        env::set_var("QUOTEFLOW_LOG_FORMAT", "json");

        let result = (|| -> Result<(), String> {
            let config = AppConfig::load(LoadOptions::default())
                .map_err(|err| format!("config load failed: {err}"))?;

            let key = config.translation.api_key().map_err(|err| err.to_string())?;
            ensure(key.expose_secret() == "legacy-key", "alias variable should supply the key")?;
            ensure(config.logging.level == "warn", "log level alias should apply")?;
            ensure(
                matches!(config.logging.format, LogFormat::Json),
                "log format alias should apply",
            )?;
            Ok(())
        })();

        clear_vars(&CONFIG_VARS);
        result
    }

    #[test]
    fn precedence_defaults_file_env_overrides() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(&CONFIG_VARS);

        env::set_var("QUOTEFLOW_TRANSLATION_API_KEY", "key-from-env");
        env::set_var("QUOTEFLOW_TRANSLATION_ENDPOINT", "http://127.0.0.1:9/v2");

        let result = (|| -> Result<(), String> {
            let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
            let path = dir.path().join("quoteflow.toml");
            fs::write(
                &path,
                r#"
[translation]
api_key = "key-from-file"
endpoint = "https://translate.example.test/v2"
timeout_secs = 30

[logging]
level = "warn"
"#,
            )
            .map_err(|err| err.to_string())?;

            let config = AppConfig::load(LoadOptions {
                config_path: Some(path),
                overrides: ConfigOverrides {
                    translation_endpoint: Some("https://override.example.test/v2".to_string()),
                    log_level: Some("debug".to_string()),
                    ..ConfigOverrides::default()
                },
                ..LoadOptions::default()
            })
            .map_err(|err| format!("config load failed: {err}"))?;

            ensure(
                config.translation.endpoint == "https://override.example.test/v2",
                "override endpoint should win",
            )?;
            ensure(config.logging.level == "debug", "overridden log level should be debug")?;
            ensure(config.translation.timeout_secs == 30, "file timeout should beat default")?;
            let key = config.translation.api_key().map_err(|err| err.to_string())?;
            ensure(
                key.expose_secret() == "key-from-env",
                "env api key should win over file and defaults",
            )?;
            Ok(())
        })();

        clear_vars(&CONFIG_VARS);
        result
    }

    #[test]
    fn validation_fails_fast_with_actionable_error() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(&CONFIG_VARS);

        env::set_var("QUOTEFLOW_TRANSLATION_TIMEOUT_SECS", "0");

        let result = (|| -> Result<(), String> {
            let error = match AppConfig::load(LoadOptions::default()) {
                Ok(_) => {
                    return Err("expected validation failure but config load succeeded".to_string())
                }
                Err(error) => error,
            };
            let has_message = matches!(
                error,
                ConfigError::Validation(ref message) if message.contains("translation.timeout_secs")
            );
            ensure(has_message, "validation failure should mention translation.timeout_secs")?;

            let endpoint_error = AppConfig::load(LoadOptions {
                overrides: ConfigOverrides {
                    translation_endpoint: Some("ftp://translate.example.test".to_string()),
                    translation_timeout_secs: Some(10),
                    ..ConfigOverrides::default()
                },
                ..LoadOptions::default()
            });
            ensure(
                matches!(
                    endpoint_error,
                    Err(ConfigError::Validation(ref message)) if message.contains("translation.endpoint")
                ),
                "non-http endpoint should be rejected",
            )
        })();

        clear_vars(&CONFIG_VARS);
        result
    }

    #[test]
    fn non_numeric_timeout_env_is_rejected() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(&CONFIG_VARS);

        env::set_var("QUOTEFLOW_TRANSLATION_TIMEOUT_SECS", "soon");
        let result = AppConfig::load(LoadOptions::default());
        clear_vars(&CONFIG_VARS);

        ensure(
            matches!(result, Err(ConfigError::InvalidEnvOverride { ref key, .. }) if key == "QUOTEFLOW_TRANSLATION_TIMEOUT_SECS"),
            "invalid timeout should name the variable",
        )
    }

    #[test]
    fn blank_api_key_counts_as_missing() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(&CONFIG_VARS);

        let config = AppConfig::load(LoadOptions {
            overrides: ConfigOverrides {
                translation_api_key: Some("   ".to_string()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        })
        .map_err(|err| format!("config load failed: {err}"))?;

        ensure(!config.translation.has_api_key(), "blank key should not count as configured")
    }

    #[test]
    fn required_file_must_exist() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(&CONFIG_VARS);

        let dir = TempDir::new().map_err(|err: io::Error| err.to_string())?;
        let missing = dir.path().join("absent.toml");
        let result = AppConfig::load(LoadOptions {
            config_path: Some(missing.clone()),
            require_file: true,
            ..LoadOptions::default()
        });

        ensure(
            matches!(result, Err(ConfigError::MissingConfigFile(ref path)) if *path == missing),
            "missing required file should be reported",
        )
    }

    #[test]
    fn secret_values_are_not_leaked_by_debug() -> Result<(), String> {
        let _guard = env_lock().lock().map_err(|_| "env lock is poisoned".to_string())?;
        clear_vars(&CONFIG_VARS);

        env::set_var("QUOTEFLOW_TRANSLATION_API_KEY", "AIza-secret-value");

        let result = (|| -> Result<(), String> {
            let config = AppConfig::load(LoadOptions::default())
                .map_err(|err| format!("config load failed: {err}"))?;
            let debug = format!("{config:?}");

            ensure(!debug.contains("AIza-secret-value"), "debug output should not contain api key")
        })();

        clear_vars(&CONFIG_VARS);
        result
    }
}
