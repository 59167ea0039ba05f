use quoteflow_core::config::{AppConfig, LoadOptions, LogFormat, LoggingConfig};
use tracing::{debug, Level};

/// Installs the global subscriber. Events go to stderr so command output on
/// stdout stays machine-readable. An unloadable config falls back to the
/// default logging section; the command itself reports the config error.
pub fn init(options: &LoadOptions) {
    let logging = AppConfig::load(options.clone())
        .map(|config| config.logging)
        .unwrap_or_else(|_| AppConfig::default().logging);
    init_with(&logging);
}

/// Returns `false` when a global subscriber was already installed; that
/// subscriber stays in place.
pub fn init_with(logging: &LoggingConfig) -> bool {
    let log_level = logging.level.parse::<Level>().unwrap_or(Level::INFO);
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(log_level)
        .with_writer(std::io::stderr);

    let installed = match logging.format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Pretty => builder.pretty().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };

    match installed {
        Ok(()) => true,
        Err(error) => {
            debug!(
                event_name = "logging.subscriber_present",
                error = %error,
                "keeping the subscriber that was installed first"
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use quoteflow_core::config::{AppConfig, LogFormat};

    use super::init_with;

    #[test]
    fn repeated_init_keeps_first_subscriber() {
        let mut logging = AppConfig::default().logging;
        init_with(&logging);

        logging.format = LogFormat::Json;
        assert!(!init_with(&logging), "second subscriber must not replace the first");
    }
}
