use quoteflow_core::catalog::FormConfigRegistry;
use quoteflow_core::config::{AppConfig, LoadOptions};
use quoteflow_translate::GoogleTranslateGateway;
use serde::Serialize;

/// Result of one readiness check, serialized as `{"status": .., "detail": ..}`.
#[derive(Debug, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
enum Verdict {
    Pass(String),
    Fail(String),
    Skipped(String),
}

#[derive(Debug, Serialize)]
struct Check {
    name: &'static str,
    verdict: Verdict,
}

#[derive(Debug, Serialize)]
struct Readiness<'a> {
    ready: bool,
    failed: usize,
    checks: &'a [Check],
}

pub fn run(options: &LoadOptions, json_output: bool) -> String {
    let checks = readiness_checks(options);
    let failed = checks.iter().filter(|check| !matches!(check.verdict, Verdict::Pass(_))).count();
    let readiness = Readiness { ready: failed == 0, failed, checks: &checks };

    if json_output {
        return serde_json::to_string_pretty(&readiness).unwrap_or_else(|error| {
            serde_json::json!({ "ready": false, "error": error.to_string() }).to_string()
        });
    }

    let headline = if readiness.ready {
        "doctor: ready to quote".to_string()
    } else {
        format!("doctor: not ready, {failed} of {} checks did not pass", checks.len())
    };
    std::iter::once(headline)
        .chain(checks.iter().map(|check| {
            let (mark, detail) = match &check.verdict {
                Verdict::Pass(detail) => ("ok", detail),
                Verdict::Fail(detail) => ("FAIL", detail),
                Verdict::Skipped(detail) => ("skip", detail),
            };
            format!("{mark:>4}  {}: {detail}", check.name)
        }))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Credential and client checks need a loaded config and are skipped without
/// one. The form registry is checked either way.
fn readiness_checks(options: &LoadOptions) -> Vec<Check> {
    let mut checks = match AppConfig::load(options.clone()) {
        Ok(config) => vec![
            Check {
                name: "config_validation",
                verdict: Verdict::Pass("configuration loaded and validated".to_string()),
            },
            Check { name: "translation_credential", verdict: translation_credential(&config) },
            Check { name: "translation_client", verdict: translation_client(&config) },
        ],
        Err(error) => {
            let skipped = || Verdict::Skipped("configuration did not load".to_string());
            vec![
                Check { name: "config_validation", verdict: Verdict::Fail(error.to_string()) },
                Check { name: "translation_credential", verdict: skipped() },
                Check { name: "translation_client", verdict: skipped() },
            ]
        }
    };
    checks.push(Check { name: "form_registry", verdict: form_registry() });
    checks
}

fn translation_credential(config: &AppConfig) -> Verdict {
    match config.translation.api_key() {
        Ok(_) => Verdict::Pass("translation api key is configured".to_string()),
        Err(error) => Verdict::Fail(error.to_string()),
    }
}

fn translation_client(config: &AppConfig) -> Verdict {
    match GoogleTranslateGateway::from_config(&config.translation) {
        Ok(gateway) => Verdict::Pass(format!(
            "client ready for `{}` with {}s timeout",
            gateway.endpoint(),
            config.translation.timeout_secs
        )),
        Err(error) => Verdict::Fail(error.to_string()),
    }
}

fn form_registry() -> Verdict {
    let registry = FormConfigRegistry;
    let series = registry.list_series();
    let empty = series
        .iter()
        .filter(|name| registry.get_config(name).map_or(true, |config| config.fields.is_empty()))
        .copied()
        .collect::<Vec<_>>();

    if empty.is_empty() {
        Verdict::Pass(format!("form tables loaded for {}", series.join(", ")))
    } else {
        Verdict::Fail(format!("series without fields: {}", empty.join(", ")))
    }
}
