//! Google Cloud Translation v2 client.
//!
//! Every call is a single `POST` carrying the parameters in the query string
//! (`key`, `q`, `target`, `format=text`, optional `source`). Only the first
//! candidate of the response is used.

use std::time::Duration;

use async_trait::async_trait;
use quoteflow_core::config::TranslationConfig;
use quoteflow_core::translation::{
    TranslationError, TranslationRequest, TranslationResult, Translator,
};
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("failed to build translation http client: {0}")]
    ClientBuild(#[from] reqwest::Error),
}

#[derive(Clone, Debug)]
pub struct GoogleTranslateGateway {
    client: Client,
    endpoint: String,
    api_key: Option<SecretString>,
}

impl GoogleTranslateGateway {
    pub fn new(
        endpoint: impl Into<String>,
        api_key: Option<SecretString>,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint: endpoint.into(), api_key })
    }

    /// Builds a gateway even when no key is configured; calls then fail with
    /// `MissingCredential` without touching the network.
    pub fn from_config(config: &TranslationConfig) -> Result<Self, GatewayError> {
        Self::new(
            config.endpoint.clone(),
            config.api_key().ok().cloned(),
            Duration::from_secs(config.timeout_secs),
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn api_key(&self) -> Result<&SecretString, TranslationError> {
        self.api_key
            .as_ref()
            .filter(|key| !key.expose_secret().trim().is_empty())
            .ok_or(TranslationError::MissingCredential)
    }
}

#[async_trait]
impl Translator for GoogleTranslateGateway {
    async fn translate(
        &self,
        request: &TranslationRequest,
    ) -> Result<TranslationResult, TranslationError> {
        if request.text.trim().is_empty() {
            return Err(TranslationError::EmptyText);
        }
        let api_key = self.api_key()?;

        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .query(&query_params(request, api_key))
            .send()
            .await
            .map_err(|error| {
                let error = error.without_url();
                warn!(
                    event_name = "translation.transport_failed",
                    target_language = request.target.provider_code(),
                    timeout = error.is_timeout(),
                    error = %error,
                    "translation request failed"
                );
                TranslationError::Transport(error.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(
                event_name = "translation.provider_status",
                target_language = request.target.provider_code(),
                status = status.as_u16(),
                "translation provider rejected request"
            );
            return Err(TranslationError::ProviderStatus { status: status.as_u16() });
        }

        let body: TranslateResponse = response.json().await.map_err(|error| {
            TranslationError::Transport(format!(
                "failed to decode translation response: {}",
                error.without_url()
            ))
        })?;
        let result = first_translation(body)?;

        debug!(
            event_name = "translation.completed",
            target_language = request.target.provider_code(),
            detected_source = result.detected_source_language.as_deref().unwrap_or("unknown"),
            "translation completed"
        );
        Ok(result)
    }
}

fn query_params<'a>(
    request: &'a TranslationRequest,
    api_key: &'a SecretString,
) -> Vec<(&'static str, &'a str)> {
    let mut params = vec![
        ("key", api_key.expose_secret()),
        ("q", request.text.as_str()),
        ("target", request.target.provider_code()),
        ("format", "text"),
    ];
    if let Some(source) = request.source {
        params.push(("source", source.provider_code()));
    }
    params
}

fn first_translation(body: TranslateResponse) -> Result<TranslationResult, TranslationError> {
    body.data
        .translations
        .into_iter()
        .next()
        .map(|candidate| TranslationResult {
            translated_text: candidate.translated_text,
            detected_source_language: candidate.detected_source_language,
        })
        .ok_or(TranslationError::EmptyResponse)
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    data: TranslateData,
}

#[derive(Debug, Deserialize)]
struct TranslateData {
    #[serde(default)]
    translations: Vec<TranslationCandidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TranslationCandidate {
    translated_text: String,
    detected_source_language: Option<String>,
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use quoteflow_core::translation::{
        Language, TranslationError, TranslationRequest, TranslationResult, Translator,
    };
    use secrecy::SecretString;

    use super::{first_translation, query_params, GoogleTranslateGateway, TranslateResponse};

    fn parse(body: &str) -> TranslateResponse {
        serde_json::from_str(body).expect("valid provider payload")
    }

    #[test]
    fn first_candidate_is_used() {
        let body = parse(
            r#"{"data":{"translations":[
                {"translatedText":"Hallo","detectedSourceLanguage":"en"},
                {"translatedText":"Servus"}
            ]}}"#,
        );

        assert_eq!(
            first_translation(body),
            Ok(TranslationResult {
                translated_text: "Hallo".to_owned(),
                detected_source_language: Some("en".to_owned()),
            })
        );
    }

    #[test]
    fn empty_candidate_list_is_an_error() {
        assert_eq!(first_translation(parse(r#"{"data":{"translations":[]}}"#)), Err(TranslationError::EmptyResponse));
        assert_eq!(first_translation(parse(r#"{"data":{}}"#)), Err(TranslationError::EmptyResponse));
    }

    #[test]
    fn query_carries_provider_codes_and_plain_text_format() {
        let key = SecretString::from("test-key".to_owned());
        let request = TranslationRequest::new("你好", Language::Zh)
            .expect("non-empty")
            .with_source(Language::De);

        assert_eq!(
            query_params(&request, &key),
            vec![
                ("key", "test-key"),
                ("q", "你好"),
                ("target", "zh-CN"),
                ("format", "text"),
                ("source", "de"),
            ]
        );
    }

    #[tokio::test]
    async fn missing_key_fails_before_any_request() {
        let gateway =
            GoogleTranslateGateway::new("http://127.0.0.1:9/v2", None, Duration::from_secs(1))
                .expect("client builds");
        let request = TranslationRequest::new("Hello", Language::De).expect("non-empty");

        assert_eq!(gateway.translate(&request).await, Err(TranslationError::MissingCredential));
    }

    #[tokio::test]
    async fn whitespace_text_is_rejected_locally() {
        let gateway = GoogleTranslateGateway::new(
            "http://127.0.0.1:9/v2",
            Some(SecretString::from("test-key".to_owned())),
            Duration::from_secs(1),
        )
        .expect("client builds");
        let request =
            TranslationRequest { text: "   ".to_owned(), target: Language::De, source: None };

        assert_eq!(gateway.translate(&request).await, Err(TranslationError::EmptyText));
    }
}
