use std::env;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use tracing::debug;
use url::Url;

use quiz_core::model::{Quiz, QuizId};

use super::wire::{PlayResponse, SubmitRequest};
use super::{QuizBackend, ResultSubmission};
use crate::error::{BackendConfigError, BackendError};

const DEFAULT_BASE_URL: &str = "http://localhost:8080";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Header the backend's tunnel needs to skip its interstitial page.
const TUNNEL_WARNING_HEADER: &str = "ngrok-skip-browser-warning";

#[derive(Clone, Debug)]
pub struct BackendConfig {
    pub base_url: Url,
    pub timeout: Duration,
    pub skip_tunnel_warning: bool,
}

impl BackendConfig {
    /// # Errors
    ///
    /// Returns `BackendConfigError` if `base_url` is not an absolute http(s) URL.
    pub fn new(base_url: &str) -> Result<Self, BackendConfigError> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            skip_tunnel_warning: false,
        })
    }

    /// Read `QUIZ_BACKEND_URL`, `QUIZ_HTTP_TIMEOUT_SECS` and `QUIZ_SKIP_TUNNEL_WARNING`.
    ///
    /// # Errors
    ///
    /// Returns `BackendConfigError` for malformed values.
    pub fn from_env() -> Result<Self, BackendConfigError> {
        let base_url = env::var("QUIZ_BACKEND_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into());
        let mut config = Self::new(&base_url)?;

        if let Ok(raw) = env::var("QUIZ_HTTP_TIMEOUT_SECS") {
            let secs: u64 = raw
                .trim()
                .parse()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(BackendConfigError::Invalid {
                    name: "QUIZ_HTTP_TIMEOUT_SECS",
                    raw: raw.clone(),
                })?;
            config.timeout = Duration::from_secs(secs);
        }

        if let Ok(raw) = env::var("QUIZ_SKIP_TUNNEL_WARNING") {
            config.skip_tunnel_warning = matches!(
                raw.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            );
        }

        Ok(config)
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_skip_tunnel_warning(mut self, skip: bool) -> Self {
        self.skip_tunnel_warning = skip;
        self
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url.as_str().trim_end_matches('/'))
    }
}

fn parse_base_url(raw: &str) -> Result<Url, BackendConfigError> {
    let url = Url::parse(raw.trim()).map_err(|source| BackendConfigError::InvalidUrl {
        raw: raw.to_string(),
        source,
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(BackendConfigError::UnsupportedScheme(raw.to_string()));
    }
    Ok(url)
}

/// `QuizBackend` over the quiz service's HTTP API.
#[derive(Clone)]
pub struct HttpQuizBackend {
    client: Client,
    config: BackendConfig,
}

impl HttpQuizBackend {
    /// # Errors
    ///
    /// Returns `BackendConfigError::Client` if the HTTP client cannot be built.
    pub fn new(config: BackendConfig) -> Result<Self, BackendConfigError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if config.skip_tunnel_warning {
            headers.insert(
                HeaderName::from_static(TUNNEL_WARNING_HEADER),
                HeaderValue::from_static("69420"),
            );
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()?;
        Ok(Self { client, config })
    }

    #[must_use]
    pub fn config(&self) -> &BackendConfig {
        &self.config
    }
}

#[async_trait]
impl QuizBackend for HttpQuizBackend {
    async fn fetch_quiz(&self, id: QuizId) -> Result<Quiz, BackendError> {
        let url = self.config.endpoint(&format!("Play/{id}"));
        debug!(%url, "fetching quiz");

        let response = self
            .client
            .get(url)
            .header(CONTENT_TYPE, "application/json")
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(BackendError::HttpStatus(response.status()));
        }

        let bytes = response.bytes().await?;
        let body: PlayResponse = serde_json::from_slice(&bytes)?;
        body.into_quiz(id)
    }

    async fn submit_result(&self, submission: &ResultSubmission) -> Result<(), BackendError> {
        let url = self.config.endpoint("Play/Submit");
        debug!(%url, quiz_id = %submission.quiz_id, "posting result");

        let response = self
            .client
            .post(url)
            .json(&SubmitRequest::from(submission))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(BackendError::HttpStatus(response.status()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_without_double_slash() {
        let config = BackendConfig::new("https://quiz.example.com/").unwrap();
        assert_eq!(config.endpoint("Play/7"), "https://quiz.example.com/Play/7");

        let config = BackendConfig::new("https://quiz.example.com/api").unwrap();
        assert_eq!(
            config.endpoint("Play/Submit"),
            "https://quiz.example.com/api/Play/Submit"
        );
    }

    #[test]
    fn rejects_relative_and_non_http_urls() {
        assert!(matches!(
            BackendConfig::new("quiz.example.com"),
            Err(BackendConfigError::InvalidUrl { .. })
        ));
        assert!(matches!(
            BackendConfig::new("ftp://quiz.example.com"),
            Err(BackendConfigError::UnsupportedScheme(_))
        ));
    }

    #[test]
    fn builders_override_defaults() {
        let config = BackendConfig::new("http://localhost:9000")
            .unwrap()
            .with_timeout(Duration::from_secs(3))
            .with_skip_tunnel_warning(true);
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert!(config.skip_tunnel_warning);
        assert!(HttpQuizBackend::new(config).is_ok());
    }
}
