//! JSON-over-HTTP evidence service client.
//!
//! `POST {base_url}/search` and `POST {base_url}/suggest`, both with a
//! `{"query": ...}` body. Search answers with a search result object, suggest
//! with an array of strings.

use crate::config::ServiceConfig;
use crate::error::{ConfigError, SearchFailure, SuggestionFailure};
use crate::service::{EvidenceService, validate_result};
use crate::types::SearchResult;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::json;
use std::time::Duration;
use tracing::debug;

pub struct HttpEvidenceService {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    timeout_secs: u64,
}

impl HttpEvidenceService {
    /// Build a client from configuration.
    ///
    /// The API key is taken from `api_key`, else from the environment
    /// variable named by `api_key_env`. A missing key is not an error; the
    /// request is then sent without an `Authorization` header.
    pub fn new(config: &ServiceConfig) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| ConfigError::Invalid {
                message: format!("Failed to build HTTP client: {e}"),
            })?;
        let api_key = config
            .api_key
            .clone()
            .or_else(|| std::env::var(&config.api_key_env).ok())
            .filter(|k| !k.is_empty());
        if api_key.is_none() {
            debug!(env = %config.api_key_env, "No evidence service API key set");
        }
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
            timeout_secs: config.timeout_secs,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post(&self, path: &str, query: &str) -> reqwest::Result<reqwest::Response> {
        let url = format!("{}/{}", self.base_url, path);
        debug!(url = %url, "Sending evidence service request");
        let mut request = self.client.post(&url).json(&json!({ "query": query }));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        request.send().await
    }

    fn map_request_error(&self, err: reqwest::Error) -> SearchFailure {
        if err.is_timeout() {
            SearchFailure::Timeout {
                timeout_secs: self.timeout_secs,
            }
        } else {
            SearchFailure::Request {
                message: err.to_string(),
            }
        }
    }
}

fn map_http_error(status: StatusCode, body: &str) -> SearchFailure {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message").or(Some(e)))
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.trim().chars().take(200).collect());
    SearchFailure::Status {
        status: status.as_u16(),
        message,
    }
}

pub(crate) fn parse_search_body(body: &str) -> Result<SearchResult, SearchFailure> {
    let result: SearchResult = serde_json::from_str(body).map_err(|e| SearchFailure::Parse {
        message: e.to_string(),
    })?;
    validate_result(result)
}

pub(crate) fn parse_suggest_body(body: &str) -> Result<Vec<String>, SuggestionFailure> {
    serde_json::from_str(body).map_err(|e| SuggestionFailure::Parse {
        message: e.to_string(),
    })
}

#[async_trait]
impl EvidenceService for HttpEvidenceService {
    async fn search(&self, query: &str) -> Result<SearchResult, SearchFailure> {
        let response = self
            .post("search", query)
            .await
            .map_err(|e| self.map_request_error(e))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| self.map_request_error(e))?;
        if !status.is_success() {
            return Err(map_http_error(status, &body));
        }
        let mut result = parse_search_body(&body)?;
        if result.query.is_empty() {
            result.query = query.to_string();
        }
        Ok(result)
    }

    async fn suggest(&self, partial_query: &str) -> Result<Vec<String>, SuggestionFailure> {
        let response = self
            .post("suggest", partial_query)
            .await
            .map_err(|e| SuggestionFailure::Request {
                message: e.to_string(),
            })?;
        let status = response.status();
        if !status.is_success() {
            return Err(SuggestionFailure::Request {
                message: format!("HTTP {status}"),
            });
        }
        let body = response
            .text()
            .await
            .map_err(|e| SuggestionFailure::Request {
                message: e.to_string(),
            })?;
        parse_suggest_body(&body)
    }

    fn name(&self) -> &str {
        "http"
    }
}
