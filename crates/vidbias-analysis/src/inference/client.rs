//! HTTP client for hosted inference models.
//!
//! Requests are `POST {base_url}/{model}` with a `{inputs, parameters, options}`
//! body. Non-2xx statuses are surfaced as [`InferenceError::Status`] without
//! reading the body; 2xx bodies are normalized by [`parse_output`].

use std::time::Duration;

use reqwest::Client;
use serde::Serialize;
use serde_json::{json, Value};

use super::response::{parse_output, InferenceOutput, LabelScore};
use super::retry::retry_with_backoff;
use crate::error::InferenceError;

#[derive(Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
    parameters: &'a Value,
    options: RequestOptions,
}

#[derive(Serialize)]
struct RequestOptions {
    wait_for_model: bool,
}

/// Shared client for every model the pipeline calls.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct InferenceClient {
    client: Client,
    base_url: String,
    api_token: Option<String>,
    timeout: Duration,
    max_retries: u32,
    backoff_base_ms: u64,
}

impl InferenceClient {
    /// Creates a client with the given per-call timeout and retry policy.
    ///
    /// `max_retries` is the number of additional attempts after the first
    /// failure for retriable errors. Set to `0` to disable retries.
    ///
    /// # Errors
    ///
    /// Returns [`reqwest::Error`] if the underlying client cannot be built.
    pub fn new(
        base_url: &str,
        api_token: Option<&str>,
        timeout_secs: u64,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, reqwest::Error> {
        Self::with_timeout(
            base_url,
            api_token,
            Duration::from_secs(timeout_secs),
            max_retries,
            backoff_base_ms,
        )
    }

    /// Like [`InferenceClient::new`] with a sub-second timeout resolution.
    ///
    /// # Errors
    ///
    /// Returns [`reqwest::Error`] if the underlying client cannot be built.
    pub fn with_timeout(
        base_url: &str,
        api_token: Option<&str>,
        timeout: Duration,
        max_retries: u32,
        backoff_base_ms: u64,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .user_agent("vidbias/0.1 (transcript-analysis)")
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token: api_token.map(str::to_owned),
            timeout,
            max_retries,
            backoff_base_ms,
        })
    }

    /// Build a client from application configuration.
    ///
    /// # Errors
    ///
    /// Returns [`reqwest::Error`] if the underlying client cannot be built.
    pub fn from_app_config(config: &vidbias_core::AppConfig) -> Result<Self, reqwest::Error> {
        Self::new(
            &config.inference_base_url,
            config.inference_api_token.as_deref(),
            config.inference_timeout_secs,
            config.inference_max_retries,
            config.inference_retry_backoff_ms,
        )
    }

    /// Classify `text` with `model` and return every class probability.
    ///
    /// # Errors
    ///
    /// - [`InferenceError::Http`] / [`InferenceError::Timeout`] on transport failure.
    /// - [`InferenceError::Status`] on a non-2xx status.
    /// - [`InferenceError::MalformedResponse`] if the body is not a label list.
    pub async fn classify(&self, model: &str, text: &str) -> Result<Vec<LabelScore>, InferenceError> {
        let parameters = json!({ "top_k": 5, "truncation": true });
        match self.call(model, text, &parameters).await? {
            InferenceOutput::Labels(labels) => Ok(labels),
            InferenceOutput::Generated(_) => Err(InferenceError::MalformedResponse {
                model: model.to_string(),
                reason: "expected label scores, got generated text".to_string(),
            }),
        }
    }

    /// Run a text-generation model over `prompt`.
    ///
    /// # Errors
    ///
    /// Same as [`InferenceClient::classify`], with a label list treated as malformed.
    pub async fn generate(
        &self,
        model: &str,
        prompt: &str,
        parameters: &Value,
    ) -> Result<String, InferenceError> {
        match self.call(model, prompt, parameters).await? {
            InferenceOutput::Generated(text) => Ok(text),
            InferenceOutput::Labels(_) => Err(InferenceError::MalformedResponse {
                model: model.to_string(),
                reason: "expected generated_text, got label scores".to_string(),
            }),
        }
    }

    async fn call(
        &self,
        model: &str,
        inputs: &str,
        parameters: &Value,
    ) -> Result<InferenceOutput, InferenceError> {
        let url = self.model_url(model);
        retry_with_backoff(self.max_retries, self.backoff_base_ms, || {
            self.call_once(&url, model, inputs, parameters)
        })
        .await
    }

    async fn call_once(
        &self,
        url: &str,
        model: &str,
        inputs: &str,
        parameters: &Value,
    ) -> Result<InferenceOutput, InferenceError> {
        let body = InferenceRequest {
            inputs,
            parameters,
            options: RequestOptions {
                wait_for_model: true,
            },
        };

        let mut request = self.client.post(url).json(&body);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| self.transport_error(model, e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(InferenceError::Status {
                model: model.to_string(),
                status: status.as_u16(),
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| self.transport_error(model, e))?;
        tracing::debug!(model, bytes = text.len(), "inference response received");
        parse_output(model, &text)
    }

    fn transport_error(&self, model: &str, source: reqwest::Error) -> InferenceError {
        if source.is_timeout() {
            InferenceError::Timeout {
                model: model.to_string(),
                timeout_ms: u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX),
            }
        } else {
            InferenceError::Http {
                model: model.to_string(),
                source,
            }
        }
    }

    fn model_url(&self, model: &str) -> String {
        format!("{}/{}", self.base_url, model.trim_start_matches('/'))
    }
}
