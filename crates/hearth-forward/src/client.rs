//! HTTP client for single delivery attempts.
//!
//! Handles request construction and outcome classification. One call is one
//! POST with one token; the result is a tagged [`AttemptOutcome`] so the
//! orchestrator never sees a transport exception.

use std::time::Duration;

use bytes::Bytes;
use hearth_core::Config;
use reqwest::header;
use serde_json::Value;

use crate::error::{ForwardError, Result};
use crate::{DEFAULT_CONNECT_TIMEOUT_MS, DEFAULT_READ_TIMEOUT_MS};

/// Configuration for the forwarding HTTP client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Connection timeout for downstream requests.
    pub connect_timeout: Duration,
    /// Read timeout for downstream requests.
    pub read_timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_millis(DEFAULT_CONNECT_TIMEOUT_MS),
            read_timeout: Duration::from_millis(DEFAULT_READ_TIMEOUT_MS),
            user_agent: "Hearth-Forwarder/1.0".to_string(),
        }
    }
}

impl From<&Config> for ClientConfig {
    fn from(config: &Config) -> Self {
        Self {
            connect_timeout: config.connect_timeout(),
            read_timeout: config.read_timeout(),
            ..Self::default()
        }
    }
}

/// Outcome of a single delivery attempt.
///
/// HTTP rejections and transport failures are ordinary values here, not
/// errors - they are the signal that makes the orchestrator try the next
/// token.
#[derive(Debug)]
pub enum AttemptOutcome {
    /// The downstream accepted the request (status < 400); the parsed
    /// response body.
    Success(Value),
    /// The downstream answered with an error status (>= 400).
    HttpFailure {
        /// The rejecting status code.
        status: u16,
        /// Raw response body, for diagnostics.
        body: String,
    },
    /// The request failed below the HTTP layer (connect, DNS, TLS,
    /// timeout).
    TransportError {
        /// Description of the failure.
        message: String,
    },
}

/// HTTP client for delivery attempts.
///
/// Wraps a pooled `reqwest::Client` built once per process. The client is
/// cheap to clone, `Send + Sync`, and holds no per-invocation state, so a
/// single instance serves concurrent invocations safely.
#[derive(Debug, Clone)]
pub struct ForwardClient {
    client: reqwest::Client,
}

impl ForwardClient {
    /// Creates a new client with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns `ForwardError::Configuration` if the HTTP client cannot be
    /// built with the provided settings.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .read_timeout(config.read_timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(|e| {
                ForwardError::configuration(format!("failed to build HTTP client: {e}"))
            })?;

        Ok(Self { client })
    }

    /// Performs one POST with one token and classifies the outcome.
    ///
    /// `attempt_number` is the 1-based position of the token in the
    /// fallback order, used only for diagnostics.
    ///
    /// # Errors
    ///
    /// The only error path is `ForwardError::ResponseParse`: a success
    /// status whose body is not valid JSON. Everything else - including
    /// transport failures - comes back as an `AttemptOutcome` value.
    pub async fn attempt(
        &self,
        url: &str,
        token: &str,
        body: Bytes,
        attempt_number: u32,
    ) -> Result<AttemptOutcome> {
        tracing::debug!(attempt = attempt_number, "sending downstream request");

        let response = match self
            .client
            .post(url)
            .header(header::AUTHORIZATION, format!("Bearer {token}"))
            .header(header::CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                let message = describe_transport_error(&e);
                tracing::error!(
                    attempt = attempt_number,
                    error = %message,
                    "token {attempt_number} request error"
                );
                return Ok(AttemptOutcome::TransportError { message });
            },
        };

        let status = response.status().as_u16();

        if status < 400 {
            let raw = match response.bytes().await {
                Ok(raw) => raw,
                Err(e) => {
                    let message = describe_transport_error(&e);
                    tracing::error!(
                        attempt = attempt_number,
                        error = %message,
                        "token {attempt_number} request error"
                    );
                    return Ok(AttemptOutcome::TransportError { message });
                },
            };

            return match serde_json::from_slice(&raw) {
                Ok(value) => {
                    tracing::debug!(attempt = attempt_number, status, "downstream accepted");
                    Ok(AttemptOutcome::Success(value))
                },
                Err(e) => {
                    tracing::error!(
                        attempt = attempt_number,
                        status,
                        error = %e,
                        "downstream response body is not valid JSON"
                    );
                    Err(ForwardError::response_parse(status, e))
                },
            };
        }

        let body_text = response.text().await.unwrap_or_default();
        tracing::error!(
            attempt = attempt_number,
            status,
            body = %body_text,
            "token {attempt_number} failed"
        );
        Ok(AttemptOutcome::HttpFailure { status, body: body_text })
    }
}

/// Folds a reqwest error into a single diagnostic message.
fn describe_transport_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        format!("request timed out: {error}")
    } else if error.is_connect() {
        format!("connection failed: {error}")
    } else {
        error.to_string()
    }
}
