//! Fallback orchestration across configured tokens.

use hearth_core::{Config, Event};
use serde_json::Value;
use tracing::{info_span, Instrument};
use uuid::Uuid;

use crate::client::{AttemptOutcome, ClientConfig, ForwardClient};
use crate::error::{FailureReason, ForwardError, Result};

/// Forwards events downstream, falling back across tokens.
///
/// Built once at process start and shared across invocations. Holds the
/// pooled HTTP client, the composed downstream URL, and the ordered token
/// list (empty entries already filtered out). No state survives an
/// invocation: token order is fixed and past failures never influence the
/// next invocation.
#[derive(Debug, Clone)]
pub struct Forwarder {
    client: ForwardClient,
    endpoint_url: String,
    tokens: Vec<String>,
}

impl Forwarder {
    /// Creates a forwarder from the process configuration.
    ///
    /// # Errors
    ///
    /// Returns `ForwardError::Configuration` if the HTTP client cannot be
    /// initialized.
    pub fn new(config: &Config) -> Result<Self> {
        let client = ForwardClient::new(ClientConfig::from(config))?;

        Ok(Self {
            client,
            endpoint_url: config.endpoint_url(),
            tokens: config.tokens().into_iter().map(String::from).collect(),
        })
    }

    /// Number of usable tokens.
    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }

    /// Forwards one event and returns the downstream response body.
    ///
    /// The event is serialized once; every attempt reuses the same bytes.
    /// Tokens are tried strictly in order and the first success
    /// short-circuits the rest. A token is never retried within an
    /// invocation.
    ///
    /// # Errors
    ///
    /// - `ForwardError::Exhausted` when every token failed, carrying the
    ///   last failure reason - or immediately, with the no-tokens reason,
    ///   when the token list is empty.
    /// - `ForwardError::ResponseParse` when a success status carried a
    ///   non-JSON body; this aborts the invocation without trying further
    ///   tokens.
    pub async fn forward(&self, event: &Event) -> Result<Value> {
        let invocation_id = Uuid::new_v4();
        let span = info_span!(
            "forward",
            invocation_id = %invocation_id,
            url = %self.endpoint_url,
        );

        async move {
            let body = event.to_body()?;
            tracing::debug!(event = %String::from_utf8_lossy(&body), "event received");

            if self.tokens.is_empty() {
                tracing::warn!("no tokens configured, nothing to attempt");
                return Err(ForwardError::exhausted(0, FailureReason::NoTokens));
            }

            let mut last_failure = FailureReason::NoTokens;
            let mut attempts = 0u32;

            for (index, token) in self.tokens.iter().enumerate() {
                let attempt_number = index as u32 + 1;
                attempts = attempt_number;

                match self
                    .client
                    .attempt(&self.endpoint_url, token, body.clone(), attempt_number)
                    .await?
                {
                    AttemptOutcome::Success(value) => {
                        tracing::info!(attempt = attempt_number, "event forwarded");
                        return Ok(value);
                    },
                    AttemptOutcome::HttpFailure { status, .. } => {
                        last_failure = FailureReason::Status { status };
                    },
                    AttemptOutcome::TransportError { message } => {
                        last_failure = FailureReason::Transport { message };
                    },
                }
            }

            Err(ForwardError::exhausted(attempts, last_failure))
        }
        .instrument(span)
        .await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn config_with_tokens(token_1: Option<&str>, token_2: Option<&str>) -> Config {
        Config {
            ha_url: "home.example.net".to_string(),
            ha_api_path: "/api/alexa/smart_home".to_string(),
            ha_token_1: token_1.map(String::from),
            ha_token_2: token_2.map(String::from),
            debug: false,
            connect_timeout_ms: 2_000,
            read_timeout_ms: 10_000,
        }
    }

    #[test]
    fn construction_filters_unusable_tokens() {
        let forwarder = Forwarder::new(&config_with_tokens(Some(""), Some("second"))).unwrap();
        assert_eq!(forwarder.token_count(), 1);

        let forwarder = Forwarder::new(&config_with_tokens(None, None)).unwrap();
        assert_eq!(forwarder.token_count(), 0);
    }

    #[tokio::test]
    async fn no_tokens_fails_without_any_network_call() {
        let forwarder = Forwarder::new(&config_with_tokens(None, None)).unwrap();
        let event = Event::new(json!({"directive": {}}));

        let error = forwarder.forward(&event).await.unwrap_err();

        match error {
            ForwardError::Exhausted { attempts, reason } => {
                assert_eq!(attempts, 0);
                assert_eq!(reason, FailureReason::NoTokens);
            },
            other => panic!("expected exhaustion, got {other:?}"),
        }
    }
}
