//! Error types for event forwarding.
//!
//! Per-attempt HTTP and transport failures are NOT errors - they are
//! [`AttemptOutcome`](crate::client::AttemptOutcome) values that trigger
//! fallback. The types here cover the conditions that actually fail an
//! invocation: exhaustion of every token, a garbage body on a success
//! status, and setup problems.

use std::fmt;

use hearth_core::CoreError;
use thiserror::Error;

/// Result type alias for forwarding operations.
pub type Result<T> = std::result::Result<T, ForwardError>;

/// Errors that fail a forwarding invocation.
#[derive(Debug, Error)]
pub enum ForwardError {
    /// Every configured token was tried and none succeeded, or no tokens
    /// were configured at all. The message carries only the LAST recorded
    /// failure reason; earlier failures are visible in the logs.
    #[error("downstream access failed after {attempts} attempt(s): {reason}")]
    Exhausted {
        /// Number of network calls actually made (0 when no tokens exist).
        attempts: u32,
        /// The last recorded failure reason.
        reason: FailureReason,
    },

    /// The downstream answered with a success status but a non-JSON body.
    /// This is fatal for the invocation - it never triggers fallback.
    #[error("downstream returned status {status} with a non-JSON body: {source}")]
    ResponseParse {
        /// Status code of the nominally successful response.
        status: u16,
        /// The underlying decode failure.
        #[source]
        source: serde_json::Error,
    },

    /// The HTTP client could not be constructed.
    #[error("invalid forwarder configuration: {message}")]
    Configuration {
        /// Configuration error message.
        message: String,
    },

    /// A core-level failure, e.g. event serialization.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ForwardError {
    /// Creates an exhaustion error.
    pub fn exhausted(attempts: u32, reason: FailureReason) -> Self {
        Self::Exhausted { attempts, reason }
    }

    /// Creates a response parse error.
    pub fn response_parse(status: u16, source: serde_json::Error) -> Self {
        Self::ResponseParse { status, source }
    }

    /// Creates a configuration error from a message.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration { message: message.into() }
    }
}

/// Why a delivery attempt (or a whole invocation) failed.
///
/// Stored by the orchestrator as it walks the token list; only the final
/// value ends up in the raised [`ForwardError::Exhausted`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    /// No tokens were configured, so no attempt was possible.
    NoTokens,
    /// The downstream rejected the request with an HTTP error status.
    Status {
        /// The rejecting status code.
        status: u16,
    },
    /// The request never completed at the HTTP layer.
    Transport {
        /// Description of the transport failure.
        message: String,
    },
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoTokens => write!(f, "no tokens configured"),
            Self::Status { status } => write!(f, "status {status}"),
            Self::Transport { message } => write!(f, "{message}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exhaustion_message_embeds_last_reason() {
        let error = ForwardError::exhausted(2, FailureReason::Status { status: 403 });
        assert_eq!(error.to_string(), "downstream access failed after 2 attempt(s): status 403");
    }

    #[test]
    fn no_tokens_message() {
        let error = ForwardError::exhausted(0, FailureReason::NoTokens);
        assert_eq!(
            error.to_string(),
            "downstream access failed after 0 attempt(s): no tokens configured"
        );
    }

    #[test]
    fn transport_reason_keeps_underlying_message() {
        let reason =
            FailureReason::Transport { message: "request timed out: deadline elapsed".to_string() };
        assert_eq!(reason.to_string(), "request timed out: deadline elapsed");
    }

    #[test]
    fn parse_error_is_distinct_from_exhaustion() {
        let source = serde_json::from_str::<serde_json::Value>("<html>").unwrap_err();
        let error = ForwardError::response_parse(200, source);
        assert!(matches!(error, ForwardError::ResponseParse { status: 200, .. }));
        assert!(error.to_string().contains("non-JSON body"));
    }
}
