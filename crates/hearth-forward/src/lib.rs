//! Event forwarding with bearer-token fallback.
//!
//! This crate implements the delivery path of the hearth forwarder: a single
//! invocation serializes the inbound event once, then posts it to the
//! downstream API with each configured token in turn until one succeeds.
//!
//! # Architecture
//!
//! Two concerns, kept separate for testability:
//!
//! 1. **Request Attempt** (`client`) - one HTTP POST with one token,
//!    classified into a tagged [`AttemptOutcome`] value. Transport errors are
//!    converted to values at this boundary so the orchestrator's control flow
//!    is a plain conditional, not exception handling.
//! 2. **Fallback Orchestrator** (`forward`) - iterates tokens in order,
//!    short-circuits on the first success, and raises a single exhaustion
//!    error carrying the last observed failure reason.
//!
//! The underlying connection pool is built once per process and shared
//! across invocations; it holds no per-invocation state.
//!
//! # Example
//!
//! ```no_run
//! use hearth_core::{Config, Event};
//! use hearth_forward::Forwarder;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::load()?;
//! let forwarder = Forwarder::new(&config)?;
//!
//! let event = Event::new(serde_json::json!({"directive": {}}));
//! let response = forwarder.forward(&event).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod forward;

// Re-export main public API
pub use client::{AttemptOutcome, ClientConfig, ForwardClient};
pub use error::{FailureReason, ForwardError, Result};
pub use forward::Forwarder;

/// Default connection timeout in milliseconds.
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 2_000;

/// Default read timeout in milliseconds.
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 10_000;
