//! Inbound event payload handling.

use bytes::Bytes;
use serde_json::Value;

use crate::error::Result;

/// An inbound event payload.
///
/// The payload is an arbitrary JSON-compatible structure; it is not
/// validated or schema-checked here. It is serialized verbatim, exactly
/// once per invocation, and the resulting buffer is shared by every
/// delivery attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    payload: Value,
}

impl Event {
    /// Wraps a JSON payload as an event.
    pub fn new(payload: Value) -> Self {
        Self { payload }
    }

    /// The raw payload.
    pub fn payload(&self) -> &Value {
        &self.payload
    }

    /// Serializes the payload into the request body.
    ///
    /// Callers serialize once and clone the returned `Bytes` per attempt;
    /// cloning shares the underlying buffer instead of re-encoding.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Serialize` when the payload cannot be encoded.
    pub fn to_body(&self) -> Result<Bytes> {
        Ok(Bytes::from(serde_json::to_vec(&self.payload)?))
    }
}

impl From<Value> for Event {
    fn from(payload: Value) -> Self {
        Self::new(payload)
    }
}
