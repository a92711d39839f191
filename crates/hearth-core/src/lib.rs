//! Core configuration and domain types for the hearth event forwarder.
//!
//! Provides the process-lifetime configuration, the inbound event payload,
//! and the core error taxonomy. The forwarding crate depends on these
//! foundational types; nothing here performs I/O beyond reading
//! configuration sources at startup.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod event;

pub use config::Config;
pub use error::{CoreError, Result};
pub use event::Event;
