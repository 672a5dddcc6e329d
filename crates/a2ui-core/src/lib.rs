//! Wire types of the A2UI protocol.
//!
//! Agents describe user interfaces as a stream of [`Message`]s; clients answer
//! with [`ClientMessage`]s. Everything here is plain data with serde support.
//! Validation happens at decode time, so a value of these types always obeys
//! the protocol's shape rules.

pub mod error;
pub mod types;

pub use error::{DecodeError, Result};
pub use types::{ClientMessage, Component, Message};

/// Re-export to ensure the same type is used
pub use serde_json::Value as JsonValue;
