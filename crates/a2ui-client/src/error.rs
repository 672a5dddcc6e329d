//! Errors raised by the client-side processing layer.
//!
//! Protocol faults in the message stream (malformed messages, dangling
//! references, unresolvable values) are not errors here: they are skipped,
//! logged and reported through [`ProcessReport`](crate::processor::ProcessReport).
//! The types below cover calls a renderer makes directly.

use a2ui_core::DecodeError;
use a2ui_core::types::{ComponentId, SurfaceId};
use thiserror::Error;

/// Errors from client operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum A2uiClientError {
    /// A message could not be decoded.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// No surface with this id exists.
    #[error("unknown surface '{surface_id}'")]
    UnknownSurface {
        /// The requested surface.
        surface_id: SurfaceId,
    },

    /// The surface has no component with this id.
    #[error("surface '{surface_id}' has no component '{component_id}'")]
    UnknownComponent {
        /// The surface that was searched.
        surface_id: SurfaceId,
        /// The requested component.
        component_id: ComponentId,
    },

    /// The component exists but does not carry an action.
    #[error("component '{component_id}' is a {kind} and carries no action")]
    NotActionable {
        /// The component that was triggered.
        component_id: ComponentId,
        /// Its variant name.
        kind: String,
    },

    /// An event subscriber failed.
    #[error("subscriber error: {0}")]
    Subscriber(#[from] SubscriberError),

    /// A `validationRegexp` could not be compiled.
    #[error("invalid validation pattern '{pattern}': {source}")]
    InvalidPattern {
        /// The pattern as sent by the agent.
        pattern: String,
        /// The compile error.
        #[source]
        source: regex::Error,
    },
}

/// Errors returned by [`EventSubscriber`](crate::subscriber::EventSubscriber)
/// handlers.
///
/// The event channel catches these at the handler boundary; they never
/// prevent the event from completing.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SubscriberError {
    /// The handler could not produce a response.
    #[error("subscriber failed: {message}")]
    Failed {
        /// What went wrong.
        message: String,
    },

    /// The handler panicked. Produced by the channel, not by handlers.
    #[error("subscriber panicked: {message}")]
    Panicked {
        /// The panic payload, if it was a string.
        message: String,
    },

    /// Custom error from a subscriber implementation.
    #[error("{message}")]
    Custom {
        /// Error message.
        message: String,
        /// Optional source error for chaining.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

impl SubscriberError {
    /// Create a failure with a message.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed {
            message: message.into(),
        }
    }

    /// Create a custom error with a message and source.
    #[must_use]
    pub fn custom_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Custom {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

pub type Result<T> = std::result::Result<T, A2uiClientError>;
