use thiserror::Error;

/// Errors raised while decoding A2UI wire messages.
///
/// A decode error always concerns a single message; callers skip that message
/// and keep processing the rest of the stream.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum DecodeError {
    /// The input was not valid JSON, or a field had the wrong shape.
    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The message object names a variant this protocol does not define.
    #[error("unknown message variant '{key}'")]
    UnknownVariant {
        /// The unrecognized variant key.
        key: String,
    },

    /// A message must be an object with exactly one variant key.
    #[error("message must be an object with exactly one variant key, found {found}")]
    NotSingleKey {
        /// Description of what was found instead.
        found: String,
    },

    /// A field is present but its value breaks a protocol rule.
    #[error("invalid {field}: {reason}")]
    InvalidValue {
        /// The offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

impl DecodeError {
    /// Create an invalid-value error.
    #[must_use]
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, DecodeError>;
