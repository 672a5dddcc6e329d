use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::ops::Deref;
use uuid::Uuid;

/// Macro to define a string-backed name type.
///
/// A2UI identifiers are chosen by the agent (`"main"`, `"submit-btn"`), so
/// unlike [`EventId`] they are kept verbatim. The newtype keeps surface ids
/// and component ids from being mixed up.
macro_rules! define_name_type {
    ($(#[$attr:meta])* $name:ident) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new id from any string.
            pub fn new(s: impl Into<String>) -> Self {
                Self(s.into())
            }

            /// Returns the id as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl Deref for $name {
            type Target = str;
            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }
    };
}

define_name_type!(
    /// Surface ID
    ///
    /// Identifies one independently addressable UI region.
    SurfaceId
);

define_name_type!(
    /// Component ID
    ///
    /// Unique within a surface. Components reference their children by it.
    ComponentId
);

/// Identifier of one dispatched user action.
///
/// Generated locally, never sent by the agent, so a random UUID is enough.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(Uuid);

impl EventId {
    /// Creates a new random ID.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the internal UUID representation.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

/// Allows creating an ID from a Uuid.
impl From<Uuid> for EventId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
