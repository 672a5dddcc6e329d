use crate::types::ids::{ComponentId, SurfaceId};
use crate::types::value::Scalar;
use serde::{Deserialize, Serialize};

/// One resolved context pair of a user action.
///
/// `value` is `null` when neither the path nor a literal fallback produced a
/// scalar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedContextEntry {
    pub key: String,
    pub value: Option<Scalar>,
}

/// Event raised when the user activates an actionable component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserAction {
    pub name: String,
    pub surface_id: SurfaceId,
    pub source_component_id: ComponentId,
    /// RFC 3339 time the action was raised.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub context: Vec<ResolvedContextEntry>,
}

impl UserAction {
    pub fn new(
        name: impl Into<String>,
        surface_id: impl Into<SurfaceId>,
        source_component_id: impl Into<ComponentId>,
    ) -> Self {
        Self {
            name: name.into(),
            surface_id: surface_id.into(),
            source_component_id: source_component_id.into(),
            timestamp: None,
            context: Vec::new(),
        }
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    pub fn with_context(mut self, key: impl Into<String>, value: Option<Scalar>) -> Self {
        self.context.push(ResolvedContextEntry {
            key: key.into(),
            value,
        });
        self
    }

    /// Looks up a resolved context value by key.
    pub fn context_value(&self, key: &str) -> Option<&Scalar> {
        self.context
            .iter()
            .find(|entry| entry.key == key)
            .and_then(|entry| entry.value.as_ref())
    }
}

/// Client-to-agent messages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ClientMessage {
    UserAction(UserAction),
}

impl From<UserAction> for ClientMessage {
    fn from(action: UserAction) -> Self {
        ClientMessage::UserAction(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_action_wire_shape() {
        let action = UserAction::new("form_submit", "main", "submit-button")
            .with_timestamp("2025-01-01T00:00:00Z")
            .with_context("name", Some(Scalar::from("John")))
            .with_context("phone", None);

        assert_eq!(
            serde_json::to_value(ClientMessage::from(action)).unwrap(),
            json!({
                "userAction": {
                    "name": "form_submit",
                    "surfaceId": "main",
                    "sourceComponentId": "submit-button",
                    "timestamp": "2025-01-01T00:00:00Z",
                    "context": [
                        {"key": "name", "value": "John"},
                        {"key": "phone", "value": null}
                    ]
                }
            })
        );
    }

    #[test]
    fn test_context_value_lookup() {
        let action = UserAction::new("a", "s", "c")
            .with_context("age", Some(Scalar::Int(25)))
            .with_context("missing", None);
        assert_eq!(action.context_value("age"), Some(&Scalar::Int(25)));
        assert_eq!(action.context_value("missing"), None);
        assert_eq!(action.context_value("absent"), None);
    }
}
