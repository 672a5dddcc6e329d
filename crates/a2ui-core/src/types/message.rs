use crate::JsonValue;
use crate::error::{DecodeError, Result};
use crate::types::component::ComponentEntry;
use crate::types::data::ScopeUpdate;
use crate::types::ids::{ComponentId, SurfaceId};
use serde::{Deserialize, Serialize};

/// Message variants of the A2UI protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    SurfaceUpdate,
    DataModelUpdate,
    BeginRendering,
    DeleteSurface,
}

impl MessageKind {
    /// All variants, in wire-key order.
    pub const ALL: [MessageKind; 4] = [
        MessageKind::SurfaceUpdate,
        MessageKind::DataModelUpdate,
        MessageKind::BeginRendering,
        MessageKind::DeleteSurface,
    ];

    /// The key selecting this variant on the wire.
    pub const fn as_str(&self) -> &'static str {
        match self {
            MessageKind::SurfaceUpdate => "surfaceUpdate",
            MessageKind::DataModelUpdate => "dataModelUpdate",
            MessageKind::BeginRendering => "beginRendering",
            MessageKind::DeleteSurface => "deleteSurface",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == key)
    }
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inserts or replaces component definitions on a surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceUpdate {
    pub surface_id: SurfaceId,
    pub components: Vec<ComponentEntry>,
}

/// Replaces named top-level scopes of a surface's data model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataModelUpdate {
    pub surface_id: SurfaceId,
    pub contents: Vec<ScopeUpdate>,
}

/// Designates the render root of a surface and starts rendering it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BeginRendering {
    pub surface_id: SurfaceId,
    pub root: ComponentId,
}

/// Removes a surface entirely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteSurface {
    pub surface_id: SurfaceId,
}

/// Union of all agent-to-client messages.
///
/// Serialized as a single-key object: `{"beginRendering": {...}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Message {
    SurfaceUpdate(SurfaceUpdate),
    DataModelUpdate(DataModelUpdate),
    BeginRendering(BeginRendering),
    DeleteSurface(DeleteSurface),
}

impl Message {
    pub fn kind(&self) -> MessageKind {
        match self {
            Message::SurfaceUpdate(_) => MessageKind::SurfaceUpdate,
            Message::DataModelUpdate(_) => MessageKind::DataModelUpdate,
            Message::BeginRendering(_) => MessageKind::BeginRendering,
            Message::DeleteSurface(_) => MessageKind::DeleteSurface,
        }
    }

    /// The surface this message targets.
    pub fn surface_id(&self) -> &SurfaceId {
        match self {
            Message::SurfaceUpdate(m) => &m.surface_id,
            Message::DataModelUpdate(m) => &m.surface_id,
            Message::BeginRendering(m) => &m.surface_id,
            Message::DeleteSurface(m) => &m.surface_id,
        }
    }

    /// Decode one message from a JSON value.
    ///
    /// Distinguishes an unknown variant key from a malformed payload so the
    /// caller can report which one it skipped.
    pub fn from_value(value: JsonValue) -> Result<Self> {
        let key = match &value {
            JsonValue::Object(map) if map.len() == 1 => map.keys().next().cloned(),
            JsonValue::Object(map) => {
                return Err(DecodeError::NotSingleKey {
                    found: format!("{} keys", map.len()),
                });
            }
            other => {
                return Err(DecodeError::NotSingleKey {
                    found: json_type_name(other).to_string(),
                });
            }
        };
        if let Some(key) = key {
            if MessageKind::from_key(&key).is_none() {
                return Err(DecodeError::UnknownVariant { key });
            }
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Decode one message from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: JsonValue = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Decode one message from UTF-8 encoded JSON bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let value: JsonValue = serde_json::from_slice(bytes)?;
        Self::from_value(value)
    }

    pub fn surface_update<I>(surface_id: impl Into<SurfaceId>, components: I) -> Self
    where
        I: IntoIterator<Item = ComponentEntry>,
    {
        Message::SurfaceUpdate(SurfaceUpdate {
            surface_id: surface_id.into(),
            components: components.into_iter().collect(),
        })
    }

    pub fn data_model_update<I>(surface_id: impl Into<SurfaceId>, contents: I) -> Self
    where
        I: IntoIterator<Item = ScopeUpdate>,
    {
        Message::DataModelUpdate(DataModelUpdate {
            surface_id: surface_id.into(),
            contents: contents.into_iter().collect(),
        })
    }

    pub fn begin_rendering(surface_id: impl Into<SurfaceId>, root: impl Into<ComponentId>) -> Self {
        Message::BeginRendering(BeginRendering {
            surface_id: surface_id.into(),
            root: root.into(),
        })
    }

    pub fn delete_surface(surface_id: impl Into<SurfaceId>) -> Self {
        Message::DeleteSurface(DeleteSurface {
            surface_id: surface_id.into(),
        })
    }
}

fn json_type_name(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "a boolean",
        JsonValue::Number(_) => "a number",
        JsonValue::String(_) => "a string",
        JsonValue::Array(_) => "an array",
        JsonValue::Object(_) => "an object",
    }
}
