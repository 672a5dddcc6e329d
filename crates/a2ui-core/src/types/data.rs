use crate::error::DecodeError;
use crate::types::value::Scalar;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A named scope of a data model: keys mapped to scalars or nested scopes.
pub type Scope = BTreeMap<String, DataValue>;

/// A data model entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataValue {
    Scalar(Scalar),
    Scope(Scope),
}

impl DataValue {
    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            DataValue::Scalar(s) => Some(s),
            DataValue::Scope(_) => None,
        }
    }

    pub fn as_scope(&self) -> Option<&Scope> {
        match self {
            DataValue::Scope(scope) => Some(scope),
            DataValue::Scalar(_) => None,
        }
    }
}

macro_rules! impl_from_scalar {
    ($($t:ty),*) => {
        $(
            impl From<$t> for DataValue {
                fn from(value: $t) -> Self {
                    DataValue::Scalar(value.into())
                }
            }
        )*
    };
}

impl_from_scalar!(Scalar, &str, String, i64, bool);

/// One `{key, valueMap}` element of a `dataModelUpdate`.
///
/// Applying it replaces the whole top-level scope named by `key`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScopeUpdate {
    pub key: String,
    #[serde(rename = "valueMap")]
    pub value_map: Vec<ValueEntry>,
}

impl ScopeUpdate {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value_map: Vec::new(),
        }
    }

    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.value_map.push(ValueEntry {
            key: key.into(),
            value: DataValue::Scalar(value.into()),
        });
        self
    }

    pub fn with_scope(mut self, key: impl Into<String>, scope: Scope) -> Self {
        self.value_map.push(ValueEntry {
            key: key.into(),
            value: DataValue::Scope(scope),
        });
        self
    }

    /// Collapses the value map into a scope. A key repeated within the map
    /// keeps its last value.
    pub fn into_scope(self) -> Scope {
        self.value_map
            .into_iter()
            .map(|entry| (entry.key, entry.value))
            .collect()
    }
}

/// One `{key, valueString | valueInt | valueBool | valueMap}` element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawValueEntry", into = "RawValueEntry")]
pub struct ValueEntry {
    pub key: String,
    pub value: DataValue,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawValueEntry {
    key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value_string: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value_int: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value_bool: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value_map: Option<Vec<ValueEntry>>,
}

impl TryFrom<RawValueEntry> for ValueEntry {
    type Error = DecodeError;

    fn try_from(raw: RawValueEntry) -> Result<Self, Self::Error> {
        let candidates = [
            raw.value_string.map(|s| DataValue::Scalar(Scalar::String(s))),
            raw.value_int.map(|i| DataValue::Scalar(Scalar::Int(i))),
            raw.value_bool.map(|b| DataValue::Scalar(Scalar::Bool(b))),
            raw.value_map.map(|entries| {
                DataValue::Scope(entries.into_iter().map(|e| (e.key, e.value)).collect())
            }),
        ];
        let mut present = candidates.into_iter().flatten();
        let Some(value) = present.next() else {
            return Err(DecodeError::invalid(
                "valueMap",
                format!("entry '{}' carries no value", raw.key),
            ));
        };
        if present.next().is_some() {
            return Err(DecodeError::invalid(
                "valueMap",
                format!("entry '{}' carries more than one value", raw.key),
            ));
        }
        Ok(Self {
            key: raw.key,
            value,
        })
    }
}

impl From<ValueEntry> for RawValueEntry {
    fn from(entry: ValueEntry) -> Self {
        let mut raw = RawValueEntry {
            key: entry.key,
            value_string: None,
            value_int: None,
            value_bool: None,
            value_map: None,
        };
        match entry.value {
            DataValue::Scalar(Scalar::String(s)) => raw.value_string = Some(s),
            DataValue::Scalar(Scalar::Int(i)) => raw.value_int = Some(i),
            DataValue::Scalar(Scalar::Bool(b)) => raw.value_bool = Some(b),
            DataValue::Scope(scope) => {
                raw.value_map = Some(
                    scope
                        .into_iter()
                        .map(|(key, value)| ValueEntry { key, value })
                        .collect(),
                );
            }
        }
        raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_value_map() {
        let update: ScopeUpdate = serde_json::from_value(json!({
            "key": "form",
            "valueMap": [
                {"key": "name", "valueString": "John Doe"},
                {"key": "age", "valueInt": 25},
                {"key": "newsletter", "valueBool": true}
            ]
        }))
        .unwrap();

        let scope = update.into_scope();
        assert_eq!(scope["name"], DataValue::from("John Doe"));
        assert_eq!(scope["age"], DataValue::from(25));
        assert_eq!(scope["newsletter"], DataValue::from(true));
    }

    #[test]
    fn test_decode_nested_value_map() {
        let entry: ValueEntry = serde_json::from_value(json!({
            "key": "address",
            "valueMap": [{"key": "city", "valueString": "Jakarta"}]
        }))
        .unwrap();

        let scope = entry.value.as_scope().expect("nested scope");
        assert_eq!(scope["city"], DataValue::from("Jakarta"));
    }

    #[test]
    fn test_entry_without_value_is_rejected() {
        let err = serde_json::from_value::<ValueEntry>(json!({"key": "age"})).unwrap_err();
        assert!(err.to_string().contains("entry 'age' carries no value"));
    }

    #[test]
    fn test_entry_with_two_values_is_rejected() {
        let err = serde_json::from_value::<ValueEntry>(
            json!({"key": "age", "valueInt": 3, "valueString": "3"}),
        )
        .unwrap_err();
        assert!(err.to_string().contains("more than one value"));
    }

    #[test]
    fn test_repeated_key_keeps_last_value() {
        let scope = ScopeUpdate::new("s")
            .with_value("k", "first")
            .with_value("k", "second")
            .into_scope();
        assert_eq!(scope.len(), 1);
        assert_eq!(scope["k"], DataValue::from("second"));
    }

    #[test]
    fn test_serialize_uses_wire_field_names() {
        let update = ScopeUpdate::new("form").with_value("age", 30);
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            json!({"key": "form", "valueMap": [{"key": "age", "valueInt": 30}]})
        );
    }
}
