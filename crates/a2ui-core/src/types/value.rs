use crate::error::DecodeError;
use serde::{Deserialize, Serialize};

/// A leaf value held by a data model or given as a literal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Bool(bool),
    Int(i64),
    String(String),
}

impl Scalar {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Scalar::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Scalar::Int(i) => Some(*i),
            _ => None,
        }
    }
}

/// Renders the scalar the way a text component displays it.
impl std::fmt::Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Int(i) => write!(f, "{i}"),
            Scalar::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::String(s.to_owned())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::String(s)
    }
}

impl From<i64> for Scalar {
    fn from(i: i64) -> Self {
        Scalar::Int(i)
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

/// A slash-delimited reference into a surface's data model, e.g. `/form/name`.
///
/// The first segment names a top-level scope, the remaining segments walk
/// nested scopes down to a key. The leading slash is optional.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataPath(String);

impl DataPath {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Splits the path into segments.
    ///
    /// Returns `None` for paths that can never name a value: the empty path,
    /// the bare root `/`, and paths with empty segments such as `/a//b`.
    pub fn segments(&self) -> Option<Vec<&str>> {
        let trimmed = self.0.strip_prefix('/').unwrap_or(&self.0);
        if trimmed.is_empty() {
            return None;
        }
        let segments: Vec<&str> = trimmed.split('/').collect();
        if segments.iter().any(|s| s.is_empty()) {
            return None;
        }
        Some(segments)
    }
}

impl From<&str> for DataPath {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl std::fmt::Display for DataPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A component field that is either a literal, a data-model lookup, or both.
///
/// When both are present the path takes precedence and the literal is the
/// fallback used while the path does not resolve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawBoundValue", into = "RawBoundValue")]
pub struct BoundValue {
    literal: Option<Scalar>,
    path: Option<DataPath>,
}

impl BoundValue {
    /// A literal string value.
    pub fn literal(value: impl Into<String>) -> Self {
        Self {
            literal: Some(Scalar::String(value.into())),
            path: None,
        }
    }

    /// A literal of any scalar kind.
    pub fn literal_scalar(value: impl Into<Scalar>) -> Self {
        Self {
            literal: Some(value.into()),
            path: None,
        }
    }

    /// A data-model lookup.
    pub fn path(path: impl Into<String>) -> Self {
        Self {
            literal: None,
            path: Some(DataPath::new(path)),
        }
    }

    /// Adds a literal fallback to a path lookup.
    pub fn with_fallback(mut self, value: impl Into<Scalar>) -> Self {
        self.literal = Some(value.into());
        self
    }

    pub fn literal_value(&self) -> Option<&Scalar> {
        self.literal.as_ref()
    }

    pub fn data_path(&self) -> Option<&DataPath> {
        self.path.as_ref()
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBoundValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    literal_string: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    literal_number: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    literal_boolean: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    path: Option<DataPath>,
}

impl TryFrom<RawBoundValue> for BoundValue {
    type Error = DecodeError;

    fn try_from(raw: RawBoundValue) -> Result<Self, Self::Error> {
        let literals = [
            raw.literal_string.map(Scalar::String),
            raw.literal_number.map(Scalar::Int),
            raw.literal_boolean.map(Scalar::Bool),
        ];
        let mut present = literals.into_iter().flatten();
        let literal = present.next();
        if present.next().is_some() {
            return Err(DecodeError::invalid(
                "bound value",
                "more than one literal kind is present",
            ));
        }
        if literal.is_none() && raw.path.is_none() {
            return Err(DecodeError::invalid(
                "bound value",
                "neither a literal nor a path is present",
            ));
        }
        Ok(Self {
            literal,
            path: raw.path,
        })
    }
}

impl From<BoundValue> for RawBoundValue {
    fn from(value: BoundValue) -> Self {
        let mut raw = RawBoundValue {
            literal_string: None,
            literal_number: None,
            literal_boolean: None,
            path: value.path,
        };
        match value.literal {
            Some(Scalar::String(s)) => raw.literal_string = Some(s),
            Some(Scalar::Int(i)) => raw.literal_number = Some(i),
            Some(Scalar::Bool(b)) => raw.literal_boolean = Some(b),
            None => {}
        }
        raw
    }
}
