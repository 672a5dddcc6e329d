use crate::types::value::BoundValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An action attached to a Button, sent back to the agent when triggered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub name: String,
    #[serde(default)]
    pub context: ActionContext,
}

impl Action {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            context: ActionContext::default(),
        }
    }

    pub fn with_context(mut self, key: impl Into<String>, value: BoundValue) -> Self {
        self.context.push(key, value);
        self
    }
}

/// One `{key, value}` pair of an action context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextEntry {
    pub key: String,
    pub value: BoundValue,
}

/// Ordered key/value context of an action.
///
/// Agents send it either as a mapping or as a list of `{key, value}` pairs.
/// Both decode into this ordered list; entries of the mapping form come out
/// sorted by key. It always serializes as the list form.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "RawActionContext", into = "Vec<ContextEntry>")]
pub struct ActionContext(Vec<ContextEntry>);

impl ActionContext {
    pub fn push(&mut self, key: impl Into<String>, value: BoundValue) {
        self.0.push(ContextEntry {
            key: key.into(),
            value,
        });
    }

    pub fn entries(&self) -> &[ContextEntry] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawActionContext {
    List(Vec<ContextEntry>),
    Map(BTreeMap<String, BoundValue>),
}

impl From<RawActionContext> for ActionContext {
    fn from(raw: RawActionContext) -> Self {
        match raw {
            RawActionContext::List(entries) => Self(entries),
            RawActionContext::Map(map) => Self(
                map.into_iter()
                    .map(|(key, value)| ContextEntry { key, value })
                    .collect(),
            ),
        }
    }
}

impl From<ActionContext> for Vec<ContextEntry> {
    fn from(context: ActionContext) -> Self {
        context.0
    }
}
