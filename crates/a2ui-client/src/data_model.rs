use a2ui_core::types::{DataPath, DataValue, Scalar, Scope, ScopeUpdate};
use serde::Serialize;
use std::collections::BTreeMap;

/// Per-surface store of named top-level scopes.
///
/// Scopes are only ever replaced wholesale; there is no partial merge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DataModel {
    scopes: BTreeMap<String, Scope>,
}

impl DataModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the scope named by `update.key`, returning that name.
    pub fn apply(&mut self, update: ScopeUpdate) -> String {
        let key = update.key.clone();
        self.scopes.insert(key.clone(), update.into_scope());
        key
    }

    pub fn replace_scope(&mut self, key: impl Into<String>, scope: Scope) {
        self.scopes.insert(key.into(), scope);
    }

    pub fn scope(&self, key: &str) -> Option<&Scope> {
        self.scopes.get(key)
    }

    pub fn scope_names(&self) -> impl Iterator<Item = &str> {
        self.scopes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Walks `path` down through nested scopes.
    ///
    /// A path with a single segment names a whole top-level scope, which is
    /// returned as `None` here since it is not a [`DataValue`] entry.
    pub fn lookup(&self, path: &DataPath) -> Option<&DataValue> {
        let segments = path.segments()?;
        let (scope_name, rest) = segments.split_first()?;
        let (last, middle) = rest.split_last()?;

        let mut scope = self.scopes.get(*scope_name)?;
        for segment in middle {
            scope = scope.get(*segment)?.as_scope()?;
        }
        scope.get(*last)
    }

    /// Like [`lookup`](Self::lookup), but only succeeds on a scalar leaf.
    pub fn scalar(&self, path: &DataPath) -> Option<&Scalar> {
        self.lookup(path)?.as_scalar()
    }
}
