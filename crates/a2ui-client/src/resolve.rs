//! Resolution of bound values against a surface's data model.
//!
//! A bound value resolves to the scalar at its path when that path names a
//! scalar, and to its literal otherwise. Resolution never fails: an
//! unresolvable value is `None` and the renderer shows it as empty.

use crate::data_model::DataModel;
use a2ui_core::types::{ActionContext, BoundValue, ResolvedContextEntry, Scalar};

pub fn resolve<'a>(value: &'a BoundValue, model: &'a DataModel) -> Option<&'a Scalar> {
    value
        .data_path()
        .and_then(|path| model.scalar(path))
        .or(value.literal_value())
}

/// Resolves to display text. Numbers and booleans are rendered as written.
pub fn resolve_string(value: &BoundValue, model: &DataModel) -> Option<String> {
    resolve(value, model).map(Scalar::to_string)
}

/// Resolves to a boolean. Accepts `"true"` and `"false"` strings.
pub fn resolve_bool(value: &BoundValue, model: &DataModel) -> Option<bool> {
    match resolve(value, model)? {
        Scalar::Bool(b) => Some(*b),
        Scalar::String(s) => s.parse().ok(),
        Scalar::Int(_) => None,
    }
}

/// Resolves to an integer. Accepts numeric strings.
pub fn resolve_int(value: &BoundValue, model: &DataModel) -> Option<i64> {
    match resolve(value, model)? {
        Scalar::Int(i) => Some(*i),
        Scalar::String(s) => s.trim().parse().ok(),
        Scalar::Bool(_) => None,
    }
}

/// Resolves every entry of an action context, keeping declared order.
pub fn resolve_context(context: &ActionContext, model: &DataModel) -> Vec<ResolvedContextEntry> {
    context
        .entries()
        .iter()
        .map(|entry| ResolvedContextEntry {
            key: entry.key.clone(),
            value: resolve(&entry.value, model).cloned(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use a2ui_core::types::{Action, ScopeUpdate};

    fn model() -> DataModel {
        let mut model = DataModel::new();
        model.apply(
            ScopeUpdate::new("a")
                .with_value("b", "V")
                .with_value("count", 3)
                .with_value("flag", "true")
                .with_value("digits", "42"),
        );
        model
    }

    #[test]
    fn test_path_wins_over_literal() {
        let value = BoundValue::path("/a/b").with_fallback("L");
        assert_eq!(resolve(&value, &model()), Some(&Scalar::from("V")));
    }

    #[test]
    fn test_literal_is_fallback_for_unresolved_path() {
        let value = BoundValue::path("/a/missing").with_fallback("L");
        assert_eq!(resolve(&value, &model()), Some(&Scalar::from("L")));
        assert_eq!(resolve(&value, &DataModel::new()), Some(&Scalar::from("L")));
    }

    #[test]
    fn test_unresolvable_is_none() {
        assert_eq!(resolve(&BoundValue::path("/a/missing"), &model()), None);
        assert_eq!(resolve(&BoundValue::path("/a"), &model()), None);
    }

    #[test]
    fn test_literal_only() {
        let value = BoundValue::literal("Registration Form");
        assert_eq!(
            resolve_string(&value, &DataModel::new()).as_deref(),
            Some("Registration Form")
        );
    }

    #[test]
    fn test_typed_accessors() {
        let model = model();
        assert_eq!(resolve_string(&BoundValue::path("/a/count"), &model).as_deref(), Some("3"));
        assert_eq!(resolve_int(&BoundValue::path("/a/count"), &model), Some(3));
        assert_eq!(resolve_int(&BoundValue::path("/a/digits"), &model), Some(42));
        assert_eq!(resolve_int(&BoundValue::path("/a/b"), &model), None);
        assert_eq!(resolve_bool(&BoundValue::path("/a/flag"), &model), Some(true));
        assert_eq!(resolve_bool(&BoundValue::literal_scalar(false), &model), Some(false));
        assert_eq!(resolve_bool(&BoundValue::path("/a/count"), &model), None);
    }

    #[test]
    fn test_resolve_context_keeps_order_and_nulls() {
        let action = Action::new("submit")
            .with_context("value", BoundValue::path("/a/b"))
            .with_context("missing", BoundValue::path("/a/nope"))
            .with_context("fixed", BoundValue::literal("x"));

        let resolved = resolve_context(&action.context, &model());
        let keys: Vec<&str> = resolved.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["value", "missing", "fixed"]);
        assert_eq!(resolved[0].value, Some(Scalar::from("V")));
        assert_eq!(resolved[1].value, None);
        assert_eq!(resolved[2].value, Some(Scalar::from("x")));
    }
}
