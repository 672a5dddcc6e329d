use crate::data_model::DataModel;
use crate::error::{A2uiClientError, Result};
use crate::resolve::{resolve_bool, resolve_context, resolve_string};
use a2ui_core::types::{
    Alignment, Axis, Component, ComponentEntry, ComponentId, Distribution, ImageFit, ImageHint,
    ScopeUpdate, SurfaceId, TextFieldType, TextHint, UserAction,
};
use log::warn;
use serde::Serialize;
use std::collections::BTreeMap;

/// Deepest render tree [`Surface::resolve_tree`] builds.
pub const MAX_RENDER_DEPTH: usize = 256;

/// Lifecycle state of a surface that exists.
///
/// An absent surface is uninitialized; a deleted one is simply gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceState {
    /// Components or data have arrived, but no valid root yet.
    Populated,
    /// A root was designated; the surface is visible.
    Rendering,
}

/// A child or root id that names no component on the surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DanglingReference {
    /// The referencing component, or `None` for the render root itself.
    pub from: Option<ComponentId>,
    pub missing: ComponentId,
}

/// An independently addressable UI region.
///
/// Holds the component definitions, the data model, and the render state.
/// Surfaces are mutated only by the processor; renderers see them through
/// snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Surface {
    id: SurfaceId,
    components: BTreeMap<ComponentId, Component>,
    data_model: DataModel,
    root_id: Option<ComponentId>,
    is_rendering: bool,
}

impl Surface {
    pub fn new(id: impl Into<SurfaceId>) -> Self {
        Self {
            id: id.into(),
            components: BTreeMap::new(),
            data_model: DataModel::new(),
            root_id: None,
            is_rendering: false,
        }
    }

    pub fn id(&self) -> &SurfaceId {
        &self.id
    }

    pub fn component(&self, id: &str) -> Option<&Component> {
        self.components.get(id)
    }

    pub fn components(&self) -> impl Iterator<Item = (&ComponentId, &Component)> {
        self.components.iter()
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    pub fn data_model(&self) -> &DataModel {
        &self.data_model
    }

    pub fn root_id(&self) -> Option<&ComponentId> {
        self.root_id.as_ref()
    }

    pub fn is_rendering(&self) -> bool {
        self.is_rendering
    }

    pub fn state(&self) -> SurfaceState {
        if self.is_rendering {
            SurfaceState::Rendering
        } else {
            SurfaceState::Populated
        }
    }

    /// Inserts or replaces components. A later entry with the same id wins.
    pub(crate) fn upsert_components(&mut self, entries: Vec<ComponentEntry>) -> Vec<ComponentId> {
        let mut ids = Vec::with_capacity(entries.len());
        for ComponentEntry { id, component } in entries {
            self.components.insert(id.clone(), component);
            if !ids.contains(&id) {
                ids.push(id);
            }
        }
        ids
    }

    /// Replaces each named scope. Returns the scope names in update order.
    pub(crate) fn apply_data(&mut self, contents: Vec<ScopeUpdate>) -> Vec<String> {
        contents
            .into_iter()
            .map(|update| self.data_model.apply(update))
            .collect()
    }

    /// Starts rendering from `root` if it names a known component.
    ///
    /// Returns `false` and leaves the surface untouched otherwise, including
    /// the previous root of a surface that is already rendering.
    pub(crate) fn begin_rendering(&mut self, root: ComponentId) -> bool {
        if !self.components.contains_key(&root) {
            return false;
        }
        self.root_id = Some(root);
        self.is_rendering = true;
        true
    }

    /// Every referenced id that names no component, in component id order.
    pub fn dangling_references(&self) -> Vec<DanglingReference> {
        let mut dangling = Vec::new();
        if let Some(root) = &self.root_id {
            if !self.components.contains_key(root) {
                dangling.push(DanglingReference {
                    from: None,
                    missing: root.clone(),
                });
            }
        }
        for (id, component) in &self.components {
            for child in component.children() {
                if !self.components.contains_key(child) {
                    dangling.push(DanglingReference {
                        from: Some(id.clone()),
                        missing: child.clone(),
                    });
                }
            }
        }
        dangling
    }

    /// Builds the render tree from the root with every bound value resolved.
    ///
    /// Returns `None` until the surface is rendering. Missing children,
    /// components reached again on their own ancestor chain, and anything
    /// nested deeper than [`MAX_RENDER_DEPTH`] become [`ResolvedKind::Missing`]
    /// leaves.
    pub fn resolve_tree(&self) -> Option<ResolvedNode> {
        self.resolve_tree_with_max_depth(MAX_RENDER_DEPTH)
    }

    /// Like [`resolve_tree`](Self::resolve_tree) with a custom depth limit.
    /// The root sits at depth 1.
    pub fn resolve_tree_with_max_depth(&self, max_depth: usize) -> Option<ResolvedNode> {
        if !self.is_rendering {
            return None;
        }
        let root = self.root_id.as_ref()?;
        let mut ancestors = Vec::new();
        Some(self.resolve_node(root, &mut ancestors, max_depth))
    }

    fn resolve_node<'a>(
        &'a self,
        id: &'a ComponentId,
        ancestors: &mut Vec<&'a ComponentId>,
        max_depth: usize,
    ) -> ResolvedNode {
        let Some(component) = self.components.get(id) else {
            return ResolvedNode::missing(id.clone());
        };
        if ancestors.contains(&id) {
            warn!(
                "Surface '{}': component '{}' references itself through its children",
                self.id, id
            );
            return ResolvedNode::missing(id.clone());
        }
        if ancestors.len() >= max_depth {
            warn!(
                "Surface '{}': component '{}' is nested deeper than {max_depth} levels",
                self.id, id
            );
            return ResolvedNode::missing(id.clone());
        }

        ancestors.push(id);
        let children = component
            .children()
            .into_iter()
            .map(|child| self.resolve_node(child, ancestors, max_depth))
            .collect();
        ancestors.pop();

        ResolvedNode {
            id: id.clone(),
            kind: self.resolve_kind(component),
            children,
        }
    }

    fn resolve_kind(&self, component: &Component) -> ResolvedKind {
        let model = &self.data_model;
        match component {
            Component::Text(text) => ResolvedKind::Text {
                text: resolve_string(&text.text, model),
                usage_hint: text.usage_hint,
            },
            Component::Card(_) => ResolvedKind::Card,
            Component::Column(flex) => ResolvedKind::Column {
                distribution: flex.distribution,
                alignment: flex.alignment,
            },
            Component::Row(flex) => ResolvedKind::Row {
                distribution: flex.distribution,
                alignment: flex.alignment,
            },
            Component::Divider(divider) => ResolvedKind::Divider { axis: divider.axis },
            Component::Button(button) => ResolvedKind::Button {
                action: button.action.as_ref().map(|a| a.name.clone()),
                primary: button.primary,
                destructive: button.destructive.unwrap_or(false),
            },
            Component::TextField(field) => ResolvedKind::TextField {
                label: field.label.as_ref().and_then(|l| resolve_string(l, model)),
                text: resolve_string(&field.text, model),
                text_field_type: field.text_field_type,
                validation_regexp: field.validation_regexp.clone(),
            },
            Component::CheckBox(check) => ResolvedKind::CheckBox {
                label: resolve_string(&check.label, model),
                checked: resolve_bool(&check.checked, model),
            },
            Component::Image(image) => ResolvedKind::Image {
                url: resolve_string(&image.url, model),
                fit: image.fit,
                usage_hint: image.usage_hint,
            },
            Component::Timeout(timeout) => ResolvedKind::Timeout {
                target_time_utc: resolve_string(&timeout.target_time_utc, model),
                usage_hint: timeout.usage_hint.clone(),
            },
        }
    }

    /// Builds the user action raised by activating `component_id`.
    ///
    /// The action context is resolved against the current data model.
    pub fn user_action(&self, component_id: &str) -> Result<UserAction> {
        let component =
            self.components
                .get(component_id)
                .ok_or_else(|| A2uiClientError::UnknownComponent {
                    surface_id: self.id.clone(),
                    component_id: component_id.into(),
                })?;
        let action = component
            .action()
            .ok_or_else(|| A2uiClientError::NotActionable {
                component_id: component_id.into(),
                kind: component.kind().to_string(),
            })?;

        let mut user_action = UserAction::new(action.name.clone(), self.id.clone(), component_id);
        user_action.context = resolve_context(&action.context, &self.data_model);
        Ok(user_action)
    }
}

/// A node of a resolved render tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedNode {
    pub id: ComponentId,
    #[serde(flatten)]
    pub kind: ResolvedKind,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ResolvedNode>,
}

impl ResolvedNode {
    fn missing(id: ComponentId) -> Self {
        Self {
            id,
            kind: ResolvedKind::Missing,
            children: Vec::new(),
        }
    }

    /// Depth-first search for a node by id.
    pub fn find(&self, id: &str) -> Option<&ResolvedNode> {
        let mut pending = vec![self];
        while let Some(node) = pending.pop() {
            if node.id == id {
                return Some(node);
            }
            pending.extend(node.children.iter().rev());
        }
        None
    }
}

/// A component with its bound values replaced by what they resolve to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum ResolvedKind {
    Text {
        text: Option<String>,
        usage_hint: TextHint,
    },
    Card,
    Column {
        distribution: Distribution,
        alignment: Alignment,
    },
    Row {
        distribution: Distribution,
        alignment: Alignment,
    },
    Divider {
        axis: Axis,
    },
    Button {
        action: Option<String>,
        primary: bool,
        destructive: bool,
    },
    TextField {
        label: Option<String>,
        text: Option<String>,
        text_field_type: TextFieldType,
        validation_regexp: Option<String>,
    },
    CheckBox {
        label: Option<String>,
        checked: Option<bool>,
    },
    Image {
        url: Option<String>,
        fit: ImageFit,
        usage_hint: Option<ImageHint>,
    },
    Timeout {
        target_time_utc: Option<String>,
        usage_hint: Option<String>,
    },
    /// A referenced component that is not defined, or that closes a cycle.
    Missing,
}

#[cfg(test)]
mod tests {
    use super::*;
    use a2ui_core::types::{Action, BoundValue, Button, Text};
    use assert_matches::assert_matches;

    fn entry(id: &str, component: impl Into<Component>) -> ComponentEntry {
        ComponentEntry::new(id, component)
    }

    #[test]
    fn test_upsert_last_write_wins() {
        let mut surface = Surface::new("main");
        let ids = surface.upsert_components(vec![
            entry("t", Text::new(BoundValue::literal("first"))),
            entry("t", Text::new(BoundValue::literal("second"))),
        ]);
        assert_eq!(ids, vec![ComponentId::from("t")]);
        assert_eq!(surface.component_count(), 1);
        assert_matches!(
            surface.component("t"),
            Some(Component::Text(text)) if text.text == BoundValue::literal("second")
        );
    }

    #[test]
    fn test_begin_rendering_requires_known_root() {
        let mut surface = Surface::new("main");
        assert!(!surface.begin_rendering("root".into()));
        assert_eq!(surface.state(), SurfaceState::Populated);

        surface.upsert_components(vec![entry("root", Component::card("content"))]);
        assert!(surface.begin_rendering("root".into()));
        assert_eq!(surface.state(), SurfaceState::Rendering);
        assert_eq!(surface.root_id().map(ComponentId::as_str), Some("root"));
    }

    #[test]
    fn test_unknown_root_keeps_previous_root() {
        let mut surface = Surface::new("main");
        surface.upsert_components(vec![
            entry("a", Component::divider()),
            entry("b", Component::divider()),
        ]);
        assert!(surface.begin_rendering("a".into()));
        assert!(!surface.begin_rendering("zzz".into()));
        assert_eq!(surface.root_id().map(ComponentId::as_str), Some("a"));
        assert!(surface.begin_rendering("b".into()));
        assert_eq!(surface.root_id().map(ComponentId::as_str), Some("b"));
    }

    #[test]
    fn test_dangling_references() {
        let mut surface = Surface::new("main");
        surface.upsert_components(vec![
            entry("root", Component::column(["title", "ghost"])),
            entry("title", Component::text(BoundValue::literal("Hi"))),
        ]);
        assert_eq!(
            surface.dangling_references(),
            vec![DanglingReference {
                from: Some("root".into()),
                missing: "ghost".into(),
            }]
        );
    }

    #[test]
    fn test_resolve_tree_none_until_rendering() {
        let mut surface = Surface::new("main");
        surface.upsert_components(vec![entry("root", Component::divider())]);
        assert!(surface.resolve_tree().is_none());
    }

    #[test]
    fn test_resolve_tree_with_missing_child_and_data() {
        let mut surface = Surface::new("main");
        surface.upsert_components(vec![
            entry("root", Component::column(["title", "ghost"])),
            entry("title", Component::text(BoundValue::path("/form/name"))),
        ]);
        surface.apply_data(vec![ScopeUpdate::new("form").with_value("name", "John")]);
        surface.begin_rendering("root".into());

        let tree = surface.resolve_tree().unwrap();
        assert_eq!(tree.children.len(), 2);
        assert_eq!(
            tree.children[0].kind,
            ResolvedKind::Text {
                text: Some("John".into()),
                usage_hint: TextHint::Body
            }
        );
        assert_eq!(tree.children[1].kind, ResolvedKind::Missing);
    }

    #[test]
    fn test_resolve_tree_terminates_on_cycle() {
        let mut surface = Surface::new("main");
        surface.upsert_components(vec![
            entry("a", Component::card("b")),
            entry("b", Component::card("a")),
        ]);
        surface.begin_rendering("a".into());

        let tree = surface.resolve_tree().unwrap();
        let b = &tree.children[0];
        assert_eq!(b.id, "b");
        assert_eq!(b.children[0].id, "a");
        assert_eq!(b.children[0].kind, ResolvedKind::Missing);
    }

    fn card_chain(len: usize) -> Surface {
        let mut surface = Surface::new("main");
        surface.upsert_components(
            (0..len)
                .map(|i| {
                    let id = format!("c{i}");
                    if i + 1 < len {
                        entry(&id, Component::card(format!("c{}", i + 1)))
                    } else {
                        entry(&id, Component::divider())
                    }
                })
                .collect(),
        );
        surface.begin_rendering("c0".into());
        surface
    }

    #[test]
    fn test_resolve_tree_caps_deep_chains() {
        let surface = card_chain(5000);

        let tree = surface.resolve_tree().unwrap();
        let mut node = &tree;
        let mut levels = 1;
        while let Some(child) = node.children.first() {
            node = child;
            levels += 1;
        }
        assert_eq!(levels, MAX_RENDER_DEPTH + 1);
        assert_eq!(node.id.as_str(), format!("c{MAX_RENDER_DEPTH}"));
        assert_eq!(node.kind, ResolvedKind::Missing);
        assert_eq!(
            tree.find(&format!("c{}", MAX_RENDER_DEPTH - 1)).unwrap().kind,
            ResolvedKind::Card
        );
        assert!(tree.find("c4999").is_none());
    }

    #[test]
    fn test_custom_depth_limit_serializes() {
        let surface = card_chain(100);
        let tree = surface.resolve_tree_with_max_depth(3).unwrap();
        let json = serde_json::to_value(&tree).unwrap();
        assert_eq!(json["children"][0]["children"][0]["id"], "c2");
        assert_eq!(json["children"][0]["children"][0]["children"][0]["type"], "Missing");

        let full = surface.resolve_tree_with_max_depth(100).unwrap();
        assert_eq!(
            full.find("c99").unwrap().kind,
            ResolvedKind::Divider {
                axis: Axis::default()
            }
        );
    }

    #[test]
    fn test_user_action_resolves_context() {
        let mut surface = Surface::new("main");
        surface.upsert_components(vec![
            entry(
                "submit",
                Button::new("submit-text").with_action(
                    Action::new("form_submit").with_context("name", BoundValue::path("/form/name")),
                ),
            ),
            entry("submit-text", Component::text(BoundValue::literal("Submit"))),
        ]);
        surface.apply_data(vec![ScopeUpdate::new("form").with_value("name", "Ann")]);

        let action = surface.user_action("submit").unwrap();
        assert_eq!(action.name, "form_submit");
        assert_eq!(action.source_component_id, "submit");
        assert_eq!(action.context_value("name").and_then(|s| s.as_str()), Some("Ann"));

        assert_matches!(
            surface.user_action("submit-text"),
            Err(A2uiClientError::NotActionable { .. })
        );
        assert_matches!(
            surface.user_action("nope"),
            Err(A2uiClientError::UnknownComponent { .. })
        );
    }
}
