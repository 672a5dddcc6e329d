use crate::types::action::Action;
use crate::types::ids::ComponentId;
use crate::types::value::BoundValue;
use serde::{Deserialize, Serialize};

/// Variant names of the component catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentKind {
    Text,
    Card,
    Column,
    Row,
    Divider,
    Button,
    TextField,
    CheckBox,
    Image,
    Timeout,
}

impl ComponentKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ComponentKind::Text => "Text",
            ComponentKind::Card => "Card",
            ComponentKind::Column => "Column",
            ComponentKind::Row => "Row",
            ComponentKind::Divider => "Divider",
            ComponentKind::Button => "Button",
            ComponentKind::TextField => "TextField",
            ComponentKind::CheckBox => "CheckBox",
            ComponentKind::Image => "Image",
            ComponentKind::Timeout => "Timeout",
        }
    }
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A component definition.
///
/// On the wire each component is an object with a single key naming the
/// variant, e.g. `{"Text": {"text": {...}, "usageHint": "h2"}}`. Children are
/// referenced by id; the surface owns every definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Component {
    Text(Text),
    Card(Card),
    Column(Flex),
    Row(Flex),
    Divider(Divider),
    Button(Button),
    TextField(TextField),
    CheckBox(CheckBox),
    Image(Image),
    Timeout(Timeout),
}

impl Component {
    pub fn kind(&self) -> ComponentKind {
        match self {
            Component::Text(_) => ComponentKind::Text,
            Component::Card(_) => ComponentKind::Card,
            Component::Column(_) => ComponentKind::Column,
            Component::Row(_) => ComponentKind::Row,
            Component::Divider(_) => ComponentKind::Divider,
            Component::Button(_) => ComponentKind::Button,
            Component::TextField(_) => ComponentKind::TextField,
            Component::CheckBox(_) => ComponentKind::CheckBox,
            Component::Image(_) => ComponentKind::Image,
            Component::Timeout(_) => ComponentKind::Timeout,
        }
    }

    /// Ids of the components this one references, in display order.
    pub fn children(&self) -> Vec<&ComponentId> {
        match self {
            Component::Card(card) => vec![&card.child],
            Component::Column(flex) | Component::Row(flex) => flex.children.iter().collect(),
            Component::Button(button) => vec![&button.child],
            Component::Text(_)
            | Component::Divider(_)
            | Component::TextField(_)
            | Component::CheckBox(_)
            | Component::Image(_)
            | Component::Timeout(_) => Vec::new(),
        }
    }

    /// The action raised when the user activates this component, if any.
    pub fn action(&self) -> Option<&Action> {
        match self {
            Component::Button(button) => button.action.as_ref(),
            _ => None,
        }
    }

    pub fn text(text: BoundValue) -> Self {
        Component::Text(Text::new(text))
    }

    pub fn card(child: impl Into<ComponentId>) -> Self {
        Component::Card(Card {
            child: child.into(),
        })
    }

    pub fn column<I, C>(children: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<ComponentId>,
    {
        Component::Column(Flex::new(children))
    }

    pub fn row<I, C>(children: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<ComponentId>,
    {
        Component::Row(Flex::new(children))
    }

    pub fn divider() -> Self {
        Component::Divider(Divider::default())
    }
}

macro_rules! impl_into_component {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for Component {
                fn from(value: $ty) -> Self {
                    Component::$variant(value)
                }
            }
        )*
    };
}

impl_into_component!(
    Text(Text),
    Card(Card),
    Divider(Divider),
    Button(Button),
    TextField(TextField),
    CheckBox(CheckBox),
    Image(Image),
    Timeout(Timeout),
);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextHint {
    H1,
    H2,
    H3,
    H4,
    H5,
    #[default]
    Body,
    Caption,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Text {
    pub text: BoundValue,
    #[serde(default)]
    pub usage_hint: TextHint,
}

impl Text {
    pub fn new(text: BoundValue) -> Self {
        Self {
            text,
            usage_hint: TextHint::default(),
        }
    }

    pub fn with_usage_hint(mut self, hint: TextHint) -> Self {
        self.usage_hint = hint;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub child: ComponentId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Distribution {
    #[default]
    Start,
    Center,
    End,
    SpaceBetween,
    SpaceEvenly,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Alignment {
    Start,
    Center,
    End,
    #[default]
    Stretch,
}

/// Layout payload shared by `Column` and `Row`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flex {
    pub children: Vec<ComponentId>,
    #[serde(default)]
    pub distribution: Distribution,
    #[serde(default)]
    pub alignment: Alignment,
}

impl Flex {
    pub fn new<I, C>(children: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<ComponentId>,
    {
        Self {
            children: children.into_iter().map(Into::into).collect(),
            distribution: Distribution::default(),
            alignment: Alignment::default(),
        }
    }

    pub fn with_distribution(mut self, distribution: Distribution) -> Self {
        self.distribution = distribution;
        self
    }

    pub fn with_alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    #[default]
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Divider {
    #[serde(default)]
    pub axis: Axis,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    pub child: ComponentId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<Action>,
    #[serde(default)]
    pub primary: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destructive: Option<bool>,
}

impl Button {
    pub fn new(child: impl Into<ComponentId>) -> Self {
        Self {
            child: child.into(),
            action: None,
            primary: false,
            destructive: None,
        }
    }

    pub fn with_action(mut self, action: Action) -> Self {
        self.action = Some(action);
        self
    }

    pub fn primary(mut self) -> Self {
        self.primary = true;
        self
    }

    pub fn destructive(mut self) -> Self {
        self.destructive = Some(true);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TextFieldType {
    #[default]
    ShortText,
    LongText,
    Obscured,
    Number,
    Date,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextField {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<BoundValue>,
    pub text: BoundValue,
    #[serde(default)]
    pub text_field_type: TextFieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation_regexp: Option<String>,
}

impl TextField {
    pub fn new(text: BoundValue) -> Self {
        Self {
            label: None,
            text,
            text_field_type: TextFieldType::default(),
            validation_regexp: None,
        }
    }

    pub fn with_label(mut self, label: BoundValue) -> Self {
        self.label = Some(label);
        self
    }

    pub fn with_type(mut self, text_field_type: TextFieldType) -> Self {
        self.text_field_type = text_field_type;
        self
    }

    pub fn with_validation(mut self, pattern: impl Into<String>) -> Self {
        self.validation_regexp = Some(pattern.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckBox {
    pub label: BoundValue,
    pub checked: BoundValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFit {
    #[default]
    Cover,
    Contain,
    Fill,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageHint {
    Hero,
    Thumbnail,
    Avatar,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub url: BoundValue,
    #[serde(default)]
    pub fit: ImageFit,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_hint: Option<ImageHint>,
}

/// A countdown towards `targetTimeUtc`, shown while a human decision is pending.
///
/// Expiry is advisory: nothing is removed when the deadline passes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timeout {
    pub target_time_utc: BoundValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_hint: Option<String>,
}

/// A component together with its id, as carried by `surfaceUpdate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentEntry {
    pub id: ComponentId,
    pub component: Component,
}

impl ComponentEntry {
    pub fn new(id: impl Into<ComponentId>, component: impl Into<Component>) -> Self {
        Self {
            id: id.into(),
            component: component.into(),
        }
    }
}
