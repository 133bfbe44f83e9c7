//! Element snapshot types: handle, bounding box, attributes, events.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Opaque, non-owning reference to an element in the live page.
///
/// The handle is only meaningful to the backend that issued it, and may
/// point at an element that has since been removed from the document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementHandle(String);

impl ElementHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Bounding box for an element, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Whether the element occupies any rendered area.
    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Get the center point of this bounding box.
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }
}

/// Node attributes read from the DOM.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct NodeAttributes {
    /// Element ID attribute.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Element class names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Type attribute.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub r#type: Option<String>,
    /// Role attribute (ARIA).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(rename = "aria-label", skip_serializing_if = "Option::is_none")]
    pub aria_label: Option<String>,
    /// Link relation, e.g. `next` on pagination anchors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rel: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    /// Value attribute for inputs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// `data-*` attributes, keyed without the prefix.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub data: HashMap<String, String>,
}

impl NodeAttributes {
    /// Build from raw `(name, value)` pairs as reported by a DOM.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut attrs = Self::default();
        for (name, value) in pairs {
            attrs.set(name.as_ref(), value.into());
        }
        attrs
    }

    /// Set an attribute by its DOM name. Unknown attributes are ignored.
    pub fn set(&mut self, name: &str, value: String) {
        let name = name.to_ascii_lowercase();
        let slot = match name.as_str() {
            "id" => &mut self.id,
            "class" => &mut self.class,
            "name" => &mut self.name,
            "type" => &mut self.r#type,
            "role" => &mut self.role,
            "placeholder" => &mut self.placeholder,
            "aria-label" => &mut self.aria_label,
            "rel" => &mut self.rel,
            "title" => &mut self.title,
            "href" => &mut self.href,
            "value" => &mut self.value,
            other => {
                if let Some(key) = other.strip_prefix("data-") {
                    self.data.insert(key.to_string(), value);
                }
                return;
            }
        };
        *slot = Some(value);
    }

    /// Look up an attribute by its DOM name.
    pub fn get(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        match name.as_str() {
            "id" => self.id.as_deref(),
            "class" => self.class.as_deref(),
            "name" => self.name.as_deref(),
            "type" => self.r#type.as_deref(),
            "role" => self.role.as_deref(),
            "placeholder" => self.placeholder.as_deref(),
            "aria-label" => self.aria_label.as_deref(),
            "rel" => self.rel.as_deref(),
            "title" => self.title.as_deref(),
            "href" => self.href.as_deref(),
            "value" => self.value.as_deref(),
            other => other
                .strip_prefix("data-")
                .and_then(|key| self.data.get(key))
                .map(String::as_str),
        }
    }

    /// Whether the class list contains `class_name`.
    pub fn has_class(&self, class_name: &str) -> bool {
        self.class
            .as_deref()
            .map(|c| c.split_whitespace().any(|part| part == class_name))
            .unwrap_or(false)
    }
}

/// Read-only snapshot of an element taken during a page query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementSnapshot {
    pub handle: ElementHandle,
    /// Backend identity of the underlying node. Unlike some handles it is
    /// the same for every query that returns the node.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_id: Option<String>,
    /// Tag name (lowercase).
    pub tag_name: String,
    pub attributes: NodeAttributes,
    /// Text content, whitespace-collapsed and trimmed.
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub bounding_box: BoundingBox,
    /// Whether the element was connected to the document when queried.
    pub attached: bool,
}

impl ElementSnapshot {
    /// Key that identifies the node across queries: the backend node id,
    /// else the handle.
    pub fn identity(&self) -> &str {
        self.node_id.as_deref().unwrap_or(self.handle.as_str())
    }

    /// Visible means attached with a non-zero rendered box.
    pub fn is_visible(&self) -> bool {
        self.attached && self.bounding_box.has_area()
    }

    /// Whether the element accepts typed text.
    pub fn accepts_text(&self) -> bool {
        match self.tag_name.as_str() {
            "textarea" => true,
            "input" => !matches!(
                self.attributes.r#type.as_deref(),
                Some("button" | "submit" | "reset" | "checkbox" | "radio" | "file" | "image" | "hidden")
            ),
            _ => false,
        }
    }

    /// Short human-readable description used in logs and CLI output.
    pub fn describe(&self) -> String {
        let mut parts = vec![format!("<{}>", self.tag_name)];
        if let Some(ref id) = self.attributes.id {
            parts.push(format!("id={}", id));
        }
        if let Some(ref name) = self.attributes.name {
            parts.push(format!("name={}", name));
        }
        if let Some(ref aria_label) = self.attributes.aria_label {
            parts.push(format!("aria-label=\"{}\"", aria_label));
        }
        if !self.text.is_empty() {
            let text: String = self.text.chars().take(40).collect();
            parts.push(format!("\"{}\"", text));
        }
        parts.join(" ")
    }
}

/// Synthetic events the executor is allowed to dispatch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "key", rename_all = "lowercase")]
pub enum DomEvent {
    Input,
    Change,
    KeyDown(String),
    KeyPress(String),
    KeyUp(String),
}

impl DomEvent {
    /// The DOM event type name.
    pub fn event_type(&self) -> &'static str {
        match self {
            DomEvent::Input => "input",
            DomEvent::Change => "change",
            DomEvent::KeyDown(_) => "keydown",
            DomEvent::KeyPress(_) => "keypress",
            DomEvent::KeyUp(_) => "keyup",
        }
    }

    /// The key for keyboard events.
    pub fn key(&self) -> Option<&str> {
        match self {
            DomEvent::KeyDown(key) | DomEvent::KeyPress(key) | DomEvent::KeyUp(key) => Some(key),
            _ => None,
        }
    }

    /// Full keydown/keypress/keyup sequence for one key.
    pub fn key_sequence(key: &str) -> [DomEvent; 3] {
        [
            DomEvent::KeyDown(key.to_string()),
            DomEvent::KeyPress(key.to_string()),
            DomEvent::KeyUp(key.to_string()),
        ]
    }
}
