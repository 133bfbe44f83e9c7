//! Discovered interactive controls.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dom::{ElementHandle, ElementSnapshot};
use crate::intent::NavDirection;

/// The role a discovered control is believed to play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ControlKind {
    SearchInput,
    FilterControl,
    NavControl,
}

impl fmt::Display for ControlKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlKind::SearchInput => write!(f, "search input"),
            ControlKind::FilterControl => write!(f, "filter control"),
            ControlKind::NavControl => write!(f, "navigation control"),
        }
    }
}

/// An element believed to support executing an intent.
///
/// Planning code only sees the captured snapshot; the live element is
/// reachable solely through [`Control::handle`], which the executor
/// re-validates before acting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Control {
    element: ElementSnapshot,
    kind: ControlKind,
    selector_used: String,
    rank_score: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    direction: Option<NavDirection>,
}

impl Control {
    pub fn new(
        element: ElementSnapshot,
        kind: ControlKind,
        selector_used: impl Into<String>,
        rank_score: f64,
    ) -> Self {
        Self {
            element,
            kind,
            selector_used: selector_used.into(),
            rank_score,
            direction: None,
        }
    }

    /// Tag a navigation control with the direction it moves in.
    pub fn with_direction(mut self, direction: NavDirection) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn handle(&self) -> &ElementHandle {
        &self.element.handle
    }

    pub fn kind(&self) -> ControlKind {
        self.kind
    }

    pub fn selector_used(&self) -> &str {
        &self.selector_used
    }

    pub fn rank_score(&self) -> f64 {
        self.rank_score
    }

    pub fn direction(&self) -> Option<NavDirection> {
        self.direction
    }

    pub fn tag_name(&self) -> &str {
        &self.element.tag_name
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.element.attributes.get(name)
    }

    pub fn text(&self) -> &str {
        &self.element.text
    }

    /// Whether the control accepts typed text.
    pub fn accepts_text(&self) -> bool {
        self.element.accepts_text()
    }

    pub fn describe(&self) -> String {
        self.element.describe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{BoundingBox, NodeAttributes};

    fn element() -> ElementSnapshot {
        ElementSnapshot {
            handle: ElementHandle::new("n4"),
            node_id: None,
            tag_name: "a".to_string(),
            attributes: NodeAttributes::from_pairs([("rel", "next"), ("href", "?page=2")]),
            text: "Next".to_string(),
            bounding_box: BoundingBox::new(0.0, 0.0, 40.0, 20.0),
            attached: true,
        }
    }

    #[test]
    fn test_control_accessors() {
        let control = Control::new(element(), ControlKind::NavControl, "a[rel=\"next\"]", 1.0)
            .with_direction(NavDirection::Next);
        assert_eq!(control.handle().as_str(), "n4");
        assert_eq!(control.kind(), ControlKind::NavControl);
        assert_eq!(control.selector_used(), "a[rel=\"next\"]");
        assert_eq!(control.direction(), Some(NavDirection::Next));
        assert_eq!(control.attribute("rel"), Some("next"));
        assert_eq!(control.text(), "Next");
        assert!(!control.accepts_text());
    }

    #[test]
    fn test_control_serializes_camel_case() {
        let control = Control::new(element(), ControlKind::NavControl, "a", 0.5);
        let json = serde_json::to_value(&control).unwrap();
        assert_eq!(json["kind"], "navControl");
        assert_eq!(json["selectorUsed"], "a");
        assert_eq!(json["rankScore"], 0.5);
        assert!(json.get("direction").is_none());
    }
}
