//! In-memory page implementing [`PageDom`].

use std::path::Path;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::debug;

use pagevoice_protocols::{
    BoundingBox, DomError, DomEvent, ElementHandle, ElementSnapshot, NodeAttributes, PageDom,
};

use crate::error::SnapshotError;
use crate::selector::{MatchTarget, SelectorList};
use crate::spec::{NodeSpec, PageSpec};

const ROOT: usize = 0;
const ROW_HEIGHT: f64 = 32.0;

/// A write performed through the page boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    SetValue { element: ElementHandle, value: String },
    Event { element: ElementHandle, event: DomEvent },
    Click { element: ElementHandle },
    Submit { form: ElementHandle },
    Scroll { element: ElementHandle },
}

struct Node {
    tag: String,
    attrs: Vec<(String, String)>,
    text: String,
    children: Vec<usize>,
    parent: Option<usize>,
    bounding_box: BoundingBox,
    value: Option<String>,
}

#[derive(Default)]
struct DocumentState {
    nodes: Vec<Node>,
    mutations: Vec<Mutation>,
    next_row: usize,
}

/// Snapshot-backed page.
///
/// Element handles have the form `node-<index>`; detached nodes keep their
/// index, so stale handles stay resolvable and report `attached = false`.
pub struct SnapshotPage {
    url: String,
    title: String,
    state: Mutex<DocumentState>,
}

impl SnapshotPage {
    pub fn from_spec(spec: PageSpec) -> Self {
        let mut state = DocumentState::default();
        state.nodes.push(Node {
            tag: "body".to_string(),
            attrs: Vec::new(),
            text: String::new(),
            children: Vec::new(),
            parent: None,
            bounding_box: BoundingBox::new(0.0, 0.0, 1280.0, 720.0),
            value: None,
        });
        for node in spec.body {
            state.insert(ROOT, node);
        }
        debug!("Loaded snapshot page {} ({} nodes)", spec.url, state.nodes.len());
        Self {
            url: spec.url,
            title: spec.title,
            state: Mutex::new(state),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let spec: PageSpec = serde_json::from_str(json)?;
        if spec.body.iter().any(has_empty_tag) {
            return Err(SnapshotError::Invalid("empty tag name".to_string()));
        }
        Ok(Self::from_spec(spec))
    }

    pub fn load(path: &Path) -> Result<Self, SnapshotError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Every write performed so far, oldest first.
    pub fn mutations(&self) -> Vec<Mutation> {
        self.state.lock().mutations.clone()
    }

    pub fn clear_mutations(&self) {
        self.state.lock().mutations.clear();
    }

    /// Current `value` property of an element.
    pub fn value_of(&self, element: &ElementHandle) -> Option<String> {
        let state = self.state.lock();
        let index = parse_handle(element)?;
        state.nodes.get(index).and_then(|n| n.value.clone())
    }

    /// First element, in document order, whose `id` attribute equals `id`.
    pub fn find_by_id(&self, id: &str) -> Option<ElementHandle> {
        let state = self.state.lock();
        state
            .preorder()
            .into_iter()
            .find(|&i| state.attr(i, "id") == Some(id))
            .map(handle_for)
    }

    /// Remove an element (and its subtree) from the document, as a
    /// re-render would. Returns `false` if it was already detached.
    pub fn detach(&self, element: &ElementHandle) -> bool {
        let mut state = self.state.lock();
        let Some(index) = parse_handle(element).filter(|&i| i != ROOT && i < state.nodes.len())
        else {
            return false;
        };
        let Some(parent) = state.nodes[index].parent.take() else {
            return false;
        };
        state.nodes[parent].children.retain(|&c| c != index);
        debug!("Detached {}", element);
        true
    }

    /// Append a new subtree under `parent` (or `<body>`).
    pub fn append(&self, parent: Option<&ElementHandle>, node: NodeSpec) -> Option<ElementHandle> {
        let mut state = self.state.lock();
        let parent = match parent {
            Some(handle) => parse_handle(handle).filter(|&i| state.is_connected(i))?,
            None => ROOT,
        };
        Some(handle_for(state.insert(parent, node)))
    }

    fn with_live<T>(
        &self,
        element: &ElementHandle,
        f: impl FnOnce(&mut DocumentState, usize) -> T,
    ) -> Result<T, DomError> {
        let mut state = self.state.lock();
        match parse_handle(element) {
            Some(index) if state.is_connected(index) => Ok(f(&mut *state, index)),
            _ => Err(DomError::StaleElement(element.to_string())),
        }
    }
}

fn has_empty_tag(node: &NodeSpec) -> bool {
    node.tag.trim().is_empty() || node.children.iter().any(has_empty_tag)
}

fn handle_for(index: usize) -> ElementHandle {
    ElementHandle::new(format!("node-{}", index))
}

fn parse_handle(handle: &ElementHandle) -> Option<usize> {
    handle.as_str().strip_prefix("node-")?.parse().ok()
}

impl DocumentState {
    fn insert(&mut self, parent: usize, spec: NodeSpec) -> usize {
        let bounding_box = if spec.hidden {
            BoundingBox::default()
        } else {
            spec.bounding_box.unwrap_or_else(|| {
                let row = self.next_row;
                self.next_row += 1;
                BoundingBox::new(0.0, row as f64 * ROW_HEIGHT, 240.0, ROW_HEIGHT - 4.0)
            })
        };
        let index = self.nodes.len();
        self.nodes.push(Node {
            tag: spec.tag.to_ascii_lowercase(),
            attrs: spec.attrs.into_iter().collect(),
            text: spec.text,
            children: Vec::new(),
            parent: Some(parent),
            bounding_box,
            value: None,
        });
        self.nodes[parent].children.push(index);
        for child in spec.children {
            self.insert(index, child);
        }
        index
    }

    fn attr(&self, index: usize, name: &str) -> Option<&str> {
        self.nodes[index]
            .attrs
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    fn is_connected(&self, index: usize) -> bool {
        let mut current = index;
        loop {
            if current == ROOT {
                return true;
            }
            match self.nodes.get(current).and_then(|n| n.parent) {
                Some(parent) => current = parent,
                None => return false,
            }
        }
    }

    /// Connected nodes in document order, root first.
    fn preorder(&self) -> Vec<usize> {
        self.subtree(ROOT)
    }

    fn subtree(&self, start: usize) -> Vec<usize> {
        let mut order = Vec::new();
        let mut stack = vec![start];
        while let Some(index) = stack.pop() {
            order.push(index);
            stack.extend(self.nodes[index].children.iter().rev());
        }
        order
    }

    fn text_content(&self, index: usize) -> String {
        let parts: Vec<&str> = self
            .subtree(index)
            .into_iter()
            .map(|i| self.nodes[i].text.as_str())
            .collect();
        parts.join(" ").split_whitespace().collect::<Vec<_>>().join(" ")
    }

    fn snapshot(&self, index: usize) -> ElementSnapshot {
        let node = &self.nodes[index];
        let mut attributes =
            NodeAttributes::from_pairs(node.attrs.iter().map(|(n, v)| (n.as_str(), v.clone())));
        if let Some(ref value) = node.value {
            attributes.value = Some(value.clone());
        }
        ElementSnapshot {
            handle: handle_for(index),
            node_id: Some(index.to_string()),
            tag_name: node.tag.clone(),
            attributes,
            text: self.text_content(index),
            bounding_box: node.bounding_box,
            attached: self.is_connected(index),
        }
    }

    fn enclosing_form(&self, index: usize) -> Option<usize> {
        let mut current = self.nodes[index].parent;
        while let Some(i) = current {
            if self.nodes[i].tag == "form" {
                return Some(i);
            }
            current = self.nodes[i].parent;
        }
        None
    }

    fn is_visible(&self, index: usize) -> bool {
        self.is_connected(index) && self.nodes[index].bounding_box.has_area()
    }

    fn is_submit_control(&self, index: usize) -> bool {
        let ty = self.attr(index, "type").map(str::to_ascii_lowercase);
        match self.nodes[index].tag.as_str() {
            "button" => matches!(ty.as_deref(), None | Some("submit")),
            "input" => matches!(ty.as_deref(), Some("submit" | "image")),
            _ => false,
        }
    }

    fn is_submit_labelled(&self, index: usize) -> bool {
        let tag = self.nodes[index].tag.as_str();
        let clickable = matches!(tag, "button" | "input")
            || self.attr(index, "role") == Some("button");
        if !clickable {
            return false;
        }
        let label = [
            Some(self.text_content(index)),
            self.attr(index, "aria-label").map(str::to_string),
            self.attr(index, "value").map(str::to_string),
            self.attr(index, "title").map(str::to_string),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
        label
            .split(|c: char| !c.is_alphanumeric())
            .any(|word| matches!(word, "search" | "submit" | "go" | "find"))
    }
}

#[derive(Clone, Copy)]
struct NodeRef<'a> {
    state: &'a DocumentState,
    index: usize,
}

impl MatchTarget for NodeRef<'_> {
    fn tag_name(&self) -> &str {
        &self.state.nodes[self.index].tag
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.state.attr(self.index, name)
    }

    fn parent(&self) -> Option<Self> {
        self.state.nodes[self.index].parent.map(|index| NodeRef {
            state: self.state,
            index,
        })
    }
}

#[async_trait]
impl PageDom for SnapshotPage {
    async fn url(&self) -> Result<String, DomError> {
        Ok(self.url.clone())
    }

    async fn query_all(&self, selector: &str) -> Result<Vec<ElementSnapshot>, DomError> {
        let list = SelectorList::parse(selector)
            .map_err(|e| DomError::invalid_selector(selector, e.to_string()))?;
        let state = self.state.lock();
        Ok(state
            .preorder()
            .into_iter()
            .filter(|&index| list.matches(&NodeRef { state: &*state, index }))
            .map(|index| state.snapshot(index))
            .collect())
    }

    async fn is_attached(&self, element: &ElementHandle) -> Result<bool, DomError> {
        let state = self.state.lock();
        Ok(parse_handle(element)
            .filter(|&i| i < state.nodes.len())
            .map(|i| state.is_connected(i))
            .unwrap_or(false))
    }

    async fn set_value(&self, element: &ElementHandle, value: &str) -> Result<(), DomError> {
        self.with_live(element, |state, index| {
            state.nodes[index].value = Some(value.to_string());
            state.mutations.push(Mutation::SetValue {
                element: element.clone(),
                value: value.to_string(),
            });
        })
    }

    async fn dispatch_event(
        &self,
        element: &ElementHandle,
        event: DomEvent,
    ) -> Result<(), DomError> {
        self.with_live(element, |state, _| {
            state.mutations.push(Mutation::Event {
                element: element.clone(),
                event,
            });
        })
    }

    async fn click(&self, element: &ElementHandle) -> Result<(), DomError> {
        self.with_live(element, |state, _| {
            state.mutations.push(Mutation::Click {
                element: element.clone(),
            });
        })
    }

    async fn submit_enclosing_form(&self, element: &ElementHandle) -> Result<bool, DomError> {
        self.with_live(element, |state, index| match state.enclosing_form(index) {
            Some(form) => {
                state.mutations.push(Mutation::Submit {
                    form: handle_for(form),
                });
                true
            }
            None => false,
        })
    }

    async fn find_submit_button(
        &self,
        element: &ElementHandle,
    ) -> Result<Option<ElementSnapshot>, DomError> {
        self.with_live(element, |state, index| {
            if let Some(form) = state.enclosing_form(index) {
                let in_form = state
                    .subtree(form)
                    .into_iter()
                    .find(|&i| state.is_visible(i) && state.is_submit_control(i));
                if let Some(button) = in_form {
                    return Some(state.snapshot(button));
                }
            }
            state
                .preorder()
                .into_iter()
                .find(|&i| i != index && state.is_visible(i) && state.is_submit_labelled(i))
                .map(|i| state.snapshot(i))
        })
    }

    async fn scroll_into_view(&self, element: &ElementHandle) -> Result<(), DomError> {
        self.with_live(element, |state, _| {
            state.mutations.push(Mutation::Scroll {
                element: element.clone(),
            });
        })
    }
}

#[cfg(test)]
#[path = "page_tests.rs"]
mod tests;
