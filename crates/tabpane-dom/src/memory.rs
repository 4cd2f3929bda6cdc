//! In-memory view tree
//!
//! Arena-backed document with just enough behavior to drive the tab
//! controller without a browser: classes, ids, data attributes, inline
//! animation, geometry, focus and event dispatch.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use crate::error::DomError;
use crate::tree::{KeyListener, Listener, ScrollMetrics, ViewTree};
use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Default)]
struct Element {
    id: Option<String>,
    classes: BTreeSet<String>,
    data: BTreeMap<String, String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    attached: bool,
    /// Inline animation as last written
    animation: String,
    /// Inline animation as seen by the last style flush
    committed_animation: String,
    animation_starts: u32,
    page_top: f64,
    height: f64,
    scroll: Option<ScrollMetrics>,
    click_listeners: Vec<Listener>,
    key_listeners: Vec<KeyListener>,
    scroll_listeners: Vec<Listener>,
}

struct Document {
    elements: Vec<Element>,
    focused: Option<NodeId>,
    scroll_y: f64,
    scroll_requests: Vec<f64>,
    loading: bool,
    loaded_listeners: Vec<Listener>,
    /// Event names whose listener registration fails
    rejected: BTreeSet<String>,
}

impl Document {
    fn accept_listener(&self, event: &str) -> Result<()> {
        if self.rejected.contains(event) {
            return Err(DomError::Host(format!("{} listener rejected", event)));
        }
        Ok(())
    }

    fn element(&self, node: NodeId) -> Result<&Element> {
        self.elements
            .get(node.0)
            .ok_or(DomError::UnknownNode(node.0))
    }

    fn element_mut(&mut self, node: NodeId) -> Result<&mut Element> {
        self.elements
            .get_mut(node.0)
            .ok_or(DomError::UnknownNode(node.0))
    }

    /// Attached descendants of `root` in document order, `root` excluded.
    fn descendants(&self, root: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = match self.elements.get(root.0) {
            Some(el) => el.children.iter().rev().copied().collect(),
            None => return out,
        };
        while let Some(node) = stack.pop() {
            let el = &self.elements[node.0];
            if !el.attached {
                continue;
            }
            out.push(node);
            stack.extend(el.children.iter().rev().copied());
        }
        out
    }

    fn ancestors_inclusive(&self, node: NodeId) -> Vec<NodeId> {
        let mut chain = Vec::new();
        let mut current = Some(node);
        while let Some(n) = current {
            chain.push(n);
            current = self.elements.get(n.0).and_then(|el| el.parent);
        }
        chain
    }
}

/// Shared handle to an in-memory document. Clones see the same document.
#[derive(Clone)]
pub struct MemoryTree {
    doc: Rc<RefCell<Document>>,
}

impl MemoryTree {
    /// Create a document whose parsing has already completed.
    pub fn new() -> Self {
        let root = Element {
            attached: true,
            ..Element::default()
        };

        Self {
            doc: Rc::new(RefCell::new(Document {
                elements: vec![root],
                focused: None,
                scroll_y: 0.0,
                scroll_requests: Vec::new(),
                loading: false,
                loaded_listeners: Vec::new(),
                rejected: BTreeSet::new(),
            })),
        }
    }

    /// Create a document that is still being parsed; see [`Self::finish_loading`].
    pub fn loading() -> Self {
        let tree = Self::new();
        tree.doc.borrow_mut().loading = true;
        tree
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// Append a new element with the given classes under `parent`.
    pub fn append(&self, parent: NodeId, classes: &[&str]) -> NodeId {
        let mut doc = self.doc.borrow_mut();
        let node = NodeId(doc.elements.len());
        let attached = doc.elements.get(parent.0).is_some_and(|p| p.attached);

        doc.elements.push(Element {
            classes: classes.iter().map(|c| c.to_string()).collect(),
            parent: Some(parent),
            attached,
            ..Element::default()
        });

        if let Some(p) = doc.elements.get_mut(parent.0) {
            p.children.push(node);
        }

        node
    }

    pub fn set_id(&self, node: NodeId, id: &str) {
        if let Some(el) = self.doc.borrow_mut().elements.get_mut(node.0) {
            el.id = Some(id.to_string());
        }
    }

    /// Set the `data-<name>` attribute.
    pub fn set_data(&self, node: NodeId, name: &str, value: &str) {
        if let Some(el) = self.doc.borrow_mut().elements.get_mut(node.0) {
            el.data.insert(name.to_string(), value.to_string());
        }
    }

    /// Make every later registration of an `event` listener fail
    /// (`"click"`, `"keydown"`, `"scroll"` or `"DOMContentLoaded"`).
    pub fn reject_listeners(&self, event: &str) {
        self.doc.borrow_mut().rejected.insert(event.to_string());
    }

    /// Detach `node` and its subtree from the document.
    pub fn remove(&self, node: NodeId) {
        let mut doc = self.doc.borrow_mut();
        let mut stack = vec![node];
        while let Some(n) = stack.pop() {
            if let Some(el) = doc.elements.get_mut(n.0) {
                el.attached = false;
                stack.extend(el.children.iter().copied());
            }
        }
        if doc.focused.is_some_and(|f| !doc.elements[f.0].attached) {
            doc.focused = None;
        }
    }

    /// Place `node` at `page_top` (document coordinates) with the given height.
    pub fn set_geometry(&self, node: NodeId, page_top: f64, height: f64) {
        if let Some(el) = self.doc.borrow_mut().elements.get_mut(node.0) {
            el.page_top = page_top;
            el.height = height;
        }
    }

    /// Make `node` a horizontally scrollable region.
    pub fn set_scroll_metrics(&self, node: NodeId, metrics: ScrollMetrics) {
        if let Some(el) = self.doc.borrow_mut().elements.get_mut(node.0) {
            el.scroll = Some(metrics);
        }
    }

    /// Scroll a region horizontally and dispatch its scroll listeners.
    pub fn scroll_region_to(&self, node: NodeId, scroll_left: f64) {
        let listeners = {
            let mut doc = self.doc.borrow_mut();
            let Some(el) = doc.elements.get_mut(node.0) else {
                return;
            };
            let metrics = el.scroll.get_or_insert_with(ScrollMetrics::default);
            metrics.scroll_left = scroll_left;
            el.scroll_listeners.clone()
        };

        for listener in listeners {
            listener();
        }
    }

    /// Set the page's vertical scroll offset without animation.
    pub fn set_scroll_y(&self, y: f64) {
        self.doc.borrow_mut().scroll_y = y;
    }

    /// Every target passed to [`ViewTree::smooth_scroll_to`], oldest first.
    pub fn scroll_requests(&self) -> Vec<f64> {
        self.doc.borrow().scroll_requests.clone()
    }

    /// Number of times the entry animation started on `node`.
    pub fn animation_starts(&self, node: NodeId) -> u32 {
        self.doc
            .borrow()
            .elements
            .get(node.0)
            .map_or(0, |el| el.animation_starts)
    }

    pub fn scroll_listener_count(&self, node: NodeId) -> usize {
        self.doc
            .borrow()
            .elements
            .get(node.0)
            .map_or(0, |el| el.scroll_listeners.len())
    }

    pub fn click_listener_count(&self, node: NodeId) -> usize {
        self.doc
            .borrow()
            .elements
            .get(node.0)
            .map_or(0, |el| el.click_listeners.len())
    }

    /// Dispatch a click on `node`, bubbling to its ancestors.
    pub fn click(&self, node: NodeId) {
        let listeners: Vec<Listener> = {
            let doc = self.doc.borrow();
            doc.ancestors_inclusive(node)
                .into_iter()
                .flat_map(|n| doc.elements[n.0].click_listeners.clone())
                .collect()
        };

        for listener in listeners {
            listener();
        }
    }

    /// Dispatch a key-down on the focused element, bubbling to its
    /// ancestors. Returns `true` if any listener suppressed the default.
    pub fn key_down(&self, key: &str) -> bool {
        let listeners: Vec<KeyListener> = {
            let doc = self.doc.borrow();
            let Some(focused) = doc.focused else {
                return false;
            };
            doc.ancestors_inclusive(focused)
                .into_iter()
                .flat_map(|n| doc.elements[n.0].key_listeners.clone())
                .collect()
        };

        let mut prevented = false;
        for listener in listeners {
            prevented |= listener(key);
        }
        prevented
    }

    /// Mark parsing complete and fire content-loaded listeners once.
    pub fn finish_loading(&self) {
        let listeners = {
            let mut doc = self.doc.borrow_mut();
            if !doc.loading {
                return;
            }
            doc.loading = false;
            std::mem::take(&mut doc.loaded_listeners)
        };

        for listener in listeners {
            listener();
        }
    }
}

impl Default for MemoryTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ViewTree for MemoryTree {
    type Node = NodeId;

    fn query_all(&self, class: &str) -> Vec<NodeId> {
        let doc = self.doc.borrow();
        doc.descendants(NodeId(0))
            .into_iter()
            .filter(|n| doc.elements[n.0].classes.contains(class))
            .collect()
    }

    fn query_descendant(&self, root: &NodeId, class: &str) -> Option<NodeId> {
        let doc = self.doc.borrow();
        doc.descendants(*root)
            .into_iter()
            .find(|n| doc.elements[n.0].classes.contains(class))
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        let doc = self.doc.borrow();
        doc.descendants(NodeId(0))
            .into_iter()
            .find(|n| doc.elements[n.0].id.as_deref() == Some(id))
    }

    fn data(&self, node: &NodeId, name: &str) -> Option<String> {
        self.doc
            .borrow()
            .elements
            .get(node.0)
            .and_then(|el| el.data.get(name).cloned())
    }

    fn is_connected(&self, node: &NodeId) -> bool {
        self.doc
            .borrow()
            .elements
            .get(node.0)
            .is_some_and(|el| el.attached)
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        self.doc
            .borrow()
            .elements
            .get(node.0)
            .is_some_and(|el| el.classes.contains(class))
    }

    fn animation(&self, node: &NodeId) -> String {
        self.doc
            .borrow()
            .elements
            .get(node.0)
            .map(|el| el.animation.clone())
            .unwrap_or_default()
    }

    fn set_class(&self, node: &NodeId, class: &str, on: bool) -> Result<()> {
        let mut doc = self.doc.borrow_mut();
        let el = doc.element_mut(*node)?;
        if on {
            el.classes.insert(class.to_string());
        } else {
            el.classes.remove(class);
        }
        Ok(())
    }

    fn set_animation(&self, node: &NodeId, value: &str) -> Result<()> {
        let mut doc = self.doc.borrow_mut();
        let el = doc.element_mut(*node)?;
        el.animation = value.to_string();

        // A non-empty animation only starts if the last flushed style had
        // none; the new value is committed by the next frame either way.
        if !value.is_empty() {
            if el.committed_animation.is_empty() {
                el.animation_starts += 1;
            }
            el.committed_animation = value.to_string();
        }
        Ok(())
    }

    fn flush_layout(&self, node: &NodeId) {
        if let Some(el) = self.doc.borrow_mut().elements.get_mut(node.0) {
            el.committed_animation = el.animation.clone();
        }
    }

    fn focus(&self, node: &NodeId) -> Result<()> {
        let mut doc = self.doc.borrow_mut();
        doc.element(*node)?;
        doc.focused = Some(*node);
        Ok(())
    }

    fn bounding_top(&self, node: &NodeId) -> f64 {
        let doc = self.doc.borrow();
        doc.elements
            .get(node.0)
            .map_or(0.0, |el| el.page_top - doc.scroll_y)
    }

    fn offset_height(&self, node: &NodeId) -> f64 {
        self.doc
            .borrow()
            .elements
            .get(node.0)
            .map_or(0.0, |el| el.height)
    }

    fn scroll_y(&self) -> f64 {
        self.doc.borrow().scroll_y
    }

    fn smooth_scroll_to(&self, top: f64) {
        let mut doc = self.doc.borrow_mut();
        doc.scroll_requests.push(top);
        doc.scroll_y = top;
    }

    fn scroll_metrics(&self, node: &NodeId) -> Option<ScrollMetrics> {
        self.doc
            .borrow()
            .elements
            .get(node.0)
            .and_then(|el| el.scroll)
    }

    fn focused(&self) -> Option<NodeId> {
        self.doc.borrow().focused
    }

    fn is_loading(&self) -> bool {
        self.doc.borrow().loading
    }

    fn on_click(&self, node: &NodeId, listener: Listener) -> Result<()> {
        let mut doc = self.doc.borrow_mut();
        doc.accept_listener("click")?;
        doc.element_mut(*node)?.click_listeners.push(listener);
        Ok(())
    }

    fn on_key_down(&self, node: &NodeId, listener: KeyListener) -> Result<()> {
        let mut doc = self.doc.borrow_mut();
        doc.accept_listener("keydown")?;
        doc.element_mut(*node)?.key_listeners.push(listener);
        Ok(())
    }

    fn on_scroll(&self, node: &NodeId, listener: Listener) -> Result<()> {
        let mut doc = self.doc.borrow_mut();
        doc.accept_listener("scroll")?;
        doc.element_mut(*node)?.scroll_listeners.push(listener);
        Ok(())
    }

    fn on_content_loaded(&self, listener: Listener) -> Result<()> {
        let mut doc = self.doc.borrow_mut();
        doc.accept_listener("DOMContentLoaded")?;
        // Registering after parsing finished never fires, like the browser.
        if doc.loading {
            doc.loaded_listeners.push(listener);
        }
        Ok(())
    }
}
