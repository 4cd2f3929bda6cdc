//! View tree abstraction
//!
//! Node handles are never cached by callers: every pass queries the tree
//! again, so content that appears after a tab switch is picked up.

use serde::{Deserialize, Serialize};
use std::rc::Rc;

use crate::Result;

/// Callback for events that carry no payload (click, scroll, content loaded).
pub type Listener = Rc<dyn Fn()>;

/// Callback for key-down events. Receives the key name as reported by the
/// host (`"ArrowRight"`, `"Enter"`, `" "`...) and returns `true` when the
/// event was consumed and its default action must be suppressed.
pub type KeyListener = Rc<dyn Fn(&str) -> bool>;

/// Horizontal scroll geometry of a region, in CSS pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrollMetrics {
    pub scroll_left: f64,
    pub client_width: f64,
    pub scroll_width: f64,
}

impl ScrollMetrics {
    pub fn new(scroll_left: f64, client_width: f64, scroll_width: f64) -> Self {
        Self {
            scroll_left,
            client_width,
            scroll_width,
        }
    }

    /// True when the visible window reaches the end of the content,
    /// allowing `tolerance` pixels of sub-pixel rounding.
    pub fn is_at_end(&self, tolerance: f64) -> bool {
        self.scroll_left + self.client_width >= self.scroll_width - tolerance
    }
}

pub trait ViewTree {
    type Node: Clone + PartialEq + 'static;

    // === Queries ===

    /// All attached elements carrying `class`, in document order.
    fn query_all(&self, class: &str) -> Vec<Self::Node>;

    /// First attached element carrying `class`.
    fn query_first(&self, class: &str) -> Option<Self::Node> {
        self.query_all(class).into_iter().next()
    }

    /// First descendant of `root` carrying `class`.
    fn query_descendant(&self, root: &Self::Node, class: &str) -> Option<Self::Node>;

    fn element_by_id(&self, id: &str) -> Option<Self::Node>;

    /// Value of the `data-<name>` attribute.
    fn data(&self, node: &Self::Node, name: &str) -> Option<String>;

    /// False once `node` has been removed from the document.
    fn is_connected(&self, node: &Self::Node) -> bool;

    fn has_class(&self, node: &Self::Node, class: &str) -> bool;

    /// Inline `animation` style, empty when unset.
    fn animation(&self, node: &Self::Node) -> String;

    // === Mutation ===

    fn set_class(&self, node: &Self::Node, class: &str, on: bool) -> Result<()>;

    fn set_animation(&self, node: &Self::Node, value: &str) -> Result<()>;

    /// Force a synchronous style/layout flush for `node`.
    fn flush_layout(&self, node: &Self::Node);

    fn focus(&self, node: &Self::Node) -> Result<()>;

    // === Geometry & viewport ===

    /// Top edge relative to the viewport.
    fn bounding_top(&self, node: &Self::Node) -> f64;

    fn offset_height(&self, node: &Self::Node) -> f64;

    /// Vertical page scroll offset.
    fn scroll_y(&self) -> f64;

    fn smooth_scroll_to(&self, top: f64);

    fn scroll_metrics(&self, node: &Self::Node) -> Option<ScrollMetrics>;

    // === Focus & lifecycle ===

    fn focused(&self) -> Option<Self::Node>;

    /// True while the document is still being parsed.
    fn is_loading(&self) -> bool;

    // === Listeners ===

    fn on_click(&self, node: &Self::Node, listener: Listener) -> Result<()>;

    fn on_key_down(&self, node: &Self::Node, listener: KeyListener) -> Result<()>;

    /// Registers a passive scroll listener.
    fn on_scroll(&self, node: &Self::Node, listener: Listener) -> Result<()>;

    fn on_content_loaded(&self, listener: Listener) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_within_tolerance() {
        assert!(ScrollMetrics::new(96.0, 100.0, 200.0).is_at_end(4.0));
        assert!(ScrollMetrics::new(100.0, 100.0, 200.0).is_at_end(4.0));
        assert!(!ScrollMetrics::new(95.0, 100.0, 200.0).is_at_end(4.0));
        assert!(!ScrollMetrics::new(50.0, 100.0, 200.0).is_at_end(4.0));
    }

    #[test]
    fn test_non_overflowing_region_is_at_end() {
        assert!(ScrollMetrics::new(0.0, 300.0, 300.0).is_at_end(4.0));
    }
}
