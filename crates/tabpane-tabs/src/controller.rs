//! Tab Controller
//!
//! Drives a single activation: deactivate everything, activate the
//! requested pair, restart the panel's entry animation and bring the
//! navigation bar back into view. The tree is queried fresh on every call
//! and is the only record of which tab is active.

use serde::Serialize;
use std::rc::Rc;

use tabpane_dom::ViewTree;

use crate::error::TabError;
use crate::options::TabOptions;
use crate::state::{AnimationState, TabState};
use crate::tab::TabKey;
use crate::Result;

/// What a single activation touched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Activation {
    pub key: TabKey,
    pub button_found: bool,
    pub panel_found: bool,
    pub animation: AnimationState,
    pub viewport_corrected: bool,
}

pub struct TabController<T: ViewTree> {
    tree: Rc<T>,
    options: Rc<TabOptions>,
}

impl<T: ViewTree> TabController<T> {
    pub fn new(tree: Rc<T>, options: TabOptions) -> Self {
        Self {
            tree,
            options: Rc::new(options),
        }
    }

    /// All tab buttons, in document order.
    pub fn buttons(&self) -> Vec<T::Node> {
        self.tree.query_all(&self.options.button_class)
    }

    /// Key stored on a tab button.
    pub fn button_key(&self, button: &T::Node) -> Result<TabKey> {
        self.tree
            .data(button, &self.options.key_attribute)
            .map(TabKey::from)
            .ok_or_else(|| TabError::MissingKey(self.options.key_attribute.clone()))
    }

    /// Key of the button currently marked active, if any.
    pub fn active_key(&self) -> Option<TabKey> {
        self.buttons()
            .iter()
            .find(|b| self.tree.has_class(b, &self.options.active_class))
            .and_then(|b| self.button_key(b).ok())
    }

    pub fn state_of(&self, key: &TabKey) -> TabState {
        let active = self
            .find_button(key)
            .is_some_and(|b| self.tree.has_class(&b, &self.options.active_class));
        TabState::from_flag(active)
    }

    /// Switch to `key`. Unknown keys leave every tab inactive. Calling
    /// twice with the same key restarts the entry animation both times.
    pub fn activate(&self, key: &TabKey) -> Activation {
        // Everything goes inactive before anything goes active.
        self.deactivate_all();

        let button = self.find_button(key);
        let panel = self
            .tree
            .element_by_id(&key.panel_id(&self.options.panel_id_prefix));

        let mut activation = Activation {
            key: key.clone(),
            button_found: button.is_some(),
            panel_found: panel.is_some(),
            animation: AnimationState::Idle,
            viewport_corrected: false,
        };

        if let Some(button) = &button {
            if let Err(e) = self.set_state(button, TabState::Active) {
                tracing::warn!(key = %key, error = %e, "Failed to mark tab button active");
            }
        }

        if let Some(panel) = &panel {
            if let Err(e) = self.set_state(panel, TabState::Active) {
                tracing::warn!(key = %key, error = %e, "Failed to mark tab panel active");
            }
            match self.restart_animation(panel) {
                Ok(state) => activation.animation = state,
                Err(e) => tracing::warn!(key = %key, error = %e, "Failed to restart animation"),
            }
        }

        if button.is_none() && panel.is_none() {
            tracing::debug!(key = %key, "No tab matches key");
        }

        activation.viewport_corrected = self.correct_viewport();

        tracing::debug!(
            key = %key,
            button = activation.button_found,
            panel = activation.panel_found,
            animation = %activation.animation,
            scrolled = activation.viewport_corrected,
            "Tab activated"
        );

        activation
    }

    fn find_button(&self, key: &TabKey) -> Option<T::Node> {
        self.buttons().into_iter().find(|b| {
            self.tree.data(b, &self.options.key_attribute).as_deref() == Some(key.as_str())
        })
    }

    fn deactivate_all(&self) {
        for button in self.buttons() {
            if let Err(e) = self.set_state(&button, TabState::Inactive) {
                tracing::warn!(error = %e, "Failed to deactivate tab button");
            }
        }

        for panel in self.tree.query_all(&self.options.panel_class) {
            let cleared = self
                .set_state(&panel, TabState::Inactive)
                .and_then(|()| self.clear_animation(&panel));
            if let Err(e) = cleared {
                tracing::warn!(error = %e, "Failed to deactivate tab panel");
            }
        }
    }

    fn set_state(&self, node: &T::Node, state: TabState) -> Result<()> {
        self.tree
            .set_class(node, &self.options.active_class, state.is_active())?;
        Ok(())
    }

    fn clear_animation(&self, panel: &T::Node) -> Result<()> {
        self.tree.set_animation(panel, "")?;
        Ok(())
    }

    /// Clear, flush, re-apply: without the flush in between the host
    /// coalesces both writes and the animation does not replay.
    fn restart_animation(&self, panel: &T::Node) -> Result<AnimationState> {
        self.clear_animation(panel)?;
        self.tree.flush_layout(panel);
        self.tree.set_animation(panel, &self.options.entry_animation)?;
        Ok(AnimationState::from_inline(&self.tree.animation(panel)))
    }

    /// Scroll back to the navigation bar if the page has scrolled past it.
    fn correct_viewport(&self) -> bool {
        let Some(nav) = self.tree.query_first(&self.options.nav_class) else {
            return false;
        };

        let scroll_y = self.tree.scroll_y();
        let nav_top = self.tree.bounding_top(&nav) + scroll_y;

        if scroll_y > nav_top + self.tree.offset_height(&nav) {
            tracing::debug!(from = scroll_y, to = nav_top, "Scrolling navigation back into view");
            self.tree.smooth_scroll_to(nav_top);
            true
        } else {
            false
        }
    }
}

impl<T: ViewTree> Clone for TabController<T> {
    fn clone(&self) -> Self {
        Self {
            tree: Rc::clone(&self.tree),
            options: Rc::clone(&self.options),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tabpane_dom::{MemoryTree, NodeId};

    struct Fixture {
        tree: Rc<MemoryTree>,
        controller: TabController<MemoryTree>,
        buttons: Vec<NodeId>,
        panels: Vec<NodeId>,
        nav: NodeId,
    }

    fn fixture(keys: &[&str]) -> Fixture {
        let tree = Rc::new(MemoryTree::new());
        let root = tree.root();
        let nav = tree.append(root, &["tab-nav"]);
        tree.set_geometry(nav, 400.0, 60.0);
        let inner = tree.append(nav, &["tab-nav-inner"]);

        let mut buttons = Vec::new();
        let mut panels = Vec::new();
        for key in keys {
            let button = tree.append(inner, &["tab-btn"]);
            tree.set_data(button, "tab", key);
            buttons.push(button);
        }
        for key in keys {
            let panel = tree.append(root, &["tab-panel"]);
            tree.set_id(panel, &format!("tab-{}", key));
            panels.push(panel);
        }

        let controller = TabController::new(Rc::clone(&tree), TabOptions::default());
        Fixture {
            tree,
            controller,
            buttons,
            panels,
            nav,
        }
    }

    fn active_count(f: &Fixture, nodes: &[NodeId]) -> usize {
        nodes
            .iter()
            .filter(|n| f.tree.has_class(n, "active"))
            .count()
    }

    #[test]
    fn test_activate_marks_single_pair() {
        let f = fixture(&["a", "b", "c"]);

        for key in ["a", "c", "b", "b", "a"] {
            f.controller.activate(&TabKey::from(key));
            assert_eq!(active_count(&f, &f.buttons), 1);
            assert_eq!(active_count(&f, &f.panels), 1);
            assert_eq!(f.controller.active_key(), Some(TabKey::from(key)));
        }

        assert_eq!(f.controller.state_of(&TabKey::from("a")), TabState::Active);
        assert_eq!(f.controller.state_of(&TabKey::from("b")), TabState::Inactive);
    }

    #[test]
    fn test_reactivation_restarts_animation() {
        let f = fixture(&["a", "b"]);
        let key = TabKey::from("b");

        let first = f.controller.activate(&key);
        let second = f.controller.activate(&key);

        assert_eq!(first.animation, AnimationState::Playing);
        assert_eq!(second.animation, AnimationState::Playing);
        assert_eq!(f.tree.animation_starts(f.panels[1]), 2);
        assert_eq!(f.tree.animation(&f.panels[1]), "fadeIn 0.25s ease forwards");
        assert!(f.tree.has_class(&f.buttons[1], "active"));
    }

    #[test]
    fn test_switch_clears_previous_animation() {
        let f = fixture(&["a", "b"]);
        f.controller.activate(&TabKey::from("a"));
        f.controller.activate(&TabKey::from("b"));

        assert_eq!(f.tree.animation(&f.panels[0]), "");
        assert_eq!(f.tree.animation_starts(f.panels[0]), 1);
    }

    #[test]
    fn test_unknown_key_deactivates_everything() {
        let f = fixture(&["a", "b"]);
        f.controller.activate(&TabKey::from("a"));

        let activation = f.controller.activate(&TabKey::from("doesNotExist"));

        assert_eq!(
            activation,
            Activation {
                key: TabKey::from("doesNotExist"),
                button_found: false,
                panel_found: false,
                animation: AnimationState::Idle,
                viewport_corrected: false,
            }
        );
        assert_eq!(active_count(&f, &f.buttons), 0);
        assert_eq!(active_count(&f, &f.panels), 0);
        assert_eq!(f.tree.animation(&f.panels[0]), "");
        assert_eq!(f.controller.active_key(), None);
    }

    #[test]
    fn test_button_without_panel_still_activates() {
        let f = fixture(&["a"]);
        let orphan = f.tree.append(f.nav, &["tab-btn"]);
        f.tree.set_data(orphan, "tab", "orphan");

        let activation = f.controller.activate(&TabKey::from("orphan"));

        assert!(activation.button_found);
        assert!(!activation.panel_found);
        assert!(f.tree.has_class(&orphan, "active"));
        assert_eq!(active_count(&f, &f.panels), 0);
    }

    #[test]
    fn test_scrolls_back_to_nav_when_past_it() {
        let f = fixture(&["a"]);

        // Nav spans 400..460; still visible at 450.
        f.tree.set_scroll_y(450.0);
        assert!(!f.controller.activate(&TabKey::from("a")).viewport_corrected);
        assert!(f.tree.scroll_requests().is_empty());

        f.tree.set_scroll_y(1200.0);
        assert!(f.controller.activate(&TabKey::from("a")).viewport_corrected);
        assert_eq!(f.tree.scroll_requests(), vec![400.0]);
        assert_eq!(f.tree.scroll_y(), 400.0);
    }

    #[test]
    fn test_missing_nav_skips_viewport_correction() {
        let tree = Rc::new(MemoryTree::new());
        let button = tree.append(tree.root(), &["tab-btn"]);
        tree.set_data(button, "tab", "solo");
        tree.set_scroll_y(5000.0);

        let controller = TabController::new(Rc::clone(&tree), TabOptions::default());
        let activation = controller.activate(&TabKey::from("solo"));

        assert!(activation.button_found);
        assert!(!activation.viewport_corrected);
        assert!(tree.scroll_requests().is_empty());
    }

    #[test]
    fn test_button_without_key_is_reported() {
        let f = fixture(&[]);
        let bare = f.tree.append(f.nav, &["tab-btn"]);

        assert!(matches!(
            f.controller.button_key(&bare),
            Err(TabError::MissingKey(_))
        ));
    }
}
