//! Tab pane
//!
//! The page-level object: owns the controller and the scroll-hint
//! synchronizer, binds input, and exposes the activation entry point.

use serde::Serialize;
use std::rc::Rc;

use tabpane_dom::{Scheduler, ViewTree};
use tabpane_navigation::{FocusResolution, FocusResolver};
use tabpane_scroll::{ScrollHintSynchronizer, SyncReport};
use tabpane_tabs::{TabController, TabKey};

use crate::config::Config;

/// What [`TabPane::mount`] managed to wire up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Mounted {
    /// Tab buttons given a click listener
    pub buttons: usize,
    /// Whether the keyboard scope was found and bound
    pub keyboard: bool,
    /// Whether the first scroll-hint pass waits for the document to load
    pub deferred: bool,
    /// Listener registrations the host refused
    pub failures: usize,
}

pub struct TabPane<T: ViewTree, S: Scheduler> {
    tree: Rc<T>,
    scheduler: Rc<S>,
    config: Rc<Config>,
    controller: TabController<T>,
    synchronizer: ScrollHintSynchronizer<T, S>,
    focus: FocusResolver,
}

impl<T, S> TabPane<T, S>
where
    T: ViewTree + 'static,
    S: Scheduler + 'static,
{
    pub fn new(tree: Rc<T>, scheduler: Rc<S>, config: Config) -> Self {
        let controller = TabController::new(Rc::clone(&tree), config.tabs.clone());
        let synchronizer = ScrollHintSynchronizer::new(
            Rc::clone(&tree),
            Rc::clone(&scheduler),
            config.scroll.clone(),
        );

        Self {
            tree,
            scheduler,
            config: Rc::new(config),
            controller,
            synchronizer,
            focus: FocusResolver::new(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The undecorated transition, without the follow-up scroll-hint pass.
    pub fn controller(&self) -> &TabController<T> {
        &self.controller
    }

    pub fn active_key(&self) -> Option<TabKey> {
        self.controller.active_key()
    }

    /// Public entry point: switch to `key`, then re-synchronize scroll
    /// hints once the panel has had time to lay out. Unknown keys still
    /// deactivate the current tab and still schedule the pass.
    pub fn activate(&self, key: impl Into<TabKey>) {
        let key = key.into();
        self.controller.activate(&key);

        let synchronizer = self.synchronizer.clone();
        self.scheduler.defer(
            self.config.resync_delay(),
            Box::new(move || {
                synchronizer.synchronize();
            }),
        );
    }

    pub fn synchronize(&self) -> SyncReport {
        self.synchronizer.synchronize()
    }

    /// Handle a key-down inside the tab group. Returns `true` when the
    /// event was consumed and its default action should be suppressed.
    pub fn handle_key(&self, key: &str) -> bool {
        let buttons = self.controller.buttons();
        let focused = self
            .tree
            .focused()
            .and_then(|node| buttons.iter().position(|b| *b == node));

        match self.focus.resolve_key(key, focused, buttons.len()) {
            FocusResolution::MoveFocus(index) => {
                if let Some(button) = buttons.get(index) {
                    if let Err(e) = self.tree.focus(button) {
                        tracing::warn!(index, error = %e, "Failed to move tab focus");
                    }
                }
                true
            }
            FocusResolution::Activate(index) => {
                let Some(button) = buttons.get(index) else {
                    return false;
                };
                match self.controller.button_key(button) {
                    Ok(key) => {
                        self.activate(key);
                        true
                    }
                    Err(e) => {
                        tracing::warn!(index, error = %e, "Focused tab cannot be activated");
                        false
                    }
                }
            }
            FocusResolution::Ignore => false,
        }
    }

    /// Bind clicks and keyboard navigation, then run the first scroll-hint
    /// pass now or once the document finishes loading. A registration the
    /// host refuses is logged and counted; the remaining steps still run.
    pub fn mount(&self) -> Mounted {
        let mut mounted = Mounted::default();

        for button in self.controller.buttons() {
            let pane = self.clone();
            let target = button.clone();
            let bound = self.tree.on_click(
                &button,
                Rc::new(move || match pane.controller.button_key(&target) {
                    Ok(key) => pane.activate(key),
                    Err(e) => tracing::warn!(error = %e, "Clicked tab cannot be activated"),
                }),
            );
            match bound {
                Ok(()) => mounted.buttons += 1,
                Err(e) => {
                    tracing::warn!(error = %e, "Failed to bind tab click");
                    mounted.failures += 1;
                }
            }
        }

        match self.tree.query_first(&self.config.keyboard_scope_class) {
            Some(scope) => {
                let pane = self.clone();
                match self
                    .tree
                    .on_key_down(&scope, Rc::new(move |key: &str| pane.handle_key(key)))
                {
                    Ok(()) => mounted.keyboard = true,
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to bind keyboard navigation");
                        mounted.failures += 1;
                    }
                }
            }
            None => tracing::debug!(
                scope = %self.config.keyboard_scope_class,
                "No keyboard scope, arrow navigation disabled"
            ),
        }

        if self.tree.is_loading() {
            let synchronizer = self.synchronizer.clone();
            let waiting = self.tree.on_content_loaded(Rc::new(move || {
                synchronizer.synchronize();
            }));
            match waiting {
                Ok(()) => mounted.deferred = true,
                Err(e) => {
                    // Bind whatever has been parsed so far.
                    tracing::warn!(error = %e, "Failed to wait for document load");
                    mounted.failures += 1;
                    self.synchronizer.synchronize();
                }
            }
        } else {
            self.synchronizer.synchronize();
        }

        tracing::info!(
            buttons = mounted.buttons,
            keyboard = mounted.keyboard,
            deferred = mounted.deferred,
            failures = mounted.failures,
            "Tab pane mounted"
        );

        mounted
    }
}

impl<T: ViewTree, S: Scheduler> Clone for TabPane<T, S> {
    fn clone(&self) -> Self {
        Self {
            tree: Rc::clone(&self.tree),
            scheduler: Rc::clone(&self.scheduler),
            config: Rc::clone(&self.config),
            controller: self.controller.clone(),
            synchronizer: self.synchronizer.clone(),
            focus: self.focus,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabpane_dom::{ManualScheduler, MemoryTree};

    #[test]
    fn test_activate_defers_one_pass() {
        let tree = Rc::new(MemoryTree::new());
        let scheduler = Rc::new(ManualScheduler::new());
        let pane = TabPane::new(Rc::clone(&tree), Rc::clone(&scheduler), Config::default());

        pane.activate("anything");

        assert_eq!(scheduler.pending(), 1);
        assert_eq!(scheduler.advance(pane.config().resync_delay()), 1);
        assert_eq!(scheduler.pending(), 0);
    }

    #[test]
    fn test_mount_without_keyboard_scope() {
        let tree = Rc::new(MemoryTree::new());
        let button = tree.append(tree.root(), &["tab-btn"]);
        tree.set_data(button, "tab", "only");
        let scheduler = Rc::new(ManualScheduler::new());
        let pane = TabPane::new(Rc::clone(&tree), scheduler, Config::default());

        let mounted = pane.mount();

        assert_eq!(
            mounted,
            Mounted {
                buttons: 1,
                keyboard: false,
                deferred: false,
                failures: 0,
            }
        );
        assert_eq!(tree.click_listener_count(button), 1);
    }

    #[test]
    fn test_refused_listeners_do_not_stop_mount() {
        let tree = Rc::new(MemoryTree::loading());
        let scope = tree.append(tree.root(), &["tab-nav-inner"]);
        let button = tree.append(scope, &["tab-btn"]);
        tree.set_data(button, "tab", "only");
        let wrapper = tree.append(tree.root(), &["scroll-wrapper"]);
        let region = tree.append(wrapper, &["scroll-container"]);
        tree.reject_listeners("keydown");
        tree.reject_listeners("DOMContentLoaded");
        let scheduler = Rc::new(ManualScheduler::new());
        let pane = TabPane::new(Rc::clone(&tree), Rc::clone(&scheduler), Config::default());

        let mounted = pane.mount();

        assert_eq!(
            mounted,
            Mounted {
                buttons: 1,
                keyboard: false,
                deferred: false,
                failures: 2,
            }
        );
        // The first pass ran right away instead of waiting for the load.
        assert_eq!(tree.scroll_listener_count(region), 1);
        assert_eq!(scheduler.pending(), 1);

        tree.click(button);
        assert_eq!(pane.active_key(), Some(TabKey::from("only")));
    }
}
