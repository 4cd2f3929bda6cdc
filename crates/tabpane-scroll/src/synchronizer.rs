//! Scroll Hint Synchronizer
//!
//! Each pass walks every scroll wrapper currently in the tree, attaches a
//! scroll listener for each wrapper/region pair that does not have one yet,
//! and schedules one settle-time recomputation per wrapper.
//!
//! Bound pairs are remembered here rather than marked in the document, so
//! copied markup never inherits a binding.

use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use tabpane_dom::{Scheduler, ViewTree};

use crate::hint::reflect_scroll_end;
use crate::options::ScrollOptions;

/// Counts from a single synchronization pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// Wrappers found in the tree
    pub wrappers: usize,
    /// Pairs that received a listener in this pass
    pub bound: usize,
    /// Pairs that already had a listener from an earlier pass
    pub already_bound: usize,
    /// Pairs whose listener could not be attached
    pub failed: usize,
    /// Wrappers whose region could not be resolved
    pub skipped: usize,
}

pub struct ScrollHintSynchronizer<T: ViewTree, S: Scheduler> {
    tree: Rc<T>,
    scheduler: Rc<S>,
    options: Rc<ScrollOptions>,
    /// (wrapper, region) pairs with a live scroll listener
    bound: Rc<RefCell<Vec<(T::Node, T::Node)>>>,
}

impl<T, S> ScrollHintSynchronizer<T, S>
where
    T: ViewTree + 'static,
    S: Scheduler + 'static,
{
    pub fn new(tree: Rc<T>, scheduler: Rc<S>, options: ScrollOptions) -> Self {
        Self {
            tree,
            scheduler,
            options: Rc::new(options),
            bound: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Bind every resolvable region and schedule its initial check. Safe to
    /// call any number of times: a wrapper/region pair is only ever given
    /// one listener.
    pub fn synchronize(&self) -> SyncReport {
        let mut report = SyncReport::default();
        self.prune_detached();

        for wrapper in self.tree.query_all(&self.options.wrapper_class) {
            report.wrappers += 1;

            let Some(region) = self.resolve_region(&wrapper) else {
                tracing::debug!("Scroll wrapper has no region, skipping");
                report.skipped += 1;
                continue;
            };

            if self.is_bound(&wrapper, &region) {
                report.already_bound += 1;
            } else {
                match self.bind(&wrapper, &region) {
                    Ok(()) => report.bound += 1,
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to bind scroll hint");
                        report.failed += 1;
                    }
                }
            }

            self.schedule_check(wrapper, region);
        }

        tracing::debug!(
            wrappers = report.wrappers,
            bound = report.bound,
            already_bound = report.already_bound,
            failed = report.failed,
            skipped = report.skipped,
            "Scroll hints synchronized"
        );

        report
    }

    /// Region named by the wrapper's scroll id, else its first nested
    /// scroll container.
    fn resolve_region(&self, wrapper: &T::Node) -> Option<T::Node> {
        match self.tree.data(wrapper, &self.options.scroll_id_attribute) {
            Some(id) if !id.is_empty() => self.tree.element_by_id(&id),
            _ => self
                .tree
                .query_descendant(wrapper, &self.options.container_class),
        }
    }

    /// Forget pairs whose wrapper or region left the document.
    fn prune_detached(&self) {
        let tree = &self.tree;
        self.bound
            .borrow_mut()
            .retain(|(w, r)| tree.is_connected(w) && tree.is_connected(r));
    }

    fn is_bound(&self, wrapper: &T::Node, region: &T::Node) -> bool {
        self.bound
            .borrow()
            .iter()
            .any(|(w, r)| w == wrapper && r == region)
    }

    fn bind(&self, wrapper: &T::Node, region: &T::Node) -> tabpane_dom::Result<()> {
        let tree = Rc::clone(&self.tree);
        let options = Rc::clone(&self.options);
        let (w, r) = (wrapper.clone(), region.clone());

        self.tree.on_scroll(
            region,
            Rc::new(move || {
                reflect_scroll_end(&*tree, &w, &r, &options);
            }),
        )?;
        self.bound
            .borrow_mut()
            .push((wrapper.clone(), region.clone()));
        Ok(())
    }

    fn schedule_check(&self, wrapper: T::Node, region: T::Node) {
        let tree = Rc::clone(&self.tree);
        let options = Rc::clone(&self.options);

        self.scheduler.defer(
            Duration::from_millis(self.options.settle_delay_ms),
            Box::new(move || {
                reflect_scroll_end(&*tree, &wrapper, &region, &options);
            }),
        );
    }
}

impl<T: ViewTree, S: Scheduler> Clone for ScrollHintSynchronizer<T, S> {
    fn clone(&self) -> Self {
        Self {
            tree: Rc::clone(&self.tree),
            scheduler: Rc::clone(&self.scheduler),
            options: Rc::clone(&self.options),
            bound: Rc::clone(&self.bound),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tabpane_dom::{ManualScheduler, MemoryTree, NodeId, ScrollMetrics};

    const SETTLE: Duration = Duration::from_millis(50);

    fn setup() -> (
        Rc<MemoryTree>,
        Rc<ManualScheduler>,
        ScrollHintSynchronizer<MemoryTree, ManualScheduler>,
    ) {
        let tree = Rc::new(MemoryTree::new());
        let scheduler = Rc::new(ManualScheduler::new());
        let sync = ScrollHintSynchronizer::new(
            Rc::clone(&tree),
            Rc::clone(&scheduler),
            ScrollOptions::default(),
        );
        (tree, scheduler, sync)
    }

    fn nested_region(tree: &MemoryTree, metrics: ScrollMetrics) -> (NodeId, NodeId) {
        let wrapper = tree.append(tree.root(), &["scroll-wrapper"]);
        let region = tree.append(wrapper, &["scroll-container"]);
        tree.set_scroll_metrics(region, metrics);
        (wrapper, region)
    }

    #[test]
    fn test_scroll_updates_flag() {
        let (tree, _scheduler, sync) = setup();
        let (wrapper, region) = nested_region(&tree, ScrollMetrics::new(0.0, 100.0, 200.0));

        sync.synchronize();

        tree.scroll_region_to(region, 96.0);
        assert!(tree.has_class(&wrapper, "scrolled-end"));

        tree.scroll_region_to(region, 50.0);
        assert!(!tree.has_class(&wrapper, "scrolled-end"));
    }

    #[test]
    fn test_initial_check_is_deferred() {
        let (tree, scheduler, sync) = setup();
        // Content narrower than the region: already at the end.
        let (wrapper, _region) = nested_region(&tree, ScrollMetrics::new(0.0, 300.0, 280.0));

        sync.synchronize();
        assert!(!tree.has_class(&wrapper, "scrolled-end"));

        scheduler.advance(SETTLE - Duration::from_millis(1));
        assert!(!tree.has_class(&wrapper, "scrolled-end"));

        scheduler.advance(Duration::from_millis(1));
        assert!(tree.has_class(&wrapper, "scrolled-end"));
    }

    #[test]
    fn test_scroll_id_takes_precedence() {
        let (tree, _scheduler, sync) = setup();
        let wrapper = tree.append(tree.root(), &["scroll-wrapper"]);
        tree.set_data(wrapper, "scroll-id", "pricing-table");
        let nested = tree.append(wrapper, &["scroll-container"]);
        let named = tree.append(tree.root(), &["table"]);
        tree.set_id(named, "pricing-table");
        tree.set_scroll_metrics(named, ScrollMetrics::new(0.0, 100.0, 400.0));

        sync.synchronize();

        assert_eq!(tree.scroll_listener_count(named), 1);
        assert_eq!(tree.scroll_listener_count(nested), 0);
    }

    #[test]
    fn test_missing_region_skips_only_that_wrapper() {
        let (tree, _scheduler, sync) = setup();
        let empty = tree.append(tree.root(), &["scroll-wrapper"]);
        tree.set_data(empty, "scroll-id", "nowhere");
        tree.append(tree.root(), &["scroll-wrapper"]);
        let (_wrapper, region) = nested_region(&tree, ScrollMetrics::new(0.0, 100.0, 200.0));

        let report = sync.synchronize();

        assert_eq!(
            report,
            SyncReport {
                wrappers: 3,
                bound: 1,
                already_bound: 0,
                failed: 0,
                skipped: 2,
            }
        );
        assert_eq!(tree.scroll_listener_count(region), 1);
    }

    #[test]
    fn test_repeated_passes_bind_once() {
        let (tree, scheduler, sync) = setup();
        let (wrapper, region) = nested_region(&tree, ScrollMetrics::new(0.0, 100.0, 200.0));

        sync.synchronize();
        sync.synchronize();
        let report = sync.synchronize();

        assert_eq!(report.bound, 0);
        assert_eq!(report.already_bound, 1);
        assert_eq!(tree.scroll_listener_count(region), 1);

        // Every pass still schedules its own check; all agree.
        assert_eq!(scheduler.advance(SETTLE), 3);
        assert!(!tree.has_class(&wrapper, "scrolled-end"));
    }

    #[test]
    fn test_rerendered_region_is_bound_again() {
        let (tree, _scheduler, sync) = setup();
        let (wrapper, old_region) = nested_region(&tree, ScrollMetrics::new(0.0, 100.0, 200.0));
        sync.synchronize();

        tree.remove(old_region);
        let new_region = tree.append(wrapper, &["scroll-container"]);
        tree.set_scroll_metrics(new_region, ScrollMetrics::new(0.0, 100.0, 200.0));

        let report = sync.synchronize();

        assert_eq!(report.bound, 1);
        assert_eq!(tree.scroll_listener_count(new_region), 1);
        tree.scroll_region_to(new_region, 100.0);
        assert!(tree.has_class(&wrapper, "scrolled-end"));
    }

    #[test]
    fn test_wrappers_sharing_a_region_each_get_the_hint() {
        let (tree, _scheduler, sync) = setup();
        let first = tree.append(tree.root(), &["scroll-wrapper"]);
        let second = tree.append(tree.root(), &["scroll-wrapper"]);
        tree.set_data(first, "scroll-id", "prices");
        tree.set_data(second, "scroll-id", "prices");
        let region = tree.append(tree.root(), &["table"]);
        tree.set_id(region, "prices");
        tree.set_scroll_metrics(region, ScrollMetrics::new(0.0, 100.0, 200.0));

        let report = sync.synchronize();
        assert_eq!(report.bound, 2);
        assert_eq!(tree.scroll_listener_count(region), 2);

        tree.scroll_region_to(region, 100.0);
        assert!(tree.has_class(&first, "scrolled-end"));
        assert!(tree.has_class(&second, "scrolled-end"));

        let report = sync.synchronize();
        assert_eq!(report.bound, 0);
        assert_eq!(report.already_bound, 2);
    }

    #[test]
    fn test_rerendered_wrapper_keeps_named_region() {
        let (tree, _scheduler, sync) = setup();
        let region = tree.append(tree.root(), &["table"]);
        tree.set_id(region, "prices");
        tree.set_scroll_metrics(region, ScrollMetrics::new(0.0, 100.0, 200.0));
        let old_wrapper = tree.append(tree.root(), &["scroll-wrapper"]);
        tree.set_data(old_wrapper, "scroll-id", "prices");
        sync.synchronize();

        tree.remove(old_wrapper);
        let new_wrapper = tree.append(tree.root(), &["scroll-wrapper"]);
        tree.set_data(new_wrapper, "scroll-id", "prices");

        let report = sync.synchronize();
        assert_eq!(
            report,
            SyncReport {
                wrappers: 1,
                bound: 1,
                already_bound: 0,
                failed: 0,
                skipped: 0,
            }
        );

        tree.scroll_region_to(region, 100.0);
        assert!(tree.has_class(&new_wrapper, "scrolled-end"));
    }

    #[test]
    fn test_failed_bind_still_schedules_check_and_retries() {
        let (tree, scheduler, sync) = setup();
        let (wrapper, region) = nested_region(&tree, ScrollMetrics::new(0.0, 300.0, 280.0));
        tree.reject_listeners("scroll");

        let report = sync.synchronize();
        assert_eq!(report.failed, 1);
        assert_eq!(report.bound, 0);

        assert_eq!(scheduler.advance(SETTLE), 1);
        assert!(tree.has_class(&wrapper, "scrolled-end"));

        // Nothing was recorded, so the next pass tries again.
        let report = sync.synchronize();
        assert_eq!(report.failed, 1);
        assert_eq!(report.already_bound, 0);
        assert_eq!(tree.scroll_listener_count(region), 0);
    }
}
