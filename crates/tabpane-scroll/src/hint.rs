use tabpane_dom::ViewTree;

use crate::options::ScrollOptions;

/// Recompute whether `region` is scrolled to its end and mirror it onto
/// `wrapper`. Returns the new flag, or `None` if the region has no scroll
/// geometry.
pub fn reflect_scroll_end<T: ViewTree>(
    tree: &T,
    wrapper: &T::Node,
    region: &T::Node,
    options: &ScrollOptions,
) -> Option<bool> {
    let metrics = tree.scroll_metrics(region)?;
    let at_end = metrics.is_at_end(options.end_tolerance_px);

    if let Err(e) = tree.set_class(wrapper, &options.scrolled_end_class, at_end) {
        tracing::warn!(error = %e, "Failed to update scroll hint");
    }

    Some(at_end)
}
