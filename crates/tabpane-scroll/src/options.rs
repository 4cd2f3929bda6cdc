//! Document contract for scroll hints

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollOptions {
    pub wrapper_class: String,
    /// Fallback region lookup: first descendant of the wrapper with this class
    pub container_class: String,
    /// Data attribute on the wrapper naming its region's id
    pub scroll_id_attribute: String,
    /// Class toggled on the wrapper while its region is at the end
    pub scrolled_end_class: String,
    /// Sub-pixel rounding allowance for end detection
    pub end_tolerance_px: f64,
    /// Delay before the first recomputation after a pass
    pub settle_delay_ms: u64,
}

impl Default for ScrollOptions {
    fn default() -> Self {
        Self {
            wrapper_class: "scroll-wrapper".to_string(),
            container_class: "scroll-container".to_string(),
            scroll_id_attribute: "scroll-id".to_string(),
            scrolled_end_class: "scrolled-end".to_string(),
            end_tolerance_px: 4.0,
            settle_delay_ms: 50,
        }
    }
}
