//! Document contract for tabs

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TabOptions {
    /// Class shared by all tab buttons
    pub button_class: String,
    /// Class shared by all tab panels
    pub panel_class: String,
    /// Class toggled on the active button and panel
    pub active_class: String,
    /// Data attribute holding a button's key (`data-<name>`)
    pub key_attribute: String,
    /// Panel id is this prefix followed by the key
    pub panel_id_prefix: String,
    /// Class of the navigation bar kept in view on switch
    pub nav_class: String,
    /// Inline animation applied to a panel on every activation
    pub entry_animation: String,
}

impl Default for TabOptions {
    fn default() -> Self {
        Self {
            button_class: "tab-btn".to_string(),
            panel_class: "tab-panel".to_string(),
            active_class: "active".to_string(),
            key_attribute: "tab".to_string(),
            panel_id_prefix: "tab-".to_string(),
            nav_class: "tab-nav".to_string(),
            entry_animation: "fadeIn 0.25s ease forwards".to_string(),
        }
    }
}
