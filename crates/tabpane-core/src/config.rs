//! TabPane configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use tabpane_scroll::ScrollOptions;
use tabpane_tabs::TabOptions;

use crate::error::CoreError;
use crate::Result;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Tab buttons, panels and navigation bar
    pub tabs: TabOptions,
    /// Scroll wrappers and their regions
    pub scroll: ScrollOptions,
    /// Class of the element receiving key-downs for the tab group
    pub keyboard_scope_class: String,
    /// Delay between an activation and its scroll-hint pass
    pub resync_delay_ms: u64,
    /// Name of the global activation function
    pub entry_point: String,
    /// Default log level when `RUST_LOG` is not set
    pub log_level: String,
}

impl Config {
    /// Parse a (possibly partial) JSON override of the defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let required = [
            ("tabs.button_class", &self.tabs.button_class),
            ("tabs.panel_class", &self.tabs.panel_class),
            ("tabs.active_class", &self.tabs.active_class),
            ("tabs.key_attribute", &self.tabs.key_attribute),
            ("scroll.wrapper_class", &self.scroll.wrapper_class),
            ("scroll.scrolled_end_class", &self.scroll.scrolled_end_class),
            ("entry_point", &self.entry_point),
        ];

        if let Some((name, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
            return Err(CoreError::Config(format!("{} must not be empty", name)));
        }

        if !self.scroll.end_tolerance_px.is_finite() || self.scroll.end_tolerance_px < 0.0 {
            return Err(CoreError::Config(
                "scroll.end_tolerance_px must be a non-negative number".to_string(),
            ));
        }

        Ok(())
    }

    pub fn resync_delay(&self) -> Duration {
        Duration::from_millis(self.resync_delay_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tabs: TabOptions::default(),
            scroll: ScrollOptions::default(),
            keyboard_scope_class: "tab-nav-inner".to_string(),
            resync_delay_ms: 80,
            entry_point: "ortoCareActivateTab".to_string(),
            log_level: "info".to_string(),
        }
    }
}
