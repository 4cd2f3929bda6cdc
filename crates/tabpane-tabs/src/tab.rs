//! Tab key
//!
//! Buttons carry the key in `data-tab`; panels carry it in their id,
//! behind a fixed prefix.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabKey(String);

impl TabKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Id of the panel paired with this key, e.g. `tab-overview`.
    pub fn panel_id(&self, prefix: &str) -> String {
        format!("{}{}", prefix, self.0)
    }
}

impl std::fmt::Display for TabKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TabKey {
    fn from(key: &str) -> Self {
        Self::new(key)
    }
}

impl From<String> for TabKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}
