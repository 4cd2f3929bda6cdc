//! Key commands
//!
//! Maps host key names (`KeyboardEvent.key`) onto the handful of keys the
//! tab group reacts to. Everything else is left to the browser.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyCommand {
    /// Focus the next button
    Next,
    /// Focus the previous button
    Previous,
    /// Activate the focused button
    Commit,
}

impl KeyCommand {
    /// Parse a key name; `None` for keys the tab group ignores.
    pub fn parse(key: &str) -> Option<Self> {
        match key {
            "ArrowRight" | "Right" => Some(KeyCommand::Next),
            "ArrowLeft" | "Left" => Some(KeyCommand::Previous),
            "Enter" | " " | "Spacebar" => Some(KeyCommand::Commit),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            KeyCommand::Next => "next",
            KeyCommand::Previous => "previous",
            KeyCommand::Commit => "commit",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_arrows() {
        assert_eq!(KeyCommand::parse("ArrowRight"), Some(KeyCommand::Next));
        assert_eq!(KeyCommand::parse("ArrowLeft"), Some(KeyCommand::Previous));
        // Legacy Edge names
        assert_eq!(KeyCommand::parse("Right"), Some(KeyCommand::Next));
        assert_eq!(KeyCommand::parse("Left"), Some(KeyCommand::Previous));
    }

    #[test]
    fn test_parse_commit() {
        assert_eq!(KeyCommand::parse("Enter"), Some(KeyCommand::Commit));
        assert_eq!(KeyCommand::parse(" "), Some(KeyCommand::Commit));
        assert_eq!(KeyCommand::parse("Spacebar"), Some(KeyCommand::Commit));
    }

    #[test]
    fn test_ignored_keys() {
        assert!(KeyCommand::parse("Tab").is_none());
        assert!(KeyCommand::parse("ArrowDown").is_none());
        assert!(KeyCommand::parse("enter").is_none());
        assert!(KeyCommand::parse("").is_none());
    }
}
