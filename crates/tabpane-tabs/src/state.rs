//! Tab State
//!
//! ```text
//! Inactive ──activate──▶ Active
//!    ▲                     │
//!    └────── another ──────┘
//! ```
//!
//! Panels additionally carry an animation marker that is cleared on every
//! deactivation and restarted on every activation.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TabState {
    /// Button highlighted, panel visible
    Active,
    /// Button plain, panel hidden
    Inactive,
}

impl TabState {
    pub fn from_flag(active: bool) -> Self {
        if active {
            TabState::Active
        } else {
            TabState::Inactive
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, TabState::Active)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimationState {
    /// No inline animation
    Idle,
    /// Entry animation applied
    Playing,
}

impl AnimationState {
    pub fn from_inline(animation: &str) -> Self {
        if animation.trim().is_empty() {
            AnimationState::Idle
        } else {
            AnimationState::Playing
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AnimationState::Idle => "idle",
            AnimationState::Playing => "playing",
        }
    }
}

impl std::fmt::Display for AnimationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_from_flag() {
        assert!(TabState::from_flag(true).is_active());
        assert_eq!(TabState::from_flag(false), TabState::Inactive);
    }

    #[test]
    fn test_animation_from_inline_style() {
        assert_eq!(AnimationState::from_inline(""), AnimationState::Idle);
        assert_eq!(AnimationState::from_inline("  "), AnimationState::Idle);
        assert_eq!(
            AnimationState::from_inline("fadeIn 0.25s ease forwards"),
            AnimationState::Playing
        );
        assert_eq!(AnimationState::Playing.to_string(), "playing");
    }
}
