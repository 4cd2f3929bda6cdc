//! Focus resolution
//!
//! Given a key, the index of the focused button (if focus is on one) and
//! the number of buttons, decide what the tab group does.

use crate::command::KeyCommand;

/// Outcome of a key press inside the tab group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusResolution {
    /// Move focus to the button at this index; event consumed
    MoveFocus(usize),
    /// Activate the button at this index; event consumed
    Activate(usize),
    /// Leave the event alone
    Ignore,
}

impl FocusResolution {
    /// Whether the host should suppress the event's default action.
    pub fn consumes_event(&self) -> bool {
        !matches!(self, FocusResolution::Ignore)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FocusResolver;

impl FocusResolver {
    pub fn new() -> Self {
        Self
    }

    /// Resolve a raw key name.
    pub fn resolve_key(&self, key: &str, focused: Option<usize>, count: usize) -> FocusResolution {
        match KeyCommand::parse(key) {
            Some(command) => self.resolve(command, focused, count),
            None => FocusResolution::Ignore,
        }
    }

    pub fn resolve(
        &self,
        command: KeyCommand,
        focused: Option<usize>,
        count: usize,
    ) -> FocusResolution {
        // Focus outside the group, or a stale index: nothing to do.
        let Some(index) = focused.filter(|&i| i < count) else {
            return FocusResolution::Ignore;
        };

        let resolution = match command {
            KeyCommand::Next if index + 1 < count => FocusResolution::MoveFocus(index + 1),
            KeyCommand::Previous if index > 0 => FocusResolution::MoveFocus(index - 1),
            KeyCommand::Commit => FocusResolution::Activate(index),
            _ => FocusResolution::Ignore,
        };

        tracing::trace!(command = command.as_str(), index, ?resolution, "Resolved key");

        resolution
    }
}
