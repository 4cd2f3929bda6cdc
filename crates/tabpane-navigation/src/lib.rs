//! TabPane Keyboard Navigation
//!
//! Roving focus across the tab buttons:
//! - `ArrowRight` / `ArrowLeft` move focus to the neighbouring button
//! - `Enter` / `Space` activate the focused button
//!
//! Focus never wraps around the ends of the group.

mod command;
mod input;

pub use command::KeyCommand;
pub use input::{FocusResolution, FocusResolver};
