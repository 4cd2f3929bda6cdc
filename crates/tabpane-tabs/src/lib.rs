//! TabPane Tab Activation
//!
//! A tab is a button/panel pair sharing a key. Exactly one pair is active
//! at a time; switching always passes through a moment with none active,
//! never one with two.

mod controller;
mod error;
mod options;
mod state;
mod tab;

pub use controller::{Activation, TabController};
pub use error::TabError;
pub use options::TabOptions;
pub use state::{AnimationState, TabState};
pub use tab::TabKey;

pub type Result<T> = std::result::Result<T, TabError>;
