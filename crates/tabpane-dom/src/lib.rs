//! TabPane Host Layer
//!
//! Everything the tab controller knows about the page goes through
//! [`ViewTree`], and everything it defers goes through [`Scheduler`].
//! The browser binding implements both over `web-sys`; [`MemoryTree`] and
//! [`ManualScheduler`] implement them in memory for tests and headless use.

mod error;
mod memory;
mod timer;
mod tree;

pub use error::DomError;
pub use memory::{MemoryTree, NodeId};
pub use timer::{ManualScheduler, Scheduler, Task};
pub use tree::{KeyListener, Listener, ScrollMetrics, ViewTree};

pub type Result<T> = std::result::Result<T, DomError>;
