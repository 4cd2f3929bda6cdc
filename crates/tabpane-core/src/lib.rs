//! TabPane Core
//!
//! Wires the tab controller, keyboard navigation and scroll hints together
//! behind a single entry point. Every activation, whatever triggered it,
//! is followed by a scroll-hint pass once the new panel has laid out.

mod config;
mod error;
mod pane;

pub use config::Config;
pub use error::CoreError;
pub use pane::{Mounted, TabPane};

// Re-export core components
pub use tabpane_dom::{
    DomError, KeyListener, Listener, ManualScheduler, MemoryTree, NodeId, Scheduler,
    ScrollMetrics, Task, ViewTree,
};
pub use tabpane_navigation::{FocusResolution, FocusResolver, KeyCommand};
pub use tabpane_scroll::{ScrollHintSynchronizer, ScrollOptions, SyncReport};
pub use tabpane_tabs::{Activation, AnimationState, TabController, TabKey, TabOptions, TabState};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Log filter from `RUST_LOG`, falling back to `default_level`.
pub fn env_filter(default_level: &str) -> tracing_subscriber::EnvFilter {
    use tracing_subscriber::EnvFilter;

    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Initialize logging to stdout. Later calls are ignored.
pub fn init_logging(default_level: &str) {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_env_filter(env_filter(default_level))
        .with_target(true)
        .try_init();
}
