//! TabPane Scroll Hints
//!
//! A scroll wrapper hosts one horizontally scrollable region and shows a
//! fade while there is more content to the right. The wrapper's
//! `scrolled-end` class tracks whether the region has reached its end.
//!
//! Regions inside hidden panels may not exist until their tab is shown, so
//! binding is a repeatable pass rather than a one-shot setup.

mod hint;
mod options;
mod synchronizer;

pub use hint::reflect_scroll_end;
pub use options::ScrollOptions;
pub use synchronizer::{ScrollHintSynchronizer, SyncReport};
