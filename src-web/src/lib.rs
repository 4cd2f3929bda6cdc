//! TabPane - Browser Binding
//!
//! Runs the tab pane against the live page:
//! - `WebTree` implements the view tree over `web-sys`
//! - `WebScheduler` defers work with `setTimeout`
//! - on start, the pane is mounted and `window.ortoCareActivateTab(key)` exposed
//!
//! Only compiled on `wasm32` targets.

#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod logging;
#[cfg(target_arch = "wasm32")]
mod state;
#[cfg(target_arch = "wasm32")]
mod timer;

#[cfg(target_arch = "wasm32")]
pub use state::activate;

/// Id of the optional `<script type="application/json">` element holding a
/// configuration override.
pub const CONFIG_ELEMENT_ID: &str = "tabpane-config";
