//! `setTimeout`-backed scheduler

use std::time::Duration;

use tabpane_core::{Scheduler, Task};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::Window;

pub struct WebScheduler {
    window: Window,
}

impl WebScheduler {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl Scheduler for WebScheduler {
    fn defer(&self, delay: Duration, task: Task) {
        let callback = Closure::once_into_js(move || task());
        let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);

        if let Err(e) = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.unchecked_ref(),
                millis,
            )
        {
            tracing::warn!(error = ?e, "Failed to schedule deferred task");
        }
    }
}
