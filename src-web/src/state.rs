//! Page state and the exported entry points

use std::cell::RefCell;
use std::rc::Rc;

use tabpane_core::{Config, TabPane};
use wasm_bindgen::prelude::*;

use crate::dom::{web_tree, WebTree};
use crate::logging::{init_logging, install_panic_hook};
use crate::timer::WebScheduler;
use crate::CONFIG_ELEMENT_ID;

type WebPane = TabPane<WebTree, WebScheduler>;

thread_local! {
    static PANE: RefCell<Option<WebPane>> = const { RefCell::new(None) };
}

/// Read the optional JSON override from the page.
fn load_config(tree: &WebTree) -> tabpane_core::Result<Config> {
    match tree
        .document()
        .get_element_by_id(CONFIG_ELEMENT_ID)
        .and_then(|el| el.text_content())
    {
        Some(text) => Config::from_json(&text),
        None => Ok(Config::default()),
    }
}

/// Make `pane.activate` callable as `window[<entry_point>](key)`.
fn expose_entry_point(tree: &WebTree, pane: &WebPane) -> Result<(), JsValue> {
    let target = pane.clone();
    let entry = Closure::<dyn Fn(String)>::new(move |key: String| target.activate(key));

    js_sys::Reflect::set(
        tree.window(),
        &JsValue::from_str(&pane.config().entry_point),
        entry.as_ref(),
    )?;
    entry.forget();
    Ok(())
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    install_panic_hook();

    let Some(tree) = web_tree() else {
        return Err(JsValue::from_str("tabpane: no window or document"));
    };

    let config = match load_config(&tree) {
        Ok(config) => {
            init_logging(&config.log_level);
            config
        }
        Err(e) => {
            let config = Config::default();
            init_logging(&config.log_level);
            tracing::warn!(error = %e, "Ignoring invalid tab pane configuration");
            config
        }
    };

    let scheduler = Rc::new(WebScheduler::new(tree.window().clone()));
    let pane = TabPane::new(Rc::clone(&tree), scheduler, config);

    let mounted = pane.mount();
    PANE.with(|slot| *slot.borrow_mut() = Some(pane.clone()));
    expose_entry_point(&tree, &pane)?;

    tracing::info!(
        entry_point = %pane.config().entry_point,
        failures = mounted.failures,
        "Tab pane started"
    );

    Ok(())
}

/// Switch tabs from JavaScript through the module export.
#[wasm_bindgen]
pub fn activate(key: &str) {
    PANE.with(|slot| match slot.borrow().as_ref() {
        Some(pane) => pane.activate(key),
        None => tracing::warn!(key, "Tab pane not started"),
    });
}
