//! `ViewTree` over the live document

use std::rc::Rc;

use tabpane_core::{DomError, KeyListener, Listener, ScrollMetrics, ViewTree};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    AddEventListenerOptions, Document, Element, HtmlCollection, HtmlElement, KeyboardEvent,
    ScrollBehavior, ScrollToOptions, Window,
};

type Result<T> = std::result::Result<T, DomError>;

fn host_error(value: JsValue) -> DomError {
    DomError::Host(
        value
            .as_string()
            .unwrap_or_else(|| format!("{:?}", value)),
    )
}

fn collect(collection: HtmlCollection) -> Vec<Element> {
    (0..collection.length())
        .filter_map(|i| collection.item(i))
        .collect()
}

pub struct WebTree {
    window: Window,
    document: Document,
}

impl WebTree {
    pub fn new(window: Window, document: Document) -> Self {
        Self { window, document }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    fn listen(&self, target: &web_sys::EventTarget, event: &str, listener: Listener) -> Result<()> {
        let closure = Closure::<dyn Fn()>::new(move || listener());
        target
            .add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())
            .map_err(host_error)?;
        // Listeners live as long as the page.
        closure.forget();
        Ok(())
    }
}

impl ViewTree for WebTree {
    type Node = Element;

    fn query_all(&self, class: &str) -> Vec<Element> {
        collect(self.document.get_elements_by_class_name(class))
    }

    fn query_descendant(&self, root: &Element, class: &str) -> Option<Element> {
        root.get_elements_by_class_name(class).item(0)
    }

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn data(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(&format!("data-{}", name))
    }

    fn is_connected(&self, node: &Element) -> bool {
        node.is_connected()
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn animation(&self, node: &Element) -> String {
        node.dyn_ref::<HtmlElement>()
            .and_then(|el| el.style().get_property_value("animation").ok())
            .unwrap_or_default()
    }

    fn set_class(&self, node: &Element, class: &str, on: bool) -> Result<()> {
        node.class_list()
            .toggle_with_force(class, on)
            .map(|_| ())
            .map_err(host_error)
    }

    fn set_animation(&self, node: &Element, value: &str) -> Result<()> {
        let Some(el) = node.dyn_ref::<HtmlElement>() else {
            return Ok(());
        };
        el.style()
            .set_property("animation", value)
            .map_err(host_error)
    }

    fn flush_layout(&self, node: &Element) {
        if let Some(el) = node.dyn_ref::<HtmlElement>() {
            // Reading layout forces the pending style change to apply.
            let _ = el.offset_width();
        }
    }

    fn focus(&self, node: &Element) -> Result<()> {
        match node.dyn_ref::<HtmlElement>() {
            Some(el) => el.focus().map_err(host_error),
            None => Ok(()),
        }
    }

    fn bounding_top(&self, node: &Element) -> f64 {
        node.get_bounding_client_rect().top()
    }

    fn offset_height(&self, node: &Element) -> f64 {
        node.dyn_ref::<HtmlElement>()
            .map_or(0.0, |el| f64::from(el.offset_height()))
    }

    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn smooth_scroll_to(&self, top: f64) {
        let options = ScrollToOptions::new();
        options.set_top(top);
        options.set_behavior(ScrollBehavior::Smooth);
        self.window.scroll_to_with_scroll_to_options(&options);
    }

    fn scroll_metrics(&self, node: &Element) -> Option<ScrollMetrics> {
        Some(ScrollMetrics::new(
            f64::from(node.scroll_left()),
            f64::from(node.client_width()),
            f64::from(node.scroll_width()),
        ))
    }

    fn focused(&self) -> Option<Element> {
        self.document.active_element()
    }

    fn is_loading(&self) -> bool {
        self.document.ready_state() == "loading"
    }

    fn on_click(&self, node: &Element, listener: Listener) -> Result<()> {
        self.listen(node, "click", listener)
    }

    fn on_key_down(&self, node: &Element, listener: KeyListener) -> Result<()> {
        let closure = Closure::<dyn Fn(KeyboardEvent)>::new(move |event: KeyboardEvent| {
            if listener(&event.key()) {
                event.prevent_default();
            }
        });
        node.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())
            .map_err(host_error)?;
        closure.forget();
        Ok(())
    }

    fn on_scroll(&self, node: &Element, listener: Listener) -> Result<()> {
        let options = AddEventListenerOptions::new();
        options.set_passive(true);

        let closure = Closure::<dyn Fn()>::new(move || listener());
        node.add_event_listener_with_callback_and_add_event_listener_options(
            "scroll",
            closure.as_ref().unchecked_ref(),
            &options,
        )
        .map_err(host_error)?;
        closure.forget();
        Ok(())
    }

    fn on_content_loaded(&self, listener: Listener) -> Result<()> {
        self.listen(&self.document, "DOMContentLoaded", listener)
    }
}

/// Shared handle used by the entry point and the pane.
pub fn web_tree() -> Option<Rc<WebTree>> {
    let window = web_sys::window()?;
    let document = window.document()?;
    Some(Rc::new(WebTree::new(window, document)))
}
