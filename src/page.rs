/// The slice of the DOM that the in-page scraper and navigator touch
use thiserror::Error;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{
    Document, HtmlElement, ScrollBehavior, ScrollIntoViewOptions, ScrollLogicalPosition, Window,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("page error: {0}")]
pub struct PageError(pub String);

/// An element in the target page
pub trait PageElement: Clone + 'static {
    /// Rendered (post-layout) text, as `innerText` reports it
    fn rendered_text(&self) -> String;

    fn set_id(&self, id: &str);

    /// Smooth-scroll so the element sits in the middle of the viewport
    fn scroll_to_center(&self);

    /// Inline style value, empty when unset
    fn style_property(&self, name: &str) -> String;

    fn set_style_property(&self, name: &str, value: &str);
}

/// A target document plus the timer of its window
pub trait PageDom {
    type Element: PageElement;

    /// Elements matching `selector`, in document order
    fn select_all(&self, selector: &str) -> Result<Vec<Self::Element>, PageError>;

    fn element_by_id(&self, id: &str) -> Option<Self::Element>;

    /// Milliseconds since the epoch
    fn now_ms(&self) -> u64;

    /// Run `task` once after `delay_ms`
    fn after(&self, delay_ms: i32, task: Box<dyn FnOnce()>);
}

/// The live document of the window this module was loaded into
pub struct WebPage {
    window: Window,
    document: Document,
}

impl WebPage {
    pub fn current() -> Result<WebPage, PageError> {
        let window = web_sys::window().ok_or_else(|| PageError("no window".to_string()))?;
        let document = window
            .document()
            .ok_or_else(|| PageError("no document".to_string()))?;
        Ok(WebPage { window, document })
    }
}

impl PageDom for WebPage {
    type Element = HtmlElement;

    fn select_all(&self, selector: &str) -> Result<Vec<HtmlElement>, PageError> {
        let nodes = self
            .document
            .query_selector_all(selector)
            .map_err(|e| PageError(format!("bad selector {}: {:?}", selector, e)))?;

        // Only HTML elements carry innerText; SVG matches are dropped
        Ok((0..nodes.length())
            .filter_map(|i| nodes.item(i))
            .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
            .collect())
    }

    fn element_by_id(&self, id: &str) -> Option<HtmlElement> {
        self.document
            .get_element_by_id(id)
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    }

    fn now_ms(&self) -> u64 {
        js_sys::Date::now() as u64
    }

    fn after(&self, delay_ms: i32, task: Box<dyn FnOnce()>) {
        let callback = Closure::once_into_js(move || task());
        if let Err(e) = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                callback.unchecked_ref(),
                delay_ms,
            )
        {
            log::warn!("setTimeout failed: {:?}", e);
        }
    }
}

impl PageElement for HtmlElement {
    fn rendered_text(&self) -> String {
        self.inner_text()
    }

    fn set_id(&self, id: &str) {
        web_sys::Element::set_id(self, id);
    }

    fn scroll_to_center(&self) {
        let options = ScrollIntoViewOptions::new();
        options.set_behavior(ScrollBehavior::Smooth);
        options.set_block(ScrollLogicalPosition::Center);
        self.scroll_into_view_with_scroll_into_view_options(&options);
    }

    fn style_property(&self, name: &str) -> String {
        self.style().get_property_value(name).unwrap_or_default()
    }

    fn set_style_property(&self, name: &str, value: &str) {
        if let Err(e) = self.style().set_property(name, value) {
            log::warn!("could not set {}: {:?}", name, e);
        }
    }
}
