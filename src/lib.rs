/// Query Panel - Chrome side panel that lists and jumps to chat messages
/// Built with Rust + WASM + Yew

mod bridge;
mod config_store;
mod controller;
mod error;
mod extractor;
mod navigator;
mod page;
mod site_rules;
pub mod ui;

use wasm_bindgen::prelude::*;

// Set up panic hook for better error messages in the browser console
#[wasm_bindgen(start)]
pub fn main() {
    console_error_panic_hook::set_once();
    wasm_logger::init(wasm_logger::Config::default());
}

// Start the Yew app for the side panel
#[wasm_bindgen]
pub fn start_side_panel() {
    yew::Renderer::<ui::side_panel::SidePanel>::new().render();
}

// The two exports below run inside the scraped tab, loaded there by
// `runInTab` in sidepanel.js.

/// Scrape elements carrying `class_name` and return `[{text, id}]`.
/// Never throws; any failure gives an empty array.
#[wasm_bindgen]
pub fn scrape_messages(class_name: &str) -> JsValue {
    let records = match page::WebPage::current() {
        Ok(page) => extractor::scrape(&page, class_name, &extractor::PAGE_STAMPS),
        Err(e) => {
            log::debug!("scrape skipped: {}", e);
            Vec::new()
        }
    };

    serde_wasm_bindgen::to_value(&records).unwrap_or_else(|_| js_sys::Array::new().into())
}

/// Scroll to the element stamped with `element_id` and flash it
#[wasm_bindgen]
pub fn reveal_element(element_id: &str) {
    match page::WebPage::current() {
        Ok(page) => {
            navigator::reveal(&page, element_id);
        }
        Err(e) => log::debug!("reveal skipped: {}", e),
    }
}
