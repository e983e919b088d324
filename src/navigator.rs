/// Scroll-to-message for the in-page side

use crate::page::{PageDom, PageElement};

pub const HIGHLIGHT_COLOR: &str = "#ffffcc";
pub const HIGHLIGHT_TRANSITION: &str = "background-color 0.5s";
pub const HIGHLIGHT_MS: i32 = 1500;

/// Bring the element stamped with `id` into view and flash its background.
///
/// Returns whether an element was found. Unknown ids leave the page alone.
pub fn reveal<D: PageDom>(page: &D, id: &str) -> bool {
    let Some(element) = page.element_by_id(id) else {
        log::debug!("no element with id {}", id);
        return false;
    };

    element.scroll_to_center();
    element.set_style_property("transition", HIGHLIGHT_TRANSITION);

    let original = element.style_property("background-color");
    element.set_style_property("background-color", HIGHLIGHT_COLOR);

    page.after(
        HIGHLIGHT_MS,
        Box::new(move || element.set_style_property("background-color", &original)),
    );
    true
}
