//! Layout queries against the live document.

use folio_core::{Rect, SectionBounds, SectionGeometry, Size};
use web_sys::{Document, Window};

/// Section and control bounds from `getBoundingClientRect`.
#[derive(Debug, Clone)]
pub struct DomGeometry {
    document: Document,
}

impl DomGeometry {
    /// Query `document`.
    pub const fn new(document: Document) -> Self {
        Self { document }
    }

    /// Viewport-relative rectangle of the element with `id`.
    pub fn element_rect(&self, id: &str) -> Option<Rect> {
        let rect = self.document.get_element_by_id(id)?.get_bounding_client_rect();
        Some(Rect::new(
            rect.left() as f32,
            rect.top() as f32,
            rect.width() as f32,
            rect.height() as f32,
        ))
    }
}

impl SectionGeometry for DomGeometry {
    fn section_bounds(&self, section_id: &str) -> Option<SectionBounds> {
        let rect = self
            .document
            .get_element_by_id(section_id)?
            .get_bounding_client_rect();
        Some(SectionBounds::new(rect.top(), rect.bottom()))
    }
}

/// Inner size of the browser viewport.
pub fn viewport_size(window: &Window) -> Size {
    let dim = |v: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
        v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32
    };
    Size::new(dim(window.inner_width()), dim(window.inner_height()))
}

/// Current vertical scroll offset.
pub fn scroll_y(window: &Window) -> f64 {
    window.scroll_y().unwrap_or(0.0)
}
