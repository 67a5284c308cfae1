//! DOM host surface.

use super::style::{has_dark_class, overlay_style, DARK_CLASS, OVERLAY_ID, OVERLAY_Z_INDEX};
use folio_core::{HostSurface, RevealOverlay, Theme};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, HtmlElement, ScrollBehavior, ScrollIntoViewOptions, ScrollToOptions, Window,
};

/// Applies theme, input blocking, overlay and scrolling to the live page.
#[derive(Debug)]
pub struct DomHost {
    window: Window,
    document: Document,
    root: Element,
    body: HtmlElement,
    overlay: Option<HtmlElement>,
}

impl DomHost {
    /// Bind to `window`'s document.
    pub fn new(window: Window) -> Result<Self, JsValue> {
        let document = window.document().ok_or("No document")?;
        let root = document.document_element().ok_or("No root element")?;
        let body = document.body().ok_or("No body")?;
        Ok(Self {
            window,
            document,
            root,
            body,
            overlay: None,
        })
    }

    fn overlay_element(&mut self) -> Result<&HtmlElement, JsValue> {
        if self.overlay.is_none() {
            let el: HtmlElement = self.document.create_element("div")?.dyn_into()?;
            el.set_id(OVERLAY_ID);
            el.set_attribute("aria-hidden", "true")?;
            let style = el.style();
            style.set_property("position", "fixed")?;
            style.set_property("inset", "0")?;
            style.set_property("z-index", OVERLAY_Z_INDEX)?;
            style.set_property("pointer-events", "none")?;
            self.body.append_child(&el)?;
            self.overlay = Some(el);
        }
        self.overlay.as_ref().ok_or_else(|| "overlay missing".into())
    }

    fn try_draw(&mut self, overlay: &RevealOverlay) -> Result<(), JsValue> {
        let css = overlay_style(overlay);
        let style = self.overlay_element()?.style();
        style.set_property("background-color", &css.background)?;
        style.set_property("mask-image", &css.mask)?;
        style.set_property("-webkit-mask-image", &css.mask)?;
        Ok(())
    }
}

fn warn(what: &str, err: &JsValue) {
    web_sys::console::warn_2(&format!("folio: {what} failed").into(), err);
}

impl HostSurface for DomHost {
    fn set_theme_class(&mut self, theme: Theme) {
        if let Err(e) = self
            .root
            .class_list()
            .toggle_with_force(DARK_CLASS, has_dark_class(theme))
        {
            warn("theme class", &e);
        }
    }

    fn set_input_blocked(&mut self, blocked: bool) {
        let style = self.body.style();
        let result = if blocked {
            style.set_property("pointer-events", "none")
        } else {
            style.remove_property("pointer-events").map(drop)
        };
        if let Err(e) = result {
            warn("input block", &e);
        }
    }

    fn draw_overlay(&mut self, overlay: &RevealOverlay) {
        if let Err(e) = self.try_draw(overlay) {
            warn("overlay draw", &e);
        }
    }

    fn clear_overlay(&mut self) {
        if let Some(el) = self.overlay.take() {
            el.remove();
        }
    }

    fn scroll_to_section(&mut self, section_id: &str) {
        let Some(el) = self.document.get_element_by_id(section_id) else {
            return;
        };
        let options = ScrollIntoViewOptions::new();
        options.set_behavior(ScrollBehavior::Smooth);
        el.scroll_into_view_with_scroll_into_view_options(&options);
    }

    fn scroll_to_top(&mut self) {
        let options = ScrollToOptions::new();
        options.set_top(0.0);
        options.set_behavior(ScrollBehavior::Smooth);
        self.window.scroll_to_with_scroll_to_options(&options);
    }
}
