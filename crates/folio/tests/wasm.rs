//! Browser tests, run with `wasm-pack test --headless --firefox crates/folio`.

#![cfg(target_arch = "wasm32")]

use folio::{
    BrowserScheduler, DomGeometry, DomHost, HostSurface, Rect, RevealOverlay, Scheduler,
    SectionGeometry, Theme, DARK_CLASS,
};
use folio_core::{Color, Point};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn window() -> web_sys::Window {
    web_sys::window().unwrap()
}

fn document() -> web_sys::Document {
    window().document().unwrap()
}

#[wasm_bindgen_test]
fn test_theme_class_toggles_root() {
    let mut host = DomHost::new(window()).unwrap();
    let root = document().document_element().unwrap();

    host.set_theme_class(Theme::Dark);
    assert!(root.class_list().contains(DARK_CLASS));
    host.set_theme_class(Theme::Light);
    assert!(!root.class_list().contains(DARK_CLASS));
}

#[wasm_bindgen_test]
fn test_overlay_created_and_removed() {
    let mut host = DomHost::new(window()).unwrap();
    host.draw_overlay(&RevealOverlay {
        center: Point::new(10.0, 10.0),
        radius: 50.0,
        color: Color::BLACK,
    });
    assert!(document().get_element_by_id("folio-theme-reveal").is_some());

    host.clear_overlay();
    assert!(document().get_element_by_id("folio-theme-reveal").is_none());
}

#[wasm_bindgen_test]
fn test_input_block_restored() {
    let mut host = DomHost::new(window()).unwrap();
    let body = document().body().unwrap();

    host.set_input_blocked(true);
    assert_eq!(
        body.style().get_property_value("pointer-events").unwrap(),
        "none"
    );
    host.set_input_blocked(false);
    assert_eq!(body.style().get_property_value("pointer-events").unwrap(), "");
}

#[wasm_bindgen_test]
fn test_geometry_reads_elements() {
    let doc = document();
    let el: web_sys::HtmlElement = doc.create_element("section").unwrap().dyn_into().unwrap();
    el.set_id("geometry-probe");
    el.style().set_property("height", "200px").unwrap();
    doc.body().unwrap().append_child(&el).unwrap();

    let geometry = DomGeometry::new(doc);
    let bounds = geometry.section_bounds("geometry-probe").unwrap();
    assert!((bounds.bottom - bounds.top - 200.0).abs() < 1.0);
    assert!(geometry.section_bounds("no-such-section").is_none());
    assert!(geometry.element_rect("geometry-probe").is_some_and(|r: Rect| r.height > 199.0));
    el.remove();
}

#[wasm_bindgen_test]
async fn test_scheduler_delivers_and_cancels() {
    let mut scheduler = BrowserScheduler::new(window()).unwrap();
    let fired = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&fired);
    scheduler.set_sink(move |f| sink.borrow_mut().push(f.handle));

    let kept = scheduler.schedule_after(0);
    let dropped = scheduler.schedule_after(0);
    scheduler.cancel(dropped);
    scheduler.cancel(dropped);
    assert_eq!(scheduler.pending_count(), 1);

    // yield to the event loop long enough for the timer to run
    let promise = js_sys::Promise::new(&mut |resolve, _| {
        window()
            .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, 20)
            .unwrap();
    });
    wasm_bindgen_futures::JsFuture::from(promise).await.unwrap();

    assert_eq!(*fired.borrow(), vec![kept]);
    assert_eq!(scheduler.pending_count(), 0);
}
