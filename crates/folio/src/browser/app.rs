//! WASM application entry point.

use super::geometry::{scroll_y, viewport_size, DomGeometry};
use super::host::DomHost;
use super::scheduler::BrowserScheduler;
use folio_core::{Fired, Site, SiteConfig};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{window, AddEventListenerOptions, Window};

type BrowserSite = Site<BrowserScheduler, DomHost>;

struct Shared {
    site: RefCell<BrowserSite>,
    geometry: DomGeometry,
    on_change: RefCell<Option<js_sys::Function>>,
}

impl Shared {
    fn notify(&self) {
        let Some(callback) = self.on_change.borrow().clone() else {
            return;
        };
        let json = match self.site.try_borrow() {
            Ok(site) => site.snapshot().to_json(),
            Err(_) => return,
        };
        match json {
            Ok(json) => {
                let _ = callback.call1(&JsValue::NULL, &JsValue::from_str(&json));
            }
            Err(e) => web_sys::console::error_1(&format!("folio: snapshot: {e}").into()),
        }
    }

    fn dispatch(&self, fired: Fired) {
        let handled = match self.site.try_borrow_mut() {
            Ok(mut site) => site.dispatch(fired),
            Err(_) => {
                web_sys::console::warn_1(&"folio: site busy, task dropped".into());
                false
            }
        };
        if handled {
            self.notify();
        }
    }
}

/// The site's interactive behavior, driven from JavaScript.
#[wasm_bindgen]
pub struct FolioApp {
    shared: Rc<Shared>,
    window: Window,
    toggle_id: String,
    scroll_callback: Option<Closure<dyn FnMut()>>,
}

#[wasm_bindgen]
impl FolioApp {
    /// Create the app from a YAML manifest (or the built-in site when
    /// `None`). `toggle_id` is the element id of the theme toggle button.
    #[wasm_bindgen(constructor)]
    pub fn new(manifest: Option<String>, toggle_id: &str) -> Result<FolioApp, JsValue> {
        console_error_panic_hook::set_once();

        let config = match manifest {
            Some(yaml) => SiteConfig::from_yaml(&yaml)
                .map_err(|e| JsValue::from_str(&format!("Manifest error: {e}")))?,
            None => SiteConfig::standard(),
        };

        let window = window().ok_or("No window")?;
        let document = window.document().ok_or("No document")?;
        let scheduler = BrowserScheduler::new(window.clone())?;
        let host = DomHost::new(window.clone())?;
        let site = Site::new(&config, scheduler, host)
            .map_err(|e| JsValue::from_str(&format!("Manifest error: {e}")))?;

        let shared = Rc::new(Shared {
            site: RefCell::new(site),
            geometry: DomGeometry::new(document),
            on_change: RefCell::new(None),
        });

        let weak: Weak<Shared> = Rc::downgrade(&shared);
        shared.site.borrow().scheduler().set_sink(move |fired| {
            if let Some(shared) = weak.upgrade() {
                shared.dispatch(fired);
            }
        });

        Ok(Self {
            shared,
            window,
            toggle_id: toggle_id.to_string(),
            scroll_callback: None,
        })
    }

    /// Register a callback receiving the UI snapshot JSON after each change.
    pub fn on_change(&mut self, callback: js_sys::Function) {
        *self.shared.on_change.borrow_mut() = Some(callback);
    }

    /// Apply the initial theme, start typing and follow page scrolls.
    pub fn start(&mut self) -> Result<(), JsValue> {
        self.shared.site.borrow_mut().start();

        if self.scroll_callback.is_none() {
            let shared = Rc::downgrade(&self.shared);
            let window = self.window.clone();
            let cb = Closure::<dyn FnMut()>::new(move || {
                let Some(shared) = shared.upgrade() else {
                    return;
                };
                if let Ok(mut site) = shared.site.try_borrow_mut() {
                    site.scroll_sample(scroll_y(&window), &shared.geometry);
                }
                shared.notify();
            });
            let options = AddEventListenerOptions::new();
            options.set_passive(true);
            self.window
                .add_event_listener_with_callback_and_add_event_listener_options(
                    "scroll",
                    cb.as_ref().unchecked_ref(),
                    &options,
                )?;
            self.scroll_callback = Some(cb);
        }

        // pick up a restored scroll position
        self.scroll();
        Ok(())
    }

    /// Feed the current scroll position.
    pub fn scroll(&self) {
        self.shared
            .site
            .borrow_mut()
            .scroll_sample(scroll_y(&self.window), &self.shared.geometry);
        self.shared.notify();
    }

    /// Flip the theme from the toggle button. Returns whether it was accepted.
    pub fn toggle_theme(&self) -> bool {
        let control = self.shared.geometry.element_rect(&self.toggle_id);
        let viewport = viewport_size(&self.window);
        let outcome = self
            .shared
            .site
            .borrow_mut()
            .request_theme_toggle(control, viewport);
        self.shared.notify();
        outcome != folio_core::ToggleOutcome::Ignored
    }

    /// Scroll to a section and close the mobile menu.
    pub fn navigate(&self, section_id: &str) {
        self.shared.site.borrow_mut().navigate(section_id);
        self.shared.notify();
    }

    /// Open or close the mobile menu.
    pub fn toggle_menu(&self) -> bool {
        let open = self.shared.site.borrow_mut().toggle_menu();
        self.shared.notify();
        open
    }

    /// Scroll back to the top of the page.
    pub fn scroll_to_top(&self) {
        self.shared.site.borrow_mut().scroll_to_top();
        self.shared.notify();
    }

    /// Current UI snapshot as JSON.
    pub fn snapshot(&self) -> Result<String, JsValue> {
        self.shared
            .site
            .borrow()
            .snapshot()
            .to_json()
            .map_err(|e| JsValue::from_str(&format!("Snapshot error: {e}")))
    }

    /// Stop all timers and animations and detach the scroll listener.
    pub fn teardown(&mut self) {
        if let Some(cb) = self.scroll_callback.take() {
            let _ = self
                .window
                .remove_event_listener_with_callback("scroll", cb.as_ref().unchecked_ref());
        }
        self.shared.site.borrow_mut().teardown();
        self.shared.on_change.borrow_mut().take();
    }
}

impl Drop for FolioApp {
    fn drop(&mut self) {
        self.teardown();
    }
}
