//! `setTimeout` / `requestAnimationFrame` scheduler.
//!
//! Each task is a one-shot JS closure. Firing removes the task from the
//! pending table and forwards a [`Fired`] to the sink installed with
//! [`BrowserScheduler::set_sink`].

use folio_core::{Fired, Scheduler, TaskHandle, TaskKind};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Performance, Window};

/// Receives fired tasks.
pub type FiredSink = Rc<RefCell<Option<Box<dyn FnMut(Fired)>>>>;

#[derive(Debug, Clone, Copy)]
enum JsTask {
    Timeout(i32),
    Frame(i32),
}

/// Scheduler over the browser event loop.
pub struct BrowserScheduler {
    window: Window,
    performance: Performance,
    next_id: u64,
    pending: Rc<RefCell<HashMap<TaskHandle, JsTask>>>,
    sink: FiredSink,
}

impl BrowserScheduler {
    /// Create a scheduler bound to `window`.
    pub fn new(window: Window) -> Result<Self, JsValue> {
        let performance = window.performance().ok_or("No performance clock")?;
        Ok(Self {
            window,
            performance,
            next_id: 1,
            pending: Rc::new(RefCell::new(HashMap::new())),
            sink: Rc::new(RefCell::new(None)),
        })
    }

    /// Install the receiver for fired tasks, replacing any previous one.
    pub fn set_sink(&self, sink: impl FnMut(Fired) + 'static) {
        *self.sink.borrow_mut() = Some(Box::new(sink));
    }

    /// Number of outstanding tasks.
    pub fn pending_count(&self) -> usize {
        self.pending.borrow().len()
    }

    fn next_handle(&mut self) -> TaskHandle {
        let handle = TaskHandle::new(self.next_id);
        self.next_id += 1;
        handle
    }

    fn deliver(
        pending: &Rc<RefCell<HashMap<TaskHandle, JsTask>>>,
        sink: &FiredSink,
        fired: Fired,
    ) {
        if pending.borrow_mut().remove(&fired.handle).is_none() {
            return;
        }
        // Take the sink out while it runs so it may schedule more work.
        let taken = sink.borrow_mut().take();
        if let Some(mut f) = taken {
            f(fired);
            let mut slot = sink.borrow_mut();
            if slot.is_none() {
                *slot = Some(f);
            }
        }
    }
}

impl Scheduler for BrowserScheduler {
    fn schedule_after(&mut self, delay_ms: u32) -> TaskHandle {
        let handle = self.next_handle();
        let pending = Rc::clone(&self.pending);
        let sink = Rc::clone(&self.sink);
        let performance = self.performance.clone();

        let callback = Closure::once_into_js(move || {
            let fired = Fired {
                handle,
                kind: TaskKind::Timer,
                at: performance.now(),
            };
            Self::deliver(&pending, &sink, fired);
        });

        let delay = i32::try_from(delay_ms).unwrap_or(i32::MAX);
        match self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), delay)
        {
            Ok(id) => {
                self.pending.borrow_mut().insert(handle, JsTask::Timeout(id));
            }
            Err(e) => web_sys::console::error_2(&"folio: setTimeout failed".into(), &e),
        }
        handle
    }

    fn schedule_next_frame(&mut self) -> TaskHandle {
        let handle = self.next_handle();
        let pending = Rc::clone(&self.pending);
        let sink = Rc::clone(&self.sink);

        let callback = Closure::once_into_js(move |timestamp: f64| {
            let fired = Fired {
                handle,
                kind: TaskKind::Frame,
                at: timestamp,
            };
            Self::deliver(&pending, &sink, fired);
        });

        match self
            .window
            .request_animation_frame(callback.unchecked_ref())
        {
            Ok(id) => {
                self.pending.borrow_mut().insert(handle, JsTask::Frame(id));
            }
            Err(e) => web_sys::console::error_2(&"folio: requestAnimationFrame failed".into(), &e),
        }
        handle
    }

    fn cancel(&mut self, handle: TaskHandle) {
        let Some(task) = self.pending.borrow_mut().remove(&handle) else {
            return;
        };
        match task {
            JsTask::Timeout(id) => self.window.clear_timeout_with_handle(id),
            JsTask::Frame(id) => {
                if let Err(e) = self.window.cancel_animation_frame(id) {
                    web_sys::console::warn_2(&"folio: cancelAnimationFrame failed".into(), &e);
                }
            }
        }
    }

    fn now(&self) -> f64 {
        self.performance.now()
    }
}

impl std::fmt::Debug for BrowserScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrowserScheduler")
            .field("next_id", &self.next_id)
            .field("pending", &self.pending.borrow().len())
            .finish_non_exhaustive()
    }
}
