//! Cancelable task scheduling for timer- and frame-driven components.
//!
//! Components never hold callbacks. They ask a [`Scheduler`] for a
//! [`TaskHandle`], remember it in a [`TaskSlot`], and react when the runtime
//! later delivers a [`Fired`] notification carrying that handle. A delivery
//! whose handle is not the one currently held is stale and ignored, so a
//! canceled or superseded task can never mutate state.

use serde::Serialize;
use std::collections::BTreeMap;

/// Default frame interval of [`ManualScheduler`] (60 Hz).
pub const DEFAULT_FRAME_INTERVAL_MS: f64 = 1000.0 / 60.0;

/// Opaque identifier of a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TaskHandle(u64);

impl TaskHandle {
    /// Wrap a raw id. Schedulers are responsible for uniqueness.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Raw id.
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

/// What kind of suspension a task represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TaskKind {
    /// Fires once after a delay
    Timer,
    /// Fires once on the next display refresh
    Frame,
}

/// Notification that a scheduled task came due.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fired {
    /// Handle returned when the task was scheduled
    pub handle: TaskHandle,
    /// Timer or frame
    pub kind: TaskKind,
    /// Monotonic timestamp of delivery in milliseconds
    pub at: f64,
}

/// Clock and task scheduler collaborator.
pub trait Scheduler {
    /// Schedule a one-shot timer `delay_ms` from now.
    fn schedule_after(&mut self, delay_ms: u32) -> TaskHandle;

    /// Schedule a one-shot callback on the next display frame.
    fn schedule_next_frame(&mut self) -> TaskHandle;

    /// Cancel a task. Canceling a fired, canceled or unknown handle is a no-op.
    fn cancel(&mut self, handle: TaskHandle);

    /// Monotonic time in milliseconds.
    fn now(&self) -> f64;
}

// =============================================================================
// TaskSlot - at most one outstanding task per component
// =============================================================================

/// Holds the single pending task of a component.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TaskSlot {
    pending: Option<TaskHandle>,
}

impl TaskSlot {
    /// Empty slot.
    #[must_use]
    pub const fn new() -> Self {
        Self { pending: None }
    }

    /// Currently pending handle.
    #[must_use]
    pub const fn pending(&self) -> Option<TaskHandle> {
        self.pending
    }

    /// Whether a task is outstanding.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Store `handle`, canceling whatever was pending before.
    pub fn replace(&mut self, scheduler: &mut dyn Scheduler, handle: TaskHandle) {
        if let Some(previous) = self.pending.replace(handle) {
            scheduler.cancel(previous);
        }
    }

    /// Consume a delivery. Returns `true` only if `handle` is the pending one.
    pub fn claim(&mut self, handle: TaskHandle) -> bool {
        if self.pending == Some(handle) {
            self.pending = None;
            true
        } else {
            false
        }
    }

    /// Cancel the pending task, if any. Idempotent.
    pub fn cancel(&mut self, scheduler: &mut dyn Scheduler) {
        if let Some(handle) = self.pending.take() {
            scheduler.cancel(handle);
        }
    }
}

// =============================================================================
// ManualScheduler - deterministic virtual clock
// =============================================================================

#[derive(Debug, Clone, Copy)]
struct ScheduledTask {
    kind: TaskKind,
    due: f64,
}

/// Scheduler driven by an explicit virtual clock.
///
/// Nothing fires on its own: callers step time with [`pop_due`] (one task at
/// a time, so a delivery may schedule follow-up work inside the same window)
/// and then [`settle`] the clock.
///
/// [`pop_due`]: ManualScheduler::pop_due
/// [`settle`]: ManualScheduler::settle
#[derive(Debug)]
pub struct ManualScheduler {
    now_ms: f64,
    frame_interval_ms: f64,
    next_id: u64,
    tasks: BTreeMap<TaskHandle, ScheduledTask>,
    canceled: u64,
}

impl Default for ManualScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualScheduler {
    /// Create a scheduler at time zero with a 60 Hz frame interval.
    #[must_use]
    pub fn new() -> Self {
        Self {
            now_ms: 0.0,
            frame_interval_ms: DEFAULT_FRAME_INTERVAL_MS,
            next_id: 1,
            tasks: BTreeMap::new(),
            canceled: 0,
        }
    }

    /// Set the spacing between display frames.
    #[must_use]
    pub fn with_frame_interval(mut self, interval_ms: f64) -> Self {
        self.frame_interval_ms = interval_ms.max(f64::EPSILON);
        self
    }

    /// Change the frame interval for frames scheduled from now on.
    pub fn set_frame_interval(&mut self, interval_ms: f64) {
        self.frame_interval_ms = interval_ms.max(f64::EPSILON);
    }

    /// Number of outstanding tasks.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.tasks.len()
    }

    /// Whether `handle` is still outstanding.
    #[must_use]
    pub fn is_pending(&self, handle: TaskHandle) -> bool {
        self.tasks.contains_key(&handle)
    }

    /// Number of cancel calls that removed a live task.
    #[must_use]
    pub const fn canceled_count(&self) -> u64 {
        self.canceled
    }

    /// Due time of the earliest outstanding task.
    #[must_use]
    pub fn next_due(&self) -> Option<f64> {
        self.tasks.values().map(|t| t.due).reduce(f64::min)
    }

    /// Remove and return the earliest task due at or before `until`,
    /// moving the clock to its due time. Ties fire in scheduling order.
    pub fn pop_due(&mut self, until: f64) -> Option<Fired> {
        let (&handle, task) = self
            .tasks
            .iter()
            .filter(|(_, t)| t.due <= until)
            .min_by(|(ha, a), (hb, b)| a.due.total_cmp(&b.due).then(ha.cmp(hb)))?;
        let task = *task;
        self.tasks.remove(&handle);
        self.now_ms = self.now_ms.max(task.due);
        Some(Fired {
            handle,
            kind: task.kind,
            at: self.now_ms,
        })
    }

    /// Move the clock forward to `until` (never backwards).
    pub fn settle(&mut self, until: f64) {
        self.now_ms = self.now_ms.max(until);
    }

    fn insert(&mut self, kind: TaskKind, due: f64) -> TaskHandle {
        let handle = TaskHandle::new(self.next_id);
        self.next_id += 1;
        self.tasks.insert(handle, ScheduledTask { kind, due });
        handle
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_after(&mut self, delay_ms: u32) -> TaskHandle {
        let due = self.now_ms + f64::from(delay_ms);
        self.insert(TaskKind::Timer, due)
    }

    fn schedule_next_frame(&mut self) -> TaskHandle {
        let due = self.now_ms + self.frame_interval_ms;
        self.insert(TaskKind::Frame, due)
    }

    fn cancel(&mut self, handle: TaskHandle) {
        if self.tasks.remove(&handle).is_some() {
            self.canceled += 1;
        }
    }

    fn now(&self) -> f64 {
        self.now_ms
    }
}
