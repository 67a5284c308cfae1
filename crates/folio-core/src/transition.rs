//! Animated circular-reveal theme switch.
//!
//! The theme flips the instant a toggle is accepted. A full-viewport overlay
//! in the departing theme's background then hides the change, with a
//! transparent hole centered on the toggle control through which the new
//! theme shows:
//!
//! ```text
//! Idle --toggle--> Expanding --frames--> Holding --timer--> Retracting --frames--> Idle
//! ```
//!
//! The hole grows as `max * easeOutCubic(t)` while expanding and shrinks as
//! `max * (1 - easeOutCubic(t))` while retracting, with `t` measured against
//! the clock rather than counted in frames. Toggles are ignored, not queued,
//! while any phase other than `Idle` is active. Pointer input is blocked for
//! the whole animation.

use crate::animation::{ease_out_cubic, phase_progress};
use crate::color::Color;
use crate::config::ThemeConfig;
use crate::error::ConfigError;
use crate::geometry::{Point, Rect, Size};
use crate::host::{HostSurface, RevealOverlay};
use crate::scheduler::{Fired, Scheduler, TaskKind, TaskSlot};
use crate::theme::{Palette, Theme};
use serde::Serialize;
use tracing::{debug, trace};

/// Phase durations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionTimings {
    /// Hole growth
    pub expand_ms: u32,
    /// Pause at full radius
    pub hold_ms: u32,
    /// Hole shrink
    pub retract_ms: u32,
}

impl Default for TransitionTimings {
    fn default() -> Self {
        Self {
            expand_ms: 550,
            hold_ms: 150,
            retract_ms: 450,
        }
    }
}

impl TransitionTimings {
    /// Sum of all phases.
    #[must_use]
    pub const fn total_ms(&self) -> u32 {
        self.expand_ms + self.hold_ms + self.retract_ms
    }
}

impl From<&ThemeConfig> for TransitionTimings {
    fn from(config: &ThemeConfig) -> Self {
        Self {
            expand_ms: config.expand_ms,
            hold_ms: config.hold_ms,
            retract_ms: config.retract_ms,
        }
    }
}

/// Public view of the controller's phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionPhase {
    /// No transition running
    Idle,
    /// Hole growing
    Expanding,
    /// Hole at full radius
    Holding,
    /// Hole shrinking
    Retracting,
}

/// What a toggle request did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// A transition is running; nothing changed
    Ignored,
    /// Theme flipped without animation (no origin available)
    Instant,
    /// Theme flipped and the reveal started
    Animated,
}

/// Geometry and color of one reveal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Reveal {
    /// Center of the toggle control
    pub center: Point,
    /// Distance to the farthest viewport corner
    pub max_radius: f32,
    /// Departing theme's background
    pub cover: Color,
}

impl Reveal {
    fn overlay(&self, radius: f32) -> RevealOverlay {
        RevealOverlay {
            center: self.center,
            radius,
            color: self.cover,
        }
    }
}

/// Proof that pointer input is blocked. Released exactly once by value.
#[derive(Debug)]
#[must_use = "an input block must be released"]
struct InputBlock(());

impl InputBlock {
    fn acquire(host: &mut dyn HostSurface) -> Self {
        host.set_input_blocked(true);
        Self(())
    }

    fn release(self, host: &mut dyn HostSurface) {
        host.set_input_blocked(false);
    }
}

#[derive(Debug)]
enum Phase {
    Idle,
    Expanding {
        reveal: Reveal,
        started_at: f64,
        block: InputBlock,
    },
    Holding {
        reveal: Reveal,
        block: InputBlock,
    },
    Retracting {
        reveal: Reveal,
        started_at: f64,
        block: InputBlock,
    },
}

/// Theme state plus the reveal animation that masks each switch.
#[derive(Debug)]
pub struct ThemeTransition {
    theme: Theme,
    palette: Palette,
    timings: TransitionTimings,
    phase: Phase,
    mask_radius: Option<f32>,
    task: TaskSlot,
}

impl ThemeTransition {
    /// Idle controller showing `initial`.
    #[must_use]
    pub const fn new(initial: Theme, palette: Palette, timings: TransitionTimings) -> Self {
        Self {
            theme: initial,
            palette,
            timings,
            phase: Phase::Idle,
            mask_radius: None,
            task: TaskSlot::new(),
        }
    }

    /// Build from the theme manifest section.
    pub fn from_config(config: &ThemeConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(
            config.initial,
            config.palette()?,
            TransitionTimings::from(config),
        ))
    }

    /// Theme currently applied to content.
    #[must_use]
    pub const fn theme(&self) -> Theme {
        self.theme
    }

    /// Phase durations.
    #[must_use]
    pub const fn timings(&self) -> TransitionTimings {
        self.timings
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> TransitionPhase {
        match self.phase {
            Phase::Idle => TransitionPhase::Idle,
            Phase::Expanding { .. } => TransitionPhase::Expanding,
            Phase::Holding { .. } => TransitionPhase::Holding,
            Phase::Retracting { .. } => TransitionPhase::Retracting,
        }
    }

    /// Whether a transition is running.
    #[must_use]
    pub const fn is_animating(&self) -> bool {
        !matches!(self.phase, Phase::Idle)
    }

    /// Hole radius; `None` while idle.
    #[must_use]
    pub const fn mask_radius(&self) -> Option<f32> {
        self.mask_radius
    }

    /// Geometry of the running reveal.
    #[must_use]
    pub const fn reveal(&self) -> Option<&Reveal> {
        match &self.phase {
            Phase::Idle => None,
            Phase::Expanding { reveal, .. }
            | Phase::Holding { reveal, .. }
            | Phase::Retracting { reveal, .. } => Some(reveal),
        }
    }

    /// Push the current theme class to the host.
    pub fn apply_theme(&self, host: &mut dyn HostSurface) {
        host.set_theme_class(self.theme);
    }

    /// Flip the theme, animating from `control` when its bounds are known.
    ///
    /// `control` is the toggle's on-screen rectangle; `None` (not mounted)
    /// or non-finite bounds fall back to an instant switch.
    pub fn request_toggle(
        &mut self,
        control: Option<Rect>,
        viewport: Size,
        scheduler: &mut dyn Scheduler,
        host: &mut dyn HostSurface,
    ) -> ToggleOutcome {
        if self.is_animating() {
            debug!(phase = ?self.phase(), "theme toggle ignored: transition running");
            return ToggleOutcome::Ignored;
        }

        let departing = self.theme;
        self.theme = departing.toggled();
        host.set_theme_class(self.theme);

        let Some(center) = control.map(|r| r.center()).filter(|c| c.x.is_finite() && c.y.is_finite())
        else {
            debug!(theme = %self.theme, "theme switched without animation: no origin");
            return ToggleOutcome::Instant;
        };

        let reveal = Reveal {
            center,
            max_radius: Rect::from_size(viewport).farthest_corner_distance(center),
            cover: self.palette.background(departing),
        };
        let block = InputBlock::acquire(host);
        host.draw_overlay(&reveal.overlay(0.0));
        self.mask_radius = Some(0.0);
        self.phase = Phase::Expanding {
            reveal,
            started_at: scheduler.now(),
            block,
        };
        let frame = scheduler.schedule_next_frame();
        self.task.replace(scheduler, frame);

        debug!(
            theme = %self.theme,
            x = center.x,
            y = center.y,
            max_radius = reveal.max_radius,
            "theme reveal started"
        );
        ToggleOutcome::Animated
    }

    /// Handle a fired task. Returns `true` if it belonged to this controller.
    pub fn on_task(
        &mut self,
        fired: Fired,
        scheduler: &mut dyn Scheduler,
        host: &mut dyn HostSurface,
    ) -> bool {
        if self.awaited_kind() != Some(fired.kind) {
            if self.task.pending() == Some(fired.handle) {
                debug!(
                    kind = ?fired.kind,
                    phase = ?self.phase(),
                    "theme reveal: task kind does not fit phase"
                );
            }
            return false;
        }
        if !self.task.claim(fired.handle) {
            return false;
        }
        let now = scheduler.now();

        self.phase = match (std::mem::replace(&mut self.phase, Phase::Idle), fired.kind) {
            (
                Phase::Expanding {
                    reveal,
                    started_at,
                    block,
                },
                TaskKind::Frame,
            ) => {
                let t = phase_progress(started_at, now, self.timings.expand_ms);
                let radius = reveal.max_radius * ease_out_cubic(t) as f32;
                self.draw(&reveal, radius, host);

                if t >= 1.0 {
                    debug!("theme reveal: holding");
                    let hold = scheduler.schedule_after(self.timings.hold_ms);
                    self.task.replace(scheduler, hold);
                    Phase::Holding { reveal, block }
                } else {
                    let frame = scheduler.schedule_next_frame();
                    self.task.replace(scheduler, frame);
                    Phase::Expanding {
                        reveal,
                        started_at,
                        block,
                    }
                }
            }
            (Phase::Holding { reveal, block }, TaskKind::Timer) => {
                debug!("theme reveal: retracting");
                let frame = scheduler.schedule_next_frame();
                self.task.replace(scheduler, frame);
                Phase::Retracting {
                    reveal,
                    started_at: now,
                    block,
                }
            }
            (
                Phase::Retracting {
                    reveal,
                    started_at,
                    block,
                },
                TaskKind::Frame,
            ) => {
                let t = phase_progress(started_at, now, self.timings.retract_ms);
                let radius = reveal.max_radius * (1.0 - ease_out_cubic(t)) as f32;
                self.draw(&reveal, radius, host);

                if t >= 1.0 {
                    Self::finish(block, host);
                    self.mask_radius = None;
                    debug!(theme = %self.theme, "theme reveal finished");
                    Phase::Idle
                } else {
                    let frame = scheduler.schedule_next_frame();
                    self.task.replace(scheduler, frame);
                    Phase::Retracting {
                        reveal,
                        started_at,
                        block,
                    }
                }
            }
            // excluded by the kind check above
            (phase, _) => phase,
        };
        true
    }

    /// Stop a running transition: cancel its pending task, remove the overlay
    /// and release the input block. The theme stays switched. Idempotent.
    pub fn abort(&mut self, scheduler: &mut dyn Scheduler, host: &mut dyn HostSurface) {
        self.task.cancel(scheduler);
        match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Idle => {}
            Phase::Expanding { block, .. }
            | Phase::Holding { block, .. }
            | Phase::Retracting { block, .. } => {
                debug!("theme reveal aborted");
                Self::finish(block, host);
            }
        }
        self.mask_radius = None;
    }

    /// Kind of task the current phase waits on.
    const fn awaited_kind(&self) -> Option<TaskKind> {
        match self.phase {
            Phase::Idle => None,
            Phase::Expanding { .. } | Phase::Retracting { .. } => Some(TaskKind::Frame),
            Phase::Holding { .. } => Some(TaskKind::Timer),
        }
    }

    fn draw(&mut self, reveal: &Reveal, radius: f32, host: &mut dyn HostSurface) {
        trace!(radius, "theme reveal frame");
        host.draw_overlay(&reveal.overlay(radius));
        self.mask_radius = Some(radius);
    }

    fn finish(block: InputBlock, host: &mut dyn HostSurface) {
        host.clear_overlay();
        block.release(host);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{HostCall, RecordingHost};
    use crate::scheduler::ManualScheduler;
    use proptest::prelude::*;

    const VIEWPORT: Size = Size::new(1200.0, 800.0);

    fn control() -> Option<Rect> {
        Some(Rect::new(1100.0, 20.0, 40.0, 40.0))
    }

    fn controller() -> ThemeTransition {
        ThemeTransition::new(Theme::Light, Palette::default(), TransitionTimings::default())
    }

    fn run(
        ctl: &mut ThemeTransition,
        sched: &mut ManualScheduler,
        host: &mut RecordingHost,
        until: f64,
    ) {
        while let Some(fired) = sched.pop_due(until) {
            ctl.on_task(fired, sched, host);
        }
        sched.settle(until);
    }

    fn blocked_toggles(host: &RecordingHost) -> Vec<bool> {
        host.calls()
            .iter()
            .filter_map(|c| match c {
                HostCall::InputBlocked(b) => Some(*b),
                _ => None,
            })
            .collect()
    }

    // -------------------------------------------------------------------------
    // Trigger
    // -------------------------------------------------------------------------

    #[test]
    fn test_toggle_flips_theme_immediately() {
        let mut ctl = controller();
        let mut sched = ManualScheduler::new();
        let mut host = RecordingHost::new();

        let outcome = ctl.request_toggle(control(), VIEWPORT, &mut sched, &mut host);
        assert_eq!(outcome, ToggleOutcome::Animated);
        assert_eq!(ctl.theme(), Theme::Dark);
        assert_eq!(host.theme(), Some(Theme::Dark));
        assert!(ctl.is_animating());
        assert_eq!(ctl.phase(), TransitionPhase::Expanding);
        assert_eq!(ctl.mask_radius(), Some(0.0));
        assert!(host.input_blocked());
    }

    #[test]
    fn test_reveal_geometry() {
        let mut ctl = controller();
        let mut sched = ManualScheduler::new();
        let mut host = RecordingHost::new();
        ctl.request_toggle(control(), VIEWPORT, &mut sched, &mut host);

        let reveal = *ctl.reveal().unwrap();
        assert_eq!(reveal.center, Point::new(1120.0, 40.0));
        // farthest corner is bottom-left (0, 800)
        let expected = 1120.0f32.hypot(760.0);
        assert!((reveal.max_radius - expected).abs() < 0.01);
        assert_eq!(reveal.cover, Palette::default().light_background);
    }

    #[test]
    fn test_missing_origin_falls_back_to_instant_switch() {
        let mut ctl = controller();
        let mut sched = ManualScheduler::new();
        let mut host = RecordingHost::new();

        let outcome = ctl.request_toggle(None, VIEWPORT, &mut sched, &mut host);
        assert_eq!(outcome, ToggleOutcome::Instant);
        assert_eq!(ctl.theme(), Theme::Dark);
        assert!(!ctl.is_animating());
        assert_eq!(ctl.mask_radius(), None);
        assert_eq!(host.calls(), &[HostCall::ThemeClass(Theme::Dark)]);
        assert_eq!(sched.pending_count(), 0);
    }

    #[test]
    fn test_non_finite_origin_falls_back() {
        let mut ctl = controller();
        let mut sched = ManualScheduler::new();
        let mut host = RecordingHost::new();
        let bad = Some(Rect::new(f32::NAN, 0.0, 10.0, 10.0));
        assert_eq!(
            ctl.request_toggle(bad, VIEWPORT, &mut sched, &mut host),
            ToggleOutcome::Instant
        );
    }

    #[test]
    fn test_toggle_ignored_while_animating() {
        let mut ctl = controller();
        let mut sched = ManualScheduler::new();
        let mut host = RecordingHost::new();
        ctl.request_toggle(control(), VIEWPORT, &mut sched, &mut host);
        run(&mut ctl, &mut sched, &mut host, 100.0);

        let calls_before = host.calls().len();
        let pending_before = sched.pending_count();
        let radius_before = ctl.mask_radius();

        let outcome = ctl.request_toggle(control(), VIEWPORT, &mut sched, &mut host);
        assert_eq!(outcome, ToggleOutcome::Ignored);
        assert_eq!(ctl.theme(), Theme::Dark);
        assert_eq!(host.calls().len(), calls_before);
        assert_eq!(sched.pending_count(), pending_before);
        assert_eq!(ctl.mask_radius(), radius_before);
    }

    // -------------------------------------------------------------------------
    // Phases
    // -------------------------------------------------------------------------

    #[test]
    fn test_full_cycle_returns_to_idle() {
        let mut ctl = controller();
        let mut sched = ManualScheduler::new();
        let mut host = RecordingHost::new();
        ctl.request_toggle(control(), VIEWPORT, &mut sched, &mut host);

        run(&mut ctl, &mut sched, &mut host, 600.0);
        assert_eq!(ctl.phase(), TransitionPhase::Holding);
        let max = ctl.reveal().unwrap().max_radius;
        assert_eq!(ctl.mask_radius(), Some(max));

        run(&mut ctl, &mut sched, &mut host, 760.0);
        assert_eq!(ctl.phase(), TransitionPhase::Retracting);

        run(&mut ctl, &mut sched, &mut host, 1300.0);
        assert_eq!(ctl.phase(), TransitionPhase::Idle);
        assert!(!ctl.is_animating());
        assert_eq!(ctl.mask_radius(), None);
        assert!(host.overlay().is_none());
        assert!(!host.input_blocked());
        assert_eq!(sched.pending_count(), 0);
        assert_eq!(host.overlay_radii().last().copied(), Some(0.0));
    }

    #[test]
    fn test_input_blocked_and_released_once() {
        let mut ctl = controller();
        let mut sched = ManualScheduler::new();
        let mut host = RecordingHost::new();
        ctl.request_toggle(control(), VIEWPORT, &mut sched, &mut host);
        run(&mut ctl, &mut sched, &mut host, 5000.0);

        assert_eq!(blocked_toggles(&host), vec![true, false]);
        assert_eq!(host.count(|c| matches!(c, HostCall::ClearOverlay)), 1);
    }

    #[test]
    fn test_second_toggle_after_completion_animates_back() {
        let mut ctl = controller();
        let mut sched = ManualScheduler::new();
        let mut host = RecordingHost::new();
        ctl.request_toggle(control(), VIEWPORT, &mut sched, &mut host);
        run(&mut ctl, &mut sched, &mut host, 5000.0);

        let outcome = ctl.request_toggle(control(), VIEWPORT, &mut sched, &mut host);
        assert_eq!(outcome, ToggleOutcome::Animated);
        assert_eq!(ctl.theme(), Theme::Light);
        assert_eq!(ctl.reveal().unwrap().cover, Palette::default().dark_background);
    }

    #[test]
    fn test_progress_uses_clock_not_frame_count() {
        let mut ctl = controller();
        let mut sched = ManualScheduler::new().with_frame_interval(275.0);
        let mut host = RecordingHost::new();
        ctl.request_toggle(control(), VIEWPORT, &mut sched, &mut host);

        // two slow frames cover the whole 550ms expand
        run(&mut ctl, &mut sched, &mut host, 550.0);
        assert_eq!(ctl.phase(), TransitionPhase::Holding);
        assert_eq!(host.overlay_radii().len(), 3);
    }

    #[test]
    fn test_zero_durations_still_complete() {
        let mut ctl = ThemeTransition::new(
            Theme::Dark,
            Palette::default(),
            TransitionTimings {
                expand_ms: 0,
                hold_ms: 0,
                retract_ms: 0,
            },
        );
        let mut sched = ManualScheduler::new();
        let mut host = RecordingHost::new();
        ctl.request_toggle(control(), VIEWPORT, &mut sched, &mut host);
        run(&mut ctl, &mut sched, &mut host, 100.0);
        assert!(!ctl.is_animating());
        assert_eq!(ctl.theme(), Theme::Light);
    }

    // -------------------------------------------------------------------------
    // Abort
    // -------------------------------------------------------------------------

    #[test]
    fn test_abort_releases_everything() {
        let mut ctl = controller();
        let mut sched = ManualScheduler::new();
        let mut host = RecordingHost::new();
        ctl.request_toggle(control(), VIEWPORT, &mut sched, &mut host);
        run(&mut ctl, &mut sched, &mut host, 200.0);

        ctl.abort(&mut sched, &mut host);
        ctl.abort(&mut sched, &mut host);

        assert!(!ctl.is_animating());
        assert_eq!(ctl.theme(), Theme::Dark);
        assert!(host.overlay().is_none());
        assert_eq!(blocked_toggles(&host), vec![true, false]);
        assert_eq!(sched.pending_count(), 0);
    }

    #[test]
    fn test_abort_when_idle_touches_nothing() {
        let mut ctl = controller();
        let mut sched = ManualScheduler::new();
        let mut host = RecordingHost::new();
        ctl.abort(&mut sched, &mut host);
        assert!(host.calls().is_empty());
    }

    #[test]
    fn test_stale_delivery_after_abort_ignored() {
        let mut ctl = controller();
        let mut sched = ManualScheduler::new();
        let mut host = RecordingHost::new();
        ctl.request_toggle(control(), VIEWPORT, &mut sched, &mut host);
        let stale = sched.pop_due(f64::MAX).unwrap();
        ctl.abort(&mut sched, &mut host);

        assert!(!ctl.on_task(stale, &mut sched, &mut host));
        assert!(!ctl.is_animating());
    }

    #[test]
    fn test_mismatched_task_kind_leaves_animation_running() {
        let mut ctl = controller();
        let mut sched = ManualScheduler::new();
        let mut host = RecordingHost::new();
        ctl.request_toggle(control(), VIEWPORT, &mut sched, &mut host);

        let frame = sched.pop_due(f64::MAX).unwrap();
        let as_timer = Fired {
            kind: TaskKind::Timer,
            ..frame
        };
        assert!(!ctl.on_task(as_timer, &mut sched, &mut host));
        assert_eq!(ctl.phase(), TransitionPhase::Expanding);

        // the genuine delivery still drives the reveal to completion
        assert!(ctl.on_task(frame, &mut sched, &mut host));
        run(&mut ctl, &mut sched, &mut host, 5000.0);
        assert!(!ctl.is_animating());
        assert!(!host.input_blocked());
        assert!(host.overlay().is_none());
        assert_eq!(blocked_toggles(&host), vec![true, false]);
    }

    #[test]
    fn test_frame_during_hold_ignored() {
        let mut ctl = controller();
        let mut sched = ManualScheduler::new();
        let mut host = RecordingHost::new();
        ctl.request_toggle(control(), VIEWPORT, &mut sched, &mut host);
        run(&mut ctl, &mut sched, &mut host, 600.0);
        assert_eq!(ctl.phase(), TransitionPhase::Holding);

        let hold = ctl.task.pending().unwrap();
        let as_frame = Fired {
            handle: hold,
            kind: TaskKind::Frame,
            at: 600.0,
        };
        assert!(!ctl.on_task(as_frame, &mut sched, &mut host));
        assert_eq!(ctl.phase(), TransitionPhase::Holding);
        assert!(sched.is_pending(hold));

        run(&mut ctl, &mut sched, &mut host, 5000.0);
        assert!(!ctl.is_animating());
        assert!(!host.input_blocked());
    }

    proptest! {
        #[test]
        fn prop_radius_monotonic_per_phase(
            frame_ms in 4.0f64..80.0,
            x in 0.0f32..1200.0,
            y in 0.0f32..800.0,
        ) {
            let mut ctl = controller();
            let mut sched = ManualScheduler::new().with_frame_interval(frame_ms);
            let mut host = RecordingHost::new();
            let origin = Some(Rect::new(x, y, 0.0, 0.0));
            ctl.request_toggle(origin, VIEWPORT, &mut sched, &mut host);
            let max = ctl.reveal().unwrap().max_radius;

            let mut samples = Vec::new();
            while let Some(fired) = sched.pop_due(f64::MAX) {
                ctl.on_task(fired, &mut sched, &mut host);
                samples.push((ctl.phase(), ctl.mask_radius()));
            }

            let expanding: Vec<f32> = samples.iter()
                .filter(|(p, _)| *p == TransitionPhase::Expanding)
                .filter_map(|(_, r)| *r)
                .collect();
            prop_assert!(expanding.windows(2).all(|w| w[0] <= w[1]));

            let retracting: Vec<f32> = samples.iter()
                .filter(|(p, _)| *p == TransitionPhase::Retracting)
                .filter_map(|(_, r)| *r)
                .collect();
            prop_assert!(retracting.windows(2).all(|w| w[0] >= w[1]));

            let holding: Vec<f32> = samples.iter()
                .filter(|(p, _)| *p == TransitionPhase::Holding)
                .filter_map(|(_, r)| *r)
                .collect();
            prop_assert!(holding.iter().all(|r| *r == max));

            prop_assert_eq!(host.overlay_radii().last().copied(), Some(0.0));
            prop_assert!(!ctl.is_animating());
        }
    }
}
