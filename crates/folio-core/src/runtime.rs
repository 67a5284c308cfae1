//! Site runtime: composes the typewriter, scroll tracker, theme transition
//! and navigation behind one event surface.
//!
//! The components share no state. `Site` owns the scheduler and host, routes
//! every [`Fired`] task to whichever component holds its handle, and projects
//! the combined state into a [`UiSnapshot`] for the render layer.

use crate::config::SiteConfig;
use crate::error::ConfigError;
use crate::geometry::{Rect, Size};
use crate::host::HostSurface;
use crate::navigation::{NavItem, Navigation};
use crate::scheduler::{Fired, ManualScheduler, Scheduler};
use crate::scroll::{ScrollState, ScrollTracker, SectionGeometry};
use crate::theme::Theme;
use crate::transition::{ThemeTransition, ToggleOutcome, TransitionPhase};
use crate::typewriter::Typewriter;
use serde::Serialize;
use tracing::{debug, info};

/// Everything the render layer reads, in one serializable value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UiSnapshot {
    /// Hero text typed so far
    pub typed_text: String,
    /// Whether the hero is erasing
    pub is_deleting: bool,
    /// Cursor blinks while typing and stays solid while erasing
    pub cursor_blink: bool,
    /// Section highlighted in the nav
    pub active_section: String,
    /// Fixed header shown
    pub header_visible: bool,
    /// Scroll-to-top button shown
    pub show_scroll_top: bool,
    /// Theme applied to content
    pub theme: Theme,
    /// Reveal running
    pub animating: bool,
    /// Reveal phase
    pub transition_phase: TransitionPhase,
    /// Reveal hole radius; absent when idle
    pub mask_radius: Option<f32>,
    /// Mobile drawer open
    pub menu_open: bool,
    /// Nav links with active flags
    pub nav: Vec<NavItem>,
}

impl UiSnapshot {
    /// Serialize to JSON for a JavaScript render layer.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// A running site.
#[derive(Debug)]
pub struct Site<S, H> {
    typewriter: Typewriter,
    scroll: ScrollTracker,
    transition: ThemeTransition,
    navigation: Navigation,
    scheduler: S,
    host: H,
    started: bool,
    torn_down: bool,
}

impl<S: Scheduler, H: HostSurface> Site<S, H> {
    /// Validate `config` and assemble an idle site. Nothing is scheduled
    /// until [`start`](Self::start).
    pub fn new(config: &SiteConfig, scheduler: S, host: H) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            typewriter: Typewriter::new(&config.hero)?,
            scroll: ScrollTracker::new(config.scroll.clone()),
            transition: ThemeTransition::from_config(&config.theme)?,
            navigation: Navigation::new(config.nav.clone()),
            scheduler,
            host,
            started: false,
            torn_down: false,
        })
    }

    /// Apply the initial theme class and begin typing. Runs once.
    pub fn start(&mut self) {
        if self.started || self.torn_down {
            return;
        }
        self.started = true;
        self.transition.apply_theme(&mut self.host);
        self.typewriter.start(&mut self.scheduler);
        info!(theme = %self.transition.theme(), "site started");
    }

    /// Feed one scroll offset.
    pub fn scroll_sample(&mut self, scroll_y: f64, geometry: &dyn SectionGeometry) -> &ScrollState {
        self.scroll.on_scroll(scroll_y, geometry)
    }

    /// Flip the theme from the toggle control at `control`.
    pub fn request_theme_toggle(&mut self, control: Option<Rect>, viewport: Size) -> ToggleOutcome {
        if self.torn_down {
            return ToggleOutcome::Ignored;
        }
        self.transition
            .request_toggle(control, viewport, &mut self.scheduler, &mut self.host)
    }

    /// Route a fired task. Returns `false` for stale or unknown handles.
    pub fn dispatch(&mut self, fired: Fired) -> bool {
        if self.torn_down {
            debug!(handle = fired.handle.id(), "delivery after teardown ignored");
            return false;
        }
        let handled = self.typewriter.on_timer(fired.handle, &mut self.scheduler)
            || self
                .transition
                .on_task(fired, &mut self.scheduler, &mut self.host);
        if !handled {
            debug!(handle = fired.handle.id(), kind = ?fired.kind, "stale task ignored");
        }
        handled
    }

    /// Scroll to a section and close the mobile drawer.
    pub fn navigate(&mut self, section_id: &str) {
        self.navigation.navigate(section_id, &mut self.host);
    }

    /// Open or close the mobile drawer.
    pub fn toggle_menu(&mut self) -> bool {
        self.navigation.toggle_menu()
    }

    /// Scroll back to the top of the page.
    pub fn scroll_to_top(&mut self) {
        self.navigation.scroll_to_top(&mut self.host);
    }

    /// Cancel all pending work and release the input block. Idempotent.
    pub fn teardown(&mut self) {
        self.typewriter.teardown(&mut self.scheduler);
        self.transition.abort(&mut self.scheduler, &mut self.host);
        if !self.torn_down {
            info!("site torn down");
        }
        self.torn_down = true;
    }

    /// Whether [`teardown`](Self::teardown) has run.
    #[must_use]
    pub const fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Current render projection.
    #[must_use]
    pub fn snapshot(&self) -> UiSnapshot {
        let typing = self.typewriter.state();
        let scroll = self.scroll.state();
        UiSnapshot {
            typed_text: typing.typed_text().to_string(),
            is_deleting: typing.is_deleting(),
            cursor_blink: !typing.is_deleting(),
            active_section: scroll.active_section.clone(),
            header_visible: scroll.header_visible,
            show_scroll_top: scroll.show_scroll_top,
            theme: self.transition.theme(),
            animating: self.transition.is_animating(),
            transition_phase: self.transition.phase(),
            mask_radius: self.transition.mask_radius(),
            menu_open: self.navigation.menu_open(),
            nav: self.navigation.items(&scroll.active_section),
        }
    }

    /// Typewriter component.
    #[must_use]
    pub const fn typewriter(&self) -> &Typewriter {
        &self.typewriter
    }

    /// Scroll tracker component.
    #[must_use]
    pub const fn scroll(&self) -> &ScrollTracker {
        &self.scroll
    }

    /// Theme transition component.
    #[must_use]
    pub const fn transition(&self) -> &ThemeTransition {
        &self.transition
    }

    /// Navigation component.
    #[must_use]
    pub const fn navigation(&self) -> &Navigation {
        &self.navigation
    }

    /// Owned scheduler.
    #[must_use]
    pub const fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Owned scheduler, mutably.
    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    /// Owned host.
    #[must_use]
    pub const fn host(&self) -> &H {
        &self.host
    }

    /// Owned host, mutably.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }
}

impl<H: HostSurface> Site<ManualScheduler, H> {
    /// Deliver every task due up to `until`, then move the clock there.
    /// Returns the number of deliveries handled.
    pub fn run_until(&mut self, until: f64) -> usize {
        let mut handled = 0;
        while let Some(fired) = self.scheduler.pop_due(until) {
            if self.dispatch(fired) {
                handled += 1;
            }
        }
        self.scheduler.settle(until);
        handled
    }

    /// Advance the virtual clock by `ms`, delivering due tasks.
    pub fn advance_by(&mut self, ms: f64) -> usize {
        let until = self.scheduler.now() + ms;
        self.run_until(until)
    }
}
