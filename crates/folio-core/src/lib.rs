//! Reactive core for the Folio portfolio site.
//!
//! Three independent behaviors driven by one event stream:
//! - Hero typewriter: [`PhraseCycleState`] and the timer-driven [`Typewriter`]
//! - Scroll spy and header visibility: [`ScrollTracker`]
//! - Circular-reveal theme switch: [`ThemeTransition`]
//!
//! [`Site`] composes them with [`Navigation`] over a [`Scheduler`] and a
//! [`HostSurface`]. Nothing here touches a real clock or DOM; the `folio`
//! crate supplies browser implementations, and [`ManualScheduler`] with
//! [`RecordingHost`] drive everything deterministically in tests.

mod animation;
mod color;
mod config;
mod error;
mod geometry;
mod host;
mod navigation;
mod runtime;
mod scheduler;
mod scroll;
mod theme;
mod transition;
mod typewriter;

pub use animation::{ease_out_cubic, phase_progress};
pub use color::{Color, ColorParseError};
pub use config::{HeroConfig, NavLink, ScrollConfig, SiteConfig, ThemeConfig};
pub use error::ConfigError;
pub use geometry::{Point, Rect, Size};
pub use host::{HostCall, HostSurface, RecordingHost, RevealOverlay};
pub use navigation::{NavItem, Navigation};
pub use runtime::{Site, UiSnapshot};
pub use scheduler::{
    Fired, ManualScheduler, Scheduler, TaskHandle, TaskKind, TaskSlot, DEFAULT_FRAME_INTERVAL_MS,
};
pub use scroll::{ScrollState, ScrollTracker, SectionBounds, SectionGeometry};
pub use theme::{Palette, Theme};
pub use transition::{Reveal, ThemeTransition, ToggleOutcome, TransitionPhase, TransitionTimings};
pub use typewriter::{PhraseCycleState, Typewriter, TypingSpeeds};
