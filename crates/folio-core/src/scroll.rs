//! Scroll-driven UI state: active nav section, header visibility and the
//! scroll-to-top button.
//!
//! [`ScrollTracker::on_scroll`] is a pure reducer over the previous
//! [`ScrollState`], the new scroll offset and a section geometry lookup.

use crate::config::ScrollConfig;
use serde::Serialize;
use std::collections::HashMap;
use tracing::trace;

/// Viewport-relative vertical extent of a section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SectionBounds {
    /// Distance from the viewport top to the section's top edge
    pub top: f64,
    /// Distance from the viewport top to the section's bottom edge
    pub bottom: f64,
}

impl SectionBounds {
    /// Create bounds.
    #[must_use]
    pub const fn new(top: f64, bottom: f64) -> Self {
        Self { top, bottom }
    }

    /// Whether the horizontal line at `y` crosses this section.
    #[must_use]
    pub fn spans(&self, y: f64) -> bool {
        self.top <= y && self.bottom >= y
    }
}

/// Geometry collaborator: where a section currently is, if it exists.
pub trait SectionGeometry {
    /// Bounds of `section_id`, or `None` if the element is absent.
    fn section_bounds(&self, section_id: &str) -> Option<SectionBounds>;
}

impl<F> SectionGeometry for F
where
    F: Fn(&str) -> Option<SectionBounds>,
{
    fn section_bounds(&self, section_id: &str) -> Option<SectionBounds> {
        self(section_id)
    }
}

impl SectionGeometry for HashMap<String, SectionBounds> {
    fn section_bounds(&self, section_id: &str) -> Option<SectionBounds> {
        self.get(section_id).copied()
    }
}

/// Scroll-derived UI state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScrollState {
    /// A configured section id, or the default section
    pub active_section: String,
    /// Whether the fixed header is shown
    pub header_visible: bool,
    /// Whether the scroll-to-top button is shown
    pub show_scroll_top: bool,
    /// Offset of the previous sample
    pub last_scroll_y: f64,
}

impl ScrollState {
    /// State before any scroll sample.
    pub fn new(default_section: impl Into<String>) -> Self {
        Self {
            active_section: default_section.into(),
            header_visible: true,
            show_scroll_top: false,
            last_scroll_y: 0.0,
        }
    }
}

/// Reduces scroll samples into [`ScrollState`].
#[derive(Debug, Clone)]
pub struct ScrollTracker {
    config: ScrollConfig,
    state: ScrollState,
}

impl ScrollTracker {
    /// Create a tracker in its initial state.
    #[must_use]
    pub fn new(config: ScrollConfig) -> Self {
        let state = ScrollState::new(config.default_section.clone());
        Self { config, state }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &ScrollState {
        &self.state
    }

    /// Configured thresholds and sections.
    #[must_use]
    pub const fn config(&self) -> &ScrollConfig {
        &self.config
    }

    /// Pure transition for one scroll sample.
    ///
    /// Negative or non-finite offsets (overscroll bounce) count as zero.
    #[must_use]
    pub fn reduce(
        &self,
        state: &ScrollState,
        scroll_y: f64,
        geometry: &dyn SectionGeometry,
    ) -> ScrollState {
        let y = if scroll_y.is_finite() {
            scroll_y.max(0.0)
        } else {
            0.0
        };

        let scrolling_down = y > state.last_scroll_y;
        let active_section = self
            .config
            .sections
            .iter()
            .find(|id| {
                geometry
                    .section_bounds(id)
                    .is_some_and(|b| b.spans(self.config.activation_line))
            })
            .unwrap_or(&state.active_section)
            .clone();

        ScrollState {
            active_section,
            header_visible: !(scrolling_down && y > self.config.header_dead_zone),
            show_scroll_top: y > self.config.scroll_top_threshold,
            last_scroll_y: y,
        }
    }

    /// Apply one scroll sample and return the new state.
    pub fn on_scroll(&mut self, scroll_y: f64, geometry: &dyn SectionGeometry) -> &ScrollState {
        let next = self.reduce(&self.state, scroll_y, geometry);
        trace!(
            scroll_y = next.last_scroll_y,
            active = %next.active_section,
            header = next.header_visible,
            "scroll sample"
        );
        self.state = next;
        &self.state
    }
}
