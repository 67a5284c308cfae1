//! Host surface: the document-level side effects the core is allowed to make.
//!
//! The browser bridge implements this over the DOM; [`RecordingHost`] keeps
//! an in-memory log for tests and the CLI preview.

use crate::color::Color;
use crate::geometry::Point;
use crate::theme::Theme;
use serde::Serialize;

/// Full-viewport cover with a transparent circular hole.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RevealOverlay {
    /// Hole center in viewport coordinates
    pub center: Point,
    /// Hole radius in CSS pixels
    pub radius: f32,
    /// Cover color outside the hole
    pub color: Color,
}

/// Side-effecting operations on the hosting document.
pub trait HostSurface {
    /// Apply the root theme class.
    fn set_theme_class(&mut self, theme: Theme);

    /// Suppress (`true`) or restore (`false`) pointer interaction.
    fn set_input_blocked(&mut self, blocked: bool);

    /// Show or update the reveal overlay.
    fn draw_overlay(&mut self, overlay: &RevealOverlay);

    /// Remove the reveal overlay.
    fn clear_overlay(&mut self);

    /// Smoothly scroll a section into view. Unknown ids are ignored.
    fn scroll_to_section(&mut self, section_id: &str);

    /// Smoothly scroll back to the top of the page.
    fn scroll_to_top(&mut self);
}

// =============================================================================
// RecordingHost
// =============================================================================

/// One recorded host operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum HostCall {
    /// `set_theme_class`
    ThemeClass(Theme),
    /// `set_input_blocked`
    InputBlocked(bool),
    /// `draw_overlay`
    DrawOverlay(RevealOverlay),
    /// `clear_overlay`
    ClearOverlay,
    /// `scroll_to_section`
    ScrollToSection(String),
    /// `scroll_to_top`
    ScrollToTop,
}

/// In-memory host that records every call.
#[derive(Debug, Default)]
pub struct RecordingHost {
    calls: Vec<HostCall>,
    theme: Option<Theme>,
    input_blocked: bool,
    overlay: Option<RevealOverlay>,
}

impl RecordingHost {
    /// Create an empty host.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every call in order.
    #[must_use]
    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    /// Theme class last applied.
    #[must_use]
    pub const fn theme(&self) -> Option<Theme> {
        self.theme
    }

    /// Whether input is currently blocked.
    #[must_use]
    pub const fn input_blocked(&self) -> bool {
        self.input_blocked
    }

    /// Overlay currently shown.
    #[must_use]
    pub const fn overlay(&self) -> Option<&RevealOverlay> {
        self.overlay.as_ref()
    }

    /// Radii of every drawn overlay, in order.
    #[must_use]
    pub fn overlay_radii(&self) -> Vec<f32> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                HostCall::DrawOverlay(o) => Some(o.radius),
                _ => None,
            })
            .collect()
    }

    /// Number of calls matching `pred`.
    pub fn count(&self, pred: impl Fn(&HostCall) -> bool) -> usize {
        self.calls.iter().filter(|c| pred(c)).count()
    }

    /// Forget recorded calls, keeping current state.
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }
}

impl HostSurface for RecordingHost {
    fn set_theme_class(&mut self, theme: Theme) {
        self.theme = Some(theme);
        self.calls.push(HostCall::ThemeClass(theme));
    }

    fn set_input_blocked(&mut self, blocked: bool) {
        self.input_blocked = blocked;
        self.calls.push(HostCall::InputBlocked(blocked));
    }

    fn draw_overlay(&mut self, overlay: &RevealOverlay) {
        self.overlay = Some(*overlay);
        self.calls.push(HostCall::DrawOverlay(*overlay));
    }

    fn clear_overlay(&mut self) {
        self.overlay = None;
        self.calls.push(HostCall::ClearOverlay);
    }

    fn scroll_to_section(&mut self, section_id: &str) {
        self.calls
            .push(HostCall::ScrollToSection(section_id.to_string()));
    }

    fn scroll_to_top(&mut self) {
        self.calls.push(HostCall::ScrollToTop);
    }
}
