//! Inline CSS for the DOM host.
//!
//! Pure string building, so it is tested natively.

use folio_core::{RevealOverlay, Theme};
use serde::Serialize;

/// Class on `<html>` that switches the stylesheet to dark mode.
pub const DARK_CLASS: &str = "dark";

/// Element id of the reveal overlay.
pub const OVERLAY_ID: &str = "folio-theme-reveal";

/// Stacks the overlay above every page element.
pub const OVERLAY_Z_INDEX: &str = "2147483647";

/// Whether the root element carries [`DARK_CLASS`] for `theme`.
#[must_use]
pub const fn has_dark_class(theme: Theme) -> bool {
    theme.is_dark()
}

/// Style values for one overlay frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverlayStyle {
    /// `background-color`
    pub background: String,
    /// `mask-image` (and `-webkit-mask-image`)
    pub mask: String,
}

/// Cover color plus a radial mask with a hard-edged transparent hole.
#[must_use]
pub fn overlay_style(overlay: &RevealOverlay) -> OverlayStyle {
    let r = overlay.radius.max(0.0);
    OverlayStyle {
        background: overlay.color.to_css(),
        mask: format!(
            "radial-gradient(circle at {:.1}px {:.1}px, transparent {r:.1}px, #000 {r:.1}px)",
            overlay.center.x, overlay.center.y
        ),
    }
}
