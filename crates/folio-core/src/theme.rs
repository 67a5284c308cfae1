//! Light/dark theme and the backgrounds the reveal overlay paints with.

use crate::color::Color;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Site color theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Light theme (no root class)
    #[default]
    Light,
    /// Dark theme (`dark` class on the document root)
    Dark,
}

impl Theme {
    /// The opposite theme.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Whether the `dark` root class should be present.
    #[must_use]
    pub const fn is_dark(self) -> bool {
        matches!(self, Self::Dark)
    }

    /// Lowercase name, as written in manifests.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Page background per theme.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Palette {
    /// Light page background
    pub light_background: Color,
    /// Dark page background
    pub dark_background: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            // muted-bg
            light_background: Color::new(253.0 / 255.0, 253.0 / 255.0, 253.0 / 255.0, 1.0),
            // slate-950
            dark_background: Color::new(2.0 / 255.0, 6.0 / 255.0, 23.0 / 255.0, 1.0),
        }
    }
}

impl Palette {
    /// Background color of `theme`.
    #[must_use]
    pub const fn background(&self, theme: Theme) -> Color {
        match theme {
            Theme::Light => self.light_background,
            Theme::Dark => self.dark_background,
        }
    }
}
