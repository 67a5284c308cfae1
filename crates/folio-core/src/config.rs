//! Site manifest (`site.yaml`).
//!
//! Every field defaults to the shipped site's behaviour, so an empty
//! document is a complete manifest.

use crate::color::Color;
use crate::error::ConfigError;
use crate::theme::{Palette, Theme};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Site manifest loaded from site.yaml.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Hero typewriter
    pub hero: HeroConfig,
    /// Scroll spy and header behaviour
    pub scroll: ScrollConfig,
    /// Theme and reveal transition
    pub theme: ThemeConfig,
    /// Header navigation links
    pub nav: Vec<NavLink>,
}

/// Typewriter phrases and speeds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HeroConfig {
    /// Phrases typed in order, then repeated
    pub phrases: Vec<String>,
    /// Delay between typed characters
    pub typing_speed_ms: u32,
    /// Delay between erased characters
    pub deleting_speed_ms: u32,
}

impl Default for HeroConfig {
    fn default() -> Self {
        Self {
            phrases: vec![
                "Full-Stack Developer".to_string(),
                "Java & .NET Backend Engineer".to_string(),
                "SQL & DevOps Enthusiast".to_string(),
            ],
            typing_speed_ms: 120,
            deleting_speed_ms: 60,
        }
    }
}

/// Section anchors and scroll thresholds, in CSS pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScrollConfig {
    /// Section ids in document order
    pub sections: Vec<String>,
    /// Active section before any section is hit
    pub default_section: String,
    /// Offset from the viewport top used for the hit-test
    pub activation_line: f64,
    /// Header never hides above this scroll offset
    pub header_dead_zone: f64,
    /// Scroll-to-top button shows beyond this offset
    pub scroll_top_threshold: f64,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            sections: [
                "hero",
                "about",
                "skills",
                "projects",
                "case-studies",
                "journey",
                "contact",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            default_section: "hero".to_string(),
            activation_line: 100.0,
            header_dead_zone: 160.0,
            scroll_top_threshold: 400.0,
        }
    }
}

/// Initial theme and reveal timings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThemeConfig {
    /// Theme at startup
    pub initial: Theme,
    /// Reveal expand duration
    pub expand_ms: u32,
    /// Pause at full radius
    pub hold_ms: u32,
    /// Reveal retract duration
    pub retract_ms: u32,
    /// Light page background (hex)
    pub light_background: String,
    /// Dark page background (hex)
    pub dark_background: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            initial: Theme::Light,
            expand_ms: 550,
            hold_ms: 150,
            retract_ms: 450,
            light_background: "#fdfdfd".to_string(),
            dark_background: "#020617".to_string(),
        }
    }
}

impl ThemeConfig {
    /// Resolve the hex backgrounds.
    pub fn palette(&self) -> Result<Palette, ConfigError> {
        let parse = |field: &'static str, hex: &str| {
            Color::from_hex(hex).map_err(|source| ConfigError::InvalidColor { field, source })
        };
        Ok(Palette {
            light_background: parse("theme.light_background", &self.light_background)?,
            dark_background: parse("theme.dark_background", &self.dark_background)?,
        })
    }
}

/// A header navigation link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NavLink {
    /// Visible label
    pub label: String,
    /// Section id scrolled to
    pub target: String,
}

impl NavLink {
    /// Create a link.
    pub fn new(label: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            target: target.into(),
        }
    }
}

impl SiteConfig {
    /// The manifest of the shipped site, including its nav bar.
    #[must_use]
    pub fn standard() -> Self {
        Self {
            nav: vec![
                NavLink::new("About", "about"),
                NavLink::new("Skills", "skills"),
                NavLink::new("Projects", "projects"),
                NavLink::new("Case Studies", "case-studies"),
                NavLink::new("Journey", "journey"),
                NavLink::new("Contact", "contact"),
            ],
            ..Self::default()
        }
    }

    /// Parse and validate a manifest.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the manifest to YAML.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Check the invariants the runtime relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hero.phrases.is_empty() {
            return Err(ConfigError::EmptyPhrases);
        }
        if self.hero.typing_speed_ms == 0 {
            return Err(ConfigError::ZeroSpeed {
                field: "hero.typing_speed_ms",
            });
        }
        if self.hero.deleting_speed_ms == 0 {
            return Err(ConfigError::ZeroSpeed {
                field: "hero.deleting_speed_ms",
            });
        }

        for (field, value) in [
            ("scroll.activation_line", self.scroll.activation_line),
            ("scroll.header_dead_zone", self.scroll.header_dead_zone),
            ("scroll.scroll_top_threshold", self.scroll.scroll_top_threshold),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidDistance { field, value });
            }
        }

        let mut seen = HashSet::new();
        for id in &self.scroll.sections {
            if !seen.insert(id.as_str()) {
                return Err(ConfigError::DuplicateSection(id.clone()));
            }
        }

        for link in &self.nav {
            let known =
                seen.contains(link.target.as_str()) || link.target == self.scroll.default_section;
            if !known {
                return Err(ConfigError::UnknownNavTarget {
                    label: link.label.clone(),
                    target: link.target.clone(),
                });
            }
        }

        self.theme.palette()?;
        Ok(())
    }
}
