//! Error types for folio-core.
//!
//! Only configuration problems are errors. Runtime failure paths (missing
//! section geometry, an unmounted toggle control, re-entrant toggles) resolve
//! to fallback state instead of surfacing here.

use crate::color::ColorParseError;
use thiserror::Error;

/// Errors raised while loading or validating a site manifest.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Manifest is not valid YAML or does not match the schema.
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// The hero phrase list is empty.
    #[error("hero.phrases must contain at least one phrase")]
    EmptyPhrases,

    /// A typing delay of zero would spin the scheduler.
    #[error("{field} must be greater than zero")]
    ZeroSpeed {
        /// Offending manifest field
        field: &'static str,
    },

    /// A section id is listed twice.
    #[error("duplicate section id: {0}")]
    DuplicateSection(String),

    /// A nav link points at a section that is not configured.
    #[error("nav link '{label}' targets unknown section '{target}'")]
    UnknownNavTarget {
        /// Link label
        label: String,
        /// Target section id
        target: String,
    },

    /// A scroll distance is NaN, infinite or negative.
    #[error("{field} must be a finite, non-negative number (got {value})")]
    InvalidDistance {
        /// Offending manifest field
        field: &'static str,
        /// Rejected value
        value: f64,
    },

    /// A palette entry is not a hex color.
    #[error("invalid color for {field}: {source}")]
    InvalidColor {
        /// Offending manifest field
        field: &'static str,
        /// Parse failure
        source: ColorParseError,
    },
}
