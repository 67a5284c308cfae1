//! Browser runtime for Folio.
//!
//! Implements the core's [`Scheduler`](folio_core::Scheduler),
//! [`HostSurface`](folio_core::HostSurface) and
//! [`SectionGeometry`](folio_core::SectionGeometry) over `web_sys`.

// WASM-only modules
#[cfg(target_arch = "wasm32")]
pub mod app;
#[cfg(target_arch = "wasm32")]
pub mod geometry;
#[cfg(target_arch = "wasm32")]
pub mod host;
#[cfg(target_arch = "wasm32")]
pub mod scheduler;

// Cross-platform modules
pub mod style;

#[cfg(target_arch = "wasm32")]
pub use app::FolioApp;
#[cfg(target_arch = "wasm32")]
pub use geometry::DomGeometry;
#[cfg(target_arch = "wasm32")]
pub use host::DomHost;
#[cfg(target_arch = "wasm32")]
pub use scheduler::BrowserScheduler;
pub use style::{overlay_style, OverlayStyle, DARK_CLASS};
