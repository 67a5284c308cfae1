//! Folio: a portfolio site's interactive behavior, compiled to WASM.
//!
//! Re-exports [`folio_core`] and adds the browser bridge: a scheduler over
//! `setTimeout`/`requestAnimationFrame`, a DOM host surface, and the
//! `FolioApp` entry point exported to JavaScript.
//!
//! # Browser Usage (WASM)
//!
//! ```javascript
//! import init, { FolioApp } from './folio.js';
//!
//! async function main() {
//!     await init();
//!     const app = new FolioApp(null, 'theme-toggle');
//!     app.on_change((json) => render(JSON.parse(json)));
//!     app.start();
//!     document.getElementById('theme-toggle').onclick = () => app.toggle_theme();
//! }
//! ```

pub use folio_core::*;

pub mod browser;

#[cfg(target_arch = "wasm32")]
pub use browser::{BrowserScheduler, DomGeometry, DomHost, FolioApp};

pub use browser::{overlay_style, OverlayStyle, DARK_CLASS};
