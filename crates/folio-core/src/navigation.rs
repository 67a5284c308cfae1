//! Header navigation: link list, mobile drawer and scroll requests.

use crate::config::NavLink;
use crate::host::HostSurface;
use serde::Serialize;
use tracing::debug;

/// A nav link projected for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavItem {
    /// Visible label
    pub label: String,
    /// Section id scrolled to
    pub target: String,
    /// Whether the target is the active section
    pub active: bool,
}

/// Navigation state.
#[derive(Debug, Clone, Default)]
pub struct Navigation {
    links: Vec<NavLink>,
    menu_open: bool,
}

impl Navigation {
    /// Create with the configured links and the drawer closed.
    #[must_use]
    pub const fn new(links: Vec<NavLink>) -> Self {
        Self {
            links,
            menu_open: false,
        }
    }

    /// Whether the mobile drawer is open.
    #[must_use]
    pub const fn menu_open(&self) -> bool {
        self.menu_open
    }

    /// Open or close the mobile drawer. Returns the new state.
    pub fn toggle_menu(&mut self) -> bool {
        self.menu_open = !self.menu_open;
        self.menu_open
    }

    /// Scroll to `section_id` and close the drawer.
    pub fn navigate(&mut self, section_id: &str, host: &mut dyn HostSurface) {
        debug!(section = section_id, "navigate");
        host.scroll_to_section(section_id);
        self.menu_open = false;
    }

    /// Scroll back to the top of the page.
    pub fn scroll_to_top(&mut self, host: &mut dyn HostSurface) {
        host.scroll_to_top();
        self.menu_open = false;
    }

    /// Links with their active flag for `active_section`.
    #[must_use]
    pub fn items(&self, active_section: &str) -> Vec<NavItem> {
        self.links
            .iter()
            .map(|link| NavItem {
                label: link.label.clone(),
                target: link.target.clone(),
                active: link.target == active_section,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{HostCall, RecordingHost};

    fn nav() -> Navigation {
        Navigation::new(vec![
            NavLink::new("About", "about"),
            NavLink::new("Contact", "contact"),
        ])
    }

    #[test]
    fn test_toggle_menu() {
        let mut n = nav();
        assert!(!n.menu_open());
        assert!(n.toggle_menu());
        assert!(!n.toggle_menu());
    }

    #[test]
    fn test_navigate_scrolls_and_closes_menu() {
        let mut n = nav();
        let mut host = RecordingHost::new();
        n.toggle_menu();
        n.navigate("contact", &mut host);

        assert!(!n.menu_open());
        assert_eq!(
            host.calls(),
            &[HostCall::ScrollToSection("contact".to_string())]
        );
    }

    #[test]
    fn test_scroll_to_top() {
        let mut n = nav();
        let mut host = RecordingHost::new();
        n.scroll_to_top(&mut host);
        assert_eq!(host.calls(), &[HostCall::ScrollToTop]);
    }

    #[test]
    fn test_items_mark_active() {
        let items = nav().items("contact");
        assert!(!items[0].active);
        assert!(items[1].active);
        assert!(nav().items("hero").iter().all(|i| !i.active));
    }
}
