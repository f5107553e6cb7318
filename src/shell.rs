use minijinja::context;

use crate::templates::{self, safe};

/// Cookie carrying the side panel state between requests.
pub const SIDEBAR_COOKIE: &str = "sidebar";

/// DashboardShell
///
/// Layout frame shared by every gated page: a navigation bar with the menu toggle, a
/// collapsible side panel and the content slot. It is only ever rendered after the access
/// guard has let the navigation through, so it holds no session and performs no checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardShell {
    sidebar_open: bool,
}

impl Default for DashboardShell {
    fn default() -> Self {
        Self { sidebar_open: true }
    }
}

impl DashboardShell {
    /// Restores the panel state from the `sidebar` cookie. Anything but `closed` means open.
    pub fn from_cookie(value: Option<&str>) -> Self {
        Self {
            sidebar_open: value != Some("closed"),
        }
    }

    pub fn cookie_value(&self) -> &'static str {
        if self.sidebar_open { "open" } else { "closed" }
    }

    pub fn is_sidebar_open(&self) -> bool {
        self.sidebar_open
    }

    /// The navigation bar's menu control.
    pub fn toggle(&mut self) {
        self.sidebar_open = !self.sidebar_open;
    }

    /// render
    ///
    /// Wraps `content` (already-rendered page markup) in the shell chrome. `current_path`
    /// highlights the active link and is where the toggle control returns to.
    pub fn render(&self, current_path: &str, content: &str) -> Result<String, minijinja::Error> {
        templates::render(
            "shell.html",
            context! {
                state => self.cookie_value(),
                sidebar_open => self.sidebar_open,
                current_path => current_path,
                content => safe(content),
            },
        )
    }
}
