//! Sub-view page objects.
//!
//! Each calendar screen gets its own page object. They all share the
//! [`Displayable`] capability so the main page object can wait on any of them
//! the same way, and so tests can substitute their own views.

mod advanced_settings;
mod day;
mod edit_event;
mod month;
mod month_day;
mod read_event;
mod week;

pub use advanced_settings::AdvancedSettingsView;
pub use day::DayView;
pub use edit_event::EditEventView;
pub use month::MonthView;
pub use month_day::MonthDayView;
pub use read_event::ReadEventView;
pub use week::WeekView;

use crate::locator::{ElementHandle, Selector};
use crate::result::PageResult;
use crate::session::{ScopedSession, Session};
use crate::wait::WaitResult;

/// A screen that can be shown or hidden
pub trait Displayable {
    /// View name for logging
    fn name(&self) -> &str;

    /// Whether the view is currently displayed (single check, no waiting)
    fn is_displayed(&self) -> PageResult<bool>;

    /// Block until the view is displayed
    fn wait_for_display(&self) -> PageResult<WaitResult>;

    /// Block until the view is hidden
    fn wait_for_hide(&self) -> PageResult<WaitResult>;
}

/// Shared state of every sub-view: the scoped session and the root element
pub struct View<'a, S: Session + ?Sized> {
    client: ScopedSession<'a, S>,
    name: &'static str,
    root: Selector,
}

impl<S: Session + ?Sized> std::fmt::Debug for View<'_, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("View")
            .field("name", &self.name)
            .field("root", &self.root)
            .finish_non_exhaustive()
    }
}

impl<'a, S: Session + ?Sized> View<'a, S> {
    /// Create a view rooted at `root`
    pub fn new(client: ScopedSession<'a, S>, name: &'static str, root: &str) -> Self {
        Self {
            client,
            name,
            root: Selector::css(root),
        }
    }

    /// Scoped session
    #[must_use]
    pub const fn client(&self) -> &ScopedSession<'a, S> {
        &self.client
    }

    /// Root selector
    #[must_use]
    pub const fn root(&self) -> &Selector {
        &self.root
    }

    /// Selector for `css` inside the root element
    #[must_use]
    pub fn child(&self, css: &str) -> Selector {
        Selector::css(css).within(&self.root)
    }

    /// Find one element inside the root, waiting up to the search timeout
    pub fn find(&self, css: &str) -> PageResult<ElementHandle> {
        self.client.find_element(&self.child(css))
    }

    /// Find every element inside the root matching `css`
    pub fn find_all(&self, css: &str) -> PageResult<Vec<ElementHandle>> {
        self.client.find_elements(&self.child(css))
    }

    /// Visible text of one element inside the root
    pub fn text_of(&self, css: &str) -> PageResult<String> {
        let element = self.find(css)?;
        self.client.session().text(&element)
    }

    /// Click one element inside the root
    pub fn click(&self, css: &str) -> PageResult<()> {
        self.client.click(&self.child(css))
    }
}

impl<S: Session + ?Sized> Displayable for View<'_, S> {
    fn name(&self) -> &str {
        self.name
    }

    fn is_displayed(&self) -> PageResult<bool> {
        let session = self.client.session();
        match session.find_element(&self.root)? {
            Some(root) => session.is_displayed(&root),
            None => Ok(false),
        }
    }

    fn wait_for_display(&self) -> PageResult<WaitResult> {
        let result = self
            .client
            .wait_for(&format!("{} view displayed", self.name), || self.is_displayed())?;
        tracing::debug!(view = self.name, attempts = result.attempts, "view displayed");
        Ok(result)
    }

    fn wait_for_hide(&self) -> PageResult<WaitResult> {
        let result = self
            .client
            .wait_for(&format!("{} view hidden", self.name), || {
                Ok(!self.is_displayed()?)
            })?;
        tracing::debug!(view = self.name, attempts = result.attempts, "view hidden");
        Ok(result)
    }
}

/// Implement [`Displayable`] for a sub-view by delegating to its `view` field
macro_rules! delegate_displayable {
    ($ty:ident) => {
        impl<S: $crate::session::Session + ?Sized> $crate::views::Displayable for $ty<'_, S> {
            fn name(&self) -> &str {
                self.view.name()
            }

            fn is_displayed(&self) -> $crate::result::PageResult<bool> {
                self.view.is_displayed()
            }

            fn wait_for_display(&self) -> $crate::result::PageResult<$crate::wait::WaitResult> {
                self.view.wait_for_display()
            }

            fn wait_for_hide(&self) -> $crate::result::PageResult<$crate::wait::WaitResult> {
                self.view.wait_for_hide()
            }
        }
    };
}
pub(crate) use delegate_displayable;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CalendarConfig;
    use crate::mock::MockSession;

    fn fast() -> CalendarConfig {
        CalendarConfig::new()
            .with_search_timeout(30)
            .with_poll_interval(1)
    }

    #[test]
    fn test_missing_root_is_not_displayed() {
        let session = MockSession::new();
        let view = View::new(session.scope(&fast()), "day", "#day-view");
        assert!(!view.is_displayed().unwrap());
        assert!(view.wait_for_hide().is_ok());
        assert!(view.wait_for_display().unwrap_err().is_timeout());
    }

    #[test]
    fn test_wait_for_display_polls() {
        let session = MockSession::new();
        let root = session.add_element("#day-view");
        session.set_display_sequence(&root, [false, false, true]);
        let view = View::new(session.scope(&fast()), "day", "#day-view");
        let result = view.wait_for_display().unwrap();
        assert_eq!(result.attempts, 3);
        assert_eq!(view.name(), "day");
    }

    #[test]
    fn test_child_selectors() {
        let session = MockSession::new();
        let title = session.add_element("#event-view .title");
        session.set_text(&title, "Lunch");
        let view = View::new(session.scope(&fast()), "read event", "#event-view");
        assert_eq!(view.child(".title").to_css(), "#event-view .title");
        assert_eq!(view.text_of(".title").unwrap(), "Lunch");
    }
}
