//! Week view.

use super::{delegate_displayable, View};
use crate::locator::ElementHandle;
use crate::result::PageResult;
use crate::session::{ScopedSession, Session};

/// Root of the week view
pub const WEEK_VIEW: &str = "#week-view";

/// Seven-day grid
#[derive(Debug)]
pub struct WeekView<'a, S: Session + ?Sized> {
    view: View<'a, S>,
}

impl<'a, S: Session + ?Sized> WeekView<'a, S> {
    /// Create the week view
    pub fn new(client: ScopedSession<'a, S>) -> Self {
        Self {
            view: View::new(client, "week", WEEK_VIEW),
        }
    }

    /// Events in the visible week
    pub fn events(&self) -> PageResult<Vec<ElementHandle>> {
        self.view.find_all(".event")
    }

    /// Day header labels (e.g. "Mon 6")
    pub fn day_headers(&self) -> PageResult<Vec<String>> {
        let session = self.view.client().session();
        self.view
            .find_all(".day-name")?
            .iter()
            .map(|header| session.text(header))
            .collect()
    }
}

delegate_displayable!(WeekView);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CalendarConfig;
    use crate::mock::MockSession;

    #[test]
    fn test_day_headers() {
        let session = MockSession::new();
        for label in ["Sun 5", "Mon 6"] {
            let header = session.add_element("#week-view .day-name");
            session.set_text(&header, label);
        }
        let week = WeekView::new(session.scope(&CalendarConfig::default()));
        assert_eq!(week.day_headers().unwrap(), vec!["Sun 5", "Mon 6"]);
        assert!(week.events().unwrap().is_empty());
    }
}
