//! Day view.

use super::{delegate_displayable, View};
use crate::locator::ElementHandle;
use crate::result::PageResult;
use crate::session::{ScopedSession, Session};

/// Root of the day view
pub const DAY_VIEW: &str = "#day-view";

/// The single-day agenda
#[derive(Debug)]
pub struct DayView<'a, S: Session + ?Sized> {
    view: View<'a, S>,
}

impl<'a, S: Session + ?Sized> DayView<'a, S> {
    /// Create the day view
    pub fn new(client: ScopedSession<'a, S>) -> Self {
        Self {
            view: View::new(client, "day", DAY_VIEW),
        }
    }

    /// Events shown for the day
    pub fn events(&self) -> PageResult<Vec<ElementHandle>> {
        self.view.find_all(".event")
    }

    /// Titles of the events shown for the day, in display order
    pub fn event_titles(&self) -> PageResult<Vec<String>> {
        let session = self.view.client().session();
        self.events()?
            .iter()
            .map(|event| session.text(event))
            .collect()
    }

    /// All-day events
    pub fn all_day_events(&self) -> PageResult<Vec<ElementHandle>> {
        self.view.find_all(".alldays .event")
    }
}

delegate_displayable!(DayView);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CalendarConfig;
    use crate::mock::MockSession;
    use crate::views::Displayable;

    #[test]
    fn test_event_titles() {
        let session = MockSession::new();
        let lunch = session.add_element("#day-view .event");
        let gym = session.add_element("#day-view .event");
        session.set_text(&lunch, "Lunch");
        session.set_text(&gym, "Gym");

        let day = DayView::new(session.scope(&CalendarConfig::default()));
        assert_eq!(day.event_titles().unwrap(), vec!["Lunch", "Gym"]);
        assert!(day.all_day_events().unwrap().is_empty());
    }

    #[test]
    fn test_displayed() {
        let session = MockSession::new();
        let _ = session.add_element(DAY_VIEW);
        let day = DayView::new(session.scope(&CalendarConfig::default()));
        assert!(day.is_displayed().unwrap());
        assert_eq!(day.name(), "day");
    }
}
