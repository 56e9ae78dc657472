//! Event list under the month grid for the selected day.

use super::{delegate_displayable, View};
use crate::locator::ElementHandle;
use crate::result::{PageError, PageResult};
use crate::session::{ScopedSession, Session};

/// Root of the month-day event list
pub const MONTH_DAY_VIEW: &str = "#months-day-view";

/// Events of the day selected in the month view
#[derive(Debug)]
pub struct MonthDayView<'a, S: Session + ?Sized> {
    view: View<'a, S>,
}

impl<'a, S: Session + ?Sized> MonthDayView<'a, S> {
    /// Create the month-day view
    pub fn new(client: ScopedSession<'a, S>) -> Self {
        Self {
            view: View::new(client, "month day", MONTH_DAY_VIEW),
        }
    }

    /// Listed events
    pub fn events(&self) -> PageResult<Vec<ElementHandle>> {
        self.view.find_all(".event")
    }

    /// Number of listed events
    pub fn event_count(&self) -> PageResult<usize> {
        Ok(self.events()?.len())
    }

    /// Open the event at `index` (0-based)
    pub fn open_event(&self, index: usize) -> PageResult<&Self> {
        let events = self.events()?;
        let event = events.get(index).ok_or_else(|| {
            PageError::not_found(format!("{} #{index}", self.view.child(".event")))
        })?;
        tracing::debug!(index, "opening event from month day list");
        self.view.client().session().click(event)?;
        Ok(self)
    }
}

delegate_displayable!(MonthDayView);
