//! Month view.

use super::{delegate_displayable, View};
use crate::locator::ElementHandle;
use crate::result::{PageError, PageResult};
use crate::session::{ScopedSession, Session};

/// Root of the month view
pub const MONTH_VIEW: &str = "#month-view";

const DAYS: &str = ".month.active li.calendar-day";

/// Month grid
#[derive(Debug)]
pub struct MonthView<'a, S: Session + ?Sized> {
    view: View<'a, S>,
}

impl<'a, S: Session + ?Sized> MonthView<'a, S> {
    /// Create the month view
    pub fn new(client: ScopedSession<'a, S>) -> Self {
        Self {
            view: View::new(client, "month", MONTH_VIEW),
        }
    }

    /// Day cells of the active month
    pub fn days(&self) -> PageResult<Vec<ElementHandle>> {
        self.view.find_all(DAYS)
    }

    /// The selected day cell
    pub fn selected_day(&self) -> PageResult<ElementHandle> {
        self.view.find(".month.active li.selected")
    }

    /// Click the cell whose label is `day_of_month`
    pub fn select_day(&self, day_of_month: u32) -> PageResult<&Self> {
        let session = self.view.client().session();
        let label = day_of_month.to_string();
        for day in self.days()? {
            if session.text(&day)?.trim() == label {
                session.click(&day)?;
                return Ok(self);
            }
        }
        Err(PageError::not_found(format!(
            "{} day {day_of_month}",
            self.view.child(DAYS)
        )))
    }
}

delegate_displayable!(MonthView);
