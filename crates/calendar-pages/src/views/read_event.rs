//! Read-only event details.

use super::{delegate_displayable, View};
use crate::result::PageResult;
use crate::session::{ScopedSession, Session};

/// Root of the event details view
pub const READ_EVENT_VIEW: &str = "#event-view";

/// Details of a saved event
#[derive(Debug)]
pub struct ReadEventView<'a, S: Session + ?Sized> {
    view: View<'a, S>,
}

impl<'a, S: Session + ?Sized> ReadEventView<'a, S> {
    /// Create the read event view
    pub fn new(client: ScopedSession<'a, S>) -> Self {
        Self {
            view: View::new(client, "read event", READ_EVENT_VIEW),
        }
    }

    /// Event title
    pub fn title(&self) -> PageResult<String> {
        self.view.text_of(".title .content")
    }

    /// Event location
    pub fn location(&self) -> PageResult<String> {
        self.view.text_of(".location .content")
    }

    /// Event description
    pub fn description(&self) -> PageResult<String> {
        self.view.text_of(".description .content")
    }

    /// Name of the calendar the event belongs to
    pub fn calendar(&self) -> PageResult<String> {
        self.view.text_of(".current-calendar .content")
    }

    /// Reminder presets, in display order
    pub fn reminders(&self) -> PageResult<Vec<String>> {
        let session = self.view.client().session();
        self.view
            .find_all(".alarms .content > div")?
            .iter()
            .map(|alarm| session.text(alarm))
            .collect()
    }

    /// Open the event in the edit form
    pub fn edit(&self) -> PageResult<&Self> {
        self.view.click(".edit")?;
        Ok(self)
    }

    /// Leave the details view
    pub fn cancel(&self) -> PageResult<&Self> {
        self.view.click(".cancel")?;
        Ok(self)
    }
}

delegate_displayable!(ReadEventView);
