//! Add/edit event form.
//!
//! Each form field has an explicit setter. Text fields are cleared and typed
//! into; date and time inputs get their value assigned by script followed by
//! a `change` event, since the platform pickers cannot be typed into.

use super::{delegate_displayable, View};
use crate::event::{date_input_value, time_input_value, EventForm};
use crate::locator::ElementHandle;
use crate::result::{PageError, PageResult};
use crate::session::{ScopedSession, Session};
use chrono::NaiveDateTime;
use serde_json::Value;

/// Root of the edit form
pub const EDIT_EVENT_VIEW: &str = "#modify-event-view";

const TITLE: &str = "input[name=\"title\"]";
const LOCATION: &str = "input[name=\"location\"]";
const DESCRIPTION: &str = "textarea[name=\"description\"]";
const START_DATE: &str = "input[name=\"startDate\"]";
const START_TIME: &str = "input[name=\"startTime\"]";
const END_DATE: &str = "input[name=\"endDate\"]";
const END_TIME: &str = "input[name=\"endTime\"]";
const ALARMS: &str = "select[name=\"alarm[]\"]";

const SELECT_OPTION_SCRIPT: &str = r"var select = arguments[0];
for (var i = 0; i < select.options.length; i++) {
  if (select.options[i].textContent.trim() === WANTED) {
    select.selectedIndex = i;
    select.dispatchEvent(new Event('change', { bubbles: true }));
    return true;
  }
}
return false;";

/// The add/edit event form
#[derive(Debug)]
pub struct EditEventView<'a, S: Session + ?Sized> {
    view: View<'a, S>,
}

impl<'a, S: Session + ?Sized> EditEventView<'a, S> {
    /// Create the edit form view
    pub fn new(client: ScopedSession<'a, S>) -> Self {
        Self {
            view: View::new(client, "edit event", EDIT_EVENT_VIEW),
        }
    }

    fn type_into(&self, css: &str, text: &str) -> PageResult<&Self> {
        let session = self.view.client().session();
        let input = self.view.find(css)?;
        session.clear(&input)?;
        if !text.is_empty() {
            session.send_keys(&input, text)?;
        }
        Ok(self)
    }

    fn assign_value(&self, css: &str, value: &str) -> PageResult<&Self> {
        let input = self.view.find(css)?;
        let script = format!(
            "arguments[0].value = {};\narguments[0].dispatchEvent(new Event('change', {{ bubbles: true }}));",
            serde_json::to_string(value)?
        );
        let _ = self.view.client().session().script_with(&input, &script)?;
        Ok(self)
    }

    /// Set the title
    pub fn set_title(&self, title: &str) -> PageResult<&Self> {
        self.type_into(TITLE, title)
    }

    /// Set the location
    pub fn set_location(&self, location: &str) -> PageResult<&Self> {
        self.type_into(LOCATION, location)
    }

    /// Set the description
    pub fn set_description(&self, description: &str) -> PageResult<&Self> {
        self.type_into(DESCRIPTION, description)
    }

    /// Set the start date (date part only)
    pub fn set_start_date(&self, at: &NaiveDateTime) -> PageResult<&Self> {
        self.assign_value(START_DATE, &date_input_value(at))
    }

    /// Set the start time (time part only)
    pub fn set_start_time(&self, at: &NaiveDateTime) -> PageResult<&Self> {
        self.assign_value(START_TIME, &time_input_value(at))
    }

    /// Set the end date (date part only)
    pub fn set_end_date(&self, at: &NaiveDateTime) -> PageResult<&Self> {
        self.assign_value(END_DATE, &date_input_value(at))
    }

    /// Set the end time (time part only)
    pub fn set_end_time(&self, at: &NaiveDateTime) -> PageResult<&Self> {
        self.assign_value(END_TIME, &time_input_value(at))
    }

    /// Choose reminder presets by their visible text.
    ///
    /// The form grows a new alarm select after each choice, so the n-th
    /// reminder goes into the n-th select once it exists.
    pub fn set_reminders<T: AsRef<str>>(&self, reminders: &[T]) -> PageResult<&Self> {
        let client = self.view.client();
        let alarms = self.view.child(ALARMS);
        for (index, reminder) in reminders.iter().enumerate() {
            let reminder = reminder.as_ref();
            let mut select = None;
            let _ = client.wait_for(&format!("{alarms} #{index}"), || {
                select = client.find_elements(&alarms)?.into_iter().nth(index);
                Ok(select.is_some())
            })?;
            let select = select.ok_or_else(|| PageError::not_found(alarms.to_css()))?;
            self.choose_option(&select, reminder)?;
        }
        Ok(self)
    }

    fn choose_option(&self, select: &ElementHandle, text: &str) -> PageResult<()> {
        let script = SELECT_OPTION_SCRIPT.replace("WANTED", &serde_json::to_string(text)?);
        match self.view.client().session().script_with(select, &script)? {
            Value::Bool(true) => Ok(()),
            Value::Bool(false) => Err(PageError::not_found(format!(
                "{} option {text:?}",
                select.selector
            ))),
            other => Err(PageError::Script {
                message: format!("selecting option {text:?} returned {other}"),
            }),
        }
    }

    /// Fill every field, in form order
    pub fn fill(&self, form: &EventForm) -> PageResult<&Self> {
        tracing::debug!(title = %form.title, start = %form.start, end = %form.end, "filling event form");
        self.set_title(&form.title)?
            .set_location(&form.location)?
            .set_description(&form.description)?
            .set_start_date(&form.start)?
            .set_start_time(&form.start)?
            .set_end_date(&form.end)?
            .set_end_time(&form.end)?
            .set_reminders(form.reminders.as_slice())
    }

    /// Current value of the title input
    pub fn title(&self) -> PageResult<String> {
        let input = self.view.find(TITLE)?;
        let value = self
            .view
            .client()
            .session()
            .script_with(&input, "return arguments[0].value;")?;
        Ok(value.as_str().unwrap_or_default().to_string())
    }

    /// Validation errors currently shown on the form
    pub fn errors(&self) -> PageResult<Vec<String>> {
        let session = self.view.client().session();
        self.view
            .find_all(".errors li")?
            .iter()
            .map(|e| session.text(e))
            .collect()
    }

    /// Press save
    pub fn save(&self) -> PageResult<&Self> {
        self.view.click("button.save")?;
        Ok(self)
    }

    /// Press cancel
    pub fn cancel(&self) -> PageResult<&Self> {
        self.view.click("button.cancel")?;
        Ok(self)
    }
}

delegate_displayable!(EditEventView);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CalendarConfig;
    use crate::mock::MockSession;
    use chrono::NaiveDate;
    use serde_json::json;

    fn fast() -> CalendarConfig {
        CalendarConfig::new()
            .with_search_timeout(30)
            .with_poll_interval(1)
    }

    fn form_session() -> MockSession {
        let session = MockSession::new();
        for field in [
            TITLE,
            LOCATION,
            DESCRIPTION,
            START_DATE,
            START_TIME,
            END_DATE,
            END_TIME,
            ALARMS,
            "button.save",
        ] {
            let _ = session.add_element(&format!("{EDIT_EVENT_VIEW} {field}"));
        }
        session.push_script_result("arguments[0].value =", Value::Null);
        session
    }

    fn at(h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2014, 1, 5)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_text_fields_are_cleared_then_typed() {
        let session = form_session();
        let form = EditEventView::new(session.scope(&fast()));
        let _ = form.set_title("Lunch").unwrap();

        let clear = session.call_index("clear:#modify-event-view input[name=\"title\"]");
        let typed = session.call_index("send_keys:#modify-event-view input[name=\"title\"]:Lunch");
        assert!(clear.unwrap() < typed.unwrap());
    }

    #[test]
    fn test_empty_text_only_clears() {
        let session = form_session();
        let form = EditEventView::new(session.scope(&fast()));
        let _ = form.set_location("").unwrap();
        assert!(session.was_called("clear:#modify-event-view input[name=\"location\"]"));
        assert!(!session.was_called("send_keys:#modify-event-view input[name=\"location\"]"));
    }

    #[test]
    fn test_date_and_time_assigned_by_script() {
        let session = form_session();
        let form = EditEventView::new(session.scope(&fast()));
        let _ = form.set_start_date(&at(9)).unwrap().set_start_time(&at(9)).unwrap();

        let history = session.history();
        assert!(history
            .iter()
            .any(|c| c.contains("startDate") && c.contains("\"2014-01-05\"")));
        assert!(history
            .iter()
            .any(|c| c.contains("startTime") && c.contains("\"09:00\"")));
    }

    #[test]
    fn test_fill_order() {
        let session = form_session();
        let form = EditEventView::new(session.scope(&fast()));
        let event = EventForm {
            title: "Standup".to_string(),
            location: "Room 1".to_string(),
            description: String::new(),
            start: at(9),
            end: at(11),
            reminders: vec![],
        };
        let _ = form.fill(&event).unwrap();

        let order = [
            "clear:#modify-event-view input[name=\"title\"]",
            "clear:#modify-event-view input[name=\"location\"]",
            "clear:#modify-event-view textarea[name=\"description\"]",
            "script_with:#modify-event-view input[name=\"startDate\"]",
            "script_with:#modify-event-view input[name=\"startTime\"]",
            "script_with:#modify-event-view input[name=\"endDate\"]",
            "script_with:#modify-event-view input[name=\"endTime\"]",
        ];
        let positions: Vec<usize> = order
            .iter()
            .map(|call| session.call_index(call).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }

    mod reminder_tests {
        use super::*;

        #[test]
        fn test_choose_known_preset() {
            let session = form_session();
            session.push_script_result("selectedIndex", json!(true));
            let form = EditEventView::new(session.scope(&fast()));
            let _ = form.set_reminders(&["5 minutes before"]).unwrap();
            assert!(session
                .history()
                .iter()
                .any(|c| c.contains("selectedIndex") && c.contains("\"5 minutes before\"")));
        }

        #[test]
        fn test_unknown_preset_is_not_found() {
            let session = form_session();
            session.push_script_result("selectedIndex", json!(false));
            let form = EditEventView::new(session.scope(&fast()));
            let err = form.set_reminders(&["in a fortnight"]).unwrap_err();
            assert!(matches!(err, PageError::ElementNotFound { .. }));
            assert!(err.to_string().contains("in a fortnight"));
        }

        #[test]
        fn test_missing_second_select_times_out() {
            let session = form_session();
            session.push_script_result("selectedIndex", json!(true));
            let form = EditEventView::new(session.scope(&fast()));
            let err = form
                .set_reminders(&["5 minutes before", "1 hour before"])
                .unwrap_err();
            assert!(err.is_timeout());
        }
    }

    #[test]
    fn test_save_clicks_button() {
        let session = form_session();
        let form = EditEventView::new(session.scope(&fast()));
        let _ = form.save().unwrap();
        assert!(session.was_called("click:#modify-event-view button.save"));
    }
}
