//! The calendar app page object.
//!
//! [`CalendarPage`] is the single entry point test scripts use to drive the
//! calendar app. Action methods return `&mut Self` so steps chain:
//!
//! ```ignore
//! let mut calendar = CalendarPage::new(&session, CalendarConfig::default())?;
//! calendar.launch(LaunchOptions::hiding_swipe_hint())?;
//! calendar
//!     .open_month_view()?
//!     .create_event(&EventDescriptor::new("Lunch").with_start_hour(12))?
//!     .swipe_left()?;
//! ```

use crate::clock::Clock;
use crate::config::{CalendarConfig, LaunchOptions};
use crate::event::{format_date, EventDescriptor};
use crate::gesture::{swipe_path, Actions, SwipeDirection, Viewport};
use crate::locator::{ElementHandle, Selector};
use crate::result::{PageError, PageResult};
use crate::session::{ScopedSession, Session};
use crate::tracing_support::ActionTrace;
use crate::views::{
    AdvancedSettingsView, DayView, Displayable, EditEventView, MonthDayView, MonthView,
    ReadEventView, WeekView,
};
use chrono::Datelike;
use serde::Deserialize;

const BODY: &str = "body";
const SWIPE_HINT: &str = "#hint-swipe-to-navigate";
const ADD_EVENT_BUTTON: &str = "#time-header a[href=\"/event/add/\"]";
const HEADER_CONTENT: &str = "#current-month-year";
const DAY_VIEW_LINK: &str = "#view-selector a[href=\"/day/\"]";
const WEEK_VIEW_LINK: &str = "#view-selector a[href=\"/week/\"]";
const MONTH_VIEW_LINK: &str = "#view-selector a[href=\"/month/\"]";
const TODAY_LINK: &str = "#view-selector a[href=\"#today\"]";
const SETTINGS_BUTTON: &str = "#time-header button[data-l10n-id=\"settings\"]";
const ADVANCED_SETTINGS_LINK: &str = "a[href=\"/advanced-settings/\"]";

const KEYBOARD_HIDDEN_SCRIPT: &str = "return document.hidden;";
const VIEWPORT_SCRIPT: &str =
    "return { height: document.body.clientHeight, width: document.body.clientWidth };";
const OVERFLOW_SCRIPT: &str =
    "return { content: arguments[0].scrollWidth, container: arguments[0].clientWidth };";

/// Overflow tolerance in pixels, for sub-pixel rounding
pub const OVERFLOW_TOLERANCE_PX: f64 = 1.0;

/// Content and container widths of an element
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct OverflowMeasurement {
    /// `scrollWidth`
    pub content: f64,
    /// `clientWidth`
    pub container: f64,
}

impl OverflowMeasurement {
    /// Check the content fits its container.
    ///
    /// `message` prefixes the failure text as `"<message>: "`.
    pub fn verify(&self, message: Option<&str>) -> PageResult<()> {
        let prefix = message.map(|m| format!("{m}: ")).unwrap_or_default();
        if self.content == 0.0 {
            return Err(PageError::assertion(format!("{prefix}invalid content width")));
        }
        if self.container == 0.0 {
            return Err(PageError::assertion(format!(
                "{prefix}invalid container width"
            )));
        }
        if (self.content - self.container).abs() > OVERFLOW_TOLERANCE_PX {
            return Err(PageError::assertion(format!(
                "{prefix}content ({}px) is wider than container ({}px)",
                self.content, self.container
            )));
        }
        Ok(())
    }
}

fn open_view<S: Session>(
    client: &ScopedSession<'_, S>,
    link: &str,
    view: &dyn Displayable,
) -> PageResult<()> {
    client.click(&Selector::css(link))?;
    let result = view.wait_for_display()?;
    tracing::debug!(view = view.name(), attempts = result.attempts, "switched view");
    Ok(())
}

/// Page object for the calendar app
pub struct CalendarPage<'a, S: Session> {
    config: CalendarConfig,
    client: ScopedSession<'a, S>,
    clock: Clock,
    trace: ActionTrace,
    /// Advanced settings view
    pub advanced_settings: AdvancedSettingsView<'a, S>,
    /// Day view
    pub day: DayView<'a, S>,
    /// Add/edit event form
    pub edit_event: EditEventView<'a, S>,
    /// Month view
    pub month: MonthView<'a, S>,
    /// Event list for the day selected in the month view
    pub month_day: MonthDayView<'a, S>,
    /// Event details view
    pub read_event: ReadEventView<'a, S>,
    /// Week view
    pub week: WeekView<'a, S>,
}

impl<S: Session> std::fmt::Debug for CalendarPage<'_, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CalendarPage")
            .field("config", &self.config)
            .field("clock", &self.clock)
            .field("actions", &self.trace.actions().len())
            .finish_non_exhaustive()
    }
}

impl<'a, S: Session> CalendarPage<'a, S> {
    /// Build the page object and its views over `session`.
    ///
    /// Fails with [`PageError::Config`] when `config` does not validate.
    pub fn new(session: &'a S, config: CalendarConfig) -> PageResult<Self> {
        config.validate()?;
        let client = session.scope(&config);
        Ok(Self {
            advanced_settings: AdvancedSettingsView::new(client),
            day: DayView::new(client),
            edit_event: EditEventView::new(client),
            month: MonthView::new(client),
            month_day: MonthDayView::new(client),
            read_event: ReadEventView::new(client),
            week: WeekView::new(client),
            config,
            client,
            clock: Clock::system(),
            trace: ActionTrace::new(),
        })
    }

    /// Replace the clock used for default event times
    #[must_use]
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Configuration in use
    #[must_use]
    pub const fn config(&self) -> &CalendarConfig {
        &self.config
    }

    /// Scoped session the page drives
    #[must_use]
    pub const fn client(&self) -> &ScopedSession<'a, S> {
        &self.client
    }

    /// Actions performed through this page so far
    #[must_use]
    pub const fn trace(&self) -> &ActionTrace {
        &self.trace
    }

    fn traced<T>(
        &mut self,
        name: &str,
        attributes: &[(&str, String)],
        action: impl FnOnce(&mut Self) -> PageResult<T>,
    ) -> PageResult<T> {
        let _span = tracing::info_span!("page_action", action = name).entered();
        let id = self.trace.begin(name, attributes);
        let result = action(self);
        match &result {
            Ok(_) => {
                tracing::info!(action = name, "page action done");
                self.trace.end(&id, None);
            }
            Err(err) => {
                tracing::warn!(action = name, error = %err, "page action failed");
                self.trace.end(&id, Some(err));
            }
        }
        result
    }

    /// Launch the app and wait for its document.
    ///
    /// With `hide_swipe_hint`, also waits for and dismisses the first-run
    /// swipe hint.
    pub fn launch(&mut self, options: LaunchOptions) -> PageResult<&mut Self> {
        let attributes = [("origin", self.config.origin.clone())];
        self.traced("launch", &attributes, |page| {
            let session = page.client.session();
            session.launch_app(&page.config.origin)?;
            session.switch_to_app(&page.config.origin)?;
            let _ = page.client.wait_for_element(&Selector::css(BODY))?;

            if options.hide_swipe_hint {
                let hint = page.client.wait_for_element(&Selector::css(SWIPE_HINT))?;
                session.click(&hint)?;
            }
            Ok(())
        })?;
        Ok(self)
    }

    /// The "add event" control
    pub fn add_event_button(&self) -> PageResult<ElementHandle> {
        self.client.find_element(&Selector::css(ADD_EVENT_BUTTON))
    }

    /// The header showing the current month and year
    pub fn header_content(&self) -> PageResult<ElementHandle> {
        self.client.find_element(&Selector::css(HEADER_CONTENT))
    }

    /// Text of the month/year header
    pub fn header_title(&self) -> PageResult<String> {
        let header = self.header_content()?;
        self.client.session().text(&header)
    }

    /// Switch to the day view and wait for it
    pub fn open_day_view(&mut self) -> PageResult<&mut Self> {
        self.traced("open_day_view", &[], |page| {
            open_view(&page.client, DAY_VIEW_LINK, &page.day)
        })?;
        Ok(self)
    }

    /// Switch to the month view and wait for it
    pub fn open_month_view(&mut self) -> PageResult<&mut Self> {
        self.traced("open_month_view", &[], |page| {
            open_view(&page.client, MONTH_VIEW_LINK, &page.month)
        })?;
        Ok(self)
    }

    /// Switch to the week view and wait for it
    pub fn open_week_view(&mut self) -> PageResult<&mut Self> {
        self.traced("open_week_view", &[], |page| {
            open_view(&page.client, WEEK_VIEW_LINK, &page.week)
        })?;
        Ok(self)
    }

    /// Open advanced settings from the settings drawer and wait for it
    pub fn open_advanced_settings_view(&mut self) -> PageResult<&mut Self> {
        self.traced("open_advanced_settings_view", &[], |page| {
            page.client.click(&Selector::css(SETTINGS_BUTTON))?;
            page.client.click(&Selector::css(ADVANCED_SETTINGS_LINK))?;
            let _ = page.advanced_settings.wait_for_display()?;
            Ok(())
        })?;
        Ok(self)
    }

    /// Jump to today. Does not wait for the view to settle.
    pub fn click_today(&mut self) -> PageResult<&mut Self> {
        self.traced("click_today", &[], |page| {
            page.client.click(&Selector::css(TODAY_LINK))
        })?;
        Ok(self)
    }

    /// Create an event through the add-event form.
    ///
    /// Not transactional: a failing step leaves the form wherever it got to.
    pub fn create_event(&mut self, descriptor: &EventDescriptor) -> PageResult<&mut Self> {
        let attributes = [("title", descriptor.title.clone())];
        self.traced("create_event", &attributes, |page| {
            let form = descriptor.to_form(page.clock.now())?;
            tracing::info!(title = %form.title, start = %form.start, end = %form.end, "creating event");

            let add = page.add_event_button()?;
            page.client.session().click(&add)?;
            let _ = page.edit_event.wait_for_display()?;
            let _ = page.edit_event.fill(&form)?.save()?;

            page.keyboard_hide()?;
            let _ = page.edit_event.wait_for_hide()?;
            Ok(())
        })?;
        Ok(self)
    }

    /// Assert `element`'s content is no wider than its container (±1px).
    pub fn check_overflow(
        &mut self,
        element: &ElementHandle,
        message: Option<&str>,
    ) -> PageResult<&mut Self> {
        let attributes = [("selector", element.selector.clone())];
        self.traced("check_overflow", &attributes, |page| {
            let raw = page.client.session().script_with(element, OVERFLOW_SCRIPT)?;
            let measurement: OverflowMeasurement =
                serde_json::from_value(raw).map_err(|e| PageError::Script {
                    message: format!("overflow measurement of {}: {e}", element.selector),
                })?;
            tracing::debug!(
                selector = %element.selector,
                content = measurement.content,
                container = measurement.container,
                "measured overflow"
            );
            measurement.verify(message)
        })?;
        Ok(self)
    }

    /// Wait for the on-screen keyboard to finish hiding.
    ///
    /// Best-effort synchronization: closing a form while the keyboard is
    /// still animating away can misdirect the next click on slow devices.
    /// Bounded by the search timeout; leaves focus on the calendar app.
    pub fn wait_for_keyboard_hide(&mut self) -> PageResult<&mut Self> {
        self.traced("wait_for_keyboard_hide", &[], |page| page.keyboard_hide())?;
        Ok(self)
    }

    fn keyboard_hide(&self) -> PageResult<()> {
        let session = self.client.session();
        // apps can only be switched from the top-level frame
        session.switch_to_frame()?;
        session.switch_to_app(&self.config.keyboard_origin)?;
        let _ = self.client.wait_for("keyboard hidden", || {
            let hidden = session.execute_script(KEYBOARD_HIDDEN_SCRIPT)?;
            Ok(hidden.as_bool().unwrap_or(false))
        })?;

        session.switch_to_frame()?;
        session.switch_to_app(&self.config.origin)?;
        Ok(())
    }

    /// Format a date as `MM/DD/YYYY`, the way the app's headers show it
    #[must_use]
    pub fn format_date<D: Datelike>(&self, date: &D) -> String {
        format_date(date)
    }

    /// Swipe toward the left edge
    pub fn swipe_left(&mut self) -> PageResult<&mut Self> {
        self.swipe_toward(SwipeDirection::Left)
    }

    /// Swipe toward the right edge
    pub fn swipe_right(&mut self) -> PageResult<&mut Self> {
        self.swipe_toward(SwipeDirection::Right)
    }

    /// Swipe by direction name, `"left"` or `"right"`
    pub fn swipe(&mut self, direction: &str) -> PageResult<&mut Self> {
        let direction = direction.parse::<SwipeDirection>()?;
        self.swipe_toward(direction)
    }

    /// Flick across the document body at 20% of the viewport height
    pub fn swipe_toward(&mut self, direction: SwipeDirection) -> PageResult<&mut Self> {
        self.traced("swipe", &[("direction", direction.to_string())], |page| {
            let raw = page.client.execute_script(VIEWPORT_SCRIPT)?;
            let viewport: Viewport = serde_json::from_value(raw).map_err(|e| PageError::Script {
                message: format!("viewport size: {e}"),
            })?;
            let (start, end) = swipe_path(direction, viewport);

            let body = page.client.find_element(&Selector::css(BODY))?;
            Actions::new(page.client.session(), page.config.flick_duration_ms)
                .flick(&body, start.x, start.y, end.x, end.y)
                .perform()
        })?;
        Ok(self)
    }
}
