//! Calendar Pages: page objects for driving the calendar app end to end.
//!
//! Test scripts talk to a remote automation session (Marionette or any
//! WebDriver-like client) through the [`Session`] trait and drive the app
//! through [`CalendarPage`] and its sub-views instead of raw selectors.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                  Calendar Pages Architecture                    │
//! ├─────────────────────────────────────────────────────────────────┤
//! │   ┌────────────┐    ┌──────────────┐    ┌──────────────┐        │
//! │   │ Test       │    │ CalendarPage │    │ Session      │        │
//! │   │ Script     │───►│ + sub-views  │───►│ (remote or   │        │
//! │   │            │    │              │    │  MockSession)│        │
//! │   └────────────┘    └──────────────┘    └──────────────┘        │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use calendar_pages::{CalendarConfig, CalendarPage, EventDescriptor, LaunchOptions, MockSession};
//!
//! let session = MockSession::new();
//! let _ = session.add_element("body");
//! let mut calendar = CalendarPage::new(&session, CalendarConfig::default()).unwrap();
//! calendar.launch(LaunchOptions::default()).unwrap();
//!
//! let descriptor = EventDescriptor::new("Lunch").with_start_hour(12);
//! assert_eq!(descriptor.start_hour, Some(12));
//! ```

#![warn(missing_docs)]
// Lints are configured in workspace Cargo.toml [workspace.lints.clippy]

mod calendar;
mod event;
mod gesture;
mod locator;
mod result;
mod session;

/// Wall clock for default event times
pub mod clock;

/// Configuration loading (YAML/JSON)
#[allow(clippy::missing_errors_doc, clippy::must_use_candidate)]
pub mod config;

/// Scriptable in-memory session for tests
#[allow(clippy::missing_errors_doc, clippy::must_use_candidate)]
pub mod mock;

/// Logging setup and the page action trace
#[allow(
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::cast_possible_truncation
)]
pub mod tracing_support;

/// Sub-view page objects
pub mod views;

/// Wait mechanisms
#[allow(clippy::missing_errors_doc, clippy::must_use_candidate)]
pub mod wait;

pub use calendar::{CalendarPage, OverflowMeasurement, OVERFLOW_TOLERANCE_PX};
pub use clock::{Clock, ClockState};
pub use config::{CalendarConfig, LaunchOptions};
pub use event::{
    date_input_value, format_date, time_input_value, EventDescriptor, EventForm, EventTimes,
    DEFAULT_DURATION_HOURS,
};
pub use gesture::{swipe_path, Actions, Gesture, SwipeDirection, Viewport};
pub use locator::{ElementHandle, Point, Selector};
pub use mock::MockSession;
pub use result::{PageError, PageResult};
pub use session::{ScopedSession, Session};
pub use tracing_support::{init_logging, ActionStatus, ActionTrace, TracedAction};
pub use views::{
    AdvancedSettingsView, DayView, Displayable, EditEventView, MonthDayView, MonthView,
    ReadEventView, WeekView,
};
pub use wait::{WaitOptions, WaitResult};

/// Prelude for convenient imports
pub mod prelude {
    pub use super::{
        CalendarConfig, CalendarPage, Clock, Displayable, EventDescriptor, LaunchOptions,
        PageError, PageResult, Selector, Session, SwipeDirection,
    };
}
