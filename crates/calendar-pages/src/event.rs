//! Event descriptors and default-time resolution.
//!
//! An [`EventDescriptor`] is what a test asks for ("an event at 9 for two
//! hours"); an [`EventForm`] is what gets typed into the edit form once every
//! default has been applied.

use crate::result::{PageError, PageResult};
use chrono::{Datelike, NaiveDateTime, NaiveTime, TimeDelta};
use serde::{Deserialize, Serialize};

/// Duration used when neither an end date nor a duration is given
pub const DEFAULT_DURATION_HOURS: f64 = 1.0;

const MS_PER_HOUR: f64 = 3_600_000.0;

/// Description of an event to create
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventDescriptor {
    /// Event title
    pub title: String,
    /// Event location
    pub location: Option<String>,
    /// Event description
    pub description: Option<String>,
    /// Explicit start; wins over `start_hour`
    pub start_date: Option<NaiveDateTime>,
    /// Explicit end; wins over `duration_hours`
    pub end_date: Option<NaiveDateTime>,
    /// Start today at this hour. Zero is a real hour, not "unset".
    pub start_hour: Option<u32>,
    /// Length of the event in hours; zero falls back to the default
    pub duration_hours: Option<f64>,
    /// Reminder presets, e.g. "5 minutes before"
    pub reminders: Vec<String>,
}

impl EventDescriptor {
    /// Create a descriptor with a title
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Set the location
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Set the description
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set an explicit start
    #[must_use]
    pub const fn with_start_date(mut self, start: NaiveDateTime) -> Self {
        self.start_date = Some(start);
        self
    }

    /// Set an explicit end
    #[must_use]
    pub const fn with_end_date(mut self, end: NaiveDateTime) -> Self {
        self.end_date = Some(end);
        self
    }

    /// Start today at `hour`
    #[must_use]
    pub const fn with_start_hour(mut self, hour: u32) -> Self {
        self.start_hour = Some(hour);
        self
    }

    /// Set the duration in hours
    #[must_use]
    pub const fn with_duration_hours(mut self, hours: f64) -> Self {
        self.duration_hours = Some(hours);
        self
    }

    /// Add a reminder preset
    #[must_use]
    pub fn with_reminder(mut self, reminder: impl Into<String>) -> Self {
        self.reminders.push(reminder.into());
        self
    }

    /// Resolve start and end against the current time `now`
    pub fn resolve_times(&self, now: NaiveDateTime) -> PageResult<EventTimes> {
        let start = match (self.start_date, self.start_hour) {
            (Some(start), _) => start,
            (None, Some(hour)) => {
                let time = NaiveTime::from_hms_opt(hour, 0, 0).ok_or_else(|| {
                    PageError::invalid_argument(format!("start hour {hour} is not in 0..=23"))
                })?;
                now.date().and_time(time)
            }
            (None, None) => now,
        };

        let end = match self.end_date {
            Some(end) => end,
            None => {
                // zero means "not given", unlike start_hour
                let hours = self
                    .duration_hours
                    .filter(|hours| *hours != 0.0)
                    .unwrap_or(DEFAULT_DURATION_HOURS);
                start
                    .checked_add_signed(duration_from_hours(hours)?)
                    .ok_or_else(|| {
                        PageError::invalid_argument(format!(
                            "end of a {hours}h event starting {start} is out of range"
                        ))
                    })?
            }
        };

        Ok(EventTimes { start, end })
    }

    /// Apply every default and produce the values to type into the form
    pub fn to_form(&self, now: NaiveDateTime) -> PageResult<EventForm> {
        let EventTimes { start, end } = self.resolve_times(now)?;
        Ok(EventForm {
            title: self.title.clone(),
            location: self.location.clone().unwrap_or_default(),
            description: self.description.clone().unwrap_or_default(),
            start,
            end,
            reminders: self.reminders.clone(),
        })
    }
}

fn duration_from_hours(hours: f64) -> PageResult<TimeDelta> {
    if !hours.is_finite() || hours < 0.0 {
        return Err(PageError::invalid_argument(format!(
            "duration must be a non-negative number of hours, got {hours}"
        )));
    }
    let ms = (hours * MS_PER_HOUR).round() as i64;
    TimeDelta::try_milliseconds(ms)
        .ok_or_else(|| PageError::invalid_argument(format!("duration of {hours}h is too long")))
}

/// Effective start and end of an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTimes {
    /// Start
    pub start: NaiveDateTime,
    /// End
    pub end: NaiveDateTime,
}

/// Fully-resolved values for the edit-event form
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventForm {
    /// Title
    pub title: String,
    /// Location (empty when not given)
    pub location: String,
    /// Description (empty when not given)
    pub description: String,
    /// Start date and time
    pub start: NaiveDateTime,
    /// End date and time
    pub end: NaiveDateTime,
    /// Reminder presets
    pub reminders: Vec<String>,
}

/// Format a date as zero-padded `MM/DD/YYYY`
#[must_use]
pub fn format_date<D: Datelike>(date: &D) -> String {
    format!("{:02}/{:02}/{}", date.month(), date.day(), date.year())
}

/// Value for an `<input type="date">`
#[must_use]
pub fn date_input_value(at: &NaiveDateTime) -> String {
    at.format("%Y-%m-%d").to_string()
}

/// Value for an `<input type="time">`
#[must_use]
pub fn time_input_value(at: &NaiveDateTime) -> String {
    at.format("%H:%M").to_string()
}
