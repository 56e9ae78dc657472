//! Wall clock used for default event times.
//!
//! Creating an event without explicit dates starts it "now". Tests pin "now"
//! with [`Clock::fixed`] so the resolved times are deterministic.

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Clock state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClockState {
    /// Local system time
    System,
    /// Frozen at a fixed local time
    Fixed,
}

/// Source of the current local time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Clock {
    fixed: Option<NaiveDateTime>,
}

impl Clock {
    /// Clock reading local system time
    #[must_use]
    pub const fn system() -> Self {
        Self { fixed: None }
    }

    /// Clock frozen at `now`
    #[must_use]
    pub const fn fixed(now: NaiveDateTime) -> Self {
        Self { fixed: Some(now) }
    }

    /// Current local time
    #[must_use]
    pub fn now(&self) -> NaiveDateTime {
        self.fixed.unwrap_or_else(|| Local::now().naive_local())
    }

    /// Get current state
    #[must_use]
    pub const fn state(&self) -> ClockState {
        if self.fixed.is_some() {
            ClockState::Fixed
        } else {
            ClockState::System
        }
    }
}
