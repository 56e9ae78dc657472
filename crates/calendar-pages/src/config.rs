//! Page object configuration
//!
//! Everything that used to be a global constant (app origins, the session
//! search timeout) is carried here and injected at construction, so the same
//! tests can target different builds of the calendar app.

use crate::result::{PageError, PageResult};
use crate::wait::{WaitOptions, DEFAULT_POLL_INTERVAL_MS, DEFAULT_SEARCH_TIMEOUT_MS};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Origin of the calendar app
pub const DEFAULT_CALENDAR_ORIGIN: &str = "app://calendar.gaiamobile.org";

/// Origin of the on-screen keyboard app
pub const DEFAULT_KEYBOARD_ORIGIN: &str = "app://keyboard.gaiamobile.org";

/// Default flick gesture duration
pub const DEFAULT_FLICK_DURATION_MS: u64 = 200;

/// Configuration for a calendar page object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    /// Origin the calendar app is launched from
    pub origin: String,
    /// Origin of the keyboard app (used by the keyboard-hide workaround)
    pub keyboard_origin: String,
    /// Implicit wait applied to element lookups and view waits
    pub search_timeout_ms: u64,
    /// Polling interval for all waits
    pub poll_interval_ms: u64,
    /// Duration of swipe flicks
    pub flick_duration_ms: u64,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            origin: DEFAULT_CALENDAR_ORIGIN.to_string(),
            keyboard_origin: DEFAULT_KEYBOARD_ORIGIN.to_string(),
            search_timeout_ms: DEFAULT_SEARCH_TIMEOUT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            flick_duration_ms: DEFAULT_FLICK_DURATION_MS,
        }
    }
}

impl CalendarConfig {
    /// Create a config with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the calendar origin
    #[must_use]
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }

    /// Set the keyboard origin
    #[must_use]
    pub fn with_keyboard_origin(mut self, origin: impl Into<String>) -> Self {
        self.keyboard_origin = origin.into();
        self
    }

    /// Set the search timeout
    #[must_use]
    pub const fn with_search_timeout(mut self, timeout_ms: u64) -> Self {
        self.search_timeout_ms = timeout_ms;
        self
    }

    /// Set the polling interval
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Set the flick duration
    #[must_use]
    pub const fn with_flick_duration(mut self, duration_ms: u64) -> Self {
        self.flick_duration_ms = duration_ms;
        self
    }

    /// Wait options derived from this config
    #[must_use]
    pub const fn wait_options(&self) -> WaitOptions {
        WaitOptions {
            timeout_ms: self.search_timeout_ms,
            poll_interval_ms: self.poll_interval_ms,
        }
    }

    /// Check the config is usable
    pub fn validate(&self) -> PageResult<()> {
        if self.origin.trim().is_empty() {
            return Err(config_error("origin must not be empty"));
        }
        if self.keyboard_origin.trim().is_empty() {
            return Err(config_error("keyboard_origin must not be empty"));
        }
        if self.search_timeout_ms == 0 {
            return Err(config_error("search_timeout_ms must be greater than zero"));
        }
        if self.poll_interval_ms == 0 {
            return Err(config_error("poll_interval_ms must be greater than zero"));
        }
        Ok(())
    }

    /// Parse from JSON
    pub fn from_json(json: &str) -> PageResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse from YAML
    pub fn from_yaml(yaml: &str) -> PageResult<Self> {
        let config: Self = serde_yaml_ng::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to YAML
    pub fn to_yaml(&self) -> PageResult<String> {
        Ok(serde_yaml_ng::to_string(self)?)
    }

    /// Load from a `.json`, `.yaml` or `.yml` file
    pub fn load(path: impl AsRef<Path>) -> PageResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let config = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json(&contents)?,
            Some("yaml" | "yml") => Self::from_yaml(&contents)?,
            other => {
                return Err(config_error(format!(
                    "unsupported config extension {other:?} for {}",
                    path.display()
                )))
            }
        };
        tracing::debug!(path = %path.display(), origin = %config.origin, "loaded calendar config");
        Ok(config)
    }
}

fn config_error(message: impl Into<String>) -> PageError {
    PageError::Config {
        message: message.into(),
    }
}

/// Options for [`crate::CalendarPage::launch`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchOptions {
    /// Wait for and dismiss the one-time swipe hint
    pub hide_swipe_hint: bool,
}

impl LaunchOptions {
    /// Launch options that dismiss the swipe hint
    #[must_use]
    pub const fn hiding_swipe_hint() -> Self {
        Self {
            hide_swipe_hint: true,
        }
    }
}
