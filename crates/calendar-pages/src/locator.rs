//! Selectors and element handles.
//!
//! Page objects never pass raw strings to the session: every lookup goes
//! through a [`Selector`], and every element the session returns is an opaque
//! [`ElementHandle`] that is only meaningful to the session that produced it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A point in viewport coordinates (CSS pixels)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
}

impl Point {
    /// Create a new point
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// CSS selector for locating elements
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selector(String);

impl Selector {
    /// Create a CSS selector (e.g., `#view-selector a[href="/day/"]`)
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self(selector.into())
    }

    /// CSS form of this selector, as sent to the remote
    #[must_use]
    pub fn to_css(&self) -> String {
        self.0.clone()
    }

    /// Scope this selector under a parent selector
    #[must_use]
    pub fn within(&self, parent: &Self) -> Self {
        Self(format!("{} {}", parent.0, self.0))
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_css())
    }
}

/// Handle to a remote element
///
/// The `id` is whatever reference the session uses for the element; the
/// selector it was found with is kept for error messages and logging.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementHandle {
    /// Session-specific element reference
    pub id: String,
    /// Selector the element was found with
    pub selector: String,
}

impl ElementHandle {
    /// Create a new element handle
    #[must_use]
    pub fn new(id: impl Into<String>, selector: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            selector: selector.into(),
        }
    }
}
