//! Remote automation session.
//!
//! [`Session`] is the narrow capability surface page objects need from an
//! automation client: single-shot element lookups, script evaluation, app
//! switching and gestures. Each call blocks until the remote responds.
//!
//! [`ScopedSession`] is the narrowed view a page object actually drives. It
//! adds the implicit wait: lookups are retried until the search timeout.
//!
//! ```text
//! ┌──────────────┐   &S    ┌───────────────┐  find/wait  ┌──────────────┐
//! │ test script  │────────►│ ScopedSession │────────────►│ impl Session │
//! │ (owns S)     │         │ (timeout)     │             │ (remote)     │
//! └──────────────┘         └───────────────┘             └──────────────┘
//! ```

use crate::config::CalendarConfig;
use crate::gesture::Gesture;
use crate::locator::{ElementHandle, Selector};
use crate::result::{PageError, PageResult};
use crate::wait::{self, WaitOptions, WaitResult};
use serde_json::Value;
use std::fmt;

/// Capabilities of a remote automation session.
///
/// Implement this for a Marionette/WebDriver client. Methods take `&self`;
/// a session is driven by one test script at a time and need not be `Sync`.
pub trait Session {
    /// Look up the first element matching `selector`, once, without waiting
    fn find_element(&self, selector: &Selector) -> PageResult<Option<ElementHandle>>;

    /// Look up every element matching `selector`, once, without waiting
    fn find_elements(&self, selector: &Selector) -> PageResult<Vec<ElementHandle>>;

    /// Evaluate a script body in the current frame and return its result
    fn execute_script(&self, script: &str) -> PageResult<Value>;

    /// Evaluate a script body with `element` bound to `arguments[0]`
    fn script_with(&self, element: &ElementHandle, script: &str) -> PageResult<Value>;

    /// Click an element
    fn click(&self, element: &ElementHandle) -> PageResult<()>;

    /// Clear an input element
    fn clear(&self, element: &ElementHandle) -> PageResult<()>;

    /// Type text into an element
    fn send_keys(&self, element: &ElementHandle, text: &str) -> PageResult<()>;

    /// Visible text of an element
    fn text(&self, element: &ElementHandle) -> PageResult<String>;

    /// Whether an element is displayed
    fn is_displayed(&self, element: &ElementHandle) -> PageResult<bool>;

    /// Launch (or foreground) the app with the given origin
    fn launch_app(&self, origin: &str) -> PageResult<()>;

    /// Move focus into the frame of the app with the given origin
    fn switch_to_app(&self, origin: &str) -> PageResult<()>;

    /// Move focus back to the top-level frame
    fn switch_to_frame(&self) -> PageResult<()>;

    /// Perform a touch gesture
    fn perform(&self, gesture: &Gesture) -> PageResult<()>;

    /// Narrow this session with the timeouts from `config`
    fn scope(&self, config: &CalendarConfig) -> ScopedSession<'_, Self>
    where
        Self: Sized,
    {
        ScopedSession::new(self, config.wait_options())
    }
}

/// A session view with a bounded implicit wait
pub struct ScopedSession<'a, S: Session + ?Sized> {
    session: &'a S,
    options: WaitOptions,
}

impl<S: Session + ?Sized> Clone for ScopedSession<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S: Session + ?Sized> Copy for ScopedSession<'_, S> {}

impl<S: Session + ?Sized> fmt::Debug for ScopedSession<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopedSession")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<'a, S: Session + ?Sized> ScopedSession<'a, S> {
    /// Scope a session with explicit wait options
    pub const fn new(session: &'a S, options: WaitOptions) -> Self {
        Self { session, options }
    }

    /// Underlying session
    #[must_use]
    pub const fn session(&self) -> &'a S {
        self.session
    }

    /// Wait options applied by this scope
    #[must_use]
    pub const fn options(&self) -> &WaitOptions {
        &self.options
    }

    /// Find an element, retrying until the search timeout.
    ///
    /// Fails with [`PageError::ElementNotFound`] when nothing matched.
    pub fn find_element(&self, selector: &Selector) -> PageResult<ElementHandle> {
        let waited_for = selector.to_css();
        let found = wait::poll_until(&self.options, &waited_for, || {
            self.session.find_element(selector)
        });
        match found {
            Ok((element, _)) => {
                tracing::debug!(selector = %selector, element = %element.id, "found element");
                Ok(element)
            }
            Err(PageError::Timeout { .. }) => Err(PageError::not_found(waited_for)),
            Err(err) => Err(err),
        }
    }

    /// Find all elements matching `selector`; an empty result is not an error
    pub fn find_elements(&self, selector: &Selector) -> PageResult<Vec<ElementHandle>> {
        self.session.find_elements(selector)
    }

    /// Wait for an element to exist and be displayed
    pub fn wait_for_element(&self, selector: &Selector) -> PageResult<ElementHandle> {
        let waited_for = format!("{selector} displayed");
        let (element, result) = wait::poll_until(&self.options, &waited_for, || {
            match self.session.find_element(selector)? {
                Some(element) if self.session.is_displayed(&element)? => Ok(Some(element)),
                _ => Ok(None),
            }
        })?;
        tracing::debug!(
            selector = %selector,
            attempts = result.attempts,
            elapsed_ms = result.elapsed.as_millis() as u64,
            "element displayed"
        );
        Ok(element)
    }

    /// Poll a predicate until it holds or the search timeout elapses
    pub fn wait_for<F>(&self, waited_for: &str, predicate: F) -> PageResult<WaitResult>
    where
        F: FnMut() -> PageResult<bool>,
    {
        wait::wait_for(&self.options, waited_for, predicate)
    }

    /// Find an element and click it
    pub fn click(&self, selector: &Selector) -> PageResult<()> {
        let element = self.find_element(selector)?;
        tracing::debug!(selector = %selector, "click");
        self.session.click(&element)
    }

    /// Evaluate a script in the current frame
    pub fn execute_script(&self, script: &str) -> PageResult<Value> {
        self.session.execute_script(script)
    }
}
