//! Advanced settings (accounts and sync).

use super::{delegate_displayable, View};
use crate::locator::ElementHandle;
use crate::result::PageResult;
use crate::session::{ScopedSession, Session};

/// Root of the advanced settings view
pub const ADVANCED_SETTINGS_VIEW: &str = "#advanced-settings-view";

/// Account and sync settings
#[derive(Debug)]
pub struct AdvancedSettingsView<'a, S: Session + ?Sized> {
    view: View<'a, S>,
}

impl<'a, S: Session + ?Sized> AdvancedSettingsView<'a, S> {
    /// Create the advanced settings view
    pub fn new(client: ScopedSession<'a, S>) -> Self {
        Self {
            view: View::new(client, "advanced settings", ADVANCED_SETTINGS_VIEW),
        }
    }

    /// The sync frequency select
    pub fn sync_frequency(&self) -> PageResult<ElementHandle> {
        self.view.find("select[name=\"syncFrequency\"]")
    }

    /// The "add account" button
    pub fn create_account_button(&self) -> PageResult<ElementHandle> {
        self.view.find(".create-account")
    }

    /// Configured account names
    pub fn accounts(&self) -> PageResult<Vec<String>> {
        let session = self.view.client().session();
        self.view
            .find_all(".account-list li")?
            .iter()
            .map(|account| session.text(account))
            .collect()
    }

    /// Leave advanced settings
    pub fn close(&self) -> PageResult<&Self> {
        self.view.click("button.back")?;
        Ok(self)
    }
}

delegate_displayable!(AdvancedSettingsView);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CalendarConfig;
    use crate::mock::MockSession;
    use crate::result::PageError;

    #[test]
    fn test_accessors() {
        let session = MockSession::new();
        let select = session.add_element("#advanced-settings-view select[name=\"syncFrequency\"]");
        let account = session.add_element("#advanced-settings-view .account-list li");
        session.set_text(&account, "Offline calendar");

        let settings = AdvancedSettingsView::new(session.scope(&CalendarConfig::default()));
        assert_eq!(settings.sync_frequency().unwrap(), select);
        assert_eq!(settings.accounts().unwrap(), vec!["Offline calendar"]);
    }

    #[test]
    fn test_missing_button() {
        let session = MockSession::new();
        let config = CalendarConfig::new().with_search_timeout(10).with_poll_interval(1);
        let settings = AdvancedSettingsView::new(session.scope(&config));
        let err = settings.create_account_button().unwrap_err();
        assert!(matches!(err, PageError::ElementNotFound { .. }));
    }
}
