//! Scripted in-memory session for testing page objects without a device.
//!
//! ```ignore
//! let session = MockSession::new();
//! session.add_element("body");
//! session.push_script_result("clientHeight", json!({"height": 480, "width": 320}));
//!
//! let mut calendar = CalendarPage::new(&session, CalendarConfig::default())?;
//! calendar.swipe_left()?;
//! assert_eq!(session.gestures().len(), 1);
//! ```

use crate::gesture::Gesture;
use crate::locator::{ElementHandle, Selector};
use crate::result::{PageError, PageResult};
use crate::session::Session;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

#[derive(Debug, Default)]
struct MockState {
    next_id: usize,
    elements: Vec<ElementHandle>,
    displayed: HashMap<String, VecDeque<bool>>,
    texts: HashMap<String, String>,
    values: HashMap<String, String>,
    scripts: Vec<(String, VecDeque<Value>)>,
    click_effects: Vec<ClickEffect>,
    gestures: Vec<Gesture>,
    current_app: Option<String>,
    launched: Vec<String>,
    call_history: Vec<String>,
}

#[derive(Debug, Clone)]
struct ClickEffect {
    trigger: String,
    target: String,
    displayed: bool,
}

/// Mock session for unit and integration tests
#[derive(Debug, Default)]
pub struct MockSession {
    state: RefCell<MockState>,
}

impl MockSession {
    /// Create an empty mock session
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an element matching `css`; it is displayed unless told otherwise
    pub fn add_element(&self, css: &str) -> ElementHandle {
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        let element = ElementHandle::new(format!("el-{}", state.next_id), css);
        state.elements.push(element.clone());
        element
    }

    /// Remove an element
    pub fn remove_element(&self, element: &ElementHandle) {
        self.state
            .borrow_mut()
            .elements
            .retain(|e| e.id != element.id);
    }

    /// Fix the displayed state of an element
    pub fn set_displayed(&self, element: &ElementHandle, displayed: bool) {
        self.set_display_sequence(element, [displayed]);
    }

    /// Successive answers to `is_displayed`; the last answer repeats
    pub fn set_display_sequence(
        &self,
        element: &ElementHandle,
        sequence: impl IntoIterator<Item = bool>,
    ) {
        let _ = self
            .state
            .borrow_mut()
            .displayed
            .insert(element.id.clone(), sequence.into_iter().collect());
    }

    /// Visible text of an element
    pub fn set_text(&self, element: &ElementHandle, text: impl Into<String>) {
        let _ = self
            .state
            .borrow_mut()
            .texts
            .insert(element.id.clone(), text.into());
    }

    /// Value typed into an element so far
    #[must_use]
    pub fn value(&self, element: &ElementHandle) -> Option<String> {
        self.state.borrow().values.get(&element.id).cloned()
    }

    /// Queue a result for scripts containing `pattern`; the last one repeats
    pub fn push_script_result(&self, pattern: impl Into<String>, value: Value) {
        let pattern = pattern.into();
        let mut state = self.state.borrow_mut();
        if let Some((_, queue)) = state.scripts.iter_mut().find(|(p, _)| *p == pattern) {
            queue.push_back(value);
        } else {
            state.scripts.push((pattern, VecDeque::from([value])));
        }
    }

    /// Clicking `trigger` shows `target`
    pub fn on_click_show(&self, trigger: &ElementHandle, target: &ElementHandle) {
        self.add_click_effect(trigger, target, true);
    }

    /// Clicking `trigger` hides `target`
    pub fn on_click_hide(&self, trigger: &ElementHandle, target: &ElementHandle) {
        self.add_click_effect(trigger, target, false);
    }

    fn add_click_effect(&self, trigger: &ElementHandle, target: &ElementHandle, displayed: bool) {
        self.state.borrow_mut().click_effects.push(ClickEffect {
            trigger: trigger.id.clone(),
            target: target.id.clone(),
            displayed,
        });
    }

    /// Gestures performed so far
    #[must_use]
    pub fn gestures(&self) -> Vec<Gesture> {
        self.state.borrow().gestures.clone()
    }

    /// App currently focused, if any
    #[must_use]
    pub fn current_app(&self) -> Option<String> {
        self.state.borrow().current_app.clone()
    }

    /// Apps launched so far
    #[must_use]
    pub fn launched_apps(&self) -> Vec<String> {
        self.state.borrow().launched.clone()
    }

    /// Get call history
    #[must_use]
    pub fn history(&self) -> Vec<String> {
        self.state.borrow().call_history.clone()
    }

    /// Check if a call starting with `call` was made
    #[must_use]
    pub fn was_called(&self, call: &str) -> bool {
        self.state
            .borrow()
            .call_history
            .iter()
            .any(|c| c.starts_with(call))
    }

    /// Position of the first call starting with `call`
    #[must_use]
    pub fn call_index(&self, call: &str) -> Option<usize> {
        self.state
            .borrow()
            .call_history
            .iter()
            .position(|c| c.starts_with(call))
    }

    fn record(&self, call: String) {
        self.state.borrow_mut().call_history.push(call);
    }

    fn ensure_known(&self, element: &ElementHandle) -> PageResult<()> {
        if self.state.borrow().elements.iter().any(|e| e.id == element.id) {
            Ok(())
        } else {
            Err(PageError::Session {
                message: format!("stale element reference {}", element.id),
            })
        }
    }

    fn script_result(&self, script: &str) -> PageResult<Value> {
        let mut state = self.state.borrow_mut();
        let queue = state
            .scripts
            .iter_mut()
            .find(|(pattern, _)| script.contains(pattern.as_str()))
            .map(|(_, queue)| queue)
            .ok_or_else(|| PageError::Script {
                message: format!("no mock result for script: {script}"),
            })?;
        let value = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        };
        Ok(value.unwrap_or(Value::Null))
    }
}

impl Session for MockSession {
    fn find_element(&self, selector: &Selector) -> PageResult<Option<ElementHandle>> {
        let css = selector.to_css();
        self.record(format!("find_element:{css}"));
        Ok(self
            .state
            .borrow()
            .elements
            .iter()
            .find(|e| e.selector == css)
            .cloned())
    }

    fn find_elements(&self, selector: &Selector) -> PageResult<Vec<ElementHandle>> {
        let css = selector.to_css();
        self.record(format!("find_elements:{css}"));
        Ok(self
            .state
            .borrow()
            .elements
            .iter()
            .filter(|e| e.selector == css)
            .cloned()
            .collect())
    }

    fn execute_script(&self, script: &str) -> PageResult<Value> {
        self.record(format!("execute_script:{script}"));
        self.script_result(script)
    }

    fn script_with(&self, element: &ElementHandle, script: &str) -> PageResult<Value> {
        self.ensure_known(element)?;
        self.record(format!("script_with:{}:{script}", element.selector));
        self.script_result(script)
    }

    fn click(&self, element: &ElementHandle) -> PageResult<()> {
        self.ensure_known(element)?;
        self.record(format!("click:{}", element.selector));
        let effects: Vec<ClickEffect> = self
            .state
            .borrow()
            .click_effects
            .iter()
            .filter(|effect| effect.trigger == element.id)
            .cloned()
            .collect();
        let mut state = self.state.borrow_mut();
        for effect in effects {
            let _ = state
                .displayed
                .insert(effect.target, VecDeque::from([effect.displayed]));
        }
        Ok(())
    }

    fn clear(&self, element: &ElementHandle) -> PageResult<()> {
        self.ensure_known(element)?;
        self.record(format!("clear:{}", element.selector));
        let _ = self
            .state
            .borrow_mut()
            .values
            .insert(element.id.clone(), String::new());
        Ok(())
    }

    fn send_keys(&self, element: &ElementHandle, text: &str) -> PageResult<()> {
        self.ensure_known(element)?;
        self.record(format!("send_keys:{}:{text}", element.selector));
        self.state
            .borrow_mut()
            .values
            .entry(element.id.clone())
            .or_default()
            .push_str(text);
        Ok(())
    }

    fn text(&self, element: &ElementHandle) -> PageResult<String> {
        self.ensure_known(element)?;
        Ok(self
            .state
            .borrow()
            .texts
            .get(&element.id)
            .cloned()
            .unwrap_or_default())
    }

    fn is_displayed(&self, element: &ElementHandle) -> PageResult<bool> {
        self.ensure_known(element)?;
        let mut state = self.state.borrow_mut();
        let Some(queue) = state.displayed.get_mut(&element.id) else {
            return Ok(true);
        };
        let displayed = if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().copied()
        };
        Ok(displayed.unwrap_or(true))
    }

    fn launch_app(&self, origin: &str) -> PageResult<()> {
        self.record(format!("launch_app:{origin}"));
        self.state.borrow_mut().launched.push(origin.to_string());
        Ok(())
    }

    fn switch_to_app(&self, origin: &str) -> PageResult<()> {
        self.record(format!("switch_to_app:{origin}"));
        self.state.borrow_mut().current_app = Some(origin.to_string());
        Ok(())
    }

    fn switch_to_frame(&self) -> PageResult<()> {
        self.record("switch_to_frame".to_string());
        self.state.borrow_mut().current_app = None;
        Ok(())
    }

    fn perform(&self, gesture: &Gesture) -> PageResult<()> {
        let Gesture::Flick { element, .. } = gesture;
        self.ensure_known(element)?;
        self.record(format!("perform:flick:{}", element.selector));
        self.state.borrow_mut().gestures.push(gesture.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    mod element_tests {
        use super::*;

        #[test]
        fn test_find_by_selector() {
            let session = MockSession::new();
            let body = session.add_element("body");
            let found = session.find_element(&Selector::css("body")).unwrap();
            assert_eq!(found, Some(body));
            assert!(session.was_called("find_element:body"));
        }

        #[test]
        fn test_removed_element_is_stale() {
            let session = MockSession::new();
            let body = session.add_element("body");
            session.remove_element(&body);
            assert!(session.find_element(&Selector::css("body")).unwrap().is_none());
            assert!(matches!(
                session.click(&body).unwrap_err(),
                PageError::Session { .. }
            ));
        }

        #[test]
        fn test_display_sequence_last_sticks() {
            let session = MockSession::new();
            let view = session.add_element("#day-view");
            session.set_display_sequence(&view, [false, true]);
            assert!(!session.is_displayed(&view).unwrap());
            assert!(session.is_displayed(&view).unwrap());
            assert!(session.is_displayed(&view).unwrap());
        }

        #[test]
        fn test_click_effects() {
            let session = MockSession::new();
            let button = session.add_element("a.add");
            let form = session.add_element("#form");
            session.set_displayed(&form, false);
            session.on_click_show(&button, &form);
            session.click(&button).unwrap();
            assert!(session.is_displayed(&form).unwrap());
        }

        #[test]
        fn test_typed_values() {
            let session = MockSession::new();
            let input = session.add_element("input[name=\"title\"]");
            session.send_keys(&input, "stale").unwrap();
            session.clear(&input).unwrap();
            session.send_keys(&input, "Lunch").unwrap();
            assert_eq!(session.value(&input).as_deref(), Some("Lunch"));
        }
    }

    mod script_tests {
        use super::*;

        #[test]
        fn test_queued_results_then_sticky() {
            let session = MockSession::new();
            session.push_script_result("document.hidden", json!(false));
            session.push_script_result("document.hidden", json!(true));
            let script = "return document.hidden;";
            assert_eq!(session.execute_script(script).unwrap(), json!(false));
            assert_eq!(session.execute_script(script).unwrap(), json!(true));
            assert_eq!(session.execute_script(script).unwrap(), json!(true));
        }

        #[test]
        fn test_unknown_script_errors() {
            let session = MockSession::new();
            let err = session.execute_script("return 1;").unwrap_err();
            assert!(matches!(err, PageError::Script { .. }));
        }
    }

    #[test]
    fn test_app_switching() {
        let session = MockSession::new();
        session.launch_app("app://calendar.gaiamobile.org").unwrap();
        session.switch_to_app("app://calendar.gaiamobile.org").unwrap();
        assert_eq!(
            session.current_app().as_deref(),
            Some("app://calendar.gaiamobile.org")
        );
        session.switch_to_frame().unwrap();
        assert!(session.current_app().is_none());
        assert_eq!(session.launched_apps().len(), 1);
    }
}
