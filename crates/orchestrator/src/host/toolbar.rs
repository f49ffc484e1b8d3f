use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use tracing::debug;
use uuid::Uuid;

use crate::error::{OrchestratorError, Result};

/// Callback attached to a toggle control.
pub type ClickAction = Box<dyn FnMut()>;

/// A toggle control owned by an external toolbar service.
pub trait ToggleHandle {
    /// Identifier the toggle was registered under.
    fn id(&self) -> &str;

    fn set_tooltip(&mut self, tooltip: &str);

    fn set_icon(&mut self, path: &str);

    /// Attach the action run when the control is clicked, replacing any previous one.
    fn on_click(&mut self, action: ClickAction);

    /// Remove the control from the toolbar.
    fn destroy(&mut self) -> Result<()>;
}

/// External service that hosts toggle controls.
pub trait ToolbarService {
    fn register_toggle(&mut self, group_id: &str, id: &str) -> Result<Box<dyn ToggleHandle>>;
}

/// Snapshot of one registered toggle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleRecord {
    pub handle_id: Uuid,
    pub group_id: String,
    pub id: String,
    pub tooltip: Option<String>,
    pub icon: Option<String>,
    pub destroyed: bool,
}

#[derive(Default)]
struct ToolbarLog {
    toggles: Vec<ToggleRecord>,
    actions: HashMap<Uuid, ClickAction>,
    fail_release: bool,
}

impl ToolbarLog {
    fn record_mut(&mut self, handle_id: Uuid) -> Option<&mut ToggleRecord> {
        self.toggles.iter_mut().find(|t| t.handle_id == handle_id)
    }
}

/// In-memory toolbar that records every registration.
///
/// Clones share the same log, so a host can hand one clone to a scenario
/// module and keep another to inspect registrations or simulate clicks.
/// Registering a `group_id`/`id` pair that is still live is rejected.
#[derive(Clone, Default)]
pub struct RecordingToolbar {
    log: Rc<RefCell<ToolbarLog>>,
}

impl RecordingToolbar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent toggle `destroy` fail.
    pub fn fail_releases(&self, fail: bool) {
        self.log.borrow_mut().fail_release = fail;
    }

    /// Every toggle ever registered, in registration order.
    pub fn toggles(&self) -> Vec<ToggleRecord> {
        self.log.borrow().toggles.clone()
    }

    pub fn registration_count(&self) -> usize {
        self.log.borrow().toggles.len()
    }

    pub fn live_count(&self) -> usize {
        self.log.borrow().toggles.iter().filter(|t| !t.destroyed).count()
    }

    pub fn destroyed_count(&self) -> usize {
        self.log.borrow().toggles.iter().filter(|t| t.destroyed).count()
    }

    /// Run the click action of the live toggle registered as `group_id`/`id`.
    ///
    /// Returns `false` when no such toggle or action exists.
    pub fn click(&self, group_id: &str, id: &str) -> bool {
        let handle_id = {
            let log = self.log.borrow();
            match log
                .toggles
                .iter()
                .find(|t| !t.destroyed && t.group_id == group_id && t.id == id)
            {
                Some(record) => record.handle_id,
                None => return false,
            }
        };

        // The action may reach back into the toolbar, so run it unborrowed.
        let action = self.log.borrow_mut().actions.remove(&handle_id);
        match action {
            Some(mut action) => {
                action();
                self.log.borrow_mut().actions.insert(handle_id, action);
                true
            }
            None => false,
        }
    }
}

impl ToolbarService for RecordingToolbar {
    fn register_toggle(&mut self, group_id: &str, id: &str) -> Result<Box<dyn ToggleHandle>> {
        let mut log = self.log.borrow_mut();
        if log
            .toggles
            .iter()
            .any(|t| !t.destroyed && t.group_id == group_id && t.id == id)
        {
            return Err(OrchestratorError::ToggleRegistrationFailed {
                group_id: group_id.to_string(),
                id: id.to_string(),
                reason: "already registered".to_string(),
            });
        }

        let handle_id = Uuid::new_v4();
        log.toggles.push(ToggleRecord {
            handle_id,
            group_id: group_id.to_string(),
            id: id.to_string(),
            tooltip: None,
            icon: None,
            destroyed: false,
        });
        debug!(group_id = %group_id, id = %id, handle_id = %handle_id, "Toggle registered");

        Ok(Box::new(RecordingToggle {
            handle_id,
            id: id.to_string(),
            log: Rc::clone(&self.log),
            destroyed: false,
        }))
    }
}

struct RecordingToggle {
    handle_id: Uuid,
    id: String,
    log: Rc<RefCell<ToolbarLog>>,
    destroyed: bool,
}

impl ToggleHandle for RecordingToggle {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_tooltip(&mut self, tooltip: &str) {
        if let Some(record) = self.log.borrow_mut().record_mut(self.handle_id) {
            record.tooltip = Some(tooltip.to_string());
        }
    }

    fn set_icon(&mut self, path: &str) {
        if let Some(record) = self.log.borrow_mut().record_mut(self.handle_id) {
            record.icon = Some(path.to_string());
        }
    }

    fn on_click(&mut self, action: ClickAction) {
        self.log.borrow_mut().actions.insert(self.handle_id, action);
    }

    fn destroy(&mut self) -> Result<()> {
        if self.destroyed {
            return Ok(());
        }
        let mut log = self.log.borrow_mut();
        if log.fail_release {
            return Err(OrchestratorError::release_failed(
                format!("toggle {}", self.id),
                "toolbar refused removal",
            ));
        }
        log.actions.remove(&self.handle_id);
        if let Some(record) = log.record_mut(self.handle_id) {
            record.destroyed = true;
        }
        self.destroyed = true;
        debug!(id = %self.id, handle_id = %self.handle_id, "Toggle destroyed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_register_and_decorate() {
        let mut toolbar = RecordingToolbar::new();
        let mut handle = toolbar.register_toggle("crewfit", "roster").unwrap();
        handle.set_tooltip("Roster");
        handle.set_icon("icons/roster");

        let records = toolbar.toggles();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].tooltip.as_deref(), Some("Roster"));
        assert_eq!(records[0].icon.as_deref(), Some("icons/roster"));
        assert_eq!(handle.id(), "roster");
    }

    #[test]
    fn test_duplicate_live_registration_rejected() {
        let mut toolbar = RecordingToolbar::new();
        let mut handle = toolbar.register_toggle("crewfit", "roster").unwrap();
        assert!(toolbar.register_toggle("crewfit", "roster").is_err());

        handle.destroy().unwrap();
        assert!(toolbar.register_toggle("crewfit", "roster").is_ok());
        assert_eq!(toolbar.registration_count(), 2);
        assert_eq!(toolbar.live_count(), 1);
    }

    #[test]
    fn test_click_runs_action() {
        let mut toolbar = RecordingToolbar::new();
        let mut handle = toolbar.register_toggle("crewfit", "roster").unwrap();

        let clicks = Rc::new(Cell::new(0));
        let counter = Rc::clone(&clicks);
        handle.on_click(Box::new(move || counter.set(counter.get() + 1)));

        assert!(toolbar.click("crewfit", "roster"));
        assert!(toolbar.click("crewfit", "roster"));
        assert_eq!(clicks.get(), 2);
        assert!(!toolbar.click("crewfit", "other"));

        handle.destroy().unwrap();
        assert!(!toolbar.click("crewfit", "roster"));
    }

    #[test]
    fn test_failed_release() {
        let mut toolbar = RecordingToolbar::new();
        let mut handle = toolbar.register_toggle("crewfit", "roster").unwrap();

        toolbar.fail_releases(true);
        assert!(handle.destroy().is_err());
        assert_eq!(toolbar.live_count(), 1);

        toolbar.fail_releases(false);
        handle.destroy().unwrap();
        handle.destroy().unwrap();
        assert_eq!(toolbar.destroyed_count(), 1);
    }
}
