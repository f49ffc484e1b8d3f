use crewfit_core::SessionHandle;
use tracing::{debug, warn};

use super::Controller;
use crate::error::{OrchestratorError, Result};
use crate::resources::ControllerGuard;

/// Live controllers of one scenario module, in activation order.
#[derive(Default)]
pub struct ControllerRegistry {
    guards: Vec<ControllerGuard>,
}

impl ControllerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inject `session` into `controller` and append it.
    ///
    /// # Arguments
    /// * `controller` - Controller to own; its name must be unique here
    /// * `session` - Session state cloned into the controller's guard
    ///
    /// A second controller with an already registered name is rejected with
    /// [`OrchestratorError::DuplicateController`] and never receives the session.
    pub fn register(
        &mut self,
        controller: Box<dyn Controller>,
        session: &SessionHandle,
    ) -> Result<()> {
        let name = controller.name();
        if self.contains(name) {
            return Err(OrchestratorError::DuplicateController(name.to_string()));
        }

        self.guards
            .push(ControllerGuard::new(controller, session.clone()));
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.guards.iter().any(|g| g.name() == name)
    }

    pub fn get(&self, name: &str) -> Option<&dyn Controller> {
        self.guards
            .iter()
            .find(|g| g.name() == name)
            .map(|g| g.controller())
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Controller> {
        self.guards.iter().map(|g| g.controller())
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.guards.iter().map(|g| g.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.guards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }

    pub fn activated_count(&self) -> usize {
        self.guards.iter().filter(|g| g.is_activated()).count()
    }

    /// Activate every controller not yet activated, in registration order.
    ///
    /// Returns how many were activated by this call.
    pub fn activate_all(&mut self) -> usize {
        let mut activated = 0;
        for guard in &mut self.guards {
            if guard.activate() {
                debug!(controller = %guard.name(), "Controller activated");
                activated += 1;
            }
        }
        activated
    }

    /// Deactivate and destroy every controller exactly once, then clear.
    ///
    /// Returns the names torn down and the failures encountered; a failing
    /// controller does not stop the others.
    pub fn teardown(&mut self) -> (Vec<&'static str>, Vec<OrchestratorError>) {
        let mut destroyed = Vec::with_capacity(self.guards.len());
        let mut failures = Vec::new();

        for mut guard in self.guards.drain(..) {
            let name = guard.name();
            match guard.destroy() {
                Ok(()) => destroyed.push(name),
                Err(e) => {
                    warn!(controller = %name, error = %e, "Controller teardown failed");
                    failures.push(e);
                }
            }
        }

        (destroyed, failures)
    }
}
