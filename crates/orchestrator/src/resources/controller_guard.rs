//! RAII guard for a hosted controller.
//!
//! The guard enforces the controller call order and makes destruction
//! happen exactly once, even if the owner is dropped without tearing down.

use crewfit_core::SessionHandle;
use tracing::{debug, warn};

use crate::core::Controller;
use crate::error::Result;

/// Owns a controller and tracks where it is in its lifecycle.
///
/// # Example
///
/// ```ignore
/// let mut guard = ControllerGuard::new(controller, session.clone());
/// guard.activate();
/// // ... session runs ...
/// guard.destroy()?; // Drop does this if forgotten
/// ```
pub struct ControllerGuard {
    controller: Box<dyn Controller>,
    activated: bool,
    destroyed: bool,
}

impl ControllerGuard {
    /// Inject the session state and take ownership of the controller.
    ///
    /// # Arguments
    /// * `controller` - Freshly instantiated controller, not yet activated
    /// * `session` - Handle shared with the module and its other controllers
    pub fn new(mut controller: Box<dyn Controller>, session: SessionHandle) -> Self {
        controller.set_shared_state(session);
        debug!(controller = %controller.name(), "Controller guard created");

        Self {
            controller,
            activated: false,
            destroyed: false,
        }
    }

    pub fn name(&self) -> &'static str {
        self.controller.name()
    }

    pub fn controller(&self) -> &dyn Controller {
        self.controller.as_ref()
    }

    pub fn is_activated(&self) -> bool {
        self.activated
    }

    /// Activate the controller once. Returns `true` if this call activated it.
    pub fn activate(&mut self) -> bool {
        if self.activated || self.destroyed {
            return false;
        }
        self.controller.on_activate();
        self.activated = true;
        true
    }

    /// Deactivate (if active) and destroy the controller once.
    ///
    /// Later calls are no-ops returning `Ok(())`.
    pub fn destroy(&mut self) -> Result<()> {
        if self.destroyed {
            return Ok(());
        }
        if self.activated {
            self.controller.on_deactivate();
            self.activated = false;
        }
        self.destroyed = true;
        debug!(controller = %self.controller.name(), "Destroying controller");
        self.controller.on_destroy()
    }
}

impl Drop for ControllerGuard {
    fn drop(&mut self) {
        if !self.destroyed {
            warn!(
                controller = %self.controller.name(),
                "Controller guard dropped without teardown - destroying"
            );

            if let Err(e) = self.destroy() {
                warn!(
                    controller = %self.controller.name(),
                    error = %e,
                    "Controller destroy failed in Drop"
                );
            }
        }
    }
}
