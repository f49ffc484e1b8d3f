//! RAII guard for the toolbar toggle.
//!
//! The toggle is the only affordance owned by an external service, so it is
//! the one resource that must be handed back explicitly. The guard releases it
//! once, either on request or when dropped.

use tracing::{debug, warn};

use crate::config::ToolbarConfig;
use crate::error::Result;
use crate::host::{ClickAction, ToggleHandle, ToolbarService};

/// Owns a registered toggle until it is released.
pub struct ToggleGuard {
    handle: Option<Box<dyn ToggleHandle>>,
    label: String,
}

impl ToggleGuard {
    /// Register the toggle, decorate it, and attach `action`.
    ///
    /// # Arguments
    /// * `service` - Host toolbar that issues the handle
    /// * `config` - Group and button ids plus tooltip and icon
    /// * `action` - Invoked on every click until the toggle is released
    ///
    /// # Errors
    /// Whatever the toolbar returns when it refuses the registration.
    pub fn register(
        service: &mut dyn ToolbarService,
        config: &ToolbarConfig,
        action: ClickAction,
    ) -> Result<Self> {
        let mut handle = service.register_toggle(&config.group_id, &config.button_id)?;
        handle.set_tooltip(&config.tooltip);
        handle.set_icon(&config.icon_path);
        handle.on_click(action);

        let label = format!("{}/{}", config.group_id, config.button_id);
        debug!(toggle = %label, "Toggle registered");

        Ok(Self {
            handle: Some(handle),
            label,
        })
    }

    pub fn is_registered(&self) -> bool {
        self.handle.is_some()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Remove the toggle from the toolbar.
    ///
    /// Returns `Ok(false)` if it was already released. The handle is given up
    /// even when removal fails, so a failed release is never retried.
    pub fn release(&mut self) -> Result<bool> {
        let Some(mut handle) = self.handle.take() else {
            return Ok(false);
        };

        debug!(toggle = %self.label, "Releasing toggle");
        handle.destroy()?;
        Ok(true)
    }
}

impl Drop for ToggleGuard {
    fn drop(&mut self) {
        if self.handle.is_some() {
            if let Err(e) = self.release() {
                warn!(
                    toggle = %self.label,
                    error = %e,
                    "Toggle release failed in Drop"
                );
            }
        }
    }
}
