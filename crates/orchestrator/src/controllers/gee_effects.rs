use crewfit_core::SessionHandle;
use tracing::info;

use crate::core::Controller;
use crate::error::Result;

/// Measures acceleration exposure against the session's gee tolerance.
#[derive(Debug, Default)]
pub struct GeeEffectsController {
    session: Option<SessionHandle>,
    active: bool,
    peak_excess: f32,
}

impl GeeEffectsController {
    pub const NAME: &'static str = "gee_effects";

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Record an acceleration sample, returning the excess over tolerance.
    ///
    /// Samples are ignored (excess `0.0`) while inactive.
    pub fn sample(&mut self, gee: f32) -> f32 {
        if !self.active {
            return 0.0;
        }
        let tolerance = match &self.session {
            Some(session) => session.borrow().gee_tolerance,
            None => return 0.0,
        };
        let excess = (gee - tolerance).max(0.0);
        self.peak_excess = self.peak_excess.max(excess);
        excess
    }

    pub fn peak_excess(&self) -> f32 {
        self.peak_excess
    }
}

impl Controller for GeeEffectsController {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn set_shared_state(&mut self, state: SessionHandle) {
        self.session = Some(state);
    }

    fn shared_state(&self) -> Option<&SessionHandle> {
        self.session.as_ref()
    }

    fn on_activate(&mut self) {
        self.active = true;
        self.peak_excess = 0.0;
        if let Some(session) = &self.session {
            info!(tolerance = session.borrow().gee_tolerance, "Gee effects tracking started");
        }
    }

    fn on_deactivate(&mut self) {
        self.active = false;
    }

    fn on_destroy(&mut self) -> Result<()> {
        self.session = None;
        Ok(())
    }
}
