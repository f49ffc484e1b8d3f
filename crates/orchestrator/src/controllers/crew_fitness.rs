use crewfit_core::SessionHandle;
use tracing::{debug, info};

use crate::core::Controller;
use crate::error::Result;

/// Keeps every crew member's fitness inside the configured band.
#[derive(Debug, Default)]
pub struct CrewFitnessController {
    session: Option<SessionHandle>,
    active: bool,
}

impl CrewFitnessController {
    pub const NAME: &'static str = "crew_fitness";

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Clamp all crew fitness values into the band. Returns how many changed.
    ///
    /// Does nothing while the session has fitness tracking disabled.
    pub fn normalize(&self) -> usize {
        let Some(session) = &self.session else {
            return 0;
        };

        let mut guard = session.borrow_mut();
        let state = &mut *guard;
        if !state.enabled {
            return 0;
        }

        let mut adjusted = 0;
        for index in 0..state.roster.len() {
            let clamped = state.clamp_fitness(state.roster[index].fitness);
            let record = &mut state.roster[index];
            if clamped != record.fitness {
                debug!(crew = %record.name, from = record.fitness, to = clamped, "Fitness clamped");
                record.fitness = clamped;
                adjusted += 1;
            }
        }
        adjusted
    }
}

impl Controller for CrewFitnessController {
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
        let adjusted = self.normalize();
        info!(adjusted, "Crew fitness tracking started");
    }

    fn on_deactivate(&mut self) {
        self.active = false;
    }

    fn on_destroy(&mut self) -> Result<()> {
        self.session = None;
        Ok(())
    }
}
