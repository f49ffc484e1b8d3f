use crewfit_core::SessionHandle;
use tracing::{debug, info};

use crate::core::Controller;
use crate::error::Result;

/// Keeps the session roster in step with the crew the host reports.
#[derive(Debug, Default)]
pub struct CrewRosterController {
    session: Option<SessionHandle>,
    active: bool,
}

impl CrewRosterController {
    pub const NAME: &'static str = "crew_roster";

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Enlist unseen crew and update assignment flags.
    ///
    /// `crew` lists `(name, assigned)` pairs as reported by the host. Crew
    /// already on the roster but absent from `crew` are marked unassigned.
    /// Returns the number of newly enlisted crew members.
    pub fn sync_roster(&mut self, crew: &[(&str, bool)]) -> usize {
        let Some(session) = &self.session else {
            return 0;
        };

        let mut state = session.borrow_mut();
        let mut enlisted = 0;
        for (name, _) in crew {
            if state.enlist(name) {
                enlisted += 1;
            }
        }
        for record in &mut state.roster {
            record.active = crew
                .iter()
                .any(|(name, assigned)| *assigned && *name == record.name);
        }

        debug!(enlisted, total = state.roster.len(), "Roster synchronised");
        enlisted
    }
}

impl Controller for CrewRosterController {
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
        if let Some(session) = &self.session {
            let state = session.borrow();
            info!(
                crew = state.roster.len(),
                assigned = state.active_crew_count(),
                "Crew roster tracking started"
            );
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
