//! Controllers shipped with the scenario module.
//!
//! - [`CrewRosterController`] - keeps the roster in step with the host's crew
//! - [`CrewFitnessController`] - keeps crew fitness inside the configured band
//! - [`GeeEffectsController`] - measures acceleration exposure against tolerance

mod crew_fitness;
mod crew_roster;
mod gee_effects;

pub use crew_fitness::CrewFitnessController;
pub use crew_roster::CrewRosterController;
pub use gee_effects::GeeEffectsController;
