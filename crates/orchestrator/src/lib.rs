pub mod config;
pub mod controllers;
pub mod core;
pub mod error;
pub mod host;
pub mod persistence;
pub mod registrar;
pub mod resources;
pub mod scenario;
pub mod state_machine;
pub mod ui;

pub use config::{ModuleConfig, ToolbarConfig};
pub use error::{OrchestratorError, Result};
pub use registrar::{Registrar, RegistrationOutcome};
pub use resources::TeardownReport;
pub use scenario::ScenarioModule;
pub use state_machine::{LifecycleState, LifecycleStateMachine};
