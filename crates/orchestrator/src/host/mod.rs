//! Interfaces the scenario module consumes from its host.
//!
//! - [`ToolbarService`] / [`ToggleHandle`] - external toolbar button service
//! - [`ModuleRegistry`] - the host's list of scenario module registrations
//!
//! In-memory implementations back the tests and the CLI host.

mod registry;
mod toolbar;

pub use registry::{InMemoryModuleRegistry, ModuleRegistration, ModuleRegistry};
pub use toolbar::{ClickAction, RecordingToolbar, ToggleHandle, ToggleRecord, ToolbarService};
