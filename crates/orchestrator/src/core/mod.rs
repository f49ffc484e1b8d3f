//! Controller abstractions for the scenario module.
//!
//! - [`Controller`] - lifecycle contract every subordinate unit implements
//! - [`ControllerCatalog`] - ordered factories for the known controller types
//! - [`ControllerRegistry`] - the live controllers of one module instance

mod catalog;
mod controller;
mod registry;

pub use catalog::{ControllerCatalog, ControllerFactory};
pub use controller::Controller;
pub use registry::ControllerRegistry;
