use std::fmt;

use super::Controller;
use crate::controllers::{CrewFitnessController, CrewRosterController, GeeEffectsController};

/// Builds a fresh controller instance.
pub type ControllerFactory = Box<dyn Fn() -> Box<dyn Controller>>;

/// Known controller types, instantiated in declaration order.
#[derive(Default)]
pub struct ControllerCatalog {
    factories: Vec<(&'static str, ControllerFactory)>,
}

impl ControllerCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog of the controllers shipped with the module.
    pub fn standard() -> Self {
        Self::new()
            .with(CrewRosterController::NAME, || {
                Box::new(CrewRosterController::default())
            })
            .with(CrewFitnessController::NAME, || {
                Box::new(CrewFitnessController::default())
            })
            .with(GeeEffectsController::NAME, || {
                Box::new(GeeEffectsController::default())
            })
    }

    /// Declare a controller type. Redeclaring a name replaces its factory in place.
    pub fn with<F>(mut self, name: &'static str, factory: F) -> Self
    where
        F: Fn() -> Box<dyn Controller> + 'static,
    {
        match self.factories.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = Box::new(factory),
            None => self.factories.push((name, Box::new(factory))),
        }
        self
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.factories.iter().map(|(n, _)| *n).collect()
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    /// Instantiate every declared controller, in order.
    pub fn instantiate(&self) -> impl Iterator<Item = Box<dyn Controller>> + '_ {
        self.factories.iter().map(|(_, factory)| factory())
    }
}

impl fmt::Debug for ControllerCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControllerCatalog")
            .field("controllers", &self.names())
            .finish()
    }
}
