use crewfit_core::{OperatingPhase, PhaseSet};
use serde::{Deserialize, Serialize};

/// Host-side registration of a scenario module.
///
/// The host instantiates the named module whenever it enters one of the
/// target phases. The phase list is host data and is not guaranteed to be
/// free of duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleRegistration {
    pub module_name: String,
    pub target_phases: Vec<OperatingPhase>,
}

impl ModuleRegistration {
    pub fn new(module_name: impl Into<String>, phases: &PhaseSet) -> Self {
        Self {
            module_name: module_name.into(),
            target_phases: phases.to_vec(),
        }
    }

    pub fn phase_set(&self) -> PhaseSet {
        self.target_phases.iter().copied().collect()
    }

    pub fn targets(&self, phase: OperatingPhase) -> bool {
        self.target_phases.contains(&phase)
    }
}

/// The host's list of module registrations, keyed by module name.
pub trait ModuleRegistry {
    fn find(&self, module_name: &str) -> Option<&ModuleRegistration>;

    fn find_mut(&mut self, module_name: &str) -> Option<&mut ModuleRegistration>;

    fn add(&mut self, registration: ModuleRegistration);
}

/// Registry kept in memory, persisted by the CLI host inside its save document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InMemoryModuleRegistry {
    entries: Vec<ModuleRegistration>,
}

impl InMemoryModuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[ModuleRegistration] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Names of the modules the host would instantiate in `phase`.
    pub fn modules_for_phase(&self, phase: OperatingPhase) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| e.targets(phase))
            .map(|e| e.module_name.as_str())
            .collect()
    }
}

impl ModuleRegistry for InMemoryModuleRegistry {
    fn find(&self, module_name: &str) -> Option<&ModuleRegistration> {
        self.entries.iter().find(|e| e.module_name == module_name)
    }

    fn find_mut(&mut self, module_name: &str) -> Option<&mut ModuleRegistration> {
        self.entries.iter_mut().find(|e| e.module_name == module_name)
    }

    fn add(&mut self, registration: ModuleRegistration) {
        self.entries.push(registration);
    }
}
