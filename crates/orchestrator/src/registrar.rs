//! Exactly-once registration of the scenario module with the host.
//!
//! The host discovers modules on every startup. The registrar makes that safe
//! to repeat: a missing registration is created with the required phases, an
//! existing one only gains the phases it lacks.

use crewfit_core::PhaseSet;
use std::fmt;
use tracing::{debug, info};

use crate::host::{ModuleRegistration, ModuleRegistry};

/// What [`Registrar::ensure_registered`] changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationOutcome {
    Created { phases: PhaseSet },
    Extended { added: PhaseSet },
    Unchanged,
}

impl RegistrationOutcome {
    pub fn changed(&self) -> bool {
        !matches!(self, RegistrationOutcome::Unchanged)
    }
}

impl fmt::Display for RegistrationOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created { phases } => write!(f, "created for {}", phases),
            Self::Extended { added } => write!(f, "extended with {}", added),
            Self::Unchanged => f.write_str("unchanged"),
        }
    }
}

pub struct Registrar;

impl Registrar {
    /// Make sure `module_name` is registered for at least `required` phases.
    ///
    /// Phases already present are never duplicated or removed.
    pub fn ensure_registered<R>(
        registry: &mut R,
        module_name: &str,
        required: &PhaseSet,
    ) -> RegistrationOutcome
    where
        R: ModuleRegistry + ?Sized,
    {
        let Some(existing) = registry.find_mut(module_name) else {
            info!(module = %module_name, phases = %required, "Registering scenario module");
            registry.add(ModuleRegistration::new(module_name, required));
            return RegistrationOutcome::Created {
                phases: required.clone(),
            };
        };

        let missing = required.difference(&existing.phase_set());
        if missing.is_empty() {
            debug!(module = %module_name, "Scenario module already registered");
            return RegistrationOutcome::Unchanged;
        }

        info!(module = %module_name, added = %missing, "Extending scenario module phases");
        existing.target_phases.extend(missing.iter());
        RegistrationOutcome::Extended { added: missing }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::InMemoryModuleRegistry;
    use crewfit_core::OperatingPhase;

    fn required() -> PhaseSet {
        PhaseSet::from([
            OperatingPhase::Tracking,
            OperatingPhase::Flight,
            OperatingPhase::Editor,
            OperatingPhase::Hangar,
        ])
    }

    #[test]
    fn test_creates_missing_registration() {
        let mut registry = InMemoryModuleRegistry::new();
        let outcome = Registrar::ensure_registered(&mut registry, "Fitness", &required());

        assert_eq!(outcome, RegistrationOutcome::Created { phases: required() });
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.entries()[0].phase_set(), required());
    }

    #[test]
    fn test_repeat_is_unchanged() {
        let mut registry = InMemoryModuleRegistry::new();
        Registrar::ensure_registered(&mut registry, "Fitness", &required());
        let outcome = Registrar::ensure_registered(&mut registry, "Fitness", &required());

        assert!(!outcome.changed());
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.entries()[0].target_phases.len(), 4);
    }

    #[test]
    fn test_extends_partial_registration() {
        let mut registry = InMemoryModuleRegistry::new();
        registry.add(ModuleRegistration {
            module_name: "Fitness".to_string(),
            target_phases: vec![OperatingPhase::Flight, OperatingPhase::Hub],
        });

        let outcome = Registrar::ensure_registered(&mut registry, "Fitness", &required());

        assert_eq!(
            outcome,
            RegistrationOutcome::Extended {
                added: PhaseSet::from([
                    OperatingPhase::Editor,
                    OperatingPhase::Hangar,
                    OperatingPhase::Tracking,
                ])
            }
        );
        let entry = &registry.entries()[0];
        assert_eq!(entry.target_phases[..2], [OperatingPhase::Flight, OperatingPhase::Hub]);
        assert_eq!(entry.target_phases.len(), 5);
    }

    #[test]
    fn test_overlapping_calls_yield_union() {
        let mut registry = InMemoryModuleRegistry::new();
        let first = PhaseSet::from([OperatingPhase::Flight, OperatingPhase::Editor]);
        let second = PhaseSet::from([OperatingPhase::Editor, OperatingPhase::Tracking]);

        Registrar::ensure_registered(&mut registry, "Fitness", &first);
        Registrar::ensure_registered(&mut registry, "Fitness", &second);

        assert_eq!(registry.len(), 1);
        let entry = &registry.entries()[0];
        assert_eq!(entry.phase_set(), first.union(&second));
        assert_eq!(entry.target_phases.len(), 3);
    }

    #[test]
    fn test_other_modules_untouched() {
        let mut registry = InMemoryModuleRegistry::new();
        registry.add(ModuleRegistration::new(
            "Science",
            &PhaseSet::from([OperatingPhase::Hub]),
        ));

        Registrar::ensure_registered(&mut registry, "Fitness", &required());

        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.find("Science").unwrap().target_phases,
            vec![OperatingPhase::Hub]
        );
    }
}
