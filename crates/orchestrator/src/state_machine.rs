use std::fmt;

use crate::error::{OrchestratorError, Result};

/// Lifecycle state of a scenario module instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LifecycleState {
    #[default]
    Uninitialized,
    /// Resources exist but the phase does not host controllers
    Awake,
    /// Controllers are instantiated
    Active,
    Destroyed,
}

impl LifecycleState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Awake => "awake",
            Self::Active => "active",
            Self::Destroyed => "destroyed",
        }
    }

    /// Awake or Active.
    pub fn is_live(&self) -> bool {
        matches!(self, Self::Awake | Self::Active)
    }
}

impl fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct LifecycleStateMachine;

impl LifecycleStateMachine {
    pub fn validate_transition(from: &LifecycleState, to: &LifecycleState) -> Result<()> {
        let allowed = Self::allowed_transitions(from);

        if allowed.contains(to) {
            Ok(())
        } else {
            Err(OrchestratorError::InvalidTransition {
                from: from.as_str().to_string(),
                to: to.as_str().to_string(),
            })
        }
    }

    fn allowed_transitions(from: &LifecycleState) -> Vec<LifecycleState> {
        match from {
            LifecycleState::Uninitialized => {
                vec![LifecycleState::Awake, LifecycleState::Destroyed]
            }
            LifecycleState::Awake => vec![LifecycleState::Active, LifecycleState::Destroyed],
            LifecycleState::Active => vec![LifecycleState::Destroyed],
            LifecycleState::Destroyed => vec![],
        }
    }

    pub fn can_transition(from: &LifecycleState, to: &LifecycleState) -> bool {
        Self::validate_transition(from, to).is_ok()
    }
}
