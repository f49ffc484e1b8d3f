use crewfit_core::CoreError;
use thiserror::Error;

use crate::state_machine::LifecycleState;

#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("Invalid lifecycle transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Lifecycle call {call} is not valid in state {state}")]
    InvalidLifecycleCall {
        call: &'static str,
        state: LifecycleState,
    },

    #[error("Toggle registration failed: {group_id}/{id} - {reason}")]
    ToggleRegistrationFailed {
        group_id: String,
        id: String,
        reason: String,
    },

    #[error("Failed to release {resource}: {reason}")]
    ResourceReleaseFailed { resource: String, reason: String },

    #[error("Controller {name} failed: {reason}")]
    ControllerFailed { name: String, reason: String },

    #[error("Controller already registered: {0}")]
    DuplicateController(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Core error: {0}")]
    Core(#[from] CoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl OrchestratorError {
    /// Create a lifecycle call rejection.
    pub fn invalid_call(call: &'static str, state: LifecycleState) -> Self {
        Self::InvalidLifecycleCall { call, state }
    }

    /// Create a resource release failure.
    pub fn release_failed(resource: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ResourceReleaseFailed {
            resource: resource.into(),
            reason: reason.into(),
        }
    }

    /// Create a controller failure.
    pub fn controller_failed(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ControllerFailed {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, OrchestratorError>;
