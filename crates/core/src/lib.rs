//! Domain types shared by the crewfit scenario module.
//!
//! - [`OperatingPhase`] / [`PhaseSet`] - host operating phases and phase sets
//! - [`SessionState`] / [`SessionHandle`] - the per-session state container
//! - [`ConfigNode`] - the hierarchical key/value tree used for persistence

pub mod domain;
pub mod error;

pub use domain::*;
pub use error::{CoreError, Result};
