use crewfit_core::{OperatingPhase, PhaseSet};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::{OrchestratorError, Result};

pub const DEFAULT_MODULE_NAME: &str = "CrewFitnessScenario";

/// Toolbar toggle settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolbarConfig {
    /// Toolbar group the toggle is registered under
    pub group_id: String,
    /// Toggle identifier within the group
    pub button_id: String,
    pub tooltip: String,
    pub icon_path: String,
}

impl Default for ToolbarConfig {
    fn default() -> Self {
        Self {
            group_id: "crewfit".to_string(),
            button_id: "rosterButton".to_string(),
            tooltip: "Crew fitness roster".to_string(),
            icon_path: "crewfit/icons/roster".to_string(),
        }
    }
}

/// Scenario module configuration, stored as TOML
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModuleConfig {
    /// Identity the module registers under with the host
    pub module_name: String,
    /// Phases in which the module hosts its controllers
    pub required_phases: PhaseSet,
    /// Report unknown keys in persisted session state
    pub strict_load: bool,
    pub toolbar: ToolbarConfig,
}

impl Default for ModuleConfig {
    fn default() -> Self {
        Self {
            module_name: DEFAULT_MODULE_NAME.to_string(),
            required_phases: PhaseSet::from([
                OperatingPhase::Tracking,
                OperatingPhase::Flight,
                OperatingPhase::Editor,
                OperatingPhase::Hangar,
            ]),
            strict_load: true,
            toolbar: ToolbarConfig::default(),
        }
    }
}

impl ModuleConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| OrchestratorError::Config(e.to_string()))
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| OrchestratorError::Serialization(e.to_string()))
    }

    /// Read config from `path`, falling back to defaults
    pub fn read(path: &Path) -> Self {
        if !path.exists() {
            debug!(path = %path.display(), "Config file does not exist, using defaults");
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(content) => match Self::from_toml_str(&content) {
                Ok(config) => {
                    debug!(path = %path.display(), "Config loaded successfully");
                    config
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read config file, using defaults");
                Self::default()
            }
        }
    }

    /// Write config to `path`, creating parent directories
    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        fs::write(path, self.to_toml_string()?)?;
        debug!(path = %path.display(), "Config saved successfully");

        Ok(())
    }

    pub fn hosts_phase(&self, phase: OperatingPhase) -> bool {
        self.required_phases.contains(phase)
    }
}
