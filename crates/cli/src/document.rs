use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use crewfit_core::ConfigNode;
use orchestrator::host::InMemoryModuleRegistry;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const SCENARIO_ROOT: &str = "SCENARIO";

/// A simulated host save file.
#[derive(Debug, Serialize, Deserialize)]
pub struct SaveDocument {
    #[serde(default)]
    pub saved_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub registry: InMemoryModuleRegistry,
    #[serde(default = "empty_scenario")]
    pub scenario: ConfigNode,
}

fn empty_scenario() -> ConfigNode {
    ConfigNode::new(SCENARIO_ROOT)
}

impl Default for SaveDocument {
    fn default() -> Self {
        Self {
            saved_at: None,
            registry: InMemoryModuleRegistry::default(),
            scenario: empty_scenario(),
        }
    }
}

impl SaveDocument {
    /// Read the document at `path`, or start a fresh one if there is none.
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No save file, starting fresh");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read save file {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse save file {}", path.display()))
    }

    pub fn write(&mut self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        self.saved_at = Some(Utc::now());
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)
            .with_context(|| format!("Failed to write save file {}", path.display()))?;
        Ok(())
    }
}
