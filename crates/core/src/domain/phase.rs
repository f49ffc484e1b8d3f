use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

/// Part of the host application that is currently running.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum OperatingPhase {
    Menu,
    /// Space-center style overview screen the host boots a save into
    Hub,
    Editor,
    Hangar,
    Flight,
    Tracking,
}

impl OperatingPhase {
    pub const ALL: [OperatingPhase; 6] = [
        Self::Menu,
        Self::Hub,
        Self::Editor,
        Self::Hangar,
        Self::Flight,
        Self::Tracking,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Menu => "menu",
            Self::Hub => "hub",
            Self::Editor => "editor",
            Self::Hangar => "hangar",
            Self::Flight => "flight",
            Self::Tracking => "tracking",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "menu" => Some(Self::Menu),
            "hub" => Some(Self::Hub),
            "editor" => Some(Self::Editor),
            "hangar" => Some(Self::Hangar),
            "flight" => Some(Self::Flight),
            "tracking" => Some(Self::Tracking),
            _ => None,
        }
    }
}

impl fmt::Display for OperatingPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperatingPhase {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(&s.trim().to_ascii_lowercase())
            .ok_or_else(|| CoreError::UnknownPhase(s.to_string()))
    }
}

/// Ordered set of operating phases.
///
/// Membership is keyed on the phase itself, so inserting a phase twice is a
/// no-op. Serializes as a plain list in phase order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhaseSet(BTreeSet<OperatingPhase>);

impl PhaseSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, phase: OperatingPhase) -> bool {
        self.0.contains(&phase)
    }

    /// Returns `true` if the phase was not already present.
    pub fn insert(&mut self, phase: OperatingPhase) -> bool {
        self.0.insert(phase)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = OperatingPhase> + '_ {
        self.0.iter().copied()
    }

    /// Phases in `self` that are missing from `other`.
    pub fn difference(&self, other: &PhaseSet) -> PhaseSet {
        PhaseSet(self.0.difference(&other.0).copied().collect())
    }

    pub fn union(&self, other: &PhaseSet) -> PhaseSet {
        PhaseSet(self.0.union(&other.0).copied().collect())
    }

    pub fn is_superset(&self, other: &PhaseSet) -> bool {
        self.0.is_superset(&other.0)
    }

    pub fn to_vec(&self) -> Vec<OperatingPhase> {
        self.iter().collect()
    }
}

impl FromIterator<OperatingPhase> for PhaseSet {
    fn from_iter<I: IntoIterator<Item = OperatingPhase>>(iter: I) -> Self {
        PhaseSet(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[OperatingPhase; N]> for PhaseSet {
    fn from(phases: [OperatingPhase; N]) -> Self {
        phases.into_iter().collect()
    }
}

impl fmt::Display for PhaseSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(|p| p.as_str()).collect();
        write!(f, "[{}]", names.join(", "))
    }
}
