use serde::{Deserialize, Serialize};
use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

/// Per-crew-member fitness record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrewRecord {
    pub name: String,
    pub fitness: f32,
    /// Whether the crew member is currently assigned to a vessel
    pub active: bool,
}

impl CrewRecord {
    /// Surrounding whitespace is stripped from `name`.
    pub fn new(name: impl Into<String>, fitness: f32) -> Self {
        let name: String = name.into();
        Self {
            name: name.trim().to_string(),
            fitness,
            active: false,
        }
    }
}

/// Configuration and roster for the current game session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub enabled: bool,
    /// Crew never lose fitness below the starting level
    pub wimp_mode: bool,
    pub initial_fitness: f32,
    pub min_fitness: f32,
    pub max_fitness: f32,
    /// Sustained acceleration (in g) crew tolerate without penalty
    pub gee_tolerance: f32,
    /// Kept sorted by crew name
    pub roster: Vec<CrewRecord>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            enabled: true,
            wimp_mode: false,
            initial_fitness: 20.0,
            min_fitness: 5.0,
            max_fitness: 40.0,
            gee_tolerance: 1.0,
            roster: Vec::new(),
        }
    }
}

impl SessionState {
    pub fn crew(&self, name: &str) -> Option<&CrewRecord> {
        self.roster.iter().find(|c| c.name == name)
    }

    pub fn crew_mut(&mut self, name: &str) -> Option<&mut CrewRecord> {
        self.roster.iter_mut().find(|c| c.name == name)
    }

    /// Insert or replace a crew record, keeping the roster ordered by name.
    ///
    /// The name is trimmed first so lookups and persisted entries agree.
    pub fn upsert_crew(&mut self, mut record: CrewRecord) {
        if record.name.trim().len() != record.name.len() {
            record.name = record.name.trim().to_string();
        }
        match self
            .roster
            .binary_search_by(|c| c.name.as_str().cmp(record.name.as_str()))
        {
            Ok(index) => self.roster[index] = record,
            Err(index) => self.roster.insert(index, record),
        }
    }

    /// Add a crew member at the configured starting fitness if not yet tracked.
    ///
    /// Returns `true` when a new record was created. Blank names are refused.
    pub fn enlist(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() || self.crew(name).is_some() {
            return false;
        }
        self.upsert_crew(CrewRecord::new(name, self.initial_fitness));
        true
    }

    pub fn active_crew_count(&self) -> usize {
        self.roster.iter().filter(|c| c.active).count()
    }

    /// Clamp a fitness value into the configured band.
    ///
    /// Wimp mode raises the floor to the starting fitness. A `NaN` bound is
    /// ignored rather than propagated.
    pub fn clamp_fitness(&self, fitness: f32) -> f32 {
        let floor = if self.wimp_mode {
            self.initial_fitness.max(self.min_fitness)
        } else {
            self.min_fitness
        };
        let ceiling = self.max_fitness.max(floor);
        fitness.max(floor).min(ceiling)
    }
}

/// Shared, single-threaded handle to the session state.
///
/// The scenario module owns the only strong handle that outlives a session;
/// controllers and windows receive clones. Identity is compared with
/// [`SessionHandle::ptr_eq`].
#[derive(Clone, Default)]
pub struct SessionHandle(Rc<RefCell<SessionState>>);

impl SessionHandle {
    pub fn new(state: SessionState) -> Self {
        Self(Rc::new(RefCell::new(state)))
    }

    pub fn borrow(&self) -> Ref<'_, SessionState> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, SessionState> {
        self.0.borrow_mut()
    }

    /// Clone the current state out of the handle.
    pub fn snapshot(&self) -> SessionState {
        self.0.borrow().clone()
    }

    pub fn ptr_eq(&self, other: &SessionHandle) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Number of live handles, including this one.
    pub fn holders(&self) -> usize {
        Rc::strong_count(&self.0)
    }
}

impl fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionHandle")
            .field("holders", &self.holders())
            .field("state", &*self.0.borrow())
            .finish()
    }
}
