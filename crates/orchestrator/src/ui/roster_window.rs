use crewfit_core::{ConfigNode, SessionHandle};
use std::cell::RefCell;
use std::rc::{Rc, Weak};

use super::{SettingsWindow, WindowRect};
use crate::persistence::{DecodeReport, FieldReader, TreeCodec};

pub const ROSTER_WINDOW_NODE: &str = "ROSTER_WINDOW";

const DEFAULT_RECT: WindowRect = WindowRect::new(440.0, 100.0, 360.0, 420.0);

/// One line of the roster display.
#[derive(Debug, Clone, PartialEq)]
pub struct RosterRow {
    pub name: String,
    pub fitness: f32,
    pub active: bool,
}

/// Status window listing the crew roster and their fitness.
///
/// Holds a weak link to the settings window so it can offer to open it
/// without keeping it alive.
#[derive(Debug)]
pub struct RosterWindow {
    session: SessionHandle,
    settings: Weak<RefCell<SettingsWindow>>,
    visible: bool,
    rect: WindowRect,
}

impl RosterWindow {
    pub fn new(session: SessionHandle, settings: &Rc<RefCell<SettingsWindow>>) -> Self {
        Self {
            session,
            settings: Rc::downgrade(settings),
            visible: false,
            rect: DEFAULT_RECT,
        }
    }

    pub fn session(&self) -> &SessionHandle {
        &self.session
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Flip visibility, returning the new value.
    pub fn toggle_visible(&mut self) -> bool {
        self.visible = !self.visible;
        self.visible
    }

    pub fn rect(&self) -> WindowRect {
        self.rect
    }

    pub fn move_to(&mut self, x: f32, y: f32) {
        self.rect.x = x;
        self.rect.y = y;
    }

    /// Show the settings window, if it still exists.
    pub fn open_settings(&self) -> bool {
        match self.settings.upgrade() {
            Some(settings) => {
                settings.borrow_mut().set_visible(true);
                true
            }
            None => false,
        }
    }

    pub fn rows(&self) -> Vec<RosterRow> {
        self.session
            .borrow()
            .roster
            .iter()
            .map(|c| RosterRow {
                name: c.name.clone(),
                fitness: c.fitness,
                active: c.active,
            })
            .collect()
    }

    /// `(active, total)` crew counts.
    pub fn counts(&self) -> (usize, usize) {
        let state = self.session.borrow();
        (state.active_crew_count(), state.roster.len())
    }
}

impl TreeCodec for RosterWindow {
    const NODE_NAME: &'static str = ROSTER_WINDOW_NODE;

    fn encode(&self) -> ConfigNode {
        let mut node = ConfigNode::new(ROSTER_WINDOW_NODE);
        node.set_value("visible", self.visible);
        self.rect.encode_into(&mut node);
        node
    }

    fn decode(&mut self, fragment: &ConfigNode, strict: bool) -> DecodeReport {
        let mut reader = FieldReader::new(fragment);
        reader.read_flag("visible", &mut self.visible);
        self.rect.decode_from(&mut reader);
        reader.finish(strict)
    }
}
