//! UI affordances owned by the scenario module.
//!
//! Rendering belongs to the host; these types carry the state the windows
//! persist (visibility and placement) and the data they present.

mod roster_window;
mod settings_window;

pub use roster_window::{RosterRow, RosterWindow, ROSTER_WINDOW_NODE};
pub use settings_window::{SettingsWindow, SETTINGS_WINDOW_NODE};

use crewfit_core::ConfigNode;

use crate::persistence::FieldReader;

/// Screen placement of a window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl WindowRect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    fn encode_into(&self, node: &mut ConfigNode) {
        node.set_value("x", self.x);
        node.set_value("y", self.y);
        node.set_value("width", self.width);
        node.set_value("height", self.height);
    }

    fn decode_from<'a>(&mut self, reader: &mut FieldReader<'a>) {
        reader.read_finite("x", &mut self.x);
        reader.read_finite("y", &mut self.y);
        reader.read_finite("width", &mut self.width);
        reader.read_finite("height", &mut self.height);
    }
}
