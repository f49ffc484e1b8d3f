use crewfit_core::{ConfigNode, SessionHandle, SessionState};
use tracing::debug;

use super::WindowRect;
use crate::persistence::{DecodeReport, FieldReader, TreeCodec};

pub const SETTINGS_WINDOW_NODE: &str = "SETTINGS_WINDOW";

const DEFAULT_RECT: WindowRect = WindowRect::new(100.0, 100.0, 320.0, 240.0);

/// Window for editing the session configuration.
#[derive(Debug)]
pub struct SettingsWindow {
    session: SessionHandle,
    visible: bool,
    rect: WindowRect,
}

impl SettingsWindow {
    pub fn new(session: SessionHandle) -> Self {
        Self {
            session,
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

    pub fn rect(&self) -> WindowRect {
        self.rect
    }

    pub fn move_to(&mut self, x: f32, y: f32) {
        self.rect.x = x;
        self.rect.y = y;
    }

    /// Apply an edit to the session configuration.
    ///
    /// The fitness band is re-normalized afterwards so `min <= max` always
    /// holds for the controllers reading it.
    pub fn edit(&self, apply: impl FnOnce(&mut SessionState)) {
        let mut guard = self.session.borrow_mut();
        let state = &mut *guard;
        apply(&mut *state);
        if state.min_fitness > state.max_fitness {
            debug!(
                min = state.min_fitness,
                max = state.max_fitness,
                "Swapping inverted fitness band"
            );
            std::mem::swap(&mut state.min_fitness, &mut state.max_fitness);
        }
    }
}

impl TreeCodec for SettingsWindow {
    const NODE_NAME: &'static str = SETTINGS_WINDOW_NODE;

    fn encode(&self) -> ConfigNode {
        let mut node = ConfigNode::new(SETTINGS_WINDOW_NODE);
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
