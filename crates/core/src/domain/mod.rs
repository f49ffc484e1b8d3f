mod config_tree;
mod phase;
mod session_state;

pub use config_tree::ConfigNode;
pub use phase::{OperatingPhase, PhaseSet};
pub use session_state::{CrewRecord, SessionHandle, SessionState};
