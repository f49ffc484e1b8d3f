//! Conversion of module state to and from the host's config tree.
//!
//! - [`TreeCodec`] - implemented by every persisted object
//! - [`save_fragment`] / [`load_fragment`] - install or read an object's
//!   uniquely named child node inside a host-owned parent node
//! - [`DecodeReport`] - what a decode applied, rejected, or did not recognise

mod codec;
mod session_state;

pub use codec::{load_fragment, save_fragment, DecodeReport, FieldReader, TreeCodec};
pub use session_state::{CREW_NODE, SESSION_STATE_NODE};
