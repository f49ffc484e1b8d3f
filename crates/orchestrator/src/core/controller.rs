//! Lifecycle contract for subordinate processing units.

use crewfit_core::SessionHandle;

use crate::error::Result;

/// Contract every controller hosted by the scenario module implements.
///
/// The scenario module guarantees the call order:
///
/// 1. [`Controller::set_shared_state`] exactly once, before anything else
/// 2. [`Controller::on_activate`] at most once, after the session has loaded
/// 3. [`Controller::on_deactivate`] only if activated, before destruction
/// 4. [`Controller::on_destroy`] at most once
///
/// Controllers only ever borrow the session state; they must not hold a
/// `RefCell` borrow across calls.
pub trait Controller {
    /// Stable identity; the registry holds at most one controller per name.
    fn name(&self) -> &'static str;

    fn set_shared_state(&mut self, state: SessionHandle);

    /// The session handle received from [`Controller::set_shared_state`].
    fn shared_state(&self) -> Option<&SessionHandle>;

    fn on_activate(&mut self);

    fn on_deactivate(&mut self);

    /// Release whatever the controller holds.
    ///
    /// An error is reported by the caller and does not stop the teardown of
    /// other controllers.
    fn on_destroy(&mut self) -> Result<()>;
}
