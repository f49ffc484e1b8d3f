//! RAII guards and teardown bookkeeping.
//!
//! - [`ToggleGuard`] - owns a toolbar toggle and removes it exactly once
//! - [`ControllerGuard`] - owns a controller and destroys it exactly once
//! - [`TeardownReport`] - what a best-effort teardown released and what failed

mod controller_guard;
mod toggle_guard;

pub use controller_guard::ControllerGuard;
pub use toggle_guard::ToggleGuard;

/// Result of a best-effort teardown.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TeardownReport {
    /// Resources released, in release order
    pub released: Vec<String>,
    /// Non-fatal release failures
    pub failures: Vec<String>,
}

impl TeardownReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    pub(crate) fn record_release(&mut self, resource: impl Into<String>) {
        self.released.push(resource.into());
    }

    pub(crate) fn record_failure(&mut self, failure: impl ToString) {
        self.failures.push(failure.to_string());
    }
}
