//! The per-session scenario module.
//!
//! The host drives a [`ScenarioModule`] through five synchronous callbacks:
//! awake, load, start, save and destroy. The module owns the session state,
//! its windows, its toolbar toggle and its controllers, and releases all of
//! them exactly once.

use crewfit_core::{ConfigNode, OperatingPhase, SessionHandle, SessionState};
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::ModuleConfig;
use crate::core::{ControllerCatalog, ControllerRegistry};
use crate::error::{OrchestratorError, Result};
use crate::host::{ClickAction, ToolbarService};
use crate::persistence::{load_fragment, save_fragment, DecodeReport};
use crate::resources::{TeardownReport, ToggleGuard};
use crate::state_machine::{LifecycleState, LifecycleStateMachine};
use crate::ui::{RosterWindow, SettingsWindow};

pub struct ScenarioModule {
    instance_id: Uuid,
    config: ModuleConfig,
    toolbar: Box<dyn ToolbarService>,
    catalog: ControllerCatalog,
    state: LifecycleState,
    phase: Option<OperatingPhase>,
    session: Option<SessionHandle>,
    settings_window: Option<Rc<RefCell<SettingsWindow>>>,
    roster_window: Option<Rc<RefCell<RosterWindow>>>,
    toggle: Option<ToggleGuard>,
    controllers: ControllerRegistry,
}

impl ScenarioModule {
    /// Create an uninitialized module with the standard controller catalog.
    ///
    /// # Arguments
    /// * `config` - Module name, hosting phases, toolbar placement and load strictness
    /// * `toolbar` - Host toolbar the roster toggle is registered with
    pub fn new(config: ModuleConfig, toolbar: Box<dyn ToolbarService>) -> Self {
        Self {
            instance_id: Uuid::new_v4(),
            config,
            toolbar,
            catalog: ControllerCatalog::standard(),
            state: LifecycleState::Uninitialized,
            phase: None,
            session: None,
            settings_window: None,
            roster_window: None,
            toggle: None,
            controllers: ControllerRegistry::new(),
        }
    }

    /// Replace the controller catalog. Only takes effect before activation.
    pub fn with_catalog(mut self, catalog: ControllerCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Identifier of this instance, stable for its lifetime.
    pub fn instance_id(&self) -> Uuid {
        self.instance_id
    }

    pub fn config(&self) -> &ModuleConfig {
        &self.config
    }

    /// Current lifecycle state.
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Phase of the most recent awake call.
    pub fn phase(&self) -> Option<OperatingPhase> {
        self.phase
    }

    /// Shared session state, absent before awake and after destroy.
    pub fn session(&self) -> Option<&SessionHandle> {
        self.session.as_ref()
    }

    pub fn settings_window(&self) -> Option<Rc<RefCell<SettingsWindow>>> {
        self.settings_window.clone()
    }

    pub fn roster_window(&self) -> Option<Rc<RefCell<RosterWindow>>> {
        self.roster_window.clone()
    }

    /// Whether the toolbar toggle is currently registered.
    pub fn has_toggle(&self) -> bool {
        self.toggle.as_ref().is_some_and(|t| t.is_registered())
    }

    /// Controllers owned by this instance, in registration order.
    pub fn controllers(&self) -> &ControllerRegistry {
        &self.controllers
    }

    /// Host awake callback.
    ///
    /// Creates whatever is missing of the session state, windows and toggle,
    /// then instantiates controllers if `phase` hosts them. Repeated calls
    /// create nothing twice; an awake instance is promoted once a hosting
    /// phase arrives. After destroy this is a no-op.
    ///
    /// An active instance woken in a phase that does not host controllers is
    /// rejected with [`OrchestratorError::InvalidLifecycleCall`] and left
    /// untouched.
    pub fn on_awake(&mut self, phase: OperatingPhase) -> Result<LifecycleState> {
        if self.state == LifecycleState::Destroyed {
            debug!(module = %self.config.module_name, "Awake after destroy ignored");
            return Ok(self.state);
        }
        if self.state == LifecycleState::Active && !self.config.hosts_phase(phase) {
            warn!(
                module = %self.config.module_name,
                phase = %phase,
                "Active module woken in a phase that does not host controllers"
            );
            return Err(OrchestratorError::invalid_call("on_awake", self.state));
        }

        self.phase = Some(phase);
        let session = self.ensure_session();
        self.ensure_windows(&session);
        self.ensure_toggle();

        if self.state == LifecycleState::Uninitialized {
            self.transition(LifecycleState::Awake)?;
        }

        if self.state == LifecycleState::Awake {
            if self.config.hosts_phase(phase) {
                self.transition(LifecycleState::Active)?;
                self.instantiate_controllers(&session);
            } else {
                debug!(
                    module = %self.config.module_name,
                    phase = %phase,
                    "Phase does not host controllers"
                );
            }
        }

        Ok(self.state)
    }

    /// Host load callback.
    ///
    /// Reads the settings window, the roster window and then the session
    /// state from `root`. Absent nodes leave defaults in place.
    pub fn on_load(&mut self, root: &ConfigNode) -> Result<Vec<DecodeReport>> {
        if !self.accepts_call("on_load")? {
            return Ok(Vec::new());
        }

        let mut reports = Vec::with_capacity(3);
        if let Some(window) = &self.settings_window {
            reports.push(load_fragment(root, &mut *window.borrow_mut(), false));
        }
        if let Some(window) = &self.roster_window {
            reports.push(load_fragment(root, &mut *window.borrow_mut(), false));
        }
        if let Some(session) = &self.session {
            let strict = self.config.strict_load;
            reports.push(load_fragment(root, &mut *session.borrow_mut(), strict));
        }

        for report in reports.iter().filter(|r| !r.is_clean()) {
            warn!(
                node = %report.node,
                invalid = ?report.invalid,
                unknown = ?report.unknown_keys,
                "Persisted state loaded with diagnostics"
            );
        }
        info!(
            module = %self.config.module_name,
            nodes = reports.iter().filter(|r| !r.missing).count(),
            "Scenario state loaded"
        );

        Ok(reports)
    }

    /// Host start callback, issued after load.
    ///
    /// Activates controllers not yet activated and returns how many were.
    pub fn on_start(&mut self) -> Result<usize> {
        if !self.accepts_call("on_start")? {
            return Ok(0);
        }

        let activated = self.controllers.activate_all();
        if activated > 0 {
            info!(module = %self.config.module_name, activated, "Controllers activated");
        }
        Ok(activated)
    }

    /// Host save callback. Writes each owned node that exists into `root`.
    pub fn on_save(&mut self, root: &mut ConfigNode) -> Result<()> {
        if !self.accepts_call("on_save")? {
            return Ok(());
        }

        if let Some(window) = &self.settings_window {
            save_fragment(root, &*window.borrow());
        }
        if let Some(window) = &self.roster_window {
            save_fragment(root, &*window.borrow());
        }
        if let Some(session) = &self.session {
            save_fragment(root, &*session.borrow());
        }

        debug!(module = %self.config.module_name, "Scenario state saved");
        Ok(())
    }

    /// Host destroy callback.
    ///
    /// Releases the toggle, tears down controllers and drops the windows and
    /// session. Failures are recorded and never stop the teardown. A second
    /// call returns an empty report.
    pub fn on_destroy(&mut self) -> TeardownReport {
        let mut report = TeardownReport::default();
        if self.state == LifecycleState::Destroyed {
            return report;
        }

        if let Some(mut toggle) = self.toggle.take() {
            match toggle.release() {
                Ok(true) => report.record_release(format!("toggle {}", toggle.label())),
                Ok(false) => {}
                Err(e) => {
                    warn!(toggle = %toggle.label(), error = %e, "Toggle release failed");
                    report.record_failure(e);
                }
            }
        }

        let (destroyed, failures) = self.controllers.teardown();
        for name in destroyed {
            report.record_release(format!("controller {}", name));
        }
        for failure in failures {
            report.record_failure(failure);
        }

        if self.roster_window.take().is_some() {
            report.record_release("roster window");
        }
        if self.settings_window.take().is_some() {
            report.record_release("settings window");
        }
        if self.session.take().is_some() {
            report.record_release("session state");
        }

        if let Err(e) = self.transition(LifecycleState::Destroyed) {
            report.record_failure(e);
            self.state = LifecycleState::Destroyed;
        }

        info!(
            module = %self.config.module_name,
            released = report.released.len(),
            failures = report.failures.len(),
            "Scenario module destroyed"
        );
        report
    }

    /// Whether a load/start/save call should run. `Ok(false)` after destroy.
    fn accepts_call(&self, call: &'static str) -> Result<bool> {
        if self.state.is_live() {
            return Ok(true);
        }
        if self.state == LifecycleState::Destroyed {
            debug!(call, "Lifecycle call after destroy ignored");
            return Ok(false);
        }
        Err(OrchestratorError::invalid_call(call, self.state))
    }

    fn transition(&mut self, to: LifecycleState) -> Result<()> {
        LifecycleStateMachine::validate_transition(&self.state, &to)?;
        info!(
            module = %self.config.module_name,
            instance = %self.instance_id,
            from = %self.state,
            to = %to,
            "Lifecycle transition"
        );
        self.state = to;
        Ok(())
    }

    fn ensure_session(&mut self) -> SessionHandle {
        self.session
            .get_or_insert_with(|| {
                debug!("Creating session state");
                SessionHandle::new(SessionState::default())
            })
            .clone()
    }

    fn ensure_windows(&mut self, session: &SessionHandle) {
        let settings = self
            .settings_window
            .get_or_insert_with(|| {
                debug!("Creating settings window");
                Rc::new(RefCell::new(SettingsWindow::new(session.clone())))
            })
            .clone();

        if self.roster_window.is_none() {
            debug!("Creating roster window");
            self.roster_window = Some(Rc::new(RefCell::new(RosterWindow::new(
                session.clone(),
                &settings,
            ))));
        }
    }

    /// Register the toolbar toggle. A refused registration is logged and
    /// retried on the next awake.
    fn ensure_toggle(&mut self) {
        if self.toggle.is_some() {
            return;
        }
        let Some(roster) = &self.roster_window else {
            return;
        };

        let roster: Weak<RefCell<RosterWindow>> = Rc::downgrade(roster);
        let action: ClickAction = Box::new(move || {
            if let Some(window) = roster.upgrade() {
                let visible = window.borrow_mut().toggle_visible();
                debug!(visible, "Roster window toggled");
            }
        });

        match ToggleGuard::register(self.toolbar.as_mut(), &self.config.toolbar, action) {
            Ok(toggle) => self.toggle = Some(toggle),
            Err(e) => warn!(error = %e, "Toolbar toggle unavailable"),
        }
    }

    fn instantiate_controllers(&mut self, session: &SessionHandle) {
        for controller in self.catalog.instantiate() {
            let name = controller.name();
            if let Err(e) = self.controllers.register(controller, session) {
                warn!(controller = %name, error = %e, "Controller skipped");
            }
        }
        info!(
            module = %self.config.module_name,
            controllers = ?self.controllers.names(),
            "Controllers instantiated"
        );
    }
}

impl Drop for ScenarioModule {
    fn drop(&mut self) {
        if self.state != LifecycleState::Destroyed {
            let report = self.on_destroy();
            if !report.is_clean() {
                warn!(failures = ?report.failures, "Scenario module dropped with release failures");
            }
        }
    }
}
