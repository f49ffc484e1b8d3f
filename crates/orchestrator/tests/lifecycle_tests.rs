use crewfit_core::{ConfigNode, CrewRecord, OperatingPhase, PhaseSet, SessionHandle};
use orchestrator::core::{Controller, ControllerCatalog};
use orchestrator::host::{InMemoryModuleRegistry, ModuleRegistry, RecordingToolbar};
use orchestrator::persistence::SESSION_STATE_NODE;
use orchestrator::ui::{ROSTER_WINDOW_NODE, SETTINGS_WINDOW_NODE};
use orchestrator::{
    LifecycleState, ModuleConfig, OrchestratorError, Registrar, RegistrationOutcome,
    ScenarioModule, TeardownReport,
};
use std::cell::RefCell;
use std::rc::Rc;

type EventLog = Rc<RefCell<Vec<String>>>;

/// Controller that records its lifecycle calls.
struct Recorder {
    name: &'static str,
    log: EventLog,
    session: Option<SessionHandle>,
    fail_destroy: bool,
}

impl Controller for Recorder {
    fn name(&self) -> &'static str {
        self.name
    }

    fn set_shared_state(&mut self, state: SessionHandle) {
        self.log.borrow_mut().push(format!("{} inject", self.name));
        self.session = Some(state);
    }

    fn shared_state(&self) -> Option<&SessionHandle> {
        self.session.as_ref()
    }

    fn on_activate(&mut self) {
        let tolerance = self
            .session
            .as_ref()
            .map(|s| s.borrow().gee_tolerance)
            .unwrap_or_default();
        self.log
            .borrow_mut()
            .push(format!("{} activate {}", self.name, tolerance));
    }

    fn on_deactivate(&mut self) {
        self.log.borrow_mut().push(format!("{} deactivate", self.name));
    }

    fn on_destroy(&mut self) -> orchestrator::Result<()> {
        self.log.borrow_mut().push(format!("{} destroy", self.name));
        self.session = None;
        if self.fail_destroy {
            return Err(OrchestratorError::controller_failed(self.name, "forced failure"));
        }
        Ok(())
    }
}

fn recording_catalog(log: &EventLog, failing: Option<&'static str>) -> ControllerCatalog {
    let mut catalog = ControllerCatalog::new();
    for name in ["alpha", "beta"] {
        let log = Rc::clone(log);
        catalog = catalog.with(name, move || {
            Box::new(Recorder {
                name,
                log: Rc::clone(&log),
                session: None,
                fail_destroy: failing == Some(name),
            })
        });
    }
    catalog
}

fn new_module(toolbar: &RecordingToolbar) -> ScenarioModule {
    ScenarioModule::new(ModuleConfig::default(), Box::new(toolbar.clone()))
}

#[test]
fn test_repeated_awake_creates_resources_once() {
    let toolbar = RecordingToolbar::new();
    let mut module = new_module(&toolbar);

    module.on_awake(OperatingPhase::Flight).unwrap();
    let session = module.session().unwrap().clone();
    let settings = module.settings_window().unwrap();
    let roster = module.roster_window().unwrap();

    for phase in [OperatingPhase::Flight, OperatingPhase::Tracking] {
        assert_eq!(module.on_awake(phase).unwrap(), LifecycleState::Active);
    }
    assert!(matches!(
        module.on_awake(OperatingPhase::Menu),
        Err(OrchestratorError::InvalidLifecycleCall { call: "on_awake", .. })
    ));

    assert!(module.session().unwrap().ptr_eq(&session));
    assert!(Rc::ptr_eq(&settings, &module.settings_window().unwrap()));
    assert!(Rc::ptr_eq(&roster, &module.roster_window().unwrap()));
    assert_eq!(toolbar.registration_count(), 1);
    assert_eq!(module.controllers().len(), 3);
}

#[test]
fn test_non_hosting_phases_keep_registry_empty() {
    for phase in [OperatingPhase::Menu, OperatingPhase::Hub] {
        let toolbar = RecordingToolbar::new();
        let mut module = new_module(&toolbar);

        assert_eq!(module.on_awake(phase).unwrap(), LifecycleState::Awake);
        assert!(module.controllers().is_empty());
        assert!(module.session().is_some());
        assert_eq!(module.on_start().unwrap(), 0);
    }
}

#[test]
fn test_controllers_share_one_session() {
    let toolbar = RecordingToolbar::new();
    let mut module = new_module(&toolbar);
    module.on_awake(OperatingPhase::Hangar).unwrap();

    let session = module.session().unwrap().clone();
    assert_eq!(
        module.controllers().names(),
        vec!["crew_roster", "crew_fitness", "gee_effects"]
    );
    for controller in module.controllers().iter() {
        assert!(controller.shared_state().unwrap().ptr_eq(&session));
    }
}

#[test]
fn test_load_settles_before_activation() {
    let log = EventLog::default();
    let toolbar = RecordingToolbar::new();
    let mut module = new_module(&toolbar).with_catalog(recording_catalog(&log, None));

    module.on_awake(OperatingPhase::Flight).unwrap();
    assert_eq!(*log.borrow(), vec!["alpha inject", "beta inject"]);

    let mut root = ConfigNode::new("SCENARIO");
    root.get_or_create_node(SESSION_STATE_NODE)
        .set_value("gee_tolerance", 3.5);
    module.on_load(&root).unwrap();

    assert_eq!(module.on_start().unwrap(), 2);
    assert_eq!(module.on_start().unwrap(), 0);
    assert_eq!(
        log.borrow()[2..],
        ["alpha activate 3.5", "beta activate 3.5"]
    );
}

#[test]
fn test_non_finite_fitness_band_is_ignored_on_start() {
    let toolbar = RecordingToolbar::new();
    let mut module = new_module(&toolbar);
    module.on_awake(OperatingPhase::Flight).unwrap();

    let mut root = ConfigNode::new("SCENARIO");
    let node = root.get_or_create_node(SESSION_STATE_NODE);
    node.set_value("min_fitness", "NaN");
    node.set_value("max_fitness", "inf");
    let crew = node.add_node(ConfigNode::new("CREW"));
    crew.set_value("name", "Bill");
    crew.set_value("fitness", "1");

    let reports = module.on_load(&root).unwrap();
    let session_report = reports.iter().find(|r| r.node == SESSION_STATE_NODE).unwrap();
    assert_eq!(session_report.invalid, vec!["min_fitness", "max_fitness"]);
    assert!(!session_report.is_clean());

    assert_eq!(module.on_start().unwrap(), 3);
    let state = module.session().unwrap().snapshot();
    assert_eq!(state.min_fitness, 5.0);
    assert_eq!(state.max_fitness, 40.0);
    assert_eq!(state.crew("Bill").unwrap().fitness, 5.0);
}

#[test]
fn test_missing_session_node_falls_back_to_defaults() {
    let toolbar = RecordingToolbar::new();
    let mut module = new_module(&toolbar);
    module.on_awake(OperatingPhase::Flight).unwrap();

    let mut root = ConfigNode::new("SCENARIO");
    root.add_node(ConfigNode::new("OTHER_MODULE"))
        .set_value("keep", "me");

    let reports = module.on_load(&root).unwrap();
    assert_eq!(reports.len(), 3);
    assert!(reports.iter().all(|r| r.missing));
    assert_eq!(module.session().unwrap().borrow().min_fitness, 5.0);

    module.on_save(&mut root).unwrap();
    let saved = root.get_node(SESSION_STATE_NODE).unwrap();
    assert_eq!(saved.get_value("initial_fitness"), Some("20"));
    assert_eq!(saved.values().count(), 6);
    assert!(root.has_node(SETTINGS_WINDOW_NODE));
    assert!(root.has_node(ROSTER_WINDOW_NODE));
    assert_eq!(
        root.get_node("OTHER_MODULE").unwrap().get_value("keep"),
        Some("me")
    );
}

#[test]
fn test_state_survives_save_and_reload() {
    let mut root = ConfigNode::new("SCENARIO");
    {
        let toolbar = RecordingToolbar::new();
        let mut module = new_module(&toolbar);
        module.on_awake(OperatingPhase::Flight).unwrap();
        module.on_load(&root).unwrap();

        let session = module.session().unwrap().clone();
        session.borrow_mut().wimp_mode = true;
        session
            .borrow_mut()
            .upsert_crew(CrewRecord::new("Valentina", 31.0));
        module.roster_window().unwrap().borrow_mut().set_visible(true);

        module.on_save(&mut root).unwrap();
        module.on_destroy();
    }

    let toolbar = RecordingToolbar::new();
    let mut module = new_module(&toolbar);
    module.on_awake(OperatingPhase::Tracking).unwrap();
    let reports = module.on_load(&root).unwrap();
    assert!(reports.iter().all(|r| r.is_clean() && !r.missing));

    let state = module.session().unwrap().borrow().clone();
    assert!(state.wimp_mode);
    assert_eq!(state.crew("Valentina").unwrap().fitness, 31.0);
    assert!(module.roster_window().unwrap().borrow().is_visible());
}

#[test]
fn test_strict_load_reports_unknown_keys() {
    let toolbar = RecordingToolbar::new();
    let mut module = new_module(&toolbar);
    module.on_awake(OperatingPhase::Flight).unwrap();

    let mut root = ConfigNode::new("SCENARIO");
    let node = root.get_or_create_node(SESSION_STATE_NODE);
    node.set_value("max_fitness", 50);
    node.set_value("legacy_death_toll", 3);

    let reports = module.on_load(&root).unwrap();
    let session_report = reports.iter().find(|r| r.node == SESSION_STATE_NODE).unwrap();
    assert_eq!(session_report.unknown_keys, vec!["legacy_death_toll"]);
    assert_eq!(module.session().unwrap().borrow().max_fitness, 50.0);
}

#[test]
fn test_destroy_then_every_call_is_noop() {
    let toolbar = RecordingToolbar::new();
    let mut module = new_module(&toolbar);
    module.on_awake(OperatingPhase::Flight).unwrap();
    module.on_start().unwrap();

    let report = module.on_destroy();
    assert!(report.is_clean());
    assert_eq!(module.state(), LifecycleState::Destroyed);
    assert_eq!(toolbar.live_count(), 0);

    assert_eq!(
        module.on_awake(OperatingPhase::Flight).unwrap(),
        LifecycleState::Destroyed
    );
    assert!(module.session().is_none());
    assert!(module.on_load(&ConfigNode::new("SCENARIO")).unwrap().is_empty());
    assert_eq!(module.on_start().unwrap(), 0);

    let mut root = ConfigNode::new("SCENARIO");
    module.on_save(&mut root).unwrap();
    assert_eq!(root.nodes().count(), 0);

    assert_eq!(module.on_destroy(), TeardownReport::default());
    assert_eq!(toolbar.registration_count(), 1);
}

#[test]
fn test_destroy_before_awake() {
    let toolbar = RecordingToolbar::new();
    let mut module = new_module(&toolbar);

    let report = module.on_destroy();
    assert!(report.released.is_empty());
    assert_eq!(module.state(), LifecycleState::Destroyed);
}

#[test]
fn test_teardown_continues_past_failures() {
    let log = EventLog::default();
    let toolbar = RecordingToolbar::new();
    let mut module = new_module(&toolbar).with_catalog(recording_catalog(&log, Some("alpha")));

    module.on_awake(OperatingPhase::Flight).unwrap();
    module.on_start().unwrap();
    let session = module.session().unwrap().clone();

    toolbar.fail_releases(true);
    let report = module.on_destroy();

    assert_eq!(report.failures.len(), 2);
    assert!(report.released.contains(&"controller beta".to_string()));
    assert!(report.released.contains(&"session state".to_string()));
    assert_eq!(
        log.borrow()[4..],
        ["alpha deactivate", "alpha destroy", "beta deactivate", "beta destroy"]
    );
    assert_eq!(session.holders(), 1);
    assert_eq!(module.state(), LifecycleState::Destroyed);
}

#[test]
fn test_unavailable_toggle_does_not_block_awake() {
    let toolbar = RecordingToolbar::new();
    let mut first = new_module(&toolbar);
    first.on_awake(OperatingPhase::Flight).unwrap();

    // Same button id is still live, so the second registration is refused.
    let mut second = new_module(&toolbar);
    assert_eq!(
        second.on_awake(OperatingPhase::Flight).unwrap(),
        LifecycleState::Active
    );
    assert!(!second.has_toggle());

    first.on_destroy();
    second.on_awake(OperatingPhase::Flight).unwrap();
    assert!(second.has_toggle());
}

#[test]
fn test_registration_is_idempotent_across_startups() {
    let mut registry = InMemoryModuleRegistry::new();
    let config = ModuleConfig::default();

    let first = Registrar::ensure_registered(&mut registry, &config.module_name, &config.required_phases);
    assert!(matches!(first, RegistrationOutcome::Created { .. }));

    let again = Registrar::ensure_registered(&mut registry, &config.module_name, &config.required_phases);
    assert_eq!(again, RegistrationOutcome::Unchanged);

    let wider = PhaseSet::from([OperatingPhase::Flight, OperatingPhase::Hub]);
    let extended = Registrar::ensure_registered(&mut registry, &config.module_name, &wider);
    assert_eq!(
        extended,
        RegistrationOutcome::Extended {
            added: PhaseSet::from([OperatingPhase::Hub])
        }
    );

    assert_eq!(registry.len(), 1);
    let entry = registry.find(&config.module_name).unwrap();
    assert_eq!(entry.target_phases.len(), 5);
    assert_eq!(entry.phase_set(), config.required_phases.union(&wider));
}
