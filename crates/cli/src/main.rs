mod document;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crewfit_core::{OperatingPhase, PhaseSet};
use orchestrator::host::{ModuleRegistry, RecordingToolbar};
use orchestrator::persistence::SESSION_STATE_NODE;
use orchestrator::ui::{ROSTER_WINDOW_NODE, SETTINGS_WINDOW_NODE};
use orchestrator::{ModuleConfig, Registrar, ScenarioModule};
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use document::SaveDocument;

const DEFAULT_CONFIG_FILE: &str = "crewfit.toml";
const DEFAULT_SAVE_FILE: &str = "persistent.json";

#[derive(Parser)]
#[command(name = "crewfit")]
#[command(about = "Drive the crew fitness scenario module through a host session", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the default module configuration
    Init {
        #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
        config: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
    /// Register the module with the host registry in the save file
    Register {
        /// Extra phases to register for, on top of the configured ones
        #[arg(long = "phase")]
        phases: Vec<OperatingPhase>,

        #[arg(long, default_value = DEFAULT_SAVE_FILE)]
        save: PathBuf,

        #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
        config: PathBuf,
    },
    /// Run one full session: awake, load, start, save, destroy
    Run {
        #[arg(long)]
        phase: OperatingPhase,

        #[arg(long, default_value = DEFAULT_SAVE_FILE)]
        save: PathBuf,

        #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
        config: PathBuf,

        /// Crew members to enlist before saving
        #[arg(long = "crew")]
        crew: Vec<String>,
    },
    /// Print the module-owned nodes of a save file
    Inspect {
        #[arg(long, default_value = DEFAULT_SAVE_FILE)]
        save: PathBuf,
    },
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Init { config, force } => init_config(&config, force),
        Commands::Register {
            phases,
            save,
            config,
        } => register(&phases, &save, &config),
        Commands::Run {
            phase,
            save,
            config,
            crew,
        } => run(phase, &save, &config, &crew),
        Commands::Inspect { save } => inspect(&save),
    }
}

fn init_config(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        println!("Config already exists at {}", path.display());
        return Ok(());
    }

    let config = ModuleConfig::default();
    config
        .write(path)
        .with_context(|| format!("Failed to write config {}", path.display()))?;

    println!("Wrote default config to {}", path.display());
    println!("  module:  {}", config.module_name);
    println!("  phases:  {}", config.required_phases);
    Ok(())
}

fn register(extra: &[OperatingPhase], save: &Path, config_path: &Path) -> Result<()> {
    let config = ModuleConfig::read(config_path);
    let mut doc = SaveDocument::open(save)?;

    let phases: PhaseSet = config
        .required_phases
        .iter()
        .chain(extra.iter().copied())
        .collect();
    let outcome = Registrar::ensure_registered(&mut doc.registry, &config.module_name, &phases);

    doc.write(save)?;
    println!("{}: {}", config.module_name, outcome);
    Ok(())
}

fn run(phase: OperatingPhase, save: &Path, config_path: &Path, crew: &[String]) -> Result<()> {
    let config = ModuleConfig::read(config_path);
    let mut doc = SaveDocument::open(save)?;

    // The host registers scenario modules when it reaches the hub.
    if phase == OperatingPhase::Hub {
        let outcome =
            Registrar::ensure_registered(&mut doc.registry, &config.module_name, &config.required_phases);
        tracing::info!(module = %config.module_name, %outcome, "Registration checked");
    }

    let hosted = doc
        .registry
        .find(&config.module_name)
        .is_some_and(|r| r.targets(phase));
    if !hosted {
        println!(
            "{} is not registered for phase {}; nothing to run.",
            config.module_name, phase
        );
        println!("Run 'crewfit register' or 'crewfit run --phase hub' first.");
        doc.write(save)?;
        return Ok(());
    }

    let toolbar = RecordingToolbar::new();
    let mut module = ScenarioModule::new(config, Box::new(toolbar.clone()));

    let state = module.on_awake(phase)?;
    let reports = module.on_load(&doc.scenario)?;
    if let Some(session) = module.session() {
        let mut session_state = session.borrow_mut();
        for name in crew {
            if session_state.enlist(name) {
                tracing::info!(crew = %name, "Crew member enlisted");
            }
        }
    }
    let activated = module.on_start()?;
    module.on_save(&mut doc.scenario)?;

    let roster = module.session().map(|s| s.snapshot().roster).unwrap_or_default();
    let report = module.on_destroy();
    doc.write(save)?;

    println!();
    println!("Session in phase {} ({})", phase, state);
    println!("════════════════════════════════════════");
    println!("  Controllers activated: {}", activated);
    println!("  Toolbar toggles:       {}", toolbar.registration_count());
    for decoded in &reports {
        let status = if decoded.missing {
            "absent, defaults used"
        } else if decoded.is_clean() {
            "loaded"
        } else {
            "loaded with diagnostics"
        };
        println!("  {:<22} {}", decoded.node, status);
    }
    println!();
    if roster.is_empty() {
        println!("  No crew on the roster.");
    } else {
        println!("  Roster ({}):", roster.len());
        for record in &roster {
            let marker = if record.active { "●" } else { "○" };
            println!("    {} {:<20} {:>6.1}", marker, record.name, record.fitness);
        }
    }
    println!();
    println!(
        "  Released {} resources, {} failures",
        report.released.len(),
        report.failures.len()
    );
    for failure in &report.failures {
        println!("    ! {}", failure);
    }
    println!();

    Ok(())
}

fn inspect(save: &Path) -> Result<()> {
    if !save.exists() {
        println!("No save file at {}", save.display());
        return Ok(());
    }
    let doc = SaveDocument::open(save)?;

    println!();
    match doc.saved_at {
        Some(at) => println!("Saved at {}", at.to_rfc3339()),
        None => println!("Never saved"),
    }
    println!();

    if doc.registry.is_empty() {
        println!("No module registrations.");
    } else {
        println!("Registrations ({}):", doc.registry.len());
        for entry in doc.registry.entries() {
            println!("  {} {}", entry.module_name, entry.phase_set());
        }
    }
    println!();

    for name in [SETTINGS_WINDOW_NODE, ROSTER_WINDOW_NODE, SESSION_STATE_NODE] {
        match doc.scenario.get_node(name) {
            Some(node) => println!("{}", node.to_json_pretty()?),
            None => println!("{}: not saved", name),
        }
    }

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "crewfit=info,orchestrator=info".into()),
        )
        .init();
}
