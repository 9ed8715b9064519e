use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand, ValueEnum};
use restrictor_core::host::ObjectDef;
use restrictor_core::keyword::{Severity, lint_tag};
use restrictor_core::ledger::LedgerSnapshot;
use restrictor_core::sim::{SimActor, SimHost, SimWorld};
use restrictor_core::{DebuffLedger, Decision, EventRouter, load_default_settings, load_settings};
use restrictor_types::{RestrictParams, RestrictReason, Settings};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about = "Check restriction keywords and evaluate scenarios")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report problems in every policy keyword of a definitions file
    Lint {
        path: PathBuf,
    },
    /// Evaluate each object of a scenario file against its actor
    Eval {
        path: PathBuf,
        #[arg(short, long, value_enum, default_value_t = Mode::Equip)]
        mode: Mode,
        /// Settings file used for notifications. Without it the settings in
        /// the user config directory are used, created on first run.
        #[arg(short, long)]
        settings: Option<PathBuf>,
        /// Also equip every object on the actor and print the debuff ledger
        #[arg(long)]
        equip_all: bool,
    },
    /// Print the default settings as TOML
    Defaults,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Mode {
    Equip,
    EquipDebuff,
    Cast,
}

impl Mode {
    fn params(self) -> RestrictParams {
        match self {
            Self::Equip => RestrictParams::equip(),
            Self::EquipDebuff => RestrictParams::equip_debuff(),
            Self::Cast => RestrictParams::cast(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct LintFile {
    #[serde(default, rename = "object")]
    objects: Vec<LintObject>,
}

#[derive(Debug, Deserialize)]
struct LintObject {
    editor_id: String,
    #[serde(default)]
    keywords: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct Scenario {
    #[serde(default)]
    world: SimWorld,
    actor: SimActor,
    #[serde(default, rename = "object")]
    objects: Vec<ObjectDef>,
}

#[derive(Debug, Serialize)]
struct EvalRow<'a> {
    object: &'a str,
    #[serde(flatten)]
    decision: Decision,
    reason: RestrictReason,
    notification: String,
}

/// `RUST_LOG` directives, or `info` when none are given.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    EnvFilter::builder()
        .with_default_directive(tracing::Level::INFO.into())
        .parse_lossy(directives.unwrap_or_default())
}

fn init_logging() {
    let filter = log_filter(std::env::var("RUST_LOG").ok().as_deref());

    // If RESTRICTOR_LOG_PATH is set, append to that file
    if let Ok(path) = std::env::var("RESTRICTOR_LOG_PATH") {
        if let Ok(file) = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
        {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(true)
                .with_ansi(false)
                .with_writer(file)
                .init();
            return;
        }
    }

    // Fallback to stderr
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Lint { path } => lint(&path),
        Commands::Eval {
            path,
            mode,
            settings,
            equip_all,
        } => eval(&path, mode, settings.as_deref(), equip_all).map(|()| true),
        Commands::Defaults => defaults().map(|()| true),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(2)
        }
    }
}

fn read_toml<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T, String> {
    let contents = std::fs::read_to_string(path).map_err(|e| format!("{}: {e}", path.display()))?;
    toml::from_str(&contents).map_err(|e| format!("{}: {e}", path.display()))
}

/// Returns false if any error-level issue was found.
fn lint(path: &Path) -> Result<bool, String> {
    let file: LintFile = read_toml(path)?;

    let mut errors = 0;
    let mut warnings = 0;
    for object in &file.objects {
        for keyword in &object.keywords {
            for issue in lint_tag(keyword) {
                let label = match issue.severity() {
                    Severity::Error => {
                        errors += 1;
                        "error"
                    }
                    Severity::Warning => {
                        warnings += 1;
                        "warning"
                    }
                };
                println!("{label}: {} `{keyword}`: {issue}", object.editor_id);
            }
        }
    }

    println!(
        "{} objects checked, {errors} errors, {warnings} warnings",
        file.objects.len()
    );
    Ok(errors == 0)
}

fn eval(path: &Path, mode: Mode, settings: Option<&Path>, equip_all: bool) -> Result<(), String> {
    let scenario: Scenario = read_toml(path)?;
    let settings = match settings {
        Some(path) => load_settings(path).map_err(|e| e.to_string())?,
        None => load_default_settings().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Using default settings");
            Settings::default()
        }),
    };

    let router = EventRouter::new(scenario.world, settings, Arc::new(DebuffLedger::new()));

    let mut rows = Vec::with_capacity(scenario.objects.len());
    for object in &scenario.objects {
        let mut params = mode.params();
        let decision = router.decide(&scenario.actor, object, &mut params);
        let notification = if decision.skip {
            router
                .settings()
                .notification(&object.editor_id, object.display_name(), &params)
        } else {
            String::new()
        };
        rows.push(EvalRow {
            object: &object.editor_id,
            decision,
            reason: params.reason,
            notification,
        });
    }
    let json = serde_json::to_string_pretty(&rows).map_err(|e| e.to_string())?;
    println!("{json}");

    if equip_all {
        let (snapshot, notifications) = equip_every_object(&router, &scenario.actor, &scenario.objects);
        let json = serde_json::to_string_pretty(&snapshot).map_err(|e| e.to_string())?;
        println!("{json}");
        for message in notifications {
            println!("notify: {message}");
        }
    }

    Ok(())
}

/// Equip each object on `actor` in order against a fresh host. Returns the
/// resulting ledger and the notifications the host was asked to show.
fn equip_every_object(
    router: &EventRouter<SimWorld>,
    actor: &SimActor,
    objects: &[ObjectDef],
) -> (LedgerSnapshot, Vec<String>) {
    let host = SimHost::new();
    for object in objects {
        router.on_equip_changed(actor, object, true, &host);
    }
    router.drain_tasks(&host);
    (router.ledger().snapshot(), host.notifications())
}

fn defaults() -> Result<(), String> {
    let text = toml::to_string_pretty(&Settings::with_builtin_templates()).map_err(|e| e.to_string())?;
    print!("{text}");
    Ok(())
}
