//! Indicator - status-bar icon module core
//!
//! Runs the module registry against an in-memory platform driven by an event
//! script (JSON lines, from the file given as the first argument or from
//! stdin) and prints the final status bar when the script ends.

use anyhow::{Context, Result};
use indicator::{
    config::ConfigManager,
    icon::IconBoard,
    modules::{ModuleContext, Registry, default_modules},
    platform::MemoryPlatform,
    shell::{IndicatorShell, ScriptCommand, ShellEvent, parse_script},
    utils,
};
use std::io::BufReader;
use std::sync::{Arc, mpsc};
use tracing::{debug, info};

/// Main entry point for the indicator
///
/// Loads configuration, builds the registry, starts the shell and feeds it the
/// event script from a producer thread.
fn main() -> Result<()> {
    utils::init_logging(&ConfigManager::get_config_dir())
        .context("Failed to initialize logging system")?;

    let config = ConfigManager::load().context("Failed to load indicator configuration")?;
    let commands = read_script().context("Failed to read event script")?;
    info!("Loaded {} script command(s)", commands.len());

    let (platform, platform_events) = MemoryPlatform::new();
    let platform = Arc::new(platform);
    let board = Arc::new(IconBoard::new(config.preferences.resource_dir.clone()));
    let ctx = ModuleContext::new(platform.clone(), board.clone());

    let modules = default_modules()
        .into_iter()
        .filter(|module| {
            let enabled = config.is_enabled(module.name());
            if !enabled {
                info!("Module {} disabled by configuration", module.name());
            }
            enabled
        })
        .collect();
    let registry = Registry::new(modules).with_first_stage(config.preferences.first_stage_modules);

    let (shell_sender, shell_events) = mpsc::channel();
    let mut shell = IndicatorShell::create(
        registry,
        ctx,
        platform_events,
        shell_events,
        config.preferences.poll_interval(),
    );
    shell.start();

    let feeder_platform = platform.clone();
    let feeder = std::thread::Builder::new()
        .name("script-feeder".to_string())
        .spawn(move || feed_script(commands, &feeder_platform, &shell_sender))
        .context("Failed to spawn script feeder thread")?;

    shell.run();
    if feeder.join().is_err() {
        anyhow::bail!("Script feeder thread panicked");
    }

    print_board(&board);
    Ok(())
}

/// Read the event script from the first argument, or stdin without one
fn read_script() -> Result<Vec<ScriptCommand>> {
    match std::env::args_os().nth(1) {
        Some(path) => {
            let file = std::fs::File::open(&path)
                .with_context(|| format!("Cannot open {}", path.to_string_lossy()))?;
            Ok(parse_script(BufReader::new(file))?)
        }
        None => Ok(parse_script(std::io::stdin().lock())?),
    }
}

/// Apply every command, forwarding shell events, then ask the shell to stop
fn feed_script(
    commands: Vec<ScriptCommand>,
    platform: &MemoryPlatform,
    shell: &mpsc::Sender<ShellEvent>,
) {
    for command in commands {
        let Some(event) = command.apply(platform) else {
            continue;
        };
        let terminate = event == ShellEvent::Terminate;
        if shell.send(event).is_err() {
            debug!("Shell stopped before the script ended");
            return;
        }
        if terminate {
            return;
        }
    }
    // The shell may have exited on its own already
    let _ = shell.send(ShellEvent::Terminate);
}

fn print_board(board: &IconBoard) {
    for icon in board.snapshot() {
        let payload = icon
            .label
            .clone()
            .or_else(|| icon.image.as_ref().map(|image| image.display().to_string()))
            .unwrap_or_default();
        println!(
            "{:<18} {:>3}  {:<22} {}",
            icon.area.to_string(),
            icon.priority,
            icon.name,
            payload
        );
    }
}
