// EventFiend - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. config.toml loading
// 3. Logging initialisation (debug mode support)
// 4. Initial log listing (local, remote or .evtx files)
// 5. eframe GUI launch

#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod gui;

// Re-export modules from the library crate so that `gui.rs` and other
// binary-side code can still use `crate::app::...`, `crate::core::...` etc.
pub use eventfiend::app;

pub use eventfiend::core;
pub use eventfiend::platform;
pub use eventfiend::ui;
pub use eventfiend::util;

use clap::Parser;
use std::path::PathBuf;

/// EventFiend - Windows event log browser.
///
/// Lists the event logs of this or a remote machine, or of exported .evtx
/// files, and shows their entries in a filterable, groupable table.
#[derive(Parser, Debug)]
#[command(name = "EventFiend", version, about)]
struct Cli {
    /// Remote machine whose event logs are listed at startup.
    #[arg(long = "host")]
    host: Option<String>,

    /// Exported .evtx files to add to the log list.
    #[arg(long = "evtx", num_args = 1..)]
    evtx: Vec<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    // The config may set the log level, so it is read before logging starts
    // and its warnings are emitted afterwards.
    let platform_paths = platform::config::PlatformPaths::resolve();
    let (config, config_warnings, config_error) =
        match platform::config::load_config(&platform_paths.config_dir) {
            Ok((config, warnings)) => (config, warnings, None),
            Err(e) => (platform::config::AppConfig::default(), Vec::new(), Some(e)),
        };

    util::logging::init(cli.debug, config.log_level.as_deref());

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        "EventFiend starting"
    );
    for warning in &config_warnings {
        tracing::warn!(warning = %warning, "Config warning");
    }

    // Create application state
    let provider = platform::host::SystemProvider::new(config.read_buffer_bytes);
    let mut state = app::state::AppState::new(Box::new(provider), cli.debug);
    state.dark_mode = config.dark_mode;
    state.group_mode = config.group_mode;
    for path in cli.evtx {
        state.add_evtx_file(path);
    }

    // Shown once the window is up; defaults are in effect.
    if let Some(e) = config_error {
        state.report_error(e);
    }

    // Host: CLI override > config > local machine
    match cli.host.or(config.remote_host) {
        Some(host) => {
            // A rejected name is reported in the UI and the local logs are listed.
            if state.connect_remote(&host).is_err() {
                state.refresh_logs();
            }
        }
        None => state.refresh_logs(),
    }

    tracing::info!(logs = state.catalog.logs().len(), "Ready to launch GUI");

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(format!(
                "{} v{}",
                util::constants::APP_NAME,
                util::constants::APP_VERSION
            ))
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    let result = eframe::run_native(
        util::constants::APP_NAME,
        native_options,
        Box::new(move |cc| Ok(Box::new(gui::EventFiendApp::new(cc, state)))),
    );

    if let Err(e) = result {
        tracing::error!(error = %e, "Failed to launch GUI");
        eprintln!("Error: Failed to launch EventFiend GUI: {e}");
        std::process::exit(1);
    }
}
