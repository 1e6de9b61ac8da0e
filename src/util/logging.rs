// EventFiend - util/logging.rs
//
// Structured logging with runtime-selectable debug mode.
//
// Activation:
//   - Environment variable: RUST_LOG (used verbatim)
//   - CLI flag: --debug
//   - Config file: [logging] level = "debug"
//
// The flag and config levels apply to EventFiend's own targets only; the GUI
// stack and the evtx parser stay at warn. Output goes to stderr. Event
// message bodies are never logged above trace level.

use super::constants::{APP_NAME, APP_VERSION, DEFAULT_LOG_LEVEL};
use tracing_subscriber::EnvFilter;

/// Crate target name used in filter directives.
const CRATE_TARGET: &str = env!("CARGO_CRATE_NAME");

/// Filter directive that applies `level` to this crate and `warn` elsewhere.
fn directive(level: &str) -> String {
    format!("warn,{CRATE_TARGET}={}", level.to_lowercase())
}

/// Initialise the logging subsystem.
///
/// Priority: RUST_LOG env var > CLI --debug flag > config level > default "info".
pub fn init(debug_flag: bool, config_level: Option<&str>) {
    let (filter, origin) = match std::env::var("RUST_LOG") {
        Ok(_) => (EnvFilter::from_default_env(), "RUST_LOG"),
        Err(_) if debug_flag => (EnvFilter::new(directive("debug")), "--debug"),
        Err(_) => match config_level {
            Some(level) => (EnvFilter::new(directive(level)), "config"),
            None => (EnvFilter::new(directive(DEFAULT_LOG_LEVEL)), "default"),
        },
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .compact()
        .init();

    tracing::debug!(app = APP_NAME, version = APP_VERSION, origin, "Logging initialised");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directive_scopes_level_to_this_crate() {
        assert_eq!(directive("DEBUG"), "warn,eventfiend=debug");
        assert!(EnvFilter::try_new(directive(DEFAULT_LOG_LEVEL)).is_ok());
    }
}
