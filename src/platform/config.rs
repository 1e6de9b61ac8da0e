// EventFiend - platform/config.rs
//
// Platform-specific configuration directory resolution and config.toml
// loading with startup validation.
//
// Uses the `directories` crate for XDG (Linux), AppData (Windows),
// Library (macOS) compliance.

use crate::core::view::GroupMode;
use crate::util::constants;
use crate::util::error::ConfigError;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Resolved platform paths for EventFiend configuration.
#[derive(Debug, Clone)]
pub struct PlatformPaths {
    /// Configuration directory (e.g. ~/.config/eventfiend/ or %APPDATA%\EventFiend\config\)
    pub config_dir: PathBuf,
}

impl PlatformPaths {
    /// Resolve platform-appropriate paths.
    ///
    /// Falls back to current directory if platform dirs cannot be determined.
    pub fn resolve() -> Self {
        if let Some(proj_dirs) = ProjectDirs::from("", "", constants::APP_ID) {
            let config_dir = proj_dirs.config_dir().to_path_buf();
            tracing::debug!(config = %config_dir.display(), "Platform paths resolved");
            Self { config_dir }
        } else {
            tracing::warn!("Could not determine platform directories, using current directory");
            Self {
                config_dir: PathBuf::from("."),
            }
        }
    }
}

// =============================================================================
// config.toml loading and validation
// =============================================================================

/// Raw deserialisable shape of config.toml.
///
/// Unknown keys are silently ignored for forward compatibility.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// `[host]` section.
    pub host: HostSection,
    /// `[view]` section.
    pub view: ViewSection,
    /// `[reader]` section.
    pub reader: ReaderSection,
    /// `[logging]` section.
    pub logging: LoggingSection,
}

/// `[host]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct HostSection {
    /// Remote machine to connect to at startup (empty = local).
    pub remote: Option<String>,
}

/// `[view]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ViewSection {
    /// Initial grouping: "none", "source" or "event-id".
    pub group_by: Option<String>,
    /// Theme: "dark" or "light".
    pub theme: Option<String>,
}

/// `[reader]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct ReaderSection {
    /// Event log read buffer size in bytes.
    pub buffer_bytes: Option<usize>,
}

/// `[logging]` config section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
pub struct LoggingSection {
    /// Log level: "error", "warn", "info", "debug", "trace".
    pub level: Option<String>,
}

/// Validated application configuration derived from `config.toml`.
///
/// Invalid values produce actionable warnings and fall back to defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    /// Remote host to browse at startup (`None` = local machine).
    pub remote_host: Option<String>,
    /// Initial grouping mode.
    pub group_mode: GroupMode,
    /// Dark mode (true) or light mode (false).
    pub dark_mode: bool,
    /// Event log read buffer size in bytes.
    pub read_buffer_bytes: usize,
    /// Logging level string (for init before tracing is available).
    pub log_level: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            remote_host: None,
            group_mode: GroupMode::None,
            dark_mode: true,
            read_buffer_bytes: constants::DEFAULT_READ_BUFFER_BYTES,
            log_level: None,
        }
    }
}

/// Load and validate `config.toml` from the given config directory.
///
/// Returns `AppConfig` with validated values and a list of non-fatal warnings.
/// If the file does not exist, returns defaults with no warnings (first run).
/// A file that cannot be read or parsed is an error; the caller falls back
/// to defaults and reports it.
///
/// Called before logging is initialised (the config may set the level), so
/// problems are only returned, never logged here.
pub fn load_config(config_dir: &Path) -> Result<(AppConfig, Vec<String>), ConfigError> {
    let config_path = config_dir.join(constants::CONFIG_FILE_NAME);
    let mut warnings: Vec<String> = Vec::new();

    if !config_path.exists() {
        return Ok((AppConfig::default(), warnings));
    }

    let raw = read_raw(&config_path)?;
    let config = validate(raw, &mut warnings);
    Ok((config, warnings))
}

fn read_raw(path: &Path) -> Result<RawConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::TomlParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Validate each field against named constants, accumulating all problems.
fn validate(raw: RawConfig, warnings: &mut Vec<String>) -> AppConfig {
    let mut config = AppConfig::default();

    // -- Host: remote --
    if let Some(remote) = raw.host.remote {
        let remote = remote.trim();
        if remote.len() > constants::MAX_HOST_NAME_LEN {
            warnings.push(format!(
                "[host] remote is {} characters long, maximum is {}. Using the local machine.",
                remote.len(),
                constants::MAX_HOST_NAME_LEN,
            ));
        } else if !remote.is_empty() {
            config.remote_host = Some(remote.to_string());
        }
    }

    // -- View: group_by --
    if let Some(ref group_by) = raw.view.group_by {
        match GroupMode::from_config(group_by) {
            Some(mode) => config.group_mode = mode,
            None => warnings.push(format!(
                "[view] group_by = \"{group_by}\" is not recognised. \
                 Expected \"none\", \"source\" or \"event-id\". Using default (none).",
            )),
        }
    }

    // -- View: theme --
    if let Some(ref theme) = raw.view.theme {
        match theme.to_lowercase().as_str() {
            "dark" => config.dark_mode = true,
            "light" => config.dark_mode = false,
            other => warnings.push(format!(
                "[view] theme = \"{other}\" is not recognised. Expected \"dark\" or \"light\". Using default (dark).",
            )),
        }
    }

    // -- Reader: buffer_bytes --
    if let Some(bytes) = raw.reader.buffer_bytes {
        if (constants::MIN_READ_BUFFER_BYTES..=constants::MAX_READ_BUFFER_BYTES).contains(&bytes) {
            config.read_buffer_bytes = bytes;
        } else {
            warnings.push(format!(
                "[reader] buffer_bytes = {bytes} is out of range ({}-{}). Using default ({}).",
                constants::MIN_READ_BUFFER_BYTES,
                constants::MAX_READ_BUFFER_BYTES,
                constants::DEFAULT_READ_BUFFER_BYTES,
            ));
        }
    }

    // -- Logging: level --
    if let Some(ref level) = raw.logging.level {
        if constants::VALID_LOG_LEVELS.contains(&level.to_lowercase().as_str()) {
            config.log_level = Some(level.clone());
        } else {
            warnings.push(format!(
                "[logging] level = \"{level}\" is not recognised. \
                 Valid values: error, warn, info, debug, trace. Using default (info).",
            ));
        }
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_config(dir: &Path, content: &str) {
        fs::write(dir.join(constants::CONFIG_FILE_NAME), content).unwrap();
    }

    #[test]
    fn missing_file_gives_defaults_without_warnings() {
        let dir = tempfile::tempdir().unwrap();
        let (config, warnings) = load_config(dir.path()).unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(warnings.is_empty());
    }

    #[test]
    fn valid_values_are_applied() {
        let dir = tempfile::tempdir().unwrap();
        write_config(
            dir.path(),
            r#"
[host]
remote = " FILESRV01 "

[view]
group_by = "event-id"
theme = "light"

[reader]
buffer_bytes = 131072

[logging]
level = "debug"
"#,
        );
        let (config, warnings) = load_config(dir.path()).unwrap();
        assert!(warnings.is_empty(), "{warnings:?}");
        assert_eq!(config.remote_host.as_deref(), Some("FILESRV01"));
        assert_eq!(config.group_mode, GroupMode::ByEventId);
        assert!(!config.dark_mode);
        assert_eq!(config.read_buffer_bytes, 131_072);
        assert_eq!(config.log_level.as_deref(), Some("debug"));
    }

    #[test]
    fn invalid_values_fall_back_with_warnings() {
        let dir = tempfile::tempdir().unwrap();
        write_config(
            dir.path(),
            r#"
[view]
group_by = "level"
theme = "sepia"

[reader]
buffer_bytes = 12

[logging]
level = "loud"
"#,
        );
        let (config, warnings) = load_config(dir.path()).unwrap();
        assert_eq!(warnings.len(), 4, "{warnings:?}");
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn blank_remote_means_local() {
        let dir = tempfile::tempdir().unwrap();
        write_config(dir.path(), "[host]\nremote = \"   \"\n");
        let (config, warnings) = load_config(dir.path()).unwrap();
        assert!(warnings.is_empty());
        assert_eq!(config.remote_host, None);
    }

    #[test]
    fn unparseable_file_is_an_error_naming_the_file() {
        let dir = tempfile::tempdir().unwrap();
        write_config(dir.path(), "[view\ngroup_by = ");
        let err = load_config(dir.path()).unwrap_err();
        assert!(matches!(err, ConfigError::TomlParse { .. }));
        assert!(err.to_string().contains(constants::CONFIG_FILE_NAME), "{err}");
    }
}
