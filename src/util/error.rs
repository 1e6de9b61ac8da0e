// EventFiend - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// Every error that reaches the user is rendered through Display; the
// causal chain is kept for diagnostic logging.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Top-level error type for all EventFiend operations.
#[derive(Debug)]
pub enum EventFiendError {
    /// Enumerating or reading event logs failed.
    Provider(ProviderError),

    /// User input was rejected.
    Input(InputError),

    /// Export operation failed.
    Export(ExportError),

    /// Configuration loading or validation failed.
    Config(ConfigError),
}

impl fmt::Display for EventFiendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Provider(e) => write!(f, "{e}"),
            Self::Input(e) => write!(f, "{e}"),
            Self::Export(e) => write!(f, "Export error: {e}"),
            Self::Config(e) => write!(f, "Configuration error: {e}"),
        }
    }
}

impl std::error::Error for EventFiendError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Provider(e) => Some(e),
            Self::Input(e) => Some(e),
            Self::Export(e) => Some(e),
            Self::Config(e) => Some(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Provider errors
// ---------------------------------------------------------------------------

/// Errors raised while enumerating logs or reading their entries.
#[derive(Debug)]
pub enum ProviderError {
    /// The log list of a remote machine could not be retrieved.
    Connection { host: String, source: io::Error },

    /// The log list of the local machine could not be retrieved.
    LocalEnumeration { source: io::Error },

    /// A log could not be opened or read (typically access denied).
    Access { log: String, source: io::Error },

    /// A record returned by the event log API could not be decoded.
    Decode { log: String, source: DecodeError },

    /// An exported `.evtx` file could not be opened or parsed.
    Evtx { path: PathBuf, reason: String },

    /// The host event log API is not available on this platform.
    Unsupported { operation: &'static str },

    /// The requested log is not known to the provider.
    UnknownLog { log: String },
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connection { host, source } => {
                write!(f, "Could not retrieve event logs from '{host}': {source}")
            }
            Self::LocalEnumeration { source } => {
                write!(f, "Could not retrieve event logs from the local machine: {source}")
            }
            Self::Access { log, source } => {
                write!(f, "Could not read the '{log}' log: {source}")
            }
            Self::Decode { log, source } => {
                write!(f, "Malformed record in the '{log}' log: {source}")
            }
            Self::Evtx { path, reason } => {
                write!(f, "Could not read event log file '{}': {reason}", path.display())
            }
            Self::Unsupported { operation } => write!(
                f,
                "Cannot {operation}: the Windows event log API is not available on this platform"
            ),
            Self::UnknownLog { log } => write!(f, "Unknown event log '{log}'"),
        }
    }
}

impl std::error::Error for ProviderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Connection { source, .. } => Some(source),
            Self::LocalEnumeration { source } => Some(source),
            Self::Access { source, .. } => Some(source),
            Self::Decode { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ProviderError> for EventFiendError {
    fn from(e: ProviderError) -> Self {
        Self::Provider(e)
    }
}

/// A binary event log record that does not match the documented layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeError {
    /// Byte offset of the offending record within the read buffer.
    pub offset: usize,

    /// What was wrong with the record.
    pub reason: &'static str,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (at byte offset {})", self.reason, self.offset)
    }
}

impl std::error::Error for DecodeError {}

// ---------------------------------------------------------------------------
// Input errors
// ---------------------------------------------------------------------------

/// Errors for user-entered values that are rejected before any work happens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    /// The remote system name was empty or whitespace.
    EmptyHostName,

    /// The remote system name exceeds the maximum host name length.
    HostNameTooLong { length: usize, max: usize },

    /// A time bound could not be parsed as a date or date-time.
    InvalidTime { input: String },
}

impl fmt::Display for InputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyHostName => f.write_str("No valid remote system name entered."),
            Self::HostNameTooLong { length, max } => write!(
                f,
                "Remote system name is {length} characters long, maximum is {max}."
            ),
            Self::InvalidTime { input } => write!(
                f,
                "'{input}' is not a valid time. Use YYYY-MM-DD or YYYY-MM-DD HH:MM:SS."
            ),
        }
    }
}

impl std::error::Error for InputError {}

impl From<InputError> for EventFiendError {
    fn from(e: InputError) -> Self {
        Self::Input(e)
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to export operations.
#[derive(Debug)]
pub enum ExportError {
    /// I/O error writing the export file.
    Io { path: PathBuf, source: io::Error },

    /// CSV serialisation error.
    Csv { path: PathBuf, source: csv::Error },

    /// JSON serialisation error.
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Export would exceed maximum entry count.
    TooManyEntries { count: usize, max: usize },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "Export I/O error '{}': {source}", path.display())
            }
            Self::Csv { path, source } => {
                write!(f, "CSV export error '{}': {source}", path.display())
            }
            Self::Json { path, source } => {
                write!(f, "JSON export error '{}': {source}", path.display())
            }
            Self::TooManyEntries { count, max } => write!(
                f,
                "Export of {count} entries exceeds maximum of {max}. \
                 Apply filters to reduce the result set."
            ),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Csv { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<ExportError> for EventFiendError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

// ---------------------------------------------------------------------------
// Config errors
// ---------------------------------------------------------------------------

/// Errors related to configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// TOML parsing failed.
    TomlParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// I/O error reading config file.
    Io { path: PathBuf, source: io::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TomlParse { path, source } => {
                write!(f, "Config parse error '{}': {source}", path.display())
            }
            Self::Io { path, source } => {
                write!(f, "Config I/O error '{}': {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::TomlParse { source, .. } => Some(source),
            Self::Io { source, .. } => Some(source),
        }
    }
}

impl From<ConfigError> for EventFiendError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn connection_error_names_host_and_keeps_source() {
        let err = ProviderError::Connection {
            host: "FILESRV01".to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "The network path was not found."),
        };
        let msg = err.to_string();
        assert!(msg.contains("FILESRV01"), "{msg}");
        assert!(msg.contains("network path"), "{msg}");
        assert!(err.source().is_some());
    }

    #[test]
    fn empty_host_message_matches_dialog_text() {
        assert_eq!(
            InputError::EmptyHostName.to_string(),
            "No valid remote system name entered."
        );
    }

    #[test]
    fn top_level_error_wraps_provider_error() {
        let err: EventFiendError = ProviderError::UnknownLog {
            log: "Setup".to_string(),
        }
        .into();
        assert!(matches!(err, EventFiendError::Provider(_)));
        assert_eq!(err.to_string(), "Unknown event log 'Setup'");
    }

    #[test]
    fn config_error_is_reported_with_file_and_cause() {
        let source = toml::from_str::<toml::Value>("[view").unwrap_err();
        let err: EventFiendError = ConfigError::TomlParse {
            path: PathBuf::from("config.toml"),
            source,
        }
        .into();
        assert!(matches!(err, EventFiendError::Config(_)));
        let msg = err.to_string();
        assert!(msg.starts_with("Configuration error: Config parse error 'config.toml'"), "{msg}");
        assert!(err.source().is_some());
    }
}
