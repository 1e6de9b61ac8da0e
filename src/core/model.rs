// EventFiend - core/model.rs
//
// Core data model types. Pure data definitions with no I/O, no UI,
// no platform dependencies.
//
// These types are the shared vocabulary across all layers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

// =============================================================================
// Event level
// =============================================================================

/// Classification of an event log entry.
///
/// Mirrors the classic event log entry types. The declaration order is the
/// order the level checkboxes are listed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventLevel {
    Error,
    Warning,
    Information,
    SuccessAudit,
    FailureAudit,
}

impl EventLevel {
    /// Returns all variants in display order.
    pub fn all() -> &'static [EventLevel] {
        &[
            EventLevel::Error,
            EventLevel::Warning,
            EventLevel::Information,
            EventLevel::SuccessAudit,
            EventLevel::FailureAudit,
        ]
    }

    /// Human-readable label for display.
    pub fn label(&self) -> &'static str {
        match self {
            EventLevel::Error => "Error",
            EventLevel::Warning => "Warning",
            EventLevel::Information => "Information",
            EventLevel::SuccessAudit => "SuccessAudit",
            EventLevel::FailureAudit => "FailureAudit",
        }
    }

    /// Maps the `EventType` field of a classic event log record.
    ///
    /// Type 0 (`EVENTLOG_SUCCESS`) is reported as Information, the same way
    /// Event Viewer shows it. Unknown values yield `None`.
    pub fn from_event_type(event_type: u16) -> Option<EventLevel> {
        match event_type {
            0x0000 | 0x0004 => Some(EventLevel::Information),
            0x0001 => Some(EventLevel::Error),
            0x0002 => Some(EventLevel::Warning),
            0x0008 => Some(EventLevel::SuccessAudit),
            0x0010 => Some(EventLevel::FailureAudit),
            _ => None,
        }
    }
}

impl fmt::Display for EventLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Logs and sources
// =============================================================================

/// Where the entries of a log come from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LogOrigin {
    /// A log registered on the current host (local or remote).
    Host,

    /// An exported `.evtx` file opened from disk.
    File(PathBuf),
}

/// An enumerable event log.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LogSource {
    /// Log name (e.g. "Application"). Unique within one log list.
    pub name: String,

    /// Where the log's entries are read from.
    pub origin: LogOrigin,
}

impl LogSource {
    /// A log registered on the queried host.
    pub fn host(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            origin: LogOrigin::Host,
        }
    }

    /// A log backed by an exported `.evtx` file, named after the file.
    pub fn file(path: PathBuf) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        Self {
            name,
            origin: LogOrigin::File(path),
        }
    }
}

/// A source name seen in a loaded log, tied to the log that owns it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceReference {
    /// Name of the owning log.
    pub log: String,

    /// Name of the component that wrote the entries.
    pub name: String,
}

// =============================================================================
// Entries
// =============================================================================

/// A single event log record as returned by a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventRecord {
    /// Position of the record within its log.
    pub record_number: u64,

    /// Event identifier.
    pub event_id: u32,

    /// Entry classification.
    pub level: EventLevel,

    /// Name of the component that wrote the entry.
    pub source: String,

    /// Source-specific category number (0 = none).
    pub category: u16,

    /// Computer that generated the entry.
    pub machine: String,

    /// Message text.
    pub message: String,

    /// Time the entry was written to the log.
    pub timestamp: DateTime<Utc>,
}

/// A record paired with the name of the log it was loaded from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    /// Name of the owning log.
    pub log: String,

    /// The record itself.
    #[serde(flatten)]
    pub record: EventRecord,
}

impl Entry {
    pub fn new(log: impl Into<String>, record: EventRecord) -> Self {
        Self {
            log: log.into(),
            record,
        }
    }
}

// =============================================================================
// Host scope
// =============================================================================

/// The machine whose event logs are being browsed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum HostScope {
    /// The machine EventFiend runs on.
    #[default]
    Local,

    /// A remote machine, by host name.
    Remote(String),
}

impl HostScope {
    /// Remote host name, or `None` for the local machine.
    pub fn host_name(&self) -> Option<&str> {
        match self {
            HostScope::Local => None,
            HostScope::Remote(name) => Some(name),
        }
    }

    /// Name shown in the status bar.
    pub fn display_name(&self) -> String {
        match self {
            HostScope::Local => local_machine_name(),
            HostScope::Remote(name) => name.clone(),
        }
    }
}

/// Best-effort name of the local machine.
fn local_machine_name() -> String {
    std::env::var("COMPUTERNAME")
        .or_else(|_| std::env::var("HOSTNAME"))
        .unwrap_or_else(|_| "localhost".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn event_type_mapping_covers_classic_types() {
        assert_eq!(EventLevel::from_event_type(1), Some(EventLevel::Error));
        assert_eq!(EventLevel::from_event_type(2), Some(EventLevel::Warning));
        assert_eq!(EventLevel::from_event_type(4), Some(EventLevel::Information));
        assert_eq!(EventLevel::from_event_type(0), Some(EventLevel::Information));
        assert_eq!(EventLevel::from_event_type(8), Some(EventLevel::SuccessAudit));
        assert_eq!(EventLevel::from_event_type(16), Some(EventLevel::FailureAudit));
        assert_eq!(EventLevel::from_event_type(3), None);
    }

    #[test]
    fn file_log_is_named_after_file() {
        let log = LogSource::file(PathBuf::from("exports").join("System.evtx"));
        assert_eq!(log.name, "System.evtx");
        assert!(matches!(log.origin, LogOrigin::File(_)));
    }

    #[test]
    fn remote_scope_displays_host_name() {
        let scope = HostScope::Remote("DC01".to_string());
        assert_eq!(scope.host_name(), Some("DC01"));
        assert_eq!(scope.display_name(), "DC01");
        assert_eq!(HostScope::Local.host_name(), None);
    }
}
