// EventFiend - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.

// =============================================================================
// Application metadata
// =============================================================================

/// Application display name.
pub const APP_NAME: &str = "EventFiend";

/// Application identifier used for config/data directories.
pub const APP_ID: &str = "EventFiend";

/// Current application version (updated by release script).
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Host event log access
// =============================================================================

/// Registry key under HKEY_LOCAL_MACHINE whose subkeys name the classic
/// event logs available on a machine.
pub const EVENTLOG_REGISTRY_KEY: &str = r"SYSTEM\CurrentControlSet\Services\EventLog";

/// Default size of the buffer handed to `ReadEventLogW`.
/// The reader grows the buffer on demand when a single record is larger.
pub const DEFAULT_READ_BUFFER_BYTES: usize = 64 * 1024; // 64 KB

/// Minimum user-configurable read buffer size.
pub const MIN_READ_BUFFER_BYTES: usize = 4 * 1024;

/// Maximum user-configurable read buffer size.
pub const MAX_READ_BUFFER_BYTES: usize = 4 * 1024 * 1024; // 4 MB

/// Size of the fixed `EVENTLOGRECORD` header preceding the variable data.
pub const EVENTLOG_RECORD_HEADER_LEN: usize = 56;

/// Signature stored in the `Reserved` field of every `EVENTLOGRECORD` ("LfLe").
pub const EVENTLOG_RECORD_SIGNATURE: u32 = 0x654c_664c;

/// Mask applied to the instance id to obtain the displayed event id.
pub const EVENT_ID_MASK: u32 = 0x3fff_ffff;

/// Keyword bit set on security events that recorded a successful audit.
pub const KEYWORD_AUDIT_SUCCESS: u64 = 0x0020_0000_0000_0000;

/// Keyword bit set on security events that recorded a failed audit.
pub const KEYWORD_AUDIT_FAILURE: u64 = 0x0010_0000_0000_0000;

/// File extension recognised for exported event log files.
pub const EVTX_EXTENSION: &str = "evtx";

// =============================================================================
// Filtering
// =============================================================================

/// Separator that switches the event-id and keyword inputs from substring
/// matching to token-list matching.
pub const FILTER_TOKEN_SEPARATOR: char = ',';

/// Timestamp format shown in the entry table and detail pane.
pub const DISPLAY_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Date-only form accepted by the time range inputs.
pub const INPUT_DATE_FORMAT: &str = "%Y-%m-%d";

// =============================================================================
// Export
// =============================================================================

/// Maximum number of entries that can be exported in a single operation.
pub const MAX_EXPORT_ENTRIES: usize = 5_000_000;

// =============================================================================
// Logging
// =============================================================================

/// Default log level.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Log levels accepted in config.toml.
pub const VALID_LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

// =============================================================================
// Configuration
// =============================================================================

/// Configuration file name.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Maximum length of a remote host name accepted from config or the dialog.
/// Matches the DNS limit for a fully-qualified name.
pub const MAX_HOST_NAME_LEN: usize = 253;
