// EventFiend - core/provider.rs
//
// The seam between the application and whatever supplies event logs.
// Implemented by the platform layer (Windows host API, .evtx files) and by
// test doubles.

use crate::core::model::{EventRecord, HostScope, LogSource};
use crate::util::error::ProviderError;

/// Supplies log lists and log contents for a host.
pub trait EventLogProvider {
    /// Enumerate the logs registered on `scope`.
    fn list_logs(&self, scope: &HostScope) -> Result<Vec<LogSource>, ProviderError>;

    /// Read every record of `log`, in the log's native order.
    ///
    /// Either returns the complete record list or an error; callers rely on
    /// a failed read having produced nothing.
    fn read_log(&self, scope: &HostScope, log: &LogSource)
        -> Result<Vec<EventRecord>, ProviderError>;
}
