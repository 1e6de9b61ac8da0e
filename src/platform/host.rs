// EventFiend - platform/host.rs
//
// The production EventLogProvider: host logs through the Windows API,
// exported logs through the .evtx reader.

use crate::core::model::{EventRecord, HostScope, LogOrigin, LogSource};
use crate::core::provider::EventLogProvider;
use crate::platform::evtx_file;
use crate::util::constants::DEFAULT_READ_BUFFER_BYTES;
use crate::util::error::ProviderError;

/// Provider backed by the operating system and the filesystem.
#[derive(Debug, Clone)]
pub struct SystemProvider {
    read_buffer_bytes: usize,
}

impl Default for SystemProvider {
    fn default() -> Self {
        Self::new(DEFAULT_READ_BUFFER_BYTES)
    }
}

impl SystemProvider {
    pub fn new(read_buffer_bytes: usize) -> Self {
        Self { read_buffer_bytes }
    }
}

impl EventLogProvider for SystemProvider {
    fn list_logs(&self, scope: &HostScope) -> Result<Vec<LogSource>, ProviderError> {
        let names = list_host_logs(scope)?;
        Ok(names.into_iter().map(LogSource::host).collect())
    }

    fn read_log(
        &self,
        scope: &HostScope,
        log: &LogSource,
    ) -> Result<Vec<EventRecord>, ProviderError> {
        match &log.origin {
            LogOrigin::File(path) => evtx_file::read_file(path),
            LogOrigin::Host => read_host_log(scope, &log.name, self.read_buffer_bytes),
        }
    }
}

#[cfg(windows)]
fn list_host_logs(scope: &HostScope) -> Result<Vec<String>, ProviderError> {
    crate::platform::windows::list_log_names(scope.host_name()).map_err(|source| match scope {
        HostScope::Local => ProviderError::LocalEnumeration { source },
        HostScope::Remote(host) => ProviderError::Connection {
            host: host.clone(),
            source,
        },
    })
}

#[cfg(not(windows))]
fn list_host_logs(scope: &HostScope) -> Result<Vec<String>, ProviderError> {
    match scope {
        HostScope::Local => {
            tracing::warn!("Host event logs are only available on Windows; open .evtx files instead");
            Ok(Vec::new())
        }
        HostScope::Remote(_) => Err(ProviderError::Unsupported {
            operation: "connect to a remote event log",
        }),
    }
}

#[cfg(windows)]
fn read_host_log(
    scope: &HostScope,
    log: &str,
    buffer_bytes: usize,
) -> Result<Vec<EventRecord>, ProviderError> {
    crate::platform::windows::read_log(scope.host_name(), log, buffer_bytes)
}

#[cfg(not(windows))]
fn read_host_log(
    _scope: &HostScope,
    _log: &str,
    _buffer_bytes: usize,
) -> Result<Vec<EventRecord>, ProviderError> {
    Err(ProviderError::Unsupported {
        operation: "read a host event log",
    })
}

#[cfg(all(test, not(windows)))]
mod tests {
    use super::*;

    #[test]
    fn local_listing_is_empty_off_windows() {
        let logs = SystemProvider::default().list_logs(&HostScope::Local).unwrap();
        assert!(logs.is_empty());
    }

    #[test]
    fn remote_listing_is_unsupported_off_windows() {
        let err = SystemProvider::default()
            .list_logs(&HostScope::Remote("DC01".to_string()))
            .unwrap_err();
        assert!(matches!(err, ProviderError::Unsupported { .. }));
    }

    #[test]
    fn host_read_is_unsupported_off_windows() {
        let err = SystemProvider::default()
            .read_log(&HostScope::Local, &LogSource::host("System"))
            .unwrap_err();
        assert!(matches!(err, ProviderError::Unsupported { .. }));
    }
}
