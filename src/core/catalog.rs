// EventFiend - core/catalog.rs
//
// Owned containers for the log list, the source references of loaded logs,
// and the materialized entries. Loading commits a log's entries all at once;
// unloading removes exactly what that log contributed.

use crate::core::model::{Entry, EventRecord, HostScope, LogOrigin, LogSource, SourceReference};
use crate::core::provider::EventLogProvider;
use crate::util::error::ProviderError;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Counts reported after a log has been committed to the catalog.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub entries: usize,
    pub sources: usize,
}

/// Pair each record with its owning log and collect the distinct source
/// names, in first-seen order.
pub fn materialize(log: &str, records: Vec<EventRecord>) -> (Vec<Entry>, Vec<SourceReference>) {
    let mut seen: HashSet<String> = HashSet::new();
    let mut sources = Vec::new();
    let mut entries = Vec::with_capacity(records.len());

    for record in records {
        if seen.insert(record.source.clone()) {
            sources.push(SourceReference {
                log: log.to_string(),
                name: record.source.clone(),
            });
        }
        entries.push(Entry::new(log, record));
    }

    (entries, sources)
}

/// Everything the entry view is derived from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventCatalog {
    logs: Vec<LogSource>,
    loaded: Vec<String>,
    sources: Vec<SourceReference>,
    entries: Vec<Entry>,
}

impl EventCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Logs available for selection.
    pub fn logs(&self) -> &[LogSource] {
        &self.logs
    }

    /// Source references of all loaded logs.
    pub fn sources(&self) -> &[SourceReference] {
        &self.sources
    }

    /// Materialized entries of all loaded logs, in load order.
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Names of loaded logs, in load order.
    pub fn loaded_logs(&self) -> &[String] {
        &self.loaded
    }

    pub fn find_log(&self, name: &str) -> Option<&LogSource> {
        self.logs.iter().find(|l| l.name == name)
    }

    pub fn is_loaded(&self, name: &str) -> bool {
        self.loaded.iter().any(|l| l == name)
    }

    /// Distinct source names across all loaded logs.
    pub fn source_names(&self) -> impl Iterator<Item = &str> {
        self.sources.iter().map(|s| s.name.as_str())
    }

    /// Drop everything: log list, source references and entries.
    pub fn clear(&mut self) {
        self.logs.clear();
        self.loaded.clear();
        self.sources.clear();
        self.entries.clear();
    }

    /// Replace the log list. Loaded state is not touched.
    pub fn set_logs(&mut self, logs: Vec<LogSource>) {
        self.logs = logs;
    }

    /// Whether a log backed by the file at `path` is listed.
    pub fn has_file(&self, path: &Path) -> bool {
        self.logs
            .iter()
            .any(|l| matches!(&l.origin, LogOrigin::File(p) if p == path))
    }

    /// List the `.evtx` file at `path` unless it is already listed.
    ///
    /// The log is named after the file. When another log already has that
    /// name, a counter is appended (`System.evtx (2)`). Returns the name
    /// the file was listed under.
    pub fn add_file_log(&mut self, path: PathBuf) -> Option<String> {
        if self.has_file(&path) {
            return None;
        }
        let mut log = LogSource::file(path);
        let base = log.name.clone();
        let mut n = 2;
        while self.find_log(&log.name).is_some() {
            log.name = format!("{base} ({n})");
            n += 1;
        }
        let name = log.name.clone();
        self.logs.push(log);
        Some(name)
    }

    /// Read `log` through `provider` and commit its entries.
    ///
    /// Nothing is committed unless the whole read succeeds. Loading a log
    /// that is already loaded is a no-op.
    pub fn load(
        &mut self,
        provider: &dyn EventLogProvider,
        scope: &HostScope,
        log: &LogSource,
    ) -> Result<LoadSummary, ProviderError> {
        if self.is_loaded(&log.name) {
            tracing::debug!(log = %log.name, "Log already loaded");
            return Ok(LoadSummary::default());
        }
        let records = provider.read_log(scope, log)?;
        Ok(self.commit(&log.name, records))
    }

    /// Append already-read records for `log`.
    pub fn commit(&mut self, log: &str, records: Vec<EventRecord>) -> LoadSummary {
        if self.is_loaded(log) {
            return LoadSummary::default();
        }
        let (entries, sources) = materialize(log, records);
        let summary = LoadSummary {
            entries: entries.len(),
            sources: sources.len(),
        };
        self.entries.extend(entries);
        self.sources.extend(sources);
        self.loaded.push(log.to_string());

        tracing::info!(
            log,
            entries = summary.entries,
            sources = summary.sources,
            "Log loaded"
        );
        summary
    }

    /// Remove the entries and source references owned by `log`.
    /// Returns the number of entries removed.
    pub fn unload(&mut self, log: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.log != log);
        self.sources.retain(|s| s.log != log);
        self.loaded.retain(|l| l != log);
        let removed = before - self.entries.len();
        tracing::info!(log, removed, "Log unloaded");
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::EventLevel;
    use chrono::{TimeZone, Utc};

    fn record(event_id: u32, source: &str) -> EventRecord {
        EventRecord {
            record_number: u64::from(event_id),
            event_id,
            level: EventLevel::Information,
            source: source.to_string(),
            category: 0,
            machine: "WS01".to_string(),
            message: format!("event {event_id}"),
            timestamp: Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_materialize_dedups_sources_in_first_seen_order() {
        let (entries, sources) = materialize(
            "System",
            vec![record(1, "Disk"), record(2, "Tcpip"), record(3, "Disk")],
        );
        assert_eq!(entries.len(), 3);
        assert!(entries.iter().all(|e| e.log == "System"));
        let names: Vec<_> = sources.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Disk", "Tcpip"]);
        assert!(sources.iter().all(|s| s.log == "System"));
    }

    #[test]
    fn test_commit_appends_without_touching_other_logs() {
        let mut catalog = EventCatalog::new();
        catalog.commit("System", vec![record(1, "Disk")]);
        catalog.commit("Application", vec![record(2, "MsiInstaller"), record(3, "Disk")]);
        assert_eq!(catalog.entries().len(), 3);
        assert_eq!(catalog.sources().len(), 3);
        assert_eq!(catalog.entries()[0].log, "System");
    }

    #[test]
    fn test_unload_restores_previous_state() {
        let mut catalog = EventCatalog::new();
        catalog.set_logs(vec![LogSource::host("System"), LogSource::host("Application")]);
        catalog.commit("System", vec![record(1, "Disk"), record(2, "Tcpip")]);
        let before = catalog.clone();

        catalog.commit("Application", vec![record(3, "Disk")]);
        assert_eq!(catalog.unload("Application"), 1);
        assert_eq!(catalog, before);
    }

    #[test]
    fn test_commit_twice_is_noop() {
        let mut catalog = EventCatalog::new();
        catalog.commit("System", vec![record(1, "Disk")]);
        let summary = catalog.commit("System", vec![record(1, "Disk")]);
        assert_eq!(summary, LoadSummary::default());
        assert_eq!(catalog.entries().len(), 1);
    }

    #[test]
    fn test_add_file_log_ignores_same_path() {
        let mut catalog = EventCatalog::new();
        let path = PathBuf::from("exports").join("Setup.evtx");
        assert_eq!(catalog.add_file_log(path.clone()).as_deref(), Some("Setup.evtx"));
        assert_eq!(catalog.add_file_log(path.clone()), None);
        assert!(catalog.has_file(&path));
        assert_eq!(catalog.logs().len(), 1);
    }

    #[test]
    fn test_add_file_log_numbers_repeated_file_names() {
        let mut catalog = EventCatalog::new();
        catalog.set_logs(vec![LogSource::host("System")]);
        let dc01 = PathBuf::from("dc01").join("System.evtx");
        let dc02 = PathBuf::from("dc02").join("System.evtx");
        let dc03 = PathBuf::from("dc03").join("System.evtx");

        assert_eq!(catalog.add_file_log(dc01).as_deref(), Some("System.evtx"));
        assert_eq!(catalog.add_file_log(dc02.clone()).as_deref(), Some("System.evtx (2)"));
        assert_eq!(catalog.add_file_log(dc03).as_deref(), Some("System.evtx (3)"));

        let log = catalog.find_log("System.evtx (2)").unwrap();
        assert_eq!(log.origin, LogOrigin::File(dc02));
        assert_eq!(catalog.logs().len(), 4);
    }

    #[test]
    fn test_loaded_logs_track_load_order() {
        let mut catalog = EventCatalog::new();
        catalog.commit("System", vec![record(1, "Disk")]);
        catalog.commit("Application", vec![record(2, "MsiInstaller")]);
        assert_eq!(catalog.loaded_logs(), ["System", "Application"]);

        catalog.unload("System");
        assert_eq!(catalog.loaded_logs(), ["Application"]);
    }
}
