// EventFiend - app/state.rs
//
// Application state management. Holds the host scope, the event catalog,
// filter and grouping state, and the derived view.
// Owned by the eframe::App implementation.
//
// Every mutation that can change the visible rows ends in recompute_view();
// the view is never patched incrementally.

use crate::core::catalog::EventCatalog;
use crate::core::export;
use crate::core::filter::FilterState;
use crate::core::model::{Entry, EventLevel, HostScope};
use crate::core::provider::EventLogProvider;
use crate::core::view::{apply_view, GroupMode, View};
use crate::util::constants::{DISPLAY_TIME_FORMAT, INPUT_DATE_FORMAT, MAX_HOST_NAME_LEN};
use crate::util::error::{EventFiendError, ExportError, InputError, ProviderError};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use std::path::{Path, PathBuf};

/// Export formats offered in the File menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

/// Top-level application state.
pub struct AppState {
    /// Machine whose logs are listed.
    pub scope: HostScope,

    /// Logs, source references and materialized entries.
    pub catalog: EventCatalog,

    /// Current filter configuration.
    pub filter: FilterState,

    /// Current grouping mode.
    pub group_mode: GroupMode,

    /// Rows matching the current filter, in display order.
    pub view: View,

    /// Display position of the selected row within `view.rows`.
    selected_row: Option<usize>,

    /// Owning log and record number of the selected entry. The row
    /// position is re-derived from this whenever the view is rebuilt.
    selected_key: Option<(String, u64)>,

    /// Exported log files opened this session.
    pub evtx_files: Vec<PathBuf>,

    /// Status message for the status bar.
    pub status_message: String,

    /// Error message awaiting acknowledgement. Blocks the UI while set.
    pub pending_error: Option<String>,

    /// Whether the "Connect to" dialog is open, and its text.
    pub show_connect_dialog: bool,
    pub connect_input: String,

    /// Time range inputs. A bound only counts while its box is ticked.
    pub time_from_enabled: bool,
    pub time_from_input: String,
    pub time_to_enabled: bool,
    pub time_to_input: String,

    /// Whether the About dialog is open.
    pub show_about: bool,

    /// Dark mode (true) or light mode (false).
    pub dark_mode: bool,

    /// Whether debug mode is enabled.
    pub debug_mode: bool,

    provider: Box<dyn EventLogProvider>,
}

impl AppState {
    /// Create initial state around a provider. Nothing is listed until
    /// `refresh_logs` is called.
    pub fn new(provider: Box<dyn EventLogProvider>, debug_mode: bool) -> Self {
        Self {
            scope: HostScope::Local,
            catalog: EventCatalog::new(),
            filter: FilterState::default(),
            group_mode: GroupMode::None,
            view: View::default(),
            selected_row: None,
            selected_key: None,
            evtx_files: Vec::new(),
            status_message: "Ready.".to_string(),
            pending_error: None,
            show_connect_dialog: false,
            connect_input: String::new(),
            time_from_enabled: false,
            time_from_input: String::new(),
            time_to_enabled: false,
            time_to_input: String::new(),
            show_about: false,
            dark_mode: true,
            debug_mode,
            provider,
        }
    }

    // -------------------------------------------------------------------------
    // Error reporting
    // -------------------------------------------------------------------------

    /// Queue an error for the blocking error dialog.
    pub fn report_error(&mut self, err: impl Into<EventFiendError>) {
        let err = err.into();
        tracing::warn!(error = %err, detail = ?err, "Reported to user");
        let message = err.to_string();
        self.status_message = message.clone();
        self.pending_error = Some(message);
    }

    /// Acknowledge the pending error dialog.
    pub fn dismiss_error(&mut self) {
        self.pending_error = None;
    }

    // -------------------------------------------------------------------------
    // Log Source Provider
    // -------------------------------------------------------------------------

    /// Clear all collections and re-enumerate the logs of the current scope.
    ///
    /// If a remote scope fails, the error is reported, the scope reverts to
    /// the local machine and the local logs are listed instead.
    pub fn refresh_logs(&mut self) {
        self.catalog.clear();
        self.select_row(None);

        let logs = match self.provider.list_logs(&self.scope) {
            Ok(logs) => logs,
            Err(e) => {
                self.report_error(e);
                if self.scope != HostScope::Local {
                    self.scope = HostScope::Local;
                    self.provider.list_logs(&self.scope).unwrap_or_else(|e| {
                        tracing::warn!(error = %e, "Local log enumeration failed after fallback");
                        Vec::new()
                    })
                } else {
                    Vec::new()
                }
            }
        };

        self.catalog.set_logs(logs);
        for path in &self.evtx_files {
            self.catalog.add_file_log(path.clone());
        }

        tracing::info!(
            host = %self.scope.display_name(),
            logs = self.catalog.logs().len(),
            "Event logs refreshed"
        );
        if self.pending_error.is_none() {
            self.status_message = format!(
                "{} event logs on {}.",
                self.catalog.logs().len(),
                self.scope.display_name()
            );
        }
        self.prune_sources();
        self.recompute_view();
    }

    /// Switch to a remote machine and list its logs.
    ///
    /// Blank input is rejected without touching any state.
    pub fn connect_remote(&mut self, host: &str) -> Result<(), InputError> {
        let host = host.trim();
        if host.is_empty() {
            self.report_error(InputError::EmptyHostName);
            return Err(InputError::EmptyHostName);
        }
        if host.len() > MAX_HOST_NAME_LEN {
            let err = InputError::HostNameTooLong {
                length: host.len(),
                max: MAX_HOST_NAME_LEN,
            };
            self.report_error(err.clone());
            return Err(err);
        }
        tracing::info!(host, "Connecting to remote event logs");
        self.scope = HostScope::Remote(host.to_string());
        self.refresh_logs();
        Ok(())
    }

    /// Return to the local machine's logs.
    pub fn connect_local(&mut self) {
        self.scope = HostScope::Local;
        self.refresh_logs();
    }

    /// Make an exported `.evtx` file available as a log.
    ///
    /// Paths are compared after canonicalization, so the same file reached
    /// through a different path is not listed twice.
    pub fn add_evtx_file(&mut self, path: PathBuf) {
        let path = std::fs::canonicalize(&path).unwrap_or(path);
        match self.catalog.add_file_log(path.clone()) {
            Some(name) => {
                tracing::info!(path = %path.display(), log = %name, "EVTX file added");
                self.evtx_files.push(path);
            }
            None => {
                self.status_message = format!("'{}' is already open.", path.display());
            }
        }
    }

    // -------------------------------------------------------------------------
    // Entry Materializer
    // -------------------------------------------------------------------------

    /// Load a log's entries and sources. Failures are reported and leave the
    /// catalog unchanged. Returns whether the log is loaded afterwards.
    pub fn select_log(&mut self, name: &str) -> bool {
        let Some(log) = self.catalog.find_log(name).cloned() else {
            self.report_error(ProviderError::UnknownLog {
                log: name.to_string(),
            });
            return false;
        };
        let loaded = match self.catalog.load(self.provider.as_ref(), &self.scope, &log) {
            Ok(summary) => {
                self.status_message = format!(
                    "Loaded {} entries from '{}'.",
                    summary.entries, log.name
                );
                true
            }
            Err(e) => {
                self.report_error(e);
                false
            }
        };
        self.recompute_view();
        loaded
    }

    /// Remove a log's entries and sources.
    pub fn deselect_log(&mut self, name: &str) {
        let removed = self.catalog.unload(name);
        self.status_message = format!("Removed {removed} entries from '{name}'.");
        self.prune_sources();
        self.recompute_view();
    }

    /// Checkbox handler for the log list.
    pub fn toggle_log(&mut self, name: &str, checked: bool) {
        if checked {
            self.select_log(name);
        } else {
            self.deselect_log(name);
        }
    }

    /// Forget selected sources that no loaded log provides any more.
    fn prune_sources(&mut self) {
        let filter = std::mem::take(&mut self.filter);
        self.filter = filter.retain_sources(self.catalog.source_names());
    }

    // -------------------------------------------------------------------------
    // Filter Predicate Set
    // -------------------------------------------------------------------------

    fn update_filter(&mut self, f: impl FnOnce(FilterState) -> FilterState) {
        let filter = std::mem::take(&mut self.filter);
        self.filter = f(filter);
        self.recompute_view();
    }

    pub fn toggle_source(&mut self, name: &str, checked: bool) {
        if checked {
            self.update_filter(|f| f.select_source(name));
        } else {
            self.update_filter(|f| f.deselect_source(name));
        }
    }

    pub fn toggle_level(&mut self, level: EventLevel, checked: bool) {
        if checked {
            self.update_filter(|f| f.select_level(level));
        } else {
            self.update_filter(|f| f.deselect_level(level));
        }
    }

    pub fn set_event_ids(&mut self, text: &str) {
        self.update_filter(|f| f.set_event_ids(text));
    }

    pub fn set_keywords(&mut self, text: &str) {
        self.update_filter(|f| f.set_keywords(text));
    }

    pub fn set_time_range(&mut self, from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) {
        self.update_filter(|f| f.set_time_range(from, to));
    }

    /// Parse the enabled time inputs into the filter. An unparseable bound
    /// is reported and leaves the filter unchanged.
    pub fn apply_time_inputs(&mut self) -> Result<(), InputError> {
        match self.parse_time_inputs() {
            Ok((from, to)) => {
                self.set_time_range(from, to);
                Ok(())
            }
            Err(e) => {
                self.report_error(e.clone());
                Err(e)
            }
        }
    }

    fn parse_time_inputs(
        &self,
    ) -> Result<(Option<DateTime<Utc>>, Option<DateTime<Utc>>), InputError> {
        let from = if self.time_from_enabled {
            Some(parse_time_bound(&self.time_from_input, false)?)
        } else {
            None
        };
        let to = if self.time_to_enabled {
            Some(parse_time_bound(&self.time_to_input, true)?)
        } else {
            None
        };
        Ok((from, to))
    }

    pub fn clear_filters(&mut self) {
        self.time_from_enabled = false;
        self.time_to_enabled = false;
        self.update_filter(FilterState::clear);
    }

    // -------------------------------------------------------------------------
    // View Composer
    // -------------------------------------------------------------------------

    pub fn set_group_mode(&mut self, mode: GroupMode) {
        if self.group_mode != mode {
            tracing::debug!(?mode, "Group mode changed");
            self.group_mode = mode;
            self.recompute_view();
        }
    }

    /// Rebuild the visible rows from the catalog, filter and group mode.
    pub fn recompute_view(&mut self) {
        self.view = apply_view(self.catalog.entries(), &self.filter, self.group_mode);

        // Follow the selected entry to its new position; drop it if hidden
        self.selected_row = self.selected_key.as_ref().and_then(|(log, number)| {
            self.view.rows.iter().position(|&idx| {
                self.catalog
                    .entries()
                    .get(idx)
                    .is_some_and(|e| e.log == *log && e.record.record_number == *number)
            })
        });
        if self.selected_row.is_none() {
            self.selected_key = None;
        }
    }

    /// The "Apply Filters" action.
    pub fn apply_filters(&mut self) {
        self.recompute_view();
        self.status_message = format!(
            "{} of {} entries match.",
            self.view.len(),
            self.catalog.entries().len()
        );
    }

    /// Visible entries in display order.
    pub fn visible_entries(&self) -> Vec<&Entry> {
        self.view.entries(self.catalog.entries()).collect()
    }

    /// The entry at display position `row`.
    pub fn entry_at(&self, row: usize) -> Option<&Entry> {
        self.view
            .rows
            .get(row)
            .and_then(|&idx| self.catalog.entries().get(idx))
    }

    /// Select the row at display position `row`, or clear the selection.
    /// A position past the end of the view clears it.
    pub fn select_row(&mut self, row: Option<usize>) {
        self.selected_key = row
            .and_then(|r| self.entry_at(r))
            .map(|e| (e.log.clone(), e.record.record_number));
        self.selected_row = row.filter(|_| self.selected_key.is_some());
    }

    /// Display position of the selected row.
    pub fn selected_row(&self) -> Option<usize> {
        self.selected_row
    }

    /// Get the currently selected entry, if any.
    pub fn selected_entry(&self) -> Option<&Entry> {
        self.selected_row.and_then(|row| self.entry_at(row))
    }

    // -------------------------------------------------------------------------
    // Export
    // -------------------------------------------------------------------------

    /// Write the visible rows to `dest` and report the outcome in the status bar.
    pub fn export_visible(&mut self, format: ExportFormat, dest: &Path) {
        match self.write_export(format, dest) {
            Ok(n) => {
                tracing::info!(path = %dest.display(), entries = n, "Export complete");
                self.status_message = format!("Exported {n} entries to '{}'.", dest.display());
            }
            Err(e) => self.report_error(e),
        }
    }

    fn write_export(&self, format: ExportFormat, dest: &Path) -> Result<usize, ExportError> {
        let file = std::fs::File::create(dest).map_err(|source| ExportError::Io {
            path: dest.to_path_buf(),
            source,
        })?;
        let writer = std::io::BufWriter::new(file);
        let entries = self.visible_entries();
        match format {
            ExportFormat::Csv => export::export_csv(&entries, writer, dest),
            ExportFormat::Json => export::export_json(&entries, writer, dest),
        }
    }
}

/// Parse a time range input in local time.
///
/// Accepts `YYYY-MM-DD HH:MM:SS` or `YYYY-MM-DD`. A bare date means the start
/// of the day, or its final instant when `end_of_day` is set.
pub fn parse_time_bound(text: &str, end_of_day: bool) -> Result<DateTime<Utc>, InputError> {
    let text = text.trim();
    let invalid = || InputError::InvalidTime {
        input: text.to_string(),
    };
    let naive = match NaiveDateTime::parse_from_str(text, DISPLAY_TIME_FORMAT) {
        Ok(dt) => dt,
        Err(_) => {
            let date = NaiveDate::parse_from_str(text, INPUT_DATE_FORMAT).map_err(|_| invalid())?;
            let time = if end_of_day {
                NaiveTime::from_hms_nano_opt(23, 59, 59, 999_999_999)
            } else {
                NaiveTime::from_hms_opt(0, 0, 0)
            }
            .ok_or_else(invalid)?;
            date.and_time(time)
        }
    };
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_only_bounds_cover_the_whole_day() {
        let from = parse_time_bound("2024-03-10", false).unwrap();
        let to = parse_time_bound("2024-03-10", true).unwrap();
        assert_eq!(from, parse_time_bound("2024-03-10 00:00:00", false).unwrap());
        assert!(to > parse_time_bound(" 2024-03-10 23:59:59 ", true).unwrap());
        assert!(to < parse_time_bound("2024-03-11", false).unwrap());
        assert!(from < to);
    }

    #[test]
    fn date_only_end_bound_includes_subsecond_last_second() {
        let last = parse_time_bound("2024-03-10 23:59:59", true).unwrap()
            + chrono::Duration::milliseconds(500);
        let to = parse_time_bound("2024-03-10", true).unwrap();
        assert!(last <= to);
    }

    #[test]
    fn unparseable_bound_is_rejected() {
        let err = parse_time_bound("yesterday", false).unwrap_err();
        assert_eq!(
            err,
            InputError::InvalidTime {
                input: "yesterday".to_string()
            }
        );
        assert!(parse_time_bound("2024-13-01", false).is_err());
    }
}
