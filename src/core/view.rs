// EventFiend - core/view.rs
//
// View composition: filter the materialized entries, then order and group
// them for display. The view is always rebuilt from scratch.

use crate::core::filter::{apply_filters, FilterState};
use crate::core::model::Entry;
use std::cmp::Ordering;

/// Primary grouping key for the entry table. Exactly one mode is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GroupMode {
    /// Catalog order, no group headers.
    #[default]
    None,

    /// Group by source name, oldest entry first within a group.
    BySource,

    /// Group by event id, oldest entry first within a group.
    ByEventId,
}

impl GroupMode {
    /// Returns all variants in selector order.
    pub fn all() -> &'static [GroupMode] {
        &[GroupMode::None, GroupMode::BySource, GroupMode::ByEventId]
    }

    pub fn label(&self) -> &'static str {
        match self {
            GroupMode::None => "None",
            GroupMode::BySource => "Source",
            GroupMode::ByEventId => "Event ID",
        }
    }

    /// Parse the config.toml spelling.
    pub fn from_config(value: &str) -> Option<GroupMode> {
        match value.to_lowercase().as_str() {
            "none" => Some(GroupMode::None),
            "source" | "by-source" => Some(GroupMode::BySource),
            "event-id" | "eventid" | "by-event-id" => Some(GroupMode::ByEventId),
            _ => None,
        }
    }

    /// Ordering of two entries under this mode. `None` for ungrouped views.
    fn compare(&self, a: &Entry, b: &Entry) -> Option<Ordering> {
        let primary = match self {
            GroupMode::None => return None,
            GroupMode::BySource => a.record.source.cmp(&b.record.source),
            GroupMode::ByEventId => a.record.event_id.cmp(&b.record.event_id),
        };
        Some(primary.then_with(|| a.record.timestamp.cmp(&b.record.timestamp)))
    }

    /// Group header text for an entry.
    fn group_label(&self, entry: &Entry) -> Option<String> {
        match self {
            GroupMode::None => None,
            GroupMode::BySource => Some(entry.record.source.clone()),
            GroupMode::ByEventId => Some(entry.record.event_id.to_string()),
        }
    }

    fn same_group(&self, a: &Entry, b: &Entry) -> bool {
        match self {
            GroupMode::None => true,
            GroupMode::BySource => a.record.source == b.record.source,
            GroupMode::ByEventId => a.record.event_id == b.record.event_id,
        }
    }
}

/// A contiguous run of rows sharing one group key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSpan {
    /// Group key as displayed in the header row.
    pub label: String,

    /// Position of the first row of the group within `View::rows`.
    pub start: usize,

    /// Number of rows in the group.
    pub len: usize,
}

/// One line of the rendered table: a group header or an entry row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewLine {
    /// Header for `View::groups[index]`.
    Header(usize),

    /// Row at position `index` of `View::rows`.
    Row(usize),
}

/// The visible, ordered rows of the entry table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct View {
    /// Indices into the entry slice the view was built from, in display order.
    pub rows: Vec<usize>,

    /// Group spans over `rows`. Empty when the view is ungrouped.
    pub groups: Vec<GroupSpan>,
}

impl View {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Interleave group headers with rows for rendering.
    pub fn lines(&self) -> Vec<ViewLine> {
        if self.groups.is_empty() {
            return (0..self.rows.len()).map(ViewLine::Row).collect();
        }
        let mut lines = Vec::with_capacity(self.rows.len() + self.groups.len());
        for (g, span) in self.groups.iter().enumerate() {
            lines.push(ViewLine::Header(g));
            lines.extend((span.start..span.start + span.len).map(ViewLine::Row));
        }
        lines
    }

    /// Iterate visible entries in display order.
    pub fn entries<'a>(&'a self, entries: &'a [Entry]) -> impl Iterator<Item = &'a Entry> + 'a {
        self.rows.iter().filter_map(move |&i| entries.get(i))
    }
}

/// Filter `entries` with `filter` and order the survivors for `mode`.
///
/// Sorting is stable, so entries with equal keys keep their catalog order.
pub fn apply_view(entries: &[Entry], filter: &FilterState, mode: GroupMode) -> View {
    let mut rows = apply_filters(entries, filter);

    if mode != GroupMode::None {
        rows.sort_by(|&a, &b| {
            mode.compare(&entries[a], &entries[b])
                .unwrap_or(Ordering::Equal)
        });
    }

    let groups = group_spans(entries, &rows, mode);

    tracing::trace!(
        total = entries.len(),
        visible = rows.len(),
        groups = groups.len(),
        mode = ?mode,
        "View recomputed"
    );

    View { rows, groups }
}

fn group_spans(entries: &[Entry], rows: &[usize], mode: GroupMode) -> Vec<GroupSpan> {
    let mut spans: Vec<GroupSpan> = Vec::new();
    if mode == GroupMode::None {
        return spans;
    }
    for (pos, &idx) in rows.iter().enumerate() {
        let entry = &entries[idx];
        match spans.last_mut() {
            Some(span) if mode.same_group(&entries[rows[span.start]], entry) => span.len += 1,
            _ => spans.push(GroupSpan {
                label: mode.group_label(entry).unwrap_or_default(),
                start: pos,
                len: 1,
            }),
        }
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{EventLevel, EventRecord};
    use chrono::{TimeZone, Utc};

    fn make_entry(event_id: u32, source: &str, minute: u32) -> Entry {
        Entry::new(
            "System",
            EventRecord {
                record_number: u64::from(minute),
                event_id,
                level: EventLevel::Information,
                source: source.to_string(),
                category: 0,
                machine: "WS01".to_string(),
                message: String::new(),
                timestamp: Utc.with_ymd_and_hms(2024, 3, 1, 9, minute, 0).unwrap(),
            },
        )
    }

    #[test]
    fn test_ungrouped_view_keeps_catalog_order() {
        let entries = vec![
            make_entry(5, "B", 2),
            make_entry(3, "A", 1),
            make_entry(5, "A", 1),
        ];
        let view = apply_view(&entries, &FilterState::default(), GroupMode::None);
        assert_eq!(view.rows, vec![0, 1, 2]);
        assert!(view.groups.is_empty());
    }

    #[test]
    fn test_group_by_event_id_sorts_by_id_then_time() {
        let entries = vec![make_entry(5, "X", 2), make_entry(3, "X", 1), make_entry(5, "X", 1)];
        let view = apply_view(&entries, &FilterState::default(), GroupMode::ByEventId);
        assert_eq!(view.rows, vec![1, 2, 0]);
        assert_eq!(
            view.groups,
            vec![
                GroupSpan {
                    label: "3".to_string(),
                    start: 0,
                    len: 1
                },
                GroupSpan {
                    label: "5".to_string(),
                    start: 1,
                    len: 2
                },
            ]
        );
    }

    #[test]
    fn test_group_by_source_sorts_by_name_then_time() {
        let entries = vec![
            make_entry(1, "Tcpip", 5),
            make_entry(2, "Disk", 9),
            make_entry(3, "Disk", 4),
        ];
        let view = apply_view(&entries, &FilterState::default(), GroupMode::BySource);
        assert_eq!(view.rows, vec![2, 1, 0]);
        let labels: Vec<_> = view.groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, vec!["Disk", "Tcpip"]);
    }

    #[test]
    fn test_grouping_applies_after_filtering() {
        let entries = vec![make_entry(7, "A", 3), make_entry(8, "B", 1), make_entry(7, "C", 2)];
        let filter = FilterState::default().set_event_ids("7");
        let view = apply_view(&entries, &filter, GroupMode::BySource);
        assert_eq!(view.rows, vec![0, 2]);
        assert_eq!(view.groups.len(), 2);
    }

    #[test]
    fn test_view_is_idempotent() {
        let entries = vec![make_entry(5, "X", 2), make_entry(3, "Y", 1), make_entry(5, "X", 1)];
        let filter = FilterState::default().select_source("X");
        let first = apply_view(&entries, &filter, GroupMode::ByEventId);
        let second = apply_view(&entries, &filter, GroupMode::ByEventId);
        assert_eq!(first, second);
    }

    #[test]
    fn test_lines_interleave_headers() {
        let entries = vec![make_entry(5, "X", 2), make_entry(3, "X", 1), make_entry(5, "X", 1)];
        let view = apply_view(&entries, &FilterState::default(), GroupMode::ByEventId);
        assert_eq!(
            view.lines(),
            vec![
                ViewLine::Header(0),
                ViewLine::Row(0),
                ViewLine::Header(1),
                ViewLine::Row(1),
                ViewLine::Row(2),
            ]
        );
    }

    #[test]
    fn test_group_mode_from_config() {
        assert_eq!(GroupMode::from_config("Source"), Some(GroupMode::BySource));
        assert_eq!(GroupMode::from_config("event-id"), Some(GroupMode::ByEventId));
        assert_eq!(GroupMode::from_config("none"), Some(GroupMode::None));
        assert_eq!(GroupMode::from_config("level"), None);
    }
}
