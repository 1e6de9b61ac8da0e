// EventFiend - core/filter.rs
//
// Filter predicates for event log entries.
// The five predicates are AND-combined; an empty axis never filters.
// Core layer: pure logic, no I/O or UI dependencies.

use crate::core::model::{Entry, EventLevel};
use crate::util::constants::FILTER_TOKEN_SEPARATOR;
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// Complete filter state. All axes are AND-combined when applied.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    /// Source names to include (empty = all).
    pub sources: HashSet<String>,

    /// Levels to include (empty = all).
    pub levels: HashSet<EventLevel>,

    /// Event-id pattern: a comma-separated list, or a fragment of an id.
    pub event_ids: String,

    /// Keyword pattern: a comma-separated list, or a fragment of a message.
    pub keywords: String,

    /// Start of time range (inclusive).
    pub from: Option<DateTime<Utc>>,

    /// End of time range (inclusive).
    pub to: Option<DateTime<Utc>>,
}

impl FilterState {
    /// Returns true if no axis can reject an entry.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
            && self.levels.is_empty()
            && is_blank(&self.event_ids)
            && is_blank(&self.keywords)
            && !self.time_range_active()
    }

    /// The time axis only filters when both bounds are set.
    pub fn time_range_active(&self) -> bool {
        self.from.is_some() && self.to.is_some()
    }

    #[must_use]
    pub fn select_source(mut self, name: &str) -> Self {
        self.sources.insert(name.to_string());
        self
    }

    #[must_use]
    pub fn deselect_source(mut self, name: &str) -> Self {
        self.sources.remove(name);
        self
    }

    #[must_use]
    pub fn select_level(mut self, level: EventLevel) -> Self {
        self.levels.insert(level);
        self
    }

    #[must_use]
    pub fn deselect_level(mut self, level: EventLevel) -> Self {
        self.levels.remove(&level);
        self
    }

    /// Replace the event-id pattern. Characters other than digits and the
    /// separator are dropped.
    #[must_use]
    pub fn set_event_ids(mut self, text: &str) -> Self {
        self.event_ids = sanitize_event_ids(text);
        self
    }

    #[must_use]
    pub fn set_keywords(mut self, text: &str) -> Self {
        self.keywords = text.to_string();
        self
    }

    #[must_use]
    pub fn set_time_range(
        mut self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    /// Drop selected source names that are not in `available`.
    #[must_use]
    pub fn retain_sources<'a>(mut self, available: impl IntoIterator<Item = &'a str>) -> Self {
        let available: HashSet<&str> = available.into_iter().collect();
        self.sources.retain(|s| available.contains(s.as_str()));
        self
    }

    /// Reset every axis.
    #[must_use]
    pub fn clear(self) -> Self {
        Self::default()
    }
}

/// Keep only the characters the event-id box accepts: ASCII digits and the
/// token separator.
pub fn sanitize_event_ids(text: &str) -> String {
    text.chars()
        .filter(|c| c.is_ascii_digit() || *c == FILTER_TOKEN_SEPARATOR)
        .collect()
}

fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// Non-empty tokens of a separator-containing pattern.
fn tokens(pattern: &str) -> impl Iterator<Item = &str> {
    pattern.split(FILTER_TOKEN_SEPARATOR).filter(|t| !t.is_empty())
}

/// Event-id predicate.
///
/// With a separator the id must equal one of the tokens. Without one the
/// pattern only has to occur somewhere in the id, so "10" also admits 100
/// and 210.
pub fn event_id_matches(entry: &Entry, pattern: &str) -> bool {
    if is_blank(pattern) {
        return true;
    }
    let id = entry.record.event_id.to_string();
    if pattern.contains(FILTER_TOKEN_SEPARATOR) {
        let mut list = tokens(pattern).peekable();
        if list.peek().is_none() {
            return true;
        }
        list.any(|t| t == id)
    } else {
        id.contains(pattern)
    }
}

/// Message predicate. Case-sensitive substring search for the pattern, or for
/// any of its tokens when it contains a separator.
pub fn message_matches(entry: &Entry, pattern: &str) -> bool {
    if is_blank(pattern) {
        return true;
    }
    let message = &entry.record.message;
    if pattern.contains(FILTER_TOKEN_SEPARATOR) {
        let mut list = tokens(pattern).peekable();
        if list.peek().is_none() {
            return true;
        }
        list.any(|t| message.contains(t))
    } else {
        message.contains(pattern)
    }
}

pub fn source_matches(entry: &Entry, sources: &HashSet<String>) -> bool {
    sources.is_empty() || sources.contains(&entry.record.source)
}

pub fn level_matches(entry: &Entry, levels: &HashSet<EventLevel>) -> bool {
    levels.is_empty() || levels.contains(&entry.record.level)
}

/// Time-range predicate. A lone bound leaves the axis inactive.
pub fn time_matches(
    entry: &Entry,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
) -> bool {
    match (from, to) {
        (Some(from), Some(to)) => {
            let ts = entry.record.timestamp;
            ts >= from && ts <= to
        }
        _ => true,
    }
}

/// Check if a single entry passes all five predicates.
pub fn matches_all(entry: &Entry, filter: &FilterState) -> bool {
    source_matches(entry, &filter.sources)
        && message_matches(entry, &filter.keywords)
        && event_id_matches(entry, &filter.event_ids)
        && level_matches(entry, &filter.levels)
        && time_matches(entry, filter.from, filter.to)
}

/// Apply filters to a slice of entries, returning indices of matching entries
/// in their original order.
pub fn apply_filters(entries: &[Entry], filter: &FilterState) -> Vec<usize> {
    if filter.is_empty() {
        return (0..entries.len()).collect();
    }

    entries
        .iter()
        .enumerate()
        .filter(|(_, entry)| matches_all(entry, filter))
        .map(|(idx, _)| idx)
        .collect()
}
