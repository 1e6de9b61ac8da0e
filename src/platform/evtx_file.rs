// EventFiend - platform/evtx_file.rs
//
// Reads exported .evtx files so saved logs can be browsed on any platform.
//
// Records are rendered to JSON by the evtx crate and mapped onto
// EventRecord. Records that fail to parse are skipped and counted; the file
// as a whole only fails when it cannot be opened.

use crate::core::model::{EventLevel, EventRecord};
use crate::util::constants::{KEYWORD_AUDIT_FAILURE, KEYWORD_AUDIT_SUCCESS};
use crate::util::error::ProviderError;
use chrono::{DateTime, Utc};
use evtx::EvtxParser;
use serde_json::Value;
use std::path::Path;

/// Read every record of the `.evtx` file at `path`.
pub fn read_file(path: &Path) -> Result<Vec<EventRecord>, ProviderError> {
    let mut parser = EvtxParser::from_path(path).map_err(|e| ProviderError::Evtx {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for result in parser.records_json_value() {
        match result {
            Ok(serialized) => match record_from_json(&serialized.data) {
                Some(record) => records.push(record),
                None => skipped += 1,
            },
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "Skipping unreadable EVTX record");
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        tracing::warn!(path = %path.display(), skipped, "Some EVTX records could not be read");
    }
    tracing::info!(path = %path.display(), records = records.len(), "EVTX file read");
    Ok(records)
}

fn attr<'a>(node: &'a Value, name: &str) -> Option<&'a Value> {
    node.get("#attributes")?.get(name)
}

/// Numeric field that may be rendered either as a bare value or as
/// `{"#attributes": {...}, "#text": value}`.
fn number(node: &Value) -> Option<u64> {
    match node {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.parse().ok(),
        Value::Object(_) => node.get("#text").and_then(number),
        _ => None,
    }
}

fn keywords(system: &Value) -> u64 {
    system
        .get("Keywords")
        .and_then(Value::as_str)
        .and_then(|s| u64::from_str_radix(s.trim_start_matches("0x"), 16).ok())
        .unwrap_or(0)
}

/// Map the modern level number and keywords onto the classic entry types.
fn level_of(level: u64, keywords: u64) -> EventLevel {
    if keywords & KEYWORD_AUDIT_FAILURE != 0 {
        EventLevel::FailureAudit
    } else if keywords & KEYWORD_AUDIT_SUCCESS != 0 {
        EventLevel::SuccessAudit
    } else {
        match level {
            1 | 2 => EventLevel::Error,
            3 => EventLevel::Warning,
            _ => EventLevel::Information,
        }
    }
}

/// Collect the scalar values of an EventData/UserData subtree, skipping
/// attribute maps.
fn collect_text(node: &Value, out: &mut Vec<String>) {
    match node {
        Value::String(s) if !s.is_empty() => out.push(s.clone()),
        Value::Number(n) => out.push(n.to_string()),
        Value::Bool(b) => out.push(b.to_string()),
        Value::Array(items) => items.iter().for_each(|v| collect_text(v, out)),
        Value::Object(map) => map
            .iter()
            .filter(|(k, _)| k.as_str() != "#attributes")
            .for_each(|(_, v)| collect_text(v, out)),
        _ => {}
    }
}

/// Build an EventRecord from one JSON-rendered EVTX record.
pub fn record_from_json(value: &Value) -> Option<EventRecord> {
    let event = value.get("Event")?;
    let system = event.get("System")?;

    let event_id = u32::try_from(number(system.get("EventID")?)?).ok()?;
    let timestamp = attr(system.get("TimeCreated")?, "SystemTime")
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())?
        .with_timezone(&Utc);

    let provider = system.get("Provider");
    let source = provider
        .and_then(|p| attr(p, "EventSourceName").or_else(|| attr(p, "Name")))
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    let level = level_of(
        system.get("Level").and_then(number).unwrap_or(4),
        keywords(system),
    );

    let mut parts = Vec::new();
    for section in ["EventData", "UserData"] {
        if let Some(node) = event.get(section) {
            collect_text(node, &mut parts);
        }
    }

    Some(EventRecord {
        record_number: system.get("EventRecordID").and_then(number).unwrap_or(0),
        event_id,
        level,
        source,
        category: system
            .get("Task")
            .and_then(number)
            .and_then(|task| u16::try_from(task).ok())
            .unwrap_or(0),
        machine: system
            .get("Computer")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        message: parts.join(" "),
        timestamp,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn maps_classic_service_event() {
        let value = json!({
            "Event": {
                "System": {
                    "Provider": {"#attributes": {
                        "Name": "Service Control Manager",
                        "EventSourceName": "Service Control Manager"
                    }},
                    "EventID": {"#attributes": {"Qualifiers": 16384}, "#text": 7036},
                    "Level": 4,
                    "Task": 0,
                    "Keywords": "0x8080000000000000",
                    "TimeCreated": {"#attributes": {"SystemTime": "2024-01-15T10:30:00.000000Z"}},
                    "EventRecordID": 991,
                    "Computer": "WS01"
                },
                "EventData": {"Data": [
                    {"#attributes": {"Name": "param1"}, "#text": "Windows Update"},
                    {"#attributes": {"Name": "param2"}, "#text": "running"}
                ]}
            }
        });
        let record = record_from_json(&value).unwrap();
        assert_eq!(record.event_id, 7036);
        assert_eq!(record.source, "Service Control Manager");
        assert_eq!(record.level, EventLevel::Information);
        assert_eq!(record.record_number, 991);
        assert_eq!(record.machine, "WS01");
        assert_eq!(record.message, "Windows Update running");
        assert_eq!(
            record.timestamp,
            Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap()
        );
    }

    #[test]
    fn audit_keywords_select_audit_levels() {
        let value = json!({
            "Event": {
                "System": {
                    "Provider": {"#attributes": {"Name": "Microsoft-Windows-Security-Auditing"}},
                    "EventID": 4625,
                    "Level": 0,
                    "Keywords": "0x8010000000000000",
                    "TimeCreated": {"#attributes": {"SystemTime": "2024-02-01T00:00:00Z"}}
                },
                "EventData": {"TargetUserName": "admin", "LogonType": 3}
            }
        });
        let record = record_from_json(&value).unwrap();
        assert_eq!(record.event_id, 4625);
        assert_eq!(record.level, EventLevel::FailureAudit);
        assert_eq!(record.source, "Microsoft-Windows-Security-Auditing");
        assert!(record.message.contains("admin"));
    }

    #[test]
    fn error_levels_map_to_error() {
        assert_eq!(level_of(1, 0), EventLevel::Error);
        assert_eq!(level_of(2, 0), EventLevel::Error);
        assert_eq!(level_of(3, 0), EventLevel::Warning);
        assert_eq!(level_of(5, 0), EventLevel::Information);
        assert_eq!(level_of(0, KEYWORD_AUDIT_SUCCESS), EventLevel::SuccessAudit);
    }

    #[test]
    fn out_of_range_numbers_do_not_wrap() {
        let mut value = json!({
            "Event": {
                "System": {
                    "Provider": {"#attributes": {"Name": "Disk"}},
                    "EventID": 4_294_967_297u64,
                    "Task": 70_000,
                    "TimeCreated": {"#attributes": {"SystemTime": "2024-02-01T00:00:00Z"}}
                }
            }
        });
        assert!(record_from_json(&value).is_none());

        value["Event"]["System"]["EventID"] = json!(11);
        let record = record_from_json(&value).unwrap();
        assert_eq!(record.event_id, 11);
        assert_eq!(record.category, 0);
    }

    #[test]
    fn missing_system_section_is_rejected() {
        assert!(record_from_json(&json!({"Event": {}})).is_none());
    }

    #[test]
    fn unreadable_file_reports_path() {
        let err = read_file(Path::new("does-not-exist.evtx")).unwrap_err();
        assert!(matches!(err, ProviderError::Evtx { .. }));
        assert!(err.to_string().contains("does-not-exist.evtx"));
    }
}
