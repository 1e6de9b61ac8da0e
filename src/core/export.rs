// EventFiend - core/export.rs
//
// CSV and JSON export of the visible entry rows.
// Core layer: writes to any Write trait object.

use crate::core::model::Entry;
use crate::util::constants::MAX_EXPORT_ENTRIES;
use crate::util::error::ExportError;
use std::io::Write;
use std::path::Path;

fn check_size(count: usize) -> Result<(), ExportError> {
    if count > MAX_EXPORT_ENTRIES {
        return Err(ExportError::TooManyEntries {
            count,
            max: MAX_EXPORT_ENTRIES,
        });
    }
    Ok(())
}

/// Export entries to CSV format, in the order given.
///
/// Writes: log, time, level, source, event_id, category, message
pub fn export_csv<W: Write>(
    entries: &[&Entry],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    check_size(entries.len())?;
    let csv_err = |e| ExportError::Csv {
        path: export_path.to_path_buf(),
        source: e,
    };

    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer
        .write_record(["log", "time", "level", "source", "event_id", "category", "message"])
        .map_err(csv_err)?;

    for entry in entries {
        let record = &entry.record;
        csv_writer
            .write_record([
                entry.log.as_str(),
                &record.timestamp.to_rfc3339(),
                record.level.label(),
                &record.source,
                &record.event_id.to_string(),
                &record.category.to_string(),
                &record.message,
            ])
            .map_err(csv_err)?;
    }

    csv_writer.flush().map_err(|e| ExportError::Io {
        path: export_path.to_path_buf(),
        source: e,
    })?;

    Ok(entries.len())
}

/// Export entries to JSON format (array of objects).
pub fn export_json<W: Write>(
    entries: &[&Entry],
    writer: W,
    export_path: &Path,
) -> Result<usize, ExportError> {
    check_size(entries.len())?;
    serde_json::to_writer_pretty(writer, entries).map_err(|e| ExportError::Json {
        path: export_path.to_path_buf(),
        source: e,
    })?;
    Ok(entries.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{EventLevel, EventRecord};
    use chrono::{TimeZone, Utc};

    fn make_entry(event_id: u32, message: &str) -> Entry {
        Entry::new(
            "System",
            EventRecord {
                record_number: 1,
                event_id,
                level: EventLevel::Warning,
                source: "Disk".to_string(),
                category: 0,
                machine: "WS01".to_string(),
                message: message.to_string(),
                timestamp: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
            },
        )
    }

    #[test]
    fn test_csv_export() {
        let a = make_entry(51, "paging error, retrying");
        let b = make_entry(153, "IO retried");
        let mut buf = Vec::new();
        let count = export_csv(&[&a, &b], &mut buf, Path::new("out.csv")).unwrap();
        assert_eq!(count, 2);

        let output = String::from_utf8(buf).unwrap();
        let mut lines = output.lines();
        assert_eq!(
            lines.next(),
            Some("log,time,level,source,event_id,category,message")
        );
        assert!(output.contains("\"paging error, retrying\""));
        assert!(output.contains("2024-01-02T03:04:05+00:00"));
    }

    #[test]
    fn test_json_export() {
        let a = make_entry(7, "Test message");
        let mut buf = Vec::new();
        let count = export_json(&[&a], &mut buf, Path::new("out.json")).unwrap();
        assert_eq!(count, 1);

        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value[0]["log"], "System");
        assert_eq!(value[0]["event_id"], 7);
        assert_eq!(value[0]["level"], "Warning");
        assert_eq!(value[0]["message"], "Test message");
    }
}
