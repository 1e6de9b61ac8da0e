// EventFiend - platform/record.rs
//
// Decoder for the EVENTLOGRECORD layout returned by ReadEventLogW.
//
// Kept free of Windows API calls so the byte-level decoding is exercised on
// every platform. Layout (all fields little-endian):
//
//   0  Length              u32     32 ClosingRecordNumber u32
//   4  Reserved ("LfLe")   u32     36 StringOffset        u32
//   8  RecordNumber        u32     40 UserSidLength       u32
//  12  TimeGenerated       u32     44 UserSidOffset       u32
//  16  TimeWritten         u32     48 DataLength          u32
//  20  EventID             u32     52 DataOffset          u32
//  24  EventType           u16     56 SourceName          WCHAR[] (NUL)
//  26  NumStrings          u16        Computername        WCHAR[] (NUL)
//  28  EventCategory       u16
//  30  ReservedFlags       u16

use crate::core::model::{EventLevel, EventRecord};
use crate::util::constants::{
    EVENTLOG_RECORD_HEADER_LEN, EVENTLOG_RECORD_SIGNATURE, EVENT_ID_MASK,
};
use crate::util::error::DecodeError;
use chrono::{DateTime, Utc};

fn u16_at(buf: &[u8], at: usize) -> Option<u16> {
    buf.get(at..at + 2).map(|b| u16::from_le_bytes([b[0], b[1]]))
}

fn u32_at(buf: &[u8], at: usize) -> Option<u32> {
    buf.get(at..at + 4)
        .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
}

/// Read a NUL-terminated UTF-16LE string starting at `at`.
/// Returns the string and the offset just past the terminator.
fn wide_str_at(buf: &[u8], at: usize) -> Option<(String, usize)> {
    let mut units = Vec::new();
    let mut pos = at;
    loop {
        let unit = u16_at(buf, pos)?;
        pos += 2;
        if unit == 0 {
            break;
        }
        units.push(unit);
    }
    Some((String::from_utf16_lossy(&units), pos))
}

/// Decode the record starting at the beginning of `buf`.
///
/// Returns the record and its total length in bytes. `offset` is only used
/// to position errors within the enclosing read buffer.
pub fn decode_record(buf: &[u8], offset: usize) -> Result<(EventRecord, usize), DecodeError> {
    let fail = |reason| DecodeError { offset, reason };

    if buf.len() < EVENTLOG_RECORD_HEADER_LEN {
        return Err(fail("record shorter than header"));
    }
    let length = u32_at(buf, 0).ok_or_else(|| fail("missing length"))? as usize;
    if length < EVENTLOG_RECORD_HEADER_LEN || length > buf.len() {
        return Err(fail("record length out of bounds"));
    }
    if u32_at(buf, 4) != Some(EVENTLOG_RECORD_SIGNATURE) {
        return Err(fail("bad record signature"));
    }
    let record = &buf[..length];

    let header = |at| u32_at(record, at).ok_or_else(|| fail("truncated header"));
    let record_number = header(8)?;
    let time_written = header(16)?;
    let instance_id = header(20)?;
    let string_offset = header(36)? as usize;
    let event_type = u16_at(record, 24).ok_or_else(|| fail("truncated header"))?;
    let num_strings = u16_at(record, 26).ok_or_else(|| fail("truncated header"))?;
    let category = u16_at(record, 28).ok_or_else(|| fail("truncated header"))?;

    let (source, after_source) = wide_str_at(record, EVENTLOG_RECORD_HEADER_LEN)
        .ok_or_else(|| fail("unterminated source name"))?;
    let (machine, _) =
        wide_str_at(record, after_source).ok_or_else(|| fail("unterminated computer name"))?;

    let mut strings = Vec::with_capacity(usize::from(num_strings));
    let mut pos = string_offset;
    for _ in 0..num_strings {
        let (s, next) =
            wide_str_at(record, pos).ok_or_else(|| fail("insertion string out of bounds"))?;
        strings.push(s);
        pos = next;
    }

    let timestamp = DateTime::<Utc>::from_timestamp(i64::from(time_written), 0)
        .ok_or_else(|| fail("timestamp out of range"))?;

    let level = EventLevel::from_event_type(event_type).unwrap_or_else(|| {
        tracing::debug!(event_type, "Unknown event type; reporting as Information");
        EventLevel::Information
    });

    Ok((
        EventRecord {
            record_number: u64::from(record_number),
            event_id: instance_id & EVENT_ID_MASK,
            level,
            source,
            category,
            machine,
            message: strings.join(" "),
            timestamp,
        },
        length,
    ))
}

/// Decode every record packed into a `ReadEventLogW` result buffer.
pub fn decode_buffer(buf: &[u8]) -> Result<Vec<EventRecord>, DecodeError> {
    let mut records = Vec::new();
    let mut offset = 0;
    while offset < buf.len() {
        let (record, length) = decode_record(&buf[offset..], offset)?;
        records.push(record);
        offset += length;
    }
    Ok(records)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::TimeZone;

    fn push_wide(buf: &mut Vec<u8>, s: &str) {
        for unit in s.encode_utf16() {
            buf.extend_from_slice(&unit.to_le_bytes());
        }
        buf.extend_from_slice(&0u16.to_le_bytes());
    }

    /// Lay out a record the way the event log service returns it.
    pub(crate) fn raw_record(
        record_number: u32,
        instance_id: u32,
        event_type: u16,
        time_written: u32,
        source: &str,
        strings: &[&str],
    ) -> Vec<u8> {
        let mut names = Vec::new();
        push_wide(&mut names, source);
        push_wide(&mut names, "WS01");
        let string_offset = EVENTLOG_RECORD_HEADER_LEN + names.len();
        let mut body = Vec::new();
        for s in strings {
            push_wide(&mut body, s);
        }
        // Records are DWORD aligned and end with a copy of the length.
        let unpadded = string_offset + body.len() + 4;
        let length = unpadded.div_ceil(4) * 4;

        let mut buf = Vec::with_capacity(length);
        for field in [
            length as u32,
            EVENTLOG_RECORD_SIGNATURE,
            record_number,
            time_written,
            time_written,
            instance_id,
        ] {
            buf.extend_from_slice(&field.to_le_bytes());
        }
        for field in [event_type, strings.len() as u16, 3u16, 0u16] {
            buf.extend_from_slice(&field.to_le_bytes());
        }
        let data_offset = (string_offset + body.len()) as u32;
        for field in [0u32, string_offset as u32, 0, 0, 0, data_offset] {
            buf.extend_from_slice(&field.to_le_bytes());
        }
        buf.extend_from_slice(&names);
        buf.extend_from_slice(&body);
        buf.resize(length - 4, 0);
        buf.extend_from_slice(&(length as u32).to_le_bytes());
        buf
    }

    #[test]
    fn decodes_fields_and_masks_qualifier_bits() {
        // 0x4000_1B58: qualifier 0x4000 on event 7000 (Service Control Manager).
        let raw = raw_record(42, 0x4000_1b58, 0x0001, 1_700_000_000, "Service Control Manager", &[
            "Spooler",
            "%%2",
        ]);
        let (record, length) = decode_record(&raw, 0).unwrap();
        assert_eq!(length, raw.len());
        assert_eq!(record.record_number, 42);
        assert_eq!(record.event_id, 7000);
        assert_eq!(record.level, EventLevel::Error);
        assert_eq!(record.source, "Service Control Manager");
        assert_eq!(record.machine, "WS01");
        assert_eq!(record.category, 3);
        assert_eq!(record.message, "Spooler %%2");
        assert_eq!(
            record.timestamp,
            Utc.timestamp_opt(1_700_000_000, 0).unwrap()
        );
    }

    #[test]
    fn decodes_consecutive_records() {
        let mut buf = raw_record(1, 100, 0x0004, 1_600_000_000, "Disk", &[]);
        buf.extend(raw_record(2, 200, 0x0010, 1_600_000_060, "Security", &["user"]));
        let records = decode_buffer(&buf).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].message, "");
        assert_eq!(records[1].event_id, 200);
        assert_eq!(records[1].level, EventLevel::FailureAudit);
    }

    #[test]
    fn rejects_bad_signature() {
        let mut raw = raw_record(1, 1, 0x0004, 0, "Disk", &[]);
        raw[4] = 0;
        let err = decode_record(&raw, 0).unwrap_err();
        assert_eq!(err.reason, "bad record signature");
    }

    #[test]
    fn rejects_truncated_record_with_offset() {
        let mut buf = raw_record(1, 1, 0x0004, 0, "Disk", &[]);
        let second = raw_record(2, 2, 0x0004, 0, "Disk", &[]);
        let first_len = buf.len();
        buf.extend_from_slice(&second[..20]);
        let err = decode_buffer(&buf).unwrap_err();
        assert_eq!(err.offset, first_len);
    }
}
