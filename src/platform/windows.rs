// EventFiend - platform/windows.rs
//
// Classic event log access through the Win32 API.
//
// Log names come from the subkeys of the EventLog service registry key,
// opened through RegConnectRegistryW so the same code path serves local and
// remote machines. Entries are read with a sequential forwards
// ReadEventLogW loop and decoded by platform::record.
//
// Every handle is owned by a guard that closes it on drop; nothing is held
// across calls.

use crate::core::model::EventRecord;
use crate::platform::record::decode_buffer;
use crate::util::constants::EVENTLOG_REGISTRY_KEY;
use crate::util::error::ProviderError;
use std::io;
use std::ptr;
use windows_sys::Win32::Foundation::{
    GetLastError, ERROR_HANDLE_EOF, ERROR_INSUFFICIENT_BUFFER, ERROR_NO_MORE_ITEMS, ERROR_SUCCESS,
    HANDLE,
};
use windows_sys::Win32::System::EventLog::{
    CloseEventLog, OpenEventLogW, ReadEventLogW, EVENTLOG_FORWARDS_READ, EVENTLOG_SEQUENTIAL_READ,
};
use windows_sys::Win32::System::Registry::{
    RegCloseKey, RegConnectRegistryW, RegEnumKeyExW, RegOpenKeyExW, HKEY, HKEY_LOCAL_MACHINE,
    KEY_READ,
};

/// Registry key names are limited to 255 characters.
const MAX_KEY_NAME_LEN: usize = 256;

struct RegKey(HKEY);

impl Drop for RegKey {
    fn drop(&mut self) {
        unsafe {
            RegCloseKey(self.0);
        }
    }
}

struct EventLogHandle(HANDLE);

impl Drop for EventLogHandle {
    fn drop(&mut self) {
        unsafe {
            CloseEventLog(self.0);
        }
    }
}

/// NUL-terminated UTF-16 copy of `s`.
fn wide(s: &str) -> Vec<u16> {
    s.encode_utf16().chain(std::iter::once(0)).collect()
}

/// The API expects remote machines in UNC form (`\\host`).
fn unc_name(host: &str) -> String {
    if host.starts_with(r"\\") {
        host.to_string()
    } else {
        format!(r"\\{host}")
    }
}

fn os_error(code: u32) -> io::Error {
    io::Error::from_raw_os_error(code as i32)
}

/// Names of the logs registered on `host` (`None` = local machine).
pub fn list_log_names(host: Option<&str>) -> io::Result<Vec<String>> {
    let machine = host.map(|h| wide(&unc_name(h)));
    let machine_ptr = machine.as_ref().map_or(ptr::null(), |m| m.as_ptr());

    let mut hive: HKEY = ptr::null_mut();
    let status = unsafe { RegConnectRegistryW(machine_ptr, HKEY_LOCAL_MACHINE, &mut hive) };
    if status != ERROR_SUCCESS {
        return Err(os_error(status));
    }
    let hive = RegKey(hive);

    let subkey = wide(EVENTLOG_REGISTRY_KEY);
    let mut key: HKEY = ptr::null_mut();
    let status = unsafe { RegOpenKeyExW(hive.0, subkey.as_ptr(), 0, KEY_READ, &mut key) };
    if status != ERROR_SUCCESS {
        return Err(os_error(status));
    }
    let key = RegKey(key);

    let mut names = Vec::new();
    let mut index = 0u32;
    loop {
        let mut name = [0u16; MAX_KEY_NAME_LEN];
        let mut len = name.len() as u32;
        let status = unsafe {
            RegEnumKeyExW(
                key.0,
                index,
                name.as_mut_ptr(),
                &mut len,
                ptr::null(),
                ptr::null_mut(),
                ptr::null_mut(),
                ptr::null_mut(),
            )
        };
        if status == ERROR_NO_MORE_ITEMS {
            break;
        }
        if status != ERROR_SUCCESS {
            return Err(os_error(status));
        }
        names.push(String::from_utf16_lossy(&name[..len as usize]));
        index += 1;
    }

    tracing::debug!(host = host.unwrap_or("local"), logs = names.len(), "Enumerated event logs");
    Ok(names)
}

/// Read every record of `log` on `host`, oldest first.
pub fn read_log(
    host: Option<&str>,
    log: &str,
    buffer_bytes: usize,
) -> Result<Vec<EventRecord>, ProviderError> {
    let access = |source| ProviderError::Access {
        log: log.to_string(),
        source,
    };

    let server = host.map(|h| wide(&unc_name(h)));
    let server_ptr = server.as_ref().map_or(ptr::null(), |s| s.as_ptr());
    let log_name = wide(log);

    let raw = unsafe { OpenEventLogW(server_ptr, log_name.as_ptr()) };
    if raw.is_null() {
        return Err(access(io::Error::last_os_error()));
    }
    let handle = EventLogHandle(raw);

    let mut buf = vec![0u8; buffer_bytes];
    let mut records = Vec::new();
    loop {
        let mut read = 0u32;
        let mut needed = 0u32;
        let ok = unsafe {
            ReadEventLogW(
                handle.0,
                EVENTLOG_SEQUENTIAL_READ | EVENTLOG_FORWARDS_READ,
                0,
                buf.as_mut_ptr().cast(),
                buf.len() as u32,
                &mut read,
                &mut needed,
            )
        };
        if ok == 0 {
            let code = unsafe { GetLastError() };
            if code == ERROR_HANDLE_EOF {
                break;
            }
            if code == ERROR_INSUFFICIENT_BUFFER {
                tracing::debug!(log, needed, "Growing event log read buffer");
                buf.resize(needed as usize, 0);
                continue;
            }
            return Err(access(os_error(code)));
        }
        let batch = decode_buffer(&buf[..read as usize]).map_err(|source| ProviderError::Decode {
            log: log.to_string(),
            source,
        })?;
        records.extend(batch);
    }

    Ok(records)
}
