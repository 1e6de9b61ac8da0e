// EventFiend - platform/mod.rs
//
// Platform abstraction layer: configuration paths, the Windows event log
// API, and the .evtx file reader.
// Dependencies: core (model types, provider trait), util.
// Must NOT depend on: app, ui.

pub mod config;
pub mod evtx_file;
pub mod host;
pub mod record;
#[cfg(windows)]
pub mod windows;
